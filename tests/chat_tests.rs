/// Integration tests for chat session management
///
/// This file covers the chat surface of the repository:
/// - Session creation, ordering, and reuse
/// - Appending user messages and automatic titling
/// - Rewinding a conversation
/// - Streaming model replies, including errors and cancellation
/// - Renaming, searching, and deleting sessions

use futures::stream;
use satchel::Error;
use satchel::models::{ChatRole, ChatSession, SourceRef};
use satchel::repo::ReplyChunk;
use tokio_util::sync::CancellationToken;

mod common;
use common::*;

/// Builds a reply chunk carrying only text
fn chunk(text: &str) -> ReplyChunk {
    ReplyChunk {
        text: text.to_string(),
        sources: Vec::new(),
    }
}

/// Tests that a new chat starts empty with the default title
#[tokio::test]
async fn test_create_chat_defaults() {
    let repo = setup_repo().await;

    let session = repo.create_chat().await.expect("Failed to create chat");

    assert_eq!(session.get_title(), ChatSession::DEFAULT_TITLE);
    assert!(session.is_empty());

    let listed = repo.get_chats();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].get_id(), session.get_id());
}

/// Tests that sessions list most recently updated first
///
/// This test verifies:
/// 1. A newly created session appears at the front
/// 2. Saving an older session moves it back to the front
#[tokio::test]
async fn test_chats_listed_most_recent_first() {
    let repo = setup_repo().await;

    let first = repo.create_chat().await.expect("Failed to create chat");
    let second = repo.create_chat().await.expect("Failed to create chat");

    let listed = repo.get_chats();
    assert_eq!(listed[0].get_id(), second.get_id());
    assert_eq!(listed[1].get_id(), first.get_id());

    // Saving restamps the update time, promoting the session
    repo.save_chat(first.clone())
        .await
        .expect("Failed to save chat");

    let listed = repo.get_chats();
    assert_eq!(listed[0].get_id(), first.get_id());
}

/// Tests that opening a chat reuses the latest session while it is empty
#[tokio::test]
async fn test_open_chat_reuses_latest_empty_session() {
    let repo = setup_repo().await;

    let created = repo.create_chat().await.expect("Failed to create chat");
    let opened = repo.open_chat().await.expect("Failed to open chat");

    assert_eq!(opened.get_id(), created.get_id());
    assert_eq!(repo.get_chats().len(), 1);
}

/// Tests that opening a chat starts fresh once the latest has messages
#[tokio::test]
async fn test_open_chat_creates_fresh_after_messages() {
    let repo = setup_repo().await;

    let used = repo.create_chat().await.expect("Failed to create chat");
    repo.append_user_message(&used.get_id(), "What is entropy?")
        .await
        .expect("Failed to append message");

    let opened = repo.open_chat().await.expect("Failed to open chat");

    assert_ne!(opened.get_id(), used.get_id());
    assert!(opened.is_empty());
    assert_eq!(repo.get_chats().len(), 2);
}

/// Tests that the first message trims whitespace and titles the session
#[tokio::test]
async fn test_first_message_trims_and_titles() {
    let repo = setup_repo().await;
    let session = repo.create_chat().await.expect("Failed to create chat");

    let saved = repo
        .append_user_message(
            &session.get_id(),
            "  What is the work-energy theorem in rotation?  ",
        )
        .await
        .expect("Failed to append message");

    assert_eq!(saved.get_title(), "What is the work-energy theore...");
    let messages = saved.get_messages();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].get_role(), ChatRole::User);
    assert_eq!(
        messages[0].get_text(),
        "What is the work-energy theorem in rotation?"
    );
}

/// Tests that short first messages become the title verbatim
#[tokio::test]
async fn test_short_first_message_titles_without_ellipsis() {
    let repo = setup_repo().await;
    let session = repo.create_chat().await.expect("Failed to create chat");

    let saved = repo
        .append_user_message(&session.get_id(), "What is entropy?")
        .await
        .expect("Failed to append message");

    assert_eq!(saved.get_title(), "What is entropy?");
}

/// Tests that later messages never retitle the session
#[tokio::test]
async fn test_later_messages_do_not_retitle() {
    let repo = setup_repo().await;
    let session = repo.create_chat().await.expect("Failed to create chat");

    repo.append_user_message(&session.get_id(), "First question")
        .await
        .expect("Failed to append message");
    let saved = repo
        .append_user_message(&session.get_id(), "Second question")
        .await
        .expect("Failed to append message");

    assert_eq!(saved.get_title(), "First question");
    assert_eq!(saved.message_count(), 2);
}

/// Tests that whitespace-only input is ignored
#[tokio::test]
async fn test_whitespace_only_message_is_ignored() {
    let repo = setup_repo().await;
    let session = repo.create_chat().await.expect("Failed to create chat");

    let saved = repo
        .append_user_message(&session.get_id(), "   \n  ")
        .await
        .expect("Appending whitespace should not fail");

    assert!(saved.is_empty());
    assert_eq!(saved.get_title(), ChatSession::DEFAULT_TITLE);
}

/// Tests rewinding a session to before one of its messages
///
/// This test verifies:
/// 1. The named message and everything after it are removed
/// 2. The removed message's text comes back for re-editing
#[tokio::test]
async fn test_rewind_chat_returns_removed_text() {
    let repo = setup_repo().await;
    let session = repo.create_chat().await.expect("Failed to create chat");

    let after_first = repo
        .append_user_message(&session.get_id(), "First question")
        .await
        .expect("Failed to append message");
    repo.append_user_message(&session.get_id(), "Second question")
        .await
        .expect("Failed to append message");

    let first_id = after_first.get_messages()[0].get_id();
    let removed_text = repo
        .rewind_chat(&session.get_id(), &first_id)
        .await
        .expect("Failed to rewind chat");

    assert_eq!(removed_text, "First question");

    let chats = repo.get_chats();
    assert_eq!(chats[0].get_id(), session.get_id());
    assert!(chats[0].is_empty());
}

/// Tests that rewinding at an unknown message fails with NotFound
#[tokio::test]
async fn test_rewind_unknown_message_errors() {
    let repo = setup_repo().await;
    let session = repo.create_chat().await.expect("Failed to create chat");

    let result = repo.rewind_chat(&session.get_id(), "no-such-message").await;

    assert!(matches!(result, Err(Error::NotFound { .. })));
}

/// Tests streaming a complete model reply into a session
///
/// This test verifies:
/// 1. Chunk texts accumulate into one model message
/// 2. The sources reported during the stream are attached at the end
#[tokio::test]
async fn test_stream_model_reply_collects_chunks() {
    let repo = setup_repo().await;
    let session = repo.create_chat().await.expect("Failed to create chat");
    repo.append_user_message(&session.get_id(), "What is entropy?")
        .await
        .expect("Failed to append message");

    let source = SourceRef {
        title: "Thermodynamics notes".to_string(),
        uri: "https://example.org/thermo".to_string(),
    };
    let reply = stream::iter(vec![
        Ok::<_, String>(chunk("Entropy ")),
        Ok(chunk("measures disorder.")),
        Ok(ReplyChunk {
            text: String::new(),
            sources: vec![source.clone()],
        }),
    ]);

    let saved = repo
        .stream_model_reply(&session.get_id(), reply, CancellationToken::new())
        .await
        .expect("Failed to stream reply");

    let messages = saved.get_messages();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[1].get_role(), ChatRole::Model);
    assert_eq!(messages[1].get_text(), "Entropy measures disorder.");
    assert_eq!(messages[1].get_sources(), Some(vec![source]));

    // The persisted copy matches what was returned
    assert_eq!(repo.get_chats()[0].get_messages()[1].get_text(), "Entropy measures disorder.");
}

/// Tests that a stream error swaps the partial reply for an apology
#[tokio::test]
async fn test_stream_error_replaces_reply_with_apology() {
    let repo = setup_repo().await;
    let session = repo.create_chat().await.expect("Failed to create chat");
    repo.append_user_message(&session.get_id(), "What is entropy?")
        .await
        .expect("Failed to append message");

    let reply = stream::iter(vec![
        Ok(chunk("Partial answer")),
        Err("connection reset".to_string()),
    ]);

    let saved = repo
        .stream_model_reply(&session.get_id(), reply, CancellationToken::new())
        .await
        .expect("The stream error should be absorbed");

    let messages = saved.get_messages();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[1].get_role(), ChatRole::Model);
    assert_eq!(
        messages[1].get_text(),
        "Sorry, something went wrong or the connection was interrupted."
    );
}

/// Tests that cancellation keeps the reply at its last persisted state
///
/// The stream yields one chunk and then cancels the token from inside
/// its next poll, so the reply stops exactly after the first chunk.
#[tokio::test]
async fn test_cancelled_stream_keeps_partial_reply() {
    let repo = setup_repo().await;
    let session = repo.create_chat().await.expect("Failed to create chat");
    repo.append_user_message(&session.get_id(), "What is entropy?")
        .await
        .expect("Failed to append message");

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    let reply = Box::pin(stream::unfold(0, move |step| {
        let trigger = trigger.clone();
        async move {
            if step == 0 {
                Some((Ok::<_, String>(chunk("Partial answer")), 1))
            } else {
                trigger.cancel();
                futures::future::pending().await
            }
        }
    }));

    let saved = repo
        .stream_model_reply(&session.get_id(), reply, cancel)
        .await
        .expect("Cancellation should not be an error");

    let messages = saved.get_messages();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[1].get_text(), "Partial answer");
    assert_eq!(repo.get_chats()[0].get_messages()[1].get_text(), "Partial answer");
}

/// Tests that streaming into an unknown session fails with NotFound
#[tokio::test]
async fn test_stream_into_unknown_session_errors() {
    let repo = setup_repo().await;

    let reply = stream::iter(vec![Ok::<_, String>(chunk("text"))]);
    let result = repo
        .stream_model_reply("no-such-session", reply, CancellationToken::new())
        .await;

    assert!(matches!(result, Err(Error::NotFound { .. })));
}

/// Tests renaming a session
#[tokio::test]
async fn test_rename_chat() {
    let repo = setup_repo().await;
    let session = repo.create_chat().await.expect("Failed to create chat");

    let renamed = repo
        .rename_chat(&session.get_id(), "Exam prep".to_string())
        .await
        .expect("Failed to rename chat");

    assert_eq!(renamed.get_title(), "Exam prep");
    assert_eq!(repo.get_chats()[0].get_title(), "Exam prep");
}

/// Tests searching sessions by title and message text
///
/// This test verifies:
/// 1. Matches in either the title or any message count
/// 2. Matching is case-insensitive
/// 3. An empty term returns every session
#[tokio::test]
async fn test_search_chats() {
    let repo = setup_repo().await;

    let thermo = repo.create_chat().await.expect("Failed to create chat");
    repo.append_user_message(&thermo.get_id(), "Thermodynamics basics")
        .await
        .expect("Failed to append message");

    let calculus = repo.create_chat().await.expect("Failed to create chat");
    repo.append_user_message(&calculus.get_id(), "Integration by parts")
        .await
        .expect("Failed to append message");

    let hits = repo.search_chats("thermo");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].get_id(), thermo.get_id());

    let hits = repo.search_chats("INTEGRATION");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].get_id(), calculus.get_id());

    assert_eq!(repo.search_chats("").len(), 2);
    assert!(repo.search_chats("biology").is_empty());
}

/// Tests deleting sessions, including unknown ids
#[tokio::test]
async fn test_delete_chat() {
    let repo = setup_repo().await;
    let session = repo.create_chat().await.expect("Failed to create chat");

    repo.delete_chat(&session.get_id())
        .await
        .expect("Failed to delete chat");
    assert!(repo.get_chats().is_empty());

    repo.delete_chat("no-such-session")
        .await
        .expect("Deleting an unknown session should be a no-op");
}
