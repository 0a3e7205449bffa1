use std::fmt;

use futures::{Stream, StreamExt};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use crate::errors::{Error, Result};
use crate::models::{ChatMessage, ChatRole, ChatSession, SourceRef};
use crate::store::Collection;

use super::{Repository, encode, load_collection};

/// Text stored in place of a reply when the model stream fails
const REPLY_ERROR_TEXT: &str = "Sorry, something went wrong or the connection was interrupted.";

/// One chunk of a streamed model reply
///
/// `text` is appended to the reply as it arrives; an empty string carries
/// no text. A non-empty `sources` list replaces the pending source set,
/// and the set current at the end of the stream is attached to the final
/// message.
#[derive(Debug, Clone, Default)]
pub struct ReplyChunk {
    pub text: String,
    pub sources: Vec<SourceRef>,
}

/// Sorts sessions most recently updated first
///
/// The sort is stable, so sessions sharing a timestamp keep their
/// relative order.
pub(super) fn sort_sessions(sessions: &mut [ChatSession]) {
    sessions.sort_by(|a, b| b.get_updated_at().cmp(&a.get_updated_at()));
}

impl Repository {
    /// Returns a snapshot of all chat sessions, most recently updated first
    pub fn get_chats(&self) -> Vec<ChatSession> {
        self.chats.read().expect("cache lock poisoned").clone()
    }

    /// Creates a new, empty chat session with the default title
    ///
    /// ### Returns
    ///
    /// The newly created session
    ///
    /// ### Errors
    ///
    /// Returns an error if the store rejects the write.
    #[instrument(skip(self))]
    pub async fn create_chat(&self) -> Result<ChatSession> {
        debug!("Creating new chat session");

        let session = ChatSession::new();
        let payload = encode(&session)?;
        self.store
            .add(Collection::Chats, &session.get_id(), payload)
            .await?;
        self.refresh_chats().await?;

        info!("Successfully created chat with id: {}", session.get_id());
        Ok(session)
    }

    /// Persists a session, stamping its update time
    ///
    /// Every save moves `updated_at` to now, which is also what keeps the
    /// session list ordered by recency. Saving a session whose id is not
    /// present stores it as a new record.
    ///
    /// ### Returns
    ///
    /// The session as stored, with its refreshed update time
    #[instrument(skip(self, session), fields(session_id = %session.get_id()))]
    pub async fn save_chat(&self, mut session: ChatSession) -> Result<ChatSession> {
        session.touch();
        let payload = encode(&session)?;
        self.store
            .put(Collection::Chats, &session.get_id(), payload)
            .await?;
        self.refresh_chats().await?;
        Ok(session)
    }

    /// Deletes a chat session by id; deleting an unknown id is a no-op
    #[instrument(skip(self), fields(session_id = %id))]
    pub async fn delete_chat(&self, id: &str) -> Result<()> {
        self.store.remove(Collection::Chats, id).await?;
        self.refresh_chats().await
    }

    /// Returns the session the chat surface should open with
    ///
    /// Reuses the most recently updated session when it has no messages
    /// yet; otherwise creates a fresh one. Only the most recent session is
    /// considered, so an older empty session is never resurrected.
    pub async fn open_chat(&self) -> Result<ChatSession> {
        let latest = self
            .chats
            .read()
            .expect("cache lock poisoned")
            .first()
            .cloned();

        match latest {
            Some(session) if session.is_empty() => {
                debug!(session_id = %session.get_id(), "Reusing empty chat session");
                Ok(session)
            }
            _ => self.create_chat().await,
        }
    }

    /// Rewinds a session to just before one of its messages
    ///
    /// The identified message and everything after it are dropped and the
    /// truncated session is saved. The removed message's text is returned
    /// so the host can offer it for re-editing.
    ///
    /// ### Errors
    ///
    /// Returns `Error::NotFound` when the session or the message does not
    /// exist.
    #[instrument(skip(self), fields(session_id = %session_id, message_id = %message_id))]
    pub async fn rewind_chat(&self, session_id: &str, message_id: &str) -> Result<String> {
        let mut session = self.find_chat(session_id)?;
        let removed = session
            .truncate_before(message_id)
            .ok_or_else(|| Error::not_found("chat message", message_id))?;

        self.save_chat(session).await?;

        debug!("Rewound chat session");
        Ok(removed.get_text())
    }

    /// Appends a user message to a session
    ///
    /// The text is trimmed first; whitespace-only input is ignored and the
    /// session is returned unchanged. The first message of a session also
    /// titles it, using a short preview of the text.
    ///
    /// ### Errors
    ///
    /// Returns `Error::NotFound` when the session does not exist.
    #[instrument(skip(self, text), fields(session_id = %session_id))]
    pub async fn append_user_message(&self, session_id: &str, text: &str) -> Result<ChatSession> {
        let mut session = self.find_chat(session_id)?;

        let trimmed = text.trim();
        if trimmed.is_empty() {
            debug!("Ignoring whitespace-only message");
            return Ok(session);
        }

        if session.is_empty() {
            session.set_title(ChatSession::preview_title(trimmed));
        }
        session.push_message(ChatMessage::new(ChatRole::User, trimmed.to_string()));

        self.save_chat(session).await
    }

    /// Streams a model reply into a session, persisting as it arrives
    ///
    /// An empty placeholder model message is stored first, then updated
    /// and re-saved for every chunk that carries text, so an interrupted
    /// reply survives up to its last persisted chunk. When the stream ends
    /// normally the placeholder is replaced by a final message carrying
    /// the same id, a fresh timestamp, and the grounding sources current
    /// at the end of the stream.
    ///
    /// A stream error replaces the partial reply with a short apology
    /// message under a new id; the error itself is logged, not returned.
    /// Cancelling the token stops consumption immediately and leaves the
    /// last persisted state standing.
    ///
    /// ### Arguments
    ///
    /// * `session_id` - The session receiving the reply
    /// * `reply` - The chunk stream produced by the model client
    /// * `cancel` - Token the host triggers to stop the reply
    ///
    /// ### Returns
    ///
    /// The session as last persisted
    ///
    /// ### Errors
    ///
    /// Returns `Error::NotFound` when the session does not exist, or a
    /// storage error if persisting a chunk fails.
    #[instrument(skip(self, reply, cancel), fields(session_id = %session_id))]
    pub async fn stream_model_reply<S, E>(
        &self,
        session_id: &str,
        mut reply: S,
        cancel: CancellationToken,
    ) -> Result<ChatSession>
    where
        S: Stream<Item = Result<ReplyChunk, E>> + Unpin,
        E: fmt::Display,
    {
        let mut session = self.find_chat(session_id)?;

        let placeholder = ChatMessage::new(ChatRole::Model, String::new());
        let placeholder_id = placeholder.get_id();
        session.push_message(placeholder);
        session = self.save_chat(session).await?;

        let mut text = String::new();
        let mut sources: Vec<SourceRef> = Vec::new();

        loop {
            let next = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    debug!(chars = text.len(), "Model reply cancelled");
                    return Ok(session);
                }
                chunk = reply.next() => chunk,
            };

            match next {
                None => break,
                Some(Ok(chunk)) => {
                    if !chunk.sources.is_empty() {
                        sources = chunk.sources;
                    }
                    if !chunk.text.is_empty() {
                        text.push_str(&chunk.text);
                        session.set_message_text(&placeholder_id, text.clone());
                        session = self.save_chat(session).await?;
                    }
                }
                Some(Err(err)) => {
                    warn!(error = %err, "Model reply stream failed");
                    let apology = ChatMessage::new(ChatRole::Model, REPLY_ERROR_TEXT.to_string());
                    session.replace_message(&placeholder_id, apology);
                    return self.save_chat(session).await;
                }
            }
        }

        // Natural end: the final message keeps the placeholder's id but
        // gets a fresh timestamp and the collected sources
        let final_sources = (!sources.is_empty()).then_some(sources);
        let final_message = ChatMessage::new_with_fields(
            placeholder_id.clone(),
            ChatRole::Model,
            text,
            crate::ids::now(),
            final_sources,
        );
        session.replace_message(&placeholder_id, final_message);
        session = self.save_chat(session).await?;

        info!(
            messages = session.message_count(),
            "Model reply complete"
        );
        Ok(session)
    }

    /// Renames a chat session
    ///
    /// ### Errors
    ///
    /// Returns `Error::NotFound` when the session does not exist.
    #[instrument(skip(self, title), fields(session_id = %session_id))]
    pub async fn rename_chat(&self, session_id: &str, title: String) -> Result<ChatSession> {
        let mut session = self.find_chat(session_id)?;
        session.set_title(title);
        self.save_chat(session).await
    }

    /// Returns the sessions matching a search term
    ///
    /// A session matches when its title or any of its messages contains
    /// the term, case-insensitively. An empty term matches everything.
    pub fn search_chats(&self, term: &str) -> Vec<ChatSession> {
        let sessions = self.chats.read().expect("cache lock poisoned").clone();
        if term.is_empty() {
            return sessions;
        }

        let query = term.to_lowercase();
        sessions
            .into_iter()
            .filter(|session| {
                session.get_title().to_lowercase().contains(&query)
                    || session
                        .get_messages()
                        .iter()
                        .any(|message| message.get_text().to_lowercase().contains(&query))
            })
            .collect()
    }

    fn find_chat(&self, session_id: &str) -> Result<ChatSession> {
        self.chats
            .read()
            .expect("cache lock poisoned")
            .iter()
            .find(|session| session.get_id() == session_id)
            .cloned()
            .ok_or_else(|| Error::not_found("chat session", session_id))
    }

    pub(crate) async fn refresh_chats(&self) -> Result<()> {
        let mut fresh = load_collection::<ChatSession>(&self.store, Collection::Chats).await?;
        sort_sessions(&mut fresh);
        *self.chats.write().expect("cache lock poisoned") = fresh;
        Ok(())
    }
}


#[cfg(test)]
mod prop_tests;
