use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids;

/// Who authored a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Model,
}

impl fmt::Display for ChatRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatRole::User => f.write_str("user"),
            ChatRole::Model => f.write_str("model"),
        }
    }
}

/// A web source cited by a model reply
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRef {
    pub title: String,
    pub uri: String,
}

/// A single message within a chat session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Unique identifier (UUID v4 as string)
    id: String,

    role: ChatRole,

    text: String,

    timestamp: DateTime<Utc>,

    /// Web sources backing a model reply, if any were reported
    #[serde(skip_serializing_if = "Option::is_none")]
    sources: Option<Vec<SourceRef>>,
}

impl ChatMessage {
    /// Creates a message with a fresh id and the current timestamp
    pub fn new(role: ChatRole, text: String) -> Self {
        Self {
            id: ids::new_id(),
            role,
            text,
            timestamp: ids::now(),
            sources: None,
        }
    }

    /// Creates a message with all fields specified
    ///
    /// Used when a streamed placeholder is rewritten in place: the final
    /// message keeps the placeholder's id but carries a fresh timestamp.
    pub fn new_with_fields(
        id: String,
        role: ChatRole,
        text: String,
        timestamp: DateTime<Utc>,
        sources: Option<Vec<SourceRef>>,
    ) -> Self {
        Self {
            id,
            role,
            text,
            timestamp,
            sources,
        }
    }

    pub fn get_id(&self) -> String {
        self.id.clone()
    }

    pub fn get_role(&self) -> ChatRole {
        self.role
    }

    pub fn get_text(&self) -> String {
        self.text.clone()
    }

    pub fn get_timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn get_sources(&self) -> Option<Vec<SourceRef>> {
        self.sources.clone()
    }
}

/// Represents one conversation with the assistant
///
/// Sessions are listed sorted by `updatedAt` descending; saving a session
/// restamps `updatedAt`, which moves it to the front of that ordering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatSession {
    /// Unique identifier (UUID v4 as string)
    id: String,

    title: String,

    created_at: DateTime<Utc>,

    updated_at: DateTime<Utc>,

    /// Ordered message list; append-only except for rewind truncation
    messages: Vec<ChatMessage>,
}

impl ChatSession {
    /// Title given to sessions before their first message
    pub const DEFAULT_TITLE: &'static str = "New Chat";

    /// Number of characters kept when a title is derived from a message
    const TITLE_PREVIEW_CHARS: usize = 30;

    /// Creates an empty session titled "New Chat"
    pub fn new() -> Self {
        let now = ids::now();
        Self {
            id: ids::new_id(),
            title: Self::DEFAULT_TITLE.to_string(),
            created_at: now,
            updated_at: now,
            messages: Vec::new(),
        }
    }

    /// Derives a session title from the first message's text
    ///
    /// Keeps the first 30 characters and appends `...` when the text is
    /// longer than that.
    pub fn preview_title(text: &str) -> String {
        let mut title: String = text.chars().take(Self::TITLE_PREVIEW_CHARS).collect();
        if text.chars().count() > Self::TITLE_PREVIEW_CHARS {
            title.push_str("...");
        }
        title
    }

    pub fn get_id(&self) -> String {
        self.id.clone()
    }

    pub fn get_title(&self) -> String {
        self.title.clone()
    }

    pub fn set_title(&mut self, title: String) {
        self.title = title;
    }

    pub fn get_created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn get_updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Restamps `updatedAt` to now; every save does this unconditionally
    pub fn touch(&mut self) {
        self.updated_at = ids::now();
    }

    /// True when the session has no messages and may be reused
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    pub fn get_messages(&self) -> Vec<ChatMessage> {
        self.messages.clone()
    }

    /// Replaces the whole message list
    pub fn set_messages(&mut self, messages: Vec<ChatMessage>) {
        self.messages = messages;
    }

    /// Appends a message to the end of the conversation
    pub fn push_message(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    /// Rewrites the text of the message with the given id
    ///
    /// Returns false when no message has that id.
    pub fn set_message_text(&mut self, message_id: &str, text: String) -> bool {
        match self.messages.iter_mut().find(|m| m.id == message_id) {
            Some(message) => {
                message.text = text;
                true
            }
            None => false,
        }
    }

    /// Replaces the message with the given id wholesale
    ///
    /// Returns false when no message has that id.
    pub fn replace_message(&mut self, message_id: &str, replacement: ChatMessage) -> bool {
        match self.messages.iter_mut().find(|m| m.id == message_id) {
            Some(message) => {
                *message = replacement;
                true
            }
            None => false,
        }
    }

    /// Truncates the conversation to everything strictly before a message
    ///
    /// This is the destructive rewind used when a sent message is edited:
    /// the named message and everything after it are discarded. Returns
    /// the removed message so its text can be offered for re-submission,
    /// or `None` when the id is unknown.
    pub fn truncate_before(&mut self, message_id: &str) -> Option<ChatMessage> {
        let index = self.messages.iter().position(|m| m.id == message_id)?;
        let removed = self.messages[index].clone();
        self.messages.truncate(index);
        Some(removed)
    }
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}
