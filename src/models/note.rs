use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids;

/// Reading status of a note
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoteStatus {
    #[default]
    #[serde(rename = "To Be Read")]
    ToBeRead,
    Read,
}

impl NoteStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            NoteStatus::ToBeRead => "To Be Read",
            NoteStatus::Read => "Read",
        }
    }
}

impl fmt::Display for NoteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NoteStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "To Be Read" => Ok(NoteStatus::ToBeRead),
            "Read" => Ok(NoteStatus::Read),
            other => Err(format!("unknown note status: {other}")),
        }
    }
}

/// A file attached to a note, stored inline as a data URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteAttachment {
    pub id: String,
    pub name: String,
    /// MIME type of the attachment
    #[serde(rename = "type")]
    pub mime_type: String,
    pub data_url: String,
    /// Size in bytes; 0 for attachments synthesized from legacy fields
    pub size: u64,
}

impl NoteAttachment {
    /// Creates an attachment with a fresh id
    pub fn new(name: String, mime_type: String, data_url: String, size: u64) -> Self {
        Self {
            id: ids::new_id(),
            name,
            mime_type,
            data_url,
            size,
        }
    }
}

/// Represents a note with rich-text content
///
/// Notes carry two generations of attachment storage: the current
/// `attachments` list and the legacy single-file fields (`fileDataUrl`,
/// `fileName`, `fileType`) written by older versions of the data. The
/// legacy fields are never written for new notes and are migrated on
/// read, not on write; see [`Note::display_attachments`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    /// Unique identifier (UUID v4 as string)
    id: String,

    /// Owning subject; absent for general notes
    #[serde(skip_serializing_if = "Option::is_none")]
    subject_id: Option<String>,

    /// Free-form topic label
    #[serde(skip_serializing_if = "Option::is_none")]
    topic: Option<String>,

    /// Title of the note
    title: String,

    /// Rich text body as HTML
    content: String,

    /// Set once at creation, never changed afterwards
    created_at: DateTime<Utc>,

    /// Rewritten on every update, including no-op updates
    last_modified: DateTime<Utc>,

    /// Reading status, `To Be Read` on creation
    status: NoteStatus,

    is_important: bool,

    /// Legacy single-file data URL
    #[serde(skip_serializing_if = "Option::is_none")]
    file_data_url: Option<String>,

    /// Legacy single-file name
    #[serde(skip_serializing_if = "Option::is_none")]
    file_name: Option<String>,

    /// Legacy single-file MIME type
    #[serde(skip_serializing_if = "Option::is_none")]
    file_type: Option<String>,

    /// Current attachment list
    #[serde(skip_serializing_if = "Option::is_none")]
    attachments: Option<Vec<NoteAttachment>>,

    /// Free-form tag labels
    #[serde(skip_serializing_if = "Option::is_none")]
    tags: Option<Vec<String>>,
}

impl Note {
    /// Creates a new note with a fresh id and creation defaults
    ///
    /// `createdAt` and `lastModified` are both set to now, status starts
    /// as `To Be Read`, and the note is not important. Legacy file fields
    /// are never populated for new notes.
    ///
    /// ### Arguments
    ///
    /// * `subject_id` - Owning subject, `None` for a general note
    /// * `topic` - Optional topic label
    /// * `title` - Title of the note
    /// * `content` - Rich text body as HTML
    /// * `attachments` - Optional attachment list
    /// * `tags` - Optional tag labels
    pub fn new(
        subject_id: Option<String>,
        topic: Option<String>,
        title: String,
        content: String,
        attachments: Option<Vec<NoteAttachment>>,
        tags: Option<Vec<String>>,
    ) -> Self {
        let now = ids::now();
        Self {
            id: ids::new_id(),
            subject_id,
            topic,
            title,
            content,
            created_at: now,
            last_modified: now,
            status: NoteStatus::ToBeRead,
            is_important: false,
            file_data_url: None,
            file_name: None,
            file_type: None,
            attachments,
            tags,
        }
    }

    /// Gets the note's ID
    pub fn get_id(&self) -> String {
        self.id.clone()
    }

    /// Gets the owning subject id, if any
    pub fn get_subject_id(&self) -> Option<String> {
        self.subject_id.clone()
    }

    /// Sets the owning subject id
    pub fn set_subject_id(&mut self, subject_id: Option<String>) {
        self.subject_id = subject_id;
        self.last_modified = ids::now();
    }

    /// Gets the topic label, if any
    pub fn get_topic(&self) -> Option<String> {
        self.topic.clone()
    }

    /// Sets the topic label
    pub fn set_topic(&mut self, topic: Option<String>) {
        self.topic = topic;
        self.last_modified = ids::now();
    }

    /// Gets the note's title
    pub fn get_title(&self) -> String {
        self.title.clone()
    }

    /// Sets the note's title
    pub fn set_title(&mut self, title: String) {
        self.title = title;
        self.last_modified = ids::now();
    }

    /// Gets the note's HTML content
    pub fn get_content(&self) -> String {
        self.content.clone()
    }

    /// Sets the note's HTML content
    pub fn set_content(&mut self, content: String) {
        self.content = content;
        self.last_modified = ids::now();
    }

    /// Gets the creation timestamp
    pub fn get_created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Gets the last-modified timestamp
    pub fn get_last_modified(&self) -> DateTime<Utc> {
        self.last_modified
    }

    /// Rewrites `lastModified` to now
    ///
    /// Called on every update regardless of what the caller supplied, so
    /// the stamp reflects when the record was persisted.
    pub fn touch(&mut self) {
        self.last_modified = ids::now();
    }

    /// Gets the reading status
    pub fn get_status(&self) -> NoteStatus {
        self.status
    }

    /// Sets the reading status
    pub fn set_status(&mut self, status: NoteStatus) {
        self.status = status;
        self.last_modified = ids::now();
    }

    /// Gets whether the note is marked important
    pub fn get_is_important(&self) -> bool {
        self.is_important
    }

    /// Sets whether the note is marked important
    pub fn set_is_important(&mut self, is_important: bool) {
        self.is_important = is_important;
        self.last_modified = ids::now();
    }

    /// Gets the raw attachment list, if any
    pub fn get_attachments(&self) -> Option<Vec<NoteAttachment>> {
        self.attachments.clone()
    }

    /// Sets the attachment list
    pub fn set_attachments(&mut self, attachments: Option<Vec<NoteAttachment>>) {
        self.attachments = attachments;
        self.last_modified = ids::now();
    }

    /// Gets the tag labels, if any
    pub fn get_tags(&self) -> Option<Vec<String>> {
        self.tags.clone()
    }

    /// Sets the tag labels
    pub fn set_tags(&mut self, tags: Option<Vec<String>>) {
        self.tags = tags;
        self.last_modified = ids::now();
    }

    /// Gets the legacy single-file data URL, if any
    pub fn get_file_data_url(&self) -> Option<String> {
        self.file_data_url.clone()
    }

    /// Resolves the attachments to display (migration on read)
    ///
    /// The `attachments` list wins when it is non-empty. Otherwise a
    /// legacy data URL, if present, is surfaced as a single synthesized
    /// attachment with fallback name and MIME type and size 0.
    pub fn display_attachments(&self) -> Vec<NoteAttachment> {
        if let Some(attachments) = &self.attachments
            && !attachments.is_empty()
        {
            return attachments.clone();
        }
        if let Some(data_url) = &self.file_data_url {
            return vec![NoteAttachment {
                id: "legacy".to_string(),
                name: self
                    .file_name
                    .clone()
                    .unwrap_or_else(|| "Attached File".to_string()),
                mime_type: self
                    .file_type
                    .clone()
                    .unwrap_or_else(|| "application/octet-stream".to_string()),
                data_url: data_url.clone(),
                size: 0,
            }];
        }
        Vec::new()
    }
}
