use serde::{Deserialize, Serialize};

use super::SubjectKind;
use crate::ids;

/// Represents a scheduled exam
///
/// The subject id is always present in the payload; it may be the empty
/// string when an exam was created before any subject existed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exam {
    id: String,

    subject_id: String,

    title: String,

    /// Exam date as a `YYYY-MM-DD` string
    date: String,

    /// Theory or practical, same distinction as subjects
    #[serde(rename = "type")]
    kind: SubjectKind,
}

impl Exam {
    /// Creates a new exam with a fresh id
    pub fn new(subject_id: String, title: String, date: String, kind: SubjectKind) -> Self {
        Self {
            id: ids::new_id(),
            subject_id,
            title,
            date,
            kind,
        }
    }

    pub fn get_id(&self) -> String {
        self.id.clone()
    }

    pub fn get_subject_id(&self) -> String {
        self.subject_id.clone()
    }

    pub fn set_subject_id(&mut self, subject_id: String) {
        self.subject_id = subject_id;
    }

    pub fn get_title(&self) -> String {
        self.title.clone()
    }

    pub fn set_title(&mut self, title: String) {
        self.title = title;
    }

    pub fn get_date(&self) -> String {
        self.date.clone()
    }

    pub fn set_date(&mut self, date: String) {
        self.date = date;
    }

    pub fn get_kind(&self) -> SubjectKind {
        self.kind
    }

    pub fn set_kind(&mut self, kind: SubjectKind) {
        self.kind = kind;
    }
}
