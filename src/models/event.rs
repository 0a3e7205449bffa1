use serde::{Deserialize, Serialize};

use crate::ids;

/// Represents a timetable event
///
/// Events describe schedule shape rather than subject-owned content:
/// deleting a subject leaves its events in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimetableEvent {
    id: String,

    /// Linked subject, absent for custom events
    #[serde(skip_serializing_if = "Option::is_none")]
    subject_id: Option<String>,

    title: String,

    /// Event date as a `YYYY-MM-DD` string
    date: String,

    /// Start of the slot as an `HH:MM` string
    start_time: String,

    /// End of the slot as an `HH:MM` string
    end_time: String,

    /// Display color as a hex string
    color: String,
}

impl TimetableEvent {
    /// Creates a new event with a fresh id
    pub fn new(
        subject_id: Option<String>,
        title: String,
        date: String,
        start_time: String,
        end_time: String,
        color: String,
    ) -> Self {
        Self {
            id: ids::new_id(),
            subject_id,
            title,
            date,
            start_time,
            end_time,
            color,
        }
    }

    pub fn get_id(&self) -> String {
        self.id.clone()
    }

    pub fn get_subject_id(&self) -> Option<String> {
        self.subject_id.clone()
    }

    pub fn set_subject_id(&mut self, subject_id: Option<String>) {
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

    pub fn get_start_time(&self) -> String {
        self.start_time.clone()
    }

    pub fn set_start_time(&mut self, start_time: String) {
        self.start_time = start_time;
    }

    pub fn get_end_time(&self) -> String {
        self.end_time.clone()
    }

    pub fn set_end_time(&mut self, end_time: String) {
        self.end_time = end_time;
    }

    pub fn get_color(&self) -> String {
        self.color.clone()
    }

    pub fn set_color(&mut self, color: String) {
        self.color = color;
    }
}
