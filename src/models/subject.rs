use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ids;

/// Whether a subject (or an exam) covers theory or practical work
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubjectKind {
    #[default]
    Theory,
    Practical,
}

impl SubjectKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubjectKind::Theory => "Theory",
            SubjectKind::Practical => "Practical",
        }
    }
}

impl fmt::Display for SubjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubjectKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Theory" => Ok(SubjectKind::Theory),
            "Practical" => Ok(SubjectKind::Practical),
            other => Err(format!("unknown subject kind: {other}")),
        }
    }
}

/// Represents a subject (course) being studied
///
/// Subjects are the anchor entity of the planner: tasks, exams, notes,
/// and timetable events may all reference one by id, and deleting a
/// subject cascades to the first three.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    /// Unique identifier (UUID v4 as string)
    id: String,

    /// Display title of the subject
    title: String,

    /// Theory or practical component
    #[serde(rename = "type")]
    kind: SubjectKind,

    /// Name of the instructor, if recorded
    #[serde(skip_serializing_if = "Option::is_none")]
    instructor: Option<String>,

    /// Semester label, if recorded
    #[serde(skip_serializing_if = "Option::is_none")]
    semester: Option<String>,

    /// Completion percentage, 0 to 100
    progress: u8,

    /// Display color as a hex string
    color: String,
}

impl Subject {
    /// Creates a new subject with a fresh id and zero progress
    ///
    /// ### Arguments
    ///
    /// * `title` - Display title of the subject
    /// * `kind` - Theory or practical
    /// * `instructor` - Optional instructor name
    /// * `semester` - Optional semester label
    /// * `color` - Display color as a hex string
    ///
    /// ### Returns
    ///
    /// A new `Subject` with `progress` set to 0
    pub fn new(
        title: String,
        kind: SubjectKind,
        instructor: Option<String>,
        semester: Option<String>,
        color: String,
    ) -> Self {
        Self {
            id: ids::new_id(),
            title,
            kind,
            instructor,
            semester,
            progress: 0,
            color,
        }
    }

    /// Gets the subject's ID
    pub fn get_id(&self) -> String {
        self.id.clone()
    }

    /// Gets the subject's title
    pub fn get_title(&self) -> String {
        self.title.clone()
    }

    /// Sets the subject's title
    pub fn set_title(&mut self, title: String) {
        self.title = title;
    }

    /// Gets the subject's kind
    pub fn get_kind(&self) -> SubjectKind {
        self.kind
    }

    /// Sets the subject's kind
    pub fn set_kind(&mut self, kind: SubjectKind) {
        self.kind = kind;
    }

    /// Gets the instructor name, if any
    pub fn get_instructor(&self) -> Option<String> {
        self.instructor.clone()
    }

    /// Sets the instructor name
    pub fn set_instructor(&mut self, instructor: Option<String>) {
        self.instructor = instructor;
    }

    /// Gets the semester label, if any
    pub fn get_semester(&self) -> Option<String> {
        self.semester.clone()
    }

    /// Sets the semester label
    pub fn set_semester(&mut self, semester: Option<String>) {
        self.semester = semester;
    }

    /// Gets the completion percentage
    pub fn get_progress(&self) -> u8 {
        self.progress
    }

    /// Sets the completion percentage
    pub fn set_progress(&mut self, progress: u8) {
        self.progress = progress;
    }

    /// Gets the display color
    pub fn get_color(&self) -> String {
        self.color.clone()
    }

    /// Sets the display color
    pub fn set_color(&mut self, color: String) {
        self.color = color;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_subject_new_defaults_progress_to_zero() {
        let subject = Subject::new(
            "Physics".to_string(),
            SubjectKind::Theory,
            None,
            None,
            "#1C1C1C".to_string(),
        );

        assert_eq!(subject.get_progress(), 0);
        assert_eq!(subject.get_title(), "Physics");
        assert!(Uuid::parse_str(&subject.get_id()).is_ok());
    }

    #[test]
    fn test_subject_serde_layout() {
        let subject = Subject::new(
            "Circuits".to_string(),
            SubjectKind::Practical,
            Some("Dr. Rao".to_string()),
            None,
            "#AA0000".to_string(),
        );

        let value = serde_json::to_value(&subject).unwrap();
        assert_eq!(value["type"], "Practical");
        assert_eq!(value["instructor"], "Dr. Rao");
        assert_eq!(value["progress"], 0);
        // Absent optionals are omitted, matching the original payloads.
        assert!(value.get("semester").is_none());
    }

    #[test]
    fn test_subject_kind_round_trip() {
        assert_eq!("Theory".parse::<SubjectKind>().unwrap(), SubjectKind::Theory);
        assert_eq!(
            "Practical".parse::<SubjectKind>().unwrap(),
            SubjectKind::Practical
        );
        assert!("Seminar".parse::<SubjectKind>().is_err());
        assert_eq!(SubjectKind::Theory.to_string(), "Theory");
    }
}
