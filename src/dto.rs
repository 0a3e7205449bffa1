use serde::Deserialize;

use crate::models::{GoalStatus, NoteAttachment, Priority, SubjectKind, TaskStatus};

/// Data transfer object for creating a new subject
///
/// This struct is used to deserialize creation requests arriving from the
/// host application. Ids, timestamps, and initial progress are assigned by
/// the repository.
#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CreateSubjectDto {
    /// The subject's display title
    pub title: String,

    /// Whether the subject is a theory or practical course
    #[serde(rename = "type")]
    pub kind: SubjectKind,

    /// The instructor's name, if known
    #[serde(default)]
    pub instructor: Option<String>,

    /// The semester label, if known
    #[serde(default)]
    pub semester: Option<String>,

    /// The accent colour used when rendering the subject
    pub color: String,
}

/// Data transfer object for creating a new task
#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskDto {
    /// The id of the subject this task belongs to, if any
    #[serde(default)]
    pub subject_id: Option<String>,

    /// The task's title
    pub title: String,

    /// The due date, as an ISO `YYYY-MM-DD` string
    pub deadline: String,

    /// The task's priority
    pub priority: Priority,

    /// The task's completion status
    pub status: TaskStatus,
}

/// Data transfer object for creating a new exam
#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CreateExamDto {
    /// The id of the subject being examined
    pub subject_id: String,

    /// The exam's title
    pub title: String,

    /// The exam date, as an ISO `YYYY-MM-DD` string
    pub date: String,

    /// Whether this is a theory or practical exam
    #[serde(rename = "type")]
    pub kind: SubjectKind,
}

/// Data transfer object for creating a new note
///
/// Creation and modification timestamps, the initial read status, and the
/// importance flag are assigned by the repository.
#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CreateNoteDto {
    /// The id of the subject the note files under, if any
    #[serde(default)]
    pub subject_id: Option<String>,

    /// A free-form topic label, if any
    #[serde(default)]
    pub topic: Option<String>,

    /// The note's title
    pub title: String,

    /// The note body
    pub content: String,

    /// Files attached to the note
    #[serde(default)]
    pub attachments: Option<Vec<NoteAttachment>>,

    /// Tags applied to the note
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

/// Data transfer object for creating a new goal
#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CreateGoalDto {
    /// The goal's title
    pub title: String,

    /// A longer description of the goal
    pub description: String,

    /// The target completion date, as an ISO `YYYY-MM-DD` string
    pub target_date: String,

    /// The goal's progress status
    pub status: GoalStatus,
}

/// Data transfer object for creating a new timetable event
#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventDto {
    /// The id of the subject the event belongs to, if any
    #[serde(default)]
    pub subject_id: Option<String>,

    /// The event's title
    pub title: String,

    /// The event date, as an ISO `YYYY-MM-DD` string
    pub date: String,

    /// The start time, as `HH:MM`
    pub start_time: String,

    /// The end time, as `HH:MM`
    pub end_time: String,

    /// The accent colour used when rendering the event
    pub color: String,
}
