/// Data models module
///
/// This module defines the entity types persisted by the store. Entities
/// serialize to the JSON documents held in record payloads, using the
/// camelCase field layout of the original on-disk data, and are wrapped
/// in [`Payload`] when moving through the database layer.

// Re-export all model types
mod payload;
pub use payload::Payload;

mod subject;
pub use subject::{Subject, SubjectKind};

mod task;
pub use task::{Priority, Task, TaskStatus};

mod exam;
pub use exam::Exam;

mod note;
pub use note::{Note, NoteAttachment, NoteStatus};

mod goal;
pub use goal::{Goal, GoalStatus};

mod event;
pub use event::TimetableEvent;

mod chat;
pub use chat::{ChatMessage, ChatRole, ChatSession, SourceRef};
