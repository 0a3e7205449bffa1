/// Common test utilities for satchel integration tests
///
/// This file contains shared functions for all integration tests: opening
/// a repository over a fresh in-memory store, and seeding common planner
/// records through the public API.

use std::sync::Arc;

use satchel::dto::{
    CreateEventDto, CreateExamDto, CreateGoalDto, CreateNoteDto, CreateSubjectDto, CreateTaskDto,
};
use satchel::models::{
    Exam, Goal, GoalStatus, Note, Priority, Subject, SubjectKind, Task, TaskStatus, TimetableEvent,
};
use satchel::repo::Repository;
use satchel::store::LocalStore;

/// Installs a log subscriber for the current test binary
///
/// Honors `RUST_LOG`; repeated calls after the first are no-ops.
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Opens a repository over a fresh in-memory store
///
/// Every call gets a private database, so tests never see each other's
/// data and no cleanup is needed afterwards.
pub async fn setup_repo() -> Repository {
    init_test_logging();
    let store = Arc::new(LocalStore::in_memory());
    Repository::open(store)
        .await
        .expect("Failed to open repository")
}

/// Opens a repository and also hands back its store
///
/// For tests that need to seed or inspect raw payloads underneath the
/// repository.
pub async fn setup_repo_with_store() -> (Arc<LocalStore>, Repository) {
    init_test_logging();
    let store = Arc::new(LocalStore::in_memory());
    let repo = Repository::open(store.clone())
        .await
        .expect("Failed to open repository");
    (store, repo)
}

/// Creates a subject with typical fields
pub async fn seed_subject(repo: &Repository, title: &str) -> Subject {
    repo.add_subject(CreateSubjectDto {
        title: title.to_string(),
        kind: SubjectKind::Theory,
        instructor: Some("Dr. Patel".to_string()),
        semester: Some("Fall 2026".to_string()),
        color: "#6D28D9".to_string(),
    })
    .await
    .expect("Failed to create subject")
}

/// Creates a task, optionally attached to a subject
pub async fn seed_task(repo: &Repository, subject_id: Option<&str>, title: &str) -> Task {
    repo.add_task(CreateTaskDto {
        subject_id: subject_id.map(str::to_string),
        title: title.to_string(),
        deadline: "2026-09-01".to_string(),
        priority: Priority::Medium,
        status: TaskStatus::Pending,
    })
    .await
    .expect("Failed to create task")
}

/// Creates an exam attached to a subject
pub async fn seed_exam(repo: &Repository, subject_id: &str, title: &str) -> Exam {
    repo.add_exam(CreateExamDto {
        subject_id: subject_id.to_string(),
        title: title.to_string(),
        date: "2026-10-15".to_string(),
        kind: SubjectKind::Theory,
    })
    .await
    .expect("Failed to create exam")
}

/// Creates a note, optionally attached to a subject
pub async fn seed_note(repo: &Repository, subject_id: Option<&str>, title: &str) -> Note {
    repo.add_note(CreateNoteDto {
        subject_id: subject_id.map(str::to_string),
        topic: None,
        title: title.to_string(),
        content: "Work-energy theorem and conservative forces.".to_string(),
        attachments: None,
        tags: None,
    })
    .await
    .expect("Failed to create note")
}

/// Creates a goal with typical fields
pub async fn seed_goal(repo: &Repository, title: &str) -> Goal {
    repo.add_goal(CreateGoalDto {
        title: title.to_string(),
        description: "Average above 85%".to_string(),
        target_date: "2026-12-15".to_string(),
        status: GoalStatus::NotStarted,
    })
    .await
    .expect("Failed to create goal")
}

/// Creates a timetable event, optionally attached to a subject
pub async fn seed_event(repo: &Repository, subject_id: Option<&str>, title: &str) -> TimetableEvent {
    repo.add_event(CreateEventDto {
        subject_id: subject_id.map(str::to_string),
        title: title.to_string(),
        date: "2026-08-24".to_string(),
        start_time: "09:00".to_string(),
        end_time: "10:30".to_string(),
        color: "#6D28D9".to_string(),
    })
    .await
    .expect("Failed to create event")
}
