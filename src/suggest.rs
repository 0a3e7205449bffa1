use chrono::{Datelike, Days};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::dto::{CreateEventDto, CreateExamDto, CreateGoalDto, CreateSubjectDto, CreateTaskDto};
use crate::errors::Result;
use crate::ids;
use crate::models::{
    Exam, Goal, GoalStatus, Priority, Subject, SubjectKind, Task, TaskStatus, TimetableEvent,
};
use crate::repo::Repository;

/// A plain serializable view of the planner handed to the AI collaborator
///
/// Carries the whole working set except notes and chats, in the same
/// field layout the entities persist with, so the host can embed it in a
/// prompt without any further mapping.
#[derive(Debug, Clone, Serialize)]
pub struct PlannerSnapshot {
    pub subjects: Vec<Subject>,
    pub tasks: Vec<Task>,
    pub exams: Vec<Exam>,
    pub goals: Vec<Goal>,
    pub events: Vec<TimetableEvent>,
}

/// A subject proposed by the AI collaborator
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestedSubject {
    pub title: String,
    #[serde(rename = "type")]
    pub kind: SubjectKind,
    #[serde(default)]
    pub semester: Option<String>,
}

/// A task proposed by the AI collaborator
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestedTask {
    pub title: String,
    pub priority: Priority,
}

/// An exam proposed by the AI collaborator
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestedExam {
    pub title: String,
    #[serde(rename = "type")]
    pub kind: SubjectKind,
}

/// A weekly timetable slot proposed by the AI collaborator
///
/// `day_of_week` counts from Sunday as 0 through Saturday as 6.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestedEvent {
    pub title: String,
    pub day_of_week: u8,
    pub start_time: String,
    pub end_time: String,
}

/// A goal proposed by the AI collaborator
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestedGoal {
    pub title: String,
    pub description: String,
    pub target_date: String,
}

impl Repository {
    /// Captures the current planner state as one serializable value
    pub fn snapshot(&self) -> PlannerSnapshot {
        PlannerSnapshot {
            subjects: self.get_subjects(),
            tasks: self.get_tasks(),
            exams: self.get_exams(),
            goals: self.get_goals(),
            events: self.get_events(),
        }
    }

    /// Adds AI-suggested subjects
    ///
    /// Each suggestion becomes a subject with color `#1C1C1C` and no
    /// instructor; the user refines both later. Returns the number of
    /// subjects added.
    #[instrument(skip(self, suggestions), fields(count = suggestions.len()))]
    pub async fn apply_suggested_subjects(
        &self,
        suggestions: Vec<SuggestedSubject>,
    ) -> Result<usize> {
        let count = suggestions.len();
        for suggestion in suggestions {
            self.add_subject(CreateSubjectDto {
                title: suggestion.title,
                kind: suggestion.kind,
                instructor: None,
                semester: suggestion.semester,
                color: "#1C1C1C".to_string(),
            })
            .await?;
        }

        info!(count, "Applied suggested subjects");
        Ok(count)
    }

    /// Adds AI-suggested tasks
    ///
    /// Each suggestion becomes a general Pending task due today; the
    /// user reschedules later. Returns the number of tasks added.
    #[instrument(skip(self, suggestions), fields(count = suggestions.len()))]
    pub async fn apply_suggested_tasks(&self, suggestions: Vec<SuggestedTask>) -> Result<usize> {
        let count = suggestions.len();
        for suggestion in suggestions {
            self.add_task(CreateTaskDto {
                subject_id: None,
                title: suggestion.title,
                deadline: ids::today_string(),
                priority: suggestion.priority,
                status: TaskStatus::Pending,
            })
            .await?;
        }

        info!(count, "Applied suggested tasks");
        Ok(count)
    }

    /// Adds AI-suggested exams
    ///
    /// Each suggestion becomes an exam dated today, attached to the
    /// first known subject or to no subject at all when none exist yet.
    /// Returns the number of exams added.
    #[instrument(skip(self, suggestions), fields(count = suggestions.len()))]
    pub async fn apply_suggested_exams(&self, suggestions: Vec<SuggestedExam>) -> Result<usize> {
        let subject_id = self
            .get_subjects()
            .first()
            .map(Subject::get_id)
            .unwrap_or_default();

        let count = suggestions.len();
        for suggestion in suggestions {
            self.add_exam(CreateExamDto {
                subject_id: subject_id.clone(),
                title: suggestion.title,
                date: ids::today_string(),
                kind: suggestion.kind,
            })
            .await?;
        }

        info!(count, "Applied suggested exams");
        Ok(count)
    }

    /// Adds AI-suggested timetable events
    ///
    /// Each suggestion lands on the current week, Sunday-based, at its
    /// weekday and time slot, with color `#4B5563` and no subject. A
    /// day outside 0 to 6 wraps. Returns the number of events added.
    #[instrument(skip(self, suggestions), fields(count = suggestions.len()))]
    pub async fn apply_suggested_events(&self, suggestions: Vec<SuggestedEvent>) -> Result<usize> {
        let today = ids::now().date_naive();
        let week_start = today - Days::new(u64::from(today.weekday().num_days_from_sunday()));

        let count = suggestions.len();
        for suggestion in suggestions {
            let date = week_start + Days::new(u64::from(suggestion.day_of_week % 7));
            self.add_event(CreateEventDto {
                subject_id: None,
                title: suggestion.title,
                date: ids::date_string(date),
                start_time: suggestion.start_time,
                end_time: suggestion.end_time,
                color: "#4B5563".to_string(),
            })
            .await?;
        }

        info!(count, "Applied suggested events");
        Ok(count)
    }

    /// Adds AI-suggested goals
    ///
    /// Each suggestion becomes a Not Started goal with its proposed
    /// target date. Returns the number of goals added.
    #[instrument(skip(self, suggestions), fields(count = suggestions.len()))]
    pub async fn apply_suggested_goals(&self, suggestions: Vec<SuggestedGoal>) -> Result<usize> {
        let count = suggestions.len();
        for suggestion in suggestions {
            self.add_goal(CreateGoalDto {
                title: suggestion.title,
                description: suggestion.description,
                target_date: suggestion.target_date,
                status: GoalStatus::NotStarted,
            })
            .await?;
        }

        info!(count, "Applied suggested goals");
        Ok(count)
    }
}
