use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ids;

/// Priority level of a task
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Low" => Ok(Priority::Low),
            "Medium" => Ok(Priority::Medium),
            "High" => Ok(Priority::High),
            other => Err(format!("unknown priority: {other}")),
        }
    }
}

/// Workflow status of a task
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskStatus {
    #[default]
    Pending,
    #[serde(rename = "In Progress")]
    InProgress,
    Submitted,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "Pending",
            TaskStatus::InProgress => "In Progress",
            TaskStatus::Submitted => "Submitted",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(TaskStatus::Pending),
            "In Progress" => Ok(TaskStatus::InProgress),
            "Submitted" => Ok(TaskStatus::Submitted),
            other => Err(format!("unknown task status: {other}")),
        }
    }
}

/// Represents a task or assignment
///
/// A task without a subject id is a "general" task that survives any
/// subject deletion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    id: String,

    /// Owning subject, absent for general tasks
    #[serde(skip_serializing_if = "Option::is_none")]
    subject_id: Option<String>,

    title: String,

    /// Due date as a `YYYY-MM-DD` string
    deadline: String,

    priority: Priority,

    status: TaskStatus,
}

impl Task {
    /// Creates a new task with a fresh id
    pub fn new(
        subject_id: Option<String>,
        title: String,
        deadline: String,
        priority: Priority,
        status: TaskStatus,
    ) -> Self {
        Self {
            id: ids::new_id(),
            subject_id,
            title,
            deadline,
            priority,
            status,
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

    pub fn get_deadline(&self) -> String {
        self.deadline.clone()
    }

    pub fn set_deadline(&mut self, deadline: String) {
        self.deadline = deadline;
    }

    pub fn get_priority(&self) -> Priority {
        self.priority
    }

    pub fn set_priority(&mut self, priority: Priority) {
        self.priority = priority;
    }

    pub fn get_status(&self) -> TaskStatus {
        self.status
    }

    pub fn set_status(&mut self, status: TaskStatus) {
        self.status = status;
    }
}
