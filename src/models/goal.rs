use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ids;

/// Progress status of a goal
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GoalStatus {
    #[default]
    #[serde(rename = "Not Started")]
    NotStarted,
    #[serde(rename = "In Progress")]
    InProgress,
    Completed,
}

impl GoalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GoalStatus::NotStarted => "Not Started",
            GoalStatus::InProgress => "In Progress",
            GoalStatus::Completed => "Completed",
        }
    }
}

impl fmt::Display for GoalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GoalStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Not Started" => Ok(GoalStatus::NotStarted),
            "In Progress" => Ok(GoalStatus::InProgress),
            "Completed" => Ok(GoalStatus::Completed),
            other => Err(format!("unknown goal status: {other}")),
        }
    }
}

/// Represents a study goal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    id: String,

    title: String,

    description: String,

    /// Target date as a `YYYY-MM-DD` string
    target_date: String,

    status: GoalStatus,
}

impl Goal {
    /// Creates a new goal with a fresh id
    pub fn new(title: String, description: String, target_date: String, status: GoalStatus) -> Self {
        Self {
            id: ids::new_id(),
            title,
            description,
            target_date,
            status,
        }
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

    pub fn get_description(&self) -> String {
        self.description.clone()
    }

    pub fn set_description(&mut self, description: String) {
        self.description = description;
    }

    pub fn get_target_date(&self) -> String {
        self.target_date.clone()
    }

    pub fn set_target_date(&mut self, target_date: String) {
        self.target_date = target_date;
    }

    pub fn get_status(&self) -> GoalStatus {
        self.status
    }

    pub fn set_status(&mut self, status: GoalStatus) {
        self.status = status;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_goal_status_serde_uses_spaced_names() {
        assert_eq!(
            serde_json::to_value(GoalStatus::NotStarted).unwrap(),
            "Not Started"
        );
        assert_eq!(
            serde_json::to_value(GoalStatus::InProgress).unwrap(),
            "In Progress"
        );
        assert_eq!(
            serde_json::to_value(GoalStatus::Completed).unwrap(),
            "Completed"
        );
    }

    #[test]
    fn test_goal_serde_layout() {
        let goal = Goal::new(
            "Finish thermodynamics revision".to_string(),
            "Chapters 4 through 7".to_string(),
            "2024-06-30".to_string(),
            GoalStatus::NotStarted,
        );

        let value = serde_json::to_value(&goal).unwrap();
        assert_eq!(value["targetDate"], "2024-06-30");
        assert_eq!(value["status"], "Not Started");
    }
}
