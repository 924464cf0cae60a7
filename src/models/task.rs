// src/models/task.rs

use serde::{Deserialize, Serialize};

/// The environmental tasks a user can submit proof for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskKind {
    Tree,
    Waste,
    Energy,
}

impl TaskKind {
    pub const ALL: [TaskKind; 3] = [TaskKind::Tree, TaskKind::Waste, TaskKind::Energy];

    pub fn title(self) -> &'static str {
        match self {
            TaskKind::Tree => "Plant a Tree",
            TaskKind::Waste => "Waste Segregation",
            TaskKind::Energy => "Energy Conservation",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            TaskKind::Tree => {
                "Plant a sapling in your community. Take photos of the planting process, \
                 including before, during, and after shots. Provide location details and \
                 the type of tree planted."
            }
            TaskKind::Waste => {
                "Implement proper waste segregation for one week. Document your daily \
                 segregation process with photos showing different waste categories \
                 (organic, recyclable, non-recyclable)."
            }
            TaskKind::Energy => {
                "Implement energy-saving practices in your home/school for one week. Track \
                 your energy usage reduction and document the methods you used (LED bulbs, \
                 turning off devices, etc.)."
            }
        }
    }

    pub fn points(self) -> u32 {
        match self {
            TaskKind::Tree => 50,
            TaskKind::Waste => 30,
            TaskKind::Energy => 40,
        }
    }
}

/// Catalog entry shown in the task dialog.
#[derive(Debug, Serialize)]
pub struct TaskInfo {
    pub kind: TaskKind,
    pub title: &'static str,
    pub description: &'static str,
    pub points: u32,
}

impl From<TaskKind> for TaskInfo {
    fn from(kind: TaskKind) -> Self {
        Self {
            kind,
            title: kind.title(),
            description: kind.description(),
            points: kind.points(),
        }
    }
}

/// Proof of a completed task. Checked, sent, then dropped.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskSubmission {
    pub task: TaskKind,
    /// File name of the attached proof, if any.
    #[serde(default)]
    pub proof: Option<String>,
    #[serde(default)]
    pub notes: String,
}

impl TaskSubmission {
    /// Returns the message to show when a precondition is missing.
    pub fn missing_precondition(&self) -> Option<&'static str> {
        let has_proof = self
            .proof
            .as_deref()
            .is_some_and(|name| !name.trim().is_empty());
        if !has_proof {
            return Some("Please upload proof of your task completion.");
        }
        if self.notes.trim().is_empty() {
            return Some("Please provide additional notes about your task.");
        }
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Approved,
    Pending,
    Rejected,
}

impl TaskStatus {
    pub fn label(self) -> &'static str {
        match self {
            TaskStatus::Approved => "Approved",
            TaskStatus::Pending => "Pending",
            TaskStatus::Rejected => "Rejected",
        }
    }

    pub fn css_class(self) -> &'static str {
        match self {
            TaskStatus::Approved => "status-approved",
            TaskStatus::Pending => "status-pending",
            TaskStatus::Rejected => "status-rejected",
        }
    }
}

/// A row of the recent-tasks table.
#[derive(Debug, Clone, Serialize)]
pub struct RecentTask {
    pub name: String,
    pub date: chrono::NaiveDate,
    pub status: TaskStatus,
    pub points: u32,
}
