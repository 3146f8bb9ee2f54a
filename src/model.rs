use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Server-assigned priority tier attached to each scored task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PriorityLabel {
    High,
    Medium,
    Low,
}

impl PriorityLabel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }
}

impl fmt::Display for PriorityLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A task in the active list. `id` is assigned by the store and is stable
/// across reloads; it is never sent to the analysis API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    pub estimated_hours: u32,
    pub importance: u8,
    #[serde(default)]
    pub dependencies: Vec<u64>,
}

/// Field values for a task that has not been admitted to the store yet.
#[derive(Debug, Clone)]
pub struct TaskDraft {
    pub title: String,
    pub due_date: Option<NaiveDate>,
    pub estimated_hours: u32,
    pub importance: u8,
    pub dependencies: Vec<u64>,
}

impl TaskDraft {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            due_date: None,
            estimated_hours: 1,
            importance: 5,
            dependencies: Vec::new(),
        }
    }
}

/// One entry of an analysis response: the submitted task fields plus the
/// server's scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredTask {
    pub title: String,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    pub estimated_hours: u32,
    pub importance: u8,
    #[serde(default)]
    pub dependencies: Vec<u64>,
    pub priority_label: PriorityLabel,
    pub score: f64,
    pub explanation: String,
}

/// Full analysis response: the strategy the server applied and the scored
/// tasks in priority order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub strategy: String,
    pub tasks: Vec<ScoredTask>,
}
