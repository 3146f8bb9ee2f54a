use chrono::NaiveDate;
use log::debug;
use reqwest::blocking::Client;
use serde::Serialize;

use crate::error::ClientError;
use crate::model::{AnalysisReport, Task};

/// Which analysis endpoint to call. The two share a request and response
/// shape; only the path segment differs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Analyze,
    Suggest,
}

impl Action {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Analyze => "analyze",
            Self::Suggest => "suggest",
        }
    }
}

/// Wire form of a task: the store's field set minus the internal id.
#[derive(Serialize)]
struct TaskPayload<'a> {
    title: &'a str,
    due_date: Option<NaiveDate>,
    estimated_hours: u32,
    importance: u8,
    dependencies: &'a [u64],
}

impl<'a> From<&'a Task> for TaskPayload<'a> {
    fn from(task: &'a Task) -> Self {
        Self {
            title: &task.title,
            due_date: task.due_date,
            estimated_hours: task.estimated_hours,
            importance: task.importance,
            dependencies: &task.dependencies,
        }
    }
}

#[derive(Serialize)]
struct AnalyzeRequest<'a> {
    tasks: Vec<TaskPayload<'a>>,
}

/// Client for the external prioritization API. One request per call: no
/// retry, no client-side timeout, no deduplication of concurrent calls.
pub struct SyncClient {
    base_url: String,
    http: Client,
}

impl SyncClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            base_url,
            http: Client::new(),
        }
    }

    pub fn analyze(&self, tasks: &[Task], strategy: &str) -> Result<AnalysisReport, ClientError> {
        self.call(Action::Analyze, tasks, strategy)
    }

    pub fn suggest(&self, tasks: &[Task], strategy: &str) -> Result<AnalysisReport, ClientError> {
        self.call(Action::Suggest, tasks, strategy)
    }

    fn call(
        &self,
        action: Action,
        tasks: &[Task],
        strategy: &str,
    ) -> Result<AnalysisReport, ClientError> {
        if tasks.is_empty() {
            return Err(ClientError::EmptyInput {
                action: action.as_str(),
            });
        }

        let url = format!("{}/api/tasks/{}/", self.base_url, action.as_str());
        debug!("POST {url} strategy={strategy} tasks={}", tasks.len());

        let body = AnalyzeRequest {
            tasks: tasks.iter().map(TaskPayload::from).collect(),
        };
        let resp = self
            .http
            .post(&url)
            .query(&[("strategy", strategy)])
            .json(&body)
            .send()
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        let status = resp.status();
        let text = resp
            .text()
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        if !status.is_success() {
            let body = if text.trim().is_empty() {
                format!("request failed with status {status}")
            } else {
                text
            };
            return Err(ClientError::RequestFailed {
                status: status.as_u16(),
                body,
            });
        }

        parse_report(&text)
    }
}

/// Decode a response body into a report. Kept separate from transport so the
/// contract is testable without a server.
pub fn parse_report(body: &str) -> Result<AnalysisReport, ClientError> {
    serde_json::from_str(body).map_err(|e| ClientError::Transport(format!("bad response body: {e}")))
}
