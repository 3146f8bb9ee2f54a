use thiserror::Error;

/// Errors from store mutations. Validation failures name the offending field
/// and never leave the store partially modified.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },

    #[error("no task at index {index} (list has {len} task(s))")]
    IndexOutOfBounds { index: usize, len: usize },
}

impl StoreError {
    pub fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field,
            reason: reason.into(),
        }
    }
}

/// Errors from parsing a bulk-import document. Individual bad records are not
/// errors; they are dropped and counted. These cover a document that cannot
/// be used at all.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("invalid JSON: {0}")]
    NotJson(#[from] serde_json::Error),

    #[error("JSON must be an array or an object with a 'tasks' array")]
    WrongShape,
}

/// Errors from the analysis API client.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("no tasks to {action}; add at least one task first")]
    EmptyInput { action: &'static str },

    #[error("server returned {status}: {body}")]
    RequestFailed { status: u16, body: String },

    #[error("request failed: {0}")]
    Transport(String),
}
