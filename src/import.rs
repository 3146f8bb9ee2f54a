use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::Value;

use crate::error::ImportError;
use crate::model::TaskDraft;

/// A task-like record as it appears in an import document. Everything except
/// the shape is optional; defaults are filled in here.
#[derive(Deserialize)]
struct RawTask {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    due_date: Option<NaiveDate>,
    #[serde(default)]
    estimated_hours: Option<u32>,
    #[serde(default)]
    importance: Option<u8>,
    #[serde(default)]
    dependencies: Option<Vec<u64>>,
}

/// Parsed import document: the drafts to hand to `TaskStore::replace_all`
/// plus the number of records that could not be decoded at all.
#[derive(Debug)]
pub struct ImportBatch {
    pub drafts: Vec<TaskDraft>,
    pub malformed: usize,
}

/// Parse a bulk-import document: either a bare array of records or an object
/// with a `tasks` array. A record that cannot be decoded is dropped and
/// counted, never aborting the batch; a document of the wrong shape is an
/// error and nothing is applied.
pub fn parse_document(text: &str) -> Result<ImportBatch, ImportError> {
    let value: Value = serde_json::from_str(text)?;
    let records = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("tasks") {
            Some(Value::Array(items)) => items,
            _ => return Err(ImportError::WrongShape),
        },
        _ => return Err(ImportError::WrongShape),
    };

    let mut drafts = Vec::new();
    let mut malformed = 0;
    for record in records {
        match serde_json::from_value::<RawTask>(record) {
            Ok(raw) => drafts.push(into_draft(raw)),
            Err(_) => malformed += 1,
        }
    }
    Ok(ImportBatch { drafts, malformed })
}

fn into_draft(raw: RawTask) -> TaskDraft {
    let title = match raw.title {
        Some(t) if !t.trim().is_empty() => t,
        _ => "Untitled Task".to_string(),
    };
    TaskDraft {
        title,
        due_date: raw.due_date,
        estimated_hours: raw.estimated_hours.unwrap_or(1),
        importance: raw.importance.unwrap_or(5),
        dependencies: raw.dependencies.unwrap_or_default(),
    }
}
