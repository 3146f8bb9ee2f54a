use anyhow::Result;
use chrono::NaiveDate;
use log::{info, warn};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::model::{Task, TaskDraft};
use crate::storage;
use crate::validate::{validate_due_date, validate_hours, validate_importance, validate_title};

/// Name of the storage slot holding the serialized task list.
pub const SLOT: &str = "tasks";

const PAYLOAD_VERSION: u32 = 2;

/// Current persisted payload. Version 2: completion is deletion, so there is
/// only one list.
#[derive(Serialize, Deserialize)]
struct PersistedStore {
    version: u32,
    next_id: u64,
    tasks: Vec<Task>,
}

/// Legacy payload written by the v1 schema: two lists and a per-task
/// `completed` flag, no ids.
#[derive(Deserialize)]
struct LegacyPayload {
    tasks: Vec<LegacyTask>,
    #[serde(rename = "completedTasks", default)]
    completed_tasks: Vec<LegacyTask>,
}

#[derive(Deserialize)]
struct LegacyTask {
    title: String,
    #[serde(default)]
    due_date: Option<NaiveDate>,
    #[serde(default = "default_hours")]
    estimated_hours: u32,
    #[serde(default = "default_importance")]
    importance: u8,
    #[serde(default)]
    dependencies: Vec<u64>,
}

fn default_hours() -> u32 {
    1
}

fn default_importance() -> u8 {
    5
}

/// Result of a bulk replacement: how many records were admitted and how many
/// were dropped for failing validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplaceOutcome {
    pub kept: usize,
    pub skipped: usize,
}

/// Ordered in-memory task list. All mutation goes through the methods here;
/// nothing mutates a task in place (a move is a remove plus a re-add).
#[derive(Debug)]
pub struct TaskStore {
    tasks: Vec<Task>,
    next_id: u64,
}

impl TaskStore {
    pub fn new() -> Self {
        Self {
            tasks: Vec::new(),
            next_id: 1,
        }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Validate `draft` and append it to the end of the list. On any
    /// validation failure the store is left untouched.
    pub fn add(&mut self, draft: TaskDraft, today: NaiveDate) -> Result<&Task, StoreError> {
        validate_title(&draft.title)?;
        validate_due_date(draft.due_date, today)?;
        validate_hours(draft.estimated_hours)?;
        validate_importance(draft.importance)?;

        let id = self.next_id;
        self.next_id += 1;
        self.tasks.push(Task {
            id,
            title: draft.title.trim().to_string(),
            due_date: draft.due_date,
            estimated_hours: draft.estimated_hours,
            importance: draft.importance,
            dependencies: draft.dependencies,
        });
        Ok(self.tasks.last().unwrap())
    }

    /// Remove and return the task at `index`. An empty store is a no-op
    /// (`Ok(None)`); an out-of-range index on a non-empty store is an error
    /// and leaves the store unchanged.
    pub fn remove(&mut self, index: usize) -> Result<Option<Task>, StoreError> {
        if self.tasks.is_empty() {
            return Ok(None);
        }
        if index >= self.tasks.len() {
            return Err(StoreError::IndexOutOfBounds {
                index,
                len: self.tasks.len(),
            });
        }
        Ok(Some(self.tasks.remove(index)))
    }

    /// Replace the entire list with the valid subset of `drafts`. Records
    /// that fail validation (past due date, blank title, out-of-range
    /// fields) are dropped individually; the batch is never aborted. Ids are
    /// reassigned from 1.
    pub fn replace_all(&mut self, drafts: Vec<TaskDraft>, today: NaiveDate) -> ReplaceOutcome {
        self.tasks.clear();
        self.next_id = 1;
        let mut skipped = 0;
        for draft in drafts {
            if self.add(draft, today).is_err() {
                skipped += 1;
            }
        }
        ReplaceOutcome {
            kept: self.tasks.len(),
            skipped,
        }
    }

    /// Serialize the store into its storage slot.
    pub fn persist(&self, conn: &Connection) -> Result<()> {
        let payload = PersistedStore {
            version: PAYLOAD_VERSION,
            next_id: self.next_id,
            tasks: self.tasks.clone(),
        };
        storage::write_slot(conn, SLOT, &serde_json::to_string(&payload)?)?;
        Ok(())
    }

    /// Load the store from its storage slot. A missing slot yields an empty
    /// store; unreadable data is logged and also yields an empty store, so
    /// this only fails on a database error.
    pub fn restore(conn: &Connection) -> Result<Self> {
        match storage::read_slot(conn, SLOT)? {
            Some(data) => Ok(Self::decode(&data)),
            None => Ok(Self::new()),
        }
    }

    fn decode(data: &str) -> Self {
        if let Ok(payload) = serde_json::from_str::<PersistedStore>(data) {
            return Self {
                tasks: payload.tasks,
                next_id: payload.next_id,
            };
        }
        if let Ok(legacy) = serde_json::from_str::<LegacyPayload>(data) {
            return Self::migrate_legacy(legacy);
        }
        warn!("stored task data is corrupt; starting with an empty list");
        Self::new()
    }

    /// One-time migration from the v1 payload: active tasks are kept with
    /// fresh ids, completed tasks are discarded (completion is deletion now).
    fn migrate_legacy(legacy: LegacyPayload) -> Self {
        let discarded = legacy.completed_tasks.len();
        let mut store = Self::new();
        for t in legacy.tasks {
            let id = store.next_id;
            store.next_id += 1;
            store.tasks.push(Task {
                id,
                title: t.title,
                due_date: t.due_date,
                estimated_hours: t.estimated_hours,
                importance: t.importance,
                dependencies: t.dependencies,
            });
        }
        info!(
            "migrated legacy task data: kept {} active task(s), discarded {} completed",
            store.tasks.len(),
            discarded
        );
        store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::open_memory;

    fn today() -> NaiveDate {
        "2026-08-28".parse().unwrap()
    }

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn draft(title: &str) -> TaskDraft {
        TaskDraft::new(title)
    }

    #[test]
    fn add_assigns_sequential_ids() {
        let mut store = TaskStore::new();
        store.add(draft("a"), today()).unwrap();
        store.add(draft("b"), today()).unwrap();
        let ids: Vec<u64> = store.tasks().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn add_trims_title() {
        let mut store = TaskStore::new();
        store.add(draft("  padded  "), today()).unwrap();
        assert_eq!(store.tasks()[0].title, "padded");
    }

    #[test]
    fn add_blank_title_fails_unchanged() {
        let mut store = TaskStore::new();
        assert!(store.add(draft("   "), today()).is_err());
        assert!(store.is_empty());
    }

    #[test]
    fn add_past_due_fails_unchanged() {
        let mut store = TaskStore::new();
        store.add(draft("keep"), today()).unwrap();
        let mut d = draft("late");
        d.due_date = Some(date("2000-01-01"));
        assert!(store.add(d, today()).is_err());
        assert_eq!(store.len(), 1);
        assert_eq!(store.tasks()[0].title, "keep");
    }

    #[test]
    fn add_due_today_is_allowed() {
        let mut store = TaskStore::new();
        let mut d = draft("today");
        d.due_date = Some(today());
        store.add(d, today()).unwrap();
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn remove_returns_the_task() {
        let mut store = TaskStore::new();
        store.add(draft("a"), today()).unwrap();
        store.add(draft("b"), today()).unwrap();
        let removed = store.remove(0).unwrap().unwrap();
        assert_eq!(removed.title, "a");
        assert_eq!(store.len(), 1);
        assert_eq!(store.tasks()[0].title, "b");
    }

    #[test]
    fn remove_out_of_range_fails_unchanged() {
        let mut store = TaskStore::new();
        store.add(draft("a"), today()).unwrap();
        assert!(store.remove(3).is_err());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn remove_on_empty_store_is_noop() {
        let mut store = TaskStore::new();
        assert!(store.remove(0).unwrap().is_none());
    }

    #[test]
    fn replace_all_drops_invalid_and_counts() {
        let mut store = TaskStore::new();
        store.add(draft("old"), today()).unwrap();

        let mut late = draft("late");
        late.due_date = Some(date("2000-01-01"));
        let blank = draft("");
        let outcome = store.replace_all(vec![draft("a"), late, draft("b"), blank], today());

        assert_eq!(outcome, ReplaceOutcome { kept: 2, skipped: 2 });
        let titles: Vec<&str> = store.tasks().iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["a", "b"]);
    }

    #[test]
    fn replace_all_with_empty_input_clears() {
        let mut store = TaskStore::new();
        store.add(draft("a"), today()).unwrap();
        let outcome = store.replace_all(Vec::new(), today());
        assert_eq!(outcome, ReplaceOutcome { kept: 0, skipped: 0 });
        assert!(store.is_empty());
    }

    #[test]
    fn persist_restore_round_trip() {
        let conn = open_memory().unwrap();
        let mut store = TaskStore::new();
        let mut d = draft("a");
        d.due_date = Some(date("2026-12-31"));
        d.dependencies = vec![2];
        store.add(d, today()).unwrap();
        store.add(draft("b"), today()).unwrap();
        store.persist(&conn).unwrap();

        let restored = TaskStore::restore(&conn).unwrap();
        assert_eq!(restored.tasks(), store.tasks());
    }

    #[test]
    fn persist_restore_empty_round_trip() {
        let conn = open_memory().unwrap();
        let store = TaskStore::new();
        store.persist(&conn).unwrap();
        let restored = TaskStore::restore(&conn).unwrap();
        assert!(restored.is_empty());
    }

    #[test]
    fn restore_missing_slot_yields_empty() {
        let conn = open_memory().unwrap();
        let store = TaskStore::restore(&conn).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn restore_corrupt_slot_yields_empty() {
        let conn = open_memory().unwrap();
        storage::write_slot(&conn, SLOT, "{not json at all").unwrap();
        let store = TaskStore::restore(&conn).unwrap();
        assert!(store.is_empty());

        storage::write_slot(&conn, SLOT, "{\"tasks\": 42}").unwrap();
        let store = TaskStore::restore(&conn).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn ids_continue_after_round_trip() {
        let conn = open_memory().unwrap();
        let mut store = TaskStore::new();
        store.add(draft("a"), today()).unwrap();
        store.add(draft("b"), today()).unwrap();
        store.remove(1).unwrap();
        store.persist(&conn).unwrap();

        let mut restored = TaskStore::restore(&conn).unwrap();
        let task = restored.add(draft("c"), today()).unwrap();
        // id 2 was used by the removed task and must not be reissued
        assert_eq!(task.id, 3);
    }

    #[test]
    fn restore_migrates_legacy_payload() {
        let conn = open_memory().unwrap();
        let legacy = r#"{
            "tasks": [
                {"title": "active", "due_date": "2026-09-01", "estimated_hours": 2,
                 "importance": 7, "dependencies": [], "completed": false},
                {"title": "sparse"}
            ],
            "completedTasks": [
                {"title": "done", "completed": true}
            ]
        }"#;
        storage::write_slot(&conn, SLOT, legacy).unwrap();

        let store = TaskStore::restore(&conn).unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.tasks()[0].title, "active");
        assert_eq!(store.tasks()[0].id, 1);
        assert_eq!(store.tasks()[1].title, "sparse");
        assert_eq!(store.tasks()[1].estimated_hours, 1);
        assert_eq!(store.tasks()[1].importance, 5);

        // Persisting writes the v2 payload; the next restore takes the v2 path.
        store.persist(&conn).unwrap();
        let again = TaskStore::restore(&conn).unwrap();
        assert_eq!(again.tasks(), store.tasks());
    }

    #[test]
    fn round_trip_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prio.db");
        let path = path.to_str().unwrap();

        {
            let conn = storage::open(path).unwrap();
            storage::init(&conn).unwrap();
            let mut store = TaskStore::new();
            store.add(TaskDraft::new("persisted"), today()).unwrap();
            store.persist(&conn).unwrap();
        }

        let conn = storage::open(path).unwrap();
        storage::init(&conn).unwrap();
        let store = TaskStore::restore(&conn).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.tasks()[0].title, "persisted");
    }
}
