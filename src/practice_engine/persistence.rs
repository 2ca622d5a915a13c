//! Progress persistence boundary.
//!
//! Stored progress is a versioned JSON record. Anything unreadable
//! (malformed JSON, wrong version, wrong shape) is treated as "no progress
//! yet"; reads never fail. Writes can fail and report a [`StoreError`].

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::practice_engine::{
    error::StoreError,
    models::*,
};

pub const STORAGE_KEY: &str = "arith-drill-progress-v1";

/// Sessions kept in history, most recent first.
pub const HISTORY_CAP: usize = 20;

/// Coerce an arbitrary stored JSON value into valid progress.
///
/// Unknown versions and non-objects yield empty progress. Within a valid
/// record, unreadable history entries are dropped and unreadable per-skill
/// snapshots fall back to defaults.
pub fn normalize_progress(value: &Value) -> PersistedProgress {
    let Some(record) = value.as_object() else {
        warn!("stored progress is not an object, discarding");
        return PersistedProgress::empty();
    };

    let version = record.get("version").and_then(Value::as_u64);
    if version != Some(PROGRESS_VERSION as u64) {
        warn!(?version, expected = PROGRESS_VERSION, "stored progress version mismatch, discarding");
        return PersistedProgress::empty();
    }

    let last_focus_skill = record
        .get("lastFocusSkill")
        .and_then(|v| Skill::deserialize(v).ok());

    let session_history = record
        .get("sessionHistory")
        .and_then(Value::as_array)
        .map(|entries| {
            entries
                .iter()
                .take(HISTORY_CAP)
                .filter_map(|entry| SessionResult::deserialize(entry).ok())
                .collect()
        })
        .unwrap_or_default();

    let mut skill_snapshot = PerSkill::<SkillSnapshot>::default();
    if let Some(stored) = record.get("skillSnapshot").and_then(Value::as_object) {
        for skill in Skill::ALL {
            if let Some(snapshot) = stored.get(skill.id()).and_then(|v| SkillSnapshot::deserialize(v).ok()) {
                skill_snapshot[skill] = snapshot;
            }
        }
    }

    PersistedProgress {
        version: PROGRESS_VERSION,
        last_focus_skill,
        session_history,
        skill_snapshot,
    }
}

/// Parse raw stored text; malformed JSON yields empty progress.
pub fn parse_progress(raw: &str) -> PersistedProgress {
    match serde_json::from_str::<Value>(raw) {
        Ok(value) => normalize_progress(&value),
        Err(e) => {
            warn!(error = %e, "stored progress is not valid JSON, discarding");
            PersistedProgress::empty()
        }
    }
}

/// Fold one session into the per-skill snapshot.
///
/// Skills the session did not touch only take the new difficulty. Touched
/// skills accumulate attempts and correct answers, receive a share of the
/// session's hint uses proportional to their task count, and blend the
/// session's average response time into a running weighted average.
pub fn merge_session_into_snapshot(
    snapshot: &PerSkill<SkillSnapshot>,
    result: &SessionResult,
) -> PerSkill<SkillSnapshot> {
    PerSkill::from_fn(|skill| {
        let previous = snapshot[skill];
        let tally = result.by_skill[skill];
        let difficulty = result.next_difficulty_by_skill[skill];

        if tally.total == 0 {
            return SkillSnapshot { difficulty, ..previous };
        }

        let attempts = previous.attempts + tally.total;
        let weighted_ms = previous.avg_response_ms as f64 * previous.attempts as f64
            + result.avg_response_ms as f64 * tally.total as f64;
        let hint_share = (result.hint_uses as f64 * tally.total as f64
            / result.total_tasks.max(1) as f64)
            .round() as u32;

        SkillSnapshot {
            attempts,
            correct: previous.correct + tally.correct,
            hint_uses: previous.hint_uses + hint_share,
            avg_response_ms: (weighted_ms / attempts as f64).round() as u64,
            difficulty,
        }
    })
}

/// Prepend `result` to the capped history and merge it into the snapshot.
pub fn apply_session_result(progress: &PersistedProgress, result: &SessionResult) -> PersistedProgress {
    let mut session_history = Vec::with_capacity(HISTORY_CAP);
    session_history.push(result.clone());
    session_history.extend(progress.session_history.iter().take(HISTORY_CAP - 1).cloned());

    PersistedProgress {
        version: PROGRESS_VERSION,
        last_focus_skill: progress.last_focus_skill,
        session_history,
        skill_snapshot: merge_session_into_snapshot(&progress.skill_snapshot, result),
    }
}

/// Load/save semantics over a single stored JSON document.
///
/// Implementors only move raw text; parsing, normalization and the
/// read-modify-write operations are shared.
pub trait ProgressStore {
    fn read_raw(&self) -> Result<Option<String>, StoreError>;

    fn write_raw(&mut self, raw: &str) -> Result<(), StoreError>;

    fn load_progress(&self) -> PersistedProgress {
        match self.read_raw() {
            Ok(Some(raw)) => parse_progress(&raw),
            Ok(None) => PersistedProgress::empty(),
            Err(e) => {
                warn!(error = %e, "failed to read stored progress, starting empty");
                PersistedProgress::empty()
            }
        }
    }

    fn save_progress(&mut self, progress: &PersistedProgress) -> Result<(), StoreError> {
        let raw = serde_json::to_string(progress)?;
        self.write_raw(&raw)
    }

    fn append_session_result(&mut self, result: &SessionResult) -> Result<PersistedProgress, StoreError> {
        let next = apply_session_result(&self.load_progress(), result);
        self.save_progress(&next)?;
        debug!(session_id = %result.session_id, history = next.session_history.len(), "session result stored");
        Ok(next)
    }

    fn update_last_focus_skill(&mut self, skill: Option<Skill>) -> Result<PersistedProgress, StoreError> {
        let next = PersistedProgress { last_focus_skill: skill, ..self.load_progress() };
        self.save_progress(&next)?;
        Ok(next)
    }
}

/// In-memory key-value store; progress lives under [`STORAGE_KEY`].
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Place raw text under the progress key, e.g. to simulate corrupt data.
    pub fn with_raw(raw: impl Into<String>) -> Self {
        let mut store = Self::new();
        store.entries.insert(STORAGE_KEY.to_string(), raw.into());
        store
    }
}

impl ProgressStore for MemoryStore {
    fn read_raw(&self) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(STORAGE_KEY).cloned())
    }

    fn write_raw(&mut self, raw: &str) -> Result<(), StoreError> {
        self.entries.insert(STORAGE_KEY.to_string(), raw.to_string());
        Ok(())
    }
}

/// Progress kept in one JSON file. A missing file means no progress.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFileStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ProgressStore for JsonFileStore {
    fn read_raw(&self) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write_raw(&mut self, raw: &str) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, raw)?;
        Ok(())
    }
}
