//! Once-per-day gate.
//!
//! The gate state lives in an injected key-value store. The matcher never
//! touches it; this module only asks the matcher for a single suggestion
//! when the day has no gate action yet.

use crate::catalog::{Action, Tags};
use crate::error::{Result, RouterError};
use crate::facets::{Mode, Selection};
use crate::matcher::Matcher;
use chrono::NaiveDate;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Holds the `YYYY-MM-DD` the gate was last completed
pub const GATE_DONE_KEY: &str = "decision_router_gate_done_ymd_v3";

/// Holds the day's gate action as `{date, action}` JSON
pub const GATE_ACTION_KEY: &str = "decision_router_gate_action_v3";

const STORE_DIR: &str = ".decision-router";
const STORE_FILE: &str = "store.json";

// ============================================================================
// Key-Value Store
// ============================================================================

pub trait KvStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Flat JSON object on disk, rewritten on every `set`.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl JsonFileStore {
    /// Open `path`; a missing file is an empty store.
    pub fn open(path: &Path) -> Result<Self> {
        let entries = if path.exists() {
            let content = fs::read_to_string(path).map_err(|e| RouterError::StoreRead {
                path: path.to_path_buf(),
                source: e,
            })?;
            serde_json::from_str(&content).map_err(|e| RouterError::StoreParse {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?
        } else {
            debug!("No store at {:?}, starting empty", path);
            BTreeMap::new()
        };

        Ok(Self {
            path: path.to_path_buf(),
            entries,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl KvStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());

        let write_err = |e: std::io::Error| RouterError::StoreWrite {
            path: self.path.clone(),
            source: e,
        };
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
        let content = serde_json::to_string_pretty(&self.entries)?;
        fs::write(&self.path, content).map_err(write_err)
    }
}

/// `~/.decision-router/store.json`
pub fn default_store_path() -> Result<PathBuf> {
    let home = dirs::home_dir().ok_or(RouterError::NoHomeDir)?;
    Ok(home.join(STORE_DIR).join(STORE_FILE))
}

// ============================================================================
// Gate
// ============================================================================

fn day_key(today: NaiveDate) -> String {
    today.format("%Y-%m-%d").to_string()
}

pub fn is_done_today<S: KvStore + ?Sized>(store: &S, today: NaiveDate) -> bool {
    store.get(GATE_DONE_KEY).as_deref() == Some(day_key(today).as_str())
}

pub fn mark_done<S: KvStore + ?Sized>(store: &mut S, today: NaiveDate) -> Result<()> {
    store.set(GATE_DONE_KEY, &day_key(today))
}

/// Used when the catalog has nothing to offer.
pub fn fixed_gate_action() -> Action {
    Action {
        id: "gate_fixed_10steps".to_string(),
        title: "10歩歩く".to_string(),
        steps: vec![
            "いま立つ".to_string(),
            "部屋の中で10歩だけ歩く".to_string(),
            "席に戻る（OK）".to_string(),
        ],
        tags: Tags::default(),
        modes: Vec::new(),
        note: Some("小さくていい。脳に「始めた」旗を立てるだけ。".to_string()),
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredGate {
    date: String,
    action: Action,
}

/// The day's gate action: the stored one if it was chosen today, otherwise a
/// fresh single draw that is then persisted. Store failures never block.
pub fn todays_action<S: KvStore + ?Sized, R: Rng + ?Sized>(
    store: &mut S,
    today: NaiveDate,
    catalog: &[Action],
    selection: &Selection,
    mode: Mode,
    matcher: &Matcher,
    rng: &mut R,
) -> Action {
    let day = day_key(today);

    if let Some(raw) = store.get(GATE_ACTION_KEY) {
        match serde_json::from_str::<StoredGate>(&raw) {
            Ok(stored) if stored.date == day => return stored.action.with_steps(),
            Ok(stored) => debug!("Stored gate action is from {}, drawing a new one", stored.date),
            Err(e) => warn!("Ignoring unreadable gate action: {}", e),
        }
    }

    let action = matcher
        .select(catalog, selection, mode, 1, rng)
        .into_iter()
        .next()
        .map(|s| s.action)
        .unwrap_or_else(fixed_gate_action);

    let stored = StoredGate {
        date: day,
        action,
    };
    match serde_json::to_string(&stored) {
        Ok(json) => {
            if let Err(e) = store.set(GATE_ACTION_KEY, &json) {
                warn!("Could not persist gate action: {}", e);
            }
        }
        Err(e) => warn!("Could not serialize gate action: {}", e),
    }
    stored.action
}
