//! Catalog records and their JSON form.
//!
//! A record is self-contained: it can be stored and read back on its own,
//! which is how the daily gate keeps the day's action.

use crate::error::{Result, RouterError};
use crate::facets::{Facet, Mode};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Acceptable values per facet. Generated records carry one value per facet,
/// but any number is allowed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tags {
    #[serde(default, alias = "time")]
    pub duration: Vec<String>,

    #[serde(default)]
    pub goal: Vec<String>,

    #[serde(default)]
    pub place: Vec<String>,

    #[serde(default, alias = "money")]
    pub budget: Vec<String>,
}

impl Tags {
    pub fn single(duration: &str, goal: &str, place: &str, budget: &str) -> Self {
        Self {
            duration: vec![duration.to_string()],
            goal: vec![goal.to_string()],
            place: vec![place.to_string()],
            budget: vec![budget.to_string()],
        }
    }

    pub fn get(&self, facet: Facet) -> &[String] {
        match facet {
            Facet::Duration => &self.duration,
            Facet::Goal => &self.goal,
            Facet::Place => &self.place,
            Facet::Budget => &self.budget,
        }
    }
}

/// A suggested activity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    /// Stable identifier (`a001`, `a002`, ...)
    pub id: String,

    pub title: String,

    /// Ordered instructions; may be missing in hand-written catalogs
    #[serde(default)]
    pub steps: Vec<String>,

    #[serde(default)]
    pub tags: Tags,

    /// Modes this action is offered under; empty means every mode
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub modes: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl Action {
    /// Steps for display. A record without steps shows its title as the only step.
    pub fn display_steps(&self) -> Cow<'_, [String]> {
        if self.steps.is_empty() {
            Cow::Owned(vec![self.title.clone()])
        } else {
            Cow::Borrowed(&self.steps)
        }
    }

    /// Owned copy with the step fallback applied.
    pub fn with_steps(&self) -> Action {
        let mut action = self.clone();
        if action.steps.is_empty() {
            action.steps = vec![action.title.clone()];
        }
        action
    }

    pub fn is_applicable(&self, mode: Mode) -> bool {
        self.modes.is_empty() || self.modes.iter().any(|m| m == mode.as_str())
    }
}

/// Load a catalog (a JSON array of actions).
pub fn load_catalog(path: &Path) -> Result<Vec<Action>> {
    let content = fs::read_to_string(path).map_err(|e| RouterError::CatalogRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    let catalog = parse_catalog(&content)?;
    debug!("Loaded {} actions from {:?}", catalog.len(), path);
    Ok(catalog)
}

pub fn parse_catalog(content: &str) -> Result<Vec<Action>> {
    serde_json::from_str(content).map_err(|e| RouterError::CatalogParse(e.to_string()))
}

/// Pretty JSON, the form the generated artifact is shipped in.
pub fn to_json(catalog: &[Action]) -> Result<String> {
    Ok(serde_json::to_string_pretty(catalog)?)
}
