//! Facets, presentation modes and the per-mode option tables.
//!
//! A [`Selection`] always carries one legal value per facet for its mode.
//! Anything unknown coming from a flag or a share link is replaced by the
//! mode default instead of being rejected.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;
use url::form_urlencoded;

// ============================================================================
// Facets and Modes
// ============================================================================

/// One of the four independent selection dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Facet {
    Duration,
    Goal,
    Place,
    Budget,
}

impl Facet {
    pub const ALL: [Facet; 4] = [Facet::Duration, Facet::Goal, Facet::Place, Facet::Budget];

    pub fn as_str(&self) -> &'static str {
        match self {
            Facet::Duration => "duration",
            Facet::Goal => "goal",
            Facet::Place => "place",
            Facet::Budget => "budget",
        }
    }

    /// Key used in share links and in older catalogs.
    pub fn legacy_key(&self) -> &'static str {
        match self {
            Facet::Duration => "time",
            Facet::Goal => "goal",
            Facet::Place => "place",
            Facet::Budget => "money",
        }
    }

    pub fn from_key(key: &str) -> Option<Facet> {
        match key {
            "duration" | "time" => Some(Facet::Duration),
            "goal" => Some(Facet::Goal),
            "place" => Some(Facet::Place),
            "budget" | "money" => Some(Facet::Budget),
            _ => None,
        }
    }
}

impl fmt::Display for Facet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Presentation context. Only the `place` facet differs between modes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Student,
    General,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Student => "student",
            Mode::General => "general",
        }
    }

    /// Anything other than `general` reads as student.
    pub fn parse_lenient(raw: &str) -> Mode {
        if raw.trim().eq_ignore_ascii_case("general") {
            Mode::General
        } else {
            Mode::Student
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Place Aliases
// ============================================================================

/// Legacy place values and what they mean under each mode.
const PLACE_ALIASES: &[(&str, Mode, &str)] = &[
    ("campus", Mode::Student, "school"),
    ("campus", Mode::General, "outside"),
];

/// Map a place value onto the vocabulary of `mode`. Unaliased values pass through.
pub fn normalize_place(value: &str, mode: Mode) -> &str {
    PLACE_ALIASES
        .iter()
        .find(|(alias, m, _)| *alias == value && *m == mode)
        .map(|(_, _, canonical)| *canonical)
        .unwrap_or(value)
}

// ============================================================================
// Option Tables
// ============================================================================

/// A selectable value and its display label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FacetOption {
    pub value: &'static str,
    pub label: &'static str,
}

const fn opt(value: &'static str, label: &'static str) -> FacetOption {
    FacetOption { value, label }
}

const DURATION_OPTIONS: &[FacetOption] = &[
    opt("10", "10分"),
    opt("30", "30分"),
    opt("60", "1時間"),
    opt("180", "半日"),
];

const GOAL_OPTIONS: &[FacetOption] = &[
    opt("recover", "回復"),
    opt("growth", "成長"),
    opt("life", "生活"),
    opt("fun", "遊び"),
];

const STUDENT_PLACE_OPTIONS: &[FacetOption] = &[
    opt("home", "家"),
    opt("school", "学校"),
    opt("outside", "外"),
    opt("online", "オンライン"),
];

const GENERAL_PLACE_OPTIONS: &[FacetOption] = &[
    opt("home", "家"),
    opt("outside", "外"),
    opt("online", "オンライン"),
];

const BUDGET_OPTIONS: &[FacetOption] = &[
    opt("0", "0円"),
    opt("low", "少し（〜500円）"),
    opt("mid", "まあまあ（〜2000円）"),
    opt("high", "気にしない"),
];

/// Legal options for `facet` under `mode`.
pub fn options(mode: Mode, facet: Facet) -> &'static [FacetOption] {
    match (facet, mode) {
        (Facet::Duration, _) => DURATION_OPTIONS,
        (Facet::Goal, _) => GOAL_OPTIONS,
        (Facet::Place, Mode::Student) => STUDENT_PLACE_OPTIONS,
        (Facet::Place, Mode::General) => GENERAL_PLACE_OPTIONS,
        (Facet::Budget, _) => BUDGET_OPTIONS,
    }
}

pub fn is_valid(mode: Mode, facet: Facet, value: &str) -> bool {
    options(mode, facet).iter().any(|o| o.value == value)
}

/// Display label for a value, or the value itself when it has none.
pub fn label_for<'a>(mode: Mode, facet: Facet, value: &'a str) -> &'a str {
    options(mode, facet)
        .iter()
        .find(|o| o.value == value)
        .map(|o| o.label)
        .unwrap_or(value)
}

// ============================================================================
// Selection
// ============================================================================

/// Unvalidated facet values, as they arrive from flags or a share link.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawSelection {
    pub duration: Option<String>,
    pub goal: Option<String>,
    pub place: Option<String>,
    pub budget: Option<String>,
}

impl RawSelection {
    fn get(&self, facet: Facet) -> Option<&str> {
        match facet {
            Facet::Duration => self.duration.as_deref(),
            Facet::Goal => self.goal.as_deref(),
            Facet::Place => self.place.as_deref(),
            Facet::Budget => self.budget.as_deref(),
        }
    }

    fn slot(&mut self, facet: Facet) -> &mut Option<String> {
        match facet {
            Facet::Duration => &mut self.duration,
            Facet::Goal => &mut self.goal,
            Facet::Place => &mut self.place,
            Facet::Budget => &mut self.budget,
        }
    }
}

/// Exactly one legal value per facet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub duration: String,
    pub goal: String,
    pub place: String,
    pub budget: String,
}

impl Selection {
    /// Mode default: 30 minutes, recover, home, no budget.
    pub fn defaults(_mode: Mode) -> Self {
        Self {
            duration: "30".to_string(),
            goal: "recover".to_string(),
            place: "home".to_string(),
            budget: "0".to_string(),
        }
    }

    pub fn get(&self, facet: Facet) -> &str {
        match facet {
            Facet::Duration => &self.duration,
            Facet::Goal => &self.goal,
            Facet::Place => &self.place,
            Facet::Budget => &self.budget,
        }
    }

    fn set(&mut self, facet: Facet, value: String) {
        match facet {
            Facet::Duration => self.duration = value,
            Facet::Goal => self.goal = value,
            Facet::Place => self.place = value,
            Facet::Budget => self.budget = value,
        }
    }

    /// Resolve raw values against the option tables of `mode`.
    pub fn resolve(mode: Mode, raw: &RawSelection) -> Self {
        let mut selection = Self::defaults(mode);
        for facet in Facet::ALL {
            let Some(value) = raw.get(facet) else {
                continue;
            };
            let value = match facet {
                Facet::Place => normalize_place(value, mode),
                _ => value,
            };
            if is_valid(mode, facet, value) {
                selection.set(facet, value.to_string());
            } else {
                debug!("Replacing invalid {}={:?} with {} default", facet, value, mode);
            }
        }
        selection
    }

    /// Carry the selection into `next`, dropping a place it does not offer.
    pub fn switch_mode(&self, next: Mode) -> Self {
        let mut switched = self.clone();
        if !is_valid(next, Facet::Place, &self.place) {
            switched.place = Self::defaults(next).place;
        }
        switched
    }

    /// Share-link form, using the legacy keys.
    pub fn to_query(&self, mode: Mode) -> String {
        let mut query = form_urlencoded::Serializer::new(String::new());
        query.append_pair("mode", mode.as_str());
        for facet in Facet::ALL {
            query.append_pair(facet.legacy_key(), self.get(facet));
        }
        query.finish()
    }
}

/// Parse `mode=..&time=..&goal=..&place=..&money=..` into a resolved selection.
/// Unknown keys are ignored; a leading `?` or `#/result?` prefix is tolerated.
/// Keys and values are form-decoded (`%xx` escapes, `+` as space).
pub fn parse_query(query: &str) -> (Mode, Selection) {
    let query = query.rsplit_once('?').map(|(_, q)| q).unwrap_or(query);
    let mut mode = Mode::default();
    let mut raw = RawSelection::default();

    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        if key == "mode" {
            mode = Mode::parse_lenient(&value);
        } else if let Some(facet) = Facet::from_key(&key) {
            *raw.slot(facet) = Some(value.into_owned());
        }
    }

    (mode, Selection::resolve(mode, &raw))
}

// ============================================================================
// Tests
// ============================================================================
