//! Matching and selection.
//!
//! Strict matches (every facet hit) are drawn first. Remaining slots come from
//! the fallback band: non-strict actions scoring within `tolerance` of the best
//! non-strict score. Draws use the caller's random source and are not
//! reproducible across calls.

use crate::catalog::Action;
use crate::facets::{normalize_place, Facet, Mode, Selection};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Suggestions shown per generate/reroll
pub const DEFAULT_SUGGESTIONS: usize = 3;

// ============================================================================
// Scoring Weights
// ============================================================================

/// Per-facet weights; goal is the dominant intent signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchWeights {
    pub duration: u32,
    pub goal: u32,
    pub place: u32,
    pub budget: u32,
}

impl Default for MatchWeights {
    fn default() -> Self {
        Self {
            duration: 3,
            goal: 4,
            place: 3,
            budget: 3,
        }
    }
}

impl MatchWeights {
    pub fn get(&self, facet: Facet) -> u32 {
        match facet {
            Facet::Duration => self.duration,
            Facet::Goal => self.goal,
            Facet::Place => self.place,
            Facet::Budget => self.budget,
        }
    }
}

// ============================================================================
// Output Types
// ============================================================================

/// How a suggestion got into the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchKind {
    Strict,
    Fallback,
}

impl MatchKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchKind::Strict => "strict",
            MatchKind::Fallback => "fallback",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    #[serde(flatten)]
    pub action: Action,

    #[serde(rename = "match")]
    pub kind: MatchKind,

    pub score: u32,
}

// ============================================================================
// Matcher
// ============================================================================

#[derive(Debug, Clone, Copy)]
pub struct Matcher {
    pub weights: MatchWeights,
    /// Points below the best non-strict score still admitted to the fallback band
    pub tolerance: u32,
}

impl Default for Matcher {
    fn default() -> Self {
        Self {
            weights: MatchWeights::default(),
            tolerance: 2,
        }
    }
}

impl Matcher {
    /// Whether the action's tag set for `facet` contains `value`.
    /// Place values on both sides go through the mode alias table first.
    pub fn matches_facet(&self, action: &Action, facet: Facet, value: &str, mode: Mode) -> bool {
        let tags = action.tags.get(facet);
        match facet {
            Facet::Place => {
                let wanted = normalize_place(value, mode);
                tags.iter().any(|t| normalize_place(t, mode) == wanted)
            }
            _ => tags.iter().any(|t| t == value),
        }
    }

    pub fn matches_all(&self, action: &Action, selection: &Selection, mode: Mode) -> bool {
        Facet::ALL
            .iter()
            .all(|f| self.matches_facet(action, *f, selection.get(*f), mode))
    }

    /// Weighted sum of facet hits.
    pub fn score(&self, action: &Action, selection: &Selection, mode: Mode) -> u32 {
        Facet::ALL
            .iter()
            .filter(|f| self.matches_facet(action, **f, selection.get(**f), mode))
            .map(|f| self.weights.get(*f))
            .sum()
    }

    /// Sum of weights over facets the action declares; 1 when it declares none.
    pub fn max_score(&self, action: &Action) -> u32 {
        let max: u32 = Facet::ALL
            .iter()
            .filter(|f| !action.tags.get(**f).is_empty())
            .map(|f| self.weights.get(*f))
            .sum();
        max.max(1)
    }

    /// Up to `count` distinct suggestions, strict matches first.
    pub fn select<R: Rng + ?Sized>(
        &self,
        catalog: &[Action],
        selection: &Selection,
        mode: Mode,
        count: usize,
        rng: &mut R,
    ) -> Vec<Suggestion> {
        if count == 0 {
            return Vec::new();
        }

        let base: Vec<&Action> = catalog.iter().filter(|a| a.is_applicable(mode)).collect();

        let mut strict: Vec<&Action> = base
            .iter()
            .copied()
            .filter(|a| self.matches_all(a, selection, mode))
            .collect();
        let picked = draw(&mut strict, count, rng);

        let mut suggestions: Vec<Suggestion> = picked
            .iter()
            .map(|a| Suggestion {
                action: a.with_steps(),
                kind: MatchKind::Strict,
                score: self.score(a, selection, mode),
            })
            .collect();

        debug!(
            "{} applicable, {} strict, {} drawn strict",
            base.len(),
            strict.len(),
            suggestions.len()
        );

        if suggestions.len() == count {
            return suggestions;
        }

        let mut rest: Vec<(&Action, u32)> = base
            .iter()
            .filter(|a| !picked.iter().any(|p| p.id == a.id))
            .map(|a| (*a, self.score(a, selection, mode)))
            .collect();
        rest.sort_by(|a, b| b.1.cmp(&a.1));

        let top = rest.first().map(|(_, s)| *s).unwrap_or(0);
        let floor = top.saturating_sub(self.tolerance);
        let mut band: Vec<(&Action, u32)> = rest
            .iter()
            .copied()
            .filter(|(_, s)| *s >= floor)
            .collect();
        if band.is_empty() {
            band = rest;
        }

        let needed = count - suggestions.len();
        let fill = draw(&mut band, needed, rng);
        debug!("Fallback band top={} floor={} size={}", top, floor, band.len());

        suggestions.extend(fill.into_iter().map(|(a, score)| Suggestion {
            action: a.with_steps(),
            kind: MatchKind::Fallback,
            score,
        }));
        suggestions
    }

    /// Best normalized fit (0-100) anywhere in the applicable catalog.
    pub fn fit_percent(&self, catalog: &[Action], selection: &Selection, mode: Mode) -> u8 {
        let mut best = 0u32;
        for action in catalog.iter().filter(|a| a.is_applicable(mode)) {
            let raw = self.score(action, selection, mode);
            let pct = (f64::from(raw) / f64::from(self.max_score(action)) * 100.0).round() as u32;
            best = best.max(pct);
            if best >= 100 {
                break;
            }
        }
        best.min(100) as u8
    }
}

/// Uniform draw of up to `n` items without replacement, in draw order.
fn draw<T: Copy, R: Rng + ?Sized>(pool: &mut [T], n: usize, rng: &mut R) -> Vec<T> {
    let n = n.min(pool.len());
    let (head, _) = pool.partial_shuffle(rng, n);
    head.to_vec()
}

// ============================================================================
// Tests
// ============================================================================
