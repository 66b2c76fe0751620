//! Decision Router - four-facet action suggestions
//!
//! Pick a duration, goal, place and budget; get back up to three actions from a
//! fixed catalog, exact matches first, near misses after.
//!
//! # Pieces
//! - [`generator`]: seeded, reproducible catalog synthesis from [`templates`]
//! - [`matcher`]: weighted scoring, strict draw, fallback band
//! - [`facets`]: modes, option tables, selection resolution
//! - [`gate`]: once-per-day gate action over an injected key-value store

pub mod catalog;
pub mod error;
pub mod facets;
pub mod gate;
pub mod generator;
pub mod matcher;
pub mod rng;
pub mod templates;

pub use catalog::{Action, Tags};
pub use error::{Result, RouterError};
pub use facets::{Facet, Mode, RawSelection, Selection};
pub use generator::{generate_catalog, GeneratorConfig};
pub use matcher::{MatchKind, MatchWeights, Matcher, Suggestion};
pub use templates::PhraseTables;
