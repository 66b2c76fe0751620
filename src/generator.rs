//! Deterministic catalog generation.
//!
//! The full duration × goal × place × budget cross-product is shuffled with
//! the seeded stream and truncated to the target count. Each tuple then gets
//! one synthesized action, re-drawn while its (title, steps) signature
//! collides with an earlier one.

use crate::catalog::{Action, Tags};
use crate::rng::Mulberry32;
use crate::templates::{lookup, PhraseTables, StepLayout, TemplateFamily};
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;
use tracing::{debug, info, warn};

// ============================================================================
// Configuration
// ============================================================================

/// Version tag the shipped catalog is generated from
pub const DEFAULT_SEED: &str = "boss-actions-v2";

pub const MIN_STEPS: usize = 3;
pub const MAX_STEPS: usize = 5;

#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub seed: String,
    /// Number of actions to produce
    pub target_count: usize,
    /// Synthesis attempts per tuple before a collision is accepted
    pub max_attempts: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED.to_string(),
            target_count: 250,
            max_attempts: 40,
        }
    }
}

/// One cell of the facet cross-product.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Combo {
    pub duration: &'static str,
    pub goal: &'static str,
    pub place: &'static str,
    pub budget: &'static str,
}

// ============================================================================
// Text Helpers
// ============================================================================

lazy_static! {
    static ref RE_DURATION_WORDS: Regex = Regex::new(r"10分|30分|1時間|半日").unwrap();
    static ref RE_SPACES: Regex = Regex::new(r"\s+").unwrap();
}

/// Remove duration words from a title and collapse whitespace.
pub fn strip_duration_words(title: &str) -> String {
    let stripped = RE_DURATION_WORDS.replace_all(title, "");
    RE_SPACES.replace_all(&stripped, " ").trim().to_string()
}

/// Trim, drop empties and duplicates (first occurrence wins, case-insensitive),
/// then keep at most `MAX_STEPS`. May return fewer than `MIN_STEPS`.
pub fn clamp_steps<I, S>(candidates: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    let mut steps: Vec<String> = Vec::new();
    for candidate in candidates {
        let step = candidate.as_ref().trim();
        if step.is_empty() || !seen.insert(step.to_lowercase()) {
            continue;
        }
        steps.push(step.to_string());
    }
    steps.truncate(MAX_STEPS);
    steps
}

fn signature(title: &str, steps: &[String]) -> String {
    format!("{}||{}", title, steps.join("||"))
}

// ============================================================================
// Generation
// ============================================================================

/// Cross-product in duration, goal, place, budget nesting order.
pub fn all_combos(tables: &PhraseTables) -> Vec<Combo> {
    let mut combos = Vec::with_capacity(tables.combination_count());
    for &duration in tables.durations {
        for &goal in tables.goals {
            for &place in tables.places {
                for &budget in tables.budgets {
                    combos.push(Combo {
                        duration,
                        goal,
                        place,
                        budget,
                    });
                }
            }
        }
    }
    combos
}

/// Title and steps before ids and tags are attached.
#[derive(Debug, Clone)]
struct Draft {
    title: String,
    steps: Vec<String>,
}

fn synthesize(
    family: &TemplateFamily,
    combo: &Combo,
    tables: &PhraseTables,
    rng: &mut Mulberry32,
) -> Draft {
    let verb = rng.pick(family.verbs).copied().unwrap_or("");
    let constraint = rng.pick(tables.constraints).copied().unwrap_or("");
    let game = rng.pick(tables.micro_games).copied().unwrap_or("");
    let title = rng.pick(family.titles).copied().unwrap_or("");
    let hook = rng
        .pick(lookup(family.place_hooks, combo.place))
        .copied()
        .unwrap_or("");
    let timed = rng
        .pick(lookup(family.by_duration, combo.duration))
        .copied()
        .unwrap_or("");
    let budget = rng
        .pick(lookup(family.by_budget, combo.budget))
        .copied()
        .unwrap_or("");
    let ending = rng.pick(tables.endings).copied().unwrap_or("");

    let candidates = match family.layout {
        StepLayout::HookThenTime => [
            format!("{}。{}", hook, constraint),
            timed.to_string(),
            game.to_string(),
            budget.to_string(),
            ending.to_string(),
        ],
        StepLayout::HookThenAnnotatedTime => [
            format!("{}。{}", hook, constraint),
            format!("{}（{}）", timed, verb),
            game.to_string(),
            budget.to_string(),
            ending.to_string(),
        ],
        StepLayout::HookJoinedWithTime => [
            format!("{}{}", hook, timed),
            constraint.to_string(),
            game.to_string(),
            budget.to_string(),
            ending.to_string(),
        ],
    };

    Draft {
        title: strip_duration_words(&title.replace("{verb}", verb)),
        steps: clamp_steps(candidates),
    }
}

/// Generate the catalog. The same config and tables always yield the same output.
pub fn generate_catalog(config: &GeneratorConfig, tables: &PhraseTables) -> Vec<Action> {
    let mut rng = Mulberry32::from_seed_str(&config.seed);

    let mut combos = all_combos(tables);
    rng.shuffle(&mut combos);
    if combos.len() < config.target_count {
        warn!(
            "Only {} facet combinations for a target of {}; catalog will be smaller",
            combos.len(),
            config.target_count
        );
    }
    combos.truncate(config.target_count);

    let mut used: HashSet<String> = HashSet::new();
    let mut catalog = Vec::with_capacity(combos.len());

    for (i, combo) in combos.iter().enumerate() {
        let id = format!("a{:03}", i + 1);
        let Some(family) = tables.family_for(combo.goal) else {
            warn!("No template families; stopping at {}", id);
            break;
        };

        let mut draft = None;
        let mut accepted = false;
        for attempt in 0..config.max_attempts.max(1) {
            let candidate = synthesize(family, combo, tables, &mut rng);
            let key = signature(&candidate.title, &candidate.steps);
            let fresh = candidate.steps.len() >= MIN_STEPS && !used.contains(&key);
            draft = Some(candidate);
            if fresh {
                used.insert(key);
                accepted = true;
                if attempt > 0 {
                    debug!("{} accepted after {} re-draws", id, attempt);
                }
                break;
            }
        }

        if !accepted {
            warn!(
                "{} ({:?}) kept a duplicate or short draft after {} attempts",
                id, combo, config.max_attempts
            );
        }

        let Some(draft) = draft else {
            continue;
        };
        catalog.push(Action {
            id,
            title: draft.title,
            steps: draft.steps,
            tags: Tags::single(combo.duration, combo.goal, combo.place, combo.budget),
            modes: Vec::new(),
            note: None,
        });
    }

    info!("Generated {} actions from seed {:?}", catalog.len(), config.seed);
    catalog
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::to_json;
    use crate::facets::Facet;
    use md5::{Digest, Md5};

    fn builtin_catalog() -> Vec<Action> {
        generate_catalog(&GeneratorConfig::default(), PhraseTables::builtin())
    }

    #[test]
    fn test_generation_is_deterministic() {
        let a = builtin_catalog();
        let b = builtin_catalog();
        assert_eq!(a, b);
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }

    #[test]
    fn test_cardinality_and_ids() {
        let catalog = builtin_catalog();
        assert_eq!(catalog.len(), 250);
        assert_eq!(catalog[0].id, "a001");
        assert_eq!(catalog[249].id, "a250");

        let ids: HashSet<&str> = catalog.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids.len(), 250);
    }

    #[test]
    fn test_step_bounds_and_titles() {
        for action in builtin_catalog() {
            assert!(
                (MIN_STEPS..=MAX_STEPS).contains(&action.steps.len()),
                "{} has {} steps",
                action.id,
                action.steps.len()
            );
            for word in ["10分", "30分", "1時間", "半日"] {
                assert!(!action.title.contains(word), "{}: {}", action.id, action.title);
            }
            assert!(!action.title.contains("{verb}"));
        }
    }

    #[test]
    fn test_every_facet_value_is_covered() {
        let tables = PhraseTables::builtin();
        let catalog = builtin_catalog();
        let domains: [(Facet, &[&str]); 4] = [
            (Facet::Duration, tables.durations),
            (Facet::Goal, tables.goals),
            (Facet::Place, tables.places),
            (Facet::Budget, tables.budgets),
        ];
        for (facet, values) in domains {
            for value in values {
                assert!(
                    catalog.iter().any(|a| a.tags.get(facet).iter().any(|t| t == value)),
                    "{}={} never generated",
                    facet,
                    value
                );
            }
        }
    }

    #[test]
    fn test_tuples_are_distinct() {
        let catalog = builtin_catalog();
        let tuples: HashSet<_> = catalog
            .iter()
            .map(|a| (a.tags.duration.clone(), a.tags.goal.clone(), a.tags.place.clone(), a.tags.budget.clone()))
            .collect();
        assert_eq!(tuples.len(), 250);
    }

    #[test]
    fn test_different_seed_changes_catalog() {
        let other = GeneratorConfig {
            seed: "boss-actions-v3".to_string(),
            ..GeneratorConfig::default()
        };
        assert_ne!(builtin_catalog(), generate_catalog(&other, PhraseTables::builtin()));
    }

    #[test]
    fn test_small_target_is_prefix_sized() {
        let config = GeneratorConfig {
            target_count: 12,
            ..GeneratorConfig::default()
        };
        let catalog = generate_catalog(&config, PhraseTables::builtin());
        assert_eq!(catalog.len(), 12);
        assert_eq!(catalog[11].id, "a012");
    }

    #[test]
    fn test_target_above_cross_product_is_capped() {
        let config = GeneratorConfig {
            target_count: 300,
            ..GeneratorConfig::default()
        };
        assert_eq!(generate_catalog(&config, PhraseTables::builtin()).len(), 256);
    }

    #[test]
    fn test_strip_duration_words() {
        assert_eq!(strip_duration_words("30分 で 回復"), "で 回復");
        assert_eq!(strip_duration_words("半日の冒険"), "の冒険");
        assert_eq!(strip_duration_words("  静けさ  "), "静けさ");
    }

    #[test]
    fn test_clamp_steps() {
        assert_eq!(clamp_steps([" a ", "A", "b", "", "c"]), vec!["a", "b", "c"]);
        assert_eq!(clamp_steps(["1", "2", "3", "4", "5", "6"]).len(), 5);
        assert_eq!(clamp_steps(["x", "x ", " x"]), vec!["x"]);
    }

    #[test]
    fn test_layouts() {
        let tables = PhraseTables::builtin();
        let combo = Combo {
            duration: "10",
            goal: "fun",
            place: "home",
            budget: "0",
        };
        let family = tables.family_for("fun").unwrap();
        let draft = synthesize(family, &combo, tables, &mut Mulberry32::new(1));
        let hooks = lookup(family.place_hooks, "home");
        assert!(hooks.iter().any(|h| draft.steps[0].starts_with(h)));
        assert!(tables.constraints.contains(&draft.steps[1].as_str()));

        let growth = tables.family_for("growth").unwrap();
        let combo = Combo { goal: "growth", ..combo };
        let draft = synthesize(growth, &combo, tables, &mut Mulberry32::new(1));
        assert!(draft.steps[0].contains('。'));
        assert!(draft.steps[1].ends_with('）'));
    }

    #[test]
    fn test_first_and_last_records_are_pinned() {
        let catalog = builtin_catalog();

        let first = &catalog[0];
        assert_eq!(first.id, "a001");
        assert_eq!(first.title, "持ち物の最適化");
        assert_eq!(
            first.steps,
            vec![
                "予定の棚卸し。椅子から立ってやる",
                "部屋をゾーンで攻略",
                "コインで決める（表=続行/裏=終了）",
                "便利で短縮してOK",
                "深呼吸して完了",
            ]
        );
        assert_eq!(first.tags, Tags::single("180", "life", "online", "mid"));

        let last = &catalog[249];
        assert_eq!(last.title, "ルールを作って遊ぶ");
        assert_eq!(last.steps[0], "川/公園で短いレビューを1本書く");
        assert_eq!(last.tags, Tags::single("30", "fun", "outside", "high"));
    }

    #[test]
    fn test_shipped_catalog_digest() {
        let json = to_json(&builtin_catalog()).unwrap();
        let digest = format!("{:x}", Md5::digest(json.as_bytes()));
        assert_eq!(digest, "027269309522beb28ee428e518fac4fc");
    }

    // One combination per goal/place/budget, two durations sharing every phrase:
    // both tuples synthesize the same signature.
    static COLLIDING: PhraseTables = PhraseTables {
        durations: &["10", "30"],
        goals: &["life"],
        places: &["home"],
        budgets: &["0"],
        constraints: &["c"],
        micro_games: &["g"],
        endings: &["e"],
        families: &[TemplateFamily {
            goal: "life",
            verbs: &[],
            titles: &["t"],
            place_hooks: &[("home", &["h"])],
            by_duration: &[("10", &["d"]), ("30", &["d"])],
            by_budget: &[("0", &["b"])],
            layout: StepLayout::HookThenTime,
        }],
    };

    // Every phrase collapses to two distinct steps.
    static SHORT: PhraseTables = PhraseTables {
        durations: &["10"],
        goals: &["fun"],
        places: &["home"],
        budgets: &["0"],
        constraints: &["x"],
        micro_games: &["x"],
        endings: &["x"],
        families: &[TemplateFamily {
            goal: "fun",
            verbs: &[],
            titles: &["t"],
            place_hooks: &[("home", &["h"])],
            by_duration: &[("10", &["d"])],
            by_budget: &[("0", &["x"])],
            layout: StepLayout::HookJoinedWithTime,
        }],
    };

    // The constraint decides between two and three distinct steps.
    static SOMETIMES_SHORT: PhraseTables = PhraseTables {
        durations: &["10"],
        goals: &["fun"],
        places: &["home"],
        budgets: &["0"],
        constraints: &["x", "c"],
        micro_games: &["g"],
        endings: &["x"],
        families: &[TemplateFamily {
            goal: "fun",
            verbs: &[],
            titles: &["t"],
            place_hooks: &[("home", &["x"])],
            by_duration: &[("10", &[""])],
            by_budget: &[("0", &["x"])],
            layout: StepLayout::HookJoinedWithTime,
        }],
    };

    fn small_config(target_count: usize, max_attempts: usize) -> GeneratorConfig {
        GeneratorConfig {
            target_count,
            max_attempts,
            ..GeneratorConfig::default()
        }
    }

    #[test]
    fn test_exhausted_retries_keep_the_duplicate() {
        let catalog = generate_catalog(&small_config(2, 3), &COLLIDING);
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog[1].id, "a002");
        assert_eq!(catalog[0].title, catalog[1].title);
        assert_eq!(catalog[0].steps, catalog[1].steps);
        assert_ne!(catalog[0].tags, catalog[1].tags);
    }

    #[test]
    fn test_short_drafts_are_kept_when_nothing_better_exists() {
        let catalog = generate_catalog(&small_config(1, 4), &SHORT);
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog[0].steps, vec!["hd", "x"]);
    }

    #[test]
    fn test_short_drafts_are_redrawn() {
        for seed in ["s1", "s2", "s3", "s4", "s5"] {
            let config = GeneratorConfig {
                seed: seed.to_string(),
                ..small_config(1, 40)
            };
            let catalog = generate_catalog(&config, &SOMETIMES_SHORT);
            assert_eq!(catalog[0].steps, vec!["x", "c", "g"], "seed {}", seed);
        }
    }
}
