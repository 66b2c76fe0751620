//! Generate the shipped catalog and run selections against it.

use decision_router::catalog::{parse_catalog, to_json};
use decision_router::facets::parse_query;
use decision_router::{
    generate_catalog, Action, GeneratorConfig, MatchKind, Matcher, Mode, PhraseTables, Selection,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::HashSet;

fn shipped_catalog() -> Vec<Action> {
    generate_catalog(&GeneratorConfig::default(), PhraseTables::builtin())
}

#[test]
fn catalog_survives_json_roundtrip() {
    let catalog = shipped_catalog();
    let json = to_json(&catalog).unwrap();
    assert_eq!(parse_catalog(&json).unwrap(), catalog);
    assert_eq!(to_json(&shipped_catalog()).unwrap(), json);
}

#[test]
fn every_selection_gets_sound_results() {
    let catalog = shipped_catalog();
    let matcher = Matcher::default();
    let mut rng = ChaCha8Rng::seed_from_u64(7);

    for mode in [Mode::Student, Mode::General] {
        for time in ["10", "30", "60", "180"] {
            for goal in ["recover", "growth", "life", "fun"] {
                for place in ["home", "school", "campus", "outside", "online"] {
                    for money in ["0", "low", "mid", "high"] {
                        let query = format!(
                            "mode={}&time={}&goal={}&place={}&money={}",
                            mode, time, goal, place, money
                        );
                        let (mode, sel) = parse_query(&query);
                        let picked = matcher.select(&catalog, &sel, mode, 3, &mut rng);

                        assert_eq!(picked.len(), 3, "{}", query);
                        let ids: HashSet<&str> =
                            picked.iter().map(|s| s.action.id.as_str()).collect();
                        assert_eq!(ids.len(), 3);

                        for s in &picked {
                            assert!((3..=5).contains(&s.action.steps.len()));
                            if s.kind == MatchKind::Strict {
                                assert!(matcher.matches_all(&s.action, &sel, mode));
                            }
                        }
                        assert!(matcher.fit_percent(&catalog, &sel, mode) <= 100);
                    }
                }
            }
        }
    }
}

#[test]
fn strict_count_follows_catalog_scenario() {
    let catalog = shipped_catalog();
    let matcher = Matcher::default();
    let sel = Selection::defaults(Mode::General);
    let strict_available = catalog
        .iter()
        .filter(|a| matcher.matches_all(a, &sel, Mode::General))
        .count();

    let mut rng = ChaCha8Rng::seed_from_u64(11);
    let picked = matcher.select(&catalog, &sel, Mode::General, 3, &mut rng);
    let strict_drawn = picked.iter().filter(|s| s.kind == MatchKind::Strict).count();
    assert_eq!(strict_drawn, strict_available.min(3));
    assert!(picked
        .iter()
        .skip(strict_drawn)
        .all(|s| s.kind == MatchKind::Fallback));
}

#[test]
fn campus_catalog_entries_serve_school_in_student_mode() {
    let catalog = shipped_catalog();
    let matcher = Matcher::default();
    let campus = catalog
        .iter()
        .find(|a| a.tags.place == vec!["campus"])
        .expect("generated catalog has campus entries");

    let sel = Selection {
        duration: campus.tags.duration[0].clone(),
        goal: campus.tags.goal[0].clone(),
        place: "school".to_string(),
        budget: campus.tags.budget[0].clone(),
    };
    assert!(matcher.matches_all(campus, &sel, Mode::Student));
    assert_eq!(matcher.fit_percent(&catalog, &sel, Mode::Student), 100);
}
