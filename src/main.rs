//! `drouter` - command-line front end for the decision router
//!
//! # Commands
//! - `generate`: emit the seeded catalog as JSON
//! - `suggest`: draw suggestions for a selection
//! - `fit`: best achievable fit for a selection
//! - `gate`: show (and optionally complete) today's gate action
//!
//! Logs go to stderr (`RUST_LOG=debug` for detail); stdout carries only output.

use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use decision_router::catalog::{self, Action};
use decision_router::facets::{self, parse_query, Facet, Mode, RawSelection, Selection};
use decision_router::gate::{self, JsonFileStore};
use decision_router::generator::{generate_catalog, GeneratorConfig, DEFAULT_SEED};
use decision_router::matcher::{MatchKind, Matcher, Suggestion, DEFAULT_SUGGESTIONS};
use decision_router::templates::PhraseTables;
use decision_router::Result;
use serde::Serialize;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::{debug, error, info};

// ============================================================================
// CLI
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "drouter", version, about = "Pick four facets, get three things to do")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate the catalog
    Generate {
        /// Version tag the stream is seeded from
        #[arg(long, default_value = DEFAULT_SEED)]
        seed: String,

        /// Number of actions
        #[arg(long, default_value_t = GeneratorConfig::default().target_count)]
        count: usize,

        /// Write to a file instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Draw suggestions for a selection
    Suggest {
        #[command(flatten)]
        selection: SelectionArgs,

        /// How many suggestions to draw
        #[arg(long, default_value_t = DEFAULT_SUGGESTIONS)]
        count: usize,

        #[arg(long)]
        json: bool,
    },

    /// Best achievable fit (0-100) for a selection
    Fit {
        #[command(flatten)]
        selection: SelectionArgs,
    },

    /// Today's gate action
    Gate {
        #[command(flatten)]
        selection: SelectionArgs,

        /// Mark the gate as done for today
        #[arg(long)]
        done: bool,

        /// Store file (default ~/.decision-router/store.json)
        #[arg(long)]
        store: Option<PathBuf>,

        #[arg(long)]
        json: bool,
    },
}

#[derive(Args, Debug)]
struct SelectionArgs {
    /// student or general
    #[arg(long)]
    mode: Option<String>,

    /// Duration: 10, 30, 60, 180
    #[arg(long)]
    time: Option<String>,

    /// Goal: recover, growth, life, fun
    #[arg(long)]
    goal: Option<String>,

    /// Place: home, school, outside, online
    #[arg(long)]
    place: Option<String>,

    /// Budget: 0, low, mid, high
    #[arg(long)]
    money: Option<String>,

    /// Share-link query, e.g. "mode=general&time=60&goal=fun"
    #[arg(long)]
    query: Option<String>,

    /// Catalog JSON; generated from the default seed when absent
    #[arg(long)]
    catalog: Option<PathBuf>,
}

impl SelectionArgs {
    /// Flags override the query; both fall back to mode defaults.
    fn resolve(&self) -> (Mode, Selection) {
        let (query_mode, base) = match &self.query {
            Some(q) => parse_query(q),
            None => (Mode::default(), Selection::defaults(Mode::default())),
        };
        let mode = self
            .mode
            .as_deref()
            .map(Mode::parse_lenient)
            .unwrap_or(query_mode);
        let base = base.switch_mode(mode);

        let raw = RawSelection {
            duration: Some(self.time.clone().unwrap_or(base.duration)),
            goal: Some(self.goal.clone().unwrap_or(base.goal)),
            place: Some(self.place.clone().unwrap_or(base.place)),
            budget: Some(self.money.clone().unwrap_or(base.budget)),
        };
        (mode, Selection::resolve(mode, &raw))
    }

    fn load_catalog(&self) -> Result<Vec<Action>> {
        match &self.catalog {
            Some(path) => catalog::load_catalog(path),
            None => {
                debug!("No catalog given, generating from {:?}", DEFAULT_SEED);
                Ok(generate_catalog(
                    &GeneratorConfig::default(),
                    PhraseTables::builtin(),
                ))
            }
        }
    }
}

// ============================================================================
// Output
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SuggestOutput<'a> {
    mode: Mode,
    selection: &'a Selection,
    share_query: String,
    fit_percent: u8,
    suggestions: &'a [Suggestion],
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GateOutput<'a> {
    date: String,
    done: bool,
    action: &'a Action,
}

const SLOT_LABELS: [&str; 3] = ["行動A（おすすめ）", "行動B", "行動C"];

fn print_selection(mode: Mode, selection: &Selection) {
    let pills: Vec<String> = Facet::ALL
        .iter()
        .map(|f| facets::label_for(mode, *f, selection.get(*f)).to_string())
        .collect();
    println!("[{}] {}", mode.as_str().cyan(), pills.join(" / ").bold());
}

fn print_steps(action: &Action) {
    for (i, step) in action.display_steps().iter().enumerate() {
        println!("   {}. {}", i + 1, step);
    }
}

fn print_suggestions(suggestions: &[Suggestion]) {
    if suggestions.is_empty() {
        println!("{}", "No suggestions available for this mode.".yellow());
        return;
    }
    for (idx, s) in suggestions.iter().enumerate() {
        let slot = SLOT_LABELS
            .get(idx)
            .map(|l| l.to_string())
            .unwrap_or_else(|| format!("行動{}", idx + 1));
        let kind = match s.kind {
            MatchKind::Strict => "厳密".green(),
            MatchKind::Fallback => "近い候補から救済".yellow(),
        };
        println!("{} · {}", slot.bold(), s.action.title);
        print_steps(&s.action);
        println!("   {} {} / スコア {}", "一致:".dimmed(), kind, s.score);
        debug!("{} {} score={}", s.action.id, s.kind.as_str(), s.score);
    }
}

// ============================================================================
// Main Entry Point
// ============================================================================

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        error!("Error: {}", e);
        eprintln!("{} {}", "error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Generate { seed, count, out } => {
            let config = GeneratorConfig {
                seed,
                target_count: count,
                ..GeneratorConfig::default()
            };
            let actions = generate_catalog(&config, PhraseTables::builtin());
            let json = catalog::to_json(&actions)?;
            match out {
                Some(path) => {
                    fs::write(&path, json)?;
                    info!("Wrote {} actions to {:?}", actions.len(), path);
                }
                None => writeln!(io::stdout(), "{}", json)?,
            }
        }

        Command::Suggest {
            selection,
            count,
            json,
        } => {
            let (mode, sel) = selection.resolve();
            let actions = selection.load_catalog()?;
            let matcher = Matcher::default();

            let suggestions = matcher.select(&actions, &sel, mode, count, &mut rand::thread_rng());
            let fit = matcher.fit_percent(&actions, &sel, mode);
            info!("{} suggestions for {}", suggestions.len(), sel.to_query(mode));

            if json {
                let output = SuggestOutput {
                    mode,
                    selection: &sel,
                    share_query: sel.to_query(mode),
                    fit_percent: fit,
                    suggestions: &suggestions,
                };
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else {
                print_selection(mode, &sel);
                println!("適合 {}%\n", fit);
                print_suggestions(&suggestions);
            }
        }

        Command::Fit { selection } => {
            let (mode, sel) = selection.resolve();
            let actions = selection.load_catalog()?;
            println!("{}", Matcher::default().fit_percent(&actions, &sel, mode));
        }

        Command::Gate {
            selection,
            done,
            store,
            json,
        } => {
            let (mode, sel) = selection.resolve();
            let actions = selection.load_catalog()?;
            let store_path = match store {
                Some(path) => path,
                None => gate::default_store_path()?,
            };
            let mut store = JsonFileStore::open(&store_path)?;
            let today = chrono::Local::now().date_naive();

            let action = gate::todays_action(
                &mut store,
                today,
                &actions,
                &sel,
                mode,
                &Matcher::default(),
                &mut rand::thread_rng(),
            );
            if done {
                gate::mark_done(&mut store, today)?;
            }
            let is_done = gate::is_done_today(&store, today);

            if json {
                let output = GateOutput {
                    date: today.format("%Y-%m-%d").to_string(),
                    done: is_done,
                    action: &action,
                };
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else {
                let status = if is_done { "✅ できた".green() } else { "まだ".yellow() };
                println!("{} {}  ({})", "今の行動".bold(), action.title, status);
                print_steps(&action);
                if let Some(note) = &action.note {
                    println!("   {} {}", "メモ:".dimmed(), note);
                }
            }
        }
    }

    Ok(())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn args(query: Option<&str>) -> SelectionArgs {
        SelectionArgs {
            mode: None,
            time: None,
            goal: None,
            place: None,
            money: None,
            query: query.map(String::from),
            catalog: None,
        }
    }

    #[test]
    fn test_flags_override_query() {
        let mut a = args(Some("mode=general&time=60&goal=fun&place=online&money=mid"));
        a.goal = Some("life".to_string());
        let (mode, sel) = a.resolve();
        assert_eq!(mode, Mode::General);
        assert_eq!(sel.duration, "60");
        assert_eq!(sel.goal, "life");
        assert_eq!(sel.place, "online");
    }

    #[test]
    fn test_mode_flag_remaps_query_place() {
        let mut a = args(Some("mode=student&place=school"));
        a.mode = Some("general".to_string());
        let (mode, sel) = a.resolve();
        assert_eq!(mode, Mode::General);
        assert_eq!(sel.place, "home");
    }

    #[test]
    fn test_defaults_without_input() {
        let (mode, sel) = args(None).resolve();
        assert_eq!(mode, Mode::Student);
        assert_eq!(sel, Selection::defaults(Mode::Student));
    }

    #[test]
    fn test_cli_parses_suggest() {
        let cli = Cli::try_parse_from([
            "drouter", "suggest", "--mode", "general", "--place", "campus", "--count", "1", "--json",
        ])
        .unwrap();
        match cli.command {
            Command::Suggest {
                selection,
                count,
                json,
            } => {
                assert_eq!(count, 1);
                assert!(json);
                let (mode, sel) = selection.resolve();
                assert_eq!(mode, Mode::General);
                assert_eq!(sel.place, "outside");
            }
            other => panic!("unexpected command {:?}", other),
        }
    }
}
