//! QuickRef CLI
//!
//! Terminal front end for the QuickRef core: the host-shell role. Query
//! routing (the `cs:` prefixes), offline fallback, and usage-aware
//! re-ranking all live here, above the aggregation engine.

use clap::{Parser, Subcommand};
use tracing::info;

use quickref_core::config::load_settings;
use quickref_core::engine::CheatSheetEngine;
use quickref_core::favorites::FavoritesStore;
use quickref_core::history::UsageTracker;
use quickref_core::item::CheatSheetItem;
use quickref_core::{offline, tracing_init};

#[derive(Parser, Debug)]
#[command(name = "quickref")]
#[command(version, about = "Find cheat sheets and command examples instantly", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search the enabled sources, falling back to the offline catalog
    Search {
        /// Search term, e.g. "git rm"
        term: Vec<String>,

        /// Skip the network sources and use only the bundled catalog
        #[arg(long, env = "QUICKREF_OFFLINE")]
        offline: bool,
    },

    /// Browse one offline category (git, docker, kubectl, ...)
    Browse {
        category: String,
    },

    /// Autocomplete suggestions for a partial query
    Suggest {
        term: Vec<String>,
    },

    /// Manage favorite commands
    Fav {
        #[command(subcommand)]
        action: FavAction,
    },

    /// Show your most-used commands
    Popular,

    /// Record that a command was used (feeds popular/personalized ranking)
    Record {
        command: String,

        /// Search term that led to this command
        #[arg(long)]
        term: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
enum FavAction {
    /// List favorites, optionally filtered
    List {
        term: Vec<String>,
    },
    /// Add a favorite
    Add {
        command: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, default_value = "manual")]
        source: String,
        #[arg(long, default_value = "")]
        url: String,
    },
    /// Remove a favorite by command (and optionally source)
    Remove {
        command: String,
        #[arg(long)]
        source: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_init::init_tracing("quickref=warn", false);
    let cli = Cli::parse();

    match cli.command {
        Command::Search { term, offline } => run_search(&term.join(" "), offline).await,
        Command::Browse { category } => run_browse(&category),
        Command::Suggest { term } => run_suggest(&term.join(" ")),
        Command::Fav { action } => run_fav(action),
        Command::Popular => run_popular(),
        Command::Record { command, term } => run_record(&command, term.as_deref()),
    }
}

async fn run_search(term: &str, offline_only: bool) -> anyhow::Result<()> {
    // The cs: prefixes route to favorites, trending, or category browsing
    // before any source is touched.
    if let Some(special) = term.trim().strip_prefix("cs:") {
        return match special.to_lowercase().as_str() {
            "fav" | "favorites" => run_fav(FavAction::List { term: Vec::new() }),
            "popular" | "trending" => run_popular(),
            category if !category.is_empty() => run_browse(category),
            _ => run_popular(),
        };
    }

    let settings = load_settings()?;
    let options = settings.to_source_options();

    let mut results = if offline_only {
        Vec::new()
    } else {
        let engine = CheatSheetEngine::new()?;
        engine.search(term, &options).await
    };

    if results.is_empty() {
        info!(term, "no online results, falling back to offline catalog");
        results = offline::search(term);
    }

    // Personalized re-ranking happens above the engine so cached entries
    // stay untouched.
    let tracker = UsageTracker::new()?;
    for item in &mut results {
        item.score += tracker.usage_score(&item.command);
    }
    results.sort_by(|a, b| b.score.cmp(&a.score));

    if results.is_empty() {
        print_line("No results. Try a broader term or `quickref suggest`.");
        return Ok(());
    }

    print_items(&results);
    Ok(())
}

fn run_browse(category: &str) -> anyhow::Result<()> {
    let items = offline::get_by_category(category);
    if items.is_empty() {
        print_line(&format!(
            "Unknown category '{category}'. Known: {}",
            offline::categories().join(", ")
        ));
        return Ok(());
    }
    print_items(&items);
    Ok(())
}

fn run_suggest(term: &str) -> anyhow::Result<()> {
    // No HTTP client or cache needed; the suggestion tables are static.
    let mut suggestions = quickref_core::engine::suggest_topics(term);

    // Personal history first when it has anything relevant to say.
    if let Ok(tracker) = UsageTracker::new() {
        let personal = tracker.personalized_suggestions(term, 3);
        for (i, s) in personal.into_iter().enumerate() {
            if !suggestions.contains(&s) {
                suggestions.insert(i.min(suggestions.len()), s);
            }
        }
        suggestions.truncate(6);
    }

    for suggestion in suggestions {
        print_line(&suggestion);
    }
    Ok(())
}

fn run_fav(action: FavAction) -> anyhow::Result<()> {
    let mut store = FavoritesStore::new()?;
    match action {
        FavAction::List { term } => {
            let items = store.search(&term.join(" "));
            if items.is_empty() {
                print_line("No favorites yet. Add one with `quickref fav add <command>`.");
            } else {
                print_items(&items);
            }
        }
        FavAction::Add {
            command,
            description,
            source,
            url,
        } => {
            let item = CheatSheetItem {
                title: command.clone(),
                description,
                command,
                url,
                source_name: source,
                score: 1,
            };
            store.add(&item);
            print_line(&format!("Added '{}' to favorites.", item.command));
        }
        FavAction::Remove { command, source } => {
            if store.remove_by_command(&command, source.as_deref()) {
                print_line(&format!("Removed '{command}' from favorites."));
            } else {
                print_line(&format!("'{command}' is not in favorites."));
            }
        }
    }
    Ok(())
}

fn run_popular() -> anyhow::Result<()> {
    let tracker = UsageTracker::new()?;
    let popular = tracker.popular_commands(8);

    if popular.is_empty() {
        // Nothing recorded yet; seed from the offline catalog instead.
        print_line("No usage history yet. Popular commands to get started:");
        for command in ["git status", "docker ps", "python -m venv venv", "npm install"] {
            print_line(&format!("  {command}"));
        }
        return Ok(());
    }

    for command in popular {
        print_line(&command);
    }
    Ok(())
}

fn run_record(command: &str, term: Option<&str>) -> anyhow::Result<()> {
    let mut tracker = UsageTracker::new()?;
    tracker.record_usage(command, term);
    print_line(&format!("Recorded use of '{command}'."));
    Ok(())
}

#[allow(clippy::print_stdout)]
fn print_items(items: &[CheatSheetItem]) {
    for item in items {
        println!("{:>4}  {}  [{}]", item.score, item.command, item.source_name);
        if !item.description.is_empty() {
            println!("      {}", item.description);
        }
    }
}

#[allow(clippy::print_stdout)]
fn print_line(line: &str) {
    println!("{line}");
}
