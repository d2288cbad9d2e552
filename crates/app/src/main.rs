use std::fmt;
use std::io::{BufRead, Write as _};
use std::sync::Arc;

use review_core::model::{Choice, Selection};
use review_core::session::ReviewSession;
use services::review::{PersistStatus, ReviewFlowService, ReviewScreen};
use services::{AppServices, Clock};
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDbUrl { raw: String },
    MissingDataset,
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::MissingDataset => write!(f, "--dataset is required (or set VERDICT_DATASET)"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

struct Args {
    db_url: String,
    dataset_path: String,
    fresh: bool,
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- --dataset <questions.json> [--db <sqlite_url>] [--fresh]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --db sqlite:choices.sqlite3  (relative paths resolve against the current directory)");
    eprintln!();
    eprintln!("Flags:");
    eprintln!("  --fresh   ignore previously stored choices when starting");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  VERDICT_DB_URL, VERDICT_DATASET");
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut db_url = std::env::var("VERDICT_DB_URL")
            .ok()
            .map_or_else(default_db_url, normalize_sqlite_url);
        let mut dataset_path = std::env::var("VERDICT_DATASET").ok();
        let mut fresh = false;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = normalize_sqlite_url(value);
                }
                "--dataset" => {
                    dataset_path = Some(require_value(args, "--dataset")?);
                }
                "--fresh" => fresh = true,
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        let dataset_path = dataset_path.ok_or(ArgsError::MissingDataset)?;
        Ok(Self {
            db_url,
            dataset_path,
            fresh,
        })
    }
}

fn default_db_url() -> String {
    // Same normalization as any --db/env value, so the default ends up
    // absolute too.
    normalize_sqlite_url("sqlite:choices.sqlite3".into())
}

fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw;
    }

    let trimmed = raw.trim().to_string();
    let path_str = trimmed
        .strip_prefix("sqlite:")
        .unwrap_or(trimmed.as_str())
        .to_string();
    let path = std::path::Path::new(&path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| std::path::PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = std::path::Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}

/// One keypress worth of reviewer intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Input {
    Select(Choice),
    Back,
    Quit,
}

fn parse_input(line: &str) -> Option<Input> {
    match line.trim() {
        "1" => Some(Input::Select(Choice::ResponseA)),
        "2" => Some(Input::Select(Choice::ResponseB)),
        "b" | "B" => Some(Input::Back),
        "q" | "Q" => Some(Input::Quit),
        _ => None,
    }
}

fn render(screen: &ReviewScreen, session: &ReviewSession) {
    println!();
    match screen {
        ReviewScreen::Question {
            index,
            total,
            question,
            response_a,
            response_b,
            highlighted,
            answered,
        } => {
            let mark = |choice: Choice| {
                if *highlighted == Some(choice) { "*" } else { " " }
            };
            println!("Question {index}/{total} ({answered} answered)");
            println!("{question}");
            println!();
            println!(" [1]{} {response_a}", mark(Choice::ResponseA));
            println!(" [2]{} {response_b}", mark(Choice::ResponseB));
            println!();
            print!("choose [1/2], [b]ack, [q]uit: ");
        }
        ReviewScreen::Completed { total, answered } => {
            println!("All {total} questions reviewed ({answered} answered).");
            println!();
            for (item, selection) in session.items().iter().zip(session.selections()) {
                let label = match selection {
                    Selection::Unset => "-",
                    Selection::Chosen(choice) => choice.label(),
                };
                println!("  {:>3}. {}  ->  {label}", item.index().value(), item.question());
            }
            println!();
            print!("[b]ack to change a choice, [q]uit: ");
        }
    }
    let _ = std::io::stdout().flush();
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let mut argv = std::env::args().skip(1);
    let parsed = Args::parse(&mut argv).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    // Open + migrate SQLite at startup. Keep this in the binary glue so
    // core/services stay pure. A zero-row dataset aborts here, before
    // anything renders.
    prepare_sqlite_file(&parsed.db_url)?;
    let AppServices { storage, dataset } =
        AppServices::init(&parsed.db_url, &parsed.dataset_path).await?;
    tracing::info!(db = %parsed.db_url, questions = dataset.len(), "store ready");

    let service = ReviewFlowService::new(Clock::default_clock(), Arc::clone(&storage.choices));
    let mut session = if parsed.fresh {
        service.start(dataset)?
    } else {
        service.start_resumed(dataset).await?
    };

    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        let screen = ReviewScreen::from_session(&session);
        render(&screen, &session);

        let Some(line) = lines.next().transpose()? else {
            break;
        };
        let Some(input) = parse_input(&line) else {
            println!("unrecognized input: {}", line.trim());
            continue;
        };

        match input {
            Input::Quit => break,
            Input::Back => {
                if session.position() > 1 {
                    service.retreat(&mut session)?;
                } else {
                    println!("already at the first question");
                }
            }
            Input::Select(choice) => {
                if session.is_complete() {
                    println!("review is complete; [b]ack to change a choice");
                    continue;
                }
                let outcome = service.select(&mut session, choice).await?;
                if let PersistStatus::Failed(err) = outcome.persistence {
                    println!("warning: choice not saved ({err}); it will be retried if you re-select");
                }
            }
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_parsing_maps_keys() {
        assert_eq!(parse_input(" 1 "), Some(Input::Select(Choice::ResponseA)));
        assert_eq!(parse_input("2"), Some(Input::Select(Choice::ResponseB)));
        assert_eq!(parse_input("b"), Some(Input::Back));
        assert_eq!(parse_input("Q"), Some(Input::Quit));
        assert_eq!(parse_input("x"), None);
        assert_eq!(parse_input(""), None);
    }

    #[test]
    fn sqlite_urls_normalize_to_absolute() {
        assert_eq!(
            normalize_sqlite_url("sqlite::memory:".into()),
            "sqlite::memory:"
        );
        assert_eq!(
            normalize_sqlite_url("sqlite:///tmp/x.sqlite3".into()),
            "sqlite:///tmp/x.sqlite3"
        );
        let normalized = normalize_sqlite_url("sqlite:choices.sqlite3".into());
        assert!(normalized.starts_with("sqlite://"));
        assert!(normalized.ends_with("choices.sqlite3"));
    }

    #[test]
    fn default_db_url_is_normalized_like_explicit_values() {
        let default = default_db_url();
        assert_eq!(default, normalize_sqlite_url("sqlite:choices.sqlite3".into()));
        assert!(default.starts_with("sqlite://"));
        let path = default.strip_prefix("sqlite://").unwrap();
        assert!(std::path::Path::new(path).is_absolute());
        assert!(path.ends_with("choices.sqlite3"));
    }
}
