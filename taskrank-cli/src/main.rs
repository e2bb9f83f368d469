mod config;
mod output;
mod prompt;
mod simulate;

use clap::Parser;
use rand::Rng;
use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;
use std::sync::Arc;
use std::future::{Future, pending};
use taskrank_core::{
    ChoiceProvider, ComparisonEngine, EngineConfig, INITIAL_RATING, K_FACTOR, NoticeChannel, RankingSink,
    Session, SessionOutcome, total_comparisons,
};
use tokio::io::{AsyncBufRead, BufReader};
use tokio::sync::Notify;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::TaskrankConfig;
use crate::output::{StderrNotice, TerminalSink};
use crate::prompt::TerminalChooser;

pub fn bail(msg: impl std::fmt::Display) -> ! {
    eprintln!("Error: {msg}");
    std::process::exit(1);
}

#[derive(Parser)]
#[command(name = "taskrank", version, about = "Rank tasks by answering pairwise questions")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Show progress during execution (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Compare every pair of tasks and print them ranked
    Rank(RankArgs),
    /// Create a default config file under $XDG_CONFIG_HOME/taskrank (or ~/.config/taskrank)
    Init {
        /// Where to write the config (default: ~/.config/taskrank/config.toml)
        #[arg(long = "config")]
        path: Option<PathBuf>,
    },
    /// Rank synthetic tasks with a simulated judge and report how well the true order is recovered
    Simulate(SimulateArgs),
}

/// Settings shared by every command that runs the engine.
#[derive(clap::Args)]
struct EngineArgs {
    /// Elo K-factor. Default: 32
    #[arg(long)]
    k_factor: Option<f64>,

    /// Starting rating for every task. Default: 1000
    #[arg(long)]
    initial_rating: Option<f64>,

    /// Output JSON instead of table
    #[arg(long)]
    json: bool,

    /// Path to config file (default: ~/.config/taskrank/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Parser)]
struct RankArgs {
    /// File with one task per line, or a JSON array of strings
    #[arg(long)]
    items: Option<PathBuf>,

    /// Inline task (repeatable)
    #[arg(long = "item")]
    inline_items: Vec<String>,

    /// Question shown above every pair. Default: "Which task is more important?"
    #[arg(long)]
    question: Option<String>,

    #[command(flatten)]
    engine: EngineArgs,
}

#[derive(Parser)]
struct SimulateArgs {
    /// Number of synthetic tasks
    #[arg(long, default_value_t = 10)]
    items: usize,

    /// Probability that the simulated judge picks the truly more important task
    #[arg(long, default_value_t = 1.0)]
    accuracy: f64,

    /// RNG seed. Random when omitted; the seed used is printed either way.
    #[arg(long)]
    seed: Option<u64>,

    #[command(flatten)]
    engine: EngineArgs,
}

/// Parse a string as either a JSON array of strings or plain text (one item per line).
fn parse_items_from_str(content: &str) -> Vec<String> {
    let trimmed = content.trim();
    if trimmed.starts_with('[') {
        let items: Vec<String> = serde_json::from_str(trimmed)
            .unwrap_or_else(|e| bail(format!("Input looks like JSON but failed to parse: {e}")));
        items
            .into_iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    } else {
        trimmed
            .lines()
            .map(|l| l.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }
}

/// Where the tasks came from. Piped tasks occupy stdin, so answers must come from the terminal.
#[derive(Debug, PartialEq)]
enum ItemSource {
    Args,
    Stdin,
}

/// Load tasks from all sources: --items file, --item inline args, or stdin.
fn load_items(args: &RankArgs) -> (Vec<String>, ItemSource) {
    let mut items = Vec::new();

    if let Some(ref path) = args.items {
        let content = std::fs::read_to_string(path)
            .unwrap_or_else(|e| bail(format!("Failed to read items file {}: {e}", path.display())));
        items = parse_items_from_str(&content);
    }

    items.extend(args.inline_items.iter().cloned());

    if !items.is_empty() || args.items.is_some() {
        return (items, ItemSource::Args);
    }

    let mut stdin = io::stdin();
    if stdin.is_terminal() {
        bail("No tasks provided. Use --items <file>, --item <task>, or pipe tasks via stdin.");
    }
    let mut content = String::new();
    stdin
        .read_to_string(&mut content)
        .unwrap_or_else(|e| bail(format!("Failed to read tasks from stdin: {e}")));
    (parse_items_from_str(&content), ItemSource::Stdin)
}

/// Merge CLI args over the config file (CLI wins) into an engine.
fn build_engine(args: &EngineArgs, cfg: &TaskrankConfig) -> ComparisonEngine {
    let config = EngineConfig {
        k_factor: args.k_factor.or(cfg.k_factor).unwrap_or(K_FACTOR),
        initial_rating: args.initial_rating.or(cfg.initial_rating).unwrap_or(INITIAL_RATING),
    };
    ComparisonEngine::new(config).unwrap_or_else(|e| bail(e))
}

fn load_config(args: &EngineArgs) -> TaskrankConfig {
    let config_path = args.config.clone().unwrap_or_else(config::config_path);
    TaskrankConfig::load(&config_path)
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Rank(args) => run_rank(args).await,
        Commands::Simulate(args) => run_simulate(args).await,
        Commands::Init { path } => {
            let path = path.unwrap_or_else(config::config_path);
            TaskrankConfig::write_template(&path);
            println!("Created config at {}", path.display());
            println!("Edit it to set your default question, K-factor, etc.");
        }
    }
}

async fn run_rank(args: RankArgs) {
    let cfg = load_config(&args.engine);
    let engine = build_engine(&args.engine, &cfg);
    let question = args
        .question
        .clone()
        .or(cfg.question)
        .unwrap_or_else(|| prompt::DEFAULT_QUESTION.to_string());
    let json = args.engine.json || cfg.json.unwrap_or(false);

    let (items, source) = load_items(&args);
    let session = engine.open_session(&items).unwrap_or_else(|e| bail(e));
    let comparisons = session.total_comparisons();

    info!(tasks = session.store().len(), comparisons, "opening task comparison session");

    let answers: Box<dyn AsyncBufRead + Unpin> = if comparisons == 0 {
        Box::new(tokio::io::empty())
    } else if source == ItemSource::Stdin {
        match tokio::fs::File::open("/dev/tty").await {
            Ok(tty) => Box::new(BufReader::new(tty)),
            Err(e) => bail(format!("Tasks were piped via stdin but no terminal is available for answers: {e}")),
        }
    } else {
        Box::new(BufReader::new(tokio::io::stdin()))
    };

    let hangup = Arc::new(Notify::new());
    let mut chooser = TerminalChooser::new(answers, question, hangup.clone());
    let mut sink = TerminalSink { json, comparisons };
    let mut notice = StderrNotice;

    let ctrl_c = async {
        if tokio::signal::ctrl_c().await.is_err() {
            pending::<()>().await;
        }
    };
    let outcome = drive_session(session, &mut chooser, &mut sink, &mut notice, &hangup, ctrl_c).await;

    info!("task comparison session closed");

    match outcome {
        Some(Ok(SessionOutcome::Ranked(_))) => {}
        Some(Ok(SessionOutcome::Aborted)) => std::process::exit(1),
        Some(Err(e)) => bail(e),
        None => {
            warn!(comparisons, "session abandoned before every pair was compared");
            eprintln!("Session closed before every pair was compared. No ranking was produced.");
            std::process::exit(1);
        }
    }
}

/// Run `session` until it finishes, the answer stream hangs up, or `shutdown` resolves.
///
/// Returns `None` when the session was dropped before its schedule ran out;
/// the sink has not been called in that case.
async fn drive_session<P, S, N>(
    session: Session,
    chooser: &mut P,
    sink: &mut S,
    notice: &mut N,
    hangup: &Notify,
    shutdown: impl Future<Output = ()>,
) -> Option<taskrank_core::Result<SessionOutcome>>
where
    P: ChoiceProvider,
    S: RankingSink,
    N: NoticeChannel,
{
    tokio::select! {
        outcome = session.run(chooser, sink, notice) => Some(outcome),
        _ = hangup.notified() => None,
        _ = shutdown => None,
    }
}

async fn run_simulate(args: SimulateArgs) {
    if !(0.0..=1.0).contains(&args.accuracy) {
        bail(format!("--accuracy must be between 0.0 and 1.0, got {}", args.accuracy));
    }

    let cfg = load_config(&args.engine);
    let engine = build_engine(&args.engine, &cfg);
    let json = args.engine.json || cfg.json.unwrap_or(false);
    let seed = args.seed.unwrap_or_else(|| rand::rng().random());

    let mut sink = TerminalSink {
        json,
        comparisons: total_comparisons(args.items),
    };
    let mut notice = StderrNotice;

    let report = simulate::run_simulation(&engine, args.items, args.accuracy, seed, &mut sink, &mut notice)
        .await
        .unwrap_or_else(|e| bail(e));

    match report {
        Some(report) => eprintln!(
            "Spearman rank correlation: {:.4} ({} tasks, {} comparisons, accuracy {}, seed {})",
            report.spearman, args.items, report.comparisons, args.accuracy, report.seed,
        ),
        None => std::process::exit(1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskrank_core::Item;

    #[test]
    fn test_parse_plain_lines_drops_blanks() {
        let items = parse_items_from_str("  Buy milk\n\n Write report \n   \nCall dentist\n");
        assert_eq!(items, vec!["Buy milk", "Write report", "Call dentist"]);
    }

    #[test]
    fn test_parse_json_array() {
        let items = parse_items_from_str(r#"["Buy milk", "  ", "Call dentist"]"#);
        assert_eq!(items, vec!["Buy milk", "Call dentist"]);
    }

    #[test]
    fn test_parse_blank_input_is_empty() {
        assert!(parse_items_from_str("\n \n\t\n").is_empty());
    }

    #[test]
    fn test_cli_args_override_config() {
        let cfg = TaskrankConfig {
            k_factor: Some(16.0),
            initial_rating: Some(1200.0),
            ..TaskrankConfig::default()
        };
        let args = EngineArgs {
            k_factor: Some(40.0),
            initial_rating: None,
            json: false,
            config: None,
        };
        let engine = build_engine(&args, &cfg);
        assert_eq!(engine.config().k_factor, 40.0);
        assert_eq!(engine.config().initial_rating, 1200.0);
    }

    #[test]
    fn test_defaults_without_config() {
        let args = EngineArgs {
            k_factor: None,
            initial_rating: None,
            json: false,
            config: None,
        };
        let engine = build_engine(&args, &TaskrankConfig::default());
        assert_eq!(*engine.config(), EngineConfig::default());
    }

    fn three_task_session() -> Session {
        ComparisonEngine::new(EngineConfig::default())
            .unwrap()
            .open_session(["Buy milk", "Write report", "Call dentist"])
            .unwrap()
    }

    #[tokio::test]
    async fn test_answers_running_out_publishes_nothing() {
        let hangup = Arc::new(Notify::new());
        // Three questions, one answer.
        let mut chooser = TerminalChooser::new(b"2\n".as_slice(), prompt::DEFAULT_QUESTION, hangup.clone());
        let mut published = 0;
        let mut notices: Vec<String> = Vec::new();

        let outcome = drive_session(
            three_task_session(),
            &mut chooser,
            &mut |_: &[Item]| published += 1,
            &mut |message: &str| notices.push(message.to_string()),
            &hangup,
            pending(),
        )
        .await;

        assert!(outcome.is_none());
        assert_eq!(published, 0);
        assert!(notices.is_empty());
    }

    #[tokio::test]
    async fn test_shutdown_drops_session() {
        let hangup = Arc::new(Notify::new());
        let mut chooser = TerminalChooser::new(tokio::io::empty(), prompt::DEFAULT_QUESTION, Arc::new(Notify::new()));
        let mut published = 0;

        let outcome = drive_session(
            three_task_session(),
            &mut chooser,
            &mut |_: &[Item]| published += 1,
            &mut |_: &str| {},
            &hangup,
            std::future::ready(()),
        )
        .await;

        assert!(outcome.is_none());
        assert_eq!(published, 0);
    }

    #[tokio::test]
    async fn test_all_answers_publish_once() {
        let hangup = Arc::new(Notify::new());
        let mut chooser = TerminalChooser::new(b"2\n2\n2\n".as_slice(), prompt::DEFAULT_QUESTION, hangup.clone());
        let mut published: Vec<Vec<String>> = Vec::new();

        let outcome = drive_session(
            three_task_session(),
            &mut chooser,
            &mut |ranking: &[Item]| published.push(ranking.iter().map(|item| item.label().to_string()).collect()),
            &mut |_: &str| {},
            &hangup,
            pending(),
        )
        .await;

        assert!(matches!(outcome, Some(Ok(SessionOutcome::Ranked(_)))));
        assert_eq!(published, vec![vec!["Call dentist", "Write report", "Buy milk"]]);
    }

    #[test]
    fn test_cli_parses_rank_and_simulate() {
        let cli = Cli::try_parse_from(["taskrank", "rank", "--item", "a", "--item", "b", "--json"]).unwrap();
        let Commands::Rank(args) = cli.command else {
            panic!("expected rank");
        };
        assert_eq!(args.inline_items, vec!["a", "b"]);
        assert!(args.engine.json);

        let cli = Cli::try_parse_from(["taskrank", "-v", "simulate", "--items", "5", "--seed", "7"]).unwrap();
        assert!(cli.verbose);
        let Commands::Simulate(args) = cli.command else {
            panic!("expected simulate");
        };
        assert_eq!(args.items, 5);
        assert_eq!(args.seed, Some(7));
        assert_eq!(args.accuracy, 1.0);
    }
}
