//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - initializes logging
//! - parses CLI arguments and resolves file locations
//! - answers questions (one-shot or line by line)
//! - refreshes the dataset from Agmarknet

use std::io::{BufRead, Write};

use chrono::Local;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::cli::{AskArgs, ChatArgs, Command, ExtractArgs, FetchArgs, PathArgs};
use crate::data::{AgmarknetClient, clean_snapshot, write_snapshot};
use crate::domain::EngineConfig;
use crate::engine::QaEngine;
use crate::error::AppError;
use crate::report::format_supporting_rows;

pub mod status;

/// Entry point for the `samarth` binary.
pub fn run() -> Result<(), AppError> {
    init_tracing();

    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);
    let config = config_from_args(&cli.paths, EngineConfig::from_env());

    match cli.command {
        Command::Ask(args) => handle_ask(&config, &args),
        Command::Extract(args) => handle_extract(&args),
        Command::Chat(args) => handle_chat(&config, &args),
        Command::Fetch(args) => handle_fetch(&config, &args),
        Command::Clean => handle_clean(&config),
        Command::Refresh(args) => {
            handle_fetch(&config, &args)?;
            handle_clean(&config)
        }
        Command::Status => {
            let status = status::dataset_status(&config, Local::now());
            print!("{}", status::format_status(&status));
            Ok(())
        }
    }
}

/// Log to stderr; `RUST_LOG` overrides the default `warn` level.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

pub fn config_from_args(paths: &PathArgs, mut config: EngineConfig) -> EngineConfig {
    if let Some(p) = &paths.dataset {
        config.dataset_path = p.clone();
    }
    if let Some(p) = &paths.raw {
        config.raw_path = p.clone();
    }
    if let Some(p) = &paths.chart {
        config.chart_path = p.clone();
    }
    config
}

fn handle_ask(config: &EngineConfig, args: &AskArgs) -> Result<(), AppError> {
    let engine = QaEngine::from_config(config);
    let question = args.question();
    println!("{}", engine.answer(&question));
    print_support(&engine, &question, args.support);
    Ok(())
}

fn handle_extract(args: &ExtractArgs) -> Result<(), AppError> {
    let extracted = crate::nlp::Extractor::default().extract(&args.question());

    if args.json {
        let json = serde_json::to_string_pretty(&extracted)
            .map_err(|e| AppError::new(2, format!("Failed to serialize extraction: {e}")))?;
        println!("{json}");
    } else {
        println!("commodity: {}", extracted.commodity.as_deref().unwrap_or("-"));
        println!("location : {}", extracted.location.as_deref().unwrap_or("-"));
        println!("intent   : {}", extracted.intent);
    }
    Ok(())
}

fn handle_chat(config: &EngineConfig, args: &ChatArgs) -> Result<(), AppError> {
    let engine = QaEngine::from_config(config);
    if engine.dataset().is_empty() {
        println!("Clean dataset not available. Run `samarth refresh` to fetch and prepare data.");
    }
    println!("Ask about mandi prices (e.g. \"Show trend of tomato in Bangalore\"). Type `quit` to exit.");

    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    let mut lines = stdin.lock().lines();
    loop {
        print!("> ");
        stdout
            .flush()
            .map_err(|e| AppError::new(2, format!("Failed to write prompt: {e}")))?;

        let Some(line) = lines.next() else { break };
        let line = line.map_err(|e| AppError::new(2, format!("Failed to read question: {e}")))?;
        let question = line.trim();
        if question.is_empty() {
            continue;
        }
        if matches!(question, "quit" | "exit") {
            break;
        }

        println!("{}", engine.answer(question));
        print_support(&engine, question, args.support);
    }
    Ok(())
}

fn print_support(engine: &QaEngine, question: &str, limit: usize) {
    if limit == 0 {
        return;
    }
    let rows = engine.supporting_rows(question, limit);
    if !rows.is_empty() {
        println!("\nSupporting data (recent rows):");
        print!("{}", format_supporting_rows(&rows));
    }
}

fn handle_fetch(config: &EngineConfig, args: &FetchArgs) -> Result<(), AppError> {
    let client = AgmarknetClient::from_env()?;
    info!("Fetching Agmarknet data (limit={})", args.limit);
    let records = client.fetch_records(args.limit, args.max_records)?;
    if records.is_empty() {
        return Err(AppError::new(4, "Agmarknet returned no records; keeping the previous snapshot."));
    }
    write_snapshot(&config.raw_path, &records)?;
    println!("Saved {} mandi records -> {}", records.len(), config.raw_path.display());
    Ok(())
}

fn handle_clean(config: &EngineConfig) -> Result<(), AppError> {
    let report = clean_snapshot(&config.raw_path, &config.dataset_path)?;
    println!(
        "Cleaned {} records ({} dropped) into {} monthly rows -> {}",
        report.rows_read,
        report.rows_dropped,
        report.rows.len(),
        config.dataset_path.display()
    );
    Ok(())
}

const SUBCOMMANDS: [&str; 7] = ["ask", "extract", "chat", "fetch", "clean", "refresh", "status"];

/// Rewrite argv so bare invocations do something useful.
///
/// Rules:
/// - `samarth`                        -> `samarth chat`
/// - `samarth onion price in Nashik`  -> `samarth ask onion price in Nashik`
/// - `samarth --dataset x.csv`        -> `samarth --dataset x.csv chat`
/// - `samarth --help/--version/-h`    -> unchanged
/// - flags followed by a subcommand   -> unchanged
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("chat".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    if SUBCOMMANDS.contains(&arg1.as_str()) {
        return argv;
    }

    // Leading global flags: default to chat unless a subcommand follows.
    if arg1.starts_with('-') {
        if !argv[2..].iter().any(|a| SUBCOMMANDS.contains(&a.as_str())) {
            argv.push("chat".to_string());
        }
        return argv;
    }

    argv.insert(1, "ask".to_string());
    argv
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn args(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_starts_chat() {
        assert_eq!(rewrite_args(args(&["samarth"])), args(&["samarth", "chat"]));
    }

    #[test]
    fn free_text_becomes_ask() {
        assert_eq!(
            rewrite_args(args(&["samarth", "onion", "price"])),
            args(&["samarth", "ask", "onion", "price"])
        );
    }

    #[test]
    fn subcommands_and_flags_untouched() {
        assert_eq!(rewrite_args(args(&["samarth", "status"])), args(&["samarth", "status"]));
        assert_eq!(rewrite_args(args(&["samarth", "--help"])), args(&["samarth", "--help"]));
        assert_eq!(
            rewrite_args(args(&["samarth", "--dataset", "x.csv", "ask", "q"])),
            args(&["samarth", "--dataset", "x.csv", "ask", "q"])
        );
    }

    #[test]
    fn global_flags_alone_start_chat() {
        let argv = rewrite_args(args(&["samarth", "--dataset", "x.csv"]));
        assert_eq!(argv, args(&["samarth", "--dataset", "x.csv", "chat"]));

        let cli = crate::cli::Cli::try_parse_from(argv).unwrap();
        assert_eq!(cli.paths.dataset, Some(PathBuf::from("x.csv")));
        assert!(matches!(cli.command, Command::Chat(_)));
    }

    #[test]
    fn cli_paths_override_config() {
        let paths = PathArgs {
            dataset: Some(PathBuf::from("other.csv")),
            raw: None,
            chart: Some(PathBuf::from("req-7.svg")),
        };
        let config = config_from_args(&paths, EngineConfig::default());
        assert_eq!(config.dataset_path, PathBuf::from("other.csv"));
        assert_eq!(config.raw_path, PathBuf::from("data/mandi_data.json"));
        assert_eq!(config.chart_path, PathBuf::from("req-7.svg"));
    }
}
