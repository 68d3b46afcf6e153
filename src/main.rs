//! Binary entry point for inventix.
//!
//! This binary provides the CLI interface for concept extraction and
//! prior-art novelty scoring. Results are written to stdout as JSON; logs go
//! to stderr.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(missing_docs)]
// Allow print_stderr in main binary for CLI output
#![allow(clippy::print_stderr)]
#![allow(clippy::print_stdout)]
// Allow needless_pass_by_value for command functions
#![allow(clippy::needless_pass_by_value)]
// Allow multiple crate versions from transitive dependencies
#![allow(clippy::multiple_crate_versions)]

use clap::{Parser, Subcommand};
use inventix::config::InventixConfig;
use inventix::observability::{self, RequestContext, scope_request_context};
use inventix::{ConceptExtractorService, NoveltyScorer, ProjectType};
use serde::Serialize;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::Instrument;

/// Inventix - evidence-locked concept extraction and novelty risk scoring.
#[derive(Parser)]
#[command(name = "inventix")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file.
    #[arg(short, long, global = true, env = "INVENTIX_CONFIG_PATH")]
    config: Option<PathBuf>,

    /// Skip the semantic oracle entirely.
    #[arg(long, global = true)]
    no_oracle: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand)]
enum Commands {
    /// Extract and rank concepts from a document.
    Extract {
        /// Input file, or `-` for stdin.
        #[arg(default_value = "-")]
        input: PathBuf,

        /// Domain hint passed to the oracle (e.g. "patent").
        #[arg(short, long)]
        domain: Option<String>,
    },

    /// Compare a document against prior art.
    Compare {
        /// Input file, or `-` for stdin.
        #[arg(default_value = "-")]
        input: PathBuf,

        /// Title of the work.
        #[arg(short, long, default_value = "Untitled")]
        title: String,

        /// Project type: patent or research.
        #[arg(short, long, default_value = "research")]
        project_type: String,
    },

    /// Analyze a claim set, one claim per blank-line separated block.
    Claims {
        /// Input file, or `-` for stdin.
        #[arg(default_value = "-")]
        input: PathBuf,

        /// Title of the work.
        #[arg(short, long, default_value = "Untitled")]
        title: String,
    },

    /// Show the effective configuration.
    Config,
}

impl Commands {
    const fn name(&self) -> &'static str {
        match self {
            Self::Extract { .. } => "extract",
            Self::Compare { .. } => "compare",
            Self::Claims { .. } => "claims",
            Self::Config => "config",
        }
    }
}

/// Main entry point.
#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) if cli.no_oracle => config.without_oracle(),
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            return ExitCode::FAILURE;
        },
    };

    if let Err(e) = observability::init_from_settings(Some(&config.logging), cli.verbose) {
        eprintln!("Failed to initialize logging: {e}");
        return ExitCode::FAILURE;
    }

    let context = RequestContext::new();
    let span = context.span(cli.command.name());
    let result = scope_request_context(context, run_command(cli.command, config).instrument(span))
        .await;

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        },
    }
}

/// Runs the selected command. Returns whether the pipeline succeeded.
async fn run_command(
    command: Commands,
    config: InventixConfig,
) -> Result<bool, Box<dyn std::error::Error>> {
    match command {
        Commands::Extract { input, domain } => {
            let text = read_input(&input)?;
            let extractor = ConceptExtractorService::from_config(&config);
            let result = extractor.extract_concepts(&text, domain.as_deref()).await;
            if let Some(message) = result.error_message() {
                tracing::warn!(error = message, "Extraction failed");
            }
            print_json(&result)?;
            Ok(result.success)
        },

        Commands::Compare {
            input,
            title,
            project_type,
        } => {
            let text = read_input(&input)?;
            let project_type = ProjectType::parse(&project_type);

            let extraction = ConceptExtractorService::from_config(&config)
                .extract_concepts(&text, Some(project_type.as_str()))
                .await;
            let hints = extraction
                .success
                .then_some(extraction.differentiating_terms.as_slice());

            let assessment = NoveltyScorer::from_config(&config)
                .compare_with_prior_art(&text, &title, project_type, hints)
                .await;
            if let Some(message) = assessment.error_message() {
                tracing::warn!(error = message, "Novelty assessment failed");
            }
            print_json(&assessment)?;
            Ok(assessment.success)
        },

        Commands::Claims { input, title } => {
            let claims = split_claims(&read_input(&input)?);
            let comparison = NoveltyScorer::from_config(&config)
                .compare_claims(&claims, &title)
                .await;
            print_json(&comparison)?;
            Ok(comparison.success)
        },

        Commands::Config => {
            cmd_config(&config);
            Ok(true)
        },
    }
}

/// Loads configuration from an explicit path or the default location, then
/// applies environment overrides.
fn load_config(path: Option<&Path>) -> Result<InventixConfig, Box<dyn std::error::Error>> {
    let config = match path {
        Some(path) => InventixConfig::load_from_file(path)?,
        None => InventixConfig::load_default(),
    };
    Ok(config.with_env_overrides())
}

/// Reads the whole input, from stdin when the path is `-`.
fn read_input(path: &Path) -> Result<String, Box<dyn std::error::Error>> {
    if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        return Ok(buf);
    }
    std::fs::read_to_string(path).map_err(|e| format!("{}: {e}", path.display()).into())
}

/// Splits claim text into blank-line separated claims.
fn split_claims(text: &str) -> Vec<String> {
    text.replace("\r\n", "\n")
        .split("\n\n")
        .map(str::trim)
        .filter(|claim| !claim.is_empty())
        .map(str::to_string)
        .collect()
}

fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn cmd_config(config: &InventixConfig) {
    match InventixConfig::default_path() {
        Some(path) => println!("Config file: {}", path.display()),
        None => println!("Config file: (no home directory)"),
    }
    println!();
    println!("[oracle]");
    println!("  enabled:            {}", config.oracle.enabled);
    println!("  provider:           {}", config.oracle.provider.as_str());
    println!(
        "  model:              {}",
        config.oracle.model.as_deref().unwrap_or("(provider default)")
    );
    println!(
        "  api_key:            {}",
        if config.oracle.api_key.is_some() {
            "(set)"
        } else {
            "(from environment)"
        }
    );
    println!("  request_timeout_ms: {}", config.oracle.request_timeout_ms);
    println!("  max_retries:        {}", config.oracle.max_retries);
    println!();
    println!("[extraction]");
    let limits = &config.extraction;
    println!("  max_concepts:             {}", limits.max_concepts);
    println!("  max_term_list:            {}", limits.max_term_list);
    println!("  max_keyword_candidates:   {}", limits.max_keyword_candidates);
    println!("  max_bigrams:              {}", limits.max_bigrams);
    println!("  max_trigrams:             {}", limits.max_trigrams);
    println!("  min_phrase_occurrences:   {}", limits.min_phrase_occurrences);
    println!("  oracle_candidate_count:   {}", limits.oracle_candidate_count);
    println!("  comparison_excerpt_chars: {}", limits.comparison_excerpt_chars);
}
