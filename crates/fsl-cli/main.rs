//! `fsl` command-line tool
//!
//! Classifies FluffSL sources the way the editor integration does and prints
//! the result, or lists the completions a document would offer.

mod output;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use fsl_core::{ColorRules, LanguageConfig, SemanticTokenizer, TokenLegend};
use fsl_editor::{EditorSessionManager, SessionConfig};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "fsl", author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify a source file into semantic token spans
    Tokens(TokensArgs),

    /// List completions offered for a source file
    Complete(CompleteArgs),

    /// Print the default semantic color palette
    Theme,
}

#[derive(Args)]
struct LanguageArgs {
    /// JSON file with keywords, types, functions and semantics
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// JSON file whose lists fill the ones left empty by --config
    #[arg(long)]
    defaults: Option<PathBuf>,
}

#[derive(Args)]
struct TokensArgs {
    /// Source file to classify
    file: PathBuf,

    #[command(flatten)]
    language: LanguageArgs,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Color text output with the default palette
    #[arg(long)]
    color: bool,
}

#[derive(Args)]
struct CompleteArgs {
    /// Source file to complete in
    file: PathBuf,

    #[command(flatten)]
    language: LanguageArgs,

    /// Only list completions starting with this text
    #[arg(short, long)]
    prefix: Option<String>,

    /// Maximum number of completions
    #[arg(short, long, default_value_t = 50)]
    limit: usize,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    /// One row per span
    Text,
    /// JSON array of spans
    Json,
    /// Legend and relative encoding as JSON
    Encoded,
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_level.into()))
        .with(fmt::layer().with_writer(io::stderr))
        .init();

    if let Err(e) = run(&cli) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let rendered = match &cli.command {
        Commands::Tokens(args) => tokens(args)?,
        Commands::Complete(args) => complete(args)?,
        Commands::Theme => serde_json::to_string_pretty(&ColorRules::default())? + "\n",
    };

    io::stdout()
        .lock()
        .write_all(rendered.as_bytes())
        .context("failed to write output")
}

fn tokens(args: &TokensArgs) -> Result<String> {
    let source = read_source(&args.file)?;
    let language = load_language(&args.language)?;
    let tokenizer = SemanticTokenizer::new(&language)?;

    let spans = tokenizer.tokenize(&source);
    info!(file = %args.file.display(), spans = spans.len(), "classified");

    match args.format {
        Format::Text => {
            let rules = ColorRules::default();
            let colors = args.color.then_some(&rules);
            Ok(output::render_text(&source, &spans, colors))
        }
        Format::Json => Ok(output::render_json(&spans)? + "\n"),
        Format::Encoded => {
            Ok(output::render_encoded(&TokenLegend::new(), &source, &spans)? + "\n")
        }
    }
}

fn complete(args: &CompleteArgs) -> Result<String> {
    let source = read_source(&args.file)?;
    let language = load_language(&args.language)?;

    let config = SessionConfig::default()
        .with_max_documents(1)
        .with_setting("complete.max_suggestions", args.limit.to_string());
    let mut sessions = EditorSessionManager::new(config, language)?;

    let id = args.file.display().to_string();
    sessions.open_document(&id, source)?;
    let items = sessions.completions_with_prefix(&id, args.prefix.as_deref())?;
    debug!(file = %id, completions = items.len(), "completed");

    Ok(output::render_completions(&items))
}

fn read_source(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn load_language(args: &LanguageArgs) -> Result<LanguageConfig> {
    let mut language = match &args.config {
        Some(path) => LanguageConfig::from_json_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => LanguageConfig::new(),
    };

    if let Some(path) = &args.defaults {
        let defaults = LanguageConfig::from_json_file(path)
            .with_context(|| format!("failed to load defaults {}", path.display()))?;
        if language.seed_defaults(&defaults) {
            debug!(defaults = %path.display(), "seeded unset identifier lists");
        }
    }

    Ok(language)
}
