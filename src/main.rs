// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{anyhow, Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::{IsTerminal, Read, Write};
use std::num::NonZeroU32;
use std::path::{Path, PathBuf};
use std::time::Duration;

use slidenotes::app_config::{self, Config, ConversationStyle};
use slidenotes::diff::{self, DiffSegment};
use slidenotes::providers::gemini::Gemini;
use slidenotes::scripts::{PresentationId, ScriptKind, ScriptParams, KNOWN_FONT_FAMILIES};
use slidenotes::{Controller, RevisionOutcome};

/// CLI Wrapper for ScriptKind to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliScriptKind {
    /// Read every slide's speaker notes
    Extract,
    /// Overwrite speaker notes from a notes file
    Update,
    /// Remove all speaker notes
    Clear,
}

impl From<CliScriptKind> for ScriptKind {
    fn from(cli_kind: CliScriptKind) -> Self {
        match cli_kind {
            CliScriptKind::Extract => ScriptKind::Extract,
            CliScriptKind::Update => ScriptKind::BulkUpdate,
            CliScriptKind::Clear => ScriptKind::Clear,
        }
    }
}

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

/// CLI Wrapper for ConversationStyle to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliConversation {
    System,
    Primed,
}

impl From<CliConversation> for ConversationStyle {
    fn from(cli_style: CliConversation) -> Self {
        match cli_style {
            CliConversation::System => ConversationStyle::SystemInstruction,
            CliConversation::Primed => ConversationStyle::Primed,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Convert pasted speaker notes to slide markdown
    Format {
        /// Notes file; reads stdin when omitted or '-'
        #[arg(value_name = "INPUT")]
        input: Option<PathBuf>,
    },

    /// Convert notes to markdown and revise them with AI
    Revise {
        /// Notes file; reads stdin when omitted or '-'
        #[arg(value_name = "INPUT")]
        input: Option<PathBuf>,

        /// Also print a character diff against the markdown
        #[arg(short, long)]
        diff: bool,

        /// Use inline markers instead of colours for the diff
        #[arg(long)]
        plain: bool,

        /// Override the configured model
        #[arg(short, long)]
        model: Option<String>,

        /// Override the configured conversation layout
        #[arg(long, value_enum)]
        conversation: Option<CliConversation>,
    },

    /// Show a character diff between two text files
    Diff {
        /// Original text
        original: PathBuf,

        /// Revised text
        revised: PathBuf,

        /// Use inline markers instead of colours
        #[arg(long)]
        plain: bool,
    },

    /// Generate a Google Apps Script helper
    Script {
        /// Which helper to generate
        #[arg(value_enum)]
        kind: CliScriptKind,

        /// Google Slides URL or presentation ID
        #[arg(short, long)]
        presentation: String,

        /// Notes file for `update`, slides separated by '---' lines
        #[arg(short, long)]
        notes: Option<PathBuf>,

        /// Font family applied to updated notes
        #[arg(long)]
        font_family: Option<String>,

        /// Font size in points applied to updated notes
        #[arg(long)]
        font_size: Option<NonZeroU32>,
    },

    /// List the suggested font families
    Fonts,

    /// Generate shell completions for slidenotes
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// slidenotes - speaker notes to markdown, with AI revision
///
/// Formats speaker notes pasted from a presentation into slide markdown,
/// revises them with Gemini and generates Apps Script helpers.
#[derive(Parser, Debug)]
#[command(name = "slidenotes")]
#[command(version)]
#[command(about = "Speaker notes to markdown, with AI revision")]
#[command(long_about = "slidenotes turns speaker notes into slide markdown and revises them with AI.

EXAMPLES:
    slidenotes script extract -p https://docs.google.com/presentation/d/ID/edit
    slidenotes format notes.txt                 # Print slide markdown
    pbpaste | slidenotes revise                 # Revise notes from the clipboard
    slidenotes revise --diff notes.txt          # Show what the AI changed
    slidenotes script update -p ID -n notes.txt --font-size 14
    slidenotes completions bash > slidenotes.bash

CONFIGURATION:
    Settings are read from conf.json by default (--config to change). The API key
    comes from GEMINI_API_KEY, API_KEY or reviser.api_key in the config file.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json", global = true)]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum, global = true)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI colour and tag for log level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("1;31", "ERROR"),
            Level::Warn => ("1;33", "WARN "),
            Level::Info => ("1;32", "INFO "),
            Level::Debug => ("1;36", "DEBUG"),
            Level::Trace => ("1;35", "TRACE"),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let (colour, tag) = Self::style_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "\x1B[{}m{} {} {}\x1B[0m",
                colour, now, tag, record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // The logger accepts everything; the effective level is set via set_max_level
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    if let Some(level) = &cli.log_level {
        let level: app_config::LogLevel = level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    // Commands that never touch the core
    match &cli.command {
        Commands::Completions { shell } => {
            let mut cmd = CommandLineOptions::command();
            generate(*shell, &mut cmd, "slidenotes", &mut std::io::stdout());
            return Ok(());
        }
        Commands::Fonts => {
            for family in KNOWN_FONT_FAMILIES {
                println!("{}", family);
            }
            return Ok(());
        }
        _ => {}
    }

    let mut config = Config::load(&cli.config_path)?;
    config.apply_env();

    if let Commands::Revise { model, conversation, .. } = &cli.command {
        if let Some(model) = model {
            config.reviser.model = model.clone();
        }
        if let Some(conversation) = conversation {
            config.reviser.conversation = conversation.clone().into();
        }
    }

    match &cli.log_level {
        Some(level) => config.log_level = level.clone().into(),
        None => log::set_max_level(config.log_level.to_level_filter()),
    }

    // A missing credential stops the tool before any work is done
    config.validate()
        .context("Configuration validation failed")?;

    let provider = Gemini::from_config(&config.reviser);
    let controller = Controller::with_provider(config, provider);

    match cli.command {
        Commands::Format { input } => {
            let raw = read_input(input.as_deref())?;
            let formatted = controller.convert(&raw)?;
            println!("{}", formatted);
        }
        Commands::Revise { input, diff, plain, .. } => {
            let raw = read_input(input.as_deref())?;
            controller.convert(&raw)?;
            run_revision(&controller).await?;

            if let Some(revised) = controller.revised() {
                println!("{}", revised);
            }
            if diff {
                let segments = controller.diff()
                    .ok_or_else(|| anyhow!("No revision available to diff"))?;
                println!();
                print_diff(&segments, plain);
            }
        }
        Commands::Diff { original, revised, plain } => {
            let original = read_input(Some(original.as_path()))?;
            let revised = read_input(Some(revised.as_path()))?;
            print_diff(&diff::diff_chars(&original, &revised), plain);
        }
        Commands::Script { kind, presentation, notes, font_family, font_size } => {
            let kind: ScriptKind = kind.into();
            let mut params = ScriptParams::new(PresentationId::parse(&presentation)?);
            if let Some(path) = notes {
                params = params.with_notes(read_input(Some(path.as_path()))?);
            }
            if let Some(family) = font_family {
                if !KNOWN_FONT_FAMILIES.contains(&family.as_str()) {
                    warn!("'{}' is not a suggested font family; using it as given", family);
                }
                params = params.with_font_family(family);
            }
            if let Some(size) = font_size {
                params = params.with_font_size(size);
            }

            let script = controller.script(kind, &params)?;
            for (i, step) in kind.instructions().iter().enumerate() {
                info!("{}. {}", i + 1, step);
            }
            info!("Entry point: {}", script.entry_point);
            println!("{}", script.code);
        }
        Commands::Fonts | Commands::Completions { .. } => {}
    }

    Ok(())
}

async fn run_revision(controller: &Controller<Gemini>) -> Result<()> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message("Revising notes with AI...");
    spinner.enable_steady_tick(Duration::from_millis(100));

    let outcome = controller.revise().await;
    spinner.finish_and_clear();

    match outcome? {
        RevisionOutcome::Applied(_) => Ok(()),
        RevisionOutcome::Stale => Err(anyhow!("The notes changed while the revision was running")),
    }
}

fn print_diff(segments: &[DiffSegment], plain: bool) {
    let stats = diff::stats(segments);
    if stats.is_identical() {
        info!("No differences");
    } else {
        info!("{} character(s) inserted, {} removed", stats.inserted, stats.removed);
    }

    if plain || !std::io::stdout().is_terminal() {
        println!("{}", diff::render_inline(segments));
    } else {
        println!("{}", diff::render_ansi(segments));
    }
}

// Read a file, or stdin for `None` and '-'
fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .context(format!("Failed to read input file: {}", path.display())),
        _ => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read notes from stdin")?;
            Ok(buffer)
        }
    }
}
