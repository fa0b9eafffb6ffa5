//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::Result;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use rtfweave_convert::PandocConverter;
use rtfweave_core::ProgressReporter;
use rtfweave_shared::{AppConfig, init_config, load_config};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// Weave document fragments into an official RTF template.
#[derive(Parser)]
#[command(
    name = "rtfweave",
    version,
    about = "Convert LaTeX/Markdown fragments to RTF, merge them into an official template, and round-trip edits back out.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Path to the config file (default: ./rtfweave.toml, then ~/.rtfweave/).
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Running without a command performs a forward build.
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Convert all fragments and merge them into the official template.
    Build {
        /// Skip the configured PDF compile step.
        #[arg(long)]
        no_pdf: bool,
    },

    /// Split a previously produced RTF back into per-fragment markup files.
    Extract {
        /// The merged RTF file to take apart.
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Write a default rtfweave.toml into the working directory.
    Init,
    /// Show the resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt().json().with_env_filter(env_filter).init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config.clone();
    match cli.command.unwrap_or(Command::Build { no_pdf: false }) {
        Command::Build { no_pdf } => cmd_build(config_path.as_deref(), no_pdf),
        Command::Extract { file } => cmd_extract(config_path.as_deref(), &file),
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(config_path.as_deref()),
        },
    }
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

fn cmd_build(config_path: Option<&Path>, no_pdf: bool) -> Result<()> {
    let config = load_config(config_path)?;
    let converter = PandocConverter::new(&config.pandoc_program);
    converter.check()?;

    info!(
        input = %config.input_dir.display(),
        template = %config.official_template.display(),
        "building merged document"
    );

    let reporter = CliProgress::new();
    let outcome = rtfweave_core::build(&config, &converter, &reporter, no_pdf)?;

    println!();
    println!("  Document compiled successfully!");
    println!("  Fragments: {}", outcome.fragment_count);
    println!("  Output:    {}", outcome.output_rtf.display());
    match &outcome.pdf {
        Some(pdf) => println!("  PDF:       {}", pdf.display()),
        None => println!("  PDF:       skipped"),
    }
    println!("  Time:      {:.1}s", outcome.elapsed.as_secs_f64());
    println!();

    Ok(())
}

fn cmd_extract(config_path: Option<&Path>, file: &Path) -> Result<()> {
    let config = load_config(config_path)?;
    let converter = PandocConverter::new(&config.pandoc_program);
    converter.check()?;

    info!(source = %file.display(), format = %config.fragment_format, "extracting sections");

    let reporter = CliProgress::new();
    let outcome = rtfweave_core::extract(&config, &converter, file, &reporter)?;

    println!();
    println!("  Extraction finished!");
    println!("  Sections:  {}", outcome.section_count);
    println!("  Output:    {}", config.output_dir.display());
    println!("  Time:      {:.1}s", outcome.elapsed.as_secs_f64());
    println!();
    if outcome.section_count > 0 {
        println!("  Note: citations come back as plain text; re-cite before rebuilding.");
        println!();
    }

    Ok(())
}

fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show(config_path: Option<&Path>) -> Result<()> {
    let config: AppConfig = load_config(config_path)?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .expect("valid template")
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn item(&self, name: &str, current: usize, total: usize) {
        self.spinner
            .set_message(format!("[{current}/{total}] {name}"));
    }

    fn finish(&self) {
        self.spinner.finish_and_clear();
    }
}
