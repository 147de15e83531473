//! CopyForge CLI: the main entry point.
//!
//! Commands:
//! - `preview`: Compose the system prompt and context window for a turn
//! - `blocks`: List or show the prompt blocks in effect
//! - `config`: Show, validate or locate the configuration file

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(
    name = "copyforge",
    about = "CopyForge: prompt compilation and context-window packing",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Compose a turn offline and print its preview
    Preview {
        /// Turn input as JSON (thread, entities, history)
        #[arg(short, long)]
        input: PathBuf,

        /// JSON array of prompt block rows to use as overrides
        #[arg(short, long)]
        overrides: Option<PathBuf>,

        /// Include the debug payload
        #[arg(short, long)]
        debug: bool,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Inspect prompt blocks
    Blocks {
        #[command(subcommand)]
        action: BlocksAction,

        /// JSON array of prompt block rows to use as overrides
        #[arg(short, long, global = true)]
        overrides: Option<PathBuf>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum BlocksAction {
    /// List every known block key and where it resolves from
    List,
    /// Print the resolved content of one block
    Show { key: String },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Check the configuration file for errors
    Validate,
    /// Print the configuration file path
    Path,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays machine-readable
    let filter = if cli.verbose { "debug" } else { "info" };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false);
    if cli.json {
        builder.json().init();
    } else {
        builder.init();
    }

    match cli.command {
        Commands::Preview {
            input,
            overrides,
            debug,
            pretty,
        } => commands::preview::run(&input, overrides.as_deref(), debug, pretty)?,
        Commands::Blocks { action, overrides } => match action {
            BlocksAction::List => commands::blocks::list(overrides.as_deref())?,
            BlocksAction::Show { key } => commands::blocks::show(&key, overrides.as_deref())?,
        },
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config_cmd::show()?,
            ConfigAction::Validate => commands::config_cmd::validate()?,
            ConfigAction::Path => commands::config_cmd::path(),
        },
    }

    Ok(())
}
