//! collab - CLI for pai-collab blackboard operations

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use collab::commands;
use collab::config::{self, OutputFormat, LOG_ENV_VAR};
use collab::discovery;

#[derive(Parser)]
#[command(name = "collab")]
#[command(author, version, about = "CLI for pai-collab blackboard operations")]
struct Cli {
    /// Output as JSON (default)
    #[arg(long, global = true, conflicts_with = "pretty")]
    json: bool,

    /// Output as human-readable text
    #[arg(long, global = true)]
    pretty: bool,

    /// Blackboard root (defaults to walking up from the current directory)
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    /// Show debug logs
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only show errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate blackboard artifacts against schemas
    Validate,

    /// Inspect blackboard projects
    Project {
        #[command(subcommand)]
        operation: ProjectOperation,
    },

    /// Inspect project journals
    Journal {
        #[command(subcommand)]
        operation: JournalOperation,
    },

    /// Show the parsed REGISTRY.md tables
    Registry,

    /// Show blackboard-wide overview
    Status,
}

#[derive(Subcommand)]
enum ProjectOperation {
    /// List all registered projects
    List,

    /// Show detailed project status
    Status {
        /// Project directory or declared name
        name: String,
    },
}

#[derive(Subcommand)]
enum JournalOperation {
    /// Show the parsed entries of a project journal
    Show {
        /// Project directory or declared name
        project: String,
    },
}

fn main() {
    match run() {
        Ok(code) => std::process::exit(code),
        Err(error) => {
            eprintln!("collab error: {error:#}");
            std::process::exit(1);
        }
    }
}

fn run() -> anyhow::Result<i32> {
    let cli = Cli::parse();
    let config = config::load_config()?;
    init_tracing(cli.quiet, cli.verbose, config.log_level.as_deref())?;

    let format = if cli.pretty {
        OutputFormat::Pretty
    } else if cli.json {
        OutputFormat::Json
    } else {
        config.output
    };
    let root = discovery::resolve_root(cli.root.as_deref(), &config)?;
    tracing::debug!(root = %root.display(), %format, "resolved blackboard root");

    let output = match cli.command {
        Commands::Validate => commands::validate(&root, format)?,
        Commands::Project { operation } => match operation {
            ProjectOperation::List => commands::project_list(&root, format)?,
            ProjectOperation::Status { name } => commands::project_status(&root, &name, format)?,
        },
        Commands::Journal { operation } => match operation {
            JournalOperation::Show { project } => commands::journal_show(&root, &project, format)?,
        },
        Commands::Registry => commands::registry_show(&root, format)?,
        Commands::Status => commands::status(&root, format)?,
    };

    println!("{}", output.text);
    Ok(output.exit_code)
}

fn init_tracing(quiet: bool, verbose: bool, configured: Option<&str>) -> anyhow::Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        configured.unwrap_or("warn")
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env(LOG_ENV_VAR)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}
