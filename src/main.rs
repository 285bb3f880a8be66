use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;
use vibe_check::commands::{completions, create, finalize, list, preview, status, switch};
use vibe_check::logging::init_logging;

#[derive(Parser)]
#[command(name = "vibe-check")]
#[command(about = "Checkpoint work in progress and squash it into one commit", long_about = None)]
#[command(version)]
struct Cli {
    /// Log decisions and git calls to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Run as if started in this directory
    #[arg(short = 'C', value_name = "DIR", global = true, default_value = ".")]
    directory: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Record all pending changes as a new checkpoint
    Create {
        /// Short note appended to the checkpoint message
        note: Option<String>,
    },

    /// List checkpoints, newest first
    List {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Move the working tree to a checkpoint
    Switch {
        /// Checkpoint id as shown by `list`
        id: String,
    },

    /// Squash the checkpoint run into one commit and push it
    ///
    /// Checkpoints newer than the current one are discarded.
    Finalize {
        /// Commit message (default: "Update: <timestamp>")
        message: Option<String>,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Show what finalize would squash, without changing anything
    Preview,

    /// Show which actions are available
    Status {
        /// Keep refreshing until Ctrl+C
        #[arg(short, long)]
        watch: bool,
    },

    /// Generate shell completions (bash, zsh, fish)
    Completions {
        /// Shell to generate completions for
        shell: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    let dir = cli.directory.as_path();
    match cli.command {
        Commands::Create { note } => create::execute(dir, note),
        Commands::List { json } => list::execute(dir, json),
        Commands::Switch { id } => switch::execute(dir, id),
        Commands::Finalize { message, yes } => finalize::execute(dir, message, yes),
        Commands::Preview => preview::execute(dir),
        Commands::Status { watch } => status::execute(dir, watch),
        Commands::Completions { shell } => completions::execute(Cli::command(), &shell),
    }
}
