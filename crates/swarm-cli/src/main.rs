mod cmd;
mod output;
mod root;
mod tools;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use swarm_core::ops::DEFAULT_AUTHOR;

#[derive(Parser)]
#[command(
    name = "swarm",
    about = "Story lifecycle enforcement and retrospective knowledge extraction",
    version,
    propagate_version = true
)]
struct Cli {
    /// Project root (default: auto-detect from .swarm/ or .git/)
    #[arg(long, global = true, env = "SWARM_ROOT")]
    root: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a story file's header
    Validate { story: PathBuf },

    /// Check whether a story may move to a new status
    Transition {
        story: PathBuf,
        status: String,
        /// Write the new status back to the story file
        #[arg(long)]
        apply: bool,
    },

    /// Set the status of one task on a story
    Task {
        story: PathBuf,
        task_id: String,
        status: String,
    },

    /// Set the status of one acceptance criterion on a story
    Criterion {
        story: PathBuf,
        criterion_id: String,
        status: String,
        /// Evidence that replaces the recorded evidence
        #[arg(long)]
        evidence: Option<String>,
    },

    /// Extract knowledge items from a retrospective into .swarm/knowledge/
    ExtractKnowledge {
        retro: PathBuf,
        /// Source story id (default: story_id from the retro header)
        #[arg(long)]
        story_id: Option<String>,
        /// Source repository name (default: repo from the retro header)
        #[arg(long)]
        repo: Option<String>,
        /// Author for learnings without an agent sub-heading
        #[arg(long, default_value = DEFAULT_AUTHOR)]
        author: String,
    },

    /// Mint the next story id and bump the config counter
    NextId {
        /// Config file (default: .swarm/config.md under the project root)
        config: Option<PathBuf>,
    },

    /// List records in a directory
    List {
        dir: PathBuf,
        /// Only records with this status
        #[arg(long)]
        status: Option<String>,
    },

    /// Report which parts of the .swarm/ layout are present
    Status,

    /// Run as a JSON-RPC tool server on stdio
    Mcp,
}

fn main() {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Mcp => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };

    // stdout carries JSON only.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let root = root::resolve_root(cli.root.as_deref());

    let result = match cli.command {
        Commands::Validate { story } => cmd::story::validate(&story),
        Commands::Transition {
            story,
            status,
            apply,
        } => cmd::story::transition(&story, &status, apply),
        Commands::Task {
            story,
            task_id,
            status,
        } => cmd::story::task(&story, &task_id, &status),
        Commands::Criterion {
            story,
            criterion_id,
            status,
            evidence,
        } => cmd::story::criterion(&story, &criterion_id, &status, evidence.as_deref()),
        Commands::ExtractKnowledge {
            retro,
            story_id,
            repo,
            author,
        } => cmd::knowledge::extract(
            &root,
            &retro,
            story_id.as_deref(),
            repo.as_deref(),
            &author,
        ),
        Commands::NextId { config } => cmd::project::next_id(&root, config.as_deref()),
        Commands::List { dir, status } => cmd::project::list(&dir, status.as_deref()),
        Commands::Status => cmd::project::status(&root),
        Commands::Mcp => cmd::mcp::run(&root),
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
