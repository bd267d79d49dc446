use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Subcommand)]
#[command(version, about, long_about = None)]
pub enum Commands {
    /// Production build of the project
    Build {
        /// Treat the repository as one component spanning src and packages
        #[clap(short = 'w', long)]
        whole_project: bool,
    },

    /// Development build, then rebuild on changes
    Dev {
        /// Skip the initial build and only watch
        #[clap(long)]
        watch_only: bool,
        /// Treat the repository as one component spanning src and packages
        #[clap(short = 'w', long)]
        whole_project: bool,
    },

    /// Bundle with the bundle analyzer attached
    #[clap(alias = "analyze")]
    Analyse,

    /// Format and lint staged sources
    Lint {
        /// Lint every source file instead of the staged ones
        #[clap(short, long)]
        all: bool,
        /// Only lint this package (with --all)
        #[clap(short, long)]
        package: Option<String>,
        /// Report problems without fixing them
        #[clap(long)]
        no_fix: bool,
        /// Exit successfully even when errors are reported
        #[clap(long)]
        no_break: bool,
        /// Run the TypeScript compiler first
        #[clap(short, long)]
        type_check: bool,
    },

    /// Remove build outputs
    Clean {
        /// Treat the repository as one component spanning src and packages
        #[clap(short = 'w', long)]
        whole_project: bool,
    },
}

/// kiln Command
#[derive(Parser)]
#[command(about = None)]
pub struct Cli {
    /// Project root
    #[clap(short = 'C', long, global = true, default_value = ".")]
    pub root: PathBuf,

    #[command(subcommand)]
    pub cmd: Commands,
}
