//! quizbank CLI — adaptive quiz sessions over TOML question libraries.

use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "quizbank", version, about = "Adaptive quiz sessions from TOML libraries")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Options shared by commands that build a question pool.
#[derive(Args, Debug, Clone)]
pub struct SessionArgs {
    /// Library ids to draw from (repeatable; default: every library)
    #[arg(short, long = "library")]
    pub libraries: Vec<String>,

    /// Ask questions in library order instead of biasing toward weak ones
    #[arg(long)]
    pub sequential: bool,

    /// Shuffle seed for a reproducible order
    #[arg(long)]
    pub seed: Option<u64>,

    /// Stop after this many questions
    #[arg(long)]
    pub limit: Option<usize>,

    /// Config file path
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run an interactive quiz session
    Quiz {
        #[command(flatten)]
        session: SessionArgs,
    },

    /// Print the order questions would be asked in, without asking
    Plan {
        #[command(flatten)]
        session: SessionArgs,
    },

    /// Show how each library's questions spread across correctness bands
    Stats {
        /// Library ids to include (repeatable; default: every library)
        #[arg(short, long = "library")]
        libraries: Vec<String>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Validate library TOML files
    Validate {
        /// Path to a library file or directory (default: configured library dir)
        #[arg(long)]
        path: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Show past quiz sessions
    History {
        /// Number of sessions to show, newest first
        #[arg(long, default_value = "10")]
        limit: usize,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create starter config and example library
    Init,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("quizbank=info".parse().expect("valid directive")),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Quiz { session } => commands::quiz::execute(session),
        Commands::Plan { session } => commands::plan::execute(session),
        Commands::Stats { libraries, config } => commands::stats::execute(libraries, config),
        Commands::Validate { path, config } => commands::validate::execute(path, config),
        Commands::History { limit, config } => commands::history::execute(limit, config),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
