//! Command-line interface definition.
use clap::{Parser, Subcommand};

/// Top-level CLI entry point for the design token compiler.
#[derive(Parser, Debug)]
#[command(
    name = "tokens",
    about = "Compile design tokens into per-platform, per-brand artifacts",
    version
)]
pub struct Cli {
    /// Defaults to `build` when omitted.
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Options shared across all subcommands.
    #[command(flatten)]
    pub global: GlobalOpts,
}

impl Cli {
    /// The subcommand to run, with a bare `tokens` meaning `tokens build`.
    #[must_use]
    pub fn subcommand(&self) -> Command {
        self.command
            .clone()
            .unwrap_or_else(|| Command::Build(BuildOpts::default()))
    }
}

/// Options shared across all subcommands.
#[derive(Parser, Debug, Clone, Default)]
pub struct GlobalOpts {
    /// Render everything but write nothing
    #[arg(short = 'd', long, global = true)]
    pub dry_run: bool,

    /// Project root (defaults to $TOKENS_ROOT, then the current directory)
    #[arg(long, global = true)]
    pub root: Option<std::path::PathBuf>,
}

/// Available subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Build artifacts for every selected (platform, brand) pair
    Build(BuildOpts),
    /// Fail if any artifact on disk is missing or out of date
    Check(BuildOpts),
    /// Show configured pairs, targets and files
    List(BuildOpts),
    /// Print version information
    Version,
}

impl Command {
    /// Name used for the log file.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Build(_) => "build",
            Self::Check(_) => "check",
            Self::List(_) => "list",
            Self::Version => "version",
        }
    }
}

/// Pair selection shared by `build`, `check` and `list`.
#[derive(Parser, Debug, Clone, Default)]
pub struct BuildOpts {
    /// Build only these brands
    #[arg(long = "brand", value_delimiter = ',')]
    pub brands: Vec<String>,

    /// Build only these platforms
    #[arg(long = "platform", value_delimiter = ',')]
    pub platforms: Vec<String>,
}
