use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Build orchestrator for the patched Spigot game-server stack
#[derive(Parser, Debug)]
#[command(
    name = "pipewright",
    about = "Build orchestrator for the patched Spigot game-server stack",
    version,
    author,
    long_about = "pipewright synchronizes the upstream server repositories, downloads the \
                  required tooling, remaps and decompiles the vanilla server jar, applies \
                  the server patch set, and drives Maven to produce the final artifacts. \
                  Completed work is detected on disk, so an interrupted build resumes \
                  where it stopped."
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(short = 'v', long, global = true, help = "Increase verbosity")]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Quiet mode - suppress non-error output"
    )]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(
        about = "Run the full build pipeline",
        long_about = "Runs every pipeline stage in order, from repository sync to the final \
                      Maven builds.\n\n\
                      Examples:\n  \
                      pipewright build\n  \
                      pipewright build /srv/spigot\n  \
                      pipewright build --game-version 1.8 --plain"
    )]
    Build(BuildArgs),

    #[command(
        about = "Check the host without building",
        long_about = "Runs the preflight checks (host OS, git availability, configuration) \
                      and reports the result without touching the build directory.\n\n\
                      Examples:\n  \
                      pipewright check\n  \
                      pipewright check --format json"
    )]
    Check(CheckArgs),
}

#[derive(Parser, Debug, Clone)]
pub struct BuildArgs {
    #[arg(
        value_name = "PATH",
        help = "Build root directory (defaults to the current directory)"
    )]
    pub root: Option<PathBuf>,

    #[arg(
        long,
        value_name = "VERSION",
        help = "Game version to build (overrides PIPEWRIGHT_GAME_VERSION)"
    )]
    pub game_version: Option<String>,

    #[arg(
        long,
        help = "Disable the console progress bar and log stage progress instead"
    )]
    pub plain: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct CheckArgs {
    #[arg(
        value_name = "PATH",
        help = "Build root directory (defaults to the current directory)"
    )]
    pub root: Option<PathBuf>,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormatArg {
    Json,
    Human,
}

impl From<OutputFormatArg> for super::output::OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Json => super::output::OutputFormat::Json,
            OutputFormatArg::Human => super::output::OutputFormat::Human,
        }
    }
}
