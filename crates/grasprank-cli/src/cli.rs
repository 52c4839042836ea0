use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "GraspRank CLI - Score candidate robotic grasps by wrench-space quality and rank them.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Set the number of threads used to evaluate hypotheses.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Rank a batch of grasp hypotheses by population-normalized wrench quality.
    Rank(RankArgs),
    /// Rank a batch by the mean quality of randomly perturbed copies of each hypothesis.
    Robust(RobustArgs),
}

/// Arguments shared by every ranking command.
#[derive(Args, Debug, Clone)]
pub struct BatchArgs {
    /// Path to the grasp batch file in TOML format.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Path to an optional configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Write the full ranking to this CSV file.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Number of top candidates printed in the summary.
    #[arg(short = 'n', long, value_name = "INT")]
    pub top: Option<usize>,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S scoring.weights.isotropy=4.0
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// Arguments for the `rank` subcommand.
#[derive(Args, Debug)]
pub struct RankArgs {
    #[command(flatten)]
    pub batch: BatchArgs,
}

/// Arguments for the `robust` subcommand.
#[derive(Args, Debug)]
pub struct RobustArgs {
    #[command(flatten)]
    pub batch: BatchArgs,

    /// Override the number of perturbed samples per hypothesis.
    #[arg(short = 'k', long, value_name = "INT")]
    pub samples: Option<usize>,

    /// Seed for the perturbation generator. A random seed is drawn and logged when omitted.
    #[arg(long, value_name = "INT")]
    pub seed: Option<u64>,

    /// Override the standard deviation of the position noise.
    #[arg(long, value_name = "FLOAT")]
    pub sigma_position: Option<f64>,

    /// Override the standard deviation of the direction and roll noise, in radians.
    #[arg(long, value_name = "FLOAT")]
    pub sigma_angle: Option<f64>,

    /// Weight raw metric values instead of normalizing against the nominal batch.
    #[arg(long)]
    pub raw: bool,
}
