use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use scoreboard_types::Unit;

#[derive(Parser)]
#[command(
    name = "scoreboard",
    about = "Scoreboard: team points and hours leaderboard",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Path to the configuration file
    #[arg(long, global = true, default_value = "scoreboard.toml")]
    pub config: PathBuf,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Write a config file and seed the store with a roster
    Init(InitArgs),
    /// Show the ranking
    Board(BoardArgs),
    /// Add points or minutes to a member
    Add(DeltaArgs),
    /// Redeem points from a member (never below zero)
    Redeem(DeltaArgs),
    /// Export the table as CSV
    Export(ExportArgs),
    /// Show where the data comes from and which policies are active
    Status(StatusArgs),
    /// Interactive session over one loaded table
    Shell(ShellArgs),
}

#[derive(Args)]
pub struct InitArgs {
    /// Member to put on the board (repeatable)
    #[arg(short, long = "member")]
    pub members: Vec<String>,
    #[arg(long, default_value = "points")]
    pub unit: Unit,
    /// CSV file backing the board
    #[arg(long)]
    pub store: Option<PathBuf>,
    /// Keep the table in session memory instead of a file
    #[arg(long, conflicts_with = "store")]
    pub memory: bool,
    /// Do not require the admin code for changes
    #[arg(long)]
    pub no_auth: bool,
    /// Overwrite an existing config file
    #[arg(long)]
    pub force: bool,
}

#[derive(Args)]
pub struct BoardArgs {}

#[derive(Args)]
pub struct DeltaArgs {
    pub name: String,
    pub amount: f64,
    /// Admin code
    #[arg(long)]
    pub code: Option<String>,
}

#[derive(Args)]
pub struct ExportArgs {
    /// Output file (defaults to a timestamped name)
    #[arg(short, long)]
    pub out: Option<PathBuf>,
}

#[derive(Args)]
pub struct StatusArgs {}

#[derive(Args)]
pub struct ShellArgs {
    /// Admin code used for every change in this session
    #[arg(long)]
    pub code: Option<String>,
}
