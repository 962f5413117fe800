use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "ruleset",
    about = "Merge distributor and user ignore-rule files with backup",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Merge baseline and user rules into the target file
    Merge(MergeArgs),
    /// Validate a rule file
    Check(CheckArgs),
    /// List the categories and patterns of a rule file
    Show(ShowArgs),
    /// List backups of a target, oldest first
    Backups(BackupsArgs),
}

#[derive(Args, Debug)]
pub struct MergeArgs {
    /// Install config; flags given here override its values
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    #[arg(long)]
    pub baseline: Option<PathBuf>,
    #[arg(long)]
    pub user: Option<PathBuf>,
    #[arg(long)]
    pub target: Option<PathBuf>,
    /// Print the diff against the target instead of writing it
    #[arg(long)]
    pub dry_run: bool,
    /// Leave the target alone if it already holds the merged content
    #[arg(long)]
    pub skip_unchanged: bool,
    /// Skip fsync of the backup and new content
    #[arg(long)]
    pub no_sync: bool,
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    pub file: PathBuf,
}

#[derive(Args, Debug)]
pub struct ShowArgs {
    pub file: PathBuf,
}

#[derive(Args, Debug)]
pub struct BackupsArgs {
    pub target: PathBuf,
}
