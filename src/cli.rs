// Command-line interface definitions.

use std::path::PathBuf;

use clap::Parser;

/// Compute power rankings for a head-to-head ESPN fantasy baseball league
/// and print the results as an HTML document. The default action is to
/// compute rankings for the current matchup period.
#[derive(Debug, Parser)]
#[command(name = "powerrankings", version)]
pub struct Cli {
    /// Configuration file to use.
    #[arg(short, long, default_value = "rankings.toml")]
    pub config: PathBuf,

    /// Compute rankings for this matchup period.
    #[arg(short, long, conflicts_with = "season")]
    pub week: Option<u32>,

    /// Compute rankings for the season so far.
    #[arg(short, long)]
    pub season: bool,

    /// Post a link to the league message board afterwards.
    #[arg(short = 'm', long = "post-message")]
    pub post_message: bool,
}
