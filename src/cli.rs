//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::Parser;

use cam_core::DEFAULT_CONCURRENCY;
use cam_core::discovery::DEFAULT_IDS_FILE;
use cam_core::discovery::constants::DEFAULT_API_BASE;

/// Find owned games that still have locked achievements.
///
/// Lists every game of the account through the Web API, checks each game's
/// achievements and appends the ids of games with anything left to unlock to
/// the output file, one per line.
#[derive(Parser, Debug)]
#[command(name = "idgen")]
#[command(author, version, about)]
pub struct Args {
    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,

    /// Web API key
    #[arg(long, env = "STEAM_WEBAPI_KEY", hide_env_values = true)]
    pub key: Option<String>,

    /// Numeric id of the account to scan
    #[arg(long, env = "STEAM_ID")]
    pub steamid: Option<String>,

    /// Maximum concurrent achievement lookups (1-100)
    #[arg(short = 'c', long, default_value_t = DEFAULT_CONCURRENCY as u8, value_parser = clap::value_parser!(u8).range(1..=100))]
    pub concurrency: u8,

    /// Give up on a game after this many failed lookups (default: retry forever)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub max_attempts: Option<u32>,

    /// File the qualifying ids are appended to
    #[arg(short, long, default_value = DEFAULT_IDS_FILE)]
    pub output: PathBuf,

    /// Web API base URL
    #[arg(long, default_value = DEFAULT_API_BASE)]
    pub api_base: String,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 60, value_parser = clap::value_parser!(u64).range(1..=600))]
    pub timeout: u64,

    /// Wait after an undecodable response (likely throttling), in seconds
    #[arg(long, default_value_t = 60)]
    pub throttle_backoff: u64,

    /// Wait after any other failed lookup, in seconds
    #[arg(long, default_value_t = 10)]
    pub retry_backoff: u64,
}
