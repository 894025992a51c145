use std::path::PathBuf;

use clap::Args;
use jutsu::prelude::*;

use crate::constants::DEFAULT_OUTPUT_DIR;

#[derive(Debug, Clone, Args)]
pub struct AppArgs {
    /// Logging verbosity (error, warn, info, debug)
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Use interactive prompts to edit arguments before execution
    #[arg(short, long)]
    pub interactive: bool,
}

#[derive(Debug, Clone, Args)]
pub struct ListArgs {
    /// jut.su show url or slug (e.g. https://jut.su/baki/)
    #[arg(short, long)]
    pub url: Option<String>,

    /// Pause between two requests, in milliseconds
    #[arg(long, default_value_t = 1000)]
    pub delay_ms: u64,

    /// User agent sent to jut.su (defaults to ScraperBot/1.0)
    #[arg(long, env = "JUTSU_USER_AGENT")]
    pub user_agent: Option<String>,

    #[command(flatten)]
    pub app_args: AppArgs,
}

#[derive(Debug, Clone, Args)]
pub struct RangeArgs {
    /// First season to download (1-indexed)
    #[arg(long)]
    pub season_from: Option<u32>,

    /// First episode of the first season to download (1-indexed)
    #[arg(long)]
    pub episode_from: Option<u32>,

    /// Last season to download
    #[arg(long)]
    pub season_to: Option<u32>,

    /// Last episode of the last season to download
    #[arg(long)]
    pub episode_to: Option<u32>,
}

impl RangeArgs {
    pub fn selector(&self) -> Result<RangeSelector> {
        RangeSelector::new(
            self.season_from.unwrap_or(1),
            self.episode_from.unwrap_or(1),
            self.season_to,
            self.episode_to,
        )
        .map_err(|err| JutsuError::Message(err.to_string()))
    }
}

#[derive(Debug, Clone, Args)]
pub struct DownloadArgs {
    /// Output directory for downloaded shows
    #[arg(short, long, default_value = DEFAULT_OUTPUT_DIR)]
    pub dir: PathBuf,

    #[command(flatten)]
    pub range: RangeArgs,

    #[command(flatten)]
    pub list: ListArgs,
}

#[derive(Debug, Clone)]
pub struct RuntimeArgs {
    pub url: String,
    pub selector: RangeSelector,
}

impl RuntimeArgs {
    pub fn new(url: String, selector: RangeSelector) -> Self {
        Self { url, selector }
    }
}
