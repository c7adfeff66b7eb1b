use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};

use crate::config::{
    RetryPolicy, API_BASE, DEFAULT_BASE_DELAY_MS, DEFAULT_MAX_ATTEMPTS, DEFAULT_MAX_DELAY_MS,
    DEFAULT_OUTPUT_PATH,
};

#[derive(Parser, Debug)]
#[command(
    name = "yt-comment-export",
    version,
    about = "Export every comment thread of a YouTube video to CSV"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch all comment threads of a video and write them to CSV.
    Export(ExportArgs),
    /// Manage the API key kept in the OS secure storage.
    Key {
        #[command(subcommand)]
        action: KeyAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum KeyAction {
    /// Store an API key.
    Set {
        /// YouTube Data API key.
        key: String,
    },
    /// Remove the stored API key.
    Clear,
    /// Show whether an API key is stored (masked).
    Status,
}

/// どの動画のコメントを取得するか
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VideoTarget {
    VideoId(String),
    /// チャンネル名で検索し、最新動画を対象にする
    LatestFromChannel(String),
}

#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Video id to export (skips the channel lookup).
    #[arg(long, conflicts_with = "channel", required_unless_present = "channel")]
    pub video_id: Option<String>,

    /// Channel name to search for; its most recent video is exported.
    #[arg(long)]
    pub channel: Option<String>,

    /// YouTube Data API key.
    #[arg(long, env = "YOUTUBE_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// File containing the API key (defaults to ./api_key.txt when present).
    #[arg(long)]
    pub api_key_file: Option<PathBuf>,

    /// Output CSV path.
    #[arg(short, long, env = "YT_EXPORT_OUTPUT", default_value = DEFAULT_OUTPUT_PATH)]
    pub output: PathBuf,

    /// Attempts per page, including the first request.
    #[arg(long, default_value_t = DEFAULT_MAX_ATTEMPTS, value_parser = clap::value_parser!(u32).range(1..))]
    pub max_attempts: u32,

    /// Initial retry delay in milliseconds (doubles per retry).
    #[arg(long, default_value_t = DEFAULT_BASE_DELAY_MS)]
    pub base_delay_ms: u64,

    /// Upper bound for the retry delay in milliseconds.
    #[arg(long, default_value_t = DEFAULT_MAX_DELAY_MS)]
    pub max_delay_ms: u64,

    /// Disable random jitter on retry delays.
    #[arg(long)]
    pub no_jitter: bool,

    /// API base URL.
    #[arg(long, hide = true, default_value = API_BASE)]
    pub api_base: String,
}

impl ExportArgs {
    pub fn target(&self) -> Option<VideoTarget> {
        match (&self.video_id, &self.channel) {
            (Some(id), _) => Some(VideoTarget::VideoId(id.clone())),
            (None, Some(name)) => Some(VideoTarget::LatestFromChannel(name.clone())),
            (None, None) => None,
        }
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts,
            base_delay: Duration::from_millis(self.base_delay_ms),
            max_delay: Duration::from_millis(self.max_delay_ms.max(self.base_delay_ms)),
            jitter: !self.no_jitter,
        }
    }
}
