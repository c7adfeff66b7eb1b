//! YouTube Data API v3 連携モジュール
//!
//! commentThreads.list をページ送りしながら全コメントスレッドを取得する。

pub mod api_key_manager;
pub mod backoff;
pub mod client;
pub mod collector;
pub mod errors;
pub mod retry;
pub mod state;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use client::{CommentPageFetcher, YouTubeClient};
pub use collector::{CommentCollector, CommentHarvest, Termination};
pub use errors::YouTubeError;
pub use types::{CommentRecord, PageToken};
