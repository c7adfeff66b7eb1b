use std::fmt;
use tokio_util::sync::CancellationToken;

use super::{
    client::CommentPageFetcher,
    errors::YouTubeError,
    retry::{fetch_page_with_retry, RetryError},
    state::HarvestProgress,
    types::{CommentRecord, PageToken},
};
use crate::config::RetryPolicy;

/// 取得ループの状態
#[derive(Debug)]
enum CollectorState {
    /// 次のページを取得する（初回はトークンなし）
    Fetching { page_token: Option<PageToken> },
    /// 最後のページまで取得した
    Done,
}

/// 取得ループが終了した理由
#[derive(Debug)]
pub enum Termination {
    /// 全ページを取得した
    Complete,
    /// リトライ上限に達したため途中で停止した
    Exhausted {
        page: u32,
        attempts: u32,
        error: YouTubeError,
    },
    /// キャンセルされたため途中で停止した
    Cancelled { page: u32 },
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Termination::Complete => write!(f, "all pages fetched"),
            Termination::Exhausted {
                page,
                attempts,
                error,
            } => write!(
                f,
                "stopped at page {} after {} attempt(s): {}",
                page, attempts, error
            ),
            Termination::Cancelled { page } => write!(f, "cancelled before page {} completed", page),
        }
    }
}

/// 取得結果（コメントは取得順）
#[derive(Debug)]
pub struct CommentHarvest {
    pub records: Vec<CommentRecord>,
    pub progress: HarvestProgress,
    pub termination: Termination,
}

impl CommentHarvest {
    /// 全件取得できなかった場合true
    pub fn is_partial(&self) -> bool {
        !matches!(self.termination, Termination::Complete)
    }
}

/// 動画の全コメントスレッドをページ順に集める
pub struct CommentCollector<F> {
    fetcher: F,
    policy: RetryPolicy,
    cancel: CancellationToken,
    /// 取得開始前の進捗（動画特定で使った検索リクエストなど）
    initial_progress: HarvestProgress,
}

impl<F: CommentPageFetcher> CommentCollector<F> {
    pub fn new(fetcher: F, policy: RetryPolicy, cancel: CancellationToken) -> Self {
        Self {
            fetcher,
            policy,
            cancel,
            initial_progress: HarvestProgress::new(),
        }
    }

    /// 取得前に消費したリクエスト・クォータを引き継ぐ
    pub fn with_progress(mut self, progress: HarvestProgress) -> Self {
        self.initial_progress = progress;
        self
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// nextPageTokenがなくなるまでページを取得し続ける
    ///
    /// 回復不能なエラーの場合のみErrを返す（取得済みのコメントは破棄）。
    /// リトライ上限・キャンセル時は取得済みのコメントを返す。
    pub async fn collect(&self, video_id: &str) -> Result<CommentHarvest, YouTubeError> {
        log::info!("Fetching comments from video {}", video_id);

        let mut records = Vec::new();
        let mut progress = self.initial_progress.clone();
        let mut state = CollectorState::Fetching { page_token: None };

        let termination = loop {
            let page_token = match state {
                CollectorState::Fetching { page_token } => page_token,
                CollectorState::Done => break Termination::Complete,
            };

            let page_number = progress.pages_fetched + 1;

            // ページ間でキャンセルを確認
            if self.cancel.is_cancelled() {
                log::warn!("Cancellation requested, stopping before page {}", page_number);
                break Termination::Cancelled { page: page_number };
            }

            log::info!("Fetching page {}...", page_number);

            let fetched = match fetch_page_with_retry(
                &self.fetcher,
                video_id,
                page_token.as_ref(),
                &self.policy,
                &self.cancel,
            )
            .await
            {
                Ok(fetched) => fetched,
                Err(RetryError::Fatal(e)) => {
                    log::error!("Error fetching comments on page {}: {}", page_number, e);
                    return Err(e);
                }
                Err(RetryError::Exhausted {
                    attempts,
                    last_error,
                }) => {
                    progress.record_comment_requests(attempts);
                    log::error!(
                        "Giving up on page {} after {} attempt(s): {}",
                        page_number,
                        attempts,
                        last_error
                    );
                    break Termination::Exhausted {
                        page: page_number,
                        attempts,
                        error: last_error,
                    };
                }
                Err(RetryError::Cancelled { attempts }) => {
                    progress.record_comment_requests(attempts);
                    log::warn!("Cancelled while fetching page {}", page_number);
                    break Termination::Cancelled { page: page_number };
                }
            };

            progress.record_comment_requests(fetched.attempts);
            progress.record_page();
            let page = fetched.page;
            records.extend(page.items.into_iter().map(CommentRecord::from));

            state = match page.next_page_token {
                Some(token) => CollectorState::Fetching {
                    page_token: Some(token),
                },
                None => CollectorState::Done,
            };
        };

        log::info!(
            "Total comments fetched: {} across {} pages ({} requests, estimated quota used: {} units, remaining: {})",
            records.len(),
            progress.pages_fetched,
            progress.requests_made,
            progress.quota_used,
            progress.estimated_remaining_quota()
        );

        Ok(CommentHarvest {
            records,
            progress,
            termination,
        })
    }
}
