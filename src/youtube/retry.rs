//! ページ取得のリトライ処理
//!
//! 一時的なエラーは指数バックオフ（ジッタ付き）で再試行し、
//! 回復不能なエラーは即座に返す。通信中・待機中ともにキャンセル可能。

use thiserror::Error;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;

use super::{
    backoff::ExponentialBackoff,
    client::CommentPageFetcher,
    errors::{FailureClass, YouTubeError},
    types::{CommentPage, PageToken},
};
use crate::config::RetryPolicy;

#[derive(Error, Debug)]
pub enum RetryError {
    /// リトライしても回復しないエラー
    #[error(transparent)]
    Fatal(YouTubeError),

    /// リトライ上限に達した（または日次クォータ切れ）
    #[error("giving up after {attempts} attempt(s): {last_error}")]
    Exhausted {
        attempts: u32,
        last_error: YouTubeError,
    },

    /// 中断された（`attempts` は送信済みのリクエスト数）
    #[error("cancelled after {attempts} attempt(s)")]
    Cancelled { attempts: u32 },
}

/// 取得できたページと、それまでに要した試行回数
#[derive(Debug)]
pub struct FetchedPage {
    pub page: CommentPage,
    pub attempts: u32,
}

/// 1ページ分をリトライ付きで取得する
///
/// バックオフ状態はこの呼び出しの中だけで持つ。
pub async fn fetch_page_with_retry<F>(
    fetcher: &F,
    video_id: &str,
    page_token: Option<&PageToken>,
    policy: &RetryPolicy,
    cancel: &CancellationToken,
) -> Result<FetchedPage, RetryError>
where
    F: CommentPageFetcher + ?Sized,
{
    let mut backoff = ExponentialBackoff::from_policy(policy);

    loop {
        let attempt = backoff.attempt_count() + 1;

        // 同時に完了した場合は取得済みのページを優先する
        let result = tokio::select! {
            biased;
            result = fetcher.fetch_page(video_id, page_token) => result,
            _ = cancel.cancelled() => {
                log::info!("Page request cancelled");
                return Err(RetryError::Cancelled { attempts: attempt });
            }
        };

        let error = match result {
            Ok(page) => return Ok(FetchedPage { page, attempts: attempt }),
            Err(e) => e,
        };

        match error.class() {
            FailureClass::Fatal => return Err(RetryError::Fatal(error)),
            FailureClass::QuotaExhausted => {
                return Err(RetryError::Exhausted {
                    attempts: attempt,
                    last_error: error,
                });
            }
            FailureClass::Transient => {}
        }

        if !backoff.should_retry() {
            log::error!(
                "Max retry attempts exceeded ({} attempts): {}",
                attempt,
                error
            );
            return Err(RetryError::Exhausted {
                attempts: attempt,
                last_error: error,
            });
        }

        let delay = backoff.next_delay();
        log::warn!(
            "Page request failed (attempt {}/{}), retrying in {:?}: {}",
            attempt,
            policy.max_attempts,
            delay,
            error
        );

        tokio::select! {
            biased;
            _ = sleep(delay) => {}
            _ = cancel.cancelled() => {
                log::info!("Retry backoff cancelled");
                return Err(RetryError::Cancelled { attempts: attempt });
            }
        }
    }
}
