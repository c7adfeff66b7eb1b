use thiserror::Error;

#[derive(Error, Debug)]
pub enum YouTubeError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("API key is invalid or missing")]
    InvalidApiKey,

    #[error("Video not found: {0}")]
    VideoNotFound(String),

    #[error("No channel matches '{0}'")]
    ChannelNotFound(String),

    #[error("Channel {0} has no videos")]
    NoVideosFound(String),

    #[error("Comments are disabled for this video")]
    CommentsDisabled,

    #[error("Quota exceeded - please try again tomorrow")]
    QuotaExceeded,

    #[error("Rate limit exceeded - retrying with backoff")]
    RateLimitExceeded,

    #[error("YouTube API server error: status {0}")]
    ServerError(u16),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unexpected API response: {status} - {message}")]
    ApiError { status: u16, message: String },

    #[error("Failed to parse response: {0}")]
    ParseError(String),
}

/// エラーの分類（リトライ可否の判定に使用）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    /// 一時的なエラー（レート制限・通信エラー）: バックオフしてリトライする
    Transient,
    /// 日次クォータ切れ: リトライしても回復しないが、取得済みの分は書き出す
    QuotaExhausted,
    /// 回復不能なエラー（認証・不正なレスポンス・動画なし）
    Fatal,
}

impl YouTubeError {
    /// エラーを分類する
    pub fn class(&self) -> FailureClass {
        match self {
            // URL不正・リダイレクト異常・本文の破損は再送しても直らない
            YouTubeError::HttpError(e) if e.is_builder() || e.is_redirect() || e.is_decode() => {
                FailureClass::Fatal
            }
            YouTubeError::HttpError(_)
            | YouTubeError::RateLimitExceeded
            | YouTubeError::ServerError(_) => FailureClass::Transient,
            YouTubeError::QuotaExceeded => FailureClass::QuotaExhausted,
            _ => FailureClass::Fatal,
        }
    }

    pub fn is_transient(&self) -> bool {
        self.class() == FailureClass::Transient
    }
}
