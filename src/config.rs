// =============================================================================
// 共通設定・定数モジュール
// =============================================================================
// アプリケーション全体で使用する共通の設定値・定数を定義
// =============================================================================

use std::path::PathBuf;
use std::time::Duration;

/// HTTPリクエストのデフォルトタイムアウト（秒）
///
/// ネットワーク状況が悪い場合でも適切にタイムアウトし、
/// リトライ層に一時的なエラーとして返す。
pub const HTTP_TIMEOUT_SECS: u64 = 10;

/// YouTube Data API v3 のベースURL
pub const API_BASE: &str = "https://www.googleapis.com/youtube/v3";

/// commentThreads.list の1ページあたりの最大件数（APIの上限）
pub const MAX_RESULTS_PER_PAGE: u32 = 100;

/// 出力CSVのデフォルトパス
pub const DEFAULT_OUTPUT_PATH: &str = "comments.csv";

/// APIキーファイルのデフォルト名（カレントディレクトリ）
pub const API_KEY_FILE: &str = "api_key.txt";

/// ページ取得の最大試行回数（初回を含む）
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// バックオフの初期待機時間（ミリ秒）
pub const DEFAULT_BASE_DELAY_MS: u64 = 1_000;

/// バックオフの最大待機時間（ミリ秒）
pub const DEFAULT_MAX_DELAY_MS: u64 = 60_000;

/// HTTPリクエストのデフォルトタイムアウト（Duration）
///
/// HTTPクライアント構築時に直接使用可能
pub fn http_timeout() -> Duration {
    Duration::from_secs(HTTP_TIMEOUT_SECS)
}

/// ユーザー設定ディレクトリ内のAPIキーファイル
///
/// カレントディレクトリに `api_key.txt` がない場合のフォールバック先
pub fn user_api_key_file() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("yt-comment-export").join(API_KEY_FILE))
}

/// ページ取得のリトライ設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// 最大試行回数（初回を含む）
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
    /// 待機時間にジッタを加えるか
    pub jitter: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_delay: Duration::from_millis(DEFAULT_BASE_DELAY_MS),
            max_delay: Duration::from_millis(DEFAULT_MAX_DELAY_MS),
            jitter: true,
        }
    }
}
