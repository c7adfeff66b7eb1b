/// commentThreads.list 1回あたりのクォータコスト
pub const COMMENT_THREADS_QUOTA_COST: u64 = 1;

/// search.list 1回あたりのクォータコスト
pub const SEARCH_QUOTA_COST: u64 = 100;

/// 1日あたりのデフォルトクォータ
const DAILY_QUOTA: i64 = 10_000;

/// 取得の進捗を管理する構造体
///
/// クォータは成功・失敗を問わず送信したリクエストごとに加算する。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HarvestProgress {
    /// 取得に成功したページ数
    pub pages_fetched: u32,
    /// 送信したリクエスト数（リトライ・検索を含む）
    pub requests_made: u32,
    /// 累積クォータ消費量（推定）
    pub quota_used: u64,
}

impl HarvestProgress {
    pub fn new() -> Self {
        Self::default()
    }

    /// search.list を1回送信した
    pub fn record_search(&mut self) {
        self.record_requests(1, SEARCH_QUOTA_COST);
    }

    /// commentThreads.list を `attempts` 回送信した
    pub fn record_comment_requests(&mut self, attempts: u32) {
        self.record_requests(attempts, COMMENT_THREADS_QUOTA_COST);
    }

    /// ページ取得成功後に呼び出す
    pub fn record_page(&mut self) {
        self.pages_fetched += 1;
    }

    /// 残りクォータを推定（デフォルト10,000 units）
    pub fn estimated_remaining_quota(&self) -> i64 {
        DAILY_QUOTA - self.quota_used as i64
    }

    fn record_requests(&mut self, count: u32, cost: u64) {
        self.requests_made += count;
        self.quota_used += u64::from(count) * cost;
    }
}
