use rand::Rng;
use std::time::Duration;

use crate::config::RetryPolicy;

/// 指数バックオフを管理する構造体
/// エラー時のリトライ間隔を指数的に増加させる（1s→2s→4s→8s→16s...）
///
/// 状態は1回のページ取得のリトライ内だけで使い、ページをまたいで共有しない。
#[derive(Debug)]
pub struct ExponentialBackoff {
    base_delay: Duration,
    max_delay: Duration,
    /// 最大リトライ回数（初回の試行は含まない）
    max_retries: u32,
    current_attempt: u32,
    jitter: bool,
}

impl ExponentialBackoff {
    /// リトライ設定からインスタンスを作成
    ///
    /// `max_attempts` は初回を含む試行回数なので、リトライ回数はそれより1少ない
    pub fn from_policy(policy: &RetryPolicy) -> Self {
        Self {
            base_delay: policy.base_delay,
            max_delay: policy.max_delay,
            max_retries: policy.max_attempts.saturating_sub(1),
            current_attempt: 0,
            jitter: policy.jitter,
        }
    }

    /// カスタム設定でExponentialBackoffインスタンスを作成（ジッタなし）
    pub fn with_config(base_delay: Duration, max_delay: Duration, max_retries: u32) -> Self {
        Self {
            base_delay,
            max_delay,
            max_retries,
            current_attempt: 0,
            jitter: false,
        }
    }

    /// 次のリトライまでの待機時間を計算して返す
    ///
    /// 計算式: base_delay * 2^current_attempt（max_delayで頭打ち）
    /// ジッタ有効時は 0.5〜1.0 倍の乱数を掛ける
    pub fn next_delay(&mut self) -> Duration {
        let factor = 2u32.checked_pow(self.current_attempt).unwrap_or(u32::MAX);
        let delay = self
            .base_delay
            .checked_mul(factor)
            .unwrap_or(self.max_delay)
            .min(self.max_delay);
        self.current_attempt += 1;

        if self.jitter {
            delay.mul_f64(rand::thread_rng().gen_range(0.5..=1.0))
        } else {
            delay
        }
    }

    /// これまでに払い出したリトライ回数を取得
    pub fn attempt_count(&self) -> u32 {
        self.current_attempt
    }

    /// 最大リトライ回数に達したかどうかを確認
    pub fn has_exceeded_max_attempts(&self) -> bool {
        self.current_attempt >= self.max_retries
    }

    /// リトライを続行すべきかどうかを確認
    pub fn should_retry(&self) -> bool {
        !self.has_exceeded_max_attempts()
    }
}
