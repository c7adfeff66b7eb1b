use std::fmt;

use crate::util::truncate_chars;
use crate::youtube::types::CommentRecord;

/// 表示用に切り詰める文字数（CSVには影響しない）
const PREVIEW_CHARS: usize = 60;

/// 数値列の集計値
#[derive(Debug, Clone, PartialEq)]
pub struct CountStats {
    pub min: u64,
    pub max: u64,
    pub total: u64,
    pub average: f64,
}

impl CountStats {
    fn from_values(values: impl Iterator<Item = u64>) -> Option<Self> {
        let mut count = 0u64;
        let mut min = u64::MAX;
        let mut max = 0u64;
        let mut total = 0u64;

        for value in values {
            count += 1;
            min = min.min(value);
            max = max.max(value);
            total = total.saturating_add(value);
        }

        (count > 0).then(|| Self {
            min,
            max,
            total,
            average: total as f64 / count as f64,
        })
    }
}

/// 取得結果の集計（コレクションは変更しない）
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryReport {
    pub total_comments: usize,
    pub likes: Option<CountStats>,
    pub replies: Option<CountStats>,
    /// 最もいいねが多いコメント（同数の場合は先に出現したもの）
    pub top_comment: Option<CommentRecord>,
    /// 全件取得できなかった場合true
    pub partial: bool,
}

impl SummaryReport {
    pub fn from_records(records: &[CommentRecord], partial: bool) -> Self {
        // max_by_keyは同値の場合に最後の要素を返すため、自前で先勝ちにする
        let top_comment = records
            .iter()
            .fold(None::<&CommentRecord>, |best, record| match best {
                Some(b) if b.likes() >= record.likes() => Some(b),
                _ => Some(record),
            })
            .cloned();

        Self {
            total_comments: records.len(),
            likes: CountStats::from_values(records.iter().map(CommentRecord::likes)),
            replies: CountStats::from_values(records.iter().map(CommentRecord::reply_count)),
            top_comment,
            partial,
        }
    }
}

impl fmt::Display for SummaryReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "=".repeat(60);
        writeln!(f, "{}", rule)?;
        if self.partial {
            writeln!(f, "SUMMARY STATISTICS (PARTIAL - not all comments were fetched)")?;
        } else {
            writeln!(f, "SUMMARY STATISTICS")?;
        }
        writeln!(f, "{}", rule)?;
        writeln!(f, "Total Comments: {}", self.total_comments)?;

        match (&self.likes, &self.replies) {
            (Some(likes), Some(replies)) => {
                writeln!(f, "Total Likes: {}", likes.total)?;
                writeln!(f, "Total Replies: {}", replies.total)?;
                writeln!(f, "Likes Range: {} - {}", likes.min, likes.max)?;
                writeln!(f, "Average Likes per Comment: {:.2}", likes.average)?;
                writeln!(f, "Replies Range: {} - {}", replies.min, replies.max)?;
                writeln!(f, "Average Replies per Comment: {:.2}", replies.average)?;
            }
            _ => writeln!(f, "No comments to summarize")?,
        }

        if let Some(top) = &self.top_comment {
            writeln!(f, "Most Liked Comment: {} likes", top.likes())?;
            writeln!(f, "  By: {}", top.author_name())?;
            writeln!(f, "  Text: {}", truncate_chars(top.comment_text(), PREVIEW_CHARS))?;
        }

        write!(f, "{}", rule)
    }
}
