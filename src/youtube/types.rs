use serde::{Deserialize, Serialize};

/// ページネーション用の継続トークン
///
/// YouTube API が発行する不透明な文字列。中身は解釈せず、そのまま次のリクエストに渡す。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageToken(String);

impl PageToken {
    /// `nextPageToken` の値からトークンを作る（空文字列は終端扱い）
    pub fn from_response(token: Option<String>) -> Option<Self> {
        token.filter(|t| !t.is_empty()).map(PageToken)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PageToken {
    fn from(token: &str) -> Self {
        PageToken(token.to_string())
    }
}

/// コメントスレッド1件（CSVの1行に対応）
///
/// 構築後は変更しない。フィールドはアクセサ経由でのみ参照する。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommentRecord {
    author_name: String,
    likes: u64,
    reply_count: u64,
    comment_text: String,
}

impl CommentRecord {
    pub fn new(
        author_name: impl Into<String>,
        likes: u64,
        reply_count: u64,
        comment_text: impl Into<String>,
    ) -> Self {
        Self {
            author_name: author_name.into(),
            likes,
            reply_count,
            comment_text: comment_text.into(),
        }
    }

    pub fn author_name(&self) -> &str {
        &self.author_name
    }

    pub fn likes(&self) -> u64 {
        self.likes
    }

    pub fn reply_count(&self) -> u64 {
        self.reply_count
    }

    pub fn comment_text(&self) -> &str {
        &self.comment_text
    }
}

impl From<CommentThreadItem> for CommentRecord {
    /// APIのレスポンス項目を正規化する（欠けている項目は 0 / 空文字列）
    fn from(item: CommentThreadItem) -> Self {
        let snippet = item.snippet.unwrap_or_default();
        let comment = snippet
            .top_level_comment
            .and_then(|c| c.snippet)
            .unwrap_or_default();

        Self {
            author_name: comment.author_display_name.unwrap_or_default(),
            likes: comment.like_count.unwrap_or(0),
            reply_count: snippet.total_reply_count.unwrap_or(0),
            comment_text: comment.text_display.unwrap_or_default(),
        }
    }
}

/// 1ページ分の取得結果
#[derive(Debug, Default)]
pub struct CommentPage {
    pub items: Vec<CommentThreadItem>,
    pub next_page_token: Option<PageToken>,
}

impl From<CommentThreadListResponse> for CommentPage {
    fn from(response: CommentThreadListResponse) -> Self {
        Self {
            items: response.items,
            next_page_token: PageToken::from_response(response.next_page_token),
        }
    }
}

// YouTube API レスポンス型

#[derive(Debug, Deserialize)]
pub struct CommentThreadListResponse {
    #[serde(rename = "nextPageToken")]
    pub next_page_token: Option<String>,
    #[serde(default)]
    pub items: Vec<CommentThreadItem>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommentThreadItem {
    pub snippet: Option<CommentThreadSnippet>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommentThreadSnippet {
    #[serde(rename = "topLevelComment")]
    pub top_level_comment: Option<TopLevelComment>,
    #[serde(rename = "totalReplyCount")]
    pub total_reply_count: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TopLevelComment {
    pub snippet: Option<CommentSnippet>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommentSnippet {
    #[serde(rename = "authorDisplayName")]
    pub author_display_name: Option<String>,
    #[serde(rename = "textDisplay")]
    pub text_display: Option<String>,
    #[serde(rename = "likeCount")]
    pub like_count: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct SearchListResponse {
    #[serde(default)]
    pub items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
pub struct SearchItem {
    pub id: SearchItemId,
    pub snippet: SearchSnippet,
}

#[derive(Debug, Deserialize)]
pub struct SearchItemId {
    #[serde(rename = "channelId")]
    pub channel_id: Option<String>,
    #[serde(rename = "videoId")]
    pub video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchSnippet {
    #[serde(default)]
    pub title: String,
}

/// Google APIのエラーレスポンス
#[derive(Debug, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub errors: Vec<ApiErrorDetail>,
}

#[derive(Debug, Deserialize)]
pub struct ApiErrorDetail {
    #[serde(default)]
    pub reason: String,
}

impl ApiErrorResponse {
    /// 最初のエラー理由（`quotaExceeded` など）
    pub fn reason(&self) -> Option<&str> {
        self.error.errors.first().map(|e| e.reason.as_str())
    }
}
