//! テスト用のページ取得モック

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use super::{
    client::CommentPageFetcher,
    errors::YouTubeError,
    types::{
        CommentPage, CommentSnippet, CommentThreadItem, CommentThreadSnippet, PageToken,
        TopLevelComment,
    },
};

/// 用意した結果を順番に返すフェッチャー
pub struct ScriptedFetcher {
    script: Mutex<VecDeque<Result<CommentPage, YouTubeError>>>,
    requested: Mutex<Vec<Option<String>>>,
}

impl ScriptedFetcher {
    pub fn new(script: Vec<Result<CommentPage, YouTubeError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            requested: Mutex::new(Vec::new()),
        }
    }

    /// fetch_pageが呼ばれた回数
    pub fn calls(&self) -> usize {
        self.requested.lock().unwrap().len()
    }

    /// 各呼び出しで渡されたページトークン
    pub fn requested_tokens(&self) -> Vec<Option<String>> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl CommentPageFetcher for ScriptedFetcher {
    async fn fetch_page(
        &self,
        _video_id: &str,
        page_token: Option<&PageToken>,
    ) -> Result<CommentPage, YouTubeError> {
        self.requested
            .lock()
            .unwrap()
            .push(page_token.map(|t| t.as_str().to_string()));

        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(YouTubeError::ParseError("script exhausted".to_string())))
    }
}

/// 用意したページを返し終えた後は応答しないフェッチャー（通信中のキャンセル確認用）
pub struct StallingFetcher {
    pages: Mutex<VecDeque<Result<CommentPage, YouTubeError>>>,
    stalled: AtomicUsize,
}

impl StallingFetcher {
    pub fn new(pages: Vec<Result<CommentPage, YouTubeError>>) -> Self {
        Self {
            pages: Mutex::new(pages.into()),
            stalled: AtomicUsize::new(0),
        }
    }

    /// 応答を返さずに止まった呼び出しの回数
    pub fn stalled_calls(&self) -> usize {
        self.stalled.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CommentPageFetcher for StallingFetcher {
    async fn fetch_page(
        &self,
        _video_id: &str,
        _page_token: Option<&PageToken>,
    ) -> Result<CommentPage, YouTubeError> {
        let next = self.pages.lock().unwrap().pop_front();
        match next {
            Some(result) => result,
            None => {
                self.stalled.fetch_add(1, Ordering::SeqCst);
                std::future::pending().await
            }
        }
    }
}

/// APIレスポンス相当のコメントスレッド項目を作る
pub fn thread(author: &str, likes: u64, replies: u64, text: &str) -> CommentThreadItem {
    CommentThreadItem {
        snippet: Some(CommentThreadSnippet {
            top_level_comment: Some(TopLevelComment {
                snippet: Some(CommentSnippet {
                    author_display_name: Some(author.to_string()),
                    text_display: Some(text.to_string()),
                    like_count: Some(likes),
                }),
            }),
            total_reply_count: Some(replies),
        }),
    }
}

pub fn page(items: Vec<CommentThreadItem>, next: Option<&str>) -> Result<CommentPage, YouTubeError> {
    Ok(CommentPage {
        items,
        next_page_token: next.map(PageToken::from),
    })
}
