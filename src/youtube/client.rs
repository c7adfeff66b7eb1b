use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};

use super::{errors::YouTubeError, types::*};
use crate::config::{self, API_BASE, MAX_RESULTS_PER_PAGE};

/// コメントスレッドを1ページ取得する処理
///
/// リトライは行わない（呼び出し側の責務）。
#[async_trait]
pub trait CommentPageFetcher: Send + Sync {
    async fn fetch_page(
        &self,
        video_id: &str,
        page_token: Option<&PageToken>,
    ) -> Result<CommentPage, YouTubeError>;
}

#[derive(Clone)]
pub struct YouTubeClient {
    client: Client,
    api_key: String,
    api_base: String,
}

impl YouTubeClient {
    /// 新しいクライアントを作成
    ///
    /// # Errors
    /// HTTPクライアントのビルドに失敗した場合にエラーを返す
    pub fn new(api_key: String) -> Result<Self, YouTubeError> {
        Self::with_base_url(api_key, API_BASE)
    }

    /// APIのベースURLを指定してクライアントを作成（テスト・プロキシ用）
    pub fn with_base_url(api_key: String, api_base: &str) -> Result<Self, YouTubeError> {
        let client = Client::builder().timeout(config::http_timeout()).build()?;

        Ok(Self {
            client,
            api_key,
            api_base: api_base.trim_end_matches('/').to_string(),
        })
    }

    /// チャンネル名で検索し、最初に見つかったチャンネルのIDを返す（クォータ100消費）
    pub async fn find_channel(&self, query: &str) -> Result<String, YouTubeError> {
        log::info!("Searching for channel: {} (quota cost: 100 units)", query);

        let url = format!("{}/search", self.api_base);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("part", "snippet"),
                ("type", "channel"),
                ("maxResults", "5"),
                ("q", query),
                ("key", &self.api_key),
            ])
            .send()
            .await?;

        if response.status() != StatusCode::OK {
            return Err(error_from_response(response).await);
        }

        let data: SearchListResponse = response.json().await?;

        log::info!("Found {} channel candidate(s)", data.items.len());
        for (i, item) in data.items.iter().enumerate() {
            log::info!(
                "  {}. {} (ID: {})",
                i + 1,
                item.snippet.title,
                item.id.channel_id.as_deref().unwrap_or("-")
            );
        }

        let (channel_id, title) = data
            .items
            .into_iter()
            .find_map(|item| item.id.channel_id.map(|id| (id, item.snippet.title)))
            .ok_or_else(|| YouTubeError::ChannelNotFound(query.to_string()))?;

        log::info!("Using channel: {} ({})", title, channel_id);
        Ok(channel_id)
    }

    /// チャンネルの最新動画（公開日時が最も新しいもの）のIDを返す（クォータ100消費）
    pub async fn get_latest_video(&self, channel_id: &str) -> Result<String, YouTubeError> {
        log::info!(
            "Fetching latest video from channel {} (quota cost: 100 units)",
            channel_id
        );

        let url = format!("{}/search", self.api_base);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("part", "snippet"),
                ("type", "video"),
                ("order", "date"),
                ("maxResults", "1"),
                ("channelId", channel_id),
                ("key", &self.api_key),
            ])
            .send()
            .await?;

        if response.status() != StatusCode::OK {
            return Err(error_from_response(response).await);
        }

        let data: SearchListResponse = response.json().await?;

        let (video_id, title) = data
            .items
            .into_iter()
            .find_map(|item| item.id.video_id.map(|id| (id, item.snippet.title)))
            .ok_or_else(|| YouTubeError::NoVideosFound(channel_id.to_string()))?;

        log::info!("Latest video: {} (ID: {})", title, video_id);
        Ok(video_id)
    }
}

#[async_trait]
impl CommentPageFetcher for YouTubeClient {
    /// コメントスレッドを1ページ取得（クォータ1消費）
    async fn fetch_page(
        &self,
        video_id: &str,
        page_token: Option<&PageToken>,
    ) -> Result<CommentPage, YouTubeError> {
        let url = format!("{}/commentThreads", self.api_base);
        let max_results = MAX_RESULTS_PER_PAGE.to_string();

        let mut query_params = vec![
            ("part", "snippet"),
            ("videoId", video_id),
            ("maxResults", max_results.as_str()),
            ("textFormat", "plainText"),
            ("key", self.api_key.as_str()),
        ];

        // pageTokenがある場合は追加
        if let Some(token) = page_token {
            query_params.push(("pageToken", token.as_str()));
            log::debug!("Using page token: {}", token.as_str());
        }

        let response = self.client.get(&url).query(&query_params).send().await?;

        match response.status() {
            StatusCode::OK => {
                let body = response.text().await?;
                let data: CommentThreadListResponse = serde_json::from_str(&body)
                    .map_err(|e| YouTubeError::ParseError(format!("commentThreads: {}", e)))?;
                log::debug!(
                    "Fetched {} comment threads (next page: {})",
                    data.items.len(),
                    data.next_page_token.is_some()
                );
                Ok(data.into())
            }
            StatusCode::NOT_FOUND => {
                log::error!("Video not found: {}", video_id);
                Err(YouTubeError::VideoNotFound(video_id.to_string()))
            }
            _ => Err(error_from_response(response).await),
        }
    }
}

/// 200以外のレスポンスをエラーに変換する
async fn error_from_response(response: Response) -> YouTubeError {
    let status = response.status();
    let error_text = response.text().await.unwrap_or_default();

    // reasonはエラーJSONから取り出す。JSONでなければ本文の文字列で判定する
    let reason = serde_json::from_str::<ApiErrorResponse>(&error_text)
        .ok()
        .and_then(|e| e.reason().map(str::to_string));
    let has_reason = |name: &str| match &reason {
        Some(r) => r == name,
        None => error_text.contains(name),
    };

    match status {
        StatusCode::BAD_REQUEST => {
            if has_reason("keyInvalid") {
                log::error!("API key is invalid");
                YouTubeError::InvalidApiKey
            } else {
                log::error!("YouTube API bad request: {}", error_text);
                YouTubeError::BadRequest(error_text)
            }
        }
        StatusCode::UNAUTHORIZED => {
            log::error!("Unauthorized - API key invalid");
            YouTubeError::InvalidApiKey
        }
        StatusCode::FORBIDDEN => {
            if has_reason("quotaExceeded") || has_reason("dailyLimitExceeded") {
                log::error!("Quota exceeded - daily limit reached");
                YouTubeError::QuotaExceeded
            } else if has_reason("rateLimitExceeded") || has_reason("userRateLimitExceeded") {
                log::warn!("Rate limit exceeded - will retry with backoff");
                YouTubeError::RateLimitExceeded
            } else if has_reason("commentsDisabled") {
                log::error!("Comments are disabled for this video");
                YouTubeError::CommentsDisabled
            } else {
                log::error!("API key invalid or insufficient permissions: {}", error_text);
                YouTubeError::InvalidApiKey
            }
        }
        StatusCode::NOT_FOUND => {
            log::error!("Requested resource not found: {}", error_text);
            YouTubeError::ApiError {
                status: status.as_u16(),
                message: error_text,
            }
        }
        StatusCode::TOO_MANY_REQUESTS => {
            log::warn!("Too many requests - will retry with backoff");
            YouTubeError::RateLimitExceeded
        }
        status if status.is_server_error() => {
            log::warn!("YouTube API server error: {}", status);
            YouTubeError::ServerError(status.as_u16())
        }
        status => {
            log::error!(
                "Unexpected API response - status: {}, body: {}",
                status,
                error_text
            );
            YouTubeError::ApiError {
                status: status.as_u16(),
                message: error_text,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::youtube::errors::FailureClass;
    use mockito::Matcher;

    const PAGE_ONE: &str = r#"{
        "nextPageToken": "c1",
        "items": [
            {"snippet": {"totalReplyCount": 0, "topLevelComment": {"snippet": {
                "authorDisplayName": "Ana", "textDisplay": "Hi", "likeCount": 5}}}},
            {"snippet": {"totalReplyCount": 1, "topLevelComment": {"snippet": {
                "authorDisplayName": "Bo", "textDisplay": "Hello, \"friend\"", "likeCount": 0}}}}
        ]
    }"#;

    fn forbidden_body(reason: &str) -> String {
        format!(
            r#"{{"error": {{"code": 403, "message": "forbidden", "errors": [{{"reason": "{}"}}]}}}}"#,
            reason
        )
    }

    #[tokio::test]
    async fn test_fetch_first_page() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/commentThreads")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("videoId".into(), "vid123".into()),
                Matcher::UrlEncoded("maxResults".into(), "100".into()),
                Matcher::UrlEncoded("textFormat".into(), "plainText".into()),
                Matcher::UrlEncoded("key".into(), "test-key".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(PAGE_ONE)
            .create_async()
            .await;

        let client = YouTubeClient::with_base_url("test-key".to_string(), &server.url()).unwrap();
        let page = client.fetch_page("vid123", None).await.unwrap();

        mock.assert_async().await;
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.next_page_token, Some(PageToken::from("c1")));

        let records: Vec<CommentRecord> = page.items.into_iter().map(Into::into).collect();
        assert_eq!(records[1], CommentRecord::new("Bo", 0, 1, "Hello, \"friend\""));
    }

    #[tokio::test]
    async fn test_fetch_passes_page_token_through() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/commentThreads")
            .match_query(Matcher::UrlEncoded("pageToken".into(), "QURTSl9p+/=".into()))
            .with_status(200)
            .with_body(r#"{"items": []}"#)
            .create_async()
            .await;

        let client = YouTubeClient::with_base_url("k".to_string(), &server.url()).unwrap();
        let token = PageToken::from("QURTSl9p+/=");
        let page = client.fetch_page("vid123", Some(&token)).await.unwrap();

        mock.assert_async().await;
        assert!(page.items.is_empty());
        assert_eq!(page.next_page_token, None);
    }

    #[tokio::test]
    async fn test_malformed_body_is_fatal() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/commentThreads")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("<html>not json</html>")
            .create_async()
            .await;

        let client = YouTubeClient::with_base_url("k".to_string(), &server.url()).unwrap();
        let err = client.fetch_page("vid123", None).await.unwrap_err();

        assert!(matches!(err, YouTubeError::ParseError(_)));
        assert_eq!(err.class(), FailureClass::Fatal);
    }

    #[tokio::test]
    async fn test_status_classification() {
        let cases: Vec<(usize, String, FailureClass)> = vec![
            (403, forbidden_body("rateLimitExceeded"), FailureClass::Transient),
            (403, forbidden_body("quotaExceeded"), FailureClass::QuotaExhausted),
            (403, forbidden_body("commentsDisabled"), FailureClass::Fatal),
            (403, forbidden_body("forbidden"), FailureClass::Fatal),
            (401, String::new(), FailureClass::Fatal),
            (404, String::new(), FailureClass::Fatal),
            (429, String::new(), FailureClass::Transient),
            (503, String::new(), FailureClass::Transient),
        ];

        for (status, body, expected) in cases {
            let mut server = mockito::Server::new_async().await;
            server
                .mock("GET", "/commentThreads")
                .match_query(Matcher::Any)
                .with_status(status)
                .with_body(body.clone())
                .create_async()
                .await;

            let client = YouTubeClient::with_base_url("k".to_string(), &server.url()).unwrap();
            let err = client.fetch_page("vid123", None).await.unwrap_err();
            assert_eq!(err.class(), expected, "status {} body {}", status, body);
        }
    }

    #[tokio::test]
    async fn test_key_invalid_from_plain_text_body() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/commentThreads")
            .match_query(Matcher::Any)
            .with_status(400)
            .with_body("reason: keyInvalid")
            .create_async()
            .await;

        let client = YouTubeClient::with_base_url("k".to_string(), &server.url()).unwrap();
        let err = client.fetch_page("vid123", None).await.unwrap_err();
        assert!(matches!(err, YouTubeError::InvalidApiKey));
    }

    #[tokio::test]
    async fn test_connection_error_is_transient() {
        // 接続先がない（ポート番号は閉じている想定）
        let client =
            YouTubeClient::with_base_url("k".to_string(), "http://127.0.0.1:9").unwrap();
        let err = client.fetch_page("vid123", None).await.unwrap_err();
        assert!(err.is_transient());
    }

    #[tokio::test]
    async fn test_malformed_base_url_is_fatal() {
        let client = YouTubeClient::with_base_url("k".to_string(), "not a url").unwrap();
        let err = client.fetch_page("vid123", None).await.unwrap_err();

        assert!(matches!(err, YouTubeError::HttpError(_)));
        assert_eq!(err.class(), FailureClass::Fatal);
    }

    #[tokio::test]
    async fn test_find_channel_picks_first_result() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/search")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("type".into(), "channel".into()),
                Matcher::UrlEncoded("q".into(), "Pop the Balloon".into()),
            ]))
            .with_status(200)
            .with_body(
                r#"{"items": [
                    {"id": {"channelId": "UC1"}, "snippet": {"title": "Pop the Balloon"}},
                    {"id": {"channelId": "UC2"}, "snippet": {"title": "Pop the Balloon Clips"}}
                ]}"#,
            )
            .create_async()
            .await;

        let client = YouTubeClient::with_base_url("k".to_string(), &server.url()).unwrap();
        assert_eq!(client.find_channel("Pop the Balloon").await.unwrap(), "UC1");
    }

    #[tokio::test]
    async fn test_find_channel_without_results() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/search")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"items": []}"#)
            .create_async()
            .await;

        let client = YouTubeClient::with_base_url("k".to_string(), &server.url()).unwrap();
        let err = client.find_channel("nobody").await.unwrap_err();
        assert!(matches!(err, YouTubeError::ChannelNotFound(q) if q == "nobody"));
    }

    #[tokio::test]
    async fn test_get_latest_video() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/search")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("channelId".into(), "UC1".into()),
                Matcher::UrlEncoded("order".into(), "date".into()),
                Matcher::UrlEncoded("type".into(), "video".into()),
            ]))
            .with_status(200)
            .with_body(r#"{"items": [{"id": {"videoId": "vid9"}, "snippet": {"title": "Episode 9"}}]}"#)
            .create_async()
            .await;

        let client = YouTubeClient::with_base_url("k".to_string(), &server.url()).unwrap();
        assert_eq!(client.get_latest_video("UC1").await.unwrap(), "vid9");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_get_latest_video_empty_channel() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/search")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"items": []}"#)
            .create_async()
            .await;

        let client = YouTubeClient::with_base_url("k".to_string(), &server.url()).unwrap();
        let err = client.get_latest_video("UC1").await.unwrap_err();
        assert!(matches!(err, YouTubeError::NoVideosFound(_)));
    }
}
