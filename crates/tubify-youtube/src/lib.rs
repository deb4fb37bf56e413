use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, warn};
use tubify_core::{HttpRequest, HttpResponse, HttpTransport, Service, TubifyError, TubifyResult};

pub const API_BASE: &str = "https://youtube.googleapis.com/youtube/v3";

const DETAIL_PARTS: &str = "snippet,contentDetails,statistics";

/// YouTube Data API client authenticated by a static API key.
#[derive(Clone)]
pub struct YouTubeClient {
    transport: Arc<dyn HttpTransport>,
    api_key: String,
    api_base: String,
}

impl YouTubeClient {
    pub fn new(api_key: impl Into<String>, transport: Arc<dyn HttpTransport>) -> TubifyResult<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(TubifyError::NotConfigured(
                "youtube api key is not configured".to_string(),
            ));
        }
        Ok(Self {
            transport,
            api_key,
            api_base: API_BASE.to_string(),
        })
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// Searches videos. With `limit = 1` the single item is YouTube's top
    /// match.
    pub async fn search(&self, query: &str, limit: u32) -> TubifyResult<Vec<SearchItem>> {
        let request = HttpRequest::get(format!("{}/search", self.api_base))
            .param("part", "snippet")
            .param("maxResults", limit.to_string())
            .param("q", query);

        let response: ListResponse<SearchItem> = self.send(request).await?.decode("youtube search")?;
        debug!(query, results = response.items.len(), "youtube search");
        Ok(response.items)
    }

    pub async fn video(&self, id: &str) -> TubifyResult<Video> {
        let request = HttpRequest::get(format!("{}/videos", self.api_base))
            .param("part", DETAIL_PARTS)
            .param("id", id);

        let response: ListResponse<Video> = self.send(request).await?.decode("youtube video")?;
        response
            .items
            .into_iter()
            .next()
            .ok_or_else(|| TubifyError::no_match(Service::YouTube, id))
    }

    pub async fn channel(&self, id: &str) -> TubifyResult<Channel> {
        let request = HttpRequest::get(format!("{}/channels", self.api_base))
            .param("part", DETAIL_PARTS)
            .param("id", id);

        let response: ListResponse<Channel> = self.send(request).await?.decode("youtube channel")?;
        response
            .items
            .into_iter()
            .next()
            .ok_or_else(|| TubifyError::no_match(Service::YouTube, id))
    }

    async fn send(&self, request: HttpRequest) -> TubifyResult<HttpResponse> {
        let request = request.param("key", self.api_key.as_str());
        let url = request.url.clone();

        let response = self.transport.request(request).await?;
        if !response.is_success() {
            warn!(status = response.status, %url, "youtube request failed");
            return Err(TubifyError::Upstream {
                status: response.status,
                body: response.body_text(),
            });
        }
        Ok(response)
    }
}

/// Video id of the first search item, or `NoMatchFound` for `query`. A first
/// item that is a channel or playlist also counts as no match.
pub fn first_video_id(items: &[SearchItem], query: &str) -> TubifyResult<String> {
    items
        .first()
        .and_then(|item| item.id.video_id.clone())
        .ok_or_else(|| TubifyError::no_match(Service::YouTube, query))
}

#[derive(Debug, Clone, Deserialize)]
struct ListResponse<T> {
    #[serde(default = "Vec::new")]
    items: Vec<T>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchItem {
    pub id: SearchItemId,
    #[serde(default)]
    pub snippet: Option<Snippet>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchItemId {
    #[serde(default)]
    pub kind: Option<String>,
    #[serde(rename = "videoId", default)]
    pub video_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Snippet {
    pub title: String,
    #[serde(rename = "channelTitle", default)]
    pub channel_title: Option<String>,
    #[serde(rename = "channelId", default)]
    pub channel_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Video {
    pub id: String,
    pub snippet: Snippet,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Channel {
    pub id: String,
    pub snippet: ChannelSnippet,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChannelSnippet {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
}
