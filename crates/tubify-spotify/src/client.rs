use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, warn};
use tubify_core::{
    HttpRequest, HttpResponse, HttpTransport, Service, SpotifyAuth, TubifyError, TubifyResult,
};
use tubify_link::spotify_track_url;

use crate::token::TokenManager;

pub const API_BASE: &str = "https://api.spotify.com/v1";

pub struct SpotifyClient {
    transport: Arc<dyn HttpTransport>,
    tokens: TokenManager,
    api_base: String,
}

impl SpotifyClient {
    pub fn new(auth: SpotifyAuth, transport: Arc<dyn HttpTransport>) -> TubifyResult<Self> {
        let tokens = TokenManager::new(auth, Arc::clone(&transport))?;
        Ok(Self::with_tokens(tokens, transport))
    }

    pub fn with_tokens(tokens: TokenManager, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            transport,
            tokens,
            api_base: API_BASE.to_string(),
        }
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    pub fn tokens(&self) -> &TokenManager {
        &self.tokens
    }

    /// Searches tracks. Order is whatever Spotify ranks first.
    pub async fn search_tracks(&self, query: &str, limit: u32) -> TubifyResult<Vec<Track>> {
        let request = HttpRequest::get(format!("{}/search", self.api_base))
            .param("q", query)
            .param("type", "track")
            .param("include_external", "audio")
            .param("limit", limit.to_string());

        let response: SearchResponse = self.send(request).await?.decode("spotify search")?;
        debug!(query, results = response.tracks.items.len(), "spotify search");
        Ok(response.tracks.items)
    }

    pub async fn track(&self, id: &str) -> TubifyResult<Track> {
        let request = HttpRequest::get(format!("{}/tracks/{id}", self.api_base));
        self.send(request).await?.decode("spotify track")
    }

    async fn send(&self, request: HttpRequest) -> TubifyResult<HttpResponse> {
        let authorization = self.tokens.authorization().await?;
        let request = request
            .header("Authorization", authorization)
            .header("Content-Type", "application/json");
        let url = request.url.clone();

        let response = self.transport.request(request).await?;
        if !response.is_success() {
            warn!(status = response.status, %url, "spotify request failed");
            return Err(TubifyError::Upstream {
                status: response.status,
                body: response.body_text(),
            });
        }
        Ok(response)
    }
}

/// First track URL of a search, or `NoMatchFound` for `query`.
pub fn first_track_url(tracks: &[Track], query: &str) -> TubifyResult<String> {
    tracks
        .first()
        .and_then(Track::url)
        .ok_or_else(|| TubifyError::no_match(Service::Spotify, query))
}

#[derive(Debug, Clone, Default, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    tracks: TrackPage,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct TrackPage {
    #[serde(default)]
    items: Vec<Track>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Track {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub artists: Vec<Artist>,
    #[serde(default)]
    pub external_urls: ExternalUrls,
}

impl Track {
    pub fn primary_artist(&self) -> Option<&str> {
        self.artists.first().map(|artist| artist.name.as_str())
    }

    pub fn url(&self) -> Option<String> {
        self.external_urls
            .spotify
            .clone()
            .or_else(|| self.id.as_deref().map(spotify_track_url))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Artist {
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExternalUrls {
    pub spotify: Option<String>,
}
