use std::sync::Arc;

use tracing::{debug, info};
use tubify_core::{
    ConversionResult, HttpTransport, Service, SpotifyAuth, TubifyError, TubifyResult,
};
use tubify_link::{
    ServiceLink, classify, looks_like_link, to_canonical, to_music_variant, video_url,
};
use tubify_spotify::{SpotifyClient, first_track_url};
use tubify_youtube::{YouTubeClient, first_video_id};

use crate::identity::{search_key, track_identity, video_identity};

const SEARCH_LIMIT: u32 = 1;

#[derive(Debug, Clone, Default)]
pub struct ConverterConfig {
    pub youtube_api_key: Option<String>,
    pub spotify: SpotifyAuth,
}

/// Resolves a link or title into equivalent Spotify, YouTube and YouTube
/// Music links. Matching is text search: the first hit on the other service
/// wins, so results are plausible rather than guaranteed.
pub struct Converter {
    youtube: Option<YouTubeClient>,
    spotify: Option<SpotifyClient>,
}

impl Converter {
    pub fn new(config: ConverterConfig, transport: Arc<dyn HttpTransport>) -> TubifyResult<Self> {
        let youtube = match config.youtube_api_key {
            Some(key) if !key.trim().is_empty() => {
                Some(YouTubeClient::new(key, Arc::clone(&transport))?)
            }
            _ => None,
        };
        let spotify = if config.spotify.is_enabled() {
            Some(SpotifyClient::new(config.spotify, transport)?)
        } else {
            None
        };
        Ok(Self::from_clients(youtube, spotify))
    }

    pub fn from_clients(youtube: Option<YouTubeClient>, spotify: Option<SpotifyClient>) -> Self {
        Self { youtube, spotify }
    }

    pub fn is_enabled(&self) -> bool {
        self.youtube.is_some() && self.spotify.is_some()
    }

    pub fn youtube(&self) -> Option<&YouTubeClient> {
        self.youtube.as_ref()
    }

    pub fn spotify(&self) -> Option<&SpotifyClient> {
        self.spotify.as_ref()
    }

    /// Links go through [`Converter::from_link`], including pasted links
    /// without a scheme such as `youtu.be/<id>`. Anything else is a title.
    pub async fn convert(&self, input: &str) -> TubifyResult<ConversionResult> {
        if looks_like_link(input) {
            self.from_link(input).await
        } else {
            self.from_title(input).await
        }
    }

    pub async fn from_link(&self, link: &str) -> TubifyResult<ConversionResult> {
        let (youtube, spotify) = self.clients()?;
        let link = classify(link)?;
        debug!(service = %link.service(), id = link.id(), "classified link");

        let result = match &link {
            ServiceLink::SpotifyTrack { id, url } => {
                let track = spotify.track(id).await?;
                let name = search_key(&track_identity(&track));
                let items = youtube.search(&name, SEARCH_LIMIT).await?;
                let youtube_url = video_url(&first_video_id(&items, &name)?);

                ConversionResult {
                    youtube_music: to_music_variant(&youtube_url),
                    youtube: youtube_url,
                    spotify: url.clone(),
                    name,
                    source: Some(Service::Spotify),
                }
            }
            ServiceLink::YouTubeVideo { id, url } | ServiceLink::YouTubeMusic { id, url } => {
                let video = youtube.video(id).await?;
                let name = search_key(&video_identity(&video));
                let (youtube_url, youtube_music) = match link.service() {
                    Service::YouTubeMusic => (to_canonical(url), url.clone()),
                    _ => (url.clone(), to_music_variant(url)),
                };
                let tracks = spotify.search_tracks(&name, SEARCH_LIMIT).await?;

                ConversionResult {
                    youtube: youtube_url,
                    youtube_music,
                    spotify: first_track_url(&tracks, &name)?,
                    name,
                    source: Some(link.service()),
                }
            }
        };

        info!(name = %result.name, source = %link.service(), "converted link");
        Ok(result)
    }

    /// Searches both services for `name` as given; no cleanup is applied.
    pub async fn from_title(&self, name: &str) -> TubifyResult<ConversionResult> {
        let (youtube, spotify) = self.clients()?;

        let (videos, tracks) = tokio::join!(
            youtube.search(name, SEARCH_LIMIT),
            spotify.search_tracks(name, SEARCH_LIMIT)
        );
        // YouTube errors take precedence, as if the searches ran in sequence.
        let youtube_url = video_url(&first_video_id(&videos?, name)?);
        let spotify_url = first_track_url(&tracks?, name)?;

        info!(name, "converted title");
        Ok(ConversionResult {
            youtube_music: to_music_variant(&youtube_url),
            youtube: youtube_url,
            spotify: spotify_url,
            name: name.to_string(),
            source: None,
        })
    }

    fn clients(&self) -> TubifyResult<(&YouTubeClient, &SpotifyClient)> {
        let youtube = self.youtube.as_ref().ok_or_else(|| {
            TubifyError::NotConfigured("converter needs a youtube api key".to_string())
        })?;
        let spotify = self.spotify.as_ref().ok_or_else(|| {
            TubifyError::NotConfigured("converter needs spotify credentials".to_string())
        })?;
        Ok((youtube, spotify))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};
    use tubify_core::mock::MockTransport;

    use super::*;

    const BRIGHTSIDE: &str = "https://open.spotify.com/track/3n3Ppam7vgaVa1iaRUc9Lp";

    fn config() -> ConverterConfig {
        ConverterConfig {
            youtube_api_key: Some("yt-key".to_string()),
            spotify: SpotifyAuth::Service {
                client_id: "id".to_string(),
                client_secret: "secret".to_string(),
            },
        }
    }

    fn base_transport() -> MockTransport {
        MockTransport::new().route("/api/token", 200, json!({"access_token": "tok"}))
    }

    fn converter(transport: &Arc<MockTransport>) -> Converter {
        Converter::new(config(), transport.clone()).unwrap()
    }

    fn video_search(video_id: &str) -> Value {
        json!({"items": [{"id": {"videoId": video_id}}]})
    }

    fn spotify_search(url: &str) -> Value {
        json!({"tracks": {"items": [{
            "name": "Mr. Brightside",
            "artists": [{"name": "The Killers"}],
            "external_urls": {"spotify": url}
        }]}})
    }

    fn video_details(title: &str, channel: &str) -> Value {
        json!({"items": [{"id": "gGdGFtwCNBE", "snippet": {"title": title, "channelTitle": channel}}]})
    }

    #[tokio::test]
    async fn spotify_link_resolves_to_youtube() {
        let transport = Arc::new(
            base_transport()
                .route(
                    "/v1/tracks/3n3Ppam7vgaVa1iaRUc9Lp",
                    200,
                    json!({"name": "Mr. Brightside", "artists": [{"name": "The Killers"}]}),
                )
                .route("/youtube/v3/search", 200, video_search("gGdGFtwCNBE")),
        );

        let result = converter(&transport).from_link(BRIGHTSIDE).await.unwrap();

        assert_eq!(result.youtube, "https://www.youtube.com/watch?v=gGdGFtwCNBE");
        assert_eq!(result.youtube_music, "https://music.youtube.com/watch?v=gGdGFtwCNBE");
        assert_eq!(result.spotify, BRIGHTSIDE);
        assert_eq!(result.name, "Mr. Brightside The Killers");
        assert_eq!(result.source, Some(Service::Spotify));
        assert!(result.is_complete());

        let search = transport
            .requests()
            .into_iter()
            .find(|request| request.url.ends_with("/youtube/v3/search"))
            .unwrap();
        assert_eq!(search.param_value("q"), Some("Mr. Brightside The Killers"));
        assert_eq!(search.param_value("maxResults"), Some("1"));
    }

    #[tokio::test]
    async fn empty_video_search_is_no_match() {
        let transport = Arc::new(
            base_transport()
                .route(
                    "/v1/tracks/",
                    200,
                    json!({"name": "Obscure B-Side", "artists": [{"name": "Nobody"}]}),
                )
                .route("/youtube/v3/search", 200, json!({"items": []})),
        );

        match converter(&transport).from_link(BRIGHTSIDE).await {
            Err(TubifyError::NoMatchFound { service, query }) => {
                assert_eq!(service, Service::YouTube);
                assert_eq!(query, "Obscure B-Side Nobody");
            }
            other => panic!("expected no match, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn youtube_link_resolves_to_spotify_with_cleaned_name() {
        let transport = Arc::new(
            base_transport()
                .route("/videos", 200, video_details("Mr. Brightside", "TheKillersVEVO"))
                .route("/v1/search", 200, spotify_search(BRIGHTSIDE)),
        );
        let input = "https://www.youtube.com/watch?v=gGdGFtwCNBE";

        let result = converter(&transport).from_link(input).await.unwrap();

        assert_eq!(result.youtube, input);
        assert_eq!(result.youtube_music, "https://music.youtube.com/watch?v=gGdGFtwCNBE");
        assert_eq!(result.spotify, BRIGHTSIDE);
        assert_eq!(result.name, "Mr. Brightside TheKillers");
        assert_eq!(result.source, Some(Service::YouTube));

        let search = transport
            .requests()
            .into_iter()
            .find(|request| request.url.ends_with("/v1/search"))
            .unwrap();
        assert_eq!(search.param_value("q"), Some("Mr. Brightside TheKillers"));
    }

    #[tokio::test]
    async fn music_link_is_echoed_in_the_music_slot() {
        let transport = Arc::new(
            base_transport()
                .route("/videos", 200, video_details("Mr. Brightside", "The Killers - Topic"))
                .route("/v1/search", 200, spotify_search(BRIGHTSIDE)),
        );
        let input = "https://music.youtube.com/watch?v=gGdGFtwCNBE";

        let result = converter(&transport).from_link(input).await.unwrap();

        assert_eq!(result.youtube_music, input);
        assert_eq!(result.youtube, "https://www.youtube.com/watch?v=gGdGFtwCNBE");
        assert_eq!(result.name, "Mr. Brightside The Killers");
        assert_eq!(result.source, Some(Service::YouTubeMusic));
    }

    #[tokio::test]
    async fn short_link_is_expanded() {
        let transport = Arc::new(
            base_transport()
                .route("/videos", 200, video_details("Mr. Brightside", "The Killers"))
                .route("/v1/search", 200, spotify_search(BRIGHTSIDE)),
        );

        let result = converter(&transport)
            .from_link("https://youtu.be/gGdGFtwCNBE")
            .await
            .unwrap();

        assert_eq!(result.youtube, "https://www.youtube.com/watch?v=gGdGFtwCNBE");
        assert_eq!(result.youtube_music, "https://music.youtube.com/watch?v=gGdGFtwCNBE");
        let lookup = transport
            .requests()
            .into_iter()
            .find(|request| request.url.ends_with("/videos"))
            .unwrap();
        assert_eq!(lookup.param_value("id"), Some("gGdGFtwCNBE"));
    }

    #[tokio::test]
    async fn empty_spotify_search_is_no_match() {
        let transport = Arc::new(
            base_transport()
                .route("/videos", 200, video_details("Home Video", "Someone"))
                .route("/v1/search", 200, json!({"tracks": {"items": []}})),
        );

        let result = converter(&transport)
            .from_link("https://www.youtube.com/watch?v=gGdGFtwCNBE")
            .await;
        assert!(matches!(
            result,
            Err(TubifyError::NoMatchFound {
                service: Service::Spotify,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn title_searches_both_services_verbatim() {
        let transport = Arc::new(
            base_transport()
                .route("/youtube/v3/search", 200, video_search("gGdGFtwCNBE"))
                .route("/v1/search", 200, spotify_search(BRIGHTSIDE)),
        );
        let name = "Mr. Brightside TheKillersVEVO";

        let result = converter(&transport).from_title(name).await.unwrap();

        assert_eq!(result.youtube, "https://www.youtube.com/watch?v=gGdGFtwCNBE");
        assert_eq!(result.youtube_music, "https://music.youtube.com/watch?v=gGdGFtwCNBE");
        assert_eq!(result.spotify, BRIGHTSIDE);
        assert_eq!(result.name, name);
        assert_eq!(result.source, None);

        for request in transport.requests() {
            if request.url.ends_with("/search") {
                assert_eq!(request.param_value("q"), Some(name));
            }
        }
    }

    #[tokio::test]
    async fn title_reports_youtube_failure_first() {
        let transport = Arc::new(
            base_transport()
                .route("/youtube/v3/search", 200, json!({"items": []}))
                .route("/v1/search", 500, json!({"error": "boom"})),
        );

        let result = converter(&transport).from_title("anything").await;
        assert!(matches!(
            result,
            Err(TubifyError::NoMatchFound {
                service: Service::YouTube,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn upstream_errors_propagate() {
        let transport = Arc::new(
            base_transport().route("/videos", 403, json!({"error": {"message": "quotaExceeded"}})),
        );

        let result = converter(&transport)
            .from_link("https://www.youtube.com/watch?v=gGdGFtwCNBE")
            .await;
        assert!(matches!(result, Err(TubifyError::Upstream { status: 403, .. })));
    }

    #[tokio::test]
    async fn invalid_link_fails_before_any_request() {
        let transport = Arc::new(base_transport());

        let result = converter(&transport)
            .from_link("https://www.youtube.com/feed/trending")
            .await;
        assert!(matches!(result, Err(TubifyError::InvalidLink(_))));
        assert_eq!(transport.total(), 0);
    }

    #[tokio::test]
    async fn missing_credentials_disable_the_converter() {
        let transport = Arc::new(base_transport());
        let converter = Converter::new(ConverterConfig::default(), transport.clone()).unwrap();
        assert!(!converter.is_enabled());

        assert!(matches!(
            converter.from_link(BRIGHTSIDE).await,
            Err(TubifyError::NotConfigured(_))
        ));
        assert!(matches!(
            converter.from_title("Mr. Brightside").await,
            Err(TubifyError::NotConfigured(_))
        ));
        assert_eq!(transport.total(), 0);
    }

    #[tokio::test]
    async fn spotify_alone_does_not_enable_the_converter() {
        let transport = Arc::new(base_transport());
        let config = ConverterConfig {
            youtube_api_key: None,
            ..config()
        };
        let converter = Converter::new(config, transport.clone()).unwrap();

        assert!(converter.spotify().is_some());
        assert!(converter.youtube().is_none());
        assert!(matches!(
            converter.from_title("anything").await,
            Err(TubifyError::NotConfigured(_))
        ));
        assert_eq!(transport.total(), 0);
    }

    #[tokio::test]
    async fn convert_dispatches_on_input_shape() {
        let transport = Arc::new(
            base_transport()
                .route("/youtube/v3/search", 200, video_search("gGdGFtwCNBE"))
                .route("/v1/search", 200, spotify_search(BRIGHTSIDE)),
        );

        let result = converter(&transport).convert("Mr. Brightside").await.unwrap();
        assert_eq!(result.source, None);
        assert_eq!(transport.count("/videos"), 0);
    }

    #[tokio::test]
    async fn schemeless_short_link_is_converted_as_a_link() {
        let transport = Arc::new(
            base_transport()
                .route("/videos", 200, video_details("Mr. Brightside", "The Killers"))
                .route("/v1/search", 200, spotify_search(BRIGHTSIDE)),
        );

        let result = converter(&transport).convert("youtu.be/gGdGFtwCNBE").await.unwrap();

        assert_eq!(result.source, Some(Service::YouTube));
        assert_eq!(result.youtube, "https://www.youtube.com/watch?v=gGdGFtwCNBE");
        assert_eq!(result.spotify, BRIGHTSIDE);
        assert_eq!(transport.count("/videos"), 1);
        assert_eq!(transport.count("/youtube/v3/search"), 0);
    }

    #[tokio::test]
    async fn schemeless_spotify_link_is_converted_as_a_link() {
        let transport = Arc::new(
            base_transport()
                .route(
                    "/v1/tracks/3n3Ppam7vgaVa1iaRUc9Lp",
                    200,
                    json!({"name": "Mr. Brightside", "artists": [{"name": "The Killers"}]}),
                )
                .route("/youtube/v3/search", 200, video_search("gGdGFtwCNBE")),
        );

        let result = converter(&transport)
            .convert("open.spotify.com/track/3n3Ppam7vgaVa1iaRUc9Lp")
            .await
            .unwrap();

        assert_eq!(result.source, Some(Service::Spotify));
        assert_eq!(result.spotify, BRIGHTSIDE);
        assert_eq!(result.youtube, "https://www.youtube.com/watch?v=gGdGFtwCNBE");
        assert_eq!(transport.count("/v1/search"), 0);
    }
}
