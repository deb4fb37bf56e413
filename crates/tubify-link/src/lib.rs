mod spotify;
mod youtube;

use tubify_core::{Service, TubifyResult, validate_url};
use url::Url;

pub use spotify::{parse_spotify_track_id, spotify_track_url};
pub use youtube::{parse_video_id, to_canonical, to_music_variant, video_url};

/// Host fragments that mark an input as a link even without a scheme.
const HOST_MARKERS: [&str; 3] = ["spotify", "youtu.be", "youtube"];

/// Prefixes `https://` to pasted links such as `youtu.be/<id>` that carry a
/// known host but no scheme. Other inputs are returned trimmed.
pub fn with_scheme(input: &str) -> String {
    let input = input.trim();
    if !input.contains("://") && HOST_MARKERS.iter().any(|marker| input.contains(marker)) {
        format!("https://{input}")
    } else {
        input.to_string()
    }
}

/// Whether `input` should be classified as a link rather than searched as a
/// title. Anything containing whitespace is a title.
pub fn looks_like_link(input: &str) -> bool {
    let input = input.trim();
    if input.is_empty() || input.chars().any(char::is_whitespace) {
        return false;
    }
    Url::parse(&with_scheme(input)).is_ok_and(|url| matches!(url.scheme(), "http" | "https"))
}

/// An input link after classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceLink {
    SpotifyTrack { id: String, url: String },
    YouTubeVideo { id: String, url: String },
    YouTubeMusic { id: String, url: String },
}

impl ServiceLink {
    pub fn id(&self) -> &str {
        match self {
            ServiceLink::SpotifyTrack { id, .. }
            | ServiceLink::YouTubeVideo { id, .. }
            | ServiceLink::YouTubeMusic { id, .. } => id,
        }
    }

    pub fn url(&self) -> &str {
        match self {
            ServiceLink::SpotifyTrack { url, .. }
            | ServiceLink::YouTubeVideo { url, .. }
            | ServiceLink::YouTubeMusic { url, .. } => url,
        }
    }

    pub fn service(&self) -> Service {
        match self {
            ServiceLink::SpotifyTrack { .. } => Service::Spotify,
            ServiceLink::YouTubeVideo { .. } => Service::YouTube,
            ServiceLink::YouTubeMusic { .. } => Service::YouTubeMusic,
        }
    }

    /// The URL rebuilt from the id alone.
    pub fn canonical_url(&self) -> String {
        match self {
            ServiceLink::SpotifyTrack { id, .. } => spotify_track_url(id),
            ServiceLink::YouTubeVideo { id, .. } => video_url(id),
            ServiceLink::YouTubeMusic { id, .. } => to_music_variant(&video_url(id)),
        }
    }
}

/// Classifies a link by the service it points at.
///
/// Checks run in order: anything mentioning `spotify` is a track link,
/// `youtu.be` is a shortened video link (rewritten to the watch form), and
/// everything else must carry a `v` query parameter. Watch links on a host
/// containing `music` are YouTube Music links.
pub fn classify(input: &str) -> TubifyResult<ServiceLink> {
    let input = with_scheme(input);
    let input = input.as_str();

    if input.contains("spotify") {
        let id = parse_spotify_track_id(input)?;
        return Ok(ServiceLink::SpotifyTrack {
            id,
            url: input.to_string(),
        });
    }

    let url = validate_url(input)?;
    let id = parse_video_id(&url)?;

    if input.contains("youtu.be") {
        return Ok(ServiceLink::YouTubeVideo {
            url: video_url(&id),
            id,
        });
    }

    let is_music = url.host_str().is_some_and(|host| host.contains("music"));
    let url = input.to_string();
    if is_music {
        Ok(ServiceLink::YouTubeMusic { id, url })
    } else {
        Ok(ServiceLink::YouTubeVideo { id, url })
    }
}
