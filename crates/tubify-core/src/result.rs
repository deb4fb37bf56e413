use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the three link representations a conversion produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Service {
    Spotify,
    #[serde(rename = "youtube")]
    YouTube,
    #[serde(rename = "youtubeMusic")]
    YouTubeMusic,
}

impl Service {
    pub fn display_name(&self) -> &'static str {
        match self {
            Service::Spotify => "Spotify",
            Service::YouTube => "YouTube",
            Service::YouTubeMusic => "YouTube Music",
        }
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Title plus primary artist (or channel) of a track, used as a search key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackIdentity {
    pub title: String,
    pub artist: Option<String>,
}

impl TrackIdentity {
    pub fn new(title: impl Into<String>, artist: Option<String>) -> Self {
        Self {
            title: title.into(),
            artist,
        }
    }

    pub fn display_name(&self) -> String {
        match self.artist.as_deref() {
            Some(artist) if !artist.is_empty() => format!("{} {}", self.title, artist),
            _ => self.title.clone(),
        }
    }
}

/// Equivalent links across all three services. An empty URL slot means the
/// slot was not resolved.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionResult {
    pub youtube: String,
    pub youtube_music: String,
    pub spotify: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<Service>,
}

impl ConversionResult {
    pub fn url_for(&self, service: Service) -> &str {
        match service {
            Service::Spotify => &self.spotify,
            Service::YouTube => &self.youtube,
            Service::YouTubeMusic => &self.youtube_music,
        }
    }

    pub fn is_complete(&self) -> bool {
        !self.youtube.is_empty() && !self.youtube_music.is_empty() && !self.spotify.is_empty()
    }
}
