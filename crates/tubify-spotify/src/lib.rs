//! Spotify catalog access: token lifecycle plus track search and lookup.

pub mod client;
pub mod token;

pub use client::{Artist, ExternalUrls, SpotifyClient, Track, first_track_url};
pub use token::{AuthMode, TOKEN_TTL, TOKEN_URL, TokenManager};
