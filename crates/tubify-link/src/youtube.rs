use tubify_core::{TubifyError, TubifyResult};
use url::Url;

const WATCH_BASE: &str = "https://www.youtube.com/watch?v=";

/// Reads the video id: the path of a `youtu.be` link, otherwise the `v` query
/// parameter.
pub fn parse_video_id(url: &Url) -> TubifyResult<String> {
    let id = if url.host_str() == Some("youtu.be") {
        Some(url.path().trim_start_matches('/').to_string())
    } else {
        url.query_pairs()
            .find(|(key, _)| key == "v")
            .map(|(_, value)| value.to_string())
    };

    id.filter(|id| !id.is_empty())
        .ok_or_else(|| TubifyError::InvalidLink(format!("no video id in {url}")))
}

pub fn video_url(id: &str) -> String {
    format!("{WATCH_BASE}{id}")
}

/// Rewrites a YouTube Music link into a regular YouTube link by replacing the
/// first `music` with `www`. Purely textual: the result is not guaranteed to
/// resolve.
pub fn to_canonical(url: &str) -> String {
    url.replacen("music", "www", 1)
}

/// Rewrites a YouTube link into its YouTube Music form by replacing the first
/// `www` with `music`. Non-music videos may not play there.
pub fn to_music_variant(url: &str) -> String {
    url.replacen("www", "music", 1)
}
