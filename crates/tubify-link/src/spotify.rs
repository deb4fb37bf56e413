use regex::Regex;
use tubify_core::{TubifyError, TubifyResult, validate_url};

const TRACK_BASE: &str = "https://open.spotify.com/track/";

/// Extracts the track id from an `open.spotify.com/track/<id>` link. A locale
/// segment such as `/intl-ja` before `/track` is accepted.
pub fn parse_spotify_track_id(input: &str) -> TubifyResult<String> {
    let url = validate_url(input)?;
    let regex = Regex::new(r"^/(?:intl-[a-z]{2}/)?track/([A-Za-z0-9]+)/?$")
        .map_err(|err| TubifyError::InvalidLink(format!("track pattern: {err}")))?;
    regex
        .captures(url.path())
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| TubifyError::InvalidLink(format!("not a spotify track link: {input}")))
}

pub fn spotify_track_url(id: &str) -> String {
    format!("{TRACK_BASE}{id}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_spotify_track_id() {
        let url = "https://open.spotify.com/track/4Km5HrUvYTaSUfiSGPJeQR";
        assert_eq!(
            parse_spotify_track_id(url).unwrap(),
            "4Km5HrUvYTaSUfiSGPJeQR".to_string()
        );
    }

    #[test]
    fn parses_spotify_track_id_with_locale() {
        let url = "https://open.spotify.com/intl-ja/track/4Km5HrUvYTaSUfiSGPJeQR";
        assert_eq!(
            parse_spotify_track_id(url).unwrap(),
            "4Km5HrUvYTaSUfiSGPJeQR".to_string()
        );
    }

    #[test]
    fn ignores_share_query() {
        let url = "https://open.spotify.com/track/4Km5HrUvYTaSUfiSGPJeQR?si=1a2b3c";
        assert_eq!(parse_spotify_track_id(url).unwrap(), "4Km5HrUvYTaSUfiSGPJeQR");
    }

    #[test]
    fn rejects_non_track_paths() {
        assert!(parse_spotify_track_id("https://open.spotify.com/playlist/37i9dQZF1DX").is_err());
        assert!(parse_spotify_track_id("https://open.spotify.com/track/").is_err());
    }

    #[test]
    fn builds_track_url() {
        assert_eq!(
            spotify_track_url("3n3Ppam7vgaVa1iaRUc9Lp"),
            "https://open.spotify.com/track/3n3Ppam7vgaVa1iaRUc9Lp"
        );
    }
}
