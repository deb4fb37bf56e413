mod auth;
mod error;
mod result;
mod transport;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use auth::SpotifyAuth;
pub use error::{TubifyError, TubifyResult};
pub use result::{ConversionResult, Service, TrackIdentity};
pub use transport::{HttpRequest, HttpResponse, HttpTransport, Method, ReqwestTransport};

/// Rejects provider responses outside 2xx as `Upstream` errors.
pub fn ensure_success(response: HttpResponse) -> TubifyResult<HttpResponse> {
    if response.is_success() {
        return Ok(response);
    }
    Err(TubifyError::Upstream {
        status: response.status,
        body: response.body_text(),
    })
}

pub fn validate_url(url: &str) -> TubifyResult<url::Url> {
    let url = url.trim();
    url::Url::parse(url).map_err(|err| TubifyError::InvalidLink(format!("invalid url {url}: {err}")))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{ensure_success, validate_url};
    use crate::{HttpResponse, TubifyError};

    #[test]
    fn validated_url_exposes_host_and_query() {
        let url = validate_url("https://music.youtube.com/watch?v=gGdGFtwCNBE").unwrap();
        assert_eq!(url.host_str(), Some("music.youtube.com"));
        assert!(url.query_pairs().any(|(key, value)| key == "v" && value == "gGdGFtwCNBE"));
    }

    #[test]
    fn pasted_links_are_trimmed() {
        let url = validate_url("  https://youtu.be/gGdGFtwCNBE \n").unwrap();
        assert_eq!(url.path(), "/gGdGFtwCNBE");
    }

    #[test]
    fn links_without_scheme_are_rejected() {
        for input in ["youtu.be/gGdGFtwCNBE", "open.spotify.com/track/3n3Ppam7vgaVa1iaRUc9Lp"] {
            match validate_url(input) {
                Err(TubifyError::InvalidLink(msg)) => assert!(msg.contains(input), "{msg}"),
                other => panic!("expected invalid link for {input}, got {other:?}"),
            }
        }
    }

    #[test]
    fn ensure_success_surfaces_status_and_body() {
        let ok = ensure_success(HttpResponse::new(200, json!({})));
        assert!(ok.is_ok());

        let err = ensure_success(HttpResponse::new(403, json!({"error": "quota"})));
        match err {
            Err(TubifyError::Upstream { status, body }) => {
                assert_eq!(status, 403);
                assert!(body.contains("quota"));
            }
            other => panic!("expected upstream error, got {other:?}"),
        }
    }
}
