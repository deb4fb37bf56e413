use std::sync::Arc;
use std::time::Duration;

use base64::{Engine as _, engine::general_purpose};
use serde::Deserialize;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, info, warn};
use tubify_core::{HttpRequest, HttpTransport, SpotifyAuth, TubifyError, TubifyResult};

pub const TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const TOKEN_TTL: Duration = Duration::from_secs(3600);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    Delegated,
    Service,
}

struct Credential {
    access_token: String,
    acquired_at: Instant,
    mode: AuthMode,
}

#[derive(Default)]
struct TokenState {
    credential: Option<Credential>,
    // Handed out by the authorization-code exchange; the code itself is single-use.
    refresh_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    refresh_token: Option<String>,
}

/// Owns the Spotify access token. The lock is held across a refresh, so
/// callers racing on an expired token wait for one exchange and then share
/// its result.
pub struct TokenManager {
    transport: Arc<dyn HttpTransport>,
    auth: SpotifyAuth,
    mode: AuthMode,
    token_url: String,
    ttl: Duration,
    state: Mutex<TokenState>,
}

impl TokenManager {
    pub fn new(auth: SpotifyAuth, transport: Arc<dyn HttpTransport>) -> TubifyResult<Self> {
        let mode = match &auth {
            SpotifyAuth::Disabled => {
                return Err(TubifyError::NotConfigured(
                    "spotify credentials are not configured".to_string(),
                ));
            }
            SpotifyAuth::Delegated { .. } => AuthMode::Delegated,
            SpotifyAuth::Service { .. } => AuthMode::Service,
        };
        Ok(Self {
            transport,
            auth,
            mode,
            token_url: TOKEN_URL.to_string(),
            ttl: TOKEN_TTL,
            state: Mutex::new(TokenState::default()),
        })
    }

    pub fn with_token_url(mut self, token_url: impl Into<String>) -> Self {
        self.token_url = token_url.into();
        self
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn mode(&self) -> AuthMode {
        self.mode
    }

    /// Returns the `Authorization` header value, fetching a new token when
    /// none is cached or the cached one is older than the TTL.
    pub async fn authorization(&self) -> TubifyResult<String> {
        let mut state = self.state.lock().await;

        if let Some(credential) = &state.credential {
            if credential.acquired_at.elapsed() < self.ttl {
                debug!(mode = ?credential.mode, "using cached spotify token");
                return Ok(bearer(&credential.access_token));
            }
            debug!("spotify token expired");
        }

        let response = self.exchange(state.refresh_token.as_deref()).await?;
        let access_token = response.access_token.ok_or_else(|| TubifyError::Auth {
            status: 200,
            body: "token response missing access_token".to_string(),
        })?;

        if response.refresh_token.is_some() {
            state.refresh_token = response.refresh_token;
        }
        info!(mode = ?self.mode, "acquired spotify access token");

        let header = bearer(&access_token);
        state.credential = Some(Credential {
            access_token,
            acquired_at: Instant::now(),
            mode: self.mode,
        });
        Ok(header)
    }

    /// Drops the cached token; the next call fetches a fresh one.
    pub async fn invalidate(&self) {
        self.state.lock().await.credential = None;
    }

    async fn exchange(&self, refresh_token: Option<&str>) -> TubifyResult<TokenResponse> {
        let request = match (&self.auth, refresh_token) {
            (
                SpotifyAuth::Delegated {
                    client_id,
                    client_secret,
                    ..
                },
                Some(refresh_token),
            ) => HttpRequest::post(&self.token_url)
                .header("Authorization", basic_auth(client_id, client_secret))
                .param("grant_type", "refresh_token")
                .param("refresh_token", refresh_token),
            (
                SpotifyAuth::Delegated {
                    client_id,
                    client_secret,
                    code,
                    redirect_uri,
                },
                None,
            ) => HttpRequest::post(&self.token_url)
                .header("Authorization", basic_auth(client_id, client_secret))
                .param("grant_type", "authorization_code")
                .param("code", code)
                .param("redirect_uri", redirect_uri),
            (
                SpotifyAuth::Service {
                    client_id,
                    client_secret,
                },
                _,
            ) => HttpRequest::post(&self.token_url)
                .header("Authorization", basic_auth(client_id, client_secret))
                .param("grant_type", "client_credentials"),
            (SpotifyAuth::Disabled, _) => {
                return Err(TubifyError::NotConfigured(
                    "spotify credentials are not configured".to_string(),
                ));
            }
        };
        let request = request.header("Content-Type", "application/x-www-form-urlencoded");

        let response = self.transport.request(request).await?;
        if !response.is_success() {
            warn!(status = response.status, "spotify token exchange failed");
            return Err(TubifyError::Auth {
                status: response.status,
                body: response.body_text(),
            });
        }
        // A 2xx body that is not a token object is a failed exchange too.
        let (status, body) = (response.status, response.body_text());
        response.decode("token").map_err(|err| {
            warn!(%err, "spotify token response did not decode");
            TubifyError::Auth { status, body }
        })
    }
}

fn basic_auth(client_id: &str, client_secret: &str) -> String {
    let credentials = general_purpose::STANDARD.encode(format!("{client_id}:{client_secret}"));
    format!("Basic {credentials}")
}

fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}
