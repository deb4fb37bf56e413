use std::fmt;

use crate::{TubifyError, TubifyResult};

/// How the catalog provider is accessed. Chosen once when the converter is
/// built.
#[derive(Clone, PartialEq, Eq, Default)]
pub enum SpotifyAuth {
    #[default]
    Disabled,
    /// Authorization-code exchange on behalf of a user.
    Delegated {
        client_id: String,
        client_secret: String,
        code: String,
        redirect_uri: String,
    },
    /// Client-credentials grant for the application itself.
    Service {
        client_id: String,
        client_secret: String,
    },
}

impl SpotifyAuth {
    /// Picks the auth mode from whichever credentials are present, rejecting
    /// partial combinations instead of silently disabling the catalog.
    pub fn from_parts(
        client_id: Option<String>,
        client_secret: Option<String>,
        code: Option<String>,
        redirect_uri: Option<String>,
    ) -> TubifyResult<Self> {
        let client_id = non_blank(client_id);
        let client_secret = non_blank(client_secret);
        let code = non_blank(code);
        let redirect_uri = non_blank(redirect_uri);

        match (client_id, client_secret, code) {
            (None, None, None) => Ok(SpotifyAuth::Disabled),
            (Some(client_id), Some(client_secret), Some(code)) => {
                let redirect_uri = redirect_uri.ok_or_else(|| {
                    TubifyError::Config(
                        "spotify authorization code requires a redirect uri".to_string(),
                    )
                })?;
                Ok(SpotifyAuth::Delegated {
                    client_id,
                    client_secret,
                    code,
                    redirect_uri,
                })
            }
            (Some(client_id), Some(client_secret), None) => Ok(SpotifyAuth::Service {
                client_id,
                client_secret,
            }),
            (None, _, _) => Err(TubifyError::Config(
                "spotify client id is missing".to_string(),
            )),
            (_, None, _) => Err(TubifyError::Config(
                "spotify client secret is missing".to_string(),
            )),
        }
    }

    pub fn is_enabled(&self) -> bool {
        !matches!(self, SpotifyAuth::Disabled)
    }

    pub fn mode_name(&self) -> &'static str {
        match self {
            SpotifyAuth::Disabled => "disabled",
            SpotifyAuth::Delegated { .. } => "delegated",
            SpotifyAuth::Service { .. } => "service",
        }
    }
}

impl fmt::Debug for SpotifyAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpotifyAuth::Disabled => f.write_str("Disabled"),
            SpotifyAuth::Delegated {
                client_id,
                redirect_uri,
                ..
            } => f
                .debug_struct("Delegated")
                .field("client_id", client_id)
                .field("client_secret", &"<redacted>")
                .field("code", &"<redacted>")
                .field("redirect_uri", redirect_uri)
                .finish(),
            SpotifyAuth::Service { client_id, .. } => f
                .debug_struct("Service")
                .field("client_id", client_id)
                .field("client_secret", &"<redacted>")
                .finish(),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}
