use thiserror::Error;

use crate::Service;

#[derive(Debug, Error)]
pub enum TubifyError {
    #[error("authentication failed: status={status} body={body}")]
    Auth { status: u16, body: String },
    #[error("upstream error: status={status} body={body}")]
    Upstream { status: u16, body: String },
    #[error("invalid link: {0}")]
    InvalidLink(String),
    #[error("no match found on {service} for '{query}'")]
    NoMatchFound { service: Service, query: String },
    #[error("not configured: {0}")]
    NotConfigured(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("parse error: {0}")]
    Parse(String),
    #[error("configuration error: {0}")]
    Config(String),
}

impl TubifyError {
    pub fn no_match(service: Service, query: impl Into<String>) -> Self {
        Self::NoMatchFound {
            service,
            query: query.into(),
        }
    }
}

pub type TubifyResult<T> = Result<T, TubifyError>;
