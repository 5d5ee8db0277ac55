use std::env;

use thiserror::Error;
use url::Url;

pub const CLIENT_ID_VAR: &str = "CLIENT_ID";
pub const CLIENT_SECRET_VAR: &str = "CLIENT_SECRET";
pub const REDIRECT_URI_VAR: &str = "STRAVA_REDIRECT_URI";

/// Port the provider is told to redirect back to when nothing else is configured.
pub const DEFAULT_PORT: u16 = 8501;

/// Strava application credentials, read once at startup.
#[derive(Clone, Default)]
pub struct ClientCredentials {
    pub client_id: String,
    pub client_secret: String,
}

impl ClientCredentials {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }

    /// Read `CLIENT_ID` / `CLIENT_SECRET` from the process environment.
    ///
    /// Missing values are not an error here: an empty client id produces an
    /// authorization URL the provider rejects, which is where the user sees it.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| match lookup(key) {
            Some(value) if !value.trim().is_empty() => value.trim().to_owned(),
            _ => {
                tracing::warn!(variable = key, "credential not set; using empty value");
                String::new()
            }
        };
        Self {
            client_id: read(CLIENT_ID_VAR),
            client_secret: read(CLIENT_SECRET_VAR),
        }
    }
}

impl std::fmt::Debug for ClientCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

/// Loopback address the provider redirects to after consent.
pub fn local_redirect_uri(port: u16) -> Result<Url, ConfigError> {
    Ok(Url::parse(&format!("http://localhost:{port}"))?)
}

/// Resolve the redirect URI, preferring `STRAVA_REDIRECT_URI` when set.
pub fn redirect_uri_from_env(port: u16) -> Result<Url, ConfigError> {
    match env::var(REDIRECT_URI_VAR) {
        Ok(value) if !value.trim().is_empty() => {
            Url::parse(value.trim()).map_err(|source| ConfigError::InvalidRedirectUri {
                value: value.trim().to_owned(),
                source,
            })
        }
        _ => local_redirect_uri(port),
    }
}

/// Errors that can occur while assembling runtime configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid STRAVA_REDIRECT_URI '{value}': {source}")]
    InvalidRedirectUri {
        value: String,
        #[source]
        source: url::ParseError,
    },
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),
}
