use reqwest::header::AUTHORIZATION;
use reqwest::{Client, StatusCode};
use thiserror::Error;
use url::Url;

const DEFAULT_BASE_URL: &str = "https://www.strava.com/api/v3/";
const ACTIVITIES_PATH: &str = "athlete/activities";
const USER_AGENT: &str = concat!("strava-rs/", env!("CARGO_PKG_VERSION"));

/// A single activity exactly as the provider returned it.
pub type Activity = serde_json::Map<String, serde_json::Value>;

/// Errors returned by the Strava REST client.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("API returned {status}: {body}")]
    Fetch { status: StatusCode, body: String },
    #[error("invalid API base URL: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),
    #[error("failed to deserialize response: {0}")]
    Deserialize(#[from] serde_json::Error),
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Minimal client for the Strava v3 REST API.
#[derive(Debug, Clone)]
pub struct StravaApiClient {
    http: Client,
    base_url: Url,
}

impl StravaApiClient {
    /// Build a client targeting the public Strava API.
    pub fn new() -> ApiResult<Self> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Build a client with a custom base URL (useful for testing).
    pub fn with_base_url(base_url: &str) -> ApiResult<Self> {
        let mut base_url = Url::parse(base_url)?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        let http = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Fetch the authenticated athlete's activities (first page only).
    pub async fn athlete_activities(&self, access_token: &str) -> ApiResult<Vec<Activity>> {
        let url = self.base_url.join(ACTIVITIES_PATH)?;
        let response = self
            .http
            .get(url)
            .header(AUTHORIZATION, format!("Bearer {access_token}"))
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(%status, "activity fetch rejected");
            return Err(ApiError::Fetch { status, body });
        }

        let bytes = response.bytes().await?;
        let activities: Vec<Activity> = serde_json::from_slice(&bytes)?;
        tracing::debug!(count = activities.len(), "fetched athlete activities");
        Ok(activities)
    }
}
