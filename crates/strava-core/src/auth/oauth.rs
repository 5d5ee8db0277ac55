use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use reqwest::{Client, StatusCode};
use url::Url;

use super::{AuthError, TokenPair};
use crate::config::ClientCredentials;

pub const RESPONSE_TYPE: &str = "code";
pub const APPROVAL_PROMPT: &str = "force";
pub const DEFAULT_SCOPE: &str = "activity:read_all";

const USER_AGENT: &str = concat!("strava-rs/", env!("CARGO_PKG_VERSION"));

/// Characters that would end or split a query value. `:` and `/` stay literal.
const QUERY_VALUE: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'&')
    .add(b'+')
    .add(b'<')
    .add(b'>');

/// OAuth client configuration supplied by consumers.
#[derive(Debug, Clone)]
pub struct OAuthConfig {
    pub credentials: ClientCredentials,
    pub redirect_uri: Url,
    pub scope: String,
}

impl OAuthConfig {
    pub fn new(credentials: ClientCredentials, redirect_uri: Url) -> Self {
        Self {
            credentials,
            redirect_uri,
            scope: DEFAULT_SCOPE.to_owned(),
        }
    }
}

/// Provider endpoints used by the authorization code flow.
#[derive(Debug, Clone)]
pub struct OAuthEndpoints {
    pub authorization_url: Url,
    pub token_url: Url,
}

impl Default for OAuthEndpoints {
    fn default() -> Self {
        Self {
            authorization_url: Url::parse("https://www.strava.com/oauth/authorize").unwrap(),
            token_url: Url::parse("https://www.strava.com/oauth/token").unwrap(),
        }
    }
}

/// Builds the consent redirect and exchanges authorization codes for tokens.
#[derive(Debug, Clone)]
pub struct OAuthClient {
    http: Client,
    config: OAuthConfig,
    endpoints: OAuthEndpoints,
}

impl OAuthClient {
    pub fn new(config: OAuthConfig) -> Result<Self, AuthError> {
        Self::with_endpoints(config, OAuthEndpoints::default())
    }

    pub fn with_endpoints(
        config: OAuthConfig,
        endpoints: OAuthEndpoints,
    ) -> Result<Self, AuthError> {
        let http = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self {
            http,
            config,
            endpoints,
        })
    }

    /// URL of the provider consent page.
    ///
    /// Values are escaped only where they would break the query, not
    /// form-encoded, so the provider sees `scope=activity:read_all` exactly
    /// as registered.
    pub fn authorization_url(&self) -> Url {
        let params = [
            ("client_id", self.config.credentials.client_id.as_str()),
            ("response_type", RESPONSE_TYPE),
            ("redirect_uri", self.config.redirect_uri.as_str()),
            ("approval_prompt", APPROVAL_PROMPT),
            ("scope", self.config.scope.as_str()),
        ];
        let query = params
            .iter()
            .map(|(key, value)| format!("{key}={}", utf8_percent_encode(value, QUERY_VALUE)))
            .collect::<Vec<_>>()
            .join("&");

        let mut url = self.endpoints.authorization_url.clone();
        url.set_query(Some(&query));
        url
    }

    /// Exchange an authorization code for access/refresh tokens.
    pub async fn exchange_code(&self, code: &str) -> Result<TokenPair, AuthError> {
        let form = [
            ("client_id", self.config.credentials.client_id.as_str()),
            ("client_secret", self.config.credentials.client_secret.as_str()),
            ("code", code),
            ("grant_type", "authorization_code"),
        ];

        let response = self
            .http
            .post(self.endpoints.token_url.clone())
            .form(&form)
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(%status, "token exchange rejected");
            return Err(AuthError::Authorization { status, body });
        }

        let bytes = response.bytes().await?;
        let tokens: TokenPair = serde_json::from_slice(&bytes)?;
        tracing::debug!("token exchange succeeded");
        Ok(tokens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn config(client_id: &str) -> OAuthConfig {
        OAuthConfig::new(
            ClientCredentials::new(client_id, "client-secret"),
            Url::parse("http://localhost:8501").unwrap(),
        )
    }

    fn client_for(server: &MockServer) -> OAuthClient {
        let endpoints = OAuthEndpoints {
            authorization_url: Url::parse("https://www.strava.com/oauth/authorize").unwrap(),
            token_url: Url::parse(&server.url("/oauth/token")).unwrap(),
        };
        OAuthClient::with_endpoints(config("client-id"), endpoints).unwrap()
    }

    #[test]
    fn authorization_url_has_exactly_five_parameters() {
        let client = OAuthClient::new(config("12345")).unwrap();
        let url = client.authorization_url();

        assert_eq!(url.host_str(), Some("www.strava.com"));
        assert_eq!(url.path(), "/oauth/authorize");

        let keys: Vec<String> = url.query_pairs().map(|(k, _)| k.into_owned()).collect();
        assert_eq!(
            keys,
            vec![
                "client_id",
                "response_type",
                "redirect_uri",
                "approval_prompt",
                "scope"
            ]
        );

        let query = url.query().unwrap();
        assert!(query.contains("client_id=12345"));
        assert!(query.contains("response_type=code"));
        assert!(query.contains("approval_prompt=force"));
        assert!(query.contains("scope=activity:read_all"));
        assert!(query.contains("redirect_uri=http://localhost:8501/"));
    }

    #[test]
    fn authorization_url_with_empty_client_id() {
        let client = OAuthClient::new(config("")).unwrap();
        let url = client.authorization_url();
        assert!(url.query().unwrap().starts_with("client_id=&response_type=code"));
    }

    #[test]
    fn authorization_url_escapes_query_delimiters() {
        let config = OAuthConfig::new(
            ClientCredentials::new("id+1", "client-secret"),
            Url::parse("http://localhost:8501/callback?next=a&b#top").unwrap(),
        );
        let url = OAuthClient::new(config).unwrap().authorization_url();

        assert_eq!(url.fragment(), None);
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(pairs.len(), 5);
        assert_eq!(pairs[0], ("client_id".to_owned(), "id+1".to_owned()));
        assert_eq!(
            pairs[2],
            (
                "redirect_uri".to_owned(),
                "http://localhost:8501/callback?next=a&b#top".to_owned()
            )
        );

        let query = url.query().unwrap();
        assert!(query.contains("redirect_uri=http://localhost:8501/callback?next=a%26b%23top"));
        assert!(query.ends_with("scope=activity:read_all"));
    }

    #[tokio::test]
    async fn exchange_code_success() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/oauth/token")
                .header("content-type", "application/x-www-form-urlencoded")
                .body_contains("client_id=client-id")
                .body_contains("client_secret=client-secret")
                .body_contains("code=code123")
                .body_contains("grant_type=authorization_code");
            then.status(200).json_body_obj(&serde_json::json!({
                "token_type": "Bearer",
                "expires_at": 1_700_000_000,
                "access_token": "A",
                "refresh_token": "R"
            }));
        });

        let tokens = client_for(&server).exchange_code("code123").await.unwrap();
        mock.assert();
        assert_eq!(tokens.access_token, "A");
        assert_eq!(tokens.refresh_token, "R");
    }

    #[tokio::test]
    async fn exchange_code_passes_missing_fields_through() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/oauth/token");
            then.status(200).json_body_obj(&serde_json::json!({ "access_token": "A" }));
        });

        let tokens = client_for(&server).exchange_code("code").await.unwrap();
        assert_eq!(tokens.access_token, "A");
        assert!(tokens.refresh_token.is_empty());
    }

    #[tokio::test]
    async fn exchange_code_unauthorized() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST).path("/oauth/token");
            then.status(401).body(r#"{"message":"Authorization Error"}"#);
        });

        let err = client_for(&server).exchange_code("bad").await.unwrap_err();
        mock.assert();
        match err {
            AuthError::Authorization { status, body } => {
                assert_eq!(status, StatusCode::UNAUTHORIZED);
                assert!(body.contains("Authorization Error"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn exchange_code_requires_exactly_ok() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/oauth/token");
            then.status(201).json_body_obj(&serde_json::json!({
                "access_token": "A",
                "refresh_token": "R"
            }));
        });

        let err = client_for(&server).exchange_code("code").await.unwrap_err();
        assert!(matches!(
            err,
            AuthError::Authorization { status, .. } if status == StatusCode::CREATED
        ));
    }
}
