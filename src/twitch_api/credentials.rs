//! Access-token acquisition.
//!
//! Tokens are fetched lazily: once at startup (unless a token is configured) and again
//! whenever a status check comes back Unauthorized. Expiry is never tracked locally.

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info};
use reqwest::Client;

use crate::configuration::config::Config;
use crate::error_handling::types::AuthError;

use super::types::{Credential, TokenResponse};

/// Source of fresh access tokens.
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    /// Obtains a new credential. Callers own the result and must store it themselves.
    async fn refresh(&self) -> Result<Credential, AuthError>;
}

/// OAuth client-credentials grant against the identity endpoint.
pub struct ClientCredentialsProvider {
    client: Client,
    token_url: String,
    client_id: String,
    client_secret: String,
}

impl ClientCredentialsProvider {
    pub fn new(
        id_base_url: &str,
        client_id: &str,
        client_secret: &str,
        timeout: Duration,
    ) -> Result<Self, AuthError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AuthError::ClientBuild(e.to_string()))?;

        Ok(Self {
            client,
            token_url: format!("{}/oauth2/token", id_base_url.trim_end_matches('/')),
            client_id: client_id.to_string(),
            client_secret: client_secret.to_string(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, AuthError> {
        Self::new(
            &config.id_base_url,
            &config.client_id,
            &config.client_secret,
            config.request_timeout(),
        )
    }
}

#[async_trait]
impl CredentialProvider for ClientCredentialsProvider {
    async fn refresh(&self) -> Result<Credential, AuthError> {
        debug!("Requesting access token from {}", self.token_url);

        let response = self
            .client
            .post(&self.token_url)
            .query(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("grant_type", "client_credentials"),
            ])
            .send()
            .await
            .map_err(|e| AuthError::Unreachable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AuthError::Rejected(status.as_u16()));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| AuthError::MalformedResponse(e.to_string()))?;
        if token.access_token.is_empty() {
            return Err(AuthError::MalformedResponse("empty access_token".into()));
        }

        match token.expires_in {
            Some(secs) => info!("Obtained access token (expires in {}s)", secs),
            None => info!("Obtained access token"),
        }
        Ok(Credential::new(token.access_token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider(base: &str) -> ClientCredentialsProvider {
        ClientCredentialsProvider::new(base, "my-id", "my-secret", Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_refresh_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/oauth2/token"))
            .and(query_param("client_id", "my-id"))
            .and(query_param("client_secret", "my-secret"))
            .and(query_param("grant_type", "client_credentials"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "fresh-token",
                "expires_in": 5011271,
                "token_type": "bearer"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let credential = provider(&server.uri()).refresh().await.unwrap();
        assert_eq!(credential.token(), "fresh-token");
    }

    #[tokio::test]
    async fn test_refresh_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/oauth2/token"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        let result = provider(&server.uri()).refresh().await;
        assert!(matches!(result, Err(AuthError::Rejected(403))));
    }

    #[tokio::test]
    async fn test_refresh_malformed_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/oauth2/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "nope"})))
            .mount(&server)
            .await;

        let result = provider(&server.uri()).refresh().await;
        assert!(matches!(result, Err(AuthError::MalformedResponse(_))));
    }

    #[tokio::test]
    async fn test_refresh_unreachable() {
        // Port 9 (discard) is not expected to accept HTTP on the loopback
        let result = provider("http://127.0.0.1:9").refresh().await;
        assert!(matches!(result, Err(AuthError::Unreachable(_))));
    }

    #[tokio::test]
    async fn test_token_url_trailing_slash() {
        let provider = provider("https://id.example.tv/");
        assert_eq!(provider.token_url, "https://id.example.tv/oauth2/token");
    }
}
