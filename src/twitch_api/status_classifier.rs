//! One status check against the streams endpoint, mapped into [`Status`].
//!
//! Expected failures (401, 404, timeouts, garbage bodies) are reported as `Status` values
//! and never as errors, so the controller has a single closed set to react to. There is no
//! retry here; the controller owns the retry policy.

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::{Client, StatusCode};

use crate::configuration::config::Config;
use crate::error_handling::types::ControllerError;

use super::types::{ChannelInfo, Credential, Status, StreamsResponse};

/// Performs one status check for a channel.
#[async_trait]
pub trait StatusSource: Send + Sync {
    async fn check(&self, channel: &str, credential: &Credential) -> (Status, Option<ChannelInfo>);
}

/// [`StatusSource`] backed by the Helix `streams` endpoint.
pub struct HelixStatusClassifier {
    client: Client,
    streams_url: String,
    client_id: String,
}

impl HelixStatusClassifier {
    pub fn new(api_base_url: &str, client_id: &str, timeout: Duration) -> Result<Self, ControllerError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ControllerError::InitializationFailed(format!("HTTP client: {}", e)))?;

        Ok(Self {
            client,
            streams_url: format!("{}/helix/streams", api_base_url.trim_end_matches('/')),
            client_id: client_id.to_string(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, ControllerError> {
        Self::new(&config.api_base_url, &config.client_id, config.request_timeout())
    }
}

#[async_trait]
impl StatusSource for HelixStatusClassifier {
    async fn check(&self, channel: &str, credential: &Credential) -> (Status, Option<ChannelInfo>) {
        let response = match self
            .client
            .get(&self.streams_url)
            .query(&[("user_login", channel)])
            .header("Client-ID", &self.client_id)
            .header("Authorization", credential.bearer())
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!("[{}] Status request failed: {}", channel, e);
                return (Status::Error, None);
            }
        };

        let code = response.status();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                warn!("[{}] Could not read status response body: {}", channel, e);
                return (Status::Error, None);
            }
        };

        classify(code, &body)
    }
}

/// Maps an HTTP status code and body to a [`Status`].
///
/// 401 and 404 win over any payload. A success code with an empty `data` array is
/// Offline; with records it is Online, described by the first record.
pub fn classify(code: StatusCode, body: &str) -> (Status, Option<ChannelInfo>) {
    match code {
        StatusCode::UNAUTHORIZED => return (Status::Unauthorized, None),
        StatusCode::NOT_FOUND => return (Status::NotFound, None),
        code if !code.is_success() => {
            warn!("Unexpected HTTP status from streams endpoint: {}", code);
            return (Status::Error, None);
        }
        _ => {}
    }

    let response: StreamsResponse = match serde_json::from_str(body) {
        Ok(response) => response,
        Err(e) => {
            warn!("Malformed streams response: {}", e);
            return (Status::Error, None);
        }
    };

    let stream_count = response.data.len();
    match response.data.into_iter().next() {
        None => (Status::Offline, None),
        Some(stream) => {
            if stream_count > 1 {
                debug!("{} concurrent streams returned, using the first one", stream_count);
            }
            (
                Status::Online,
                Some(ChannelInfo {
                    stream,
                    stream_count,
                }),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn classifier(base: &str) -> HelixStatusClassifier {
        HelixStatusClassifier::new(base, "my-id", Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_classify_non_empty_data_is_online() {
        let bodies = [
            r#"{"data":[{"title":"Foo","user_login":"chan"}]}"#,
            r#"{"data":[{"title":"First"},{"title":"Second"}],"pagination":{}}"#,
            r#"{"data":[{}]}"#,
        ];
        let expected_titles = ["Foo", "First", ""];

        for (body, title) in bodies.iter().zip(expected_titles) {
            let (status, info) = classify(StatusCode::OK, body);
            assert_eq!(status, Status::Online);
            assert_eq!(info.unwrap().title(), title);
        }
    }

    #[test]
    fn test_classify_first_record_wins() {
        let (_, info) = classify(
            StatusCode::OK,
            r#"{"data":[{"title":"First","viewer_count":3},{"title":"Second"}]}"#,
        );
        let info = info.unwrap();
        assert_eq!(info.stream.title, "First");
        assert_eq!(info.stream.viewer_count, Some(3));
        assert_eq!(info.stream_count, 2);
    }

    #[test]
    fn test_classify_empty_data_is_offline() {
        for body in [r#"{"data":[]}"#, r#"{"data":[],"pagination":{}}"#] {
            assert_eq!(classify(StatusCode::OK, body), (Status::Offline, None));
        }
    }

    #[test]
    fn test_classify_status_codes_win_over_payload() {
        let bodies = ["", "not json", r#"{"data":[]}"#, r#"{"data":[{"title":"x"}]}"#];
        for body in bodies {
            assert_eq!(
                classify(StatusCode::UNAUTHORIZED, body),
                (Status::Unauthorized, None)
            );
            assert_eq!(classify(StatusCode::NOT_FOUND, body), (Status::NotFound, None));
            for code in [
                StatusCode::BAD_REQUEST,
                StatusCode::FORBIDDEN,
                StatusCode::TOO_MANY_REQUESTS,
                StatusCode::INTERNAL_SERVER_ERROR,
                StatusCode::SERVICE_UNAVAILABLE,
            ] {
                assert_eq!(classify(code, body), (Status::Error, None));
            }
        }
    }

    #[test]
    fn test_classify_malformed_body_is_error() {
        for body in ["", "<html>", r#"{"streams":[]}"#, r#"{"data":"nope"}"#, "null"] {
            assert_eq!(classify(StatusCode::OK, body), (Status::Error, None));
        }
    }

    #[tokio::test]
    async fn test_check_sends_headers_and_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/helix/streams"))
            .and(query_param("user_login", "somechannel"))
            .and(header("Client-ID", "my-id"))
            .and(header("Authorization", "Bearer tok"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [{"title": "Foo", "user_login": "somechannel"}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let (status, info) = classifier(&server.uri())
            .check("somechannel", &Credential::new("tok"))
            .await;
        assert_eq!(status, Status::Online);
        assert_eq!(info.unwrap().title(), "Foo");
    }

    #[tokio::test]
    async fn test_check_unauthorized_and_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("user_login", "expired"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(query_param("user_login", "ghost"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let classifier = classifier(&server.uri());
        let credential = Credential::new("tok");
        assert_eq!(
            classifier.check("expired", &credential).await,
            (Status::Unauthorized, None)
        );
        assert_eq!(
            classifier.check("ghost", &credential).await,
            (Status::NotFound, None)
        );
    }

    #[tokio::test]
    async fn test_check_transport_failure_is_error() {
        let classifier = classifier("http://127.0.0.1:9");
        let (status, info) = classifier.check("chan", &Credential::new("tok")).await;
        assert_eq!(status, Status::Error);
        assert!(info.is_none());
    }
}
