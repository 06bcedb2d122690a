//! Minimal GraphQL executor over an authenticated octocrab transport.
//!
//! [`GraphQlClient::execute`] sends one `{query, variables}` document and
//! decodes the `data` member of the response into the caller's type. HTTP
//! failures, GraphQL `errors[]` and decode failures all surface as
//! [`QueryError`]. Retrying is left to the caller.

mod envelope;
mod error;

pub use envelope::{GraphQlRequest, GraphQlResponse, GraphQlServerError};
pub use error::QueryError;

use octocrab::service::middleware::retry::RetryConfig;
use octocrab::Octocrab;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, trace};

/// Public GitHub API base URL.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Default bound on a single GraphQL round trip.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const GRAPHQL_PATH: &str = "/graphql";

/// Executes GraphQL documents against the GitHub API.
#[derive(Clone)]
pub struct GraphQlClient {
    octocrab: Octocrab,
    timeout: Duration,
}

impl GraphQlClient {
    /// Builds a client authenticated with `token` against `api_url`.
    ///
    /// The transport's built-in retry layer is disabled so that every retry
    /// goes through the caller's policy.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::Transport`] if the base URL is invalid or the
    /// client cannot be built.
    pub fn new(token: &str, api_url: &str, timeout: Duration) -> Result<Self, QueryError> {
        let octocrab = Octocrab::builder()
            .personal_token(token.to_string())
            .base_uri(api_url)?
            .add_retry_config(RetryConfig::None)
            .build()?;
        Ok(Self { octocrab, timeout })
    }

    /// Executes `query` with `variables` and decodes `data` into `T`.
    ///
    /// # Errors
    ///
    /// - [`QueryError::Timeout`] if the round trip exceeds the timeout
    /// - [`QueryError::Transport`] on connection failures
    /// - [`QueryError::Status`] on any non-200 response (with body)
    /// - [`QueryError::Envelope`] if the body is not a GraphQL response
    /// - [`QueryError::Api`] with the first message of a non-empty `errors[]`
    /// - [`QueryError::NoData`] if `data` is absent or null
    /// - [`QueryError::Decode`] if `data` does not match `T`
    pub async fn execute<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: serde_json::Value,
    ) -> Result<T, QueryError> {
        let request = GraphQlRequest { query, variables };

        let body = tokio::time::timeout(self.timeout, self.post(&request))
            .await
            .map_err(|_| QueryError::Timeout {
                timeout_secs: self.timeout.as_secs(),
            })??;

        decode_response(&body)
    }

    async fn post(&self, request: &GraphQlRequest<'_>) -> Result<String, QueryError> {
        let response = self.octocrab._post(GRAPHQL_PATH, Some(request)).await?;
        let status = response.status();
        let body = self.octocrab.body_to_string(response).await?;
        trace!(status = status.as_u16(), bytes = body.len(), "GraphQL response received");

        if status != http::StatusCode::OK {
            return Err(QueryError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(body)
    }
}

/// Decodes a raw GraphQL response body into `T`.
///
/// # Errors
///
/// See [`GraphQlClient::execute`].
pub fn decode_response<T: DeserializeOwned>(body: &str) -> Result<T, QueryError> {
    let envelope: GraphQlResponse =
        serde_json::from_str(body).map_err(|source| QueryError::Envelope {
            source,
            body: body.to_string(),
        })?;

    if let Some(first) = envelope.errors.into_iter().next() {
        return Err(QueryError::Api {
            message: first.message,
        });
    }

    let data = envelope
        .data
        .filter(|data| !data.is_null())
        .ok_or(QueryError::NoData)?;

    debug!("Decoding GraphQL data");
    T::deserialize(&data).map_err(|source| QueryError::Decode {
        source,
        data: data.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[derive(Debug, Deserialize, PartialEq)]
    struct Viewer {
        login: String,
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct ViewerData {
        viewer: Viewer,
    }

    fn client(server: &MockServer) -> GraphQlClient {
        GraphQlClient::new("test-token", &server.uri(), Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn decodes_data_member() {
        let data: ViewerData = decode_response(r#"{"data":{"viewer":{"login":"octo"}}}"#).unwrap();
        assert_eq!(data.viewer.login, "octo");
    }

    #[test]
    fn first_graphql_error_wins() {
        let body = r#"{"data":null,"errors":[{"message":"first"},{"message":"second"}]}"#;
        let err = decode_response::<ViewerData>(body).unwrap_err();

        assert!(matches!(&err, QueryError::Api { message } if message == "first"));
        assert_eq!(err.to_string(), "GraphQL error: first");
    }

    #[test]
    fn missing_data_is_an_error() {
        let err = decode_response::<ViewerData>(r#"{"errors":[]}"#).unwrap_err();
        assert!(matches!(err, QueryError::NoData));

        let err = decode_response::<ViewerData>(r#"{"data":null}"#).unwrap_err();
        assert!(matches!(err, QueryError::NoData));
    }

    #[test]
    fn decode_failure_includes_raw_data() {
        let err = decode_response::<ViewerData>(r#"{"data":{"viewer":{"id":1}}}"#).unwrap_err();
        assert!(matches!(err, QueryError::Decode { .. }));
        assert!(err.to_string().contains(r#"{"viewer":{"id":1}}"#));
    }

    #[test]
    fn malformed_envelope_includes_body() {
        let err = decode_response::<ViewerData>("<html>oops</html>").unwrap_err();
        assert!(matches!(err, QueryError::Envelope { .. }));
        assert!(err.to_string().contains("<html>oops</html>"));
    }

    #[test]
    fn rate_limit_messages_are_recognised() {
        let err = QueryError::Api {
            message: "API rate limit exceeded for user ID 1.".to_string(),
        };
        assert!(err.is_rate_limited());
        assert!(!QueryError::NoData.is_rate_limited());
    }

    #[tokio::test]
    async fn posts_query_and_variables_with_bearer_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/graphql"))
            .and(header("authorization", "Bearer test-token"))
            .and(header("content-type", "application/json"))
            .and(body_partial_json(json!({
                "query": "query { viewer { login } }",
                "variables": {"cursor": null}
            })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"data": {"viewer": {"login": "octo"}}})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let data: ViewerData = client(&server)
            .execute("query { viewer { login } }", json!({"cursor": null}))
            .await
            .unwrap();

        assert_eq!(
            data,
            ViewerData {
                viewer: Viewer {
                    login: "octo".to_string()
                }
            }
        );
    }

    #[tokio::test]
    async fn non_200_status_reports_code_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/graphql"))
            .respond_with(
                ResponseTemplate::new(403)
                    .set_body_string(r#"{"message":"API rate limit exceeded"}"#),
            )
            .mount(&server)
            .await;

        let err = client(&server)
            .execute::<ViewerData>("query { viewer { login } }", json!({}))
            .await
            .unwrap_err();

        assert!(matches!(&err, QueryError::Status { status: 403, .. }));
        assert!(err.to_string().contains("API rate limit exceeded"));
        assert!(err.is_rate_limited());
    }

    #[tokio::test]
    async fn slow_responses_time_out() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/graphql"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"data": {"viewer": {"login": "octo"}}}))
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&server)
            .await;

        let client =
            GraphQlClient::new("test-token", &server.uri(), Duration::from_millis(100)).unwrap();
        let err = client
            .execute::<ViewerData>("query { viewer { login } }", json!({}))
            .await
            .unwrap_err();

        assert!(matches!(err, QueryError::Timeout { .. }));
    }
}
