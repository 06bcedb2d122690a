//! Jenkins plugin registry loaded from the update center.
//!
//! The update center publishes `update-center.json` either as plain JSON or
//! wrapped in an `updateCenter.post( ... );` callback. Only the `plugins`
//! member is used: each plugin hosted under `github.com/jenkinsci/` is keyed
//! by its repository short-name.

mod error;
mod plugin;

pub use error::RegistryError;
pub use plugin::{PluginInfo, PluginRegistry};

use crate::rate_limit::Cancellation;
use crate::retry::{retry, FailureKind, RetryPolicy};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{debug, info, info_span, Instrument};

/// Default update-center document.
pub const DEFAULT_UPDATE_CENTER_URL: &str =
    "https://updates.jenkins.io/current/update-center.actual.json";

/// Marker preceding the repository short-name in an SCM URL.
const JENKINSCI_PREFIX: &str = "github.com/jenkinsci/";

/// Subset of `update-center.json` needed to build the registry.
#[derive(Debug, Deserialize)]
struct UpdateCenter {
    #[serde(default)]
    plugins: BTreeMap<String, UpdateCenterPlugin>,
}

#[derive(Debug, Deserialize)]
struct UpdateCenterPlugin {
    #[serde(default)]
    scm: Option<String>,
}

/// Builds the HTTP client used for the update center.
///
/// Redirects are followed (reqwest's default policy) and every request is
/// bounded by `timeout`.
///
/// # Errors
///
/// Returns [`RegistryError::Request`] if the client cannot be built.
pub fn http_client(timeout: Duration) -> Result<reqwest::Client, RegistryError> {
    Ok(reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()?)
}

/// Downloads and parses the plugin registry from `url`.
///
/// Network failures and non-200 responses are retried according to `policy`
/// until `cancellation` fires.
///
/// # Errors
///
/// Returns [`RegistryError`] once retries are exhausted, immediately if the
/// body cannot be parsed, or [`RegistryError::Cancelled`] on cancellation.
pub async fn fetch_registry(
    client: &reqwest::Client,
    url: &str,
    policy: &RetryPolicy,
    cancellation: &Cancellation,
) -> Result<PluginRegistry, RegistryError> {
    let span = info_span!("fetch_registry", url = %url);

    async {
        info!("Fetching Jenkins plugin information from update center");

        let body = retry(
            policy,
            "update-center download",
            cancellation,
            || download(client, url),
            |_: &RegistryError| FailureKind::Transient,
        )
        .await?;
        debug!(bytes = body.len(), "Downloaded update center");

        let registry = parse_registry(&body)?;
        info!(plugins = registry.len(), "Loaded plugin registry");
        Ok(registry)
    }
    .instrument(span)
    .await
}

async fn download(client: &reqwest::Client, url: &str) -> Result<String, RegistryError> {
    let response = client.get(url).send().await?;
    let status = response.status();
    if status != reqwest::StatusCode::OK {
        return Err(RegistryError::Status {
            status: status.as_u16(),
        });
    }
    Ok(response.text().await?)
}

/// Parses an update-center body (raw or callback-wrapped) into a registry.
///
/// # Errors
///
/// Returns [`RegistryError::Format`] if no `{ ... }` span exists, or
/// [`RegistryError::Parse`] if the span is not valid update-center JSON.
pub fn parse_registry(body: &str) -> Result<PluginRegistry, RegistryError> {
    let json = extract_json_span(body)?;
    let update_center: UpdateCenter = serde_json::from_str(json)?;

    let mut registry = PluginRegistry::default();
    for (name, plugin) in update_center.plugins {
        let Some(scm) = plugin.scm.filter(|scm| !scm.is_empty()) else {
            continue;
        };
        let Some(short_name) = repository_short_name(&scm) else {
            continue;
        };
        if !registry.insert(short_name.clone(), PluginInfo { name, scm_url: scm }) {
            debug!(repository = %short_name, "Repository already claimed by another plugin");
        }
    }

    Ok(registry)
}

/// Returns the text between the first `{` and the last `}`, inclusive.
///
/// # Errors
///
/// Returns [`RegistryError::Format`] if either brace is missing or they are
/// out of order.
pub fn extract_json_span(body: &str) -> Result<&str, RegistryError> {
    match (body.find('{'), body.rfind('}')) {
        (Some(start), Some(end)) if end > start => Ok(&body[start..=end]),
        _ => Err(RegistryError::Format),
    }
}

/// Derives the repository short-name from a `jenkinsci` SCM URL.
///
/// `https://github.com/jenkinsci/git-plugin.git/` becomes `git-plugin`. URLs
/// outside the organisation yield `None`.
#[must_use]
pub fn repository_short_name(scm: &str) -> Option<String> {
    let (_, rest) = scm.split_once(JENKINSCI_PREFIX)?;
    let rest = rest.strip_suffix(".git").unwrap_or(rest);
    let rest = rest.strip_suffix('/').unwrap_or(rest);
    Some(rest.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const WRAPPED: &str = r#"updateCenter.post(
{"connectionCheckUrl":"https://www.google.com/","plugins":{
  "git":{"name":"git","scm":"https://github.com/jenkinsci/git-plugin"},
  "ant":{"name":"ant","scm":"https://github.com/jenkinsci/ant-plugin.git"},
  "slash":{"name":"slash","scm":"https://github.com/jenkinsci/slash-plugin/"},
  "elsewhere":{"name":"elsewhere","scm":"https://gitlab.com/acme/elsewhere"},
  "noscm":{"name":"noscm","scm":""},
  "missing":{"name":"missing"}
}});"#;

    fn fast_policy() -> RetryPolicy {
        RetryPolicy::registry().with_steps(Duration::from_millis(1), Duration::from_millis(1))
    }

    #[test]
    fn short_name_strips_git_suffix_and_slash() {
        assert_eq!(
            repository_short_name("https://github.com/jenkinsci/git-plugin").as_deref(),
            Some("git-plugin")
        );
        assert_eq!(
            repository_short_name("https://github.com/jenkinsci/ant-plugin.git").as_deref(),
            Some("ant-plugin")
        );
        assert_eq!(
            repository_short_name("https://github.com/jenkinsci/slash-plugin/").as_deref(),
            Some("slash-plugin")
        );
        assert_eq!(
            repository_short_name("git@github.com/jenkinsci/ssh-plugin.git").as_deref(),
            Some("ssh-plugin")
        );
    }

    #[test]
    fn short_name_requires_jenkinsci_organisation() {
        assert_eq!(repository_short_name("https://github.com/acme/git-plugin"), None);
        assert_eq!(repository_short_name(""), None);
    }

    #[test]
    fn extracts_span_from_callback_wrapper() {
        assert_eq!(
            extract_json_span("updateCenter.post({\"a\":{}});").unwrap(),
            "{\"a\":{}}"
        );
        assert_eq!(extract_json_span("{}").unwrap(), "{}");
    }

    #[test]
    fn missing_braces_are_a_format_error() {
        assert!(matches!(extract_json_span("no json"), Err(RegistryError::Format)));
        assert!(matches!(extract_json_span("} {"), Err(RegistryError::Format)));
    }

    #[test]
    fn parses_wrapped_update_center() {
        let registry = parse_registry(WRAPPED).unwrap();

        assert_eq!(registry.len(), 3);
        assert_eq!(registry.get("git-plugin").unwrap().name, "git");
        assert_eq!(
            registry.get("ant-plugin").unwrap().scm_url,
            "https://github.com/jenkinsci/ant-plugin.git"
        );
        assert!(registry.get("slash-plugin").is_some());
        assert!(registry.get("elsewhere").is_none());
        assert!(registry.get("noscm").is_none());
    }

    #[test]
    fn parses_plain_json() {
        let registry = parse_registry(
            r#"{"plugins":{"git":{"name":"git","scm":"https://github.com/jenkinsci/git-plugin"}}}"#,
        )
        .unwrap();
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn shared_repository_keeps_first_plugin_by_name() {
        let registry = parse_registry(
            r#"{"plugins":{
                "pipeline-b":{"name":"pipeline-b","scm":"https://github.com/jenkinsci/pipeline"},
                "pipeline-a":{"name":"pipeline-a","scm":"https://github.com/jenkinsci/pipeline.git"}
            }}"#,
        )
        .unwrap();
        assert_eq!(registry.get("pipeline").unwrap().name, "pipeline-a");
    }

    #[test]
    fn invalid_json_is_a_parse_error() {
        assert!(matches!(
            parse_registry("updateCenter.post({not json});"),
            Err(RegistryError::Parse(_))
        ));
    }

    #[tokio::test]
    async fn fetch_retries_server_errors() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/update-center.json"))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(2)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/update-center.json"))
            .respond_with(ResponseTemplate::new(200).set_body_string(WRAPPED))
            .mount(&server)
            .await;

        let client = http_client(Duration::from_secs(5)).unwrap();
        let url = format!("{}/update-center.json", server.uri());
        let registry = fetch_registry(&client, &url, &fast_policy(), &Cancellation::never()).await.unwrap();

        assert_eq!(registry.len(), 3);
    }

    #[tokio::test]
    async fn fetch_follows_redirects() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/current/update-center.json"))
            .respond_with(
                ResponseTemplate::new(302)
                    .insert_header("location", format!("{}/mirror/uc.json", server.uri())),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/mirror/uc.json"))
            .respond_with(ResponseTemplate::new(200).set_body_string(WRAPPED))
            .mount(&server)
            .await;

        let client = http_client(Duration::from_secs(5)).unwrap();
        let url = format!("{}/current/update-center.json", server.uri());
        let registry = fetch_registry(&client, &url, &fast_policy(), &Cancellation::never()).await.unwrap();

        assert_eq!(registry.len(), 3);
    }

    #[tokio::test]
    async fn fetch_surfaces_last_status_after_exhausting_retries() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .expect(5)
            .mount(&server)
            .await;

        let client = http_client(Duration::from_secs(5)).unwrap();
        let err = fetch_registry(&client, &server.uri(), &fast_policy(), &Cancellation::never())
            .await
            .unwrap_err();

        assert!(matches!(err, RegistryError::Status { status: 404 }));
    }

    #[tokio::test]
    async fn cancellation_stops_retrying_an_unavailable_update_center() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .expect(1)
            .mount(&server)
            .await;

        let client = http_client(Duration::from_secs(5)).unwrap();
        let (handle, cancellation) = Cancellation::pair();
        let started = Instant::now();
        let uri = server.uri();
        let policy = RetryPolicy::registry();
        let (result, ()) = tokio::join!(
            fetch_registry(&client, &uri, &policy, &cancellation),
            async {
                tokio::time::sleep(Duration::from_millis(200)).await;
                handle.cancel();
            }
        );

        assert!(matches!(result, Err(RegistryError::Cancelled(_))));
        assert!(started.elapsed() < Duration::from_secs(2));
    }
}
