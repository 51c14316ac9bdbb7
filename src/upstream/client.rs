//! reqwest-based client for the email, CMS and chatbot services.
//!
//! Every call returns `Result<Value, Failure>`: transport problems become
//! `Failure::Network`, upstream error bodies go through
//! [`Failure::from_json`], and bodies that say nothing useful fall back to
//! an API failure carrying the HTTP status.

use reqwest::{Client, RequestBuilder, Response};
use serde_json::Value;
use std::time::Duration;
use url::Url;

use crate::config::{TimeoutConfig, UpstreamsConfig};
use crate::errors::{Failure, NetworkKind};

#[derive(Debug, Clone)]
pub struct UpstreamClient {
    http: Client,
    config: UpstreamsConfig,
}

impl UpstreamClient {
    pub fn new(config: UpstreamsConfig, timeouts: &TimeoutConfig) -> Result<Self, reqwest::Error> {
        let http = Client::builder()
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .timeout(Duration::from_secs(timeouts.upstream_secs))
            .user_agent(concat!("clinic-resilience/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { http, config })
    }

    /// Deliver a contact-form message through the email service.
    pub async fn send_email(&self, payload: &Value) -> Result<Value, Failure> {
        let request = self.http.post(&self.config.email_url).json(payload);
        let request = with_key(request, self.config.email_api_key.as_deref());
        execute(request, "email_service_error").await
    }

    /// Fetch one CMS item, e.g. `posts/welcome`.
    pub async fn fetch_content(&self, content_type: &str, identifier: &str) -> Result<Value, Failure> {
        let url = content_url(&self.config.cms_url, content_type, identifier)?;
        execute(self.http.get(url), "server_error").await
    }

    pub async fn chat(&self, payload: &Value) -> Result<Value, Failure> {
        let request = self.http.post(&self.config.chatbot_url).json(payload);
        let request = with_key(request, self.config.chatbot_api_key.as_deref());
        execute(request, "server_error").await
    }
}

/// `{cms_url}/{content_type}/{identifier}` with both parts escaped as single
/// path segments.
fn content_url(cms_url: &str, content_type: &str, identifier: &str) -> Result<Url, Failure> {
    let invalid = || Failure::Unknown(format!("invalid CMS base URL: {cms_url}"));
    let mut url = Url::parse(cms_url).map_err(|_| invalid())?;
    url.path_segments_mut()
        .map_err(|_| invalid())?
        .pop_if_empty()
        .push(content_type)
        .push(identifier);
    Ok(url)
}

fn with_key(request: RequestBuilder, key: Option<&str>) -> RequestBuilder {
    match key {
        Some(key) => request.bearer_auth(key),
        None => request,
    }
}

async fn execute(request: RequestBuilder, server_code: &str) -> Result<Value, Failure> {
    let response = request.send().await.map_err(transport_failure)?;
    if response.status().is_success() {
        return response.json::<Value>().await.map_err(transport_failure);
    }
    Err(error_response(response, server_code).await)
}

fn transport_failure(err: reqwest::Error) -> Failure {
    if err.is_timeout() {
        Failure::Network(NetworkKind::Timeout)
    } else if err.is_connect() || err.is_request() {
        Failure::Network(NetworkKind::Failed)
    } else if err.is_decode() || err.is_body() {
        Failure::Unknown(err.to_string())
    } else {
        Failure::Network(NetworkKind::Failed)
    }
}

async fn error_response(response: Response, server_code: &str) -> Failure {
    let status = response.status().as_u16();
    let body = response.json::<Value>().await.unwrap_or(Value::Null);

    match Failure::from_json(&body) {
        Failure::Api { code, status: None } => Failure::Api { code, status: Some(status) },
        Failure::Unknown(_) => {
            let code = match status {
                429 => "rate_limited",
                503 => "service_unavailable",
                504 => "timeout",
                s if s >= 500 => server_code,
                _ => "client_error",
            };
            Failure::Api { code: code.to_string(), status: Some(status) }
        }
        failure => failure,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_url_joins_base_path() {
        let url = content_url("http://cms.local/wp-json/wp/v2/", "posts", "welcome").unwrap();
        assert_eq!(url.as_str(), "http://cms.local/wp-json/wp/v2/posts/welcome");
    }

    #[test]
    fn test_content_url_escapes_separators() {
        let url = content_url("http://cms.local/wp-json/wp/v2", "posts", "../admin/secrets").unwrap();
        assert!(url.path().starts_with("/wp-json/wp/v2/posts/"));
        assert!(url.path().contains("%2F"));
    }

    #[test]
    fn test_unusable_base_url_is_a_failure() {
        assert!(matches!(
            content_url("not a url", "posts", "welcome"),
            Err(Failure::Unknown(_))
        ));
    }
}
