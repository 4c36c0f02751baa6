//! Shared HTTP plumbing for the hosted backend.

use reelhub_core::config::BackendConfig;
use reelhub_core::error::{ReelhubError, Result};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode, Url};
use serde::Deserialize;

/// HTTP client bound to one backend project.
///
/// Row and object requests are signed with the service key; only identity
/// lookups carry the end user's access token.
#[derive(Clone)]
pub struct RestClient {
    client: Client,
    base: Url,
    api_key: String,
    service_key: String,
}

impl RestClient {
    pub fn new(config: &BackendConfig) -> Result<Self> {
        if config.project_url.trim().is_empty() {
            return Err(ReelhubError::config(
                "backend.project_url is not set (config.toml or REELHUB_PROJECT_URL)",
            ));
        }
        if config.api_key.trim().is_empty() {
            return Err(ReelhubError::config(
                "backend.api_key is not set (config.toml or REELHUB_API_KEY)",
            ));
        }
        let base = Url::parse(config.project_url.trim())
            .map_err(|e| ReelhubError::config(format!("Invalid project_url: {}", e)))?;
        let service_key = if config.service_key.trim().is_empty() {
            config.api_key.clone()
        } else {
            config.service_key.clone()
        };

        Ok(Self {
            client: Client::new(),
            base,
            api_key: config.api_key.clone(),
            service_key,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Joins `segments` onto the project URL, escaping each one.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        endpoint(&self.base, segments)
    }

    /// Request signed with the service key.
    pub fn service_request(&self, method: Method, url: Url) -> RequestBuilder {
        self.client
            .request(method, url)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.service_key)
    }

    /// Request signed with an end user's access token.
    pub fn user_request(&self, method: Method, url: Url, access_token: &str) -> RequestBuilder {
        self.client
            .request(method, url)
            .header("apikey", &self.api_key)
            .bearer_auth(access_token)
    }

    /// Sends `request`, turning transport errors and non-2xx statuses into
    /// [`ReelhubError`]s.
    pub async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = request
            .send()
            .await
            .map_err(|err| ReelhubError::io(format!("request failed: {err}")))?;

        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "failed to read error body".to_string());
        Err(map_http_error(status, &body))
    }
}

/// Joins path segments onto `base`, keeping any path `base` already has.
pub(crate) fn endpoint(base: &Url, segments: &[&str]) -> Result<Url> {
    let mut url = base.clone();
    {
        let mut path = url
            .path_segments_mut()
            .map_err(|_| ReelhubError::config(format!("{} cannot be a base URL", base)))?;
        path.pop_if_empty();
        for segment in segments {
            path.push(segment);
        }
    }
    Ok(url)
}

#[derive(Deserialize, Default)]
struct ErrorBody {
    message: Option<String>,
    msg: Option<String>,
    error_description: Option<String>,
    error: Option<String>,
}

/// Maps an unsuccessful response to an error.
///
/// 401/403 mean the credentials were refused; everything else keeps the
/// status in the message so callers can surface it.
pub(crate) fn map_http_error(status: StatusCode, body: &str) -> ReelhubError {
    let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();
    let message = parsed
        .message
        .or(parsed.msg)
        .or(parsed.error_description)
        .or(parsed.error)
        .unwrap_or_else(|| body.trim().to_string());

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            ReelhubError::unauthenticated(format!("status {}: {}", status.as_u16(), message))
        }
        _ => ReelhubError::io(format!("status {}: {}", status.as_u16(), message)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_escapes_segments() {
        let base = Url::parse("https://project.example.co/").unwrap();
        let url = endpoint(&base, &["storage", "v1", "object", "avatars", "avatars/a b.png"]).unwrap();
        assert_eq!(
            url.as_str(),
            "https://project.example.co/storage/v1/object/avatars/avatars%2Fa%20b.png"
        );
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let base = Url::parse("https://gateway.example.co/project").unwrap();
        let url = endpoint(&base, &["rest", "v1", "profiles"]).unwrap();
        assert_eq!(url.as_str(), "https://gateway.example.co/project/rest/v1/profiles");
    }

    #[test]
    fn test_map_http_error_reads_json_message() {
        let err = map_http_error(StatusCode::SERVICE_UNAVAILABLE, r#"{"message":"overloaded"}"#);
        assert_eq!(err.to_string(), "IO error: status 503: overloaded");

        let err = map_http_error(StatusCode::UNAUTHORIZED, r#"{"msg":"JWT expired"}"#);
        assert!(err.is_unauthenticated());
        assert!(err.to_string().contains("JWT expired"));
    }

    #[test]
    fn test_map_http_error_falls_back_to_body() {
        let err = map_http_error(StatusCode::BAD_GATEWAY, "upstream down\n");
        assert_eq!(err.to_string(), "IO error: status 502: upstream down");
    }

    #[test]
    fn test_new_requires_project_url_and_key() {
        let mut config = BackendConfig::default();
        assert!(RestClient::new(&config).is_err());

        config.project_url = "https://project.example.co".to_string();
        assert!(RestClient::new(&config).is_err());

        config.api_key = "anon".to_string();
        let client = RestClient::new(&config).unwrap();
        assert_eq!(client.base_url().as_str(), "https://project.example.co/");
    }
}
