//! REST API backend.
//!
//! This module provides the [`HttpBackend`] implementation, which talks to
//! a deployment's `/api/v2` endpoints with a session token.

use crate::backend::Backend;
use crate::error::{Error, Result};
use crate::types::{CreateGroupRequest, Entitlements, Group, Organization, PatchGroupRequest};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use ureq::Body;
use ureq::http::Response;
use uuid::Uuid;

/// Header carrying the session token.
const SESSION_TOKEN_HEADER: &str = "Coder-Session-Token";

/// Default timeout for a whole request, connect to last body byte.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// REST API backend.
///
/// # Example
///
/// ```no_run
/// use groupkit::backend::http::HttpBackend;
/// use groupkit::backend::Backend;
///
/// let backend = HttpBackend::new("https://coder.example.com", "session-token");
/// let org = backend.default_organization().unwrap();
/// println!("Default organization: {}", org.name);
/// ```
pub struct HttpBackend {
    /// HTTP agent for requests.
    agent: ureq::Agent,
    /// Deployment URL without trailing slash.
    base_url: String,
    /// Session token.
    token: String,
}

impl HttpBackend {
    /// Create a backend with the default timeout.
    #[must_use]
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self::with_timeout(base_url, token, DEFAULT_TIMEOUT)
    }

    /// Create a backend with a custom request timeout.
    #[must_use]
    pub fn with_timeout(
        base_url: impl Into<String>,
        token: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        // Error statuses are decoded from the body instead of surfacing as ureq errors
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build();

        Self {
            agent: ureq::Agent::new_with_config(config),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        }
    }

    /// Get the deployment URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build the URL for an API path.
    fn url(&self, path: &str) -> String {
        format!("{}/api/v2{}", self.base_url, path)
    }

    fn get<T: DeserializeOwned>(&self, path: &str, resource: &'static str, key: &str) -> Result<T> {
        let url = self.url(path);
        log::debug!("GET {url}");

        let response = self
            .agent
            .get(&url)
            .header(SESSION_TOKEN_HEADER, &self.token)
            .header("Accept", "application/json")
            .call()?;

        decode(check(response, resource, key)?)
    }

    fn post<B, T>(&self, path: &str, body: &B, resource: &'static str, key: &str) -> Result<T>
    where
        B: serde::Serialize,
        T: DeserializeOwned,
    {
        let url = self.url(path);
        log::debug!("POST {url}");

        let response = self
            .agent
            .post(&url)
            .header(SESSION_TOKEN_HEADER, &self.token)
            .header("Accept", "application/json")
            .send_json(body)?;

        decode(check(response, resource, key)?)
    }

    fn patch<B, T>(&self, path: &str, body: &B, resource: &'static str, key: &str) -> Result<T>
    where
        B: serde::Serialize,
        T: DeserializeOwned,
    {
        let url = self.url(path);
        log::debug!("PATCH {url}");

        let response = self
            .agent
            .patch(&url)
            .header(SESSION_TOKEN_HEADER, &self.token)
            .header("Accept", "application/json")
            .send_json(body)?;

        decode(check(response, resource, key)?)
    }

    fn delete(&self, path: &str, resource: &'static str, key: &str) -> Result<()> {
        let url = self.url(path);
        log::debug!("DELETE {url}");

        let response = self
            .agent
            .delete(&url)
            .header(SESSION_TOKEN_HEADER, &self.token)
            .call()?;

        check(response, resource, key).map(|_| ())
    }
}

impl Backend for HttpBackend {
    fn create_group(&self, organization_id: Uuid, request: &CreateGroupRequest) -> Result<Group> {
        self.post(
            &format!("/organizations/{organization_id}/groups"),
            request,
            "organization",
            &organization_id.to_string(),
        )
    }

    fn group(&self, id: Uuid) -> Result<Group> {
        self.get(&format!("/groups/{id}"), "group", &id.to_string())
    }

    fn patch_group(&self, id: Uuid, request: &PatchGroupRequest) -> Result<Group> {
        self.patch(&format!("/groups/{id}"), request, "group", &id.to_string())
    }

    fn delete_group(&self, id: Uuid) -> Result<()> {
        self.delete(&format!("/groups/{id}"), "group", &id.to_string())
    }

    fn organization_by_name(&self, name: &str) -> Result<Organization> {
        self.get(&format!("/organizations/{name}"), "organization", name)
    }

    fn group_by_org_and_name(&self, organization_id: Uuid, name: &str) -> Result<Group> {
        self.get(
            &format!("/organizations/{organization_id}/groups/{name}"),
            "group",
            &format!("{organization_id}/{name}"),
        )
    }

    fn entitlements(&self) -> Result<Entitlements> {
        self.get("/entitlements", "entitlements", "")
    }

    fn default_organization(&self) -> Result<Organization> {
        self.get("/organizations/default", "organization", "default")
    }
}

// =============================================================================
// Response handling
// =============================================================================

/// Error body returned by the API for non-2xx responses.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
    #[serde(default)]
    detail: String,
}

/// Turn a non-2xx response into an error.
fn check(mut response: Response<Body>, resource: &'static str, key: &str) -> Result<Response<Body>> {
    let status = response.status().as_u16();
    if response.status().is_success() {
        return Ok(response);
    }
    if status == 404 {
        return Err(Error::not_found(resource, key));
    }

    let body = error_text(status, response.body_mut().read_to_string());
    Err(api_error(status, &body))
}

/// Text of an error response, or nothing if the body could not be read.
fn error_text(status: u16, body: std::result::Result<String, ureq::Error>) -> String {
    body.unwrap_or_else(|e| {
        log::debug!("Failed to read body of HTTP {status} response: {e}");
        String::new()
    })
}

fn api_error(status: u16, body: &str) -> Error {
    match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(parsed) => Error::Api {
            status,
            message: parsed.message,
            detail: parsed.detail,
        },
        Err(_) => Error::Api {
            status,
            message: if body.trim().is_empty() {
                format!("HTTP {status}")
            } else {
                body.trim().to_string()
            },
            detail: String::new(),
        },
    }
}

fn decode<T: DeserializeOwned>(mut response: Response<Body>) -> Result<T> {
    Ok(response.body_mut().read_json()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_is_normalized() {
        let backend = HttpBackend::new("https://coder.example.com/", "token");
        assert_eq!(backend.base_url(), "https://coder.example.com");
        assert_eq!(
            backend.url("/groups/abc"),
            "https://coder.example.com/api/v2/groups/abc"
        );
    }

    #[test]
    fn test_api_error_from_json_body() {
        let err = api_error(
            400,
            r#"{"message": "Validation failed.", "detail": "name: must be unique"}"#,
        );
        match err {
            Error::Api {
                status,
                message,
                detail,
            } => {
                assert_eq!(status, 400);
                assert_eq!(message, "Validation failed.");
                assert_eq!(detail, "name: must be unique");
            }
            other => panic!("Expected Error::Api, got {other:?}"),
        }
    }

    #[test]
    fn test_api_error_from_plain_body() {
        let err = api_error(502, "Bad Gateway\n");
        assert_eq!(err.to_string(), "API error (502): Bad Gateway");
        assert!(err.is_retryable());

        let empty = api_error(500, "");
        assert_eq!(empty.to_string(), "API error (500): HTTP 500");
    }

    #[test]
    fn test_unreadable_error_body_falls_back_to_status() {
        let body = error_text(503, Err(ureq::Error::StatusCode(503)));
        assert!(body.is_empty());
        assert_eq!(
            api_error(503, &body).to_string(),
            "API error (503): HTTP 503"
        );

        assert_eq!(error_text(400, Ok("bad".into())), "bad");
    }

    #[test]
    fn test_unreachable_host_is_network_error() {
        // Port 9 (discard) on localhost is closed in test environments
        let backend =
            HttpBackend::with_timeout("http://127.0.0.1:9", "token", Duration::from_secs(2));
        let err = backend.group(Uuid::new_v4()).unwrap_err();
        assert!(err.is_retryable(), "unexpected error: {err:?}");
    }
}
