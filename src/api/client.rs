//! API client for communicating with the UserHub REST API.
//!
//! This module provides the `ApiClient` struct for making authenticated
//! requests against the user-profile endpoints, with a single
//! refresh-and-retry cycle on 401 responses.

use anyhow::{Context, Result};
use reqwest::{header, Client, Method};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::auth::Session;
use crate::config::Config;
use crate::models::{ProfileUpdate, User};

use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

/// HTTP request timeout in seconds.
/// 30s allows for slow API responses while failing fast enough for good UX.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Token refresh endpoint. Called without an Authorization header - the
/// refresh token in the body is the credential.
const REFRESH_PATH: &str = "/api/v1/auth/token/refresh";

#[derive(Debug, Serialize)]
struct RefreshRequest<'a> {
    #[serde(rename = "refreshToken")]
    refresh_token: &'a str,
}

#[derive(Debug, Deserialize)]
struct RefreshResponse {
    #[serde(rename = "accessToken")]
    access_token: String,
    #[serde(rename = "refreshToken")]
    refresh_token: String,
}

/// A request that can be rebuilt and resent after a token refresh.
/// Bodies are held as JSON values so a resend is byte-identical.
#[derive(Debug, Clone)]
struct PreparedRequest {
    method: Method,
    path: String,
    body: Option<Value>,
}

impl PreparedRequest {
    fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            path: path.into(),
            body: None,
        }
    }

    fn patch(path: impl Into<String>, body: Value) -> Self {
        Self {
            method: Method::PATCH,
            path: path.into(),
            body: Some(body),
        }
    }
}

/// Outcome of a single dispatch attempt. A 401 does not surface as an error
/// here; the orchestrating loop decides whether to refresh, clear the
/// session, or give up.
enum Dispatch {
    Done(reqwest::Response),
    NeedsRefresh,
}

/// What to do about a 401 response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RefreshDecision {
    /// Exchange the refresh token and resend the request once
    Refresh,
    /// No refresh token: clear the session, caller must log in again
    Reauthenticate,
    /// Already retried: surface the 401 as-is
    Surface,
}

/// Single-retry policy for unauthorized responses. At most one refresh is
/// attempted per original request; a request that already went through a
/// refresh cycle never triggers another.
pub(crate) fn on_unauthorized(already_retried: bool, has_refresh_token: bool) -> RefreshDecision {
    if already_retried {
        RefreshDecision::Surface
    } else if has_refresh_token {
        RefreshDecision::Refresh
    } else {
        RefreshDecision::Reauthenticate
    }
}

/// API client for the UserHub backend.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a new API client from configuration
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Build the headers for an outgoing request. Sets the bearer header
    /// verbatim when an access token is held; a logged-out session adds
    /// nothing.
    pub(crate) fn auth_headers(session: &Session) -> Result<header::HeaderMap> {
        let mut headers = header::HeaderMap::new();
        if let Some(token) = session.access_token() {
            headers.insert(
                header::AUTHORIZATION,
                header::HeaderValue::from_str(&format!("Bearer {}", token))?,
            );
        }
        Ok(headers)
    }

    /// Send a request once, tagging a 401 for the caller instead of failing
    async fn dispatch(&self, session: &Session, request: &PreparedRequest) -> Result<Dispatch> {
        let url = format!("{}{}", self.base_url, request.path);

        let mut builder = self
            .client
            .request(request.method.clone(), &url)
            .headers(Self::auth_headers(session)?);
        if let Some(ref body) = request.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .with_context(|| format!("Failed to send {} request to {}", request.method, url))?;

        let status = response.status();
        if status.as_u16() == 401 {
            debug!(url = %url, "request rejected with 401");
            return Ok(Dispatch::NeedsRefresh);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::from_status(status, &body).into());
        }
        Ok(Dispatch::Done(response))
    }

    /// Send a request, performing at most one refresh-and-resend cycle on 401
    async fn send(&self, session: &mut Session, request: PreparedRequest) -> Result<reqwest::Response> {
        let mut retried = false;
        loop {
            match self.dispatch(session, &request).await? {
                Dispatch::Done(response) => return Ok(response),
                Dispatch::NeedsRefresh => {
                    match on_unauthorized(retried, session.refresh_token().is_some()) {
                        RefreshDecision::Surface => return Err(ApiError::Unauthorized.into()),
                        RefreshDecision::Reauthenticate => {
                            warn!("401 with no refresh token, clearing session");
                            session.clear()?;
                            return Err(ApiError::AuthenticationRequired.into());
                        }
                        RefreshDecision::Refresh => {
                            retried = true;
                            self.refresh_session(session).await?;
                        }
                    }
                }
            }
        }
    }

    /// Exchange the stored refresh token for a new token pair.
    ///
    /// On success both tokens are rotated and persisted. On any failure the
    /// whole session is cleared and `ApiError::AuthenticationRequired` is
    /// returned - access and refresh tokens are never invalidated separately.
    pub async fn refresh_session(&self, session: &mut Session) -> Result<()> {
        let refresh_token = match session.refresh_token() {
            Some(t) => t.to_string(),
            None => {
                session.clear()?;
                return Err(ApiError::AuthenticationRequired.into());
            }
        };

        match self.request_refresh(&refresh_token).await {
            Ok(tokens) => {
                debug!("access token refreshed");
                session.rotate_tokens(tokens.access_token, tokens.refresh_token)?;
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "token refresh failed, clearing session");
                session.clear()?;
                Err(ApiError::AuthenticationRequired.into())
            }
        }
    }

    async fn request_refresh(&self, refresh_token: &str) -> Result<RefreshResponse> {
        let url = format!("{}{}", self.base_url, REFRESH_PATH);
        let response = self
            .client
            .post(&url)
            .json(&RefreshRequest { refresh_token })
            .send()
            .await
            .context("Failed to send token refresh request")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::from_status(status, &body).into());
        }
        response
            .json()
            .await
            .context("Failed to parse token refresh response")
    }

    async fn get_json<T: DeserializeOwned>(&self, session: &mut Session, path: &str) -> Result<T> {
        let response = self.send(session, PreparedRequest::get(path)).await?;
        response
            .json()
            .await
            .with_context(|| format!("Failed to parse JSON response from {}", path))
    }

    async fn patch_json(&self, session: &mut Session, path: &str, body: Value) -> Result<()> {
        self.send(session, PreparedRequest::patch(path, body)).await?;
        Ok(())
    }

    // ===== User / profile operations =====

    /// Fetch a user's profile by id
    pub async fn fetch_user(&self, session: &mut Session, id: &str) -> Result<User> {
        self.get_json(session, &format!("/api/v1/users/{}", id)).await
    }

    /// Fetch the profile of the currently authenticated user
    pub async fn fetch_me(&self, session: &mut Session) -> Result<User> {
        self.get_json(session, "/api/v1/users/me").await
    }

    /// Update fields on the current user's profile
    pub async fn update_profile(&self, session: &mut Session, update: &ProfileUpdate) -> Result<()> {
        let body = serde_json::to_value(update).context("Failed to serialize profile update")?;
        self.patch_json(session, "/api/v1/users/me/update", body).await
    }

    /// Submit the detail step of the signup flow
    pub async fn complete_signup(&self, session: &mut Session, details: &ProfileUpdate) -> Result<()> {
        let body = serde_json::to_value(details).context("Failed to serialize signup details")?;
        self.patch_json(session, "/api/v1/users/signup", body).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::SessionData;
    use chrono::Utc;
    use std::path::PathBuf;

    fn session_with_token(token: Option<&str>) -> Session {
        // Never touches disk: load/save are not called
        let mut session = Session::new(PathBuf::from("/nonexistent"));
        if let Some(token) = token {
            session.update(SessionData {
                access_token: token.to_string(),
                refresh_token: None,
                user_id: "u1".to_string(),
                created_at: Utc::now(),
            });
        }
        session
    }

    #[test]
    fn test_auth_headers_without_token() {
        let session = session_with_token(None);
        let headers = ApiClient::auth_headers(&session).expect("header build");
        assert!(headers.get(header::AUTHORIZATION).is_none());
    }

    #[test]
    fn test_auth_headers_with_token() {
        let session = session_with_token(Some("tok-123"));
        let headers = ApiClient::auth_headers(&session).expect("header build");
        assert_eq!(
            headers.get(header::AUTHORIZATION).map(|v| v.to_str().unwrap()),
            Some("Bearer tok-123")
        );
    }

    #[test]
    fn test_on_unauthorized_single_retry_policy() {
        // First 401 with a refresh token: refresh once
        assert_eq!(on_unauthorized(false, true), RefreshDecision::Refresh);
        // First 401 without one: session is gone, back to login
        assert_eq!(on_unauthorized(false, false), RefreshDecision::Reauthenticate);
        // Already retried: never a second refresh, regardless of token state
        assert_eq!(on_unauthorized(true, true), RefreshDecision::Surface);
        assert_eq!(on_unauthorized(true, false), RefreshDecision::Surface);
    }
}
