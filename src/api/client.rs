//! API client for the meeting management REST API.
//!
//! This module provides the `ApiClient` struct: one configured request
//! pipeline shared by everything that talks to the server. Each request is
//! composed against the current session token at dispatch time, and every
//! response is inspected for authorization failure before the caller sees it.

use std::time::Duration;

use reqwest::{header, Client, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

use crate::auth::{AuthEvent, AuthEventSender, SessionStore};
use crate::models::{Credentials, Meeting, MeetingPayload, Registration, TokenResponse};

use super::ApiError;

/// HTTP request timeout in seconds.
/// 30s allows for slow API responses while failing fast enough for good UX.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Client for the meeting API.
/// Clone is cheap - reqwest::Client uses Arc internally for connection
/// pooling, and the session store is itself a shared handle.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    sessions: SessionStore,
    events: Option<AuthEventSender>,
}

impl ApiClient {
    /// Create a new API client against the given base URL.
    pub fn new(base_url: String, sessions: SessionStore) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            sessions,
            events: None,
        })
    }

    /// Attach the session event channel. Without it, 401 handling still
    /// clears the token but nobody gets told.
    pub fn with_events(mut self, events: AuthEventSender) -> Self {
        self.events = Some(events);
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    // ===== Authentication Endpoints =====
    //
    // These bypass the global 401 handling: a rejection here belongs to the
    // caller (bad credentials, invalid registration), not to the session.

    /// Exchange credentials for a token. The token is NOT stored here; that
    /// is the session controller's job, so storage and header composition
    /// stay under a single writer.
    pub async fn login(&self, credentials: &Credentials) -> Result<TokenResponse, ApiError> {
        let url = self.url("/auth/login/");
        debug!(username = %credentials.username, "Sending login request");

        let response = self.client.post(&url).json(credentials).send().await?;

        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }

        let body = response.text().await.unwrap_or_default();
        Err(Self::map_login_failure(status, &body))
    }

    /// Create a new account. Success does not authenticate the user.
    pub async fn register(&self, registration: &Registration) -> Result<(), ApiError> {
        let url = self.url("/auth/register/");
        debug!(username = %registration.username, "Sending registration request");

        let response = self.client.post(&url).json(registration).send().await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(ApiError::from_status(status, &body))
    }

    fn map_login_failure(status: StatusCode, body: &str) -> ApiError {
        // The server answers bad credentials with 400; some deployments use
        // 401. Either way it's the caller's problem, not a session expiry.
        match status.as_u16() {
            400 | 401 => ApiError::InvalidCredentials,
            _ => ApiError::from_status(status, body),
        }
    }

    // ===== Meeting CRUD =====
    //
    // Thin pass-throughs. No client-side validation, no retries, no
    // coalescing of concurrent identical requests.

    pub async fn list_meetings(&self) -> Result<Vec<Meeting>, ApiError> {
        self.get("/meetings/").await
    }

    pub async fn create_meeting(&self, payload: &MeetingPayload) -> Result<Meeting, ApiError> {
        self.post("/meetings/", payload).await
    }

    pub async fn update_meeting(
        &self,
        id: i64,
        payload: &MeetingPayload,
    ) -> Result<Meeting, ApiError> {
        self.put(&format!("/meetings/{}/", id), payload).await
    }

    pub async fn delete_meeting(&self, id: i64) -> Result<(), ApiError> {
        let url = self.url(&format!("/meetings/{}/", id));
        let response = self
            .client
            .delete(&url)
            .headers(self.auth_headers()?)
            .send()
            .await?;
        self.check_response(response).await?;
        Ok(())
    }

    // ===== Request Pipeline =====

    /// Compose authorization for one request. The token is read from the
    /// session store at dispatch time rather than from a shared mutable
    /// default, so a login or logout is visible to the very next request.
    fn auth_headers(&self) -> Result<header::HeaderMap, ApiError> {
        let mut headers = header::HeaderMap::new();
        if let Some(token) = self.sessions.token() {
            let value = header::HeaderValue::from_str(&format!("Token {}", token))
                .map_err(|e| ApiError::InvalidResponse(format!("Invalid token header: {}", e)))?;
            headers.insert(header::AUTHORIZATION, value);
        }
        Ok(headers)
    }

    /// Inspect a response before the caller sees it. A 401 tears the session
    /// down exactly once and notifies the controller; everything else non-2xx
    /// maps through the error taxonomy.
    async fn check_response(
        &self,
        response: reqwest::Response,
    ) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        if status == StatusCode::UNAUTHORIZED {
            self.handle_unauthorized();
            return Err(ApiError::Unauthorized);
        }

        let body = response.text().await.unwrap_or_default();
        Err(ApiError::from_status(status, &body))
    }

    /// Session teardown on authorization failure. `invalidate` reports
    /// whether a token was actually cleared, so concurrent 401s publish a
    /// single `SessionExpired` between them.
    fn handle_unauthorized(&self) {
        if self.sessions.invalidate() {
            warn!("Received 401, session invalidated");
            if let Some(ref events) = self.events {
                let _ = events.send(AuthEvent::SessionExpired);
            }
        }
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.url(path);
        let response = self
            .client
            .get(&url)
            .headers(self.auth_headers()?)
            .send()
            .await?;
        let response = self.check_response(response).await?;
        Ok(response.json().await?)
    }

    async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let url = self.url(path);
        let response = self
            .client
            .post(&url)
            .headers(self.auth_headers()?)
            .json(body)
            .send()
            .await?;
        let response = self.check_response(response).await?;
        Ok(response.json().await?)
    }

    async fn put<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let url = self.url(path);
        let response = self
            .client
            .put(&url)
            .headers(self.auth_headers()?)
            .json(body)
            .send()
            .await?;
        let response = self.check_response(response).await?;
        Ok(response.json().await?)
    }
}
