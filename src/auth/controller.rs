use tracing::{debug, info};

use crate::api::{ApiClient, ApiError};
use crate::models::{Credentials, Registration};

use super::{SessionData, SessionStore};

/// Where the caller should take the user next. The controller never
/// navigates itself; it reports the transition and the front end renders it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    /// Authenticated landing view (the meeting list)
    Home,
    /// Login view
    Login,
}

/// The only component allowed to mutate the session on the happy path.
/// Login stores the token durably before returning, so a request issued
/// immediately afterwards already carries it; logout clears unconditionally.
pub struct SessionController {
    client: ApiClient,
    sessions: SessionStore,
}

impl SessionController {
    pub fn new(client: ApiClient, sessions: SessionStore) -> Self {
        Self { client, sessions }
    }

    /// Authenticate and store the issued token. Fails with
    /// `ApiError::InvalidCredentials` when the server rejects the login;
    /// that failure belongs to the caller, nothing global happens.
    pub async fn login(&self, credentials: Credentials) -> Result<Navigation, ApiError> {
        let response = self.client.login(&credentials).await?;

        self.sessions
            .set(SessionData::new(response.token, credentials.username.clone()))
            .map_err(|e| ApiError::InvalidResponse(format!("Failed to persist session: {}", e)))?;

        info!(username = %credentials.username, "Logged in");
        Ok(Navigation::Home)
    }

    /// Create an account. Success does not authenticate: the user lands on
    /// the login view with no token stored.
    pub async fn register(&self, registration: Registration) -> Result<Navigation, ApiError> {
        self.client.register(&registration).await?;
        info!(username = %registration.username, "Registered");
        Ok(Navigation::Login)
    }

    /// Clear the session. Idempotent: logging out twice is fine.
    pub fn logout(&self) -> Navigation {
        let had_session = self.sessions.invalidate();
        debug!(had_session, "Logged out");
        Navigation::Login
    }

    pub fn is_authenticated(&self) -> bool {
        self.sessions.is_authenticated()
    }

    pub fn username(&self) -> Option<String> {
        self.sessions.username()
    }
}
