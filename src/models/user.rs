use serde::{Deserialize, Serialize};

/// Login request body. Transient - exists only for the duration of the
/// request, never written to disk.
#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Registration request body. Transient, like `Credentials`.
#[derive(Debug, Clone, Serialize)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Successful login response.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}
