use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Session file name in the data directory
const SESSION_FILE: &str = "session.json";

/// The durable session slot: one opaque token per installation. The server
/// decides when a token stops being valid; the client only reacts to 401s.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionData {
    pub token: String,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

impl SessionData {
    pub fn new(token: String, username: String) -> Self {
        Self {
            token,
            username,
            created_at: Utc::now(),
        }
    }
}

/// Single source of truth for the current session. Shared between the
/// session controller (the only writer on the happy path) and the API
/// client (which reads the token per request and may invalidate on 401).
///
/// Every mutation updates the in-memory copy and the session file in the
/// same call, so the durable slot and the header attached to the next
/// request can never disagree.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<RwLock<Inner>>,
}

struct Inner {
    dir: PathBuf,
    data: Option<SessionData>,
}

impl SessionStore {
    pub fn new(dir: PathBuf) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Inner { dir, data: None })),
        }
    }

    /// Load the session slot from disk. An absent or unparsable file means
    /// logged out, not a startup failure.
    pub fn load(&self) -> bool {
        let mut inner = self.inner.write().expect("session lock poisoned");
        let path = inner.dir.join(SESSION_FILE);
        if !path.exists() {
            return false;
        }
        match std::fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<SessionData>(&contents) {
                Ok(data) => {
                    debug!(username = %data.username, "Loaded session from disk");
                    inner.data = Some(data);
                    true
                }
                Err(e) => {
                    warn!(error = %e, "Session file unparsable, treating as logged out");
                    false
                }
            },
            Err(e) => {
                warn!(error = %e, "Failed to read session file");
                false
            }
        }
    }

    /// Store a new session, durable first. By the time this returns, any
    /// request composed afterwards sees the new token.
    pub fn set(&self, data: SessionData) -> Result<()> {
        let mut inner = self.inner.write().expect("session lock poisoned");
        std::fs::create_dir_all(&inner.dir)
            .with_context(|| format!("Failed to create {}", inner.dir.display()))?;
        let path = inner.dir.join(SESSION_FILE);
        let contents = serde_json::to_string_pretty(&data)?;
        std::fs::write(&path, contents)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        inner.data = Some(data);
        Ok(())
    }

    /// Clear the slot, memory and disk together. Returns whether a token was
    /// actually present, so several concurrent 401s produce exactly one
    /// logical clear. Safe to call when already logged out.
    pub fn invalidate(&self) -> bool {
        let mut inner = self.inner.write().expect("session lock poisoned");
        let had_token = inner.data.take().is_some();
        let path = inner.dir.join(SESSION_FILE);
        if path.exists() {
            if let Err(e) = std::fs::remove_file(&path) {
                warn!(error = %e, "Failed to remove session file");
            }
        }
        had_token
    }

    /// Current token, read fresh on every composed request.
    pub fn token(&self) -> Option<String> {
        let inner = self.inner.read().expect("session lock poisoned");
        inner.data.as_ref().map(|d| d.token.clone())
    }

    pub fn username(&self) -> Option<String> {
        let inner = self.inner.read().expect("session lock poisoned");
        inner.data.as_ref().map(|d| d.username.clone())
    }

    /// Derived from token presence, recomputed on every call.
    pub fn is_authenticated(&self) -> bool {
        let inner = self.inner.read().expect("session lock poisoned");
        inner.data.is_some()
    }
}
