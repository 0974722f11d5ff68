//! Authentication module for managing the user session.
//!
//! This module provides:
//! - `SessionStore`: the durable token slot, shared between the controller
//!   and the API client
//! - `SessionController`: login/register/logout operations
//! - `AuthEvent`: notifications from the HTTP layer on session teardown
//!
//! Sessions are persisted to disk; the server decides token validity.

pub mod controller;
pub mod events;
pub mod session;

pub use controller::{Navigation, SessionController};
pub use events::{AuthEvent, AuthEventReceiver, AuthEventSender};
pub use session::{SessionData, SessionStore};
