//! REST API client module for the meeting service.
//!
//! This module provides the `ApiClient` for authenticating against the
//! service and managing meeting records.
//!
//! The API uses opaque token authentication: the login endpoint issues a
//! token which is attached to every subsequent request as
//! `Authorization: Token <value>`.

pub mod client;
pub mod error;

pub use client::ApiClient;
pub use error::ApiError;
