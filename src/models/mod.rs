//! Data models for the meeting API.
//!
//! - `Meeting`, `MeetingPayload`, `MeetingStatus`: the meeting resource
//! - `Credentials`, `Registration`, `TokenResponse`: auth request/response bodies

pub mod meeting;
pub mod user;

pub use meeting::{Meeting, MeetingPayload, MeetingStatus};
pub use user::{Credentials, Registration, TokenResponse};
