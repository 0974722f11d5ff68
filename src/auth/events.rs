use tokio::sync::mpsc;

/// Session lifecycle notifications from the HTTP layer.
///
/// The client never navigates or tears down UI state itself; it publishes
/// here and the top-level controller owns the resulting transition. At most
/// one `SessionExpired` is published per stored token, however many in-flight
/// requests observe the same 401.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthEvent {
    SessionExpired,
}

pub type AuthEventSender = mpsc::UnboundedSender<AuthEvent>;
pub type AuthEventReceiver = mpsc::UnboundedReceiver<AuthEvent>;

pub fn channel() -> (AuthEventSender, AuthEventReceiver) {
    mpsc::unbounded_channel()
}
