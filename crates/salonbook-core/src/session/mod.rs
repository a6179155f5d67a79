//! Session and authentication gate
//!
//! The library never renders a login dialog; it asks the host's session
//! provider whether a valid credential exists and, if not, parks the
//! confirmation as a [`PendingAction`] until the host reports the dialog's
//! outcome.

use async_trait::async_trait;

/// Result of the external login dialog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginOutcome {
    /// The user signed in; the pending action resumes
    Success,
    /// The user dismissed the dialog; the pending action is abandoned
    Dismissed,
}

/// An action suspended behind authentication
///
/// Stored as a tagged value rather than a loose flag so that resuming
/// consumes it exactly once and a double-tap on confirm cannot queue a
/// second submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingAction {
    ConfirmBooking,
}

/// The host application's identity/session provider
#[async_trait]
pub trait SessionProvider: Send + Sync {
    /// Whether the session currently holds a valid access credential
    async fn is_authenticated(&self) -> bool;
}
