//! The normalized error value handed back to UI code.
//!
//! A `ClassifiedError` is built once, when a failure crosses a boundary (an
//! API call, a form submit), and is never mutated afterwards. It carries the
//! reason, the localization key to display, the HTTP status if one was known,
//! and the original failure for diagnostics.

use std::sync::Arc;

use serde::Serialize;

use super::reason::{ErrorReason, RecoveryHint};
use super::source::Failure;

/// A failure reduced to a reason and a message key.
#[derive(Clone, Debug, Serialize)]
pub struct ClassifiedError {
    reason: ErrorReason,
    message_key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    http_status: Option<u16>,
    #[serde(skip)]
    cause: Option<Arc<Failure>>,
}

impl ClassifiedError {
    /// Creates a classified error with no status and no cause.
    pub fn new(reason: ErrorReason, message_key: impl Into<String>) -> Self {
        Self {
            reason,
            message_key: message_key.into(),
            http_status: None,
            cause: None,
        }
    }

    /// Attaches the HTTP status the failure originated from.
    pub fn with_status(mut self, status: Option<u16>) -> Self {
        self.http_status = status;
        self
    }

    /// Attaches the original failure.
    pub fn with_cause(mut self, cause: impl Into<Failure>) -> Self {
        self.cause = Some(Arc::new(cause.into()));
        self
    }

    pub(crate) fn with_shared_cause(mut self, cause: Arc<Failure>) -> Self {
        self.cause = Some(cause);
        self
    }

    /// The classification outcome.
    pub fn reason(&self) -> ErrorReason {
        self.reason
    }

    /// Localization key for the message to show the user.
    pub fn message_key(&self) -> &str {
        &self.message_key
    }

    /// HTTP status of the originating response, if any.
    pub fn http_status(&self) -> Option<u16> {
        self.http_status
    }

    /// The original failure. For logs only, never for display.
    pub fn cause(&self) -> Option<&Failure> {
        self.cause.as_deref()
    }

    /// What the UI should do next.
    pub fn recovery_hint(&self) -> RecoveryHint {
        self.reason.recovery_hint()
    }

    /// Returns true if retrying the same request may succeed.
    pub fn should_retry(&self) -> bool {
        matches!(self.recovery_hint(), RecoveryHint::Retry)
    }

    /// Returns true if the user has to sign in again.
    pub fn requires_reauthentication(&self) -> bool {
        matches!(self.recovery_hint(), RecoveryHint::Reauthenticate)
    }

    /// Returns true if the request never reached the backend.
    pub fn is_network(&self) -> bool {
        self.reason == ErrorReason::Network
    }
}

// Two classifications are equal when they say the same thing to the user;
// the cause is diagnostic only.
impl PartialEq for ClassifiedError {
    fn eq(&self, other: &Self) -> bool {
        self.reason == other.reason
            && self.message_key == other.message_key
            && self.http_status == other.http_status
    }
}

impl Eq for ClassifiedError {}

impl std::fmt::Display for ClassifiedError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}", self.reason, self.message_key)?;
        if let Some(status) = self.http_status {
            write!(f, ", HTTP {status}")?;
        }
        f.write_str(")")
    }
}

impl std::error::Error for ClassifiedError {}
