//! The closed set of reasons an error can be classified under.
//!
//! Every reason carries a stable wire name (`BAD_REQUEST`, `NOT_FOUND`, ...),
//! a default localization key, and a recovery hint telling the UI what to do
//! next.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why an operation failed, as far as the console can tell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorReason {
    /// The request never reached the backend (offline, reset, aborted).
    Network,
    /// The request took too long.
    Timeout,
    /// HTTP 400.
    BadRequest,
    /// HTTP 401, the session is missing or expired.
    Unauthorized,
    /// Login rejected for a bad username or password.
    InvalidCredentials,
    /// HTTP 403.
    Forbidden,
    /// HTTP 404.
    NotFound,
    /// HTTP 409, e.g. a charger id that is already registered.
    Conflict,
    /// HTTP 422 or a validation failure reported in a message.
    Validation,
    /// Any 5xx.
    Server,
    /// Nothing more is known. Not a programming error.
    #[default]
    Unknown,
}

/// What the UI should do about a failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecoveryHint {
    /// Offer a retry, the same request may succeed.
    Retry,
    /// Send the user back to the sign-in flow.
    Reauthenticate,
    /// Highlight the offending form fields.
    ShowFieldErrors,
    /// Show the localized message, retrying will not help.
    ShowMessage,
    /// Show a generic apology.
    Apologize,
}

impl RecoveryHint {
    /// Stable name used in CLI and JSON output.
    pub fn as_str(&self) -> &'static str {
        match self {
            RecoveryHint::Retry => "retry",
            RecoveryHint::Reauthenticate => "reauthenticate",
            RecoveryHint::ShowFieldErrors => "show_field_errors",
            RecoveryHint::ShowMessage => "show_message",
            RecoveryHint::Apologize => "apologize",
        }
    }
}

impl fmt::Display for RecoveryHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ErrorReason {
    /// All reasons, in declaration order.
    pub const ALL: [ErrorReason; 11] = [
        ErrorReason::Network,
        ErrorReason::Timeout,
        ErrorReason::BadRequest,
        ErrorReason::Unauthorized,
        ErrorReason::InvalidCredentials,
        ErrorReason::Forbidden,
        ErrorReason::NotFound,
        ErrorReason::Conflict,
        ErrorReason::Validation,
        ErrorReason::Server,
        ErrorReason::Unknown,
    ];

    /// The wire name of this reason.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorReason::Network => "NETWORK",
            ErrorReason::Timeout => "TIMEOUT",
            ErrorReason::BadRequest => "BAD_REQUEST",
            ErrorReason::Unauthorized => "UNAUTHORIZED",
            ErrorReason::InvalidCredentials => "INVALID_CREDENTIALS",
            ErrorReason::Forbidden => "FORBIDDEN",
            ErrorReason::NotFound => "NOT_FOUND",
            ErrorReason::Conflict => "CONFLICT",
            ErrorReason::Validation => "VALIDATION",
            ErrorReason::Server => "SERVER",
            ErrorReason::Unknown => "UNKNOWN",
        }
    }

    /// The built-in localization key for this reason.
    pub fn default_message_key(&self) -> &'static str {
        match self {
            ErrorReason::Network => "errors.network",
            ErrorReason::Timeout => "errors.timeout",
            ErrorReason::BadRequest => "errors.bad_request",
            ErrorReason::Unauthorized => "errors.unauthorized",
            ErrorReason::InvalidCredentials => "errors.invalid_credentials",
            ErrorReason::Forbidden => "errors.forbidden",
            ErrorReason::NotFound => "errors.not_found",
            ErrorReason::Conflict => "errors.conflict",
            ErrorReason::Validation => "errors.validation",
            ErrorReason::Server => "errors.server",
            ErrorReason::Unknown => "errors.generic",
        }
    }

    /// How the UI should react to this reason.
    pub fn recovery_hint(&self) -> RecoveryHint {
        match self {
            ErrorReason::Network | ErrorReason::Timeout => RecoveryHint::Retry,
            ErrorReason::Unauthorized | ErrorReason::InvalidCredentials => {
                RecoveryHint::Reauthenticate
            }
            ErrorReason::Validation => RecoveryHint::ShowFieldErrors,
            ErrorReason::BadRequest
            | ErrorReason::Forbidden
            | ErrorReason::NotFound
            | ErrorReason::Conflict => RecoveryHint::ShowMessage,
            ErrorReason::Server | ErrorReason::Unknown => RecoveryHint::Apologize,
        }
    }

    /// Maps an HTTP status onto a reason using the numeric-range rule.
    ///
    /// Anything not listed (including 1xx-3xx and unlisted 4xx) is `Unknown`.
    pub fn from_status(status: u16) -> Self {
        match status {
            400 => ErrorReason::BadRequest,
            401 => ErrorReason::Unauthorized,
            403 => ErrorReason::Forbidden,
            404 => ErrorReason::NotFound,
            409 => ErrorReason::Conflict,
            422 => ErrorReason::Validation,
            s if s >= 500 => ErrorReason::Server,
            _ => ErrorReason::Unknown,
        }
    }
}

impl fmt::Display for ErrorReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string is not a known reason name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown error reason: {0}")]
pub struct ParseReasonError(pub String);

impl FromStr for ErrorReason {
    type Err = ParseReasonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        ErrorReason::ALL
            .into_iter()
            .find(|reason| reason.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ParseReasonError(s.to_string()))
    }
}
