//! Error classification for the operator console
//!
//! This module normalizes failures from the backend client, forms and
//! dialogs into a small, closed set of reasons. Each classified error carries
//! a localization key for the UI and a recovery hint (retry, sign in again,
//! show field errors, ...), so every screen reacts to failures the same way.

pub mod classification;
pub mod classifier;
pub mod connectivity;
pub mod matcher;
pub mod reason;
pub mod source;

// Re-export main types for convenient access
pub use classification::ClassifiedError;
pub use classifier::{
    classify, classify_with, get_message_key, is_classified_error, ClassifyOptions, ErrorClassifier,
};
pub use connectivity::{Connectivity, ConnectivityFlag, ConnectivitySignal};
pub use matcher::{builtin_matchers, match_message, MessageMatcher};
pub use reason::{ErrorReason, ParseReasonError, RecoveryHint};
pub use source::{Failure, TransportError, TransportFailure, NETWORK_ERROR_CODES};
