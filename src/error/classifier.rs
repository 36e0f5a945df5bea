//! Error classifier for console failures
//!
//! Turns any [`Failure`] into a [`ClassifiedError`]. Classification is total
//! and deterministic: the only outside input is the injected connectivity
//! signal, and every value, including an absent one, produces a result.
//!
//! Resolution order on the transport path is status override, then the
//! numeric status range, then the network-code override, and message
//! matching only when the reason is still `Unknown`. A 400 whose message
//! mentions "validation" therefore stays `BadRequest`.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, trace};

use super::classification::ClassifiedError;
use super::connectivity::{Connectivity, ConnectivitySignal};
use super::matcher::{match_message, MessageMatcher};
use super::reason::ErrorReason;
use super::source::{Failure, TransportError};

/// Per-call classification rules. Every field is optional in spirit;
/// `ClassifyOptions::default()` applies only the built-in tables.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClassifyOptions {
    /// Reason used when nothing else matches on the generic path.
    pub fallback_reason: ErrorReason,
    /// Per-reason localization keys, checked before everything else.
    pub message_key_overrides: HashMap<ErrorReason, String>,
    /// Status → reason mappings that replace the numeric-range rule.
    pub status_reason_overrides: HashMap<u16, ErrorReason>,
    /// Matchers tried before the built-in ones.
    pub extra_matchers: Vec<MessageMatcher>,
    /// Key used when no per-reason override exists.
    pub default_message_key: Option<String>,
}

impl ClassifyOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fallback_reason(mut self, reason: ErrorReason) -> Self {
        self.fallback_reason = reason;
        self
    }

    pub fn with_message_key(mut self, reason: ErrorReason, key: impl Into<String>) -> Self {
        self.message_key_overrides.insert(reason, key.into());
        self
    }

    pub fn with_status_reason(mut self, status: u16, reason: ErrorReason) -> Self {
        self.status_reason_overrides.insert(status, reason);
        self
    }

    pub fn with_matcher(mut self, matcher: MessageMatcher) -> Self {
        self.extra_matchers.push(matcher);
        self
    }

    pub fn with_default_message_key(mut self, key: impl Into<String>) -> Self {
        self.default_message_key = Some(key.into());
        self
    }

    /// Picks the localization key for `reason`.
    ///
    /// Precedence is the per-reason override, the caller's default key, then
    /// the built-in key for `reason`. The built-in table covers every reason,
    /// so the fallback-reason and `Unknown` keys are never reached.
    pub fn resolve_message_key(&self, reason: ErrorReason) -> String {
        self.message_key_overrides
            .get(&reason)
            .or(self.default_message_key.as_ref())
            .cloned()
            .unwrap_or_else(|| reason.default_message_key().to_string())
    }

    fn status_reason(&self, status: Option<u16>) -> ErrorReason {
        match status {
            Some(status) => self
                .status_reason_overrides
                .get(&status)
                .copied()
                .unwrap_or_else(|| ErrorReason::from_status(status)),
            None => ErrorReason::Unknown,
        }
    }
}

/// A classifier bound to a rule set and a connectivity signal.
///
/// Holds no mutable state of its own and can be shared across request
/// handlers.
#[derive(Clone)]
pub struct ErrorClassifier {
    options: ClassifyOptions,
    connectivity: Arc<dyn ConnectivitySignal>,
}

impl Default for ErrorClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ErrorClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ErrorClassifier")
            .field("options", &self.options)
            .field("online", &self.connectivity.is_online())
            .finish()
    }
}

impl ErrorClassifier {
    /// Creates a classifier with default rules and no connectivity signal.
    pub fn new() -> Self {
        Self::with_options(ClassifyOptions::default())
    }

    pub fn with_options(options: ClassifyOptions) -> Self {
        Self {
            options,
            connectivity: Arc::new(Connectivity::Unknown),
        }
    }

    /// Replaces the connectivity signal.
    pub fn with_connectivity(mut self, signal: impl ConnectivitySignal + 'static) -> Self {
        self.connectivity = Arc::new(signal);
        self
    }

    pub fn options(&self) -> &ClassifyOptions {
        &self.options
    }

    /// Classifies a failure of any shape.
    pub fn classify(&self, failure: impl Into<Failure>) -> ClassifiedError {
        classify_with(failure, &self.options, self.connectivity.as_ref())
    }

    /// Classifies a Rust error, looking through its source chain.
    pub fn classify_error(&self, error: &(dyn std::error::Error + 'static)) -> ClassifiedError {
        self.classify(Failure::from_error(error))
    }
}

/// Classifies with no connectivity signal.
pub fn classify(failure: impl Into<Failure>, options: &ClassifyOptions) -> ClassifiedError {
    classify_with(failure, options, &Connectivity::Unknown)
}

/// Classifies a failure using `options` and the given connectivity signal.
pub fn classify_with(
    failure: impl Into<Failure>,
    options: &ClassifyOptions,
    connectivity: &dyn ConnectivitySignal,
) -> ClassifiedError {
    let failure = Arc::new(failure.into());
    trace!(cause = ?failure, "classifying failure");

    if connectivity.is_online() == Some(false) {
        debug!(reason = %ErrorReason::Network, path = "offline", "classified error");
        let key = options.resolve_message_key(ErrorReason::Network);
        return ClassifiedError::new(ErrorReason::Network, key)
            .with_shared_cause(Arc::clone(&failure));
    }

    match failure.as_ref() {
        Failure::Classified(classified) => {
            debug!(reason = %classified.reason(), path = "classified", "classified error");
            classified.clone()
        }
        Failure::Transport(transport) => {
            let classified = classify_transport(transport, options);
            debug!(
                reason = %classified.reason(),
                status = ?classified.http_status(),
                path = "transport",
                "classified error"
            );
            classified.with_shared_cause(Arc::clone(&failure))
        }
        other => {
            let reason = match_message(other.message(), &options.extra_matchers)
                .unwrap_or(options.fallback_reason);
            debug!(reason = %reason, path = "generic", "classified error");
            ClassifiedError::new(reason, options.resolve_message_key(reason))
                .with_shared_cause(Arc::clone(&failure))
        }
    }
}

fn classify_transport(transport: &TransportError, options: &ClassifyOptions) -> ClassifiedError {
    let status = transport.status;
    let mut reason = options.status_reason(status);

    if transport.has_network_code() || status == Some(0) {
        reason = ErrorReason::Network;
    }

    if reason == ErrorReason::Unknown {
        if let Some(matched) = match_message(&transport.message, &options.extra_matchers) {
            reason = matched;
        }
    }

    ClassifiedError::new(reason, options.resolve_message_key(reason)).with_status(status)
}

/// Returns true if `error` is a [`ClassifiedError`].
pub fn is_classified_error(error: &(dyn std::error::Error + 'static)) -> bool {
    error.is::<ClassifiedError>()
}

/// Classifies with default options and returns only the localization key.
pub fn get_message_key(failure: impl Into<Failure>) -> String {
    classify(failure, &ClassifyOptions::default())
        .message_key()
        .to_string()
}
