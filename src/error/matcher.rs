//! Substring matchers that guess a reason from an error message.
//!
//! Matching is case-insensitive. Caller-supplied matchers are tried before
//! the built-in table, and the first matcher with a hit wins.

use serde::Deserialize;

use super::reason::ErrorReason;

/// Maps any of a list of substrings onto a reason.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct MessageMatcher {
    /// Substrings to look for. An empty entry is contained in every message.
    pub substrings: Vec<String>,
    /// Reason assigned when one of the substrings is found.
    pub reason: ErrorReason,
}

impl MessageMatcher {
    pub fn new<I, S>(substrings: I, reason: ErrorReason) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            substrings: substrings.into_iter().map(Into::into).collect(),
            reason,
        }
    }

    /// Tests an already lower-cased message.
    fn hits(&self, lowered: &str) -> bool {
        self.substrings
            .iter()
            .any(|needle| lowered.contains(needle.to_lowercase().as_str()))
    }
}

const BUILTIN_MATCHERS: &[(&[&str], ErrorReason)] = &[
    (&["network", "connection", "offline", "internet"], ErrorReason::Network),
    (&["timeout", "timed out"], ErrorReason::Timeout),
    (
        &["unauthorized", "forbidden", "invalid credentials", "wrong password"],
        ErrorReason::InvalidCredentials,
    ),
    (&["not found"], ErrorReason::NotFound),
    (&["validation", "invalid input"], ErrorReason::Validation),
    (&["conflict"], ErrorReason::Conflict),
];

/// Returns the built-in matchers in evaluation order.
pub fn builtin_matchers() -> Vec<MessageMatcher> {
    let mut matchers = Vec::with_capacity(BUILTIN_MATCHERS.len());
    for &(words, reason) in BUILTIN_MATCHERS {
        matchers.push(MessageMatcher::new(words.to_vec(), reason));
    }
    matchers
}

/// Finds the first reason whose matcher hits `message`, trying `extra`
/// before the built-ins.
pub fn match_message(message: &str, extra: &[MessageMatcher]) -> Option<ErrorReason> {
    let lowered = message.to_lowercase();

    if let Some(matcher) = extra.iter().find(|matcher| matcher.hits(&lowered)) {
        return Some(matcher.reason);
    }

    BUILTIN_MATCHERS
        .iter()
        .find(|(words, _)| words.iter().any(|w| lowered.contains(w)))
        .map(|(_, reason)| *reason)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builtin(message: &str) -> Option<ErrorReason> {
        match_message(message, &[])
    }

    #[test]
    fn test_builtin_order() {
        let reasons: Vec<ErrorReason> = builtin_matchers().iter().map(|m| m.reason).collect();
        assert_eq!(
            reasons,
            vec![
                ErrorReason::Network,
                ErrorReason::Timeout,
                ErrorReason::InvalidCredentials,
                ErrorReason::NotFound,
                ErrorReason::Validation,
                ErrorReason::Conflict,
            ]
        );
    }

    #[test]
    fn test_builtin_triggers() {
        assert_eq!(builtin("Network Error"), Some(ErrorReason::Network));
        assert_eq!(builtin("OFFLINE"), Some(ErrorReason::Network));
        assert_eq!(builtin("gateway timeout"), Some(ErrorReason::Timeout));
        assert_eq!(builtin("timed out"), Some(ErrorReason::Timeout));
        assert_eq!(
            builtin("Wrong password for operator@example.com"),
            Some(ErrorReason::InvalidCredentials)
        );
        assert_eq!(builtin("Forbidden"), Some(ErrorReason::InvalidCredentials));
        assert_eq!(builtin("Station not found"), Some(ErrorReason::NotFound));
        assert_eq!(builtin("invalid input"), Some(ErrorReason::Validation));
        assert_eq!(builtin("edit conflict"), Some(ErrorReason::Conflict));
    }

    #[test]
    fn test_no_match() {
        assert_eq!(builtin(""), None);
        assert_eq!(builtin("Missing field x"), None);
        assert_eq!(builtin("something odd happened"), None);
    }

    #[test]
    fn test_first_builtin_wins() {
        // "connection" (NETWORK) is listed before "timed out" (TIMEOUT)
        assert_eq!(builtin("connection timed out"), Some(ErrorReason::Network));
    }

    #[test]
    fn test_extra_matchers_checked_first() {
        let extra = vec![MessageMatcher::new(["connection"], ErrorReason::Server)];
        let matched = match_message("Connection refused", &extra);
        assert_eq!(matched, Some(ErrorReason::Server));
    }

    #[test]
    fn test_extra_matchers_in_order() {
        let extra = vec![
            MessageMatcher::new(["wallet"], ErrorReason::Validation),
            MessageMatcher::new(["wallet", "top-up"], ErrorReason::Conflict),
        ];
        let wallet = match_message("Wallet top-up rejected", &extra);
        let top_up = match_message("top-up rejected", &extra);
        assert_eq!(wallet, Some(ErrorReason::Validation));
        assert_eq!(top_up, Some(ErrorReason::Conflict));
    }

    #[test]
    fn test_extra_matchers_case_insensitive() {
        let extra = vec![MessageMatcher::new(["OCPP"], ErrorReason::Conflict)];
        let matched = match_message("ocpp pairing refused", &extra);
        assert_eq!(matched, Some(ErrorReason::Conflict));
    }

    #[test]
    fn test_empty_substring_matches_every_message() {
        let extra = vec![MessageMatcher::new([""], ErrorReason::Server)];
        let matched = match_message("anything", &extra);
        assert_eq!(matched, Some(ErrorReason::Server));
        assert_eq!(match_message("", &extra), Some(ErrorReason::Server));
    }
}
