//! Classification rule sets loaded from configuration.
//!
//! Deployments tune the classifier per tenant or per screen without code
//! changes: status overrides, extra message matchers and message-key
//! overrides live in a TOML file, and any value can be overridden from the
//! environment.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

use crate::error::{ClassifyOptions, ErrorReason, MessageMatcher, ParseReasonError};

/// Errors that can occur when loading a rule set.
#[derive(Debug, Error)]
pub enum RulesConfigError {
    /// The rules file was not found.
    #[error("rules file not found: {0}")]
    FileNotFound(String),

    /// The rules file could not be loaded or deserialized.
    #[error("failed to load rules: {0}")]
    ParseError(#[from] ConfigError),

    /// An inline TOML document could not be parsed.
    #[error("failed to parse rules: {0}")]
    TomlError(#[from] toml::de::Error),

    /// The rules path is not valid UTF-8.
    #[error("invalid rules path: {0}")]
    InvalidPath(String),

    /// A `status_overrides` key is not an HTTP status code.
    #[error("invalid status code in status_overrides: {0}")]
    InvalidStatus(String),

    /// A reason name is not one of the known reasons.
    #[error(transparent)]
    InvalidReason(#[from] ParseReasonError),
}

/// A rule set as written in a rules file.
///
/// Map keys are kept as strings and parsed case-insensitively, since the
/// config layer may lowercase them.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RulesConfig {
    /// Reason for generic failures nothing matches
    #[serde(default)]
    pub fallback_reason: ErrorReason,
    /// Key used when no per-reason key is configured
    #[serde(default)]
    pub default_message_key: Option<String>,
    /// HTTP status → reason
    #[serde(default)]
    pub status_overrides: HashMap<String, ErrorReason>,
    /// Reason name → localization key
    #[serde(default)]
    pub message_keys: HashMap<String, String>,
    /// Matchers tried before the built-in ones, in file order
    #[serde(default)]
    pub matchers: Vec<MessageMatcher>,
}

impl RulesConfig {
    /// Load a rule set from a file path.
    ///
    /// Environment variables prefixed with `VOLTCONSOLE` override file
    /// values, using `__` as the separator for nested keys
    /// (e.g. `VOLTCONSOLE__DEFAULT_MESSAGE_KEY=errors.try_again`).
    ///
    /// # Errors
    ///
    /// Returns an error if the file does not exist, the path is not UTF-8,
    /// or the file cannot be deserialized.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use voltconsole::rules::RulesConfig;
    ///
    /// let options = RulesConfig::load("config/error-rules.toml")?.into_options()?;
    /// # Ok::<(), voltconsole::rules::RulesConfigError>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, RulesConfigError> {
        let path = path.as_ref();

        let path_str = path
            .to_str()
            .ok_or_else(|| RulesConfigError::InvalidPath(format!("{:?}", path)))?;

        if !path.exists() {
            return Err(RulesConfigError::FileNotFound(path_str.to_string()));
        }

        let config = Config::builder()
            .add_source(File::with_name(path_str))
            .add_source(
                Environment::with_prefix("VOLTCONSOLE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let rules: RulesConfig = config.try_deserialize()?;
        tracing::debug!(
            path = path_str,
            status_overrides = rules.status_overrides.len(),
            matchers = rules.matchers.len(),
            "loaded classification rules"
        );

        Ok(rules)
    }

    /// Parse a rule set from a TOML string.
    pub fn parse(toml_str: &str) -> Result<Self, RulesConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Converts the file form into classifier options.
    pub fn into_options(self) -> Result<ClassifyOptions, RulesConfigError> {
        let mut status_reason_overrides = HashMap::with_capacity(self.status_overrides.len());
        for (status, reason) in self.status_overrides {
            let code: u16 = status
                .trim()
                .parse()
                .map_err(|_| RulesConfigError::InvalidStatus(status.clone()))?;
            status_reason_overrides.insert(code, reason);
        }

        let mut message_key_overrides = HashMap::with_capacity(self.message_keys.len());
        for (reason, key) in self.message_keys {
            message_key_overrides.insert(reason.parse::<ErrorReason>()?, key);
        }

        Ok(ClassifyOptions {
            fallback_reason: self.fallback_reason,
            message_key_overrides,
            status_reason_overrides,
            extra_matchers: self.matchers,
            default_message_key: self.default_message_key,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    const SAMPLE: &str = r#"
        fallback_reason = "SERVER"
        default_message_key = "errors.try_again"

        [status_overrides]
        "404" = "CONFLICT"
        "429" = "TIMEOUT"

        [message_keys]
        NETWORK = "errors.offline_banner"

        [[matchers]]
        substrings = ["wallet", "insufficient funds"]
        reason = "VALIDATION"

        [[matchers]]
        substrings = ["ocpp"]
        reason = "CONFLICT"
    "#;

    fn write_rules(contents: &str) -> (TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("error-rules.toml");
        std::fs::write(&path, contents).unwrap();
        (dir, path)
    }

    #[test]
    fn test_parse_and_convert() {
        let options = RulesConfig::parse(SAMPLE).unwrap().into_options().unwrap();
        let statuses = &options.status_reason_overrides;
        let keys = &options.message_key_overrides;

        assert_eq!(options.fallback_reason, ErrorReason::Server);
        assert_eq!(
            options.default_message_key.as_deref(),
            Some("errors.try_again")
        );
        assert_eq!(statuses.get(&404), Some(&ErrorReason::Conflict));
        assert_eq!(statuses.get(&429), Some(&ErrorReason::Timeout));
        assert_eq!(
            keys.get(&ErrorReason::Network).map(String::as_str),
            Some("errors.offline_banner")
        );
        assert_eq!(options.extra_matchers.len(), 2);
        assert_eq!(options.extra_matchers[0].reason, ErrorReason::Validation);
        assert_eq!(options.extra_matchers[1].substrings, ["ocpp"]);
    }

    #[test]
    fn test_empty_rules_are_defaults() {
        let options = RulesConfig::parse("").unwrap().into_options().unwrap();
        assert_eq!(options, ClassifyOptions::default());
    }

    #[test]
    fn test_invalid_status_key() {
        let toml = "[status_overrides]\nteapot = \"CONFLICT\"\n";
        let result = RulesConfig::parse(toml).unwrap().into_options();
        match result {
            Err(RulesConfigError::InvalidStatus(status)) => assert_eq!(status, "teapot"),
            other => panic!("expected an invalid status error, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_message_key_reason() {
        let toml = "[message_keys]\nBOGUS = \"errors.x\"\n";
        let result = RulesConfig::parse(toml).unwrap().into_options();
        assert!(matches!(result, Err(RulesConfigError::InvalidReason(_))));
    }

    #[test]
    fn test_invalid_reason_value() {
        let result = RulesConfig::parse("fallback_reason = \"MAYBE\"\n");
        assert!(matches!(result, Err(RulesConfigError::TomlError(_))));
    }

    #[test]
    fn test_lowercase_reason_keys_accepted() {
        let toml = "[message_keys]\nnot_found = \"errors.station_missing\"\n";
        let options = RulesConfig::parse(toml).unwrap().into_options().unwrap();
        let keys = &options.message_key_overrides;
        assert_eq!(
            keys.get(&ErrorReason::NotFound).map(String::as_str),
            Some("errors.station_missing")
        );
    }

    #[test]
    fn test_load_missing_file() {
        let result = RulesConfig::load("/nonexistent/error-rules.toml");
        assert!(matches!(result, Err(RulesConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_load_from_file() {
        let (_dir, path) = write_rules(SAMPLE);

        let rules = RulesConfig::load(&path).unwrap();
        assert_eq!(rules.fallback_reason, ErrorReason::Server);
        assert_eq!(rules.matchers.len(), 2);

        let options = rules.into_options().unwrap();
        let statuses = &options.status_reason_overrides;
        let keys = &options.message_key_overrides;
        assert_eq!(statuses.get(&404), Some(&ErrorReason::Conflict));
        assert!(keys.contains_key(&ErrorReason::Network));
    }

    #[test]
    fn test_env_overrides_file_value() {
        let (_dir, path) = write_rules(SAMPLE);

        // The environment is process-wide: only touch a key that no other
        // loading test asserts on.
        std::env::set_var("VOLTCONSOLE__DEFAULT_MESSAGE_KEY", "errors.from_env");
        let loaded = RulesConfig::load(&path);
        std::env::remove_var("VOLTCONSOLE__DEFAULT_MESSAGE_KEY");

        let rules = loaded.unwrap();
        assert_eq!(
            rules.default_message_key.as_deref(),
            Some("errors.from_env")
        );
        assert_eq!(rules.fallback_reason, ErrorReason::Server);
        assert_eq!(rules.status_overrides.len(), 2);
        assert_eq!(rules.matchers.len(), 2);
    }
}
