//! Failure values as they arrive from the rest of the console.
//!
//! Errors reach the classifier in many shapes: a `reqwest` error from the
//! backend client, a JSON error envelope, a bare string thrown by form code,
//! or nothing at all. `Failure` is the owned, shape-tagged form of all of
//! them. Transport errors are recognized by capability (a response status
//! and/or a machine error code) rather than by a concrete client type.

use std::error::Error as StdError;
use std::fmt;

use serde_json::Value;

use super::classification::ClassifiedError;

/// Machine codes that mean the request never completed on the wire.
pub const NETWORK_ERROR_CODES: [&str; 4] =
    ["ECONNRESET", "ECONNABORTED", "ERR_NETWORK", "ETIMEDOUT"];

/// Anything that looks like a failed HTTP exchange.
pub trait TransportFailure {
    /// Status of the response, if one was received.
    fn response_status(&self) -> Option<u16>;

    /// Machine-readable error code such as `ECONNRESET`.
    fn error_code(&self) -> Option<&str>;

    /// Human-readable message, used only for pattern matching.
    fn message(&self) -> String;
}

/// An owned snapshot of a transport failure.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TransportError {
    pub status: Option<u16>,
    pub code: Option<String>,
    pub message: String,
}

impl TransportError {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copies the status, code and message out of any transport failure.
    pub fn capture<T: TransportFailure + ?Sized>(failure: &T) -> Self {
        Self {
            status: failure.response_status(),
            code: failure.error_code().map(str::to_string),
            message: failure.message(),
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Returns true if the code is one of [`NETWORK_ERROR_CODES`].
    pub fn has_network_code(&self) -> bool {
        self.code
            .as_deref()
            .is_some_and(|code| NETWORK_ERROR_CODES.contains(&code))
    }
}

impl TransportFailure for TransportError {
    fn response_status(&self) -> Option<u16> {
        self.status
    }

    fn error_code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    fn message(&self) -> String {
        self.message.clone()
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.status, self.code.as_deref()) {
            (Some(status), _) => write!(f, "HTTP {}: {}", status, self.message),
            (None, Some(code)) => write!(f, "{}: {}", code, self.message),
            (None, None) => f.write_str(&self.message),
        }
    }
}

impl StdError for TransportError {}

// reqwest does not expose socket-level codes, so its predicates are mapped
// onto the equivalent entries of NETWORK_ERROR_CODES.
impl TransportFailure for reqwest::Error {
    fn response_status(&self) -> Option<u16> {
        self.status().map(|status| status.as_u16())
    }

    fn error_code(&self) -> Option<&str> {
        if self.is_timeout() {
            Some("ETIMEDOUT")
        } else if self.is_connect() {
            Some("ERR_NETWORK")
        } else {
            None
        }
    }

    fn message(&self) -> String {
        self.to_string()
    }
}

/// A failure of any shape, ready to be classified.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Failure {
    /// No value at all (null, undefined, `None`).
    Absent,
    /// A bare string.
    Text(String),
    /// A non-transport value, with its `message` if it had one.
    Object { message: Option<String> },
    /// A failed HTTP exchange.
    Transport(TransportError),
    /// A value that was already classified upstream.
    Classified(ClassifiedError),
}

impl Failure {
    /// A generic exception carrying a message.
    pub fn exception(message: impl Into<String>) -> Self {
        Failure::Object {
            message: Some(message.into()),
        }
    }

    /// Converts a Rust error, looking through its source chain for a
    /// transport failure or an earlier classification.
    pub fn from_error(error: &(dyn StdError + 'static)) -> Self {
        let mut current = Some(error);
        while let Some(err) = current {
            if let Some(classified) = err.downcast_ref::<ClassifiedError>() {
                return Failure::Classified(classified.clone());
            }
            if let Some(transport) = err.downcast_ref::<TransportError>() {
                return Failure::Transport(transport.clone());
            }
            if let Some(http) = err.downcast_ref::<reqwest::Error>() {
                return Failure::Transport(TransportError::capture(http));
            }
            current = err.source();
        }
        Failure::exception(error.to_string())
    }

    /// Converts a JSON value of unknown shape.
    ///
    /// An object counts as a transport error when it carries a numeric
    /// `response.status` or a string `code`.
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => Failure::Absent,
            Value::String(text) => Failure::Text(text.clone()),
            Value::Object(map) => {
                let message = map
                    .get("message")
                    .and_then(Value::as_str)
                    .map(str::to_string);
                let status = value
                    .pointer("/response/status")
                    .and_then(Value::as_u64)
                    .and_then(|status| u16::try_from(status).ok());
                let code = map.get("code").and_then(Value::as_str).map(str::to_string);

                if status.is_some() || code.is_some() {
                    Failure::Transport(TransportError {
                        status,
                        code,
                        message: message.unwrap_or_default(),
                    })
                } else {
                    Failure::Object { message }
                }
            }
            _ => Failure::Object { message: None },
        }
    }

    /// The text message patterns are matched against. Empty when the value
    /// carries none.
    pub fn message(&self) -> &str {
        match self {
            Failure::Absent => "",
            Failure::Text(text) => text,
            Failure::Object { message } => message.as_deref().unwrap_or(""),
            Failure::Transport(transport) => &transport.message,
            Failure::Classified(_) => "",
        }
    }

    /// Returns true if this failure took the transport path.
    pub fn is_transport(&self) -> bool {
        matches!(self, Failure::Transport(_))
    }

    /// Returns true if this failure was classified upstream and will be
    /// passed through as is.
    pub fn is_classified(&self) -> bool {
        matches!(self, Failure::Classified(_))
    }
}

impl From<&str> for Failure {
    fn from(text: &str) -> Self {
        Failure::Text(text.to_string())
    }
}

impl From<String> for Failure {
    fn from(text: String) -> Self {
        Failure::Text(text)
    }
}

impl From<TransportError> for Failure {
    fn from(transport: TransportError) -> Self {
        Failure::Transport(transport)
    }
}

impl From<ClassifiedError> for Failure {
    fn from(classified: ClassifiedError) -> Self {
        Failure::Classified(classified)
    }
}

impl From<&Value> for Failure {
    fn from(value: &Value) -> Self {
        Failure::from_json(value)
    }
}

impl From<&reqwest::Error> for Failure {
    fn from(error: &reqwest::Error) -> Self {
        Failure::Transport(TransportError::capture(error))
    }
}

impl<T: Into<Failure>> From<Option<T>> for Failure {
    fn from(value: Option<T>) -> Self {
        value.map_or(Failure::Absent, Into::into)
    }
}
