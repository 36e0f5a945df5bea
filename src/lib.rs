//! voltconsole - error classification for the EV-charging operator console
//!
//! Failures from the backend client, forms and dialogs are reduced to a
//! closed set of reasons with localization keys, so every screen of the
//! console presents errors the same way.
//!
//! ```
//! use voltconsole::error::{classify, ClassifyOptions, ErrorReason, TransportError};
//!
//! let failure = TransportError::new().with_status(400).with_message("Missing field x");
//! let classified = classify(failure, &ClassifyOptions::default());
//!
//! assert_eq!(classified.reason(), ErrorReason::BadRequest);
//! assert_eq!(classified.message_key(), "errors.bad_request");
//! ```

pub mod error;
pub mod logging;
pub mod rules;
