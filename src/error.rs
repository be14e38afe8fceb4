//! Error types for tokenizing and emitting properties documents.
//!
//! ## Error Categories
//!
//! - **Lexical errors**: a character the active dialect forbids, an invalid
//!   escape, or an out-of-range Unicode escape. Reported with the position
//!   where the tokenizer was reading.
//! - **Structural errors**: the emitter received write calls in an order the
//!   document grammar does not allow.
//! - **Unrepresentable characters**: the emitter cannot encode a character
//!   under the active settings.
//! - **Configuration errors**: invalid construction parameters.
//! - **I/O errors**: failures of the underlying source or sink.
//!
//! ## Examples
//!
//! ```rust
//! use propstream::{tokenize, Error};
//!
//! let result = tokenize("key=\\uZZZZ");
//! match result {
//!     Err(err @ Error::Lexical { .. }) => {
//!         assert_eq!(err.position().map(|p| p.line), Some(1));
//!     }
//!     other => panic!("expected a lexical error, got {other:?}"),
//! }
//! ```

use crate::position::Position;
use std::fmt;
use thiserror::Error;

/// Represents all possible errors raised by the tokenizer and the emitter.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// IO error from the character source or sink
    #[error("IO error: {0}")]
    Io(String),

    /// Disallowed character, invalid escape or invalid Unicode escape
    #[error("Lexical error at {position}: {msg}")]
    Lexical { position: Position, msg: String },

    /// Illegal ordering of emitter write calls
    #[error("Structural error at {position}: expected {expected}, found {found}")]
    Structural {
        position: Position,
        expected: String,
        found: String,
    },

    /// The emitter cannot encode a character under the active settings
    #[error("Unrepresentable character {ch:?} at {position}")]
    Unrepresentable { position: Position, ch: char },

    /// Invalid construction parameters
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Custom error
    #[error("Error: {0}")]
    Custom(String),
}

impl Error {
    /// Creates a lexical error at `position`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use propstream::{Error, Position};
    ///
    /// let err = Error::lexical(Position::new(), "invalid escape");
    /// assert!(err.to_string().contains("line 1, column 1"));
    /// ```
    pub fn lexical(position: Position, msg: impl Into<String>) -> Self {
        Error::Lexical {
            position,
            msg: msg.into(),
        }
    }

    /// Creates a structural error describing what the emitter expected.
    pub fn structural(position: Position, expected: impl Into<String>, found: impl Into<String>) -> Self {
        Error::Structural {
            position,
            expected: expected.into(),
            found: found.into(),
        }
    }

    pub fn unrepresentable(position: Position, ch: char) -> Self {
        Error::Unrepresentable { position, ch }
    }

    pub fn configuration(msg: impl Into<String>) -> Self {
        Error::Configuration(msg.into())
    }

    /// Creates an I/O error for source or sink failures.
    pub fn io(msg: &str) -> Self {
        Error::Io(msg.to_string())
    }

    /// Creates a custom error with a display message.
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }

    /// Returns the document position the error refers to, when it has one.
    #[must_use]
    pub fn position(&self) -> Option<Position> {
        match self {
            Error::Lexical { position, .. }
            | Error::Structural { position, .. }
            | Error::Unrepresentable { position, .. } => Some(*position),
            Error::Io(_) | Error::Configuration(_) | Error::Custom(_) => None,
        }
    }

    #[must_use]
    pub const fn is_lexical(&self) -> bool {
        matches!(self, Error::Lexical { .. })
    }

    #[must_use]
    pub const fn is_structural(&self) -> bool {
        matches!(self, Error::Structural { .. })
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::io(&err.to_string())
    }
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

impl serde::de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
