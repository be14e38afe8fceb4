//! Dialect settings for the tokenizer and the emitter.
//!
//! - [`ReaderSettings`]: controls how the [`Tokenizer`](crate::Tokenizer)
//!   treats comments, escapes and non-Latin-1 characters
//! - [`WriterSettings`]: controls how the [`Emitter`](crate::Emitter)
//!   re-encodes text and manages its sink
//!
//! Both are plain values; `new()` and `Default` return a fresh default
//! configuration every time.
//!
//! ## Examples
//!
//! ```rust
//! use propstream::{Encoding, ReaderSettings, WriterSettings};
//!
//! let reader = ReaderSettings::new()
//!     .with_extended_unicode_escapes(true)
//!     .with_throw_on_error(false);
//! assert!(reader.invalid_escapes_are_literal);
//!
//! let writer = WriterSettings::new()
//!     .with_restrict_to_latin1(false)
//!     .with_encoding(Encoding::Utf8);
//! assert!(!writer.restrict_to_latin1);
//! ```

#![allow(clippy::struct_excessive_bools)]

use serde::{Deserialize, Serialize};

/// Character encoding used when a source or sink deals in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Encoding {
    #[default]
    Utf8,
    /// ISO-8859-1: every byte is one character, characters above 0xFF
    /// cannot be written.
    Latin1,
}

/// Physical line terminator the emitter writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineEnding {
    #[default]
    Lf,
    CrLf,
    Cr,
}

impl LineEnding {
    /// Returns the terminator as a string.
    ///
    /// ```rust
    /// use propstream::LineEnding;
    ///
    /// assert_eq!(LineEnding::CrLf.as_str(), "\r\n");
    /// ```
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::CrLf => "\r\n",
            LineEnding::Cr => "\r",
        }
    }
}

/// Settings read by the [`Tokenizer`](crate::Tokenizer).
///
/// # Default
///
/// Comments are reported, invalid escapes are kept literally, only `\u`
/// escapes are recognised, raw characters above 0xFF are rejected, errors
/// are raised immediately and the source is released at end of input.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaderSettings {
    /// Skip comment lines instead of producing `Comment` tokens.
    pub ignore_comments: bool,

    /// Keep the character after an unknown backslash escape instead of
    /// reporting a lexical error.
    ///
    /// # Default
    ///
    /// `true`
    pub invalid_escapes_are_literal: bool,

    /// Accept `\xH..HHHH` and `\UHHHHHHHH` in addition to `\uHHHH`.
    ///
    /// # Default
    ///
    /// `false`
    pub extended_unicode_escapes: bool,

    /// Reject raw (unescaped) characters above U+00FF.
    ///
    /// # Default
    ///
    /// `true`
    pub restrict_to_latin1: bool,

    /// Raise lexical errors from `advance` instead of reporting them as an
    /// `Error` token.
    ///
    /// # Default
    ///
    /// `true`
    pub throw_on_error: bool,

    /// Drop the character source once the tokenizer reaches its end state.
    ///
    /// # Default
    ///
    /// `true`
    pub close_source_on_end: bool,

    /// How byte sources are decoded into characters.
    pub encoding: Encoding,
}

impl Default for ReaderSettings {
    fn default() -> Self {
        ReaderSettings {
            ignore_comments: false,
            invalid_escapes_are_literal: true,
            extended_unicode_escapes: false,
            restrict_to_latin1: true,
            throw_on_error: true,
            close_source_on_end: true,
            encoding: Encoding::Utf8,
        }
    }
}

impl ReaderSettings {
    /// Creates the default reader settings.
    ///
    /// ```rust
    /// use propstream::ReaderSettings;
    ///
    /// let settings = ReaderSettings::new();
    /// assert!(settings.restrict_to_latin1);
    /// assert!(settings.throw_on_error);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_ignore_comments(mut self, ignore: bool) -> Self {
        self.ignore_comments = ignore;
        self
    }

    #[must_use]
    pub fn with_invalid_escapes_are_literal(mut self, literal: bool) -> Self {
        self.invalid_escapes_are_literal = literal;
        self
    }

    #[must_use]
    pub fn with_extended_unicode_escapes(mut self, extended: bool) -> Self {
        self.extended_unicode_escapes = extended;
        self
    }

    #[must_use]
    pub fn with_restrict_to_latin1(mut self, restrict: bool) -> Self {
        self.restrict_to_latin1 = restrict;
        self
    }

    #[must_use]
    pub fn with_throw_on_error(mut self, throw: bool) -> Self {
        self.throw_on_error = throw;
        self
    }

    #[must_use]
    pub fn with_close_source_on_end(mut self, close: bool) -> Self {
        self.close_source_on_end = close;
        self
    }

    #[must_use]
    pub fn with_encoding(mut self, encoding: Encoding) -> Self {
        self.encoding = encoding;
        self
    }
}

/// Settings read by the [`Emitter`](crate::Emitter).
///
/// # Default
///
/// Comments are written, characters above 0xFF are escaped as `\uXXXX`
/// (characters outside the BMP are an error), errors are raised, the sink
/// is flushed and released at document end, and auto-flush is off.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct WriterSettings {
    /// Accept comment write calls but write nothing for them.
    pub ignore_comments: bool,

    /// Escape every character above U+00FF instead of writing it raw.
    pub restrict_to_latin1: bool,

    /// Allow `\UHHHHHHHH` for characters outside the Basic Multilingual
    /// Plane.
    pub extended_unicode_escapes: bool,

    /// Raise unrepresentable-character errors. When `false` the offending
    /// write call is skipped and reported by returning `Ok(false)`.
    /// Structural errors are raised regardless.
    pub throw_on_error: bool,

    /// Drop the sink once `DocumentEnd` has been written.
    pub close_sink_on_end: bool,

    /// Flush the sink every `flush_interval` write calls.
    pub auto_flush: bool,

    /// Must be greater than zero.
    pub flush_interval: usize,

    /// How characters are encoded into the byte sink.
    pub encoding: Encoding,

    pub line_ending: LineEnding,
}

impl Default for WriterSettings {
    fn default() -> Self {
        WriterSettings {
            ignore_comments: false,
            restrict_to_latin1: true,
            extended_unicode_escapes: false,
            throw_on_error: true,
            close_sink_on_end: true,
            auto_flush: false,
            flush_interval: 64,
            encoding: Encoding::Utf8,
            line_ending: LineEnding::Lf,
        }
    }
}

impl WriterSettings {
    /// Creates the default writer settings.
    ///
    /// ```rust
    /// use propstream::{LineEnding, WriterSettings};
    ///
    /// let settings = WriterSettings::new();
    /// assert_eq!(settings.line_ending, LineEnding::Lf);
    /// assert!(!settings.auto_flush);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_ignore_comments(mut self, ignore: bool) -> Self {
        self.ignore_comments = ignore;
        self
    }

    #[must_use]
    pub fn with_restrict_to_latin1(mut self, restrict: bool) -> Self {
        self.restrict_to_latin1 = restrict;
        self
    }

    #[must_use]
    pub fn with_extended_unicode_escapes(mut self, extended: bool) -> Self {
        self.extended_unicode_escapes = extended;
        self
    }

    #[must_use]
    pub fn with_throw_on_error(mut self, throw: bool) -> Self {
        self.throw_on_error = throw;
        self
    }

    #[must_use]
    pub fn with_close_sink_on_end(mut self, close: bool) -> Self {
        self.close_sink_on_end = close;
        self
    }

    /// Enables flushing every `interval` write calls.
    ///
    /// ```rust
    /// use propstream::WriterSettings;
    ///
    /// let settings = WriterSettings::new().with_auto_flush(8);
    /// assert!(settings.auto_flush);
    /// assert_eq!(settings.flush_interval, 8);
    /// ```
    #[must_use]
    pub fn with_auto_flush(mut self, interval: usize) -> Self {
        self.auto_flush = true;
        self.flush_interval = interval;
        self
    }

    #[must_use]
    pub fn with_encoding(mut self, encoding: Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    #[must_use]
    pub fn with_line_ending(mut self, line_ending: LineEnding) -> Self {
        self.line_ending = line_ending;
        self
    }
}
