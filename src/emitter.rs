//! Protocol-checked emitter for properties documents.
//!
//! The [`Emitter`] accepts an ordered sequence of write calls and turns them
//! into well-formed text. Legality is decided by an explicit transition
//! table over [`EmitterState`]:
//!
//! ```text
//! NotStarted -DocumentStart-> Document
//! Document   -Comment-> Document
//! Document   -PropertyStart-> Property -Text-> Key
//! Key        -Assigner-> Assigner -Text-> Value
//! Key        -Text-> Value            (a single space is the assigner)
//! Key | Assigner | Value -PropertyEnd-> Document
//! Document   -DocumentEnd-> Ended
//! ```
//!
//! Any other call is a structural error.
//!
//! ## Text encoding
//!
//! Text is escaped so that the [`Tokenizer`](crate::Tokenizer) reads it back
//! unchanged: backslashes are always escaped, `=`/`:` and whitespace are
//! escaped inside keys, leading whitespace of a value is escaped, `#`/`!`
//! are escaped at the start of a line and line terminators become `\r`/`\n`.
//! Characters above U+00FF are escaped as `\uXXXX` unless
//! `restrict_to_latin1` is disabled.
//!
//! ## Usage
//!
//! ```rust
//! use propstream::{Emitter, WriterSettings};
//!
//! let settings = WriterSettings::new().with_close_sink_on_end(false);
//! let mut emitter = Emitter::new(Vec::new(), settings).unwrap();
//! emitter.document_start().unwrap();
//! emitter.comment("generated").unwrap();
//! emitter.property("greeting", '=', "héllo wörld").unwrap();
//! emitter.property("path", ':', "C:\\temp").unwrap();
//! emitter.document_end().unwrap();
//!
//! let text = String::from_utf8(emitter.into_inner().unwrap()).unwrap();
//! assert_eq!(text, "# generated\ngreeting=héllo wörld\npath:C:\\\\temp\n");
//! ```

use crate::escape::{
    encode_simple, is_assigner, is_comment_handle, is_latin1, is_line_end, is_literal_assigner,
    is_whitespace, push_unicode_escape,
};
use crate::source::CharSource;
use crate::{Encoding, Error, Position, Result, Token, TokenKind, Tokenizer, WriterSettings};
use std::fmt;
use std::io::Write;
use tracing::{debug, trace};

/// A single write call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event<'a> {
    DocumentStart,
    /// A comment line introduced by `handle` (`#` or `!`).
    Comment { handle: char, text: &'a str },
    PropertyStart,
    /// Key or value text, depending on where it appears in the property.
    /// With `logical_lines` set, line terminators in `text` are written as
    /// backslash continuations instead of `\r`/`\n` escapes.
    Text { text: &'a str, logical_lines: bool },
    Assigner(char),
    PropertyEnd,
    DocumentEnd,
}

impl Event<'_> {
    #[must_use]
    pub const fn kind(&self) -> EventKind {
        match self {
            Event::DocumentStart => EventKind::DocumentStart,
            Event::Comment { .. } => EventKind::Comment,
            Event::PropertyStart => EventKind::PropertyStart,
            Event::Text { .. } => EventKind::Text,
            Event::Assigner(_) => EventKind::Assigner,
            Event::PropertyEnd => EventKind::PropertyEnd,
            Event::DocumentEnd => EventKind::DocumentEnd,
        }
    }
}

/// The kind of a write call, used by the transition table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    DocumentStart,
    Comment,
    PropertyStart,
    Text,
    Assigner,
    PropertyEnd,
    DocumentEnd,
}

impl EventKind {
    pub const ALL: [EventKind; 7] = [
        EventKind::DocumentStart,
        EventKind::Comment,
        EventKind::PropertyStart,
        EventKind::Text,
        EventKind::Assigner,
        EventKind::PropertyEnd,
        EventKind::DocumentEnd,
    ];
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Where the emitter is in the document grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EmitterState {
    NotStarted,
    /// Between properties.
    Document,
    /// After `PropertyStart`, waiting for the key.
    Property,
    Key,
    Assigner,
    Value,
    Ended,
}

impl EmitterState {
    /// The transition table: the state after `kind`, or `None` when the call
    /// is illegal here.
    ///
    /// ```rust
    /// use propstream::{EmitterState, EventKind};
    ///
    /// assert_eq!(
    ///     EmitterState::Key.transition(EventKind::Text),
    ///     Some(EmitterState::Value)
    /// );
    /// assert_eq!(EmitterState::Value.transition(EventKind::Text), None);
    /// ```
    #[must_use]
    pub const fn transition(self, kind: EventKind) -> Option<EmitterState> {
        use EmitterState as S;
        use EventKind as K;

        let next = match (self, kind) {
            (S::NotStarted, K::DocumentStart) => S::Document,
            (S::Document, K::Comment) => S::Document,
            (S::Document, K::PropertyStart) => S::Property,
            (S::Document, K::DocumentEnd) => S::Ended,
            (S::Property, K::Text) => S::Key,
            (S::Key, K::Assigner) => S::Assigner,
            (S::Key, K::Text) | (S::Assigner, K::Text) => S::Value,
            (S::Key, K::PropertyEnd) | (S::Assigner, K::PropertyEnd) | (S::Value, K::PropertyEnd) => {
                S::Document
            }
            _ => return None,
        };
        Some(next)
    }

    /// Every call that is legal in this state.
    #[must_use]
    pub fn expected(self) -> Vec<EventKind> {
        EventKind::ALL
            .into_iter()
            .filter(|kind| self.transition(*kind).is_some())
            .collect()
    }

    const fn in_property(self) -> bool {
        matches!(self, EmitterState::Key | EmitterState::Assigner | EmitterState::Value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Role {
    Key,
    Value { after_whitespace_assigner: bool },
}

/// The properties emitter.
///
/// Writes to any [`Write`] sink. The emitter owns the sink until
/// `DocumentEnd`, when it is flushed and, with `close_sink_on_end`, dropped.
pub struct Emitter<W: Write> {
    sink: Option<W>,
    settings: WriterSettings,
    state: EmitterState,
    position: Position,
    assigner: Option<char>,
    writes: usize,
}

impl<W: Write> Emitter<W> {
    /// Creates an emitter over `sink`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when `settings.flush_interval` is zero.
    pub fn new(sink: W, settings: WriterSettings) -> Result<Self> {
        if settings.flush_interval == 0 {
            return Err(Error::configuration("flush interval must be greater than zero"));
        }
        debug!(?settings, "emitter created");
        Ok(Emitter {
            sink: Some(sink),
            settings,
            state: EmitterState::NotStarted,
            position: Position::new(),
            assigner: None,
            writes: 0,
        })
    }

    /// Performs one write call.
    ///
    /// Returns `Ok(false)` when a character could not be encoded and
    /// `throw_on_error` is disabled; nothing is written for that call and
    /// the state does not change.
    ///
    /// # Errors
    ///
    /// Structural errors for calls the grammar does not allow here,
    /// unrepresentable characters when `throw_on_error` is set, and sink
    /// I/O errors.
    pub fn write(&mut self, event: Event<'_>) -> Result<bool> {
        let kind = event.kind();
        let Some(next) = self.state.transition(kind) else {
            return Err(self.unexpected(kind.to_string()));
        };
        trace!(?event, state = ?self.state, "write");

        let encoded = match event {
            Event::DocumentStart => {
                debug!("document started");
                Ok(String::new())
            }
            Event::Comment { handle, text } => self.encode_comment(handle, text),
            Event::PropertyStart => {
                self.assigner = None;
                Ok(String::new())
            }
            Event::Text { text, logical_lines } => self.encode_property_text(text, logical_lines),
            Event::Assigner(ch) => {
                if !is_assigner(ch) {
                    return Err(self.unexpected(format!("assigner {ch:?}")));
                }
                self.assigner = Some(ch);
                Ok(ch.to_string())
            }
            Event::PropertyEnd => Ok(self.settings.line_ending.as_str().to_string()),
            Event::DocumentEnd => Ok(String::new()),
        };

        let encoded = match encoded {
            Ok(encoded) => encoded,
            Err(err) if !self.settings.throw_on_error && matches!(err, Error::Unrepresentable { .. }) => {
                debug!(%err, "write call skipped");
                return Ok(false);
            }
            Err(err) => return Err(err),
        };

        self.put(&encoded)?;
        self.state = next;
        self.writes += 1;

        if next == EmitterState::Ended {
            self.flush()?;
            self.release();
        } else if self.settings.auto_flush && self.writes % self.settings.flush_interval == 0 {
            self.flush()?;
        }
        Ok(true)
    }

    pub fn document_start(&mut self) -> Result<bool> {
        self.write(Event::DocumentStart)
    }

    /// Writes a `#` comment.
    ///
    /// Text starting with whitespace, or containing a line terminator, is
    /// unrepresentable: the reader strips the one and ends the comment at
    /// the other.
    pub fn comment(&mut self, text: &str) -> Result<bool> {
        self.write(Event::Comment { handle: '#', text })
    }

    pub fn property_start(&mut self) -> Result<bool> {
        self.write(Event::PropertyStart)
    }

    /// Writes key or value text.
    pub fn text(&mut self, text: &str) -> Result<bool> {
        self.write(Event::Text {
            text,
            logical_lines: false,
        })
    }

    pub fn assigner(&mut self, ch: char) -> Result<bool> {
        self.write(Event::Assigner(ch))
    }

    pub fn property_end(&mut self) -> Result<bool> {
        self.write(Event::PropertyEnd)
    }

    pub fn document_end(&mut self) -> Result<bool> {
        self.write(Event::DocumentEnd)
    }

    /// Writes a whole `key<assigner>value` line.
    ///
    /// Returns `Ok(false)` if any part was skipped because it could not be
    /// encoded.
    pub fn property(&mut self, key: &str, assigner: char, value: &str) -> Result<bool> {
        let mut complete = self.property_start()?;
        complete &= self.text(key)?;
        complete &= self.assigner(assigner)?;
        complete &= self.text(value)?;
        complete &= self.property_end()?;
        Ok(complete)
    }

    /// Writes a token, opening the document and closing the previous
    /// property as needed. Comments use `#`; see
    /// [`write_current`](Self::write_current) to keep the tokenizer's handle.
    ///
    /// A `None` token finishes the document.
    pub fn write_token(&mut self, token: &Token) -> Result<bool> {
        self.write_token_with(token, '#')
    }

    /// Writes the tokenizer's current token, keeping its comment handle.
    ///
    /// Continuation breaks are gone from token text by the time it is read,
    /// so any line terminator left in it came from an escape and is written
    /// as `\n`/`\r` again.
    pub fn write_current<S: CharSource>(&mut self, tokenizer: &Tokenizer<S>) -> Result<bool> {
        self.write_token_with(
            tokenizer.current_token(),
            tokenizer.comment_handle().unwrap_or('#'),
        )
    }

    fn write_token_with(&mut self, token: &Token, handle: char) -> Result<bool> {
        if self.state == EmitterState::NotStarted && token.kind != TokenKind::None {
            self.document_start()?;
        }
        let text = token.text().unwrap_or_default();

        match token.kind {
            TokenKind::None => {
                self.finish()?;
                Ok(true)
            }
            TokenKind::Error => Err(self.unexpected("Error token".to_string())),
            TokenKind::Comment => {
                self.close_property()?;
                self.write(Event::Comment { handle, text })
            }
            TokenKind::Key => {
                self.close_property()?;
                self.property_start()?;
                self.text(text)
            }
            TokenKind::Assigner => match token.assigner_char() {
                Some(ch) => self.assigner(ch),
                None => Err(self.unexpected("empty Assigner token".to_string())),
            },
            TokenKind::Value => match &token.text {
                Some(text) => self.text(text),
                None => self.property_end(),
            },
        }
    }

    /// Closes any open property and ends the document.
    pub fn finish(&mut self) -> Result<()> {
        if self.state == EmitterState::NotStarted {
            self.document_start()?;
        }
        self.close_property()?;
        if self.state != EmitterState::Ended {
            self.document_end()?;
        }
        Ok(())
    }

    /// Flushes the sink.
    pub fn flush(&mut self) -> Result<()> {
        if let Some(sink) = self.sink.as_mut() {
            sink.flush()?;
            debug!(writes = self.writes, "sink flushed");
        }
        Ok(())
    }

    #[must_use]
    pub fn state(&self) -> EmitterState {
        self.state
    }

    /// Position of the next character to be written.
    #[must_use]
    pub fn position(&self) -> Position {
        self.position
    }

    #[must_use]
    pub fn settings(&self) -> &WriterSettings {
        &self.settings
    }

    /// Hands back the sink, unless it was released at document end.
    pub fn into_inner(self) -> Option<W> {
        self.sink
    }

    fn close_property(&mut self) -> Result<()> {
        if self.state.in_property() {
            self.property_end()?;
        }
        Ok(())
    }

    fn unexpected(&self, found: String) -> Error {
        let expected = self
            .state
            .expected()
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>();
        let expected = if expected.is_empty() {
            "nothing".to_string()
        } else {
            expected.join(" or ")
        };
        Error::structural(self.position, expected, found)
    }

    fn encode_comment(&self, handle: char, text: &str) -> Result<String> {
        if !is_comment_handle(handle) {
            return Err(self.unexpected(format!("comment handle {handle:?}")));
        }
        if self.settings.ignore_comments {
            return Ok(String::new());
        }

        let mut out = String::with_capacity(text.len() + 3);
        out.push(handle);
        if !text.is_empty() {
            out.push(' ');
        }
        if let Some(ch) = text.chars().next().filter(|c| is_whitespace(*c)) {
            return Err(Error::unrepresentable(self.position, ch));
        }
        for ch in text.chars() {
            let latin1_only =
                self.settings.restrict_to_latin1 || self.settings.encoding == Encoding::Latin1;
            if is_line_end(ch) || (latin1_only && !is_latin1(ch)) {
                return Err(Error::unrepresentable(self.position, ch));
            }
            out.push(ch);
        }
        out.push_str(self.settings.line_ending.as_str());
        Ok(out)
    }

    fn encode_property_text(&self, text: &str, logical_lines: bool) -> Result<String> {
        // Trailing whitespace reads back as a key without a value, so a
        // whitespace assigner needs a non-empty value.
        let whitespace_assigner = match self.state {
            EmitterState::Key => Some(' '),
            EmitterState::Assigner => self.assigner.filter(|c| is_whitespace(*c)),
            _ => None,
        };
        if let (Some(ch), true) = (whitespace_assigner, text.is_empty()) {
            return Err(Error::unrepresentable(self.position, ch));
        }

        match self.state {
            EmitterState::Property => self.encode_text(text, Role::Key, logical_lines),
            EmitterState::Key => {
                // No assigner was written: a single space separates the value.
                let mut out = String::from(" ");
                out.push_str(&self.encode_text(
                    text,
                    Role::Value {
                        after_whitespace_assigner: true,
                    },
                    logical_lines,
                )?);
                Ok(out)
            }
            _ => self.encode_text(
                text,
                Role::Value {
                    after_whitespace_assigner: self.assigner.is_some_and(is_whitespace),
                },
                logical_lines,
            ),
        }
    }

    fn encode_text(&self, text: &str, role: Role, logical_lines: bool) -> Result<String> {
        let is_key = role == Role::Key;
        let mut out = String::with_capacity(text.len() + 8);
        let indent = match role {
            Role::Key => self.position.column - 1,
            // The implicit separator space shifts the value one column.
            Role::Value {
                after_whitespace_assigner: true,
            } if self.state == EmitterState::Key => self.position.column,
            Role::Value { .. } => self.position.column - 1,
        };

        let mut chars = text.chars().peekable();
        let mut first = true;
        let mut segment_start = true;
        let mut line_start = is_key;

        while let Some(ch) = chars.next() {
            if logical_lines && is_line_end(ch) {
                if ch == '\r' && chars.peek() == Some(&'\n') {
                    chars.next();
                }
                out.push('\\');
                out.push_str(self.settings.line_ending.as_str());
                out.extend(std::iter::repeat(' ').take(indent));
                segment_start = true;
                line_start = true;
                continue;
            }

            let escape_whitespace = is_key || segment_start;
            match ch {
                _ if line_start && is_comment_handle(ch) => {
                    out.push('\\');
                    out.push(ch);
                }
                _ if is_literal_assigner(ch)
                    && (is_key
                        || (first
                            && matches!(
                                role,
                                Role::Value {
                                    after_whitespace_assigner: true
                                }
                            ))) =>
                {
                    out.push('\\');
                    out.push(ch);
                }
                ' ' if escape_whitespace => out.push_str("\\ "),
                '\t' if escape_whitespace => out.push_str("\\t"),
                '\t' => out.push('\t'),
                _ => {
                    if let Some(code) = encode_simple(ch) {
                        out.push('\\');
                        out.push(code);
                    } else if is_latin1(ch) {
                        out.push(ch);
                    } else if self.settings.restrict_to_latin1 {
                        if !push_unicode_escape(&mut out, ch, self.settings.extended_unicode_escapes) {
                            return Err(Error::unrepresentable(self.position, ch));
                        }
                    } else if self.settings.encoding == Encoding::Latin1 {
                        return Err(Error::unrepresentable(self.position, ch));
                    } else {
                        out.push(ch);
                    }
                }
            }

            first = false;
            segment_start = false;
            line_start = false;
        }
        Ok(out)
    }

    /// Writes already-encoded text to the sink and advances the position.
    fn put(&mut self, text: &str) -> Result<()> {
        if text.is_empty() {
            return Ok(());
        }
        let sink = self
            .sink
            .as_mut()
            .ok_or_else(|| Error::io("sink already released"))?;

        match self.settings.encoding {
            Encoding::Utf8 => sink.write_all(text.as_bytes())?,
            Encoding::Latin1 => {
                // Every character was checked to be at most U+00FF.
                let bytes: Vec<u8> = text.chars().map(|c| c as u8).collect();
                sink.write_all(&bytes)?;
            }
        }

        let mut chars = text.chars().peekable();
        while let Some(ch) = chars.next() {
            match ch {
                '\r' if chars.peek() == Some(&'\n') => self.position.advance_offset(),
                '\r' => self.position.advance_line(),
                _ => self.position.advance_char(ch),
            }
        }
        Ok(())
    }

    fn release(&mut self) {
        debug!(position = %self.position, "document ended");
        if self.settings.close_sink_on_end && self.sink.take().is_some() {
            debug!("sink released");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn emitter() -> Emitter<Vec<u8>> {
        Emitter::new(Vec::new(), WriterSettings::new().with_close_sink_on_end(false)).unwrap()
    }

    fn output(emitter: Emitter<Vec<u8>>) -> String {
        String::from_utf8(emitter.into_inner().unwrap()).unwrap()
    }

    fn write_property(key: &str, assigner: char, value: &str) -> String {
        let mut e = emitter();
        e.document_start().unwrap();
        e.property(key, assigner, value).unwrap();
        e.document_end().unwrap();
        output(e)
    }

    #[test]
    fn test_transition_table_expected_calls() {
        assert_eq!(EmitterState::NotStarted.expected(), vec![EventKind::DocumentStart]);
        assert_eq!(
            EmitterState::Document.expected(),
            vec![EventKind::Comment, EventKind::PropertyStart, EventKind::DocumentEnd]
        );
        assert_eq!(EmitterState::Property.expected(), vec![EventKind::Text]);
        assert_eq!(
            EmitterState::Key.expected(),
            vec![EventKind::Text, EventKind::Assigner, EventKind::PropertyEnd]
        );
        assert_eq!(EmitterState::Value.expected(), vec![EventKind::PropertyEnd]);
        assert!(EmitterState::Ended.expected().is_empty());
    }

    #[test]
    fn test_document_start_must_come_first() {
        let mut e = emitter();
        let err = e.comment("too early").unwrap_err();
        assert_eq!(
            err,
            Error::structural(Position::new(), "DocumentStart", "Comment")
        );
    }

    #[test]
    fn test_nothing_after_document_end() {
        let mut e = emitter();
        e.document_start().unwrap();
        e.document_end().unwrap();
        assert!(e.property_start().unwrap_err().is_structural());
    }

    #[test]
    fn test_value_then_text_is_illegal() {
        let mut e = emitter();
        e.document_start().unwrap();
        e.property_start().unwrap();
        e.text("k").unwrap();
        e.assigner('=').unwrap();
        e.text("v").unwrap();
        let err = e.text("again").unwrap_err();
        match err {
            Error::Structural { expected, found, position } => {
                assert_eq!(expected, "PropertyEnd");
                assert_eq!(found, "Text");
                assert_eq!(position.column, 4);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_implicit_assigner_is_a_space() {
        let mut e = emitter();
        e.document_start().unwrap();
        e.property_start().unwrap();
        e.text("key").unwrap();
        e.text("value").unwrap();
        e.property_end().unwrap();
        e.document_end().unwrap();
        assert_eq!(output(e), "key value\n");
    }

    #[test]
    fn test_key_without_value() {
        let mut e = emitter();
        e.document_start().unwrap();
        e.property_start().unwrap();
        e.text("flag").unwrap();
        e.property_end().unwrap();
        e.document_end().unwrap();
        assert_eq!(output(e), "flag\n");
    }

    #[test]
    fn test_invalid_assigner_rejected() {
        let mut e = emitter();
        e.document_start().unwrap();
        e.property_start().unwrap();
        e.text("k").unwrap();
        assert!(e.assigner('-').unwrap_err().is_structural());
    }

    #[test]
    fn test_key_escaping() {
        assert_eq!(write_property("a=b:c d\te", '=', "v"), "a\\=b\\:c\\ d\\te=v\n");
        assert_eq!(write_property("#hash", '=', "v"), "\\#hash=v\n");
        assert_eq!(write_property("in#side", '=', "v"), "in#side=v\n");
    }

    #[test]
    fn test_value_escaping() {
        assert_eq!(write_property("k", '=', "  lead"), "k=\\  lead\n");
        assert_eq!(write_property("k", '=', "a=b: #c"), "k=a=b: #c\n");
        assert_eq!(write_property("k", '=', "back\\slash"), "k=back\\\\slash\n");
        assert_eq!(write_property("k", '=', "two\nlines\r"), "k=two\\nlines\\r\n");
        assert_eq!(write_property("k", '=', "\0\x07\x0B\x0C"), "k=\\0\\a\\v\\f\n");
    }

    #[test]
    fn test_value_after_whitespace_assigner_escapes_literal_assigner() {
        assert_eq!(write_property("k", ' ', "=v"), "k \\=v\n");
        assert_eq!(write_property("k", '\t', ":v"), "k\t\\:v\n");
    }

    #[test]
    fn test_non_latin1_escaped() {
        assert_eq!(write_property("k", '=', "€"), "k=\\u20AC\n");
    }

    #[test]
    fn test_astral_needs_extended_escapes() {
        let mut e = emitter();
        e.document_start().unwrap();
        e.property_start().unwrap();
        e.text("k").unwrap();
        e.assigner('=').unwrap();
        assert!(matches!(
            e.text("😀"),
            Err(Error::Unrepresentable { ch: '😀', .. })
        ));

        let settings = WriterSettings::new()
            .with_extended_unicode_escapes(true)
            .with_close_sink_on_end(false);
        let mut e = Emitter::new(Vec::new(), settings).unwrap();
        e.document_start().unwrap();
        e.property("k", '=', "😀").unwrap();
        e.document_end().unwrap();
        assert_eq!(output(e), "k=\\U0001F600\n");
    }

    #[test]
    fn test_unrepresentable_skipped_without_throw() {
        let settings = WriterSettings::new()
            .with_throw_on_error(false)
            .with_close_sink_on_end(false);
        let mut e = Emitter::new(Vec::new(), settings).unwrap();
        e.document_start().unwrap();
        e.property_start().unwrap();
        e.text("k").unwrap();
        e.assigner('=').unwrap();
        assert!(!e.text("😀").unwrap());
        assert_eq!(e.state(), EmitterState::Assigner);
        e.property_end().unwrap();
        e.document_end().unwrap();
        assert_eq!(output(e), "k=\n");
    }

    #[test]
    fn test_raw_unicode_when_unrestricted() {
        let settings = WriterSettings::new()
            .with_restrict_to_latin1(false)
            .with_close_sink_on_end(false);
        let mut e = Emitter::new(Vec::new(), settings).unwrap();
        e.document_start().unwrap();
        e.property("k", '=', "😀€").unwrap();
        e.document_end().unwrap();
        assert_eq!(output(e), "k=😀€\n");
    }

    #[test]
    fn test_latin1_sink_encoding() {
        let settings = WriterSettings::new()
            .with_encoding(Encoding::Latin1)
            .with_close_sink_on_end(false);
        let mut e = Emitter::new(Vec::new(), settings).unwrap();
        e.document_start().unwrap();
        e.property("k", '=', "é€").unwrap();
        e.document_end().unwrap();
        let bytes = e.into_inner().unwrap();
        assert_eq!(bytes, b"k=\xE9\\u20AC\n".to_vec());
    }

    #[test]
    fn test_logical_lines_realign_continuation() {
        let mut e = emitter();
        e.document_start().unwrap();
        e.property_start().unwrap();
        e.text("key").unwrap();
        e.assigner('=').unwrap();
        e.write(Event::Text {
            text: "one\ntwo\n three",
            logical_lines: true,
        })
        .unwrap();
        e.property_end().unwrap();
        e.document_end().unwrap();
        assert_eq!(output(e), "key=one\\\n    two\\\n    \\ three\n");
    }

    #[test]
    fn test_comments() {
        let mut e = emitter();
        e.document_start().unwrap();
        e.comment("hello").unwrap();
        e.write(Event::Comment { handle: '!', text: "" }).unwrap();
        assert!(e.comment("multi\nline").is_err());
        assert!(e.comment("snow ☃").is_err());
        e.document_end().unwrap();
        assert_eq!(output(e), "# hello\n!\n");
    }

    #[test]
    fn test_comment_leading_whitespace_is_unrepresentable() {
        let mut e = emitter();
        e.document_start().unwrap();
        assert!(matches!(
            e.comment("  indented"),
            Err(Error::Unrepresentable { ch: ' ', .. })
        ));
        assert!(matches!(
            e.comment("\tindented"),
            Err(Error::Unrepresentable { ch: '\t', .. })
        ));
        e.comment("inner  spacing ok").unwrap();
        e.document_end().unwrap();
        assert_eq!(output(e), "# inner  spacing ok\n");
    }

    #[test]
    fn test_empty_value_after_whitespace_assigner() {
        let mut e = emitter();
        e.document_start().unwrap();
        e.property_start().unwrap();
        e.text("k").unwrap();
        e.assigner(' ').unwrap();
        assert!(matches!(
            e.text(""),
            Err(Error::Unrepresentable { ch: ' ', .. })
        ));

        let mut e = emitter();
        e.document_start().unwrap();
        e.property_start().unwrap();
        e.text("k").unwrap();
        assert!(matches!(
            e.text(""),
            Err(Error::Unrepresentable { ch: ' ', .. })
        ));

        // Literal assigners carry an empty value fine.
        assert_eq!(write_property("k", ':', ""), "k:\n");
    }

    #[test]
    fn test_empty_value_after_whitespace_assigner_skipped() {
        let settings = WriterSettings::new()
            .with_throw_on_error(false)
            .with_close_sink_on_end(false);
        let mut e = Emitter::new(Vec::new(), settings).unwrap();
        e.document_start().unwrap();
        e.property_start().unwrap();
        e.text("k").unwrap();
        assert!(!e.text("").unwrap());
        assert_eq!(e.state(), EmitterState::Key);
        e.property_end().unwrap();
        e.document_end().unwrap();
        assert_eq!(output(e), "k\n");
    }

    #[test]
    fn test_ignored_comments_still_validated() {
        let settings = WriterSettings::new()
            .with_ignore_comments(true)
            .with_close_sink_on_end(false);
        let mut e = Emitter::new(Vec::new(), settings).unwrap();
        assert!(e.comment("early").is_err());
        e.document_start().unwrap();
        assert!(e.comment("dropped").unwrap());
        e.document_end().unwrap();
        assert_eq!(output(e), "");
    }

    #[test]
    fn test_crlf_line_endings() {
        let settings = WriterSettings::new()
            .with_line_ending(crate::LineEnding::CrLf)
            .with_close_sink_on_end(false);
        let mut e = Emitter::new(Vec::new(), settings).unwrap();
        e.document_start().unwrap();
        e.comment("c").unwrap();
        e.property("a", '=', "b").unwrap();
        e.document_end().unwrap();
        assert_eq!(e.position(), Position { line: 3, column: 1, offset: 10 });
        assert_eq!(output(e), "# c\r\na=b\r\n");
    }

    #[test]
    fn test_zero_flush_interval_rejected() {
        let settings = WriterSettings {
            flush_interval: 0,
            ..WriterSettings::default()
        };
        assert!(matches!(
            Emitter::new(Vec::new(), settings),
            Err(Error::Configuration(_))
        ));
    }

    #[test]
    fn test_sink_released_at_document_end() {
        let mut e = Emitter::new(Vec::new(), WriterSettings::new()).unwrap();
        e.document_start().unwrap();
        e.document_end().unwrap();
        assert!(e.into_inner().is_none());
    }

    #[test]
    fn test_write_token_opens_and_closes_implicitly() {
        let mut e = emitter();
        e.write_token(&Token::comment("top")).unwrap();
        e.write_token(&Token::key("a")).unwrap();
        e.write_token(&Token::assigner(':')).unwrap();
        e.write_token(&Token::value(Some("1".to_string()))).unwrap();
        e.write_token(&Token::key("b")).unwrap();
        e.write_token(&Token::value(None)).unwrap();
        e.write_token(&Token::key("c")).unwrap();
        e.finish().unwrap();
        assert_eq!(e.state(), EmitterState::Ended);
        assert_eq!(output(e), "# top\na:1\nb\nc\n");
    }

    #[test]
    fn test_error_token_is_not_writable() {
        let mut e = emitter();
        assert!(e.write_token(&Token::error("boom")).unwrap_err().is_structural());
    }
}
