//! Pull-based tokenizer for properties documents.
//!
//! The [`Tokenizer`] is a state machine over any [`CharSource`]:
//!
//! ```text
//! Start -> {Comment | Key} -> Assigner -> Value -> {Start | End}
//! ```
//!
//! with `Error` reachable from every text-reading state and always leading
//! to `End`. Callers drive it one token at a time with
//! [`Tokenizer::advance`], or through its `Iterator` implementation.
//!
//! ## Usage
//!
//! ```rust
//! use propstream::{ReaderSettings, Token, Tokenizer};
//!
//! let mut tokenizer = Tokenizer::from_str("# greeting\nhello = world", ReaderSettings::new());
//!
//! let tokens: Vec<Token> = tokenizer.by_ref().collect::<Result<_, _>>().unwrap();
//! assert_eq!(
//!     tokens,
//!     vec![
//!         Token::comment("greeting"),
//!         Token::key("hello"),
//!         Token::assigner('='),
//!         Token::value(Some("world".to_string())),
//!     ]
//! );
//! ```
//!
//! ## Whitespace assigners
//!
//! A run of whitespace after a key is the assigner unless a literal `=` or
//! `:` follows it, in which case that character is the assigner. Whitespace
//! that runs into the end of the line yields a key with no value at all.

use crate::escape::{
    decode_simple, is_assigner, is_blank, is_comment_handle, is_latin1, is_line_end,
    is_literal_assigner, is_whitespace, scalar,
};
use crate::source::{
    CharSliceSource, CharSource, Decoder, LookaheadBuffer, StrSource, DEFAULT_LOOKAHEAD,
};
use crate::{Error, Position, ReaderSettings, Result, Token, TokenKind};
use std::io::Read;
use tracing::{debug, trace};

/// Receives every token the tokenizer produces, with its start and end
/// positions.
///
/// Implemented for any `FnMut(&Token, Position, Position)`.
pub trait TokenObserver {
    fn observe(&mut self, token: &Token, start: Position, end: Position);
}

impl<F> TokenObserver for F
where
    F: FnMut(&Token, Position, Position),
{
    fn observe(&mut self, token: &Token, start: Position, end: Position) {
        self(token, start, end);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Start,
    Comment,
    Key,
    Assigner,
    Value,
    Error,
    End,
}

/// The properties tokenizer.
///
/// Bound to one character source and one settings value for its whole
/// life. Created via [`Tokenizer::new`], [`Tokenizer::from_str`],
/// [`Tokenizer::from_chars`] or [`Tokenizer::from_reader`].
pub struct Tokenizer<S> {
    source: Option<S>,
    settings: ReaderSettings,
    state: State,
    token: Token,
    text: String,
    position: Position,
    token_start: Position,
    token_end: Position,
    comment_handle: Option<char>,
    assigner_written: bool,
    logical_lines: bool,
    error: Option<Error>,
    observer: Option<Box<dyn TokenObserver>>,
}

impl<'a> Tokenizer<StrSource<'a>> {
    /// Tokenizes a borrowed string without copying it.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(input: &'a str, settings: ReaderSettings) -> Self {
        Tokenizer::new(StrSource::new(input), settings)
    }
}

impl<'a> Tokenizer<CharSliceSource<'a>> {
    /// Tokenizes a borrowed character buffer without copying it.
    pub fn from_chars(input: &'a [char], settings: ReaderSettings) -> Self {
        Tokenizer::new(CharSliceSource::new(input), settings)
    }
}

impl<R: Read> Tokenizer<LookaheadBuffer<Decoder<R>>> {
    /// Tokenizes a byte stream, decoded with `settings.encoding` through a
    /// lookahead buffer.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the initial buffer fill fails.
    pub fn from_reader(reader: R, settings: ReaderSettings) -> Result<Self> {
        let buffer = LookaheadBuffer::from_reader(reader, settings.encoding, DEFAULT_LOOKAHEAD)?;
        Ok(Tokenizer::new(buffer, settings))
    }
}

impl<S: CharSource> Tokenizer<S> {
    pub fn new(source: S, settings: ReaderSettings) -> Self {
        debug!(?settings, "tokenizer created");
        Tokenizer {
            source: Some(source),
            settings,
            state: State::Start,
            token: Token::NONE,
            text: String::new(),
            position: Position::new(),
            token_start: Position::new(),
            token_end: Position::new(),
            comment_handle: None,
            assigner_written: false,
            logical_lines: false,
            error: None,
            observer: None,
        }
    }

    /// Advances to the next token.
    ///
    /// Returns `Ok(true)` when [`current_token`](Self::current_token) holds
    /// a new token and `Ok(false)` once the input is exhausted. After an
    /// `Error` token the next call always returns `Ok(false)`.
    ///
    /// # Errors
    ///
    /// Lexical errors when `throw_on_error` is set, and I/O errors from the
    /// source. Either way the tokenizer is in its end state afterwards.
    pub fn advance(&mut self) -> Result<bool> {
        match self.step() {
            Ok(available) => Ok(available),
            Err(err) if err.is_lexical() && !self.settings.throw_on_error => {
                debug!(%err, "lexical error reported as token");
                self.state = State::Error;
                let token = Token::error(err.to_string());
                self.error = Some(err);
                Ok(self.emit(token))
            }
            Err(err) => {
                self.error = Some(err.clone());
                self.state = State::End;
                self.token = Token::NONE;
                self.release();
                Err(err)
            }
        }
    }

    /// The token produced by the last successful [`advance`](Self::advance),
    /// or the `None` sentinel.
    #[must_use]
    pub fn current_token(&self) -> &Token {
        &self.token
    }

    /// Where the current token starts.
    #[must_use]
    pub fn token_start(&self) -> Position {
        self.token_start
    }

    /// Where the current token ends (exclusive).
    #[must_use]
    pub fn token_end(&self) -> Position {
        self.token_end
    }

    /// The current read position.
    #[must_use]
    pub fn position(&self) -> Position {
        self.position
    }

    /// The `#` or `!` that introduced the current comment.
    #[must_use]
    pub fn comment_handle(&self) -> Option<char> {
        self.comment_handle
    }

    /// Whether the current property's text was folded from several physical
    /// lines with a trailing backslash.
    #[must_use]
    pub fn used_logical_lines(&self) -> bool {
        self.logical_lines
    }

    /// The last lexical or I/O error, if any.
    #[must_use]
    pub fn error(&self) -> Option<&Error> {
        self.error.as_ref()
    }

    #[must_use]
    pub fn settings(&self) -> &ReaderSettings {
        &self.settings
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.state == State::End
    }

    /// Installs a callback invoked for every token, replacing any previous
    /// one.
    pub fn set_observer(&mut self, observer: impl TokenObserver + 'static) {
        self.observer = Some(Box::new(observer));
    }

    /// Hands back the source, unless it was released at end of input.
    pub fn into_source(self) -> Option<S> {
        self.source
    }

    fn step(&mut self) -> Result<bool> {
        loop {
            match self.state {
                State::Start => self.read_start()?,
                State::Comment => return self.read_comment(),
                State::Key => return self.read_key(),
                State::Assigner => {
                    if self.read_assigner()? {
                        return Ok(true);
                    }
                }
                State::Value => return self.read_value(),
                State::Error => self.state = State::End,
                State::End => {
                    self.token = Token::NONE;
                    self.release();
                    return Ok(false);
                }
            }
        }
    }

    fn read_start(&mut self) -> Result<()> {
        loop {
            match self.peek() {
                Some(ch) if is_blank(ch) => {
                    self.bump()?;
                }
                Some(ch) if is_comment_handle(ch) => {
                    if !self.settings.ignore_comments {
                        self.state = State::Comment;
                        return Ok(());
                    }
                    self.skip_line()?;
                }
                Some(_) => {
                    self.assigner_written = false;
                    self.logical_lines = false;
                    self.comment_handle = None;
                    self.state = State::Key;
                    return Ok(());
                }
                None => {
                    self.state = State::End;
                    return Ok(());
                }
            }
        }
    }

    fn read_comment(&mut self) -> Result<bool> {
        self.token_start = self.position;
        self.text.clear();
        self.comment_handle = self.bump()?;
        self.skip_whitespace()?;

        while let Some(ch) = self.peek() {
            if is_line_end(ch) {
                break;
            }
            self.check_latin1(ch)?;
            self.bump()?;
            self.text.push(ch);
        }

        self.state = State::Start;
        Ok(self.emit_text(TokenKind::Comment))
    }

    fn read_key(&mut self) -> Result<bool> {
        self.token_start = self.position;
        self.text.clear();

        loop {
            match self.peek() {
                None => break,
                Some(ch) if is_line_end(ch) => break,
                Some('\\') => self.read_escape()?,
                Some(ch) if is_assigner(ch) => {
                    self.state = State::Assigner;
                    return Ok(self.emit_text(TokenKind::Key));
                }
                Some(ch) => self.push_raw(ch)?,
            }
        }

        // No assigner on this line: the value handler reports it as absent.
        self.state = State::Value;
        Ok(self.emit_text(TokenKind::Key))
    }

    /// Returns `false` when the whitespace after the key ran into the end of
    /// the line, in which case no assigner token is produced.
    fn read_assigner(&mut self) -> Result<bool> {
        self.token_start = self.position;
        self.state = State::Value;
        let Some(first) = self.bump()? else {
            return Ok(false);
        };

        let mut assigner = first;
        if is_whitespace(first) {
            self.skip_whitespace()?;
            match self.peek() {
                Some(next) if is_literal_assigner(next) => {
                    self.token_start = self.position;
                    self.bump()?;
                    assigner = next;
                }
                Some(next) if is_line_end(next) => return Ok(false),
                None => return Ok(false),
                Some(_) => {}
            }
        }

        self.assigner_written = true;
        Ok(self.emit(Token::assigner(assigner)))
    }

    fn read_value(&mut self) -> Result<bool> {
        self.skip_whitespace()?;
        self.token_start = self.position;
        self.text.clear();

        loop {
            match self.peek() {
                None => break,
                Some(ch) if is_line_end(ch) => break,
                Some('\\') => self.read_escape()?,
                Some(ch) => self.push_raw(ch)?,
            }
        }

        let text = if self.text.is_empty() && !self.assigner_written {
            None
        } else {
            Some(std::mem::take(&mut self.text))
        };
        self.state = if self.at_end() { State::End } else { State::Start };
        Ok(self.emit(Token::value(text)))
    }

    /// Decodes the escape sequence starting at the backslash under the
    /// cursor into `self.text`.
    fn read_escape(&mut self) -> Result<()> {
        let start = self.position;
        self.bump()?;

        let Some(ch) = self.peek() else {
            self.text.push('\\');
            return Ok(());
        };

        if is_line_end(ch) {
            self.bump()?;
            if ch == '\r' && self.peek() == Some('\n') {
                self.bump()?;
            }
            self.skip_whitespace()?;
            self.logical_lines = true;
            return Ok(());
        }

        self.bump()?;
        let extended = self.settings.extended_unicode_escapes;
        let decoded = match ch {
            'u' => self.read_unicode(start, 'u', 4, 4)?,
            'x' if extended => self.read_unicode(start, 'x', 1, 4)?,
            'U' if extended => self.read_unicode(start, 'U', 8, 8)?,
            _ => match decode_simple(ch) {
                Some(decoded) => decoded,
                None if self.settings.invalid_escapes_are_literal => ch,
                None => {
                    return Err(Error::lexical(
                        start,
                        format!("invalid escape sequence '\\{ch}'"),
                    ))
                }
            },
        };
        self.text.push(decoded);
        Ok(())
    }

    fn read_unicode(&mut self, start: Position, kind: char, min: usize, max: usize) -> Result<char> {
        let mut code: u32 = 0;
        let mut digits = 0;
        while digits < max {
            let Some(digit) = self.peek().and_then(|c| c.to_digit(16)) else {
                break;
            };
            self.bump()?;
            code = code * 16 + digit;
            digits += 1;
        }

        if digits < min {
            let found = self
                .peek()
                .map_or_else(|| "end of input".to_string(), |c| format!("{c:?}"));
            return Err(Error::lexical(
                self.position,
                format!("invalid \\{kind} escape: expected {min} hex digits, found {found}"),
            ));
        }
        if kind == 'U' && code > 0x00FF_FFFF {
            return Err(Error::lexical(
                start,
                format!("invalid \\U escape {code:08X}: the two leading digits must be zero"),
            ));
        }

        scalar(code).ok_or_else(|| {
            Error::lexical(
                start,
                format!("escape \\{kind}{code:04X} is not a Unicode scalar value"),
            )
        })
    }

    fn push_raw(&mut self, ch: char) -> Result<()> {
        self.check_latin1(ch)?;
        self.bump()?;
        self.text.push(ch);
        Ok(())
    }

    fn check_latin1(&self, ch: char) -> Result<()> {
        if self.settings.restrict_to_latin1 && !is_latin1(ch) {
            return Err(Error::lexical(
                self.position,
                format!(
                    "character {ch:?} (U+{:04X}) is outside ISO-8859-1",
                    u32::from(ch)
                ),
            ));
        }
        Ok(())
    }

    fn skip_whitespace(&mut self) -> Result<()> {
        while self.peek().is_some_and(is_whitespace) {
            self.bump()?;
        }
        Ok(())
    }

    fn skip_line(&mut self) -> Result<()> {
        while self.peek().is_some_and(|c| !is_line_end(c)) {
            self.bump()?;
        }
        Ok(())
    }

    #[inline]
    fn peek(&self) -> Option<char> {
        self.source.as_ref().and_then(|s| s.peek(0))
    }

    fn at_end(&self) -> bool {
        self.source.as_ref().map_or(true, CharSource::end_of_stream)
    }

    /// Consumes one character and moves the position past it.
    fn bump(&mut self) -> Result<Option<char>> {
        let Some(source) = self.source.as_mut() else {
            return Ok(None);
        };
        let ch = source.read()?;
        match ch {
            // The `\n` of a `\r\n` pair ends the line.
            Some('\r') if source.peek(0) == Some('\n') => self.position.advance_offset(),
            Some('\r') => self.position.advance_line(),
            Some(c) => self.position.advance_char(c),
            None => {}
        }
        Ok(ch)
    }

    fn emit_text(&mut self, kind: TokenKind) -> bool {
        let text = std::mem::take(&mut self.text);
        self.emit(Token::new(kind, Some(text)))
    }

    fn emit(&mut self, token: Token) -> bool {
        self.token_end = self.position;
        trace!(%token, start = %self.token_start, end = %self.token_end, "token");
        if let Some(observer) = self.observer.as_mut() {
            observer.observe(&token, self.token_start, self.token_end);
        }
        self.token = token;
        true
    }

    fn release(&mut self) {
        if self.settings.close_source_on_end && self.source.take().is_some() {
            debug!("character source released");
        }
    }
}

impl<S: CharSource> Iterator for Tokenizer<S> {
    type Item = Result<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.advance() {
            Ok(true) => Some(Ok(self.token.clone())),
            Ok(false) => None,
            Err(err) => Some(Err(err)),
        }
    }
}
