//! Lexical units exchanged between the tokenizer, the emitter and callers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The closed set of token kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenKind {
    /// No token: before the first advance or after the end of input.
    None,
    Error,
    Comment,
    Key,
    Assigner,
    Value,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::None => "None",
            TokenKind::Error => "Error",
            TokenKind::Comment => "Comment",
            TokenKind::Key => "Key",
            TokenKind::Assigner => "Assigner",
            TokenKind::Value => "Value",
        };
        f.write_str(name)
    }
}

/// A single token.
///
/// `text` is `None` for the `None` sentinel and for the value of a key that
/// was written without an assigner. An `Assigner` token's text is exactly
/// one character: `=`, `:` or the whitespace character that separated the
/// key from its value.
///
/// # Examples
///
/// ```rust
/// use propstream::{Token, TokenKind};
///
/// let token = Token::assigner(':');
/// assert_eq!(token.kind, TokenKind::Assigner);
/// assert_eq!(token.assigner_char(), Some(':'));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Token {
    pub kind: TokenKind,
    pub text: Option<String>,
}

impl Token {
    pub const NONE: Token = Token {
        kind: TokenKind::None,
        text: None,
    };

    #[must_use]
    pub fn new(kind: TokenKind, text: Option<String>) -> Self {
        Token { kind, text }
    }

    pub fn comment(text: impl Into<String>) -> Self {
        Token::new(TokenKind::Comment, Some(text.into()))
    }

    pub fn key(text: impl Into<String>) -> Self {
        Token::new(TokenKind::Key, Some(text.into()))
    }

    #[must_use]
    pub fn assigner(ch: char) -> Self {
        Token::new(TokenKind::Assigner, Some(ch.to_string()))
    }

    #[must_use]
    pub fn value(text: Option<String>) -> Self {
        Token::new(TokenKind::Value, text)
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Token::new(TokenKind::Error, Some(msg.into()))
    }

    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Returns the assigner character of an `Assigner` token.
    #[must_use]
    pub fn assigner_char(&self) -> Option<char> {
        match self.kind {
            TokenKind::Assigner => self.text.as_deref().and_then(|t| t.chars().next()),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_none(&self) -> bool {
        matches!(self.kind, TokenKind::None)
    }
}

impl Default for Token {
    fn default() -> Self {
        Token::NONE
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.text {
            Some(text) => write!(f, "{}({:?})", self.kind, text),
            None => write!(f, "{}", self.kind),
        }
    }
}
