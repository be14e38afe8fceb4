//! # propstream
//!
//! A streaming reader and writer for Java-style `.properties` documents.
//!
//! ## What's in the box?
//!
//! - **Tokenizer**: a pull-based state machine turning characters into
//!   `Comment`, `Key`, `Assigner` and `Value` tokens, decoding escapes,
//!   logical-line continuations and Unicode escapes as it goes
//! - **Emitter**: a protocol-checked writer that escapes text so the
//!   tokenizer reads it back unchanged
//! - **Sources**: borrowed `&str` / `&[char]` input, or any byte reader
//!   behind a bounded lookahead ring buffer
//! - **Properties**: an insertion-ordered document built on both, with
//!   serde support
//!
//! ## Quick Start
//!
//! ```toml
//! [dependencies]
//! propstream = "0.1"
//! ```
//!
//! ### Loading and storing
//!
//! ```rust
//! use propstream::{from_str, to_string, Properties};
//!
//! let props: Properties = from_str("# database\nhost = localhost\nport: 5432").unwrap();
//! assert_eq!(props.get("host"), Some("localhost"));
//!
//! let text = to_string(&props).unwrap();
//! assert_eq!(text, "host=localhost\nport=5432\n");
//! ```
//!
//! ### Into your own types
//!
//! Every value is a string, so any type whose fields deserialize from
//! strings can be read directly:
//!
//! ```rust
//! use serde::Deserialize;
//!
//! #[derive(Deserialize, Debug, PartialEq)]
//! struct Database {
//!     host: String,
//!     user: String,
//! }
//!
//! let db: Database = propstream::from_str("host=db.local\nuser=admin").unwrap();
//! assert_eq!(db.host, "db.local");
//! ```
//!
//! ### Token streams
//!
//! ```rust
//! use propstream::{tokenize, Token};
//!
//! let tokens = tokenize("key\\ with\\ spaces value").unwrap();
//! assert_eq!(tokens[0], Token::key("key with spaces"));
//! assert_eq!(tokens[1], Token::assigner(' '));
//! ```
//!
//! ## Logging
//!
//! The crate logs through [`tracing`](https://docs.rs/tracing) and never
//! installs a subscriber itself.
//!
//! ## Examples
//!
//! See the `demos/` directory:
//!
//! - **`simple.rs`** - loading, editing and storing a document
//! - **`token_stream.rs`** - driving the tokenizer and emitter by hand
//! - **`custom_settings.rs`** - dialect settings on both sides
//! - **`macro.rs`** - building documents with `properties!`
//!
//! Run any example with: `cargo run --example <name>`

pub mod emitter;
pub mod error;
mod escape;
pub mod grammar;
pub mod macros;
pub mod options;
pub mod position;
pub mod properties;
pub mod source;
pub mod token;
pub mod tokenizer;

pub use emitter::{Emitter, EmitterState, Event, EventKind};
pub use error::{Error, Result};
pub use options::{Encoding, LineEnding, ReaderSettings, WriterSettings};
pub use position::Position;
pub use properties::Properties;
pub use source::{
    CharSliceSource, CharSource, Decoder, LookaheadBuffer, StrSource, DEFAULT_LOOKAHEAD,
};
pub use token::{Token, TokenKind};
pub use tokenizer::{TokenObserver, Tokenizer};

use serde::de::{value::MapDeserializer, DeserializeOwned};
use std::io;

/// Tokenizes a whole document with the default reader settings.
///
/// # Examples
///
/// ```rust
/// use propstream::{tokenize, Token};
///
/// let tokens = tokenize("a=1").unwrap();
/// assert_eq!(
///     tokens,
///     vec![Token::key("a"), Token::assigner('='), Token::value(Some("1".to_string()))]
/// );
/// ```
///
/// # Errors
///
/// Returns the first lexical error in the input.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn tokenize(input: &str) -> Result<Vec<Token>> {
    tokenize_with_settings(input, ReaderSettings::default())
}

/// Tokenizes a whole document with custom reader settings.
///
/// With `throw_on_error` disabled a lexical error ends the list as an
/// `Error` token instead of failing.
///
/// # Errors
///
/// Returns a lexical error when `throw_on_error` is set.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn tokenize_with_settings(input: &str, settings: ReaderSettings) -> Result<Vec<Token>> {
    Tokenizer::from_str(input, settings).collect()
}

/// Deserializes a `T` from properties text.
///
/// `T` can be [`Properties`], a string map, or a struct whose fields
/// deserialize from strings.
///
/// # Examples
///
/// ```rust
/// use std::collections::HashMap;
///
/// let map: HashMap<String, String> = propstream::from_str("a=1\nb=2").unwrap();
/// assert_eq!(map["b"], "2");
/// ```
///
/// # Errors
///
/// Returns an error if the text is malformed or does not match `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_str<T>(s: &str) -> Result<T>
where
    T: DeserializeOwned,
{
    from_properties(Properties::load_str(s)?)
}

/// Deserializes a `T` from UTF-8 encoded properties bytes.
///
/// # Errors
///
/// Returns an error if the bytes are not valid UTF-8, the text is
/// malformed, or it does not match `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_slice<T>(v: &[u8]) -> Result<T>
where
    T: DeserializeOwned,
{
    from_reader(v)
}

/// Deserializes a `T` from a UTF-8 byte stream.
///
/// # Examples
///
/// ```rust
/// use propstream::Properties;
/// use std::io::Cursor;
///
/// let props: Properties = propstream::from_reader(Cursor::new(b"name=caf\xC3\xA9")).unwrap();
/// assert_eq!(props.get("name"), Some("café"));
/// ```
///
/// # Errors
///
/// Returns an error if reading fails, the text is malformed, or it does not
/// match `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_reader<R, T>(reader: R) -> Result<T>
where
    R: io::Read,
    T: DeserializeOwned,
{
    from_properties(Properties::load_reader(reader, ReaderSettings::default())?)
}

fn from_properties<T>(props: Properties) -> Result<T>
where
    T: DeserializeOwned,
{
    let deserializer: MapDeserializer<'_, _, Error> = MapDeserializer::new(props.into_iter());
    T::deserialize(deserializer)
}

/// Renders a document with the default writer settings.
///
/// # Errors
///
/// Returns an error if a character cannot be encoded.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string(props: &Properties) -> Result<String> {
    to_string_with_settings(props, WriterSettings::default())
}

/// Renders a document with custom writer settings.
///
/// # Examples
///
/// ```rust
/// use propstream::{properties, to_string_with_settings, LineEnding, WriterSettings};
///
/// let props = properties! { "a" => "1", "b" => "2" };
/// let settings = WriterSettings::new().with_line_ending(LineEnding::CrLf);
/// assert_eq!(to_string_with_settings(&props, settings).unwrap(), "a=1\r\nb=2\r\n");
/// ```
///
/// # Errors
///
/// Returns an error if a character cannot be encoded.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string_with_settings(props: &Properties, settings: WriterSettings) -> Result<String> {
    props.to_string_with_settings(settings)
}

/// Writes a document to a byte sink with the default writer settings.
///
/// # Errors
///
/// Returns an error if a character cannot be encoded or writing fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer<W>(writer: W, props: &Properties) -> Result<()>
where
    W: io::Write,
{
    props.store(writer, WriterSettings::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::collections::BTreeMap;

    #[derive(Deserialize, Debug, PartialEq)]
    struct Server {
        host: String,
        port: String,
        #[serde(default)]
        banner: Option<String>,
    }

    #[test]
    fn test_from_str_into_struct() {
        let server: Server = from_str("host = example.org\nport : 443\n").unwrap();
        assert_eq!(
            server,
            Server {
                host: "example.org".to_string(),
                port: "443".to_string(),
                banner: None,
            }
        );
    }

    #[test]
    fn test_from_str_missing_field() {
        let err = from_str::<Server>("host=example.org").unwrap_err();
        assert!(matches!(err, Error::Custom(_)));
    }

    #[test]
    fn test_from_str_into_map() {
        let map: BTreeMap<String, String> = from_str("b=2\na=1").unwrap();
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn test_from_slice_rejects_invalid_utf8() {
        let err = from_slice::<Properties>(b"a=\xFF").unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_round_trip_through_text() {
        let props = properties! {
            "key with spaces" => "  leading",
            "unicode" => "€ and ü",
            "empty" => "",
        };
        let text = to_string(&props).unwrap();
        let back: Properties = from_str(&text).unwrap();
        assert_eq!(props, back);
    }

    #[test]
    fn test_to_writer() {
        let mut out = Vec::new();
        to_writer(&mut out, &properties! { "k" => "v" }).unwrap();
        assert_eq!(out, b"k=v\n".to_vec());
    }

    #[test]
    fn test_tokenize_records_error_token() {
        let settings = ReaderSettings::new()
            .with_throw_on_error(false)
            .with_invalid_escapes_are_literal(false);
        let tokens = tokenize_with_settings("a=\\q", settings).unwrap();
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[2].kind, TokenKind::Error);
    }
}
