//! Insertion-ordered properties document.
//!
//! [`Properties`] wraps an [`IndexMap`] so that a document stored after
//! loading keeps its keys in their original order.
//!
//! ## Examples
//!
//! ```rust
//! use propstream::Properties;
//!
//! let props = Properties::load_str("# settings\nname = demo\nport: 8080\nverbose").unwrap();
//!
//! assert_eq!(props.get("name"), Some("demo"));
//! assert_eq!(props.get("port"), Some("8080"));
//! assert_eq!(props.get("verbose"), Some(""));
//!
//! let keys: Vec<_> = props.keys().map(String::as_str).collect();
//! assert_eq!(keys, vec!["name", "port", "verbose"]);
//! ```

use crate::source::CharSource;
use crate::{Emitter, ReaderSettings, Result, TokenKind, Tokenizer, WriterSettings};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::{Read, Write};
use tracing::{debug, warn};

/// An ordered map of property keys to values.
///
/// Serializes transparently as a map through serde.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Properties(IndexMap<String, String>);

impl Properties {
    #[must_use]
    pub fn new() -> Self {
        Properties(IndexMap::new())
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Properties(IndexMap::with_capacity(capacity))
    }

    /// Parses a document with the default reader settings.
    ///
    /// A key without a value maps to the empty string and later duplicates
    /// replace earlier values in place.
    pub fn load_str(input: &str) -> Result<Self> {
        Self::load_str_with_settings(input, ReaderSettings::default())
    }

    pub fn load_str_with_settings(input: &str, settings: ReaderSettings) -> Result<Self> {
        Self::load(Tokenizer::from_str(input, settings))
    }

    /// Parses a document from a byte reader, decoding it with
    /// `settings.encoding`.
    pub fn load_reader<R: Read>(reader: R, settings: ReaderSettings) -> Result<Self> {
        Self::load(Tokenizer::from_reader(reader, settings)?)
    }

    /// Collects key/value pairs from a tokenizer.
    ///
    /// When the tokenizer records errors as tokens instead of raising them,
    /// the pairs read before the error are kept.
    pub fn load<S: CharSource>(mut tokenizer: Tokenizer<S>) -> Result<Self> {
        let mut props = Properties::new();
        let mut key: Option<String> = None;

        while tokenizer.advance()? {
            let token = tokenizer.current_token();
            match token.kind {
                TokenKind::Key => {
                    if let Some(previous) = key.take() {
                        props.insert(previous, String::new());
                    }
                    key = token.text.clone();
                }
                TokenKind::Value => {
                    if let Some(key) = key.take() {
                        props.insert(key, token.text.clone().unwrap_or_default());
                    }
                }
                TokenKind::Error => {
                    key = None;
                    warn!(
                        error = token.text().unwrap_or_default(),
                        "stopped loading at lexical error"
                    );
                }
                TokenKind::Comment | TokenKind::Assigner | TokenKind::None => {}
            }
        }
        if let Some(key) = key {
            props.insert(key, String::new());
        }

        debug!(len = props.len(), "properties loaded");
        Ok(props)
    }

    /// Writes every pair as `key=value`, in order.
    pub fn store<W: Write>(&self, writer: W, settings: WriterSettings) -> Result<()> {
        self.store_with_header(writer, None, settings)
    }

    /// Like [`store`](Self::store), with a leading `#` comment line.
    pub fn store_with_header<W: Write>(
        &self,
        writer: W,
        header: Option<&str>,
        settings: WriterSettings,
    ) -> Result<()> {
        let mut emitter = Emitter::new(writer, settings)?;
        emitter.document_start()?;
        if let Some(header) = header {
            emitter.comment(header)?;
        }
        for (key, value) in &self.0 {
            emitter.property(key, '=', value)?;
        }
        emitter.document_end()?;
        Ok(())
    }

    /// Renders the document with the given writer settings.
    pub fn to_string_with_settings(&self, settings: WriterSettings) -> Result<String> {
        let encoding = settings.encoding;
        let mut bytes = Vec::new();
        self.store_with_header(&mut bytes, None, settings)?;

        Ok(match encoding {
            crate::Encoding::Utf8 => String::from_utf8_lossy(&bytes).into_owned(),
            crate::Encoding::Latin1 => bytes.iter().map(|&b| char::from(b)).collect(),
        })
    }

    /// Inserts a pair, returning the previous value for `key`.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(key.into(), value.into())
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Removes `key`, keeping the order of the remaining pairs.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.0.shift_remove(key)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> indexmap::map::Keys<'_, String, String> {
        self.0.keys()
    }

    pub fn values(&self) -> indexmap::map::Values<'_, String, String> {
        self.0.values()
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, String> {
        self.0.iter()
    }
}

impl<'a> IntoIterator for &'a Properties {
    type Item = (&'a String, &'a String);
    type IntoIter = indexmap::map::Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl IntoIterator for Properties {
    type Item = (String, String);
    type IntoIter = indexmap::map::IntoIter<String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Properties {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Properties(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl<K: Into<String>, V: Into<String>> Extend<(K, V)> for Properties {
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        self.0.extend(iter.into_iter().map(|(k, v)| (k.into(), v.into())));
    }
}

impl From<HashMap<String, String>> for Properties {
    fn from(map: HashMap<String, String>) -> Self {
        Properties(map.into_iter().collect())
    }
}

impl From<Properties> for IndexMap<String, String> {
    fn from(props: Properties) -> Self {
        props.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicates_overwrite_in_place() {
        let props = Properties::load_str("a=1\nb=2\na=3").unwrap();
        assert_eq!(props.len(), 2);
        assert_eq!(props.get("a"), Some("3"));
        assert_eq!(props.keys().next().map(String::as_str), Some("a"));
    }

    #[test]
    fn test_keys_without_values() {
        let props = Properties::load_str("first\nsecond=\nthird   \n").unwrap();
        assert_eq!(props.get("first"), Some(""));
        assert_eq!(props.get("second"), Some(""));
        assert_eq!(props.get("third"), Some(""));
    }

    #[test]
    fn test_lexical_error_propagates() {
        let err = Properties::load_str("a=\\u12").unwrap_err();
        assert!(err.is_lexical());
    }

    #[test]
    fn test_lexical_error_keeps_earlier_pairs_when_recorded() {
        let settings = ReaderSettings::new().with_throw_on_error(false);
        let props = Properties::load_str_with_settings("a=1\nb=\\u12", settings).unwrap();
        assert_eq!(props.get("a"), Some("1"));
        assert!(!props.contains_key("b"));
    }

    #[test]
    fn test_store_preserves_order() {
        let mut props = Properties::new();
        props.insert("zeta", "last");
        props.insert("alpha", "first");
        let text = props.to_string_with_settings(WriterSettings::default()).unwrap();
        assert_eq!(text, "zeta=last\nalpha=first\n");
    }

    #[test]
    fn test_to_string_matches_stored_bytes() {
        let props: Properties = [("city", "Köln"), ("sym", "€")].into_iter().collect();
        let settings = WriterSettings::new()
            .with_encoding(crate::Encoding::Latin1)
            .with_line_ending(crate::LineEnding::CrLf);
        let mut bytes = Vec::new();
        props.store(&mut bytes, settings.clone()).unwrap();
        let text = props.to_string_with_settings(settings).unwrap();
        assert_eq!(bytes, b"city=K\xF6ln\r\nsym=\\u20AC\r\n".to_vec());
        assert_eq!(text, "city=Köln\r\nsym=\\u20AC\r\n");
    }

    #[test]
    fn test_store_with_header() {
        let props: Properties = [("k", "v")].into_iter().collect();
        let mut out = Vec::new();
        props
            .store_with_header(&mut out, Some("header"), WriterSettings::default())
            .unwrap();
        assert_eq!(out, b"# header\nk=v\n".to_vec());
    }

    #[test]
    fn test_remove_keeps_order() {
        let mut props: Properties = [("a", "1"), ("b", "2"), ("c", "3")].into_iter().collect();
        assert_eq!(props.remove("b"), Some("2".to_string()));
        let keys: Vec<_> = props.keys().cloned().collect();
        assert_eq!(keys, vec!["a", "c"]);
    }
}
