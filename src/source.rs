//! Character sources the tokenizer reads from.
//!
//! Two strategies share the [`CharSource`] contract:
//!
//! - **Buffered**: [`LookaheadBuffer`] keeps a fixed-capacity circular window
//!   over a pull-based character stream, typically a [`Decoder`] over an
//!   [`io::Read`].
//! - **Zero-copy**: [`StrSource`] and [`CharSliceSource`] index directly into
//!   input that is already in memory, with no refill step.
//!
//! ```rust
//! use propstream::{CharSource, LookaheadBuffer, StrSource};
//!
//! let mut direct = StrSource::new("k=v");
//! let mut buffered = LookaheadBuffer::from_chars("k=v".chars(), 4).unwrap();
//!
//! assert_eq!(direct.peek(1), buffered.peek(1));
//! assert_eq!(direct.read().unwrap(), buffered.read().unwrap());
//! ```

use crate::options::Encoding;
use crate::{Error, Result};
use std::io::{self, BufReader, Bytes, Read};

/// Lookahead window used when none is requested explicitly.
pub const DEFAULT_LOOKAHEAD: usize = 16;

/// Bounded peek-ahead over a stream of characters.
pub trait CharSource {
    /// Returns the character `offset` positions ahead of the read position,
    /// or `None` past the end of input.
    ///
    /// # Panics
    ///
    /// Panics if `offset >= self.capacity()`.
    fn peek(&self, offset: usize) -> Option<char>;

    /// Consumes and returns the character at the read position, or `None`
    /// once the input is exhausted.
    ///
    /// # Errors
    ///
    /// Propagates failures of the underlying stream.
    fn read(&mut self) -> Result<Option<char>>;

    /// `true` once the input is exhausted and nothing is left to read.
    fn end_of_stream(&self) -> bool;

    /// The largest valid `peek` offset plus one.
    fn capacity(&self) -> usize;
}

/// Circular lookahead window over a fallible character iterator.
pub struct LookaheadBuffer<I> {
    slots: Vec<char>,
    head: usize,
    len: usize,
    source: I,
    exhausted: bool,
}

impl<I> LookaheadBuffer<I>
where
    I: Iterator<Item = io::Result<char>>,
{
    /// Creates a buffer and fills it from `source`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when `capacity` is zero, or the first
    /// I/O error the initial fill runs into.
    pub fn new(source: I, capacity: usize) -> Result<Self> {
        if capacity < 1 {
            return Err(Error::configuration(
                "lookahead buffer capacity must be at least 1",
            ));
        }

        let mut buffer = LookaheadBuffer {
            slots: vec!['\0'; capacity],
            head: 0,
            len: 0,
            source,
            exhausted: false,
        };
        while buffer.len < capacity && buffer.pull()? {}
        Ok(buffer)
    }

    /// Appends the next source character behind the buffered ones.
    fn pull(&mut self) -> Result<bool> {
        if self.exhausted {
            return Ok(false);
        }
        match self.source.next() {
            Some(Ok(ch)) => {
                let tail = (self.head + self.len) % self.slots.len();
                self.slots[tail] = ch;
                self.len += 1;
                Ok(true)
            }
            Some(Err(e)) => Err(e.into()),
            None => {
                self.exhausted = true;
                Ok(false)
            }
        }
    }
}

impl<C> LookaheadBuffer<std::iter::Map<C, fn(char) -> io::Result<char>>>
where
    C: Iterator<Item = char>,
{
    /// Buffers an infallible character iterator.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when `capacity` is zero.
    pub fn from_chars(chars: C, capacity: usize) -> Result<Self> {
        let ok: fn(char) -> io::Result<char> = Ok;
        LookaheadBuffer::new(chars.map(ok), capacity)
    }
}

impl<R: Read> LookaheadBuffer<Decoder<R>> {
    /// Buffers a byte reader decoded with `encoding`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when `capacity` is zero, or the first
    /// I/O error the initial fill runs into.
    pub fn from_reader(reader: R, encoding: Encoding, capacity: usize) -> Result<Self> {
        LookaheadBuffer::new(Decoder::new(reader, encoding), capacity)
    }
}

impl<I> CharSource for LookaheadBuffer<I>
where
    I: Iterator<Item = io::Result<char>>,
{
    fn peek(&self, offset: usize) -> Option<char> {
        assert!(
            offset < self.slots.len(),
            "peek offset {offset} exceeds lookahead capacity {}",
            self.slots.len()
        );
        if offset >= self.len {
            return None;
        }
        Some(self.slots[(self.head + offset) % self.slots.len()])
    }

    fn read(&mut self) -> Result<Option<char>> {
        if self.len == 0 {
            return Ok(None);
        }
        let ch = self.slots[self.head];
        self.head = (self.head + 1) % self.slots.len();
        self.len -= 1;
        self.pull()?;
        Ok(Some(ch))
    }

    fn end_of_stream(&self) -> bool {
        self.len == 0
    }

    fn capacity(&self) -> usize {
        self.slots.len()
    }
}

/// Zero-copy source over a borrowed string.
#[derive(Debug, Clone)]
pub struct StrSource<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> StrSource<'a> {
    #[must_use]
    pub fn new(input: &'a str) -> Self {
        StrSource { input, pos: 0 }
    }

    /// The input that has not been read yet.
    #[must_use]
    pub fn remaining(&self) -> &'a str {
        &self.input[self.pos..]
    }
}

impl CharSource for StrSource<'_> {
    fn peek(&self, offset: usize) -> Option<char> {
        self.remaining().chars().nth(offset)
    }

    fn read(&mut self) -> Result<Option<char>> {
        let ch = self.remaining().chars().next();
        if let Some(ch) = ch {
            self.pos += ch.len_utf8();
        }
        Ok(ch)
    }

    fn end_of_stream(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn capacity(&self) -> usize {
        usize::MAX
    }
}

/// Zero-copy source over a borrowed character buffer.
#[derive(Debug, Clone)]
pub struct CharSliceSource<'a> {
    input: &'a [char],
    pos: usize,
}

impl<'a> CharSliceSource<'a> {
    #[must_use]
    pub fn new(input: &'a [char]) -> Self {
        CharSliceSource { input, pos: 0 }
    }

    #[must_use]
    pub fn remaining(&self) -> &'a [char] {
        &self.input[self.pos..]
    }
}

impl CharSource for CharSliceSource<'_> {
    fn peek(&self, offset: usize) -> Option<char> {
        self.input.get(self.pos + offset).copied()
    }

    fn read(&mut self) -> Result<Option<char>> {
        let ch = self.input.get(self.pos).copied();
        if ch.is_some() {
            self.pos += 1;
        }
        Ok(ch)
    }

    fn end_of_stream(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn capacity(&self) -> usize {
        usize::MAX
    }
}

/// Decodes a byte reader into characters.
///
/// Malformed UTF-8 surfaces as an [`io::ErrorKind::InvalidData`] error.
pub struct Decoder<R> {
    bytes: Bytes<BufReader<R>>,
    encoding: Encoding,
}

impl<R: Read> Decoder<R> {
    pub fn new(reader: R, encoding: Encoding) -> Self {
        Decoder {
            bytes: BufReader::new(reader).bytes(),
            encoding,
        }
    }

    fn decode_utf8(&mut self, first: u8) -> io::Result<char> {
        let width = match first {
            0x00..=0x7F => return Ok(char::from(first)),
            0xC0..=0xDF => 2,
            0xE0..=0xEF => 3,
            0xF0..=0xF7 => 4,
            _ => return Err(invalid_utf8()),
        };

        let mut buf = [first, 0, 0, 0];
        for slot in buf.iter_mut().take(width).skip(1) {
            *slot = match self.bytes.next() {
                Some(byte) => byte?,
                None => {
                    return Err(io::Error::new(
                        io::ErrorKind::UnexpectedEof,
                        "truncated UTF-8 sequence",
                    ))
                }
            };
        }

        std::str::from_utf8(&buf[..width])
            .ok()
            .and_then(|s| s.chars().next())
            .ok_or_else(invalid_utf8)
    }
}

fn invalid_utf8() -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, "invalid UTF-8 sequence")
}

impl<R: Read> Iterator for Decoder<R> {
    type Item = io::Result<char>;

    fn next(&mut self) -> Option<Self::Item> {
        let first = match self.bytes.next()? {
            Ok(byte) => byte,
            Err(e) => return Some(Err(e)),
        };
        Some(match self.encoding {
            Encoding::Latin1 => Ok(char::from(first)),
            Encoding::Utf8 => self.decode_utf8(first),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(source: &mut impl CharSource) -> String {
        let mut out = String::new();
        while let Some(ch) = source.read().unwrap() {
            out.push(ch);
        }
        out
    }

    #[test]
    fn test_zero_capacity_is_rejected() {
        let result = LookaheadBuffer::from_chars("abc".chars(), 0);
        assert!(matches!(result, Err(Error::Configuration(_))));
    }

    #[test]
    fn test_peek_does_not_consume() {
        let mut buf = LookaheadBuffer::from_chars("abc".chars(), 2).unwrap();
        assert_eq!(buf.peek(0), Some('a'));
        assert_eq!(buf.peek(1), Some('b'));
        assert_eq!(buf.read().unwrap(), Some('a'));
        assert_eq!(buf.peek(1), Some('c'));
    }

    #[test]
    fn test_wraps_around_capacity() {
        let mut buf = LookaheadBuffer::from_chars("abcdefg".chars(), 3).unwrap();
        assert_eq!(drain(&mut buf), "abcdefg");
        assert!(buf.end_of_stream());
        assert_eq!(buf.read().unwrap(), None);
        assert_eq!(buf.peek(2), None);
    }

    #[test]
    #[should_panic(expected = "exceeds lookahead capacity")]
    fn test_peek_past_capacity_panics() {
        let buf = LookaheadBuffer::from_chars("abc".chars(), 2).unwrap();
        let _ = buf.peek(2);
    }

    #[test]
    fn test_empty_source_is_end_of_stream() {
        let buf = LookaheadBuffer::from_chars("".chars(), 4).unwrap();
        assert!(buf.end_of_stream());
        assert!(StrSource::new("").end_of_stream());
    }

    #[test]
    fn test_str_source_handles_multibyte() {
        let mut src = StrSource::new("é€x");
        assert_eq!(src.peek(1), Some('€'));
        assert_eq!(src.read().unwrap(), Some('é'));
        assert_eq!(src.remaining(), "€x");
        assert_eq!(drain(&mut src), "€x");
        assert!(src.end_of_stream());
    }

    #[test]
    fn test_char_slice_source() {
        let chars: Vec<char> = "a=b".chars().collect();
        let mut src = CharSliceSource::new(&chars);
        assert_eq!(src.peek(2), Some('b'));
        assert_eq!(src.peek(3), None);
        assert_eq!(drain(&mut src), "a=b");
    }

    #[test]
    fn test_decoder_utf8() {
        let decoded: io::Result<String> =
            Decoder::new("k=é€😀".as_bytes(), Encoding::Utf8).collect();
        assert_eq!(decoded.unwrap(), "k=é€😀");
    }

    #[test]
    fn test_decoder_latin1() {
        let decoded: io::Result<String> =
            Decoder::new(&[b'k', b'=', 0xE9][..], Encoding::Latin1).collect();
        assert_eq!(decoded.unwrap(), "k=é");
    }

    #[test]
    fn test_decoder_rejects_malformed_utf8() {
        let decoded: io::Result<String> = Decoder::new(&[b'k', 0xE9][..], Encoding::Utf8).collect();
        assert!(decoded.is_err());
    }

    #[test]
    fn test_buffer_surfaces_io_errors() {
        let mut buf = LookaheadBuffer::from_reader(&[b'a', 0xFF][..], Encoding::Utf8, 1).unwrap();
        assert!(matches!(buf.read(), Err(Error::Io(_))));
    }
}
