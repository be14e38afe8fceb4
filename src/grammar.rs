//! The properties dialect read by [`Tokenizer`](crate::Tokenizer) and
//! written by [`Emitter`](crate::Emitter).
//!
//! This module only carries documentation.
//!
//! # Lines
//!
//! A document is a sequence of physical lines ended by `\n`, `\r\n` or a
//! lone `\r`. Blank lines and leading blanks are skipped.
//!
//! ## Comments
//!
//! A line whose first non-blank character is `#` or `!` is a comment. The
//! handle is not part of the comment text, nor is whitespace directly after
//! it:
//!
//! ```text
//! # database settings
//! !legacy comment
//! ```
//!
//! Comments never continue onto the next line, even when they end with a
//! backslash.
//!
//! ## Properties
//!
//! Any other line holds a property: a key, an optional assigner and an
//! optional value.
//!
//! ```text
//! key=value
//! key : value
//! key value
//! key
//! ```
//!
//! The key ends at the first unescaped `=`, `:`, whitespace or line end.
//!
//! | After the key                          | Assigner           | Value                |
//! |----------------------------------------|--------------------|----------------------|
//! | `=` or `:`                             | that character     | rest of the line     |
//! | whitespace, then `=` or `:`            | the `=` or `:`     | rest of the line     |
//! | whitespace, then other text            | first whitespace   | rest of the line     |
//! | whitespace up to the line end          | none               | none                 |
//! | line end                               | none               | none                 |
//!
//! Whitespace between the assigner and the value is skipped. A value that
//! follows an assigner is always present, possibly empty.
//!
//! # Escapes
//!
//! | Escape        | Meaning                                          |
//! |---------------|--------------------------------------------------|
//! | `\t` `\n` `\r` `\f` | tab, line feed, carriage return, form feed |
//! | `\0` `\a` `\v`| NUL, bell, vertical tab                          |
//! | `\\` `\"` `\'`| the character itself                             |
//! | `\=` `\:` `\ ` `\#` `\!` | the character itself                  |
//! | `\uXXXX`      | exactly four hex digits                          |
//! | `\xX`..`\xXXXX` | one to four hex digits (extended escapes only) |
//! | `\UXXXXXXXX`  | eight hex digits, the first two zero (extended escapes only) |
//!
//! Any other escaped character stands for itself when
//! `invalid_escapes_are_literal` is set and is a lexical error otherwise.
//! Escapes that decode to a surrogate or to a value above U+10FFFF are
//! lexical errors.
//!
//! # Logical lines
//!
//! A backslash directly before a line terminator joins the next physical
//! line onto the current key or value, dropping the terminator and the
//! next line's leading whitespace:
//!
//! ```text
//! fruits = apple, \
//!          banana
//! ```
//!
//! reads as `fruits` = `apple, banana`. A backslash at the very end of the
//! input stands for itself.
//!
//! # Character range
//!
//! With `restrict_to_latin1` set, raw characters above U+00FF are lexical
//! errors on input and are written as `\uXXXX` on output. Escaped
//! characters are never restricted.
