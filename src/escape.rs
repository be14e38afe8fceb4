//! Character classes and backslash-escape tables shared by the tokenizer and
//! the emitter.

/// Blank characters skipped between logical lines.
#[inline]
pub(crate) const fn is_blank(ch: char) -> bool {
    matches!(ch, ' ' | '\t' | '\x0C' | '\r' | '\n')
}

/// Whitespace that may pad or act as an assigner (never a line terminator).
#[inline]
pub(crate) const fn is_whitespace(ch: char) -> bool {
    matches!(ch, ' ' | '\t' | '\x0C')
}

#[inline]
pub(crate) const fn is_line_end(ch: char) -> bool {
    matches!(ch, '\r' | '\n')
}

#[inline]
pub(crate) const fn is_comment_handle(ch: char) -> bool {
    matches!(ch, '#' | '!')
}

#[inline]
pub(crate) const fn is_literal_assigner(ch: char) -> bool {
    matches!(ch, '=' | ':')
}

/// `=`, `:` or whitespace.
#[inline]
pub(crate) const fn is_assigner(ch: char) -> bool {
    is_literal_assigner(ch) || is_whitespace(ch)
}

#[inline]
pub(crate) const fn is_latin1(ch: char) -> bool {
    (ch as u32) <= 0xFF
}

/// Maps the character after a backslash to the character it stands for.
pub(crate) const fn decode_simple(ch: char) -> Option<char> {
    let decoded = match ch {
        '0' => '\0',
        'a' => '\x07',
        'f' => '\x0C',
        'r' => '\r',
        'n' => '\n',
        't' => '\t',
        'v' => '\x0B',
        '\\' | '"' | '\'' | '=' | ':' | ' ' | '#' | '!' => ch,
        _ => return None,
    };
    Some(decoded)
}

/// Inverse of [`decode_simple`] for characters that are always escaped.
pub(crate) const fn encode_simple(ch: char) -> Option<char> {
    let code = match ch {
        '\\' => '\\',
        '\0' => '0',
        '\x07' => 'a',
        '\x0C' => 'f',
        '\r' => 'r',
        '\n' => 'n',
        '\x0B' => 'v',
        _ => return None,
    };
    Some(code)
}

/// Turns a decoded code point into a character, rejecting surrogates and
/// values above U+10FFFF.
#[inline]
pub(crate) fn scalar(code: u32) -> Option<char> {
    char::from_u32(code)
}

/// Writes `ch` as `\uXXXX`, or as `\UXXXXXXXX` when it lies outside the
/// Basic Multilingual Plane and `extended` is set.
///
/// Returns `false` without writing anything when `ch` needs a surrogate
/// pair and extended escapes are disabled.
pub(crate) fn push_unicode_escape(out: &mut String, ch: char, extended: bool) -> bool {
    let code = ch as u32;
    if code <= 0xFFFF {
        out.push_str(&format!("\\u{code:04X}"));
        true
    } else if extended {
        out.push_str(&format!("\\U{code:08X}"));
        true
    } else {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_escapes_are_inverse() {
        for ch in ['\\', '\0', '\x07', '\x0C', '\r', '\n', '\x0B'] {
            let code = encode_simple(ch).unwrap();
            assert_eq!(decode_simple(code), Some(ch));
        }
    }

    #[test]
    fn test_unknown_escape() {
        assert_eq!(decode_simple('q'), None);
        assert_eq!(decode_simple('u'), None);
    }

    #[test]
    fn test_scalar_rejects_surrogates_and_overflow() {
        assert_eq!(scalar(0x41), Some('A'));
        assert_eq!(scalar(0xD800), None);
        assert_eq!(scalar(0xDFFF), None);
        assert_eq!(scalar(0x11_0000), None);
        assert_eq!(scalar(0x10_FFFF), Some('\u{10FFFF}'));
    }

    #[test]
    fn test_unicode_escape_forms() {
        let mut out = String::new();
        assert!(push_unicode_escape(&mut out, '€', false));
        assert_eq!(out, "\\u20AC");

        out.clear();
        assert!(!push_unicode_escape(&mut out, '😀', false));
        assert!(out.is_empty());
        assert!(push_unicode_escape(&mut out, '😀', true));
        assert_eq!(out, "\\U0001F600");
    }

    #[test]
    fn test_character_classes() {
        assert!(is_assigner('\t'));
        assert!(!is_assigner('\n'));
        assert!(is_blank('\r'));
        assert!(!is_latin1('Ā'));
        assert!(is_latin1('ÿ'));
    }
}
