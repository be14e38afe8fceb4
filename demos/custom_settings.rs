//! Dialect settings on the reading and writing side.
//!
//! Run with: cargo run --example custom_settings

use propstream::{
    tokenize_with_settings, Encoding, LineEnding, Properties, ReaderSettings, TokenKind,
    WriterSettings,
};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    // Lenient reading: errors become tokens instead of failing.
    let lenient = ReaderSettings::new()
        .with_throw_on_error(false)
        .with_invalid_escapes_are_literal(false);
    for token in tokenize_with_settings("good=1\nbad=\\q\nnever=read", lenient)? {
        if token.kind == TokenKind::Error {
            println!("recorded: {}", token.text().unwrap_or_default());
        } else {
            println!("token:    {token}");
        }
    }

    // Extended escapes and raw Unicode.
    let extended = ReaderSettings::new()
        .with_extended_unicode_escapes(true)
        .with_restrict_to_latin1(false);
    let props = Properties::load_str_with_settings("emoji=\\U0001F980 \\x41 ü €", extended)?;
    println!("\nemoji = {}", props.get("emoji").unwrap_or_default());

    // Windows line endings, escapes for everything outside Latin-1.
    let windows = WriterSettings::new()
        .with_line_ending(LineEnding::CrLf)
        .with_extended_unicode_escapes(true);
    println!("\nCRLF output: {:?}", props.to_string_with_settings(windows)?);

    // ISO-8859-1 bytes on disk.
    let mut latin1 = Vec::new();
    let mut plain = Properties::new();
    plain.insert("city", "Zürich");
    plain.store(&mut latin1, WriterSettings::new().with_encoding(Encoding::Latin1))?;
    println!("Latin-1 bytes: {latin1:?}");

    let back = Properties::load_reader(
        &latin1[..],
        ReaderSettings::new().with_encoding(Encoding::Latin1),
    )?;
    println!("read back: city = {}", back.get("city").unwrap_or_default());

    // Settings are plain serde records.
    let json = serde_json::to_string_pretty(&WriterSettings::new().with_auto_flush(32))?;
    println!("\nwriter settings as JSON:\n{json}");

    Ok(())
}
