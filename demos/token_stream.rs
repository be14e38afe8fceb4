//! Driving the tokenizer and emitter by hand.
//!
//! Run with: RUST_LOG=propstream=trace cargo run --example token_stream

use propstream::{Emitter, Position, ReaderSettings, Token, Tokenizer, WriterSettings};
use std::error::Error;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let input = "# server\nhost\t= example.org\nport 8080\nmotd = line one\\\n       line two\nflag\n";

    let mut tokenizer = Tokenizer::from_str(input, ReaderSettings::new());
    tokenizer.set_observer(|token: &Token, start: Position, end: Position| {
        println!("{start} .. {end}: {token}");
    });

    let settings = WriterSettings::new().with_close_sink_on_end(false);
    let mut emitter = Emitter::new(Vec::new(), settings)?;

    while tokenizer.advance()? {
        emitter.write_current(&tokenizer)?;
    }
    emitter.finish()?;

    let output = emitter.into_inner().unwrap_or_default();
    println!("\nRewritten:\n{}", String::from_utf8(output)?);

    Ok(())
}
