//! Building documents with the properties! macro.
//!
//! Run with: cargo run --example macro

use propstream::{properties, to_string};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    let version = env!("CARGO_PKG_VERSION");

    let props = properties! {
        "app.name" => "propstream demo",
        "app.version" => version,
        "app.greeting" => "  padded, with = and : inside",
        "app.path" => "C:\\Users\\demo",
        "app.symbol" => "€",
    };

    println!("{}", to_string(&props)?);

    let empty = properties!();
    println!("empty document: {:?}", to_string(&empty)?);

    Ok(())
}
