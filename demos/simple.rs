//! Loading, editing and storing a properties document.
//!
//! Run with: cargo run --example simple

use propstream::{from_str, to_string, Properties};
use serde::Deserialize;
use std::error::Error;

#[derive(Debug, Deserialize)]
struct Database {
    url: String,
    user: String,
    pool_size: String,
}

const INPUT: &str = "\
# Database connection
db.url = jdbc:postgresql://localhost/app
db.user: admin
db.pool_size 8

! Greeting shown on the login page
welcome = Willkommen, \\
          Bienvenue \\u2014 Welcome
";

fn main() -> Result<(), Box<dyn Error>> {
    let mut props: Properties = from_str(INPUT)?;

    println!("Loaded {} properties:", props.len());
    for (key, value) in &props {
        println!("  {key} -> {value}");
    }

    props.insert("db.pool_size", "16");
    props.remove("welcome");
    props.insert("db.password", "s3cr=t!");

    println!("\nStored:\n{}", to_string(&props)?);

    let db: Database = from_str(
        &props
            .iter()
            .filter_map(|(k, v)| k.strip_prefix("db.").map(|k| format!("{k}={v}\n")))
            .collect::<String>(),
    )?;
    println!("{db:?}");
    println!("connecting to {} as {} ({} connections)", db.url, db.user, db.pool_size);

    Ok(())
}
