//! Basic example: issue a token, decode it, and read it back unverified
//!
//! Run with `RUST_LOG=jwtpair=debug` to see the codec's tracing events.

use jwtpair::*;
use serde_json::json;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const PRIVATE_KEY: &[u8] = include_bytes!("../tests/fixtures/private_key.pem");
const PUBLIC_KEY: &[u8] = include_bytes!("../tests/fixtures/public_key.pem");

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "jwtpair=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    println!("=== jwtpair - Basic Example ===\n");

    let codec = TokenCodec::new()
        .private_key(PRIVATE_KEY)
        .public_key(PUBLIC_KEY)
        .build();

    let mut claims = ClaimSet::new();
    claims.insert("Key1".into(), json!("Value1"));
    claims.insert("Key2".into(), json!("Value2"));

    let token = codec.encode("Issuer", "Audience", "Subject", Some("+ 1 hour"), claims)?;
    println!("Token: {token}\n");

    let payload = codec.extract_payload(&token)?;
    println!("Unverified payload: {}\n", serde_json::Value::Object(payload));

    match codec.decode(&token, false)? {
        Some(claims) => {
            println!("Verified claims:");
            for (name, value) in &claims {
                println!("  {name}: {value}");
            }
        }
        None => println!("Token rejected"),
    }

    // An already expired token comes back as None when failures are ignored
    let expired = codec.encode(
        "Issuer",
        "Audience",
        "Subject",
        Some("- 1 hour"),
        ClaimSet::new(),
    )?;
    println!("\nExpired token decodes to: {:?}", codec.decode(&expired, true)?);

    if let Err(err) = codec.decode(&expired, false) {
        println!("Without suppression: {err}");
    }

    Ok(())
}
