use std::io::{self, Read};

use messaging_sdk::{WebhookSecret, WebhookVerifier};
use tracing_subscriber::EnvFilter;

/// Reads a raw callback body from stdin and checks it against `WEBHOOK_SIGNATURE`.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let secret = std::env::var("WEBHOOK_SECRET").map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "WEBHOOK_SECRET environment variable is required",
        )
    })?;
    let signature = std::env::var("WEBHOOK_SIGNATURE").ok();

    let mut body = Vec::new();
    io::stdin().read_to_end(&mut body)?;

    let verifier = WebhookVerifier::new(WebhookSecret::new(secret)?);
    match verifier.verify_and_parse(signature.as_deref(), &body) {
        Ok(event) => {
            println!("accepted: {event:?}");
            Ok(())
        }
        Err(err) => {
            println!("rejected with HTTP {}: {err}", err.status_code());
            println!("expected signature: {}", verifier.sign(&body));
            std::process::exit(1);
        }
    }
}
