//! Civica daemon - city infrastructure complaint portal.
//!
//! Renders the complaint form, validates submissions, and dispatches
//! best-effort confirmation emails.

use anyhow::Result;
use civicad::config::Config;
use civicad::mailer::Mailer;
use civicad::server::{self, AppState};
use std::env;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(true)
        .with_level(true)
        .init();

    info!("civicad v{} starting", env!("CARGO_PKG_VERSION"));

    let config = Config::load();
    let mailer = Mailer::new(&config);
    match mailer.transport_kind() {
        Some(kind) => info!("Email transport: {}", kind),
        None => info!("No email transport configured; submissions will carry a warning"),
    }

    server::run(AppState::new(mailer)).await
}
