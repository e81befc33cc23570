//! skypost: posts text and page screenshots to Bluesky.
//!
//! Authenticates once at startup, then serves two endpoints that each drive
//! an independent posting workflow to completion.

mod server;
mod settings;

use std::sync::Arc;

use anyhow::Context;
use skypost_engine::{
    BskyClient, BskySettings, CaptureSettings, ChromeCapturer, Interpreter, RichTextDetector,
};
use skypost_logging::LogDestination;

use crate::settings::Settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    skypost_logging::initialize(LogDestination::Terminal);

    let settings = Settings::from_env()?;
    let bsky_settings = BskySettings {
        service_url: settings.service_url.clone(),
        ..BskySettings::default()
    };
    let client = Arc::new(
        BskyClient::login(&bsky_settings, &settings.identifier, &settings.app_password)
            .await
            .context("bluesky login failed")?,
    );

    let interpreter = Arc::new(Interpreter::new(
        Arc::new(ChromeCapturer::new(CaptureSettings::default())),
        Arc::new(RichTextDetector::new(client.clone())),
        client.clone(),
        client,
    ));

    let app = server::router(interpreter);
    let listener = tokio::net::TcpListener::bind(&settings.bind_addr)
        .await
        .with_context(|| format!("could not bind {}", settings.bind_addr))?;
    log::info!("listening on {}", settings.bind_addr);
    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}
