use anyhow::Context;

/// Process configuration, read from the environment (a local `.env` file is
/// honored via dotenvy before this runs).
#[derive(Debug, Clone)]
pub struct Settings {
    /// Address the HTTP server binds to.
    pub bind_addr: String,
    /// Bluesky service the client talks to.
    pub service_url: String,
    /// Account identifier (handle or DID).
    pub identifier: String,
    /// App password, never the account password.
    pub app_password: String,
}

impl Settings {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            bind_addr: env_or("SKYPOST_BIND", "0.0.0.0:3000"),
            service_url: env_or("SKYPOST_SERVICE_URL", "https://bsky.social"),
            identifier: std::env::var("SKYPOST_IDENTIFIER")
                .context("SKYPOST_IDENTIFIER is not set")?,
            app_password: std::env::var("BLUESKY_APP_SECRET")
                .context("BLUESKY_APP_SECRET is not set")?,
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
