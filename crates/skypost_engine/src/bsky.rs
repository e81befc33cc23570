use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{json, Value};
use skypost_core::PostRef;

use crate::facets::HandleResolver;

#[derive(Debug, Clone)]
pub struct BskySettings {
    pub service_url: String,
    pub request_timeout: Duration,
}

impl Default for BskySettings {
    fn default() -> Self {
        Self {
            service_url: "https://bsky.social".to_string(),
            request_timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BskyError {
    #[error("network error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{endpoint} returned {status}: {body}")]
    Status {
        endpoint: &'static str,
        status: u16,
        body: String,
    },
    #[error("{endpoint} response missing {field}")]
    MissingField {
        endpoint: &'static str,
        field: &'static str,
    },
    #[error("createRecord response missing uri/cid")]
    MissingPostRef,
}

/// Uploads binary content, returning the service's opaque blob reference.
#[async_trait]
pub trait BlobUploader: Send + Sync {
    async fn upload_blob(&self, bytes: Vec<u8>, encoding: &str) -> Result<Value, BskyError>;
}

/// Publishes one post record and reports its AT URI and CID.
#[async_trait]
pub trait Publisher: Send + Sync {
    async fn publish(&self, payload: Value) -> Result<PostRef, BskyError>;
}

/// Authenticated XRPC client for one Bluesky account.
///
/// Created once at startup via [`BskyClient::login`] and shared across
/// workflow runs; the access token lives as long as the process.
#[derive(Debug, Clone)]
pub struct BskyClient {
    http: reqwest::Client,
    service_url: String,
    access_jwt: String,
    did: String,
}

impl BskyClient {
    /// `com.atproto.server.createSession` with an identifier and app password.
    pub async fn login(
        settings: &BskySettings,
        identifier: &str,
        password: &str,
    ) -> Result<Self, BskyError> {
        let http = reqwest::Client::builder()
            .timeout(settings.request_timeout)
            .build()?;

        let endpoint = "com.atproto.server.createSession";
        let response = http
            .post(format!("{}/xrpc/{endpoint}", settings.service_url))
            .json(&json!({ "identifier": identifier, "password": password }))
            .send()
            .await?;
        let body = check_status(endpoint, response).await?;

        let access_jwt = require_str(endpoint, &body, "accessJwt")?;
        let did = require_str(endpoint, &body, "did")?;
        log::info!("logged in to {} as {did}", settings.service_url);

        Ok(Self {
            http,
            service_url: settings.service_url.clone(),
            access_jwt,
            did,
        })
    }

    fn xrpc_url(&self, endpoint: &str) -> String {
        format!("{}/xrpc/{endpoint}", self.service_url)
    }
}

#[async_trait]
impl BlobUploader for BskyClient {
    /// `com.atproto.repo.uploadBlob` with the raw bytes as the request body.
    async fn upload_blob(&self, bytes: Vec<u8>, encoding: &str) -> Result<Value, BskyError> {
        let endpoint = "com.atproto.repo.uploadBlob";
        let response = self
            .http
            .post(self.xrpc_url(endpoint))
            .bearer_auth(&self.access_jwt)
            .header("Content-Type", encoding)
            .body(bytes)
            .send()
            .await?;
        let body = check_status(endpoint, response).await?;

        body.get("blob").cloned().ok_or(BskyError::MissingField {
            endpoint,
            field: "blob",
        })
    }
}

#[async_trait]
impl Publisher for BskyClient {
    /// `com.atproto.repo.createRecord` into `app.bsky.feed.post`.
    ///
    /// The workflow builds payloads without `$type` or `createdAt`; both are
    /// stamped here if absent so the record validates.
    async fn publish(&self, mut payload: Value) -> Result<PostRef, BskyError> {
        if let Some(record) = payload.as_object_mut() {
            record
                .entry("$type")
                .or_insert_with(|| json!("app.bsky.feed.post"));
            record
                .entry("createdAt")
                .or_insert_with(|| json!(Utc::now().to_rfc3339()));
        }

        let endpoint = "com.atproto.repo.createRecord";
        let response = self
            .http
            .post(self.xrpc_url(endpoint))
            .bearer_auth(&self.access_jwt)
            .json(&json!({
                "repo": self.did,
                "collection": "app.bsky.feed.post",
                "record": payload,
            }))
            .send()
            .await?;
        let body = check_status(endpoint, response).await?;

        match (
            body.get("uri").and_then(Value::as_str),
            body.get("cid").and_then(Value::as_str),
        ) {
            (Some(uri), Some(cid)) => Ok(PostRef {
                uri: uri.to_string(),
                cid: cid.to_string(),
            }),
            _ => Err(BskyError::MissingPostRef),
        }
    }
}

#[async_trait]
impl HandleResolver for BskyClient {
    /// `com.atproto.identity.resolveHandle`. An unknown handle resolves to
    /// `None` rather than an error so mention detection can skip it.
    async fn resolve_handle(&self, handle: &str) -> Result<Option<String>, BskyError> {
        let endpoint = "com.atproto.identity.resolveHandle";
        let response = self
            .http
            .get(self.xrpc_url(endpoint))
            .query(&[("handle", handle)])
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::BAD_REQUEST {
            return Ok(None);
        }
        let body = check_status(endpoint, response).await?;
        Ok(body
            .get("did")
            .and_then(Value::as_str)
            .map(ToOwned::to_owned))
    }
}

async fn check_status(
    endpoint: &'static str,
    response: reqwest::Response,
) -> Result<Value, BskyError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(BskyError::Status {
            endpoint,
            status: status.as_u16(),
            body,
        });
    }
    Ok(response.json().await?)
}

fn require_str(
    endpoint: &'static str,
    body: &Value,
    field: &'static str,
) -> Result<String, BskyError> {
    body.get(field)
        .and_then(Value::as_str)
        .map(ToOwned::to_owned)
        .ok_or(BskyError::MissingField { endpoint, field })
}
