use serde_json::Value;

use crate::model::Dimensions;

/// Outcome of one executed effect, fed back into [`crate::update`].
#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// Rich-text facet detection finished. The service may normalize the
    /// text it was given, so `text` supersedes whatever was sent.
    FacetsDetected {
        text: String,
        facets: Option<Vec<Value>>,
    },
    /// A page element screenshot was written to disk.
    ScreenshotTaken { path: String, was_cropped: bool },
    /// An image file was read and its header parsed.
    ImageRead {
        bytes: Vec<u8>,
        dimensions: Dimensions,
        encoding: String,
    },
    /// The binary upload succeeded; `blob` is the service's opaque reference.
    BlobUploaded { blob: Value },
    /// A record was published.
    Published { uri: String, cid: String },
    /// Any effect failed. Absorbed by every state.
    Failed { error: String },
}

impl Msg {
    pub fn tag(&self) -> &'static str {
        match self {
            Msg::FacetsDetected { .. } => "facets_detected",
            Msg::ScreenshotTaken { .. } => "screenshot_taken",
            Msg::ImageRead { .. } => "image_read",
            Msg::BlobUploaded { .. } => "blob_uploaded",
            Msg::Published { .. } => "published",
            Msg::Failed { .. } => "failed",
        }
    }
}
