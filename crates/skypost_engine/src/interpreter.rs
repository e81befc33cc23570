use std::fmt::Display;
use std::sync::Arc;

use skypost_core::{Cmd, Msg};

use crate::bsky::{BlobUploader, Publisher};
use crate::capture::Capturer;
use crate::facets::FacetDetector;
use crate::png::parse_png_dimensions;

const PNG_CONTENT_TYPE: &str = "image/png";

/// Executes one [`Cmd`] against the live collaborators and reports the
/// outcome as a [`Msg`].
///
/// Collaborator failures never escape as `Err`: every error is absorbed into
/// [`Msg::Failed`] so the state machine sees a uniform failure channel.
pub struct Interpreter {
    capturer: Arc<dyn Capturer>,
    detector: Arc<dyn FacetDetector>,
    uploader: Arc<dyn BlobUploader>,
    publisher: Arc<dyn Publisher>,
}

impl Interpreter {
    pub fn new(
        capturer: Arc<dyn Capturer>,
        detector: Arc<dyn FacetDetector>,
        uploader: Arc<dyn BlobUploader>,
        publisher: Arc<dyn Publisher>,
    ) -> Self {
        Self {
            capturer,
            detector,
            uploader,
            publisher,
        }
    }

    pub async fn execute(&self, cmd: Cmd) -> Msg {
        match cmd {
            // The dispatch loop stops on NoOp before calling execute; getting
            // here is a bug in the loop, not a runtime condition.
            Cmd::NoOp => unreachable!("Cmd::NoOp must never be executed"),

            Cmd::DetectFacets { text } => match self.detector.detect_facets(&text).await {
                Ok(detected) => Msg::FacetsDetected {
                    text: detected.text,
                    facets: detected.facets,
                },
                Err(err) => failed(err),
            },

            Cmd::TakeScreenshot { config } => match self.capturer.capture(&config).await {
                Ok(output) => Msg::ScreenshotTaken {
                    path: output.png_path,
                    was_cropped: output.was_cropped,
                },
                Err(err) => failed(err),
            },

            Cmd::ReadImageFile { path } => match tokio::fs::read(&path).await {
                Ok(bytes) => match parse_png_dimensions(&bytes) {
                    Ok(dimensions) => Msg::ImageRead {
                        bytes,
                        dimensions,
                        encoding: PNG_CONTENT_TYPE.to_string(),
                    },
                    Err(err) => failed(err),
                },
                Err(err) => failed(format!("could not read {path}: {err}")),
            },

            Cmd::UploadBlob { bytes, encoding } => {
                match self.uploader.upload_blob(bytes, &encoding).await {
                    Ok(blob) => Msg::BlobUploaded { blob },
                    Err(err) => failed(err),
                }
            }

            Cmd::Publish { payload } => match self.publisher.publish(payload).await {
                Ok(post) => Msg::Published {
                    uri: post.uri,
                    cid: post.cid,
                },
                Err(err) => failed(err),
            },
        }
    }
}

fn failed(err: impl Display) -> Msg {
    let error = err.to_string();
    log::warn!("effect failed: {error}");
    Msg::Failed { error }
}
