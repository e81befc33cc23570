//! Skypost engine: effect execution against live collaborators.
//!
//! The core crate decides *what* happens next; this crate makes it happen:
//! screenshot capture, PNG reading, facet detection, blob upload, and record
//! publishing, plus the dispatch loop that drives a workflow to a terminal
//! state.
mod bsky;
mod capture;
mod facets;
mod interpreter;
mod png;
mod runner;

pub use bsky::{BlobUploader, BskyClient, BskyError, BskySettings, Publisher};
pub use capture::{
    compute_clip, CaptureError, CaptureOutput, CaptureSettings, Capturer, ChromeCapturer, Clip,
    ClipResult, ElementBox, FADE_START, MAX_HEIGHT,
};
pub use facets::{DetectedFacets, FacetDetector, HandleResolver, RichTextDetector};
pub use interpreter::Interpreter;
pub use png::{parse_png_dimensions, PngError};
pub use runner::run;
