use serde::{Deserialize, Serialize};

/// Where the local site preview is served while screenshots are taken.
pub const PREVIEW_BASE_URL: &str = "http://localhost:4321";

/// Directory captured images are written under, relative to the working dir.
pub const SCREENSHOT_DIR: &str = "screenshots";

/// Signed pixel offsets applied around an element's bounding box. Negative
/// values extend the clip past the box on that side rather than shrinking it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Padding {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

/// Everything the capture collaborator needs for one screenshot. Built once
/// per request by link classification and consumed exactly once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreenshotConfig {
    /// Page to navigate to.
    pub url: String,
    /// Element whose bounding box defines the clip.
    pub selector: String,
    /// Code blocks to wrap before capturing. Best effort; a miss is logged,
    /// never fatal.
    pub code_selector: String,
    /// Where the PNG lands.
    pub output_path: String,
    pub padding: Padding,
}

/// Capture config for one entry on the stream page, targeted by element id.
pub fn stream_config(stream_id: &str, padding: Padding) -> ScreenshotConfig {
    ScreenshotConfig {
        url: format!("{PREVIEW_BASE_URL}/stream"),
        selector: format!("[id=\"{stream_id}\"]"),
        code_selector: format!("[id=\"{stream_id}\"] .expressive-code .frame pre"),
        output_path: format!("{SCREENSHOT_DIR}/stream/{stream_id}.png"),
        padding,
    }
}

/// Capture config for an article page, targeted by the post container.
pub fn article_config(slug_path: &str, padding: Padding) -> ScreenshotConfig {
    ScreenshotConfig {
        url: format!("{PREVIEW_BASE_URL}/{slug_path}"),
        selector: ".post".to_string(),
        code_selector: ".expressive-code .frame pre".to_string(),
        output_path: format!("{SCREENSHOT_DIR}/{slug_path}.png"),
        padding,
    }
}
