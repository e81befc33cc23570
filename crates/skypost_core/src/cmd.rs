use serde_json::Value;

use crate::screenshot::ScreenshotConfig;

/// An effect requested by the state machine, executed by the engine.
///
/// `NoOp` is the terminal request: the dispatch loop stops instead of
/// executing it.
#[derive(Debug, Clone, PartialEq)]
pub enum Cmd {
    NoOp,
    DetectFacets { text: String },
    TakeScreenshot { config: ScreenshotConfig },
    ReadImageFile { path: String },
    UploadBlob { bytes: Vec<u8>, encoding: String },
    Publish { payload: Value },
}
