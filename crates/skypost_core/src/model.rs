use serde_json::Value;

/// Pixel dimensions of a captured image, carried into the post embed as its
/// aspect ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// A published record reference (AT URI plus content identifier).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostRef {
    pub uri: String,
    pub cid: String,
}

/// Workflow state. Two independent flows (plain text, screenshot image with a
/// follow-up reply) share the terminal states.
///
/// Each state carries only what later steps still need; fields are dropped as
/// soon as nothing downstream reads them. Facets and blobs stay opaque
/// [`Value`]s since the workflow never inspects their contents.
#[derive(Debug, Clone, PartialEq)]
pub enum Model {
    // Text flow
    TextDetectingFacets {
        user_facets: Option<Vec<Value>>,
    },
    TextPosting,

    // Image flow
    ImgScreenshotting {
        text: String,
        alttext: String,
        link_path: String,
    },
    ImgReadingPng {
        text: String,
        alttext: String,
        link_path: String,
        was_cropped: bool,
    },
    ImgUploadingBlob {
        text: String,
        alttext: String,
        link_path: String,
        was_cropped: bool,
        dimensions: Dimensions,
    },
    ImgDetectingFacets {
        alttext: String,
        link_path: String,
        was_cropped: bool,
        dimensions: Dimensions,
        blob: Value,
    },
    ImgPostingImage {
        link_path: String,
        was_cropped: bool,
    },
    ImgDetectingReplyFacets {
        image_post: PostRef,
    },
    ImgPostingReply {
        image_post: PostRef,
    },

    // Terminal states, absorbing under any further message.
    Done {
        message: String,
        uri: String,
    },
    Failed {
        error: String,
    },
}

impl Model {
    /// Short tag for log lines and "unexpected message" errors.
    pub fn tag(&self) -> &'static str {
        match self {
            Model::TextDetectingFacets { .. } => "text_detecting_facets",
            Model::TextPosting => "text_posting",
            Model::ImgScreenshotting { .. } => "img_screenshotting",
            Model::ImgReadingPng { .. } => "img_reading_png",
            Model::ImgUploadingBlob { .. } => "img_uploading_blob",
            Model::ImgDetectingFacets { .. } => "img_detecting_facets",
            Model::ImgPostingImage { .. } => "img_posting_image",
            Model::ImgDetectingReplyFacets { .. } => "img_detecting_reply_facets",
            Model::ImgPostingReply { .. } => "img_posting_reply",
            Model::Done { .. } => "done",
            Model::Failed { .. } => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Model::Done { .. } | Model::Failed { .. })
    }
}
