use serde_json::{json, Map, Value};

use crate::cmd::Cmd;
use crate::link::{link_path, padding_for, parse_link, LinkType};
use crate::model::{Dimensions, Model, PostRef};
use crate::msg::Msg;
use crate::screenshot::{article_config, stream_config};
use crate::text::{grapheme_len, merge_facets, GRAPHEME_LIMIT};

/// Public base of the published site, used when the reply links back to it.
pub const SITE_BASE_URL: &str = "https://beathagenlocher.com";

/// Entry point for a plain text post.
pub fn init_text_post(text: &str, user_facets: Option<Vec<Value>>) -> (Model, Cmd) {
    (
        Model::TextDetectingFacets { user_facets },
        Cmd::DetectFacets {
            text: text.to_string(),
        },
    )
}

/// Entry point for a screenshot post: classify the link, derive the capture
/// config, and start with the screenshot effect.
pub fn init_image_post(text: &str, alttext: &str, link: &str) -> (Model, Cmd) {
    let link_type = parse_link(link);
    let padding = padding_for(&link_type);
    let path = link_path(&link_type, link);
    let config = match &link_type {
        LinkType::Stream { stream_id } => stream_config(stream_id, padding),
        LinkType::Article { slug_path } => article_config(slug_path, padding),
    };

    (
        Model::ImgScreenshotting {
            text: text.to_string(),
            alttext: alttext.to_string(),
            link_path: path,
        },
        Cmd::TakeScreenshot { config },
    )
}

/// Pure transition function: one state plus one effect outcome yields the
/// next state and the next requested effect.
///
/// A [`Msg::Failed`] short-circuits every non-terminal state into
/// [`Model::Failed`]. Each state otherwise accepts exactly one message tag;
/// anything else is a protocol mismatch and also fails. The terminal states
/// absorb every message unchanged.
pub fn update(model: Model, msg: Msg) -> (Model, Cmd) {
    if model.is_terminal() {
        return (model, Cmd::NoOp);
    }
    if let Msg::Failed { error } = msg {
        return (Model::Failed { error }, Cmd::NoOp);
    }

    match model {
        // --- Text flow ---
        Model::TextDetectingFacets { user_facets } => match msg {
            Msg::FacetsDetected { text, facets } => {
                let length = grapheme_len(&text);
                if length > GRAPHEME_LIMIT {
                    return fail(format!(
                        "Text is too long: {length} graphemes (max {GRAPHEME_LIMIT})"
                    ));
                }
                let payload = post_payload(&text, Some(merge_facets(user_facets, facets)));
                (Model::TextPosting, Cmd::Publish { payload })
            }
            other => unexpected(&other, "text_detecting_facets"),
        },

        Model::TextPosting => match msg {
            Msg::Published { uri, .. } => {
                let message = format!("Successfully posted text to Bluesky (URI: {uri})");
                (Model::Done { message, uri }, Cmd::NoOp)
            }
            other => unexpected(&other, "text_posting"),
        },

        // --- Image flow ---
        Model::ImgScreenshotting {
            text,
            alttext,
            link_path,
        } => match msg {
            Msg::ScreenshotTaken { path, was_cropped } => (
                Model::ImgReadingPng {
                    text,
                    alttext,
                    link_path,
                    was_cropped,
                },
                Cmd::ReadImageFile { path },
            ),
            other => unexpected(&other, "img_screenshotting"),
        },

        Model::ImgReadingPng {
            text,
            alttext,
            link_path,
            was_cropped,
        } => match msg {
            Msg::ImageRead {
                bytes,
                dimensions,
                encoding,
            } => (
                Model::ImgUploadingBlob {
                    text,
                    alttext,
                    link_path,
                    was_cropped,
                    dimensions,
                },
                Cmd::UploadBlob { bytes, encoding },
            ),
            other => unexpected(&other, "img_reading_png"),
        },

        Model::ImgUploadingBlob {
            text,
            alttext,
            link_path,
            was_cropped,
            dimensions,
        } => match msg {
            Msg::BlobUploaded { blob } => (
                Model::ImgDetectingFacets {
                    alttext,
                    link_path,
                    was_cropped,
                    dimensions,
                    blob,
                },
                Cmd::DetectFacets { text },
            ),
            other => unexpected(&other, "img_uploading_blob"),
        },

        Model::ImgDetectingFacets {
            alttext,
            link_path,
            was_cropped,
            dimensions,
            blob,
        } => match msg {
            Msg::FacetsDetected { text, facets } => {
                let mut payload = post_payload(&text, facets);
                payload["embed"] = build_image_embed(blob, &alttext, dimensions);
                (
                    Model::ImgPostingImage {
                        link_path,
                        was_cropped,
                    },
                    Cmd::Publish { payload },
                )
            }
            other => unexpected(&other, "img_detecting_facets"),
        },

        Model::ImgPostingImage {
            link_path,
            was_cropped,
        } => match msg {
            Msg::Published { uri, cid } => {
                let reply_text = build_reply_text(&link_path, was_cropped);
                (
                    Model::ImgDetectingReplyFacets {
                        image_post: PostRef { uri, cid },
                    },
                    Cmd::DetectFacets { text: reply_text },
                )
            }
            other => unexpected(&other, "img_posting_image"),
        },

        Model::ImgDetectingReplyFacets { image_post } => match msg {
            Msg::FacetsDetected { text, facets } => {
                let mut payload = post_payload(&text, facets);
                payload["$type"] = json!("app.bsky.feed.post");
                payload["reply"] = build_reply_ref(&image_post);
                (Model::ImgPostingReply { image_post }, Cmd::Publish { payload })
            }
            other => unexpected(&other, "img_detecting_reply_facets"),
        },

        Model::ImgPostingReply { image_post } => match msg {
            Msg::Published { uri, .. } => {
                let message = format!(
                    "Successfully posted image (URI: {}) and reply (URI: {uri})",
                    image_post.uri
                );
                (Model::Done { message, uri }, Cmd::NoOp)
            }
            other => unexpected(&other, "img_posting_reply"),
        },

        // Handled by the is_terminal check above; kept for exhaustiveness.
        Model::Done { .. } | Model::Failed { .. } => (model, Cmd::NoOp),
    }
}

fn fail(error: String) -> (Model, Cmd) {
    (Model::Failed { error }, Cmd::NoOp)
}

fn unexpected(msg: &Msg, state: &str) -> (Model, Cmd) {
    fail(format!("Unexpected msg {} in {state}", msg.tag()))
}

/// Base post record: text plus facets. Facets are omitted entirely when
/// absent rather than serialized as null.
fn post_payload(text: &str, facets: Option<Vec<Value>>) -> Value {
    let mut record = Map::new();
    record.insert("text".to_string(), json!(text));
    if let Some(facets) = facets {
        record.insert("facets".to_string(), Value::Array(facets));
    }
    Value::Object(record)
}

/// Single-image embed referencing the uploaded blob.
fn build_image_embed(blob: Value, alttext: &str, dimensions: Dimensions) -> Value {
    json!({
        "$type": "app.bsky.embed.images",
        "images": [{
            "alt": alttext,
            "image": blob,
            "aspectRatio": {
                "width": dimensions.width,
                "height": dimensions.height,
            },
        }],
    })
}

/// The reply starts its own thread under the image post, so root and parent
/// both reference it.
fn build_reply_ref(image_post: &PostRef) -> Value {
    let reference = json!({ "uri": image_post.uri, "cid": image_post.cid });
    json!({ "root": reference, "parent": reference })
}

fn build_reply_text(link_path: &str, was_cropped: bool) -> String {
    if was_cropped {
        format!("Read the full post at {SITE_BASE_URL}/{link_path}")
    } else {
        format!("Originally posted at {SITE_BASE_URL}/{link_path}")
    }
}
