//! Skypost core: pure posting workflow state machine.
//!
//! Everything in this crate is side-effect free. The workflow is expressed as
//! `update(Model, Msg) -> (Model, Cmd)`: the engine crate executes each `Cmd`
//! against the real world and feeds the resulting `Msg` back in.
mod cmd;
mod link;
mod model;
mod msg;
mod screenshot;
mod text;
mod update;

pub use cmd::Cmd;
pub use link::{link_path, padding_for, parse_link, slugify, LinkType};
pub use model::{Dimensions, Model, PostRef};
pub use msg::Msg;
pub use screenshot::{
    article_config, stream_config, Padding, ScreenshotConfig, PREVIEW_BASE_URL, SCREENSHOT_DIR,
};
pub use text::{grapheme_len, merge_facets, GRAPHEME_LIMIT};
pub use update::{init_image_post, init_text_post, update, SITE_BASE_URL};
