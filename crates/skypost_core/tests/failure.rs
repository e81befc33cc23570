use std::sync::Once;

use serde_json::json;
use skypost_core::{update, Cmd, Dimensions, Model, Msg, PostRef};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(skypost_logging::initialize_for_tests);
}

fn post_ref() -> PostRef {
    PostRef {
        uri: "at://img".to_string(),
        cid: "c".to_string(),
    }
}

fn non_terminal_states() -> Vec<Model> {
    vec![
        Model::TextDetectingFacets { user_facets: None },
        Model::TextPosting,
        Model::ImgScreenshotting {
            text: "t".to_string(),
            alttext: "a".to_string(),
            link_path: "p".to_string(),
        },
        Model::ImgReadingPng {
            text: "t".to_string(),
            alttext: "a".to_string(),
            link_path: "p".to_string(),
            was_cropped: false,
        },
        Model::ImgUploadingBlob {
            text: "t".to_string(),
            alttext: "a".to_string(),
            link_path: "p".to_string(),
            was_cropped: false,
            dimensions: Dimensions {
                width: 1,
                height: 1,
            },
        },
        Model::ImgDetectingFacets {
            alttext: "a".to_string(),
            link_path: "p".to_string(),
            was_cropped: false,
            dimensions: Dimensions {
                width: 1,
                height: 1,
            },
            blob: json!({}),
        },
        Model::ImgPostingImage {
            link_path: "p".to_string(),
            was_cropped: false,
        },
        Model::ImgDetectingReplyFacets {
            image_post: post_ref(),
        },
        Model::ImgPostingReply {
            image_post: post_ref(),
        },
    ]
}

#[test]
fn failed_msg_fails_every_non_terminal_state() {
    init_logging();
    for state in non_terminal_states() {
        let tag = state.tag();
        let (next, cmd) = update(
            state,
            Msg::Failed {
                error: "boom".to_string(),
            },
        );
        assert_eq!(
            next,
            Model::Failed {
                error: "boom".to_string()
            },
            "state {tag} did not absorb failure"
        );
        assert_eq!(cmd, Cmd::NoOp);
    }
}

#[test]
fn unexpected_msg_fails_with_protocol_error() {
    init_logging();
    // TextPosting expects Published, not a screenshot result.
    let (next, cmd) = update(
        Model::TextPosting,
        Msg::ScreenshotTaken {
            path: "x.png".to_string(),
            was_cropped: false,
        },
    );

    match next {
        Model::Failed { error } => {
            assert!(error.contains("screenshot_taken"), "error was: {error}");
            assert!(error.contains("text_posting"), "error was: {error}");
        }
        other => panic!("expected Failed, got {other:?}"),
    }
    assert_eq!(cmd, Cmd::NoOp);
}

#[test]
fn done_is_a_fixed_point() {
    init_logging();
    let done = Model::Done {
        message: "ok".to_string(),
        uri: "at://x".to_string(),
    };

    for msg in [
        Msg::Published {
            uri: "at://other".to_string(),
            cid: "c".to_string(),
        },
        Msg::Failed {
            error: "late failure".to_string(),
        },
        Msg::FacetsDetected {
            text: "t".to_string(),
            facets: None,
        },
    ] {
        let (next, cmd) = update(done.clone(), msg);
        assert_eq!(next, done);
        assert_eq!(cmd, Cmd::NoOp);
    }
}

#[test]
fn failed_is_a_fixed_point() {
    init_logging();
    let failed = Model::Failed {
        error: "original error".to_string(),
    };

    for msg in [
        Msg::Failed {
            error: "second error".to_string(),
        },
        Msg::Published {
            uri: "at://x".to_string(),
            cid: "c".to_string(),
        },
    ] {
        let (next, cmd) = update(failed.clone(), msg);
        assert_eq!(next, failed, "terminal Failed must keep its first error");
        assert_eq!(cmd, Cmd::NoOp);
    }
}
