use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use skypost_core::{init_image_post, init_text_post, Model};
use skypost_engine::{run, Interpreter};

pub fn router(interpreter: Arc<Interpreter>) -> Router {
    Router::new()
        .route("/post", post(post_text))
        .route("/post-image", post(post_image))
        .with_state(interpreter)
}

#[derive(Debug, Deserialize)]
struct PostTextRequest {
    text: String,
    facets: Option<Vec<Value>>,
}

#[derive(Debug, Deserialize)]
struct PostImageRequest {
    text: String,
    alttext: String,
    link: String,
}

#[derive(Debug, Serialize, PartialEq)]
struct PostResponse {
    success: bool,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    uri: Option<String>,
}

async fn post_text(
    State(interpreter): State<Arc<Interpreter>>,
    Json(request): Json<PostTextRequest>,
) -> (StatusCode, Json<PostResponse>) {
    log::info!("POST /post ({} bytes of text)", request.text.len());
    let (model, cmd) = init_text_post(&request.text, request.facets);
    let outcome = run(&interpreter, model, cmd).await;
    respond(outcome)
}

async fn post_image(
    State(interpreter): State<Arc<Interpreter>>,
    Json(request): Json<PostImageRequest>,
) -> (StatusCode, Json<PostResponse>) {
    log::info!("POST /post-image (link: {})", request.link);
    let (model, cmd) = init_image_post(&request.text, &request.alttext, &request.link);
    let outcome = run(&interpreter, model, cmd).await;
    respond(outcome)
}

/// Map the workflow's terminal state onto the wire. The dispatch loop only
/// stops on terminal states, so the last arm is defensive.
fn respond(outcome: Model) -> (StatusCode, Json<PostResponse>) {
    let (status, response) = match outcome {
        Model::Done { message, uri } => (
            StatusCode::OK,
            PostResponse {
                success: true,
                message,
                uri: Some(uri),
            },
        ),
        Model::Failed { error } => (
            StatusCode::BAD_REQUEST,
            PostResponse {
                success: false,
                message: error,
                uri: None,
            },
        ),
        other => (
            StatusCode::INTERNAL_SERVER_ERROR,
            PostResponse {
                success: false,
                message: format!("workflow halted in non-terminal state {}", other.tag()),
                uri: None,
            },
        ),
    };
    (status, Json(response))
}
