use std::sync::Arc;

use serde_json::json;
use tracing_subscriber::EnvFilter;
use vercel_runtime::{run, Body, Error, Request, Response, StatusCode};

use merlin_api::http::cors::{add_cors, pick_allow_origin};
use merlin_api::http::response::{error_response, json_response};
use merlin_api::models::chat::ChatRequest;
use merlin_api::services::chat::ChatService;
use merlin_api::AppError;

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    // Config and FAQ dataset are resolved once; a missing credential or a
    // broken dataset stops the function before it serves anything.
    let service = Arc::new(ChatService::from_env()?);

    run(move |req: Request| {
        let service = Arc::clone(&service);
        async move { handler(req, service).await }
    })
    .await
}

pub async fn handler(req: Request, service: Arc<ChatService>) -> Result<Response<Body>, Error> {
    let allow_origin =
        pick_allow_origin(req.headers().get("origin").and_then(|v| v.to_str().ok()));

    // Preflight: CORS headers only, no body.
    if req.method().as_str() == "OPTIONS" {
        let resp = Response::builder()
            .status(StatusCode::OK)
            .body(Body::Empty)?;
        return Ok(add_cors(resp, allow_origin));
    }

    if req.method().as_str() != "POST" {
        let resp = Response::builder()
            .status(StatusCode::METHOD_NOT_ALLOWED)
            .header("Allow", "POST, OPTIONS")
            .header("Content-Type", "application/json")
            .body(json!({"error": "Method Not Allowed"}).to_string().into())?;
        return Ok(add_cors(resp, allow_origin));
    }

    let outcome = match parse_body(req.body()) {
        Ok(request) => service.create_reply(request).await,
        Err(err) => Err(err),
    };

    match outcome {
        Ok(reply) => Ok(add_cors(json_response(StatusCode::OK, &reply)?, allow_origin)),
        Err(err) => {
            tracing::warn!(error = %err, "chat request failed");
            let (status, body) = error_response(&err);
            Ok(add_cors(json_response(status, &body)?, allow_origin))
        }
    }
}

// The widget sends JSON; an empty body just means an empty conversation.
fn parse_body(body: &[u8]) -> merlin_api::Result<ChatRequest> {
    if body.is_empty() {
        return Ok(ChatRequest::default());
    }
    serde_json::from_slice(body)
        .map_err(|e| AppError::Validation(format!("invalid JSON body: {e}")))
}
