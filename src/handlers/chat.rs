// POST /chat handler

use std::convert::Infallible;

use tracing::{debug, warn};
use warp::http::StatusCode;
use warp::reply::Response;

use super::json_reply;
use crate::classifier::{keyword_reply, TextClassifier};
use crate::models::{ChatPrompt, ChatRequest, ChatResponse};
use crate::state::SharedState;

pub const FALLBACK_LABEL: &str = "fallback";
pub const EMPTY_MESSAGE_REPLY: &str = "Please enter a message.";

pub async fn chat_handler(
    state: SharedState,
    request: ChatRequest,
) -> Result<Response, Infallible> {
    let message = request.message.as_deref().unwrap_or("").trim();
    if message.is_empty() {
        return Ok(json_reply(
            &ChatPrompt {
                reply: EMPTY_MESSAGE_REPLY.to_string(),
            },
            StatusCode::BAD_REQUEST,
        ));
    }

    let response = respond(state.classifier.as_ref(), message);
    debug!(label = %response.label, "chat reply");
    Ok(json_reply(&response, StatusCode::OK))
}

/// Classify with the model when available, otherwise match keywords
pub fn respond(classifier: Option<&TextClassifier>, message: &str) -> ChatResponse {
    if let Some(classifier) = classifier {
        match classifier.predict(message) {
            Ok(prediction) => {
                return ChatResponse {
                    reply: format!(
                        "I detect text patterns most associated with {} (informational only).",
                        prediction.label
                    ),
                    label: prediction.label,
                    probs: prediction.probabilities,
                }
            }
            Err(e) => warn!(error = %e, "inference failed, using keyword fallback"),
        }
    }

    ChatResponse {
        reply: keyword_reply(message),
        label: FALLBACK_LABEL.to_string(),
        probs: Vec::new(),
    }
}
