// GET /contact and POST /send_contact handlers

use std::convert::Infallible;

use chrono::Utc;
use tracing::{error, info, warn};
use warp::http::StatusCode;
use warp::reply::Response;
use warp::Reply;

use super::{json_reply, text_reply};
use crate::contact::ContactMessage;
use crate::models::{AckResponse, ContactRequest};
use crate::state::SharedState;

pub const CONTACT_PAGE: &str = "contact.html";
pub const CONTACT_EMAIL_PLACEHOLDER: &str = "{{ site_contact_email }}";

pub async fn contact_page_handler(state: SharedState) -> Result<Response, Infallible> {
    let path = state.config.frontend_root.join(CONTACT_PAGE);
    if !tokio::fs::try_exists(&path).await.unwrap_or(false) {
        return Ok(text_reply(
            "contact.html not found on server",
            StatusCode::INTERNAL_SERVER_ERROR,
        ));
    }

    match tokio::fs::read_to_string(&path).await {
        Ok(html) => {
            let html = html.replace(CONTACT_EMAIL_PLACEHOLDER, &state.config.site_contact_email);
            Ok(warp::reply::html(html).into_response())
        }
        Err(e) => {
            error!(path = %path.display(), error = %e, "failed to read contact page");
            Ok(text_reply(
                "Failed to render contact page",
                StatusCode::INTERNAL_SERVER_ERROR,
            ))
        }
    }
}

pub async fn send_contact_handler(
    state: SharedState,
    request: ContactRequest,
) -> Result<Response, Infallible> {
    let Some(message) = ContactMessage::new(
        request.name.as_deref().unwrap_or(""),
        request.email.as_deref().unwrap_or(""),
        request.message.as_deref().unwrap_or(""),
        Utc::now(),
    ) else {
        return Ok(json_reply(
            &AckResponse::failed("Please provide name, email and message."),
            StatusCode::BAD_REQUEST,
        ));
    };

    if let Err(e) = state.contact_log.append_async(message.clone()).await {
        warn!(error = %e, "contact backup failed");
    }

    if let Err(e) = state.mailer.send_contact(&message).await {
        error!(error = %e, "failed to send contact email");
        return Ok(json_reply(
            &AckResponse::failed("Failed to send email. Check server logs."),
            StatusCode::INTERNAL_SERVER_ERROR,
        ));
    }

    info!(from = %message.email, "contact message sent");
    Ok(json_reply(
        &AckResponse::ok("Message sent. We'll get back to you soon."),
        StatusCode::OK,
    ))
}
