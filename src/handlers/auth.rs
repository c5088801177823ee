// Google sign-in and session handlers

use std::collections::HashMap;
use std::convert::Infallible;

use chrono::Utc;
use tracing::{error, info};
use warp::http::StatusCode;
use warp::reply::Response;
use warp::Reply;

use super::{json_reply, text_reply};
use crate::auth::{render_bridge_page, AuthError};
use crate::models::{AckResponse, AuthUrlResponse, ErrorResponse};
use crate::state::SharedState;

pub const NOT_CONFIGURED_MESSAGE: &str =
    "OAuth not configured on server. Check environment variables.";

/// GET /auth/google
pub async fn auth_start_handler(
    state: SharedState,
    query: HashMap<String, String>,
) -> Result<Response, Infallible> {
    let Some(auth) = state.auth.as_ref() else {
        return Ok(json_reply(
            &ErrorResponse::new(NOT_CONFIGURED_MESSAGE),
            StatusCode::INTERNAL_SERVER_ERROR,
        ));
    };

    let redirect_uri = query
        .get("redirect_uri")
        .filter(|uri| !uri.is_empty())
        .unwrap_or(&auth.redirect_uri);

    match auth.oauth.authorization_url(redirect_uri) {
        Ok(auth_url) => Ok(json_reply(&AuthUrlResponse { auth_url }, StatusCode::OK)),
        Err(e) => {
            error!(error = %e, "failed to build authorization URL");
            Ok(json_reply(
                &ErrorResponse::new(NOT_CONFIGURED_MESSAGE),
                StatusCode::INTERNAL_SERVER_ERROR,
            ))
        }
    }
}

/// GET /auth/google/callback
pub async fn auth_callback_handler(
    state: SharedState,
    query: HashMap<String, String>,
) -> Result<Response, Infallible> {
    let Some(code) = query.get("code").filter(|c| !c.is_empty()) else {
        return Ok(text_reply("Missing code parameter", StatusCode::BAD_REQUEST));
    };

    let Some(auth) = state.auth.as_ref() else {
        error!("callback hit without OAuth configuration");
        return Ok(text_reply(
            "Server not configured for sessions",
            StatusCode::INTERNAL_SERVER_ERROR,
        ));
    };

    let access_token = match auth.oauth.exchange_code(code, &auth.redirect_uri).await {
        Ok(token) => token,
        Err(AuthError::MissingAccessToken) => {
            error!("token response had no access_token");
            return Ok(text_reply(
                "Token exchange didn't return access token",
                StatusCode::INTERNAL_SERVER_ERROR,
            ));
        }
        Err(e) => {
            error!(error = %e, "token exchange failed");
            return Ok(text_reply(
                "Token exchange failed",
                StatusCode::INTERNAL_SERVER_ERROR,
            ));
        }
    };

    let profile = match auth.oauth.fetch_profile(&access_token).await {
        Ok(profile) => profile,
        Err(e) => {
            error!(error = %e, "userinfo fetch failed");
            return Ok(text_reply(
                "Failed to fetch user info",
                StatusCode::INTERNAL_SERVER_ERROR,
            ));
        }
    };

    let token = match auth.sessions.issue(&profile, Utc::now()) {
        Ok(token) => token,
        Err(e) => {
            error!(error = %e, "session signing failed");
            return Ok(text_reply(
                "Server not configured for sessions",
                StatusCode::INTERNAL_SERVER_ERROR,
            ));
        }
    };

    info!(email = profile.email.as_deref().unwrap_or(""), "user signed in");
    Ok(warp::reply::html(render_bridge_page(&token, &profile)).into_response())
}

/// GET /auth/session with `Authorization: Bearer <token>`
pub async fn session_handler(
    state: SharedState,
    authorization: Option<String>,
) -> Result<Response, Infallible> {
    let Some(auth) = state.auth.as_ref() else {
        return Ok(json_reply(
            &ErrorResponse::new(NOT_CONFIGURED_MESSAGE),
            StatusCode::INTERNAL_SERVER_ERROR,
        ));
    };

    let Some(token) = authorization.as_deref().and_then(bearer_token) else {
        return Ok(json_reply(
            &ErrorResponse::new("Missing bearer token"),
            StatusCode::UNAUTHORIZED,
        ));
    };

    match auth.sessions.verify(token) {
        Ok(claims) => Ok(json_reply(&claims, StatusCode::OK)),
        Err(e) => Ok(json_reply(
            &ErrorResponse::new(e.to_string()),
            StatusCode::UNAUTHORIZED,
        )),
    }
}

/// POST /auth/logout; sessions live only in the browser
pub async fn logout_handler() -> Result<Response, Infallible> {
    Ok(json_reply(&AckResponse::ok("Signed out"), StatusCode::OK))
}

fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim().split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}
