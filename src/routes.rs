// Route definitions and handlers

use std::collections::HashMap;
use std::convert::Infallible;

use bytes::Bytes;
use serde::de::DeserializeOwned;
use warp::{Filter, Rejection};

use crate::error::handle_rejection;
use crate::handlers;
use crate::state::SharedState;

/// Largest JSON body accepted by the POST endpoints
pub const MAX_BODY_BYTES: u64 = 64 * 1024;

fn with_state(
    state: SharedState,
) -> impl Filter<Extract = (SharedState,), Error = Infallible> + Clone {
    warp::any().map(move || state.clone())
}

/// JSON body that never rejects: malformed input parses as the default value
fn lenient_json<T>() -> impl Filter<Extract = (T,), Error = Rejection> + Clone
where
    T: DeserializeOwned + Default + Send + 'static,
{
    warp::body::content_length_limit(MAX_BODY_BYTES)
        .and(warp::body::bytes())
        .map(|body: Bytes| serde_json::from_slice(&body).unwrap_or_default())
}

fn query_map() -> impl Filter<Extract = (HashMap<String, String>,), Error = Infallible> + Clone {
    warp::query::<HashMap<String, String>>()
        .or(warp::any().map(HashMap::new))
        .unify()
}

pub fn configure_routes(
    state: SharedState,
) -> impl Filter<Extract = impl warp::Reply, Error = Infallible> + Clone {
    // POST /chat
    let chat = warp::path("chat")
        .and(warp::path::end())
        .and(warp::post())
        .and(with_state(state.clone()))
        .and(lenient_json())
        .and_then(handlers::chat_handler);

    // GET /quiz_questions?n=
    let quiz_questions = warp::path("quiz_questions")
        .and(warp::path::end())
        .and(warp::get())
        .and(with_state(state.clone()))
        .and(query_map())
        .and_then(handlers::quiz_questions_handler);

    // POST /quiz_result
    let quiz_result = warp::path("quiz_result")
        .and(warp::path::end())
        .and(warp::post())
        .and(with_state(state.clone()))
        .and(lenient_json())
        .and_then(handlers::quiz_result_handler);

    // GET /contact
    let contact_page = warp::path("contact")
        .and(warp::path::end())
        .and(warp::get())
        .and(with_state(state.clone()))
        .and_then(handlers::contact_page_handler);

    // POST /send_contact
    let send_contact = warp::path("send_contact")
        .and(warp::path::end())
        .and(warp::post())
        .and(with_state(state.clone()))
        .and(lenient_json())
        .and_then(handlers::send_contact_handler);

    // GET /auth/google
    let auth_start = warp::path("auth")
        .and(warp::path("google"))
        .and(warp::path::end())
        .and(warp::get())
        .and(with_state(state.clone()))
        .and(query_map())
        .and_then(handlers::auth_start_handler);

    // GET /auth/google/callback
    let auth_callback = warp::path("auth")
        .and(warp::path("google"))
        .and(warp::path("callback"))
        .and(warp::path::end())
        .and(warp::get())
        .and(with_state(state.clone()))
        .and(query_map())
        .and_then(handlers::auth_callback_handler);

    // GET /auth/session
    let session = warp::path("auth")
        .and(warp::path("session"))
        .and(warp::path::end())
        .and(warp::get())
        .and(with_state(state.clone()))
        .and(warp::header::optional::<String>("authorization"))
        .and_then(handlers::session_handler);

    // POST /auth/logout
    let logout = warp::path("auth")
        .and(warp::path("logout"))
        .and(warp::path::end())
        .and(warp::post())
        .and_then(handlers::logout_handler);

    // GET /models/<file>
    let models = warp::path("models")
        .and(warp::get())
        .and(with_state(state.clone()))
        .and(warp::path::tail())
        .and_then(handlers::models_handler);

    // GET /<path>, keep last
    let frontend = warp::get()
        .and(with_state(state))
        .and(warp::path::tail())
        .and_then(handlers::frontend_handler);

    let cors = warp::cors()
        .allow_any_origin()
        .allow_methods(vec!["GET", "POST", "OPTIONS"])
        .allow_headers(vec!["content-type", "authorization"]);

    let request_log = warp::log::custom(|info: warp::log::Info| {
        tracing::info!(
            method = %info.method(),
            path = info.path(),
            status = info.status().as_u16(),
            elapsed_ms = info.elapsed().as_millis() as u64,
            "request"
        );
    });

    chat.or(quiz_questions)
        .unify()
        .or(quiz_result)
        .unify()
        .or(contact_page)
        .unify()
        .or(send_contact)
        .unify()
        .or(auth_start)
        .unify()
        .or(auth_callback)
        .unify()
        .or(session)
        .unify()
        .or(logout)
        .unify()
        .or(models)
        .unify()
        .or(frontend)
        .unify()
        .with(cors)
        .recover(handle_rejection)
        .with(request_log)
}
