// Handlers module

pub mod auth;
pub mod chat;
pub mod contact;
pub mod files;
pub mod quiz;

pub use auth::{auth_callback_handler, auth_start_handler, logout_handler, session_handler};
pub use chat::chat_handler;
pub use contact::{contact_page_handler, send_contact_handler};
pub use files::{frontend_handler, models_handler};
pub use quiz::{quiz_questions_handler, quiz_result_handler};

use serde::Serialize;
use warp::http::StatusCode;
use warp::reply::Response;
use warp::Reply;

pub(crate) fn json_reply<T: Serialize>(body: &T, status: StatusCode) -> Response {
    warp::reply::with_status(warp::reply::json(body), status).into_response()
}

pub(crate) fn text_reply(body: &'static str, status: StatusCode) -> Response {
    warp::reply::with_status(body, status).into_response()
}
