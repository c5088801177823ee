// GET /quiz_questions and POST /quiz_result handlers

use std::collections::HashMap;
use std::convert::Infallible;

use warp::http::StatusCode;
use warp::reply::Response;

use super::json_reply;
use crate::models::{QuestionsResponse, QuizResultRequest, QuizResultResponse};
use crate::state::SharedState;
use crate::symptoms::score_answers;

pub const DEFAULT_QUESTION_COUNT: usize = 12;

/// `n` from the query string; anything unparsable, negative counts included, means the default
pub fn requested_count(query: &HashMap<String, String>) -> usize {
    query
        .get("n")
        .and_then(|n| n.trim().parse().ok())
        .unwrap_or(DEFAULT_QUESTION_COUNT)
}

pub async fn quiz_questions_handler(
    state: SharedState,
    query: HashMap<String, String>,
) -> Result<Response, Infallible> {
    let n = requested_count(&query);
    let questions = {
        let mut rng = rand::thread_rng();
        state.symptom_bank.sample_questions(n, &mut rng)
    };
    Ok(json_reply(&QuestionsResponse { questions }, StatusCode::OK))
}

pub async fn quiz_result_handler(
    state: SharedState,
    request: QuizResultRequest,
) -> Result<Response, Infallible> {
    let yes_symptoms = request.yes_symptoms.unwrap_or_default();
    let results = score_answers(&state.symptom_bank, &yes_symptoms);
    Ok(json_reply(&QuizResultResponse { results }, StatusCode::OK))
}
