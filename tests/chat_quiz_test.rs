mod common;

use std::sync::Arc;

use common::{build_state, RecordingMailer, TestSite};
use mentallify::routes::configure_routes;
use serde_json::{json, Value};

fn body_json(body: &[u8]) -> Value {
    serde_json::from_slice(body).expect("response body should be JSON")
}

#[tokio::test]
async fn test_chat_rejects_empty_message() {
    let site = TestSite::new();
    let routes = configure_routes(build_state(
        site.default_config(),
        Arc::new(RecordingMailer::default()),
    ));

    let res = warp::test::request()
        .method("POST")
        .path("/chat")
        .json(&json!({ "message": "   " }))
        .reply(&routes)
        .await;

    assert_eq!(res.status(), 400);
    assert_eq!(
        body_json(res.body()),
        json!({ "reply": "Please enter a message." })
    );
}

#[tokio::test]
async fn test_chat_malformed_body_counts_as_empty() {
    let site = TestSite::new();
    let routes = configure_routes(build_state(
        site.default_config(),
        Arc::new(RecordingMailer::default()),
    ));

    let res = warp::test::request()
        .method("POST")
        .path("/chat")
        .header("content-type", "application/json")
        .body("this is not json")
        .reply(&routes)
        .await;

    assert_eq!(res.status(), 400);
}

#[tokio::test]
async fn test_oversized_body_is_rejected() {
    let site = TestSite::new();
    let routes = configure_routes(build_state(
        site.default_config(),
        Arc::new(RecordingMailer::default()),
    ));

    let message = "a".repeat(70 * 1024);
    let res = warp::test::request()
        .method("POST")
        .path("/chat")
        .json(&json!({ "message": message }))
        .reply(&routes)
        .await;

    assert_eq!(res.status(), 413);
    assert_eq!(
        body_json(res.body()),
        json!({ "error": "Request body too large" })
    );
}

#[tokio::test]
async fn test_chat_uses_keyword_fallback_without_model() {
    let site = TestSite::new();
    let routes = configure_routes(build_state(
        site.default_config(),
        Arc::new(RecordingMailer::default()),
    ));

    let res = warp::test::request()
        .method("POST")
        .path("/chat")
        .json(&json!({ "message": "I keep having panic attacks at night" }))
        .reply(&routes)
        .await;

    assert_eq!(res.status(), 200);
    let body = body_json(res.body());
    assert_eq!(body["label"], "fallback");
    assert_eq!(body["probs"], json!([]));
    let reply = body["reply"].as_str().unwrap();
    assert!(reply.contains("Anxiety"), "unexpected reply: {reply}");
}

#[tokio::test]
async fn test_quiz_questions_respects_requested_count() {
    let site = TestSite::new();
    let routes = configure_routes(build_state(
        site.default_config(),
        Arc::new(RecordingMailer::default()),
    ));

    let res = warp::test::request()
        .path("/quiz_questions?n=2")
        .reply(&routes)
        .await;
    assert_eq!(res.status(), 200);
    let questions = body_json(res.body())["questions"].as_array().unwrap().clone();
    assert_eq!(questions.len(), 2);
    for q in &questions {
        assert!(q["text"].is_string());
        assert!(q["symptom_key"].is_string());
    }

    // More than the bank holds returns every question once
    let res = warp::test::request()
        .path("/quiz_questions?n=50")
        .reply(&routes)
        .await;
    let questions = body_json(res.body())["questions"].as_array().unwrap().clone();
    assert_eq!(questions.len(), 3);
    let mut keys: Vec<&str> = questions
        .iter()
        .map(|q| q["symptom_key"].as_str().unwrap())
        .collect();
    keys.sort();
    assert_eq!(keys, vec!["excessive worry", "feeling sad", "loss of interest"]);
}

#[tokio::test]
async fn test_quiz_questions_bad_count_uses_default() {
    let site = TestSite::new();
    let routes = configure_routes(build_state(
        site.default_config(),
        Arc::new(RecordingMailer::default()),
    ));

    let res = warp::test::request()
        .path("/quiz_questions?n=lots")
        .reply(&routes)
        .await;

    assert_eq!(res.status(), 200);
    assert_eq!(body_json(res.body())["questions"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_quiz_questions_fall_back_to_builtin_bank() {
    let site = TestSite::new();
    site.remove("data/symptom_bank.json");
    let routes = configure_routes(build_state(
        site.default_config(),
        Arc::new(RecordingMailer::default()),
    ));

    let res = warp::test::request()
        .path("/quiz_questions")
        .reply(&routes)
        .await;

    assert_eq!(res.status(), 200);
    assert_eq!(body_json(res.body())["questions"].as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn test_quiz_result_ranks_diseases() {
    let site = TestSite::new();
    let routes = configure_routes(build_state(
        site.default_config(),
        Arc::new(RecordingMailer::default()),
    ));

    let res = warp::test::request()
        .method("POST")
        .path("/quiz_result")
        .json(&json!({ "yes_symptoms": ["feeling sad", "loss of interest", "panic attacks"] }))
        .reply(&routes)
        .await;

    assert_eq!(res.status(), 200);
    let results = body_json(res.body())["results"].as_array().unwrap().clone();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0]["disease"], "Depression");
    assert_eq!(results[0]["score"], 1.0);
    assert_eq!(
        results[0]["matched_symptoms"],
        json!(["feeling sad", "loss of interest"])
    );
    assert_eq!(results[0]["precautions"], "Talk to someone");
    assert_eq!(results[1]["disease"], "Anxiety");
    assert_eq!(results[1]["score"], 0.5);
}

#[tokio::test]
async fn test_quiz_result_without_answers_scores_zero() {
    let site = TestSite::new();
    let routes = configure_routes(build_state(
        site.default_config(),
        Arc::new(RecordingMailer::default()),
    ));

    let res = warp::test::request()
        .method("POST")
        .path("/quiz_result")
        .json(&json!({}))
        .reply(&routes)
        .await;

    assert_eq!(res.status(), 200);
    let results = body_json(res.body())["results"].as_array().unwrap().clone();
    assert_eq!(results.len(), 2);
    assert!(results.iter().all(|r| r["score"] == 0.0));
}
