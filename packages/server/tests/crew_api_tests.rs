//! Integration tests for the crew job API.
//!
//! - POST /api/crew: submit a research job
//! - GET /api/crew/:job_id: poll status, result and events
//! - GET /health: job counts

mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use chrono::DateTime;
use crew::testing::{ScriptedModel, ScriptedReply};
use serde_json::json;
use test_context::test_context;
use tokio::sync::Semaphore;

use crate::common::TestHarness;

fn event_data(body: &serde_json::Value) -> Vec<String> {
    body["events"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["data"].as_str().unwrap().to_string())
        .collect()
}

// =============================================================================
// Submit
// =============================================================================

#[tokio::test]
async fn submitted_job_is_immediately_running() {
    let gate = Arc::new(Semaphore::new(0));
    let ctx = TestHarness::with_model(ScriptedModel::replying("{}").gated(gate.clone()));

    let job_id = ctx.submit(&["Acme"], &["Engineer"]).await;

    let (status, body) = ctx.get(&format!("/api/crew/{}", job_id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["job_id"], job_id.as_str());
    assert_eq!(body["status"], "RUNNING");
    assert!(body["result"].is_null());

    // The crew has started but is blocked on its first model call
    let body = ctx
        .wait_for(&job_id, |b| event_data(b).contains(&"CREW_STARTED".to_string()))
        .await;
    assert_eq!(body["status"], "RUNNING");
    assert_eq!(event_data(&body), vec!["CREW_STARTED"]);

    gate.add_permits(1);
    let body = ctx.wait_until_terminal(&job_id).await;
    assert_eq!(body["status"], "COMPLETE");
    assert_eq!(body["result"], json!({}));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn submit_returns_success_and_job_id(ctx: &TestHarness) {
    let (status, body) = ctx
        .post_json(
            "/api/crew",
            json!({ "companies": ["Acme"], "positions": ["Engineer"] }),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    let job_id = body["job_id"].as_str().unwrap();
    assert!(uuid::Uuid::parse_str(job_id).is_ok());
    assert!(ctx.job_exists(job_id));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn missing_fields_are_rejected_without_creating_a_job(ctx: &TestHarness) {
    for body in [
        json!({ "positions": ["Engineer"] }),
        json!({ "companies": ["Acme"] }),
        json!({}),
    ] {
        let (status, response) = ctx.post_json("/api/crew", body.clone()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body {} was accepted", body);
        assert!(response["error"].is_string());
    }

    assert_eq!(ctx.job_count(), 0);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn malformed_bodies_are_rejected(ctx: &TestHarness) {
    let (status, response) = ctx
        .post_raw("/api/crew", "application/json", "{\"companies\": [")
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(response["error"].is_string());

    let (status, _) = ctx
        .post_raw(
            "/api/crew",
            "text/plain",
            r#"{"companies": ["Acme"], "positions": ["CEO"]}"#,
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = ctx
        .post_raw("/api/crew", "application/json", r#"{"companies": "Acme", "positions": []}"#)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert_eq!(ctx.job_count(), 0);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn empty_lists_are_accepted(ctx: &TestHarness) {
    let job_id = ctx.submit(&[], &[]).await;

    let body = ctx.wait_until_terminal(&job_id).await;
    assert_eq!(body["status"], "COMPLETE");
}

// =============================================================================
// Fetch
// =============================================================================

#[test_context(TestHarness)]
#[tokio::test]
async fn unknown_job_is_not_found(ctx: &TestHarness) {
    let (status, body) = ctx.get("/api/crew/does-not-exist").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "Job Not Found" }));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn completed_job_returns_parsed_result(ctx: &TestHarness) {
    let job_id = ctx.submit(&["Acme"], &["Engineer"]).await;

    let body = ctx.wait_until_terminal(&job_id).await;

    assert_eq!(body["status"], "COMPLETE");
    assert_eq!(body["result"], json!({ "Acme": { "Engineer": { "name": "MISSING" } } }));
}

#[tokio::test]
async fn fenced_result_is_unwrapped() {
    let ctx = TestHarness::with_model(ScriptedModel::replying(
        "```json\n{\"Acme\": {\"CEO\": {\"name\": \"Jane Doe\"}}}\n```",
    ));
    let job_id = ctx.submit(&["Acme"], &["CEO"]).await;

    let body = ctx.wait_until_terminal(&job_id).await;

    assert_eq!(body["result"]["Acme"]["CEO"]["name"], "Jane Doe");
}

#[tokio::test]
async fn plain_text_result_is_returned_verbatim() {
    let ctx = TestHarness::with_model(ScriptedModel::replying("Nothing found."));
    let job_id = ctx.submit(&["Acme"], &["CEO"]).await;

    let body = ctx.wait_until_terminal(&job_id).await;

    assert_eq!(body["status"], "COMPLETE");
    assert_eq!(body["result"], "Nothing found.");
}

#[tokio::test]
async fn failing_crew_marks_job_as_error() {
    let ctx = TestHarness::with_model(ScriptedModel::failing("provider exploded"));
    let job_id = ctx.submit(&["Acme"], &["Engineer"]).await;

    let body = ctx.wait_until_terminal(&job_id).await;

    assert_eq!(body["status"], "ERROR");
    assert_eq!(body["result"], "API error: provider exploded");
    assert_eq!(
        event_data(&body),
        vec!["CREW_STARTED", "CREW_ERROR: API error: provider exploded"]
    );
}

#[tokio::test]
async fn terminal_state_is_stable_across_fetches() {
    let ctx = TestHarness::with_model(ScriptedModel::failing("quota exceeded"));
    let job_id = ctx.submit(&["Acme"], &["Engineer"]).await;
    let first = ctx.wait_until_terminal(&job_id).await;

    for _ in 0..3 {
        let (status, again) = ctx.get(&format!("/api/crew/{}", job_id)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(again, first);
    }
}

#[tokio::test]
async fn events_are_recorded_in_order() {
    let ctx = TestHarness::with_model(ScriptedModel::from_script(vec![
        ScriptedReply::text("Acme CEO: Jane Doe"),
        ScriptedReply::text("Globex CEO: Hank Scorpio"),
        ScriptedReply::text("{\"done\": true}"),
    ]));
    let job_id = ctx.submit(&["Acme", "Globex"], &["CEO"]).await;

    let body = ctx.wait_until_terminal(&job_id).await;

    assert_eq!(body["status"], "COMPLETE");
    assert_eq!(
        event_data(&body),
        vec![
            "CREW_STARTED",
            "TASK_COMPLETED: research:Acme\n\nAcme CEO: Jane Doe",
            "TASK_COMPLETED: research:Globex\n\nGlobex CEO: Hank Scorpio",
            "TASK_COMPLETED: manage_research\n\n{\"done\": true}",
            "CREW_COMPLETED",
        ]
    );

    let timestamps: Vec<_> = body["events"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| DateTime::parse_from_rfc3339(e["timestamp"].as_str().unwrap()).unwrap())
        .collect();
    assert!(timestamps.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(ctx.model.call_count(), 3);
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn health_reports_job_counts() {
    let ctx = TestHarness::with_model(ScriptedModel::failing("down"));
    let job_id = ctx.submit(&["Acme"], &["CEO"]).await;
    ctx.wait_until_terminal(&job_id).await;

    let (status, body) = ctx.get("/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "status": "healthy", "jobs": { "running": 0, "complete": 0, "error": 1 } })
    );
}
