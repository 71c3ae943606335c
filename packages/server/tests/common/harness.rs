//! Test harness for driving the HTTP API in-process.
//!
//! Requests go straight through the router with `tower::ServiceExt::oneshot`,
//! so no port is bound. The LLM is a scripted model from the `crew` testing
//! feature.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::{header::CONTENT_TYPE, Request, StatusCode},
    Router,
};
use crew::testing::ScriptedModel;
use serde_json::Value;
use server_core::kernel::{JobId, JobStore, ServerDeps};
use server_core::server::{build_app_with_state, AppState};
use test_context::AsyncTestContext;
use tower::ServiceExt;

/// Test harness holding a router and the job store behind it.
///
/// # Example using test-context
///
/// ```ignore
/// use test_context::test_context;
///
/// #[test_context(TestHarness)]
/// #[tokio::test]
/// async fn my_test(ctx: &TestHarness) {
///     let (status, body) = ctx.get("/health").await;
///     // ... test code
/// }
/// ```
pub struct TestHarness {
    pub router: Router,
    pub jobs: JobStore,
    pub model: Arc<ScriptedModel>,
}

impl AsyncTestContext for TestHarness {
    async fn setup() -> Self {
        Self::with_model(ScriptedModel::replying(r#"{"Acme": {"Engineer": {"name": "MISSING"}}}"#))
    }

    async fn teardown(self) {}
}

impl TestHarness {
    /// Build a harness whose agents all talk to `model`.
    pub fn with_model(model: ScriptedModel) -> Self {
        // Respects RUST_LOG; try_init() because many tests share the process.
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();

        let model = Arc::new(model);
        let state = AppState::new(ServerDeps::new(model.clone(), None));
        let jobs = state.jobs.clone();

        Self {
            router: build_app_with_state(state),
            jobs,
            model,
        }
    }

    /// POST a raw body with the given content type.
    pub async fn post_raw(&self, path: &str, content_type: &str, body: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri(path)
            .header(CONTENT_TYPE, content_type)
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    pub async fn post_json(&self, path: &str, body: Value) -> (StatusCode, Value) {
        self.post_raw(path, "application/json", &body.to_string()).await
    }

    pub async fn get(&self, path: &str) -> (StatusCode, Value) {
        let request = Request::builder().uri(path).body(Body::empty()).unwrap();
        self.send(request).await
    }

    /// Submit a job and return its id.
    pub async fn submit(&self, companies: &[&str], positions: &[&str]) -> String {
        let (status, body) = self
            .post_json(
                "/api/crew",
                serde_json::json!({ "companies": companies, "positions": positions }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "submit failed: {}", body);
        body["job_id"].as_str().unwrap().to_string()
    }

    /// Poll the fetch endpoint until `done` accepts the response body.
    pub async fn wait_for(&self, job_id: &str, done: impl Fn(&Value) -> bool) -> Value {
        let path = format!("/api/crew/{}", job_id);
        tokio::time::timeout(Duration::from_secs(5), async {
            loop {
                let (status, body) = self.get(&path).await;
                assert_eq!(status, StatusCode::OK);
                if done(&body) {
                    return body;
                }
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .expect("job did not reach the expected state in time")
    }

    /// Wait until the job is COMPLETE or ERROR.
    pub async fn wait_until_terminal(&self, job_id: &str) -> Value {
        self.wait_for(job_id, |body| body["status"] != "RUNNING").await
    }

    pub fn job_count(&self) -> usize {
        self.jobs.len()
    }

    pub fn job_exists(&self, job_id: &str) -> bool {
        self.jobs.get(&JobId::from(job_id)).is_ok()
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };
        (status, body)
    }
}
