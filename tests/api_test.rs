use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use tokio::sync::mpsc;
use tower::ServiceExt;

use clause_extractor::application::ports::{ExtractionRepository, LlmClient, LlmClientError};
use clause_extractor::application::services::{ExtractionService, ExtractionWorker};
use clause_extractor::infrastructure::persistence::InMemoryExtractionRepository;
use clause_extractor::infrastructure::text_extraction::CompositeExtractor;
use clause_extractor::presentation::{create_router, AppState};

const TEST_MAX_TEXT_CHARS: usize = 200_000;
const BOUNDARY: &str = "test-boundary-42";

struct ScriptedLlmClient(String);

#[async_trait]
impl LlmClient for ScriptedLlmClient {
    async fn complete(&self, _s: &str, _u: &str) -> Result<String, LlmClientError> {
        Ok(self.0.clone())
    }
}

fn build_app(model_response: &str) -> Router {
    let repository: Arc<dyn ExtractionRepository> = Arc::new(InMemoryExtractionRepository::new());
    let (sender, receiver) = mpsc::channel(8);

    let worker = ExtractionWorker::new(
        receiver,
        Arc::new(CompositeExtractor::new(TEST_MAX_TEXT_CHARS)),
        Arc::new(ScriptedLlmClient(model_response.to_string())),
        Arc::clone(&repository),
    );
    tokio::spawn(worker.run());

    let extraction_service = Arc::new(ExtractionService::new(Arc::clone(&repository), sender));

    create_router(AppState {
        extraction_service,
        repository,
    })
}

fn multipart_upload(filename: &str, content: &[u8]) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri("/api/extract")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .header("x-user-id", "user-1")
        .body(Body::from(body))
        .unwrap()
}

async fn response_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn poll_until_terminal(app: &Router, job_id: &str) -> serde_json::Value {
    for _ in 0..200 {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri(format!("/api/extractions/{job_id}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = response_json(response).await;
        if json["status"] != "processing" {
            return json;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("extraction never reached a terminal status");
}

#[tokio::test]
async fn health_endpoint_reports_healthy() {
    let app = build_app("[]");

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn responses_echo_the_callers_request_id() {
    let app = build_app("[]");

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .header("x-request-id", "req-42")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.headers().get("x-request-id").unwrap(), "req-42");
}

#[tokio::test]
async fn a_request_id_is_generated_when_the_caller_sends_none() {
    let app = build_app("[]");

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    let header = response
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .unwrap();
    assert!(uuid::Uuid::parse_str(header).is_ok());
}

#[tokio::test]
async fn uploading_a_txt_contract_yields_a_completed_extraction_with_clauses() {
    let app = build_app(
        r#"[
            {"clause_type":"payment_terms","title":"Payment","content":"Payment due in 30 days.","summary":"Net 30."},
            {"clause_type":"termination","title":"Termination","content":"Either party may terminate with notice.","summary":"Notice required."}
        ]"#,
    );

    let response = app
        .clone()
        .oneshot(multipart_upload(
            "contract.txt",
            b"Payment due in 30 days.\nEither party may terminate with notice.",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::ACCEPTED);

    let submit = response_json(response).await;
    let job_id = submit["job_id"].as_str().unwrap().to_string();
    assert_eq!(submit["status"], "processing");

    let extraction = poll_until_terminal(&app, &job_id).await;
    assert_eq!(extraction["status"], "completed");
    assert_eq!(extraction["filename"], "contract.txt");
    assert_eq!(extraction["file_type"], "txt");

    let clauses = extraction["clauses"].as_array().unwrap();
    assert_eq!(clauses.len(), 2);
    assert_eq!(clauses[0]["clause_type"], "payment_terms");
    assert_eq!(clauses[0]["order"], 0);
    assert_eq!(clauses[1]["clause_type"], "termination");
    assert_eq!(clauses[1]["order"], 1);
    assert_eq!(clauses[0]["extra_data"]["summary"], "Net 30.");
}

#[tokio::test]
async fn listing_extractions_returns_the_users_jobs_with_pagination_fields() {
    let app = build_app(r#"[{"clause_type":"other","content":"Something."}]"#);

    let response = app
        .clone()
        .oneshot(multipart_upload("a.txt", b"Some contract."))
        .await
        .unwrap();
    let job_id = response_json(response).await["job_id"]
        .as_str()
        .unwrap()
        .to_string();
    poll_until_terminal(&app, &job_id).await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/extractions?skip=0&limit=10")
                .header("x-user-id", "user-1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = response_json(response).await;
    assert_eq!(json["total"], 1);
    assert_eq!(json["skip"], 0);
    assert_eq!(json["limit"], 10);
    assert_eq!(json["extractions"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn listing_is_scoped_to_the_requesting_user() {
    let app = build_app(r#"[{"clause_type":"other","content":"Something."}]"#);

    let response = app
        .clone()
        .oneshot(multipart_upload("a.txt", b"Some contract."))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::ACCEPTED);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/extractions")
                .header("x-user-id", "somebody-else")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let json = response_json(response).await;
    assert_eq!(json["total"], 0);
}

#[tokio::test]
async fn uploading_an_unsupported_file_type_is_rejected_without_creating_a_job() {
    let app = build_app("[]");

    let response = app
        .clone()
        .oneshot(multipart_upload("report.xlsx", b"spreadsheet bytes"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/extractions")
                .header("x-user-id", "user-1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let json = response_json(response).await;
    assert_eq!(json["total"], 0);
}

#[tokio::test]
async fn uploads_without_a_user_header_are_rejected() {
    let app = build_app("[]");

    let mut request = multipart_upload("contract.txt", b"text");
    request.headers_mut().remove("x-user-id");

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn fetching_a_malformed_extraction_id_is_a_bad_request() {
    let app = build_app("[]");

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/extractions/not-a-uuid")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn fetching_an_unknown_extraction_is_not_found() {
    let app = build_app("[]");

    let response = app
        .oneshot(
            Request::builder()
                .uri(format!("/api/extractions/{}", uuid::Uuid::new_v4()))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn failed_extractions_remain_queryable_with_their_failure_recorded() {
    let app = build_app("no json here");

    let response = app
        .clone()
        .oneshot(multipart_upload("contract.txt", b"Some contract."))
        .await
        .unwrap();
    let job_id = response_json(response).await["job_id"]
        .as_str()
        .unwrap()
        .to_string();

    let extraction = poll_until_terminal(&app, &job_id).await;
    assert_eq!(extraction["status"], "failed");
    assert_eq!(extraction["extra_data"]["failure_kind"], "malformed_model_output");
    assert!(extraction["clauses"].as_array().unwrap().is_empty());
}
