//! HTTP routes.

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use event_recorder_domain::{
    RetrievalEvent, RetrievalEventBatch, RetrievalEventBatchProps, RetrievalEventProps,
    ValidationError,
};
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::Instrument;

use crate::api::auth::require_api_key;
use crate::app::App;
use crate::infrastructure::correlation::CorrelationId;

/// Create all HTTP routes.
///
/// Ingestion is guarded by the API key middleware when a key is configured;
/// health checks never are.
pub fn router(app: Arc<App>) -> Router {
    let mut ingestion =
        Router::new().route("/v1/retrieval-events", post(save_retrieval_events));
    if let Some(api_key) = app.api_key.clone() {
        ingestion =
            ingestion.route_layer(middleware::from_fn_with_state(api_key, require_api_key));
    }

    Router::new()
        .route("/", get(health))
        .route("/health", get(health))
        .merge(ingestion)
        .with_state(app)
}

async fn health() -> &'static str {
    "OK"
}

async fn save_retrieval_events(
    State(app): State<Arc<App>>,
    body: Bytes,
) -> Result<StatusCode, ApiError> {
    let correlation_id = CorrelationId::new();
    async move {
        let batch = read_batch(parse_body(&body)).map_err(|e| {
            tracing::debug!(
                error_message = %e.message(),
                error_details = ?e.details(),
                "Could not create retrieval event batch"
            );
            ApiError::Validation(e)
        })?;

        app.use_cases
            .retrieval_events
            .save
            .execute(&batch)
            .await?;

        Ok::<_, ApiError>(StatusCode::CREATED)
    }
    .instrument(correlation_id.span("save_retrieval_events"))
    .await
}

/// Parse the request body, falling back to an empty object.
fn parse_body(body: &[u8]) -> Value {
    if body.is_empty() {
        return Value::Object(Map::new());
    }
    serde_json::from_slice(body).unwrap_or_else(|e| {
        tracing::warn!(
            error = %e,
            body = %String::from_utf8_lossy(body),
            "Couldn't parse request body. Body being set to empty object."
        );
        Value::Object(Map::new())
    })
}

/// Turn a submission into a validated batch.
///
/// An object carrying `events` is a batch whose invalid elements are skipped.
/// Any other object is a single event and must be valid. A non-object body is
/// a batch with no `events`.
fn read_batch(body: Value) -> Result<RetrievalEventBatch, ValidationError> {
    match body {
        Value::Object(mut fields) => match fields.remove("events") {
            Some(Value::Array(events)) => {
                RetrievalEventBatch::create(RetrievalEventBatchProps::new(events))
            }
            Some(Value::Null) => RetrievalEventBatch::create(RetrievalEventBatchProps::default()),
            Some(_) => Err(ValidationError::new("Events must be an array.").for_field("events")),
            None => RetrievalEventProps::from_json(Value::Object(fields))
                .and_then(RetrievalEvent::create)
                .map(RetrievalEventBatch::from),
        },
        _ => RetrievalEventBatch::create(RetrievalEventBatchProps::default()),
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ValidationErrorBody {
    error: &'static str,
    error_message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error_details: Option<Value>,
}

#[derive(Debug)]
pub enum ApiError {
    Validation(ValidationError),
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(e) => (
                StatusCode::BAD_REQUEST,
                Json(ValidationErrorBody {
                    error: "ValidationError",
                    error_message: e.message().to_string(),
                    error_details: e.details().cloned(),
                }),
            )
                .into_response(),
            ApiError::Internal(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal error").into_response()
            }
        }
    }
}

impl From<crate::infrastructure::ports::RepoError> for ApiError {
    fn from(e: crate::infrastructure::ports::RepoError) -> Self {
        ApiError::Internal(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request};
    use base64::{engine::general_purpose::STANDARD, Engine as _};
    use event_recorder_domain::RetentionInterval;
    use serde_json::json;
    use tower::ServiceExt;

    use crate::api::auth::ApiKey;
    use crate::infrastructure::ports::{MockRetrievalEventRepo, RepoError};

    fn event(retrieval_id: &str) -> Value {
        json!({
            "retrievalId": retrieval_id,
            "instanceId": "i1",
            "cid": "c1",
            "phase": "query",
            "phaseStartTime": "1970-01-01T00:00:00.000Z",
            "eventName": "connected",
            "eventTime": "1970-01-02T00:00:00.000Z"
        })
    }

    fn app_with(repo: MockRetrievalEventRepo, api_key: Option<ApiKey>) -> Router {
        router(Arc::new(App::new(
            Arc::new(repo),
            RetentionInterval::default(),
            api_key,
        )))
    }

    fn post_json(body: impl Into<Body>) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/v1/retrieval-events")
            .header(header::CONTENT_TYPE, "application/json")
            .body(body.into())
            .unwrap()
    }

    async fn json_body(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn single_event_is_saved() {
        let mut repo = MockRetrievalEventRepo::new();
        repo.expect_save_batch()
            .withf(|batch| batch.len() == 1 && batch.events()[0].retrieval_id() == "r1")
            .times(1)
            .returning(|_| Ok(()));

        let response = app_with(repo, None)
            .oneshot(post_json(event("r1").to_string()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(bytes.is_empty());
    }

    #[tokio::test]
    async fn batch_with_invalid_event_saves_the_rest() {
        let mut invalid = event("bad");
        invalid["phase"] = json!("not-a-phase");

        let mut repo = MockRetrievalEventRepo::new();
        repo.expect_save_batch()
            .withf(|batch| batch.len() == 2)
            .times(1)
            .returning(|_| Ok(()));

        let body = json!({ "events": [event("r1"), invalid, event("r2")] });
        let response = app_with(repo, None)
            .oneshot(post_json(body.to_string()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
    }

    #[tokio::test]
    async fn empty_events_array_is_accepted() {
        let mut repo = MockRetrievalEventRepo::new();
        repo.expect_save_batch()
            .withf(|batch| batch.is_empty())
            .times(1)
            .returning(|_| Ok(()));

        let response = app_with(repo, None)
            .oneshot(post_json(r#"{"events":[]}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
    }

    #[tokio::test]
    async fn single_event_missing_field_is_rejected() {
        let mut body = event("r1");
        body.as_object_mut().unwrap().remove("cid");

        let mut repo = MockRetrievalEventRepo::new();
        repo.expect_save_batch().never();

        let response = app_with(repo, None)
            .oneshot(post_json(body.to_string()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["error"], "ValidationError");
        assert_eq!(body["errorMessage"], "Property cid is required.");
        assert_eq!(body["errorDetails"]["field"], "cid");
    }

    #[tokio::test]
    async fn unparseable_body_is_treated_as_empty_object() {
        let mut repo = MockRetrievalEventRepo::new();
        repo.expect_save_batch().never();

        let response = app_with(repo, None)
            .oneshot(post_json("{not json"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["errorMessage"], "Property retrievalId is required.");
    }

    #[tokio::test]
    async fn non_object_body_is_rejected_as_missing_events() {
        let mut repo = MockRetrievalEventRepo::new();
        repo.expect_save_batch().never();

        let response = app_with(repo, None)
            .oneshot(post_json("[1, 2, 3]"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["errorMessage"], "Property events is required.");
    }

    #[tokio::test]
    async fn events_must_be_an_array() {
        let mut repo = MockRetrievalEventRepo::new();
        repo.expect_save_batch().never();

        let response = app_with(repo, None)
            .oneshot(post_json(r#"{"events":"r1"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn store_failure_is_internal_error_without_details() {
        let mut repo = MockRetrievalEventRepo::new();
        repo.expect_save_batch()
            .times(1)
            .returning(|_| Err(RepoError::database("save_batch", "password authentication failed")));

        let response = app_with(repo, None)
            .oneshot(post_json(event("r1").to_string()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"Internal error");
    }

    #[tokio::test]
    async fn ingestion_requires_api_key_when_configured() {
        let mut repo = MockRetrievalEventRepo::new();
        repo.expect_save_batch().never();

        let response = app_with(repo, Some(ApiKey::new("k")))
            .oneshot(post_json(event("r1").to_string()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn ingestion_accepts_matching_api_key() {
        let mut repo = MockRetrievalEventRepo::new();
        repo.expect_save_batch().times(1).returning(|_| Ok(()));

        let mut request = post_json(event("r1").to_string());
        request.headers_mut().insert(
            header::AUTHORIZATION,
            format!("Basic {}", STANDARD.encode("k")).parse().unwrap(),
        );

        let response = app_with(repo, Some(ApiKey::new("k")))
            .oneshot(request)
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
    }

    #[tokio::test]
    async fn health_is_open_even_with_api_key() {
        let app = app_with(MockRetrievalEventRepo::new(), Some(ApiKey::new("k")));

        for uri in ["/", "/health"] {
            let response = app
                .clone()
                .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }
    }
}
