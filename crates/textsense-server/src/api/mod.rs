mod sentiment;

use std::sync::Arc;

use axum::{
    extract::rejection::FormRejection,
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use textsense_analytics::{AnalyticsError, TextAnalyticsClient};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{request_id, REQUEST_ID_HEADER};

const INTERNAL_ERROR_DETAIL: &str = "Internal Server Error";

#[derive(Clone)]
pub struct AppState {
    pub analytics: Arc<TextAnalyticsClient>,
}

/// Error body in the `{"detail": ...}` shape clients already parse.
#[derive(Debug, Serialize)]
pub struct ApiError {
    #[serde(skip)]
    pub status: StatusCode,
    pub detail: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
}

impl ApiError {
    pub fn new(status: StatusCode, detail: impl Into<String>) -> Self {
        Self {
            status,
            detail: detail.into(),
        }
    }

    /// The opaque 500 returned for every upstream or unexpected failure.
    pub fn internal() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_DETAIL)
    }

    pub fn from_form_rejection(rejection: &FormRejection) -> Self {
        Self::new(rejection.status(), rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status, Json(self)).into_response()
    }
}

/// Logs the failure with its detail and hides it from the caller.
pub(super) fn map_analytics_error(request_id: &str, error: &AnalyticsError) -> ApiError {
    tracing::error!(request_id, error = %error, "sentiment analysis failed");
    ApiError::internal()
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static(REQUEST_ID_HEADER),
        ])
        .expose_headers([HeaderName::from_static(REQUEST_ID_HEADER)])
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/analyze-sentiment", post(sentiment::analyze_sentiment))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health() -> impl IntoResponse {
    Json(HealthData { status: "ok" })
}

#[cfg(test)]
mod tests {
    use super::sentiment::{build_outcomes, DocumentOutcome};
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use serde_json::{json, Value};
    use textsense_analytics::{
        ConfidenceScores, DocumentError, DocumentResult, DocumentSentiment, Sentiment,
        ServiceError,
    };
    use tower::ServiceExt;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const SENTIMENT_PATH: &str = "/text/analytics/v3.1/sentiment";

    fn app_for(endpoint: &str) -> Router {
        let client = TextAnalyticsClient::new(endpoint, "test-key", 5).expect("client");
        build_app(AppState {
            analytics: Arc::new(client),
        })
    }

    fn form_request(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/analyze-sentiment")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .expect("request")
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.expect("response");
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        let json: Value = serde_json::from_slice(&body).expect("json parse");
        (status, json)
    }

    fn scores() -> Value {
        json!({"positive": 0.9, "neutral": 0.08, "negative": 0.02})
    }

    fn positive_body(text: &str) -> Value {
        json!({
            "documents": [{
                "id": "0",
                "sentiment": "positive",
                "confidenceScores": scores(),
                "sentences": [{
                    "sentiment": "positive",
                    "confidenceScores": scores(),
                    "offset": 0,
                    "length": text.chars().count(),
                    "text": text
                }],
                "warnings": []
            }],
            "errors": [],
            "modelVersion": "2022-11-01"
        })
    }

    async fn mount_sentiment(server: &MockServer, template: ResponseTemplate) {
        Mock::given(method("POST"))
            .and(path(SENTIMENT_PATH))
            .respond_with(template)
            .mount(server)
            .await;
    }

    // -------------------------------------------------------------------------
    // Unit tests (no upstream)
    // -------------------------------------------------------------------------

    #[test]
    fn internal_error_serializes_fixed_detail() {
        let json = serde_json::to_value(ApiError::internal()).expect("serialize");
        assert_eq!(json, json!({"detail": "Internal Server Error"}));
    }

    #[test]
    fn internal_error_maps_to_500() {
        let response = ApiError::internal().into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn build_outcomes_copies_input_text_and_renders_errors() {
        let results = vec![
            DocumentResult::Sentiment(DocumentSentiment {
                id: "0".to_string(),
                sentiment: Sentiment::Mixed,
                confidence_scores: ConfidenceScores {
                    positive: 0.4,
                    neutral: 0.2,
                    negative: 0.4,
                },
                sentences: Vec::new(),
            }),
            DocumentResult::Error(DocumentError {
                id: "1".to_string(),
                error: ServiceError {
                    code: "InvalidDocument".to_string(),
                    message: "Document text is empty.".to_string(),
                    innererror: None,
                },
            }),
        ];

        let outcomes = build_outcomes(vec!["good and bad".to_string(), String::new()], results);
        let json = serde_json::to_value(&outcomes).expect("serialize");

        assert_eq!(json[0]["document_text"], "good and bad");
        assert_eq!(json[0]["overall_sentiment"], "mixed");
        assert_eq!(json[1], json!({"error": "InvalidDocument: Document text is empty."}));
        assert!(matches!(outcomes[1], DocumentOutcome::Error(_)));
    }

    // -------------------------------------------------------------------------
    // Route tests (wiremock upstream)
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn health_returns_ok() {
        let app = app_for("http://127.0.0.1:9");
        let request = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .expect("request");

        let (status, json) = send(app, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json, json!({"status": "ok"}));
    }

    #[tokio::test]
    async fn analyze_sentiment_returns_document_result() {
        let server = MockServer::start().await;
        mount_sentiment(
            &server,
            ResponseTemplate::new(200).set_body_json(positive_body("I love this")),
        )
        .await;

        let (status, json) = send(app_for(&server.uri()), form_request("sendText=I+love+this")).await;

        assert_eq!(status, StatusCode::OK);
        let results = json["results"].as_array().expect("results array");
        assert_eq!(results.len(), 1);
        let doc = &results[0];
        assert_eq!(doc["document_text"], "I love this");
        assert_eq!(doc["overall_sentiment"], "positive");
        assert_eq!(doc["confidence_scores"], scores());
        assert_eq!(doc["sentences"][0]["sentence_text"], "I love this");
        assert_eq!(doc["sentences"][0]["sentence_sentiment"], "positive");
        assert_eq!(doc["sentences"][0]["confidence_scores"], scores());
    }

    #[tokio::test]
    async fn analyze_sentiment_returns_document_error_with_200() {
        let server = MockServer::start().await;
        mount_sentiment(
            &server,
            ResponseTemplate::new(200).set_body_json(json!({
                "documents": [],
                "errors": [{
                    "id": "0",
                    "error": {
                        "code": "InvalidArgument",
                        "message": "Invalid Language Code.",
                        "innererror": {
                            "code": "UnsupportedLanguageCode",
                            "message": "Invalid language code 'xx'."
                        }
                    }
                }]
            })),
        )
        .await;

        let (status, json) = send(app_for(&server.uri()), form_request("sendText=bonjour")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            json,
            json!({"results": [{"error": "UnsupportedLanguageCode: Invalid language code 'xx'."}]})
        );
    }

    #[tokio::test]
    async fn analyze_sentiment_hides_upstream_auth_failure() {
        let server = MockServer::start().await;
        mount_sentiment(
            &server,
            ResponseTemplate::new(401).set_body_json(json!({
                "error": {"code": "401", "message": "Access denied due to invalid subscription key."}
            })),
        )
        .await;

        let (status, json) = send(app_for(&server.uri()), form_request("sendText=hello")).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json, json!({"detail": "Internal Server Error"}));
        assert!(json.get("results").is_none());
    }

    #[tokio::test]
    async fn analyze_sentiment_returns_500_when_upstream_unreachable() {
        let (status, json) = send(app_for("http://127.0.0.1:9"), form_request("sendText=hello")).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json, json!({"detail": "Internal Server Error"}));
    }

    #[tokio::test]
    async fn analyze_sentiment_returns_500_for_placeholder_endpoint() {
        let app = app_for(textsense_core::PLACEHOLDER_ENDPOINT);
        let (status, json) = send(app, form_request("sendText=hello")).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json, json!({"detail": "Internal Server Error"}));
    }

    #[tokio::test]
    async fn analyze_sentiment_returns_500_for_malformed_upstream_body() {
        let server = MockServer::start().await;
        mount_sentiment(&server, ResponseTemplate::new(200).set_body_string("<html>")).await;

        let (status, json) = send(app_for(&server.uri()), form_request("sendText=hello")).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json, json!({"detail": "Internal Server Error"}));
    }

    #[tokio::test]
    async fn analyze_sentiment_rejects_missing_field_without_calling_upstream() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let (status, json) = send(app_for(&server.uri()), form_request("otherField=hello")).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(json["detail"].is_string(), "detail should describe the rejection");
    }

    #[tokio::test]
    async fn analyze_sentiment_rejects_non_form_content_type() {
        let request = Request::builder()
            .method("POST")
            .uri("/analyze-sentiment")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"sendText":"hello"}"#))
            .expect("request");

        let (status, json) = send(app_for("http://127.0.0.1:9"), request).await;

        assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert!(json["detail"].is_string());
    }

    #[tokio::test]
    async fn analyze_sentiment_rejects_empty_field_without_calling_upstream() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let (status, json) = send(app_for(&server.uri()), form_request("sendText=")).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json, json!({"detail": "Field required: sendText"}));
    }

    fn multipart_request(name: &str, value: &str) -> Request<Body> {
        let body = format!(
            "--XYZ\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n--XYZ--\r\n"
        );
        Request::builder()
            .method("POST")
            .uri("/analyze-sentiment")
            .header(header::CONTENT_TYPE, "multipart/form-data; boundary=XYZ")
            .body(Body::from(body))
            .expect("request")
    }

    #[tokio::test]
    async fn analyze_sentiment_accepts_multipart_form() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(SENTIMENT_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(positive_body("hello")))
            .expect(1)
            .mount(&server)
            .await;

        let (status, json) = send(app_for(&server.uri()), multipart_request("sendText", "hello")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["results"][0]["document_text"], "hello");
        assert_eq!(json["results"][0]["overall_sentiment"], "positive");
    }

    #[tokio::test]
    async fn analyze_sentiment_rejects_multipart_without_send_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let (status, json) =
            send(app_for(&server.uri()), multipart_request("otherField", "hello")).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json, json!({"detail": "Field required: sendText"}));
    }

    #[tokio::test]
    async fn analyze_sentiment_rejects_empty_multipart_field() {
        let (status, json) = send(app_for("http://127.0.0.1:9"), multipart_request("sendText", "")).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json, json!({"detail": "Field required: sendText"}));
    }

    #[tokio::test]
    async fn analyze_sentiment_is_idempotent_for_deterministic_upstream() {
        let server = MockServer::start().await;
        mount_sentiment(
            &server,
            ResponseTemplate::new(200).set_body_json(positive_body("same text")),
        )
        .await;

        let app = app_for(&server.uri());
        let first = send(app.clone(), form_request("sendText=same+text")).await;
        let second = send(app, form_request("sendText=same+text")).await;

        assert_eq!(first.0, StatusCode::OK);
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn responses_echo_request_id() {
        let app = app_for("http://127.0.0.1:9");
        let request = Request::builder()
            .uri("/health")
            .header(REQUEST_ID_HEADER, "req-abc")
            .body(Body::empty())
            .expect("request");

        let response = app.oneshot(request).await.expect("response");
        assert_eq!(
            response
                .headers()
                .get(REQUEST_ID_HEADER)
                .and_then(|v| v.to_str().ok()),
            Some("req-abc")
        );
    }

    #[tokio::test]
    async fn responses_generate_request_id_when_absent() {
        let app = app_for("http://127.0.0.1:9");
        let request = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .expect("request");

        let response = app.oneshot(request).await.expect("response");
        let id = response
            .headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .expect("generated request id");
        assert_eq!(id.len(), 36, "expected a hyphenated UUID, got {id}");
    }
}
