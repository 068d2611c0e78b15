//! HTTP API for the domain scanner front end.
//!
//! Three stateless endpoints: keyword translation, single-domain status and
//! synthetic website traffic. The sweep itself runs client side, one
//! `domain-status` call at a time.

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use domain_scan_lib::{
    validate_keyword, CandidateStatus, DomainScanError, RdapClient, ScanConfig, StatusProvider,
    TrafficEstimator, TrafficProvider, TranslationProvider, Translator,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Maximum accepted request body.
const BODY_LIMIT: usize = 64 * 1024;

type ApiResponse = (StatusCode, Json<Value>);

/// Shared state for API handlers.
#[derive(Clone)]
pub struct ApiState {
    status: Arc<dyn StatusProvider>,
    translator: Arc<dyn TranslationProvider>,
    traffic: Arc<dyn TrafficProvider>,
}

impl ApiState {
    pub fn new(
        status: Arc<dyn StatusProvider>,
        translator: Arc<dyn TranslationProvider>,
        traffic: Arc<dyn TrafficProvider>,
    ) -> Self {
        Self {
            status,
            translator,
            traffic,
        }
    }

    /// State backed by RDAP, the configured translator and the traffic estimator.
    pub fn from_config(config: &ScanConfig) -> Result<Self, DomainScanError> {
        let translator = Translator::from_config(config)?;
        if translator.uses_mock() {
            warn!("OPENAI_API_KEY not set; /api/translate will return mock translations");
        }
        Ok(Self::new(
            Arc::new(RdapClient::with_config(config)?),
            Arc::new(translator),
            Arc::new(TrafficEstimator::new()),
        ))
    }
}

/// `?domain=` query parameter.
#[derive(Debug, Deserialize)]
struct DomainQuery {
    domain: Option<String>,
}

impl DomainQuery {
    fn required(self) -> Result<String, ApiResponse> {
        match self.domain.map(|d| d.trim().to_string()) {
            Some(d) if !d.is_empty() => Ok(d),
            _ => Err((
                StatusCode::BAD_REQUEST,
                Json(json!({"error": "Domain parameter is required"})),
            )),
        }
    }
}

/// `GET /api/domain-status?domain=`: Registration status of one domain.
async fn domain_status(
    State(state): State<ApiState>,
    Query(query): Query<DomainQuery>,
) -> ApiResponse {
    let domain = match query.required() {
        Ok(d) => d,
        Err(resp) => return resp,
    };

    let report = state.status.check_status(&domain).await;
    let code = if report.status == CandidateStatus::Error {
        StatusCode::INTERNAL_SERVER_ERROR
    } else {
        StatusCode::OK
    };

    match serde_json::to_value(&report) {
        Ok(body) => (code, Json(body)),
        Err(e) => {
            error!("failed to encode status report for {domain}: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "domain": domain,
                    "status": "error",
                    "message": domain_scan_lib::LOOKUP_FAILED_MESSAGE,
                })),
            )
        }
    }
}

/// `POST /api/translate`: Translate `{keyword}` into the language roster.
async fn translate(State(state): State<ApiState>, body: Bytes) -> ApiResponse {
    let bad_request = |msg: String| (StatusCode::BAD_REQUEST, Json(json!({"error": msg})));

    let parsed: Value = match serde_json::from_slice(&body) {
        Ok(v) => v,
        Err(_) => return bad_request("Request body must be JSON".to_string()),
    };

    let keyword = match parsed.get("keyword").and_then(Value::as_str) {
        Some(k) if !k.trim().is_empty() => k,
        _ => return bad_request("Keyword is required".to_string()),
    };

    let keyword = match validate_keyword(keyword) {
        Ok(k) => k,
        Err(e) => return bad_request(e.to_string()),
    };

    match state.translator.translate(&keyword).await {
        Ok(translations) => {
            info!("translated '{keyword}' into {} languages", translations.len());
            (StatusCode::OK, Json(json!({"translations": translations})))
        }
        Err(e) if e.is_user_error() => bad_request(e.to_string()),
        Err(e) => {
            error!("Translation error: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "Failed to translate keyword"})),
            )
        }
    }
}

/// `GET /api/website-traffic?domain=`: Recent monthly visits.
async fn website_traffic(
    State(state): State<ApiState>,
    Query(query): Query<DomainQuery>,
) -> ApiResponse {
    let domain = match query.required() {
        Ok(d) => d,
        Err(resp) => return resp,
    };

    let failed = |domain: &str| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "domain": domain,
                "status": "error",
                "message": "Failed to check website traffic",
            })),
        )
    };

    match state.traffic.traffic(&domain).await {
        Ok(summary) => match serde_json::to_value(&summary) {
            Ok(body) => (StatusCode::OK, Json(body)),
            Err(_) => failed(&domain),
        },
        Err(e) => {
            error!("Website traffic check error for {domain}: {e}");
            failed(&domain)
        }
    }
}

/// Build the axum router with shared state.
pub fn build_router(state: ApiState) -> Router {
    Router::new()
        .route("/api/domain-status", get(domain_status))
        .route("/api/translate", post(translate))
        .route("/api/website-traffic", get(website_traffic))
        .layer(axum::extract::DefaultBodyLimit::max(BODY_LIMIT))
        .with_state(state)
}

/// Bind `addr` and serve until Ctrl-C.
pub async fn serve(addr: &str, state: ApiState) -> std::io::Result<()> {
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await.map_err(|e| {
        error!("API server failed to bind to {addr}: {e}");
        e
    })?;

    info!("API server listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("shutdown signal received"),
        Err(e) => error!("failed to listen for shutdown signal: {e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::Request;
    use domain_scan_lib::{mock_translations, StatusReport, TrafficSummary, Translation};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    /// Answers from a fixed table keyed by domain.
    struct StubRegistry;

    #[async_trait]
    impl StatusProvider for StubRegistry {
        async fn check_status(&self, domain: &str) -> StatusReport {
            match domain {
                "free.com" => StatusReport::available(domain),
                "taken.com" => {
                    StatusReport::registered(domain, Some("2020-01-01".to_string()))
                }
                "broken.com" => StatusReport::error(domain, domain_scan_lib::LOOKUP_FAILED_MESSAGE),
                _ => StatusReport::unknown(domain, "Could not find RDAP service for TLD: zz"),
            }
        }
    }

    struct StubTranslator {
        fail: bool,
    }

    #[async_trait]
    impl TranslationProvider for StubTranslator {
        async fn translate(&self, keyword: &str) -> Result<Vec<Translation>, DomainScanError> {
            if self.fail {
                Err(DomainScanError::translation("provider returned 500"))
            } else {
                Ok(mock_translations(keyword))
            }
        }
    }

    struct StubTraffic {
        fail: bool,
    }

    #[async_trait]
    impl TrafficProvider for StubTraffic {
        async fn traffic(&self, domain: &str) -> Result<TrafficSummary, DomainScanError> {
            if self.fail {
                return Err(DomainScanError::internal("no data"));
            }
            TrafficEstimator::new().estimate(domain)
        }
    }

    fn test_router(fail: bool) -> Router {
        build_router(ApiState::new(
            Arc::new(StubRegistry),
            Arc::new(StubTranslator { fail }),
            Arc::new(StubTraffic { fail }),
        ))
    }

    /// Helper to POST a raw body to /api/translate.
    fn translate_request(body: &str) -> Request<Body> {
        Request::post("/api/translate")
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    /// Parse response body as JSON.
    async fn body_json(resp: axum::http::Response<Body>) -> Value {
        let body = resp.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&body).unwrap()
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
        let req = Request::get(uri).body(Body::empty()).unwrap();
        let resp = app.oneshot(req).await.unwrap();
        let status = resp.status();
        (status, body_json(resp).await)
    }

    #[tokio::test]
    async fn test_domain_status_available() {
        let (status, json) = get_json(test_router(false), "/api/domain-status?domain=free.com").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["domain"], "free.com");
        assert_eq!(json["status"], "available");
        assert!(json.get("registrationDate").is_none());
    }

    #[tokio::test]
    async fn test_domain_status_registered() {
        let (status, json) =
            get_json(test_router(false), "/api/domain-status?domain=taken.com").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "registered");
        assert_eq!(json["registrationDate"], "2020-01-01");
    }

    #[tokio::test]
    async fn test_domain_status_unknown_is_ok() {
        let (status, json) = get_json(test_router(false), "/api/domain-status?domain=x.zz").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "unknown");
        assert_eq!(json["message"], "Could not find RDAP service for TLD: zz");
    }

    #[tokio::test]
    async fn test_domain_status_error_is_500() {
        let (status, json) =
            get_json(test_router(false), "/api/domain-status?domain=broken.com").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["domain"], "broken.com");
        assert_eq!(json["status"], "error");
        assert_eq!(json["message"], "Failed to check domain status");
    }

    #[tokio::test]
    async fn test_domain_status_requires_domain() {
        for uri in ["/api/domain-status", "/api/domain-status?domain="] {
            let (status, json) = get_json(test_router(false), uri).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(json["error"], "Domain parameter is required");
        }
    }

    #[tokio::test]
    async fn test_translate_success() {
        let resp = test_router(false)
            .oneshot(translate_request(r#"{"keyword": "coffee"}"#))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let json = body_json(resp).await;
        let translations = json["translations"].as_array().unwrap();
        assert_eq!(translations.len(), 5);
        assert_eq!(translations[0]["language"], "English");
        assert_eq!(translations[1]["translation"], "coffeees");
    }

    #[tokio::test]
    async fn test_translate_rejects_bad_input() {
        for body in [
            r#"{}"#,
            r#"{"keyword": 42}"#,
            r#"{"keyword": ""}"#,
            r#"{"keyword": "two words"}"#,
            "keyword=coffee",
        ] {
            let resp = test_router(false)
                .oneshot(translate_request(body))
                .await
                .unwrap();
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "body: {body}");
            let json = body_json(resp).await;
            assert!(json["error"].is_string());
        }
    }

    #[tokio::test]
    async fn test_translate_truncated_json() {
        for body in [r#"{"keyword": "cof"#, "", "{"] {
            let resp = test_router(false)
                .oneshot(translate_request(body))
                .await
                .unwrap();
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "body: {body:?}");
            let json = body_json(resp).await;
            assert_eq!(json["error"], "Request body must be JSON");
        }
    }

    #[tokio::test]
    async fn test_translate_failure_is_500() {
        let resp = test_router(true)
            .oneshot(translate_request(r#"{"keyword": "coffee"}"#))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(resp).await;
        assert_eq!(json["error"], "Failed to translate keyword");
    }

    #[tokio::test]
    async fn test_translate_body_limit() {
        let huge = format!(r#"{{"keyword": "{}"}}"#, "a".repeat(BODY_LIMIT + 1));
        let resp = test_router(false)
            .oneshot(translate_request(&huge))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn test_website_traffic() {
        let (status, json) =
            get_json(test_router(false), "/api/website-traffic?domain=kaffee.de").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["domain"], "kaffee.de");
        let metrics = json["metrics"].as_array().unwrap();
        assert_eq!(metrics.len(), 3);
        assert!(metrics.iter().all(|m| m["visits"].as_u64().unwrap() < 100_000));
    }

    #[tokio::test]
    async fn test_website_traffic_errors() {
        let (status, json) = get_json(test_router(false), "/api/website-traffic").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "Domain parameter is required");

        let (status, json) =
            get_json(test_router(true), "/api/website-traffic?domain=kaffee.de").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["status"], "error");
        assert_eq!(json["message"], "Failed to check website traffic");
    }
}
