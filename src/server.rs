use axum::{
    extract::{rejection::QueryRejection, Query, Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;

use crate::builder::{self, ActionRequest, BuildError};
use crate::logger::LogSink;

type SharedLog = Arc<dyn LogSink>;

#[derive(Debug, Default)]
pub struct TranslateParams {
    pub action: Option<String>,
    pub text: Option<String>,
    pub template: Option<String>,
    pub model: Option<String>,
}

impl TranslateParams {
    /// Repeated keys keep the last value; unknown keys are ignored.
    fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut params = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "action" => &mut params.action,
                "text" => &mut params.text,
                "template" => &mut params.template,
                "model" => &mut params.model,
                _ => continue,
            };
            *slot = Some(value);
        }
        params
    }
}

#[derive(Debug, Serialize)]
pub struct UrlPayload {
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct ModelsPayload {
    pub models: Vec<String>,
}

#[derive(Debug)]
struct ApiError {
    status: StatusCode,
    detail: String,
}

impl From<BuildError> for ApiError {
    fn from(err: BuildError) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            detail: err.to_string(),
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            detail: rejection.body_text(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "detail": self.detail }))).into_response()
    }
}

pub async fn serve(addr: &str, log: SharedLog) -> anyhow::Result<()> {
    let router = build_router(Arc::clone(&log));
    let listener = TcpListener::bind(addr).await?;
    log.info(&format!("Listening on {}", listener.local_addr()?));
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    log.info("HTTP server exited");
    Ok(())
}

pub fn build_router(log: SharedLog) -> Router {
    Router::new()
        .route("/translate", get(translate))
        .route("/models", get(models))
        .route("/healthz", get(health))
        .layer(middleware::from_fn_with_state(Arc::clone(&log), log_requests))
        .with_state(log)
}

async fn log_requests(State(log): State<SharedLog>, request: Request, next: Next) -> Response {
    log.info(&format!("Request: {} {}", request.method(), request.uri()));
    let response = next.run(request).await;
    log.info(&format!("Response status: {}", response.status().as_u16()));
    response
}

async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = signal::ctrl_c().await;
    };
    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        if let Ok(mut stream) = signal(SignalKind::terminate()) {
            let _ = stream.recv().await;
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

async fn translate(
    State(log): State<SharedLog>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Json<UrlPayload>, ApiError> {
    let Query(pairs) = query.map_err(|rejection| {
        log.error(&rejection.body_text());
        ApiError::from(rejection)
    })?;
    let params = TranslateParams::from_pairs(pairs);
    log.info(&format!(
        "Action: {}, Text: {}, Template: {}, Model: {}",
        params.action.as_deref().unwrap_or(""),
        params.text.as_deref().unwrap_or(""),
        params.template.as_deref().unwrap_or("None"),
        params.model.as_deref().unwrap_or("chatgpt"),
    ));
    let request = ActionRequest::parse(
        params.action.as_deref().unwrap_or(""),
        params.text.as_deref().unwrap_or(""),
        params.template.as_deref(),
        params.model.as_deref(),
    )
    .map_err(|err| {
        log.error(&err.to_string());
        ApiError::from(err)
    })?;
    let url = builder::build_url(&request);
    log.info(&format!("Generated URL: {}", url));
    Ok(Json(UrlPayload { url }))
}

async fn models(State(log): State<SharedLog>) -> Json<ModelsPayload> {
    let models: Vec<String> = builder::list_models().into_iter().map(String::from).collect();
    log.info(&format!("Retrieved AI models: {:?}", models));
    Json(ModelsPayload { models })
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logger::MemoryLog;
    use axum::{body, body::Body, http::Request};
    use serde_json::Value;
    use tower::ServiceExt;

    async fn get(router: Router, uri: &str) -> (StatusCode, Value) {
        let response = router
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn router() -> (Router, Arc<MemoryLog>) {
        let log = Arc::new(MemoryLog::default());
        (build_router(log.clone()), log)
    }

    #[tokio::test]
    async fn translate_returns_url() {
        let (router, _) = router();
        let (status, body) = get(router, "/translate?action=pronounce&text=hello%20world").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["url"], "https://www.google.com/search?q=pronounce+hello%20world");
    }

    #[tokio::test]
    async fn ai_request_with_template_and_model() {
        let (router, _) = router();
        let (status, body) = get(router, "/translate?action=ai&text=foo&template=1&model=gemini").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["url"], "https://gemini.google.com/?q=explain%20this%20%22foo%22");
    }

    #[tokio::test]
    async fn validation_errors_are_400_with_detail() {
        let (router, _) = router();
        let (status, body) = get(router.clone(), "/translate?action=ai&text=foo&template=5").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["detail"], "Invalid template. Must be 1, 2, 3, or 4.");

        let (status, body) = get(router.clone(), "/translate?action=ai&text=foo&template=2&model=bard").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["detail"], "Invalid model. Must be chatgpt, gemini, grok, or perplexity.");

        let (status, body) = get(router, "/translate?action=unknown&text=foo").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["detail"], "Invalid action. Must be translate, pronounce, ai, or image.");
    }

    #[tokio::test]
    async fn missing_text_is_rejected() {
        let (router, _) = router();
        let (status, body) = get(router, "/translate?action=translate").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["detail"].as_str().unwrap().starts_with("Missing text"));
    }

    #[tokio::test]
    async fn repeated_keys_keep_the_last_value() {
        let (router, _) = router();
        let (status, body) = get(router.clone(), "/translate?action=image&action=image&text=x").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["url"], "https://www.google.com/search?tbm=isch&q=x");

        let (status, body) = get(router, "/translate?action=image&text=x&action=bogus").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["detail"], "Invalid action. Must be translate, pronounce, ai, or image.");
    }

    #[tokio::test]
    async fn healthz_reports_ok() {
        let (router, _) = router();
        let (status, body) = get(router, "/healthz").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "status": "ok" }));
    }

    #[tokio::test]
    async fn models_lists_catalog() {
        let (router, _) = router();
        let (status, body) = get(router, "/models").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "models": ["chatgpt", "gemini", "grok", "perplexity"] }));
    }

    #[tokio::test]
    async fn requests_are_logged() {
        let (router, log) = router();
        let _ = get(router, "/translate?action=image&text=cat").await;
        let lines = log.lines();
        assert_eq!(lines.first().unwrap(), "INFO Request: GET /translate?action=image&text=cat");
        assert!(lines.iter().any(|l| l == "INFO Generated URL: https://www.google.com/search?tbm=isch&q=cat"));
        assert_eq!(lines.last().unwrap(), "INFO Response status: 200");
    }

    #[tokio::test]
    async fn rejected_requests_log_the_error() {
        let (router, log) = router();
        let _ = get(router, "/translate?action=ai&text=x&template=1&model=bard").await;
        let lines = log.lines();
        assert!(lines.iter().any(|l| l.starts_with("ERROR Invalid model.")));
        assert_eq!(lines.last().unwrap(), "INFO Response status: 400");
    }
}
