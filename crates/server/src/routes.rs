pub mod clients;
pub mod job_types;
pub mod jobs;

use std::path::Path;

use axum::{
    http::HeaderValue,
    routing::{get, patch},
    Json, Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::{TraceLayer, DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, DefaultOnFailure},
};
use tracing::{warn, Level};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use common::types::Health;

use crate::openapi::ApiDoc;
use crate::state::ServerState;

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK", body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health::ok())
}

/// Empty list means permissive.
pub fn build_cors(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::very_permissive();
    }
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o.trim()) {
            Ok(v) => Some(v),
            Err(_) => {
                warn!(origin = %o, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    CorsLayer::new()
        .allow_origin(allowed)
        .allow_methods(Any)
        .allow_headers(Any)
}

fn api_routes() -> Router<ServerState> {
    Router::new()
        .route("/clients", get(clients::list).post(clients::create))
        .route("/clients/:id", get(clients::get).patch(clients::update).delete(clients::delete))
        .route("/job-types", get(job_types::list).post(job_types::create))
        .route("/job-types/:id", get(job_types::get).patch(job_types::update).delete(job_types::delete))
        .route("/jobs", get(jobs::list).post(jobs::create))
        .route("/jobs/upcoming", get(jobs::upcoming))
        .route("/jobs/:id", get(jobs::get).patch(jobs::update).delete(jobs::delete))
        .route("/jobs/:id/status", patch(jobs::update_status))
}

/// Build the full application router: health, API, OpenAPI docs and, when
/// `static_dir` is given, the frontend bundle with `index.html` fallback.
pub fn build_router(state: ServerState, cors: CorsLayer, static_dir: Option<&str>) -> Router {
    let mut app = Router::new()
        .route("/health", get(health))
        .merge(api_routes())
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    if let Some(dir) = static_dir {
        let index = Path::new(dir).join("index.html");
        app = app.fallback_service(ServeDir::new(dir).fallback(ServeFile::new(index)));
    }

    app.layer(cors)
        .layer(
            TraceLayer::new_for_http()
                // 每次请求创建 span，包含方法和路径等，日志级别为 INFO
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(
                    DefaultOnRequest::new()
                        .level(Level::INFO),
                )
                // 响应返回时打点，包含状态码与耗时
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                // 失败（5xx 等）时以 ERROR 记录
                .on_failure(
                    DefaultOnFailure::new()
                        .level(Level::ERROR),
                )
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request, StatusCode};
    use service::jobs::schedule::SchedulePolicy;
    use tower::ServiceExt;

    fn app() -> Router {
        build_router(ServerState::in_memory(SchedulePolicy::default()), build_cors(&[]), None)
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let res = app().oneshot(Request::get("/health").body(Body::empty()).unwrap()).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let body = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        assert_eq!(serde_json::from_slice::<serde_json::Value>(&body).unwrap(), serde_json::json!({"status": "ok"}));
    }

    #[tokio::test]
    async fn openapi_document_lists_job_routes() {
        let res = app().oneshot(Request::get("/api-docs/openapi.json").body(Body::empty()).unwrap()).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let body = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let doc: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert!(doc["paths"]["/jobs/upcoming"].is_object());
        assert!(doc["paths"]["/jobs/{id}/status"]["patch"].is_object());
    }

    #[tokio::test]
    async fn configured_origin_is_echoed() {
        let app = build_router(
            ServerState::in_memory(SchedulePolicy::default()),
            build_cors(&["http://localhost:5173".to_string()]),
            None,
        );
        let req = Request::builder()
            .method(Method::GET)
            .uri("/health")
            .header(header::ORIGIN, "http://localhost:5173")
            .body(Body::empty())
            .unwrap();
        let res = app.oneshot(req).await.unwrap();
        assert_eq!(
            res.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).map(|v| v.as_bytes()),
            Some(&b"http://localhost:5173"[..])
        );
    }

    #[tokio::test]
    async fn blank_query_values_mean_absent() {
        for uri in ["/jobs?date=", "/jobs/upcoming?days="] {
            let res = app().oneshot(Request::get(uri).body(Body::empty()).unwrap()).await.unwrap();
            assert_eq!(res.status(), StatusCode::OK, "{uri}");
        }
        let res = app().oneshot(Request::get("/jobs/upcoming?days=abc").body(Body::empty()).unwrap()).await.unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            res.headers().get(header::CONTENT_TYPE).map(|v| v.as_bytes()),
            Some(&b"application/json"[..])
        );
    }

    #[tokio::test]
    async fn unknown_route_without_static_dir_is_404() {
        let res = app().oneshot(Request::get("/nope").body(Body::empty()).unwrap()).await.unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }
}
