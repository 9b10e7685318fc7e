use axum::extract::multipart::MultipartRejection;
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tower::ServiceExt;
use tracing::warn;

use crate::config::Configuration;
use crate::error::AppError;
use crate::network::cors::cors_layer;
use crate::network::response::{ServiceStatus, SeverityResponse};
use crate::pipeline::services::into_analysis_error;
use crate::pipeline::AnalysisService;

const UPLOAD_FIELD: &str = "file";
const STATUS_MESSAGE: &str = "AgriVision AI Service Running";

#[derive(Clone)]
pub struct AppState {
    analysis: AnalysisService,
}

impl AppState {
    pub fn new(analysis: AnalysisService) -> Self {
        Self { analysis }
    }
}

/// Routes:
/// - `GET /` service banner
/// - `GET /health` liveness
/// - `POST /analyze-severity` multipart upload, field `file`
pub fn app_router(
    configuration: &Configuration,
    analysis: AnalysisService,
) -> Result<Router, AppError> {
    let router = Router::new()
        .route("/", get(service_status))
        .route("/health", get(health))
        .route("/analyze-severity", post(analyze_severity))
        .with_state(AppState::new(analysis))
        .layer(DefaultBodyLimit::max(configuration.server.max_upload_bytes));

    Ok(match cors_layer(&configuration.cors)? {
        Some(cors) => router.layer(cors),
        None => router,
    })
}

async fn service_status() -> Json<ServiceStatus> {
    Json(ServiceStatus {
        status: STATUS_MESSAGE,
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn analyze_severity(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    let mut multipart = match multipart {
        Ok(multipart) => multipart,
        Err(rejection) => {
            warn!("Rejected upload: {}", rejection);
            return unprocessable(rejection.body_text());
        }
    };

    let upload = loop {
        match multipart.next_field().await {
            Ok(Some(field)) if field.name() == Some(UPLOAD_FIELD) => match field.bytes().await {
                Ok(bytes) => break bytes,
                Err(e) => {
                    warn!("Failed to read upload bytes: {}", e);
                    return (e.status(), Json(SeverityResponse::error(e.body_text())))
                        .into_response();
                }
            },
            Ok(Some(_)) => continue,
            Ok(None) => return unprocessable(format!("Missing form field '{UPLOAD_FIELD}'")),
            Err(e) => {
                warn!("Malformed multipart body: {}", e);
                return (e.status(), Json(SeverityResponse::error(e.body_text())))
                    .into_response();
            }
        }
    };

    let result = state
        .analysis
        .clone()
        .oneshot(upload)
        .await
        .map_err(into_analysis_error);

    // Every analysis outcome, failures included, is a 200 with its own body shape.
    Json(SeverityResponse::from(result)).into_response()
}

fn unprocessable(message: impl Into<String>) -> Response {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(SeverityResponse::error(message)),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CorsConfiguration, CorsPolicy};
    use crate::pipeline::build_analysis_service;
    use axum::body::Body;
    use axum::http::{header, Method, Request};
    use http_body_util::BodyExt;
    use image::{DynamicImage, ImageBuffer, ImageFormat, Rgb};
    use std::io::Cursor;

    const BOUNDARY: &str = "agrivision-test-boundary";

    fn test_router(configuration: Configuration) -> Router {
        let analysis = build_analysis_service(&configuration.analysis);
        app_router(&configuration, analysis).unwrap()
    }

    fn png(color: Rgb<u8>) -> Vec<u8> {
        let mut out = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(ImageBuffer::from_pixel(16, 16, color))
            .write_to(&mut out, ImageFormat::Png)
            .unwrap();
        out.into_inner()
    }

    fn multipart_request(field: &str, payload: &[u8]) -> Request<Body> {
        let mut body = Vec::new();
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{field}\"; filename=\"leaf.bin\"\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
        body.extend_from_slice(payload);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

        Request::builder()
            .method(Method::POST)
            .uri("/analyze-severity")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn json_body(response: Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn root_reports_status_and_version() {
        let app = test_router(Configuration::default());
        let response = app
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            json_body(response).await,
            json!({ "status": "AgriVision AI Service Running", "version": "1.0.0" })
        );
    }

    #[tokio::test]
    async fn health_is_ok() {
        let app = test_router(Configuration::default());
        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn healthy_leaf_upload_is_measured() {
        let app = test_router(Configuration::default());
        let response = app
            .oneshot(multipart_request("file", &png(Rgb([43, 200, 43]))))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["severity_level"], "Healthy");
        assert_eq!(body["severity_percentage"], 0.0);
        assert_eq!(body["details"]["diseased_pixels"], 0);
        assert_eq!(body["details"]["green_pixels"], 250_000);
        assert_eq!(body["details"]["total_leaf_pixels"], 250_000);
        assert_eq!(body["method"], "HSV Color Segmentation Algorithm");
    }

    #[tokio::test]
    async fn leafless_upload_reports_unknown() {
        let app = test_router(Configuration::default());
        let response = app
            .oneshot(multipart_request("file", &png(Rgb([0, 0, 255]))))
            .await
            .unwrap();
        assert_eq!(
            json_body(response).await,
            json!({
                "severity_percentage": 0,
                "severity_level": "Unknown",
                "message": "No leaf detected"
            })
        );
    }

    #[tokio::test]
    async fn malformed_upload_returns_only_error() {
        let app = test_router(Configuration::default());
        let response = app
            .oneshot(multipart_request("file", b"this is not a picture"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            json_body(response).await,
            json!({ "error": "Invalid image format" })
        );
    }

    #[tokio::test]
    async fn missing_file_field_is_unprocessable() {
        let app = test_router(Configuration::default());
        let response = app
            .oneshot(multipart_request("photo", &png(Rgb([43, 200, 43]))))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = json_body(response).await;
        assert!(body["error"].is_string());
        assert!(body.get("severity_level").is_none());
    }

    #[tokio::test]
    async fn upload_over_body_limit_is_rejected() {
        let mut configuration = Configuration::default();
        configuration.server.max_upload_bytes = 256;
        let app = test_router(configuration);
        let response = app
            .oneshot(multipart_request("file", &[0u8; 4096]))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        let body = json_body(response).await;
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn non_multipart_body_is_unprocessable() {
        let app = test_router(Configuration::default());
        let request = Request::post("/analyze-severity")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{}"))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn permissive_cors_mirrors_origin_with_credentials() {
        let app = test_router(Configuration::default());
        let request = Request::builder()
            .method(Method::OPTIONS)
            .uri("/analyze-severity")
            .header(header::ORIGIN, "http://phone.local:19006")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        let headers = response.headers();
        assert_eq!(
            headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "http://phone.local:19006"
        );
        assert_eq!(
            headers.get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS).unwrap(),
            "true"
        );
    }

    #[tokio::test]
    async fn disabled_cors_sends_no_cors_headers() {
        let configuration = Configuration {
            cors: CorsConfiguration {
                policy: CorsPolicy::Disabled,
                allowed_origins: Vec::new(),
            },
            ..Configuration::default()
        };
        let app = test_router(configuration);
        let request = Request::get("/")
            .header(header::ORIGIN, "http://phone.local:19006")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert!(response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .is_none());
    }
}
