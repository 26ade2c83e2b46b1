use std::path::PathBuf;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{services::ServeDir, trace::TraceLayer};

use super::middleware::{cors_layer, logging_middleware, metrics_middleware};
use super::state::AppState;
use super::types::ApiError;
use super::{convert, download, health};
use crate::config::{AppConfig, CorsConfig};

/// HTTP surface settings that are not part of the shared state
#[derive(Debug, Clone)]
pub struct RouterOptions {
    pub cors: CorsConfig,
    pub uploads_dir: PathBuf,
    pub max_body_bytes: usize,
}

impl From<&AppConfig> for RouterOptions {
    fn from(config: &AppConfig) -> Self {
        Self {
            cors: config.cors.clone(),
            uploads_dir: config.uploads.dir.clone(),
            max_body_bytes: config.uploads.max_body_bytes,
        }
    }
}

/// Create the full router with application state
pub fn create_router(state: AppState, options: &RouterOptions) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))
        .route("/live", get(health::live_check))
        .route(
            "/download",
            get(download::download_video)
                .head(download::method_not_allowed)
                .fallback(download::method_not_allowed),
        )
        .route(
            "/convert",
            post(convert::convert_image)
                .fallback(convert::method_not_allowed)
                .layer(DefaultBodyLimit::max(options.max_body_bytes)),
        )
        .nest_service("/uploads", ServeDir::new(&options.uploads_dir))
        .fallback(not_found)
        .with_state(state)
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(logging_middleware))
        .layer(cors_layer(&options.cors))
        .layer(TraceLayer::new_for_http())
}

async fn not_found() -> ApiError {
    ApiError::not_found("Not found")
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request, StatusCode};
    use axum::response::Response;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::domain::video::MockMetadataResolver;
    use crate::domain::DomainError;
    use crate::infrastructure::cache::InMemoryMetadataCache;
    use crate::infrastructure::services::{
        ImageConversionConfig, ImageConversionService, VideoMetadataService,
    };

    const CAT_VIDEO: &str = r#"{"title":"Cat Video","duration":125.7,"categories":["Pets"],"formats":[{"url":"http://x/1","format":"360p"},{"url":"http://x/2"}]}"#;
    const BOUNDARY: &str = "X-TEST-BOUNDARY";

    struct TestApp {
        router: Router,
        state: AppState,
        _uploads: tempfile::TempDir,
    }

    fn test_app(resolver: MockMetadataResolver) -> TestApp {
        let uploads = tempfile::tempdir().unwrap();
        let video_service = VideoMetadataService::new(
            Arc::new(InMemoryMetadataCache::new()),
            Arc::new(resolver),
        );
        let image_service = ImageConversionService::new(ImageConversionConfig {
            output_dir: uploads.path().to_path_buf(),
            ..ImageConversionConfig::default()
        });
        let state = AppState::new(video_service, image_service);
        let options = RouterOptions {
            cors: CorsConfig::default(),
            uploads_dir: uploads.path().to_path_buf(),
            max_body_bytes: 1024 * 1024,
        };

        TestApp {
            router: create_router(state.clone(), &options),
            state,
            _uploads: uploads,
        }
    }

    fn unused_resolver() -> MockMetadataResolver {
        let mut resolver = MockMetadataResolver::new();
        resolver.expect_resolve().times(0);
        resolver
    }

    async fn send(app: &TestApp, request: Request<Body>) -> Response {
        app.router.clone().oneshot(request).await.unwrap()
    }

    async fn get(app: &TestApp, uri: &str) -> Response {
        send(app, Request::get(uri).body(Body::empty()).unwrap()).await
    }

    async fn json_body(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn png_bytes() -> Vec<u8> {
        let img = image::DynamicImage::ImageRgb8(image::RgbImage::from_pixel(
            8,
            8,
            image::Rgb([10, 200, 10]),
        ));
        let mut buf = Vec::new();
        img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
            .unwrap();
        buf
    }

    fn multipart_request(field: &str, file_name: &str, data: &[u8]) -> Request<Body> {
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{b}\r\nContent-Disposition: form-data; name=\"{f}\"; filename=\"{n}\"\r\nContent-Type: application/octet-stream\r\n\r\n",
                b = BOUNDARY,
                f = field,
                n = file_name
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());

        Request::post("/convert")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_download_missing_url_is_bad_request() {
        let app = test_app(unused_resolver());

        let response = get(&app, "/download").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = json_body(response).await;
        assert_eq!(body["error"]["message"], "Missing video URL");
        assert_eq!(body["error"]["type"], "invalid_request_error");
    }

    #[tokio::test]
    async fn test_download_empty_url_is_bad_request() {
        let app = test_app(unused_resolver());

        let response = get(&app, "/download?url=").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_download_rejects_other_methods() {
        let app = test_app(unused_resolver());

        let response = send(
            &app,
            Request::post("/download?url=https%3A%2F%2Fx%2Fcat")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        let body = json_body(response).await;
        assert_eq!(body["error"]["message"], "Invalid Request Method");
    }

    #[tokio::test]
    async fn test_download_head_is_not_allowed() {
        let app = test_app(unused_resolver());

        let response = send(
            &app,
            Request::head("/download?url=https%3A%2F%2Fx%2Fh")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert!(response.headers().get("x-cache").is_none());
        assert_eq!(app.state.video_service.cached_entries().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_download_resolves_once_then_serves_cache() {
        let mut resolver = MockMetadataResolver::new();
        resolver
            .expect_resolve()
            .withf(|u| u.as_str() == "https://x/cat")
            .times(1)
            .returning(|_| Ok(CAT_VIDEO.as_bytes().to_vec()));
        let app = test_app(resolver);

        let first = get(&app, "/download?url=https%3A%2F%2Fx%2Fcat").await;
        assert_eq!(first.status(), StatusCode::OK);
        assert_eq!(first.headers()["x-cache"], "MISS");
        let first_body = to_bytes(first.into_body(), usize::MAX).await.unwrap();

        let expected = json!({
            "title": "Cat Video",
            "thumbnail": "No Thumbnail",
            "duration": 125,
            "category": "Pets",
            "links": [{"link": "http://x/1", "quality": "360p"}]
        });
        assert_eq!(serde_json::from_slice::<Value>(&first_body).unwrap(), expected);

        let second = get(&app, "/download?url=https%3A%2F%2Fx%2Fcat").await;
        assert_eq!(second.status(), StatusCode::OK);
        assert_eq!(second.headers()["x-cache"], "HIT");
        let second_body = to_bytes(second.into_body(), usize::MAX).await.unwrap();

        assert_eq!(first_body, second_body);
    }

    #[tokio::test]
    async fn test_download_resolver_failure_is_server_error_and_not_cached() {
        let mut resolver = MockMetadataResolver::new();
        resolver
            .expect_resolve()
            .times(1)
            .returning(|_| Err(DomainError::resolution_failed("ERROR: Unsupported URL: https://x/bad")));
        let app = test_app(resolver);

        let response = get(&app, "/download?url=https%3A%2F%2Fx%2Fbad").await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = json_body(response).await;
        assert_eq!(
            body["error"]["message"],
            "Failed to fetch metadata: ERROR: Unsupported URL: https://x/bad"
        );
        assert_eq!(app.state.video_service.cached_entries().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_download_malformed_output_is_server_error() {
        let mut resolver = MockMetadataResolver::new();
        resolver
            .expect_resolve()
            .times(1)
            .returning(|_| Ok(b"not json".to_vec()));
        let app = test_app(resolver);

        let response = get(&app, "/download?url=https%3A%2F%2Fx%2Fodd").await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = json_body(response).await;
        assert_eq!(body["error"]["code"], "malformed_metadata");
        assert_eq!(app.state.video_service.cached_entries().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_cors_allows_configured_origin_only() {
        let mut resolver = MockMetadataResolver::new();
        resolver
            .expect_resolve()
            .returning(|_| Ok(CAT_VIDEO.as_bytes().to_vec()));
        let app = test_app(resolver);

        let allowed = send(
            &app,
            Request::get("/download?url=https%3A%2F%2Fx%2Fcat")
                .header(header::ORIGIN, "http://localhost:5173")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(
            allowed.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "http://localhost:5173"
        );

        let denied = send(
            &app,
            Request::get("/download?url=https%3A%2F%2Fx%2Fcat")
                .header(header::ORIGIN, "http://evil.example")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert!(denied
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .is_none());
    }

    #[tokio::test]
    async fn test_cors_preflight() {
        let app = test_app(unused_resolver());

        let response = send(
            &app,
            Request::builder()
                .method(Method::OPTIONS)
                .uri("/convert")
                .header(header::ORIGIN, "http://localhost:5173")
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

        assert!(response.status().is_success());
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "http://localhost:5173"
        );
    }

    #[tokio::test]
    async fn test_convert_writes_and_serves_images() {
        let app = test_app(unused_resolver());

        let response = send(&app, multipart_request("image", "cat.gif", &png_bytes())).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["message"], "Image uploaded and converted");

        let urls: Vec<&str> = body["images"]
            .as_array()
            .unwrap()
            .iter()
            .map(|i| i["url"].as_str().unwrap())
            .collect();
        assert_eq!(
            urls,
            vec![
                "/uploads/cat.png",
                "/uploads/cat.jpeg",
                "/uploads/cat.webp",
                "/uploads/cat.ico"
            ]
        );

        let served = get(&app, "/uploads/cat.png").await;
        assert_eq!(served.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_convert_without_image_field_is_bad_request() {
        let app = test_app(unused_resolver());

        let response = send(&app, multipart_request("document", "cat.png", &png_bytes())).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = json_body(response).await;
        assert_eq!(body["error"]["message"], "Failed to read image");
    }

    #[tokio::test]
    async fn test_convert_invalid_image_is_bad_request() {
        let app = test_app(unused_resolver());

        let response = send(&app, multipart_request("image", "cat.png", b"garbage")).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_convert_rejects_other_methods() {
        let app = test_app(unused_resolver());

        let response = get(&app, "/convert").await;
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_health_and_unknown_routes() {
        let app = test_app(unused_resolver());

        assert_eq!(get(&app, "/health").await.status(), StatusCode::OK);
        assert_eq!(get(&app, "/live").await.status(), StatusCode::OK);

        let ready = json_body(get(&app, "/ready").await).await;
        assert_eq!(ready["status"], "healthy");
        assert_eq!(ready["checks"][0]["message"], "0 entries");

        let missing = get(&app, "/nope").await;
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    }
}
