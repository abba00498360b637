//! HTTP frontend: a single page plus the refine, generate and proxy routes.

pub mod error;
pub mod handlers;

use anyhow::Context;
use axum::{
    routing::{get, post},
    Router,
};
use prism_core::{ImageGenerator, ImageProxy, Refiner};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::{services::ServeDir, trace::TraceLayer};

/// Shared services, built once at startup and cloned into every request.
#[derive(Clone)]
pub struct AppState {
    pub refiner: Arc<Refiner>,
    pub generator: Arc<ImageGenerator>,
    pub proxy: Arc<ImageProxy>,
    pub index_html: Arc<str>,
    pub static_dir: PathBuf,
}

/// Build the router with all routes registered.
pub fn create_app(state: AppState) -> Router {
    let static_files = ServeDir::new(&state.static_dir);

    Router::new()
        .route("/", get(handlers::index))
        .route("/refine_prompt", post(handlers::refine_prompt))
        .route("/generate", post(handlers::generate))
        .route("/proxy_image", get(handlers::proxy_image))
        .nest_service("/static", static_files)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind `addr` and serve until Ctrl-C.
pub async fn serve(addr: &str, state: AppState) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Prism listening on http://{}", listener.local_addr()?);

    axum::serve(listener, create_app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
    };
    use prism_core::{
        ChatProvider, ChatRequest, ChatResponse, GeneratedImage, ImageProvider, ImageRequest,
        ImageResponse, ProviderError,
    };
    use futures_util::StreamExt;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tower::ServiceExt;

    const SLOW_CHUNK_DELAY: Duration = Duration::from_secs(2);

    const PNG_BYTES: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 9, 8, 7];

    #[derive(Clone, Copy)]
    enum ChatMode {
        Wrapped,
        Failing,
        Panicking,
    }

    struct FakeChat {
        mode: ChatMode,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ChatProvider for FakeChat {
        fn name(&self) -> &str {
            "fake-chat"
        }

        async fn complete(&self, _request: &ChatRequest) -> Result<ChatResponse, ProviderError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            match self.mode {
                ChatMode::Wrapped => Ok(ChatResponse {
                    text: format!("<refined_prompt> a fluffy cat, take {call} </refined_prompt>"),
                    model: "fake".to_string(),
                    tokens_used: None,
                    latency_ms: 0,
                }),
                ChatMode::Failing => Err(ProviderError::Api {
                    provider: "fake-chat".to_string(),
                    message: "HTTP 500: boom".to_string(),
                    status_code: Some(500),
                }),
                ChatMode::Panicking => panic!("provider exploded"),
            }
        }
    }

    struct FakeImages {
        fail: bool,
    }

    #[async_trait]
    impl ImageProvider for FakeImages {
        fn name(&self) -> &str {
            "fake-images"
        }

        async fn generate(&self, request: &ImageRequest) -> Result<ImageResponse, ProviderError> {
            if self.fail {
                return Err(ProviderError::Api {
                    provider: "fake-images".to_string(),
                    message: "HTTP 401: invalid api key".to_string(),
                    status_code: Some(401),
                });
            }
            Ok(ImageResponse {
                images: (0..request.n)
                    .map(|i| GeneratedImage {
                        url: format!("https://img.example/{i}.png"),
                    })
                    .collect(),
                model: "fake-flux".to_string(),
            })
        }
    }

    fn state_with(chat: ChatMode, images_fail: bool, static_dir: PathBuf) -> AppState {
        AppState {
            refiner: Arc::new(Refiner::new(Box::new(FakeChat {
                mode: chat,
                calls: AtomicUsize::new(0),
            }))),
            generator: Arc::new(ImageGenerator::new(Box::new(FakeImages {
                fail: images_fail,
            }))),
            proxy: Arc::new(ImageProxy::new()),
            index_html: Arc::from("<html><body>prism</body></html>"),
            static_dir,
        }
    }

    fn app(chat: ChatMode, images_fail: bool) -> Router {
        create_app(state_with(
            chat,
            images_fail,
            PathBuf::from("/nonexistent/prism-static"),
        ))
    }

    fn form_post(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn spawn_upstream() -> String {
        let upstream = Router::new()
            .route(
                "/cat.png",
                get(|| async { ([(header::CONTENT_TYPE, "image/png")], PNG_BYTES) }),
            )
            .route("/missing.png", get(|| async { StatusCode::NOT_FOUND }))
            .route(
                "/slow.png",
                get(|| async {
                    let chunks = futures_util::stream::iter([
                        (&b"first"[..], Duration::ZERO),
                        (&b"second"[..], SLOW_CHUNK_DELAY),
                    ])
                    .then(|(chunk, delay)| async move {
                        tokio::time::sleep(delay).await;
                        Ok::<_, std::io::Error>(axum::body::Bytes::from_static(chunk))
                    });
                    ([(header::CONTENT_TYPE, "image/png")], Body::from_stream(chunks))
                }),
            );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, upstream).await.unwrap();
        });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn test_index_serves_html() {
        let response = app(ChatMode::Wrapped, false)
            .oneshot(get_request("/"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap();
        assert!(content_type.starts_with("text/html"));
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"<html><body>prism</body></html>");
    }

    #[tokio::test]
    async fn test_refine_returns_n_stripped_prompts() {
        let response = app(ChatMode::Wrapped, false)
            .oneshot(form_post("/refine_prompt", "prompt=a+cat&n=2"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        let prompts = body["refined_prompts"].as_array().unwrap();
        assert_eq!(prompts.len(), 2);
        for prompt in prompts {
            let text = prompt.as_str().unwrap();
            assert!(text.starts_with("a fluffy cat, take "), "{text}");
            assert!(!text.contains("refined_prompt"));
        }
    }

    #[tokio::test]
    async fn test_refine_defaults_to_one() {
        let response = app(ChatMode::Wrapped, false)
            .oneshot(form_post("/refine_prompt", "prompt=a+cat"))
            .await
            .unwrap();

        let body = json_body(response).await;
        assert_eq!(body["refined_prompts"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_refine_provider_failure_falls_back_to_original() {
        let response = app(ChatMode::Failing, false)
            .oneshot(form_post("/refine_prompt", "prompt=a+cat&n=3"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(
            body,
            serde_json::json!({ "refined_prompts": ["a cat", "a cat", "a cat"] })
        );
    }

    #[tokio::test]
    async fn test_refine_task_failure_is_500() {
        let response = app(ChatMode::Panicking, false)
            .oneshot(form_post("/refine_prompt", "prompt=a+cat&n=2"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = json_body(response).await;
        assert_eq!(body, serde_json::json!({ "error": "Failed to refine prompts" }));
    }

    #[tokio::test]
    async fn test_refine_missing_prompt_is_rejected() {
        let response = app(ChatMode::Wrapped, false)
            .oneshot(form_post("/refine_prompt", "n=2"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_refine_empty_prompt_is_rejected() {
        let response = app(ChatMode::Wrapped, false)
            .oneshot(form_post("/refine_prompt", "prompt=&n=1"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_refine_empty_count_defaults_to_one() {
        let response = app(ChatMode::Wrapped, false)
            .oneshot(form_post("/refine_prompt", "prompt=a+cat&n="))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["refined_prompts"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_negative_count_is_rejected() {
        let response = app(ChatMode::Wrapped, false)
            .oneshot(form_post("/generate", "prompt=a+cat&n=-1"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_generate_returns_urls() {
        let response = app(ChatMode::Wrapped, false)
            .oneshot(form_post("/generate", "prompt=a+cat&n=3"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        let urls = body["image_urls"].as_array().unwrap();
        assert_eq!(urls.len(), 3);
        assert_eq!(urls[0], "https://img.example/0.png");
        assert!(urls
            .iter()
            .all(|u| u.as_str().unwrap().starts_with("https://")));
    }

    #[tokio::test]
    async fn test_generate_failure_is_500_envelope() {
        let response = app(ChatMode::Wrapped, true)
            .oneshot(form_post("/generate", "prompt=a+cat"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = json_body(response).await;
        assert_eq!(body, serde_json::json!({ "error": "Failed to generate image" }));
    }

    #[tokio::test]
    async fn test_proxy_passes_image_through() {
        let base = spawn_upstream().await;
        let uri = format!("/proxy_image?url={base}/cat.png");
        let response = app(ChatMode::Wrapped, false)
            .oneshot(get_request(&uri))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "image/png");
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], PNG_BYTES);
    }

    #[tokio::test]
    async fn test_proxy_streams_body_incrementally() {
        let base = spawn_upstream().await;
        let uri = format!("/proxy_image?url={base}/slow.png");
        let response = app(ChatMode::Wrapped, false)
            .oneshot(get_request(&uri))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "image/png");

        let mut body = response.into_body().into_data_stream();
        let first = tokio::time::timeout(SLOW_CHUNK_DELAY / 2, body.next())
            .await
            .expect("first chunk held back until the body completed")
            .unwrap()
            .unwrap();
        assert_eq!(&first[..], b"first");

        let second = body.next().await.unwrap().unwrap();
        assert_eq!(&second[..], b"second");
    }

    #[tokio::test]
    async fn test_proxy_upstream_404_is_400_with_detail() {
        let base = spawn_upstream().await;
        let uri = format!("/proxy_image?url={base}/missing.png");
        let response = app(ChatMode::Wrapped, false)
            .oneshot(get_request(&uri))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        let detail = body["detail"].as_str().unwrap();
        assert!(detail.starts_with("Error fetching image:"), "{detail}");
        assert!(detail.contains("404"), "{detail}");
    }

    #[tokio::test]
    async fn test_proxy_missing_url_is_400() {
        let response = app(ChatMode::Wrapped, false)
            .oneshot(get_request("/proxy_image"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_static_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("app.js"), "console.log('prism');").unwrap();
        let app = create_app(state_with(
            ChatMode::Wrapped,
            false,
            dir.path().to_path_buf(),
        ));

        let response = app.clone().oneshot(get_request("/static/app.js")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"console.log('prism');");

        let response = app.oneshot(get_request("/static/missing.js")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let response = app(ChatMode::Wrapped, false)
            .oneshot(get_request("/nope"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
