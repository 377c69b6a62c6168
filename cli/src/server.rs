pub mod http {
    use axum::{
        extract::State,
        http::StatusCode,
        response::{IntoResponse, Json},
        routing::{get, post},
        Router,
    };
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine as _;
    use mathnotes::{Pipeline, Recognizer};
    use serde::{Deserialize, Serialize};
    use std::io::Write;
    use std::net::SocketAddr;
    use std::sync::Arc;
    use tower_http::cors::CorsLayer;
    use tracing::{error, info};

    pub struct AppState {
        pub pipeline: Pipeline,
        pub recognizer: Box<dyn Recognizer + Send + Sync>,
    }

    type SharedState = Arc<AppState>;

    #[derive(Debug, Deserialize)]
    struct CalculateRequest {
        image: Option<String>,
    }

    #[derive(Debug, Serialize)]
    struct ErrorResponse {
        error: String,
    }

    pub async fn start_server(state: AppState, host: &str, port: u16) -> anyhow::Result<()> {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "mathnotes=info,tower_http=info".into()),
            )
            .init();

        let app = router(Arc::new(state));
        let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
        info!("mathnotes server listening on {}", addr);

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app).await?;

        Ok(())
    }

    pub fn router(state: SharedState) -> Router {
        Router::new()
            .route("/health", get(health_check))
            .route("/calculate", post(calculate))
            .layer(CorsLayer::permissive())
            .with_state(state)
    }

    async fn health_check() -> impl IntoResponse {
        Json(serde_json::json!({
            "status": "ok",
            "service": "mathnotes",
            "version": env!("CARGO_PKG_VERSION")
        }))
    }

    /// Decode the image, hand it to the recognition adapter through a
    /// transient file, and run the pipeline. The caller receives either
    /// the full list of per-line records or one top-level error object.
    async fn calculate(
        State(state): State<SharedState>,
        Json(payload): Json<CalculateRequest>,
    ) -> Result<impl IntoResponse, (StatusCode, Json<ErrorResponse>)> {
        let Some(image_data) = payload.image.filter(|data| !data.is_empty()) else {
            return Err(bad_request("No image data provided".to_string()));
        };

        let bytes = STANDARD
            .decode(image_data.as_bytes())
            .map_err(|e| bad_request(format!("Invalid base64 image data: {}", e)))?;

        let mut temp = tempfile::Builder::new()
            .prefix("mathnotes-")
            .suffix(".png")
            .tempfile()
            .map_err(|e| internal(format!("Failed to save temporary image: {}", e)))?;
        temp.write_all(&bytes)
            .and_then(|_| temp.flush())
            .map_err(|e| internal(format!("Failed to save temporary image: {}", e)))?;

        let records = state
            .pipeline
            .process_image(state.recognizer.as_ref(), temp.path())
            .map_err(|e| {
                error!(error = %e, "recognition failed");
                internal(e.to_string())
            })?;

        info!(records = records.len(), "processed image");
        Ok(Json(records))
    }

    fn bad_request(error: String) -> (StatusCode, Json<ErrorResponse>) {
        (StatusCode::BAD_REQUEST, Json(ErrorResponse { error }))
    }

    fn internal(error: String) -> (StatusCode, Json<ErrorResponse>) {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse { error }),
        )
    }
}
