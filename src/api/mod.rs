//! Salescast HTTP API
//!
//! Dashboard server for Salescast, built with Axum.
//!
//! # Endpoints
//!
//! ## Dashboard
//! - `GET /` - Upload form
//! - `POST /` - Multipart CSV upload, renders the dashboard
//!
//! ## Forecast
//! - `POST /api/v1/forecast` - Raw CSV body, JSON forecast
//!
//! ## Health
//! - `GET /health/live` - Liveness probe
//! - `GET /health/ready` - Readiness probe
//! - `GET /health` - Full health status
//!
//! # Example
//!
//! ```rust,ignore
//! use salescast::api::{serve, AppState};
//! use salescast::config::Config;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load_default();
//!     let state = AppState::from_config(&config);
//!     serve(state).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod dto;
pub mod error;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use state::{ApiConfig, AppState};

use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

/// Build the router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.body_limit();
    let cors = cors_layer(&state.config.cors_origins);

    let api_routes = Router::new().route("/forecast", post(routes::forecast::forecast_csv));

    let health_routes = Router::new()
        .route("/live", get(routes::health::liveness))
        .route("/ready", get(routes::health::readiness))
        .route("/", get(routes::health::full_health));

    let shared_state = Arc::new(state);

    Router::new()
        .route(
            "/",
            get(routes::dashboard::index).post(routes::dashboard::upload),
        )
        .nest("/api/v1", api_routes)
        .nest("/health", health_routes)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(shared_state)
}

/// Permissive when no origins are configured
fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::permissive();
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any)
}

/// Start the server
pub async fn serve(state: AppState) -> Result<(), ApiError> {
    let addr = state.config.addr();
    let router = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Salescast listening on http://{}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ApiError::Internal(format!("Server error: {}", e)))?;

    tracing::info!("Salescast shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::test_support::MeanForecaster;
    use crate::dashboard::DashboardSettings;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
        response::Response,
    };
    use tower::util::ServiceExt;

    const BOUNDARY: &str = "salescast-test-boundary";

    fn create_test_app(config: ApiConfig) -> (Router, Arc<MeanForecaster>) {
        let forecaster = Arc::new(MeanForecaster::default());
        let state = AppState::new(
            Arc::clone(&forecaster) as Arc<dyn crate::forecast::Forecaster>,
            DashboardSettings::default(),
            config,
        );
        (build_router(state), forecaster)
    }

    fn sales_csv() -> String {
        let mut csv_data = String::from("date,sales\n");
        for d in 1..=10 {
            csv_data.push_str(&format!("2024-01-{:02},{}\n", d, 100 + d));
        }
        csv_data
    }

    fn multipart_request(field: &str, csv_data: &str) -> Request<Body> {
        let body = format!(
            "--{b}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"sales.csv\"\r\nContent-Type: text/csv\r\n\r\n{csv_data}\r\n--{b}--\r\n",
            b = BOUNDARY,
            field = field,
            csv_data = csv_data,
        );

        Request::builder()
            .method("POST")
            .uri("/")
            .header(
                "Content-Type",
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(body))
            .unwrap()
    }

    fn forecast_request(uri: &str, csv_data: impl Into<Body>) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("Content-Type", "text/csv")
            .body(csv_data.into())
            .unwrap()
    }

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_live() {
        let (app, _) = create_test_app(ApiConfig::default());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health/live")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_health_ready() {
        let (app, _) = create_test_app(ApiConfig::default());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health/ready")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_health_full() {
        let (app, _) = create_test_app(ApiConfig::default());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["forecaster"], "mean");
        assert_eq!(json["horizon_days"], 30);
    }

    #[tokio::test]
    async fn test_index_shows_upload_prompt() {
        let (app, _) = create_test_app(ApiConfig::default());

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("Sales Forecasting Dashboard"));
        assert!(html.contains("Please upload a CSV file with"));
        assert!(html.contains("name=\"file\""));
    }

    #[tokio::test]
    async fn test_forecast_json() {
        let (app, forecaster) = create_test_app(ApiConfig::default());

        let response = app
            .oneshot(forecast_request("/api/v1/forecast", sales_csv()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;

        assert_eq!(json["columns"], serde_json::json!(["date", "sales"]));
        assert_eq!(json["preview"].as_array().unwrap().len(), 5);
        assert_eq!(json["preview"][0][0], "2024-01-01");

        let tail = json["tail"].as_array().unwrap();
        assert_eq!(tail.len(), 5);
        assert_eq!(tail[4]["ds"], "2024-02-09T00:00:00");
        assert!(tail[4].get("yhat_lower").is_some());
        assert!(tail[4].get("yhat_upper").is_some());

        assert_eq!(json["forecast"].as_array().unwrap().len(), 40);
        assert!(json.get("charts").is_none());
        assert_eq!(forecaster.calls(), 1);
    }

    #[tokio::test]
    async fn test_forecast_json_with_charts() {
        let (app, _) = create_test_app(ApiConfig::default());

        let response = app
            .oneshot(forecast_request(
                "/api/v1/forecast?include_charts=true",
                sales_csv(),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert!(json["charts"]["forecast"]
            .as_str()
            .unwrap()
            .contains("forecast-chart"));
        assert!(json["charts"]["components"]
            .as_str()
            .unwrap()
            .contains("<svg"));
    }

    #[tokio::test]
    async fn test_missing_columns_skips_forecast() {
        let (app, forecaster) = create_test_app(ApiConfig::default());

        let response = app
            .oneshot(forecast_request(
                "/api/v1/forecast",
                "day,amount\n2024-01-01,10\n",
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "MISSING_COLUMNS");
        assert_eq!(forecaster.calls(), 0);
    }

    #[tokio::test]
    async fn test_invalid_date_is_reported() {
        let (app, forecaster) = create_test_app(ApiConfig::default());

        let response = app
            .oneshot(forecast_request(
                "/api/v1/forecast",
                "date,sales\n2024-01-01,10\nsoon,12\n",
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "INVALID_DATE");
        assert_eq!(json["error"]["details"]["value"], "soon");
        assert_eq!(forecaster.calls(), 0);
    }

    #[tokio::test]
    async fn test_upload_too_large() {
        let mut config = ApiConfig::default();
        config.max_upload_bytes = 32;
        let (app, forecaster) = create_test_app(config);

        let response = app
            .oneshot(forecast_request("/api/v1/forecast", sales_csv()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(forecaster.calls(), 0);
    }

    #[tokio::test]
    async fn test_multipart_upload_renders_dashboard() {
        let (app, forecaster) = create_test_app(ApiConfig::default());

        let response = app
            .oneshot(multipart_request("file", &sales_csv()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("Uploaded Data Preview"));
        assert!(html.contains("Forecasted Data"));
        assert!(html.contains("Forecast Visualization"));
        assert!(html.contains("Forecast Components"));
        assert!(html.contains("2024-02-09"));
        assert_eq!(forecaster.calls(), 1);
    }

    #[tokio::test]
    async fn test_multipart_missing_columns_renders_error() {
        let (app, forecaster) = create_test_app(ApiConfig::default());

        let response = app
            .oneshot(multipart_request("file", "day,amount\n2024-01-01,10\n"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let html = body_text(response).await;
        assert!(html.contains("CSV must contain"));
        assert!(!html.contains("Forecasted Data"));
        assert_eq!(forecaster.calls(), 0);
    }

    #[tokio::test]
    async fn test_multipart_upload_too_large() {
        let mut config = ApiConfig::default();
        config.max_upload_bytes = 1024;
        let (app, forecaster) = create_test_app(config);

        let mut csv_data = String::from("date,sales\n");
        while csv_data.len() < 200 * 1024 {
            csv_data.push_str("2024-01-01,100\n");
        }

        let response = app
            .oneshot(multipart_request("file", &csv_data))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        let html = body_text(response).await;
        assert!(html.contains("exceeds the limit of 1024 bytes"));
        assert_eq!(forecaster.calls(), 0);
    }

    #[tokio::test]
    async fn test_multipart_na_sales_are_missing() {
        let (app, forecaster) = create_test_app(ApiConfig::default());

        let response = app
            .oneshot(multipart_request(
                "file",
                "date,sales\n2024-01-01,10\n2024-01-02,NA\n2024-01-03,12\n",
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(forecaster.calls(), 1);
    }

    #[tokio::test]
    async fn test_infinite_sales_is_user_error() {
        let (app, forecaster) = create_test_app(ApiConfig::default());

        let response = app
            .oneshot(forecast_request(
                "/api/v1/forecast",
                "date,sales\n2024-01-01,10\n2024-01-02,inf\n",
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "INVALID_SALES");
        assert_eq!(forecaster.calls(), 0);
    }

    #[tokio::test]
    async fn test_multipart_without_file_field() {
        let (app, forecaster) = create_test_app(ApiConfig::default());

        let response = app
            .oneshot(multipart_request("attachment", &sales_csv()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(forecaster.calls(), 0);
    }

    #[test]
    fn test_cors_layer_skips_invalid_origin() {
        // Builds without panicking on a header-invalid origin
        let _ = cors_layer(&["http://localhost:3000".to_string(), "bad\norigin".to_string()]);
    }
}
