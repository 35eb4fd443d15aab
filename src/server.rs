//! HTTP service for the prediction endpoints.
//!
//! The service is stateless: the only persistent state is the immutable
//! artifact store built once at startup and shared read-only across request
//! handlers. Every internal failure is translated at the handler boundary
//! into a uniform `{"error": ...}` body; internal details are logged, never
//! returned.

use crate::artifacts::{ArtifactStore, Capability};
use crate::config::ServerConfig;
use crate::error::{AgrocastError, Result};
use crate::observability;
use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use ndarray::Array2;
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{debug, error, info};

/// Required soil feature names, in array-construction order.
pub const SOIL_FEATURES: [&str; 12] = [
    "N", "P", "K", "pH", "EC", "OC", "S", "Zn", "Fe", "Cu", "Mn", "B",
];

/// Number of values in a weather observation (one time-step).
pub const WEATHER_FEATURES: usize = 3;

/// Shared request-handler state.
#[derive(Clone)]
pub struct AppState {
    artifacts: Arc<ArtifactStore>,
    metrics: Option<PrometheusHandle>,
}

impl AppState {
    pub fn new(artifacts: Arc<ArtifactStore>, metrics: Option<PrometheusHandle>) -> Self {
        Self { artifacts, metrics }
    }
}

/// Run the prediction server.
pub async fn run_server(config: &ServerConfig, state: AppState) -> Result<()> {
    let app = router(state, config.cors);

    let listener = TcpListener::bind(config.bind_addr).await?;
    info!(addr = %config.bind_addr, "Prediction server listening");

    axum::serve(listener, app)
        .await
        .map_err(|e| AgrocastError::Network(e.to_string()))?;

    Ok(())
}

/// Build the service router.
pub fn router(state: AppState, cors: bool) -> Router {
    let mut app = Router::new()
        .route("/", get(handle_health))
        .route("/soil-analysis", post(handle_soil_analysis))
        .route("/weather-prediction", post(handle_weather_prediction));

    if state.metrics.is_some() {
        app = app.route("/metrics", get(handle_metrics));
    }

    if cors {
        app = app.layer(middleware::from_fn(permissive_cors));
    }

    app.with_state(state)
}

// Response types

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    models_loaded: ModelsLoaded,
}

#[derive(Debug, Serialize)]
struct ModelsLoaded {
    soil_analysis: bool,
    weather_prediction: bool,
}

/// Soil analysis result.
#[derive(Debug, Clone, Serialize)]
pub struct SoilResponse {
    pub fertility_status: &'static str,
    pub confidence: f64,
}

/// Weather prediction result.
#[derive(Debug, Clone, Serialize)]
pub struct WeatherResponse {
    pub predicted_temperature: f64,
}

// Handlers

async fn handle_health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        models_loaded: ModelsLoaded {
            soil_analysis: state.artifacts.has_model(Capability::Soil),
            weather_prediction: state.artifacts.has_model(Capability::Weather),
        },
    })
}

async fn handle_metrics(State(state): State<AppState>) -> String {
    state.metrics.map(|h| h.render()).unwrap_or_default()
}

async fn handle_soil_analysis(
    State(state): State<AppState>,
    body: Option<Json<Value>>,
) -> Response {
    let body = body.map(|Json(v)| v);
    respond(
        Capability::Soil,
        analyze_soil(&state.artifacts, body.as_ref()),
    )
}

async fn handle_weather_prediction(
    State(state): State<AppState>,
    body: Option<Json<Value>>,
) -> Response {
    let body = body.map(|Json(v)| v);
    respond(
        Capability::Weather,
        predict_weather(&state.artifacts, body.as_ref()),
    )
}

/// Single boundary translator from operation result to HTTP response.
fn respond<T: Serialize>(capability: Capability, result: Result<T>) -> Response {
    match result {
        Ok(value) => {
            observability::record_prediction(capability.as_str(), "success");
            Json(value).into_response()
        }
        Err(e) => {
            let status = e.status_code();
            if e.is_client_error() {
                debug!(capability = capability.as_str(), error = %e, "Rejected request");
                observability::record_prediction(capability.as_str(), "client_error");
            } else {
                error!(capability = capability.as_str(), error = %e, "Prediction failed");
                observability::record_prediction(capability.as_str(), "error");
            }

            let message = e
                .public_message()
                .unwrap_or_else(|| format!("Internal server error during {}", capability));
            (status, Json(json!({ "error": message }))).into_response()
        }
    }
}

// Operations

/// Soil fertility analysis over a JSON request body.
pub fn analyze_soil(artifacts: &ArtifactStore, body: Option<&Value>) -> Result<SoilResponse> {
    let (model, scaler) = artifacts.get(Capability::Soil)?;

    let data = body
        .and_then(Value::as_object)
        .filter(|m| !m.is_empty())
        .ok_or_else(|| AgrocastError::InvalidInput("No soil data provided".to_string()))?;

    if !SOIL_FEATURES.iter().all(|f| data.contains_key(*f)) {
        return Err(AgrocastError::InvalidInput(
            "Missing required soil features".to_string(),
        ));
    }

    let mut features = Array2::zeros((1, SOIL_FEATURES.len()));
    for (i, name) in SOIL_FEATURES.iter().enumerate() {
        features[[0, i]] = data[*name].as_f64().ok_or_else(|| {
            AgrocastError::InvalidInput(format!("Soil feature {} must be a number", name))
        })?;
    }

    let scaled = scaler.transform(&features)?;
    let prediction = model.predict_scalar(&scaled)?;

    Ok(SoilResponse {
        fertility_status: if prediction > 0.5 { "High" } else { "Low" },
        confidence: prediction * 100.0,
    })
}

/// Weather temperature prediction over a JSON request body.
pub fn predict_weather(artifacts: &ArtifactStore, body: Option<&Value>) -> Result<WeatherResponse> {
    let (model, scaler) = artifacts.get(Capability::Weather)?;

    let values = extract_weather_values(body)?;

    // One observation of 1 time-step x 3 features; the scaler operates on
    // the flattened 3-feature row.
    let features = Array2::from_shape_vec((1, WEATHER_FEATURES), values)
        .map_err(|e| AgrocastError::Inference(e.to_string()))?;
    let scaled = scaler.transform(&features)?;
    let prediction = model.predict_scalar(&scaled)?;

    Ok(WeatherResponse {
        predicted_temperature: prediction,
    })
}

/// Extract the 3-value weather observation from a request body.
///
/// Accepts a bare JSON array or an object with a `data` key. An absent or
/// non-array `data` key reports a count of 0 rather than faulting.
fn extract_weather_values(body: Option<&Value>) -> Result<Vec<f64>> {
    let items = match body {
        Some(Value::Array(items)) => items,
        Some(Value::Object(map)) => match map.get("data") {
            Some(Value::Array(items)) => items,
            _ => return Err(weather_count_error(0)),
        },
        _ => {
            return Err(AgrocastError::InvalidInput(
                "Invalid input format. Expected a JSON array or object.".to_string(),
            ))
        }
    };

    if items.len() != WEATHER_FEATURES {
        return Err(weather_count_error(items.len()));
    }

    items
        .iter()
        .map(|v| {
            v.as_f64().ok_or_else(|| {
                AgrocastError::InvalidInput("Weather values must be numbers".to_string())
            })
        })
        .collect()
}

fn weather_count_error(got: usize) -> AgrocastError {
    AgrocastError::InvalidInput(format!(
        "Invalid input size. Expected a JSON array with exactly {} values, but got {} values.",
        WEATHER_FEATURES, got
    ))
}

// Middleware

/// Permissive CORS for browser clients.
async fn permissive_cors(request: Request, next: Next) -> Response {
    if request.method() == Method::OPTIONS {
        let mut response = StatusCode::NO_CONTENT.into_response();
        apply_cors_headers(&mut response);
        return response;
    }

    let mut response = next.run(request).await;
    apply_cors_headers(&mut response);
    response
}

fn apply_cors_headers(response: &mut Response) {
    let headers = response.headers_mut();
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET, POST, OPTIONS"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type"),
    );
}
