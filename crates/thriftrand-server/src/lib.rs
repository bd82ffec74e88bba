//! HTTP random-number server.
//!
//! Serves integers, fractions, shuffles and raw bytes from a single shared
//! [`Generator`]. The generator is not internally synchronized, so all
//! handlers go through one async mutex.

use std::sync::Arc;

use axum::{
    Router,
    extract::{Query, State},
    http::StatusCode,
    response::Json,
    routing::get,
};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use thriftrand_core::{EntropySource, Error, Generator, UniformRandom};

/// Generator type the server runs on. Boxing the source lets the binary pick
/// the OS, a device or a seeded stream at startup.
pub type SharedGenerator = Generator<Box<dyn EntropySource>>;

/// Upper bound on values per request for `int`, `float` and `shuffle`.
const MAX_COUNT: usize = 1024;
/// Upper bound on bytes per request.
const MAX_LENGTH: usize = 65536;

/// Shared server state.
struct AppState {
    generator: Mutex<SharedGenerator>,
}

#[derive(Deserialize, Default)]
struct IntParams {
    min: Option<i32>,
    max: Option<i32>,
    count: Option<usize>,
}

#[derive(Deserialize, Default)]
struct CountParams {
    count: Option<usize>,
}

#[derive(Deserialize, Default)]
struct ShuffleParams {
    n: Option<usize>,
}

#[derive(Deserialize, Default)]
struct BytesParams {
    length: Option<usize>,
    #[serde(rename = "type")]
    data_type: Option<String>,
}

#[derive(Serialize)]
struct DrawResponse {
    #[serde(rename = "type")]
    data_type: String,
    length: usize,
    data: serde_json::Value,
    success: bool,
    /// Error message if request failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl DrawResponse {
    fn ok(data_type: &str, length: usize, data: serde_json::Value) -> (StatusCode, Json<Self>) {
        Json(DrawResponse {
            data_type: data_type.to_string(),
            length,
            data,
            success: true,
            error: None,
        })
        .with_status(StatusCode::OK)
    }

    fn failed(data_type: &str, status: StatusCode, message: String) -> (StatusCode, Json<Self>) {
        Json(DrawResponse {
            data_type: data_type.to_string(),
            length: 0,
            data: serde_json::Value::Array(vec![]),
            success: false,
            error: Some(message),
        })
        .with_status(status)
    }

    /// Argument errors are the client's fault; source failures are ours.
    fn from_error(data_type: &str, err: &Error) -> (StatusCode, Json<Self>) {
        let status = match err {
            Error::InvalidRange { .. } | Error::InvalidModulus { .. } => StatusCode::BAD_REQUEST,
            Error::Source(_) => {
                log::warn!("{data_type} request failed: {err}");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self::failed(data_type, status, err.to_string())
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    source: String,
    cryptographic: bool,
    draws: u64,
    bits_delivered: f64,
    entropy_bytes: u64,
    raw_bytes: u64,
    rejections: u64,
    buffered_bits: f64,
    efficiency: f64,
}

trait JsonWithStatus<T> {
    fn with_status(self, status: StatusCode) -> (StatusCode, Json<T>);
}

impl<T> JsonWithStatus<T> for Json<T> {
    fn with_status(self, status: StatusCode) -> (StatusCode, Json<T>) {
        (status, self)
    }
}

async fn handle_int(
    State(state): State<Arc<AppState>>,
    Query(params): Query<IntParams>,
) -> (StatusCode, Json<DrawResponse>) {
    let min = params.min.unwrap_or(0);
    let max = params.max.unwrap_or(100);
    let count = params.count.unwrap_or(1).clamp(1, MAX_COUNT);

    let mut generator = state.generator.lock().await;
    let drawn: Result<Vec<i32>, Error> =
        (0..count).map(|_| generator.next_in_range(min, max)).collect();
    drop(generator);

    match drawn {
        Ok(values) => DrawResponse::ok("int", values.len(), serde_json::json!(values)),
        Err(e) => DrawResponse::from_error("int", &e),
    }
}

async fn handle_float(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CountParams>,
) -> (StatusCode, Json<DrawResponse>) {
    let count = params.count.unwrap_or(1).clamp(1, MAX_COUNT);

    let mut generator = state.generator.lock().await;
    let drawn: Result<Vec<f64>, Error> = (0..count).map(|_| generator.next_f64()).collect();
    drop(generator);

    match drawn {
        Ok(values) => DrawResponse::ok("float", values.len(), serde_json::json!(values)),
        Err(e) => DrawResponse::from_error("float", &e),
    }
}

async fn handle_shuffle(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ShuffleParams>,
) -> (StatusCode, Json<DrawResponse>) {
    let n = params.n.unwrap_or(10);
    if n > MAX_COUNT {
        return DrawResponse::failed(
            "shuffle",
            StatusCode::BAD_REQUEST,
            format!("n must be at most {MAX_COUNT}"),
        );
    }

    let mut items: Vec<usize> = (0..n).collect();
    let shuffled = state.generator.lock().await.shuffle(&mut items);

    match shuffled {
        Ok(()) => DrawResponse::ok("shuffle", n, serde_json::json!(items)),
        Err(e) => DrawResponse::from_error("shuffle", &e),
    }
}

async fn handle_bytes(
    State(state): State<Arc<AppState>>,
    Query(params): Query<BytesParams>,
) -> (StatusCode, Json<DrawResponse>) {
    let length = params.length.unwrap_or(32).clamp(1, MAX_LENGTH);
    let data_type = params.data_type.unwrap_or_else(|| "hex".to_string());
    if data_type != "hex" && data_type != "uint8" {
        return DrawResponse::failed(
            &data_type,
            StatusCode::BAD_REQUEST,
            format!("unknown type `{data_type}`, expected hex or uint8"),
        );
    }

    let mut raw = vec![0u8; length];
    let filled = state.generator.lock().await.fill_raw_bytes(&mut raw);
    if let Err(e) = filled {
        return DrawResponse::from_error(&data_type, &e);
    }

    let data = if data_type == "uint8" {
        serde_json::Value::Array(raw.iter().map(|&b| serde_json::Value::from(b)).collect())
    } else {
        serde_json::Value::String(hex::encode(&raw))
    };
    DrawResponse::ok(&data_type, length, data)
}

async fn handle_health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let generator = state.generator.lock().await;
    let info = generator.source().info();
    let stats = generator.stats();
    Json(HealthResponse {
        status: "healthy".to_string(),
        source: info.name.to_string(),
        cryptographic: info.cryptographic,
        draws: stats.draws,
        bits_delivered: stats.bits_delivered,
        entropy_bytes: stats.entropy_bytes,
        raw_bytes: stats.raw_bytes,
        rejections: stats.rejections,
        buffered_bits: stats.buffered_bits,
        efficiency: stats.efficiency(),
    })
}

async fn handle_index(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let source = state.generator.lock().await.source().name();

    Json(serde_json::json!({
        "name": "thriftrand server",
        "version": thriftrand_core::VERSION,
        "source": source,
        "endpoints": {
            "/": "This API index",
            "/api/v1/int": {
                "method": "GET",
                "description": "Uniform integers in [min, max)",
                "params": {
                    "min": "Inclusive lower bound (default: 0)",
                    "max": "Exclusive upper bound (default: 100)",
                    "count": format!("Number of values (1-{MAX_COUNT}, default: 1)"),
                }
            },
            "/api/v1/float": {
                "method": "GET",
                "description": "Uniform fractions in [0, 1)",
                "params": {
                    "count": format!("Number of values (1-{MAX_COUNT}, default: 1)"),
                }
            },
            "/api/v1/shuffle": {
                "method": "GET",
                "description": "Uniformly random permutation of 0..n",
                "params": {
                    "n": format!("Permutation length (0-{MAX_COUNT}, default: 10)"),
                }
            },
            "/api/v1/bytes": {
                "method": "GET",
                "description": "Raw bytes straight from the entropy source",
                "params": {
                    "length": format!("Number of bytes (1-{MAX_LENGTH}, default: 32)"),
                    "type": "Output format: hex, uint8 (default: hex)",
                }
            },
            "/health": "Health check with generator statistics",
        },
        "examples": {
            "dice": "/api/v1/int?min=1&max=7&count=10",
            "deck": "/api/v1/shuffle?n=52",
            "key": "/api/v1/bytes?length=32&type=hex",
        }
    }))
}

/// Build the axum router around `generator`.
fn build_router(generator: SharedGenerator) -> Router {
    let state = Arc::new(AppState {
        generator: Mutex::new(generator),
    });

    Router::new()
        .route("/", get(handle_index))
        .route("/api/v1/int", get(handle_int))
        .route("/api/v1/float", get(handle_float))
        .route("/api/v1/shuffle", get(handle_shuffle))
        .route("/api/v1/bytes", get(handle_bytes))
        .route("/health", get(handle_health))
        .with_state(state)
}

/// Run the HTTP server until the listener fails.
pub async fn run_server(generator: SharedGenerator, host: &str, port: u16) -> std::io::Result<()> {
    let source = generator.source().name();
    let app = build_router(generator);
    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    log::info!("serving `{source}` entropy on http://{addr}");
    axum::serve(listener, app).await
}

/// Lowercase hex encoding shared with the CLI.
pub mod hex {
    /// Two lowercase hex digits per byte.
    pub fn encode(data: &[u8]) -> String {
        data.iter().map(|b| format!("{b:02x}")).collect()
    }
}
