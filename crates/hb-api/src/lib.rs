//! HAP-style JSON API for the bridge
//!
//! Implements the accessory database and characteristic read/write
//! endpoints of the HomeKit Accessory Protocol over plain HTTP using axum.
//! Pairing and session encryption are left to the host.

mod bridge;

pub use bridge::{numbered_characteristics, numbered_services, Bridge, Located};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use futures::future::join_all;
use hb_core::{CharacteristicType, CharacteristicValue, Format, HapStatusError, Permission};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub bridge: Arc<Bridge>,
}

impl AppState {
    pub fn new(bridge: Bridge) -> Self {
        Self {
            bridge: Arc::new(bridge),
        }
    }
}

/// Accessory database response for GET /accessories
#[derive(Serialize)]
pub struct AccessoriesResponse {
    pub accessories: Vec<AccessoryResponse>,
}

#[derive(Serialize)]
pub struct AccessoryResponse {
    pub aid: u64,
    pub services: Vec<ServiceResponse>,
}

#[derive(Serialize)]
pub struct ServiceResponse {
    pub iid: u64,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub characteristics: Vec<CharacteristicResponse>,
}

#[derive(Serialize)]
pub struct CharacteristicResponse {
    pub iid: u64,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub perms: &'static [Permission],
    pub format: Format,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<CharacteristicValue>,
}

/// Query string of GET /characteristics
#[derive(Deserialize)]
pub struct ReadQuery {
    /// Comma separated `aid.iid` pairs
    pub id: String,
}

/// One entry of a characteristics read or write response
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct CharacteristicStatus {
    pub aid: u64,
    pub iid: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<CharacteristicValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<i32>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CharacteristicsResponse {
    pub characteristics: Vec<CharacteristicStatus>,
}

/// Body of PUT /characteristics
#[derive(Deserialize)]
pub struct WriteRequest {
    pub characteristics: Vec<WriteEntry>,
}

#[derive(Deserialize)]
pub struct WriteEntry {
    pub aid: u64,
    pub iid: u64,
    #[serde(default)]
    pub value: Option<serde_json::Value>,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub message: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            message: message.into(),
        }),
    )
}

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/accessories", get(get_accessories))
        .route("/accessories/:aid/identify", post(identify_accessory))
        .route(
            "/characteristics",
            get(read_characteristics).put(write_characteristics),
        )
        .route("/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the API server
pub async fn start_server(state: AppState, addr: &str) -> std::io::Result<()> {
    let router = create_router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("API server listening on {}", addr);
    axum::serve(listener, router).await
}

// ==================== Handlers ====================

/// GET /health - Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

/// GET /accessories - Returns the accessory database with current values
async fn get_accessories(State(state): State<AppState>) -> Json<AccessoriesResponse> {
    let mut accessories = Vec::with_capacity(state.bridge.len());

    for (aid, accessory) in state.bridge.accessories() {
        let mut services = Vec::new();
        for numbered in numbered_services(accessory) {
            let (iid, service) = numbered;
            let mut characteristics = Vec::new();
            for (iid, characteristic) in numbered_characteristics(numbered) {
                let kind = characteristic.kind();
                let value = if kind.is_readable() {
                    characteristic.read().await.ok()
                } else {
                    None
                };
                characteristics.push(CharacteristicResponse {
                    iid,
                    kind: kind.short_code(),
                    perms: kind.permissions(),
                    format: kind.format(),
                    value,
                });
            }
            services.push(ServiceResponse {
                iid,
                kind: service.kind().short_code(),
                characteristics,
            });
        }
        accessories.push(AccessoryResponse { aid, services });
    }

    Json(AccessoriesResponse { accessories })
}

/// GET /characteristics?id=1.9,1.10 - Reads characteristic values
async fn read_characteristics(
    State(state): State<AppState>,
    Query(query): Query<ReadQuery>,
) -> Result<Response, ApiError> {
    let ids = parse_ids(&query.id)
        .ok_or_else(|| api_error(StatusCode::BAD_REQUEST, format!("Invalid id list: {}", query.id)))?;

    let bridge = &state.bridge;
    let reads = ids.iter().map(|&(aid, iid)| async move {
        let result = match bridge.locate(aid, iid) {
            Some(located) => located.characteristic.read().await,
            None => Err(HapStatusError::ResourceDoesNotExist),
        };
        (aid, iid, result)
    });
    let results = join_all(reads).await;

    let all_ok = results.iter().all(|(_, _, r)| r.is_ok());
    let characteristics = results
        .into_iter()
        .map(|(aid, iid, result)| match result {
            Ok(value) => CharacteristicStatus {
                aid,
                iid,
                value: Some(value),
                status: if all_ok { None } else { Some(0) },
            },
            Err(err) => CharacteristicStatus {
                aid,
                iid,
                value: None,
                status: Some(err.code()),
            },
        })
        .collect();

    let status = if all_ok {
        StatusCode::OK
    } else {
        StatusCode::MULTI_STATUS
    };
    Ok((status, Json(CharacteristicsResponse { characteristics })).into_response())
}

/// PUT /characteristics - Writes characteristic values
async fn write_characteristics(
    State(state): State<AppState>,
    Json(request): Json<WriteRequest>,
) -> Response {
    let bridge = &state.bridge;
    let mut results = Vec::with_capacity(request.characteristics.len());

    for entry in request.characteristics {
        let result = write_one(bridge, &entry).await;
        if let Err(ref err) = result {
            debug!(aid = entry.aid, iid = entry.iid, error = %err, "Characteristic write failed");
        }
        results.push((entry.aid, entry.iid, result));
    }

    if results.iter().all(|(_, _, r)| r.is_ok()) {
        return StatusCode::NO_CONTENT.into_response();
    }

    let characteristics = results
        .into_iter()
        .map(|(aid, iid, result)| CharacteristicStatus {
            aid,
            iid,
            value: None,
            status: Some(result.err().map(|e| e.code()).unwrap_or(0)),
        })
        .collect();

    (
        StatusCode::MULTI_STATUS,
        Json(CharacteristicsResponse { characteristics }),
    )
        .into_response()
}

async fn write_one(bridge: &Bridge, entry: &WriteEntry) -> Result<(), HapStatusError> {
    let located = bridge
        .locate(entry.aid, entry.iid)
        .ok_or(HapStatusError::ResourceDoesNotExist)?;

    let value = entry
        .value
        .as_ref()
        .and_then(CharacteristicValue::from_json)
        .ok_or(HapStatusError::InvalidValueInRequest)?;

    if located.characteristic.kind() == CharacteristicType::Identify {
        if value.as_bool() == Some(true) {
            located.accessory.identify();
        }
        return Ok(());
    }

    located.characteristic.write(value).await
}

/// POST /accessories/{aid}/identify - Asks an accessory to identify itself
async fn identify_accessory(
    State(state): State<AppState>,
    Path(aid): Path<u64>,
) -> Result<StatusCode, ApiError> {
    match state.bridge.accessory(aid) {
        Some(accessory) => {
            accessory.identify();
            Ok(StatusCode::NO_CONTENT)
        }
        None => Err(api_error(
            StatusCode::NOT_FOUND,
            format!("Accessory not found: {}", aid),
        )),
    }
}

/// Parse `1.9,1.10` into `[(1, 9), (1, 10)]`
fn parse_ids(ids: &str) -> Option<Vec<(u64, u64)>> {
    ids.split(',')
        .map(|pair| {
            let (aid, iid) = pair.trim().split_once('.')?;
            Some((aid.parse().ok()?, iid.parse().ok()?))
        })
        .collect()
}
