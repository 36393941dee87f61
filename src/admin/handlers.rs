use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};

use crate::admin::AdminState;
use crate::controller::FlowView;
use crate::load_balancer::{Algorithm, StatisticsSnapshot};

#[derive(Serialize)]
pub struct SystemStatus {
    pub version: &'static str,
    pub status: &'static str,
    pub algorithm: Algorithm,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct AlgorithmRequest {
    pub algorithm: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct AlgorithmResponse {
    pub algorithm: Algorithm,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

pub async fn get_status(State(state): State<AdminState>) -> Json<SystemStatus> {
    Json(SystemStatus {
        version: env!("CARGO_PKG_VERSION"),
        status: "operational",
        algorithm: state.controller.algorithm(),
    })
}

pub async fn get_stats(State(state): State<AdminState>) -> Json<StatisticsSnapshot> {
    Json(state.controller.statistics())
}

pub async fn get_flows(State(state): State<AdminState>) -> Json<Vec<FlowView>> {
    Json(state.controller.flows())
}

pub async fn put_algorithm(
    State(state): State<AdminState>,
    Json(body): Json<AlgorithmRequest>,
) -> Result<Json<AlgorithmResponse>, (StatusCode, Json<ErrorBody>)> {
    state
        .controller
        .set_algorithm(&body.algorithm)
        .map(|algorithm| Json(AlgorithmResponse { algorithm }))
        .map_err(|e| {
            (
                StatusCode::BAD_REQUEST,
                Json(ErrorBody {
                    error: e.to_string(),
                }),
            )
        })
}
