//! Portal do médico
//!
//! Visões permitidas: lista de pacientes e os estágios clínicos do
//! fluxo de trabalho, mais dados de acidente e hospitalização.

use axum::extract::State;
use axum::Json;
use serde_json::json;

use claims_core::Patient;

use crate::error::ApiError;
use crate::state::AppState;

/// `GET /doctor`
pub async fn home() -> Json<serde_json::Value> {
    Json(json!({ "portal": "doctor" }))
}

/// `GET /doctor/patients`
pub async fn patients(State(state): State<AppState>) -> Result<Json<Vec<Patient>>, ApiError> {
    let patients = state.patients.list().await?;
    Ok(Json(patients))
}
