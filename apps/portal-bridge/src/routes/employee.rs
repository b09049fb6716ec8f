//! Portal do funcionário
//!
//! Visões permitidas: pacientes prontos para sinistro, criação e
//! submissão de sinistros.

use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use claims_core::{Claim, ClaimEvent, Patient, WorkflowStatus};

use crate::error::ApiError;
use crate::routes::current_role;
use crate::state::AppState;

/// `GET /employee`
pub async fn home() -> Json<serde_json::Value> {
    Json(json!({ "portal": "employee" }))
}

/// `GET /employee/patients` — apenas pacientes prontos para sinistro
pub async fn ready_patients(
    State(state): State<AppState>,
) -> Result<Json<Vec<Patient>>, ApiError> {
    let patients = state.patients.list().await?;
    let ready = patients
        .into_iter()
        .filter(|patient| patient.workflow_status == WorkflowStatus::ReadyForClaim)
        .collect();
    Ok(Json(ready))
}

#[derive(Debug, Deserialize)]
pub struct CreateClaimRequest {
    pub patient_id: Uuid,
    pub insurance_id: Uuid,
    pub medical_report_id: Uuid,
    #[serde(default)]
    pub notes: Option<String>,
}

/// `POST /employee/claims`
///
/// O valor cobrado é a soma das cobranças do laudo neste momento e
/// nunca muda depois.
pub async fn create_claim(
    State(state): State<AppState>,
    Json(request): Json<CreateClaimRequest>,
) -> Result<Json<Claim>, ApiError> {
    let actor = current_role(&state)?;

    let patient = state.patients.get(request.patient_id).await?;
    let report = state.patients.get_report(request.medical_report_id).await?;

    let created = state
        .claims
        .create_claim(actor, &patient, &report, request.insurance_id, request.notes)
        .await?;
    Ok(Json(created))
}

/// `POST /employee/claims/:id/submit`
pub async fn submit_claim(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let actor = current_role(&state)?;
    let status = state.claims.review(actor, id, ClaimEvent::Submit).await?;
    Ok(Json(json!({ "claim_id": id, "status": status })))
}
