//! Rotas de pacientes compartilhadas entre portais
//!
//! O mesmo handler de status serve os três portais; o papel do ator
//! vem da sessão e a máquina de estados decide o que é aceito,
//! sinalizado ou recusado.

use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use claims_core::{
    apply_workflow_transition, AccidentInfo, HospitalizationWindow, TransitionCheck,
    WorkflowStatus,
};

use crate::error::ApiError;
use crate::routes::current_role;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct StatusPatch {
    pub status: WorkflowStatus,
}

/// `PATCH .../patients/:id/status`
///
/// Transições fora de ordem pelo dono do estágio passam, mas voltam
/// marcadas como irregulares na resposta.
pub async fn patch_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(patch): Json<StatusPatch>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let actor = current_role(&state)?;
    let patient = state.patients.get(id).await?;

    let check = apply_workflow_transition(patient.workflow_status, patch.status, actor)?;
    state.patients.set_status(id, patch.status).await?;

    Ok(Json(json!({
        "patient_id": id,
        "status": patch.status,
        "irregular": check == TransitionCheck::Irregular,
    })))
}

/// `PATCH /doctor/patients/:id/accident`
pub async fn patch_accident(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(info): Json<AccidentInfo>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.patients.update_accident_info(id, &info).await?;
    Ok(Json(json!({ "patient_id": id, "updated": "accident_info" })))
}

/// `PATCH /doctor/patients/:id/hospitalization`
pub async fn patch_hospitalization(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(window): Json<HospitalizationWindow>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.patients.update_hospitalization(id, &window).await?;
    Ok(Json(json!({ "patient_id": id, "updated": "hospitalization" })))
}
