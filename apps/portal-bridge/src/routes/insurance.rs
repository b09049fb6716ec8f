//! Portal da seguradora
//!
//! Visões permitidas: lista de sinistros, aprovação, rejeição, pedido
//! de informações e agregados do painel.

use axum::extract::{Path, State};
use axum::Json;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use claims_core::{ClaimAnalytics, ClaimEvent};

use crate::error::ApiError;
use crate::routes::current_role;
use crate::state::AppState;

/// `GET /insurance`
pub async fn home() -> Json<serde_json::Value> {
    Json(json!({ "portal": "insurance" }))
}

#[derive(Debug, Deserialize)]
pub struct ApproveRequest {
    /// Sem valor explícito vale o valor cobrado do sinistro
    #[serde(default)]
    pub approved_amount: Option<Decimal>,
}

/// `PATCH /insurance/claims/:id/approve`
pub async fn approve(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<ApproveRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let actor = current_role(&state)?;
    let status = state
        .claims
        .review(
            actor,
            id,
            ClaimEvent::Approve {
                approved_amount: request.approved_amount,
            },
        )
        .await?;
    Ok(Json(json!({ "claim_id": id, "status": status })))
}

#[derive(Debug, Deserialize)]
pub struct RejectRequest {
    pub reason: String,
}

/// `PATCH /insurance/claims/:id/reject`
pub async fn reject(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<RejectRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if request.reason.trim().is_empty() {
        return Err(ApiError::Validation(
            "justificativa da rejeição é obrigatória".to_string(),
        ));
    }

    let actor = current_role(&state)?;
    let status = state
        .claims
        .review(
            actor,
            id,
            ClaimEvent::Reject {
                reason: request.reason,
            },
        )
        .await?;
    Ok(Json(json!({ "claim_id": id, "status": status })))
}

#[derive(Debug, Deserialize)]
pub struct RequestInfoRequest {
    pub message: String,
}

/// `POST /insurance/claims/:id/request-info`
///
/// O status do sinistro não muda; a mensagem segue por canal paralelo.
pub async fn request_info(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<RequestInfoRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let actor = current_role(&state)?;
    let status = state
        .claims
        .review(
            actor,
            id,
            ClaimEvent::RequestInfo {
                message: request.message,
            },
        )
        .await?;
    Ok(Json(json!({ "claim_id": id, "status": status })))
}

/// `GET /insurance/claims/analytics`
pub async fn analytics(State(state): State<AppState>) -> Result<Json<ClaimAnalytics>, ApiError> {
    let analytics = state.claims.analytics().await?;
    Ok(Json(analytics))
}
