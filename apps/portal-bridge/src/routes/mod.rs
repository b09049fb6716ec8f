//! Montagem das rotas dos três portais
//!
//! Cada papel tem seu subárvore isolado, guardado pelo middleware de
//! papel correspondente; a superfície de autenticação fica fora da
//! guarda.

use axum::extract::State;
use axum::middleware;
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use claims_core::Claim;
use common_auth::{AuthError, Role};

use crate::error::ApiError;
use crate::guard;
use crate::state::AppState;

pub mod auth;
pub mod doctor;
pub mod employee;
pub mod insurance;
pub mod patients;

/// Papel do ator da requisição atual
///
/// As rotas guardadas sempre têm sessão autenticada; a checagem cobre
/// o intervalo entre um logout disparado por 401 e a resposta.
pub fn current_role(state: &AppState) -> Result<Role, ApiError> {
    state
        .session
        .snapshot()
        .role
        .ok_or(ApiError::Auth(AuthError::NotAuthenticated))
}

/// `GET .../claims` — rebusca e devolve a visão atual
pub async fn list_claims(State(state): State<AppState>) -> Result<Json<Vec<Claim>>, ApiError> {
    state.claims.refresh().await?;
    Ok(Json(state.claims.claims()))
}

/// Monta o roteador completo do aplicativo
pub fn app_router(state: AppState) -> Router {
    let employee = Router::new()
        .route("/", get(employee::home))
        .route("/patients", get(employee::ready_patients))
        .route("/patients/:id/status", patch(patients::patch_status))
        .route("/claims", get(list_claims).post(employee::create_claim))
        .route("/claims/:id/submit", post(employee::submit_claim))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            guard::guard_employee,
        ));

    let doctor = Router::new()
        .route("/", get(doctor::home))
        .route("/patients", get(doctor::patients))
        .route("/patients/:id/status", patch(patients::patch_status))
        .route("/patients/:id/accident", patch(patients::patch_accident))
        .route(
            "/patients/:id/hospitalization",
            patch(patients::patch_hospitalization),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            guard::guard_doctor,
        ));

    let insurance = Router::new()
        .route("/", get(insurance::home))
        .route("/claims", get(list_claims))
        .route("/claims/analytics", get(insurance::analytics))
        .route("/claims/:id/approve", patch(insurance::approve))
        .route("/claims/:id/reject", patch(insurance::reject))
        .route("/claims/:id/request-info", post(insurance::request_info))
        .route("/patients/:id/status", patch(patients::patch_status))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            guard::guard_insurance,
        ));

    Router::new()
        .route("/", get(auth::root))
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/register", post(auth::register))
        .route("/logout", post(auth::logout))
        .route("/session", get(auth::session_view))
        .route("/health", get(auth::health))
        .nest("/employee", employee)
        .nest("/doctor", doctor)
        .nest("/insurance", insurance)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(ConcurrencyLimitLayer::new(64))
        .with_state(state)
}
