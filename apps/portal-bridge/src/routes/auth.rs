//! Rotas de autenticação e entrada
//!
//! Superfície fora da guarda: login, registro, logout, fotografia da
//! sessão e a raiz, que leva um usuário já autenticado direto ao seu
//! portal.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;
use validator::Validate;

use common_auth::Role;

use crate::built_info;
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "e-mail inválido"))]
    pub email: String,
    #[validate(length(min = 8, message = "senha deve ter ao menos 8 caracteres"))]
    pub password: String,
}

/// `POST /login`
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    request.validate()?;
    let role = state
        .session
        .login(&request.email, &request.password)
        .await?;
    Ok(Json(json!({
        "role": role,
        "redirect": role.portal_root(),
    })))
}

#[derive(Debug, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(length(min = 1, message = "nome é obrigatório"))]
    pub name: String,
    #[validate(email(message = "e-mail inválido"))]
    pub email: String,
    #[validate(length(min = 8, message = "senha deve ter ao menos 8 caracteres"))]
    pub password: String,
    #[validate(must_match(other = "password", message = "senhas não conferem"))]
    pub confirm_password: String,
    /// Papel pedido no cadastro; sem ele vale o padrão de funcionário
    #[serde(default)]
    pub role: Option<String>,
}

/// `POST /register`
///
/// O corpo é reserializado em camelCase e o serviço de sessão remove
/// `confirmPassword` antes de encaminhar ao colaborador.
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    request.validate()?;

    let default_role = request
        .role
        .as_deref()
        .and_then(Role::parse)
        .unwrap_or(Role::Employee);

    let payload =
        serde_json::to_value(&request).map_err(|e| ApiError::Validation(e.to_string()))?;
    let role = state.session.register(payload, default_role).await?;

    Ok(Json(json!({
        "role": role,
        "redirect": role.portal_root(),
    })))
}

/// `POST /logout` — incondicional e idempotente
pub async fn logout(State(state): State<AppState>) -> StatusCode {
    state.session.logout().await;
    StatusCode::NO_CONTENT
}

#[derive(Debug, Serialize)]
pub struct SessionView {
    pub authenticated: bool,
    pub loading: bool,
    pub role: Option<Role>,
    pub portal: Option<&'static str>,
}

/// `GET /session` — fotografia da sessão, sem expor o token
pub async fn session_view(State(state): State<AppState>) -> Json<SessionView> {
    let snapshot = state.session.snapshot();
    Json(SessionView {
        authenticated: snapshot.is_authenticated(),
        loading: snapshot.loading,
        role: snapshot.role,
        portal: snapshot.role.map(|role| role.portal_root()),
    })
}

#[derive(Debug, Deserialize)]
pub struct LoginQuery {
    /// Caminho tentado antes do redirecionamento ao login
    #[serde(default)]
    pub from: Option<String>,
}

/// `GET /login` — ponto de entrada neutro (a renderização fica fora
/// do escopo do serviço)
pub async fn login_page(Query(query): Query<LoginQuery>) -> Json<serde_json::Value> {
    Json(json!({
        "message": "Autentique-se para acessar o portal",
        "from": query.from,
    }))
}

/// `GET /` — usuário já autenticado vai direto ao seu portal
///
/// A verificação roda fora da guarda; como a sessão é reidratada antes
/// de o servidor aceitar conexões, o estado de carga aqui é apenas
/// defensivo.
pub async fn root(State(state): State<AppState>) -> Response {
    let snapshot = state.session.snapshot();
    if snapshot.loading {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "message": "Sessão em carregamento" })),
        )
            .into_response();
    }
    match snapshot.role {
        Some(role) if snapshot.is_authenticated() => {
            Redirect::temporary(role.portal_root()).into_response()
        }
        _ => Redirect::temporary("/login").into_response(),
    }
}

/// `GET /health` — metadados de build e vida do processo
pub async fn health() -> Json<serde_json::Value> {
    Json(json!({
        "name": built_info::PKG_NAME,
        "version": built_info::PKG_VERSION,
        "status": "ok",
    }))
}
