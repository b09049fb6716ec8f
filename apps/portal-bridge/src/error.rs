//! Tradução de erros de domínio para respostas HTTP
//!
//! Cada falha vira um status e uma mensagem legível, exibida pela
//! interface junto ao controle que a disparou.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use claims_core::{GatewayError, LifecycleError, ServiceError};
use common_auth::AuthError;

/// Erro de uma rota do portal
#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),

    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error("Dados inválidos: {0}")]
    Validation(String),
}

impl From<ServiceError> for ApiError {
    fn from(error: ServiceError) -> Self {
        match error {
            ServiceError::Lifecycle(e) => ApiError::Lifecycle(e),
            ServiceError::Gateway(e) => ApiError::Gateway(e),
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ApiError::Validation(errors.to_string())
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Auth(AuthError::NotAuthenticated) => StatusCode::UNAUTHORIZED,
            ApiError::Auth(AuthError::Unauthorized) => StatusCode::UNAUTHORIZED,
            ApiError::Auth(AuthError::Store(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            // Falhas de credencial são devolvidas ao formulário
            ApiError::Auth(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Lifecycle(LifecycleError::ClaimNotFound) => StatusCode::NOT_FOUND,
            ApiError::Lifecycle(LifecycleError::ActorNotAllowed { .. })
            | ApiError::Lifecycle(LifecycleError::StageNotOwned { .. }) => StatusCode::FORBIDDEN,
            ApiError::Lifecycle(_) => StatusCode::CONFLICT,
            ApiError::Gateway(GatewayError::Unauthorized) => StatusCode::UNAUTHORIZED,
            ApiError::Gateway(_) => StatusCode::BAD_GATEWAY,
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(json!({ "message": self.to_string() }));
        (status, body).into_response()
    }
}
