//! Guarda de rotas dos portais
//!
//! Middleware que aplica a decisão pura de `common_auth::guard` a cada
//! navegação em um subárvore protegido: espera durante a reidratação,
//! manda não autenticados ao login preservando o caminho tentado e
//! manda autenticados com papel errado à raiz do próprio portal.

use axum::extract::{OriginalUri, State};
use axum::http::{Request, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use axum::Json;
use serde_json::json;

use common_auth::{evaluate, GuardOutcome, Role};

use crate::state::AppState;

async fn portal_guard<B: Send>(
    state: AppState,
    attempted: &str,
    req: Request<B>,
    next: Next<B>,
    allowed: &'static [Role],
) -> Response {
    let snapshot = state.session.snapshot();

    match evaluate(&snapshot, allowed, attempted) {
        GuardOutcome::Wait => (
            // Sem decisão de redirecionamento até a reidratação acabar
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "message": "Sessão em carregamento" })),
        )
            .into_response(),
        GuardOutcome::ToLogin { from } => {
            Redirect::temporary(&format!("/login?from={}", from)).into_response()
        }
        GuardOutcome::ToPortal(role) => Redirect::temporary(role.portal_root()).into_response(),
        GuardOutcome::Allow => next.run(req).await,
    }
}

// O URI original é extraído porque `nest` reescreve o caminho visto
// pelo subárvore.

pub async fn guard_employee<B: Send>(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    req: Request<B>,
    next: Next<B>,
) -> Response {
    portal_guard(state, uri.path(), req, next, &[Role::Employee]).await
}

pub async fn guard_doctor<B: Send>(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    req: Request<B>,
    next: Next<B>,
) -> Response {
    portal_guard(state, uri.path(), req, next, &[Role::Doctor]).await
}

pub async fn guard_insurance<B: Send>(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    req: Request<B>,
    next: Next<B>,
) -> Response {
    portal_guard(state, uri.path(), req, next, &[Role::Insurance]).await
}
