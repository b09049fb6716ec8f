//! Estado compartilhado do aplicativo
//!
//! Raiz de composição: os serviços são construídos uma única vez em
//! `main` e injetados nas rotas por aqui. Não há estado global.

use std::sync::Arc;

use claims_core::{ClaimsService, PatientsGateway};
use common_auth::SessionService;

#[derive(Clone)]
pub struct AppState {
    pub session: Arc<SessionService>,
    pub claims: Arc<ClaimsService>,
    pub patients: Arc<dyn PatientsGateway>,
}
