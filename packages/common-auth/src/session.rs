//! Serviço de sessão dos portais
//!
//! Este módulo concentra o ciclo de vida da sessão: login, registro,
//! logout e reidratação a partir do armazenamento persistente. O
//! serviço é construído uma única vez na raiz de composição do
//! aplicativo e recebe seus colaboradores por injeção, em vez de
//! expor estado global.
//!
//! O estado interno é uma variante etiquetada, de modo que o invariante
//! "autenticado se e somente se token e papel existem" vale por
//! construção: não há como representar um token sem papel.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use serde_json::Value;
use tracing::{info, warn};

use crate::error::AuthError;
use crate::role::Role;
use crate::store::{CredentialStore, StoredSession};
use crate::token::decode_role;

/// Colaborador externo de autenticação
///
/// Abstrai o serviço HTTP de login/registro; o corpo de resposta é
/// devolvido bruto porque o formato do backend é inconsistente e a
/// extração tolerante acontece aqui.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthGateway: Send + Sync {
    async fn login(&self, email: &str, password: &str) -> Result<Value, AuthError>;
    async fn register(&self, payload: Value) -> Result<Value, AuthError>;
}

/// Estado interno da sessão
#[derive(Debug, Clone)]
enum SessionState {
    /// Reidratação ainda não concluída
    Loading,
    /// Sem credencial válida
    Anonymous,
    /// Credencial e papel presentes, sempre em par
    Authenticated { token: String, role: Role },
}

/// Fotografia imutável da sessão, para decisões de roteamento
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    pub token: Option<String>,
    pub role: Option<Role>,
    pub loading: bool,
}

impl SessionSnapshot {
    /// Autenticado se e somente se token e papel existem
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some() && self.role.is_some()
    }
}

/// Serviço de sessão, um por processo
pub struct SessionService {
    gateway: Arc<dyn AuthGateway>,
    store: Arc<dyn CredentialStore>,
    state: RwLock<SessionState>,
}

/// Chaves sob as quais o backend já devolveu o token, em ordem de
/// preferência. A tolerância é intencional: o contrato do backend é
/// inconsistente entre ambientes.
const TOKEN_KEYS: &[&str] = &["token", "accessToken", "access_token", "jwt", "bearerToken"];

fn token_from_object(body: &Value) -> Option<String> {
    TOKEN_KEYS
        .iter()
        .find_map(|key| body.get(key).and_then(Value::as_str))
        .map(str::to_string)
}

/// Extrai o token do corpo de resposta: campos diretos, depois `data`
fn extract_token(body: &Value) -> Option<String> {
    token_from_object(body).or_else(|| body.get("data").and_then(token_from_object))
}

/// Extrai o papel do objeto de usuário do corpo, direto ou sob `data`
fn extract_user_role(body: &Value) -> Option<Role> {
    let user = body
        .get("user")
        .or_else(|| body.get("data").and_then(|data| data.get("user")))?;
    Role::parse(user.get("role")?.as_str()?)
}

impl SessionService {
    /// Cria o serviço ainda em estado de carga; chame [`rehydrate`]
    /// antes de servir qualquer rota protegida.
    ///
    /// [`rehydrate`]: SessionService::rehydrate
    pub fn new(gateway: Arc<dyn AuthGateway>, store: Arc<dyn CredentialStore>) -> Self {
        Self {
            gateway,
            store,
            state: RwLock::new(SessionState::Loading),
        }
    }

    /// Fotografia atual da sessão
    pub fn snapshot(&self) -> SessionSnapshot {
        match &*self.state.read().expect("lock de sessão envenenado") {
            SessionState::Loading => SessionSnapshot {
                token: None,
                role: None,
                loading: true,
            },
            SessionState::Anonymous => SessionSnapshot {
                token: None,
                role: None,
                loading: false,
            },
            SessionState::Authenticated { token, role } => SessionSnapshot {
                token: Some(token.clone()),
                role: Some(*role),
                loading: false,
            },
        }
    }

    fn set_state(&self, next: SessionState) {
        *self.state.write().expect("lock de sessão envenenado") = next;
    }

    /// Recarrega a sessão persistida no início do processo
    ///
    /// O par armazenado é tratado como verdade pelo resto da vida da
    /// sessão; uma credencial revogada só é descoberta quando algum
    /// colaborador devolver 401, o que dispara [`handle_unauthorized`].
    ///
    /// [`handle_unauthorized`]: SessionService::handle_unauthorized
    pub async fn rehydrate(&self) {
        match self.store.load().await {
            Ok(Some(stored)) => {
                info!("Sessão reidratada com papel {}", stored.role);
                self.set_state(SessionState::Authenticated {
                    token: stored.token,
                    role: stored.role,
                });
            }
            Ok(None) => self.set_state(SessionState::Anonymous),
            Err(e) => {
                warn!("Falha ao reidratar sessão: {}", e);
                self.set_state(SessionState::Anonymous);
            }
        }
    }

    /// Autentica com e-mail e senha e estabelece a sessão
    pub async fn login(&self, email: &str, password: &str) -> Result<Role, AuthError> {
        let body = self.gateway.login(email, password).await?;
        self.establish(&body, None).await
    }

    /// Registra um novo usuário e estabelece a sessão
    ///
    /// O campo `confirmPassword` é removido antes do envio; quando a
    /// resposta não permite determinar o papel, vale o padrão fornecido
    /// pelo chamador (apenas no registro).
    pub async fn register(&self, mut payload: Value, default_role: Role) -> Result<Role, AuthError> {
        if let Some(object) = payload.as_object_mut() {
            object.remove("confirmPassword");
        }

        let body = self.gateway.register(payload).await?;
        self.establish(&body, Some(default_role)).await
    }

    /// Encerra a sessão incondicionalmente; idempotente
    pub async fn logout(&self) {
        if let Err(e) = self.store.clear().await {
            // O estado em memória é limpo mesmo assim
            warn!("Falha ao limpar credenciais persistidas: {}", e);
        }
        self.set_state(SessionState::Anonymous);
    }

    /// Reação a um 401 de qualquer colaborador: a credencial persistida
    /// deixou de valer e a sessão é encerrada.
    pub async fn handle_unauthorized(&self) {
        warn!("Colaborador rejeitou a credencial, encerrando sessão");
        self.logout().await;
    }

    /// Extrai token e papel do corpo, persiste o par e ativa a sessão
    async fn establish(&self, body: &Value, default_role: Option<Role>) -> Result<Role, AuthError> {
        let token = extract_token(body).ok_or(AuthError::TokenMissing)?;

        let role = extract_user_role(body)
            .or_else(|| decode_role(Some(&token)))
            .or(default_role)
            .ok_or(AuthError::RoleMissing)?;

        let stored = StoredSession {
            token: token.clone(),
            role,
        };
        self.store
            .save(&stored)
            .await
            .map_err(|e| AuthError::Store(e.to_string()))?;

        self.set_state(SessionState::Authenticated { token, role });
        info!("Sessão estabelecida com papel {}", role);
        Ok(role)
    }
}
