//! Colaboradores HTTP externos
//!
//! Este módulo implementa os gateways de autenticação, sinistros e
//! pacientes sobre HTTP. Toda requisição autenticada carrega o token
//! portador no cabeçalho `Authorization: Bearer` — este é o único
//! efeito da sessão sobre o transporte. Um 401 de qualquer colaborador
//! encerra a sessão imediatamente.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Response, StatusCode};
use rust_decimal::Decimal;
use serde_json::{json, Value};
use uuid::Uuid;

use claims_core::{
    AccidentInfo, Claim, ClaimAnalytics, ClaimDraft, ClaimsGateway, GatewayError,
    HospitalizationWindow, MedicalReport, Patient, PatientsGateway, WorkflowStatus,
};
use common_auth::{AuthError, AuthGateway, SessionService};

/// Extrai a melhor mensagem disponível de um corpo de erro
///
/// O backend não é consistente: a mensagem pode vir em `message` ou
/// `error`; na ausência das duas vale a razão do status HTTP.
async fn best_message(response: Response) -> String {
    let status = response.status();
    let fallback = status
        .canonical_reason()
        .unwrap_or("erro desconhecido")
        .to_string();

    match response.json::<Value>().await {
        Ok(body) => body
            .get("message")
            .or_else(|| body.get("error"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or(fallback),
        Err(_) => fallback,
    }
}

/// Colaborador de autenticação sobre HTTP
pub struct HttpAuthGateway {
    client: reqwest::Client,
    base_url: String,
}

impl HttpAuthGateway {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn post(&self, path: &str, payload: &Value) -> Result<Value, AuthError> {
        let response = self
            .client
            .post(format!("{}{}", self.base_url, path))
            .json(payload)
            .send()
            .await
            .map_err(|e| AuthError::Gateway(e.to_string()))?;

        // Num login, 401 significa credenciais erradas; a mensagem é
        // exibida junto ao formulário, não derruba sessão nenhuma.
        if !response.status().is_success() {
            return Err(AuthError::Gateway(best_message(response).await));
        }

        response
            .json()
            .await
            .map_err(|e| AuthError::Gateway(e.to_string()))
    }
}

#[async_trait]
impl AuthGateway for HttpAuthGateway {
    async fn login(&self, email: &str, password: &str) -> Result<Value, AuthError> {
        self.post("/login", &json!({ "email": email, "password": password }))
            .await
    }

    async fn register(&self, payload: Value) -> Result<Value, AuthError> {
        self.post("/register", &payload).await
    }
}

/// Requisições autenticadas compartilhadas pelos gateways de domínio
struct AuthenticatedClient {
    client: reqwest::Client,
    base_url: String,
    session: Arc<SessionService>,
}

impl AuthenticatedClient {
    fn new(base_url: &str, session: Arc<SessionService>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            session,
        }
    }

    fn bearer(&self) -> Result<String, GatewayError> {
        self.session
            .snapshot()
            .token
            .ok_or(GatewayError::Unauthorized)
    }

    fn request(
        &self,
        method: reqwest::Method,
        path: &str,
    ) -> Result<reqwest::RequestBuilder, GatewayError> {
        let token = self.bearer()?;
        Ok(self
            .client
            .request(method, format!("{}{}", self.base_url, path))
            .bearer_auth(token))
    }

    /// Envia a requisição e normaliza a falha
    ///
    /// Um 401 derruba a sessão antes de retornar: a credencial
    /// persistida deixou de valer.
    async fn send(&self, builder: reqwest::RequestBuilder) -> Result<Response, GatewayError> {
        let response = builder
            .send()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        if response.status() == StatusCode::UNAUTHORIZED {
            self.session.handle_unauthorized().await;
            return Err(GatewayError::Unauthorized);
        }
        if !response.status().is_success() {
            return Err(GatewayError::Remote(best_message(response).await));
        }
        Ok(response)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<T, GatewayError> {
        let response = self.send(self.request(reqwest::Method::GET, path)?).await?;
        response
            .json()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))
    }

    async fn send_json(
        &self,
        method: reqwest::Method,
        path: &str,
        payload: &Value,
    ) -> Result<Response, GatewayError> {
        self.send(self.request(method, path)?.json(payload)).await
    }
}

/// Colaborador de sinistros sobre HTTP
pub struct HttpClaimsGateway {
    inner: AuthenticatedClient,
}

impl HttpClaimsGateway {
    pub fn new(base_url: &str, session: Arc<SessionService>) -> Self {
        Self {
            inner: AuthenticatedClient::new(base_url, session),
        }
    }
}

#[async_trait]
impl ClaimsGateway for HttpClaimsGateway {
    async fn list(&self) -> Result<Vec<Claim>, GatewayError> {
        self.inner.get_json("/claims").await
    }

    async fn create(&self, draft: &ClaimDraft) -> Result<Claim, GatewayError> {
        let payload = serde_json::to_value(draft)
            .map_err(|e| GatewayError::Transport(e.to_string()))?;
        let response = self
            .inner
            .send_json(reqwest::Method::POST, "/claims", &payload)
            .await?;
        response
            .json()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))
    }

    async fn submit(&self, id: Uuid) -> Result<(), GatewayError> {
        self.inner
            .send_json(
                reqwest::Method::PATCH,
                &format!("/claims/{}", id),
                &json!({ "status": "submitted" }),
            )
            .await?;
        Ok(())
    }

    async fn approve(&self, id: Uuid, approved_amount: Decimal) -> Result<(), GatewayError> {
        self.inner
            .send_json(
                reqwest::Method::PATCH,
                &format!("/claims/{}/approve", id),
                &json!({ "approved_amount": approved_amount }),
            )
            .await?;
        Ok(())
    }

    async fn reject(&self, id: Uuid, reason: &str) -> Result<(), GatewayError> {
        self.inner
            .send_json(
                reqwest::Method::PATCH,
                &format!("/claims/{}/reject", id),
                &json!({ "reason": reason }),
            )
            .await?;
        Ok(())
    }

    async fn request_info(&self, id: Uuid, message: &str) -> Result<(), GatewayError> {
        self.inner
            .send_json(
                reqwest::Method::POST,
                &format!("/claims/{}/request-info", id),
                &json!({ "message": message }),
            )
            .await?;
        Ok(())
    }

    async fn analytics(&self) -> Result<ClaimAnalytics, GatewayError> {
        self.inner.get_json("/claims/analytics").await
    }
}

/// Colaborador de pacientes e laudos sobre HTTP
pub struct HttpPatientsGateway {
    inner: AuthenticatedClient,
}

impl HttpPatientsGateway {
    pub fn new(base_url: &str, session: Arc<SessionService>) -> Self {
        Self {
            inner: AuthenticatedClient::new(base_url, session),
        }
    }
}

#[async_trait]
impl PatientsGateway for HttpPatientsGateway {
    async fn list(&self) -> Result<Vec<Patient>, GatewayError> {
        self.inner.get_json("/patients").await
    }

    async fn get(&self, id: Uuid) -> Result<Patient, GatewayError> {
        self.inner.get_json(&format!("/patients/{}", id)).await
    }

    async fn get_report(&self, id: Uuid) -> Result<MedicalReport, GatewayError> {
        self.inner
            .get_json(&format!("/medical-reports/{}", id))
            .await
    }

    async fn set_status(&self, id: Uuid, status: WorkflowStatus) -> Result<(), GatewayError> {
        self.inner
            .send_json(
                reqwest::Method::PATCH,
                &format!("/patients/{}/status", id),
                &json!({ "status": status }),
            )
            .await?;
        Ok(())
    }

    async fn update_accident_info(
        &self,
        id: Uuid,
        info: &AccidentInfo,
    ) -> Result<(), GatewayError> {
        let payload =
            serde_json::to_value(info).map_err(|e| GatewayError::Transport(e.to_string()))?;
        self.inner
            .send_json(
                reqwest::Method::PATCH,
                &format!("/patients/{}/accident", id),
                &payload,
            )
            .await?;
        Ok(())
    }

    async fn update_hospitalization(
        &self,
        id: Uuid,
        window: &HospitalizationWindow,
    ) -> Result<(), GatewayError> {
        let payload =
            serde_json::to_value(window).map_err(|e| GatewayError::Transport(e.to_string()))?;
        self.inner
            .send_json(
                reqwest::Method::PATCH,
                &format!("/patients/{}/hospitalization", id),
                &payload,
            )
            .await?;
        Ok(())
    }
}
