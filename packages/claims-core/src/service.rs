//! Serviço de sinistros com cache sequenciado
//!
//! Este módulo define os colaboradores externos de sinistros e
//! pacientes e o serviço que mantém a lista local de sinistros. A
//! lista é sempre uma visão da última busca bem-sucedida: toda
//! mutação é seguida de uma nova busca, nunca de edição manual do
//! cache. Buscas concorrentes carregam um contador de geração para que
//! uma resposta antiga jamais sobrescreva uma mais nova.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rust_decimal::Decimal;
use tracing::{debug, warn};
use uuid::Uuid;

use common_auth::Role;

use crate::error::{GatewayError, LifecycleError, ServiceError};
use crate::lifecycle::{apply_claim_event, ensure_patient_ready, ClaimEvent};
use crate::models::{
    AccidentInfo, Claim, ClaimAnalytics, ClaimDraft, ClaimStatus, HospitalizationWindow,
    MedicalReport, Patient, WorkflowStatus,
};

/// Colaborador externo de sinistros
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClaimsGateway: Send + Sync {
    async fn list(&self) -> Result<Vec<Claim>, GatewayError>;
    async fn create(&self, draft: &ClaimDraft) -> Result<Claim, GatewayError>;
    async fn submit(&self, id: Uuid) -> Result<(), GatewayError>;
    async fn approve(&self, id: Uuid, approved_amount: Decimal) -> Result<(), GatewayError>;
    async fn reject(&self, id: Uuid, reason: &str) -> Result<(), GatewayError>;
    async fn request_info(&self, id: Uuid, message: &str) -> Result<(), GatewayError>;
    async fn analytics(&self) -> Result<ClaimAnalytics, GatewayError>;
}

/// Colaborador externo de pacientes e laudos
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PatientsGateway: Send + Sync {
    async fn list(&self) -> Result<Vec<Patient>, GatewayError>;
    async fn get(&self, id: Uuid) -> Result<Patient, GatewayError>;
    async fn get_report(&self, id: Uuid) -> Result<MedicalReport, GatewayError>;
    async fn set_status(&self, id: Uuid, status: WorkflowStatus) -> Result<(), GatewayError>;
    async fn update_accident_info(&self, id: Uuid, info: &AccidentInfo)
        -> Result<(), GatewayError>;
    async fn update_hospitalization(
        &self,
        id: Uuid,
        window: &HospitalizationWindow,
    ) -> Result<(), GatewayError>;
}

/// Visão local dos sinistros, com a geração da busca que a produziu
struct CacheInner {
    generation: u64,
    claims: Vec<Claim>,
}

/// Serviço de sinistros
pub struct ClaimsService {
    gateway: Arc<dyn ClaimsGateway>,
    cache: Mutex<CacheInner>,
    issued: AtomicU64,
}

impl ClaimsService {
    pub fn new(gateway: Arc<dyn ClaimsGateway>) -> Self {
        Self {
            gateway,
            cache: Mutex::new(CacheInner {
                generation: 0,
                claims: Vec::new(),
            }),
            issued: AtomicU64::new(0),
        }
    }

    /// Visão atual dos sinistros
    pub fn claims(&self) -> Vec<Claim> {
        self.cache.lock().expect("lock de cache envenenado").claims.clone()
    }

    /// Busca um sinistro na visão atual
    pub fn find(&self, id: Uuid) -> Option<Claim> {
        self.cache
            .lock()
            .expect("lock de cache envenenado")
            .claims
            .iter()
            .find(|claim| claim.id == id)
            .cloned()
    }

    /// Rebusca a lista no colaborador
    ///
    /// Retorna `true` quando a resposta foi instalada; `false` quando
    /// uma busca mais nova já tinha sido emitida e esta resposta foi
    /// descartada.
    pub async fn refresh(&self) -> Result<bool, GatewayError> {
        let generation = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        let claims = self.gateway.list().await?;
        Ok(self.install_if_newer(generation, claims))
    }

    /// Instala uma resposta apenas se nenhuma mais nova foi emitida
    fn install_if_newer(&self, generation: u64, claims: Vec<Claim>) -> bool {
        let mut cache = self.cache.lock().expect("lock de cache envenenado");
        if generation <= cache.generation {
            warn!(
                "Descartando resposta obsoleta da geração {} (atual {})",
                generation, cache.generation
            );
            return false;
        }
        debug!("Instalando {} sinistros da geração {}", claims.len(), generation);
        cache.generation = generation;
        cache.claims = claims;
        true
    }

    /// Cria um sinistro a partir de um paciente pronto
    ///
    /// `billed_amount` é a soma das cobranças do laudo neste momento;
    /// o valor nunca é recalculado depois. Após a criação a lista é
    /// rebuscada.
    pub async fn create_claim(
        &self,
        actor: Role,
        patient: &Patient,
        report: &MedicalReport,
        insurance_id: Uuid,
        notes: Option<String>,
    ) -> Result<Claim, ServiceError> {
        if actor != Role::Employee {
            return Err(LifecycleError::ActorNotAllowed {
                actor,
                event: "create_claim".to_string(),
            }
            .into());
        }
        ensure_patient_ready(patient)?;

        let draft = ClaimDraft {
            patient_id: patient.id,
            insurance_id,
            medical_report_id: report.id,
            billed_amount: report.total_charges(),
            notes,
        };

        let created = self.gateway.create(&draft).await?;
        self.refresh().await?;
        Ok(created)
    }

    /// Executa uma ação de revisão sobre um sinistro da visão atual
    ///
    /// A transição é validada localmente antes da chamada; em caso de
    /// falha do colaborador nada é alterado e o chamador decide quando
    /// rebuscar. Após o sucesso a lista é rebuscada.
    pub async fn review(
        &self,
        actor: Role,
        id: Uuid,
        event: ClaimEvent,
    ) -> Result<ClaimStatus, ServiceError> {
        let claim = self.find(id).ok_or(LifecycleError::ClaimNotFound)?;
        let next = apply_claim_event(claim.status, &event, actor)?;

        match &event {
            ClaimEvent::Submit => self.gateway.submit(id).await?,
            ClaimEvent::Approve { approved_amount } => {
                let amount = approved_amount.unwrap_or(claim.billed_amount);
                self.gateway.approve(id, amount).await?;
            }
            ClaimEvent::Reject { reason } => self.gateway.reject(id, reason).await?,
            ClaimEvent::RequestInfo { message } => self.gateway.request_info(id, message).await?,
        }

        self.refresh().await?;
        Ok(next)
    }

    /// Agregados de leitura do painel
    pub async fn analytics(&self) -> Result<ClaimAnalytics, GatewayError> {
        self.gateway.analytics().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use crate::models::ProcedureCode;

    fn ready_patient() -> Patient {
        Patient {
            id: Uuid::new_v4(),
            name: "Paciente".to_string(),
            email: None,
            workflow_status: WorkflowStatus::ReadyForClaim,
            insurances: vec![],
            accident_info: None,
            hospitalization: None,
            created_at: Utc::now(),
        }
    }

    fn report_for(patient: &Patient, charges: &[i64]) -> MedicalReport {
        MedicalReport {
            id: Uuid::new_v4(),
            patient_id: patient.id,
            diagnosis: None,
            procedure_codes: charges
                .iter()
                .map(|value| ProcedureCode {
                    code: "P".to_string(),
                    description: None,
                    charges: Decimal::from(*value),
                })
                .collect(),
            created_at: Utc::now(),
        }
    }

    fn claim_with_status(id: Uuid, status: ClaimStatus) -> Claim {
        Claim {
            id,
            patient_id: Uuid::new_v4(),
            insurance_id: Uuid::new_v4(),
            medical_report_id: Uuid::new_v4(),
            billed_amount: Decimal::from(350),
            approved_amount: None,
            status,
            notes: None,
            attachments: vec![],
            submitted_date: None,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_create_claim_bills_sum_of_report_charges() {
        let patient = ready_patient();
        let report = report_for(&patient, &[100, 250]);
        let expected_patient = patient.id;
        let expected_report = report.id;

        let mut gateway = MockClaimsGateway::new();
        gateway
            .expect_create()
            .withf(move |draft| {
                draft.billed_amount == Decimal::from(350)
                    && draft.patient_id == expected_patient
                    && draft.medical_report_id == expected_report
            })
            .returning(|draft| {
                let mut created = claim_with_status(Uuid::new_v4(), ClaimStatus::Pending);
                created.billed_amount = draft.billed_amount;
                Ok(created)
            });
        gateway.expect_list().returning(|| Ok(vec![]));

        let service = ClaimsService::new(Arc::new(gateway));
        let created = service
            .create_claim(Role::Employee, &patient, &report, Uuid::new_v4(), None)
            .await
            .unwrap();

        assert_eq!(created.billed_amount, Decimal::from(350));
        assert_eq!(created.status, ClaimStatus::Pending);
    }

    #[tokio::test]
    async fn test_create_claim_requires_employee_and_ready_patient() {
        let patient = ready_patient();
        let report = report_for(&patient, &[100]);

        // Nenhuma chamada ao colaborador deve acontecer
        let gateway = MockClaimsGateway::new();
        let service = ClaimsService::new(Arc::new(gateway));

        let err = service
            .create_claim(Role::Doctor, &patient, &report, Uuid::new_v4(), None)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Lifecycle(LifecycleError::ActorNotAllowed { .. })
        ));

        let mut not_ready = ready_patient();
        not_ready.workflow_status = WorkflowStatus::Created;
        let report = report_for(&not_ready, &[100]);
        let err = service
            .create_claim(Role::Employee, &not_ready, &report, Uuid::new_v4(), None)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Lifecycle(LifecycleError::PatientNotReady { .. })
        ));
    }

    #[tokio::test]
    async fn test_approve_then_refetch_shows_approved() {
        let id = Uuid::new_v4();
        let pending = claim_with_status(id, ClaimStatus::Pending);
        let mut approved = claim_with_status(id, ClaimStatus::Approved);
        approved.approved_amount = Some(Decimal::from(350));

        let mut gateway = MockClaimsGateway::new();
        gateway
            .expect_list()
            .times(1)
            .return_once(move || Ok(vec![pending]));
        gateway
            .expect_approve()
            .withf(move |claim_id, amount| *claim_id == id && *amount == Decimal::from(350))
            .times(1)
            .returning(|_, _| Ok(()));
        gateway
            .expect_list()
            .times(1)
            .return_once(move || Ok(vec![approved]));

        let service = ClaimsService::new(Arc::new(gateway));
        service.refresh().await.unwrap();

        let next = service
            .review(
                Role::Insurance,
                id,
                ClaimEvent::Approve {
                    approved_amount: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(next, ClaimStatus::Approved);

        let refetched = service.find(id).unwrap();
        assert_eq!(refetched.status, ClaimStatus::Approved);
        assert_eq!(refetched.approved_amount, Some(Decimal::from(350)));
    }

    #[tokio::test]
    async fn test_review_by_wrong_actor_never_reaches_gateway() {
        let id = Uuid::new_v4();
        let pending = claim_with_status(id, ClaimStatus::Pending);

        let mut gateway = MockClaimsGateway::new();
        gateway
            .expect_list()
            .times(1)
            .return_once(move || Ok(vec![pending]));
        gateway.expect_approve().times(0);

        let service = ClaimsService::new(Arc::new(gateway));
        service.refresh().await.unwrap();

        let err = service
            .review(
                Role::Employee,
                id,
                ClaimEvent::Approve {
                    approved_amount: None,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Lifecycle(LifecycleError::ActorNotAllowed { .. })
        ));
    }

    #[tokio::test]
    async fn test_review_of_unknown_claim_fails_locally() {
        let gateway = MockClaimsGateway::new();
        let service = ClaimsService::new(Arc::new(gateway));

        let err = service
            .review(
                Role::Insurance,
                Uuid::new_v4(),
                ClaimEvent::Reject {
                    reason: "sem cadastro".to_string(),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Lifecycle(LifecycleError::ClaimNotFound)
        ));
    }

    #[tokio::test]
    async fn test_gateway_failure_leaves_cache_untouched() {
        let id = Uuid::new_v4();
        let pending = claim_with_status(id, ClaimStatus::Pending);

        let mut gateway = MockClaimsGateway::new();
        gateway
            .expect_list()
            .times(1)
            .return_once(move || Ok(vec![pending]));
        gateway
            .expect_reject()
            .returning(|_, _| Err(GatewayError::Remote("análise indisponível".to_string())));

        let service = ClaimsService::new(Arc::new(gateway));
        service.refresh().await.unwrap();

        let err = service
            .review(
                Role::Insurance,
                id,
                ClaimEvent::Reject {
                    reason: "x".to_string(),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Gateway(GatewayError::Remote(_))));

        // Sem mutação especulativa: o sinistro continua pendente
        assert_eq!(service.find(id).unwrap().status, ClaimStatus::Pending);
    }

    #[test]
    fn test_stale_response_never_overwrites_newer_one() {
        let gateway = MockClaimsGateway::new();
        let service = ClaimsService::new(Arc::new(gateway));

        let newer = vec![claim_with_status(Uuid::new_v4(), ClaimStatus::Submitted)];
        assert!(service.install_if_newer(2, newer.clone()));

        // Resposta da geração anterior chega atrasada e é descartada
        let stale = vec![claim_with_status(Uuid::new_v4(), ClaimStatus::Pending)];
        assert!(!service.install_if_newer(1, stale));

        let current = service.claims();
        assert_eq!(current.len(), 1);
        assert_eq!(current[0].id, newer[0].id);
        assert_eq!(current[0].status, ClaimStatus::Submitted);
    }
}
