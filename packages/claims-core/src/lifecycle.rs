//! Máquina de estados do ciclo de vida
//!
//! Este módulo concentra as transições legais do status de aprovação
//! de um sinistro e do status de fluxo de trabalho de um paciente,
//! ambas condicionadas ao papel do ator. O cliente valida
//! defensivamente antes de chamar o colaborador: o servidor continua
//! sendo a autoridade final.

use rust_decimal::Decimal;
use tracing::warn;

use common_auth::Role;

use crate::error::LifecycleError;
use crate::models::{ClaimStatus, Patient, WorkflowStatus};

/// Ação de um ator sobre um sinistro
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClaimEvent {
    /// Funcionário submete o sinistro à seguradora
    Submit,
    /// Seguradora aprova; sem valor explícito vale o valor cobrado
    Approve { approved_amount: Option<Decimal> },
    /// Seguradora rejeita com justificativa
    Reject { reason: String },
    /// Seguradora pede mais informações; o status não muda, a
    /// notificação segue por canal paralelo
    RequestInfo { message: String },
}

impl ClaimEvent {
    pub fn name(&self) -> &'static str {
        match self {
            ClaimEvent::Submit => "submit",
            ClaimEvent::Approve { .. } => "approve",
            ClaimEvent::Reject { .. } => "reject",
            ClaimEvent::RequestInfo { .. } => "request_info",
        }
    }

    /// Papel que pode executar esta ação
    pub fn required_actor(&self) -> Role {
        match self {
            ClaimEvent::Submit => Role::Employee,
            _ => Role::Insurance,
        }
    }
}

/// Aplica uma ação sobre o status de um sinistro
///
/// Retorna o novo status ou o motivo da recusa; nunca altera nada por
/// fora. `RequestInfo` devolve o status de origem inalterado.
pub fn apply_claim_event(
    status: ClaimStatus,
    event: &ClaimEvent,
    actor: Role,
) -> Result<ClaimStatus, LifecycleError> {
    if actor != event.required_actor() {
        return Err(LifecycleError::ActorNotAllowed {
            actor,
            event: event.name().to_string(),
        });
    }

    let reviewable = matches!(status, ClaimStatus::Pending | ClaimStatus::Submitted);
    match event {
        ClaimEvent::Submit if status == ClaimStatus::Pending => Ok(ClaimStatus::Submitted),
        ClaimEvent::Approve { .. } if reviewable => Ok(ClaimStatus::Approved),
        ClaimEvent::Reject { .. } if reviewable => Ok(ClaimStatus::Rejected),
        ClaimEvent::RequestInfo { .. } if reviewable => Ok(status),
        _ => Err(LifecycleError::InvalidClaimTransition {
            from: status,
            event: event.name().to_string(),
        }),
    }
}

/// Classificação de uma transição de fluxo de trabalho aceita
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionCheck {
    /// Passo seguinte da progressão ordenada
    Regular,
    /// Fora de ordem ou regressivo; aceito, mas sinalizado
    Irregular,
}

/// Papel dono de cada estágio do fluxo de trabalho
///
/// O médico conduz os estágios iniciais, o funcionário os adjacentes
/// ao sinistro e a seguradora os terminais.
pub fn stage_owner(status: WorkflowStatus) -> Role {
    match status {
        WorkflowStatus::Created
        | WorkflowStatus::ReportSubmitted
        | WorkflowStatus::ReadyForEmployee => Role::Doctor,
        WorkflowStatus::ReadyForClaim | WorkflowStatus::ClaimSubmitted => Role::Employee,
        WorkflowStatus::UnderInsuranceReview
        | WorkflowStatus::Approved
        | WorkflowStatus::Rejected => Role::Insurance,
    }
}

/// Valida a mudança de status de fluxo de trabalho pedida por um ator
///
/// Um ator só grava estágios dos quais é dono. O passo seguinte da
/// progressão passa como [`TransitionCheck::Regular`]; qualquer outro
/// salto é aceito como [`TransitionCheck::Irregular`] e registrado,
/// preservando a flexibilidade que os operadores tinham sem aceitar
/// valores em silêncio.
pub fn apply_workflow_transition(
    from: WorkflowStatus,
    to: WorkflowStatus,
    actor: Role,
) -> Result<TransitionCheck, LifecycleError> {
    if stage_owner(to) != actor {
        return Err(LifecycleError::StageNotOwned { actor, target: to });
    }

    if to.stage_index() == from.stage_index() + 1 {
        Ok(TransitionCheck::Regular)
    } else {
        warn!(
            "Transição irregular de fluxo: {} -> {} pelo papel {}",
            from, to, actor
        );
        Ok(TransitionCheck::Irregular)
    }
}

/// Garante que o paciente está pronto para gerar sinistro
pub fn ensure_patient_ready(patient: &Patient) -> Result<(), LifecycleError> {
    if patient.workflow_status == WorkflowStatus::ReadyForClaim {
        Ok(())
    } else {
        Err(LifecycleError::PatientNotReady {
            status: patient.workflow_status,
        })
    }
}
