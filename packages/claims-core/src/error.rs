//! Definições de erro para a biblioteca claims-core
//!
//! Este módulo define os erros da máquina de estados e a normalização
//! de falhas dos colaboradores externos

use common_auth::Role;
use thiserror::Error;

use crate::models::{ClaimStatus, WorkflowStatus};

/// Erros da máquina de estados do ciclo de vida
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LifecycleError {
    #[error("O papel {actor} não pode executar a ação {event}")]
    ActorNotAllowed { actor: Role, event: String },

    #[error("Transição inválida: sinistro {from} não aceita a ação {event}")]
    InvalidClaimTransition { from: ClaimStatus, event: String },

    #[error("O papel {actor} não é dono do estágio {target}")]
    StageNotOwned {
        actor: Role,
        target: WorkflowStatus,
    },

    #[error("Paciente em {status}, apenas pacientes prontos geram sinistro")]
    PatientNotReady { status: WorkflowStatus },

    #[error("Sinistro não encontrado na última leitura")]
    ClaimNotFound,
}

/// Erro combinado das operações do serviço de sinistros
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

/// Falha normalizada de um colaborador externo
///
/// Toda falha de transporte vira uma única mensagem, a melhor
/// disponível no corpo da resposta; um 401 é distinguido porque
/// encerra a sessão.
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Credencial rejeitada pelo servidor")]
    Unauthorized,

    #[error("{0}")]
    Remote(String),

    #[error("Falha de comunicação: {0}")]
    Transport(String),
}
