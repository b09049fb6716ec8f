//! Claims Core - Modelos de domínio e ciclo de vida de sinistros
//!
//! Esta biblioteca fornece:
//! - Modelos de dados de pacientes, laudos, apólices e sinistros
//! - A máquina de estados do ciclo de vida, condicionada ao papel
//! - O serviço de sinistros com cache sequenciado sobre a última busca
//! - As abstrações dos colaboradores externos de sinistros e pacientes

pub mod error;
pub mod lifecycle;
pub mod models;
pub mod service;

pub use error::{GatewayError, LifecycleError, ServiceError};
pub use lifecycle::{
    apply_claim_event, apply_workflow_transition, ensure_patient_ready, stage_owner, ClaimEvent,
    TransitionCheck,
};
pub use models::{
    AccidentInfo, Claim, ClaimAnalytics, ClaimDraft, ClaimStatus, HospitalizationWindow,
    Insurance, MedicalReport, Patient, ProcedureCode, WorkflowStatus,
};
pub use service::{ClaimsGateway, ClaimsService, PatientsGateway};
