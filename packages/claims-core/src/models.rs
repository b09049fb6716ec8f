//! Modelos de dados do domínio de sinistros
//!
//! Este módulo define as estruturas principais trocadas com os
//! colaboradores externos: pacientes, laudos médicos, apólices e
//! sinistros.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Status do fluxo de trabalho de um paciente
///
/// Progressão ordenada sugerida pela interface; os estágios iniciais
/// pertencem ao médico, os adjacentes ao sinistro pertencem ao
/// funcionário e os terminais à seguradora.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowStatus {
    /// Cadastro criado
    Created,
    /// Laudo médico submetido
    ReportSubmitted,
    /// Pronto para triagem do funcionário
    ReadyForEmployee,
    /// Pronto para abertura de sinistro
    ReadyForClaim,
    /// Sinistro submetido
    ClaimSubmitted,
    /// Em análise pela seguradora
    UnderInsuranceReview,
    /// Aprovado (terminal)
    Approved,
    /// Rejeitado (terminal)
    Rejected,
}

impl WorkflowStatus {
    /// Posição na progressão ordenada; os dois terminais dividem o
    /// mesmo estágio final.
    pub fn stage_index(&self) -> u8 {
        match self {
            WorkflowStatus::Created => 0,
            WorkflowStatus::ReportSubmitted => 1,
            WorkflowStatus::ReadyForEmployee => 2,
            WorkflowStatus::ReadyForClaim => 3,
            WorkflowStatus::ClaimSubmitted => 4,
            WorkflowStatus::UnderInsuranceReview => 5,
            WorkflowStatus::Approved | WorkflowStatus::Rejected => 6,
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "created" => Some(WorkflowStatus::Created),
            "report_submitted" => Some(WorkflowStatus::ReportSubmitted),
            "ready_for_employee" => Some(WorkflowStatus::ReadyForEmployee),
            "ready_for_claim" => Some(WorkflowStatus::ReadyForClaim),
            "claim_submitted" => Some(WorkflowStatus::ClaimSubmitted),
            "under_insurance_review" => Some(WorkflowStatus::UnderInsuranceReview),
            "approved" => Some(WorkflowStatus::Approved),
            "rejected" => Some(WorkflowStatus::Rejected),
            _ => None,
        }
    }
}

impl std::fmt::Display for WorkflowStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WorkflowStatus::Created => write!(f, "created"),
            WorkflowStatus::ReportSubmitted => write!(f, "report_submitted"),
            WorkflowStatus::ReadyForEmployee => write!(f, "ready_for_employee"),
            WorkflowStatus::ReadyForClaim => write!(f, "ready_for_claim"),
            WorkflowStatus::ClaimSubmitted => write!(f, "claim_submitted"),
            WorkflowStatus::UnderInsuranceReview => write!(f, "under_insurance_review"),
            WorkflowStatus::Approved => write!(f, "approved"),
            WorkflowStatus::Rejected => write!(f, "rejected"),
        }
    }
}

/// Status de aprovação de um sinistro
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimStatus {
    /// Criado, ainda não submetido à seguradora
    Pending,
    /// Submetido à seguradora
    Submitted,
    /// Aprovado (terminal)
    Approved,
    /// Rejeitado (terminal)
    Rejected,
}

impl std::fmt::Display for ClaimStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClaimStatus::Pending => write!(f, "pending"),
            ClaimStatus::Submitted => write!(f, "submitted"),
            ClaimStatus::Approved => write!(f, "approved"),
            ClaimStatus::Rejected => write!(f, "rejected"),
        }
    }
}

/// Procedimento cobrado em um laudo médico
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcedureCode {
    /// Código do procedimento
    pub code: String,
    /// Descrição legível
    #[serde(default)]
    pub description: Option<String>,
    /// Valor cobrado pelo procedimento
    pub charges: Decimal,
}

/// Laudo médico de um paciente
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MedicalReport {
    /// Identificador único do laudo
    pub id: Uuid,
    /// Identificador do paciente
    pub patient_id: Uuid,
    /// Diagnóstico resumido
    #[serde(default)]
    pub diagnosis: Option<String>,
    /// Procedimentos cobrados
    #[serde(default)]
    pub procedure_codes: Vec<ProcedureCode>,
    /// Data e hora de criação do registro
    pub created_at: DateTime<Utc>,
}

impl MedicalReport {
    /// Soma das cobranças dos procedimentos do laudo
    ///
    /// É este valor que vira o `billed_amount` do sinistro no momento
    /// da criação; ele nunca é recalculado depois, mesmo que o laudo
    /// mude.
    pub fn total_charges(&self) -> Decimal {
        self.procedure_codes
            .iter()
            .map(|procedure| procedure.charges)
            .sum()
    }
}

/// Apólice de seguro vinculada a um paciente
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Insurance {
    /// Identificador único da apólice
    pub id: Uuid,
    /// Identificador do paciente
    pub patient_id: Uuid,
    /// Nome da seguradora
    pub provider_name: String,
    /// Número da apólice
    pub policy_number: String,
}

/// Janela de hospitalização de um paciente
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HospitalizationWindow {
    /// Data de admissão
    pub admitted_on: NaiveDate,
    /// Data de alta, quando houver
    #[serde(default)]
    pub discharged_on: Option<NaiveDate>,
}

/// Informações do acidente relatado
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccidentInfo {
    /// Data do acidente
    pub occurred_on: NaiveDate,
    /// Local do acidente
    #[serde(default)]
    pub location: Option<String>,
    /// Descrição livre
    #[serde(default)]
    pub description: Option<String>,
}

/// Paciente acompanhado pelos portais
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Patient {
    /// Identificador único do paciente
    pub id: Uuid,
    /// Nome completo
    pub name: String,
    /// E-mail de contato
    #[serde(default)]
    pub email: Option<String>,
    /// Status atual do fluxo de trabalho
    pub workflow_status: WorkflowStatus,
    /// Apólices vinculadas (na prática uma, o modelo permite várias)
    #[serde(default)]
    pub insurances: Vec<Insurance>,
    /// Informações do acidente, quando relatado
    #[serde(default)]
    pub accident_info: Option<AccidentInfo>,
    /// Janela de hospitalização, quando houver
    #[serde(default)]
    pub hospitalization: Option<HospitalizationWindow>,
    /// Data e hora de criação do registro
    pub created_at: DateTime<Utc>,
}

/// Sinistro de cobrança
///
/// Referencia exatamente um paciente, uma apólice e um laudo; os
/// campos denormalizados são populados pelo colaborador na leitura.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claim {
    /// Identificador único do sinistro
    pub id: Uuid,
    /// Identificador do paciente
    pub patient_id: Uuid,
    /// Identificador da apólice
    pub insurance_id: Uuid,
    /// Identificador do laudo médico de origem
    pub medical_report_id: Uuid,
    /// Valor cobrado, fixado na criação
    pub billed_amount: Decimal,
    /// Valor aprovado; só tem significado quando o status é aprovado
    #[serde(default)]
    pub approved_amount: Option<Decimal>,
    /// Status de aprovação
    pub status: ClaimStatus,
    /// Observações livres
    #[serde(default)]
    pub notes: Option<String>,
    /// Referências a anexos
    #[serde(default)]
    pub attachments: Vec<String>,
    /// Data de submissão à seguradora
    #[serde(default)]
    pub submitted_date: Option<DateTime<Utc>>,
    /// Data e hora de criação do registro
    pub created_at: DateTime<Utc>,
}

/// Rascunho de sinistro enviado ao colaborador na criação
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClaimDraft {
    pub patient_id: Uuid,
    pub insurance_id: Uuid,
    pub medical_report_id: Uuid,
    /// Soma das cobranças do laudo no momento da criação
    pub billed_amount: Decimal,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Agregados de leitura do painel de sinistros
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClaimAnalytics {
    pub total: u64,
    pub pending: u64,
    pub submitted: u64,
    pub approved: u64,
    pub rejected: u64,
    #[serde(default)]
    pub total_billed: Decimal,
    #[serde(default)]
    pub total_approved: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report_with_charges(charges: &[i64]) -> MedicalReport {
        MedicalReport {
            id: Uuid::new_v4(),
            patient_id: Uuid::new_v4(),
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

    #[test]
    fn test_total_charges_sums_procedures() {
        let report = report_with_charges(&[100, 250]);
        assert_eq!(report.total_charges(), Decimal::from(350));
    }

    #[test]
    fn test_total_charges_of_empty_report_is_zero() {
        let report = report_with_charges(&[]);
        assert_eq!(report.total_charges(), Decimal::ZERO);
    }

    #[test]
    fn test_workflow_status_roundtrip() {
        let all = [
            WorkflowStatus::Created,
            WorkflowStatus::ReportSubmitted,
            WorkflowStatus::ReadyForEmployee,
            WorkflowStatus::ReadyForClaim,
            WorkflowStatus::ClaimSubmitted,
            WorkflowStatus::UnderInsuranceReview,
            WorkflowStatus::Approved,
            WorkflowStatus::Rejected,
        ];
        for status in all {
            assert_eq!(WorkflowStatus::parse(&status.to_string()), Some(status));
        }
        assert_eq!(WorkflowStatus::parse("inexistente"), None);
    }

    #[test]
    fn test_stage_indexes_are_ordered() {
        assert!(WorkflowStatus::Created.stage_index() < WorkflowStatus::ReadyForClaim.stage_index());
        assert_eq!(
            WorkflowStatus::Approved.stage_index(),
            WorkflowStatus::Rejected.stage_index()
        );
    }
}
