//! Papéis de acesso aos portais
//!
//! Este módulo define os três papéis reconhecidos pelo sistema e o
//! portal correspondente a cada um deles.

use serde::{Deserialize, Serialize};

/// Papel de um usuário autenticado
///
/// Cada papel corresponde a exatamente um portal isolado; a autorização
/// real é responsabilidade do servidor, aqui o papel decide apenas o
/// roteamento.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Funcionário administrativo (submete sinistros)
    Employee,
    /// Médico (conduz o fluxo clínico do paciente)
    Doctor,
    /// Seguradora (aprova, rejeita ou pede informações)
    Insurance,
}

impl Role {
    /// Raiz do subárvore de rotas do portal deste papel
    pub fn portal_root(&self) -> &'static str {
        match self {
            Role::Employee => "/employee",
            Role::Doctor => "/doctor",
            Role::Insurance => "/insurance",
        }
    }

    /// Interpreta um papel vindo de fora (token ou corpo de resposta)
    ///
    /// Aceita variação de caixa; retorna `None` para qualquer valor
    /// desconhecido em vez de falhar.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "employee" => Some(Role::Employee),
            "doctor" => Some(Role::Doctor),
            "insurance" => Some(Role::Insurance),
            _ => None,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Employee => write!(f, "employee"),
            Role::Doctor => write!(f, "doctor"),
            Role::Insurance => write!(f, "insurance"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_roles() {
        assert_eq!(Role::parse("employee"), Some(Role::Employee));
        assert_eq!(Role::parse("Doctor"), Some(Role::Doctor));
        assert_eq!(Role::parse(" INSURANCE "), Some(Role::Insurance));
    }

    #[test]
    fn test_parse_unknown_role() {
        assert_eq!(Role::parse("admin"), None);
        assert_eq!(Role::parse(""), None);
    }

    #[test]
    fn test_portal_root_and_display_roundtrip() {
        for role in [Role::Employee, Role::Doctor, Role::Insurance] {
            assert_eq!(Role::parse(&role.to_string()), Some(role));
            assert!(role.portal_root().starts_with('/'));
        }
    }
}
