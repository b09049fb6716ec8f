//! Decisão de guarda de rotas
//!
//! Este módulo decide, para cada navegação a um subárvore protegido,
//! se o visitante passa, espera ou é redirecionado. A decisão é uma
//! função pura sobre a fotografia da sessão; a tradução para resposta
//! HTTP fica no aplicativo.

use crate::role::Role;
use crate::session::SessionSnapshot;

/// Resultado da avaliação da guarda
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardOutcome {
    /// Sessão ainda em reidratação: nenhuma decisão de redirecionamento
    Wait,
    /// Não autenticado: ir ao login, preservando o caminho tentado
    ToLogin { from: String },
    /// Autenticado com papel errado: ir à raiz do portal do próprio
    /// papel, nunca a uma página de erro
    ToPortal(Role),
    /// Acesso liberado
    Allow,
}

/// Avalia a guarda para um subárvore com os papéis permitidos
pub fn evaluate(snapshot: &SessionSnapshot, allowed: &[Role], attempted: &str) -> GuardOutcome {
    if snapshot.loading {
        return GuardOutcome::Wait;
    }

    let role = match (snapshot.is_authenticated(), snapshot.role) {
        (true, Some(role)) => role,
        _ => {
            return GuardOutcome::ToLogin {
                from: attempted.to_string(),
            }
        }
    };

    if allowed.contains(&role) {
        GuardOutcome::Allow
    } else {
        GuardOutcome::ToPortal(role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(token: Option<&str>, role: Option<Role>, loading: bool) -> SessionSnapshot {
        SessionSnapshot {
            token: token.map(str::to_string),
            role,
            loading,
        }
    }

    #[test]
    fn test_loading_never_redirects() {
        let loading = snapshot(None, None, true);
        assert_eq!(
            evaluate(&loading, &[Role::Doctor], "/doctor"),
            GuardOutcome::Wait
        );
        assert_eq!(evaluate(&loading, &[], "/qualquer"), GuardOutcome::Wait);
    }

    #[test]
    fn test_unauthenticated_goes_to_login_with_attempted_path() {
        let anonymous = snapshot(None, None, false);
        assert_eq!(
            evaluate(&anonymous, &[Role::Employee], "/employee/claims"),
            GuardOutcome::ToLogin {
                from: "/employee/claims".to_string()
            }
        );
    }

    #[test]
    fn test_wrong_role_goes_to_own_portal() {
        let employee = snapshot(Some("a.b.c"), Some(Role::Employee), false);
        assert_eq!(
            evaluate(&employee, &[Role::Doctor], "/doctor"),
            GuardOutcome::ToPortal(Role::Employee)
        );
    }

    #[test]
    fn test_matching_role_is_allowed() {
        let doctor = snapshot(Some("a.b.c"), Some(Role::Doctor), false);
        assert_eq!(
            evaluate(&doctor, &[Role::Doctor], "/doctor/patients"),
            GuardOutcome::Allow
        );
    }
}
