//! Definições de erro para a biblioteca common-auth
//!
//! Este módulo define os tipos de erro usados pelo fluxo de sessão

use thiserror::Error;

/// Erros específicos para operações de autenticação e sessão
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Nenhuma credencial encontrada na resposta do servidor")]
    TokenMissing,

    #[error("Não foi possível determinar o papel do usuário")]
    RoleMissing,

    #[error("Sessão não autenticada")]
    NotAuthenticated,

    #[error("Credencial rejeitada pelo servidor")]
    Unauthorized,

    #[error("Falha no serviço de autenticação: {0}")]
    Gateway(String),

    #[error("Falha ao persistir a sessão: {0}")]
    Store(String),
}
