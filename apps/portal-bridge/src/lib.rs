//! Portal Bridge - Ponte entre os portais de sinistros e seus colaboradores
//!
//! Este serviço:
//! - Mantém a sessão única do processo (token + papel), persistida
//! - Guarda os três subárvores de portal por papel
//! - Encaminha operações aos colaboradores de autenticação, sinistros
//!   e pacientes com o token portador
//! - Aplica a máquina de estados do ciclo de vida antes de cada ação

pub mod config;
pub mod error;
pub mod gateways;
pub mod guard;
pub mod routes;
pub mod state;

/// Metadados de build gerados pelo `built`
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}
