//! Configuração do portal-bridge
//!
//! Este módulo carrega a configuração do processo a partir de
//! variáveis de ambiente, com padrões pensados para desenvolvimento
//! local.

use std::net::SocketAddr;

use anyhow::{Context, Result};

/// Configuração do aplicativo
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Endereço de escuta do servidor HTTP
    pub listen_addr: SocketAddr,
    /// URL base do colaborador de autenticação
    pub auth_base_url: String,
    /// URL base do colaborador de sinistros
    pub claims_base_url: String,
    /// URL base do colaborador de pacientes
    pub patients_base_url: String,
    /// Caminho para o banco SQLite de credenciais
    pub store_path: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            listen_addr: ([127, 0, 0, 1], 8080).into(),
            auth_base_url: "http://localhost:4000".to_string(),
            claims_base_url: "http://localhost:4000".to_string(),
            patients_base_url: "http://localhost:4000".to_string(),
            store_path: "data/portal.db".to_string(),
        }
    }
}

impl AppConfig {
    /// Carrega a configuração das variáveis de ambiente
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let listen_addr = match std::env::var("PORTAL_LISTEN_ADDR") {
            Ok(value) => value
                .parse()
                .context("PORTAL_LISTEN_ADDR inválido")?,
            Err(_) => defaults.listen_addr,
        };

        Ok(Self {
            listen_addr,
            auth_base_url: env_or("PORTAL_AUTH_URL", defaults.auth_base_url),
            claims_base_url: env_or("PORTAL_CLAIMS_URL", defaults.claims_base_url),
            patients_base_url: env_or("PORTAL_PATIENTS_URL", defaults.patients_base_url),
            store_path: env_or("PORTAL_STORE_PATH", defaults.store_path),
        })
    }
}

fn env_or(key: &str, default: String) -> String {
    std::env::var(key).unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_usable() {
        let config = AppConfig::default();
        assert_eq!(config.listen_addr.port(), 8080);
        assert!(config.auth_base_url.starts_with("http://"));
    }
}
