//! Raiz de composição do portal-bridge

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use claims_core::{ClaimsService, PatientsGateway};
use common_auth::{SessionService, SqliteCredentialStore, StoreConfig};

use portal_bridge::config::AppConfig;
use portal_bridge::gateways::{HttpAuthGateway, HttpClaimsGateway, HttpPatientsGateway};
use portal_bridge::routes::app_router;
use portal_bridge::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("portal_bridge=debug,info")),
        )
        .init();

    let config = AppConfig::from_env().context("Falha ao carregar configuração")?;
    info!("Configuração carregada: escutando em {}", config.listen_addr);

    let store = Arc::new(
        SqliteCredentialStore::connect(&StoreConfig {
            db_path: config.store_path.clone(),
            max_connections: 2,
        })
        .await
        .context("Falha ao abrir armazenamento de credenciais")?,
    );

    let auth_gateway = Arc::new(HttpAuthGateway::new(&config.auth_base_url));
    let session = Arc::new(SessionService::new(auth_gateway, store));

    // A reidratação acontece antes de o servidor aceitar conexões,
    // então a checagem da raiz nunca disputa com a guarda.
    session.rehydrate().await;

    let claims_gateway = Arc::new(HttpClaimsGateway::new(
        &config.claims_base_url,
        session.clone(),
    ));
    let claims = Arc::new(ClaimsService::new(claims_gateway));

    let patients: Arc<dyn PatientsGateway> = Arc::new(HttpPatientsGateway::new(
        &config.patients_base_url,
        session.clone(),
    ));

    let state = AppState {
        session,
        claims,
        patients,
    };

    let app = app_router(state);

    info!("Portal bridge iniciado em {}", config.listen_addr);
    axum::Server::bind(&config.listen_addr)
        .serve(app.into_make_service())
        .await
        .context("Servidor encerrou com erro")?;

    Ok(())
}
