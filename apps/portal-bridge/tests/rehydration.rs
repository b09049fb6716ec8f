//! Sessão persistida sobrevive a reinícios do processo
//!
//! Dois "processos" (duas instâncias de serviço) compartilham o mesmo
//! banco SQLite; o segundo reidrata a sessão estabelecida pelo
//! primeiro sem falar com o colaborador de autenticação.

use std::sync::Arc;

use serde_json::json;
use tempfile::tempdir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common_auth::{Role, SessionService, SqliteCredentialStore, StoreConfig};
use portal_bridge::gateways::HttpAuthGateway;

async fn store_at(db_path: &std::path::Path) -> Arc<SqliteCredentialStore> {
    Arc::new(
        SqliteCredentialStore::connect(&StoreConfig {
            db_path: db_path.to_str().unwrap().to_string(),
            max_connections: 2,
        })
        .await
        .unwrap(),
    )
}

#[tokio::test]
async fn session_survives_process_restart() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "accessToken": "opaco",
            "user": { "role": "doctor" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let temp_dir = tempdir().unwrap();
    let db_path = temp_dir.path().join("portal.db");

    // Primeiro processo: autentica e persiste o par
    {
        let store = store_at(&db_path).await;
        let gateway = Arc::new(HttpAuthGateway::new(&server.uri()));
        let session = SessionService::new(gateway, store);
        session.rehydrate().await;

        let role = session.login("doctor@x.com", "password123").await.unwrap();
        assert_eq!(role, Role::Doctor);
    }

    // Segundo processo: reidrata do banco, sem nova chamada de login
    {
        let store = store_at(&db_path).await;
        let gateway = Arc::new(HttpAuthGateway::new(&server.uri()));
        let session = SessionService::new(gateway, store);
        session.rehydrate().await;

        let snapshot = session.snapshot();
        assert!(snapshot.is_authenticated());
        assert_eq!(snapshot.role, Some(Role::Doctor));
        assert_eq!(snapshot.token.as_deref(), Some("opaco"));

        // Logout limpa o banco: um terceiro processo começa anônimo
        session.logout().await;
    }

    {
        let store = store_at(&db_path).await;
        let gateway = Arc::new(HttpAuthGateway::new(&server.uri()));
        let session = SessionService::new(gateway, store);
        session.rehydrate().await;

        assert!(!session.snapshot().is_authenticated());
    }
}
