//! Armazenamento persistente de credenciais
//!
//! Este módulo persiste o par `{token, papel}` da sessão em um banco
//! SQLite local, de forma que a sessão sobreviva a reinícios do
//! processo. O par é sempre gravado e removido de forma atômica: nunca
//! existe token sem papel nem papel sem token.

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use crate::role::Role;

/// Chave fixa sob a qual o token é persistido
pub const TOKEN_KEY: &str = "portal_token";
/// Chave fixa sob a qual o papel é persistido
pub const ROLE_KEY: &str = "portal_role";

/// Par persistido de sessão
///
/// Invariante: os dois campos existem juntos ou não existem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredSession {
    /// Token portador opaco emitido pelo servidor
    pub token: String,
    /// Papel derivado na autenticação
    pub role: Role,
}

/// Armazenamento de credenciais da sessão
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Lê o par persistido, se completo
    async fn load(&self) -> Result<Option<StoredSession>>;
    /// Grava o par de forma atômica
    async fn save(&self, session: &StoredSession) -> Result<()>;
    /// Remove o par; idempotente
    async fn clear(&self) -> Result<()>;
}

/// Configuração do armazenamento SQLite
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Caminho para o arquivo SQLite
    pub db_path: String,
    /// Número máximo de conexões no pool
    pub max_connections: u32,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            db_path: "data/portal.db".to_string(),
            max_connections: 2,
        }
    }
}

/// Lista de migrações SQL a serem aplicadas
const MIGRATIONS: &[&str] = &[
    // 001_credentials.sql
    r#"
    -- Par token/papel da sessão, sob chaves fixas
    CREATE TABLE IF NOT EXISTS credentials (
        key TEXT PRIMARY KEY NOT NULL,
        value TEXT NOT NULL,
        updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
    );
    "#,
];

/// Executa todas as migrações pendentes no banco de dados
async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    // Obter a versão atual do banco de dados
    let mut version: i64 = 0;
    match sqlx::query_scalar("PRAGMA user_version").fetch_one(pool).await {
        Ok(v) => version = v,
        Err(e) => {
            error!("Erro ao obter versão do banco: {}", e);
            // Continuar mesmo assim, pois pode ser a primeira execução
        }
    }

    // Aplicar cada migração pendente sequencialmente
    for (i, migration_sql) in MIGRATIONS.iter().enumerate() {
        let migration_version = (i + 1) as i64;

        // Pular migrações já aplicadas
        if migration_version <= version {
            continue;
        }

        // Executar em uma transação para garantir atomicidade
        let mut transaction = pool
            .begin()
            .await
            .context(format!("Falha ao iniciar transação para migração {}", migration_version))?;

        sqlx::query(migration_sql)
            .execute(&mut *transaction)
            .await
            .context(format!("Falha ao executar migração {}", migration_version))?;

        sqlx::query(&format!("PRAGMA user_version = {}", migration_version))
            .execute(&mut *transaction)
            .await
            .context(format!("Falha ao atualizar versão para {}", migration_version))?;

        transaction
            .commit()
            .await
            .context(format!("Falha ao confirmar transação para migração {}", migration_version))?;

        info!("Migração {} aplicada com sucesso", migration_version);
    }

    Ok(())
}

/// Armazenamento de credenciais sobre SQLite
pub struct SqliteCredentialStore {
    pool: SqlitePool,
}

impl SqliteCredentialStore {
    /// Abre (ou cria) o banco local e aplica migrações
    pub async fn connect(config: &StoreConfig) -> Result<Self> {
        let db_path = Path::new(&config.db_path);

        // Verifica se o diretório pai existe
        if let Some(parent) = db_path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent)
                    .context("Falha ao criar diretório para banco de dados")?;
            }
        }

        let connection_options = SqliteConnectOptions::new()
            .filename(db_path)
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            .foreign_keys(true)
            .pragma("synchronous", "NORMAL");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(connection_options)
            .await
            .context("Falha ao conectar ao banco de dados SQLite")?;

        run_migrations(&pool)
            .await
            .context("Falha ao aplicar migrações")?;

        info!("Armazenamento de credenciais inicializado: {}", config.db_path);
        Ok(Self { pool })
    }

    async fn read_key(&self, key: &str) -> Result<Option<String>> {
        let value: Option<String> =
            sqlx::query_scalar("SELECT value FROM credentials WHERE key = ?")
                .bind(key)
                .fetch_optional(&self.pool)
                .await?;
        Ok(value)
    }
}

#[async_trait]
impl CredentialStore for SqliteCredentialStore {
    async fn load(&self) -> Result<Option<StoredSession>> {
        let token = self.read_key(TOKEN_KEY).await?;
        let role = self.read_key(ROLE_KEY).await?;

        match (token, role) {
            (Some(token), Some(role_str)) => match Role::parse(&role_str) {
                Some(role) => Ok(Some(StoredSession { token, role })),
                None => {
                    // Papel persistido irreconhecível: o par inteiro é inválido
                    warn!("Papel persistido desconhecido ({}), limpando sessão", role_str);
                    self.clear().await?;
                    Ok(None)
                }
            },
            (None, None) => Ok(None),
            _ => {
                // Par incompleto viola o invariante de atomicidade
                warn!("Par de credenciais incompleto no banco, limpando sessão");
                self.clear().await?;
                Ok(None)
            }
        }
    }

    async fn save(&self, session: &StoredSession) -> Result<()> {
        let mut transaction = self
            .pool
            .begin()
            .await
            .context("Falha ao iniciar transação de gravação da sessão")?;

        let role = session.role.to_string();
        for (key, value) in [(TOKEN_KEY, session.token.as_str()), (ROLE_KEY, role.as_str())] {
            sqlx::query(
                "INSERT INTO credentials (key, value, updated_at)
                 VALUES (?, ?, CURRENT_TIMESTAMP)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value,
                                                updated_at = excluded.updated_at",
            )
            .bind(key)
            .bind(value)
            .execute(&mut *transaction)
            .await
            .context("Falha ao gravar credencial")?;
        }

        transaction
            .commit()
            .await
            .context("Falha ao confirmar gravação da sessão")?;
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        let mut transaction = self
            .pool
            .begin()
            .await
            .context("Falha ao iniciar transação de limpeza da sessão")?;

        sqlx::query("DELETE FROM credentials WHERE key IN (?, ?)")
            .bind(TOKEN_KEY)
            .bind(ROLE_KEY)
            .execute(&mut *transaction)
            .await
            .context("Falha ao remover credenciais")?;

        transaction
            .commit()
            .await
            .context("Falha ao confirmar limpeza da sessão")?;
        Ok(())
    }
}

/// Armazenamento volátil, para testes e execuções efêmeras
#[derive(Default)]
pub struct MemoryCredentialStore {
    inner: Mutex<Option<StoredSession>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn load(&self) -> Result<Option<StoredSession>> {
        Ok(self.inner.lock().await.clone())
    }

    async fn save(&self, session: &StoredSession) -> Result<()> {
        *self.inner.lock().await = Some(session.clone());
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        *self.inner.lock().await = None;
        Ok(())
    }
}
