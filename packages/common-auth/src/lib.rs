//! Common Auth - Biblioteca compartilhada de sessão e autorização dos portais
//!
//! Esta biblioteca fornece:
//! - O serviço de sessão (login, registro, logout, reidratação)
//! - O decodificador de papel a partir do token portador (não criptográfico)
//! - O armazenamento persistente do par token/papel
//! - A decisão pura de guarda de rotas por papel
//!
//! Fronteira de confiança: nada aqui verifica assinaturas. O papel
//! decodificado orienta apenas o roteamento da interface; a autorização
//! que importa é re-aplicada pelo servidor em cada requisição.

pub mod error;
pub mod guard;
pub mod role;
pub mod session;
pub mod store;
pub mod token;

pub use error::AuthError;
pub use guard::{evaluate, GuardOutcome};
pub use role::Role;
pub use session::{AuthGateway, SessionService, SessionSnapshot};
pub use store::{
    CredentialStore, MemoryCredentialStore, SqliteCredentialStore, StoreConfig, StoredSession,
};
pub use token::{decode_claims, decode_role, UnverifiedClaims};
