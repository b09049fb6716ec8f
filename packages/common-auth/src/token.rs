//! Decodificador de papel a partir do token portador
//!
//! O token é uma credencial opaca emitida pelo servidor com três
//! segmentos separados por ponto; o segmento do meio é um objeto JSON
//! codificado em base64url. Este módulo extrai o campo `role` desse
//! payload **sem verificar a assinatura**: o resultado é apenas uma
//! dica de roteamento de interface, nunca uma fonte de autorização.
//! Toda autorização real é re-aplicada pelo servidor.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::Deserialize;

use crate::role::Role;

/// Payload decodificado, porém **não verificado**, de um token portador
///
/// Tipo deliberadamente distinto de qualquer tipo de claims verificadas:
/// código futuro não deve tratá-lo como fonte de autorização.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct UnverifiedClaims {
    /// Papel declarado na raiz do payload
    #[serde(default)]
    pub role: Option<String>,
    /// Objeto aninhado de claims, usado como segunda tentativa
    #[serde(default)]
    pub claims: Option<NestedClaims>,
}

/// Claims aninhadas sob o campo `claims` do payload
#[derive(Debug, Default, Clone, Deserialize)]
pub struct NestedClaims {
    #[serde(default)]
    pub role: Option<String>,
}

impl UnverifiedClaims {
    /// Papel declarado: `role` na raiz, senão `claims.role`
    pub fn role_hint(&self) -> Option<&str> {
        self.role
            .as_deref()
            .or_else(|| self.claims.as_ref().and_then(|c| c.role.as_deref()))
    }
}

/// Decodifica o payload de um token sem verificar a assinatura
///
/// Retorna `None` para qualquer entrada malformada: número errado de
/// segmentos, base64 inválido, JSON inválido. Nunca retorna erro.
pub fn decode_claims(token: &str) -> Option<UnverifiedClaims> {
    let segments: Vec<&str> = token.split('.').collect();
    if segments.len() != 3 {
        return None;
    }

    // Tokens seguem base64url sem padding; alguns emissores preenchem
    // com '=' mesmo assim, então o sufixo é tolerado.
    let payload = segments[1].trim_end_matches('=');
    let bytes = URL_SAFE_NO_PAD.decode(payload).ok()?;

    serde_json::from_slice(&bytes).ok()
}

/// Extrai o papel de um token, se houver
///
/// Função pura e sem efeitos colaterais; todas as falhas de decodificação
/// são absorvidas como `None` porque os chamadores sempre têm um fallback.
pub fn decode_role(token: Option<&str>) -> Option<Role> {
    let claims = decode_claims(token?)?;
    Role::parse(claims.role_hint()?)
}
