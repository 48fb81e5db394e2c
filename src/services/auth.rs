// src/services/auth.rs

use jsonwebtoken::{decode, DecodingKey, Validation};

use crate::{
    common::error::AppError,
    db::UserRepository,
    models::{
        access::CapabilitySet,
        auth::{Actor, Claims},
    },
};

/// Valida o token do cliente e carrega o ator correspondente.
/// Login e emissão de tokens ficam fora deste serviço.
#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    jwt_secret: String,
}

/// Capacidades efetivas: permissões (diretas e via cargos) + nomes dos cargos.
pub fn effective_capabilities(permissions: &[String], roles: &[String]) -> CapabilitySet {
    CapabilitySet::from_names(permissions.iter().chain(roles.iter()))
}

impl AuthService {
    pub fn new(user_repo: UserRepository, jwt_secret: String) -> Self {
        Self { user_repo, jwt_secret }
    }

    pub fn decode_claims(&self, token: &str) -> Result<Claims, AppError> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &Validation::default(),
        )
        .map_err(|e| {
            tracing::debug!("token rejeitado: {}", e);
            AppError::InvalidToken
        })?;
        Ok(token_data.claims)
    }

    pub async fn load_actor(&self, claims: &Claims) -> Result<Actor, AppError> {
        let user = self
            .user_repo
            .find_by_id(claims.sub)
            .await?
            .ok_or(AppError::InvalidToken)?;

        let roles = self.user_repo.role_names(user.id).await?;
        let permissions = self.user_repo.permission_names(user.id).await?;

        Ok(Actor {
            capabilities: effective_capabilities(&permissions, &roles),
            roles,
            session_business_id: claims.bid,
            user,
        })
    }

    pub async fn validate_token(&self, token: &str) -> Result<Actor, AppError> {
        let claims = self.decode_claims(token)?;
        self.load_actor(&claims).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use sqlx::postgres::PgPoolOptions;

    const SECRET: &str = "segredo-de-teste";

    fn service() -> AuthService {
        // Pool preguiçoso: nenhum teste aqui chega a abrir conexão.
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://localhost/unused")
            .unwrap();
        AuthService::new(UserRepository::new(pool), SECRET.into())
    }

    fn token(secret: &str, exp_offset: i64, bid: Option<i64>) -> String {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: 42,
            exp: (now + exp_offset) as usize,
            iat: now as usize,
            bid,
        };
        encode(&Header::default(), &claims, &EncodingKey::from_secret(secret.as_ref())).unwrap()
    }

    #[tokio::test]
    async fn valid_token_yields_claims() {
        let claims = service().decode_claims(&token(SECRET, 3600, Some(7))).unwrap();
        assert_eq!(claims.sub, 42);
        assert_eq!(claims.bid, Some(7));
    }

    #[tokio::test]
    async fn wrong_secret_is_rejected() {
        let err = service().decode_claims(&token("outro", 3600, None)).unwrap_err();
        assert!(matches!(err, AppError::InvalidToken));
    }

    #[tokio::test]
    async fn expired_token_is_rejected() {
        let err = service().decode_claims(&token(SECRET, -3600, None)).unwrap_err();
        assert!(matches!(err, AppError::InvalidToken));
    }

    #[test]
    fn role_names_count_as_capabilities() {
        let caps = effective_capabilities(
            &["location.3".to_string()],
            &["Admin#7".to_string(), "Cashier#7".to_string()],
        );
        assert!(caps.is_business_admin(7));
        assert_eq!(caps.granted_locations().collect::<Vec<_>>(), vec![3]);
    }
}
