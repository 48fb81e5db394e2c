// src/models/auth.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::models::{
    access::CapabilitySet,
    tenancy::{BusinessId, UserId},
};

const ADMIN_ROLE: &str = "admin";

// Representa um usuário vindo do banco de dados
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub business_id: Option<BusinessId>,

    #[schema(example = "Silva")]
    pub surname: Option<String>,
    #[schema(example = "Maria")]
    pub name: String,
    #[schema(example = "maria@email.com")]
    pub email: String,
    pub username: String,
    pub avatar: Option<String>,

    #[schema(example = "pt")]
    pub language: String,
    pub trial_ends_at: Option<DateTime<Utc>>,

    // Quando verdadeiro, o usuário só enxerga os contatos de user_contact_access.
    pub selected_contacts: bool,
    pub is_cmmsn_agnt: bool,

    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn full_name(&self) -> String {
        crate::services::dropdown_service::user_full_name(self.surname.as_deref(), Some(&self.name))
    }

    pub fn image_url(&self) -> String {
        match self.avatar.as_deref().filter(|a| !a.trim().is_empty()) {
            Some(avatar) => avatar.to_string(),
            None => format!("https://ui-avatars.com/api/?name={}", self.name.replace(' ', "+")),
        }
    }
}

// Estrutura de dados ("claims") dentro do JWT
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: UserId,  // Subject (ID do usuário)
    pub exp: usize,   // Expiration time
    pub iat: usize,   // Issued At
    // Empresa escolhida na sessão, se houver.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bid: Option<BusinessId>,
}

/// O usuário autenticado da requisição, com cargos e capacidades já resolvidos.
#[derive(Debug, Clone)]
pub struct Actor {
    pub user: User,
    pub roles: Vec<String>,
    pub capabilities: CapabilitySet,
    pub session_business_id: Option<BusinessId>,
}

impl Actor {
    pub fn id(&self) -> UserId {
        self.user.id
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    /// Primeiro cargo, sem o sufixo "#<empresa>".
    pub fn role_name(&self) -> String {
        self.roles
            .first()
            .and_then(|r| r.split('#').next())
            .unwrap_or_default()
            .to_string()
    }

    pub fn is_admin(&self) -> bool {
        self.has_role(ADMIN_ROLE)
    }

    pub fn can_impersonate(&self) -> bool {
        self.is_admin()
    }

    pub fn can_be_impersonated(&self) -> bool {
        !self.is_admin()
    }
}

// Resposta de /api/me
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[serde(flatten)]
    pub user: User,
    pub full_name: String,
    pub role_name: String,
    pub image_url: String,
    pub is_admin: bool,
    pub can_impersonate: bool,
    pub can_be_impersonated: bool,
    #[schema(value_type = Vec<String>)]
    pub capabilities: CapabilitySet,
}

impl From<Actor> for Profile {
    fn from(actor: Actor) -> Self {
        Profile {
            full_name: actor.user.full_name(),
            role_name: actor.role_name(),
            image_url: actor.user.image_url(),
            is_admin: actor.is_admin(),
            can_impersonate: actor.can_impersonate(),
            can_be_impersonated: actor.can_be_impersonated(),
            capabilities: actor.capabilities,
            user: actor.user,
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn user(id: UserId, business_id: Option<BusinessId>) -> User {
        let now = Utc::now();
        User {
            id,
            business_id,
            surname: None,
            name: "Alice".into(),
            email: format!("user{id}@example.com"),
            username: format!("user{id}"),
            avatar: None,
            language: "en".into(),
            trial_ends_at: None,
            selected_contacts: false,
            is_cmmsn_agnt: false,
            deleted_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub(crate) fn actor(business_id: Option<BusinessId>, roles: &[&str], caps: &[&str]) -> Actor {
        Actor {
            user: user(1, business_id),
            roles: roles.iter().map(|r| r.to_string()).collect(),
            capabilities: CapabilitySet::from_names(caps.iter().copied()),
            session_business_id: None,
        }
    }

    #[test]
    fn role_name_strips_business_suffix() {
        assert_eq!(actor(Some(7), &["Cashier#7"], &[]).role_name(), "Cashier");
        assert_eq!(actor(Some(7), &[], &[]).role_name(), "");
    }

    #[test]
    fn admins_impersonate_but_cannot_be_impersonated() {
        let admin = actor(None, &["admin"], &[]);
        assert!(admin.can_impersonate());
        assert!(!admin.can_be_impersonated());

        let clerk = actor(Some(1), &["Clerk#1"], &[]);
        assert!(!clerk.can_impersonate());
        assert!(clerk.can_be_impersonated());
    }

    #[test]
    fn image_url_falls_back_to_generated_avatar() {
        let mut u = user(3, None);
        assert_eq!(u.image_url(), "https://ui-avatars.com/api/?name=Alice");
        u.avatar = Some("avatars/alice.png".into());
        assert_eq!(u.image_url(), "avatars/alice.png");
    }

    #[test]
    fn full_name_without_surname_has_no_padding() {
        assert_eq!(user(1, None).full_name(), "Alice");
    }
}
