//! User accounts, login payloads, and token claims.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A platform user who can log in and chat.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub user_id: String,
    pub email: String,
    pub name: String,
    /// Argon2id PHC string. Never serialized back to clients.
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

impl User {
    /// Public view returned alongside a login token.
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.user_id.clone(),
            email: self.email.clone(),
            name: self.name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    pub name: String,
}

/// Body of `POST /api/login`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Successful login body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub success: bool,
    pub token: String,
    pub user: UserProfile,
}

/// One entry of a seed file: `[{"email":..., "name":..., "password":...}]`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SeedUser {
    pub email: Option<String>,
    pub name: Option<String>,
    pub password: Option<String>,
}

impl SeedUser {
    /// All three fields must be present and non-empty.
    pub fn complete(&self) -> Option<(&str, &str, &str)> {
        let email = self.email.as_deref().filter(|s| !s.is_empty())?;
        let name = self.name.as_deref().filter(|s| !s.is_empty())?;
        let password = self.password.as_deref().filter(|s| !s.is_empty())?;
        Some((email, name, password))
    }
}

/// JWT claims carried by access tokens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    pub iat: i64,
    pub exp: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_not_serialized() {
        let now = Utc::now();
        let user = User {
            user_id: "u1".into(),
            email: "a@b.c".into(),
            name: "A".into(),
            password_hash: "$argon2id$secret".into(),
            created_at: now,
            updated_at: now,
            last_login: None,
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("argon2id"));
        assert_eq!(user.profile().id, "u1");
    }

    #[test]
    fn test_seed_user_complete() {
        let seed: Vec<SeedUser> = serde_json::from_str(
            r#"[{"email":"a@b.c","name":"A","password":"pw"},{"email":"x@y.z","name":""}]"#,
        )
        .unwrap();
        assert_eq!(seed[0].complete(), Some(("a@b.c", "A", "pw")));
        assert!(seed[1].complete().is_none());
    }

    #[test]
    fn test_claims_wire_names() {
        let claims = Claims {
            user_id: Some("u1".into()),
            email: None,
            iat: 1,
            exp: 2,
        };
        let json = serde_json::to_value(&claims).unwrap();
        assert_eq!(json["userId"], "u1");
        assert_eq!(json["exp"], 2);
    }
}
