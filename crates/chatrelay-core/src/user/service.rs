//! UserService: login and bulk user seeding.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use chatrelay_types::error::{LoginError, StoreError};
use chatrelay_types::user::{LoginRequest, LoginResponse, SeedUser, User};

use super::repository::UserRepository;
use crate::auth::password::CredentialHasher;
use crate::auth::token::TokenIssuer;

/// Result of a seeding run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub created: Vec<String>,
    pub existing: Vec<String>,
    pub incomplete: usize,
}

/// Orchestrates login and seeding over a repository, hasher and issuer.
pub struct UserService<R: UserRepository, H: CredentialHasher, T: TokenIssuer> {
    repo: Arc<R>,
    hasher: Arc<H>,
    issuer: Arc<T>,
}

impl<R: UserRepository, H: CredentialHasher, T: TokenIssuer> UserService<R, H, T> {
    pub fn new(repo: Arc<R>, hasher: Arc<H>, issuer: Arc<T>) -> Self {
        Self { repo, hasher, issuer }
    }

    /// Check credentials and issue an access token.
    ///
    /// Unknown email and wrong password both yield
    /// [`LoginError::InvalidCredentials`].
    pub async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, LoginError> {
        let email = request.email.trim();
        if email.is_empty() || request.password.is_empty() {
            return Err(LoginError::MissingCredentials);
        }

        let Some(user) = self.repo.find_by_email(email).await? else {
            tracing::info!(email, "login failed: unknown email");
            return Err(LoginError::InvalidCredentials);
        };

        if !self.hasher.verify_password(&request.password, &user.password_hash) {
            tracing::info!(user_id = %user.user_id, "login failed: wrong password");
            return Err(LoginError::InvalidCredentials);
        }

        let token = self
            .issuer
            .issue(&user.user_id, &user.email)
            .map_err(LoginError::Token)?;

        if let Err(e) = self.repo.record_login(&user.user_id, Utc::now()).await {
            tracing::warn!(user_id = %user.user_id, error = %e, "failed to record last login");
        }

        tracing::info!(user_id = %user.user_id, "login succeeded");
        Ok(LoginResponse {
            success: true,
            token,
            user: user.profile(),
        })
    }

    /// Create every complete entry whose email is not yet registered.
    pub async fn seed(&self, entries: &[SeedUser]) -> Result<SeedReport, LoginError> {
        let mut report = SeedReport::default();

        for entry in entries {
            let Some((email, name, password)) = entry.complete() else {
                tracing::warn!("skipping seed entry with missing fields");
                report.incomplete += 1;
                continue;
            };

            if self.repo.find_by_email(email).await?.is_some() {
                report.existing.push(email.to_string());
                continue;
            }

            let password_hash = self
                .hasher
                .hash_password(password)
                .map_err(LoginError::Hashing)?;
            let now = Utc::now();
            let user = User {
                user_id: Uuid::new_v4().to_string(),
                email: email.to_string(),
                name: name.to_string(),
                password_hash,
                created_at: now,
                updated_at: now,
                last_login: None,
            };

            match self.repo.create_user(&user).await {
                Ok(()) => {
                    tracing::info!(user_id = %user.user_id, email, "seeded user");
                    report.created.push(email.to_string());
                }
                Err(StoreError::DuplicateKey(_)) => report.existing.push(email.to_string()),
                Err(e) => return Err(e.into()),
            }
        }

        Ok(report)
    }
}
