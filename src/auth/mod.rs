//! Authentication
//!
//! bcrypt password hashing, signed bearer tokens and the request extractors
//! that resolve the calling user.

pub mod extract;
pub mod password;
pub mod token;

pub use extract::{AdminUser, AuthUser};
pub use password::{validate_password, validate_username};
pub use token::{Claims, TokenSigner};

use crate::config::AppConfig;
use crate::core::AppResult;
use crate::models::User;
use crate::storage::Repository;

/// Password hashing and token handling configured for one deployment.
pub struct AuthService {
    signer: TokenSigner,
    bcrypt_cost: u32,
}

impl AuthService {
    pub fn new(signer: TokenSigner, bcrypt_cost: u32) -> Self {
        Self {
            signer,
            bcrypt_cost,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            TokenSigner::new(&config.token_secret, config.token_ttl),
            config.bcrypt_cost,
        )
    }

    pub async fn hash_password(&self, password: &str) -> AppResult<String> {
        password::hash_password(password, self.bcrypt_cost).await
    }

    pub async fn verify_password(&self, password: &str, hash: &str) -> AppResult<bool> {
        password::verify_password(password, hash).await
    }

    pub fn issue_token(&self, user: &User) -> AppResult<String> {
        self.signer.issue(user)
    }

    pub fn verify_token(&self, token: &str) -> AppResult<Claims> {
        self.signer.verify(token)
    }
}

/// Creates the approved admin account unless a user with that name exists.
///
/// Returns `true` when an account was created.
pub async fn ensure_admin(
    repo: &dyn Repository,
    auth: &AuthService,
    username: &str,
    password: &str,
) -> AppResult<bool> {
    if repo.find_user_by_username(username).await?.is_some() {
        tracing::info!(username, "admin account already present");
        return Ok(false);
    }

    validate_username(username)?;
    validate_password(password)?;

    let hash = auth.hash_password(password).await?;
    let admin = repo
        .register_user(User::new(username, hash, true, true), None)
        .await?;
    tracing::info!(user_id = %admin.id, username, "bootstrap admin account created");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::InMemoryRepository;

    #[tokio::test]
    async fn ensure_admin_is_idempotent() {
        let repo = InMemoryRepository::new();
        let auth = AuthService::from_config(&AppConfig::for_tests());

        assert!(ensure_admin(&repo, &auth, "admin", "adminpass").await.unwrap());
        assert!(!ensure_admin(&repo, &auth, "admin", "adminpass").await.unwrap());

        let admin = repo.find_user_by_username("admin").await.unwrap().unwrap();
        assert!(admin.is_admin);
        assert!(admin.approved);
        assert!(auth.verify_password("adminpass", &admin.password_hash).await.unwrap());
    }
}
