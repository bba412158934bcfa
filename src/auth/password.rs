use crate::core::{AppError, AppResult};

/// Hashes a password using bcrypt
///
/// Each hash includes a random salt, so the same password will produce
/// different hashes. Runs on the blocking pool.
pub async fn hash_password(password: &str, cost: u32) -> AppResult<String> {
    let password = password.to_string();
    tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await?
        .map_err(|err| AppError::internal(format!("failed to hash password: {err}")))
}

/// Verifies password against bcrypt hash
///
/// A malformed hash counts as a mismatch.
pub async fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
    let password = password.to_string();
    let hash = hash.to_string();
    let matched =
        tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash).unwrap_or(false))
            .await?;
    Ok(matched)
}

/// Validates username
pub fn validate_username(username: &str) -> AppResult<()> {
    if username.is_empty() {
        return Err(AppError::validation("username cannot be empty"));
    }

    if username.len() < 3 || username.len() > 32 {
        return Err(AppError::validation(
            "username must be between 3 and 32 characters",
        ));
    }

    let allowed = username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'));
    if !allowed {
        return Err(AppError::validation(
            "username may only contain letters, digits, '_', '.' and '-'",
        ));
    }

    Ok(())
}

/// Validates password complexity
///
/// Enforces the following rules:
/// - Minimum 8 characters
/// - Cannot be empty
pub fn validate_password(password: &str) -> AppResult<()> {
    if password.is_empty() {
        return Err(AppError::validation("password cannot be empty"));
    }

    if password.len() < 8 {
        return Err(AppError::validation(
            "password must be at least 8 characters long",
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn hash_and_verify() {
        let hash = hash_password("password123", 4).await.unwrap();
        assert!(verify_password("password123", &hash).await.unwrap());
        assert!(!verify_password("wrongpass", &hash).await.unwrap());
    }

    #[tokio::test]
    async fn same_password_hashes_differently() {
        let a = hash_password("password123", 4).await.unwrap();
        let b = hash_password("password123", 4).await.unwrap();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn malformed_hash_is_a_mismatch() {
        assert!(!verify_password("password123", "not-a-hash").await.unwrap());
    }

    #[test]
    fn test_validate_username() {
        assert!(validate_username("").is_err());
        assert!(validate_username("ab").is_err());
        assert!(validate_username(&"a".repeat(33)).is_err());
        assert!(validate_username("has space").is_err());
        assert!(validate_username("jet.setter_99").is_ok());
    }

    #[test]
    fn test_validate_password() {
        let err = validate_password("short").unwrap_err();
        assert!(err.to_string().contains("at least 8 characters"));

        let err = validate_password("").unwrap_err();
        assert!(err.to_string().contains("cannot be empty"));

        assert!(validate_password("validpass123").is_ok());
    }
}
