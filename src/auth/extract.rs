use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use crate::core::AppError;
use crate::models::User;
use crate::state::AppState;

/// The caller resolved from a `Authorization: Bearer <token>` header.
///
/// The account is reloaded on every request, so deleted or unapproved users
/// are rejected even while their token is still valid.
#[derive(Debug, Clone)]
pub struct AuthUser(pub User);

/// An [`AuthUser`] holding admin rights.
#[derive(Debug, Clone)]
pub struct AdminUser(pub User);

fn bearer_token(parts: &Parts) -> Result<&str, AppError> {
    let header = parts
        .headers
        .get(AUTHORIZATION)
        .ok_or_else(|| AppError::unauthorized("missing bearer token"))?;
    let value = header
        .to_str()
        .map_err(|_| AppError::unauthorized("malformed authorization header"))?;

    let (scheme, token) = value
        .split_once(' ')
        .ok_or_else(|| AppError::unauthorized("malformed authorization header"))?;
    if !scheme.eq_ignore_ascii_case("bearer") || token.trim().is_empty() {
        return Err(AppError::unauthorized("malformed authorization header"));
    }

    Ok(token.trim())
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;
        let claims = state.auth.verify_token(token)?;

        let user = state
            .repo
            .find_user(claims.sub)
            .await?
            .ok_or_else(|| AppError::unauthorized("account no longer exists"))?;

        if !user.approved {
            return Err(AppError::forbidden("account is pending approval"));
        }

        Ok(Self(user))
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let AuthUser(user) = AuthUser::from_request_parts(parts, state).await?;
        if !user.is_admin {
            return Err(AppError::forbidden("admin rights required"));
        }
        Ok(Self(user))
    }
}
