use axum::{Json, extract::State, extract::rejection::JsonRejection, http::StatusCode};

use crate::{
    auth::{AuthUser, validate_password, validate_username},
    core::{AppError, AppResult},
    models::{
        LoginRequest, LoginResponse, PublicUser, RegisterRequest, RegisterResponse, User,
    },
    state::AppState,
};

pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<RegisterResponse>)> {
    let Json(payload) = payload?;

    let username = payload.username.trim();
    validate_username(username)?;
    validate_password(&payload.password)?;

    let invite_code = payload
        .invite_code
        .as_deref()
        .map(str::trim)
        .filter(|code| !code.is_empty())
        .map(str::to_ascii_uppercase);

    let hash = state.auth.hash_password(&payload.password).await?;
    let user = state
        .repo
        .register_user(User::new(username, hash, false, false), invite_code.as_deref())
        .await?;

    let token = if user.approved {
        Some(state.auth.issue_token(&user)?)
    } else {
        None
    };

    tracing::info!(
        user_id = %user.id,
        username = %user.username,
        approved = user.approved,
        "user registered"
    );

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            user: PublicUser::from(&user),
            token,
        }),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> AppResult<Json<LoginResponse>> {
    let Json(payload) = payload?;

    let user = state
        .repo
        .find_user_by_username(payload.username.trim())
        .await?
        .ok_or_else(|| AppError::unauthorized("invalid username or password"))?;

    if !state
        .auth
        .verify_password(&payload.password, &user.password_hash)
        .await?
    {
        tracing::debug!(username = %user.username, "login rejected");
        return Err(AppError::unauthorized("invalid username or password"));
    }

    if !user.approved {
        return Err(AppError::forbidden("account is pending approval"));
    }

    let token = state.auth.issue_token(&user)?;
    Ok(Json(LoginResponse {
        token,
        user: PublicUser::from(&user),
    }))
}

pub async fn me(AuthUser(user): AuthUser) -> Json<PublicUser> {
    Json(PublicUser::from(&user))
}
