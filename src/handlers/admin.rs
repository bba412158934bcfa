use axum::{
    Json,
    extract::{Path, Query, State, rejection::QueryRejection},
    http::StatusCode,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    auth::AdminUser,
    core::{AppError, AppResult},
    models::{ContactMessage, InviteCode, ListResponse, PublicUser, UserStatusFilter},
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct ListUsersQuery {
    #[serde(default)]
    pub status: Option<UserStatusFilter>,
}

pub async fn create_invite(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
) -> AppResult<(StatusCode, Json<InviteCode>)> {
    let invite = state.repo.insert_invite(InviteCode::new(admin.id)).await?;
    tracing::info!(code = %invite.code, created_by = %admin.id, "invite code created");
    Ok((StatusCode::CREATED, Json(invite)))
}

pub async fn list_invites(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
) -> AppResult<Json<ListResponse<InviteCode>>> {
    let invites = state.repo.list_invites().await?;
    Ok(Json(invites.into()))
}

pub async fn revoke_invite(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    Path(code): Path<String>,
) -> AppResult<StatusCode> {
    state
        .repo
        .revoke_invite(&code.trim().to_ascii_uppercase())
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_users(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    query: Result<Query<ListUsersQuery>, QueryRejection>,
) -> AppResult<Json<ListResponse<PublicUser>>> {
    let Query(query) = query?;
    let users = state.repo.list_users(query.status).await?;
    let users: Vec<PublicUser> = users.iter().map(PublicUser::from).collect();
    Ok(Json(users.into()))
}

pub async fn approve_user(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<PublicUser>> {
    let user = state
        .repo
        .approve_user(id)
        .await?
        .ok_or_else(|| AppError::not_found("user not found"))?;

    tracing::info!(user_id = %user.id, approved_by = %admin.id, "user approved");
    Ok(Json(PublicUser::from(&user)))
}

pub async fn delete_user(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    let user = state
        .repo
        .find_user(id)
        .await?
        .ok_or_else(|| AppError::not_found("user not found"))?;

    if user.is_admin {
        return Err(AppError::conflict("admin accounts cannot be deleted"));
    }

    state.repo.delete_user(id).await?;
    state.radar.remove(id).await;

    tracing::info!(user_id = %id, deleted_by = %admin.id, "user deleted");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_messages(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
) -> AppResult<Json<ListResponse<ContactMessage>>> {
    let messages = state.repo.list_messages().await?;
    Ok(Json(messages.into()))
}
