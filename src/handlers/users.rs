use axum::{Json, extract::State, extract::rejection::JsonRejection};

use super::optional_text;
use crate::{
    auth::AuthUser,
    core::{AppError, AppResult},
    models::{PublicUser, UpdateProfileRequest},
    state::AppState,
};

const MAX_PROFILE_ICON_LEN: usize = 64;

pub async fn update_profile(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    payload: Result<Json<UpdateProfileRequest>, JsonRejection>,
) -> AppResult<Json<PublicUser>> {
    let Json(payload) = payload?;
    let icon = optional_text("profileIcon", payload.profile_icon, MAX_PROFILE_ICON_LEN)?;

    let updated = state
        .repo
        .update_profile_icon(user.id, icon)
        .await?
        .ok_or_else(|| AppError::not_found("user not found"))?;

    Ok(Json(PublicUser::from(&updated)))
}
