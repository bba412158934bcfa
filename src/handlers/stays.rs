use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use uuid::Uuid;

use super::{optional_text, required_text};
use crate::{
    auth::AuthUser,
    core::{AppError, AppResult},
    models::{ListResponse, Stay, StayRequest},
    state::AppState,
};

pub async fn create_stay(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    payload: Result<Json<StayRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<Stay>)> {
    let Json(payload) = payload?;
    let request = normalize_stay(payload)?;

    let stay = state
        .repo
        .insert_stay(Stay::from_request(Uuid::new_v4(), user.id, request))
        .await?;

    tracing::debug!(user_id = %user.id, stay_id = %stay.id, nights = stay.nights(), "stay logged");
    Ok((StatusCode::CREATED, Json(stay)))
}

pub async fn list_stays(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> AppResult<Json<ListResponse<Stay>>> {
    let stays = state.repo.list_stays(user.id).await?;
    Ok(Json(stays.into()))
}

pub async fn get_stay(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Stay>> {
    let stay = state
        .repo
        .get_stay(user.id, id)
        .await?
        .ok_or_else(|| AppError::not_found("stay not found"))?;
    Ok(Json(stay))
}

pub async fn replace_stay(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
    payload: Result<Json<StayRequest>, JsonRejection>,
) -> AppResult<Json<Stay>> {
    let Json(payload) = payload?;
    let request = normalize_stay(payload)?;

    let stay = state
        .repo
        .replace_stay(user.id, id, request)
        .await?
        .ok_or_else(|| AppError::not_found("stay not found"))?;
    Ok(Json(stay))
}

pub async fn delete_stay(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    if !state.repo.delete_stay(user.id, id).await? {
        return Err(AppError::not_found("stay not found"));
    }
    Ok(StatusCode::NO_CONTENT)
}

fn normalize_stay(request: StayRequest) -> AppResult<StayRequest> {
    if request.check_out < request.check_in {
        return Err(AppError::validation("checkOut must not be before checkIn"));
    }

    Ok(StayRequest {
        hotel_name: required_text("hotelName", &request.hotel_name, 200)?,
        city: required_text("city", &request.city, 100)?,
        country: optional_text("country", request.country, 100)?,
        check_in: request.check_in,
        check_out: request.check_out,
        notes: optional_text("notes", request.notes, 2000)?,
    })
}
