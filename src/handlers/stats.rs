use axum::{Json, extract::State};

use crate::{auth::AuthUser, core::AppResult, state::AppState, stats::TravelStats};

pub async fn get_stats(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> AppResult<Json<TravelStats>> {
    let flights = state.repo.list_flights(user.id).await?;
    let stays = state.repo.list_stays(user.id).await?;
    Ok(Json(TravelStats::compute(&flights, &stays)))
}
