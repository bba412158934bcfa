use axum::{
    Json,
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
};
use serde::{Deserialize, Serialize};

use crate::{
    auth::AuthUser,
    core::AppResult,
    models::User,
    radar::{Coordinates, LocationReport, NearbyPresence},
    state::AppState,
};

/// Body of a location report and query string of a nearby lookup.
#[derive(Debug, Deserialize)]
pub struct LocationParams {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct UpdateAck {
    pub ok: bool,
}

#[derive(Debug, Serialize)]
pub struct NearbyResponse {
    pub nearby: Vec<NearbyPresence>,
}

pub async fn update_location(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    payload: Result<Json<LocationParams>, JsonRejection>,
) -> AppResult<Json<UpdateAck>> {
    let Json(payload) = payload?;
    let coordinates = Coordinates::from_parts(payload.lat, payload.lng)?;

    record_presence(&state, user, coordinates).await?;
    Ok(Json(UpdateAck { ok: true }))
}

/// Upserts the user's presence, then drops it again if the account was
/// deleted while the report was in flight.
async fn record_presence(state: &AppState, user: User, coordinates: Coordinates) -> AppResult<()> {
    let user_id = user.id;
    state
        .radar
        .report(LocationReport {
            user_id,
            display_name: user.username,
            coordinates,
            profile_icon: user.profile_icon,
        })
        .await;

    if state.repo.find_user(user_id).await?.is_none() {
        state.radar.remove(user_id).await;
        tracing::debug!(%user_id, "dropped presence of deleted user");
    }
    Ok(())
}

pub async fn nearby(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    query: Result<Query<LocationParams>, QueryRejection>,
) -> AppResult<Json<NearbyResponse>> {
    let Query(query) = query?;
    let origin = Coordinates::from_parts(query.lat, query.lng)?;

    let nearby = state
        .radar
        .nearby(user.id, origin, state.radar_radius_km)
        .await;

    tracing::debug!(user_id = %user.id, nearby = nearby.len(), "nearby query");
    Ok(Json(NearbyResponse { nearby }))
}
