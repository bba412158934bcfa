use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use uuid::Uuid;

use super::optional_text;
use crate::{
    auth::AuthUser,
    core::{AppError, AppResult},
    models::{Flight, FlightRequest, ListResponse},
    state::AppState,
};

pub async fn create_flight(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    payload: Result<Json<FlightRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<Flight>)> {
    let Json(payload) = payload?;
    let request = normalize_flight(payload)?;

    let flight = state
        .repo
        .insert_flight(Flight::from_request(Uuid::new_v4(), user.id, request))
        .await?;

    tracing::debug!(user_id = %user.id, flight_id = %flight.id, "flight logged");
    Ok((StatusCode::CREATED, Json(flight)))
}

pub async fn list_flights(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> AppResult<Json<ListResponse<Flight>>> {
    let flights = state.repo.list_flights(user.id).await?;
    Ok(Json(flights.into()))
}

pub async fn get_flight(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Flight>> {
    let flight = state
        .repo
        .get_flight(user.id, id)
        .await?
        .ok_or_else(|| AppError::not_found("flight not found"))?;
    Ok(Json(flight))
}

pub async fn replace_flight(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
    payload: Result<Json<FlightRequest>, JsonRejection>,
) -> AppResult<Json<Flight>> {
    let Json(payload) = payload?;
    let request = normalize_flight(payload)?;

    let flight = state
        .repo
        .replace_flight(user.id, id, request)
        .await?
        .ok_or_else(|| AppError::not_found("flight not found"))?;
    Ok(Json(flight))
}

pub async fn delete_flight(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    if !state.repo.delete_flight(user.id, id).await? {
        return Err(AppError::not_found("flight not found"));
    }
    Ok(StatusCode::NO_CONTENT)
}

fn airport_code(field: &str, value: &str) -> AppResult<String> {
    let code = value.trim();
    if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(AppError::validation(format!(
            "{field} must be a 3-letter IATA airport code"
        )));
    }
    Ok(code.to_ascii_uppercase())
}

fn normalize_flight(request: FlightRequest) -> AppResult<FlightRequest> {
    let origin = airport_code("origin", &request.origin)?;
    let destination = airport_code("destination", &request.destination)?;

    if let Some(distance) = request.distance_km {
        if !distance.is_finite() || distance < 0.0 {
            return Err(AppError::validation(
                "distanceKm must be a non-negative number",
            ));
        }
    }

    Ok(FlightRequest {
        flight_number: optional_text("flightNumber", request.flight_number, 16)?
            .map(|number| number.to_ascii_uppercase()),
        airline: optional_text("airline", request.airline, 100)?,
        origin,
        destination,
        departure_date: request.departure_date,
        distance_km: request.distance_km,
        seat: optional_text("seat", request.seat, 8)?,
        notes: optional_text("notes", request.notes, 2000)?,
    })
}
