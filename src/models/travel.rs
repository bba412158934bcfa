use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Flight {
    pub id: Uuid,
    pub user_id: Uuid,
    pub flight_number: Option<String>,
    pub airline: Option<String>,
    pub origin: String,
    pub destination: String,
    pub departure_date: NaiveDate,
    pub distance_km: Option<f64>,
    pub seat: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightRequest {
    #[serde(default)]
    pub flight_number: Option<String>,
    #[serde(default)]
    pub airline: Option<String>,
    pub origin: String,
    pub destination: String,
    pub departure_date: NaiveDate,
    #[serde(default)]
    pub distance_km: Option<f64>,
    #[serde(default)]
    pub seat: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl Flight {
    pub fn from_request(id: Uuid, user_id: Uuid, request: FlightRequest) -> Self {
        Self {
            id,
            user_id,
            flight_number: request.flight_number,
            airline: request.airline,
            origin: request.origin,
            destination: request.destination,
            departure_date: request.departure_date,
            distance_km: request.distance_km,
            seat: request.seat,
            notes: request.notes,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stay {
    pub id: Uuid,
    pub user_id: Uuid,
    pub hotel_name: String,
    pub city: String,
    pub country: Option<String>,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Stay {
    pub fn from_request(id: Uuid, user_id: Uuid, request: StayRequest) -> Self {
        Self {
            id,
            user_id,
            hotel_name: request.hotel_name,
            city: request.city,
            country: request.country,
            check_in: request.check_in,
            check_out: request.check_out,
            notes: request.notes,
            created_at: Utc::now(),
        }
    }

    pub fn nights(&self) -> i64 {
        (self.check_out - self.check_in).num_days()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StayRequest {
    pub hotel_name: String,
    pub city: String,
    #[serde(default)]
    pub country: Option<String>,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    #[serde(default)]
    pub notes: Option<String>,
}
