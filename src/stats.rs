use serde::Serialize;
use std::collections::HashSet;

use crate::models::{Flight, Stay};

/// Aggregate travel totals for one user.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TravelStats {
    pub total_flights: usize,
    pub total_distance_km: f64,
    pub longest_flight_km: f64,
    pub unique_airports: usize,
    pub unique_airlines: usize,
    pub total_stays: usize,
    pub total_nights: i64,
    pub unique_cities: usize,
    pub unique_countries: usize,
}

impl TravelStats {
    pub fn compute(flights: &[Flight], stays: &[Stay]) -> Self {
        let mut airports = HashSet::new();
        let mut airlines = HashSet::new();
        let mut total_distance_km = 0.0;
        let mut longest_flight_km: f64 = 0.0;

        for flight in flights {
            airports.insert(flight.origin.to_ascii_uppercase());
            airports.insert(flight.destination.to_ascii_uppercase());
            if let Some(airline) = normalized(flight.airline.as_deref()) {
                airlines.insert(airline);
            }
            if let Some(distance) = flight.distance_km {
                total_distance_km += distance;
                longest_flight_km = longest_flight_km.max(distance);
            }
        }

        let mut cities = HashSet::new();
        let mut countries = HashSet::new();
        let mut total_nights = 0;

        for stay in stays {
            if let Some(city) = normalized(Some(stay.city.as_str())) {
                cities.insert(city);
            }
            if let Some(country) = normalized(stay.country.as_deref()) {
                countries.insert(country);
            }
            total_nights += stay.nights().max(0);
        }

        Self {
            total_flights: flights.len(),
            total_distance_km,
            longest_flight_km,
            unique_airports: airports.len(),
            unique_airlines: airlines.len(),
            total_stays: stays.len(),
            total_nights,
            unique_cities: cities.len(),
            unique_countries: countries.len(),
        }
    }
}

fn normalized(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_lowercase)
}
