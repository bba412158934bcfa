// ============================================================================
// Tripline
// ============================================================================
//
// Travel logging backend: accounts, flights, hotel stays, travel statistics,
// admin invite/approval workflow and a proximity radar of nearby travellers.

pub mod app;
pub mod auth;
pub mod config;
pub mod core;
pub mod handlers;
pub mod models;
pub mod radar;
pub mod state;
pub mod stats;
pub mod storage;

pub use app::build_router;
pub use config::{AppConfig, RadarConfig};
pub use crate::core::{AppError, AppResult};
pub use radar::{Coordinates, NearbyPresence, PresenceRecord, PresenceRegistry, haversine_km};
pub use state::AppState;
pub use storage::{InMemoryRepository, Repository};
