//! Proximity radar
//!
//! In-memory presence of recently active users and "who is near me" queries
//! over great-circle distance.

pub mod eviction;
pub mod geo;
pub mod registry;

pub use eviction::{EvictionPolicy, ManualSweep, SweepOnWrite, spawn_sweeper};
pub use geo::{Coordinates, EARTH_RADIUS_KM, haversine_km};
pub use registry::{LocationReport, NearbyPresence, PresenceRecord, PresenceRegistry, UserId};
