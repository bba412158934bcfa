use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::eviction::{EvictionPolicy, SweepOnWrite, retain_live};
use super::geo::Coordinates;

pub type UserId = Uuid;

/// Latest known location of one user. Held only in memory.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PresenceRecord {
    pub user_id: UserId,
    #[serde(rename = "username")]
    pub display_name: String,
    pub lat: f64,
    pub lng: f64,
    pub last_seen: DateTime<Utc>,
    pub profile_icon: Option<String>,
}

impl PresenceRecord {
    pub fn coordinates(&self) -> Coordinates {
        Coordinates {
            lat: self.lat,
            lng: self.lng,
        }
    }

    /// Live while `now - last_seen <= ttl`.
    pub fn is_live(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        now.signed_duration_since(self.last_seen) <= ttl
    }
}

/// A presence record returned by a proximity query, with its distance from
/// the query origin in kilometres.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NearbyPresence {
    #[serde(flatten)]
    pub record: PresenceRecord,
    pub distance: f64,
}

/// One location report from an authenticated user.
#[derive(Debug, Clone)]
pub struct LocationReport {
    pub user_id: UserId,
    pub display_name: String,
    pub coordinates: Coordinates,
    pub profile_icon: Option<String>,
}

/// Shared registry of user presence.
///
/// Writes (upsert followed by the eviction policy) run under a single write
/// lock; queries copy the candidates out under the read lock and compute
/// distances after releasing it.
pub struct PresenceRegistry {
    records: RwLock<HashMap<UserId, PresenceRecord>>,
    ttl: Duration,
    eviction: Box<dyn EvictionPolicy>,
}

impl PresenceRegistry {
    /// Registry that sweeps stale records on every report.
    pub fn new(ttl: Duration) -> Self {
        Self::with_policy(ttl, SweepOnWrite::new(ttl))
    }

    pub fn with_policy(ttl: Duration, eviction: impl EvictionPolicy + 'static) -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
            ttl,
            eviction: Box::new(eviction),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Upserts the reporter's presence stamped with the current time.
    pub async fn report(&self, report: LocationReport) -> PresenceRecord {
        self.report_at(report, Utc::now()).await
    }

    /// Upserts the reporter's presence stamped with `now`, then applies the
    /// eviction policy with the same `now`.
    pub async fn report_at(&self, report: LocationReport, now: DateTime<Utc>) -> PresenceRecord {
        let record = PresenceRecord {
            user_id: report.user_id,
            display_name: report.display_name,
            lat: report.coordinates.lat,
            lng: report.coordinates.lng,
            last_seen: now,
            profile_icon: report.profile_icon,
        };

        let (evicted, live) = {
            let mut records = self.records.write().await;
            records.insert(record.user_id, record.clone());
            let evicted = self.eviction.on_write(&mut records, now);
            (evicted, records.len())
        };

        tracing::debug!(
            user_id = %record.user_id,
            evicted,
            live,
            "presence updated"
        );

        record
    }

    /// Every record other than the requester's within `radius_km` of `origin`
    /// (inclusive). Order is unspecified.
    ///
    /// Records past their TTL that no sweep has removed yet are still
    /// returned.
    pub async fn nearby(
        &self,
        requester: UserId,
        origin: Coordinates,
        radius_km: f64,
    ) -> Vec<NearbyPresence> {
        let candidates: Vec<PresenceRecord> = {
            let records = self.records.read().await;
            records
                .values()
                .filter(|record| record.user_id != requester)
                .cloned()
                .collect()
        };

        candidates
            .into_iter()
            .filter_map(|record| {
                let distance = origin.distance_km(&record.coordinates());
                (distance <= radius_km).then_some(NearbyPresence { record, distance })
            })
            .collect()
    }

    /// Removes every record past the TTL at `now`.
    pub async fn sweep_expired(&self, now: DateTime<Utc>) -> usize {
        let mut records = self.records.write().await;
        retain_live(&mut records, now, self.ttl)
    }

    pub async fn remove(&self, user_id: UserId) -> Option<PresenceRecord> {
        self.records.write().await.remove(&user_id)
    }

    pub async fn get(&self, user_id: UserId) -> Option<PresenceRecord> {
        self.records.read().await.get(&user_id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}
