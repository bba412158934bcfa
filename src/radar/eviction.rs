use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::task::JoinHandle;

use super::registry::{PresenceRecord, PresenceRegistry, UserId};

/// Decides what happens to stale presence records when a location is written.
///
/// Called with the registry write lock held, right after the upsert, using the
/// same `now` the upsert stamped. Returns the number of records removed.
pub trait EvictionPolicy: Send + Sync {
    fn on_write(&self, records: &mut HashMap<UserId, PresenceRecord>, now: DateTime<Utc>)
    -> usize;
}

/// Sweeps the whole registry on every write.
#[derive(Debug, Clone, Copy)]
pub struct SweepOnWrite {
    ttl: Duration,
}

impl SweepOnWrite {
    pub fn new(ttl: Duration) -> Self {
        Self { ttl }
    }
}

impl EvictionPolicy for SweepOnWrite {
    fn on_write(
        &self,
        records: &mut HashMap<UserId, PresenceRecord>,
        now: DateTime<Utc>,
    ) -> usize {
        retain_live(records, now, self.ttl)
    }
}

/// Leaves writes alone; pair with [`spawn_sweeper`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ManualSweep;

impl EvictionPolicy for ManualSweep {
    fn on_write(
        &self,
        _records: &mut HashMap<UserId, PresenceRecord>,
        _now: DateTime<Utc>,
    ) -> usize {
        0
    }
}

/// Removes every record older than `ttl` at `now`. Returns how many were dropped.
pub fn retain_live(
    records: &mut HashMap<UserId, PresenceRecord>,
    now: DateTime<Utc>,
    ttl: Duration,
) -> usize {
    let before = records.len();
    records.retain(|_, record| record.is_live(now, ttl));
    before - records.len()
}

/// Runs [`PresenceRegistry::sweep_expired`] on a fixed interval until the
/// returned handle is aborted.
pub fn spawn_sweeper(
    registry: Arc<PresenceRegistry>,
    interval: std::time::Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            let removed = registry.sweep_expired(Utc::now()).await;
            if removed > 0 {
                tracing::debug!(removed, "timer sweep evicted stale presence records");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::radar::{Coordinates, LocationReport};
    use uuid::Uuid;

    fn report(user_id: UserId, lat: f64, lng: f64) -> LocationReport {
        LocationReport {
            user_id,
            display_name: "traveller".to_string(),
            coordinates: Coordinates::new(lat, lng).unwrap(),
            profile_icon: None,
        }
    }

    #[tokio::test]
    async fn manual_sweep_keeps_stale_records_on_write() {
        let registry = PresenceRegistry::with_policy(Duration::minutes(2), ManualSweep);
        let stale = Uuid::new_v4();

        registry
            .report_at(report(stale, 1.0, 1.0), Utc::now() - Duration::minutes(3))
            .await;
        registry.report(report(Uuid::new_v4(), 2.0, 2.0)).await;

        assert!(registry.get(stale).await.is_some());
        assert_eq!(registry.len().await, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn sweeper_evicts_stale_records_on_its_timer() {
        let registry = Arc::new(PresenceRegistry::with_policy(Duration::minutes(2), ManualSweep));
        let stale = Uuid::new_v4();
        let fresh = Uuid::new_v4();

        registry
            .report_at(report(stale, 1.0, 1.0), Utc::now() - Duration::minutes(3))
            .await;
        registry.report(report(fresh, 2.0, 2.0)).await;

        let sweeper = spawn_sweeper(Arc::clone(&registry), std::time::Duration::from_secs(1));
        tokio::time::sleep(std::time::Duration::from_millis(1500)).await;

        assert!(registry.get(stale).await.is_none());
        assert!(registry.get(fresh).await.is_some());
        assert_eq!(registry.len().await, 1);

        sweeper.abort();
    }

    #[test]
    fn retain_live_counts_removed_records() {
        let now = Utc::now();
        let mut records = HashMap::new();
        for age in [0, 60, 121, 500] {
            let id = Uuid::new_v4();
            records.insert(
                id,
                PresenceRecord {
                    user_id: id,
                    display_name: "u".to_string(),
                    lat: 0.0,
                    lng: 0.0,
                    last_seen: now - Duration::seconds(age),
                    profile_icon: None,
                },
            );
        }

        assert_eq!(retain_live(&mut records, now, Duration::minutes(2)), 2);
        assert_eq!(records.len(), 2);
    }
}
