use std::sync::Arc;

use crate::auth::AuthService;
use crate::config::AppConfig;
use crate::core::{AppError, AppResult};
use crate::radar::{ManualSweep, PresenceRegistry};
use crate::storage::Repository;

#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<dyn Repository>,
    pub auth: Arc<AuthService>,
    pub radar: Arc<PresenceRegistry>,
    pub radar_radius_km: f64,
}

impl AppState {
    pub fn new(
        repo: Arc<dyn Repository>,
        auth: Arc<AuthService>,
        radar: Arc<PresenceRegistry>,
        radar_radius_km: f64,
    ) -> Self {
        Self {
            repo,
            auth,
            radar,
            radar_radius_km,
        }
    }

    /// Wires the auth service and presence registry described by `config`.
    ///
    /// With a sweep interval configured the registry does not evict on write;
    /// the caller is expected to start [`crate::radar::spawn_sweeper`].
    pub fn from_config(config: &AppConfig, repo: Arc<dyn Repository>) -> AppResult<Self> {
        let ttl = chrono::Duration::from_std(config.radar.ttl)
            .map_err(|_| AppError::internal("radar ttl is out of range"))?;

        let registry = match config.radar.sweep_interval {
            Some(_) => PresenceRegistry::with_policy(ttl, ManualSweep),
            None => PresenceRegistry::new(ttl),
        };

        Ok(Self::new(
            repo,
            Arc::new(AuthService::from_config(config)),
            Arc::new(registry),
            config.radar.radius_km,
        ))
    }
}
