use anyhow::{Context, Result, bail};
use std::env;
use std::str::FromStr;
use std::time::Duration;

const DEFAULT_TOKEN_SECRET: &str = "tripline-dev-secret";

/// Application configuration
///
/// Loaded from the process environment (and a `.env` file when present).
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Bind host
    pub host: String,

    /// Bind port
    pub port: u16,

    /// HMAC key used to sign bearer tokens
    pub token_secret: String,

    /// Bearer token lifetime
    pub token_ttl: Duration,

    /// bcrypt cost factor for password hashing
    pub bcrypt_cost: u32,

    /// Bootstrap admin credentials, created at startup when both are set
    pub admin_username: Option<String>,
    pub admin_password: Option<String>,

    /// Proximity radar settings
    pub radar: RadarConfig,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RadarConfig {
    /// Radius of the proximity query in kilometres
    pub radius_km: f64,

    /// Age after which a presence record is stale
    pub ttl: Duration,

    /// When set, stale records are swept on a timer instead of on every report
    pub sweep_interval: Option<Duration>,
}

impl Default for RadarConfig {
    fn default() -> Self {
        Self {
            radius_km: 10.0,
            ttl: Duration::from_secs(120),
            sweep_interval: None,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let host = env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = parse_var("APP_PORT", 8080u16)?;

        let token_secret = match env::var("TOKEN_SECRET") {
            Ok(secret) if !secret.is_empty() => secret,
            _ => {
                tracing::warn!("TOKEN_SECRET is not set, using the development secret");
                DEFAULT_TOKEN_SECRET.to_string()
            }
        };
        let token_ttl_hours = parse_var("TOKEN_TTL_HOURS", 168u64)?;
        if token_ttl_hours == 0 {
            bail!("TOKEN_TTL_HOURS must be greater than zero");
        }
        let token_ttl_secs = token_ttl_hours
            .checked_mul(3600)
            .context("TOKEN_TTL_HOURS is too large")?;

        let bcrypt_cost = parse_var("BCRYPT_COST", bcrypt::DEFAULT_COST)?;
        if !(4..=31).contains(&bcrypt_cost) {
            bail!("BCRYPT_COST must be between 4 and 31");
        }

        let admin_username = non_empty_var("ADMIN_USERNAME");
        let admin_password = non_empty_var("ADMIN_PASSWORD");

        let radius_km = parse_var("RADAR_RADIUS_KM", 10.0f64)?;
        if !radius_km.is_finite() || radius_km < 0.0 {
            bail!("RADAR_RADIUS_KM must be a non-negative number");
        }
        let ttl_secs = parse_var("RADAR_TTL_SECS", 120u64)?;
        let sweep_interval = match non_empty_var("RADAR_SWEEP_INTERVAL_SECS") {
            Some(raw) => {
                let secs = raw
                    .parse::<u64>()
                    .context("RADAR_SWEEP_INTERVAL_SECS must be a valid u64")?;
                if secs == 0 {
                    bail!("RADAR_SWEEP_INTERVAL_SECS must be greater than zero");
                }
                Some(Duration::from_secs(secs))
            }
            None => None,
        };

        Ok(Self {
            host,
            port,
            token_secret,
            token_ttl: Duration::from_secs(token_ttl_secs),
            bcrypt_cost,
            admin_username,
            admin_password,
            radar: RadarConfig {
                radius_km,
                ttl: Duration::from_secs(ttl_secs),
                sweep_interval,
            },
        })
    }

    /// Configuration with a fixed secret and the cheapest bcrypt cost
    pub fn for_tests() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 0,
            token_secret: "test-secret".to_string(),
            token_ttl: Duration::from_secs(3600),
            bcrypt_cost: 4,
            admin_username: None,
            admin_password: None,
            radar: RadarConfig::default(),
        }
    }

    /// Set the host
    pub fn host(mut self, host: &str) -> Self {
        self.host = host.to_string();
        self
    }

    /// Set the port
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the bootstrap admin credentials
    pub fn admin(mut self, username: &str, password: &str) -> Self {
        self.admin_username = Some(username.to_string());
        self.admin_password = Some(password.to_string());
        self
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

fn parse_var<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match non_empty_var(name) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{name} has an invalid value: {raw}")),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn builder_overrides_fields() {
        let config = AppConfig::for_tests()
            .host("10.0.0.1")
            .port(9000)
            .admin("root", "rootpass123");

        assert_eq!(config.address(), "10.0.0.1:9000");
        assert_eq!(config.admin_username.as_deref(), Some("root"));
        assert_eq!(config.admin_password.as_deref(), Some("rootpass123"));
    }

    const VARS: &[&str] = &[
        "APP_HOST",
        "APP_PORT",
        "TOKEN_SECRET",
        "TOKEN_TTL_HOURS",
        "BCRYPT_COST",
        "ADMIN_USERNAME",
        "ADMIN_PASSWORD",
        "RADAR_RADIUS_KM",
        "RADAR_TTL_SECS",
        "RADAR_SWEEP_INTERVAL_SECS",
    ];

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    /// Runs `f` with only `vars` set among the configuration variables, then
    /// restores the previous environment.
    fn with_env<T>(vars: &[(&str, &str)], f: impl FnOnce() -> T) -> T {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let saved: Vec<(&str, Option<String>)> =
            VARS.iter().map(|name| (*name, env::var(name).ok())).collect();

        // SAFETY: every test that touches the environment holds ENV_LOCK.
        unsafe {
            for name in VARS {
                env::remove_var(name);
            }
            for (name, value) in vars {
                env::set_var(name, value);
            }
        }

        let result = f();

        unsafe {
            for (name, value) in &saved {
                match value {
                    Some(value) => env::set_var(name, value),
                    None => env::remove_var(name),
                }
            }
        }

        result
    }

    #[test]
    fn from_env_uses_defaults_when_unset() {
        let config = with_env(&[], AppConfig::from_env).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.token_ttl, Duration::from_secs(168 * 3600));
        assert_eq!(config.radar, RadarConfig::default());
        assert!(config.admin_username.is_none());
    }

    #[test]
    fn from_env_reads_radar_overrides() {
        let config = with_env(
            &[
                ("RADAR_TTL_SECS", "300"),
                ("RADAR_RADIUS_KM", "25.5"),
                ("RADAR_SWEEP_INTERVAL_SECS", "15"),
            ],
            AppConfig::from_env,
        )
        .unwrap();

        assert_eq!(config.radar.ttl, Duration::from_secs(300));
        assert_eq!(config.radar.radius_km, 25.5);
        assert_eq!(config.radar.sweep_interval, Some(Duration::from_secs(15)));
    }

    #[test]
    fn from_env_rejects_invalid_values() {
        let cases: &[(&str, &str)] = &[
            ("RADAR_RADIUS_KM", "-1"),
            ("RADAR_SWEEP_INTERVAL_SECS", "0"),
            ("BCRYPT_COST", "3"),
            ("APP_PORT", "eighty"),
            ("TOKEN_TTL_HOURS", "0"),
        ];

        for &(name, value) in cases {
            let result = with_env(&[(name, value)], AppConfig::from_env);
            assert!(result.is_err(), "{name}={value} should be rejected");
        }
    }

    #[test]
    fn huge_token_ttl_is_an_error_not_an_overflow() {
        let result = with_env(&[("TOKEN_TTL_HOURS", "6000000000000000")], AppConfig::from_env);
        let err = result.unwrap_err();
        assert!(err.to_string().contains("TOKEN_TTL_HOURS"));
    }

    #[test]
    fn radar_defaults_match_presence_contract() {
        let radar = RadarConfig::default();
        assert_eq!(radar.radius_km, 10.0);
        assert_eq!(radar.ttl, Duration::from_secs(120));
        assert!(radar.sweep_interval.is_none());
    }
}
