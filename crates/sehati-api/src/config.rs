use std::env;
use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

use tracing::{info, warn};

use sehati_push::payload::PushDefaults;

/// Used only when `SEHATI_SESSION_SECRET` is unset. Tokens signed with it
/// are worthless outside a developer machine.
const DEV_SESSION_SECRET: &str = "sehati-dev-secret-change-me";

/// Service configuration, read once from the environment at startup.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    /// Hosted record store base URL. `None` selects the in-memory store.
    pub store_url: Option<String>,
    pub store_key: String,
    pub session_secret: String,
    pub session_ttl: Duration,
    /// Push relay endpoint. `None` disables delivery.
    pub push_relay_url: Option<String>,
    pub push_defaults: PushDefaults,
    /// `(username, password)` of an admin to create when missing.
    pub bootstrap_admin: Option<(String, String)>,
}

impl ServerConfig {
    pub fn from_env() -> eyre::Result<Self> {
        let ttl_minutes: u64 = try_load("SEHATI_SESSION_TTL_MINUTES", "60")?;
        if ttl_minutes == 0 {
            return Err(eyre::eyre!("SEHATI_SESSION_TTL_MINUTES must be positive"));
        }

        let session_secret = optional("SEHATI_SESSION_SECRET").unwrap_or_else(|| {
            warn!("SEHATI_SESSION_SECRET not set, using the development secret");
            DEV_SESSION_SECRET.to_string()
        });

        let defaults = PushDefaults::default();
        let push_defaults = PushDefaults {
            url: optional("SEHATI_PUSH_URL").unwrap_or(defaults.url),
            icon: optional("SEHATI_PUSH_ICON").unwrap_or(defaults.icon),
            badge: optional("SEHATI_PUSH_BADGE").unwrap_or(defaults.badge),
            vibrate: defaults.vibrate,
        };

        let bootstrap_admin = optional("SEHATI_BOOTSTRAP_ADMIN")
            .map(|raw| parse_credentials(&raw))
            .transpose()?;

        Ok(Self {
            port: try_load("SEHATI_PORT", "8080")?,
            store_url: optional("SEHATI_STORE_URL"),
            store_key: optional("SEHATI_STORE_KEY").unwrap_or_default(),
            session_secret,
            session_ttl: Duration::from_secs(ttl_minutes * 60),
            push_relay_url: optional("SEHATI_PUSH_RELAY_URL"),
            push_defaults,
            bootstrap_admin,
        })
    }
}

/// Split `username:password`. The password may itself contain colons.
pub fn parse_credentials(raw: &str) -> eyre::Result<(String, String)> {
    match raw.split_once(':') {
        Some((user, pass)) if !user.is_empty() && !pass.is_empty() => {
            Ok((user.to_string(), pass.to_string()))
        }
        _ => Err(eyre::eyre!(
            "SEHATI_BOOTSTRAP_ADMIN must look like username:password"
        )),
    }
}

fn optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn try_load<T: FromStr>(key: &str, default: &str) -> eyre::Result<T>
where
    T::Err: Display,
{
    let raw = optional(key).unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });
    raw.parse()
        .map_err(|e| eyre::eyre!("invalid {key} value {raw:?}: {e}"))
}
