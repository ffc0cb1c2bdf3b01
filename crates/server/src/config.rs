use std::{collections::HashMap, fs, time::Duration};

use device_client::{DeviceEndpoint, DEFAULT_TIMEOUT};
use thiserror::Error;
use translator::RingPolicy;

pub const DEFAULT_CONFIG_FILE: &str = "ufo.toml";

#[derive(Debug, Clone)]
pub struct Settings {
    pub ufo_address: DeviceEndpoint,
    pub bind_host: String,
    pub port: u16,
    pub timeout: Duration,
    pub ring_policy: RingPolicy,
    pub max_event_bytes: usize,
}

impl Settings {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.bind_host, self.port)
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),
    #[error("invalid value '{value}' for {key}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
    #[error("failed to parse settings file {path}: {source}")]
    File {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

pub fn load_settings() -> Result<Settings, ConfigError> {
    let path = std::env::var("UFO_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
    let file = fs::read_to_string(&path).ok();
    settings_from_sources(&path, file.as_deref(), |key| std::env::var(key).ok())
}

#[derive(Default)]
struct RawSettings {
    ufo_address: Option<String>,
    bind_host: Option<String>,
    port: Option<String>,
    timeout_secs: Option<String>,
    ring_policy: Option<String>,
    max_event_bytes: Option<String>,
}

pub(crate) fn settings_from_sources(
    path: &str,
    file: Option<&str>,
    env: impl Fn(&str) -> Option<String>,
) -> Result<Settings, ConfigError> {
    let mut raw = RawSettings::default();

    if let Some(contents) = file {
        let file_cfg = toml::from_str::<HashMap<String, toml::Value>>(contents).map_err(
            |source| ConfigError::File {
                path: path.to_string(),
                source,
            },
        )?;
        let get = |key: &str| {
            file_cfg.get(key).map(|value| match value {
                toml::Value::String(s) => s.clone(),
                other => other.to_string(),
            })
        };
        raw.ufo_address = get("ufo_address");
        raw.bind_host = get("bind_host");
        raw.port = get("port");
        raw.timeout_secs = get("timeout_secs");
        raw.ring_policy = get("ring_policy");
        raw.max_event_bytes = get("max_event_bytes");
    }

    // A blank UFO_ADDRESS still overrides the file and is rejected below.
    if let Some(v) = env("UFO_ADDRESS") {
        raw.ufo_address = Some(v);
    }
    let env = |key: &str| env(key).filter(|v| !v.trim().is_empty());
    if let Some(v) = env("BIND_HOST") {
        raw.bind_host = Some(v);
    }
    if let Some(v) = env("PORT") {
        raw.port = Some(v);
    }
    if let Some(v) = env("UFO_TIMEOUT_SECS") {
        raw.timeout_secs = Some(v);
    }
    if let Some(v) = env("UFO_RING_POLICY") {
        raw.ring_policy = Some(v);
    }
    if let Some(v) = env("MAX_EVENT_BYTES") {
        raw.max_event_bytes = Some(v);
    }

    let address = raw
        .ufo_address
        .filter(|v| !v.trim().is_empty())
        .ok_or(ConfigError::Missing("UFO_ADDRESS"))?;
    let ufo_address = DeviceEndpoint::parse(&address).map_err(|err| ConfigError::Invalid {
        key: "UFO_ADDRESS",
        value: address.clone(),
        reason: err.to_string(),
    })?;

    let port = parse_or("PORT", raw.port, 8080u16)?;
    let timeout_secs = parse_or(
        "UFO_TIMEOUT_SECS",
        raw.timeout_secs,
        DEFAULT_TIMEOUT.as_secs(),
    )?;
    if timeout_secs == 0 {
        return Err(ConfigError::Invalid {
            key: "UFO_TIMEOUT_SECS",
            value: "0".into(),
            reason: "timeout must be at least one second".into(),
        });
    }
    let ring_policy = parse_or("UFO_RING_POLICY", raw.ring_policy, RingPolicy::default())?;
    let max_event_bytes = parse_or("MAX_EVENT_BYTES", raw.max_event_bytes, 64 * 1024usize)?;

    Ok(Settings {
        ufo_address,
        bind_host: raw.bind_host.unwrap_or_else(|| "0.0.0.0".into()),
        port,
        timeout: Duration::from_secs(timeout_secs),
        ring_policy,
        max_event_bytes,
    })
}

fn parse_or<T>(key: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        None => Ok(default),
        Some(value) => value.trim().parse().map_err(|err: T::Err| ConfigError::Invalid {
            key,
            reason: err.to_string(),
            value,
        }),
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
