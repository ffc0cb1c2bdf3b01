use std::fmt;

use shared::domain::{Animation, Command};

use crate::error::DeviceError;

/// LED count for solid and morph patterns.
const SOLID_COUNT: u8 = 15;
/// LED count for the whirl pattern.
const WHIRL_COUNT: u8 = 1;
const MORPH_PARAMS: &str = "30|10";
const WHIRL_SPEED: u16 = 240;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceEndpoint(String);

impl DeviceEndpoint {
    pub fn parse(raw: &str) -> Result<Self, DeviceError> {
        let host = raw.trim();
        let host = host.strip_prefix("http://").unwrap_or(host);
        let host = host.trim_end_matches('/');
        if host.is_empty()
            || host.contains(['/', '?', '#'])
            || host.contains(char::is_whitespace)
        {
            return Err(DeviceError::InvalidEndpoint(raw.to_string()));
        }
        Ok(Self(host.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn init_url(&self) -> String {
        format!("http://{}/api?top_init&bottom_init", self.0)
    }

    pub fn command_url(&self, command: &Command) -> String {
        let ring = command.ring.as_str();
        let color = command.color;
        let prefix = format!("http://{}/api?{ring}_init&{ring}=0", self.0);
        match command.animation {
            Animation::Solid => format!("{prefix}|{SOLID_COUNT}|{color}"),
            Animation::Morph => {
                format!("{prefix}|{SOLID_COUNT}|{color}&{ring}_morph={MORPH_PARAMS}")
            }
            Animation::Whirl => {
                format!("{prefix}|{WHIRL_COUNT}|{color}&{ring}_whirl={WHIRL_SPEED}")
            }
        }
    }
}

impl fmt::Display for DeviceEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
