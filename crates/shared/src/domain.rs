use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::CommandError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ring {
    Top,
    Bottom,
}

impl Ring {
    pub fn as_str(self) -> &'static str {
        match self {
            Ring::Top => "top",
            Ring::Bottom => "bottom",
        }
    }
}

impl fmt::Display for Ring {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Ring {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            v if v.eq_ignore_ascii_case("top") => Ok(Ring::Top),
            v if v.eq_ignore_ascii_case("bottom") => Ok(Ring::Bottom),
            other => Err(CommandError::InvalidRing(other.to_string())),
        }
    }
}

/// Renders as six lowercase hex digits without a `#`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color(pub [u8; 3]);

impl Color {
    pub const BLUE: Color = Color([0x00, 0x00, 0xff]);
    pub const PURPLE: Color = Color([0x80, 0x00, 0x80]);
    pub const GREEN: Color = Color([0x00, 0xff, 0x00]);
    pub const RED: Color = Color([0xff, 0x00, 0x00]);
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b] = self.0;
        write!(f, "{r:02x}{g:02x}{b:02x}")
    }
}

impl FromStr for Color {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.trim().trim_start_matches('#');
        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(CommandError::InvalidColor(s.to_string()));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16)
                .map_err(|_| CommandError::InvalidColor(s.to_string()))
        };
        Ok(Color([channel(0..2)?, channel(2..4)?, channel(4..6)?]))
    }
}

impl Serialize for Color {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Animation {
    #[default]
    Solid,
    Morph,
    Whirl,
}

impl Animation {
    pub fn from_flags(morph: bool, whirl: bool) -> Result<Self, CommandError> {
        match (morph, whirl) {
            (true, true) => Err(CommandError::AnimationConflict),
            (true, false) => Ok(Animation::Morph),
            (false, true) => Ok(Animation::Whirl),
            (false, false) => Ok(Animation::Solid),
        }
    }

    pub fn morph(self) -> bool {
        matches!(self, Animation::Morph)
    }

    pub fn whirl(self) -> bool {
        matches!(self, Animation::Whirl)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Command {
    pub ring: Ring,
    pub color: Color,
    pub animation: Animation,
}

impl Command {
    pub fn new(ring: Ring, color: Color, animation: Animation) -> Self {
        Self {
            ring,
            color,
            animation,
        }
    }

    pub fn solid(ring: Ring, color: Color) -> Self {
        Self::new(ring, color, Animation::Solid)
    }

    pub fn morph(ring: Ring, color: Color) -> Self {
        Self::new(ring, color, Animation::Morph)
    }

    pub fn whirl(ring: Ring, color: Color) -> Self {
        Self::new(ring, color, Animation::Whirl)
    }

    pub fn from_flags(
        ring: Ring,
        color: Color,
        morph: bool,
        whirl: bool,
    ) -> Result<Self, CommandError> {
        Ok(Self::new(ring, color, Animation::from_flags(morph, whirl)?))
    }
}
