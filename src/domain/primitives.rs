//! Domain primitives: entity ids and the elapsed-game-time stamp.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

macro_rules! uuid_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        pub struct $name(pub Uuid);

        impl $name {
            pub fn new(id: Uuid) -> Self {
                $name(id)
            }

            pub fn as_uuid(&self) -> Uuid {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::from_str(s).map($name)
            }
        }
    };
}

uuid_id!(
    /// One scored round within a session.
    GameId
);
uuid_id!(
    /// A multi-game gathering of players under one template.
    SessionId
);
uuid_id!(
    /// A game template (rules + ball catalog + pricing).
    TemplateId
);
uuid_id!(
    /// A session participant. Stable join key for all scoring; display
    /// names are caches only.
    ParticipantId
);
uuid_id!(
    /// A log entry. Always the backend-assigned id, so that delete and
    /// amend calls reference the persisted record.
    EventId
);

/// Elapsed game time at whole-second resolution.
///
/// Displayed as `M:SS` with unpadded minutes, the stamp format carried on
/// log entries. Ordering is by total seconds, so stamps parsed back from
/// strings sort the same way they were produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GameTime(u32);

impl GameTime {
    pub fn from_secs(secs: u32) -> Self {
        GameTime(secs)
    }

    pub fn as_secs(&self) -> u32 {
        self.0
    }

    pub fn zero() -> Self {
        GameTime(0)
    }
}

impl fmt::Display for GameTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{:02}", self.0 / 60, self.0 % 60)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid game time stamp: {0:?}")]
pub struct GameTimeParseError(String);

impl FromStr for GameTime {
    type Err = GameTimeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (minutes, seconds) = s
            .split_once(':')
            .ok_or_else(|| GameTimeParseError(s.to_string()))?;
        if seconds.len() != 2 {
            return Err(GameTimeParseError(s.to_string()));
        }
        let minutes: u32 = minutes
            .parse()
            .map_err(|_| GameTimeParseError(s.to_string()))?;
        let seconds: u32 = seconds
            .parse()
            .map_err(|_| GameTimeParseError(s.to_string()))?;
        if seconds >= 60 {
            return Err(GameTimeParseError(s.to_string()));
        }
        Ok(GameTime(minutes * 60 + seconds))
    }
}

impl Serialize for GameTime {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for GameTime {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
