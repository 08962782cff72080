//! Ball colors, the template ball catalog, and potted-ball records.

use crate::domain::{EventId, GameTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The eight ball colors known to the supported game types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BallColor {
    White,
    Yellow,
    Green,
    Brown,
    Blue,
    Pink,
    Black,
    Red,
}

impl BallColor {
    pub fn as_str(&self) -> &'static str {
        match self {
            BallColor::White => "white",
            BallColor::Yellow => "yellow",
            BallColor::Green => "green",
            BallColor::Brown => "brown",
            BallColor::Blue => "blue",
            BallColor::Pink => "pink",
            BallColor::Black => "black",
            BallColor::Red => "red",
        }
    }
}

impl fmt::Display for BallColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for BallColor {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "white" => Ok(BallColor::White),
            "yellow" => Ok(BallColor::Yellow),
            "green" => Ok(BallColor::Green),
            "brown" => Ok(BallColor::Brown),
            "blue" => Ok(BallColor::Blue),
            "pink" => Ok(BallColor::Pink),
            "black" => Ok(BallColor::Black),
            "red" => Ok(BallColor::Red),
            _ => Err(()),
        }
    }
}

/// One row of a template's ball catalog.
///
/// Disabled rows stay in the catalog (the cue ball, or reds outside
/// Americana) but never score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BallSpec {
    pub color: BallColor,
    pub points: i64,
    pub enabled: bool,
}

impl BallSpec {
    pub fn new(color: BallColor, points: i64, enabled: bool) -> Self {
        BallSpec {
            color,
            points,
            enabled,
        }
    }
}

/// The Kolkhoz default catalog, used when a session has no template.
pub fn default_catalog() -> Vec<BallSpec> {
    vec![
        // The cue ball is tracked but never scores.
        BallSpec::new(BallColor::White, 0, false),
        BallSpec::new(BallColor::Yellow, 2, true),
        BallSpec::new(BallColor::Green, 3, true),
        BallSpec::new(BallColor::Brown, 4, true),
        BallSpec::new(BallColor::Blue, 5, true),
        BallSpec::new(BallColor::Pink, 6, true),
        BallSpec::new(BallColor::Black, 7, true),
        BallSpec::new(BallColor::Red, 1, false),
    ]
}

/// Look up an enabled catalog row by color.
pub fn resolve_ball(catalog: &[BallSpec], color: BallColor) -> Option<&BallSpec> {
    catalog.iter().find(|b| b.color == color && b.enabled)
}

/// A ball actually potted during a game. The id is the id of the log entry
/// that recorded the pot, so deleting the entry removes exactly this ball.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ball {
    pub id: EventId,
    pub color: BallColor,
    pub points: i64,
    pub timestamp: GameTime,
}
