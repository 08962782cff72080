//! Per-game player state, derived from the log by the projection.

use crate::domain::{Ball, EventId, GameTime, ParticipantId, Rubles};
use serde::{Deserialize, Serialize};

/// A foul committed during a game. As with [`Ball`], the id is the id of
/// the originating log entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Foul {
    pub id: EventId,
    pub timestamp: GameTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}

/// One player's state within a single game.
///
/// Everything below `queue_position` is derived: a pure function of the
/// roster, the active log entries, and the point price. It is never
/// mutated outside a full re-projection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: ParticipantId,
    pub display_name: String,
    /// Slot in the turn/payment circle. `None` means undetermined; the
    /// settlement falls back to roster order.
    pub queue_position: Option<u32>,
    pub points: i64,
    pub money: Rubles,
    pub balls: Vec<Ball>,
    pub fouls: Vec<Foul>,
}

impl Player {
    pub fn new(id: ParticipantId, display_name: String, queue_position: Option<u32>) -> Self {
        Player {
            id,
            display_name,
            queue_position,
            points: 0,
            money: Rubles::zero(),
            balls: Vec::new(),
            fouls: Vec::new(),
        }
    }

    /// Clear all derived state before a replay. Identity fields survive.
    pub fn reset(&mut self) {
        self.points = 0;
        self.money = Rubles::zero();
        self.balls.clear();
        self.fouls.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::BallColor;
    use uuid::Uuid;

    #[test]
    fn test_reset_clears_derived_state_only() {
        let mut player = Player::new(
            ParticipantId::new(Uuid::new_v4()),
            "Sasha".to_string(),
            Some(2),
        );
        player.points = 7;
        player.money = Rubles::from_whole(70);
        player.balls.push(Ball {
            id: EventId::new(Uuid::new_v4()),
            color: BallColor::Black,
            points: 7,
            timestamp: GameTime::from_secs(30),
        });
        player.fouls.push(Foul {
            id: EventId::new(Uuid::new_v4()),
            timestamp: GameTime::from_secs(45),
            tag: None,
        });

        player.reset();

        assert_eq!(player.points, 0);
        assert_eq!(player.money, Rubles::zero());
        assert!(player.balls.is_empty());
        assert!(player.fouls.is_empty());
        assert_eq!(player.display_name, "Sasha");
        assert_eq!(player.queue_position, Some(2));
    }
}
