//! Circular round-robin money settlement.
//!
//! Kolkhoz settles along the queue: every player pays the *next* player in
//! the circle for that player's points, and is paid by the previous one
//! for their own. The scheme is chained, not all-to-all, and nets to zero
//! exactly.

use crate::domain::{ParticipantId, Player, Rubles};
use serde::{Deserialize, Serialize};

/// One player's line of the settlement.
///
/// Field names follow the backend's game-result records: `rubles_earned`
/// flows in from the previous player in the circle, `rubles_paid` flows
/// out to the next.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettlementLine {
    pub participant_id: ParticipantId,
    pub display_name: String,
    pub queue_position_in_game: u32,
    pub points: i64,
    pub rubles_earned: Rubles,
    pub rubles_paid: Rubles,
    pub net_rubles: Rubles,
}

/// Compute the settlement for the given players at the given point price.
///
/// Players are ordered by `queue_position` ascending; players without a
/// position fall in after the positioned ones, keeping their original
/// relative order (stable sort). A single player settles against
/// themselves for a net of zero.
pub fn settle(players: &[Player], point_value: Rubles) -> Vec<SettlementLine> {
    let mut circle: Vec<&Player> = players.iter().collect();
    circle.sort_by_key(|p| p.queue_position.unwrap_or(u32::MAX));

    let n = circle.len();
    circle
        .iter()
        .enumerate()
        .map(|(i, player)| {
            let next = circle[(i + 1) % n];
            let earned = point_value * player.points;
            let paid = point_value * next.points;
            SettlementLine {
                participant_id: player.id,
                display_name: player.display_name.clone(),
                queue_position_in_game: i as u32,
                points: player.points,
                rubles_earned: earned,
                rubles_paid: paid,
                net_rubles: earned - paid,
            }
        })
        .collect()
}
