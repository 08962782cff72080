//! The projection: a pure fold from the event log to player state.
//!
//! Calling [`project`] twice with the same inputs yields identical output;
//! the fold never touches the log and never carries state across calls.

use crate::domain::{resolve_ball, Ball, BallSpec, EventKind, Foul, LogEntry, Player, Rubles};
use std::collections::HashMap;
use tracing::warn;

/// Fold the active entries into fresh per-player state.
///
/// Every player is reset before the fold, so whatever derived state the
/// caller passes in is irrelevant — the output is a function of the roster
/// identities, the entries, the catalog, and the point value alone.
///
/// Per-entry problems degrade softly: an entry for an unknown participant
/// or an unknown/disabled ball color is logged and skipped, never fatal.
pub fn project(
    roster: &[Player],
    entries: &[&LogEntry],
    catalog: &[BallSpec],
    point_value: Rubles,
) -> Vec<Player> {
    let mut players: Vec<Player> = roster.to_vec();
    for player in &mut players {
        player.reset();
    }

    let index: HashMap<_, _> = players
        .iter()
        .enumerate()
        .map(|(i, p)| (p.id, i))
        .collect();

    for entry in entries {
        if entry.is_deleted || !entry.kind.is_scoring() {
            continue;
        }

        let Some(&slot) = index.get(&entry.participant_id) else {
            warn!(
                event_id = %entry.id,
                participant_id = %entry.participant_id,
                "log entry references a participant not on the roster, skipping"
            );
            continue;
        };
        let player = &mut players[slot];

        match entry.kind {
            EventKind::Ball { color } => {
                let Some(spec) = resolve_ball(catalog, color) else {
                    warn!(
                        event_id = %entry.id,
                        color = %color,
                        "log entry references a ball missing from the catalog, skipping"
                    );
                    continue;
                };
                player.balls.push(Ball {
                    id: entry.id,
                    color: spec.color,
                    points: spec.points,
                    timestamp: entry.timestamp,
                });
                player.points += spec.points;
            }
            EventKind::Foul => {
                player.fouls.push(Foul {
                    id: entry.id,
                    timestamp: entry.timestamp,
                    tag: entry.tag.clone(),
                });
                player.points -= 1;
            }
            EventKind::Turn | EventKind::GameStart => unreachable!("filtered above"),
        }

        // Money is rederived wholesale after every step, never incremented:
        // a foul moves points, and money must follow points exactly.
        player.money = point_value * player.points;
    }

    players
}
