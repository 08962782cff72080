//! Final ranking and the frozen game-result snapshot.

use crate::domain::{GameTime, ParticipantId, Player, Rubles};
use serde::{Deserialize, Serialize};

/// One row of the final standings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedPlayer {
    pub rank: u32,
    pub participant_id: ParticipantId,
    pub display_name: String,
    pub points: i64,
    pub money: Rubles,
    pub balls_potted: u32,
    pub fouls: u32,
}

/// The statistics snapshot written once at completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub winner_participant_id: Option<ParticipantId>,
    pub standings: Vec<RankedPlayer>,
    pub total_balls: u32,
    pub total_fouls: u32,
    pub game_duration: GameTime,
}

/// Rank the players and aggregate game-wide totals.
///
/// Sorting is by points descending and stable, so players tied on points
/// keep their incoming order; the winner is simply the first row. The
/// input is never mutated.
pub fn build_result(players: &[Player], game_duration: GameTime) -> GameResult {
    let mut by_points: Vec<&Player> = players.iter().collect();
    by_points.sort_by_key(|p| std::cmp::Reverse(p.points));

    let standings: Vec<RankedPlayer> = by_points
        .iter()
        .enumerate()
        .map(|(i, p)| RankedPlayer {
            rank: i as u32 + 1,
            participant_id: p.id,
            display_name: p.display_name.clone(),
            points: p.points,
            money: p.money,
            balls_potted: p.balls.len() as u32,
            fouls: p.fouls.len() as u32,
        })
        .collect();

    GameResult {
        winner_participant_id: standings.first().map(|r| r.participant_id),
        total_balls: standings.iter().map(|r| r.balls_potted).sum(),
        total_fouls: standings.iter().map(|r| r.fouls).sum(),
        standings,
        game_duration,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Ball, BallColor, EventId, Foul};
    use uuid::Uuid;

    fn player(n: u128, name: &str, points: i64, balls: usize, fouls: usize) -> Player {
        let mut p = Player::new(
            ParticipantId::new(Uuid::from_u128(n)),
            name.to_string(),
            Some(n as u32),
        );
        p.points = points;
        p.money = Rubles::from_whole(points * 10);
        for i in 0..balls {
            p.balls.push(Ball {
                id: EventId::new(Uuid::from_u128(n * 100 + i as u128)),
                color: BallColor::Yellow,
                points: 2,
                timestamp: GameTime::from_secs(i as u32),
            });
        }
        for i in 0..fouls {
            p.fouls.push(Foul {
                id: EventId::new(Uuid::from_u128(n * 1000 + i as u128)),
                timestamp: GameTime::from_secs(i as u32),
                tag: None,
            });
        }
        p
    }

    #[test]
    fn test_ranking_sorts_points_descending() {
        let players = vec![
            player(1, "Igor", 3, 2, 1),
            player(2, "Sasha", 9, 3, 0),
            player(3, "Oleg", -1, 0, 1),
        ];
        let result = build_result(&players, GameTime::from_secs(900));

        let names: Vec<&str> = result
            .standings
            .iter()
            .map(|r| r.display_name.as_str())
            .collect();
        assert_eq!(names, vec!["Sasha", "Igor", "Oleg"]);
        assert_eq!(
            result.standings.iter().map(|r| r.rank).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
        assert_eq!(
            result.winner_participant_id,
            Some(ParticipantId::new(Uuid::from_u128(2)))
        );
        assert_eq!(result.total_balls, 5);
        assert_eq!(result.total_fouls, 2);
        assert_eq!(result.game_duration, GameTime::from_secs(900));
    }

    #[test]
    fn test_ties_keep_input_order() {
        let players = vec![
            player(1, "First", 5, 0, 0),
            player(2, "Second", 5, 0, 0),
            player(3, "Third", 5, 0, 0),
        ];
        let result = build_result(&players, GameTime::zero());
        let names: Vec<&str> = result
            .standings
            .iter()
            .map(|r| r.display_name.as_str())
            .collect();
        assert_eq!(names, vec!["First", "Second", "Third"]);
        assert_eq!(
            result.winner_participant_id,
            Some(ParticipantId::new(Uuid::from_u128(1)))
        );
    }

    #[test]
    fn test_input_is_not_mutated() {
        let players = vec![player(1, "Igor", 1, 0, 0), player(2, "Sasha", 2, 0, 0)];
        let before = players.clone();
        let _ = build_result(&players, GameTime::zero());
        assert_eq!(players, before);
    }

    #[test]
    fn test_empty_roster_has_no_winner() {
        let result = build_result(&[], GameTime::zero());
        assert_eq!(result.winner_participant_id, None);
        assert!(result.standings.is_empty());
        assert_eq!(result.total_balls, 0);
    }
}
