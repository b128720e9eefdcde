// League-wide per-player totals and per-game rates.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::data::Dataset;

/// Default minimum appearances for a player to enter the scoring pool.
pub const DEFAULT_MIN_GAMES: u32 = 5;

/// Career totals and per-game rates for one player.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerSeasonStats {
    pub player_id: u64,
    pub name: Option<String>,
    pub position: Option<String>,
    pub image_url: Option<String>,
    pub market_value_in_eur: Option<f64>,
    pub games_played: u32,
    pub goals: f64,
    pub assists: f64,
    pub minutes_played: f64,
    pub yellow_cards: f64,
    pub red_cards: f64,
    pub goals_per_game: f64,
    pub assists_per_game: f64,
    pub minutes_per_game: f64,
}

#[derive(Default)]
struct Totals {
    games: u32,
    goals: f64,
    assists: f64,
    minutes: f64,
    yellow: f64,
    red: f64,
}

/// Aggregate every appearance by player and keep those with at least
/// `min_games` appearance rows. Ordered by ascending player id.
pub fn player_stats(dataset: &Dataset, min_games: u32) -> Vec<PlayerSeasonStats> {
    let mut totals: BTreeMap<u64, Totals> = BTreeMap::new();
    for a in &dataset.appearances {
        let t = totals.entry(a.player_id).or_default();
        t.games += 1;
        t.goals += a.goals_or_zero();
        t.assists += a.assists_or_zero();
        t.minutes += a.minutes_or_zero();
        t.yellow += a.yellow_cards.unwrap_or(0.0);
        t.red += a.red_cards.unwrap_or(0.0);
    }

    let players = dataset.player_index();
    totals
        .into_iter()
        .filter(|(_, t)| t.games >= min_games)
        .map(|(player_id, t)| {
            let player = players.get(&player_id);
            let games = f64::from(t.games);
            PlayerSeasonStats {
                player_id,
                name: player.and_then(|p| p.name.clone()),
                position: player.and_then(|p| p.position.clone()),
                image_url: player.and_then(|p| p.image_url.clone()),
                market_value_in_eur: player.and_then(|p| p.market_value_in_eur),
                games_played: t.games,
                goals: t.goals,
                assists: t.assists,
                minutes_played: t.minutes,
                yellow_cards: t.yellow,
                red_cards: t.red,
                goals_per_game: t.goals / games,
                assists_per_game: t.assists / games,
                minutes_per_game: t.minutes / games,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Appearance, Player};

    fn appearance(player_id: u64, goals: f64, minutes: f64) -> Appearance {
        Appearance {
            game_id: 1,
            player_id,
            goals: Some(goals),
            assists: None,
            minutes_played: Some(minutes),
            yellow_cards: Some(1.0),
            red_cards: None,
        }
    }

    #[test]
    fn rates_and_threshold() {
        let mut appearances = Vec::new();
        for _ in 0..4 {
            appearances.push(appearance(1, 1.0, 90.0));
        }
        for _ in 0..2 {
            appearances.push(appearance(2, 0.0, 30.0));
        }
        let ds = Dataset {
            appearances,
            players: vec![Player {
                player_id: 1,
                name: Some("One".into()),
                market_value_in_eur: Some(1_000_000.0),
                ..Player::default()
            }],
            ..Dataset::default()
        };

        let rows = player_stats(&ds, 3);
        assert_eq!(rows.len(), 1);
        let one = &rows[0];
        assert_eq!(one.games_played, 4);
        assert_eq!(one.goals, 4.0);
        assert_eq!(one.assists, 0.0);
        assert_eq!(one.yellow_cards, 4.0);
        assert_eq!(one.red_cards, 0.0);
        assert!((one.goals_per_game - 1.0).abs() < 1e-12);
        assert!((one.minutes_per_game - 90.0).abs() < 1e-12);
        assert_eq!(one.market_value_in_eur, Some(1_000_000.0));

        let everyone = player_stats(&ds, 1);
        assert_eq!(everyone.len(), 2);
        assert!(everyone[1].name.is_none());
    }
}
