// Per-player contribution aggregation over a team's matches.

use std::collections::{BTreeMap, HashSet};

use tracing::debug;

use crate::data::{Dataset, Game};
use crate::lineup::LineupError;

/// Points per goal in the contribution score.
pub const GOAL_WEIGHT: f64 = 5.0;
/// Points per assist in the contribution score.
pub const ASSIST_WEIGHT: f64 = 3.0;
/// Minutes worth one point in the contribution score.
pub const MINUTES_PER_POINT: f64 = 90.0;

/// `5·goals + 3·assists + minutes/90`
pub fn contribution_score(goals: f64, assists: f64, minutes_played: f64) -> f64 {
    goals * GOAL_WEIGHT + assists * ASSIST_WEIGHT + minutes_played / MINUTES_PER_POINT
}

/// A player's summed output across a filtered set of matches.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerContribution {
    pub player_id: u64,
    pub name: Option<String>,
    pub position: Option<String>,
    pub image_url: Option<String>,
    pub goals: f64,
    pub assists: f64,
    pub minutes_played: f64,
    pub contribution_score: f64,
}

#[derive(Default)]
struct Totals {
    goals: f64,
    assists: f64,
    minutes_played: f64,
}

/// Sum goals, assists and minutes per player over the given matches and
/// attach name, position and image from the players table.
///
/// Rows come back ordered by ascending player id. Players with appearances
/// but no players-table row are kept with no name or position.
///
/// Fails with `LineupError::Schema` when the players table has neither a
/// `name` nor a `player_name` column, or no `position` column.
pub fn aggregate_contributions(
    dataset: &Dataset,
    games: &[&Game],
) -> Result<Vec<PlayerContribution>, LineupError> {
    let columns = dataset.player_columns;
    let mut missing = Vec::new();
    if columns.name.is_none() {
        missing.push("name | player_name".to_string());
    }
    if !columns.position {
        missing.push("position".to_string());
    }
    if !missing.is_empty() {
        return Err(LineupError::Schema {
            table: "players",
            missing,
        });
    }

    let game_ids: HashSet<u64> = games.iter().map(|g| g.game_id).collect();
    let mut totals: BTreeMap<u64, Totals> = BTreeMap::new();
    for appearance in dataset
        .appearances
        .iter()
        .filter(|a| game_ids.contains(&a.game_id))
    {
        let t = totals.entry(appearance.player_id).or_default();
        t.goals += appearance.goals_or_zero();
        t.assists += appearance.assists_or_zero();
        t.minutes_played += appearance.minutes_or_zero();
    }

    let players = dataset.player_index();
    let contributions: Vec<PlayerContribution> = totals
        .into_iter()
        .map(|(player_id, t)| {
            let player = players.get(&player_id);
            PlayerContribution {
                player_id,
                name: player.and_then(|p| p.name.clone()),
                position: player.and_then(|p| p.position.clone()),
                image_url: if columns.image_url {
                    player.and_then(|p| p.image_url.clone())
                } else {
                    None
                },
                goals: t.goals,
                assists: t.assists,
                minutes_played: t.minutes_played,
                contribution_score: contribution_score(t.goals, t.assists, t.minutes_played),
            }
        })
        .collect();

    debug!(
        matches = game_ids.len(),
        players = contributions.len(),
        "contributions aggregated"
    );
    Ok(contributions)
}
