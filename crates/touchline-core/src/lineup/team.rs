// Team resolution and match filtering.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use crate::data::{Dataset, Game};

/// How a team's matches were located in the games table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchResolution {
    /// Club table hit; games filtered on home/away club id.
    ByClubId,
    /// Games filtered on home/away club name.
    ByClubName,
}

/// The resolved identity of a team and the matches it played.
#[derive(Debug, Clone)]
pub struct TeamMatches<'a> {
    pub club_id: Option<u64>,
    pub resolution: MatchResolution,
    pub games: Vec<&'a Game>,
}

impl TeamMatches<'_> {
    /// Earliest and latest known match date.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let mut dates = self.games.iter().filter_map(|g| g.date);
        let first = dates.next()?;
        Some(dates.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d))))
    }
}

/// Exact match of a display name against the club table. First hit wins.
pub fn resolve_club_id(dataset: &Dataset, team_name: &str) -> Option<u64> {
    dataset
        .clubs
        .iter()
        .find(|c| c.name == team_name)
        .map(|c| c.club_id)
}

/// Games where the club id appears on either side.
pub fn games_for_club_id(dataset: &Dataset, club_id: u64) -> Vec<&Game> {
    dataset
        .games
        .iter()
        .filter(|g| g.home_club_id == Some(club_id) || g.away_club_id == Some(club_id))
        .collect()
}

/// Games where the club name appears on either side.
pub fn games_for_club_name<'a>(dataset: &'a Dataset, team_name: &str) -> Vec<&'a Game> {
    dataset
        .games
        .iter()
        .filter(|g| {
            g.home_club_name.as_deref() == Some(team_name)
                || g.away_club_name.as_deref() == Some(team_name)
        })
        .collect()
}

/// Resolve a team name to its matches.
///
/// A club-table hit filters by id when the games table carries club ids.
/// Otherwise games are matched on club names when those columns exist.
/// Returns `None` when neither path is available; an empty `games` vector
/// means the team resolved but played no recorded matches.
pub fn find_team_matches<'a>(dataset: &'a Dataset, team_name: &str) -> Option<TeamMatches<'a>> {
    let club_id = resolve_club_id(dataset, team_name);
    let columns = dataset.game_columns;

    let resolved = match club_id {
        Some(id) if columns.club_ids => TeamMatches {
            club_id,
            resolution: MatchResolution::ByClubId,
            games: games_for_club_id(dataset, id),
        },
        _ if columns.club_names => TeamMatches {
            club_id,
            resolution: MatchResolution::ByClubName,
            games: games_for_club_name(dataset, team_name),
        },
        _ => {
            debug!(team = team_name, ?club_id, "team could not be resolved against games");
            return None;
        }
    };

    debug!(
        team = team_name,
        ?club_id,
        resolution = ?resolved.resolution,
        matches = resolved.games.len(),
        "team matches resolved"
    );
    Some(resolved)
}
