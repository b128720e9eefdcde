// Best-historical starting lineup for a team.
//
// Pipeline: team name -> club identity -> team matches -> per-player
// contribution -> position buckets -> 4-3-3 assembly.

pub mod cache;
pub mod contribution;
pub mod formation;
pub mod position;
pub mod team;

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error, warn};

use crate::data::Dataset;

pub use cache::{DatasetStamp, LineupCache};
pub use contribution::{aggregate_contributions, contribution_score, PlayerContribution};
pub use formation::{assemble_formation, Lineup, LineupEntry};
pub use position::{classify_position, Bucket, BUCKET_ORDER, LINEUP_SIZE};
pub use team::{find_team_matches, MatchResolution, TeamMatches};

// ---------------------------------------------------------------------------
// Error and outcome types
// ---------------------------------------------------------------------------

/// A data problem that must be fixed upstream. Never retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LineupError {
    #[error("{table} table is missing required columns: {}", missing.join(", "))]
    Schema {
        table: &'static str,
        missing: Vec<String>,
    },
}

/// Why no lineup could be produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotFoundReason {
    /// Games, players or appearances table is empty.
    EmptyTables,
    /// Neither the club table nor the games table identifies the team.
    TeamNotResolved,
    /// The team resolved but played no recorded matches.
    NoMatches,
    /// The team's matches have no appearance rows.
    NoPlayers,
}

impl NotFoundReason {
    pub fn label(&self) -> &'static str {
        match self {
            NotFoundReason::EmptyTables => "empty_tables",
            NotFoundReason::TeamNotResolved => "team_not_resolved",
            NotFoundReason::NoMatches => "no_matches",
            NotFoundReason::NoPlayers => "no_players",
        }
    }
}

/// A lineup plus the context it was computed from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineupReport {
    pub team: String,
    pub club_id: Option<u64>,
    pub resolution: MatchResolution,
    pub matches: usize,
    pub first_match: Option<NaiveDate>,
    pub last_match: Option<NaiveDate>,
    /// Distinct players with appearances in the team's matches.
    pub pool_size: usize,
    pub lineup: Lineup,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LineupOutcome {
    Selected(LineupReport),
    NotFound(NotFoundReason),
}

impl LineupOutcome {
    pub fn lineup(&self) -> Option<&Lineup> {
        match self {
            LineupOutcome::Selected(report) => Some(&report.lineup),
            LineupOutcome::NotFound(_) => None,
        }
    }

    /// Lineup entries, or nothing when the team was not found.
    pub fn into_entries(self) -> Vec<LineupEntry> {
        match self {
            LineupOutcome::Selected(report) => report.lineup.into_entries(),
            LineupOutcome::NotFound(_) => Vec::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Propose the best historical 4-3-3 for `team_name`.
///
/// `Ok(NotFound)` covers every "no data" case. `Err` is reserved for schema
/// problems in the input tables. A `Selected` lineup may be short when the
/// team used fewer than eleven players; check `Lineup::is_complete`.
pub fn recommend_lineup(
    dataset: &Dataset,
    team_name: &str,
) -> Result<LineupOutcome, LineupError> {
    if dataset.has_empty_lineup_tables() {
        return Ok(LineupOutcome::NotFound(NotFoundReason::EmptyTables));
    }

    let Some(matches) = find_team_matches(dataset, team_name) else {
        return Ok(LineupOutcome::NotFound(NotFoundReason::TeamNotResolved));
    };
    if matches.games.is_empty() {
        return Ok(LineupOutcome::NotFound(NotFoundReason::NoMatches));
    }

    let pool = aggregate_contributions(dataset, &matches.games)?;
    if pool.is_empty() {
        return Ok(LineupOutcome::NotFound(NotFoundReason::NoPlayers));
    }

    let lineup = assemble_formation(&pool);
    debug!(
        team = team_name,
        pool = pool.len(),
        selected = lineup.len(),
        "lineup assembled"
    );

    let (first_match, last_match) = match matches.date_range() {
        Some((first, last)) => (Some(first), Some(last)),
        None => (None, None),
    };
    Ok(LineupOutcome::Selected(LineupReport {
        team: team_name.to_string(),
        club_id: matches.club_id,
        resolution: matches.resolution,
        matches: matches.games.len(),
        first_match,
        last_match,
        pool_size: pool.len(),
        lineup,
    }))
}

/// Fail-soft variant for callers that only render players: every miss and
/// every error becomes an empty list. Errors are logged so an empty result
/// caused by bad data can still be told apart from a team with no data.
pub fn recommend_lineup_or_empty(dataset: &Dataset, team_name: &str) -> Vec<LineupEntry> {
    match recommend_lineup(dataset, team_name) {
        Ok(outcome) => {
            if let LineupOutcome::NotFound(reason) = &outcome {
                warn!(team = team_name, reason = reason.label(), "no lineup for team");
            }
            outcome.into_entries()
        }
        Err(e) => {
            error!(team = team_name, "lineup generation failed: {}", e);
            Vec::new()
        }
    }
}
