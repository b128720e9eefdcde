// Per-team lineup cache.
//
// Entries are stamped with the dataset they were computed from. A lookup
// against a different stamp is a miss and replaces the stale entry.

use std::collections::HashMap;

use tracing::debug;

use crate::data::Dataset;
use crate::lineup::{recommend_lineup, LineupError, LineupOutcome};

/// Identity of the dataset a cached lineup was computed from.
///
/// Row counts catch reloads that change table sizes; `revision` is bumped by
/// the caller whenever it swaps tables in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatasetStamp {
    pub revision: u64,
    pub clubs: usize,
    pub games: usize,
    pub appearances: usize,
    pub players: usize,
}

impl DatasetStamp {
    pub fn of(dataset: &Dataset, revision: u64) -> Self {
        DatasetStamp {
            revision,
            clubs: dataset.clubs.len(),
            games: dataset.games.len(),
            appearances: dataset.appearances.len(),
            players: dataset.players.len(),
        }
    }
}

#[derive(Debug, Clone)]
struct CachedLineup {
    stamp: DatasetStamp,
    outcome: LineupOutcome,
}

/// Lineup outcomes keyed by team name. Errors are never cached.
#[derive(Debug, Clone, Default)]
pub struct LineupCache {
    entries: HashMap<String, CachedLineup>,
    hits: u64,
    misses: u64,
}

impl LineupCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached outcome for `team_name` if it was computed from the
    /// same dataset stamp, otherwise compute and store it.
    pub fn get_or_compute(
        &mut self,
        dataset: &Dataset,
        revision: u64,
        team_name: &str,
    ) -> Result<LineupOutcome, LineupError> {
        let stamp = DatasetStamp::of(dataset, revision);
        if let Some(cached) = self.entries.get(team_name) {
            if cached.stamp == stamp {
                self.hits += 1;
                return Ok(cached.outcome.clone());
            }
            debug!(team = team_name, "cached lineup is stale");
        }

        self.misses += 1;
        let outcome = recommend_lineup(dataset, team_name)?;
        self.entries.insert(
            team_name.to_string(),
            CachedLineup {
                stamp,
                outcome: outcome.clone(),
            },
        );
        Ok(outcome)
    }

    /// Drop one team's entry. Returns whether an entry existed.
    pub fn invalidate(&mut self, team_name: &str) -> bool {
        self.entries.remove(team_name).is_some()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Appearance, Club, Game, GameColumns, NameColumn, Player, PlayerColumns};
    use crate::lineup::NotFoundReason;

    fn dataset() -> Dataset {
        Dataset {
            clubs: vec![Club { club_id: 1, name: "Ajax".into() }],
            games: vec![Game {
                game_id: 1,
                home_club_id: Some(1),
                away_club_id: Some(2),
                ..Game::default()
            }],
            game_columns: GameColumns { club_ids: true, club_names: false },
            appearances: vec![Appearance {
                game_id: 1,
                player_id: 9,
                goals: Some(1.0),
                minutes_played: Some(90.0),
                ..Appearance::default()
            }],
            players: vec![Player {
                player_id: 9,
                name: Some("Nine".into()),
                position: Some("Attack".into()),
                ..Player::default()
            }],
            player_columns: PlayerColumns {
                name: Some(NameColumn::Name),
                position: true,
                image_url: false,
            },
        }
    }

    #[test]
    fn second_lookup_hits() {
        let ds = dataset();
        let mut cache = LineupCache::new();
        let first = cache.get_or_compute(&ds, 0, "Ajax").unwrap();
        let second = cache.get_or_compute(&ds, 0, "Ajax").unwrap();
        assert_eq!(first, second);
        assert_eq!(cache.hits(), 1);
        assert_eq!(cache.misses(), 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn revision_bump_recomputes() {
        let mut ds = dataset();
        let mut cache = LineupCache::new();
        let before = cache.get_or_compute(&ds, 0, "Ajax").unwrap();
        assert_eq!(before.lineup().map(|l| l.len()), Some(1));

        ds.appearances[0].goals = Some(3.0);
        // Same shape, same revision: stale answer is served.
        let stale = cache.get_or_compute(&ds, 0, "Ajax").unwrap();
        assert_eq!(stale, before);

        let fresh = cache.get_or_compute(&ds, 1, "Ajax").unwrap();
        let score = fresh.lineup().unwrap().entries[0].contribution_score;
        assert!((score - 16.0).abs() < 1e-12);
        assert_eq!(cache.misses(), 2);
    }

    #[test]
    fn table_growth_recomputes() {
        let mut ds = dataset();
        let mut cache = LineupCache::new();
        cache.get_or_compute(&ds, 0, "Ajax").unwrap();
        ds.players.push(Player { player_id: 10, ..Player::default() });
        cache.get_or_compute(&ds, 0, "Ajax").unwrap();
        assert_eq!(cache.misses(), 2);
        assert_eq!(cache.hits(), 0);
    }

    #[test]
    fn not_found_is_cached_but_errors_are_not() {
        let mut ds = dataset();
        let mut cache = LineupCache::new();
        let outcome = cache.get_or_compute(&ds, 0, "PSV").unwrap();
        assert_eq!(outcome, LineupOutcome::NotFound(NotFoundReason::TeamNotResolved));
        assert_eq!(cache.len(), 1);

        ds.player_columns.name = None;
        assert!(cache.get_or_compute(&ds, 1, "Ajax").is_err());
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn explicit_invalidation() {
        let ds = dataset();
        let mut cache = LineupCache::new();
        cache.get_or_compute(&ds, 0, "Ajax").unwrap();
        assert!(cache.invalidate("Ajax"));
        assert!(!cache.invalidate("Ajax"));
        cache.get_or_compute(&ds, 0, "Ajax").unwrap();
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.misses(), 2);
    }
}
