// In-memory league tables consumed by the lineup selector and the scoring
// report. Rows are immutable once a `Dataset` is built.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

/// A row of the club reference table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Club {
    pub club_id: u64,
    pub name: String,
}

/// A row of the games table.
///
/// Club identity may be carried by id, by name, or both, depending on the
/// upstream export. `GameColumns` records which pairs the source table had.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Game {
    pub game_id: u64,
    pub home_club_id: Option<u64>,
    pub away_club_id: Option<u64>,
    pub home_club_name: Option<String>,
    pub away_club_name: Option<String>,
    pub date: Option<NaiveDate>,
}

/// Which optional column pairs were present in the games table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GameColumns {
    /// `home_club_id` / `away_club_id`
    pub club_ids: bool,
    /// `home_club_name` / `away_club_name`
    pub club_names: bool,
}

/// One player's line in one match. Absent numeric cells are `None` and are
/// read as zero by every consumer.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Appearance {
    pub game_id: u64,
    pub player_id: u64,
    pub goals: Option<f64>,
    pub assists: Option<f64>,
    pub minutes_played: Option<f64>,
    pub yellow_cards: Option<f64>,
    pub red_cards: Option<f64>,
}

impl Appearance {
    pub fn goals_or_zero(&self) -> f64 {
        self.goals.unwrap_or(0.0)
    }

    pub fn assists_or_zero(&self) -> f64 {
        self.assists.unwrap_or(0.0)
    }

    pub fn minutes_or_zero(&self) -> f64 {
        self.minutes_played.unwrap_or(0.0)
    }
}

/// A row of the players reference table.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Player {
    pub player_id: u64,
    pub name: Option<String>,
    pub position: Option<String>,
    pub image_url: Option<String>,
    pub market_value_in_eur: Option<f64>,
}

/// The header a players table used for display names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NameColumn {
    Name,
    PlayerName,
}

impl NameColumn {
    pub fn header(&self) -> &'static str {
        match self {
            NameColumn::Name => "name",
            NameColumn::PlayerName => "player_name",
        }
    }
}

/// Which optional columns were present in the players table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlayerColumns {
    /// `None` when neither `name` nor `player_name` was present.
    pub name: Option<NameColumn>,
    pub position: bool,
    pub image_url: bool,
}

// ---------------------------------------------------------------------------
// Dataset
// ---------------------------------------------------------------------------

/// All tables needed to answer lineup and scoring requests.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub clubs: Vec<Club>,
    pub games: Vec<Game>,
    pub game_columns: GameColumns,
    pub appearances: Vec<Appearance>,
    pub players: Vec<Player>,
    pub player_columns: PlayerColumns,
}

impl Dataset {
    /// Whether any of the tables a lineup needs is empty.
    pub fn has_empty_lineup_tables(&self) -> bool {
        self.games.is_empty() || self.players.is_empty() || self.appearances.is_empty()
    }

    /// Index player rows by id. The first row wins on duplicate ids.
    pub fn player_index(&self) -> HashMap<u64, &Player> {
        let mut index = HashMap::with_capacity(self.players.len());
        for player in &self.players {
            index.entry(player.player_id).or_insert(player);
        }
        index
    }
}
