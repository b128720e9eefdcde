// CSV loading for the club, game, appearance and player tables.
//
// Reads the transfermarkt-style export layout: one CSV per table, extra
// columns ignored, optional column groups detected from the header row.

use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::DataPaths;
use crate::data::tables::{
    Appearance, Club, Dataset, Game, GameColumns, NameColumn, Player, PlayerColumns,
};

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },

    #[error("{table} table is missing required columns: {}", missing.join(", "))]
    Schema {
        table: &'static str,
        missing: Vec<String>,
    },
}

// ---------------------------------------------------------------------------
// Raw CSV serde structs (private)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct RawClub {
    club_id: u64,
    name: String,
}

#[derive(Debug, Deserialize)]
struct RawGame {
    game_id: u64,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    home_club_id: Option<u64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    away_club_id: Option<u64>,
    #[serde(default)]
    home_club_name: Option<String>,
    #[serde(default)]
    away_club_name: Option<String>,
    #[serde(default)]
    date: Option<String>,
}

/// Numeric stat cells that fail to parse are read as absent, not as a
/// malformed row.
#[derive(Debug, Deserialize)]
struct RawAppearance {
    game_id: u64,
    player_id: u64,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    goals: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    assists: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    minutes_played: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    yellow_cards: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    red_cards: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawPlayer {
    player_id: u64,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    player_name: Option<String>,
    #[serde(default)]
    position: Option<String>,
    #[serde(default)]
    image_url: Option<String>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    market_value_in_eur: Option<f64>,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Headers and cells are trimmed so padded exports deserialize against the
/// same column names the header checks see.
fn csv_reader<R: Read>(rdr: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(rdr)
}

fn header_set<R: Read>(
    reader: &mut csv::Reader<R>,
    origin: &str,
) -> Result<HashSet<String>, LoadError> {
    let headers = reader.headers().map_err(|e| LoadError::Csv {
        path: origin.to_string(),
        source: e,
    })?;
    Ok(headers.iter().map(|h| h.trim().to_string()).collect())
}

fn require_columns(
    table: &'static str,
    headers: &HashSet<String>,
    required: &[&str],
) -> Result<(), LoadError> {
    let missing: Vec<String> = required
        .iter()
        .filter(|c| !headers.contains(**c))
        .map(|c| c.to_string())
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(LoadError::Schema { table, missing })
    }
}

/// Trim a text cell; blank cells become `None`.
fn clean_text(raw: Option<String>) -> Option<String> {
    raw.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

/// Parse the leading `YYYY-MM-DD` of a date cell. Timestamps keep their date
/// part; anything else is `None`.
fn parse_date(raw: Option<&str>) -> Option<NaiveDate> {
    let raw = raw?.trim();
    let day = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

// ---------------------------------------------------------------------------
// Reader-based loaders (private, enable testing without temp files)
// ---------------------------------------------------------------------------

fn load_clubs_from_reader<R: Read>(rdr: R, origin: &str) -> Result<Vec<Club>, LoadError> {
    let mut reader = csv_reader(rdr);
    let headers = header_set(&mut reader, origin)?;
    require_columns("clubs", &headers, &["club_id", "name"])?;

    let mut clubs = Vec::new();
    for result in reader.deserialize::<RawClub>() {
        match result {
            Ok(raw) => clubs.push(Club {
                club_id: raw.club_id,
                name: raw.name,
            }),
            Err(e) => warn!("skipping malformed club row in {}: {}", origin, e),
        }
    }
    Ok(clubs)
}

fn load_games_from_reader<R: Read>(
    rdr: R,
    origin: &str,
) -> Result<(Vec<Game>, GameColumns), LoadError> {
    let mut reader = csv_reader(rdr);
    let headers = header_set(&mut reader, origin)?;
    require_columns("games", &headers, &["game_id"])?;

    let columns = GameColumns {
        club_ids: headers.contains("home_club_id") && headers.contains("away_club_id"),
        club_names: headers.contains("home_club_name") && headers.contains("away_club_name"),
    };
    if !columns.club_ids && !columns.club_names {
        warn!(
            "games table {} has neither club id nor club name columns; no team can be resolved",
            origin
        );
    }

    let mut games = Vec::new();
    for result in reader.deserialize::<RawGame>() {
        match result {
            Ok(raw) => games.push(Game {
                game_id: raw.game_id,
                home_club_id: raw.home_club_id,
                away_club_id: raw.away_club_id,
                home_club_name: raw.home_club_name,
                away_club_name: raw.away_club_name,
                date: parse_date(raw.date.as_deref()),
            }),
            Err(e) => warn!("skipping malformed game row in {}: {}", origin, e),
        }
    }
    Ok((games, columns))
}

fn load_appearances_from_reader<R: Read>(
    rdr: R,
    origin: &str,
) -> Result<Vec<Appearance>, LoadError> {
    let mut reader = csv_reader(rdr);
    let headers = header_set(&mut reader, origin)?;
    require_columns("appearances", &headers, &["game_id", "player_id"])?;

    let mut appearances = Vec::new();
    for result in reader.deserialize::<RawAppearance>() {
        match result {
            Ok(raw) => appearances.push(Appearance {
                game_id: raw.game_id,
                player_id: raw.player_id,
                goals: raw.goals.filter(|v| v.is_finite()),
                assists: raw.assists.filter(|v| v.is_finite()),
                minutes_played: raw.minutes_played.filter(|v| v.is_finite()),
                yellow_cards: raw.yellow_cards.filter(|v| v.is_finite()),
                red_cards: raw.red_cards.filter(|v| v.is_finite()),
            }),
            Err(e) => warn!("skipping malformed appearance row in {}: {}", origin, e),
        }
    }
    Ok(appearances)
}

fn load_players_from_reader<R: Read>(
    rdr: R,
    origin: &str,
) -> Result<(Vec<Player>, PlayerColumns), LoadError> {
    let mut reader = csv_reader(rdr);
    let headers = header_set(&mut reader, origin)?;
    require_columns("players", &headers, &["player_id"])?;

    let name_column = if headers.contains("name") {
        Some(NameColumn::Name)
    } else if headers.contains("player_name") {
        Some(NameColumn::PlayerName)
    } else {
        None
    };
    let columns = PlayerColumns {
        name: name_column,
        position: headers.contains("position"),
        image_url: headers.contains("image_url"),
    };

    let mut players = Vec::new();
    for result in reader.deserialize::<RawPlayer>() {
        match result {
            Ok(raw) => {
                let name = match name_column {
                    Some(NameColumn::Name) => raw.name,
                    Some(NameColumn::PlayerName) => raw.player_name,
                    None => None,
                };
                players.push(Player {
                    player_id: raw.player_id,
                    name: clean_text(name),
                    position: clean_text(raw.position),
                    image_url: clean_text(raw.image_url),
                    market_value_in_eur: raw.market_value_in_eur.filter(|v| v.is_finite()),
                });
            }
            Err(e) => warn!("skipping malformed player row in {}: {}", origin, e),
        }
    }
    Ok((players, columns))
}

// ---------------------------------------------------------------------------
// Public path-based loaders
// ---------------------------------------------------------------------------

fn open(path: &Path) -> Result<std::fs::File, LoadError> {
    std::fs::File::open(path).map_err(|e| LoadError::Io {
        path: path.display().to_string(),
        source: e,
    })
}

/// Load the club reference table.
pub fn load_clubs(path: &Path) -> Result<Vec<Club>, LoadError> {
    load_clubs_from_reader(open(path)?, &path.display().to_string())
}

/// Load the games table and report which club column pairs it carries.
pub fn load_games(path: &Path) -> Result<(Vec<Game>, GameColumns), LoadError> {
    load_games_from_reader(open(path)?, &path.display().to_string())
}

/// Load per-match player appearances.
pub fn load_appearances(path: &Path) -> Result<Vec<Appearance>, LoadError> {
    load_appearances_from_reader(open(path)?, &path.display().to_string())
}

/// Load the players reference table and report its optional columns.
pub fn load_players(path: &Path) -> Result<(Vec<Player>, PlayerColumns), LoadError> {
    load_players_from_reader(open(path)?, &path.display().to_string())
}

/// Load all four tables from the configured paths.
pub fn load_dataset(paths: &DataPaths) -> Result<Dataset, LoadError> {
    let clubs = load_clubs(Path::new(&paths.clubs))?;
    let (games, game_columns) = load_games(Path::new(&paths.games))?;
    let appearances = load_appearances(Path::new(&paths.appearances))?;
    let (players, player_columns) = load_players(Path::new(&paths.players))?;

    if players.is_empty() {
        warn!("players table {} has no valid rows", paths.players);
    }

    debug!(
        clubs = clubs.len(),
        games = games.len(),
        appearances = appearances.len(),
        players = players.len(),
        "dataset loaded"
    );

    Ok(Dataset {
        clubs,
        games,
        game_columns,
        appearances,
        players,
        player_columns,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clubs_extra_columns_ignored() {
        let csv_data = "\
club_id,club_code,name,domestic_competition_id
27,bayern-munchen,FC Bayern München,L1
418,real-madrid,Real Madrid,ES1";

        let clubs = load_clubs_from_reader(csv_data.as_bytes(), "clubs.csv").unwrap();
        assert_eq!(clubs.len(), 2);
        assert_eq!(clubs[0].club_id, 27);
        assert_eq!(clubs[1].name, "Real Madrid");
    }

    #[test]
    fn clubs_without_name_column_is_schema_error() {
        let csv_data = "\
club_id,club_code
27,bayern-munchen";

        let err = load_clubs_from_reader(csv_data.as_bytes(), "clubs.csv").unwrap_err();
        match err {
            LoadError::Schema { table, missing } => {
                assert_eq!(table, "clubs");
                assert_eq!(missing, vec!["name".to_string()]);
            }
            other => panic!("expected Schema, got: {other}"),
        }
    }

    #[test]
    fn games_detect_id_and_name_columns() {
        let csv_data = "\
game_id,date,home_club_id,away_club_id,home_club_name,away_club_name
1,2023-08-12,27,418,FC Bayern München,Real Madrid";

        let (games, columns) = load_games_from_reader(csv_data.as_bytes(), "games.csv").unwrap();
        assert!(columns.club_ids);
        assert!(columns.club_names);
        assert_eq!(games[0].home_club_id, Some(27));
        assert_eq!(games[0].away_club_name.as_deref(), Some("Real Madrid"));
        assert_eq!(games[0].date, NaiveDate::from_ymd_opt(2023, 8, 12));
    }

    #[test]
    fn games_name_only_table() {
        let csv_data = "\
game_id,home_club_name,away_club_name,date
7,Ajax,PSV,2021-03-01 00:00:00";

        let (games, columns) = load_games_from_reader(csv_data.as_bytes(), "games.csv").unwrap();
        assert!(!columns.club_ids);
        assert!(columns.club_names);
        assert_eq!(games[0].home_club_id, None);
        assert_eq!(games[0].date, NaiveDate::from_ymd_opt(2021, 3, 1));
    }

    #[test]
    fn games_unparseable_date_is_none() {
        let csv_data = "\
game_id,home_club_id,away_club_id,date
7,1,2,next tuesday";

        let (games, _) = load_games_from_reader(csv_data.as_bytes(), "games.csv").unwrap();
        assert_eq!(games.len(), 1);
        assert!(games[0].date.is_none());
    }

    #[test]
    fn appearances_blank_and_invalid_cells_are_absent() {
        let csv_data = "\
game_id,player_id,goals,assists,minutes_played
1,10,2,,90
1,11,abc,1,45
1,12,0,0,NaN";

        let rows = load_appearances_from_reader(csv_data.as_bytes(), "appearances.csv").unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].assists, None);
        assert_eq!(rows[1].goals, None);
        assert_eq!(rows[1].assists, Some(1.0));
        assert_eq!(rows[2].minutes_played, None);
        assert_eq!(rows[0].red_cards, None);
    }

    #[test]
    fn appearances_malformed_ids_skipped() {
        let csv_data = "\
game_id,player_id,goals,assists,minutes_played
1,10,1,0,90
x,11,0,0,90
2,12,0,0,90";

        let rows = load_appearances_from_reader(csv_data.as_bytes(), "appearances.csv").unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].player_id, 12);
    }

    #[test]
    fn players_prefer_name_over_player_name() {
        let csv_data = "\
player_id,name,player_name,position
1,Thomas Müller,T. Müller,Attack";

        let (players, columns) =
            load_players_from_reader(csv_data.as_bytes(), "players.csv").unwrap();
        assert_eq!(columns.name, Some(NameColumn::Name));
        assert_eq!(players[0].name.as_deref(), Some("Thomas Müller"));
        assert!(!columns.image_url);
    }

    #[test]
    fn players_player_name_fallback() {
        let csv_data = "\
player_id,player_name,position,image_url
1,Manuel Neuer,Goalkeeper,https://img.example/1.jpg
2,Leroy Sané,,";

        let (players, columns) =
            load_players_from_reader(csv_data.as_bytes(), "players.csv").unwrap();
        assert_eq!(columns.name, Some(NameColumn::PlayerName));
        assert!(columns.image_url);
        assert_eq!(players[0].name.as_deref(), Some("Manuel Neuer"));
        assert_eq!(players[1].position, None);
        assert_eq!(players[1].image_url, None);
    }

    #[test]
    fn players_without_name_columns_still_load() {
        let csv_data = "\
player_id,position
1,Goalkeeper";

        let (players, columns) =
            load_players_from_reader(csv_data.as_bytes(), "players.csv").unwrap();
        assert_eq!(players.len(), 1);
        assert_eq!(columns.name, None);
        assert!(players[0].name.is_none());
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_clubs(Path::new("/definitely/not/here/clubs.csv")).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }

    #[test]
    fn padded_headers_still_load_player_fields() {
        let csv_data = "\
player_id, name , position, image_url
1, Manuel Neuer, Goalkeeper ,
2,Thomas Müller,Attack - Second Striker,https://img.test/2.jpg";

        let (players, columns) =
            load_players_from_reader(csv_data.as_bytes(), "players.csv").unwrap();
        assert_eq!(columns.name, Some(NameColumn::Name));
        assert!(columns.position);
        assert!(columns.image_url);
        assert_eq!(players[0].name.as_deref(), Some("Manuel Neuer"));
        assert_eq!(players[0].position.as_deref(), Some("Goalkeeper"));
        assert_eq!(players[0].image_url, None);
        assert_eq!(players[1].position.as_deref(), Some("Attack - Second Striker"));
    }

    #[test]
    fn padded_numeric_cells_parse() {
        let csv_data = "\
game_id , player_id , goals , minutes_played
1, 10, 2 , 90";

        let rows = load_appearances_from_reader(csv_data.as_bytes(), "appearances.csv").unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].player_id, 10);
        assert_eq!(rows[0].goals, Some(2.0));
        assert_eq!(rows[0].minutes_played, Some(90.0));
    }
}
