// Player season stats and the composite 0-100 player score.

pub mod composite;
pub mod player_stats;

pub use composite::{compute_player_scores, top_scored, ScoredPlayer};
pub use player_stats::{player_stats, PlayerSeasonStats, DEFAULT_MIN_GAMES};
