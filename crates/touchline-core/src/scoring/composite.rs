// Composite 0-100 player score from min-max normalized season stats.

use serde::Serialize;

use crate::scoring::player_stats::PlayerSeasonStats;

// ---------------------------------------------------------------------------
// Feature set
// ---------------------------------------------------------------------------

/// Stats that feed the composite score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreFeature {
    GoalsPerGame,
    AssistsPerGame,
    MinutesPerGame,
    YellowCards,
    RedCards,
    MarketValue,
}

impl ScoreFeature {
    /// Fixed weight of this feature. Cards count against the player.
    pub fn weight(&self) -> f64 {
        match self {
            ScoreFeature::GoalsPerGame => 0.35,
            ScoreFeature::AssistsPerGame => 0.25,
            ScoreFeature::MinutesPerGame => 0.15,
            ScoreFeature::YellowCards => -0.10,
            ScoreFeature::RedCards => -0.15,
            ScoreFeature::MarketValue => 0.20,
        }
    }

    fn value(&self, s: &PlayerSeasonStats) -> f64 {
        match self {
            ScoreFeature::GoalsPerGame => s.goals_per_game,
            ScoreFeature::AssistsPerGame => s.assists_per_game,
            ScoreFeature::MinutesPerGame => s.minutes_per_game,
            ScoreFeature::YellowCards => s.yellow_cards,
            ScoreFeature::RedCards => s.red_cards,
            ScoreFeature::MarketValue => s.market_value_in_eur.unwrap_or(0.0),
        }
    }
}

const ALWAYS_SCORED: [ScoreFeature; 5] = [
    ScoreFeature::GoalsPerGame,
    ScoreFeature::AssistsPerGame,
    ScoreFeature::MinutesPerGame,
    ScoreFeature::YellowCards,
    ScoreFeature::RedCards,
];

// ---------------------------------------------------------------------------
// Min-max range
// ---------------------------------------------------------------------------

/// Observed range of one feature across the pool.
#[derive(Debug, Clone, Copy)]
pub struct FeatureRange {
    pub min: f64,
    pub max: f64,
}

/// Compute the min and max of a slice. An empty slice gives `0..0`.
pub fn compute_range(values: &[f64]) -> FeatureRange {
    let mut iter = values.iter().copied().filter(|v| v.is_finite());
    let Some(first) = iter.next() else {
        return FeatureRange { min: 0.0, max: 0.0 };
    };
    let (min, max) = iter.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v)));
    FeatureRange { min, max }
}

/// Scale a value into `[0, 1]`. A constant feature scales to 0.
pub fn normalize(value: f64, range: &FeatureRange) -> f64 {
    let span = range.max - range.min;
    if span <= 0.0 {
        return 0.0;
    }
    (value - range.min) / span
}

// ---------------------------------------------------------------------------
// Scoring
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredPlayer {
    #[serde(flatten)]
    pub stats: PlayerSeasonStats,
    pub score: f64,
}

/// Score every player in the pool, preserving input order.
///
/// Market value takes part only when at least one player carries it.
pub fn compute_player_scores(stats: Vec<PlayerSeasonStats>) -> Vec<ScoredPlayer> {
    let mut features: Vec<ScoreFeature> = ALWAYS_SCORED.to_vec();
    if stats.iter().any(|s| s.market_value_in_eur.is_some()) {
        features.push(ScoreFeature::MarketValue);
    }

    let ranges: Vec<FeatureRange> = features
        .iter()
        .map(|f| {
            let values: Vec<f64> = stats.iter().map(|s| f.value(s)).collect();
            compute_range(&values)
        })
        .collect();

    stats
        .into_iter()
        .map(|s| {
            let raw: f64 = features
                .iter()
                .zip(&ranges)
                .map(|(f, r)| normalize(f.value(&s), r) * f.weight())
                .sum();
            let score = ((raw * 100.0).clamp(0.0, 100.0) * 10.0).round() / 10.0;
            ScoredPlayer { stats: s, score }
        })
        .collect()
}

/// The `n` highest scores, best first. Ties keep input order.
pub fn top_scored(mut scored: Vec<ScoredPlayer>, n: usize) -> Vec<ScoredPlayer> {
    scored.sort_by(|a, b| b.score.total_cmp(&a.score));
    scored.truncate(n);
    scored
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(
        player_id: u64,
        gpg: f64,
        apg: f64,
        mpg: f64,
        yellow: f64,
        value: Option<f64>,
    ) -> PlayerSeasonStats {
        PlayerSeasonStats {
            player_id,
            name: None,
            position: None,
            image_url: None,
            market_value_in_eur: value,
            games_played: 10,
            goals: gpg * 10.0,
            assists: apg * 10.0,
            minutes_played: mpg * 10.0,
            yellow_cards: yellow,
            red_cards: 0.0,
            goals_per_game: gpg,
            assists_per_game: apg,
            minutes_per_game: mpg,
        }
    }

    #[test]
    fn range_and_normalize() {
        let r = compute_range(&[3.0, 1.0, 2.0]);
        assert_eq!(r.min, 1.0);
        assert_eq!(r.max, 3.0);
        assert!((normalize(2.0, &r) - 0.5).abs() < 1e-12);
        assert_eq!(normalize(5.0, &compute_range(&[5.0, 5.0])), 0.0);
        let empty = compute_range(&[]);
        assert_eq!(empty.min, 0.0);
        assert_eq!(empty.max, 0.0);
    }

    #[test]
    fn best_on_every_positive_feature_scores_highest() {
        let pool = vec![
            stats(1, 1.0, 0.5, 90.0, 0.0, Some(50.0)),
            stats(2, 0.0, 0.0, 10.0, 4.0, Some(1.0)),
            stats(3, 0.5, 0.25, 50.0, 2.0, Some(25.5)),
        ];
        let scored = compute_player_scores(pool);
        // Player 1: every positive feature at max, cards at min.
        assert!((scored[0].score - 95.0).abs() < 1e-9);
        // Player 2: every positive feature at min, yellow cards at max.
        assert_eq!(scored[1].score, 0.0);
        // Player 3: midpoint on all features: 0.5 * (0.95 - 0.10) = 0.425.
        assert!((scored[2].score - 42.5).abs() < 1e-9);
    }

    #[test]
    fn market_value_skipped_when_absent() {
        let pool = vec![
            stats(1, 1.0, 1.0, 90.0, 0.0, None),
            stats(2, 0.0, 0.0, 0.0, 0.0, None),
        ];
        let scored = compute_player_scores(pool);
        assert!((scored[0].score - 75.0).abs() < 1e-9);
        assert_eq!(scored[1].score, 0.0);
    }

    #[test]
    fn top_scored_orders_and_truncates() {
        let pool = vec![
            stats(1, 0.0, 0.0, 0.0, 0.0, None),
            stats(2, 1.0, 1.0, 90.0, 0.0, None),
            stats(3, 0.5, 0.5, 45.0, 0.0, None),
        ];
        let top = top_scored(compute_player_scores(pool), 2);
        let ids: Vec<u64> = top.iter().map(|s| s.stats.player_id).collect();
        assert_eq!(ids, vec![2, 3]);
    }
}
