// Formation buckets and position-text classification.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Formation role a player is classified into for slot filling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Bucket {
    Goalkeeper,
    Defender,
    Midfielder,
    Attacker,
}

/// Buckets in the order they are tested and filled.
pub const BUCKET_ORDER: [Bucket; 4] = [
    Bucket::Goalkeeper,
    Bucket::Defender,
    Bucket::Midfielder,
    Bucket::Attacker,
];

/// Total players in a 4-3-3.
pub const LINEUP_SIZE: usize = 11;

impl Bucket {
    /// Number of slots this bucket holds in a 4-3-3.
    pub fn quota(&self) -> usize {
        match self {
            Bucket::Goalkeeper => 1,
            Bucket::Defender => 4,
            Bucket::Midfielder => 3,
            Bucket::Attacker => 3,
        }
    }

    /// Substrings that place a normalized position string in this bucket.
    pub fn keywords(&self) -> &'static [&'static str] {
        match self {
            Bucket::Goalkeeper => &["goalkeeper", "gk"],
            Bucket::Defender => &["defender", "def", "back"],
            Bucket::Midfielder => &["midfielder", "mid", "central"],
            Bucket::Attacker => &["attacking", "forward", "striker", "winger", "attack"],
        }
    }

    /// Short display label.
    pub fn display_str(&self) -> &'static str {
        match self {
            Bucket::Goalkeeper => "GK",
            Bucket::Defender => "DEF",
            Bucket::Midfielder => "MID",
            Bucket::Attacker => "ATT",
        }
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_str())
    }
}

/// Lowercase a raw position; a missing position is the empty string.
pub fn normalize_position(raw: Option<&str>) -> String {
    raw.map(|s| s.to_lowercase()).unwrap_or_default()
}

/// Classify a raw position string.
///
/// Rules are tested GK, DEF, MID, ATT and the first match wins, so
/// "Defensive Midfield" is a defender ("def"). `None` means the player is
/// unclassified and only eligible as backfill.
pub fn classify_position(raw: Option<&str>) -> Option<Bucket> {
    let normalized = normalize_position(raw);
    BUCKET_ORDER
        .iter()
        .copied()
        .find(|bucket| bucket.keywords().iter().any(|k| normalized.contains(k)))
}
