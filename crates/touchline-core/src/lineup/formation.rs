// 4-3-3 formation assembly.
//
// Each bucket takes its best natural candidates up to quota, then covers any
// shortfall from the best players not yet selected regardless of bucket.
// Attack is filled last, so leftover players land there. No player is ever
// selected twice.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::lineup::contribution::PlayerContribution;
use crate::lineup::position::{classify_position, Bucket, BUCKET_ORDER, LINEUP_SIZE};

/// A selected player and the slot they were assigned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineupEntry {
    pub player_id: u64,
    pub name: Option<String>,
    /// Raw position text from the players table.
    pub position: Option<String>,
    /// Slot the player fills. Backfilled players take the slot they filled,
    /// not their own classification.
    pub slot: Bucket,
    pub goals: f64,
    pub assists: f64,
    pub minutes_played: f64,
    pub contribution_score: f64,
    pub image_url: Option<String>,
}

impl LineupEntry {
    fn from_contribution(c: &PlayerContribution, slot: Bucket) -> Self {
        LineupEntry {
            player_id: c.player_id,
            name: c.name.clone(),
            position: c.position.clone(),
            slot,
            goals: c.goals,
            assists: c.assists,
            minutes_played: c.minutes_played,
            contribution_score: c.contribution_score,
            image_url: c.image_url.clone(),
        }
    }

    /// Name for display; players missing from the players table fall back
    /// to their id.
    pub fn display_name(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => format!("player #{}", self.player_id),
        }
    }
}

/// Up to eleven players ordered by descending contribution score.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Lineup {
    pub entries: Vec<LineupEntry>,
}

impl Lineup {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether all eleven slots are filled. A short lineup means the team
    /// had fewer than eleven distinct contributing players.
    pub fn is_complete(&self) -> bool {
        self.entries.len() == LINEUP_SIZE
    }

    /// Entries assigned to one slot, in presentation order.
    pub fn in_slot(&self, slot: Bucket) -> impl Iterator<Item = &LineupEntry> {
        self.entries.iter().filter(move |e| e.slot == slot)
    }

    pub fn into_entries(self) -> Vec<LineupEntry> {
        self.entries
    }
}

/// Indices into the candidate pool, best first, plus the exclusion set of
/// already-selected candidates.
struct Selection<'a> {
    pool: &'a [PlayerContribution],
    ranked: Vec<usize>,
    used: Vec<bool>,
}

impl<'a> Selection<'a> {
    fn new(pool: &'a [PlayerContribution]) -> Self {
        let mut ranked: Vec<usize> = (0..pool.len()).collect();
        // Stable: equal scores keep aggregation order.
        ranked.sort_by(|&a, &b| {
            pool[b]
                .contribution_score
                .total_cmp(&pool[a].contribution_score)
        });
        Selection {
            pool,
            ranked,
            used: vec![false; pool.len()],
        }
    }

    /// Take up to `n` of the best unused candidates accepted by `eligible`.
    fn take(&mut self, n: usize, eligible: impl Fn(usize) -> bool) -> Vec<usize> {
        let mut picked = Vec::with_capacity(n);
        for &idx in &self.ranked {
            if picked.len() == n {
                break;
            }
            if !self.used[idx] && eligible(idx) {
                picked.push(idx);
            }
        }
        for &idx in &picked {
            self.used[idx] = true;
        }
        picked
    }

    fn entries(&self, picked: &[usize], slot: Bucket) -> Vec<LineupEntry> {
        picked
            .iter()
            .map(|&idx| LineupEntry::from_contribution(&self.pool[idx], slot))
            .collect()
    }
}

/// Pick a 4-3-3 from a team's contribution pool.
///
/// Returns eleven players when the pool has at least eleven, otherwise every
/// player in the pool.
pub fn assemble_formation(pool: &[PlayerContribution]) -> Lineup {
    let classes: Vec<Option<Bucket>> = pool
        .iter()
        .map(|c| classify_position(c.position.as_deref()))
        .collect();
    let mut selection = Selection::new(pool);

    let mut groups: Vec<Vec<LineupEntry>> = Vec::with_capacity(BUCKET_ORDER.len());
    for bucket in BUCKET_ORDER {
        let quota = bucket.quota();
        let mut picked = selection.take(quota, |idx| classes[idx] == Some(bucket));

        let shortfall = quota - picked.len();
        if shortfall > 0 {
            let backfill = selection.take(shortfall, |_| true);
            debug!(
                slot = %bucket,
                natural = picked.len(),
                backfilled = backfill.len(),
                "bucket under quota"
            );
            picked.extend(backfill);
        }
        groups.push(selection.entries(&picked, bucket));
    }

    // Quotas sum to eleven and each bucket takes at most its quota, so the
    // attack backfill above already places every leftover player that fits.
    let mut entries: Vec<LineupEntry> = groups.into_iter().flatten().collect();
    entries.sort_by(|a, b| b.contribution_score.total_cmp(&a.contribution_score));

    Lineup { entries }
}
