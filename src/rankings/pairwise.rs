// Pairwise category records: every team's win/loss/tie count against every
// other team, category by category.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::rankings::totals::TeamTotals;

/// Category win/loss/tie counts for one ordered (team, opponent) pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PairwiseRecord {
    pub wins: u32,
    pub losses: u32,
    pub ties: u32,
}

impl PairwiseRecord {
    /// Compare two signed totals vectors element-wise. Exact float equality
    /// counts as a tie: the site publishes low-precision decimals, and equal
    /// displayed values must split the category.
    fn compare(mine: &[f64], theirs: &[f64]) -> Self {
        let mut record = PairwiseRecord::default();
        for (a, b) in mine.iter().zip(theirs) {
            match a.partial_cmp(b) {
                Some(Ordering::Greater) => record.wins += 1,
                Some(Ordering::Less) => record.losses += 1,
                _ => record.ties += 1,
            }
        }
        record
    }
}

/// Team -> opponent -> record, for every ordered pair with team != opponent.
pub type PowerMatrix = BTreeMap<String, BTreeMap<String, PairwiseRecord>>;

/// Compute the full pairwise record matrix. Pure function of the totals;
/// O(N^2 * C) for N teams and C categories, which is trivial at league
/// sizes (N <= 20). Equal category counts across teams are guaranteed by
/// `TeamTotals` at construction.
pub fn power_matrix(totals: &TeamTotals) -> PowerMatrix {
    let mut matrix = PowerMatrix::new();
    for (team, mine) in totals.iter() {
        let mut row = BTreeMap::new();
        for (opponent, theirs) in totals.iter() {
            if team == opponent {
                continue;
            }
            row.insert(
                opponent.to_string(),
                PairwiseRecord::compare(mine, theirs),
            );
        }
        matrix.insert(team.to_string(), row);
    }
    matrix
}
