// Signed category totals: raw stat values normalized so that "greater is
// better" holds for every category.

use std::collections::{BTreeMap, HashSet};

use crate::rankings::error::RankingsError;

// ---------------------------------------------------------------------------
// Stat extraction
// ---------------------------------------------------------------------------

/// Parse a team's raw `(value, category)` pairs into a vector of signed
/// totals. Values of lower-is-better categories (ERA, WHIP, ...) are negated
/// so every downstream comparison can treat a greater value as better.
///
/// The pairs must be positionally aligned with the league's category order;
/// no reordering is performed here. A value that does not parse as a number
/// fails the whole extraction -- no partial vector is returned.
pub fn signed_totals(
    raw: &[(String, String)],
    lower_better: &HashSet<String>,
) -> Result<Vec<f64>, RankingsError> {
    let mut totals = Vec::with_capacity(raw.len());
    for (value, category) in raw {
        let mut total: f64 = value.trim().parse().map_err(|e| RankingsError::Parse {
            value: value.clone(),
            category: category.clone(),
            source: e,
        })?;
        if lower_better.contains(category) {
            total = -total;
        }
        totals.push(total);
    }
    Ok(totals)
}

// ---------------------------------------------------------------------------
// TeamTotals
// ---------------------------------------------------------------------------

/// Signed totals for every team in the league, one vector per team in a
/// shared category order.
///
/// Insertion enforces the engine's precondition that every team carries the
/// same number of categories. Iteration order is lexical by team name
/// (BTreeMap), which is also the pre-rank ordering the standings tie-break
/// is defined against.
#[derive(Debug, Clone, Default)]
pub struct TeamTotals {
    category_count: Option<usize>,
    totals: BTreeMap<String, Vec<f64>>,
}

impl TeamTotals {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a team's signed totals. Fails with `CategoryMismatch` if the
    /// vector length differs from previously inserted teams.
    pub fn insert(&mut self, team: String, totals: Vec<f64>) -> Result<(), RankingsError> {
        match self.category_count {
            Some(expected) if expected != totals.len() => {
                return Err(RankingsError::CategoryMismatch {
                    team,
                    expected,
                    actual: totals.len(),
                });
            }
            Some(_) => {}
            None => self.category_count = Some(totals.len()),
        }
        self.totals.insert(team, totals);
        Ok(())
    }

    pub fn get(&self, team: &str) -> Option<&[f64]> {
        self.totals.get(team).map(Vec::as_slice)
    }

    /// Team names in lexical order.
    pub fn teams(&self) -> impl Iterator<Item = &str> {
        self.totals.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[f64])> {
        self.totals.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.totals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }

    /// Number of categories per team; 0 before the first insert.
    pub fn category_count(&self) -> usize {
        self.category_count.unwrap_or(0)
    }
}
