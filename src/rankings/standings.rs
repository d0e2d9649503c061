// Standings: aggregate pairwise records into per-team totals, compute
// aggregate winning percentage, and assign ranks.

use std::collections::BTreeMap;

use crate::rankings::error::RankingsError;
use crate::rankings::pairwise::{PairwiseRecord, PowerMatrix};

// ---------------------------------------------------------------------------
// TeamRecord
// ---------------------------------------------------------------------------

/// A team's aggregate record over every opponent, plus the per-opponent
/// breakdown and the current matchup opponent when a single matchup period
/// is being ranked.
#[derive(Debug, Clone, Default)]
pub struct TeamRecord {
    pub wins: u32,
    pub losses: u32,
    pub ties: u32,
    pub opp_records: BTreeMap<String, PairwiseRecord>,
    pub matchup_opp: Option<String>,
}

impl TeamRecord {
    pub fn games(&self) -> u32 {
        self.wins + self.losses + self.ties
    }
}

/// Aggregate winning percentage: `(wins + ties/2) / (wins + losses + ties)`.
/// Undefined (None) when no games were counted.
pub fn awp(wins: u32, losses: u32, ties: u32) -> Option<f64> {
    let games = wins + losses + ties;
    if games == 0 {
        return None;
    }
    Some((f64::from(wins) + f64::from(ties) / 2.0) / f64::from(games))
}

/// Sum each team's pairwise records into a `TeamRecord`, attaching the
/// current matchup opponent from `pairings` (empty for season rankings).
pub fn team_records(
    matrix: &PowerMatrix,
    pairings: &BTreeMap<String, String>,
) -> BTreeMap<String, TeamRecord> {
    let mut records = BTreeMap::new();
    for (team, row) in matrix {
        let mut record = TeamRecord {
            matchup_opp: pairings.get(team).cloned(),
            ..TeamRecord::default()
        };
        for (opponent, pairwise) in row {
            record.wins += pairwise.wins;
            record.losses += pairwise.losses;
            record.ties += pairwise.ties;
            record.opp_records.insert(opponent.clone(), *pairwise);
        }
        records.insert(team.clone(), record);
    }
    records
}

// ---------------------------------------------------------------------------
// StandingRow
// ---------------------------------------------------------------------------

/// One row of the final rankings output.
#[derive(Debug, Clone)]
pub struct StandingRow {
    pub rank: u32,
    pub team: String,
    pub wins: u32,
    pub losses: u32,
    pub ties: u32,
    pub awp: f64,
    pub opp_awp: f64,
    pub matchup_opp: Option<String>,
    pub power_row: BTreeMap<String, PairwiseRecord>,
}

/// Build ranked standings from team records and precomputed opponent AWPs.
///
/// Teams start in lexical name order (BTreeMap iteration) and are stable
/// sorted by AWP descending, so equal AWPs break alphabetically by team
/// name. Ranks are dense, 1..N, and the returned rows are ordered by rank.
///
/// A team with zero games (impossible with two or more teams) or with no
/// opponent-AWP entry (no qualifying schedule periods) fails the whole
/// computation.
pub fn standings(
    records: &BTreeMap<String, TeamRecord>,
    opp_awps: &BTreeMap<String, f64>,
) -> Result<Vec<StandingRow>, RankingsError> {
    let mut rows = Vec::with_capacity(records.len());
    for (team, record) in records {
        let awp = awp(record.wins, record.losses, record.ties).ok_or_else(|| {
            RankingsError::UndefinedRatio { team: team.clone() }
        })?;
        let opp_awp = opp_awps
            .get(team)
            .copied()
            .ok_or_else(|| RankingsError::UndefinedRatio { team: team.clone() })?;
        rows.push(StandingRow {
            rank: 0,
            team: team.clone(),
            wins: record.wins,
            losses: record.losses,
            ties: record.ties,
            awp,
            opp_awp,
            matchup_opp: record.matchup_opp.clone(),
            power_row: record.opp_records.clone(),
        });
    }

    // Stable sort keeps the lexical pre-ordering for equal AWPs.
    rows.sort_by(|a, b| b.awp.total_cmp(&a.awp));
    for (i, row) in rows.iter_mut().enumerate() {
        row.rank = (i + 1) as u32;
    }
    Ok(rows)
}
