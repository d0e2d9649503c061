// Strength of schedule: the combined record of a team's recent opponents,
// expressed as a single aggregate winning percentage.

use std::collections::BTreeMap;

use crate::rankings::error::RankingsError;
use crate::rankings::standings::{awp, TeamRecord};

/// Team -> opponents faced in the most recent completed matchup periods
/// (at most three), in the order they were played.
pub type Schedule = BTreeMap<String, Vec<String>>;

/// Compute each team's opponent aggregate winning percentage (OAWP).
///
/// The opponents' wins, losses, and ties are summed first and the AWP
/// formula is applied once to the sums; this weights each opponent by games
/// played rather than averaging their individual percentages.
///
/// `records` must be the season-cumulative records, so that schedule
/// strength always measures season-long opponent quality. An opponent
/// missing from `records` fails the computation, as does a team with no
/// completed periods (the undefined 0/0 ratio is surfaced, never defaulted).
pub fn opponent_awp(
    schedule: &Schedule,
    records: &BTreeMap<String, TeamRecord>,
) -> Result<BTreeMap<String, f64>, RankingsError> {
    let mut opp_awps = BTreeMap::new();
    for (team, opponents) in schedule {
        let mut wins = 0u32;
        let mut losses = 0u32;
        let mut ties = 0u32;
        for opponent in opponents {
            let record = records.get(opponent).ok_or_else(|| {
                RankingsError::MissingOpponent {
                    team: team.clone(),
                    opponent: opponent.clone(),
                }
            })?;
            wins += record.wins;
            losses += record.losses;
            ties += record.ties;
        }
        let oawp = awp(wins, losses, ties)
            .ok_or_else(|| RankingsError::UndefinedRatio { team: team.clone() })?;
        opp_awps.insert(team.clone(), oawp);
    }
    Ok(opp_awps)
}
