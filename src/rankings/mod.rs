// Power rankings core: pairwise category records, standings, and strength
// of schedule, driven by a pluggable league data source.
//
// The computation pipeline is one-directional:
// signed totals -> pairwise matrix -> standings -> (+ schedules) -> rows.
// Every structure is built once and never mutated afterwards, and any
// failure in a sub-step aborts the whole ranking with no partial output.

pub mod error;
pub mod pairwise;
pub mod schedule;
pub mod standings;
pub mod totals;

use std::collections::BTreeMap;

use async_trait::async_trait;

pub use error::RankingsError;
pub use pairwise::{power_matrix, PairwiseRecord, PowerMatrix};
pub use schedule::Schedule;
pub use standings::{StandingRow, TeamRecord};
pub use totals::TeamTotals;

/// The span of play a ranking covers: one matchup period, or the season to
/// date. The only behavioral differences are where the totals come from and
/// whether teams carry a current-period opponent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankingPeriod {
    Week(u32),
    Season,
}

/// Matchup pairings for a single period: team -> current opponent, both
/// directions present. Empty for season rankings.
pub type Pairings = BTreeMap<String, String>;

/// Source of league data for a ranking run. Implemented by the ESPN client
/// for live pages and by in-memory fixtures in tests.
#[async_trait]
pub trait LeagueDataSource {
    /// Signed totals and matchup pairings for one matchup period.
    async fn week_totals(&self, week: u32) -> anyhow::Result<(TeamTotals, Pairings)>;

    /// Signed season-to-date totals. No pairings.
    async fn season_totals(&self) -> anyhow::Result<TeamTotals>;

    /// Opponents faced by each team in the most recent completed matchup
    /// periods (at most three per team).
    async fn recent_schedules(&self) -> anyhow::Result<Schedule>;
}

/// Compute the full rankings for `period`.
///
/// Strength of schedule is always measured against the season-cumulative
/// records, even when the main ranking covers a single week, so the OAWP
/// column means the same thing in both variants.
pub async fn compute_rankings<S>(
    source: &S,
    period: RankingPeriod,
) -> anyhow::Result<Vec<StandingRow>>
where
    S: LeagueDataSource + Sync,
{
    let (period_totals, pairings) = match period {
        RankingPeriod::Week(week) => source.week_totals(week).await?,
        RankingPeriod::Season => (source.season_totals().await?, Pairings::new()),
    };
    let matrix = power_matrix(&period_totals);
    let records = standings::team_records(&matrix, &pairings);

    let season_records = match period {
        RankingPeriod::Week(_) => {
            let season_totals = source.season_totals().await?;
            standings::team_records(&power_matrix(&season_totals), &Pairings::new())
        }
        RankingPeriod::Season => records.clone(),
    };

    let schedules = source.recent_schedules().await?;
    let opp_awps = schedule::opponent_awp(&schedules, &season_records)?;

    let rows = standings::standings(&records, &opp_awps)?;
    Ok(rows)
}
