// Integration tests for the power rankings pipeline.
//
// These tests exercise the full computation end-to-end through the library
// crate's public API, using an in-memory LeagueDataSource fixture in place
// of the live ESPN pages: period totals -> pairwise matrix -> standings ->
// strength of schedule -> final rows.

use std::collections::BTreeMap;

use power_rankings::rankings::{
    compute_rankings, LeagueDataSource, Pairings, RankingPeriod, RankingsError, Schedule,
    StandingRow, TeamTotals,
};

// ===========================================================================
// Fixture data source
// ===========================================================================

struct FixtureSource {
    week_totals: TeamTotals,
    pairings: Pairings,
    season_totals: TeamTotals,
    schedules: Schedule,
}

#[async_trait::async_trait]
impl LeagueDataSource for FixtureSource {
    async fn week_totals(&self, _week: u32) -> anyhow::Result<(TeamTotals, Pairings)> {
        Ok((self.week_totals.clone(), self.pairings.clone()))
    }

    async fn season_totals(&self) -> anyhow::Result<TeamTotals> {
        Ok(self.season_totals.clone())
    }

    async fn recent_schedules(&self) -> anyhow::Result<Schedule> {
        Ok(self.schedules.clone())
    }
}

fn totals(entries: &[(&str, &[f64])]) -> TeamTotals {
    let mut t = TeamTotals::new();
    for (team, values) in entries {
        t.insert(team.to_string(), values.to_vec()).unwrap();
    }
    t
}

fn schedule(entries: &[(&str, &[&str])]) -> Schedule {
    entries
        .iter()
        .map(|(team, opponents)| {
            (
                team.to_string(),
                opponents.iter().map(|o| o.to_string()).collect(),
            )
        })
        .collect()
}

/// A four-team league where the weekly scoreboard and the season standings
/// disagree, so tests can tell which snapshot fed each number.
fn four_team_source() -> FixtureSource {
    let week_totals = totals(&[
        ("Aces", &[10.0, 5.0, 3.0]),
        ("Bears", &[8.0, 6.0, 2.0]),
        ("Colts", &[9.0, 7.0, 1.0]),
        ("Dukes", &[7.0, 4.0, 4.0]),
    ]);
    let pairings: Pairings = [
        ("Aces", "Bears"),
        ("Bears", "Aces"),
        ("Colts", "Dukes"),
        ("Dukes", "Colts"),
    ]
    .into_iter()
    .map(|(a, b)| (a.to_string(), b.to_string()))
    .collect();
    // Season records work out to Aces 4-5, Bears 3-6, Colts 5-4, Dukes 6-3.
    let season_totals = totals(&[
        ("Aces", &[30.0, 20.0, 10.0]),
        ("Bears", &[40.0, 10.0, 5.0]),
        ("Colts", &[20.0, 30.0, 15.0]),
        ("Dukes", &[10.0, 40.0, 20.0]),
    ]);
    let schedules = schedule(&[
        ("Aces", &["Bears", "Colts"]),
        ("Bears", &["Aces", "Dukes"]),
        ("Colts", &["Dukes"]),
        ("Dukes", &["Colts", "Aces", "Bears"]),
    ]);
    FixtureSource {
        week_totals,
        pairings,
        season_totals,
        schedules,
    }
}

fn row<'a>(rows: &'a [StandingRow], team: &str) -> &'a StandingRow {
    rows.iter().find(|r| r.team == team).unwrap()
}

// ===========================================================================
// Weekly rankings end-to-end
// ===========================================================================

#[tokio::test]
async fn weekly_rankings_rank_by_weekly_awp() {
    let source = four_team_source();
    let rows = compute_rankings(&source, RankingPeriod::Week(5)).await.unwrap();

    let order: Vec<(&str, u32)> = rows.iter().map(|r| (r.team.as_str(), r.rank)).collect();
    assert_eq!(
        order,
        vec![("Aces", 1), ("Colts", 2), ("Bears", 3), ("Dukes", 4)]
    );
    assert_eq!(row(&rows, "Aces").awp, 6.0 / 9.0);
    assert_eq!(row(&rows, "Colts").awp, 5.0 / 9.0);
    assert_eq!(row(&rows, "Bears").awp, 4.0 / 9.0);
    assert_eq!(row(&rows, "Dukes").awp, 3.0 / 9.0);
}

#[tokio::test]
async fn weekly_rankings_carry_matchup_opponents() {
    let source = four_team_source();
    let rows = compute_rankings(&source, RankingPeriod::Week(5)).await.unwrap();
    assert_eq!(row(&rows, "Aces").matchup_opp.as_deref(), Some("Bears"));
    assert_eq!(row(&rows, "Dukes").matchup_opp.as_deref(), Some("Colts"));
}

#[tokio::test]
async fn schedule_strength_uses_season_records_not_weekly() {
    let source = four_team_source();
    let rows = compute_rankings(&source, RankingPeriod::Week(5)).await.unwrap();

    // Opponent records summed from the *season* snapshot:
    // Aces faced Bears (3-6) and Colts (5-4) -> 8-10 -> 8/18.
    assert_eq!(row(&rows, "Aces").opp_awp, 8.0 / 18.0);
    // Bears faced Aces (4-5) and Dukes (6-3) -> 10-8 -> 10/18.
    assert_eq!(row(&rows, "Bears").opp_awp, 10.0 / 18.0);
    // Colts faced Dukes (6-3) -> 6/9.
    assert_eq!(row(&rows, "Colts").opp_awp, 6.0 / 9.0);
    // Dukes faced everyone -> 12-15 -> 12/27.
    assert_eq!(row(&rows, "Dukes").opp_awp, 12.0 / 27.0);
}

// ===========================================================================
// Season rankings end-to-end
// ===========================================================================

#[tokio::test]
async fn season_rankings_have_no_matchup_opponents() {
    let source = four_team_source();
    let rows = compute_rankings(&source, RankingPeriod::Season).await.unwrap();

    let order: Vec<(&str, u32)> = rows.iter().map(|r| (r.team.as_str(), r.rank)).collect();
    assert_eq!(
        order,
        vec![("Dukes", 1), ("Colts", 2), ("Aces", 3), ("Bears", 4)]
    );
    assert!(rows.iter().all(|r| r.matchup_opp.is_none()));
    // Same schedules, same season records, so the OAWP column matches the
    // weekly run's.
    assert_eq!(row(&rows, "Dukes").opp_awp, 12.0 / 27.0);
}

// ===========================================================================
// Worked scenario from the original league pages
// ===========================================================================

#[tokio::test]
async fn three_team_two_category_scenario() {
    let week = totals(&[
        ("A", &[10.0, 5.0]),
        ("B", &[8.0, 6.0]),
        ("C", &[9.0, 7.0]),
    ]);
    let source = FixtureSource {
        week_totals: week.clone(),
        pairings: Pairings::new(),
        season_totals: week,
        schedules: schedule(&[("A", &["B"]), ("B", &["C"]), ("C", &["A"])]),
    };
    let rows = compute_rankings(&source, RankingPeriod::Week(1)).await.unwrap();

    assert_eq!(row(&rows, "A").awp, 0.5);
    assert_eq!(row(&rows, "B").awp, 0.25);
    assert_eq!(row(&rows, "C").awp, 0.75);
    assert_eq!(row(&rows, "C").rank, 1);
    assert_eq!(row(&rows, "A").rank, 2);
    assert_eq!(row(&rows, "B").rank, 3);
}

// ===========================================================================
// Structural properties
// ===========================================================================

#[tokio::test]
async fn records_sum_to_opponents_times_categories() {
    let source = four_team_source();
    let rows = compute_rankings(&source, RankingPeriod::Week(2)).await.unwrap();
    for r in &rows {
        // 3 opponents x 3 categories.
        assert_eq!(r.wins + r.losses + r.ties, 9, "team {}", r.team);
        assert!((0.0..=1.0).contains(&r.awp));
        assert!((0.0..=1.0).contains(&r.opp_awp));
    }
}

#[tokio::test]
async fn power_rows_are_mutually_consistent() {
    let source = four_team_source();
    let rows = compute_rankings(&source, RankingPeriod::Week(2)).await.unwrap();
    for r in &rows {
        for (opponent, record) in &r.power_row {
            let mirror = row(&rows, opponent).power_row[&r.team];
            assert_eq!(record.wins, mirror.losses);
            assert_eq!(record.losses, mirror.wins);
            assert_eq!(record.ties, mirror.ties);
        }
    }
}

#[tokio::test]
async fn ranks_are_a_permutation() {
    let source = four_team_source();
    let rows = compute_rankings(&source, RankingPeriod::Season).await.unwrap();
    let mut ranks: Vec<u32> = rows.iter().map(|r| r.rank).collect();
    ranks.sort_unstable();
    assert_eq!(ranks, vec![1, 2, 3, 4]);
}

// ===========================================================================
// Failure propagation
// ===========================================================================

#[tokio::test]
async fn unknown_scheduled_opponent_aborts_the_ranking() {
    let mut source = four_team_source();
    source.schedules =
        schedule(&[("Aces", &["Ghosts"]), ("Bears", &["Aces"]), ("Colts", &["Aces"]), ("Dukes", &["Aces"])]);
    let err = compute_rankings(&source, RankingPeriod::Week(1))
        .await
        .unwrap_err();
    match err.downcast_ref::<RankingsError>() {
        Some(RankingsError::MissingOpponent { team, opponent }) => {
            assert_eq!(team, "Aces");
            assert_eq!(opponent, "Ghosts");
        }
        other => panic!("expected MissingOpponent, got {other:?}"),
    }
}

#[tokio::test]
async fn empty_schedule_aborts_the_ranking() {
    let mut source = four_team_source();
    source
        .schedules
        .insert("Aces".to_string(), Vec::new());
    let err = compute_rankings(&source, RankingPeriod::Week(1))
        .await
        .unwrap_err();
    match err.downcast_ref::<RankingsError>() {
        Some(RankingsError::UndefinedRatio { team }) => assert_eq!(team, "Aces"),
        other => panic!("expected UndefinedRatio, got {other:?}"),
    }
}

#[tokio::test]
async fn team_missing_from_schedule_data_aborts_the_ranking() {
    let mut source = four_team_source();
    source.schedules.remove("Dukes");
    let err = compute_rankings(&source, RankingPeriod::Week(1))
        .await
        .unwrap_err();
    match err.downcast_ref::<RankingsError>() {
        Some(RankingsError::UndefinedRatio { team }) => assert_eq!(team, "Dukes"),
        other => panic!("expected UndefinedRatio, got {other:?}"),
    }
}
