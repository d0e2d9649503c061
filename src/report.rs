// HTML report rendering: the ranked standings table and the relative power
// matrix. Pure string building; the caller decides where the page goes.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::rankings::{RankingPeriod, StandingRow};

/// Everything the report needs, borrowed from the orchestrating caller.
pub struct Report<'a> {
    pub league_name: &'a str,
    pub season: u16,
    pub period: RankingPeriod,
    pub abbreviations: &'a BTreeMap<String, String>,
    pub rows: &'a [StandingRow],
    pub today: NaiveDate,
}

impl Report<'_> {
    fn abbr<'b>(&'b self, team: &'b str) -> &'b str {
        self.abbreviations
            .get(team)
            .map(String::as_str)
            .unwrap_or(team)
    }

    fn title(&self) -> String {
        match self.period {
            RankingPeriod::Week(week) => format!("Week {week}"),
            RankingPeriod::Season => "Season".to_string(),
        }
    }

    fn date_suffix(&self) -> String {
        match self.period {
            RankingPeriod::Week(_) => String::new(),
            RankingPeriod::Season => format!(" ({})", self.today.format("%Y-%m-%d")),
        }
    }
}

/// Format a winning percentage the box-score way: three decimals with the
/// leading zero stripped, e.g. `.667`.
fn fmt_pct(value: f64) -> String {
    let s = format!("{value:.3}");
    match s.strip_prefix('0') {
        Some(stripped) => stripped.to_string(),
        None => s,
    }
}

fn fmt_record(wins: u32, losses: u32, ties: u32) -> String {
    format!("{wins}-{losses}-{ties}")
}

/// Render the full rankings page.
pub fn render(report: &Report<'_>) -> String {
    let mut html = String::new();
    let title = report.title();
    let league = report.league_name;
    let season = report.season;

    html.push_str(&format!(
        "<html>\n<head>\n  <title>{league} {season} - {title}</title>\n  \
         <link rel=\"stylesheet\" type=\"text/css\" href=\"style.css\">\n</head>\n<body>\n"
    ));
    html.push_str(&format!(
        "  <h2>{league} {season} - {title} Power Rankings{}</h2>\n\n",
        report.date_suffix()
    ));

    render_standings(report, &mut html);
    render_matrix(report, &mut html);

    html.push_str(
        "  <br/>\n  * <i><b>Aggregate Winning Percentage (AWP)</b> - a team's combined \
         record against every other team for the period.</i>\n  <br/><br/>\n  \
         <a href=\"../rankings\">Other Weeks</a>\n</body>\n</html>\n",
    );
    html
}

fn render_standings(report: &Report<'_>, html: &mut String) {
    html.push_str("  <h3>Power Rankings</h3>\n  <table border=\"1\">\n");
    html.push_str(
        "    <tr><th>Rank</th><th>Team</th><th>Record</th><th>AWP</th><th>Opp AWP</th></tr>\n",
    );
    for row in report.rows {
        html.push_str(&format!(
            "    <tr><td>{}</td><td>{} ({})</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            row.rank,
            row.team,
            report.abbr(&row.team),
            fmt_record(row.wins, row.losses, row.ties),
            fmt_pct(row.awp),
            fmt_pct(row.opp_awp),
        ));
    }
    html.push_str("  </table>\n\n");
}

fn render_matrix(report: &Report<'_>, html: &mut String) {
    // Both axes ordered by abbreviation, matching the header row.
    let mut by_abbr: Vec<&StandingRow> = report.rows.iter().collect();
    by_abbr.sort_by(|a, b| report.abbr(&a.team).cmp(report.abbr(&b.team)));

    html.push_str("  <h3>Relative Power Matrix</h3>\n  <table border=\"1\">\n    <tr>\n      <th>TEAM</th>\n");
    for row in &by_abbr {
        html.push_str(&format!("      <th>{}</th>\n", report.abbr(&row.team)));
    }
    html.push_str(
        "      <th><acronym title=\"Aggregate Winning Percentage\">AWP*</acronym></th>\n    </tr>\n",
    );

    for row in &by_abbr {
        html.push_str("    <tr>\n");
        html.push_str(&format!("      <th>{}</th>\n", report.abbr(&row.team)));
        for opp in &by_abbr {
            if row.team == opp.team {
                html.push_str("      <td class=\"nomatchup\">&nbsp;</td>\n");
                continue;
            }
            let mut css = String::new();
            if row.matchup_opp.as_deref() == Some(opp.team.as_str()) {
                css.push_str("matchup ");
            }
            match row.power_row.get(&opp.team) {
                Some(record) => {
                    if record.wins > record.losses {
                        css.push_str("win");
                    } else if record.wins < record.losses {
                        css.push_str("loss");
                    } else {
                        css.push_str("tie");
                    }
                    html.push_str(&format!(
                        "      <td class=\"{css}\">{}</td>\n",
                        fmt_record(record.wins, record.losses, record.ties)
                    ));
                }
                None => html.push_str("      <td class=\"nomatchup\">&nbsp;</td>\n"),
            }
        }
        html.push_str(&format!(
            "      <td class=\"total\">{} ({})</td>\n    </tr>\n",
            fmt_record(row.wins, row.losses, row.ties),
            fmt_pct(row.awp)
        ));
    }
    html.push_str("  </table>\n");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rankings::pairwise::PairwiseRecord;

    fn abbrs() -> BTreeMap<String, String> {
        [
            ("Alpha".to_string(), "ALP".to_string()),
            ("Bravo".to_string(), "BRV".to_string()),
        ]
        .into_iter()
        .collect()
    }

    fn rows() -> Vec<StandingRow> {
        let rec = |wins, losses, ties| PairwiseRecord { wins, losses, ties };
        vec![
            StandingRow {
                rank: 1,
                team: "Bravo".to_string(),
                wins: 2,
                losses: 1,
                ties: 1,
                awp: 0.625,
                opp_awp: 0.5,
                matchup_opp: Some("Alpha".to_string()),
                power_row: [("Alpha".to_string(), rec(2, 1, 1))].into_iter().collect(),
            },
            StandingRow {
                rank: 2,
                team: "Alpha".to_string(),
                wins: 1,
                losses: 2,
                ties: 1,
                awp: 0.375,
                opp_awp: 0.5,
                matchup_opp: Some("Bravo".to_string()),
                power_row: [("Bravo".to_string(), rec(1, 2, 1))].into_iter().collect(),
            },
        ]
    }

    fn report<'a>(
        period: RankingPeriod,
        abbreviations: &'a BTreeMap<String, String>,
        rows: &'a [StandingRow],
    ) -> Report<'a> {
        Report {
            league_name: "Test League",
            season: 2015,
            period,
            abbreviations,
            rows,
            today: NaiveDate::from_ymd_opt(2015, 6, 1).unwrap(),
        }
    }

    #[test]
    fn strips_leading_zero_from_percentages() {
        assert_eq!(fmt_pct(0.625), ".625");
        assert_eq!(fmt_pct(0.5), ".500");
        assert_eq!(fmt_pct(1.0), "1.000");
        assert_eq!(fmt_pct(0.0), ".000");
    }

    #[test]
    fn weekly_title_names_the_week() {
        let abbrs = abbrs();
        let rows = rows();
        let html = render(&report(RankingPeriod::Week(7), &abbrs, &rows));
        assert!(html.contains("Week 7 Power Rankings</h2>"));
        assert!(html.contains("Bravo (BRV)"));
        assert!(html.contains(".625"));
    }

    #[test]
    fn season_title_carries_the_date() {
        let abbrs = abbrs();
        let rows = rows();
        let html = render(&report(RankingPeriod::Season, &abbrs, &rows));
        assert!(html.contains("Season Power Rankings (2015-06-01)</h2>"));
    }

    #[test]
    fn matrix_marks_matchup_and_outcome() {
        let abbrs = abbrs();
        let rows = rows();
        let html = render(&report(RankingPeriod::Week(7), &abbrs, &rows));
        assert!(html.contains("class=\"matchup win\">2-1-1"));
        assert!(html.contains("class=\"matchup loss\">1-2-1"));
        // Two diagonal cells.
        assert_eq!(html.matches("class=\"nomatchup\"").count(), 2);
    }

    #[test]
    fn unknown_abbreviation_falls_back_to_the_name() {
        let abbrs = BTreeMap::new();
        let rows = rows();
        let html = render(&report(RankingPeriod::Week(1), &abbrs, &rows));
        assert!(html.contains("Alpha (Alpha)"));
    }
}
