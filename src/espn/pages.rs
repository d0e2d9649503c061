// Parsers for the ESPN league pages. All functions here are pure
// (`&str -> Result`), so they can be exercised against saved page
// fixtures without a network.
//
// The page formats are undocumented and change across seasons; each parser
// follows the structure observed on the scoreboard, standings, schedule,
// and owner-info pages and fails with a typed error when an expected
// element is missing.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::espn::EspnError;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn selector(s: &'static str) -> Result<Selector, EspnError> {
    Selector::parse(s).map_err(|_| EspnError::Selector(s.to_string()))
}

fn text_of(el: ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}

fn missing(selector: &str, page: &'static str) -> EspnError {
    EspnError::MissingElement {
        selector: selector.to_string(),
        page,
    }
}

// ---------------------------------------------------------------------------
// Scoreboard (weekly totals)
// ---------------------------------------------------------------------------

/// One team's raw stats as scraped: `(value, category)` string pairs in
/// page order, not yet parsed or polarity-signed.
#[derive(Debug, Clone)]
pub struct TeamStats {
    pub team: String,
    pub raw: Vec<(String, String)>,
}

/// Parse the weekly scoreboard page into per-team raw stats plus the
/// week's matchup pairings (both directions).
///
/// Each matchup block is a `tableHead` row, a category header row (whose
/// first and last cells are NAME and SCORE), and one stats row per team.
pub fn parse_scoreboard(
    html: &str,
) -> Result<(Vec<TeamStats>, BTreeMap<String, String>), EspnError> {
    let doc = Html::parse_document(html);
    let matchups_sel = selector(r#"[id="scoreboardMatchups"]"#)?;
    let tr_sel = selector("tr")?;
    let th_sel = selector("th")?;
    let name_sel = selector("td.teamName a")?;
    let total_sel = selector(r#"td[id^="total_"]"#)?;

    let mut stats = Vec::new();
    let mut pairings = BTreeMap::new();

    for table in doc.select(&matchups_sel) {
        let rows: Vec<ElementRef<'_>> = table.select(&tr_sel).collect();
        for (i, row) in rows.iter().enumerate() {
            if !row.value().classes().any(|c| c == "tableHead") {
                continue;
            }
            let cat_row = rows
                .get(i + 1)
                .ok_or_else(|| missing("tr (categories)", "scoreboard"))?;
            let headers: Vec<String> = cat_row.select(&th_sel).map(text_of).collect();
            if headers.len() < 3 {
                return Err(missing("th (categories)", "scoreboard"));
            }
            // First column is NAME and last is SCORE.
            let categories = &headers[1..headers.len() - 1];

            let mut matchup_teams = Vec::with_capacity(2);
            for offset in [2usize, 3] {
                let team_row = rows
                    .get(i + offset)
                    .ok_or_else(|| missing("tr (team stats)", "scoreboard"))?;
                let team = team_row
                    .select(&name_sel)
                    .next()
                    .map(text_of)
                    .ok_or_else(|| missing("td.teamName a", "scoreboard"))?;
                let raw: Vec<(String, String)> = team_row
                    .select(&total_sel)
                    .map(text_of)
                    .zip(categories.iter().cloned())
                    .collect();
                matchup_teams.push(team.clone());
                stats.push(TeamStats { team, raw });
            }
            pairings.insert(matchup_teams[0].clone(), matchup_teams[1].clone());
            pairings.insert(matchup_teams[1].clone(), matchup_teams[0].clone());
        }
    }
    Ok((stats, pairings))
}

// ---------------------------------------------------------------------------
// Standings (season-to-date totals)
// ---------------------------------------------------------------------------

/// Parse the standings page's stats table into per-team raw stats.
pub fn parse_standings(html: &str) -> Result<Vec<TeamStats>, EspnError> {
    let doc = Html::parse_document(html);
    let table_sel = selector("#statsTable")?;
    let subhead_sel = selector("tr.tableSubHead")?;
    let cat_sel = selector(r#"td[style="width:50px;"] a"#)?;
    let row_sel = selector("tr.tableBody.sortableRow")?;
    let name_sel = selector("td.sortableTeamName a")?;
    let total_sel = selector(r#"td[id^="tmTotalStat"]"#)?;

    let table = doc
        .select(&table_sel)
        .next()
        .ok_or_else(|| missing("#statsTable", "standings"))?;

    // The category names live in the second sub-head row.
    let subhead = table
        .select(&subhead_sel)
        .nth(1)
        .ok_or_else(|| missing("tr.tableSubHead", "standings"))?;
    let categories: Vec<String> = subhead.select(&cat_sel).map(text_of).collect();
    if categories.is_empty() {
        return Err(missing(r#"td[style="width:50px;"] a"#, "standings"));
    }

    let mut stats = Vec::new();
    for row in table.select(&row_sel) {
        let team = row
            .select(&name_sel)
            .next()
            .map(text_of)
            .ok_or_else(|| missing("td.sortableTeamName a", "standings"))?;
        let raw: Vec<(String, String)> = row
            .select(&total_sel)
            .map(text_of)
            .zip(categories.iter().cloned())
            .collect();
        stats.push(TeamStats { team, raw });
    }
    Ok(stats)
}

// ---------------------------------------------------------------------------
// Schedule pages
// ---------------------------------------------------------------------------

/// Parse the team ids out of the schedule page's team selector. The first
/// option is "All" and is dropped.
pub fn parse_team_ids(html: &str) -> Result<Vec<String>, EspnError> {
    let doc = Html::parse_document(html);
    let option_sel = selector("div.bodyCopy select option")?;
    let ids: Vec<String> = doc
        .select(&option_sel)
        .skip(1)
        .filter_map(|o| o.value().attr("value").map(str::to_string))
        .collect();
    if ids.is_empty() {
        return Err(missing("div.bodyCopy select option", "schedule"));
    }
    Ok(ids)
}

/// One completed-or-upcoming matchup period on a team's schedule page.
#[derive(Debug, Clone)]
pub struct MatchupRow {
    pub end_date: NaiveDate,
    pub opponent: String,
}

/// Parse a single team's schedule page: the team name from the page
/// heading and each matchup row's period end date and opponent.
///
/// The date range inside parentheses reads `(MON x - y)` when the period
/// starts and ends in the same month, and `(MON x - MON y)` otherwise.
/// Rows past the end of the season lose their opponent column and
/// terminate the list.
pub fn parse_schedule(
    html: &str,
    season_year: i32,
) -> Result<(String, Vec<MatchupRow>), EspnError> {
    let doc = Html::parse_document(html);
    let h1_sel = selector("h1")?;
    let tr_sel = selector("tr")?;
    let td_sel = selector("td")?;
    let a_sel = selector("a")?;

    // The second heading reads "Team Name Schedule".
    let heading = doc
        .select(&h1_sel)
        .nth(1)
        .map(text_of)
        .ok_or_else(|| missing("h1", "schedule"))?;
    let team = heading
        .strip_suffix("Schedule")
        .unwrap_or(&heading)
        .trim()
        .to_string();

    let cross_month =
        Regex::new(r"^\w{3}\s\d+ - \w{3}\s\d+").map_err(|_| EspnError::Selector(
            "matchup date regex".to_string(),
        ))?;

    let mut matchups = Vec::new();
    for row in doc.select(&tr_sel).skip(3) {
        let tds: Vec<ElementRef<'_>> = row.select(&td_sel).collect();
        let label = match tds.first() {
            Some(td) => text_of(*td),
            None => continue,
        };
        if !label.starts_with("Matchup") {
            continue;
        }
        // Once the season is over the row shape changes and the opponent
        // column disappears.
        if tds.len() < 4 {
            break;
        }

        let open = label.find('(').ok_or_else(|| EspnError::Date {
            text: label.clone(),
        })?;
        let close = label.find(')').ok_or_else(|| EspnError::Date {
            text: label.clone(),
        })?;
        let range = &label[open + 1..close];
        let end_str = if cross_month.is_match(range) {
            range
                .split('-')
                .nth(1)
                .unwrap_or(range)
                .trim()
                .to_string()
        } else {
            // Same-month ranges keep only one month name; take it plus the
            // trailing day. Ranges too short for either are malformed.
            let month = range.get(..3).ok_or_else(|| EspnError::Date {
                text: range.to_string(),
            })?;
            let day = range
                .get(range.len().saturating_sub(2)..)
                .ok_or_else(|| EspnError::Date {
                    text: range.to_string(),
                })?;
            format!("{month} {}", day.trim())
        };
        let end_date =
            NaiveDate::parse_from_str(&format!("{season_year} {end_str}"), "%Y %b %d")
                .map_err(|_| EspnError::Date {
                    text: range.to_string(),
                })?;

        // Some seasons add a record column, but the opponent is always the
        // second-to-last cell.
        let opponent = tds[tds.len() - 2]
            .select(&a_sel)
            .next()
            .map(text_of)
            .ok_or_else(|| missing("td a (opponent)", "schedule"))?;
        matchups.push(MatchupRow { end_date, opponent });
    }
    Ok((team, matchups))
}

// ---------------------------------------------------------------------------
// Owner info (team abbreviations)
// ---------------------------------------------------------------------------

/// Parse the owner-info page into a team name -> abbreviation map.
pub fn parse_owner_info(html: &str) -> Result<BTreeMap<String, String>, EspnError> {
    let doc = Html::parse_document(html);
    let row_sel = selector("tr.ownerRow")?;
    let td_sel = selector("td")?;
    let a_sel = selector("a")?;
    let numbered = Regex::new(r"^[0-9]+")
        .map_err(|_| EspnError::Selector("owner row regex".to_string()))?;

    let mut abbreviations = BTreeMap::new();
    for row in doc.select(&row_sel) {
        let tds: Vec<ElementRef<'_>> = row.select(&td_sel).collect();
        if tds.len() < 3 || !numbered.is_match(&text_of(tds[0])) {
            continue;
        }
        let abbr = text_of(tds[1]);
        let team = tds[2]
            .select(&a_sel)
            .next()
            .map(text_of)
            .ok_or_else(|| missing("td a (team name)", "owner info"))?;
        abbreviations.insert(team, abbr);
    }
    if abbreviations.is_empty() {
        return Err(missing("tr.ownerRow", "owner info"));
    }
    Ok(abbreviations)
}
