// Authenticated ESPN league client.
//
// Wraps a cookie-keeping reqwest client and knows the URLs for the league
// pages the rankings consume, plus the login and message-board endpoints.
// Page parsing lives in `pages`; this module only moves bytes.

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{Local, NaiveDate};
use tracing::{debug, info};

use crate::espn::{pages, EspnError};
use crate::rankings::totals::signed_totals;
use crate::rankings::{LeagueDataSource, Pairings, Schedule, TeamTotals};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

const FANTASY_BASE: &str = "http://games.espn.go.com/flb";
const LOGIN_URL: &str = "https://r.espn.go.com/espn/fantasy/login";

/// How many trailing matchup periods feed the strength-of-schedule window.
const MAX_SCHEDULE_PERIODS: usize = 3;

const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

// ---------------------------------------------------------------------------
// EspnClient
// ---------------------------------------------------------------------------

/// Session-holding client for one league and season.
pub struct EspnClient {
    http: reqwest::Client,
    league_id: String,
    season: u16,
    lower_better: HashSet<String>,
}

impl EspnClient {
    /// Build a client for the given league. `lower_better` names the
    /// scoring categories where a lower total is better (ERA, WHIP, ...).
    pub fn new(
        league_id: String,
        season: u16,
        lower_better: HashSet<String>,
    ) -> Result<Self, EspnError> {
        let http = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(Duration::from_secs(30))
            .user_agent(USER_AGENT)
            .build()
            .map_err(EspnError::Client)?;
        Ok(Self {
            http,
            league_id,
            season,
            lower_better,
        })
    }

    fn season_str(&self) -> String {
        self.season.to_string()
    }

    /// Log in to the ESPN fantasy system. Required for private leagues;
    /// the session cookie is kept for all subsequent page fetches.
    pub async fn login(&self, username: &str, password: &str) -> Result<(), EspnError> {
        let redirect = format!(
            "{FANTASY_BASE}/leagueoffice?leagueId={}&seasonId={}",
            self.league_id,
            self.season_str()
        );
        let params = [
            ("SUBMIT", "1"),
            ("aff_code", "espn_fantgames"),
            ("appRedirect", redirect.as_str()),
            ("cookieDomain", ".go.com"),
            ("multipleDomains", "true"),
            ("username", username),
            ("password", password),
            ("submit", "Sign In"),
            ("failedAttempts", "2"),
        ];
        info!("logging in to ESPN fantasy");
        self.http
            .post(LOGIN_URL)
            .form(&params)
            .send()
            .await
            .map_err(|source| EspnError::Http {
                url: LOGIN_URL.to_string(),
                source,
            })?;
        Ok(())
    }

    /// Post to the league message board.
    pub async fn post_message(&self, subject: &str, body: &str) -> Result<(), EspnError> {
        let url = format!("{FANTASY_BASE}/tools/postmessage");
        let redirect = format!("/flb/leagueoffice?leagueId={}", self.league_id);
        let season = self.season_str();
        let params = [
            ("leagueId", self.league_id.as_str()),
            ("seasonId", season.as_str()),
            ("subject", subject),
            ("body", body),
            ("btnSubmit", "Submit Message"),
            ("typeId", "0"),
            ("topicId", "0"),
            ("redir", redirect.as_str()),
            ("incoming", "1"),
        ];
        info!(subject, "posting to league message board");
        let response = self
            .http
            .post(&url)
            .form(&params)
            .send()
            .await
            .map_err(|source| EspnError::Http {
                url: url.clone(),
                source,
            })?;
        let status = response.status();
        if !status.is_success() {
            return Err(EspnError::Status { url, status });
        }
        Ok(())
    }

    /// Team name -> abbreviation map from the owner-info page.
    pub async fn team_abbreviations(
        &self,
    ) -> Result<std::collections::BTreeMap<String, String>, EspnError> {
        let html = self
            .get_page("leaguesetup/ownerinfo", &[])
            .await?;
        pages::parse_owner_info(&html)
    }

    /// Schedules of recently completed matchup periods, bounded to
    /// `MAX_SCHEDULE_PERIODS` and to periods ending strictly before `today`.
    pub async fn recent_schedules_as_of(&self, today: NaiveDate) -> Result<Schedule, EspnError> {
        let index = self.get_page("schedule", &[]).await?;
        let team_ids = pages::parse_team_ids(&index)?;
        debug!(teams = team_ids.len(), "fetching team schedules");

        let mut schedules = Schedule::new();
        for team_id in &team_ids {
            let html = self
                .get_page("schedule", &[("teamId", team_id)])
                .await?;
            let (team, matchups) = pages::parse_schedule(&html, i32::from(self.season))?;
            let mut opponents = Vec::new();
            for matchup in matchups.into_iter().take(MAX_SCHEDULE_PERIODS) {
                if matchup.end_date >= today {
                    break;
                }
                opponents.push(matchup.opponent);
            }
            schedules.insert(team, opponents);
        }
        Ok(schedules)
    }

    async fn get_page(
        &self,
        path: &str,
        extra: &[(&str, &str)],
    ) -> Result<String, EspnError> {
        let url = format!("{FANTASY_BASE}/{path}");
        let season = self.season_str();
        let mut params: Vec<(&str, &str)> = vec![
            ("leagueId", self.league_id.as_str()),
            ("seasonId", season.as_str()),
        ];
        params.extend_from_slice(extra);

        let response = self
            .http
            .get(&url)
            .query(&params)
            .send()
            .await
            .map_err(|source| EspnError::Http {
                url: url.clone(),
                source,
            })?;
        let status = response.status();
        if !status.is_success() {
            return Err(EspnError::Status { url, status });
        }
        let body = response.text().await.map_err(|source| EspnError::Http {
            url: url.clone(),
            source,
        })?;
        info!(url, bytes = body.len(), "fetched league page");
        Ok(body)
    }

    fn build_totals(&self, stats: Vec<pages::TeamStats>) -> anyhow::Result<TeamTotals> {
        let mut totals = TeamTotals::new();
        for team_stats in stats {
            let signed = signed_totals(&team_stats.raw, &self.lower_better)?;
            totals.insert(team_stats.team, signed)?;
        }
        Ok(totals)
    }
}

#[async_trait]
impl LeagueDataSource for EspnClient {
    async fn week_totals(&self, week: u32) -> anyhow::Result<(TeamTotals, Pairings)> {
        let week_str = week.to_string();
        let html = self
            .get_page("scoreboard", &[("matchupPeriodId", week_str.as_str())])
            .await?;
        let (stats, pairings) = pages::parse_scoreboard(&html)?;
        Ok((self.build_totals(stats)?, pairings))
    }

    async fn season_totals(&self) -> anyhow::Result<TeamTotals> {
        let html = self.get_page("standings", &[]).await?;
        let stats = pages::parse_standings(&html)?;
        self.build_totals(stats)
    }

    async fn recent_schedules(&self) -> anyhow::Result<Schedule> {
        Ok(self.recent_schedules_as_of(Local::now().date_naive()).await?)
    }
}
