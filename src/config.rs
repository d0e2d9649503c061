// Configuration loading and parsing (rankings.toml).

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use chrono::{Datelike, NaiveDate};
use serde::Deserialize;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    Validation { field: String, message: String },
}

// ---------------------------------------------------------------------------
// Assembled Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Config {
    pub league: LeagueConfig,
    pub lower_better: HashSet<String>,
    pub opening_day: NaiveDate,
    pub rankings_url: String,
    pub credentials: Option<Credentials>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LeagueConfig {
    pub id: String,
    pub season: u16,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

// ---------------------------------------------------------------------------
// rankings.toml structs
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct ConfigFile {
    league: LeagueConfig,
    categories: CategoriesSection,
    season_start: SeasonStartSection,
    output: OutputSection,
    credentials: Option<Credentials>,
}

#[derive(Debug, Deserialize)]
struct CategoriesSection {
    #[serde(default)]
    lower_better: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct SeasonStartSection {
    year: i32,
    month: u32,
    day: u32,
}

#[derive(Debug, Deserialize)]
struct OutputSection {
    rankings_url: String,
}

// ---------------------------------------------------------------------------
// Loading and validation
// ---------------------------------------------------------------------------

pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })?;
    parse_config(&text, path)
}

fn parse_config(text: &str, path: &Path) -> Result<Config, ConfigError> {
    let file: ConfigFile = toml::from_str(text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    validate(file)
}

fn validate(file: ConfigFile) -> Result<Config, ConfigError> {
    if file.league.id.trim().is_empty() {
        return Err(ConfigError::Validation {
            field: "league.id".to_string(),
            message: "league id must not be empty".to_string(),
        });
    }
    if !(1990..=2100).contains(&file.league.season) {
        return Err(ConfigError::Validation {
            field: "league.season".to_string(),
            message: format!("implausible season year {}", file.league.season),
        });
    }
    let start = file.season_start;
    let opening_day = NaiveDate::from_ymd_opt(start.year, start.month, start.day).ok_or_else(
        || ConfigError::Validation {
            field: "season_start".to_string(),
            message: format!(
                "{}-{}-{} is not a valid date",
                start.year, start.month, start.day
            ),
        },
    )?;

    Ok(Config {
        league: file.league,
        lower_better: file.categories.lower_better.into_iter().collect(),
        opening_day,
        rankings_url: file.output.rankings_url,
        credentials: file.credentials,
    })
}

/// Infer the current matchup period from the season's opening day: the
/// ISO-week distance from the opening week, minus one for the site's
/// period numbering. None before the first period has completed.
pub fn default_week(opening_day: NaiveDate, today: NaiveDate) -> Option<u32> {
    let opening_week = i64::from(opening_day.iso_week().week());
    let this_week = i64::from(today.iso_week().week());
    let week = this_week - opening_week - 1;
    u32::try_from(week).ok().filter(|w| *w >= 1)
}
