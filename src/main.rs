// Power rankings entry point.
//
// Run sequence:
// 1. Initialize tracing (stderr; stdout carries the HTML report)
// 2. Parse command-line arguments, load config
// 3. Determine the ranking period (explicit week, season, or inferred week)
// 4. Build the ESPN client and log in when credentials are configured
// 5. Fetch team abbreviations, compute the rankings
// 6. Render the HTML report to stdout
// 7. Optionally post a link to the league message board

use power_rankings::cli::Cli;
use power_rankings::config;
use power_rankings::espn::EspnClient;
use power_rankings::rankings::{self, RankingPeriod};
use power_rankings::report;

use anyhow::Context;
use clap::Parser;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize tracing
    init_tracing()?;

    // 2. Arguments and config
    let cli = Cli::parse();
    let config = config::load_config(&cli.config).context("failed to load configuration")?;
    info!(
        "Config loaded: league={} ({}), season {}",
        config.league.name, config.league.id, config.league.season
    );

    // 3. Ranking period
    let today = chrono::Local::now().date_naive();
    let period = if cli.season {
        RankingPeriod::Season
    } else {
        match cli.week {
            Some(week) => RankingPeriod::Week(week),
            None => {
                let week = config::default_week(config.opening_day, today)
                    .context("could not infer the current week; pass --week or --season")?;
                RankingPeriod::Week(week)
            }
        }
    };
    info!(?period, "computing rankings");

    // 4. ESPN client
    let client = EspnClient::new(
        config.league.id.clone(),
        config.league.season,
        config.lower_better.clone(),
    )
    .context("failed to build ESPN client")?;
    if let Some(credentials) = &config.credentials {
        client
            .login(&credentials.username, &credentials.password)
            .await
            .context("ESPN login failed")?;
    }

    // 5. Abbreviations and rankings
    let abbreviations = client
        .team_abbreviations()
        .await
        .context("failed to fetch team abbreviations")?;
    let rows = rankings::compute_rankings(&client, period)
        .await
        .context("failed to compute rankings")?;
    info!(teams = rows.len(), "rankings computed");

    // 6. Render
    let page = report::render(&report::Report {
        league_name: &config.league.name,
        season: config.league.season,
        period,
        abbreviations: &abbreviations,
        rows: &rows,
        today,
    });
    println!("{page}");

    // 7. Message board
    if cli.post_message {
        let (subject, period_text) = match period {
            RankingPeriod::Week(week) => {
                (format!("Week {week} Power Rankings"), format!("week {week}"))
            }
            RankingPeriod::Season => (
                "Season Power Rankings".to_string(),
                "the season so far".to_string(),
            ),
        };
        let body = format!(
            "Here are the power rankings for {period_text}: [link]{}[/link]\n\n-- PowerBot",
            config.rankings_url
        );
        client
            .post_message(&subject, &body)
            .await
            .context("failed to post to the message board")?;
        info!("message board post submitted");
    }

    Ok(())
}

/// Initialize tracing to stderr so stdout stays clean for the HTML report.
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("power_rankings=info,warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
