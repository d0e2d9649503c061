// ESPN fantasy baseball league access: an authenticated page-fetching
// client and pure HTML parsers for the handful of league pages the
// rankings need.

pub mod client;
pub mod pages;

use thiserror::Error;

pub use client::EspnClient;

/// Errors from fetching or parsing ESPN league pages.
#[derive(Debug, Error)]
pub enum EspnError {
    #[error("failed to build HTTP client")]
    Client(#[source] reqwest::Error),

    #[error("request to {url} failed")]
    Http {
        url: String,
        source: reqwest::Error,
    },

    #[error("{url} returned HTTP {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("invalid selector `{0}`")]
    Selector(String),

    #[error("expected element `{selector}` not found on {page} page")]
    MissingElement {
        selector: String,
        page: &'static str,
    },

    #[error("could not parse matchup date `{text}`")]
    Date { text: String },
}
