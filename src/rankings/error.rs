// Error types for the rankings core.

use thiserror::Error;

/// Failure modes of a ranking computation. Any of these aborts the whole
/// run; the core never returns a partial or degraded ranking.
#[derive(Debug, Error)]
pub enum RankingsError {
    #[error("could not parse `{value}` as a number for category `{category}`")]
    Parse {
        value: String,
        category: String,
        source: std::num::ParseFloatError,
    },

    #[error("team `{team}` has {actual} category totals, expected {expected}")]
    CategoryMismatch {
        team: String,
        expected: usize,
        actual: usize,
    },

    #[error("winning percentage for `{team}` is undefined: zero games counted")]
    UndefinedRatio { team: String },

    #[error("scheduled opponent `{opponent}` of `{team}` is missing from the standings")]
    MissingOpponent { team: String, opponent: String },
}
