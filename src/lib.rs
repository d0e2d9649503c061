// Library root: re-exports all modules so integration tests and external
// consumers can access the crate's public API.

pub mod cli;
pub mod config;
pub mod espn;
pub mod rankings;
pub mod report;
