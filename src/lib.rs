//! AirSafe: migration wizard client with resilient recommendation requests.

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod results;
pub mod submission;
pub mod wizard;
