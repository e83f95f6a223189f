//! Lazy habit tracking for people who live in a terminal. Log a habit in one
//! short command, get weekly and daily summaries with streaks and progress
//! bars, and let the daemon nag you about unfinished goals in the evening.
//!

pub mod amount;
pub mod cli;
pub mod daemon;
pub mod notify;
pub mod store;
pub mod summary;
pub mod utils;
