//! Parsing and rendering of logged amounts. An amount is either a time
//! span ("2h", "1h30m", "1.5h", "90m") or a repetition count ("8x",
//! "3 times"). Stored log entries keep the rendered form, so parsing has
//! to accept everything the formatter produces.

use std::{fmt::Display, str::FromStr, sync::LazyLock};

use regex::Regex;
use thiserror::Error;

/// Accepts `{n}m`, or optional fractional hours, optional `h`, optional
/// minutes, optional `m`. The first alternative keeps a lone minute value
/// from being read as hours.
static DURATION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:(\d+)m|(\d+(?:\.\d+)?)?h?(\d+)?m?)$").expect("duration pattern is valid")
});

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("empty amount")]
    EmptyInput,
    #[error("invalid count format: {0}")]
    InvalidCount(String),
    #[error("invalid duration format: {0}")]
    InvalidDurationFormat(String),
}

/// Time span normalized so that minutes stay below 60.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeSpan {
    hours: u32,
    minutes: u32,
}

impl TimeSpan {
    pub fn new(hours: u32, minutes: u32) -> Self {
        Self {
            hours: hours.saturating_add(minutes / 60),
            minutes: minutes % 60,
        }
    }

    pub fn hours(&self) -> u32 {
        self.hours
    }

    pub fn minutes(&self) -> u32 {
        self.minutes
    }

    pub fn total_minutes(&self) -> u32 {
        self.hours * 60 + self.minutes
    }

    pub fn total_hours(&self) -> f64 {
        self.hours as f64 + self.minutes as f64 / 60.0
    }
}

impl Display for TimeSpan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.hours > 0, self.minutes > 0) {
            (true, true) => write!(f, "{}h{}m", self.hours, self.minutes),
            (true, false) => write!(f, "{}h", self.hours),
            (false, _) => write!(f, "{}m", self.minutes),
        }
    }
}

/// What a user logged against a habit: either elapsed time or a number of
/// repetitions. Which one is expected depends on the habit's goal type,
/// but parsing is driven purely by the input's shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Amount {
    Time(TimeSpan),
    Count(u32),
}

impl FromStr for Amount {
    type Err = ParseError;

    /// Trims the input, then dispatches on the suffix: `x`/`times` means a
    /// count, anything else is matched against the duration grammar. The
    /// suffix check is case-insensitive; duration units are not.
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ParseError::EmptyInput);
        }
        let lowered = trimmed.to_lowercase();
        if lowered.ends_with('x') || lowered.ends_with("times") {
            parse_count(&lowered).map(Amount::Count)
        } else {
            parse_time(trimmed).map(Amount::Time)
        }
    }
}

impl Display for Amount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Amount::Time(span) => span.fmt(f),
            Amount::Count(1) => write!(f, "1 time"),
            Amount::Count(n) => write!(f, "{n} times"),
        }
    }
}

fn parse_count(lowered: &str) -> Result<u32, ParseError> {
    let number = lowered
        .strip_suffix("times")
        .or_else(|| lowered.strip_suffix('x'))
        .unwrap_or(lowered)
        .trim();
    match number.parse::<u32>() {
        Ok(count) if count > 0 => Ok(count),
        _ => Err(ParseError::InvalidCount(lowered.to_string())),
    }
}

fn parse_time(input: &str) -> Result<TimeSpan, ParseError> {
    let captures = DURATION_PATTERN
        .captures(input)
        .ok_or_else(|| ParseError::InvalidDurationFormat(input.to_string()))?;

    if let Some(only_minutes) = captures.get(1) {
        return Ok(TimeSpan::new(0, parse_component(only_minutes.as_str())));
    }

    let mut hours = 0u32;
    let mut minutes = 0u32;
    if let Some(hour_part) = captures.get(2) {
        // The pattern guarantees digits, so this only fails on absurd
        // magnitudes; those degrade to zero instead of failing the parse.
        let fractional: f64 = hour_part.as_str().parse().unwrap_or(0.0);
        hours = fractional as u32;
        minutes = ((fractional - fractional.trunc()) * 60.0) as u32;
    }
    if let Some(minute_part) = captures.get(3) {
        minutes = minutes.saturating_add(parse_component(minute_part.as_str()));
    }
    Ok(TimeSpan::new(hours, minutes))
}

fn parse_component(digits: &str) -> u32 {
    digits.parse().unwrap_or(0)
}
