//! Relative expiration expressions
//!
//! `encode` takes an optional expression such as `"+ 1 hour"`, `"-1 hour"` or
//! `"+1 day 12 hours"` and turns it into an absolute `exp` timestamp:
//!
//! ```text
//! expression := term (WS* term)*
//! term       := sign? WS* magnitude WS* unit
//! sign       := "+" | "-"
//! magnitude  := [0-9]+
//! unit       := second(s) | sec(s) | minute(s) | min(s) | hour(s) | day(s)
//!             | week(s) | fortnight(s) | month(s) | year(s)
//! ```
//!
//! Units are ASCII case-insensitive and a missing sign means `+`. Month and
//! year offsets follow the calendar; a day missing from the target month is
//! clamped to the last day of that month rather than rolled over into the
//! next one, so 31 January + 1 month is 29 February (2024), never 2 March.

use crate::error::{Error, Result};
use chrono::{DateTime, Months, TimeDelta, Utc};
use std::str::FromStr;

/// Unit of a relative offset term
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeUnit {
    Second,
    Minute,
    Hour,
    Day,
    Week,
    Fortnight,
    Month,
    Year,
}

impl FromStr for TimeUnit {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let unit = match s.to_ascii_lowercase().as_str() {
            "sec" | "secs" | "second" | "seconds" => TimeUnit::Second,
            "min" | "mins" | "minute" | "minutes" => TimeUnit::Minute,
            "hour" | "hours" => TimeUnit::Hour,
            "day" | "days" => TimeUnit::Day,
            "week" | "weeks" => TimeUnit::Week,
            "fortnight" | "fortnights" => TimeUnit::Fortnight,
            "month" | "months" => TimeUnit::Month,
            "year" | "years" => TimeUnit::Year,
            _ => return Err(Error::ExpiresInvalid(format!("unknown time unit '{s}'"))),
        };
        Ok(unit)
    }
}

/// One signed `magnitude unit` term
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OffsetTerm {
    pub negative: bool,
    pub magnitude: u32,
    pub unit: TimeUnit,
}

impl OffsetTerm {
    fn apply(&self, at: DateTime<Utc>) -> Result<DateTime<Utc>> {
        let magnitude = i64::from(self.magnitude);
        let delta = match self.unit {
            TimeUnit::Second => TimeDelta::try_seconds(magnitude),
            TimeUnit::Minute => TimeDelta::try_minutes(magnitude),
            TimeUnit::Hour => TimeDelta::try_hours(magnitude),
            TimeUnit::Day => TimeDelta::try_days(magnitude),
            TimeUnit::Week => TimeDelta::try_weeks(magnitude),
            TimeUnit::Fortnight => TimeDelta::try_weeks(magnitude * 2),
            TimeUnit::Month => return self.apply_months(at, self.magnitude),
            TimeUnit::Year => {
                let months = self
                    .magnitude
                    .checked_mul(12)
                    .ok_or(Error::TimestampOverflow)?;
                return self.apply_months(at, months);
            }
        }
        .ok_or(Error::TimestampOverflow)?;

        if self.negative {
            at.checked_sub_signed(delta)
        } else {
            at.checked_add_signed(delta)
        }
        .ok_or(Error::TimestampOverflow)
    }

    fn apply_months(&self, at: DateTime<Utc>, months: u32) -> Result<DateTime<Utc>> {
        let months = Months::new(months);
        if self.negative {
            at.checked_sub_months(months)
        } else {
            at.checked_add_months(months)
        }
        .ok_or(Error::TimestampOverflow)
    }
}

/// A parsed relative-time expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelativeOffset {
    terms: Vec<OffsetTerm>,
}

impl RelativeOffset {
    /// The parsed terms, in application order
    pub fn terms(&self) -> &[OffsetTerm] {
        &self.terms
    }

    /// Apply every term to `now`, left to right
    pub fn apply(&self, now: DateTime<Utc>) -> Result<DateTime<Utc>> {
        self.terms.iter().try_fold(now, |at, term| term.apply(at))
    }
}

impl FromStr for RelativeOffset {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut cursor = Cursor::new(s);
        let mut terms = Vec::new();

        cursor.skip_whitespace();
        while !cursor.is_done() {
            terms.push(cursor.term(s)?);
            cursor.skip_whitespace();
        }

        if terms.is_empty() {
            return Err(Error::ExpiresInvalid("empty expression".into()));
        }

        Ok(Self { terms })
    }
}

/// Byte cursor over an expression; the grammar is pure ASCII
struct Cursor<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn is_done(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn peek(&self) -> Option<u8> {
        self.input.as_bytes().get(self.pos).copied()
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(|b| b.is_ascii_whitespace()) {
            self.pos += 1;
        }
    }

    fn take_while(&mut self, pred: impl Fn(u8) -> bool) -> &'a str {
        let input = self.input;
        let start = self.pos;
        while self.peek().is_some_and(&pred) {
            self.pos += 1;
        }
        &input[start..self.pos]
    }

    fn term(&mut self, expression: &str) -> Result<OffsetTerm> {
        let negative = match self.peek() {
            Some(b'+') => {
                self.pos += 1;
                false
            }
            Some(b'-') => {
                self.pos += 1;
                true
            }
            _ => false,
        };
        self.skip_whitespace();

        let digits = self.take_while(|b| b.is_ascii_digit());
        if digits.is_empty() {
            return Err(Error::ExpiresInvalid(format!(
                "expected a number at offset {} in '{expression}'",
                self.pos
            )));
        }
        let magnitude = digits.parse::<u32>().map_err(|_| {
            Error::ExpiresInvalid(format!("magnitude '{digits}' is out of range"))
        })?;
        self.skip_whitespace();

        let word = self.take_while(|b| b.is_ascii_alphabetic());
        if word.is_empty() {
            return Err(Error::ExpiresInvalid(format!(
                "expected a time unit at offset {} in '{expression}'",
                self.pos
            )));
        }

        Ok(OffsetTerm {
            negative,
            magnitude,
            unit: word.parse()?,
        })
    }
}

/// Resolve an optional expiration expression against `now`
///
/// Returns the Unix timestamp (seconds) of the expiration, or `None` when no
/// expression (or a blank one) was given. Past offsets are allowed.
pub fn resolve_expiration(now: DateTime<Utc>, expression: Option<&str>) -> Result<Option<i64>> {
    match expression {
        Some(expr) if !expr.trim().is_empty() => {
            let offset: RelativeOffset = expr.parse()?;
            Ok(Some(offset.apply(now)?.timestamp()))
        }
        _ => Ok(None),
    }
}
