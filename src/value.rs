//! Resolved, serializable values.

use crate::time_expr::Grain;
use chrono::{DateTime, FixedOffset};
use serde::Serialize;

/// A resolved point or interval in time, in the reference's UTC offset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TimeValue {
    /// A single point at `grain` precision (the whole day for `Day`, and so on).
    Instant { value: DateTime<FixedOffset>, grain: Grain },
    /// Half-open `[from, to)` interval.
    Interval { from: DateTime<FixedOffset>, to: DateTime<FixedOffset>, grain: Grain },
}

impl TimeValue {
    pub fn grain(&self) -> Grain {
        match self {
            TimeValue::Instant { grain, .. } | TimeValue::Interval { grain, .. } => *grain,
        }
    }

    pub fn is_interval(&self) -> bool {
        matches!(self, TimeValue::Interval { .. })
    }
}

/// Terminal output of resolution, one shape per dimension.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResolvedValue {
    Numeral { value: f64 },
    Ordinal { value: i64 },
    Time(TimeValue),
    /// `value` units of `grain`; `seconds` uses nominal grain lengths.
    Duration { value: f64, grain: Grain, seconds: f64 },
    /// `unit` is an ISO 4217 code.
    Currency { value: f64, unit: String },
    Quantity { value: f64, unit: String, measure: String },
    Temperature { value: f64, unit: String },
    PhoneNumber { value: String },
    /// Every `value` units of `grain`; `start` is the first occurrence when
    /// the phrase names one (每周一, 每天早上八点).
    Repeat { value: f64, grain: Grain, start: Option<TimeValue> },
    /// Age in years.
    Age { value: f64 },
    Velocity { value: f64, unit: String },
    /// Digits in reading order, leading zeros kept.
    DigitSequence { value: String },
}
