//! The closed set of entity kinds.
//!
//! Per-dimension facts (external name, declaration order, rule dependencies)
//! live in one lookup table instead of being spread over match arms. The rule
//! catalog and resolver for each dimension are wired up in
//! `rules::DISPATCH`.

use crate::error::Error;
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A kind of extractable entity.
///
/// Declaration order is significant: it is the last deterministic tie-break
/// when the ranker sees two otherwise equivalent candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Dimension {
    Time,
    Duration,
    Repeat,
    Currency,
    Quantity,
    Velocity,
    Temperature,
    Age,
    PhoneNumber,
    DigitSequence,
    Ordinal,
    Numeral,
}

struct DimensionInfo {
    name: &'static str,
    aliases: &'static [&'static str],
    /// Dimensions whose nodes this dimension's rules consume.
    deps: &'static [Dimension],
}

const DIMENSIONS: [Dimension; 12] = [
    Dimension::Time,
    Dimension::Duration,
    Dimension::Repeat,
    Dimension::Currency,
    Dimension::Quantity,
    Dimension::Velocity,
    Dimension::Temperature,
    Dimension::Age,
    Dimension::PhoneNumber,
    Dimension::DigitSequence,
    Dimension::Ordinal,
    Dimension::Numeral,
];

// Indexed by `Dimension as usize`.
const TABLE: [DimensionInfo; 12] = [
    DimensionInfo { name: "time", aliases: &["date", "datetime"], deps: &[Dimension::Numeral, Dimension::Duration] },
    DimensionInfo { name: "duration", aliases: &[], deps: &[Dimension::Numeral] },
    DimensionInfo { name: "repeat", aliases: &["recurrence"], deps: &[Dimension::Time, Dimension::Duration] },
    DimensionInfo { name: "currency", aliases: &["money", "amount-of-money"], deps: &[Dimension::Numeral] },
    DimensionInfo { name: "quantity", aliases: &[], deps: &[Dimension::Numeral] },
    DimensionInfo { name: "velocity", aliases: &["speed"], deps: &[Dimension::Numeral] },
    DimensionInfo { name: "temperature", aliases: &[], deps: &[Dimension::Numeral] },
    DimensionInfo { name: "age", aliases: &[], deps: &[Dimension::Numeral] },
    DimensionInfo { name: "phone-number", aliases: &["phone", "phonenumber"], deps: &[] },
    DimensionInfo { name: "digit-sequence", aliases: &["digits", "digitsequence"], deps: &[] },
    DimensionInfo { name: "ordinal", aliases: &[], deps: &[Dimension::Numeral] },
    DimensionInfo { name: "numeral", aliases: &["number"], deps: &[] },
];

impl Dimension {
    fn info(self) -> &'static DimensionInfo {
        &TABLE[self as usize]
    }

    /// Every dimension in declaration order.
    pub fn all() -> &'static [Dimension] {
        &DIMENSIONS
    }

    /// Stable external name, e.g. `"time"` or `"phone-number"`.
    pub fn name(self) -> &'static str {
        self.info().name
    }

    /// Direct dependencies: dimensions whose rules must run for this one's
    /// composition rules to find their inputs.
    pub fn dependencies(self) -> &'static [Dimension] {
        self.info().deps
    }

    /// Case-insensitive lookup by name or alias. `_` and `-` are interchangeable.
    pub fn from_name(name: &str) -> Option<Dimension> {
        let wanted = name.trim().to_ascii_lowercase().replace('_', "-");
        DIMENSIONS.iter().copied().find(|dim| {
            let info = dim.info();
            info.name == wanted || info.aliases.contains(&wanted.as_str())
        })
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Dimension {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Dimension::from_name(s).ok_or_else(|| Error::UnknownDimension(s.to_string()))
    }
}

impl Serialize for Dimension {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}
