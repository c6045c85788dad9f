//! Unit conversion for duration, size and rate values.
//!
//! Every unit of a dimension is expressed as a multiplier against a fixed
//! base unit (milliseconds, bytes, per-second). Converting multiplies the
//! value by `multiplier(from) / multiplier(to)`. The converters do not check
//! dimensions across families; callers that mix families must guard that
//! themselves (see [`crate::table::scale_tabular_data_column`]).

use std::fmt;
use std::str::FromStr;

use crate::{Error, Result};

const MILLISECOND: f64 = 1.0;
const SECOND: f64 = 1_000.0;
const MINUTE: f64 = 60.0 * SECOND;
const HOUR: f64 = 60.0 * MINUTE;
const DAY: f64 = 24.0 * HOUR;
const WEEK: f64 = 7.0 * DAY;
const MONTH: f64 = 2_629_800_000.0;
const YEAR: f64 = 31_557_600_000.0;

const KIBIBYTE: f64 = 1024.0;
const KILOBYTE: f64 = 1000.0;

/// Duration units, based on milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DurationUnit {
    Nanosecond,
    Microsecond,
    Millisecond,
    Second,
    Minute,
    Hour,
    Day,
    Week,
    Month,
    Year,
}

impl DurationUnit {
    pub const ALL: [DurationUnit; 10] = [
        DurationUnit::Nanosecond,
        DurationUnit::Microsecond,
        DurationUnit::Millisecond,
        DurationUnit::Second,
        DurationUnit::Minute,
        DurationUnit::Hour,
        DurationUnit::Day,
        DurationUnit::Week,
        DurationUnit::Month,
        DurationUnit::Year,
    ];

    /// Milliseconds in one of this unit.
    pub fn multiplier(self) -> f64 {
        match self {
            DurationUnit::Nanosecond => MILLISECOND / 1_000_000.0,
            DurationUnit::Microsecond => MILLISECOND / 1_000.0,
            DurationUnit::Millisecond => MILLISECOND,
            DurationUnit::Second => SECOND,
            DurationUnit::Minute => MINUTE,
            DurationUnit::Hour => HOUR,
            DurationUnit::Day => DAY,
            DurationUnit::Week => WEEK,
            DurationUnit::Month => MONTH,
            DurationUnit::Year => YEAR,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DurationUnit::Nanosecond => "nanosecond",
            DurationUnit::Microsecond => "microsecond",
            DurationUnit::Millisecond => "millisecond",
            DurationUnit::Second => "second",
            DurationUnit::Minute => "minute",
            DurationUnit::Hour => "hour",
            DurationUnit::Day => "day",
            DurationUnit::Week => "week",
            DurationUnit::Month => "month",
            DurationUnit::Year => "year",
        }
    }
}

/// Size units, based on bytes. Both SI (1000) and IEC (1024) multiples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SizeUnit {
    Bit,
    Byte,
    Kibibyte,
    Mebibyte,
    Gibibyte,
    Tebibyte,
    Pebibyte,
    Exbibyte,
    Kilobyte,
    Megabyte,
    Gigabyte,
    Terabyte,
    Petabyte,
    Exabyte,
}

impl SizeUnit {
    pub const ALL: [SizeUnit; 14] = [
        SizeUnit::Bit,
        SizeUnit::Byte,
        SizeUnit::Kibibyte,
        SizeUnit::Mebibyte,
        SizeUnit::Gibibyte,
        SizeUnit::Tebibyte,
        SizeUnit::Pebibyte,
        SizeUnit::Exbibyte,
        SizeUnit::Kilobyte,
        SizeUnit::Megabyte,
        SizeUnit::Gigabyte,
        SizeUnit::Terabyte,
        SizeUnit::Petabyte,
        SizeUnit::Exabyte,
    ];

    /// Bytes in one of this unit.
    pub fn multiplier(self) -> f64 {
        match self {
            SizeUnit::Bit => 1.0 / 8.0,
            SizeUnit::Byte => 1.0,
            SizeUnit::Kibibyte => KIBIBYTE,
            SizeUnit::Mebibyte => KIBIBYTE.powi(2),
            SizeUnit::Gibibyte => KIBIBYTE.powi(3),
            SizeUnit::Tebibyte => KIBIBYTE.powi(4),
            SizeUnit::Pebibyte => KIBIBYTE.powi(5),
            SizeUnit::Exbibyte => KIBIBYTE.powi(6),
            SizeUnit::Kilobyte => KILOBYTE,
            SizeUnit::Megabyte => KILOBYTE.powi(2),
            SizeUnit::Gigabyte => KILOBYTE.powi(3),
            SizeUnit::Terabyte => KILOBYTE.powi(4),
            SizeUnit::Petabyte => KILOBYTE.powi(5),
            SizeUnit::Exabyte => KILOBYTE.powi(6),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SizeUnit::Bit => "bit",
            SizeUnit::Byte => "byte",
            SizeUnit::Kibibyte => "kibibyte",
            SizeUnit::Mebibyte => "mebibyte",
            SizeUnit::Gibibyte => "gibibyte",
            SizeUnit::Tebibyte => "tebibyte",
            SizeUnit::Pebibyte => "pebibyte",
            SizeUnit::Exbibyte => "exbibyte",
            SizeUnit::Kilobyte => "kilobyte",
            SizeUnit::Megabyte => "megabyte",
            SizeUnit::Gigabyte => "gigabyte",
            SizeUnit::Terabyte => "terabyte",
            SizeUnit::Petabyte => "petabyte",
            SizeUnit::Exabyte => "exabyte",
        }
    }
}

/// Rate units, based on per-second.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RateUnit {
    PerSecond,
    PerMinute,
    PerHour,
}

impl RateUnit {
    pub const ALL: [RateUnit; 3] = [RateUnit::PerSecond, RateUnit::PerMinute, RateUnit::PerHour];

    /// Length of the unit's window in seconds.
    pub fn multiplier(self) -> f64 {
        match self {
            RateUnit::PerSecond => 1.0,
            RateUnit::PerMinute => 60.0,
            RateUnit::PerHour => 3_600.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RateUnit::PerSecond => "1/second",
            RateUnit::PerMinute => "1/minute",
            RateUnit::PerHour => "1/hour",
        }
    }
}

/// Convert a duration between units.
pub fn convert_duration(value: f64, from: DurationUnit, to: DurationUnit) -> f64 {
    value * (from.multiplier() / to.multiplier())
}

/// Convert a size between units.
pub fn convert_size(value: f64, from: SizeUnit, to: SizeUnit) -> f64 {
    value * (from.multiplier() / to.multiplier())
}

/// Convert a rate between units.
pub fn convert_rate(value: f64, from: RateUnit, to: RateUnit) -> f64 {
    value * (from.multiplier() / to.multiplier())
}

/// Any known unit, tagged with its dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Unit {
    Duration(DurationUnit),
    Size(SizeUnit),
    Rate(RateUnit),
}

impl Unit {
    /// Parse a unit from its wire name, e.g. `millisecond`, `kibibyte`, `1/minute`.
    pub fn parse(name: &str) -> Result<Unit> {
        name.parse()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Unit::Duration(u) => u.as_str(),
            Unit::Size(u) => u.as_str(),
            Unit::Rate(u) => u.as_str(),
        }
    }

    /// Convert `value` from this unit into `to`. Returns `None` across dimensions.
    pub fn convert(self, value: f64, to: Unit) -> Option<f64> {
        match (self, to) {
            (Unit::Duration(from), Unit::Duration(to)) => Some(convert_duration(value, from, to)),
            (Unit::Size(from), Unit::Size(to)) => Some(convert_size(value, from, to)),
            (Unit::Rate(from), Unit::Rate(to)) => Some(convert_rate(value, from, to)),
            _ => None,
        }
    }
}

impl FromStr for DurationUnit {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        DurationUnit::ALL
            .into_iter()
            .find(|u| u.as_str() == s)
            .ok_or_else(|| Error::UnknownUnit(s.to_string()))
    }
}

impl FromStr for SizeUnit {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        SizeUnit::ALL
            .into_iter()
            .find(|u| u.as_str() == s)
            .ok_or_else(|| Error::UnknownUnit(s.to_string()))
    }
}

impl FromStr for RateUnit {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        RateUnit::ALL
            .into_iter()
            .find(|u| u.as_str() == s)
            .ok_or_else(|| Error::UnknownUnit(s.to_string()))
    }
}

impl FromStr for Unit {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if let Ok(u) = s.parse::<DurationUnit>() {
            return Ok(Unit::Duration(u));
        }
        if let Ok(u) = s.parse::<SizeUnit>() {
            return Ok(Unit::Size(u));
        }
        if let Ok(u) = s.parse::<RateUnit>() {
            return Ok(Unit::Rate(u));
        }
        Err(Error::UnknownUnit(s.to_string()))
    }
}

impl fmt::Display for DurationUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for SizeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for RateUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
