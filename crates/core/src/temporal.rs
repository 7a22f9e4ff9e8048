//! Host representations of date and time values.

/// A calendar date, stored as days since the Unix epoch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Date(i32);

impl Date {
    /// Creates a date from days since 1970-01-01.
    pub const fn from_days(days: i32) -> Self {
        Self(days)
    }

    /// Returns the number of days since 1970-01-01.
    #[inline]
    pub const fn days(self) -> i32 {
        self.0
    }
}

/// A time of day, stored as milliseconds since midnight.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Time(u32);

impl Time {
    const MILLIS_PER_DAY: u32 = 86_400_000;

    /// Creates a time of day, wrapping values past midnight.
    pub const fn from_millis(millis: u32) -> Self {
        Self(millis % Self::MILLIS_PER_DAY)
    }

    /// Returns milliseconds since midnight.
    #[inline]
    pub const fn millis(self) -> u32 {
        self.0
    }
}

/// A point in time, stored as a Unix timestamp in milliseconds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(i64);

impl Timestamp {
    /// Creates a timestamp from milliseconds since the Unix epoch.
    pub const fn from_millis(millis: i64) -> Self {
        Self(millis)
    }

    /// Returns milliseconds since the Unix epoch.
    #[inline]
    pub const fn millis(self) -> i64 {
        self.0
    }
}
