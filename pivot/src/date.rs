//! Module dedicated to message dates.
//!
//! Dates are manipulated as [`PrTime`], a signed number of
//! microseconds since the Unix epoch, which is the unit search
//! backends compare dates with.

use chrono::{DateTime, FixedOffset, TimeZone, Utc};

use crate::{Error, MessageRecord, Result};

/// Microseconds since the Unix epoch.
pub type PrTime = i64;

/// The inclusive range of dates spanned by a set of messages.
///
/// The earliest date is always lower than or equal to the latest
/// one, including when deserialized.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(
    feature = "derive",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "kebab-case", from = "DateRangeBounds")
)]
pub struct DateRange {
    earliest: PrTime,
    latest: PrTime,
}

impl DateRange {
    /// Create a new date range from two dates, in any order.
    pub fn new(a: PrTime, b: PrTime) -> Self {
        Self {
            earliest: a.min(b),
            latest: a.max(b),
        }
    }

    pub fn earliest(&self) -> PrTime {
        self.earliest
    }

    pub fn latest(&self) -> PrTime {
        self.latest
    }
}

/// The unchecked bounds of a deserialized date range.
#[cfg(feature = "derive")]
#[derive(serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
struct DateRangeBounds {
    earliest: PrTime,
    latest: PrTime,
}

#[cfg(feature = "derive")]
impl From<DateRangeBounds> for DateRange {
    fn from(bounds: DateRangeBounds) -> Self {
        Self::new(bounds.earliest, bounds.latest)
    }
}

/// A single date is a zero-width range.
impl From<PrTime> for DateRange {
    fn from(date: PrTime) -> Self {
        Self::new(date, date)
    }
}

impl From<(PrTime, PrTime)> for DateRange {
    fn from((a, b): (PrTime, PrTime)) -> Self {
        Self::new(a, b)
    }
}

/// Reduce the given messages to the range of dates they span.
///
/// Fails with [`Error::EmptyInputError`] when no message is given.
pub fn date_range<'a>(msgs: impl IntoIterator<Item = &'a MessageRecord>) -> Result<DateRange> {
    let mut msgs = msgs.into_iter();
    let first = msgs.next().ok_or(Error::EmptyInputError)?.date;

    let range = msgs.fold(DateRange::from(first), |range, msg| DateRange {
        earliest: range.earliest.min(msg.date),
        latest: range.latest.max(msg.date),
    });

    Ok(range)
}

/// Convert a date into a UTC [`chrono::DateTime`].
///
/// Returns `None` when the date is out of range for chrono.
pub fn to_datetime(date: PrTime) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp_micros(date)
}

pub fn from_datetime<Tz: TimeZone>(dt: &DateTime<Tz>) -> PrTime {
    dt.timestamp_micros()
}

/// Transform a [`mail_parser::DateTime`] into a date.
pub fn from_mail_parser_datetime(dt: &mail_parser::DateTime) -> Option<PrTime> {
    let tz_secs = (dt.tz_hour as i32) * 3600 + (dt.tz_minute as i32) * 60;
    let tz_sign = if dt.tz_before_gmt { -1 } else { 1 };

    let dt = FixedOffset::east_opt(tz_sign * tz_secs)?
        .with_ymd_and_hms(
            dt.year as i32,
            dt.month as u32,
            dt.day as u32,
            dt.hour as u32,
            dt.minute as u32,
            dt.second as u32,
        )
        .earliest()?;

    Some(from_datetime(&dt))
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use crate::{Error, MessageRecord};

    use super::DateRange;

    fn msg(date: i64) -> MessageRecord {
        MessageRecord::new("alice@localhost", "bob@localhost", date)
    }

    #[test_log::test]
    fn date_range() {
        let msgs = vec![msg(30), msg(-10), msg(20), msg(-10)];
        let range = super::date_range(&msgs).unwrap();

        assert_eq!(range.earliest(), -10);
        assert_eq!(range.latest(), 30);
    }

    #[test_log::test]
    fn date_range_single_message() {
        let msgs = vec![msg(42)];
        assert_eq!(super::date_range(&msgs).unwrap(), DateRange::from(42));
    }

    #[test_log::test]
    fn date_range_empty() {
        let msgs: Vec<MessageRecord> = Vec::new();
        assert!(matches!(
            super::date_range(&msgs),
            Err(Error::EmptyInputError)
        ));
    }

    #[test_log::test]
    fn new_orders_bounds() {
        let range = DateRange::new(10, 5);
        assert_eq!((range.earliest(), range.latest()), (5, 10));
        assert_eq!(DateRange::from((10, 5)), range);
    }

    #[cfg(feature = "derive")]
    #[test_log::test]
    fn deserialize_reversed_bounds() {
        let range: DateRange = serde_json::from_str(r#"{"earliest":10,"latest":5}"#).unwrap();

        assert_eq!(range.earliest(), 5);
        assert_eq!(range.latest(), 10);
        assert_eq!(
            serde_json::to_string(&range).unwrap(),
            r#"{"earliest":5,"latest":10}"#
        );
    }

    #[test_log::test]
    fn datetime_conversions() {
        let dt = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let date = super::from_datetime(&dt);

        assert_eq!(date, 1_704_067_200_000_000);
        assert_eq!(super::to_datetime(date), Some(dt));
    }
}
