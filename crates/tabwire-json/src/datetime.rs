//! Date/time rendering.
//!
//! Two modes, selected by [`EncodeOptions::iso_dates`]: epoch integers
//! at the configured [`TimeUnit`], or fixed-width ISO-8601 text at that
//! unit's precision. The not-a-time sentinel encodes as JSON null in
//! both modes; that decision lives in the dispatcher, which checks for
//! [`NAT`] before calling into this module.
//!
//! [`EncodeOptions::iso_dates`]: crate::options::EncodeOptions

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Timelike};
use tabwire_model::{TimeUnit, NAT};

use crate::error::{EncodeError, Result};

const NANOS_PER_SEC: i64 = 1_000_000_000;

/// Epoch integer for a calendar date-time at `unit`.
///
/// # Errors
///
/// Returns [`EncodeError::Overflow`] when the value does not fit the
/// nanosecond range at nanosecond resolution.
pub fn epoch_from_datetime(dt: &NaiveDateTime, unit: TimeUnit) -> Result<i64> {
    let utc = dt.and_utc();
    match unit {
        TimeUnit::Seconds => Ok(utc.timestamp()),
        TimeUnit::Millis => Ok(utc.timestamp_millis()),
        TimeUnit::Micros => Ok(utc.timestamp_micros()),
        TimeUnit::Nanos => utc
            .timestamp_nanos_opt()
            .ok_or_else(|| EncodeError::Overflow("datetime out of nanosecond range".into())),
    }
}

/// Epoch integer for a calendar date (midnight) at `unit`.
///
/// # Errors
///
/// Propagates [`epoch_from_datetime`] failures.
pub fn epoch_from_date(d: &NaiveDate, unit: TimeUnit) -> Result<i64> {
    epoch_from_datetime(&midnight(d)?, unit)
}

/// Rescales an epoch integer from one unit to another, truncating toward
/// zero when the target is coarser.
///
/// # Errors
///
/// Returns [`EncodeError::Overflow`] when widening overflows.
pub fn rescale_epoch(value: i64, from: TimeUnit, to: TimeUnit) -> Result<i64> {
    debug_assert_ne!(value, NAT, "not-a-time is resolved before rescaling");
    let from_per_sec = from.per_second();
    let to_per_sec = to.per_second();
    if from_per_sec == to_per_sec {
        Ok(value)
    } else if from_per_sec > to_per_sec {
        Ok(value / (from_per_sec / to_per_sec))
    } else {
        value
            .checked_mul(to_per_sec / from_per_sec)
            .ok_or_else(|| EncodeError::Overflow("epoch value out of range after rescale".into()))
    }
}

/// Fixed-width ISO-8601 text for a calendar date-time at the unit's
/// precision (`YYYY-MM-DDTHH:MM:SS` plus 3/6/9 fractional digits).
#[must_use]
pub fn iso_from_datetime(dt: &NaiveDateTime, unit: TimeUnit) -> String {
    let fmt = match unit {
        TimeUnit::Seconds => "%Y-%m-%dT%H:%M:%S",
        TimeUnit::Millis => "%Y-%m-%dT%H:%M:%S%.3f",
        TimeUnit::Micros => "%Y-%m-%dT%H:%M:%S%.6f",
        TimeUnit::Nanos => "%Y-%m-%dT%H:%M:%S%.9f",
    };
    dt.format(fmt).to_string()
}

/// ISO-8601 text for a calendar date at the unit's precision.
///
/// # Errors
///
/// Returns [`EncodeError::DatetimeConversion`] for unrepresentable dates.
pub fn iso_from_date(d: &NaiveDate, unit: TimeUnit) -> Result<String> {
    Ok(iso_from_datetime(&midnight(d)?, unit))
}

/// ISO-8601 text for an epoch integer carried at `value_unit`.
///
/// # Errors
///
/// Returns [`EncodeError::DatetimeConversion`] when the value has no
/// calendar representation.
pub fn iso_from_epoch(value: i64, value_unit: TimeUnit, out_unit: TimeUnit) -> Result<String> {
    let nanos = rescale_epoch(value, value_unit, TimeUnit::Nanos)?;
    // rem_euclid keeps the sub-second part in [0, 1e9), which fits u32.
    let secs = nanos.div_euclid(NANOS_PER_SEC);
    #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
    let nsec = nanos.rem_euclid(NANOS_PER_SEC) as u32;
    let dt = DateTime::from_timestamp(secs, nsec).ok_or(EncodeError::DatetimeConversion)?;
    Ok(iso_from_datetime(&dt.naive_utc(), out_unit))
}

/// ISO text for a time of day, via its own formatting: `HH:MM:SS`, with
/// six fractional digits when sub-second precision is present.
#[must_use]
pub fn iso_from_time(t: &NaiveTime) -> String {
    if t.nanosecond() == 0 {
        t.format("%H:%M:%S").to_string()
    } else {
        t.format("%H:%M:%S%.6f").to_string()
    }
}

/// Total duration in integer nanoseconds: exact when representable,
/// otherwise `total_seconds × 1e9`.
///
/// # Errors
///
/// Returns [`EncodeError::Overflow`] when the duration exceeds the
/// nanosecond range.
pub fn duration_nanos(delta: &TimeDelta) -> Result<i64> {
    if let Some(nanos) = delta.num_nanoseconds() {
        return Ok(nanos);
    }
    let total_seconds =
        delta.num_seconds() as f64 + f64::from(delta.subsec_nanos()) / 1_000_000_000.0;
    let nanos = total_seconds * 1_000_000_000.0;
    if nanos >= i64::MAX as f64 || nanos <= i64::MIN as f64 {
        return Err(EncodeError::Overflow("duration out of nanosecond range".into()));
    }
    #[allow(clippy::cast_possible_truncation)]
    Ok(nanos as i64)
}

fn midnight(d: &NaiveDate) -> Result<NaiveDateTime> {
    d.and_hms_opt(0, 0, 0).ok_or(EncodeError::DatetimeConversion)
}
