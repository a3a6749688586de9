//! Encoder options.
//!
//! [`EncodeOptions`] mirrors the top-level call surface: escaping flags,
//! double precision, table orientation, date unit and format, and the
//! optional default handler for values the dispatcher cannot classify.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use tabwire_model::{Datum, TimeUnit};

use crate::error::{EncodeError, Result};

/// Maximum supported digits after the decimal point.
pub const DOUBLE_MAX_DECIMALS: u8 = 15;

/// Default nesting depth limit.
pub const DEFAULT_RECURSION_LIMIT: usize = 1024;

/// Scheme mapping a table to a JSON shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orient {
    /// `[{column: value, …}, …]` — one object per row.
    Records,
    /// `{row: {column: value, …}, …}`.
    Index,
    /// `{"columns": […], "index": […], "data": [[…], …]}`.
    Split,
    /// `[[value, …], …]` — bare data.
    Values,
    /// `{column: {row: value, …}, …}`.
    #[default]
    Columns,
}

impl FromStr for Orient {
    type Err = EncodeError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "records" => Ok(Orient::Records),
            "index" => Ok(Orient::Index),
            "split" => Ok(Orient::Split),
            "values" => Ok(Orient::Values),
            "columns" => Ok(Orient::Columns),
            other => Err(EncodeError::InvalidOption {
                option: "orient",
                value: other.to_owned(),
            }),
        }
    }
}

/// Parses a `date_unit` option string.
///
/// # Errors
///
/// Returns [`EncodeError::InvalidOption`] for unrecognised units.
pub fn parse_date_unit(s: &str) -> Result<TimeUnit> {
    TimeUnit::parse(s).ok_or_else(|| EncodeError::InvalidOption {
        option: "date_unit",
        value: s.to_owned(),
    })
}

/// Handler invoked for values the dispatcher cannot classify. The
/// returned datum is encoded in place of the original; an `Err` aborts
/// the encode.
pub type DefaultHandler = dyn Fn(&Datum) -> std::result::Result<Datum, String> + Send + Sync;

/// Options for one encode call.
#[derive(Clone)]
pub struct EncodeOptions {
    /// Escape all non-ASCII characters as `\uXXXX`. Default: `true`.
    pub ensure_ascii: bool,
    /// Digits after the decimal point, `0..=15`. Default: `10`.
    pub double_precision: u8,
    /// Escape `<`, `>`, and `&`. Default: `false`.
    pub encode_html_chars: bool,
    /// Table orientation. Default: [`Orient::Columns`].
    pub orient: Orient,
    /// Epoch/ISO date resolution. Default: milliseconds.
    pub date_unit: TimeUnit,
    /// Render date-times as ISO-8601 text instead of epoch integers.
    /// Default: `false`.
    pub iso_dates: bool,
    /// Nesting depth limit. Default: 1024.
    pub recursion_limit: usize,
    /// Handler for otherwise unencodable values. Default: none.
    pub default_handler: Option<Arc<DefaultHandler>>,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        EncodeOptions {
            ensure_ascii: true,
            double_precision: 10,
            encode_html_chars: false,
            orient: Orient::Columns,
            date_unit: TimeUnit::Millis,
            iso_dates: false,
            recursion_limit: DEFAULT_RECURSION_LIMIT,
            default_handler: None,
        }
    }
}

impl EncodeOptions {
    /// Creates the default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets ASCII escaping.
    #[must_use]
    pub fn with_ensure_ascii(mut self, on: bool) -> Self {
        self.ensure_ascii = on;
        self
    }

    /// Sets the number of digits after the decimal point.
    #[must_use]
    pub fn with_double_precision(mut self, digits: u8) -> Self {
        self.double_precision = digits;
        self
    }

    /// Sets HTML character escaping.
    #[must_use]
    pub fn with_encode_html_chars(mut self, on: bool) -> Self {
        self.encode_html_chars = on;
        self
    }

    /// Sets the table orientation.
    #[must_use]
    pub fn with_orient(mut self, orient: Orient) -> Self {
        self.orient = orient;
        self
    }

    /// Sets the date resolution.
    #[must_use]
    pub fn with_date_unit(mut self, unit: TimeUnit) -> Self {
        self.date_unit = unit;
        self
    }

    /// Sets ISO-8601 date rendering.
    #[must_use]
    pub fn with_iso_dates(mut self, on: bool) -> Self {
        self.iso_dates = on;
        self
    }

    /// Sets the nesting depth limit.
    #[must_use]
    pub fn with_recursion_limit(mut self, limit: usize) -> Self {
        self.recursion_limit = limit;
        self
    }

    /// Installs a default handler.
    #[must_use]
    pub fn with_default_handler(mut self, handler: Arc<DefaultHandler>) -> Self {
        self.default_handler = Some(handler);
        self
    }

    /// Validates option values before any output is produced.
    ///
    /// # Errors
    ///
    /// Returns [`EncodeError::InvalidPrecision`] when `double_precision`
    /// exceeds [`DOUBLE_MAX_DECIMALS`].
    pub fn validate(&self) -> Result<()> {
        if self.double_precision > DOUBLE_MAX_DECIMALS {
            return Err(EncodeError::InvalidPrecision {
                value: self.double_precision,
                max: DOUBLE_MAX_DECIMALS,
            });
        }
        Ok(())
    }
}

impl fmt::Debug for EncodeOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncodeOptions")
            .field("ensure_ascii", &self.ensure_ascii)
            .field("double_precision", &self.double_precision)
            .field("encode_html_chars", &self.encode_html_chars)
            .field("orient", &self.orient)
            .field("date_unit", &self.date_unit)
            .field("iso_dates", &self.iso_dates)
            .field("recursion_limit", &self.recursion_limit)
            .field(
                "default_handler",
                &self.default_handler.as_ref().map(|_| "<handler>"),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orient_parsing() {
        assert_eq!("records".parse::<Orient>().unwrap(), Orient::Records);
        assert_eq!("columns".parse::<Orient>().unwrap(), Orient::Columns);
        let err = "sideways".parse::<Orient>().unwrap_err();
        assert_eq!(err.to_string(), "Invalid value 'sideways' for option 'orient'");
    }

    #[test]
    fn test_date_unit_parsing() {
        assert_eq!(parse_date_unit("ns").unwrap(), TimeUnit::Nanos);
        let err = parse_date_unit("minutes").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid value 'minutes' for option 'date_unit'"
        );
    }

    #[test]
    fn test_precision_bound() {
        assert!(EncodeOptions::new().with_double_precision(15).validate().is_ok());
        let err = EncodeOptions::new()
            .with_double_precision(16)
            .validate()
            .unwrap_err();
        assert!(err.to_string().contains("double_precision"));
    }

    #[test]
    fn test_defaults() {
        let opts = EncodeOptions::default();
        assert!(opts.ensure_ascii);
        assert_eq!(opts.double_precision, 10);
        assert_eq!(opts.orient, Orient::Columns);
        assert_eq!(opts.date_unit, TimeUnit::Millis);
        assert!(!opts.iso_dates);
    }
}
