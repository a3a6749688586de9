//! Dynamic values.
//!
//! [`Datum`] is the tagged value universe the encoder dispatches over.
//! Opaque values implement [`ObjectLike`], the narrow capability surface
//! for attribute listing, attribute fetch, and mapping conversion.

use std::fmt;
use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};

use crate::buffer::NdBuffer;
use crate::dtype::TimeUnit;
use crate::frame::{Index, Table, Vector};

/// A fixed-point decimal rendered lossily as a double when encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decimal {
    /// Unscaled integer value.
    pub mantissa: i64,
    /// Number of decimal digits to the right of the point.
    pub scale: u32,
}

impl Decimal {
    /// Creates a decimal `mantissa × 10^-scale`.
    #[must_use]
    pub fn new(mantissa: i64, scale: u32) -> Self {
        Decimal { mantissa, scale }
    }

    /// Lossy conversion to a double.
    #[must_use]
    pub fn to_f64(self) -> f64 {
        self.mantissa as f64 / 10f64.powi(self.scale as i32)
    }
}

/// Result of asking an [`ObjectLike`] value for a mapping rendition.
#[derive(Debug)]
pub enum ToDict {
    /// The value has no mapping conversion.
    Absent,
    /// The conversion succeeded.
    Dict(Vec<(Datum, Datum)>),
    /// The conversion exists but failed; the value encodes as null.
    Failed,
}

/// Capability surface for opaque values.
///
/// The encoder only ever lists attributes, fetches one attribute, checks
/// whether an attribute is callable, and asks for a mapping conversion.
pub trait ObjectLike: fmt::Debug + Send + Sync {
    /// All attribute names, in a stable order.
    fn attr_names(&self) -> Vec<String>;

    /// Fetches one attribute value; `None` when the fetch fails.
    fn attr(&self, name: &str) -> Option<Datum>;

    /// `true` when the named attribute is callable (and therefore
    /// skipped by attribute iteration).
    fn is_callable(&self, _name: &str) -> bool {
        false
    }

    /// Mapping conversion hook.
    fn to_dict(&self) -> ToDict {
        ToDict::Absent
    }
}

/// A dynamic value.
#[derive(Debug, Clone)]
pub enum Datum {
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Str(String),
    Bytes(Vec<u8>),
    /// Fixed-point decimal, rendered as a (lossy) double.
    Decimal(Decimal),
    /// Calendar date-time without zone.
    DateTime(NaiveDateTime),
    /// Calendar date; encodes as midnight of that day.
    Date(NaiveDate),
    /// Time of day; always renders as ISO text.
    Time(NaiveTime),
    /// Epoch integer at a resolution; `NAT` marks absence.
    Timestamp64 {
        value: i64,
        unit: TimeUnit,
    },
    /// Signed duration.
    Duration(TimeDelta),
    /// Complex scalar. Has no JSON mapping; reaches output only through
    /// a default handler.
    Complex {
        re: f64,
        im: f64,
    },
    List(Vec<Datum>),
    Tuple(Vec<Datum>),
    /// Insertion-ordered set; order is preserved so encoding stays
    /// deterministic.
    Set(Vec<Datum>),
    /// Ordered key/value pairs.
    Map(Vec<(Datum, Datum)>),
    Array(NdBuffer),
    Index(Index),
    Vector(Vector),
    Table(Table),
    Other(Arc<dyn ObjectLike>),
}

impl Datum {
    /// `true` for the null value.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Datum::Null)
    }
}

impl From<bool> for Datum {
    fn from(v: bool) -> Self {
        Datum::Bool(v)
    }
}

impl From<i64> for Datum {
    fn from(v: i64) -> Self {
        Datum::Int(v)
    }
}

impl From<f64> for Datum {
    fn from(v: f64) -> Self {
        Datum::Float(v)
    }
}

impl From<&str> for Datum {
    fn from(v: &str) -> Self {
        Datum::Str(v.to_owned())
    }
}

impl From<String> for Datum {
    fn from(v: String) -> Self {
        Datum::Str(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decimal_to_f64() {
        assert!((Decimal::new(314, 2).to_f64() - 3.14).abs() < 1e-12);
        assert!((Decimal::new(-5, 0).to_f64() + 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_from_impls() {
        assert!(matches!(Datum::from(true), Datum::Bool(true)));
        assert!(matches!(Datum::from(7i64), Datum::Int(7)));
        assert!(matches!(Datum::from("a"), Datum::Str(s) if s == "a"));
    }
}
