//! Dtype vocabulary for typed buffers.

use std::fmt;

/// Sentinel epoch value marking "not a time" in 64-bit temporal storage.
pub const NAT: i64 = i64::MIN;

/// Time resolution for epoch-integer temporal values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeUnit {
    /// Whole seconds since the epoch.
    Seconds,
    /// Milliseconds since the epoch.
    Millis,
    /// Microseconds since the epoch.
    Micros,
    /// Nanoseconds since the epoch.
    Nanos,
}

impl TimeUnit {
    /// Number of these units in one second.
    #[must_use]
    pub fn per_second(self) -> i64 {
        match self {
            TimeUnit::Seconds => 1,
            TimeUnit::Millis => 1_000,
            TimeUnit::Micros => 1_000_000,
            TimeUnit::Nanos => 1_000_000_000,
        }
    }

    /// The option string naming this unit (`"s"`, `"ms"`, `"us"`, `"ns"`).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            TimeUnit::Seconds => "s",
            TimeUnit::Millis => "ms",
            TimeUnit::Micros => "us",
            TimeUnit::Nanos => "ns",
        }
    }

    /// Parses an option string; `None` when unrecognised.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "s" => Some(TimeUnit::Seconds),
            "ms" => Some(TimeUnit::Millis),
            "us" => Some(TimeUnit::Micros),
            "ns" => Some(TimeUnit::Nanos),
            _ => None,
        }
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Element type of an [`NdBuffer`](crate::NdBuffer).
///
/// Each dtype carries a stable numeric code used in diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DType {
    Bool,
    Int8,
    Int16,
    Int32,
    Int64,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Float32,
    Float64,
    /// Pair of `f64` (real, imaginary). Has no JSON mapping; encodable
    /// only through a default handler.
    Complex128,
    /// Heterogeneous storage of dynamic values.
    Object,
    /// Epoch integer at the given resolution; `NAT` marks absence.
    DateTime64(TimeUnit),
}

impl DType {
    /// Stable code reported in diagnostics.
    #[must_use]
    pub fn code(self) -> u8 {
        match self {
            DType::Bool => 0,
            DType::Int8 => 1,
            DType::Int16 => 2,
            DType::Int32 => 3,
            DType::Int64 => 4,
            DType::UInt8 => 5,
            DType::UInt16 => 6,
            DType::UInt32 => 7,
            DType::UInt64 => 8,
            DType::Float32 => 9,
            DType::Float64 => 10,
            DType::Complex128 => 15,
            DType::Object => 17,
            DType::DateTime64(_) => 21,
        }
    }

    /// Width of one element: bytes for numeric storage, one slot for
    /// object storage.
    #[must_use]
    pub fn item_size(self) -> usize {
        match self {
            DType::Bool | DType::Int8 | DType::UInt8 => 1,
            DType::Int16 | DType::UInt16 => 2,
            DType::Int32 | DType::UInt32 | DType::Float32 => 4,
            DType::Int64 | DType::UInt64 | DType::Float64 | DType::DateTime64(_) => 8,
            DType::Complex128 => 16,
            DType::Object => 1,
        }
    }

    /// `true` for signed and unsigned integer dtypes.
    #[must_use]
    pub fn is_integer(self) -> bool {
        matches!(
            self,
            DType::Int8
                | DType::Int16
                | DType::Int32
                | DType::Int64
                | DType::UInt8
                | DType::UInt16
                | DType::UInt32
                | DType::UInt64
        )
    }

    /// `true` for floating-point dtypes.
    #[must_use]
    pub fn is_float(self) -> bool {
        matches!(self, DType::Float32 | DType::Float64)
    }

    /// `true` for temporal dtypes.
    #[must_use]
    pub fn is_datetime(self) -> bool {
        matches!(self, DType::DateTime64(_))
    }

    /// `true` when elements are dynamic values rather than raw bytes.
    #[must_use]
    pub fn is_object(self) -> bool {
        matches!(self, DType::Object)
    }
}
