//! Type dispatch.
//!
//! Splits classification in two, mirroring the scalar/container split of
//! the value universe:
//!
//! - [`scalar_repr`] assigns a primitive JSON representation to scalar
//!   values (or `None` for containers);
//! - [`classify_container`] pairs a container with the driver the
//!   encoder runs for it.
//!
//! Buffer elements produced by the strider go through
//! [`classify_element`], which shares the scalar paths above: array and
//! standalone date-time values cannot diverge, and the choice between
//! integer and text date rendering is made in exactly one place.

use std::borrow::Cow;

use tabwire_model::{
    Datum, Index, NdBuffer, ObjectLike, ScalarElem, Table, TimeUnit, ToDict, Vector, NAT,
};

use crate::datetime;
use crate::error::{EncodeError, Result};
use crate::labels;
use crate::options::{EncodeOptions, Orient};

/// Primitive JSON representation of a scalar value.
#[derive(Debug)]
pub(crate) enum ScalarRepr<'v> {
    Null,
    Bool(bool),
    Long(i64),
    Double(f64),
    Str(Cow<'v, str>),
}

/// Key/value pairs, borrowed from a mapping value or produced by a
/// mapping conversion.
#[derive(Debug)]
pub(crate) enum MapRef<'v> {
    Borrowed(&'v [(Datum, Datum)]),
    Owned(Vec<(Datum, Datum)>),
}

impl MapRef<'_> {
    pub(crate) fn pairs(&self) -> &[(Datum, Datum)] {
        match self {
            MapRef::Borrowed(p) => p,
            MapRef::Owned(p) => p,
        }
    }
}

/// Driver selection for a container value.
#[derive(Debug)]
pub(crate) enum ContainerClass<'v> {
    /// Indexed sequence (list or tuple); items are borrowed.
    Seq(&'v [Datum]),
    /// Generic iteration (sets and other iterables).
    SetIter(&'v [Datum]),
    /// Mapping; non-string keys are coerced to key text.
    Map(MapRef<'v>),
    /// Public-attribute iteration over an opaque value.
    Attrs(&'v dyn ObjectLike),
    /// A mapping conversion existed but failed; encode null.
    NullFallback,
    /// `{"name": …, "data": […]}` (split orientation only).
    IndexSplit(&'v Index),
    /// `{"name": …, "index": […], "data": […]}` (split orientation only).
    VectorSplit(&'v Vector),
    /// Typed buffer walk; `keys` carries pre-encoded leaf labels when
    /// the emission is object-shaped.
    Buffer {
        buf: &'v NdBuffer,
        keys: Option<Vec<String>>,
    },
    /// Table; orientation resolution happens in the encoder.
    Table(&'v Table),
    /// Unclassifiable; route through the default handler.
    NeedsHandler,
}

/// Classification of one strider leaf element.
#[derive(Debug)]
pub(crate) enum ElementClass<'v> {
    Repr(ScalarRepr<'v>),
    /// Object-dtype element; recurses through the full dispatcher.
    Datum(&'v Datum),
    /// Element dtype with no JSON mapping (dtype code attached).
    Unsupported(u8),
}

/// Primitive representation for a scalar datum, or `None` for
/// containers.
///
/// # Errors
///
/// Returns overflow, UTF-8, and date-conversion failures.
pub(crate) fn scalar_repr<'v>(
    d: &'v Datum,
    opts: &EncodeOptions,
) -> Result<Option<ScalarRepr<'v>>> {
    Ok(Some(match d {
        Datum::Null => ScalarRepr::Null,
        Datum::Bool(v) => ScalarRepr::Bool(*v),
        Datum::Int(v) => ScalarRepr::Long(*v),
        Datum::UInt(v) => uint_repr(*v)?,
        Datum::Float(v) => float_repr(*v),
        Datum::Str(s) => ScalarRepr::Str(Cow::Borrowed(s)),
        Datum::Bytes(b) => {
            let s = std::str::from_utf8(b).map_err(|_| EncodeError::InvalidUtf8)?;
            ScalarRepr::Str(Cow::Borrowed(s))
        }
        Datum::Decimal(dec) => ScalarRepr::Double(dec.to_f64()),
        Datum::DateTime(dt) => {
            if opts.iso_dates {
                ScalarRepr::Str(Cow::Owned(datetime::iso_from_datetime(dt, opts.date_unit)))
            } else {
                ScalarRepr::Long(datetime::epoch_from_datetime(dt, opts.date_unit)?)
            }
        }
        Datum::Date(date) => {
            if opts.iso_dates {
                ScalarRepr::Str(Cow::Owned(datetime::iso_from_date(date, opts.date_unit)?))
            } else {
                ScalarRepr::Long(datetime::epoch_from_date(date, opts.date_unit)?)
            }
        }
        Datum::Time(t) => ScalarRepr::Str(Cow::Owned(datetime::iso_from_time(t))),
        Datum::Timestamp64 { value, unit } => timestamp_repr(*value, *unit, opts)?,
        Datum::Duration(delta) => {
            let nanos = datetime::duration_nanos(delta)?;
            if nanos == NAT {
                ScalarRepr::Null
            } else {
                ScalarRepr::Long(datetime::rescale_epoch(
                    nanos,
                    TimeUnit::Nanos,
                    opts.date_unit,
                )?)
            }
        }
        _ => return Ok(None),
    }))
}

/// Driver selection for a non-scalar datum. `orient` is the encoder's
/// current orientation, which decides the shape of labeled values.
///
/// # Errors
///
/// Returns classification failures (0-d arrays, unclassifiable values
/// with no handler installed) and label pre-encoding failures.
pub(crate) fn classify_container<'v>(
    d: &'v Datum,
    orient: Orient,
    opts: &EncodeOptions,
) -> Result<ContainerClass<'v>> {
    match d {
        Datum::List(items) | Datum::Tuple(items) => Ok(ContainerClass::Seq(items)),
        Datum::Set(items) => Ok(ContainerClass::SetIter(items)),
        Datum::Map(pairs) => Ok(ContainerClass::Map(MapRef::Borrowed(pairs))),
        Datum::Array(buf) => {
            if buf.ndim() == 0 {
                return Err(EncodeError::Unsupported("0-d array".into()));
            }
            Ok(ContainerClass::Buffer { buf, keys: None })
        }
        Datum::Index(ix) => {
            if orient == Orient::Split {
                Ok(ContainerClass::IndexSplit(ix))
            } else {
                Ok(ContainerClass::Buffer {
                    buf: ix.values(),
                    keys: None,
                })
            }
        }
        Datum::Vector(v) => match orient {
            Orient::Split => Ok(ContainerClass::VectorSplit(v)),
            Orient::Index | Orient::Columns => {
                let keys = labels::encode_labels(v.index().values(), opts, v.len())?;
                Ok(ContainerClass::Buffer {
                    buf: v.values(),
                    keys: Some(keys),
                })
            }
            Orient::Records | Orient::Values => Ok(ContainerClass::Buffer {
                buf: v.values(),
                keys: None,
            }),
        },
        Datum::Table(t) => Ok(ContainerClass::Table(t)),
        Datum::Other(obj) => match obj.to_dict() {
            ToDict::Dict(pairs) => Ok(ContainerClass::Map(MapRef::Owned(pairs))),
            ToDict::Failed => Ok(ContainerClass::NullFallback),
            ToDict::Absent => {
                if opts.default_handler.is_some() {
                    Ok(ContainerClass::NeedsHandler)
                } else {
                    Ok(ContainerClass::Attrs(obj.as_ref()))
                }
            }
        },
        Datum::Complex { .. } => {
            if opts.default_handler.is_some() {
                Ok(ContainerClass::NeedsHandler)
            } else {
                Err(EncodeError::Unsupported("complex value".into()))
            }
        }
        // Scalars never reach container classification.
        _ => Err(EncodeError::Unsupported(format!("{d:?}"))),
    }
}

/// Classification for one buffer element; shares the scalar paths so
/// array elements and standalone scalars render identically.
///
/// # Errors
///
/// Returns overflow failures from integer widening.
pub(crate) fn classify_element<'v>(
    elem: ScalarElem<'v>,
    dtype_code: u8,
    opts: &EncodeOptions,
) -> Result<ElementClass<'v>> {
    Ok(match elem {
        ScalarElem::Bool(v) => ElementClass::Repr(ScalarRepr::Bool(v)),
        ScalarElem::Int(v) => ElementClass::Repr(ScalarRepr::Long(v)),
        ScalarElem::UInt(v) => ElementClass::Repr(uint_repr(v)?),
        ScalarElem::Float(v) => ElementClass::Repr(float_repr(v)),
        ScalarElem::DateTime64 { value, unit } => {
            ElementClass::Repr(timestamp_repr(value, unit, opts)?)
        }
        ScalarElem::Object(d) => ElementClass::Datum(d),
        ScalarElem::Complex(..) => ElementClass::Unsupported(dtype_code),
    })
}

fn uint_repr(v: u64) -> Result<ScalarRepr<'static>> {
    i64::try_from(v)
        .map(ScalarRepr::Long)
        .map_err(|_| EncodeError::Overflow(v.to_string()))
}

fn float_repr(v: f64) -> ScalarRepr<'static> {
    if v.is_finite() {
        ScalarRepr::Double(v)
    } else {
        ScalarRepr::Null
    }
}

/// Shared rendering decision for epoch-carried timestamps; the
/// not-a-time sentinel is resolved here, ahead of both modes.
pub(crate) fn timestamp_repr(
    value: i64,
    unit: TimeUnit,
    opts: &EncodeOptions,
) -> Result<ScalarRepr<'static>> {
    if value == NAT {
        return Ok(ScalarRepr::Null);
    }
    if opts.iso_dates {
        Ok(ScalarRepr::Str(Cow::Owned(datetime::iso_from_epoch(
            value,
            unit,
            opts.date_unit,
        )?)))
    } else {
        Ok(ScalarRepr::Long(datetime::rescale_epoch(
            value,
            unit,
            opts.date_unit,
        )?))
    }
}
