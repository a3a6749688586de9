//! Label pre-encoding.
//!
//! Object keys for labeled emissions (vector indexes, table axes,
//! mapping keys) are rendered to plain text once, before iteration;
//! the writer adds quoting, escaping, and the trailing colon at emit
//! time. Date-time and numeric labels go through the same scalar
//! classification as values, so a timestamp renders identically as a
//! key and as a value.

use tabwire_model::{Datum, NdBuffer};

use crate::dispatch::{self, ElementClass, ScalarRepr};
use crate::error::{EncodeError, Result};
use crate::options::EncodeOptions;
use crate::writer;

/// Renders every label of a 1-dimensional buffer to key text.
///
/// # Errors
///
/// Returns [`EncodeError::LabelShapeMismatch`] when the buffer holds
/// fewer than `expected` labels, and propagates rendering failures.
pub(crate) fn encode_labels(
    buf: &NdBuffer,
    opts: &EncodeOptions,
    expected: usize,
) -> Result<Vec<String>> {
    if buf.element_count() < expected {
        return Err(EncodeError::LabelShapeMismatch);
    }
    let stride = buf.stride(0);
    let code = buf.dtype().code();
    let mut out = Vec::with_capacity(expected);
    for i in 0..expected {
        let elem = buf.read_scalar(stride * i as isize);
        let text = match dispatch::classify_element(elem, code, opts)? {
            ElementClass::Repr(repr) => repr_key_text(&repr, opts.double_precision),
            ElementClass::Datum(d) => datum_key_text(d, opts)?,
            ElementClass::Unsupported(code) => return Err(EncodeError::UnhandledDtype(code)),
        };
        out.push(text);
    }
    Ok(out)
}

/// Key text for an already-classified scalar.
pub(crate) fn repr_key_text(repr: &ScalarRepr<'_>, precision: u8) -> String {
    match repr {
        ScalarRepr::Null => "null".to_owned(),
        ScalarRepr::Bool(v) => if *v { "true" } else { "false" }.to_owned(),
        ScalarRepr::Long(v) => {
            let mut scratch = itoa::Buffer::new();
            scratch.format(*v).to_owned()
        }
        ScalarRepr::Double(v) => {
            let mut buf = Vec::new();
            writer::push_f64(&mut buf, *v, precision);
            String::from_utf8(buf).unwrap_or_default()
        }
        ScalarRepr::Str(s) => s.clone().into_owned(),
    }
}

/// Key text for an arbitrary datum: scalars through the scalar paths,
/// containers through a full encode of their JSON form.
///
/// # Errors
///
/// Propagates scalar classification and nested encode failures.
pub(crate) fn datum_key_text(d: &Datum, opts: &EncodeOptions) -> Result<String> {
    match dispatch::scalar_repr(d, opts)? {
        Some(repr) => Ok(repr_key_text(&repr, opts.double_precision)),
        None => crate::encode(d, opts),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabwire_model::{TimeUnit, NAT};

    #[test]
    fn test_integer_labels() {
        let opts = EncodeOptions::default();
        let buf = NdBuffer::from_i64(vec![0, 1, -5]);
        assert_eq!(encode_labels(&buf, &opts, 3).unwrap(), vec!["0", "1", "-5"]);
    }

    #[test]
    fn test_string_labels_stay_plain() {
        let opts = EncodeOptions::default();
        let buf = NdBuffer::from_datums(vec![Datum::from("a"), Datum::from("b\"c")]);
        // No quoting here; the writer escapes at emit time.
        assert_eq!(encode_labels(&buf, &opts, 2).unwrap(), vec!["a", "b\"c"]);
    }

    #[test]
    fn test_float_labels_use_precision() {
        let opts = EncodeOptions::default().with_double_precision(2);
        let buf = NdBuffer::from_f64(vec![0.125]);
        assert_eq!(encode_labels(&buf, &opts, 1).unwrap(), vec!["0.12"]);
    }

    #[test]
    fn test_datetime_labels_follow_date_mode() {
        let buf = NdBuffer::from_datetime64(vec![86_400_000, NAT], TimeUnit::Millis);
        let epoch = EncodeOptions::default().with_date_unit(TimeUnit::Seconds);
        assert_eq!(
            encode_labels(&buf, &epoch, 2).unwrap(),
            vec!["86400", "null"]
        );
        let iso = epoch.clone().with_iso_dates(true);
        assert_eq!(
            encode_labels(&buf, &iso, 2).unwrap(),
            vec!["1970-01-02T00:00:00", "null"]
        );
    }

    #[test]
    fn test_count_mismatch() {
        let opts = EncodeOptions::default();
        let buf = NdBuffer::from_i64(vec![0, 1]);
        let err = encode_labels(&buf, &opts, 3).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Label array sizes do not match corresponding data shape"
        );
    }
}
