//! Streaming JSON encoder for tabular values.
//!
//! Converts [`Datum`] values (scalars, date/time values, generic
//! containers, typed n-dimensional buffers, and labeled
//! indexes/vectors/tables) into a UTF-8 JSON text stream. Tables and
//! vectors support five orientations (for a table with columns `C` and
//! index `I`):
//!
//! | orient | shape |
//! |--------|-------|
//! | `records` | `[{c: v, …}, …]` |
//! | `index` | `{i: {c: v, …}, …}` |
//! | `columns` | `{c: {i: v, …}, …}` |
//! | `split` | `{"columns": […], "index": […], "data": [[…], …]}` |
//! | `values` | `[[v, …], …]` |
//!
//! Vectors follow the same scheme; `split` gives
//! `{"name": …, "index": […], "data": […]}`.
//!
//! ```
//! use tabwire_json::model::Datum;
//! use tabwire_json::{encode, EncodeOptions};
//!
//! let value = Datum::Map(vec![
//!     (Datum::from("a"), Datum::Int(1)),
//!     (Datum::from("b"), Datum::Null),
//! ]);
//! let text = encode(&value, &EncodeOptions::default()).unwrap();
//! assert_eq!(text, r#"{"a":1,"b":null}"#);
//! ```
//!
//! Option errors reject before any output; every runtime failure aborts
//! the traversal and surfaces as an [`EncodeError`] with no partial
//! output.

mod datetime;
mod dispatch;
mod encode;
mod labels;
mod stride;
mod writer;

pub mod error;
pub mod options;

pub use error::{EncodeError, Result};
pub use options::{
    parse_date_unit, DefaultHandler, EncodeOptions, Orient, DEFAULT_RECURSION_LIMIT,
    DOUBLE_MAX_DECIMALS,
};

/// Convenience re-export of the object model.
pub use tabwire_model as model;

use tabwire_model::Datum;

/// Encodes a value to JSON text.
///
/// # Errors
///
/// Returns an [`EncodeError`] for invalid options or any traversal
/// failure; no partial output is produced.
pub fn encode(value: &Datum, opts: &EncodeOptions) -> Result<String> {
    let bytes = encode_to_vec(value, opts)?;
    String::from_utf8(bytes).map_err(|_| EncodeError::InvalidUtf8)
}

/// Encodes a value to UTF-8 JSON bytes.
///
/// # Errors
///
/// Returns an [`EncodeError`] for invalid options or any traversal
/// failure; no partial output is produced.
pub fn encode_to_vec(value: &Datum, opts: &EncodeOptions) -> Result<Vec<u8>> {
    opts.validate()?;
    tracing::debug!(
        orient = ?opts.orient,
        date_unit = %opts.date_unit,
        iso_dates = opts.iso_dates,
        "encoding value"
    );
    let mut encoder = encode::Encoder::new(opts);
    encoder.encode_datum(value)?;
    Ok(encoder.into_bytes())
}
