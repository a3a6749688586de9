//! Encoder error types.
//!
//! Provides [`EncodeError`] covering the option, type, overflow,
//! conversion, shape, handler, and recursion failure classes, plus a
//! convenience [`Result`] alias. Option errors reject before any output;
//! every other class aborts the traversal with no partial output.

use thiserror::Error;

/// Result alias for encoder operations.
pub type Result<T> = std::result::Result<T, EncodeError>;

/// Errors that can occur while encoding a value.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// An unrecognised `orient` or `date_unit` option string.
    #[error("Invalid value '{value}' for option '{option}'")]
    InvalidOption {
        /// The option name.
        option: &'static str,
        /// The rejected value.
        value: String,
    },

    /// `double_precision` outside the supported range.
    #[error("Invalid value '{value}' for option 'double_precision', max is '{max}'")]
    InvalidPrecision {
        /// The rejected precision.
        value: u8,
        /// The supported maximum.
        max: u8,
    },

    /// A value the dispatcher cannot classify.
    #[error("{0} is not JSON serializable")]
    Unsupported(String),

    /// A typed-buffer element dtype with no JSON mapping.
    #[error("Unhandled dtype {0}")]
    UnhandledDtype(u8),

    /// An integer or duration outside the representable range.
    #[error("value out of range for JSON integer: {0}")]
    Overflow(String),

    /// A date-time value that could not be rendered.
    #[error("Could not convert datetime value to string")]
    DatetimeConversion,

    /// A byte string that is not valid UTF-8.
    #[error("byte string is not valid UTF-8")]
    InvalidUtf8,

    /// Label count disagrees with the labeled data.
    #[error("Label array sizes do not match corresponding data shape")]
    LabelShapeMismatch,

    /// The default handler raised or produced nothing usable.
    #[error("Failed to execute default handler")]
    DefaultHandlerFailed,

    /// Nesting beyond the configured maximum.
    #[error("Maximum recursion level reached")]
    RecursionLimit,

    /// A model-level failure surfaced while materialising a view.
    #[error("model error: {0}")]
    Model(#[from] tabwire_model::ModelError),
}
