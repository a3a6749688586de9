//! Model error types.

use thiserror::Error;

/// Result alias for model operations.
pub type ModelResult<T> = Result<T, ModelError>;

/// Errors raised while constructing or materialising model values.
#[derive(Debug, Error)]
pub enum ModelError {
    /// Storage length does not match the product of the requested shape.
    #[error("buffer length {len} does not match shape {shape:?}")]
    ShapeMismatch {
        /// Number of elements in the storage.
        len: usize,
        /// The requested shape.
        shape: Vec<usize>,
    },

    /// A container expected a one-dimensional buffer.
    #[error("expected a 1-dimensional buffer, got {0} dimensions")]
    NotOneDimensional(usize),

    /// Label/value lengths disagree when assembling a labeled container.
    #[error("length mismatch: {what} has {got} entries, expected {expected}")]
    LengthMismatch {
        /// Which part disagreed.
        what: &'static str,
        /// Observed length.
        got: usize,
        /// Required length.
        expected: usize,
    },

    /// An element dtype that cannot be materialised as a [`Datum`].
    ///
    /// [`Datum`]: crate::Datum
    #[error("cannot materialise element of dtype {0}")]
    UnsupportedElement(u8),
}
