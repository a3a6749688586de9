//! Tabular object model for the tabwire encoder.
//!
//! Defines the value universe the encoder walks:
//!
//! - [`Datum`] — dynamic values: scalars, date/time values, containers,
//!   tabular objects, and opaque [`ObjectLike`] values
//! - [`NdBuffer`] / [`DType`] — typed n-dimensional buffers with per-axis
//!   strides and a stable dtype vocabulary
//! - [`Index`], [`Vector`], [`Table`] — labeled one- and two-dimensional
//!   containers with the iteration surface the encoder consumes
//!
//! The model is deliberately narrow: the encoder reaches values only
//! through element fetch, shape/stride/dtype inspection, attribute access
//! on [`ObjectLike`] values, and the table iteration methods.

pub mod buffer;
pub mod datum;
pub mod dtype;
pub mod error;
pub mod frame;

pub use buffer::{NdBuffer, ScalarElem};
pub use datum::{Datum, Decimal, ObjectLike, ToDict};
pub use dtype::{DType, TimeUnit, NAT};
pub use error::{ModelError, ModelResult};
pub use frame::{Index, Table, Vector};
