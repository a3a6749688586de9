//! Typed n-dimensional buffers.
//!
//! [`NdBuffer`] pairs a [`DType`] with contiguous storage and a per-axis
//! stride table. Numeric dtypes store raw native-endian bytes and measure
//! strides in bytes; the object dtype stores dynamic values and measures
//! strides in slots. Element fetch goes through [`NdBuffer::read_scalar`],
//! which hands back a [`ScalarElem`] view at a given offset; it is the
//! only element access path the encoder uses.

use crate::datum::Datum;
use crate::dtype::{DType, TimeUnit};
use crate::error::{ModelError, ModelResult};

/// Backing storage of a buffer.
#[derive(Debug, Clone)]
enum Storage {
    /// Raw native-endian element bytes.
    Bytes(Vec<u8>),
    /// One datum per slot (object dtype).
    Slots(Vec<Datum>),
}

/// A typed n-dimensional buffer with per-axis strides.
#[derive(Debug, Clone)]
pub struct NdBuffer {
    dtype: DType,
    shape: Vec<usize>,
    strides: Vec<isize>,
    storage: Storage,
}

/// Element view produced by [`NdBuffer::read_scalar`].
#[derive(Debug, Clone, Copy)]
pub enum ScalarElem<'a> {
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    /// Epoch integer plus resolution; `NAT` marks absence.
    DateTime64 {
        value: i64,
        unit: TimeUnit,
    },
    /// Real and imaginary part. No JSON mapping exists for this element.
    Complex(f64, f64),
    Object(&'a Datum),
}

impl NdBuffer {
    /// One-dimensional buffer over pre-gathered native-endian bytes.
    pub(crate) fn from_raw(dtype: DType, data: Vec<u8>) -> Self {
        Self::from_bytes(dtype, data)
    }

    fn from_bytes(dtype: DType, data: Vec<u8>) -> Self {
        let item = dtype.item_size();
        debug_assert_eq!(data.len() % item, 0);
        let len = data.len() / item;
        NdBuffer {
            dtype,
            shape: vec![len],
            strides: vec![item as isize],
            storage: Storage::Bytes(data),
        }
    }

    /// One-dimensional `Int64` buffer.
    #[must_use]
    pub fn from_i64(values: Vec<i64>) -> Self {
        let mut data = Vec::with_capacity(values.len() * 8);
        for v in &values {
            data.extend_from_slice(&v.to_ne_bytes());
        }
        Self::from_bytes(DType::Int64, data)
    }

    /// One-dimensional `Int32` buffer.
    #[must_use]
    pub fn from_i32(values: Vec<i32>) -> Self {
        let mut data = Vec::with_capacity(values.len() * 4);
        for v in &values {
            data.extend_from_slice(&v.to_ne_bytes());
        }
        Self::from_bytes(DType::Int32, data)
    }

    /// One-dimensional `UInt64` buffer.
    #[must_use]
    pub fn from_u64(values: Vec<u64>) -> Self {
        let mut data = Vec::with_capacity(values.len() * 8);
        for v in &values {
            data.extend_from_slice(&v.to_ne_bytes());
        }
        Self::from_bytes(DType::UInt64, data)
    }

    /// One-dimensional `Float64` buffer.
    #[must_use]
    pub fn from_f64(values: Vec<f64>) -> Self {
        let mut data = Vec::with_capacity(values.len() * 8);
        for v in &values {
            data.extend_from_slice(&v.to_ne_bytes());
        }
        Self::from_bytes(DType::Float64, data)
    }

    /// One-dimensional `Bool` buffer.
    #[must_use]
    pub fn from_bool(values: Vec<bool>) -> Self {
        let data = values.into_iter().map(u8::from).collect();
        Self::from_bytes(DType::Bool, data)
    }

    /// One-dimensional temporal buffer of epoch integers at `unit`.
    #[must_use]
    pub fn from_datetime64(values: Vec<i64>, unit: TimeUnit) -> Self {
        let mut data = Vec::with_capacity(values.len() * 8);
        for v in &values {
            data.extend_from_slice(&v.to_ne_bytes());
        }
        Self::from_bytes(DType::DateTime64(unit), data)
    }

    /// One-dimensional `Complex128` buffer of (real, imaginary) pairs.
    #[must_use]
    pub fn from_complex128(values: Vec<(f64, f64)>) -> Self {
        let mut data = Vec::with_capacity(values.len() * 16);
        for (re, im) in &values {
            data.extend_from_slice(&re.to_ne_bytes());
            data.extend_from_slice(&im.to_ne_bytes());
        }
        Self::from_bytes(DType::Complex128, data)
    }

    /// One-dimensional object buffer of dynamic values.
    #[must_use]
    pub fn from_datums(values: Vec<Datum>) -> Self {
        let len = values.len();
        NdBuffer {
            dtype: DType::Object,
            shape: vec![len],
            strides: vec![1],
            storage: Storage::Slots(values),
        }
    }

    /// Reshapes the buffer to `shape` with contiguous row-major strides.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::ShapeMismatch`] when the element count does
    /// not equal the product of `shape`.
    pub fn with_shape(mut self, shape: Vec<usize>) -> ModelResult<Self> {
        let len = self.element_count();
        let wanted: usize = shape.iter().product();
        if len != wanted {
            return Err(ModelError::ShapeMismatch { len, shape });
        }
        let item = match self.storage {
            Storage::Bytes(_) => self.dtype.item_size() as isize,
            Storage::Slots(_) => 1,
        };
        let mut strides = vec![0isize; shape.len()];
        let mut acc = item;
        for (axis, dim) in shape.iter().enumerate().rev() {
            strides[axis] = acc;
            acc *= *dim as isize;
        }
        self.shape = shape;
        self.strides = strides;
        Ok(self)
    }

    /// The element dtype.
    #[must_use]
    pub fn dtype(&self) -> DType {
        self.dtype
    }

    /// Number of dimensions.
    #[must_use]
    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    /// The shape vector.
    #[must_use]
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Size of one axis.
    #[must_use]
    pub fn dim(&self, axis: usize) -> usize {
        self.shape[axis]
    }

    /// Stride of one axis, in bytes (numeric dtypes) or slots (object).
    #[must_use]
    pub fn stride(&self, axis: usize) -> isize {
        self.strides[axis]
    }

    /// Total number of elements.
    #[must_use]
    pub fn element_count(&self) -> usize {
        match &self.storage {
            Storage::Bytes(b) => b.len() / self.dtype.item_size(),
            Storage::Slots(s) => s.len(),
        }
    }

    /// Length along the first axis; 0 for a 0-dimensional buffer.
    #[must_use]
    pub fn len(&self) -> usize {
        self.shape.first().copied().unwrap_or(0)
    }

    /// `true` when the buffer holds no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.element_count() == 0
    }

    /// Reads the element at `offset` (bytes for numeric storage, slots
    /// for object storage).
    ///
    /// # Panics
    ///
    /// Panics when `offset` is negative or out of range; callers derive
    /// offsets from the buffer's own strides.
    #[must_use]
    pub fn read_scalar(&self, offset: isize) -> ScalarElem<'_> {
        let at = usize::try_from(offset).expect("negative buffer offset");
        match &self.storage {
            Storage::Slots(slots) => ScalarElem::Object(&slots[at]),
            Storage::Bytes(bytes) => match self.dtype {
                DType::Bool => ScalarElem::Bool(bytes[at] != 0),
                DType::Int8 => ScalarElem::Int(i64::from(bytes[at] as i8)),
                DType::Int16 => ScalarElem::Int(i64::from(i16::from_ne_bytes(read::<2>(bytes, at)))),
                DType::Int32 => ScalarElem::Int(i64::from(i32::from_ne_bytes(read::<4>(bytes, at)))),
                DType::Int64 => ScalarElem::Int(i64::from_ne_bytes(read::<8>(bytes, at))),
                DType::UInt8 => ScalarElem::UInt(u64::from(bytes[at])),
                DType::UInt16 => {
                    ScalarElem::UInt(u64::from(u16::from_ne_bytes(read::<2>(bytes, at))))
                }
                DType::UInt32 => {
                    ScalarElem::UInt(u64::from(u32::from_ne_bytes(read::<4>(bytes, at))))
                }
                DType::UInt64 => ScalarElem::UInt(u64::from_ne_bytes(read::<8>(bytes, at))),
                DType::Float32 => {
                    ScalarElem::Float(f64::from(f32::from_ne_bytes(read::<4>(bytes, at))))
                }
                DType::Float64 => ScalarElem::Float(f64::from_ne_bytes(read::<8>(bytes, at))),
                DType::DateTime64(unit) => ScalarElem::DateTime64 {
                    value: i64::from_ne_bytes(read::<8>(bytes, at)),
                    unit,
                },
                DType::Complex128 => ScalarElem::Complex(
                    f64::from_ne_bytes(read::<8>(bytes, at)),
                    f64::from_ne_bytes(read::<8>(bytes, at + 8)),
                ),
                DType::Object => unreachable!("object dtype uses slot storage"),
            },
        }
    }

    /// Materialises element `i` of a 1-dimensional buffer as a [`Datum`].
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::UnsupportedElement`] for dtypes with no
    /// datum representation (`Complex128`).
    pub fn datum_at(&self, i: usize) -> ModelResult<Datum> {
        debug_assert_eq!(self.ndim(), 1);
        let elem = self.read_scalar(self.strides[0] * i as isize);
        elem_to_datum(elem, self.dtype)
    }

    /// Copies the raw bytes of element `i` of a 1-dimensional numeric
    /// buffer into `out`. Used when gathering rows of a common dtype.
    pub(crate) fn copy_element_bytes(&self, i: usize, out: &mut Vec<u8>) {
        let item = self.dtype.item_size();
        match &self.storage {
            Storage::Bytes(bytes) => {
                let at = usize::try_from(self.strides[0] * i as isize)
                    .expect("negative buffer offset");
                out.extend_from_slice(&bytes[at..at + item]);
            }
            Storage::Slots(_) => unreachable!("byte gather on object storage"),
        }
    }
}

fn elem_to_datum(elem: ScalarElem<'_>, dtype: DType) -> ModelResult<Datum> {
    Ok(match elem {
        ScalarElem::Bool(v) => Datum::Bool(v),
        ScalarElem::Int(v) => Datum::Int(v),
        ScalarElem::UInt(v) => Datum::UInt(v),
        ScalarElem::Float(v) => Datum::Float(v),
        ScalarElem::DateTime64 { value, unit } => Datum::Timestamp64 { value, unit },
        ScalarElem::Object(d) => d.clone(),
        ScalarElem::Complex(..) => return Err(ModelError::UnsupportedElement(dtype.code())),
    })
}

fn read<const N: usize>(bytes: &[u8], at: usize) -> [u8; N] {
    bytes[at..at + N].try_into().expect("slice length mismatch")
}
