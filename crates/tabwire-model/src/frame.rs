//! Labeled containers: [`Index`], [`Vector`], [`Table`].
//!
//! A table holds one 1-dimensional buffer per column plus two label
//! indexes (column names and row labels). The encoder consumes tables
//! through three views: [`Table::values`] (2-D materialisation),
//! [`Table::items`] (column pairs), and [`Table::iterrows`] (row pairs).

use crate::buffer::NdBuffer;
use crate::datum::Datum;
use crate::dtype::DType;
use crate::error::{ModelError, ModelResult};

/// A labeled one-dimensional axis.
#[derive(Debug, Clone)]
pub struct Index {
    name: Option<String>,
    values: NdBuffer,
}

impl Index {
    /// Creates an index over a 1-dimensional buffer.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::NotOneDimensional`] for any other rank.
    pub fn new(values: NdBuffer) -> ModelResult<Self> {
        if values.ndim() != 1 {
            return Err(ModelError::NotOneDimensional(values.ndim()));
        }
        Ok(Index { name: None, values })
    }

    /// Sets the index name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// The index name, if any.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The label buffer.
    #[must_use]
    pub fn values(&self) -> &NdBuffer {
        &self.values
    }

    /// Number of labels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// `true` when the index holds no labels.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Label `i` as a datum.
    ///
    /// # Errors
    ///
    /// Propagates element materialisation failures.
    pub fn label_at(&self, i: usize) -> ModelResult<Datum> {
        self.values.datum_at(i)
    }
}

/// A labeled one-dimensional data container.
#[derive(Debug, Clone)]
pub struct Vector {
    name: Option<String>,
    index: Index,
    values: NdBuffer,
}

impl Vector {
    /// Creates a vector from an index and a 1-dimensional value buffer
    /// of the same length.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::NotOneDimensional`] or
    /// [`ModelError::LengthMismatch`].
    pub fn new(index: Index, values: NdBuffer) -> ModelResult<Self> {
        if values.ndim() != 1 {
            return Err(ModelError::NotOneDimensional(values.ndim()));
        }
        if index.len() != values.len() {
            return Err(ModelError::LengthMismatch {
                what: "index",
                got: index.len(),
                expected: values.len(),
            });
        }
        Ok(Vector {
            name: None,
            index,
            values,
        })
    }

    /// Sets the vector name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// The vector name, if any.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The row-label index.
    #[must_use]
    pub fn index(&self) -> &Index {
        &self.index
    }

    /// The value buffer.
    #[must_use]
    pub fn values(&self) -> &NdBuffer {
        &self.values
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// `true` when the vector holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// A two-dimensional labeled table: one buffer per column.
#[derive(Debug, Clone)]
pub struct Table {
    columns: Index,
    index: Index,
    cols: Vec<NdBuffer>,
}

impl Table {
    /// Creates a table from column labels, row labels, and one
    /// 1-dimensional buffer per column.
    ///
    /// # Errors
    ///
    /// Returns a length or rank error when the parts disagree.
    pub fn new(columns: Index, index: Index, cols: Vec<NdBuffer>) -> ModelResult<Self> {
        if columns.len() != cols.len() {
            return Err(ModelError::LengthMismatch {
                what: "columns",
                got: columns.len(),
                expected: cols.len(),
            });
        }
        for col in &cols {
            if col.ndim() != 1 {
                return Err(ModelError::NotOneDimensional(col.ndim()));
            }
            if col.len() != index.len() {
                return Err(ModelError::LengthMismatch {
                    what: "column",
                    got: col.len(),
                    expected: index.len(),
                });
            }
        }
        Ok(Table {
            columns,
            index,
            cols,
        })
    }

    /// Column labels.
    #[must_use]
    pub fn columns(&self) -> &Index {
        &self.columns
    }

    /// Row labels.
    #[must_use]
    pub fn index(&self) -> &Index {
        &self.index
    }

    /// Number of columns.
    #[must_use]
    pub fn ncols(&self) -> usize {
        self.cols.len()
    }

    /// Number of rows.
    #[must_use]
    pub fn nrows(&self) -> usize {
        self.index.len()
    }

    /// Column buffer `c`.
    #[must_use]
    pub fn col(&self, c: usize) -> &NdBuffer {
        &self.cols[c]
    }

    /// The dtype shared by every column, when columns are homogeneous
    /// and numeric.
    fn common_dtype(&self) -> Option<DType> {
        let first = self.cols.first()?.dtype();
        if first.is_object() {
            return None;
        }
        self.cols
            .iter()
            .all(|c| c.dtype() == first)
            .then_some(first)
    }

    /// Materialises the table as a 2-dimensional row-major buffer of
    /// shape `(nrows, ncols)`: the shared dtype when columns agree,
    /// otherwise the object dtype.
    ///
    /// # Errors
    ///
    /// Propagates element materialisation failures from mixed columns.
    pub fn values(&self) -> ModelResult<NdBuffer> {
        let (nrows, ncols) = (self.nrows(), self.ncols());
        let buf = if let Some(dtype) = self.common_dtype() {
            let mut data = Vec::with_capacity(nrows * ncols * dtype.item_size());
            for r in 0..nrows {
                for col in &self.cols {
                    col.copy_element_bytes(r, &mut data);
                }
            }
            NdBuffer::from_raw(dtype, data)
        } else {
            let mut data = Vec::with_capacity(nrows * ncols);
            for r in 0..nrows {
                for col in &self.cols {
                    data.push(col.datum_at(r)?);
                }
            }
            NdBuffer::from_datums(data)
        };
        buf.with_shape(vec![nrows, ncols])
    }

    /// `(column label, column vector)` pairs, in column order.
    ///
    /// Each column vector carries the table's row labels as its index.
    ///
    /// # Errors
    ///
    /// Propagates label materialisation failures.
    pub fn items(&self) -> ModelResult<Vec<(Datum, Vector)>> {
        let mut out = Vec::with_capacity(self.ncols());
        for (c, col) in self.cols.iter().enumerate() {
            let label = self.columns.label_at(c)?;
            let mut vector = Vector::new(self.index.clone(), col.clone())?;
            if let Datum::Str(name) = &label {
                vector = vector.with_name(name.clone());
            }
            out.push((label, vector));
        }
        Ok(out)
    }

    /// `(row label, row vector)` pairs, in row order.
    ///
    /// Each row vector carries the table's columns as its index.
    ///
    /// # Errors
    ///
    /// Propagates element materialisation failures.
    pub fn iterrows(&self) -> ModelResult<Vec<(Datum, Vector)>> {
        let mut out = Vec::with_capacity(self.nrows());
        for r in 0..self.nrows() {
            let label = self.index.label_at(r)?;
            let row = self.row_buffer(r)?;
            out.push((label, Vector::new(self.columns.clone(), row)?));
        }
        Ok(out)
    }

    fn row_buffer(&self, r: usize) -> ModelResult<NdBuffer> {
        if let Some(dtype) = self.common_dtype() {
            let mut data = Vec::with_capacity(self.ncols() * dtype.item_size());
            for col in &self.cols {
                col.copy_element_bytes(r, &mut data);
            }
            Ok(NdBuffer::from_raw(dtype, data))
        } else {
            let mut data = Vec::with_capacity(self.ncols());
            for col in &self.cols {
                data.push(col.datum_at(r)?);
            }
            Ok(NdBuffer::from_datums(data))
        }
    }
}
