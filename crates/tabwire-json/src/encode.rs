//! Recursive encoder: container drivers and the orientation machine.
//!
//! [`Encoder`] owns the writer and the per-call state (current
//! orientation, recursion depth). Containers dispatch through
//! [`dispatch::classify_container`] and run one loop per driver; tables
//! resolve their orientation here, forcing the nested orientation for
//! contained vectors and buffers through a scoped rewrite that restores
//! the previous orientation on every exit path.

use tabwire_model::{Datum, Index, NdBuffer, ObjectLike, ScalarElem, Table, Vector};

use crate::dispatch::{self, ContainerClass, ElementClass, ScalarRepr};
use crate::error::{EncodeError, Result};
use crate::labels;
use crate::options::{EncodeOptions, Orient};
use crate::stride::Strider;
use crate::writer::JsonWriter;

/// Per-call encoder state.
pub(crate) struct Encoder<'o> {
    w: JsonWriter,
    opts: &'o EncodeOptions,
    orient: Orient,
    depth: usize,
}

impl<'o> Encoder<'o> {
    pub(crate) fn new(opts: &'o EncodeOptions) -> Self {
        Encoder {
            w: JsonWriter::new(opts.ensure_ascii, opts.encode_html_chars, opts.double_precision),
            opts,
            orient: opts.orient,
            depth: 0,
        }
    }

    pub(crate) fn into_bytes(self) -> Vec<u8> {
        self.w.into_bytes()
    }

    /// Encodes one value at the current orientation.
    pub(crate) fn encode_datum(&mut self, d: &Datum) -> Result<()> {
        if self.depth >= self.opts.recursion_limit {
            return Err(EncodeError::RecursionLimit);
        }
        self.depth += 1;
        let result = self.encode_datum_inner(d);
        self.depth -= 1;
        result
    }

    fn encode_datum_inner(&mut self, d: &Datum) -> Result<()> {
        if let Some(repr) = dispatch::scalar_repr(d, self.opts)? {
            self.write_repr(&repr);
            return Ok(());
        }
        match dispatch::classify_container(d, self.orient, self.opts)? {
            ContainerClass::Seq(items) | ContainerClass::SetIter(items) => self.encode_seq(items),
            ContainerClass::Map(map) => self.encode_map(map.pairs()),
            ContainerClass::Attrs(obj) => self.encode_attrs(obj),
            ContainerClass::NullFallback => {
                self.w.write_null();
                Ok(())
            }
            ContainerClass::IndexSplit(ix) => self.encode_index_split(ix),
            ContainerClass::VectorSplit(v) => self.encode_vector_split(v),
            ContainerClass::Buffer { buf, keys } => {
                self.encode_buffer(buf, keys.as_deref(), None, false)
            }
            ContainerClass::Table(t) => self.encode_table(t),
            ContainerClass::NeedsHandler => self.invoke_default_handler(d),
        }
    }

    fn write_repr(&mut self, repr: &ScalarRepr<'_>) {
        match repr {
            ScalarRepr::Null => self.w.write_null(),
            ScalarRepr::Bool(v) => self.w.write_bool(*v),
            ScalarRepr::Long(v) => self.w.write_i64(*v),
            ScalarRepr::Double(v) => self.w.write_f64(*v),
            ScalarRepr::Str(s) => self.w.write_str(s),
        }
    }

    fn encode_seq(&mut self, items: &[Datum]) -> Result<()> {
        self.w.begin_array();
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                self.w.comma();
            }
            self.encode_datum(item)?;
        }
        self.w.end_array();
        Ok(())
    }

    fn encode_map(&mut self, pairs: &[(Datum, Datum)]) -> Result<()> {
        self.w.begin_object();
        for (i, (key, value)) in pairs.iter().enumerate() {
            if i > 0 {
                self.w.comma();
            }
            let key = labels::datum_key_text(key, self.opts)?;
            self.w.write_key(&key);
            self.encode_datum(value)?;
        }
        self.w.end_object();
        Ok(())
    }

    /// Public-attribute iteration: `_`-prefixed and callable attributes
    /// are skipped, as are attributes whose fetch fails.
    fn encode_attrs(&mut self, obj: &dyn ObjectLike) -> Result<()> {
        self.w.begin_object();
        let mut first = true;
        for name in obj.attr_names() {
            if name.starts_with('_') || obj.is_callable(&name) {
                continue;
            }
            let Some(value) = obj.attr(&name) else {
                continue;
            };
            if !first {
                self.w.comma();
            }
            first = false;
            self.w.write_key(&name);
            self.encode_datum(&value)?;
        }
        self.w.end_object();
        Ok(())
    }

    fn encode_index_split(&mut self, ix: &Index) -> Result<()> {
        self.w.begin_object();
        self.w.write_key("name");
        match ix.name() {
            Some(name) => self.w.write_str(name),
            None => self.w.write_null(),
        }
        self.w.comma();
        self.w.write_key("data");
        self.encode_buffer(ix.values(), None, None, false)?;
        self.w.end_object();
        Ok(())
    }

    fn encode_vector_split(&mut self, v: &Vector) -> Result<()> {
        // Contained index and data emit raw values only.
        self.with_orient(Orient::Values, |e| {
            e.w.begin_object();
            e.w.write_key("name");
            match v.name() {
                Some(name) => e.w.write_str(name),
                None => e.w.write_null(),
            }
            e.w.comma();
            e.w.write_key("index");
            e.encode_buffer(v.index().values(), None, None, false)?;
            e.w.comma();
            e.w.write_key("data");
            e.encode_buffer(v.values(), None, None, false)?;
            e.w.end_object();
            Ok(())
        })
    }

    /// Emits a typed buffer. `col_keys` keys the leaf dimension,
    /// `row_keys` the outermost one; either being absent makes that
    /// dimension an array.
    pub(crate) fn encode_buffer(
        &mut self,
        buf: &NdBuffer,
        col_keys: Option<&[String]>,
        row_keys: Option<&[String]>,
        transpose: bool,
    ) -> Result<()> {
        let mut strider = Strider::begin(buf, transpose);
        self.encode_axis(&mut strider, buf, col_keys, row_keys)
    }

    fn encode_axis(
        &mut self,
        s: &mut Strider<'_>,
        buf: &NdBuffer,
        col_keys: Option<&[String]>,
        row_keys: Option<&[String]>,
    ) -> Result<()> {
        if self.depth >= self.opts.recursion_limit {
            return Err(EncodeError::RecursionLimit);
        }
        self.depth += 1;
        let result = self.encode_axis_inner(s, buf, col_keys, row_keys);
        self.depth -= 1;
        result
    }

    fn encode_axis_inner(
        &mut self,
        s: &mut Strider<'_>,
        buf: &NdBuffer,
        col_keys: Option<&[String]>,
        row_keys: Option<&[String]>,
    ) -> Result<()> {
        if s.at_leaf() {
            if col_keys.is_some() {
                self.w.begin_object();
            } else {
                self.w.begin_array();
            }
            let mut first = true;
            while let Some(elem) = s.next_leaf() {
                if !first {
                    self.w.comma();
                }
                first = false;
                if let Some(keys) = col_keys {
                    self.w.write_key(&keys[s.leaf_index()]);
                }
                self.encode_element(elem, buf)?;
            }
            if col_keys.is_some() {
                self.w.end_object();
            } else {
                self.w.end_array();
            }
        } else {
            let outer_keys = if s.depth() == 0 { row_keys } else { None };
            if outer_keys.is_some() {
                self.w.begin_object();
            } else {
                self.w.begin_array();
            }
            let mut first = true;
            while !s.axis_exhausted() {
                if !first {
                    self.w.comma();
                }
                first = false;
                if let Some(keys) = outer_keys {
                    self.w.write_key(&keys[s.axis_pos()]);
                }
                s.descend();
                self.encode_axis(s, buf, col_keys, row_keys)?;
                s.ascend();
            }
            if outer_keys.is_some() {
                self.w.end_object();
            } else {
                self.w.end_array();
            }
        }
        Ok(())
    }

    fn encode_element(&mut self, elem: ScalarElem<'_>, buf: &NdBuffer) -> Result<()> {
        match dispatch::classify_element(elem, buf.dtype().code(), self.opts)? {
            ElementClass::Repr(repr) => {
                self.write_repr(&repr);
                Ok(())
            }
            ElementClass::Datum(d) => self.encode_datum(d),
            ElementClass::Unsupported(code) => {
                if self.opts.default_handler.is_none() {
                    return Err(EncodeError::UnhandledDtype(code));
                }
                let stand_in = match elem {
                    ScalarElem::Complex(re, im) => Datum::Complex { re, im },
                    _ => return Err(EncodeError::UnhandledDtype(code)),
                };
                self.invoke_default_handler(&stand_in)
            }
        }
    }

    fn encode_table(&mut self, t: &Table) -> Result<()> {
        match self.orient {
            Orient::Split => self.with_orient(Orient::Values, |e| {
                e.w.begin_object();
                e.w.write_key("columns");
                e.encode_buffer(t.columns().values(), None, None, false)?;
                e.w.comma();
                e.w.write_key("index");
                e.encode_buffer(t.index().values(), None, None, false)?;
                e.w.comma();
                e.w.write_key("data");
                let values = t.values()?;
                e.encode_buffer(&values, None, None, false)?;
                e.w.end_object();
                Ok(())
            }),
            Orient::Values => {
                let values = t.values()?;
                self.encode_buffer(&values, None, None, false)
            }
            Orient::Records => {
                let rows = t.iterrows()?;
                // Each row emits as {column: value}.
                self.with_orient(Orient::Index, |e| {
                    e.w.begin_array();
                    for (i, (_label, row)) in rows.into_iter().enumerate() {
                        if i > 0 {
                            e.w.comma();
                        }
                        let row = Datum::Vector(row);
                        e.encode_datum(&row)?;
                    }
                    e.w.end_array();
                    Ok(())
                })
            }
            Orient::Index => {
                let keys = labels::encode_labels(t.index().values(), self.opts, t.nrows())?;
                let rows = t.iterrows()?;
                self.w.begin_object();
                for (i, (_label, row)) in rows.into_iter().enumerate() {
                    if i > 0 {
                        self.w.comma();
                    }
                    self.w.write_key(&keys[i]);
                    let row = Datum::Vector(row);
                    self.encode_datum(&row)?;
                }
                self.w.end_object();
                Ok(())
            }
            Orient::Columns => {
                let keys = labels::encode_labels(t.columns().values(), self.opts, t.ncols())?;
                let cols = t.items()?;
                self.w.begin_object();
                for (i, (_label, col)) in cols.into_iter().enumerate() {
                    if i > 0 {
                        self.w.comma();
                    }
                    self.w.write_key(&keys[i]);
                    let col = Datum::Vector(col);
                    self.encode_datum(&col)?;
                }
                self.w.end_object();
                Ok(())
            }
        }
    }

    fn invoke_default_handler(&mut self, d: &Datum) -> Result<()> {
        let handler = self
            .opts
            .default_handler
            .clone()
            .ok_or(EncodeError::DefaultHandlerFailed)?;
        tracing::warn!("default handler engaged for unencodable value");
        let replacement = (handler.as_ref())(d).map_err(|error| {
            tracing::warn!(%error, "default handler failed");
            EncodeError::DefaultHandlerFailed
        })?;
        self.encode_datum(&replacement)
    }

    /// Runs `f` with `orient` in force, restoring the previous
    /// orientation on every exit path.
    fn with_orient<F>(&mut self, orient: Orient, f: F) -> Result<()>
    where
        F: FnOnce(&mut Self) -> Result<()>,
    {
        let saved = self.orient;
        self.orient = orient;
        let result = f(self);
        self.orient = saved;
        result
    }
}
