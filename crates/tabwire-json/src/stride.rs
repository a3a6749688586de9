//! Stride-based traversal of typed n-dimensional buffers.
//!
//! A [`Strider`] walks one buffer axis at a time by keeping a per-axis
//! index vector and a running offset, maintaining the invariant
//! `offset = Σ stride_i · index_i` at every leaf read. Transposed walks
//! run the axes in reverse (`step = −1`, starting at the last axis).
//! Descent hands the same strider to the nested emission level; ascent
//! rewinds the inner axis and advances the outer one.

use smallvec::SmallVec;
use tabwire_model::{NdBuffer, ScalarElem};

/// Walk state over one [`NdBuffer`].
#[derive(Debug)]
pub struct Strider<'b> {
    buf: &'b NdBuffer,
    /// Running element offset (bytes or slots, matching the buffer).
    offset: isize,
    /// Number of dimensions minus one; the leaf depth.
    ndim: usize,
    /// Current descent depth, `0..=ndim`.
    depth: usize,
    /// Axis currently being strided.
    axis: usize,
    /// Axis step per descent: `+1` normal, `−1` transposed.
    step: isize,
    /// Size of the current axis.
    dim: usize,
    /// Stride of the current axis.
    stride: isize,
    index: SmallVec<[usize; 4]>,
}

impl<'b> Strider<'b> {
    /// Starts a walk at the first axis (or the last, when transposed).
    ///
    /// The buffer must have at least one dimension; the dispatcher
    /// rejects 0-dimensional buffers before a strider is built.
    #[must_use]
    pub fn begin(buf: &'b NdBuffer, transpose: bool) -> Self {
        debug_assert!(buf.ndim() >= 1);
        let ndim = buf.ndim() - 1;
        let (axis, step) = if transpose { (ndim, -1) } else { (0, 1) };
        Strider {
            buf,
            offset: 0,
            ndim,
            depth: 0,
            axis,
            step,
            dim: buf.dim(axis),
            stride: buf.stride(axis),
            index: SmallVec::from_elem(0, ndim + 1),
        }
    }

    /// `true` when the walk sits at the innermost axis.
    #[must_use]
    pub fn at_leaf(&self) -> bool {
        self.depth >= self.ndim
    }

    /// Current descent depth; 0 at the outermost axis.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// `true` when the current axis has no slots left.
    #[must_use]
    pub fn axis_exhausted(&self) -> bool {
        self.index[self.axis] >= self.dim
    }

    /// Size of the current axis.
    #[must_use]
    pub fn axis_len(&self) -> usize {
        self.dim
    }

    /// Position of the next slot on the current axis.
    #[must_use]
    pub fn axis_pos(&self) -> usize {
        self.index[self.axis]
    }

    /// Consumes one slot of the current axis and descends into it.
    pub fn descend(&mut self) {
        debug_assert!(!self.at_leaf() && !self.axis_exhausted());
        tracing::trace!(depth = self.depth, axis = self.axis, "strider descent");
        self.index[self.axis] += 1;
        self.depth += 1;
        self.axis = (self.axis as isize + self.step) as usize;
        self.dim = self.buf.dim(self.axis);
        self.stride = self.buf.stride(self.axis);
        self.index[self.axis] = 0;
    }

    /// Pops one level: rewinds the inner axis and moves the outer axis
    /// to its next slot.
    pub fn ascend(&mut self) {
        debug_assert!(self.depth > 0);
        self.depth -= 1;
        self.offset -= self.stride * self.index[self.axis] as isize;
        self.axis = (self.axis as isize - self.step) as usize;
        self.dim = self.buf.dim(self.axis);
        self.stride = self.buf.stride(self.axis);
        self.offset += self.stride;
    }

    /// Reads the next leaf element and advances, or `None` when the
    /// leaf axis is exhausted.
    #[must_use]
    pub fn next_leaf(&mut self) -> Option<ScalarElem<'b>> {
        debug_assert!(self.at_leaf());
        if self.axis_exhausted() {
            return None;
        }
        self.debug_check_offset();
        let elem = self.buf.read_scalar(self.offset);
        self.offset += self.stride;
        self.index[self.axis] += 1;
        Some(elem)
    }

    /// Index of the leaf element produced by the latest
    /// [`next_leaf`](Self::next_leaf) call; keys into column labels.
    #[must_use]
    pub fn leaf_index(&self) -> usize {
        self.index[self.axis] - 1
    }

    /// Verifies `offset = Σ stride_i · index_i` over the visited axes.
    /// Outer axes count the slot currently being descended into, so
    /// their contribution is `index − 1`.
    fn debug_check_offset(&self) {
        #[cfg(debug_assertions)]
        {
            let mut expected = 0isize;
            let mut axis = if self.step > 0 { 0isize } else { self.ndim as isize };
            for d in 0..=self.depth {
                let a = axis as usize;
                let idx = if d < self.depth {
                    self.index[a] - 1
                } else {
                    self.index[a]
                };
                expected += self.buf.stride(a) * idx as isize;
                axis += self.step;
            }
            debug_assert_eq!(self.offset, expected, "strider offset invariant");
        }
    }
}
