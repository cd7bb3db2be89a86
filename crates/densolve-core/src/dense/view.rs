//! Borrowed matrix views.

use core::ops::Range;

use crate::Scalar;
use crate::error::{CoreError, Result};

use super::{Dense, check_layout, required_len};

/// A read-only view into row-major storage.
///
/// The view borrows its buffer; it never owns or copies elements.
#[derive(Debug, Clone, Copy)]
pub struct DenseRef<'a, T> {
    data: &'a [T],
    rows: usize,
    cols: usize,
    stride: usize,
}

/// A mutable view into row-major storage.
///
/// Writes go straight to the borrowed buffer, so mutating a view obtained
/// from [`Dense::submatrix_mut`] mutates the parent matrix.
#[derive(Debug)]
pub struct DenseMut<'a, T> {
    data: &'a mut [T],
    rows: usize,
    cols: usize,
    stride: usize,
}

/// Validate a `rows x cols` window and return the buffer offset of its
/// top-left element.
fn window(
    shape: (usize, usize),
    rows: &Range<usize>,
    cols: &Range<usize>,
    stride: usize,
) -> Result<usize> {
    if rows.start > rows.end || rows.end > shape.0 || cols.start > cols.end || cols.end > shape.1
    {
        return Err(CoreError::IndexOutOfBounds {
            index: (rows.end, cols.end),
            shape,
        });
    }
    Ok(rows.start * stride + cols.start)
}

impl<'a, T: Scalar> DenseRef<'a, T> {
    pub(crate) fn from_parts(data: &'a [T], rows: usize, cols: usize, stride: usize) -> Self {
        debug_assert!(data.len() >= required_len(rows, cols, stride));
        Self {
            data,
            rows,
            cols,
            stride,
        }
    }

    /// View a caller-owned slice as a `rows x cols` matrix with `stride`.
    ///
    /// ```
    /// # use densolve_core::dense::DenseRef;
    /// let buf = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
    /// // Every other column of a 3x2 layout.
    /// let v = DenseRef::from_slice(&buf, 3, 1, 2).unwrap();
    /// assert_eq!(v.col(0).unwrap(), vec![1.0, 3.0, 5.0]);
    /// ```
    pub fn from_slice(data: &'a [T], rows: usize, cols: usize, stride: usize) -> Result<Self> {
        check_layout(data.len(), rows, cols, stride)?;
        Ok(Self::from_parts(data, rows, cols, stride))
    }

    #[inline]
    pub fn nrows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn ncols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    #[inline]
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Element at `(r, c)`.
    pub fn get(&self, r: usize, c: usize) -> Result<T> {
        if r >= self.rows || c >= self.cols {
            return Err(CoreError::IndexOutOfBounds {
                index: (r, c),
                shape: self.shape(),
            });
        }
        Ok(self.at(r, c))
    }

    /// Row `r` as a slice into the underlying storage.
    pub fn row(&self, r: usize) -> Result<&'a [T]> {
        if r >= self.rows {
            return Err(CoreError::IndexOutOfBounds {
                index: (r, 0),
                shape: self.shape(),
            });
        }
        Ok(self.row_unchecked(r))
    }

    /// Column `c`, copied out since columns are not contiguous.
    pub fn col(&self, c: usize) -> Result<Vec<T>> {
        if c >= self.cols {
            return Err(CoreError::IndexOutOfBounds {
                index: (0, c),
                shape: self.shape(),
            });
        }
        Ok((0..self.rows).map(|r| self.at(r, c)).collect())
    }

    /// A sub-matrix view sharing this view's storage.
    pub fn submatrix(&self, rows: Range<usize>, cols: Range<usize>) -> Result<DenseRef<'a, T>> {
        let offset = window(self.shape(), &rows, &cols, self.stride)?;
        let (nr, nc) = (rows.len(), cols.len());
        let len = required_len(nr, nc, self.stride);
        let data = if len == 0 {
            &self.data[..0]
        } else {
            &self.data[offset..offset + len]
        };
        Ok(Self::from_parts(data, nr, nc, self.stride))
    }

    /// Iterate over the logical rows.
    pub fn row_iter(&self) -> impl Iterator<Item = &'a [T]> + use<'a, T> {
        let this = *self;
        (0..this.rows).map(move |r| this.row_unchecked(r))
    }

    /// Copy the view into a new compact matrix (stride == cols).
    pub fn to_owned(&self) -> Dense<T> {
        let mut data = Vec::with_capacity(self.rows * self.cols);
        for row in self.row_iter() {
            data.extend_from_slice(row);
        }
        Dense {
            data,
            rows: self.rows,
            cols: self.cols,
            stride: self.cols,
        }
    }

    // ------------------------------------------------------------------
    // Unchecked access for kernels that validated shapes up front
    // ------------------------------------------------------------------

    #[inline]
    pub(crate) fn at(&self, r: usize, c: usize) -> T {
        self.data[r * self.stride + c]
    }

    #[inline]
    pub(crate) fn row_unchecked(&self, r: usize) -> &'a [T] {
        // A zero-width view may hold an empty slice whatever its stride.
        if self.cols == 0 {
            return &[];
        }
        let start = r * self.stride;
        &self.data[start..start + self.cols]
    }
}

impl<'a, T: Scalar> DenseMut<'a, T> {
    pub(crate) fn from_parts(data: &'a mut [T], rows: usize, cols: usize, stride: usize) -> Self {
        debug_assert!(data.len() >= required_len(rows, cols, stride));
        Self {
            data,
            rows,
            cols,
            stride,
        }
    }

    /// View a caller-owned mutable slice as a `rows x cols` matrix.
    pub fn from_slice_mut(
        data: &'a mut [T],
        rows: usize,
        cols: usize,
        stride: usize,
    ) -> Result<Self> {
        check_layout(data.len(), rows, cols, stride)?;
        Ok(Self::from_parts(data, rows, cols, stride))
    }

    #[inline]
    pub fn nrows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn ncols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    #[inline]
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Reborrow as a read-only view.
    #[inline]
    pub fn rb(&self) -> DenseRef<'_, T> {
        DenseRef::from_parts(&*self.data, self.rows, self.cols, self.stride)
    }

    /// Reborrow as a shorter-lived mutable view.
    #[inline]
    pub fn rb_mut(&mut self) -> DenseMut<'_, T> {
        DenseMut::from_parts(&mut *self.data, self.rows, self.cols, self.stride)
    }

    pub fn get(&self, r: usize, c: usize) -> Result<T> {
        self.rb().get(r, c)
    }

    /// Overwrite the element at `(r, c)`.
    pub fn set(&mut self, r: usize, c: usize, value: T) -> Result<()> {
        if r >= self.rows || c >= self.cols {
            return Err(CoreError::IndexOutOfBounds {
                index: (r, c),
                shape: self.shape(),
            });
        }
        *self.at_mut(r, c) = value;
        Ok(())
    }

    /// Row `r` as a mutable slice into the underlying storage.
    pub fn row_mut(&mut self, r: usize) -> Result<&mut [T]> {
        if r >= self.rows {
            return Err(CoreError::IndexOutOfBounds {
                index: (r, 0),
                shape: self.shape(),
            });
        }
        Ok(self.row_mut_unchecked(r))
    }

    /// A mutable sub-matrix view; the parent stays borrowed while it lives.
    pub fn submatrix_mut(
        &mut self,
        rows: Range<usize>,
        cols: Range<usize>,
    ) -> Result<DenseMut<'_, T>> {
        self.rb_mut().into_submatrix(rows, cols)
    }

    /// Narrow this view to a sub-matrix, keeping the original borrow.
    pub fn into_submatrix(self, rows: Range<usize>, cols: Range<usize>) -> Result<DenseMut<'a, T>> {
        let offset = window(self.shape(), &rows, &cols, self.stride)?;
        let Self { data, stride, .. } = self;
        let (nr, nc) = (rows.len(), cols.len());
        let len = required_len(nr, nc, stride);
        let data = if len == 0 {
            &mut data[..0]
        } else {
            &mut data[offset..offset + len]
        };
        Ok(DenseMut::from_parts(data, nr, nc, stride))
    }

    /// Set every logical element to `value`.
    pub fn fill(&mut self, value: T) {
        for r in 0..self.rows {
            self.row_mut_unchecked(r).fill(value);
        }
    }

    /// Copy every element of `src` into this view.
    pub fn copy_from(&mut self, src: DenseRef<'_, T>) -> Result<()> {
        if src.shape() != self.shape() {
            return Err(CoreError::DimensionMismatch {
                expected: self.shape(),
                got: src.shape(),
            });
        }
        for (r, row) in src.row_iter().enumerate() {
            self.row_mut_unchecked(r).copy_from_slice(row);
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Unchecked access for kernels that validated shapes up front
    // ------------------------------------------------------------------

    #[inline]
    pub(crate) fn at_mut(&mut self, r: usize, c: usize) -> &mut T {
        &mut self.data[r * self.stride + c]
    }

    #[inline]
    pub(crate) fn row_mut_unchecked(&mut self, r: usize) -> &mut [T] {
        if self.cols == 0 {
            return &mut [];
        }
        let start = r * self.stride;
        &mut self.data[start..start + self.cols]
    }

    /// Exchange rows `a` and `b`.
    pub(crate) fn swap_rows(&mut self, a: usize, b: usize) {
        if a == b || self.cols == 0 {
            return;
        }
        let (lo, hi) = (a.min(b), a.max(b));
        let (cols, stride) = (self.cols, self.stride);
        let (head, tail) = self.data.split_at_mut(hi * stride);
        head[lo * stride..lo * stride + cols].swap_with_slice(&mut tail[..cols]);
    }

    /// Borrow row `src` immutably and row `dst` mutably at the same time.
    ///
    /// `src` and `dst` must differ.
    pub(crate) fn row_pair_mut(&mut self, src: usize, dst: usize) -> (&[T], &mut [T]) {
        debug_assert_ne!(src, dst);
        let (cols, stride) = (self.cols, self.stride);
        if cols == 0 {
            return (&[], &mut []);
        }
        if src < dst {
            let (head, tail) = self.data.split_at_mut(dst * stride);
            (&head[src * stride..src * stride + cols], &mut tail[..cols])
        } else {
            let (head, tail) = self.data.split_at_mut(src * stride);
            (&tail[..cols], &mut head[dst * stride..dst * stride + cols])
        }
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    fn grid() -> Dense<i32> {
        // 1  2  3  4
        // 5  6  7  8
        // 9 10 11 12
        Dense::from_vec((1..=12).collect(), 3, 4).unwrap()
    }

    #[test]
    fn test_from_slice_with_stride() {
        let buf = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let v = DenseRef::from_slice(&buf, 2, 2, 3).unwrap();
        assert_eq!(v.get(1, 0).unwrap(), 4.0);
        assert_eq!(v.row(1).unwrap(), &[4.0, 5.0]);
        assert!(v.get(0, 2).is_err());
    }

    #[test]
    fn test_submatrix_shares_storage() {
        let m = grid();
        let s = m.as_ref().submatrix(1..3, 1..3).unwrap();
        assert_eq!(s.shape(), (2, 2));
        assert_eq!(s.stride(), 4);
        assert_eq!(s.row(0).unwrap(), &[6, 7]);
        assert_eq!(s.col(1).unwrap(), vec![7, 11]);
        assert_eq!(s.to_owned().as_slice(), &[6, 7, 10, 11]);
    }

    #[test]
    fn test_nested_submatrix() {
        let m = grid();
        let s = m.as_ref().submatrix(0..3, 1..4).unwrap();
        let t = s.submatrix(1..3, 1..2).unwrap();
        assert_eq!(t.col(0).unwrap(), vec![7, 11]);
    }

    #[test]
    fn test_submatrix_out_of_range() {
        let m = grid();
        assert!(m.as_ref().submatrix(0..4, 0..1).is_err());
        assert!(m.as_ref().submatrix(0..1, 2..5).is_err());
        #[allow(clippy::reversed_empty_ranges)]
        let r = m.as_ref().submatrix(2..1, 0..1);
        assert!(r.is_err());
    }

    #[test]
    fn test_empty_submatrix_at_edge() {
        let m = grid();
        let s = m.as_ref().submatrix(3..3, 0..4).unwrap();
        assert_eq!(s.shape(), (0, 4));
        assert_eq!(s.row_iter().count(), 0);
    }

    #[test]
    fn test_mutation_through_view_reaches_parent() {
        let mut m = grid();
        {
            let mut v = m.as_mut();
            let mut s = v.submatrix_mut(1..3, 2..4).unwrap();
            s.fill(0);
            s.set(0, 0, -1).unwrap();
        }
        assert_eq!(
            m.as_slice(),
            &[1, 2, 3, 4, 5, 6, -1, 0, 9, 10, 0, 0]
        );
    }

    #[test]
    fn test_copy_from_shape_mismatch() {
        let mut m = grid();
        let other = Dense::from_vec(vec![0; 4], 2, 2).unwrap();
        let err = m.as_mut().copy_from(other.as_ref()).unwrap_err();
        assert_eq!(
            err,
            CoreError::DimensionMismatch {
                expected: (3, 4),
                got: (2, 2)
            }
        );
    }

    #[test]
    fn test_row_pair_mut() {
        let mut m = grid();
        let mut v = m.as_mut();
        let (src, dst) = v.row_pair_mut(2, 0);
        assert_eq!(src, &[9, 10, 11, 12]);
        dst.copy_from_slice(src);
        let (src, dst) = v.row_pair_mut(0, 1);
        assert_eq!(src, &[9, 10, 11, 12]);
        assert_eq!(dst, &[5, 6, 7, 8]);
    }

    #[test]
    fn test_swap_rows_keeps_padding() {
        let mut m = Dense::from_vec_with_stride(vec![1, 2, -1, 3, 4, -1, 5, 6], 3, 2, 3).unwrap();
        m.as_mut().swap_rows(2, 0);
        assert_eq!(m.as_slice(), &[5, 6, -1, 3, 4, -1, 1, 2]);
        m.as_mut().swap_rows(1, 1);
        assert_eq!(m.row(1).unwrap(), &[3, 4]);
    }

    #[test]
    fn test_zero_width_window_rows() {
        let mut m = grid();
        let empty = m.submatrix(1..3, 4..4).unwrap();
        assert_eq!(empty.shape(), (2, 0));
        assert_eq!(empty.row(1).unwrap(), &[] as &[i32]);
        assert_eq!(empty.to_owned().shape(), (2, 0));

        let mut v = m.as_mut();
        let mut w = v.submatrix_mut(0..3, 2..2).unwrap();
        w.swap_rows(0, 2);
        let (src, dst) = w.row_pair_mut(1, 2);
        assert!(src.is_empty() && dst.is_empty());
    }

    #[test]
    fn test_from_slice_mut_writes_caller_buffer() {
        let mut buf = vec![0.0; 6];
        {
            let mut v = DenseMut::from_slice_mut(&mut buf, 2, 2, 3).unwrap();
            v.set(1, 1, 5.0).unwrap();
            assert!(v.set(2, 0, 1.0).is_err());
        }
        assert_eq!(buf, vec![0.0, 0.0, 0.0, 0.0, 5.0, 0.0]);
    }
}
