//! Matrices over a [`Ring`], stored as an owned array of row [`Vector`]s.

use std::fmt;

use crate::errors::HillCryptoError;
use crate::ring::{Ring, Vector};

/// A `rows × cols` matrix over Z_n.
///
/// Key matrices are square; a sequence of message blocks is a `k × d` matrix with one
/// block per row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matrix {
    rows: Vec<Vector>,
    cols: usize,
    ring: Ring,
}

impl Matrix {
    /// The `dim × dim` zero matrix.
    pub fn zeros(dim: usize, ring: &Ring) -> Self {
        Self::with_shape(dim, dim, ring)
    }

    /// A zero matrix with the given shape.
    pub fn with_shape(rows: usize, cols: usize, ring: &Ring) -> Self {
        Self {
            rows: (0..rows).map(|_| Vector::zeros(cols, ring)).collect(),
            cols,
            ring: ring.clone(),
        }
    }

    /// Builds a matrix from row vectors sharing a ring and a length.
    ///
    /// # Errors
    ///
    /// Returns `HillCryptoError::InvalidParameters` for an empty row list,
    /// `HillCryptoError::DimensionMismatch` for ragged rows and
    /// `HillCryptoError::RingMismatch` for rows over different moduli.
    pub fn from_rows(rows: Vec<Vector>) -> Result<Self, HillCryptoError> {
        let first = rows.first().ok_or_else(|| {
            HillCryptoError::InvalidParameters(
                "Cannot infer the shape of a matrix without rows".into(),
            )
        })?;
        let cols = first.dim();
        let ring = first.ring().clone();

        for (i, row) in rows.iter().enumerate() {
            if row.ring() != &ring {
                return Err(HillCryptoError::RingMismatch(format!(
                    "Row {} is over Z_{} but row 0 is over Z_{}",
                    i,
                    row.ring().modulus(),
                    ring.modulus()
                )));
            }
            if row.dim() != cols {
                return Err(HillCryptoError::DimensionMismatch(format!(
                    "Row {} has length {} but expected {}",
                    i,
                    row.dim(),
                    cols
                )));
            }
        }

        Ok(Self { rows, cols, ring })
    }

    /// Creates the `dim × dim` identity matrix.
    pub fn identity(dim: usize, ring: &Ring) -> Self {
        Self {
            rows: (0..dim)
                .map(|i| Vector::from_values((0..dim).map(|j| i64::from(i == j)), ring))
                .collect(),
            cols: dim,
            ring: ring.clone(),
        }
    }

    /// Fills the matrix left to right, top to bottom.
    ///
    /// If `values` runs out early the remaining cells keep their current value; surplus
    /// values are ignored.
    ///
    /// # Example
    ///
    /// ```
    /// # use hill_crypto::ring::{Matrix, Ring};
    /// let ring = Ring::try_with(29).unwrap();
    /// let mut m = Matrix::zeros(2, &ring);
    /// m.populate_row_major([1, 2, 30]);
    /// assert_eq!(m.to_row_major(), vec![1, 2, 1, 0]);
    /// ```
    pub fn populate_row_major<I: IntoIterator<Item = i64>>(&mut self, values: I) {
        let mut values = values.into_iter().fuse();
        for row in self.rows.iter_mut() {
            row.fill_from(&mut values);
        }
    }

    pub fn rows(&self) -> usize {
        self.rows.len()
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn ring(&self) -> &Ring {
        &self.ring
    }

    pub fn is_square(&self) -> bool {
        self.rows() == self.cols
    }

    /// The dimension of a square matrix.
    ///
    /// # Errors
    ///
    /// Returns `HillCryptoError::DimensionMismatch` if the matrix is not square.
    pub fn dim(&self) -> Result<usize, HillCryptoError> {
        if !self.is_square() {
            return Err(HillCryptoError::DimensionMismatch(format!(
                "Expected a square matrix, got {}x{}",
                self.rows(),
                self.cols
            )));
        }

        Ok(self.cols)
    }

    pub fn row(&self, index: usize) -> Result<&Vector, HillCryptoError> {
        self.rows.get(index).ok_or_else(|| {
            HillCryptoError::OutOfRange(format!(
                "Row {} out of range for matrix with {} rows",
                index,
                self.rows()
            ))
        })
    }

    pub fn iter_rows(&self) -> impl Iterator<Item = &Vector> {
        self.rows.iter()
    }

    pub fn get(&self, row: usize, col: usize) -> Result<i64, HillCryptoError> {
        self.row(row)?.get(col)
    }

    pub fn set(&mut self, row: usize, col: usize, value: i64) -> Result<(), HillCryptoError> {
        let rows = self.rows();
        self.rows
            .get_mut(row)
            .ok_or_else(|| {
                HillCryptoError::OutOfRange(format!(
                    "Row {} out of range for matrix with {} rows",
                    row, rows
                ))
            })?
            .set(col, value)
    }

    /// Flattens the matrix row by row.
    pub fn to_row_major(&self) -> Vec<i64> {
        self.rows
            .iter()
            .flat_map(|row| row.as_slice().iter().copied())
            .collect()
    }

    /// True for a square matrix equal to the identity.
    pub fn is_identity(&self) -> bool {
        self.is_square()
            && self.rows.iter().enumerate().all(|(i, row)| {
                row.as_slice()
                    .iter()
                    .enumerate()
                    .all(|(j, &x)| x == i64::from(i == j))
            })
    }

    pub fn swap_rows(&mut self, i: usize, j: usize) -> Result<(), HillCryptoError> {
        self.row(i)?;
        self.row(j)?;
        self.rows.swap(i, j);
        Ok(())
    }

    pub fn scale_row(&mut self, index: usize, scalar: i64) -> Result<(), HillCryptoError> {
        let rows = self.rows();
        self.rows
            .get_mut(index)
            .ok_or_else(|| {
                HillCryptoError::OutOfRange(format!(
                    "Row {} out of range for matrix with {} rows",
                    index, rows
                ))
            })?
            .scalar_multiply(scalar);
        Ok(())
    }

    /// Row operation `row[target] -= scalar * row[source]`.
    pub fn subtract_scaled_row(
        &mut self,
        target: usize,
        source: usize,
        scalar: i64,
    ) -> Result<(), HillCryptoError> {
        self.row(target)?;
        self.row(source)?;
        if target == source {
            return Err(HillCryptoError::InvalidParameters(format!(
                "Row operation needs two distinct rows, got {} twice",
                target
            )));
        }

        let negated = self.ring.additive_inverse(scalar);
        let (target_row, source_row) = if target < source {
            let (head, tail) = self.rows.split_at_mut(source);
            (&mut head[target], &tail[0])
        } else {
            let (head, tail) = self.rows.split_at_mut(target);
            (&mut tail[0], &head[source])
        };

        target_row.add_scaled(source_row, negated)
    }

    /// Transposes the matrix in place.
    pub fn transpose(&mut self) {
        *self = self.transposed();
    }

    /// Returns the transpose, leaving `self` unchanged.
    pub fn transposed(&self) -> Matrix {
        let columns = (0..self.cols)
            .map(|j| {
                Vector::from_values(
                    self.rows.iter().map(|row| row.as_slice()[j]),
                    &self.ring,
                )
            })
            .collect();

        Matrix {
            rows: columns,
            cols: self.rows(),
            ring: self.ring.clone(),
        }
    }

    /// Computes `self × other`.
    ///
    /// Each entry is a dot product of a row of `self` with a row of a transposed copy of
    /// `other`, so `other` (which may be `self`) is never touched.
    ///
    /// # Errors
    ///
    /// Returns `HillCryptoError::DimensionMismatch` if `self.cols() != other.rows()`.
    pub fn multiply(&self, other: &Matrix) -> Result<Matrix, HillCryptoError> {
        if self.cols != other.rows() {
            return Err(HillCryptoError::DimensionMismatch(format!(
                "Inner dimensions must match for matrix multiplication ({} vs {})",
                self.cols,
                other.rows()
            )));
        }

        let columns = other.transposed();
        let rows = self
            .rows
            .iter()
            .map(|row| row.apply_matrix(&columns))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Matrix {
            rows,
            cols: other.cols,
            ring: self.ring.clone(),
        })
    }

    /// Applies this square matrix to every row of `blocks`.
    ///
    /// Row `b` of the input becomes `self * b` (with `b` read as a column), so the result
    /// has exactly as many rows as `blocks`. Unlike [`Matrix::multiply`] the block
    /// sequence is never transposed.
    pub fn apply_to_blocks(&self, blocks: &Matrix) -> Result<Matrix, HillCryptoError> {
        let dim = self.dim()?;
        if blocks.cols != dim {
            return Err(HillCryptoError::DimensionMismatch(format!(
                "Block length {} does not match key dimension {}",
                blocks.cols, dim
            )));
        }

        let rows = blocks
            .rows
            .iter()
            .map(|block| block.apply_matrix(self))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Matrix {
            rows,
            cols: dim,
            ring: self.ring.clone(),
        })
    }

    /// Computes the inverse by Gauss-Jordan elimination over Z_n.
    ///
    /// A pivot has to be a unit of the ring, not merely nonzero: for every column the
    /// first row at or below the diagonal holding a unit is swapped into place. The
    /// elimination runs on `[self | I]`, a copy, so `self` is never modified.
    ///
    /// # Errors
    ///
    /// Returns `HillCryptoError::NotInvertible` with the column where no unit pivot
    /// exists, or `HillCryptoError::DimensionMismatch` for a non-square matrix.
    ///
    /// # Example
    ///
    /// ```
    /// # use hill_crypto::ring::{Matrix, Ring};
    /// let ring = Ring::try_with(26).unwrap();
    /// let mut m = Matrix::zeros(2, &ring);
    /// m.populate_row_major([3, 3, 2, 5]);
    /// let inv = m.inverse().unwrap();
    /// assert_eq!(inv.to_row_major(), vec![15, 17, 20, 9]);
    /// assert!(m.multiply(&inv).unwrap().is_identity());
    /// ```
    pub fn inverse(&self) -> Result<Matrix, HillCryptoError> {
        let dim = self.dim()?;
        if dim == 0 {
            return Ok(self.clone());
        }

        let mut augmented = self.augment_with_identity()?;
        augmented.forward_reduction(dim)?;
        augmented.back_substitution(dim)?;

        let (_, inverse) = augmented.split(dim)?;
        Ok(inverse)
    }

    /// Builds `[self | I]`, rows of width `2 * dim`.
    fn augment_with_identity(&self) -> Result<Matrix, HillCryptoError> {
        let dim = self.dim()?;
        let identity = Matrix::identity(dim, &self.ring);

        let mut augmented = self.clone();
        for (row, id_row) in augmented.rows.iter_mut().zip(&identity.rows) {
            row.append(id_row)?;
        }
        augmented.cols = 2 * dim;

        Ok(augmented)
    }

    /// First row in `[column, dim)` whose entry in `column` is a unit.
    fn find_pivot(&self, column: usize, dim: usize) -> Option<usize> {
        (column..dim).find(|&r| self.ring.is_unit(self.rows[r].as_slice()[column]))
    }

    fn forward_reduction(&mut self, dim: usize) -> Result<(), HillCryptoError> {
        for column in 0..dim {
            let pivot_row = self
                .find_pivot(column, dim)
                .ok_or(HillCryptoError::NotInvertible { column })?;

            if pivot_row != column {
                log::trace!("swapping rows {} and {} for pivot", column, pivot_row);
                self.swap_rows(column, pivot_row)?;
            }

            let pivot = self.get(column, column)?;
            let pivot_inv = self
                .ring
                .multiplicative_inverse(pivot)
                .map_err(|_| HillCryptoError::NotInvertible { column })?;
            self.scale_row(column, pivot_inv)?;

            for row in column + 1..dim {
                let factor = self.get(row, column)?;
                if factor != 0 {
                    self.subtract_scaled_row(row, column, factor)?;
                }
            }
        }

        Ok(())
    }

    fn back_substitution(&mut self, dim: usize) -> Result<(), HillCryptoError> {
        for column in (1..dim).rev() {
            for row in (0..column).rev() {
                let factor = self.get(row, column)?;
                if factor != 0 {
                    self.subtract_scaled_row(row, column, factor)?;
                }
            }
        }

        Ok(())
    }

    /// Splits a reduced `dim × 2dim` matrix into its left and right halves.
    ///
    /// Rows are cut at `dim - 1` with [`Vector::split_at`], which drops that column: the
    /// left half loses the last diagonal entry and the right half is exactly the
    /// `dim` columns after the pivot boundary.
    fn split(&self, dim: usize) -> Result<(Matrix, Matrix), HillCryptoError> {
        if self.cols != 2 * dim {
            return Err(HillCryptoError::DimensionMismatch(format!(
                "Expected a {}x{} augmented matrix, got {}x{}",
                dim,
                2 * dim,
                self.rows(),
                self.cols
            )));
        }

        let (left, right): (Vec<_>, Vec<_>) = self
            .rows
            .iter()
            .map(|row| row.split_at(dim - 1))
            .collect::<Result<Vec<_>, _>>()?
            .into_iter()
            .unzip();

        Ok((
            Matrix {
                rows: left,
                cols: dim - 1,
                ring: self.ring.clone(),
            },
            Matrix {
                rows: right,
                cols: dim,
                ring: self.ring.clone(),
            },
        ))
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.rows {
            writeln!(f, "{}", row)?;
        }
        Ok(())
    }
}
