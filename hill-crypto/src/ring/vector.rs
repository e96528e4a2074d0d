//! Fixed-dimension vectors over a [`Ring`].

use std::fmt;

use itertools::Itertools;

use crate::errors::HillCryptoError;
use crate::ring::{Matrix, Ring};

/// A sequence of ring elements bound to the ring they live in.
///
/// Every element is kept in canonical form `[0, n)`. Operations taking another vector
/// borrow it immutably, so an operand is never changed by the call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vector {
    elements: Vec<i64>,
    ring: Ring,
}

impl Vector {
    /// Builds a vector from raw integers, reducing each one into the ring.
    ///
    /// # Example
    ///
    /// ```
    /// # use hill_crypto::ring::{Ring, Vector};
    /// let ring = Ring::try_with(10).unwrap();
    /// let v = Vector::from_values([12, -1, 3], &ring);
    /// assert_eq!(v.as_slice(), &[2, 9, 3]);
    /// ```
    pub fn from_values<I: IntoIterator<Item = i64>>(values: I, ring: &Ring) -> Self {
        Self {
            elements: values.into_iter().map(|v| ring.reduce(v)).collect(),
            ring: ring.clone(),
        }
    }

    /// The zero vector of dimension `dim`.
    pub fn zeros(dim: usize, ring: &Ring) -> Self {
        Self {
            elements: vec![0; dim],
            ring: ring.clone(),
        }
    }

    pub fn dim(&self) -> usize {
        self.elements.len()
    }

    pub fn ring(&self) -> &Ring {
        &self.ring
    }

    pub fn as_slice(&self) -> &[i64] {
        &self.elements
    }

    pub fn into_inner(self) -> Vec<i64> {
        self.elements
    }

    pub fn get(&self, index: usize) -> Result<i64, HillCryptoError> {
        self.elements.get(index).copied().ok_or_else(|| {
            HillCryptoError::OutOfRange(format!(
                "Index {} out of range for vector of dimension {}",
                index,
                self.dim()
            ))
        })
    }

    pub fn set(&mut self, index: usize, value: i64) -> Result<(), HillCryptoError> {
        let dim = self.dim();
        let reduced = self.ring.reduce(value);
        let slot = self.elements.get_mut(index).ok_or_else(|| {
            HillCryptoError::OutOfRange(format!(
                "Index {} out of range for vector of dimension {}",
                index, dim
            ))
        })?;
        *slot = reduced;

        Ok(())
    }

    /// Overwrites elements from the front with reduced values taken from `values`.
    ///
    /// Stops at whichever runs out first, leaving the rest of `values` unconsumed.
    pub(crate) fn fill_from<I: Iterator<Item = i64>>(&mut self, values: &mut I) {
        for (slot, value) in self.elements.iter_mut().zip(values) {
            *slot = self.ring.reduce(value);
        }
    }

    /// Appends one element, increasing the dimension by one.
    pub fn push(&mut self, value: i64) {
        let reduced = self.ring.reduce(value);
        self.elements.push(reduced);
    }

    fn check_compatible(&self, other: &Vector, op: &str) -> Result<(), HillCryptoError> {
        if self.ring != other.ring {
            return Err(HillCryptoError::RingMismatch(format!(
                "Cannot {} vectors over Z_{} and Z_{}",
                op,
                self.ring.modulus(),
                other.ring.modulus()
            )));
        }

        if self.dim() != other.dim() {
            return Err(HillCryptoError::DimensionMismatch(format!(
                "Vector lengths must match for {} ({} vs {})",
                op,
                self.dim(),
                other.dim()
            )));
        }

        Ok(())
    }

    /// Elementwise `self += other`.
    ///
    /// # Errors
    ///
    /// Returns `HillCryptoError::DimensionMismatch` if the vectors have different lengths.
    pub fn add(&mut self, other: &Vector) -> Result<(), HillCryptoError> {
        self.check_compatible(other, "add")?;

        for (a, &b) in self.elements.iter_mut().zip(&other.elements) {
            *a = self.ring.add(*a, b);
        }

        Ok(())
    }

    /// Multiplies every element by `scalar`.
    pub fn scalar_multiply(&mut self, scalar: i64) {
        for a in self.elements.iter_mut() {
            *a = self.ring.mult(scalar, *a);
        }
    }

    /// Computes `Σ self[i] * other[i]` in the ring.
    ///
    /// # Example
    ///
    /// ```
    /// # use hill_crypto::ring::{Ring, Vector};
    /// let ring = Ring::try_with(13).unwrap();
    /// let a = Vector::from_values([1, 2], &ring);
    /// let b = Vector::from_values([5, 6], &ring);
    /// assert_eq!(a.dot_product(&b).unwrap(), 4); // 17 mod 13
    /// ```
    pub fn dot_product(&self, other: &Vector) -> Result<i64, HillCryptoError> {
        self.check_compatible(other, "multiply")?;

        Ok(self
            .elements
            .iter()
            .zip(&other.elements)
            .fold(0, |sum, (&a, &b)| self.ring.add(sum, self.ring.mult(a, b))))
    }

    /// Row-operation primitive: `self += scalar * other`.
    pub fn add_scaled(&mut self, other: &Vector, scalar: i64) -> Result<(), HillCryptoError> {
        self.check_compatible(other, "add")?;

        for (a, &b) in self.elements.iter_mut().zip(&other.elements) {
            *a = self.ring.add(*a, self.ring.mult(scalar, b));
        }

        Ok(())
    }

    /// Concatenates the elements of `other`, increasing the dimension.
    pub fn append(&mut self, other: &Vector) -> Result<(), HillCryptoError> {
        if self.ring != other.ring {
            return Err(HillCryptoError::RingMismatch(format!(
                "Cannot append a vector over Z_{} to one over Z_{}",
                other.ring.modulus(),
                self.ring.modulus()
            )));
        }

        self.elements.extend_from_slice(&other.elements);
        Ok(())
    }

    /// Splits around `index`: returns elements `[0, index)` and `(index, dim)`.
    ///
    /// The element at `index` belongs to neither half.
    ///
    /// # Example
    ///
    /// ```
    /// # use hill_crypto::ring::{Ring, Vector};
    /// let ring = Ring::try_with(10).unwrap();
    /// let v = Vector::from_values([1, 2, 3, 4, 5], &ring);
    /// let (left, right) = v.split_at(2).unwrap();
    /// assert_eq!(left.as_slice(), &[1, 2]);
    /// assert_eq!(right.as_slice(), &[4, 5]);
    /// ```
    pub fn split_at(&self, index: usize) -> Result<(Vector, Vector), HillCryptoError> {
        if index >= self.dim() {
            return Err(HillCryptoError::OutOfRange(format!(
                "Cannot split vector of dimension {} at index {}",
                self.dim(),
                index
            )));
        }

        let left = Vector {
            elements: self.elements[..index].to_vec(),
            ring: self.ring.clone(),
        };
        let right = Vector {
            elements: self.elements[index + 1..].to_vec(),
            ring: self.ring.clone(),
        };

        Ok((left, right))
    }

    /// Returns the vector whose k-th element is `self · matrix.row(k)`.
    ///
    /// Treating `self` as a column vector this is `matrix * self`.
    pub fn apply_matrix(&self, matrix: &Matrix) -> Result<Vector, HillCryptoError> {
        let elements = matrix
            .iter_rows()
            .map(|row| self.dot_product(row))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Vector {
            elements,
            ring: self.ring.clone(),
        })
    }
}

impl fmt::Display for Vector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.elements.iter().join(", "))
    }
}
