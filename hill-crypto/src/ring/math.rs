//! Implementation of ring ops using modular arithmetic.

use std::fmt;
use std::sync::Arc;

use crate::errors::HillCryptoError;

use super::extended_gcd;

use rand::Rng;

/// Largest modulus [`Ring::try_with`] accepts.
///
/// The inverse table holds one entry per element, so this caps its memory. Any
/// modulus above 1 forms a valid ring; larger ones are refused for resource reasons.
pub const MAX_TABLE_MODULUS: u64 = 1 << 20;

/// Represents a finite ring Z_n using modular arithmetic.
///
/// The multiplicative inverse of every element is computed once, when the ring is
/// created, so pivot tests during elimination are plain table lookups. The table is
/// shared between clones, which makes a `Ring` cheap to hand to every vector.
#[derive(Clone)]
pub struct Ring {
    modulus: u64,
    inverses: Arc<[Option<i64>]>,
}

impl Ring {
    /// Create a new Ring with the given modulus.
    ///
    /// The modulus must be greater than 1. Construction also builds the full inverse
    /// table, so as a resource limit the modulus may not exceed [`MAX_TABLE_MODULUS`];
    /// the arithmetic itself runs in `i128` and has no such bound.
    ///
    /// # Errors
    ///
    /// Returns `HillCryptoError::InvalidModulus` for `modulus <= 1` and
    /// `HillCryptoError::ModulusTooLarge` above the table limit.
    pub fn try_with(modulus: u64) -> Result<Self, HillCryptoError> {
        if modulus <= 1 {
            return Err(HillCryptoError::InvalidModulus(format!(
                "Modulus must be greater than 1, got {}",
                modulus
            )));
        }

        if modulus > MAX_TABLE_MODULUS {
            return Err(HillCryptoError::ModulusTooLarge(format!(
                "Modulus {} exceeds the inverse table limit {}",
                modulus, MAX_TABLE_MODULUS
            )));
        }

        let inverses = (0..modulus as i64)
            .map(|a| Self::euclid_inverse(modulus as i64, a))
            .collect();

        Ok(Ring { modulus, inverses })
    }

    /// Runs the extended Euclidean algorithm on `(n, a)`.
    fn euclid_inverse(n: i64, a: i64) -> Option<i64> {
        let (g, _, y) = extended_gcd(n, a);
        if g != 1 {
            return None;
        }

        Some(y.rem_euclid(n))
    }

    /// Returns the modulus of the ring.
    ///
    /// # Example
    ///
    /// ```
    /// # use hill_crypto::ring::Ring;
    /// let ring = Ring::try_with(29).unwrap();
    /// assert_eq!(ring.modulus(), 29);
    /// ```
    pub fn modulus(&self) -> u64 {
        self.modulus
    }

    /// Reduces any value to its canonical representative in `[0, modulus - 1]`.
    ///
    /// # Example
    ///
    /// ```
    /// # use hill_crypto::ring::Ring;
    /// let ring = Ring::try_with(10).unwrap();
    /// assert_eq!(ring.reduce(15), 5);
    /// assert_eq!(ring.reduce(-3), 7);
    /// assert_eq!(ring.reduce(-10), 0);
    /// assert_eq!(ring.reduce(i64::MIN), 2);
    /// ```
    pub fn reduce(&self, value: i64) -> i64 {
        let m = self.modulus as i64;

        let rem = value % m;
        if rem < 0 {
            return rem + m;
        }

        rem
    }

    /// Computes `(a + b) mod modulus`.
    ///
    /// # Example
    ///
    /// ```
    /// # use hill_crypto::ring::Ring;
    /// let ring = Ring::try_with(10).unwrap();
    /// assert_eq!(ring.add(7, 5), 2);
    /// assert_eq!(ring.add(-2, 5), 3);
    /// ```
    pub fn add(&self, a: i64, b: i64) -> i64 {
        self.reduce(self.reduce(a) + self.reduce(b))
    }

    /// Computes `(a - b) mod modulus`.
    pub fn sub(&self, a: i64, b: i64) -> i64 {
        self.reduce(self.reduce(a) - self.reduce(b))
    }

    /// Computes `(a * b) mod modulus`.
    ///
    /// Uses `i128` internally so the product of two reduced values never overflows.
    ///
    /// # Example
    ///
    /// ```
    /// # use hill_crypto::ring::Ring;
    /// let ring = Ring::try_with(10).unwrap();
    /// assert_eq!(ring.mult(7, 5), 5);
    /// assert_eq!(ring.mult(-2, 6), 8);
    /// assert_eq!(ring.mult(4, 5), 0);
    /// ```
    pub fn mult(&self, a: i64, b: i64) -> i64 {
        let product = self.reduce(a) as i128 * self.reduce(b) as i128;

        (product % self.modulus as i128) as i64
    }

    /// Computes the additive inverse `(n - a) mod n`.
    ///
    /// # Example
    ///
    /// ```
    /// # use hill_crypto::ring::Ring;
    /// let ring = Ring::try_with(10).unwrap();
    /// assert_eq!(ring.additive_inverse(3), 7);
    /// assert_eq!(ring.additive_inverse(0), 0);
    /// assert_eq!(ring.add(3, ring.additive_inverse(3)), 0);
    /// ```
    pub fn additive_inverse(&self, a: i64) -> i64 {
        self.reduce(self.modulus as i64 - self.reduce(a))
    }

    /// Looks up `a^-1 mod n`, or `None` when `gcd(a, n) != 1`.
    pub fn inverse_of(&self, a: i64) -> Option<i64> {
        self.inverses[self.reduce(a) as usize]
    }

    /// True when `a` is a unit of the ring.
    pub fn is_unit(&self, a: i64) -> bool {
        self.inverse_of(a).is_some()
    }

    /// Returns the modular multiplicative inverse `a^-1 mod modulus`.
    ///
    /// # Errors
    ///
    /// Returns `HillCryptoError::NoInverse` if `gcd(a, modulus) != 1` (which includes `a = 0`).
    ///
    /// # Example
    ///
    /// ```
    /// # use hill_crypto::ring::Ring;
    /// let ring = Ring::try_with(26).unwrap();
    /// assert_eq!(ring.multiplicative_inverse(3).unwrap(), 9);
    /// assert_eq!(ring.multiplicative_inverse(25).unwrap(), 25);
    /// assert!(ring.multiplicative_inverse(13).is_err());
    /// assert!(ring.multiplicative_inverse(0).is_err());
    /// ```
    pub fn multiplicative_inverse(&self, a: i64) -> Result<i64, HillCryptoError> {
        self.inverse_of(a).ok_or_else(|| {
            HillCryptoError::NoInverse(format!(
                "{} has no inverse mod {}",
                self.reduce(a),
                self.modulus
            ))
        })
    }

    /// Computes `a * b^-1 mod modulus`.
    ///
    /// # Errors
    ///
    /// Returns `HillCryptoError::NoInverse` when `b` is not a unit.
    pub fn divide(&self, a: i64, b: i64) -> Result<i64, HillCryptoError> {
        Ok(self.mult(a, self.multiplicative_inverse(b)?))
    }

    /// Draws a uniformly distributed element of the ring.
    pub fn random_element<R: Rng + ?Sized>(&self, rng: &mut R) -> i64 {
        rng.random_range(0..self.modulus) as i64
    }
}

impl PartialEq for Ring {
    fn eq(&self, other: &Self) -> bool {
        self.modulus == other.modulus
    }
}

impl Eq for Ring {}

impl fmt::Debug for Ring {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ring").field("modulus", &self.modulus).finish()
    }
}
