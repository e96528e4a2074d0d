use crate::errors::HillCryptoError;
use crate::keypair::serialized::SerializedKey;
use crate::ring::{Matrix, Ring};

use rand::prelude::{Rng, SeedableRng, StdRng};

/// How many random candidates [`KeyManager::generate`] draws before giving up.
pub const DEFAULT_MAX_ATTEMPTS: usize = 1000;

/// Largest key dimension a manager accepts.
pub const MAX_BLOCK_LENGTH: usize = 1024;

/// An encryption matrix together with its inverse.
///
/// Only ever built from a matrix whose inverse was just computed, so
/// `decrypt * encrypt == I` holds for every value of this type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPair {
    encrypt: Matrix,
    decrypt: Matrix,
}

impl KeyPair {
    /// Inverts `encrypt` and pairs the two.
    pub fn try_from_encrypt(encrypt: Matrix) -> Result<Self, HillCryptoError> {
        let decrypt = encrypt.inverse()?;
        Ok(Self { encrypt, decrypt })
    }

    pub fn encrypt(&self) -> &Matrix {
        &self.encrypt
    }

    pub fn decrypt(&self) -> &Matrix {
        &self.decrypt
    }
}

/// Owns the Hill cipher key and applies it to message blocks.
///
/// A manager starts without a key; [`KeyManager::generate`] or
/// [`KeyManager::install_key`] make it ready. Both replace the key pair as a unit and
/// leave the previous pair in place when they fail.
#[derive(Debug, Clone)]
pub struct KeyManager {
    ring: Ring,
    block_length: usize,
    max_attempts: usize,
    key: Option<KeyPair>,
}

impl KeyManager {
    /// Creates a manager with no key installed.
    ///
    /// # Errors
    ///
    /// Returns `HillCryptoError::InvalidParameters` unless
    /// `1 <= block_length <= MAX_BLOCK_LENGTH`.
    pub fn new(ring: Ring, block_length: usize) -> Result<Self, HillCryptoError> {
        if block_length == 0 {
            return Err(HillCryptoError::InvalidParameters(
                "Block length must be > 0".to_string(),
            ));
        }
        if block_length > MAX_BLOCK_LENGTH {
            return Err(HillCryptoError::InvalidParameters(format!(
                "Block length {} exceeds the limit {}",
                block_length, MAX_BLOCK_LENGTH
            )));
        }

        Ok(Self {
            ring,
            block_length,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            key: None,
        })
    }

    /// Creates a manager and generates its key from a seeded generator.
    ///
    /// The same ring, block length and seed always give the same key pair.
    pub fn with_seed(ring: Ring, block_length: usize, seed: u64) -> Result<Self, HillCryptoError> {
        let mut manager = Self::new(ring, block_length)?;
        manager.generate(&mut StdRng::seed_from_u64(seed))?;
        Ok(manager)
    }

    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    pub fn block_length(&self) -> usize {
        self.block_length
    }

    pub fn ring(&self) -> &Ring {
        &self.ring
    }

    pub fn is_ready(&self) -> bool {
        self.key.is_some()
    }

    pub fn key_pair(&self) -> Option<&KeyPair> {
        self.key.as_ref()
    }

    pub fn encrypt_matrix(&self) -> Option<&Matrix> {
        self.key.as_ref().map(KeyPair::encrypt)
    }

    pub fn decrypt_matrix(&self) -> Option<&Matrix> {
        self.key.as_ref().map(KeyPair::decrypt)
    }

    /// Draws random `d × d` matrices until one is invertible.
    ///
    /// # Errors
    ///
    /// Returns `HillCryptoError::KeyGenerationExhausted` after `max_attempts` singular
    /// candidates. The previously installed key, if any, is kept.
    pub fn generate<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<(), HillCryptoError> {
        let d = self.block_length;

        for attempt in 1..=self.max_attempts {
            let mut candidate = Matrix::zeros(d, &self.ring);
            candidate.populate_row_major((0..d * d).map(|_| self.ring.random_element(rng)));

            match KeyPair::try_from_encrypt(candidate) {
                Ok(pair) => {
                    log::debug!(
                        "generated {}x{} key over Z_{} after {} attempt(s)",
                        d,
                        d,
                        self.ring.modulus(),
                        attempt
                    );
                    self.key = Some(pair);
                    return Ok(());
                }
                Err(HillCryptoError::NotInvertible { column }) => {
                    log::trace!("candidate {} singular at column {}", attempt, column);
                }
                Err(e) => return Err(e),
            }
        }

        log::warn!(
            "no invertible {}x{} matrix over Z_{} in {} attempts",
            d,
            d,
            self.ring.modulus(),
            self.max_attempts
        );
        Err(HillCryptoError::KeyGenerationExhausted {
            attempts: self.max_attempts,
        })
    }

    /// Installs a caller-chosen key given row-major.
    ///
    /// Fewer than `d²` entries leave the remaining cells zero; extra entries are ignored.
    ///
    /// # Errors
    ///
    /// Returns `HillCryptoError::InvalidKey` if the matrix is singular over the ring, in
    /// which case the current key is left exactly as it was.
    pub fn install_key(&mut self, entries: &[i64]) -> Result<(), HillCryptoError> {
        let mut candidate = Matrix::zeros(self.block_length, &self.ring);
        candidate.populate_row_major(entries.iter().copied());

        let pair = KeyPair::try_from_encrypt(candidate).map_err(|e| match e {
            HillCryptoError::NotInvertible { column } => HillCryptoError::InvalidKey { column },
            other => other,
        })?;

        log::debug!("installed {}x{} key", self.block_length, self.block_length);
        self.key = Some(pair);
        Ok(())
    }

    fn ready_key(&self) -> Result<&KeyPair, HillCryptoError> {
        self.key.as_ref().ok_or(HillCryptoError::KeyNotInitialized)
    }

    /// Multiplies every row block of `blocks` by the encryption matrix.
    pub fn encrypt_blocks(&self, blocks: &Matrix) -> Result<Matrix, HillCryptoError> {
        self.ready_key()?.encrypt.apply_to_blocks(blocks)
    }

    /// Multiplies every row block of `blocks` by the decryption matrix.
    pub fn decrypt_blocks(&self, blocks: &Matrix) -> Result<Matrix, HillCryptoError> {
        self.ready_key()?.decrypt.apply_to_blocks(blocks)
    }

    /// Captures the key as `(modulus, block length, encrypt entries)`.
    pub fn to_serialized(&self) -> Result<SerializedKey, HillCryptoError> {
        let key = self.ready_key()?;

        Ok(SerializedKey {
            modulus: self.ring.modulus(),
            block_length: self.block_length,
            entries: key.encrypt.to_row_major(),
        })
    }

    /// Rebuilds a ready manager from a persisted key, re-deriving the decrypt matrix.
    ///
    /// # Errors
    ///
    /// Returns `HillCryptoError::DimensionMismatch` if the entry count is not
    /// `block_length²`, and `HillCryptoError::InvalidKey` for a singular matrix.
    pub fn from_serialized(key: &SerializedKey) -> Result<Self, HillCryptoError> {
        let expected = key.block_length.checked_mul(key.block_length).ok_or_else(|| {
            HillCryptoError::DimensionMismatch(format!(
                "Serialized block length {} is too large",
                key.block_length
            ))
        })?;
        if key.entries.len() != expected {
            return Err(HillCryptoError::DimensionMismatch(format!(
                "Serialized key has {} entries, expected {}",
                key.entries.len(),
                expected
            )));
        }

        let mut manager = Self::new(Ring::try_with(key.modulus)?, key.block_length)?;
        manager.install_key(&key.entries)?;
        Ok(manager)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_MODULUS: u64 = 29;
    const TEST_SEED: u64 = 42;

    fn ring() -> Ring {
        Ring::try_with(TEST_MODULUS).unwrap()
    }

    #[test]
    fn test_new_starts_uninitialized() {
        let manager = KeyManager::new(ring(), 3).unwrap();
        assert!(!manager.is_ready());
        assert_eq!(manager.max_attempts(), DEFAULT_MAX_ATTEMPTS);
        assert!(manager.encrypt_matrix().is_none());

        let blocks = Matrix::with_shape(1, 3, &ring());
        assert!(matches!(
            manager.encrypt_blocks(&blocks),
            Err(HillCryptoError::KeyNotInitialized)
        ));
        assert!(matches!(
            manager.to_serialized(),
            Err(HillCryptoError::KeyNotInitialized)
        ));
    }

    #[test]
    fn test_zero_block_length_rejected() {
        assert!(matches!(
            KeyManager::new(ring(), 0),
            Err(HillCryptoError::InvalidParameters(_))
        ));
    }

    #[test]
    fn test_generated_pair_is_inverse() -> Result<(), HillCryptoError> {
        let manager = KeyManager::with_seed(ring(), 4, TEST_SEED)?;
        let pair = manager.key_pair().unwrap();
        assert!(pair.decrypt().multiply(pair.encrypt())?.is_identity());
        assert!(pair.encrypt().multiply(pair.decrypt())?.is_identity());
        Ok(())
    }

    #[test]
    fn test_same_seed_same_key() -> Result<(), HillCryptoError> {
        let a = KeyManager::with_seed(ring(), 3, TEST_SEED)?;
        let b = KeyManager::with_seed(ring(), 3, TEST_SEED)?;
        assert_eq!(a.key_pair(), b.key_pair());
        Ok(())
    }

    #[test]
    fn test_exhaustion_keeps_previous_state() -> Result<(), HillCryptoError> {
        let mut manager = KeyManager::new(ring(), 2)?.with_max_attempts(0);
        let mut rng = StdRng::seed_from_u64(TEST_SEED);
        assert!(matches!(
            manager.generate(&mut rng),
            Err(HillCryptoError::KeyGenerationExhausted { attempts: 0 })
        ));
        assert!(!manager.is_ready());

        let mut manager = manager.with_max_attempts(DEFAULT_MAX_ATTEMPTS);
        manager.generate(&mut rng)?;
        let before = manager.key_pair().cloned();

        let mut manager = manager.with_max_attempts(0);
        assert!(manager.generate(&mut rng).is_err());
        assert_eq!(manager.key_pair().cloned(), before);
        Ok(())
    }

    #[test]
    fn test_exhaustion_over_z2() -> Result<(), HillCryptoError> {
        // over Z_2 a random 1x1 matrix is singular half of the time; with a single
        // attempt some seed in a small range is bound to fail
        let ring = Ring::try_with(2)?;
        let failures = (0..64)
            .filter(|&seed| {
                let mut manager = KeyManager::new(ring.clone(), 1)
                    .unwrap()
                    .with_max_attempts(1);
                manager.generate(&mut StdRng::seed_from_u64(seed)).is_err()
            })
            .count();
        assert!(failures > 0);
        Ok(())
    }

    #[test]
    fn test_install_key() -> Result<(), HillCryptoError> {
        let mut manager = KeyManager::new(Ring::try_with(26)?, 2)?;
        manager.install_key(&[3, 3, 2, 5])?;
        assert_eq!(manager.encrypt_matrix().unwrap().to_row_major(), vec![3, 3, 2, 5]);
        assert_eq!(
            manager.decrypt_matrix().unwrap().to_row_major(),
            vec![15, 17, 20, 9]
        );
        Ok(())
    }

    #[test]
    fn test_install_singular_key_keeps_previous_pair() -> Result<(), HillCryptoError> {
        let mut manager = KeyManager::with_seed(ring(), 2, TEST_SEED)?;
        let before = manager.key_pair().cloned();

        let result = manager.install_key(&[1, 2, 0, 0]);
        assert!(matches!(result, Err(HillCryptoError::InvalidKey { column: 1 })));
        assert_eq!(manager.key_pair().cloned(), before);

        // short entry list leaves a zero row
        assert!(matches!(
            manager.install_key(&[1, 2]),
            Err(HillCryptoError::InvalidKey { .. })
        ));
        assert_eq!(manager.key_pair().cloned(), before);
        Ok(())
    }

    #[test]
    fn test_install_singular_key_on_fresh_manager() -> Result<(), HillCryptoError> {
        let mut manager = KeyManager::new(ring(), 2)?;
        assert!(manager.install_key(&[1, 1, 1, 1]).is_err());
        assert!(!manager.is_ready());
        Ok(())
    }

    #[test]
    fn test_encrypt_decrypt_blocks() -> Result<(), HillCryptoError> {
        let manager = KeyManager::with_seed(ring(), 3, TEST_SEED)?;
        let mut blocks = Matrix::with_shape(4, 3, &ring());
        blocks.populate_row_major(0..12);

        let cipher = manager.encrypt_blocks(&blocks)?;
        assert_eq!(cipher.rows(), 4);
        assert_eq!(manager.decrypt_blocks(&cipher)?, blocks);
        Ok(())
    }

    #[test]
    fn test_block_width_must_match() -> Result<(), HillCryptoError> {
        let manager = KeyManager::with_seed(ring(), 3, TEST_SEED)?;
        let blocks = Matrix::with_shape(2, 2, &ring());
        assert!(matches!(
            manager.encrypt_blocks(&blocks),
            Err(HillCryptoError::DimensionMismatch(_))
        ));
        Ok(())
    }

    #[test]
    fn test_serialized_round_trip() -> Result<(), HillCryptoError> {
        let manager = KeyManager::with_seed(ring(), 3, TEST_SEED)?;
        let restored = KeyManager::from_serialized(&manager.to_serialized()?)?;
        assert_eq!(restored.key_pair(), manager.key_pair());
        assert_eq!(restored.block_length(), 3);
        Ok(())
    }

    #[test]
    fn test_from_serialized_rejects_bad_entries() {
        let short = SerializedKey {
            modulus: TEST_MODULUS,
            block_length: 2,
            entries: vec![1, 2, 3],
        };
        assert!(matches!(
            KeyManager::from_serialized(&short),
            Err(HillCryptoError::DimensionMismatch(_))
        ));

        let singular = SerializedKey {
            modulus: TEST_MODULUS,
            block_length: 2,
            entries: vec![2, 4, 1, 2],
        };
        assert!(matches!(
            KeyManager::from_serialized(&singular),
            Err(HillCryptoError::InvalidKey { .. })
        ));
    }

    #[test]
    fn test_oversized_block_length_is_rejected() {
        assert!(matches!(
            KeyManager::new(ring(), MAX_BLOCK_LENGTH + 1),
            Err(HillCryptoError::InvalidParameters(_))
        ));
        assert!(KeyManager::new(ring(), MAX_BLOCK_LENGTH).is_ok());
    }

    #[test]
    fn test_from_serialized_huge_block_length() -> Result<(), HillCryptoError> {
        let overflowing = SerializedKey::from_json(
            r#"{"modulus":29,"block_length":4294967296,"entries":[]}"#,
        )?;
        assert!(matches!(
            KeyManager::from_serialized(&overflowing),
            Err(HillCryptoError::DimensionMismatch(_))
        ));

        let squared = MAX_BLOCK_LENGTH + 1;
        let too_wide = SerializedKey {
            modulus: TEST_MODULUS,
            block_length: squared,
            entries: vec![0; squared * squared],
        };
        assert!(matches!(
            KeyManager::from_serialized(&too_wide),
            Err(HillCryptoError::InvalidParameters(_))
        ));
        Ok(())
    }
}
