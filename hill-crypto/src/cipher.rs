use rand::Rng;

use crate::codec::StringCodec;
use crate::errors::HillCryptoError;
use crate::keypair::KeyManager;

/// Text-level Hill cipher: a codec plus a key over the codec's ring.
#[derive(Debug, Clone)]
pub struct HillCipher {
    codec: StringCodec,
    keys: KeyManager,
}

impl HillCipher {
    /// Default alphabet, key generated from `seed`.
    pub fn new(block_length: usize, seed: u64) -> Result<Self, HillCryptoError> {
        let codec = StringCodec::new()?;
        let keys = KeyManager::with_seed(codec.ring().clone(), block_length, seed)?;
        Ok(Self { codec, keys })
    }

    /// Pairs an existing codec and key manager.
    ///
    /// # Errors
    ///
    /// Returns `HillCryptoError::RingMismatch` if the key is not over the codec's ring and
    /// `HillCryptoError::KeyNotInitialized` if the manager has no key yet.
    pub fn from_key_manager(codec: StringCodec, keys: KeyManager) -> Result<Self, HillCryptoError> {
        if codec.ring() != keys.ring() {
            return Err(HillCryptoError::RingMismatch(format!(
                "Alphabet has {} symbols but the key is over Z_{}",
                codec.ring().modulus(),
                keys.ring().modulus()
            )));
        }
        if !keys.is_ready() {
            return Err(HillCryptoError::KeyNotInitialized);
        }

        Ok(Self { codec, keys })
    }

    pub fn codec(&self) -> &StringCodec {
        &self.codec
    }

    pub fn keys(&self) -> &KeyManager {
        &self.keys
    }

    pub fn encrypt<R: Rng + ?Sized>(
        &self,
        plaintext: &str,
        rng: &mut R,
    ) -> Result<String, HillCryptoError> {
        let blocks = self.codec.encode(plaintext, self.keys.block_length(), rng)?;
        let encrypted = self.keys.encrypt_blocks(&blocks)?;
        Ok(self.codec.decode(&encrypted, rng))
    }

    /// Decrypts `ciphertext`; the result starts with the original plaintext.
    pub fn decrypt<R: Rng + ?Sized>(
        &self,
        ciphertext: &str,
        rng: &mut R,
    ) -> Result<String, HillCryptoError> {
        let blocks = self.codec.encode(ciphertext, self.keys.block_length(), rng)?;
        let decrypted = self.keys.decrypt_blocks(&blocks)?;
        Ok(self.codec.decode(&decrypted, rng))
    }
}
