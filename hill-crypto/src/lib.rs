//! # Hill Crypto
//!
//! A Hill cipher over the finite ring Z_n: modular arithmetic with a precomputed inverse
//! table, vectors and matrices over that ring, Gauss-Jordan inversion that only accepts
//! unit pivots, and bounded random key generation.
//!
//! ```
//! use hill_crypto::keypair::KeyManager;
//! use hill_crypto::ring::{Matrix, Ring};
//!
//! let ring = Ring::try_with(29).unwrap();
//! let keys = KeyManager::with_seed(ring.clone(), 3, 42).unwrap();
//!
//! let mut blocks = Matrix::with_shape(2, 3, &ring);
//! blocks.populate_row_major([7, 4, 11, 11, 14, 26]);
//!
//! let encrypted = keys.encrypt_blocks(&blocks).unwrap();
//! assert_eq!(keys.decrypt_blocks(&encrypted).unwrap(), blocks);
//! ```

pub mod cipher;
pub mod codec;
pub mod errors;
pub mod keypair;
pub mod preset;
pub mod ring;

pub use cipher::HillCipher;
pub use codec::StringCodec;
pub use errors::HillCryptoError;
pub use keypair::{KeyManager, KeyPair, SerializedKey};
