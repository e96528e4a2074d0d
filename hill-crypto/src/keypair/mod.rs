//! Key management: generating, installing and persisting Hill cipher keys.

pub mod key_manager;
pub mod serialized;

pub use key_manager::{DEFAULT_MAX_ATTEMPTS, KeyManager, KeyPair, MAX_BLOCK_LENGTH};
pub use serialized::SerializedKey;
