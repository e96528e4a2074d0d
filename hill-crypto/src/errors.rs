#[derive(thiserror::Error, Debug)]
pub enum HillCryptoError {
    /// Error when creating a ring with an invalid modulus (n <= 1).
    #[error("InvalidModulus: {0}")]
    InvalidModulus(String),
    /// Error when the modulus is too large for the inverse table.
    #[error("ModulusTooLarge: {0}")]
    ModulusTooLarge(String),
    #[error("DimensionMismatch: {0}")]
    DimensionMismatch(String),
    /// Error performing ops on elements bound to different moduli.
    #[error("RingMismatch: {0}")]
    RingMismatch(String),
    #[error("OutOfRange: {0}")]
    OutOfRange(String),
    /// Error when trying to find a modular inverse that doesn't exist (gcd(a, n) != 1).
    #[error("NoInverse: {0}")]
    NoInverse(String),

    #[error("Matrix is not invertible: no unit pivot in column {column}")]
    NotInvertible { column: usize },
    #[error("Could not find an invertible key after {attempts} attempts")]
    KeyGenerationExhausted { attempts: usize },
    #[error("The supplied key is not invertible (pivot search failed in column {column})")]
    InvalidKey { column: usize },
    #[error("No key has been generated or installed")]
    KeyNotInitialized,

    #[error("Character {0:?} was not found in the alphabet")]
    CharacterNotInAlphabet(char),

    #[error("InvalidParameters: {0}")]
    InvalidParameters(String),

    #[error("Data serialization: {0}")]
    SerializationError(#[from] serde_json::Error),
}
