//! Conversion between text and blocks of ring elements.
//!
//! Each symbol of the alphabet stands for its position in it, so the alphabet size is the
//! modulus of the ring the cipher works in.

use std::collections::HashMap;

use rand::Rng;

use crate::errors::HillCryptoError;
use crate::preset::alphabet::{CHAR_TO_INDEX_MAP, INDEX_TO_CHAR_MAP};
use crate::ring::{Matrix, Ring};

/// Maps text onto rows of ring elements and back.
#[derive(Debug, Clone)]
pub struct StringCodec {
    symbols: Vec<char>,
    indices: HashMap<char, usize>,
    ring: Ring,
}

impl StringCodec {
    /// A codec over the default 29-symbol alphabet.
    pub fn new() -> Result<Self, HillCryptoError> {
        Ok(Self {
            symbols: INDEX_TO_CHAR_MAP.clone(),
            indices: CHAR_TO_INDEX_MAP.clone(),
            ring: Ring::try_with(INDEX_TO_CHAR_MAP.len() as u64)?,
        })
    }

    /// A codec over the symbols of `alphabet`, surrounding whitespace removed.
    ///
    /// # Errors
    ///
    /// Returns `HillCryptoError::InvalidParameters` if fewer than two symbols remain or a
    /// symbol repeats.
    pub fn with_alphabet(alphabet: &str) -> Result<Self, HillCryptoError> {
        let symbols: Vec<char> = alphabet.trim().chars().collect();
        if symbols.len() < 2 {
            return Err(HillCryptoError::InvalidParameters(
                "Alphabet must contain at least two symbols".to_string(),
            ));
        }

        let mut indices = HashMap::with_capacity(symbols.len());
        for (index, &ch) in symbols.iter().enumerate() {
            if indices.insert(ch, index).is_some() {
                return Err(HillCryptoError::InvalidParameters(format!(
                    "Symbol {:?} appears more than once in the alphabet",
                    ch
                )));
            }
        }

        Ok(Self {
            ring: Ring::try_with(symbols.len() as u64)?,
            symbols,
            indices,
        })
    }

    /// The ring whose elements are the alphabet positions.
    pub fn ring(&self) -> &Ring {
        &self.ring
    }

    pub fn alphabet(&self) -> String {
        self.symbols.iter().collect()
    }

    fn index_of(&self, ch: char) -> Result<i64, HillCryptoError> {
        self.indices
            .get(&ch)
            .map(|&i| i as i64)
            .ok_or(HillCryptoError::CharacterNotInAlphabet(ch))
    }

    fn symbol_of(&self, value: i64) -> char {
        self.symbols[self.ring.reduce(value) as usize]
    }

    fn random_symbol<R: Rng + ?Sized>(&self, rng: &mut R) -> char {
        self.symbols[rng.random_range(0..self.symbols.len())]
    }

    /// Turns `text` into a matrix with one block of `block_length` elements per row.
    ///
    /// The text is padded with random symbols up to a multiple of `block_length`, so the
    /// last block is always full. Empty text gives a matrix without rows.
    ///
    /// # Errors
    ///
    /// Returns `HillCryptoError::CharacterNotInAlphabet` for the first unknown symbol.
    pub fn encode<R: Rng + ?Sized>(
        &self,
        text: &str,
        block_length: usize,
        rng: &mut R,
    ) -> Result<Matrix, HillCryptoError> {
        if block_length == 0 {
            return Err(HillCryptoError::InvalidParameters(
                "Block length must be > 0".to_string(),
            ));
        }

        let mut values = text
            .chars()
            .map(|ch| self.index_of(ch))
            .collect::<Result<Vec<_>, _>>()?;

        let padding = (block_length - values.len() % block_length) % block_length;
        values.extend((0..padding).map(|_| self.ring.random_element(rng)));

        let mut blocks = Matrix::with_shape(values.len() / block_length, block_length, &self.ring);
        blocks.populate_row_major(values);
        Ok(blocks)
    }

    /// Turns blocks back into text, appending a random tail of filler symbols.
    ///
    /// The tail has between zero and `rows - 1` symbols, so the output length no longer
    /// reveals the block count exactly.
    pub fn decode<R: Rng + ?Sized>(&self, blocks: &Matrix, rng: &mut R) -> String {
        let mut text = self.decode_exact(blocks);

        if blocks.rows() > 0 {
            let filler = rng.random_range(0..blocks.rows());
            text.extend((0..filler).map(|_| self.random_symbol(rng)));
        }

        text
    }

    /// Turns blocks back into text, symbol for element.
    pub fn decode_exact(&self, blocks: &Matrix) -> String {
        blocks
            .to_row_major()
            .into_iter()
            .map(|value| self.symbol_of(value))
            .collect()
    }
}
