use lazy_static::lazy_static;
use std::collections::HashMap;

/// The symbols of the default alphabet; a symbol's position is its ring element.
pub const DEFAULT_ALPHABET: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ∆ÿ≈";

lazy_static! {
    /// Maps a ring element (0 to 28) to its symbol in [`DEFAULT_ALPHABET`].
    pub static ref INDEX_TO_CHAR_MAP: Vec<char> = DEFAULT_ALPHABET.chars().collect();

    /// Maps a symbol of [`DEFAULT_ALPHABET`] back to its ring element.
    pub static ref CHAR_TO_INDEX_MAP: HashMap<char, usize> = {
        let mut map = HashMap::new();

        for (index, &ch) in INDEX_TO_CHAR_MAP.iter().enumerate() {
            map.insert(ch, index);
        }

        map
    };
}
