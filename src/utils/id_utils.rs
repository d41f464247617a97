use rand::Rng;

use crate::config::{IdConfig, CUSTOM_ID_ALPHABET, NANOID_ALPHABET};

const DEFAULT_NANOID_LENGTH: usize = 21;
const DEFAULT_CUSTOM_LENGTH: usize = 20;

/// URL-safe random identifier, 21 characters unless `length` says otherwise
pub fn nanoid(length: Option<usize>) -> String {
    random_string(NANOID_ALPHABET, length.unwrap_or(DEFAULT_NANOID_LENGTH))
}

/// Random identifier drawn from `alphabet`
///
/// An empty alphabet falls back to uppercase alphanumerics and a zero length
/// to 20 characters.
pub fn nanoid_with_alphabet(alphabet: &str, length: usize) -> String {
    let alphabet = if alphabet.is_empty() { CUSTOM_ID_ALPHABET } else { alphabet };
    let length = if length == 0 { DEFAULT_CUSTOM_LENGTH } else { length };
    random_string(alphabet, length)
}

/// Random v4 UUID in hyphenated form
pub fn uuid() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Lexicographically sortable ULID
pub fn ulid() -> String {
    ulid::Ulid::new().to_string()
}

fn random_string(alphabet: &str, length: usize) -> String {
    let symbols: Vec<char> = alphabet.chars().collect();
    let mut rng = rand::thread_rng();

    (0..length)
        .map(|_| symbols[rng.gen_range(0..symbols.len())])
        .collect()
}

/// Identifier generator bound to configured lengths and alphabet
#[derive(Debug, Clone)]
pub struct IdGenerator {
    nanoid_length: usize,
    custom_alphabet: String,
    custom_length: usize,
}

impl IdGenerator {
    pub fn new(config: &IdConfig) -> Self {
        Self {
            nanoid_length: config.nanoid_length,
            custom_alphabet: config.custom_alphabet.clone(),
            custom_length: config.custom_length,
        }
    }

    pub fn nanoid(&self) -> String {
        nanoid(Some(self.nanoid_length))
    }

    pub fn custom(&self) -> String {
        nanoid_with_alphabet(&self.custom_alphabet, self.custom_length)
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new(&IdConfig::default())
    }
}
