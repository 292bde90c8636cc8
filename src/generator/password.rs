//! Random password generation

use rand::RngCore;

use super::charset::{self, CharacterClass};
use super::error::GeneratorError;

pub const MIN_PASSWORD_LENGTH: usize = 8;
pub const MAX_PASSWORD_LENGTH: usize = 256;

/// Which characters a generated password may contain.
///
/// The default selects no class, which means "use every class".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PasswordOptions {
    /// Include `a-z`
    pub lowercase: bool,
    /// Include `A-Z`
    pub uppercase: bool,
    /// Include `0-9`
    pub numbers: bool,
    /// Include punctuation symbols
    pub symbols: bool,
    /// Strip visually similar characters (`oOiIlL10`)
    pub exclude_similar: bool,
    /// Strip brackets, quotes and other easily mangled punctuation
    pub exclude_ambiguous: bool,
}

impl PasswordOptions {
    pub const fn includes(&self, class: CharacterClass) -> bool {
        match class {
            CharacterClass::Lowercase => self.lowercase,
            CharacterClass::Uppercase => self.uppercase,
            CharacterClass::Numbers => self.numbers,
            CharacterClass::Symbols => self.symbols,
        }
    }
}

/// Generate a password of exactly `length` characters using the thread-local CSPRNG.
pub fn generate_password(length: usize, options: &PasswordOptions) -> Result<String, GeneratorError> {
    generate_password_with(&mut rand::rng(), length, options)
}

/// Generate a password drawing randomness from `rng`.
///
/// One byte is drawn per character and reduced modulo the pool size, so pools
/// that do not divide 256 carry a small bias towards their first characters.
/// Nothing is drawn when the arguments are rejected.
pub fn generate_password_with<R: RngCore + ?Sized>(
    rng: &mut R,
    length: usize,
    options: &PasswordOptions,
) -> Result<String, GeneratorError> {
    if !(MIN_PASSWORD_LENGTH..=MAX_PASSWORD_LENGTH).contains(&length) {
        return Err(GeneratorError::invalid_argument(format!(
            "Password length must be between {MIN_PASSWORD_LENGTH} and {MAX_PASSWORD_LENGTH} characters."
        )));
    }

    let pool = charset::build_pool(options)?;

    let mut bytes = vec![0u8; length];
    rng.fill_bytes(&mut bytes);

    Ok(bytes
        .iter()
        .map(|b| char::from(pool[usize::from(*b) % pool.len()]))
        .collect())
}
