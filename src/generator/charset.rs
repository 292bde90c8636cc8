//! Character pool construction for password generation
//!
//! All alphabets are ASCII, so the pool is kept as raw bytes and indexed directly.

use super::error::GeneratorError;
use super::password::PasswordOptions;

const LOWERCASE: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
const UPPERCASE: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const NUMBERS: &[u8] = b"0123456789";
const SYMBOLS: &[u8] = b"!@#$%^&*()_+~`|}{[]:;?><,./-=";

/// Characters that are easy to confuse with one another in most fonts
pub const SIMILAR_CHARS: &[u8] = b"oOiIlL10";

/// Punctuation that tends to be mangled by shells, URLs and quoting
pub const AMBIGUOUS_CHARS: &[u8] = b"{}[]()/'\"`~,;:.<>";

/// A selectable group of characters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CharacterClass {
    Lowercase,
    Uppercase,
    Numbers,
    Symbols,
}

impl CharacterClass {
    /// Every class, in pool concatenation order
    pub const ALL: [Self; 4] = [
        Self::Lowercase,
        Self::Uppercase,
        Self::Numbers,
        Self::Symbols,
    ];

    pub const fn alphabet(self) -> &'static [u8] {
        match self {
            Self::Lowercase => LOWERCASE,
            Self::Uppercase => UPPERCASE,
            Self::Numbers => NUMBERS,
            Self::Symbols => SYMBOLS,
        }
    }
}

/// Build the effective character pool for `options`.
///
/// Selected classes are concatenated in [`CharacterClass::ALL`] order. With no
/// class selected every alphabet is used. Exclusion sets are stripped afterwards;
/// an empty result is rejected rather than sampled from.
pub fn build_pool(options: &PasswordOptions) -> Result<Vec<u8>, GeneratorError> {
    let mut pool: Vec<u8> = CharacterClass::ALL
        .iter()
        .filter(|class| options.includes(**class))
        .flat_map(|class| class.alphabet().iter().copied())
        .collect();

    if pool.is_empty() {
        pool = CharacterClass::ALL
            .iter()
            .flat_map(|class| class.alphabet().iter().copied())
            .collect();
    }

    apply_exclusions(pool, options)
}

fn apply_exclusions(
    mut pool: Vec<u8>,
    options: &PasswordOptions,
) -> Result<Vec<u8>, GeneratorError> {
    if options.exclude_similar {
        pool.retain(|c| !SIMILAR_CHARS.contains(c));
    }
    if options.exclude_ambiguous {
        pool.retain(|c| !AMBIGUOUS_CHARS.contains(c));
    }

    if pool.is_empty() {
        return Err(GeneratorError::invalid_argument(
            "Character pool is empty after applying exclusions.",
        ));
    }

    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn all_chars() -> Vec<u8> {
        [LOWERCASE, UPPERCASE, NUMBERS, SYMBOLS].concat()
    }

    #[test]
    fn test_alphabets_are_disjoint() {
        let all = all_chars();
        let unique: HashSet<u8> = all.iter().copied().collect();
        assert_eq!(unique.len(), all.len());
        assert_eq!(all.len(), 91);
    }

    #[test]
    fn test_no_selection_falls_back_to_everything() {
        let pool = build_pool(&PasswordOptions::default()).unwrap();
        assert_eq!(pool, all_chars());
    }

    #[test]
    fn test_selection_order_is_fixed() {
        let options = PasswordOptions {
            symbols: true,
            lowercase: true,
            ..PasswordOptions::default()
        };
        let pool = build_pool(&options).unwrap();
        assert_eq!(pool, [LOWERCASE, SYMBOLS].concat());
    }

    #[test]
    fn test_exclude_similar() {
        let options = PasswordOptions {
            numbers: true,
            exclude_similar: true,
            ..PasswordOptions::default()
        };
        let pool = build_pool(&options).unwrap();
        assert_eq!(pool, b"23456789");
    }

    #[test]
    fn test_exclude_ambiguous_on_symbols() {
        let options = PasswordOptions {
            symbols: true,
            exclude_ambiguous: true,
            ..PasswordOptions::default()
        };
        let pool = build_pool(&options).unwrap();
        assert_eq!(pool, b"!@#$%^&*_+|?-=");
        assert!(pool.iter().all(|c| !AMBIGUOUS_CHARS.contains(c)));
    }

    #[test]
    fn test_exclusions_apply_to_fallback_pool() {
        let options = PasswordOptions {
            exclude_similar: true,
            exclude_ambiguous: true,
            ..PasswordOptions::default()
        };
        let pool = build_pool(&options).unwrap();
        assert!(pool.iter().all(|c| !SIMILAR_CHARS.contains(c)));
        assert!(pool.iter().all(|c| !AMBIGUOUS_CHARS.contains(c)));
        assert!(pool.contains(&b'a'));
    }

    #[test]
    fn test_emptied_pool_is_rejected() {
        let options = PasswordOptions {
            exclude_similar: true,
            ..PasswordOptions::default()
        };
        let err = apply_exclusions(b"oO10".to_vec(), &options).unwrap_err();
        assert!(err.is_client_error());
        assert!(err.message().contains("empty"));
    }
}
