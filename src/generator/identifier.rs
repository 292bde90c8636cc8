//! Random UUID generation

use uuid::Uuid;

/// Generate a version 4 UUID as lowercase hyphenated text
pub fn generate_uuid() -> String {
    Uuid::new_v4().hyphenated().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_canonical(id: &str) -> bool {
        let groups: Vec<&str> = id.split('-').collect();
        groups.iter().map(|g| g.len()).eq([8, 4, 4, 4, 12])
            && groups
                .iter()
                .all(|g| g.bytes().all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b)))
    }

    #[test]
    fn test_canonical_format() {
        let id = generate_uuid();
        assert_eq!(id.len(), 36);
        assert!(is_canonical(&id), "not a canonical UUID: {id}");
    }

    #[test]
    fn test_version_and_variant_bits() {
        let id = generate_uuid();
        assert_eq!(&id[14..15], "4");
        assert!(matches!(&id[19..20], "8" | "9" | "a" | "b"));
    }

    #[test]
    fn test_successive_calls_differ() {
        assert_ne!(generate_uuid(), generate_uuid());
    }
}
