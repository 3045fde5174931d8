//! Random name generation for test resources

use rand::Rng;

const LOWER_ALPHANUMERIC: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Length of the suffix added by [`append_random_string`]
pub const SUFFIX_LENGTH: usize = 5;

/// Random string of `length` lowercase alphanumeric characters
pub fn random_string_lower(length: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| LOWER_ALPHANUMERIC[rng.gen_range(0..LOWER_ALPHANUMERIC.len())] as char)
        .collect()
}

/// `base` followed by a dash and a random lowercase suffix, valid as a Kubernetes name
pub fn append_random_string(base: &str) -> String {
    format!("{}-{}", base, random_string_lower(SUFFIX_LENGTH))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_string_lower_charset() {
        let value = random_string_lower(64);
        assert_eq!(value.len(), 64);
        assert!(value
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));
    }

    #[test]
    fn test_append_random_string() {
        let name = append_random_string("steve-secret");
        assert!(name.starts_with("steve-secret-"));
        assert_eq!(name.len(), "steve-secret-".len() + SUFFIX_LENGTH);
    }
}
