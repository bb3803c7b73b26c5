//! Random value generation for secret codes and test fixtures.

use rand::{Rng, distr::Alphanumeric};

/// Length of email verification secret codes.
pub const SECRET_CODE_LENGTH: usize = 32;

/// Generate a random alphanumeric string of length `n`.
pub fn random_string(n: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(n)
        .map(char::from)
        .collect()
}

/// Generate the secret code for a verification record.
pub fn random_secret_code() -> String {
    random_string(SECRET_CODE_LENGTH)
}

/// Generate a random username-shaped owner name.
pub fn random_owner() -> String {
    random_string(8).to_lowercase()
}

/// Generate a random balance between 100 and 10000 minor units.
pub fn random_money() -> i64 {
    rand::rng().random_range(100..=10_000)
}

/// Generate a random email address.
pub fn random_email() -> String {
    format!("{}@example.com", random_string(10).to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_string_has_requested_length() {
        assert_eq!(random_string(32).len(), 32);
        assert_eq!(random_secret_code().len(), SECRET_CODE_LENGTH);
    }

    #[test]
    fn random_money_stays_in_range() {
        for _ in 0..100 {
            let amount = random_money();
            assert!((100..=10_000).contains(&amount));
        }
    }
}
