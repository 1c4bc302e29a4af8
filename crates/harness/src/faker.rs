//! Randomized test-data generation
//!
//! Deterministic shape, non-deterministic content. Collisions between calls
//! are not handled: test-run volumes sit far below the probability threshold
//! where a timestamped email with a random tail would repeat.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

use crate::error::{HarnessError, Result};

const FIRST_NAMES: &[&str] = &[
    "Ada", "Bram", "Clara", "Dmitri", "Elena", "Felix", "Greta", "Hugo", "Ines", "Jonas", "Katya",
    "Lukas", "Mara", "Nils", "Olga", "Pavel", "Rosa", "Stefan", "Tilda", "Viktor",
];

const LAST_NAMES: &[&str] = &[
    "Abramov", "Becker", "Castellano", "Dvorak", "Eriksen", "Fischer", "Gruber", "Hansen",
    "Ivanova", "Jensen", "Keller", "Lindqvist", "Moreau", "Novak", "Olsen", "Petrov", "Richter",
    "Sorensen", "Toth", "Vasquez",
];

/// Profile fields posted to the People API when provisioning an account
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FakeUser {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

/// Generator of randomized user profiles and edge-case strings.
///
/// Pure apart from randomness; safe to call from any client without
/// coordination.
#[derive(Debug, Clone, Copy, Default)]
pub struct Faker;

impl Faker {
    pub fn new() -> Self {
        Self
    }

    /// Plausible, distinct-per-call user profile
    pub fn generate_user(&self) -> FakeUser {
        let mut rng = rand::thread_rng();
        let stamp = chrono::Utc::now().timestamp_millis();
        let tail = alpha_string(&mut rng, 6).to_lowercase();

        FakeUser {
            email: format!("user-{stamp}-{tail}@test.com"),
            password: password(&mut rng, 12),
            first_name: pick(&mut rng, FIRST_NAMES),
            last_name: pick(&mut rng, LAST_NAMES),
        }
    }

    /// Arbitrary alphabetic string of exactly `length` characters, used to
    /// probe server-side maximum-length validation
    pub fn generate_string(&self, length: usize) -> String {
        alpha_string(&mut rand::thread_rng(), length)
    }

    /// Syntactically valid email whose total length is exactly
    /// `total_length` characters.
    ///
    /// Local part is fixed at 50 characters (RFC limit is 64); the domain
    /// label absorbs the rest, minus the `@` and the `.com` suffix.
    pub fn generate_email_with_length(&self, total_length: usize) -> Result<String> {
        const LOCAL_LEN: usize = 50;

        let domain_len = total_length
            .checked_sub(LOCAL_LEN + "@".len() + ".com".len())
            .filter(|len| *len > 0)
            .ok_or_else(|| {
                HarnessError::InvalidArgument(format!(
                    "total length {total_length} too small for email generation"
                ))
            })?;

        let mut rng = rand::thread_rng();
        let local = alpha_string(&mut rng, LOCAL_LEN);
        let domain = alpha_string(&mut rng, domain_len);
        Ok(format!("{local}@{domain}.com"))
    }
}

fn pick(rng: &mut impl Rng, pool: &[&str]) -> String {
    pool.choose(rng).copied().unwrap_or("Alex").to_string()
}

fn alpha_string(rng: &mut impl Rng, length: usize) -> String {
    (0..length)
        .map(|_| rng.gen_range(b'a'..=b'z') as char)
        .collect()
}

fn password(rng: &mut impl Rng, length: usize) -> String {
    const CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
    (0..length)
        .map(|_| *CHARSET.choose(rng).unwrap_or(&b'x') as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_users_are_distinct() {
        let faker = Faker::new();
        let a = faker.generate_user();
        let b = faker.generate_user();
        assert_ne!(a.email, b.email);
        assert_eq!(a.password.len(), 12);
        assert!(a.email.ends_with("@test.com"));
        assert!(!a.first_name.is_empty());
        assert!(!a.last_name.is_empty());
    }

    #[test]
    fn generate_string_has_exact_length() {
        let faker = Faker::new();
        for len in [1, 51, 256] {
            let s = faker.generate_string(len);
            assert_eq!(s.len(), len);
            assert!(s.chars().all(|c| c.is_ascii_lowercase()));
        }
    }

    #[test]
    fn generated_email_matches_requested_length() {
        let faker = Faker::new();
        for total in [60, 100, 255] {
            let email = faker.generate_email_with_length(total).unwrap();
            assert_eq!(email.len(), total);
            assert_eq!(email.matches('@').count(), 1);
            assert!(email.ends_with(".com"));
        }
    }

    #[test]
    fn email_length_below_minimum_is_rejected() {
        let faker = Faker::new();
        let err = faker.generate_email_with_length(55).unwrap_err();
        assert!(matches!(err, HarnessError::InvalidArgument(_)));
    }
}
