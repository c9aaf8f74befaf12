use argon2::{
    Argon2, Params,
    password_hash::{
        Error, PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng,
    },
};
use chrono::Duration;
use std::sync::OnceLock;

pub struct PasswordManager;

static INSTANCE: OnceLock<Argon2> = OnceLock::new();
static DUMMY_HASH: OnceLock<Option<String>> = OnceLock::new();

/// How long an admin session cookie stays valid.
pub const SESSION_TTL: Duration = Duration::days(7);

impl PasswordManager {
    fn engine() -> &'static Argon2<'static> {
        INSTANCE.get_or_init(|| {
            let params = Params::new(
                64 * 1024, // 64MB Memory (m)
                3,         // 3 Iterations (t)
                4,         // 4 Parallelism lanes (p)
                None,      // Default hash length (32 bytes)
            )
            .unwrap_or_default();

            Argon2::new(argon2::Algorithm::Argon2id, argon2::Version::V0x13, params)
        })
    }

    pub fn hash_password(password: &str) -> Result<String, Error> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Self::engine().hash_password(password.as_bytes(), &salt)?;

        Ok(hash.to_string())
    }

    pub fn verify_password(password: &str, stored_hash: &str) -> Result<bool, Error> {
        let parsed_hash = PasswordHash::new(stored_hash)?;

        let result = Self::engine().verify_password(password.as_bytes(), &parsed_hash);

        match result {
            Ok(_) => Ok(true),
            Err(Error::Password) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Burns the same work as a real check when the email is unknown.
    pub fn verify_against_dummy(password: &str) {
        let dummy = DUMMY_HASH.get_or_init(|| {
            Self::hash_password("dummy_password_for_timing").ok()
        });

        if let Some(hash) = dummy {
            let _ = Self::verify_password(password, hash);
        }
    }

    /// Strength rules for the bootstrap admin password: at least 12
    /// characters drawn from at least 3 of the 4 character classes.
    pub fn check_strength(password: &str) -> Result<(), String> {
        const MIN_LENGTH: usize = 12;

        if password.chars().count() < MIN_LENGTH {
            return Err(format!(
                "ADMIN_PASSWORD must be at least {MIN_LENGTH} characters"
            ));
        }

        let class_of = |c: char| -> usize {
            if c.is_uppercase() {
                0
            } else if c.is_lowercase() {
                1
            } else if c.is_ascii_digit() {
                2
            } else {
                3
            }
        };
        let mut seen = [false; 4];
        password.chars().for_each(|c| seen[class_of(c)] = true);

        if seen.iter().filter(|&&s| s).count() < 3 {
            return Err(
                "ADMIN_PASSWORD needs 3 of: uppercase, lowercase, digit, symbol"
                    .to_string(),
            );
        }

        Ok(())
    }
}
