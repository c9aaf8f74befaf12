mod common;

#[cfg(test)]
pub mod auth_tests {
    use std::time::{Duration, Instant};

    use civicpress::services::*;

    #[test]
    fn test_hash_and_verify_password() {
        let hash = PasswordManager::hash_password("Tajne-Heslo-2026").unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(PasswordManager::verify_password("Tajne-Heslo-2026", &hash).unwrap());
        assert!(!PasswordManager::verify_password("tajne-heslo-2026", &hash).unwrap());
    }

    #[test]
    fn test_verify_rejects_malformed_hash() {
        // Seed rows carry plain strings instead of PHC hashes.
        assert!(PasswordManager::verify_password("password0", "password0").is_err());
    }

    #[test]
    fn test_password_strength() {
        assert!(PasswordManager::check_strength("Tajne-Heslo-2026").is_ok());
        assert!(PasswordManager::check_strength("tajne-heslo-2026").is_ok());

        // Too short, even with every class.
        assert!(PasswordManager::check_strength("Ab1-").is_err());
        // Long enough, only two classes.
        assert!(PasswordManager::check_strength("tajneheslotajne2").is_err());
        assert!(PasswordManager::check_strength("tajneheslotajne").is_err());
        assert!(PasswordManager::check_strength("TAJNEHESLO2026").is_err());
    }

    #[test]
    fn test_session_ttl() {
        assert_eq!(SESSION_TTL.num_days(), 7);
    }

    #[test]
    fn test_throttle_budget_per_key() {
        let throttle = LoginThrottle::new(2, Duration::from_secs(60));
        let start = Instant::now();

        assert!(throttle.check_at("login:10.0.0.1", start).is_ok());
        assert!(throttle.check_at("login:10.0.0.1", start).is_ok());

        let wait = throttle
            .check_at("login:10.0.0.1", start + Duration::from_secs(15))
            .unwrap_err();
        assert_eq!(wait, Duration::from_secs(45));

        // Other clients are unaffected.
        assert!(throttle.check_at("login:10.0.0.2", start).is_ok());
    }

    #[test]
    fn test_throttle_window_slides() {
        let throttle = LoginThrottle::new(1, Duration::from_secs(60));
        let start = Instant::now();

        assert!(throttle.check_at("k", start).is_ok());
        assert!(throttle.check_at("k", start + Duration::from_secs(59)).is_err());
        assert!(throttle.check_at("k", start + Duration::from_secs(60)).is_ok());
    }

    #[test]
    fn test_throttle_defaults() {
        let throttle = LoginThrottle::default();
        let start = Instant::now();

        for _ in 0..LoginThrottle::DEFAULT_MAX_ATTEMPTS {
            assert!(throttle.check_at("k", start).is_ok());
        }
        assert!(throttle.check_at("k", start).is_err());
        assert_eq!(LoginThrottle::DEFAULT_WINDOW, Duration::from_secs(300));
    }
}
