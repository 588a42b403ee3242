use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;
use std::sync::Arc;
use tracing::error;

use crate::config::PasswordScheme;

/// Turns submitted passwords into stored values and checks them at login.
pub trait CredentialVerifier: Send + Sync {
    fn prepare(&self, plain: &str) -> anyhow::Result<String>;
    fn verify(&self, plain: &str, stored: &str) -> anyhow::Result<bool>;
}

/// Legacy scheme: the password is stored and compared verbatim.
pub struct PlaintextCredentials;

impl CredentialVerifier for PlaintextCredentials {
    fn prepare(&self, plain: &str) -> anyhow::Result<String> {
        Ok(plain.to_owned())
    }

    fn verify(&self, plain: &str, stored: &str) -> anyhow::Result<bool> {
        Ok(plain == stored)
    }
}

pub struct Argon2Credentials;

impl CredentialVerifier for Argon2Credentials {
    fn prepare(&self, plain: &str) -> anyhow::Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(plain.as_bytes(), &salt)
            .map_err(|e| {
                error!(error = %e, "argon2 hash_password error");
                anyhow::anyhow!(e.to_string())
            })?
            .to_string();
        Ok(hash)
    }

    fn verify(&self, plain: &str, stored: &str) -> anyhow::Result<bool> {
        let parsed = PasswordHash::new(stored).map_err(|e| {
            error!(error = %e, "argon2 parse hash error");
            anyhow::anyhow!(e.to_string())
        })?;
        Ok(Argon2::default()
            .verify_password(plain.as_bytes(), &parsed)
            .is_ok())
    }
}

pub fn verifier_for(scheme: PasswordScheme) -> Arc<dyn CredentialVerifier> {
    match scheme {
        PasswordScheme::Plain => Arc::new(PlaintextCredentials),
        PasswordScheme::Argon2 => Arc::new(Argon2Credentials),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plaintext_stores_and_compares_verbatim() {
        let v = PlaintextCredentials;
        let stored = v.prepare("p").unwrap();
        assert_eq!(stored, "p");
        assert!(v.verify("p", &stored).unwrap());
        assert!(!v.verify("P", &stored).unwrap());
    }

    #[test]
    fn argon2_hash_and_verify_roundtrip() {
        let v = Argon2Credentials;
        let password = "Secur3P@ssw0rd!";
        let hash = v.prepare(password).expect("hashing should succeed");
        assert_ne!(hash, password);
        assert!(v.verify(password, &hash).expect("verify should succeed"));
        assert!(!v.verify("wrong-password", &hash).expect("verify should not error"));
    }

    #[test]
    fn argon2_errors_on_plaintext_stored_value() {
        let err = Argon2Credentials.verify("anything", "not-a-valid-hash").unwrap_err();
        assert!(!err.to_string().is_empty());
    }
}
