use argon2::{
    Argon2,
    password_hash::{PasswordHasher as Argon2Hasher, SaltString, rand_core::OsRng},
};

use crate::domain::{
    error::DomainError,
    models::credential::HashedPassword,
    services::password_service::PasswordHasher,
};

const PASSWORD_MIN_LENGTH: usize = 8;

#[derive(Clone)]
pub struct Argon2PasswordHasher;

impl Argon2PasswordHasher {
    pub fn new() -> Self {
        Self
    }
}

impl Default for Argon2PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordHasher for Argon2PasswordHasher {
    fn hash(&self, plain_password: &str) -> Result<HashedPassword, DomainError> {
        if plain_password.chars().count() < PASSWORD_MIN_LENGTH {
            return Err(DomainError::validation(
                "password",
                format!("must be at least {PASSWORD_MIN_LENGTH} characters"),
            ));
        }

        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(plain_password.as_bytes(), &salt)
            .map_err(|e| DomainError::validation("password", e.to_string()))?
            .to_string();

        Ok(HashedPassword::new(hash))
    }
}
