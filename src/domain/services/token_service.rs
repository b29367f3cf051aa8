use crate::domain::{error::DomainError, models::user::User};

pub type Token = String;

/// Issues the session token handed out right after registration
pub trait TokenGenerator: Send + Sync {
    fn generate(&self, user: &User) -> Result<Token, DomainError>;
}
