use tracing::info;

use crate::domain::{
    error::DomainError,
    models::{
        player_profile::{ProfileInput, assign_primary},
        user::{User, Username},
    },
    repositories::user_registration_repository::UserRegistrationRepository,
    services::password_service::PasswordHasher,
};

#[derive(Debug, Clone)]
pub struct RegisterUserCommand {
    pub username: String,
    pub password: String,
    pub profiles: Vec<ProfileInput>,
}

pub struct RegisterUserUsecase<R: UserRegistrationRepository, P: PasswordHasher> {
    registration_repository: R,
    password_hasher: P,
}

impl<R: UserRegistrationRepository, P: PasswordHasher> RegisterUserUsecase<R, P> {
    pub fn new(registration_repository: R, password_hasher: P) -> Self {
        Self {
            registration_repository,
            password_hasher,
        }
    }

    /// Create the account and its profiles, all or nothing
    pub async fn create_user(&self, command: RegisterUserCommand) -> Result<User, DomainError>
    where
        R: Send + Sync,
        P: Send + Sync,
    {
        // Reject bad input before any storage access
        let username = Username::new(command.username)?;
        let profiles = assign_primary(command.profiles)?;

        // Hash password
        let password_hash = self.password_hasher.hash(&command.password)?;

        // Register user with profiles atomically
        let user = self
            .registration_repository
            .register_user_with_profiles(&username, password_hash, &profiles)
            .await?;

        info!(
            user_id = %user.id(),
            username = user.username().as_str(),
            profiles = user.profiles().len(),
            primary = user.primary_profile().map(|p| p.player_tag().as_str()),
            "user registered"
        );
        Ok(user)
    }
}
