use async_trait::async_trait;

use crate::domain::{
    error::RepositoryError,
    models::{
        credential::HashedPassword,
        player_profile::PlayerProfile,
        user::{User, Username},
    },
};

/// Repository for user registration that handles both user and profile creation atomically
#[async_trait]
pub trait UserRegistrationRepository {
    /// Register a new user with its player profiles in a single transaction.
    ///
    /// Fails with `DuplicateUsername` / `DuplicateTag` when a uniqueness
    /// constraint is hit, in which case nothing is persisted.
    async fn register_user_with_profiles(
        &self,
        username: &Username,
        password_hash: HashedPassword,
        profiles: &[PlayerProfile],
    ) -> Result<User, RepositoryError>;
}
