use async_trait::async_trait;

use crate::domain::{error::DomainError, models::player_profile::PlayerTag};

/// Looks a tag up in the game's player directory.
///
/// `Ok(false)` means the directory answered and did not confirm the tag.
/// A directory that cannot be reached is `Err(DomainError::GatewayUnreachable)`.
#[async_trait]
pub trait PlayerTagValidator: Send + Sync {
    async fn exists(&self, tag: &PlayerTag) -> Result<bool, DomainError>;
}
