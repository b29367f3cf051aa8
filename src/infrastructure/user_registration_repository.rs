use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveValue::Set, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, SqlErr,
    TransactionTrait,
};
use tracing::debug;
use uuid::Uuid;

use crate::domain::{
    error::RepositoryError,
    models::{
        credential::HashedPassword,
        player_profile::PlayerProfile,
        user::{User, Username},
    },
    repositories::user_registration_repository::UserRegistrationRepository,
};
use entity::{player_profiles, users};

#[derive(Clone)]
pub struct SeaOrmUserRegistrationRepository {
    db: DatabaseConnection,
}

impl SeaOrmUserRegistrationRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRegistrationRepository for SeaOrmUserRegistrationRepository {
    async fn register_user_with_profiles(
        &self,
        username: &Username,
        password_hash: HashedPassword,
        profiles: &[PlayerProfile],
    ) -> Result<User, RepositoryError> {
        // Dropping the transaction on any early return rolls it back
        let txn = self.db.begin().await.map_err(database_error)?;

        let taken = users::Entity::find()
            .filter(users::Column::Username.eq(username.as_str()))
            .one(&txn)
            .await
            .map_err(database_error)?;
        if taken.is_some() {
            return Err(RepositoryError::DuplicateUsername);
        }

        let tags = profiles.iter().map(|profile| profile.player_tag().as_str());
        let claimed = player_profiles::Entity::find()
            .filter(player_profiles::Column::PlayerTag.is_in(tags))
            .one(&txn)
            .await
            .map_err(database_error)?;
        if let Some(claimed) = claimed {
            return Err(RepositoryError::DuplicateTag(claimed.player_tag));
        }

        // Insert user
        let user_id = Uuid::new_v4();
        let user_model = users::ActiveModel {
            id: Set(user_id),
            username: Set(username.as_str().to_string()),
            password_hash: Set(password_hash.as_str().to_string()),
            created_at: Set(Utc::now().fixed_offset()),
        };
        users::Entity::insert(user_model)
            .exec_without_returning(&txn)
            .await
            .map_err(|e| map_insert_error(e, || RepositoryError::DuplicateUsername))?;

        // Insert profiles in submission order
        for profile in profiles {
            let tag = profile.player_tag().as_str();
            let profile_model = player_profiles::ActiveModel {
                id: Set(Uuid::new_v4()),
                user_id: Set(user_id),
                player_tag: Set(tag.to_string()),
                is_primary: Set(profile.is_primary()),
            };
            player_profiles::Entity::insert(profile_model)
                .exec_without_returning(&txn)
                .await
                .map_err(|e| map_insert_error(e, || RepositoryError::DuplicateTag(tag.to_string())))?;
        }

        txn.commit().await.map_err(database_error)?;
        debug!(%user_id, profiles = profiles.len(), "registration committed");

        Ok(User::new(user_id, username.clone(), profiles.to_vec()))
    }
}

/// The UNIQUE constraints are the final word on duplicates: a concurrent
/// registration can slip past the lookups above but not past the insert.
fn map_insert_error(error: DbErr, on_duplicate: impl FnOnce() -> RepositoryError) -> RepositoryError {
    match error.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => on_duplicate(),
        _ => database_error(error),
    }
}

fn database_error(error: DbErr) -> RepositoryError {
    RepositoryError::DatabaseError(error.to_string())
}
