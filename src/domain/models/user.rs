use sea_orm::prelude::Uuid;
use serde::{Deserialize, Serialize};

use crate::domain::{error::DomainError, models::player_profile::PlayerProfile};

const USERNAME_MAX_LENGTH: usize = 150;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserId(Uuid);
impl UserId {
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Account name: 1-150 characters of letters, digits and `@.+-_`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Username(String);
impl Username {
    pub fn new(value: String) -> Result<Self, DomainError> {
        if value.is_empty() {
            return Err(DomainError::validation("username", "must not be empty"));
        }
        if value.chars().count() > USERNAME_MAX_LENGTH {
            return Err(DomainError::validation(
                "username",
                format!("must be at most {USERNAME_MAX_LENGTH} characters"),
            ));
        }
        if !value
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'))
        {
            return Err(DomainError::validation(
                "username",
                "may only contain letters, digits and @/./+/-/_",
            ));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    id: UserId,
    username: Username,
    profiles: Vec<PlayerProfile>,
}

impl User {
    pub fn new(id: Uuid, username: Username, profiles: Vec<PlayerProfile>) -> Self {
        Self {
            id: UserId(id),
            username,
            profiles,
        }
    }

    pub fn id(&self) -> &UserId {
        &self.id
    }
    pub fn username(&self) -> &Username {
        &self.username
    }
    pub fn profiles(&self) -> &[PlayerProfile] {
        &self.profiles
    }

    pub fn primary_profile(&self) -> Option<&PlayerProfile> {
        self.profiles.iter().find(|profile| profile.is_primary())
    }
}
