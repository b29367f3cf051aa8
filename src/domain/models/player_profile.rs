use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;

pub const PLAYER_TAG_MAX_LENGTH: usize = 10;

/// In-game player identifier, stored without the leading `#` and uppercased.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerTag(String);

impl PlayerTag {
    /// Normalize a raw tag (`#abc123`, ` ABC123 `) and check it against the game's format
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let trimmed = raw.trim();
        let tag = trimmed.strip_prefix('#').unwrap_or(trimmed).to_ascii_uppercase();

        if tag.is_empty() {
            return Err(DomainError::validation("player_tag", "must not be empty"));
        }
        if tag.len() > PLAYER_TAG_MAX_LENGTH {
            return Err(DomainError::validation(
                "player_tag",
                format!("must be at most {PLAYER_TAG_MAX_LENGTH} characters"),
            ));
        }
        if !tag.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(DomainError::validation(
                "player_tag",
                "may only contain letters and digits",
            ));
        }
        Ok(Self(tag))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PlayerTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Profile as submitted by the client, before primary assignment
#[derive(Debug, Clone)]
pub struct ProfileInput {
    pub player_tag: String,
    pub is_primary: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerProfile {
    player_tag: PlayerTag,
    is_primary: bool,
}

impl PlayerProfile {
    pub fn new(player_tag: PlayerTag, is_primary: bool) -> Self {
        Self {
            player_tag,
            is_primary,
        }
    }

    pub fn player_tag(&self) -> &PlayerTag {
        &self.player_tag
    }

    pub fn is_primary(&self) -> bool {
        self.is_primary
    }
}

/// Turns the submitted list into profiles with exactly one primary entry.
///
/// An explicit `is_primary = true` wins; without one, the first entry in
/// submission order becomes primary and every other entry is not.
pub fn assign_primary(inputs: Vec<ProfileInput>) -> Result<Vec<PlayerProfile>, DomainError> {
    if inputs.is_empty() {
        return Err(DomainError::EmptyProfileList);
    }

    let explicit_primaries = inputs
        .iter()
        .filter(|input| input.is_primary == Some(true))
        .count();
    if explicit_primaries > 1 {
        return Err(DomainError::MultiplePrimaryTags);
    }

    let mut seen = HashSet::with_capacity(inputs.len());
    let mut profiles = Vec::with_capacity(inputs.len());
    for (index, input) in inputs.into_iter().enumerate() {
        let tag = PlayerTag::parse(&input.player_tag)?;
        if !seen.insert(tag.clone()) {
            return Err(DomainError::DuplicateTag(tag.as_str().to_string()));
        }
        let is_primary = if explicit_primaries == 1 {
            input.is_primary == Some(true)
        } else {
            index == 0
        };
        profiles.push(PlayerProfile::new(tag, is_primary));
    }

    Ok(profiles)
}
