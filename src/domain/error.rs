use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Repository error: {0}")]
    Repository(RepositoryError),

    #[error("Username is already taken")]
    DuplicateUsername,

    #[error("Player tag {0} is already claimed")]
    DuplicateTag(String),

    #[error("More than one profile is marked as primary")]
    MultiplePrimaryTags,

    #[error("At least one player profile is required")]
    EmptyProfileList,

    #[error("Invalid {field}: {message}")]
    ValidationFailure {
        field: &'static str,
        message: String,
    },

    #[error("Player directory unreachable: {0}")]
    GatewayUnreachable(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Failed to generate token: {0}")]
    TokenGeneration(String),
}

impl DomainError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::ValidationFailure {
            field,
            message: message.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Username is already taken")]
    DuplicateUsername,

    #[error("Player tag {0} is already claimed")]
    DuplicateTag(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

// uniqueness violations surface from the store, everything else stays a storage fault
impl From<RepositoryError> for DomainError {
    fn from(error: RepositoryError) -> Self {
        match error {
            RepositoryError::DuplicateUsername => Self::DuplicateUsername,
            RepositoryError::DuplicateTag(tag) => Self::DuplicateTag(tag),
            other => Self::Repository(other),
        }
    }
}
