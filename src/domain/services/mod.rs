pub mod password_service;
pub mod tag_validation_service;
pub mod token_service;
