pub mod argon2_password_hasher;
pub mod clash_tag_validator;
pub mod jwt_token_generator;
pub mod schema;
pub mod user_registration_repository;
