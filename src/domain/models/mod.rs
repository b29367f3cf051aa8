pub mod credential;
pub mod player_profile;
pub mod user;
