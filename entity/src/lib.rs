pub mod player_profiles;
pub mod users;
