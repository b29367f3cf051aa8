pub mod player_handler;
