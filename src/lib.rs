pub mod config;
pub mod constants;
pub mod playlist;
pub mod utils;

#[cfg(feature = "player")]
pub mod media;
