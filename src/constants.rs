//! Project-wide constants used across multiple modules.
//!
//! This module centralizes constant definitions to avoid duplication and ensure
//! consistency between the playlist, the open dialog and the configuration.

/// Supported audio file extensions
pub const AUDIO_EXTENSIONS: &[&str] = &["wav", "mp3", "ogg", "flac"];

/// Volume applied to a fresh player, in percent
pub const DEFAULT_VOLUME_PERCENT: u8 = 80;

/// Timeout for the single HTTP request made by the stream player
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

/// Step used by the seek keys
pub const DEFAULT_SEEK_STEP_SECS: u64 = 5;

/// Volume change per key press, in percent
pub const VOLUME_STEP_PERCENT: u8 = 5;

/// Log file name placed in the system temp directory
pub const LOG_FILE_NAME: &str = "deck-player.log";
