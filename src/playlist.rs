//! Ordered list of tracks for the local player.
//!
//! Entries are plain file paths kept in insertion order. Adding a path that is
//! already present is a no-op, checked with a linear scan; there is no other
//! normalisation, so `a/../b.wav` and `b.wav` are different entries. Navigation
//! stays within bounds and never wraps around.

use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use crate::constants::AUDIO_EXTENSIONS;

#[derive(Debug, Default, Clone)]
pub struct Playlist {
    entries: Vec<PathBuf>,
    current: usize,
}

impl Playlist {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `path` unless it is already in the list. Returns whether it was added.
    pub fn add(&mut self, path: impl Into<PathBuf>) -> bool {
        let path = path.into();
        if self.entries.contains(&path) {
            log::debug!("Already in playlist, skipping: {path:?}");
            return false;
        }
        log::info!("Added to playlist: {path:?}");
        self.entries.push(path);
        true
    }

    /// Add every supported audio file directly inside `dir`, sorted by file name.
    pub fn add_directory(&mut self, dir: &Path) -> Result<usize, Box<dyn Error>> {
        let mut files: Vec<PathBuf> = fs::read_dir(dir)?
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| path.is_file() && is_supported_audio_file(path))
            .collect();
        files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

        Ok(files.into_iter().filter(|path| self.add(path.clone())).count())
    }

    pub fn select(&mut self, index: usize) -> Option<&Path> {
        if index < self.entries.len() {
            self.current = index;
            self.current_path()
        } else {
            None
        }
    }

    pub fn next(&mut self) -> Option<&Path> {
        if self.current + 1 < self.entries.len() {
            self.current += 1;
            self.current_path()
        } else {
            None
        }
    }

    pub fn previous(&mut self) -> Option<&Path> {
        if self.current > 0 && !self.entries.is_empty() {
            self.current -= 1;
            self.current_path()
        } else {
            None
        }
    }

    pub fn current_path(&self) -> Option<&Path> {
        self.entries.get(self.current).map(PathBuf::as_path)
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn display_names(&self) -> Vec<String> {
        self.entries.iter().map(|path| display_name(path)).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// File name of `path`, falling back to the full path when there is none.
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .unwrap_or_else(|| path.display().to_string())
}

pub fn is_supported_audio_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| AUDIO_EXTENSIONS.contains(&e.to_lowercase().as_str()))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn playlist_of(paths: &[&str]) -> Playlist {
        let mut playlist = Playlist::new();
        for path in paths {
            playlist.add(*path);
        }
        playlist
    }

    #[test]
    fn test_new_playlist() {
        let playlist = Playlist::new();
        assert!(playlist.is_empty());
        assert_eq!(playlist.current_index(), 0);
        assert!(playlist.current_path().is_none());
    }

    #[test]
    fn test_add_skips_duplicates() {
        let mut playlist = Playlist::new();
        assert!(playlist.add("/music/a.mp3"));
        assert!(playlist.add("/music/b.wav"));
        assert!(!playlist.add("/music/a.mp3"));
        assert_eq!(playlist.len(), 2);
    }

    #[test]
    fn test_next_stops_at_end() {
        let mut playlist = playlist_of(&["a.wav", "b.wav"]);

        assert_eq!(playlist.next(), Some(Path::new("b.wav")));
        assert_eq!(playlist.next(), None);
        assert_eq!(playlist.current_index(), 1);
    }

    #[test]
    fn test_previous_stops_at_start() {
        let mut playlist = playlist_of(&["a.wav", "b.wav"]);

        assert_eq!(playlist.previous(), None);
        playlist.select(1);
        assert_eq!(playlist.previous(), Some(Path::new("a.wav")));
        assert_eq!(playlist.current_index(), 0);
    }

    #[test]
    fn test_navigation_on_empty_playlist() {
        let mut playlist = Playlist::new();
        assert!(playlist.next().is_none());
        assert!(playlist.previous().is_none());
        assert!(playlist.select(0).is_none());
    }

    #[test]
    fn test_select_out_of_range_keeps_current() {
        let mut playlist = playlist_of(&["a.wav", "b.wav", "c.wav"]);
        playlist.select(2);

        assert!(playlist.select(7).is_none());
        assert_eq!(playlist.current_index(), 2);
    }

    #[test]
    fn test_display_names() {
        let playlist = playlist_of(&["/music/one.mp3", "two.ogg"]);
        assert_eq!(playlist.display_names(), vec!["one.mp3", "two.ogg"]);
    }

    #[test]
    fn test_is_supported_audio_file() {
        assert!(is_supported_audio_file(Path::new("song.mp3")));
        assert!(is_supported_audio_file(Path::new("song.WAV")));
        assert!(is_supported_audio_file(Path::new("song.ogg")));
        assert!(is_supported_audio_file(Path::new("song.flac")));
        assert!(!is_supported_audio_file(Path::new("song.lrc")));
        assert!(!is_supported_audio_file(Path::new("song")));
    }

    #[test]
    fn test_add_directory() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("b.mp3"), b"").unwrap();
        fs::write(temp_dir.path().join("a.wav"), b"").unwrap();
        fs::write(temp_dir.path().join("notes.txt"), b"").unwrap();
        fs::create_dir(temp_dir.path().join("nested.wav")).unwrap();

        let mut playlist = Playlist::new();
        let added = playlist.add_directory(temp_dir.path()).unwrap();

        assert_eq!(added, 2);
        assert_eq!(playlist.display_names(), vec!["a.wav", "b.mp3"]);

        // Second scan adds nothing new
        assert_eq!(playlist.add_directory(temp_dir.path()).unwrap(), 0);
    }

    #[test]
    fn test_add_directory_missing() {
        let mut playlist = Playlist::new();
        assert!(
            playlist
                .add_directory(Path::new("/this/path/does/not/exist/12345"))
                .is_err()
        );
    }
}
