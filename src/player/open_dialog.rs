//! Open dialog for adding tracks to the playlist.
//!
//! This module provides a small file browser: it lists the sub-directories and
//! supported audio files of the current directory, lets the user walk the tree
//! and either pick a single file or take every audio file in the directory.

use std::fs;
use std::path::PathBuf;

use deck_player::playlist::is_supported_audio_file;

#[derive(Clone, Debug, PartialEq)]
pub enum EntryKind {
    Parent,
    Directory,
    AudioFile,
}

#[derive(Clone, Debug)]
pub struct DialogEntry {
    pub name: String,
    pub kind: EntryKind,
}

/// What the user chose when leaving the dialog.
#[derive(Debug, PartialEq)]
pub enum OpenChoice {
    File(PathBuf),
    Directory(PathBuf),
}

#[derive(Clone)]
pub struct OpenDialog {
    pub current_path: PathBuf,
    pub entries: Vec<DialogEntry>,
    pub selected_index: usize,
}

impl OpenDialog {
    pub fn new(initial_path: PathBuf) -> Self {
        let mut dialog = Self {
            current_path: initial_path,
            entries: Vec::new(),
            selected_index: 0,
        };

        dialog.refresh_entries();
        dialog
    }

    pub fn refresh_entries(&mut self) {
        let mut directories = Vec::new();
        let mut files = Vec::new();

        if let Ok(entries) = fs::read_dir(&self.current_path) {
            for entry in entries.flatten() {
                let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                    continue;
                };
                // Skip hidden entries
                if name.starts_with('.') {
                    continue;
                }
                let path = entry.path();
                if path.is_dir() {
                    directories.push(name);
                } else if is_supported_audio_file(&path) {
                    files.push(name);
                }
            }
        } else {
            log::warn!("Could not read directory {:?}", self.current_path);
        }

        directories.sort();
        files.sort();

        self.entries.clear();
        if self.current_path.parent().is_some() {
            self.entries.push(DialogEntry {
                name: "..".to_string(),
                kind: EntryKind::Parent,
            });
        }
        self.entries.extend(directories.into_iter().map(|name| DialogEntry {
            name,
            kind: EntryKind::Directory,
        }));
        self.entries.extend(files.into_iter().map(|name| DialogEntry {
            name,
            kind: EntryKind::AudioFile,
        }));

        self.selected_index = 0;
    }

    pub fn navigate_up(&mut self) {
        if self.selected_index > 0 {
            self.selected_index -= 1;
        }
    }

    pub fn navigate_down(&mut self) {
        if self.selected_index < self.entries.len().saturating_sub(1) {
            self.selected_index += 1;
        }
    }

    /// Enter the selected directory, or return the selected file.
    pub fn activate(&mut self) -> Option<OpenChoice> {
        let entry = self.entries.get(self.selected_index)?.clone();
        match entry.kind {
            EntryKind::Parent => {
                if let Some(parent) = self.current_path.parent() {
                    self.current_path = parent.to_path_buf();
                }
                self.refresh_entries();
                None
            }
            EntryKind::Directory => {
                self.current_path = self.current_path.join(&entry.name);
                self.refresh_entries();
                None
            }
            EntryKind::AudioFile => Some(OpenChoice::File(self.current_path.join(&entry.name))),
        }
    }

    pub fn choose_directory(&self) -> OpenChoice {
        OpenChoice::Directory(self.current_path.clone())
    }

    pub fn audio_file_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| entry.kind == EntryKind::AudioFile)
            .count()
    }
}
