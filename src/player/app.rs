//! Main application state and control flow for the local player.
//!
//! This module coordinates the playlist, the audio engine, the open dialog and
//! the message box. It owns the event loop: each tick it polls the engine for
//! progress and for the end of the current track, redraws, and dispatches key
//! presses. A finished track advances to the next playlist entry.

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use log::info;
use ratatui::Terminal;
use std::error::Error;
use std::path::{Path, PathBuf};
use std::time::Duration;

use deck_player::config::Config;
use deck_player::constants::VOLUME_STEP_PERCENT;
use deck_player::playlist::{Playlist, display_name};

use super::audio::AudioEngine;
use super::message::MessageDialog;
use super::open_dialog::{OpenChoice, OpenDialog};
use super::ui;

pub struct App {
    pub should_quit: bool,
    pub playlist: Playlist,
    pub selected: usize,
    pub audio_engine: Option<AudioEngine>,
    pub current_file: Option<PathBuf>,
    pub is_playing: bool,
    pub playback_position: f32, // 0.0 to 1.0
    pub elapsed: Duration,
    pub duration: Option<Duration>,
    pub volume_percent: u8,
    pub seek_step: Duration,
    pub status: String,
    pub open_dialog: Option<OpenDialog>,
    pub message: Option<MessageDialog>,
}

impl App {
    pub fn new(config: &Config) -> Self {
        Self {
            should_quit: false,
            playlist: Playlist::new(),
            selected: 0,
            audio_engine: None,
            current_file: None,
            is_playing: false,
            playback_position: 0.0,
            elapsed: Duration::ZERO,
            duration: None,
            volume_percent: config.default_volume.min(100),
            seek_step: config.seek_step(),
            status: "Ready".to_string(),
            open_dialog: None,
            message: None,
        }
    }

    /// Seed the playlist. Directories contribute every audio file they contain.
    pub fn add_paths(&mut self, paths: &[PathBuf]) {
        for path in paths {
            if path.is_dir() {
                match self.playlist.add_directory(path) {
                    Ok(0) => {
                        self.message = Some(MessageDialog::info(
                            "Open",
                            format!("No new audio files in {}", path.display()),
                        ));
                    }
                    Ok(count) => info!("Added {count} files from {path:?}"),
                    Err(e) => {
                        self.message = Some(MessageDialog::error(
                            "Error",
                            format!("Could not read {}: {e}", path.display()),
                        ));
                    }
                }
            } else {
                self.playlist.add(path.clone());
            }
        }
    }

    pub fn load_track(&mut self, path: &Path) {
        match self.try_load(path) {
            Ok(()) => {
                self.current_file = Some(path.to_path_buf());
                self.is_playing = true;
                self.status = format!("Playing {}", display_name(path));
            }
            Err(e) => {
                // Back to idle: nothing plays and nothing is marked as loaded
                if let Some(engine) = &mut self.audio_engine {
                    engine.stop();
                }
                self.current_file = None;
                self.is_playing = false;
                self.duration = None;
                self.playback_position = 0.0;
                self.elapsed = Duration::ZERO;
                self.status = "Ready".to_string();
                self.message = Some(MessageDialog::error(
                    "Error",
                    format!("Failed to load audio file: {e}"),
                ));
            }
        }
    }

    fn try_load(&mut self, path: &Path) -> Result<(), Box<dyn Error>> {
        // Create audio engine if needed
        if self.audio_engine.is_none() {
            self.audio_engine = Some(AudioEngine::new()?);
        }

        let volume = self.volume_percent as f32 / 100.0;
        if let Some(engine) = &mut self.audio_engine {
            engine.load_file(path)?;
            engine.set_volume(volume);
            self.duration = engine.duration();
            self.playback_position = 0.0;
            self.elapsed = Duration::ZERO;

            // Start playback automatically when file is loaded
            engine.play();
        }

        Ok(())
    }

    pub fn play_selected(&mut self) {
        if let Some(path) = self.playlist.select(self.selected).map(Path::to_path_buf) {
            self.load_track(&path);
        }
    }

    pub fn next_track(&mut self) -> bool {
        match self.playlist.next().map(Path::to_path_buf) {
            Some(path) => {
                self.selected = self.playlist.current_index();
                self.load_track(&path);
                true
            }
            None => false,
        }
    }

    pub fn previous_track(&mut self) -> bool {
        match self.playlist.previous().map(Path::to_path_buf) {
            Some(path) => {
                self.selected = self.playlist.current_index();
                self.load_track(&path);
                true
            }
            None => false,
        }
    }

    pub fn toggle_playback(&mut self) {
        if self.current_file.is_none() {
            self.message = Some(MessageDialog::warning(
                "Notice",
                "Select an audio file first",
            ));
            return;
        }

        if let Some(engine) = &mut self.audio_engine {
            if self.is_playing {
                engine.pause();
                self.is_playing = false;
                self.status = "Paused".to_string();
            } else {
                engine.play();
                self.is_playing = engine.is_playing();
                if let Some(path) = &self.current_file {
                    self.status = format!("Playing {}", display_name(path));
                }
            }
        }
    }

    pub fn stop(&mut self) {
        if let Some(engine) = &mut self.audio_engine {
            engine.stop();
        }
        self.is_playing = false;
        self.playback_position = 0.0;
        self.elapsed = Duration::ZERO;
        self.status = "Playback stopped".to_string();
    }

    pub fn change_volume(&mut self, delta: i16) {
        let volume = (self.volume_percent as i16 + delta).clamp(0, 100) as u8;
        self.volume_percent = volume;
        if let Some(engine) = &self.audio_engine {
            engine.set_volume(volume as f32 / 100.0);
        }
        self.status = format!("Volume set to {volume}%");
        info!("Volume set to {volume}%");
    }

    pub fn seek(&mut self, forward: bool) {
        let step = self.seek_step.as_secs_f32();
        if let Some(engine) = &mut self.audio_engine {
            engine.seek_relative(if forward { step } else { -step });
        }
    }

    pub fn select_next_row(&mut self) {
        if self.selected + 1 < self.playlist.len() {
            self.selected += 1;
        }
    }

    pub fn select_previous_row(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Poll the engine: refresh progress and advance when a track ends.
    pub fn tick(&mut self) {
        let mut finished = false;

        if let Some(engine) = &mut self.audio_engine {
            finished = engine.take_finished();
            self.playback_position = engine.get_progress();
            self.elapsed = engine.position();
        }

        if finished {
            self.is_playing = false;
            if !self.next_track() {
                self.status = "Playback finished".to_string();
            }
        }
    }

    pub fn show_open_dialog(&mut self) {
        let start = self
            .current_file
            .as_ref()
            .and_then(|file| file.parent())
            .filter(|parent| !parent.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .or_else(|| std::env::current_dir().ok())
            .unwrap_or_else(|| PathBuf::from("."));
        self.open_dialog = Some(OpenDialog::new(start));
    }

    pub fn apply_open_choice(&mut self, choice: OpenChoice) {
        match choice {
            OpenChoice::File(path) => {
                if self.playlist.add(path.clone()) {
                    self.status = format!("Added {}", display_name(&path));
                }
            }
            OpenChoice::Directory(path) => self.add_paths(&[path]),
        }
        self.open_dialog = None;
    }
}

pub fn run_with_files(paths: &[PathBuf], config: &Config) -> Result<(), Box<dyn Error>> {
    super::init_logging(config)?;
    info!("Starting deck local player");

    let mut app = App::new(config);
    app.add_paths(paths);

    let mut terminal = super::enter_terminal()?;
    let res = run_app(&mut terminal, &mut app);
    super::leave_terminal(&mut terminal)?;

    if let Err(e) = &res {
        log::error!("Player exited with error: {e}");
    }
    res
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> Result<(), Box<dyn Error>> {
    loop {
        app.tick();

        terminal.draw(|f| ui::draw(f, app))?;

        // Poll for events with a short timeout to allow continuous rendering
        if event::poll(Duration::from_millis(50))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            handle_key_event(app, key);
        }

        if app.should_quit {
            if let Some(engine) = &mut app.audio_engine {
                engine.stop();
            }
            return Ok(());
        }
    }
}

fn handle_key_event(app: &mut App, key: event::KeyEvent) {
    if app.message.is_some() {
        handle_message_keys(app, key);
    } else if app.open_dialog.is_some() {
        handle_open_dialog_keys(app, key);
    } else {
        handle_player_keys(app, key);
    }
}

fn handle_message_keys(app: &mut App, key: event::KeyEvent) {
    if matches!(key.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
        app.message = None;
    }
}

fn handle_open_dialog_keys(app: &mut App, key: event::KeyEvent) {
    let Some(dialog) = app.open_dialog.as_mut() else {
        return;
    };

    match key.code {
        KeyCode::Esc => app.open_dialog = None,
        KeyCode::Up => dialog.navigate_up(),
        KeyCode::Down => dialog.navigate_down(),
        KeyCode::Enter => {
            if let Some(choice) = dialog.activate() {
                app.apply_open_choice(choice);
            }
        }
        KeyCode::Char('a') => {
            let choice = dialog.choose_directory();
            app.apply_open_choice(choice);
        }
        _ => {}
    }
}

fn handle_player_keys(app: &mut App, key: event::KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Char(' ') => app.toggle_playback(),
        KeyCode::Char('s') => app.stop(),
        KeyCode::Left => {
            app.previous_track();
        }
        KeyCode::Right => {
            app.next_track();
        }
        KeyCode::Up => app.select_previous_row(),
        KeyCode::Down => app.select_next_row(),
        KeyCode::Enter => app.play_selected(),
        KeyCode::Char('+') | KeyCode::Char('=') => app.change_volume(VOLUME_STEP_PERCENT as i16),
        KeyCode::Char('-') => app.change_volume(-(VOLUME_STEP_PERCENT as i16)),
        KeyCode::Char('[') => app.seek(false),
        KeyCode::Char(']') => app.seek(true),
        KeyCode::Char('o') => app.show_open_dialog(),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEvent, KeyModifiers};
    use std::fs;
    use tempfile::TempDir;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn app_with(paths: &[&str]) -> App {
        let mut app = App::new(&Config::new());
        for path in paths {
            app.playlist.add(*path);
        }
        app
    }

    #[test]
    fn test_new_app_initial_state() {
        let app = App::new(&Config::new());

        assert!(!app.should_quit);
        assert!(app.playlist.is_empty());
        assert!(app.current_file.is_none());
        assert!(!app.is_playing);
        assert!(app.audio_engine.is_none());
        assert_eq!(app.volume_percent, 80);
        assert_eq!(app.seek_step, Duration::from_secs(5));
        assert_eq!(app.status, "Ready");
        assert!(app.message.is_none());
    }

    #[test]
    fn test_toggle_without_file_warns() {
        let mut app = App::new(&Config::new());

        app.toggle_playback();

        assert!(!app.is_playing);
        let message = app.message.as_ref().unwrap();
        assert_eq!(message.kind, super::super::message::MessageKind::Warning);
        assert!(message.text.contains("Select an audio file"));
    }

    #[test]
    fn test_change_volume_clamps() {
        let mut app = App::new(&Config::new());

        app.change_volume(50);
        assert_eq!(app.volume_percent, 100);
        assert_eq!(app.status, "Volume set to 100%");

        app.change_volume(-150);
        assert_eq!(app.volume_percent, 0);
    }

    #[test]
    fn test_stop_without_engine() {
        let mut app = App::new(&Config::new());
        app.playback_position = 0.4;

        app.stop();

        assert!(!app.is_playing);
        assert_eq!(app.playback_position, 0.0);
        assert_eq!(app.status, "Playback stopped");
    }

    #[test]
    fn test_row_selection_bounds() {
        let mut app = app_with(&["a.wav", "b.wav"]);

        app.select_previous_row();
        assert_eq!(app.selected, 0);
        app.select_next_row();
        app.select_next_row();
        assert_eq!(app.selected, 1);
    }

    #[test]
    fn test_next_track_at_end_of_playlist() {
        let mut app = app_with(&["a.wav"]);

        assert!(!app.next_track());
        assert!(!app.previous_track());
        assert!(app.message.is_none());
    }

    #[test]
    fn test_add_paths_mixes_files_and_directories() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("one.wav"), b"").unwrap();
        fs::write(temp_dir.path().join("two.mp3"), b"").unwrap();

        let mut app = App::new(&Config::new());
        app.add_paths(&[
            PathBuf::from("/music/solo.ogg"),
            temp_dir.path().to_path_buf(),
        ]);

        assert_eq!(
            app.playlist.display_names(),
            vec!["solo.ogg", "one.wav", "two.mp3"]
        );
    }

    #[test]
    fn test_add_empty_directory_reports() {
        let temp_dir = TempDir::new().unwrap();
        let mut app = App::new(&Config::new());

        app.add_paths(&[temp_dir.path().to_path_buf()]);

        assert!(app.playlist.is_empty());
        assert!(app.message.is_some());
    }

    #[test]
    fn test_apply_open_choice_file() {
        let mut app = App::new(&Config::new());
        app.show_open_dialog();

        app.apply_open_choice(OpenChoice::File(PathBuf::from("/music/x.flac")));

        assert!(app.open_dialog.is_none());
        assert_eq!(app.playlist.len(), 1);
        assert_eq!(app.status, "Added x.flac");
    }

    #[test]
    fn test_message_blocks_player_keys() {
        let mut app = App::new(&Config::new());
        app.message = Some(MessageDialog::warning("Notice", "hello"));

        handle_key_event(&mut app, key(KeyCode::Char('q')));
        assert!(!app.should_quit);
        assert!(app.message.is_some());

        handle_key_event(&mut app, key(KeyCode::Enter));
        assert!(app.message.is_none());

        handle_key_event(&mut app, key(KeyCode::Char('q')));
        assert!(app.should_quit);
    }

    #[test]
    fn test_escape_closes_open_dialog() {
        let mut app = App::new(&Config::new());
        app.show_open_dialog();
        assert!(app.open_dialog.is_some());

        handle_key_event(&mut app, key(KeyCode::Esc));
        assert!(app.open_dialog.is_none());
    }

    #[test]
    fn test_volume_keys() {
        let mut app = App::new(&Config::new());

        handle_key_event(&mut app, key(KeyCode::Char('+')));
        assert_eq!(app.volume_percent, 85);
        handle_key_event(&mut app, key(KeyCode::Char('-')));
        handle_key_event(&mut app, key(KeyCode::Char('-')));
        assert_eq!(app.volume_percent, 75);
    }

    #[test]
    fn test_missing_file_shows_error_dialog() {
        let mut app = App::new(&Config::new());

        app.load_track(Path::new("/nonexistent/x.wav"));

        let message = app.message.as_ref().unwrap();
        assert_eq!(message.kind, super::super::message::MessageKind::Error);
        assert!(message.text.starts_with("Failed to load audio file"));
        assert!(!app.is_playing);
        assert_eq!(app.status, "Ready");
    }

    #[test]
    fn test_failed_track_change_returns_to_idle() {
        let mut app = app_with(&["/music/good.wav", "/nonexistent/bad.wav"]);
        app.current_file = Some(PathBuf::from("/music/good.wav"));
        app.is_playing = true;
        app.duration = Some(Duration::from_secs(90));
        app.playback_position = 0.5;

        assert!(app.next_track());

        assert_eq!(app.playlist.current_index(), 1);
        assert!(app.current_file.is_none());
        assert!(!app.is_playing);
        assert!(app.duration.is_none());
        assert_eq!(app.playback_position, 0.0);
        assert!(app.message.is_some());
        if let Some(engine) = &app.audio_engine {
            assert!(!engine.is_playing());
        }
    }

    #[test]
    fn test_tick_without_engine_is_noop() {
        let mut app = app_with(&["a.wav"]);
        app.tick();
        assert!(!app.is_playing);
        assert_eq!(app.status, "Ready");
    }
}
