//! Stream player: fetch one URL into memory and play it.
//!
//! Pressing play validates the URL and hands it to a [`StreamSession`], which
//! runs a single background thread: blocking HTTP GET, decode, then blocking
//! playback until the buffer ends or the user stops it. The worker reports
//! back over an `mpsc` channel that the UI drains on every tick. Any failure
//! along the way becomes one `Failed` event carrying the error text.

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use log::info;
use ratatui::Terminal;
use std::error::Error;
use std::io::Read;
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
    mpsc::{self, Receiver, Sender, TryRecvError},
};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use deck_player::config::Config;
use deck_player::media::PcmBuffer;

use super::audio::AudioEngine;
use super::message::MessageDialog;
use super::stream_ui;

pub const INVALID_URL_MESSAGE: &str = "Enter a valid audio URL (http:// or https://)";

#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    /// Download and decode succeeded, audio is about to play
    Started,
    /// Playback ran to the end without being stopped
    Finished,
    Failed(String),
}

/// Trim the input and require an http(s) URL with something after the scheme.
pub fn validate_url(input: &str) -> Result<&str, Box<dyn Error>> {
    let url = input.trim();
    let lower = url.to_lowercase();
    let rest = lower
        .strip_prefix("http://")
        .or_else(|| lower.strip_prefix("https://"))
        .ok_or(INVALID_URL_MESSAGE)?;
    if rest.is_empty() || rest.starts_with('/') {
        return Err(INVALID_URL_MESSAGE.into());
    }
    Ok(url)
}

/// Blocking GET, whole body read into memory. Non-2xx responses are errors.
pub fn fetch_audio(url: &str, timeout: Duration) -> Result<Vec<u8>, Box<dyn Error>> {
    info!("Downloading {url}");

    let agent = ureq::AgentBuilder::new()
        .timeout(timeout)
        .user_agent(concat!("deck-player/", env!("CARGO_PKG_VERSION")))
        .build();
    let response = agent.get(url).call()?;

    let content_length = response
        .header("Content-Length")
        .and_then(|s| s.parse::<usize>().ok());
    let mut bytes = Vec::with_capacity(content_length.unwrap_or(0));
    response.into_reader().read_to_end(&mut bytes)?;

    info!("Downloaded {} bytes", bytes.len());
    Ok(bytes)
}

fn download_and_play(
    url: &str,
    timeout: Duration,
    stop: &AtomicBool,
    events: &Sender<StreamEvent>,
) -> Result<bool, Box<dyn Error>> {
    let bytes = fetch_audio(url, timeout)?;
    play_downloaded(bytes, url, stop, events)
}

fn play_downloaded(
    bytes: Vec<u8>,
    url: &str,
    stop: &AtomicBool,
    events: &Sender<StreamEvent>,
) -> Result<bool, Box<dyn Error>> {
    if stop.load(Ordering::Acquire) {
        return Ok(false);
    }

    let buffer = PcmBuffer::from_bytes(bytes)?;
    // Decoding a long file takes a while, check again before opening the device
    if stop.load(Ordering::Acquire) {
        return Ok(false);
    }

    let mut engine = AudioEngine::new()?;
    engine.load_buffer(buffer, url.to_string());

    let _ = events.send(StreamEvent::Started);
    engine.play();

    Ok(engine.wait_until_done(stop))
}

/// One background download-and-play run.
pub struct StreamSession {
    stop: Arc<AtomicBool>,
    events: Receiver<StreamEvent>,
    _worker: JoinHandle<()>,
}

impl StreamSession {
    pub fn start(url: String, timeout: Duration) -> Result<Self, Box<dyn Error>> {
        Self::spawn(move |stop, events| download_and_play(&url, timeout, stop, events))
    }

    /// Run `work` on the worker thread. `Ok(true)` reports `Finished`,
    /// `Ok(false)` reports nothing and an error reports `Failed`.
    pub fn spawn<F>(work: F) -> Result<Self, Box<dyn Error>>
    where
        F: FnOnce(&AtomicBool, &Sender<StreamEvent>) -> Result<bool, Box<dyn Error>>
            + Send
            + 'static,
    {
        let (tx, rx) = mpsc::channel();
        let stop = Arc::new(AtomicBool::new(false));
        let worker_stop = stop.clone();

        let worker = thread::Builder::new()
            .name("deck-stream".to_string())
            .spawn(move || {
                let outcome = match work(&worker_stop, &tx) {
                    Ok(true) => Some(StreamEvent::Finished),
                    Ok(false) => None,
                    Err(e) => {
                        log::error!("Stream playback failed: {e}");
                        Some(StreamEvent::Failed(e.to_string()))
                    }
                };
                if let Some(event) = outcome {
                    let _ = tx.send(event);
                }
            })?;

        Ok(Self {
            stop,
            events: rx,
            _worker: worker,
        })
    }

    pub fn stop(&self) {
        self.stop.store(true, Ordering::Release);
    }

    pub fn try_event(&self) -> Result<StreamEvent, TryRecvError> {
        self.events.try_recv()
    }
}

pub struct StreamApp {
    pub should_quit: bool,
    pub url_input: String,
    pub is_playing: bool,
    pub status: String,
    pub message: Option<MessageDialog>,
    session: Option<StreamSession>,
    timeout: Duration,
}

impl StreamApp {
    pub fn new(config: &Config) -> Self {
        Self {
            should_quit: false,
            url_input: String::new(),
            is_playing: false,
            status: "Ready to play".to_string(),
            message: None,
            session: None,
            timeout: config.http_timeout(),
        }
    }

    pub fn toggle_play(&mut self) {
        if self.is_playing {
            self.stop_playback();
        } else {
            self.start_playback();
        }
    }

    pub fn start_playback(&mut self) {
        let url = match validate_url(&self.url_input) {
            Ok(url) => url.to_string(),
            Err(e) => {
                self.message = Some(MessageDialog::warning("Warning", e.to_string()));
                return;
            }
        };

        match StreamSession::start(url, self.timeout) {
            Ok(session) => self.begin(session),
            Err(e) => self.fail(&e.to_string()),
        }
    }

    fn begin(&mut self, session: StreamSession) {
        self.session = Some(session);
        self.is_playing = true;
        self.status = "Downloading audio...".to_string();
    }

    pub fn stop_playback(&mut self) {
        if let Some(session) = self.session.take() {
            session.stop();
        }
        self.is_playing = false;
        self.status = "Playback stopped".to_string();
        info!("Playback stopped by user");
    }

    fn fail(&mut self, error: &str) {
        self.session = None;
        self.is_playing = false;
        self.status = "Ready".to_string();
        self.message = Some(MessageDialog::error(
            "Playback error",
            format!("An error occurred: {error}"),
        ));
    }

    /// Drain worker events into UI state.
    pub fn poll_events(&mut self) {
        loop {
            let Some(session) = &self.session else {
                return;
            };
            match session.try_event() {
                Ok(StreamEvent::Started) => self.status = "Playing".to_string(),
                Ok(StreamEvent::Finished) => {
                    self.session = None;
                    self.is_playing = false;
                    self.status = "Playback finished!".to_string();
                }
                Ok(StreamEvent::Failed(error)) => self.fail(&error),
                Err(TryRecvError::Empty) => return,
                Err(TryRecvError::Disconnected) => {
                    log::warn!("Stream worker exited without reporting");
                    self.session = None;
                    self.is_playing = false;
                    self.status = "Ready".to_string();
                    return;
                }
            }
        }
    }

    pub fn button_label(&self) -> &'static str {
        if self.is_playing { "Stop" } else { "Play" }
    }
}

pub fn run_with_url(url: Option<&str>, config: &Config) -> Result<(), Box<dyn Error>> {
    super::init_logging(config)?;
    info!("Starting deck stream player");

    let mut app = StreamApp::new(config);
    if let Some(url) = url {
        app.url_input = url.to_string();
    }

    let mut terminal = super::enter_terminal()?;
    let res = run_app(&mut terminal, &mut app);
    super::leave_terminal(&mut terminal)?;
    res
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut StreamApp,
) -> Result<(), Box<dyn Error>> {
    loop {
        app.poll_events();

        terminal.draw(|f| stream_ui::draw(f, app))?;

        if event::poll(Duration::from_millis(50))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => handle_key_event(app, key),
                Event::Paste(text) if app.message.is_none() => {
                    app.url_input.push_str(text.trim());
                }
                _ => {}
            }
        }

        if app.should_quit {
            if let Some(session) = app.session.take() {
                session.stop();
            }
            return Ok(());
        }
    }
}

fn handle_key_event(app: &mut StreamApp, key: event::KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('c') => app.should_quit = true,
            KeyCode::Char('u') => app.url_input.clear(),
            _ => {}
        }
        return;
    }

    if app.message.is_some() {
        if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
            app.message = None;
        }
        return;
    }

    match key.code {
        KeyCode::Esc => app.should_quit = true,
        KeyCode::Enter => app.toggle_play(),
        KeyCode::Backspace => {
            app.url_input.pop();
        }
        KeyCode::Char(c) => app.url_input.push(c),
        _ => {}
    }
}
