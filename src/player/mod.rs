pub mod app;
pub mod audio;
pub mod message;
pub mod open_dialog;
pub mod stream;
pub mod stream_ui;
pub mod ui;

use crossterm::{
    event::{DisableBracketedPaste, EnableBracketedPaste},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::error::Error;
use std::io::{self, Stdout};
use std::path::PathBuf;

use deck_player::config::Config;

type Tui = Terminal<CrosstermBackend<Stdout>>;

pub fn run_local(paths: &[PathBuf], config: &Config) -> Result<(), Box<dyn Error>> {
    app::run_with_files(paths, config)
}

pub fn run_stream(url: Option<&str>, config: &Config) -> Result<(), Box<dyn Error>> {
    stream::run_with_url(url, config)
}

// The terminal belongs to the UI, so the log goes to a file
fn init_logging(config: &Config) -> Result<(), Box<dyn Error>> {
    use simplelog::{CombinedLogger, WriteLogger};
    use std::fs::File;

    let log_file = config.log_path();
    CombinedLogger::init(vec![WriteLogger::new(
        config.log_level_filter()?,
        simplelog::Config::default(),
        File::create(&log_file)?,
    )])?;

    Ok(())
}

fn enter_terminal() -> Result<Tui, Box<dyn Error>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    Ok(Terminal::new(backend)?)
}

fn leave_terminal(terminal: &mut Tui) -> Result<(), Box<dyn Error>> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableBracketedPaste
    )?;
    terminal.show_cursor()?;
    Ok(())
}
