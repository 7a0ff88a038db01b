//! deck - terminal audio players.
//!
//! Two players share one audio engine:
//!
//! 1. **Local player** (`deck play`): a playlist of files with play/pause,
//!    stop, previous/next, seeking and volume. Each track is decoded into
//!    memory and fed to the output device from that buffer; when a track
//!    ends the next one starts.
//!
//! 2. **Stream player** (`deck stream`): type or paste a URL, the audio is
//!    downloaded in the background, decoded and played once.
//!
//! Both run as full-screen terminal UIs and log to a file so the screen stays
//! clean. Failures are shown in a dialog and the player returns to idle.

use clap::{CommandFactory, Parser, Subcommand, builder::PossibleValuesParser};
use clap_complete::{Generator, Shell, generate};
use owo_colors::OwoColorize;
use std::error::Error;
use std::io;
use std::process::ExitCode;

mod cli;

#[cfg(feature = "player")]
mod player;

#[derive(Parser)]
#[command(name = "deck")]
#[command(about = "Terminal audio players for local files and URLs")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play local files from a playlist
    Play {
        /// Files or directories to put on the playlist
        files: Vec<String>,
    },
    /// Download a URL and play it
    Stream {
        /// Audio URL to pre-fill
        url: Option<String>,
    },
    /// Show or change configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Generate shell completions
    Completions {
        /// The shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// View current configuration
    View,
    /// Set a configuration value
    Set {
        /// Configuration key
        #[arg(value_parser = PossibleValuesParser::new([
            "default_volume",
            "http_timeout_secs",
            "seek_step_secs",
            "log_level",
            "log_file",
        ]))]
        key: String,
        /// Configuration value
        value: String,
    },
    /// Edit configuration file in your editor
    Edit,
}

fn print_completions<G: Generator>(generator: G, cmd: &mut clap::Command) {
    generate(
        generator,
        cmd,
        cmd.get_name().to_string(),
        &mut io::stdout(),
    );
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    match cli.command {
        Commands::Play { files } => {
            cli::play::handle_play(&files)?;
        }
        Commands::Stream { url } => {
            cli::stream::handle_stream(url.as_deref())?;
        }
        Commands::Config { action } => match action {
            ConfigAction::View => {
                cli::config::handle_config_view()?;
            }
            ConfigAction::Set { key, value } => {
                cli::config::handle_config_set(&key, &value)?;
            }
            ConfigAction::Edit => {
                cli::config::handle_config_edit()?;
            }
        },
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            print_completions(shell, &mut cmd);
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {e}", "error:".red().bold());
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_play_with_files() {
        let cli = Cli::try_parse_from(["deck", "play", "a.mp3", "music/"]).unwrap();
        match cli.command {
            Commands::Play { files } => assert_eq!(files, vec!["a.mp3", "music/"]),
            _ => panic!("expected play"),
        }
    }

    #[test]
    fn test_parse_stream_without_url() {
        let cli = Cli::try_parse_from(["deck", "stream"]).unwrap();
        assert!(matches!(cli.command, Commands::Stream { url: None }));
    }

    #[test]
    fn test_config_set_rejects_unknown_key() {
        assert!(Cli::try_parse_from(["deck", "config", "set", "root_dir", "x"]).is_err());
    }
}
