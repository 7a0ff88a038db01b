use deck_player::config::Config;
use owo_colors::OwoColorize;
use std::error::Error;
use std::process::Command;

pub fn handle_config_view() -> Result<(), Box<dyn Error>> {
    let config = Config::load()?;
    let source = if Config::exists()? {
        Config::config_path()?.display().to_string()
    } else {
        "defaults (no config file)".to_string()
    };

    println!("Current deck configuration ({}):", source.dimmed());
    println!("  default_volume: {}", config.default_volume);
    println!("  http_timeout_secs: {}", config.http_timeout_secs);
    println!("  seek_step_secs: {}", config.seek_step_secs);
    println!("  log_level: {}", config.log_level);
    println!("  log_file: {}", config.log_path().display());

    Ok(())
}

pub fn handle_config_set(key: &str, value: &str) -> Result<(), Box<dyn Error>> {
    let mut config = Config::load()?;

    config.set_value(key, value)?;
    config.save()?;

    println!("{} {key} = {value}", "Configuration updated:".green());

    Ok(())
}

pub fn handle_config_edit() -> Result<(), Box<dyn Error>> {
    // Give the editor something to open
    if !Config::exists()? {
        Config::new().save()?;
    }

    let config_path = Config::config_path()?;
    let editor = std::env::var("EDITOR").unwrap_or_else(|_| "vi".to_string());

    println!("Opening {} in {}", config_path.display(), editor);

    let status = Command::new(&editor)
        .arg(&config_path)
        .status()
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                format!("Editor '{editor}' not found. Set $EDITOR to a valid editor path.")
            } else {
                format!("Failed to launch editor '{editor}': {e}")
            }
        })?;

    if !status.success() {
        return Err(format!("Editor '{editor}' exited with error").into());
    }

    // Validate the config after editing
    match Config::load() {
        Ok(_) => println!("Configuration saved successfully"),
        Err(e) => {
            return Err(format!("Configuration validation failed: {e}").into());
        }
    }

    Ok(())
}
