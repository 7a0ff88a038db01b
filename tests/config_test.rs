use deck_player::config::Config;
use tempfile::TempDir;

#[test]
fn test_config_lifecycle() {
    let temp_dir = TempDir::new().unwrap();

    // Point the config directory at the temp dir
    unsafe {
        std::env::set_var("XDG_CONFIG_HOME", temp_dir.path());
    }

    assert!(!Config::exists().unwrap());

    // Missing file falls back to defaults
    let defaults = Config::load().unwrap();
    assert_eq!(defaults.default_volume, 80);

    Config::new().save().unwrap();
    assert!(Config::exists().unwrap());
    assert!(
        Config::config_path()
            .unwrap()
            .starts_with(temp_dir.path().join("deck"))
    );

    let mut config = Config::load().unwrap();
    config.set_value("default_volume", "35").unwrap();
    config.set_value("log_level", "debug").unwrap();
    config.save().unwrap();

    let reloaded = Config::load().unwrap();
    assert_eq!(reloaded.default_volume, 35);
    assert_eq!(reloaded.log_level, "debug");

    let mut config = Config::load().unwrap();
    assert!(config.set_value("invalid_key", "value").is_err());

    // Hand-edited files are validated on load
    std::fs::write(Config::config_path().unwrap(), "default_volume = 250\n").unwrap();
    assert!(Config::load().is_err());
}
