use deck_player::config::Config;
use std::error::Error;

pub fn handle_stream(url: Option<&str>) -> Result<(), Box<dyn Error>> {
    let config = Config::load()?;

    #[cfg(feature = "player")]
    {
        crate::player::run_stream(url, &config)
    }

    #[cfg(not(feature = "player"))]
    {
        let _ = (url, config);
        super::print_player_feature_note();
        Ok(())
    }
}
