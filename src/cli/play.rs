use deck_player::config::Config;
use deck_player::utils::validation::resolve_user_path;
use std::error::Error;
use std::path::PathBuf;

pub fn handle_play(paths: &[String]) -> Result<(), Box<dyn Error>> {
    let config = Config::load()?;
    let paths = paths
        .iter()
        .map(|raw| resolve_user_path(raw))
        .collect::<Result<Vec<PathBuf>, _>>()?;

    #[cfg(feature = "player")]
    {
        crate::player::run_local(&paths, &config)
    }

    #[cfg(not(feature = "player"))]
    {
        let _ = (paths, config);
        super::print_player_feature_note();
        Ok(())
    }
}
