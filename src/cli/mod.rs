pub mod config;
pub mod play;
pub mod stream;

#[cfg(not(feature = "player"))]
fn print_player_feature_note() {
    use owo_colors::OwoColorize;
    println!("{} {}", "🎵".cyan(), "Audio Player".bold());
    println!();
    println!(
        "{} The audio players require the 'player' feature to be enabled.",
        "Note:".yellow()
    );
    println!();
    println!("To enable it, install with:");
    println!("  {}", "cargo install deck-player --features player".cyan());
    println!();
    println!("Or if building from source:");
    println!("  {}", "cargo build --release --features player".cyan());
}
