use deck_player::playlist::Playlist;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_directory_playlist_walkthrough() {
    let temp_dir = TempDir::new().unwrap();
    for name in ["02-b.ogg", "01-a.mp3", "notes.txt", "03-c.flac"] {
        fs::write(temp_dir.path().join(name), b"").unwrap();
    }
    fs::create_dir(temp_dir.path().join("nested.wav")).unwrap();

    let mut playlist = Playlist::new();
    assert_eq!(playlist.add_directory(temp_dir.path()).unwrap(), 3);
    assert_eq!(playlist.display_names(), vec!["01-a.mp3", "02-b.ogg", "03-c.flac"]);

    // Adding the same directory again adds nothing
    assert_eq!(playlist.add_directory(temp_dir.path()).unwrap(), 0);
    assert_eq!(playlist.len(), 3);

    assert!(playlist.previous().is_none());
    assert_eq!(playlist.current_index(), 0);

    assert!(playlist.next().unwrap().ends_with("02-b.ogg"));
    assert!(playlist.next().unwrap().ends_with("03-c.flac"));
    assert!(playlist.next().is_none());
    assert_eq!(playlist.current_index(), 2);

    assert!(playlist.select(0).unwrap().ends_with("01-a.mp3"));
    assert!(playlist.select(3).is_none());
    assert_eq!(playlist.current_index(), 0);
}

#[test]
fn test_missing_directory_is_an_error() {
    let temp_dir = TempDir::new().unwrap();
    let mut playlist = Playlist::new();
    assert!(playlist.add_directory(&temp_dir.path().join("gone")).is_err());
    assert!(playlist.is_empty());
}
