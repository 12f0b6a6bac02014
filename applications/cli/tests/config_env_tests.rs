/// Environment overrides live in their own test binary so they cannot leak
/// into other configuration tests.
use musiclib_cli::AppConfig;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_environment_overrides_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("musiclib.yaml");
    fs::write(&path, "music_dir: /from/file\nserver:\n  port: 8000\n").unwrap();

    std::env::set_var("MUSICLIB_MUSIC_DIR", dir.path());
    std::env::set_var("MUSICLIB_SERVER__PORT", "9100");
    std::env::set_var("MUSICLIB_PARALLEL", "true");

    let config = AppConfig::load(Some(&path)).unwrap();
    assert_eq!(config.music_dir, dir.path());
    assert_eq!(config.server.port, 9100);
    assert!(config.parallel);
}
