use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use mp3dedup::actions::CollisionPolicy;
use mp3dedup::config::{Config, ENV_PREFIX};
use mp3dedup::duplicates::UnreadablePolicy;
use std::fs;
use std::sync::Mutex;
use tempfile::tempdir;

static ENV_MUTEX: Mutex<()> = Mutex::new(());

#[test]
fn test_config_load_defaults() {
    // figment directly, without Env, so other tests cannot interfere
    let figment = Figment::from(Serialized::defaults(Config::default()));
    let config: Config = figment.extract().unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn test_config_load_from_env() {
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    std::env::set_var("MP3DEDUP_ON_COLLISION", "rename");
    std::env::set_var("MP3DEDUP_FOLLOW_SYMLINKS", "true");

    let figment =
        Figment::from(Serialized::defaults(Config::default())).merge(Env::prefixed(ENV_PREFIX));
    let config: Config = figment.extract().unwrap();

    std::env::remove_var("MP3DEDUP_ON_COLLISION");
    std::env::remove_var("MP3DEDUP_FOLLOW_SYMLINKS");

    assert_eq!(config.on_collision, CollisionPolicy::Rename);
    assert!(config.follow_symlinks);
}

#[test]
fn test_config_env_overrides_file() {
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(
        &path,
        "on_unreadable = \"skip\"\non_collision = \"rename\"\n",
    )
    .unwrap();

    std::env::set_var("MP3DEDUP_ON_COLLISION", "error");
    let config = Config::load_from_path(&path);
    std::env::remove_var("MP3DEDUP_ON_COLLISION");

    assert_eq!(config.on_unreadable, UnreadablePolicy::Skip);
    assert_eq!(config.on_collision, CollisionPolicy::Error);
}

#[test]
fn test_config_load_from_toml() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(
        &path,
        r#"
follow_symlinks = true
skip_hidden = true
continue_on_error = false
"#,
    )
    .unwrap();

    let figment = Figment::from(Serialized::defaults(Config::default())).merge(Toml::file(&path));
    let config: Config = figment.extract().unwrap();

    assert!(config.follow_symlinks);
    assert!(config.skip_hidden);
    assert!(!config.continue_on_error);
    assert_eq!(config.on_collision, CollisionPolicy::Error);
}

#[test]
fn test_config_broken_file_falls_back() {
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "this is = = not toml").unwrap();

    assert_eq!(Config::load_from_path(&path), Config::default());
}

#[test]
fn test_config_to_component_settings() {
    let config = Config {
        follow_symlinks: true,
        skip_hidden: true,
        on_collision: CollisionPolicy::Rename,
        continue_on_error: false,
        ..Config::default()
    };

    let walker = config.walker_config();
    assert!(walker.follow_symlinks);
    assert!(walker.skip_hidden);

    let relocate = config.relocate_config(false);
    assert_eq!(relocate.collision, CollisionPolicy::Rename);
    assert!(!relocate.continue_on_error);
    assert!(!relocate.dry_run);
}
