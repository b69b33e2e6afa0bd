use mp3dedup::actions::{
    move_file, relocate, relocate_batch, CollisionPolicy, RelocateConfig, RelocateError,
};
use mp3dedup::duplicates::scan;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

fn write(dir: &Path, name: &str, content: &[u8]) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_relocate_creates_destination() {
    let music = tempdir().unwrap();
    let review = tempdir().unwrap();
    let dup = write(music.path(), "b.mp3", b"X");
    let dest = review.path().join("dupes/2024");

    let result = relocate(&[dup.clone()], &dest).unwrap();

    assert!(result.destination_created);
    assert!(result.all_succeeded());
    assert!(!dup.exists());
    assert_eq!(fs::read(dest.join("b.mp3")).unwrap(), b"X");
}

#[test]
fn test_relocate_empty_list_creates_destination() {
    let review = tempdir().unwrap();
    let dest = review.path().join("dupes");

    let result = relocate(&[], &dest).unwrap();

    assert!(dest.is_dir());
    assert_eq!(result.success_count(), 0);
    assert_eq!(fs::read_dir(&dest).unwrap().count(), 0);
}

#[test]
fn test_relocate_existing_destination() {
    let music = tempdir().unwrap();
    let dest = tempdir().unwrap();
    let dup = write(music.path(), "x/song.mp3", b"data");

    let result = relocate(&[dup], dest.path()).unwrap();

    assert!(!result.destination_created);
    assert_eq!(result.bytes_moved, 4);
    assert!(dest.path().join("song.mp3").exists());
}

#[test]
fn test_relocate_destination_is_file() {
    let music = tempdir().unwrap();
    let dup = write(music.path(), "b.mp3", b"X");
    let not_a_dir = write(music.path(), "dest", b"file");

    let err = relocate(&[dup.clone()], &not_a_dir).unwrap_err();

    assert!(matches!(err, RelocateError::DestinationNotDirectory(_)));
    assert!(dup.exists());
}

#[test]
fn test_relocate_collision_error_keeps_both_files() {
    let music = tempdir().unwrap();
    let dest = tempdir().unwrap();
    let first = write(music.path(), "one/song.mp3", b"first");
    let second = write(music.path(), "two/song.mp3", b"second");

    let result = relocate(&[first.clone(), second.clone()], dest.path()).unwrap();

    assert_eq!(result.success_count(), 1);
    assert_eq!(result.failure_count(), 1);
    assert_eq!(result.failures[0].0, second);
    assert!(second.exists());
    assert_eq!(fs::read(dest.path().join("song.mp3")).unwrap(), b"first");
}

#[test]
fn test_relocate_collision_rename() {
    let music = tempdir().unwrap();
    let dest = tempdir().unwrap();
    write(dest.path(), "song.mp3", b"already here");
    let first = write(music.path(), "one/song.mp3", b"first");
    let second = write(music.path(), "two/song.mp3", b"second");

    let config = RelocateConfig::default().with_collision(CollisionPolicy::Rename);
    let result = relocate_batch(&[first, second], dest.path(), &config, None).unwrap();

    assert!(result.all_succeeded());
    assert_eq!(
        fs::read(dest.path().join("song.mp3")).unwrap(),
        b"already here"
    );
    assert_eq!(fs::read(dest.path().join("song (1).mp3")).unwrap(), b"first");
    assert_eq!(fs::read(dest.path().join("song (2).mp3")).unwrap(), b"second");
}

#[test]
fn test_relocate_missing_source_is_reported() {
    let music = tempdir().unwrap();
    let dest = tempdir().unwrap();
    let gone = music.path().join("gone.mp3");
    let present = write(music.path(), "present.mp3", b"p");

    let result = relocate(&[gone.clone(), present], dest.path()).unwrap();

    assert_eq!(result.success_count(), 1);
    assert_eq!(result.failures[0].0, gone);
    assert!(dest.path().join("present.mp3").exists());
}

#[test]
fn test_relocate_stop_on_error() {
    let music = tempdir().unwrap();
    let dest = tempdir().unwrap();
    let gone = music.path().join("gone.mp3");
    let present = write(music.path(), "present.mp3", b"p");

    let config = RelocateConfig::default().with_continue_on_error(false);
    let result = relocate_batch(&[gone, present.clone()], dest.path(), &config, None).unwrap();

    assert_eq!(result.failure_count(), 1);
    assert_eq!(result.success_count(), 0);
    assert!(present.exists());
}

#[test]
fn test_relocate_dry_run_touches_nothing() {
    let music = tempdir().unwrap();
    let review = tempdir().unwrap();
    let dup = write(music.path(), "b.mp3", b"X");
    let dest = review.path().join("dupes");

    let config = RelocateConfig::default().with_dry_run(true);
    let result = relocate_batch(&[dup.clone()], &dest, &config, None).unwrap();

    assert!(result.dry_run);
    assert_eq!(result.successes[0].destination, dest.join("b.mp3"));
    assert!(dup.exists());
    assert!(!dest.exists());
}

#[test]
fn test_scan_then_relocate_is_idempotent() {
    let music = tempdir().unwrap();
    let review = tempdir().unwrap();
    write(music.path(), "a.mp3", b"X");
    write(music.path(), "b.mp3", b"X");
    write(music.path(), "c.mp3", b"Y");
    let dest = review.path().join("dupes");

    let duplicates = scan(music.path()).unwrap();
    assert_eq!(duplicates, vec![music.path().join("b.mp3")]);

    let result = relocate(&duplicates, &dest).unwrap();
    assert!(result.all_succeeded());
    assert!(music.path().join("a.mp3").exists());
    assert!(music.path().join("c.mp3").exists());
    assert!(!music.path().join("b.mp3").exists());
    assert_eq!(fs::read(dest.join("b.mp3")).unwrap(), b"X");

    assert!(scan(music.path()).unwrap().is_empty());
}

#[test]
fn test_move_file_never_replaces_existing_target() {
    let music = tempdir().unwrap();
    let review = tempdir().unwrap();
    let source = write(music.path(), "song.mp3", b"new");
    let target = write(review.path(), "song.mp3", b"old");

    let err = move_file(&source, &target).unwrap_err();

    assert!(matches!(err, RelocateError::Collision { .. }));
    assert_eq!(fs::read(&target).unwrap(), b"old");
    assert_eq!(fs::read(&source).unwrap(), b"new");
}
