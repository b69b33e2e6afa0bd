use mp3dedup::duplicates::{scan, DuplicateFinder, FinderConfig, UnreadablePolicy};
use mp3dedup::scanner::{Fingerprint, WalkerConfig};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn write(dir: &Path, name: &str, content: &[u8]) {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

#[test]
fn test_scan_empty_directory() {
    let dir = tempdir().unwrap();

    let report = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();

    assert!(report.duplicates.is_empty());
    assert_eq!(report.files_scanned, 0);
    assert_eq!(report.unique_fingerprints, 0);
}

#[test]
fn test_scan_reports_later_copy() {
    let dir = tempdir().unwrap();
    write(dir.path(), "a.mp3", b"X");
    write(dir.path(), "b.mp3", b"X");
    write(dir.path(), "c.mp3", b"Y");

    let duplicates = scan(dir.path()).unwrap();

    assert_eq!(duplicates, vec![dir.path().join("b.mp3")]);
}

#[test]
fn test_scan_unique_files() {
    let dir = tempdir().unwrap();
    write(dir.path(), "one.mp3", b"content one");
    write(dir.path(), "two.mp3", b"content two");
    write(dir.path(), "three.mp3", b"content three");

    let report = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();

    assert!(!report.has_duplicates());
    assert_eq!(report.files_scanned, 3);
    assert_eq!(report.unique_fingerprints, 3);
}

#[test]
fn test_scan_three_copies_keeps_first() {
    let dir = tempdir().unwrap();
    write(dir.path(), "a.mp3", b"same");
    write(dir.path(), "b.mp3", b"same");
    write(dir.path(), "c.mp3", b"same");

    let report = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();

    assert_eq!(report.duplicates.len(), 2);
    assert_eq!(report.unique_fingerprints, 1);
    for dup in &report.duplicates {
        assert_eq!(dup.original, dir.path().join("a.mp3"));
    }
}

#[test]
fn test_scan_nested_directories() {
    let dir = tempdir().unwrap();
    write(dir.path(), "a.mp3", b"track");
    write(dir.path(), "albums/live/track.mp3", b"track");
    write(dir.path(), "albums/other.mp3", b"different");

    let report = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();

    assert_eq!(report.files_scanned, 3);
    assert_eq!(
        report.duplicate_paths(),
        vec![dir.path().join("albums/live/track.mp3")]
    );
}

#[test]
fn test_scan_extension_filter() {
    let dir = tempdir().unwrap();
    write(dir.path(), "Song.MP3", b"Z");
    write(dir.path(), "song.mp3.txt", b"Z");
    write(dir.path(), "cover.jpg", b"Z");
    write(dir.path(), "notes", b"Z");

    let report = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();

    assert_eq!(report.files_scanned, 1);
    assert!(report.duplicates.is_empty());
}

#[test]
fn test_scan_mixed_case_extensions_match() {
    let dir = tempdir().unwrap();
    write(dir.path(), "a.mp3", b"Z");
    write(dir.path(), "b.Mp3", b"Z");

    let duplicates = scan(dir.path()).unwrap();

    assert_eq!(duplicates, vec![dir.path().join("b.Mp3")]);
}

#[test]
fn test_scan_directory_named_like_mp3_is_walked_not_hashed() {
    let dir = tempdir().unwrap();
    write(dir.path(), "album.mp3/a.mp3", b"inner");
    write(dir.path(), "b.mp3", b"inner");

    let report = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();

    assert_eq!(report.files_scanned, 2);
    assert_eq!(report.duplicates.len(), 1);
}

#[test]
fn test_scan_empty_files_are_duplicates() {
    let dir = tempdir().unwrap();
    write(dir.path(), "a.mp3", b"");
    write(dir.path(), "b.mp3", b"");

    let report = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();

    assert_eq!(report.duplicates.len(), 1);
    assert_eq!(
        report.duplicates[0].fingerprint,
        "d41d8cd98f00b204e9800998ecf8427e"
            .parse::<Fingerprint>()
            .unwrap()
    );
}

#[test]
fn test_scan_nonexistent_root_is_empty() {
    let dir = tempdir().unwrap();

    let duplicates = scan(&dir.path().join("missing")).unwrap();

    assert!(duplicates.is_empty());
}

#[test]
fn test_scan_is_repeatable() {
    let dir = tempdir().unwrap();
    write(dir.path(), "a.mp3", b"1");
    write(dir.path(), "b.mp3", b"1");
    write(dir.path(), "x/c.mp3", b"1");
    write(dir.path(), "x/d.mp3", b"2");

    let first = scan(dir.path()).unwrap();
    let second = scan(dir.path()).unwrap();

    assert_eq!(first, second);
    assert_eq!(first.len(), 2);
}

#[test]
fn test_scan_skip_hidden() {
    let dir = tempdir().unwrap();
    write(dir.path(), "a.mp3", b"dup");
    write(dir.path(), ".trash/a.mp3", b"dup");

    let config = FinderConfig::default().with_walker_config(WalkerConfig::new(false, true));
    let report = DuplicateFinder::new(config)
        .find_duplicates(dir.path())
        .unwrap();

    assert_eq!(report.files_scanned, 1);
    assert!(report.duplicates.is_empty());
}

#[test]
fn test_scan_bytes_hashed() {
    let dir = tempdir().unwrap();
    write(dir.path(), "a.mp3", &[7u8; 1000]);
    write(dir.path(), "b.mp3", &[8u8; 500]);

    let report = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();

    assert_eq!(report.bytes_hashed, 1500);
}

#[cfg(unix)]
#[test]
fn test_scan_skip_policy_records_unreadable() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir().unwrap();
    write(dir.path(), "a.mp3", b"dup");
    write(dir.path(), "b.mp3", b"dup");
    write(dir.path(), "locked.mp3", b"secret");
    let locked = dir.path().join("locked.mp3");
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

    if fs::File::open(&locked).is_ok() {
        // Running as root; permission bits are not enforced.
        return;
    }

    let abort = DuplicateFinder::with_defaults().find_duplicates(dir.path());
    assert!(abort.is_err());

    let config = FinderConfig::default().with_unreadable_policy(UnreadablePolicy::Skip);
    let report = DuplicateFinder::new(config)
        .find_duplicates(dir.path())
        .unwrap();

    assert_eq!(report.duplicates.len(), 1);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].path, locked);

    fs::set_permissions(&locked, fs::Permissions::from_mode(0o644)).unwrap();
}
