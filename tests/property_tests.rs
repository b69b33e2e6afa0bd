use mp3dedup::duplicates::DuplicateFinder;
use mp3dedup::scanner::{is_target_file, Fingerprint, Hasher};
use proptest::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

proptest! {
    #[test]
    fn test_hash_determinism(content in prop::collection::vec(any::<u8>(), 0..20_000)) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("track.mp3");
        fs::write(&path, &content).unwrap();

        let hasher = Hasher::new();
        let first = hasher.fingerprint(&path).unwrap();
        let second = hasher.fingerprint(&path).unwrap();

        prop_assert_eq!(first, second);
        prop_assert_eq!(first, hasher.fingerprint_reader(content.as_slice()).unwrap());
    }

    #[test]
    fn test_hex_round_trip_is_lowercase(bytes in any::<[u8; 16]>()) {
        let fp = Fingerprint::from_bytes(bytes);
        let hex = fp.to_string();

        prop_assert_eq!(hex.len(), 32);
        prop_assert!(hex.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
        prop_assert_eq!(Fingerprint::from_hex(&hex), Some(fp));
    }

    #[test]
    fn test_n_copies_yield_n_minus_one_duplicates(
        copies in 1usize..6,
        uniques in 0usize..4,
    ) {
        let dir = TempDir::new().unwrap();
        for i in 0..copies {
            fs::write(dir.path().join(format!("copy{i}.mp3")), b"shared content").unwrap();
        }
        for i in 0..uniques {
            fs::write(dir.path().join(format!("unique{i}.mp3")), format!("unique {i}")).unwrap();
        }

        let report = DuplicateFinder::with_defaults().find_duplicates(dir.path()).unwrap();

        prop_assert_eq!(report.duplicates.len(), copies - 1);
        prop_assert_eq!(report.unique_fingerprints, uniques + 1);
        prop_assert_eq!(report.files_scanned, copies + uniques);
        for dup in &report.duplicates {
            prop_assert_eq!(&dup.original, &dir.path().join("copy0.mp3"));
        }
    }

    #[test]
    fn test_extension_match_ignores_case(stem in "[a-z0-9 _-]{1,12}", upper in any::<[bool; 3]>()) {
        let ext: String = "mp3"
            .chars()
            .zip(upper)
            .map(|(c, up)| if up { c.to_ascii_uppercase() } else { c })
            .collect();
        let name = format!("{stem}.{ext}");

        prop_assert!(is_target_file(Path::new(&name)));
        let suffixed = format!("{name}.txt");
        prop_assert!(!is_target_file(Path::new(&suffixed)));
    }
}
