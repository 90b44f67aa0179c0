use drivehash::engine::{DigestComputer, privilege_gate};
use drivehash::pipeline::escape_path;
use drivehash::utils::PackagePaths;
use drivehash::{Algorithm, digest_bytes};
use std::io::Write;
use std::path::{Path, PathBuf};

// --- privilege_gate ---

#[test]
fn test_privilege_gate_elevated() {
    assert!(privilege_gate(true, false));
    assert!(privilege_gate(true, true));
}

#[test]
fn test_privilege_gate_bypass() {
    assert!(privilege_gate(false, true));
}

#[test]
fn test_privilege_gate_refuses() {
    assert!(!privilege_gate(false, false));
}

// --- sink names ---

#[test]
fn test_sink_paths() {
    let dir = PathBuf::from("out");
    let paths = PackagePaths::get();
    assert_eq!(
        paths.sink_path(&dir, Algorithm::Md5),
        PathBuf::from("out/whitelist.md5")
    );
    assert_eq!(
        paths.sink_path(&dir, Algorithm::Sha1),
        PathBuf::from("out/whitelist.sha1")
    );
    assert_eq!(
        paths.sink_path(&dir, Algorithm::Sha256),
        PathBuf::from("out/whitelist.sha256")
    );
    assert_eq!(
        paths.manifest_path(&dir),
        PathBuf::from("out/whitelist.manifest")
    );
}

// --- digests ---

#[test]
fn test_reused_computer_matches_fresh_one() {
    let mut reused = DigestComputer::new();
    reused.write_all(b"f1: some earlier file").unwrap();
    let f1 = reused.digests();
    reused.reset();
    reused.write_all(b"f2").unwrap();

    let mut fresh = DigestComputer::new();
    fresh.write_all(b"f2").unwrap();

    assert_eq!(reused.digests(), fresh.digests());
    assert_ne!(f1, fresh.digests());
}

#[test]
fn test_hex_is_lowercase_and_full_length() {
    let set = digest_bytes(b"\xff\xfe\x00");
    for alg in Algorithm::ALL {
        let h = set.hex(alg);
        assert_eq!(h.len(), alg.output_len() * 2);
        assert!(h.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    }
}

// --- manifest escaping ---

#[test]
fn test_escape_backslash() {
    assert_eq!(escape_path(Path::new("a\\b")), "a\\\\b");
}
