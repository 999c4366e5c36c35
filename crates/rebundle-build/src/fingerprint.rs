//! Input fingerprinting
//!
//! Reduces a set of file entries to one SHA-256 digest. Each entry
//! contributes `path \0 contents \0`, in byte-wise path order, so the result
//! does not depend on traversal order, locale, or platform separators.

use crate::discover::FileEntry;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Length of a rendered SHA-256 digest
pub const FINGERPRINT_LEN: usize = 64;

/// Lowercase hex SHA-256 digest of a file set
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Parse a stored digest, trimming surrounding whitespace
    ///
    /// Anything other than 64 lowercase hex characters is rejected.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        let well_formed = text.len() == FINGERPRINT_LEN
            && text
                .bytes()
                .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b));
        well_formed.then(|| Self(text.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First `len` characters, for log lines
    pub fn short(&self, len: usize) -> &str {
        &self.0[..len.min(self.0.len())]
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Compute the fingerprint of `entries`
///
/// Paths are hashed as their raw key bytes.
pub fn compute_fingerprint(entries: &[FileEntry]) -> Fingerprint {
    let mut ordered: Vec<&FileEntry> = entries.iter().collect();
    ordered.sort_by(|a, b| a.key().cmp(b.key()));

    let mut hasher = Sha256::new();
    for entry in &ordered {
        hasher.update(entry.key());
        hasher.update([0u8]);
        hasher.update(&entry.contents);
        hasher.update([0u8]);
    }

    Fingerprint(format!("{:x}", hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn entries(pairs: &[(&str, &str)]) -> Vec<FileEntry> {
        pairs
            .iter()
            .map(|(path, content)| FileEntry::new(*path, content.as_bytes()))
            .collect()
    }

    #[test]
    fn test_known_digest_of_empty_set() {
        // SHA-256 of no input
        assert_eq!(
            compute_fingerprint(&[]).as_str(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_known_digest_of_single_entry() {
        let mut hasher = Sha256::new();
        hasher.update(b"a.txt\0x\0");
        let expected = format!("{:x}", hasher.finalize());

        assert_eq!(
            compute_fingerprint(&entries(&[("a.txt", "x")])).as_str(),
            expected
        );
    }

    #[test]
    fn test_order_independent() {
        let forward = entries(&[("a.txt", "x"), ("b.txt", "y"), ("dir/c.txt", "z")]);
        let reversed = entries(&[("dir/c.txt", "z"), ("b.txt", "y"), ("a.txt", "x")]);
        assert_eq!(compute_fingerprint(&forward), compute_fingerprint(&reversed));
    }

    #[test]
    fn test_separator_independent() {
        let unix = entries(&[("dir/sub/a.txt", "x")]);
        let windows = entries(&[(r"dir\sub\a.txt", "x")]);
        assert_eq!(compute_fingerprint(&unix), compute_fingerprint(&windows));
    }

    #[test]
    fn test_content_change_detected() {
        let before = entries(&[("a.txt", "x"), ("b.txt", "y")]);
        let after = entries(&[("a.txt", "x"), ("b.txt", "z")]);
        assert_ne!(compute_fingerprint(&before), compute_fingerprint(&after));
    }

    #[test]
    fn test_rename_detected() {
        let before = entries(&[("a.txt", "x")]);
        let after = entries(&[("renamed.txt", "x")]);
        assert_ne!(compute_fingerprint(&before), compute_fingerprint(&after));
    }

    #[test]
    fn test_boundary_ambiguity_prevented() {
        // "ab" + "c" and "a" + "bc" concatenate identically without separators
        let left = entries(&[("ab", "c")]);
        let right = entries(&[("a", "bc")]);
        assert_ne!(compute_fingerprint(&left), compute_fingerprint(&right));
    }

    #[test]
    fn test_byte_order_not_locale_order() {
        // Uppercase sorts before lowercase byte-wise; a locale collation would not
        let mut hasher = Sha256::new();
        hasher.update(b"B.txt\x001\x00");
        hasher.update(b"a.txt\x002\x00");
        let expected = format!("{:x}", hasher.finalize());

        let computed = compute_fingerprint(&entries(&[("a.txt", "2"), ("B.txt", "1")]));
        assert_eq!(computed.as_str(), expected);
    }

    #[test]
    fn test_parse_trims_and_validates() {
        let digest = compute_fingerprint(&entries(&[("a.txt", "x")]));
        let stored = format!("  {}\n", digest);

        assert_eq!(Fingerprint::parse(&stored), Some(digest.clone()));
        assert_eq!(Fingerprint::parse(""), None);
        assert_eq!(Fingerprint::parse("not-a-digest"), None);
        assert_eq!(Fingerprint::parse(&digest.as_str().to_uppercase()), None);
        assert_eq!(Fingerprint::parse(&digest.as_str()[..63]), None);
    }

    #[test]
    fn test_short() {
        let digest = compute_fingerprint(&[]);
        assert_eq!(digest.short(8), "e3b0c442");
        assert_eq!(digest.short(100).len(), FINGERPRINT_LEN);
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let digest = compute_fingerprint(&[]);
        let json = serde_json::to_string(&digest).unwrap();
        assert_eq!(json, format!("\"{}\"", digest));
    }

    proptest! {
        #[test]
        fn prop_shuffled_input_same_fingerprint(
            files in proptest::collection::btree_map("[a-z]{1,6}(/[a-z]{1,6}){0,2}", proptest::collection::vec(any::<u8>(), 0..32), 0..12),
            seed in any::<u64>(),
        ) {
            let ordered: Vec<FileEntry> = files
                .iter()
                .map(|(path, content)| FileEntry::new(path.clone(), content.clone()))
                .collect();

            let mut shuffled = ordered.clone();
            let len = shuffled.len();
            if len > 1 {
                // Deterministic rotation driven by the seed
                shuffled.rotate_left((seed as usize) % len);
                shuffled.reverse();
            }

            prop_assert_eq!(compute_fingerprint(&ordered), compute_fingerprint(&shuffled));
        }

        #[test]
        fn prop_digest_is_well_formed(
            files in proptest::collection::vec(("[a-z./]{1,12}", proptest::collection::vec(any::<u8>(), 0..16)), 0..8),
        ) {
            let entries: Vec<FileEntry> = files
                .into_iter()
                .map(|(path, content)| FileEntry::new(path, content))
                .collect();

            let digest = compute_fingerprint(&entries);
            prop_assert!(Fingerprint::parse(digest.as_str()).is_some());
        }
    }
}
