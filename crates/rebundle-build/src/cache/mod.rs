//! Fingerprint record storage
//!
//! The gate only needs to read the last recorded fingerprint and overwrite
//! it after a successful build. `RecordFile` keeps it on disk; `MemoryStore`
//! keeps it in memory for tests and embedding.

mod record;

pub use record::RecordFile;

use crate::error::BuildResult;
use crate::fingerprint::Fingerprint;

/// Persistence for the last successful build's fingerprint
pub trait DigestStore {
    /// Last recorded fingerprint
    ///
    /// A missing, unreadable, or malformed record is `None`, never an error.
    fn load(&self) -> Option<Fingerprint>;

    /// Overwrite the record
    fn store(&mut self, fingerprint: &Fingerprint) -> BuildResult<()>;

    /// Remove the record; removing an absent record succeeds
    fn clear(&mut self) -> BuildResult<()>;
}

impl<S: DigestStore + ?Sized> DigestStore for &mut S {
    fn load(&self) -> Option<Fingerprint> {
        (**self).load()
    }

    fn store(&mut self, fingerprint: &Fingerprint) -> BuildResult<()> {
        (**self).store(fingerprint)
    }

    fn clear(&mut self) -> BuildResult<()> {
        (**self).clear()
    }
}

/// In-memory record
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    value: Option<Fingerprint>,
    writes: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with an existing record
    pub fn with_record(fingerprint: Fingerprint) -> Self {
        Self {
            value: Some(fingerprint),
            writes: 0,
        }
    }

    /// Current record
    pub fn get(&self) -> Option<&Fingerprint> {
        self.value.as_ref()
    }

    /// Number of `store` calls so far
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl DigestStore for MemoryStore {
    fn load(&self) -> Option<Fingerprint> {
        self.value.clone()
    }

    fn store(&mut self, fingerprint: &Fingerprint) -> BuildResult<()> {
        self.value = Some(fingerprint.clone());
        self.writes += 1;
        Ok(())
    }

    fn clear(&mut self) -> BuildResult<()> {
        self.value = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fingerprint::compute_fingerprint;

    #[test]
    fn test_memory_store_roundtrip() {
        let mut store = MemoryStore::new();
        assert!(store.load().is_none());

        let digest = compute_fingerprint(&[]);
        store.store(&digest).unwrap();

        assert_eq!(store.load(), Some(digest));
        assert_eq!(store.writes(), 1);
    }

    #[test]
    fn test_memory_store_clear() {
        let mut store = MemoryStore::with_record(compute_fingerprint(&[]));
        store.clear().unwrap();
        assert!(store.get().is_none());
        // Clearing twice is fine
        store.clear().unwrap();
    }

    #[test]
    fn test_store_through_mutable_reference() {
        let mut store = MemoryStore::new();
        {
            let mut borrowed = &mut store;
            DigestStore::store(&mut borrowed, &compute_fingerprint(&[])).unwrap();
        }
        assert_eq!(store.writes(), 1);
    }
}
