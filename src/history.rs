//! Append-only, hash-chained history log shared by every subsystem that
//! keeps a change/event/audit history: parameter registry changes,
//! reputation events, treasury audit entries. Generalizes the teacher's
//! `AuditEntry`/`prev_hash`/`hash` chain (`storage.rs`, `types.rs`) from a
//! wrapping integer hash to a `sha2` digest, and from one fixed payload
//! shape to any `ChainHashable` payload.

use crate::types::{Address, Digest, Timestamp};
use sha2::{Digest as _, Sha256};

/// Anything that can contribute its own fields to a chain entry's hash.
pub trait ChainHashable {
    fn hash_into(&self, hasher: &mut Sha256);
}

/// One entry in a hash-chained log. `hash` commits to `id`, `actor`,
/// `timestamp`, `prev_hash`, and the payload, in that order, so verifying
/// the chain only needs [`HistoryLog::verify`].
#[derive(Debug, Clone)]
pub struct HistoryEntry<T> {
    pub id: u64,
    pub actor: Address,
    pub timestamp: Timestamp,
    pub payload: T,
    pub prev_hash: Digest,
    pub hash: Digest,
}

#[derive(Debug, Clone)]
pub struct HistoryLog<T> {
    entries: Vec<HistoryEntry<T>>,
    next_id: u64,
    last_hash: Digest,
}

impl<T> Default for HistoryLog<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 0,
            last_hash: [0u8; 32],
        }
    }
}

impl<T: ChainHashable> HistoryLog<T> {
    pub fn append(&mut self, actor: Address, timestamp: Timestamp, payload: T) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        let prev_hash = self.last_hash;
        let hash = entry_hash(id, &actor, timestamp, prev_hash, &payload);
        self.last_hash = hash;
        self.entries.push(HistoryEntry {
            id,
            actor,
            timestamp,
            payload,
            prev_hash,
            hash,
        });
        id
    }

    pub fn entries(&self) -> &[HistoryEntry<T>] {
        &self.entries
    }

    pub fn last_hash(&self) -> Digest {
        self.last_hash
    }

    /// Recompute every entry's hash from its fields and confirm the chain
    /// is unbroken and untampered. `O(n)`; meant for periodic integrity
    /// checks, not the hot path.
    pub fn verify(&self) -> bool {
        let mut prev = [0u8; 32];
        for entry in &self.entries {
            if entry.prev_hash != prev {
                return false;
            }
            let recomputed = entry_hash(entry.id, &entry.actor, entry.timestamp, entry.prev_hash, &entry.payload);
            if recomputed != entry.hash {
                return false;
            }
            prev = entry.hash;
        }
        true
    }
}

fn entry_hash<T: ChainHashable>(id: u64, actor: &Address, timestamp: Timestamp, prev_hash: Digest, payload: &T) -> Digest {
    let mut hasher = Sha256::new();
    hasher.update(id.to_be_bytes());
    hasher.update(actor.as_str().as_bytes());
    hasher.update(timestamp.to_be_bytes());
    hasher.update(prev_hash);
    payload.hash_into(&mut hasher);
    let digest = hasher.finalize();
    let mut out = [0u8; 32];
    out.copy_from_slice(&digest);
    out
}

/// Hash a serde-serializable value by its JSON encoding. Good enough for
/// chain-integrity purposes (detecting tampering/reordering), not meant as
/// a canonical wire format.
pub fn hash_serializable(hasher: &mut Sha256, value: &impl serde::Serialize) {
    let bytes = serde_json::to_vec(value).unwrap_or_default();
    hasher.update(bytes);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone)]
    struct Note(String);

    impl ChainHashable for Note {
        fn hash_into(&self, hasher: &mut Sha256) {
            hash_serializable(hasher, &self.0);
        }
    }

    #[test]
    fn append_links_entries_by_prev_hash_and_verifies() {
        let mut log = HistoryLog::default();
        log.append(Address::new("a"), 0, Note("first".into()));
        log.append(Address::new("b"), 1, Note("second".into()));
        assert_eq!(log.entries().len(), 2);
        assert_eq!(log.entries()[1].prev_hash, log.entries()[0].hash);
        assert!(log.verify());
    }

    #[test]
    fn verify_detects_tampered_payload() {
        let mut log = HistoryLog::default();
        log.append(Address::new("a"), 0, Note("first".into()));
        log.entries_mut_for_test()[0].payload = Note("tampered".into());
        assert!(!log.verify());
    }

    #[test]
    fn verify_detects_reordered_entries() {
        let mut log = HistoryLog::default();
        log.append(Address::new("a"), 0, Note("first".into()));
        log.append(Address::new("b"), 1, Note("second".into()));
        log.entries_mut_for_test().swap(0, 1);
        assert!(!log.verify());
    }

    impl<T> HistoryLog<T> {
        fn entries_mut_for_test(&mut self) -> &mut Vec<HistoryEntry<T>> {
            &mut self.entries
        }
    }
}
