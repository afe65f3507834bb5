//! Opaque content-addressed blob store, consumed but not implemented here.
//! Key management, hashing, and the backing store all live outside this crate.

use crate::types::Digest;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("metadata client error: {0}")]
pub struct MetadataError(pub String);

pub trait MetadataClient: Send + Sync {
    fn put(&self, bytes: &[u8]) -> Result<Digest, MetadataError>;
    fn get(&self, digest: &Digest) -> Result<Vec<u8>, MetadataError>;
    fn pin(&self, digest: &Digest) -> Result<(), MetadataError>;
    fn unpin(&self, digest: &Digest) -> Result<(), MetadataError>;
    fn list_pinned(&self) -> Result<Vec<Digest>, MetadataError>;
}

/// No-op client for tests and for callers that don't validate metadata
/// digests against the blob store.
#[derive(Debug, Default)]
pub struct NullMetadataClient;

impl MetadataClient for NullMetadataClient {
    fn put(&self, _bytes: &[u8]) -> Result<Digest, MetadataError> {
        Err(MetadataError("NullMetadataClient has no backing store".into()))
    }

    fn get(&self, _digest: &Digest) -> Result<Vec<u8>, MetadataError> {
        Err(MetadataError("NullMetadataClient has no backing store".into()))
    }

    fn pin(&self, _digest: &Digest) -> Result<(), MetadataError> {
        Ok(())
    }

    fn unpin(&self, _digest: &Digest) -> Result<(), MetadataError> {
        Ok(())
    }

    fn list_pinned(&self) -> Result<Vec<Digest>, MetadataError> {
        Ok(Vec::new())
    }
}
