//! fanboard-blob — blob storage for uploaded images
//!
//! Accepts a binary upload under a collision-resistant key and returns a
//! durable retrieval URL. Keys are random, not derived from the upload
//! time: a timestamp-prefixed filename collides when two uploads of the
//! same name land in the same millisecond.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use thiserror::Error;

/// Uploads larger than this are rejected outright.
pub const MAX_BLOB_BYTES: usize = 5 * 1024 * 1024;

const KEY_LEN: usize = 16;
const MAX_EXT_LEN: usize = 8;

#[derive(Debug, Error)]
pub enum BlobError {
    #[error("empty upload")]
    Empty,

    #[error("upload exceeds {MAX_BLOB_BYTES} byte limit")]
    TooLarge,

    #[error("invalid blob key")]
    InvalidKey,

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

/// A stored blob: the store key and the public retrieval URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredBlob {
    pub key: String,
    pub url: String,
}

/// Upload and retrieval of opaque binary blobs.
pub trait BlobStore: Send + Sync {
    /// Store `bytes` under a fresh collision-resistant key. The original
    /// filename contributes only its extension.
    fn put(&self, filename: &str, bytes: &[u8]) -> Result<StoredBlob, BlobError>;

    /// Fetch a blob by key. `Ok(None)` if no such key was ever stored.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, BlobError>;
}

/// Generate a fresh blob key: 16 random alphanumeric chars plus the
/// sanitized extension of the original filename.
fn generate_key(filename: &str) -> String {
    const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    use rand::Rng;
    let mut rng = rand::thread_rng();
    let stem: String = (0..KEY_LEN)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect();
    match sanitized_extension(filename) {
        Some(ext) => format!("{}.{}", stem, ext),
        None => stem,
    }
}

/// Lowercased alphanumeric extension of a filename, if it has a usable one.
fn sanitized_extension(filename: &str) -> Option<String> {
    let ext = filename.rsplit('.').next()?;
    if ext.is_empty() || ext.len() > MAX_EXT_LEN || ext == filename {
        return None;
    }
    if !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

/// A key is servable only if it looks like something `generate_key`
/// produced. Rejects anything that could escape the blob root.
fn valid_key(key: &str) -> bool {
    !key.is_empty()
        && key.len() <= KEY_LEN + 1 + MAX_EXT_LEN
        && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '.')
        && !key.starts_with('.')
        && !key.contains("..")
}

fn check_upload(bytes: &[u8]) -> Result<(), BlobError> {
    if bytes.is_empty() {
        return Err(BlobError::Empty);
    }
    if bytes.len() > MAX_BLOB_BYTES {
        return Err(BlobError::TooLarge);
    }
    Ok(())
}

fn blob_url(key: &str) -> String {
    format!("/media/{}", key)
}

// ── Disk backend ────────────────────────────────────────────────────

/// Blobs as flat files under a root directory.
pub struct DiskBlobStore {
    root: PathBuf,
}

impl DiskBlobStore {
    /// Open (and create if needed) a blob root directory.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, BlobError> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        Ok(DiskBlobStore { root })
    }
}

impl BlobStore for DiskBlobStore {
    fn put(&self, filename: &str, bytes: &[u8]) -> Result<StoredBlob, BlobError> {
        check_upload(bytes)?;
        let key = generate_key(filename);
        std::fs::write(self.root.join(&key), bytes)?;
        Ok(StoredBlob {
            url: blob_url(&key),
            key,
        })
    }

    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, BlobError> {
        if !valid_key(key) {
            return Err(BlobError::InvalidKey);
        }
        match std::fs::read(self.root.join(key)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

// ── In-memory backend (tests) ───────────────────────────────────────

/// Blobs in a map. Used by tests and anywhere durability is irrelevant.
#[derive(Default)]
pub struct MemBlobStore {
    blobs: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemBlobStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BlobStore for MemBlobStore {
    fn put(&self, filename: &str, bytes: &[u8]) -> Result<StoredBlob, BlobError> {
        check_upload(bytes)?;
        let key = generate_key(filename);
        self.blobs
            .lock()
            .unwrap()
            .insert(key.clone(), bytes.to_vec());
        Ok(StoredBlob {
            url: blob_url(&key),
            key,
        })
    }

    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, BlobError> {
        if !valid_key(key) {
            return Err(BlobError::InvalidKey);
        }
        Ok(self.blobs.lock().unwrap().get(key).cloned())
    }
}
