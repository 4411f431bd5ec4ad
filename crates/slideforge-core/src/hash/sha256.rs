use sha2::{Digest, Sha256};

pub fn sha256_hash_bytes(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Identity of a binary part: digest plus length, so two parts with equal
/// keys can share one package entry.
pub fn content_key(bytes: &[u8]) -> String {
    format!("{}:{}", sha256_hash_bytes(bytes), bytes.len())
}
