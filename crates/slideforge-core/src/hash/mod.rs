pub mod sha256;

pub use sha256::{content_key, sha256_hash_bytes};
