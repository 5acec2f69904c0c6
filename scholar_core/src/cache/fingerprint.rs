//! Config fingerprint computation
//!
//! The fingerprint is a short stable identity for "current pipeline
//! behavior": a single SHA-256 accumulator over the raw bytes of the
//! agent document then the task document. A missing document contributes
//! a fixed sentinel so that an environment without a document never
//! collides with one holding an empty document. The fingerprint is
//! recomputed on every cache operation, since documents may change
//! between calls on a live deployment.

use crate::cache::CacheConfig;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;

/// Hex length the digest is truncated to
pub const FINGERPRINT_LEN: usize = 16;

const AGENTS_MISSING_SENTINEL: &[u8] = b"agents.yaml_not_found";
const TASKS_MISSING_SENTINEL: &[u8] = b"tasks.yaml_not_found";

/// Compute the fingerprint of the behavior documents named by `config`.
///
/// Pure function of on-disk state at call time; never fails.
pub fn compute_fingerprint(config: &CacheConfig) -> String {
    let mut hasher = Sha256::new();

    accumulate_doc(&mut hasher, &config.agents_doc, AGENTS_MISSING_SENTINEL);
    accumulate_doc(&mut hasher, &config.tasks_doc, TASKS_MISSING_SENTINEL);

    let digest = format!("{:x}", hasher.finalize());
    digest[..FINGERPRINT_LEN].to_string()
}

fn accumulate_doc(hasher: &mut Sha256, path: &Path, missing_sentinel: &[u8]) {
    match fs::read(path) {
        Ok(bytes) => hasher.update(&bytes),
        Err(_) => hasher.update(missing_sentinel),
    }
}
