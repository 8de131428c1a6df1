//! Deterministic cache-key generation.

use sha2::{Digest, Sha256};

/// Builds the cache key for a logical request as
/// `<namespace>-<sha256 prefix>` over the namespace and its parameters.
///
/// Parameters are sorted before hashing so identical logical requests
/// collide to the same key regardless of argument order. The namespace is
/// kept as a readable prefix and also hashed, preventing collisions across
/// resource types ("search" vs "profile") that share parameter values.
pub fn cache_key(namespace: &str, params: &[&str]) -> String {
    let mut sorted: Vec<&str> = params.to_vec();
    sorted.sort_unstable();

    let mut hasher = Sha256::new();
    hasher.update(namespace.as_bytes());
    for param in &sorted {
        hasher.update([0u8]); // separator so ("ab","c") != ("a","bc")
        hasher.update(param.as_bytes());
    }
    let digest = hasher.finalize();

    format!("{namespace}-{}", &hex::encode(digest)[..32])
}
