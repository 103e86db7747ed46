use sha2::{Digest, Sha256};

/// Hex-encoded SHA-256 over the given parts.
///
/// Each part is length-prefixed so `["ab", "c"]` and `["a", "bc"]` differ.
pub fn content_digest(parts: &[&[u8]]) -> String {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update((part.len() as u64).to_le_bytes());
        hasher.update(part);
    }
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_is_stable_and_boundary_sensitive() {
        let a = content_digest(&[b"ab", b"c"]);
        let b = content_digest(&[b"a", b"bc"]);
        assert_ne!(a, b);
        assert_eq!(a, content_digest(&[b"ab", b"c"]));
        assert_eq!(a.len(), 64);
    }
}
