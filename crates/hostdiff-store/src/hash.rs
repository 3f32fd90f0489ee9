//! BLAKE3 hashing for tamper evidence and directory naming.

/// Compute the hex-encoded BLAKE3 hash of raw snapshot bytes.
pub fn content_hash(data: &[u8]) -> String {
    blake3::hash(data).to_hex().to_string()
}

/// Directory name for a host address.
///
/// Addresses are caller-supplied strings, so they are hashed rather than used
/// as path components directly.
pub fn address_dir(address: &str) -> String {
    let hash = blake3::hash(address.as_bytes()).to_hex();
    hash.as_str()[..16].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_hash_is_stable_and_sensitive() {
        let a = content_hash(br#"{"services": []}"#);
        let b = content_hash(br#"{"services": []}"#);
        let c = content_hash(br#"{"services": [ ]}"#);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn address_dir_is_path_safe() {
        let dir = address_dir("../../etc/passwd");
        assert_eq!(dir.len(), 16);
        assert!(dir.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(address_dir("10.0.0.1"), address_dir("10.0.0.2"));
    }
}
