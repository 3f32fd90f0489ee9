//! Snapshot decoding.
//!
//! Snapshots arrive as JSON documents. Structural decoding is the only
//! validation performed: missing or `null` fields take their zero values.

use hostdiff_core::Snapshot;

use crate::error::{DecodeError, Result};

/// Decode a single snapshot buffer.
pub fn decode_snapshot(bytes: &[u8]) -> serde_json::Result<Snapshot> {
    serde_json::from_slice(bytes)
}

/// Decode both inputs of a comparison independently.
///
/// A failure on one side never short-circuits decoding of the other, so the
/// error reports every malformed input.
pub fn decode_pair(a: &[u8], b: &[u8]) -> Result<(Snapshot, Snapshot)> {
    match (decode_snapshot(a), decode_snapshot(b)) {
        (Ok(a), Ok(b)) => Ok((a, b)),
        (Err(e), Ok(_)) => Err(DecodeError::A(e)),
        (Ok(_), Err(e)) => Err(DecodeError::B(e)),
        (Err(a), Err(b)) => Err(DecodeError::Both { a, b }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Side;

    #[test]
    fn test_decode_full_document() {
        let json = br#"{
            "address": "10.0.1.1",
            "capture_timestamp": "2025-10-16T12:00:00Z",
            "services": [
                {"port": 80, "protocol": "HTTP", "status": 200,
                 "software": {"vendor": "f5", "product": "nginx", "version": "1.24"},
                 "vulnerabilities": ["CVE-2023-44487"]}
            ]
        }"#;
        let snap = decode_snapshot(json).unwrap();
        assert_eq!(snap.address, "10.0.1.1");
        assert_eq!(snap.services.len(), 1);
        assert_eq!(snap.services[0].software.product, "nginx");
        assert!(snap.services[0].vulnerabilities.contains("CVE-2023-44487"));
    }

    #[test]
    fn test_missing_fields_are_not_errors() {
        let snap = decode_snapshot(br#"{"services": []}"#).unwrap();
        assert_eq!(snap.address, "");
        assert_eq!(snap.capture_timestamp, "");
        assert!(snap.services.is_empty());

        let snap = decode_snapshot(b"{}").unwrap();
        assert!(snap.services.is_empty());
    }

    #[test]
    fn test_out_of_range_port_accepted() {
        let snap = decode_snapshot(br#"{"services": [{"port": 65536, "protocol": "TCP"}]}"#)
            .unwrap();
        assert_eq!(snap.services[0].port, 65536);
    }

    #[test]
    fn test_malformed_side_reported() {
        let good = br#"{"address": "127.0.0.1", "services": []}"#;
        let bad = b"{invalid json}";

        let err = decode_pair(bad, good).unwrap_err();
        assert_eq!(err.sides(), vec![Side::A]);

        let err = decode_pair(good, bad).unwrap_err();
        assert_eq!(err.sides(), vec![Side::B]);

        let err = decode_pair(bad, bad).unwrap_err();
        assert_eq!(err.sides(), vec![Side::A, Side::B]);
        assert!(err.to_string().contains("both"));
    }

    #[test]
    fn test_wrong_field_type_is_decode_error() {
        assert!(decode_snapshot(br#"{"services": [{"port": "eighty"}]}"#).is_err());
        assert!(decode_snapshot(br#"{"services": {}}"#).is_err());
    }
}
