//! Stego envelope framing: version + ciphertext + metadata + checksum.
//!
//! The envelope is the structure actually hidden in the image. Ciphertext
//! and cipher metadata travel as base64 text; a short rolling-hash checksum
//! over their concatenation detects accidental corruption of the LSB
//! bitstream. It is not a security boundary — tampering is caught by the
//! GCM authentication tag during decryption.

use serde::{Deserialize, Serialize};

use crate::error::CodecError;

/// Current envelope format version. Carried on the wire, not yet consulted.
pub const ENVELOPE_VERSION: u32 = 1;

/// The self-describing payload embedded into the carrier image.
///
/// Serialized as JSON with this exact field order, matching the original
/// chat application's wire format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StegoEnvelope {
    pub version: u32,
    pub ciphertext: String,
    pub metadata: String,
    pub checksum: String,
}

impl StegoEnvelope {
    /// Canonical byte form handed to the bit embedder.
    pub fn to_bytes(&self) -> Vec<u8> {
        serde_json::to_vec(self).expect("StegoEnvelope serialization")
    }

    /// Parse envelope bytes extracted from a carrier.
    ///
    /// A document that is not valid JSON is [`CodecError::Parse`]; valid
    /// JSON missing any of the four fields (or with empty text fields) is
    /// [`CodecError::Validation`]; present fields of the wrong type fall
    /// through to [`CodecError::Extraction`].
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CodecError> {
        let value: serde_json::Value =
            serde_json::from_slice(bytes).map_err(|_| CodecError::Parse)?;

        for field in ["version", "ciphertext", "metadata", "checksum"] {
            if value.get(field).is_none() {
                return Err(CodecError::Validation);
            }
        }
        let text_fields_empty = ["ciphertext", "metadata", "checksum"]
            .iter()
            .any(|f| value.get(f).and_then(|v| v.as_str()) == Some(""));
        if text_fields_empty {
            return Err(CodecError::Validation);
        }

        serde_json::from_value(value).map_err(|_| CodecError::Extraction)
    }

    /// Verify the checksum and hand back the two payload fields.
    pub fn validate(&self) -> Result<(&str, &str), CodecError> {
        if self.ciphertext.is_empty() || self.metadata.is_empty() || self.checksum.is_empty() {
            return Err(CodecError::Validation);
        }
        if envelope_checksum(&self.ciphertext, &self.metadata) != self.checksum {
            return Err(CodecError::Checksum);
        }
        Ok((&self.ciphertext, &self.metadata))
    }
}

/// Build an envelope for the given base64 ciphertext and metadata.
pub fn build(ciphertext: String, metadata: String) -> StegoEnvelope {
    let checksum = envelope_checksum(&ciphertext, &metadata);
    StegoEnvelope {
        version: ENVELOPE_VERSION,
        ciphertext,
        metadata,
        checksum,
    }
}

/// Rolling polynomial checksum (`h = h*31 + byte`) in wrapping 32-bit
/// signed arithmetic, absolute value, lowercase base-36.
pub fn checksum(data: &str) -> String {
    envelope_checksum(data, "")
}

/// Checksum over `ciphertext ‖ metadata` without materializing the
/// concatenation.
fn envelope_checksum(ciphertext: &str, metadata: &str) -> String {
    let mut hash: i32 = 0;
    for &byte in ciphertext.as_bytes().iter().chain(metadata.as_bytes()) {
        hash = hash.wrapping_shl(5).wrapping_sub(hash).wrapping_add(byte as i32);
    }
    // Widen before abs: JS Math.abs(-2^31) is 2^31, not an overflow.
    to_base36((hash as i64).unsigned_abs())
}

fn to_base36(mut n: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if n == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while n > 0 {
        digits.push(DIGITS[(n % 36) as usize] as char);
        n /= 36;
    }
    digits.iter().rev().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checksum_known_values() {
        // Parity with the original JS implementation.
        assert_eq!(checksum(""), "0");
        assert_eq!(checksum("a"), "2p");
        assert_eq!(checksum("hello"), "1n1e4y");
    }

    #[test]
    fn checksum_matches_concatenation() {
        assert_eq!(envelope_checksum("abc", "def"), checksum("abcdef"));
    }

    #[test]
    fn build_validate_roundtrip() {
        let envelope = build("Y2lwaGVy".to_string(), "bWV0YQ==".to_string());
        assert_eq!(envelope.version, ENVELOPE_VERSION);
        let (ct, md) = envelope.validate().unwrap();
        assert_eq!(ct, "Y2lwaGVy");
        assert_eq!(md, "bWV0YQ==");
    }

    #[test]
    fn altered_field_fails_checksum() {
        let mut envelope = build("Y2lwaGVy".to_string(), "bWV0YQ==".to_string());
        envelope.ciphertext.push('A');
        assert!(matches!(envelope.validate(), Err(CodecError::Checksum)));
    }

    #[test]
    fn bytes_roundtrip() {
        let envelope = build("Y2lwaGVy".to_string(), "bWV0YQ==".to_string());
        let restored = StegoEnvelope::from_bytes(&envelope.to_bytes()).unwrap();
        assert_eq!(restored, envelope);
    }

    #[test]
    fn invalid_json_is_parse_error() {
        assert!(matches!(
            StegoEnvelope::from_bytes(b"{\"version\": 1,"),
            Err(CodecError::Parse)
        ));
    }

    #[test]
    fn missing_field_is_validation_error() {
        let json = br#"{"version":1,"ciphertext":"abc","checksum":"xyz"}"#;
        assert!(matches!(
            StegoEnvelope::from_bytes(json),
            Err(CodecError::Validation)
        ));
    }

    #[test]
    fn empty_field_is_validation_error() {
        let json = br#"{"version":1,"ciphertext":"","metadata":"m","checksum":"c"}"#;
        assert!(matches!(
            StegoEnvelope::from_bytes(json),
            Err(CodecError::Validation)
        ));
    }

    #[test]
    fn non_object_json_is_validation_error() {
        assert!(matches!(
            StegoEnvelope::from_bytes(b"42"),
            Err(CodecError::Validation)
        ));
    }

    #[test]
    fn wrong_typed_field_is_extraction_error() {
        let json = br#"{"version":"one","ciphertext":"a","metadata":"m","checksum":"c"}"#;
        assert!(matches!(
            StegoEnvelope::from_bytes(json),
            Err(CodecError::Extraction)
        ));
    }
}
