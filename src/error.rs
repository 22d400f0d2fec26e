//! Error types for the steganographic codec.
//!
//! [`CodecError`] carries the failure kind as data rather than encoding it
//! in message text, so callers match on variants instead of substrings.

use core::fmt;

/// Errors raised by the codec: encryption, framing, embedding, extraction.
#[derive(Debug)]
pub enum CodecError {
    /// The serialized envelope exceeds the carrier buffer's LSB capacity.
    Capacity,
    /// The extracted length header is zero or exceeds the buffer capacity.
    DataLength,
    /// The buffer ended before the declared payload length was reached.
    DataIncomplete,
    /// The extracted bits are not valid UTF-8 JSON.
    Parse,
    /// The extracted envelope is missing required fields.
    Validation,
    /// Checksum mismatch over `ciphertext ‖ metadata`.
    Checksum,
    /// The message is passcode-protected and no passcode was supplied.
    PasscodeRequired,
    /// Decryption failed: wrong key, wrong passcode, or tampered ciphertext.
    Authentication,
    /// Uncategorized extraction failure.
    Extraction,
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Capacity => write!(f, "image too small to hide this message"),
            Self::DataLength => write!(f, "invalid or corrupted data length"),
            Self::DataIncomplete => write!(f, "could not extract complete message"),
            Self::Parse => write!(f, "could not parse hidden data"),
            Self::Validation => write!(f, "invalid payload structure"),
            Self::Checksum => write!(f, "data integrity check failed"),
            Self::PasscodeRequired => write!(f, "passcode required"),
            // Deliberately generic: wrong key, wrong passcode, and tampered
            // ciphertext must be indistinguishable to the caller.
            Self::Authentication => write!(f, "failed to decrypt message"),
            Self::Extraction => write!(f, "failed to extract message from image"),
        }
    }
}

impl std::error::Error for CodecError {}

/// Errors at the image boundary (decode/encode of the carrier file).
#[derive(Debug)]
pub enum CarrierError {
    /// The carrier file could not be read or written.
    Io(std::io::Error),
    /// The carrier could not be decoded or re-encoded as an image.
    Image(image::ImageError),
    /// A codec failure while operating on the decoded pixel buffer.
    Codec(CodecError),
}

impl fmt::Display for CarrierError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "carrier I/O error: {e}"),
            Self::Image(e) => write!(f, "carrier image error: {e}"),
            Self::Codec(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for CarrierError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Image(e) => Some(e),
            Self::Codec(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for CarrierError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<image::ImageError> for CarrierError {
    fn from(e: image::ImageError) -> Self {
        Self::Image(e)
    }
}

impl From<CodecError> for CarrierError {
    fn from(e: CodecError) -> Self {
        Self::Codec(e)
    }
}
