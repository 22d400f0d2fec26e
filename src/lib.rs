//! # stegochat
//!
//! Hides an AES-256-GCM-encrypted text message inside the pixel data of an
//! RGBA image via LSB steganography. The carrier stays visually unchanged;
//! the hidden stream is unreadable without the decryption material.
//!
//! Pipeline: plaintext → [`crypto::CipherEngine::encrypt`] →
//! [`payload::build`] → [`stego::embed`], and the reverse on extraction,
//! each stage validating before trusting the data.
//!
//! Two things this crate deliberately does not do: survive lossy
//! recompression (LSB data does not), and hide a message's *existence*
//! from statistical steganalysis. Note also that a message sent without a
//! passcode carries its own raw key in the envelope — see
//! [`crypto::CipherEnvelope`].
//!
//! ```rust
//! use stegochat::{hide_message, reveal_message};
//!
//! let mut pixels = vec![127u8; 100 * 100 * 4]; // RGBA8
//! hide_message(&mut pixels, "hello", None).unwrap();
//! assert_eq!(reveal_message(&pixels, None).unwrap(), "hello");
//! ```

pub mod carrier;
pub mod crypto;
pub mod error;
pub mod payload;
pub mod stego;

use base64::Engine;
use rand::{CryptoRng, RngCore};

pub use crypto::{CipherEngine, CipherEnvelope};
pub use error::{CarrierError, CodecError};
pub use payload::StegoEnvelope;
pub use stego::{capacity_bits, embed, extract};

/// Encrypt `plaintext` and embed the resulting envelope into `pixels`
/// (a raw RGBA8 buffer), using the thread-local CSPRNG.
pub fn hide_message(
    pixels: &mut [u8],
    plaintext: &str,
    passcode: Option<&str>,
) -> Result<(), CodecError> {
    hide_message_with(&mut CipherEngine::new(), pixels, plaintext, passcode)
}

/// [`hide_message`] with a caller-supplied engine, for deterministic tests.
pub fn hide_message_with<R: RngCore + CryptoRng>(
    engine: &mut CipherEngine<R>,
    pixels: &mut [u8],
    plaintext: &str,
    passcode: Option<&str>,
) -> Result<(), CodecError> {
    let (ciphertext, metadata) = engine.encrypt(plaintext, passcode)?;
    let ciphertext_b64 = base64::engine::general_purpose::STANDARD.encode(&ciphertext);
    let envelope = payload::build(ciphertext_b64, metadata.to_base64());
    stego::embed(pixels, &envelope)
}

/// Extract, validate, and decrypt the message hidden in `pixels`.
pub fn reveal_message(pixels: &[u8], passcode: Option<&str>) -> Result<String, CodecError> {
    let envelope = stego::extract(pixels)?;
    let (ciphertext_b64, metadata_b64) = envelope.validate()?;

    let ciphertext = base64::engine::general_purpose::STANDARD
        .decode(ciphertext_b64)
        .map_err(|_| CodecError::Authentication)?;
    let metadata = CipherEnvelope::from_base64(metadata_b64)?;

    CipherEngine::new().decrypt(&ciphertext, &metadata, passcode)
}
