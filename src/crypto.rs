//! AES-256-GCM message encryption with optional passcode-derived keys.
//!
//! Every encryption uses a fresh random 12-byte IV. With a passcode the key
//! is derived via PBKDF2-HMAC-SHA256 (fresh 16-byte salt, 100,000 rounds)
//! and never leaves this module. Without a passcode a fresh random key is
//! generated and its raw bytes travel inside the [`CipherEnvelope`] — the
//! message is then obfuscated in transit but readable by anyone holding the
//! envelope. That trade-off is part of the wire format and is kept as-is.

use aead::generic_array::GenericArray;
use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::Aes256Gcm;
use base64::Engine;
use pbkdf2::pbkdf2_hmac;
use rand::rngs::ThreadRng;
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use crate::error::CodecError;

/// AES-GCM IV length in bytes.
pub const IV_LEN: usize = 12;
/// PBKDF2 salt length in bytes.
pub const SALT_LEN: usize = 16;
/// AES-256 key length in bytes.
pub const KEY_LEN: usize = 32;
/// PBKDF2-HMAC-SHA256 iteration count.
pub const PBKDF2_ITERATIONS: u32 = 100_000;

/// Key metadata carried alongside the ciphertext. Not secret.
///
/// Exactly one of `salt`/`key` is present, selected by `has_passcode`:
/// a salt when the key is passcode-derived, the raw key bytes otherwise.
/// Wire field names match the original chat application so envelopes
/// embedded by either side decrypt on the other.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CipherEnvelope {
    pub iv: [u8; IV_LEN],
    #[serde(rename = "hasPasscode")]
    pub has_passcode: bool,
    pub salt: Option<[u8; SALT_LEN]>,
    pub key: Option<Vec<u8>>,
}

impl CipherEnvelope {
    /// Serialize to the base64(JSON) form stored in the stego envelope.
    pub fn to_base64(&self) -> String {
        let json = serde_json::to_string(self).expect("CipherEnvelope serialization");
        base64::engine::general_purpose::STANDARD.encode(json.as_bytes())
    }

    /// Parse the base64(JSON) form back into an envelope.
    ///
    /// Any malformation maps to [`CodecError::Authentication`]: a decryption
    /// attempt with unusable key metadata must fail exactly like a wrong key.
    pub fn from_base64(encoded: &str) -> Result<Self, CodecError> {
        let json = base64::engine::general_purpose::STANDARD
            .decode(encoded)
            .map_err(|_| CodecError::Authentication)?;
        serde_json::from_slice(&json).map_err(|_| CodecError::Authentication)
    }
}

/// Symmetric encrypt/decrypt engine owning its entropy source.
///
/// Generic over the RNG so tests can run on a seeded [`rand::rngs::StdRng`]
/// and get reproducible IVs, salts, and keys.
pub struct CipherEngine<R: RngCore + CryptoRng> {
    rng: R,
}

impl CipherEngine<ThreadRng> {
    /// Engine backed by the thread-local CSPRNG.
    pub fn new() -> Self {
        Self {
            rng: rand::thread_rng(),
        }
    }
}

impl Default for CipherEngine<ThreadRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: RngCore + CryptoRng> CipherEngine<R> {
    /// Engine backed by a caller-supplied RNG.
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    /// Encrypt `plaintext` with AES-256-GCM.
    ///
    /// Returns the ciphertext (auth tag appended) and the envelope needed
    /// to decrypt it. A fresh IV is drawn per call; with a passcode a fresh
    /// salt is drawn and the derived key stays internal, otherwise a fresh
    /// random key is drawn and exported in the envelope.
    pub fn encrypt(
        &mut self,
        plaintext: &str,
        passcode: Option<&str>,
    ) -> Result<(Vec<u8>, CipherEnvelope), CodecError> {
        let mut iv = [0u8; IV_LEN];
        self.rng.fill_bytes(&mut iv);

        let (key, salt, raw_key) = match passcode {
            Some(passcode) => {
                let mut salt = [0u8; SALT_LEN];
                self.rng.fill_bytes(&mut salt);
                (derive_key(passcode, &salt), Some(salt), None)
            }
            None => {
                let mut key = [0u8; KEY_LEN];
                self.rng.fill_bytes(&mut key);
                (key, None, Some(key.to_vec()))
            }
        };

        let cipher = Aes256Gcm::new(GenericArray::from_slice(&key));
        let nonce = GenericArray::from_slice(&iv);
        let ciphertext = cipher
            .encrypt(nonce, plaintext.as_bytes())
            .expect("AES-GCM encrypt should not fail");

        let envelope = CipherEnvelope {
            iv,
            has_passcode: passcode.is_some(),
            salt,
            key: raw_key,
        };
        Ok((ciphertext, envelope))
    }

    /// Decrypt `ciphertext` using the key material in `envelope`.
    ///
    /// Fails with [`CodecError::PasscodeRequired`] when the envelope is
    /// passcode-protected and no passcode was given. Every other failure —
    /// wrong passcode, wrong key, tampered ciphertext, unusable envelope —
    /// is [`CodecError::Authentication`] with no further detail.
    pub fn decrypt(
        &self,
        ciphertext: &[u8],
        envelope: &CipherEnvelope,
        passcode: Option<&str>,
    ) -> Result<String, CodecError> {
        let key: [u8; KEY_LEN] = if envelope.has_passcode {
            let passcode = passcode.ok_or(CodecError::PasscodeRequired)?;
            let salt = envelope.salt.ok_or(CodecError::Authentication)?;
            derive_key(passcode, &salt)
        } else {
            let raw = envelope.key.as_ref().ok_or(CodecError::Authentication)?;
            raw.as_slice()
                .try_into()
                .map_err(|_| CodecError::Authentication)?
        };

        let cipher = Aes256Gcm::new(GenericArray::from_slice(&key));
        let nonce = GenericArray::from_slice(&envelope.iv);
        let plaintext = cipher
            .decrypt(nonce, ciphertext)
            .map_err(|_| CodecError::Authentication)?;
        String::from_utf8(plaintext).map_err(|_| CodecError::Authentication)
    }
}

/// PBKDF2-HMAC-SHA256 key derivation, 100,000 rounds, 256-bit output.
fn derive_key(passcode: &str, salt: &[u8; SALT_LEN]) -> [u8; KEY_LEN] {
    let mut key = [0u8; KEY_LEN];
    pbkdf2_hmac::<Sha256>(passcode.as_bytes(), salt, PBKDF2_ITERATIONS, &mut key);
    key
}
