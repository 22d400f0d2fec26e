//! LSB bit transport: 32-bit length header + envelope bits in RGB channels.
//!
//! The carrier is a raw RGBA8 buffer. Every 4th byte (alpha) is skipped; the
//! remaining bytes each donate their least-significant bit, scanned in buffer
//! order. The stream is self-describing: a 32-bit big-endian payload bit
//! count, then the serialized [`StegoEnvelope`] MSB-first. There is no magic
//! marker — an unmodified image simply fails length validation on extract.

use crate::error::CodecError;
use crate::payload::StegoEnvelope;

/// Bits reserved at the start of the stream for the payload bit count.
pub const LENGTH_HEADER_BITS: usize = 32;

/// Usable LSB slots in a buffer of `buffer_len` bytes: 3 of every 4
/// (R, G, B carry data; alpha does not).
pub fn capacity_bits(buffer_len: usize) -> usize {
    buffer_len * 3 / 4
}

/// Embed `envelope` into the LSBs of `pixels`.
///
/// Fails with [`CodecError::Capacity`] before touching the buffer if the
/// header plus payload exceeds [`capacity_bits`]. On success only the LSBs
/// of the first `32 + L` non-alpha bytes change; everything else, alpha
/// bytes included, is preserved exactly.
pub fn embed(pixels: &mut [u8], envelope: &StegoEnvelope) -> Result<(), CodecError> {
    let payload = envelope.to_bytes();
    let payload_bits = payload.len() * 8;
    if payload_bits > u32::MAX as usize
        || LENGTH_HEADER_BITS + payload_bits > capacity_bits(pixels.len())
    {
        return Err(CodecError::Capacity);
    }

    // Header and payload are both byte-aligned, so build one contiguous
    // stream and walk its bits.
    let mut stream = Vec::with_capacity(4 + payload.len());
    stream.extend_from_slice(&(payload_bits as u32).to_be_bytes());
    stream.extend_from_slice(&payload);
    let total_bits = stream.len() * 8;

    let mut bit_idx = 0usize;
    for (i, byte) in pixels.iter_mut().enumerate() {
        if bit_idx >= total_bits {
            break;
        }
        if i % 4 == 3 {
            continue; // alpha
        }
        let bit = (stream[bit_idx / 8] >> (7 - bit_idx % 8)) & 1;
        *byte = (*byte & 0xFE) | bit;
        bit_idx += 1;
    }
    Ok(())
}

/// Extract an envelope from the LSBs of `pixels`.
///
/// A strict pipeline, each stage failing independently: length header →
/// [`CodecError::DataLength`]; payload bits → [`CodecError::DataIncomplete`];
/// UTF-8/JSON decode → [`CodecError::Parse`]; field presence →
/// [`CodecError::Validation`]; checksum → [`CodecError::Checksum`].
pub fn extract(pixels: &[u8]) -> Result<StegoEnvelope, CodecError> {
    let mut lsbs = pixels
        .iter()
        .enumerate()
        .filter(|(i, _)| i % 4 != 3)
        .map(|(_, byte)| byte & 1);

    let mut declared = 0usize;
    for _ in 0..LENGTH_HEADER_BITS {
        let bit = lsbs.next().ok_or(CodecError::DataLength)?;
        declared = (declared << 1) | bit as usize;
    }
    if declared == 0 || declared > capacity_bits(pixels.len()) {
        return Err(CodecError::DataLength);
    }

    let mut bits = Vec::with_capacity(declared);
    for _ in 0..declared {
        bits.push(lsbs.next().ok_or(CodecError::DataIncomplete)?);
    }

    // Regroup MSB-first; a trailing partial byte is dropped, as the original
    // format never produces one (payloads are byte-aligned).
    let mut bytes = Vec::with_capacity(declared / 8);
    for chunk in bits.chunks_exact(8) {
        let mut byte = 0u8;
        for (i, &bit) in chunk.iter().enumerate() {
            byte |= bit << (7 - i);
        }
        bytes.push(byte);
    }

    let text = String::from_utf8(bytes).map_err(|_| CodecError::Parse)?;
    let envelope = StegoEnvelope::from_bytes(text.as_bytes())?;
    envelope.validate()?;
    Ok(envelope)
}
