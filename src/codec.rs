//! Canonical codec.
//!
//! Every core entity has exactly one canonical byte encoding, used both as
//! the basis for hashing/signing and as the persisted form. The layout is
//! hand-written rather than derived through a general
//! serializer: the sorted-signature-set requirement and the fixed-width
//! big-endian timestamp are load-bearing for interoperability and are not
//! things a `#[derive(Serialize)]` gives you for free.
//!
//! Primitive building blocks:
//!
//! - a byte string is encoded as a 4-byte big-endian length prefix
//!   followed by the raw bytes ("length-prefixed"),
//! - a `u64` is encoded as 8 fixed-width big-endian bytes,
//! - a sequence is encoded as a 4-byte big-endian count prefix followed by
//!   each element's own encoding in order.
//!
//! Decoding is total: malformed input always produces a `CodecError`
//! rather than panicking, and a cursor is threaded through so each
//! `decode_*` function reports exactly how many bytes it consumed.

use crate::crypto::{Address, Digest, PublicKey, Signature};
use crate::error::CodecError;
use crate::poa::PoaConfig;
use std::time::Duration;

/// A cursor over a byte slice, used to thread position through decoding.
pub struct Cursor<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Cursor { buf, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    fn take(&mut self, n: usize, what: &'static str) -> Result<&'a [u8], CodecError> {
        if self.remaining() < n {
            return Err(CodecError::UnexpectedEof { what });
        }
        let out = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(out)
    }

    /// Advances the cursor by `n` bytes without reading them, for values a
    /// caller decoded itself from a slice obtained via `position()`.
    pub fn advance(&mut self, n: usize) {
        self.pos = (self.pos + n).min(self.buf.len());
    }
}

/// Appends a 4-byte big-endian length prefix followed by `bytes`.
pub fn encode_bytes_lp(out: &mut Vec<u8>, bytes: &[u8]) {
    out.extend_from_slice(&(bytes.len() as u32).to_be_bytes());
    out.extend_from_slice(bytes);
}

/// Decodes a length-prefixed byte string.
pub fn decode_bytes_lp(cur: &mut Cursor<'_>, what: &'static str) -> Result<Vec<u8>, CodecError> {
    let len_bytes = cur.take(4, what)?;
    let len = u32::from_be_bytes(len_bytes.try_into().unwrap());
    if len > 16 * 1024 * 1024 {
        return Err(CodecError::LengthTooLarge {
            what,
            len: len as u64,
        });
    }
    Ok(cur.take(len as usize, what)?.to_vec())
}

/// Appends a `u64` as 8 fixed-width big-endian bytes.
pub fn encode_u64(out: &mut Vec<u8>, value: u64) {
    out.extend_from_slice(&value.to_be_bytes());
}

pub fn decode_u64(cur: &mut Cursor<'_>, what: &'static str) -> Result<u64, CodecError> {
    let bytes = cur.take(8, what)?;
    Ok(u64::from_be_bytes(bytes.try_into().unwrap()))
}

/// Appends a sequence count as 4 fixed-width big-endian bytes.
pub fn encode_count(out: &mut Vec<u8>, count: usize) {
    out.extend_from_slice(&(count as u32).to_be_bytes());
}

pub fn decode_count(cur: &mut Cursor<'_>, what: &'static str) -> Result<u32, CodecError> {
    let bytes = cur.take(4, what)?;
    let count = u32::from_be_bytes(bytes.try_into().unwrap());
    if count as u64 > 10_000_000 {
        return Err(CodecError::LengthTooLarge {
            what,
            len: count as u64,
        });
    }
    Ok(count)
}

pub fn encode_digest(out: &mut Vec<u8>, digest: &Digest) {
    encode_bytes_lp(out, digest.as_bytes());
}

pub fn decode_digest(cur: &mut Cursor<'_>, what: &'static str) -> Result<Digest, CodecError> {
    let bytes = decode_bytes_lp(cur, what)?;
    let arr: [u8; 32] = bytes
        .try_into()
        .map_err(|_| CodecError::InvalidValue {
            what,
            reason: "digest must be 32 bytes".to_string(),
        })?;
    Ok(Digest(arr))
}

pub fn encode_address(out: &mut Vec<u8>, addr: &Address) {
    encode_bytes_lp(out, addr.as_bytes());
}

pub fn decode_address(cur: &mut Cursor<'_>, what: &'static str) -> Result<Address, CodecError> {
    let bytes = decode_bytes_lp(cur, what)?;
    let arr: [u8; 32] = bytes
        .try_into()
        .map_err(|_| CodecError::InvalidValue {
            what,
            reason: "address must be 32 bytes".to_string(),
        })?;
    Ok(Address(arr))
}

pub fn encode_signature(out: &mut Vec<u8>, sig: &Signature) {
    encode_bytes_lp(out, sig.as_bytes());
}

pub fn decode_signature(cur: &mut Cursor<'_>, what: &'static str) -> Result<Signature, CodecError> {
    Ok(Signature(decode_bytes_lp(cur, what)?))
}

pub fn encode_public_key(out: &mut Vec<u8>, pk: &PublicKey) {
    encode_bytes_lp(out, &pk.as_bytes());
}

pub fn decode_public_key(cur: &mut Cursor<'_>, what: &'static str) -> Result<PublicKey, CodecError> {
    let bytes = decode_bytes_lp(cur, what)?;
    let arr: [u8; 32] = bytes.try_into().map_err(|_| CodecError::InvalidValue {
        what,
        reason: "public key must be 32 bytes".to_string(),
    })?;
    PublicKey::from_bytes(arr).map_err(|e| CodecError::InvalidValue {
        what,
        reason: e.to_string(),
    })
}

/// Canonical recursive encoding of a `PoaConfig`.
///
/// `validator_set` is encoded in the order supplied at construction (it is
/// already deduplicated by `PoaConfig::new`); the remaining scalar fields
/// follow as fixed-width integers.
pub fn encode_poa_config(out: &mut Vec<u8>, poa: &PoaConfig) {
    encode_count(out, poa.validator_set().len());
    for pk in poa.validator_set() {
        encode_public_key(out, pk);
    }
    encode_u64(out, poa.block_period.as_secs());
    encode_u64(out, poa.generation_limit);
    encode_u64(out, poa.signing_limit);
    encode_u64(out, poa.threshold);
    encode_u64(out, poa.min_txs as u64);
}

pub fn decode_poa_config(cur: &mut Cursor<'_>) -> Result<PoaConfig, CodecError> {
    let what = "PoaConfig";
    let count = decode_count(cur, what)?;
    let mut validator_set = Vec::with_capacity(count as usize);
    for _ in 0..count {
        validator_set.push(decode_public_key(cur, what)?);
    }
    let block_period = Duration::from_secs(decode_u64(cur, what)?);
    let generation_limit = decode_u64(cur, what)?;
    let signing_limit = decode_u64(cur, what)?;
    let threshold = decode_u64(cur, what)?;
    let min_txs = decode_u64(cur, what)? as usize;

    PoaConfig::new(
        validator_set,
        block_period,
        generation_limit,
        signing_limit,
        threshold,
        min_txs,
    )
    .map_err(|e| CodecError::InvalidValue {
        what,
        reason: e.to_string(),
    })
}

/// Finishes decoding: errors if any bytes remain unconsumed.
pub fn finish(cur: &Cursor<'_>) -> Result<(), CodecError> {
    if cur.remaining() != 0 {
        return Err(CodecError::TrailingBytes {
            remaining: cur.remaining(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bytes_lp_roundtrips() {
        let mut buf = Vec::new();
        encode_bytes_lp(&mut buf, b"hello world");
        let mut cur = Cursor::new(&buf);
        let decoded = decode_bytes_lp(&mut cur, "test").unwrap();
        assert_eq!(decoded, b"hello world");
        finish(&cur).unwrap();
    }

    #[test]
    fn u64_roundtrips_big_endian() {
        let mut buf = Vec::new();
        encode_u64(&mut buf, 0x0102030405060708);
        assert_eq!(buf, vec![1, 2, 3, 4, 5, 6, 7, 8]);
        let mut cur = Cursor::new(&buf);
        assert_eq!(decode_u64(&mut cur, "test").unwrap(), 0x0102030405060708);
    }

    #[test]
    fn decode_fails_on_truncated_input() {
        let buf = vec![0u8, 0, 0, 10]; // claims 10 bytes follow, none do
        let mut cur = Cursor::new(&buf);
        let err = decode_bytes_lp(&mut cur, "test").unwrap_err();
        assert_eq!(err, CodecError::UnexpectedEof { what: "test" });
    }

    #[test]
    fn poa_config_roundtrips() {
        use crate::crypto::PrivateKey;

        let pk1 = crate::crypto::public_key(&PrivateKey::from_bytes([1; 32]));
        let pk2 = crate::crypto::public_key(&PrivateKey::from_bytes([2; 32]));
        let poa = PoaConfig::new(vec![pk1, pk2], Duration::from_secs(5), 10, 2, 1, 0).unwrap();

        let mut buf = Vec::new();
        encode_poa_config(&mut buf, &poa);
        let mut cur = Cursor::new(&buf);
        let decoded = decode_poa_config(&mut cur).unwrap();
        finish(&cur).unwrap();
        assert_eq!(decoded, poa);
    }
}
