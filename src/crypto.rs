//! Cryptographic primitives.
//!
//! Everything above this module — the codec, the Merkle tree, the block
//! builder and validator — is built on exactly four operations: a
//! collision-resistant digest, a detached signature scheme, and the
//! derivation of a public key and an address from a private key. The
//! concrete algorithms are fixed here (BLAKE3 for hashing, Ed25519 for
//! signatures) so that independent nodes compute identical bytes.

use ed25519_dalek::{Signer, SigningKey, Verifier, VerifyingKey};
use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

/// Collision-resistant 256-bit digest.
///
/// Used both as a block/header hash and as the address derivation
/// primitive. Always exactly 32 bytes.
#[derive(Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Digest(pub [u8; 32]);

impl Digest {
    pub const LEN: usize = 32;

    /// Computes the BLAKE3-256 digest of `bytes`.
    pub fn compute(bytes: &[u8]) -> Self {
        Digest(*blake3::hash(bytes).as_bytes())
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        let bytes = hex::decode(s)?;
        let arr: [u8; 32] = bytes
            .try_into()
            .map_err(|_| hex::FromHexError::InvalidStringLength)?;
        Ok(Digest(arr))
    }
}

impl std::fmt::Debug for Digest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Digest({})", self.to_hex())
    }
}

/// Address of a signer, derived deterministically from a public key.
///
/// Wrapping a raw `Digest` avoids passing naked byte arrays around in the
/// block/validator APIs and lets the total order required for canonical
/// signature-set encoding fall out of `Ord` on the inner bytes.
#[derive(Clone, Copy, Eq, PartialEq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Address(pub [u8; 32]);

impl Address {
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl std::fmt::Debug for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Address({})", self.to_hex())
    }
}

/// Ed25519 public key.
#[derive(Clone, Eq, PartialEq)]
pub struct PublicKey(VerifyingKey);

impl PublicKey {
    pub fn as_bytes(&self) -> [u8; 32] {
        self.0.to_bytes()
    }

    /// Reconstructs a public key from its canonical 32-byte encoding.
    pub fn from_bytes(bytes: [u8; 32]) -> Result<Self, ed25519_dalek::SignatureError> {
        VerifyingKey::from_bytes(&bytes).map(PublicKey)
    }
}

impl std::fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PublicKey({})", hex::encode(self.as_bytes()))
    }
}

// `ed25519_dalek::VerifyingKey` only implements `serde::Serialize`/
// `Deserialize` behind its own `serde` feature, which this crate does not
// enable; encode through the 32-byte form instead so `PoaConfig` (and
// anything embedding it) can still derive serde impls.
impl Serialize for PublicKey {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_bytes(&self.as_bytes())
    }
}

impl<'de> Deserialize<'de> for PublicKey {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let bytes = <Vec<u8>>::deserialize(deserializer)?;
        let arr: [u8; 32] = bytes
            .try_into()
            .map_err(|_| serde::de::Error::custom("public key must be 32 bytes"))?;
        PublicKey::from_bytes(arr).map_err(serde::de::Error::custom)
    }
}

/// Ed25519 private (signing) key.
///
/// Backing bytes are zeroized on drop: this is the only long-lived secret
/// the core ever touches, and it is borrowed by value only for the
/// duration of a single block-construction call.
#[derive(Clone, Zeroize)]
#[zeroize(drop)]
pub struct PrivateKey([u8; 32]);

impl PrivateKey {
    /// Wraps raw Ed25519 seed bytes as a `PrivateKey`.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        PrivateKey(bytes)
    }

    /// Generates a new random private key.
    pub fn generate<R: rand_core::RngCore + rand_core::CryptoRng>(rng: &mut R) -> Self {
        let signing_key = SigningKey::generate(rng);
        PrivateKey(signing_key.to_bytes())
    }

    fn signing_key(&self) -> SigningKey {
        SigningKey::from_bytes(&self.0)
    }
}

/// Detached Ed25519 signature.
#[derive(Clone, Eq, PartialEq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Signature(pub Vec<u8>);

impl Signature {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }
}

impl std::fmt::Debug for Signature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Signature({})", self.to_hex())
    }
}

/// Computes the canonical hash of `bytes`.
///
/// The core never hashes anything directly; it always hashes the
/// canonical encoding of an entity (`codec::*`), so that every
/// implementation derives the same bytes before they reach this function.
pub fn hash(bytes: &[u8]) -> Digest {
    Digest::compute(bytes)
}

/// Signs `msg` (expected to be a header hash's bytes) with `key`.
pub fn sign(key: &PrivateKey, msg: &[u8]) -> Signature {
    let sig = key.signing_key().sign(msg);
    Signature(sig.to_bytes().to_vec())
}

/// Verifies `sig` over `msg` under `pub_key`.
pub fn verify(pub_key: &PublicKey, sig: &Signature, msg: &[u8]) -> bool {
    let bytes: [u8; 64] = match sig.0.as_slice().try_into() {
        Ok(b) => b,
        Err(_) => return false,
    };
    let sig = ed25519_dalek::Signature::from_bytes(&bytes);
    pub_key.0.verify(msg, &sig).is_ok()
}

/// Derives the public key corresponding to `key`.
pub fn public_key(key: &PrivateKey) -> PublicKey {
    PublicKey(key.signing_key().verifying_key())
}

/// Derives the address of a public key: the digest of its canonical bytes.
pub fn address(pub_key: &PublicKey) -> Address {
    Address(*hash(&pub_key.as_bytes()).as_bytes())
}

/// The well-known zero address, used as the `origin` of the genesis block.
pub const ZERO_ADDRESS: Address = Address([0u8; 32]);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_then_verify_roundtrips() {
        let mut rng = rand::rngs::OsRng;
        let key = PrivateKey::generate(&mut rng);
        let pk = public_key(&key);
        let msg = b"header-hash-bytes";

        let sig = sign(&key, msg);
        assert!(verify(&pk, &sig, msg));
    }

    #[test]
    fn verify_rejects_tampered_message() {
        let mut rng = rand::rngs::OsRng;
        let key = PrivateKey::generate(&mut rng);
        let pk = public_key(&key);

        let sig = sign(&key, b"original");
        assert!(!verify(&pk, &sig, b"tampered"));
    }

    #[test]
    fn address_derivation_is_deterministic() {
        let mut rng = rand::rngs::OsRng;
        let key = PrivateKey::generate(&mut rng);
        let pk = public_key(&key);

        let a1 = address(&pk);
        let a2 = address(&pk);
        assert_eq!(a1, a2);
    }

    #[test]
    fn hash_is_deterministic_and_distinguishes_inputs() {
        let h1 = hash(b"abc");
        let h2 = hash(b"abc");
        let h3 = hash(b"abd");
        assert_eq!(h1, h2);
        assert_ne!(h1, h3);
    }

    #[test]
    fn digest_hex_roundtrips() {
        let d = hash(b"round trip me");
        let hex = d.to_hex();
        let back = Digest::from_hex(&hex).unwrap();
        assert_eq!(d, back);
    }

    #[test]
    fn digest_from_hex_rejects_wrong_length() {
        assert!(Digest::from_hex("deadbeef").is_err());
    }
}
