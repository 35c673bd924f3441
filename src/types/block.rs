//! Block model and builder.
//!
//! Defines `BlockHeader`, `BlockSignature`, and `Block<Tx>`, their canonical
//! encoding, and the construction operations (`Block::new`,
//! `Block::genesis`, `Block::header_hash`, `Block::sort_by_index`).
//! Generic over an external `Transaction` type so the core stays agnostic
//! of concrete transaction semantics.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::clock::Clock;
use crate::codec::{
    self, decode_address, decode_count, decode_digest, decode_poa_config, decode_signature,
    decode_u64, encode_address, encode_count, encode_digest, encode_poa_config, encode_signature,
    encode_u64, Cursor,
};
use crate::crypto::{self, Address, Digest, PrivateKey, PublicKey, Signature};
use crate::error::CodecError;
use crate::merkle::merkle_root;
use crate::poa::PoaConfig;
use crate::tx::Transaction;

/// Block header: the five fields that are hashed and signed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockHeader {
    /// Address of the validator that produced the block.
    pub origin: Address,
    /// Raw header hash of the predecessor block (the seed, for genesis).
    pub prev_hash: Digest,
    /// Merkle root over the block's transaction hashes.
    pub merkle_root: Digest,
    /// Unix-epoch timestamp, seconds.
    pub timestamp: u64,
    /// PoA consensus parameters in force for this block.
    pub consensus: PoaConfig,
}

impl BlockHeader {
    const WHAT: &'static str = "BlockHeader";

    /// Canonical encoding: concatenation of `origin`, `prev_hash`
    /// (length-prefixed), `merkle_root` (length-prefixed), `timestamp`
    /// (fixed-width big-endian), then the recursive encoding of
    /// `consensus`.
    pub fn encode(&self, out: &mut Vec<u8>) {
        encode_address(out, &self.origin);
        encode_digest(out, &self.prev_hash);
        encode_digest(out, &self.merkle_root);
        encode_u64(out, self.timestamp);
        encode_poa_config(out, &self.consensus);
    }

    pub fn decode(cur: &mut Cursor<'_>) -> Result<Self, CodecError> {
        let origin = decode_address(cur, Self::WHAT)?;
        let prev_hash = decode_digest(cur, Self::WHAT)?;
        let merkle_root = decode_digest(cur, Self::WHAT)?;
        let timestamp = decode_u64(cur, Self::WHAT)?;
        let consensus = decode_poa_config(cur)?;
        Ok(BlockHeader {
            origin,
            prev_hash,
            merkle_root,
            timestamp,
            consensus,
        })
    }

    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        self.encode(&mut out);
        out
    }

    /// Renders the header as JSON, for logs and debugging dashboards.
    ///
    /// This is not a wire format: field names and nesting can change
    /// freely, unlike `canonical_bytes`, which interoperating nodes must
    /// agree on byte-for-byte.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// A detached signature plus the signer's address.
///
/// Total order is `(signature bytes, then address bytes)` — this is what
/// lets a plain sorted `Vec` stand in for an unordered signature set while
/// still producing a single canonical encoding.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockSignature {
    pub signature: Signature,
    pub signer_addr: Address,
}

impl BlockSignature {
    const WHAT: &'static str = "BlockSignature";

    pub fn encode(&self, out: &mut Vec<u8>) {
        encode_signature(out, &self.signature);
        encode_address(out, &self.signer_addr);
    }

    pub fn decode(cur: &mut Cursor<'_>) -> Result<Self, CodecError> {
        let signature = decode_signature(cur, Self::WHAT)?;
        let signer_addr = decode_address(cur, Self::WHAT)?;
        Ok(BlockSignature {
            signature,
            signer_addr,
        })
    }
}

impl PartialOrd for BlockSignature {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for BlockSignature {
    fn cmp(&self, other: &Self) -> Ordering {
        self.signature
            .0
            .cmp(&other.signature.0)
            .then_with(|| self.signer_addr.cmp(&other.signer_addr))
    }
}

/// A block: index, header, signature set, and ordered transaction list.
/// Generic over an external `Transaction` implementation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Block<Tx: Transaction> {
    pub index: u64,
    pub header: BlockHeader,
    /// Signatures, sorted and deduplicated by value — the canonical
    /// stand-in for an unordered signature set.
    pub signatures: Vec<BlockSignature>,
    /// Transactions in commitment order; order is part of the block's
    /// identity and determines the Merkle root.
    pub transactions: Vec<Tx>,
}

impl<Tx: Transaction> Block<Tx> {
    /// Builds and signs a new block on top of `prev_hash`.
    ///
    /// Reads the wall clock exactly once (`clock.now()`); computes the
    /// Merkle root over `map(tx_hash_hex, txs)`; signs the header hash
    /// with `priv_key`. The returned block always validates under
    /// invariants 1 and 2 against the supplied `prev_hash`, and its own
    /// (single) signature verifies — callers are responsible for ensuring
    /// `index` and `prev_hash` are consistent with chain state.
    pub fn new(
        origin: Address,
        prev_hash: Digest,
        transactions: Vec<Tx>,
        index: u64,
        priv_key: &PrivateKey,
        consensus: PoaConfig,
        clock: &dyn Clock,
    ) -> Self {
        let timestamp = clock.now();
        let tx_hashes: Vec<String> = transactions.iter().map(Tx::tx_hash_hex).collect();
        let merkle_root = merkle_root(&tx_hashes);

        let header = BlockHeader {
            origin,
            prev_hash,
            merkle_root,
            timestamp,
            consensus,
        };

        let h = crypto::hash(&header.canonical_bytes());
        let signature = crypto::sign(priv_key, h.as_bytes());
        let signer_addr = crypto::address(&crypto::public_key(priv_key));

        Block {
            index,
            header,
            signatures: vec![BlockSignature {
                signature,
                signer_addr,
            }],
            transactions,
        }
    }

    /// Builds the genesis block: index 0, empty signatures and
    /// transactions, `prev_hash = seed` (stored verbatim, not re-hashed),
    /// `origin` the zero address.
    pub fn genesis(seed: Digest, timestamp: u64, consensus: PoaConfig) -> Self {
        let header = BlockHeader {
            origin: crypto::ZERO_ADDRESS,
            prev_hash: seed,
            merkle_root: merkle_root(&[]),
            timestamp,
            consensus,
        };

        Block {
            index: 0,
            header,
            signatures: Vec::new(),
            transactions: Vec::new(),
        }
    }

    /// The header hash: `hash(canonical_encode(header))`.
    pub fn header_hash(&self) -> Digest {
        crypto::hash(&self.header.canonical_bytes())
    }

    /// Sorts blocks by ascending index.
    pub fn sort_by_index(blocks: &mut [Self]) {
        blocks.sort_by_key(|b| b.index);
    }

    /// Verifies a single detached signature against this block's header
    /// hash under `pub_key`.
    pub fn verify_signature(&self, pub_key: &PublicKey, sig: &Signature) -> bool {
        crypto::verify(pub_key, sig, self.header_hash().as_bytes())
    }

    /// Non-authoritative JSON projection of this block, for human
    /// inspection and tooling only — never fed back into hashing,
    /// signing, or storage. Hashes, the Merkle root, and signatures are
    /// rendered as hex strings rather than the raw byte arrays
    /// `#[derive(Serialize)]` would otherwise produce, matching the
    /// external-interfaces contract: `header` (with `origin`, `prevHash`,
    /// `merkleRoot`, `timestamp`), `signatures` (array of `signature`/
    /// `signerAddr`), `index`, and `transactions` (array of each
    /// transaction's own stable hex hash, since the core has no other
    /// operation it can render for an opaque `Tx`).
    pub fn to_json_projection(&self) -> serde_json::Value {
        serde_json::json!({
            "header": {
                "origin": self.header.origin.to_hex(),
                "prevHash": self.header.prev_hash.to_hex(),
                "merkleRoot": self.header.merkle_root.to_hex(),
                "timestamp": self.header.timestamp,
            },
            "signatures": self.signatures.iter().map(|sig| serde_json::json!({
                "signature": sig.signature.to_hex(),
                "signerAddr": sig.signer_addr.to_hex(),
            })).collect::<Vec<_>>(),
            "index": self.index,
            "transactions": self.transactions.iter().map(Tx::tx_hash_hex).collect::<Vec<_>>(),
        })
    }

    /// Canonical encoding: `index`, `header`, signatures (sorted,
    /// length-prefixed), transactions (length-prefixed, list order).
    pub fn encode(&self, out: &mut Vec<u8>) {
        encode_u64(out, self.index);
        self.header.encode(out);

        let mut sorted_sigs = self.signatures.clone();
        sorted_sigs.sort();
        sorted_sigs.dedup();
        encode_count(out, sorted_sigs.len());
        for sig in &sorted_sigs {
            sig.encode(out);
        }

        encode_count(out, self.transactions.len());
        for tx in &self.transactions {
            tx.encode(out);
        }
    }

    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        self.encode(&mut out);
        out
    }

    pub fn decode(buf: &[u8]) -> Result<Self, CodecError> {
        let mut cur = Cursor::new(buf);
        let index = decode_u64(&mut cur, "Block.index")?;
        let header = BlockHeader::decode(&mut cur)?;

        let sig_count = decode_count(&mut cur, "Block.signatures")?;
        let mut signatures = Vec::with_capacity(sig_count as usize);
        for _ in 0..sig_count {
            signatures.push(BlockSignature::decode(&mut cur)?);
        }

        let tx_count = decode_count(&mut cur, "Block.transactions")?;
        let mut transactions = Vec::with_capacity(tx_count as usize);
        for _ in 0..tx_count {
            let remaining_slice = &buf[cur.position()..];
            let (tx, consumed) = Tx::decode(remaining_slice)?;
            transactions.push(tx);
            cur.advance(consumed);
        }

        codec::finish(&cur)?;

        Ok(Block {
            index,
            header,
            signatures,
            transactions,
        })
    }
}
