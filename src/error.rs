//! Closed error taxonomy.
//!
//! Every validation failure the core can produce is one of the variants
//! below; there is no catch-all. Each variant carries enough context
//! (expected vs. actual bytes, offending index, wrapped transaction error)
//! for a caller to log it usefully. Manual `Display`/`Error` impls rather
//! than a derive macro, so each message can be phrased around its own
//! fields instead of a generic template.

use crate::crypto::Digest;
use std::fmt;

/// A single transaction's validity predicate rejected it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidTransaction(pub String);

impl fmt::Display for InvalidTransaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for InvalidTransaction {}

/// The sliding-window median computation failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MedianError {
    /// The window contained no blocks.
    EmptyWindow,
}

impl fmt::Display for MedianError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MedianError::EmptyWindow => write!(f, "median timestamp: empty window"),
        }
    }
}

impl std::error::Error for MedianError {}

/// A malformed canonical encoding was rejected while decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// Fewer bytes remained than the field declared/required.
    UnexpectedEof { what: &'static str },
    /// A length prefix was too large to be plausible input.
    LengthTooLarge { what: &'static str, len: u64 },
    /// Trailing bytes remained after decoding a complete value.
    TrailingBytes { remaining: usize },
    /// The decoded bytes were structurally well-formed but failed a
    /// value-level invariant (e.g. an inconsistent `PoaConfig`).
    InvalidValue { what: &'static str, reason: String },
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodecError::UnexpectedEof { what } => {
                write!(f, "unexpected end of input while decoding {what}")
            }
            CodecError::LengthTooLarge { what, len } => {
                write!(f, "length prefix for {what} too large: {len}")
            }
            CodecError::TrailingBytes { remaining } => {
                write!(f, "{remaining} trailing byte(s) after decoding")
            }
            CodecError::InvalidValue { what, reason } => {
                write!(f, "invalid {what}: {reason}")
            }
        }
    }
}

impl std::error::Error for CodecError {}

/// A block read back from storage failed its read-time integrity check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockStoreError {
    /// The stored blob was not a valid canonical encoding.
    Decode(CodecError),
    /// A transaction failed re-validation against the block's own
    /// timestamp after being read back from storage.
    InvalidTransaction(InvalidTransaction),
}

impl fmt::Display for BlockStoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockStoreError::Decode(e) => write!(f, "stored block failed to decode: {e}"),
            BlockStoreError::InvalidTransaction(e) => {
                write!(f, "stored block failed re-validation on read: {e}")
            }
        }
    }
}

impl std::error::Error for BlockStoreError {}

impl From<CodecError> for BlockStoreError {
    fn from(e: CodecError) -> Self {
        BlockStoreError::Decode(e)
    }
}

/// Every reason a block can be rejected by `validate_block`/`validate_chain`.
///
/// One variant per row of the error taxonomy table; evaluation in
/// `validate_block` short-circuits on the first failure, so exactly one
/// variant describes any given rejection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidBlock {
    /// A contained transaction failed its own validity predicate.
    InvalidBlockTx {
        index: u64,
        source: InvalidTransaction,
    },
    /// The declared Merkle root does not match the computed one.
    InvalidBlockMerkleRoot {
        index: u64,
        computed: Digest,
        declared: Digest,
    },
    /// `timestamp` did not strictly exceed the median of the trailing window.
    InvalidBlockTimestamp { timestamp: u64, median: u64 },
    /// The declared previous-header hash does not match the predecessor's.
    InvalidPrevBlockHash { declared: Digest, computed: Digest },
    /// `index` was not exactly one greater than the predecessor's.
    InvalidBlockIndex { index: u64, expected: u64 },
    /// A signature in the block's signature set does not verify, or its
    /// signer is not a member of the validator set, or the signature count
    /// falls outside `[threshold, signing_limit]`.
    InvalidBlockSigner { reason: String },
    /// The block's `origin` is not a member of the validator set, or (at
    /// the chain level) one origin authored more than `generation_limit`
    /// consecutive blocks.
    InvalidBlockOrigin { reason: String },
    /// A single signature failed cryptographic verification.
    InvalidBlockSignature,
    /// The median-timestamp computation over a trailing window failed.
    InvalidMedianTimestamp(MedianError),
    /// A non-genesis block contained fewer transactions than `min_txs`.
    InvalidBlockTxCount { count: usize, min: usize },
}

impl fmt::Display for InvalidBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidBlock::InvalidBlockTx { index, source } => {
                write!(f, "block {index}: invalid transaction: {source}")
            }
            InvalidBlock::InvalidBlockMerkleRoot {
                index,
                computed,
                declared,
            } => write!(
                f,
                "block {index}: merkle root mismatch: computed {} declared {}",
                computed.to_hex(),
                declared.to_hex()
            ),
            InvalidBlock::InvalidBlockTimestamp { timestamp, median } => write!(
                f,
                "block timestamp {timestamp} does not exceed median {median}"
            ),
            InvalidBlock::InvalidPrevBlockHash { declared, computed } => write!(
                f,
                "prev hash mismatch: declared {} computed {}",
                declared.to_hex(),
                computed.to_hex()
            ),
            InvalidBlock::InvalidBlockIndex { index, expected } => {
                write!(f, "block index {index}, expected {expected}")
            }
            InvalidBlock::InvalidBlockSigner { reason } => {
                write!(f, "invalid block signer: {reason}")
            }
            InvalidBlock::InvalidBlockOrigin { reason } => {
                write!(f, "invalid block origin: {reason}")
            }
            InvalidBlock::InvalidBlockSignature => write!(f, "signature does not verify"),
            InvalidBlock::InvalidMedianTimestamp(e) => write!(f, "invalid median timestamp: {e}"),
            InvalidBlock::InvalidBlockTxCount { count, min } => {
                write!(f, "block has {count} transaction(s), fewer than the minimum {min}")
            }
        }
    }
}

impl std::error::Error for InvalidBlock {}

impl From<MedianError> for InvalidBlock {
    fn from(e: MedianError) -> Self {
        InvalidBlock::InvalidMedianTimestamp(e)
    }
}

/// Errors produced while constructing/validating `PoaConfig`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PoaConfigError {
    EmptyValidatorSet,
    DuplicateValidator(crate::crypto::Address),
    ThresholdExceedsValidatorCount { threshold: u64, count: usize },
    SigningLimitBelowThreshold { threshold: u64, signing_limit: u64 },
    SigningLimitExceedsValidatorCount { signing_limit: u64, count: usize },
}

impl fmt::Display for PoaConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PoaConfigError::EmptyValidatorSet => write!(f, "validator set must not be empty"),
            PoaConfigError::DuplicateValidator(addr) => {
                write!(f, "duplicate validator address: {}", addr.to_hex())
            }
            PoaConfigError::ThresholdExceedsValidatorCount { threshold, count } => write!(
                f,
                "threshold {threshold} exceeds validator set size {count}"
            ),
            PoaConfigError::SigningLimitBelowThreshold {
                threshold,
                signing_limit,
            } => write!(
                f,
                "signing_limit {signing_limit} is below threshold {threshold}"
            ),
            PoaConfigError::SigningLimitExceedsValidatorCount {
                signing_limit,
                count,
            } => write!(
                f,
                "signing_limit {signing_limit} exceeds validator set size {count}"
            ),
        }
    }
}

impl std::error::Error for PoaConfigError {}
