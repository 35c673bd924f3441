//! Block and chain-validation core of a permissioned proof-of-authority
//! blockchain node.
//!
//! This crate builds and validates blocks; it does not gossip them, choose
//! between competing forks, or decide how they are persisted. Those are
//! the concerns of an embedder, expressed here only as the collaborator
//! traits ([`tx::Transaction`], [`clock::Clock`], [`storage::BlockStore`])
//! the core depends on.
//!
//! A block is built with [`types::block::Block::new`], encoded and hashed
//! canonically via [`codec`], committed to its transactions through
//! [`merkle`], and checked against its chain with [`validation::validate_chain`].
//! Every signature is Ed25519 over BLAKE3 digests ([`crypto`]); consensus
//! parameters live in [`poa::PoaConfig`].

pub mod clock;
pub mod codec;
pub mod crypto;
pub mod error;
pub mod merkle;
pub mod poa;
pub mod storage;
pub mod tx;
pub mod types;
pub mod validation;

pub use clock::{Clock, FixedClock, SystemClock};
pub use crypto::{Address, Digest, PrivateKey, PublicKey, Signature};
pub use error::{
    BlockStoreError, CodecError, InvalidBlock, InvalidTransaction, MedianError, PoaConfigError,
};
pub use poa::PoaConfig;
pub use storage::{get_block, put_block, BlockStore, InMemoryBlockStore};
pub use tx::{Transaction, TxContext};
pub use types::block::{Block, BlockHeader, BlockSignature};
pub use validation::{median_timestamp, validate_block, validate_chain, MEDIAN_WINDOW};
