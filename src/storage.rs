//! Block storage collaborator.
//!
//! The core depends on storage through exactly two operations, keyed
//! solely by block index and opaque to what's inside the blob: `put`
//! stores the canonical encoding of a block, `get` returns it back.
//! `BlockStore` itself never looks inside the bytes it holds; the
//! `put_block`/`get_block` free functions below are the typed layer on
//! top that encodes/decodes through it and — on read — re-validate every
//! contained transaction against the block's own timestamp, the one
//! integrity check the core still performs on a block coming back from
//! storage.

use std::collections::HashMap;

use crate::error::BlockStoreError;
use crate::tx::{Transaction, TxContext};
use crate::types::block::Block;

/// Opaque blob storage keyed by block index.
pub trait BlockStore {
    /// Stores `blob` — the canonical encoding of a block — at `index`.
    /// Idempotent for a given `(index, blob)` pair.
    fn put(&mut self, index: u64, blob: &[u8]);

    /// Returns the stored canonical encoding at `index`, if any.
    fn get(&self, index: u64) -> Option<Vec<u8>>;
}

/// Encodes `block` canonically and stores it at its own index.
pub fn put_block<S: BlockStore + ?Sized, Tx: Transaction>(store: &mut S, block: &Block<Tx>) {
    store.put(block.index, &block.canonical_bytes());
}

/// Fetches the blob at `index`, decodes it, and re-validates every
/// contained transaction against the block's own timestamp before
/// returning it.
pub fn get_block<S: BlockStore + ?Sized, Tx: Transaction>(
    store: &S,
    index: u64,
) -> Result<Option<Block<Tx>>, BlockStoreError> {
    let Some(blob) = store.get(index) else {
        return Ok(None);
    };

    let block: Block<Tx> = Block::decode(&blob)?;
    let ctx = TxContext {
        block_timestamp: block.header.timestamp,
    };
    for tx in &block.transactions {
        tx.validate(&ctx)
            .map_err(BlockStoreError::InvalidTransaction)?;
    }

    Ok(Some(block))
}

/// An in-memory `BlockStore`, keyed by index.
///
/// Suitable for tests and single-process embedding; it holds every
/// stored blob in memory and is lost on restart.
#[derive(Debug, Default)]
pub struct InMemoryBlockStore {
    blobs: HashMap<u64, Vec<u8>>,
}

impl InMemoryBlockStore {
    pub fn new() -> Self {
        InMemoryBlockStore {
            blobs: HashMap::new(),
        }
    }

    /// Number of blobs currently stored.
    pub fn len(&self) -> usize {
        self.blobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blobs.is_empty()
    }
}

impl BlockStore for InMemoryBlockStore {
    fn put(&mut self, index: u64, blob: &[u8]) {
        self.blobs.insert(index, blob.to_vec());
    }

    fn get(&self, index: u64) -> Option<Vec<u8>> {
        self.blobs.get(&index).cloned()
    }
}
