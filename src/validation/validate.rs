//! Block and chain validation.
//!
//! `validate_block` checks a single candidate against its immediate
//! predecessor and a precomputed median timestamp, in the exact
//! short-circuit order the consensus rules are specified in: transaction
//! validity, the Merkle commitment, the median-timestamp rule,
//! previous-header linkage, index succession, signer authority, and
//! origin membership — plus the minimum-transaction-count check, which is
//! additive and so is checked last, after every rule named by the core
//! taxonomy. `validate_chain` folds this over a whole sequence, sorting a
//! copy of the input by index first (candidates need not arrive in order)
//! and additionally enforcing the cap on how many consecutive blocks one
//! origin may author.
//!
//! Written as a sequence of `?`-chained checks, each returning the first
//! failure it hits, as free functions rather than a pluggable validator
//! trait — this core has exactly one validation strategy, not several to
//! choose between.

use std::collections::HashSet;

use tracing::warn;

use crate::crypto;
use crate::error::InvalidBlock;
use crate::merkle::merkle_root;
use crate::poa::PoaConfig;
use crate::tx::{Transaction, TxContext};
use crate::types::block::Block;
use crate::validation::median::{median_timestamp, MEDIAN_WINDOW};

/// Validates `block` against its immediate predecessor `prev` and the
/// median timestamp `median_ts` of the trailing window that precedes it.
///
/// Checks, in order: transaction validity, the Merkle commitment, the
/// median-timestamp rule, previous-header linkage, index succession,
/// signer authority, and origin membership — then, additively, the
/// minimum-transaction-count rule. Does not check the consecutive-origin
/// cap, which needs more than one predecessor; use [`validate_chain`] for
/// a full sequence.
pub fn validate_block<Tx: Transaction>(
    block: &Block<Tx>,
    prev: &Block<Tx>,
    median_ts: u64,
) -> Result<(), InvalidBlock> {
    let ctx = TxContext {
        block_timestamp: block.header.timestamp,
    };
    for tx in &block.transactions {
        tx.validate(&ctx).map_err(|source| {
            warn!(index = block.index, %source, "block rejected: invalid transaction");
            InvalidBlock::InvalidBlockTx {
                index: block.index,
                source,
            }
        })?;
    }

    let tx_hashes: Vec<String> = block.transactions.iter().map(Tx::tx_hash_hex).collect();
    let computed_root = merkle_root(&tx_hashes);
    if computed_root != block.header.merkle_root {
        warn!(index = block.index, "block rejected: merkle root mismatch");
        return Err(InvalidBlock::InvalidBlockMerkleRoot {
            index: block.index,
            computed: computed_root,
            declared: block.header.merkle_root,
        });
    }

    if block.header.timestamp <= median_ts {
        warn!(
            index = block.index,
            timestamp = block.header.timestamp,
            median = median_ts,
            "block rejected: timestamp does not exceed median"
        );
        return Err(InvalidBlock::InvalidBlockTimestamp {
            timestamp: block.header.timestamp,
            median: median_ts,
        });
    }

    let prev_hash = prev.header_hash();
    if block.header.prev_hash != prev_hash {
        warn!(index = block.index, "block rejected: prev hash mismatch");
        return Err(InvalidBlock::InvalidPrevBlockHash {
            declared: block.header.prev_hash,
            computed: prev_hash,
        });
    }

    let expected_index = prev.index + 1;
    if block.index != expected_index {
        warn!(
            index = block.index,
            expected = expected_index,
            "block rejected: index out of sequence"
        );
        return Err(InvalidBlock::InvalidBlockIndex {
            index: block.index,
            expected: expected_index,
        });
    }

    let poa = &block.header.consensus;
    verify_signatures(block, poa)?;

    if !poa.is_validator(&block.header.origin) {
        warn!(index = block.index, "block rejected: origin not a validator");
        return Err(InvalidBlock::InvalidBlockOrigin {
            reason: format!(
                "origin {} is not a member of the validator set",
                block.header.origin.to_hex()
            ),
        });
    }

    let min_txs = poa.min_txs;
    if block.transactions.len() < min_txs {
        warn!(
            index = block.index,
            count = block.transactions.len(),
            min = min_txs,
            "block rejected: too few transactions"
        );
        return Err(InvalidBlock::InvalidBlockTxCount {
            count: block.transactions.len(),
            min: min_txs,
        });
    }

    Ok(())
}

/// Checks the block's signature set: count within `[threshold,
/// signing_limit]`, each signer distinct and a validator set member, and
/// each signature cryptographically valid over the header hash.
fn verify_signatures<Tx: Transaction>(
    block: &Block<Tx>,
    poa: &PoaConfig,
) -> Result<(), InvalidBlock> {
    let count = block.signatures.len() as u64;
    if count < poa.threshold || count > poa.signing_limit {
        warn!(
            index = block.index,
            count, threshold = poa.threshold, signing_limit = poa.signing_limit,
            "block rejected: signature count out of bounds"
        );
        return Err(InvalidBlock::InvalidBlockSigner {
            reason: format!(
                "signature count {count} outside [{}, {}]",
                poa.threshold, poa.signing_limit
            ),
        });
    }

    let header_hash = block.header_hash();
    let mut seen = HashSet::with_capacity(block.signatures.len());
    for sig in &block.signatures {
        if !seen.insert(sig.signer_addr) {
            warn!(index = block.index, "block rejected: duplicate signer");
            return Err(InvalidBlock::InvalidBlockSigner {
                reason: format!("duplicate signer {}", sig.signer_addr.to_hex()),
            });
        }

        let pub_key = poa.find_validator(&sig.signer_addr).ok_or_else(|| {
            warn!(index = block.index, "block rejected: signer not a validator");
            InvalidBlock::InvalidBlockSigner {
                reason: format!(
                    "signer {} is not a member of the validator set",
                    sig.signer_addr.to_hex()
                ),
            }
        })?;

        if !crypto::verify(pub_key, &sig.signature, header_hash.as_bytes()) {
            warn!(index = block.index, "block rejected: signature does not verify");
            return Err(InvalidBlock::InvalidBlockSignature);
        }
    }

    Ok(())
}

/// Validates an entire chain, genesis first, inductively: a copy of
/// `blocks` is sorted by index (candidates need not arrive in order),
/// then each block is checked against its predecessor and the median
/// timestamp of its trailing window via [`validate_block`], plus the
/// consecutive-origin cap that only makes sense across a sequence.
///
/// An empty slice and a lone genesis block both validate trivially.
pub fn validate_chain<Tx: Transaction>(blocks: &[Block<Tx>]) -> Result<(), InvalidBlock> {
    let mut sorted: Vec<Block<Tx>> = blocks.to_vec();
    Block::sort_by_index(&mut sorted);

    let Some(genesis) = sorted.first() else {
        return Ok(());
    };

    if genesis.index != 0 {
        return Err(InvalidBlock::InvalidBlockIndex {
            index: genesis.index,
            expected: 0,
        });
    }

    let mut run_origin = genesis.header.origin;
    let mut run_len: u64 = 1;

    for i in 1..sorted.len() {
        let prev = &sorted[i - 1];
        let block = &sorted[i];

        let window_start = i.saturating_sub(MEDIAN_WINDOW);
        let window: Vec<u64> = sorted[window_start..i]
            .iter()
            .map(|b| b.header.timestamp)
            .collect();
        let median = median_timestamp(&window)?;

        validate_block(block, prev, median)?;

        if block.header.origin == run_origin {
            run_len += 1;
        } else {
            run_origin = block.header.origin;
            run_len = 1;
        }

        let limit = block.header.consensus.generation_limit;
        if run_len > limit {
            warn!(
                index = block.index,
                run_len, limit, "block rejected: generation limit exceeded"
            );
            return Err(InvalidBlock::InvalidBlockOrigin {
                reason: format!(
                    "origin {} authored {run_len} consecutive blocks, exceeding generation_limit {limit}",
                    block.header.origin.to_hex()
                ),
            });
        }
    }

    Ok(())
}
