//! End-to-end chain scenarios, exercising the public API the way an
//! embedder would: build blocks with `Block::new`/`Block::genesis`, store
//! them, and validate the resulting chain with `validate_chain`.

use std::time::Duration;

use chain::{
    codec, crypto, storage, Block, CodecError, Digest, FixedClock, InMemoryBlockStore,
    InvalidBlock, InvalidTransaction, PoaConfig, PrivateKey, Transaction, TxContext,
};

#[derive(Debug, Clone, PartialEq, Eq)]
struct Payment {
    payload: Vec<u8>,
    not_before: u64,
}

impl Payment {
    fn new(payload: impl Into<Vec<u8>>, not_before: u64) -> Self {
        Payment {
            payload: payload.into(),
            not_before,
        }
    }
}

impl Transaction for Payment {
    fn tx_hash_hex(&self) -> String {
        crypto::hash(&self.payload).to_hex()
    }

    fn validate(&self, ctx: &TxContext) -> Result<(), InvalidTransaction> {
        if ctx.block_timestamp < self.not_before {
            return Err(InvalidTransaction(format!(
                "payment not valid before {} (block timestamp {})",
                self.not_before, ctx.block_timestamp
            )));
        }
        Ok(())
    }

    fn encode(&self, out: &mut Vec<u8>) {
        codec::encode_bytes_lp(out, &self.payload);
        codec::encode_u64(out, self.not_before);
    }

    fn decode(buf: &[u8]) -> Result<(Self, usize), CodecError> {
        let mut cur = codec::Cursor::new(buf);
        let payload = codec::decode_bytes_lp(&mut cur, "Payment.payload")?;
        let not_before = codec::decode_u64(&mut cur, "Payment.not_before")?;
        Ok((
            Payment {
                payload,
                not_before,
            },
            cur.position(),
        ))
    }
}

fn single_validator_config(priv_key: &PrivateKey, generation_limit: u64, min_txs: usize) -> PoaConfig {
    let pub_key = crypto::public_key(priv_key);
    PoaConfig::new(
        vec![pub_key],
        Duration::from_secs(2),
        generation_limit,
        1,
        1,
        min_txs,
    )
    .unwrap()
}

fn build_chain(
    n: u64,
    priv_key: &PrivateKey,
    consensus: &PoaConfig,
    tx_for_index: impl Fn(u64) -> Vec<Payment>,
) -> Vec<Block<Payment>> {
    let origin = crypto::address(&crypto::public_key(priv_key));
    let mut blocks = vec![Block::genesis(Digest([0u8; 32]), 1_000, consensus.clone())];
    for i in 1..=n {
        let prev_hash = blocks.last().unwrap().header_hash();
        blocks.push(Block::new(
            origin,
            prev_hash,
            tx_for_index(i),
            i,
            priv_key,
            consensus.clone(),
            &FixedClock(1_000 + i * 10),
        ));
    }
    blocks
}

#[test]
fn scenario_valid_chain_is_accepted_and_round_trips_through_store() {
    let priv_key = PrivateKey::from_bytes([1; 32]);
    let consensus = single_validator_config(&priv_key, 100, 0);
    let blocks = build_chain(5, &priv_key, &consensus, |i| {
        vec![Payment::new(format!("payment-{i}"), 0)]
    });

    let mut store = InMemoryBlockStore::new();
    for block in &blocks {
        storage::put_block(&mut store, block);
    }

    assert_eq!(store.len(), 6);
    assert!(chain::validate_chain(&blocks).is_ok());
}

#[test]
fn scenario_transaction_violating_its_own_predicate_is_rejected() {
    let priv_key = PrivateKey::from_bytes([2; 32]);
    let consensus = single_validator_config(&priv_key, 100, 0);
    // `not_before` set far in the future relative to the block timestamps
    // `build_chain` assigns — every block's one transaction is premature.
    let blocks = build_chain(2, &priv_key, &consensus, |_| vec![Payment::new("late", 9_999)]);

    let err = chain::validate_chain(&blocks).unwrap_err();
    assert!(matches!(err, InvalidBlock::InvalidBlockTx { .. }));
}

#[test]
fn scenario_tampered_merkle_root_is_rejected() {
    let priv_key = PrivateKey::from_bytes([3; 32]);
    let consensus = single_validator_config(&priv_key, 100, 0);
    let mut blocks = build_chain(2, &priv_key, &consensus, |i| {
        vec![Payment::new(format!("payment-{i}"), 0)]
    });

    blocks[2].header.merkle_root = Digest([0xaa; 32]);

    let err = chain::validate_chain(&blocks).unwrap_err();
    assert!(matches!(err, InvalidBlock::InvalidBlockMerkleRoot { .. }));
}

#[test]
fn scenario_non_increasing_timestamp_violates_median_rule() {
    let priv_key = PrivateKey::from_bytes([4; 32]);
    let consensus = single_validator_config(&priv_key, 100, 0);
    let mut blocks = build_chain(3, &priv_key, &consensus, |_| vec![]);

    let earlier = blocks[1].header.timestamp;
    blocks[3].header.timestamp = earlier;

    let err = chain::validate_chain(&blocks).unwrap_err();
    assert!(matches!(err, InvalidBlock::InvalidBlockTimestamp { .. }));
}

#[test]
fn scenario_signature_from_non_validator_is_rejected() {
    let priv_key = PrivateKey::from_bytes([5; 32]);
    let outsider = PrivateKey::from_bytes([6; 32]);
    let consensus = single_validator_config(&priv_key, 100, 0);
    let mut blocks = build_chain(2, &priv_key, &consensus, |_| vec![]);

    let header_hash = blocks[2].header_hash();
    blocks[2].signatures[0].signature = crypto::sign(&outsider, header_hash.as_bytes());
    blocks[2].signatures[0].signer_addr = crypto::address(&crypto::public_key(&outsider));

    let err = chain::validate_chain(&blocks).unwrap_err();
    assert!(matches!(err, InvalidBlock::InvalidBlockSigner { .. }));
}

#[test]
fn scenario_one_origin_exceeding_generation_limit_is_rejected() {
    let priv_key = PrivateKey::from_bytes([7; 32]);
    // Only one validator exists, so it authors every block; a
    // generation_limit of 2 is violated by the third consecutive block.
    let consensus = single_validator_config(&priv_key, 2, 0);
    let blocks = build_chain(4, &priv_key, &consensus, |_| vec![]);

    let err = chain::validate_chain(&blocks).unwrap_err();
    assert!(matches!(err, InvalidBlock::InvalidBlockOrigin { .. }));
}

#[test]
fn scenario_block_below_min_txs_is_rejected() {
    let priv_key = PrivateKey::from_bytes([8; 32]);
    let consensus = single_validator_config(&priv_key, 100, 1);
    let blocks = build_chain(1, &priv_key, &consensus, |_| vec![]);

    let err = chain::validate_chain(&blocks).unwrap_err();
    assert!(matches!(err, InvalidBlock::InvalidBlockTxCount { .. }));
}
