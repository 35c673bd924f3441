//! Demo binary: builds a small PoA chain in memory and validates it.
//!
//! Runs synchronously: block construction has no suspension points beyond
//! reading the clock, so there is no async runtime, RPC server, or
//! metrics exporter here — just building, storing, and validating blocks.

use std::time::Duration;

use chain::{
    codec, crypto, storage, Block, Clock, CodecError, Digest, InMemoryBlockStore, PoaConfig,
    PrivateKey, SystemClock, Transaction, TxContext,
};

/// A minimal transaction used only to drive this demo; real embedders
/// supply their own `Transaction` implementation.
#[derive(Debug, Clone, PartialEq, Eq)]
struct DemoTx {
    payload: Vec<u8>,
}

impl DemoTx {
    fn new(payload: impl Into<Vec<u8>>) -> Self {
        DemoTx {
            payload: payload.into(),
        }
    }
}

impl Transaction for DemoTx {
    fn tx_hash_hex(&self) -> String {
        crypto::hash(&self.payload).to_hex()
    }

    fn validate(&self, _ctx: &TxContext) -> Result<(), chain::InvalidTransaction> {
        Ok(())
    }

    fn encode(&self, out: &mut Vec<u8>) {
        codec::encode_bytes_lp(out, &self.payload);
    }

    fn decode(buf: &[u8]) -> Result<(Self, usize), CodecError> {
        let mut cur = codec::Cursor::new(buf);
        let payload = codec::decode_bytes_lp(&mut cur, "DemoTx.payload")?;
        Ok((DemoTx { payload }, cur.position()))
    }
}

fn main() {
    tracing_subscriber::fmt::init();

    let priv_key = PrivateKey::generate(&mut rand_core::OsRng);
    let pub_key = crypto::public_key(&priv_key);
    let origin = crypto::address(&pub_key);

    let consensus = PoaConfig::new(vec![pub_key], Duration::from_secs(2), 10, 1, 1, 0)
        .expect("demo consensus config is internally consistent");

    let clock = SystemClock;
    let mut store = InMemoryBlockStore::new();

    let genesis: Block<DemoTx> = Block::genesis(Digest([0u8; 32]), clock.now(), consensus.clone());
    let mut prev_hash = genesis.header_hash();
    tracing::info!(hash = %prev_hash.to_hex(), "built genesis block");
    storage::put_block(&mut store, &genesis);

    for i in 1..=5u64 {
        let block = Block::new(
            origin,
            prev_hash,
            vec![DemoTx::new(format!("tx-{i}"))],
            i,
            &priv_key,
            consensus.clone(),
            &clock,
        );
        prev_hash = block.header_hash();
        tracing::info!(index = i, hash = %prev_hash.to_hex(), "built block");
        storage::put_block(&mut store, &block);
        std::thread::sleep(Duration::from_millis(10));
    }

    // Read every block back through storage's decode-and-revalidate path
    // rather than trusting the in-memory values just built.
    let blocks: Vec<Block<DemoTx>> = (0..store.len() as u64)
        .map(|i| {
            storage::get_block(&store, i)
                .expect("stored block decodes and revalidates")
                .expect("index within bounds")
        })
        .collect();

    match chain::validate_chain(&blocks) {
        Ok(()) => tracing::info!(len = blocks.len(), "chain validated"),
        Err(e) => tracing::error!(error = %e, "chain failed validation"),
    }
}
