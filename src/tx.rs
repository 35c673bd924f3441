//! Transaction collaborator.
//!
//! The core depends on transactions only through this trait: a stable
//! hex-encoded hash and a validity predicate parameterised by the
//! containing block's timestamp. Concrete transaction semantics (account
//! state, execution) live entirely outside the core.
//!
//! Kept as a trait, rather than a closed enum of concrete transaction
//! kinds, so the core stays agnostic of account state and execution.

use crate::error::{CodecError, InvalidTransaction};

/// Context made available to a transaction's validity predicate.
///
/// Currently carries only the containing block's timestamp; kept as a
/// struct rather than a bare `u64` so it can grow without breaking every
/// implementor.
#[derive(Debug, Clone, Copy)]
pub struct TxContext {
    pub block_timestamp: u64,
}

/// A transaction the core can hash, validate, and canonically encode.
pub trait Transaction: Clone + std::fmt::Debug {
    /// Stable, hex-encoded hash of this transaction.
    fn tx_hash_hex(&self) -> String;

    /// Standalone validity predicate, given the containing block's context.
    fn validate(&self, ctx: &TxContext) -> Result<(), InvalidTransaction>;

    /// Appends this transaction's canonical encoding to `out`.
    fn encode(&self, out: &mut Vec<u8>);

    /// Decodes a transaction from the front of `buf`, returning the value
    /// and the number of bytes consumed.
    fn decode(buf: &[u8]) -> Result<(Self, usize), CodecError>
    where
        Self: Sized;
}

#[cfg(test)]
pub(crate) mod fixture {
    //! A minimal `Transaction` implementation used only by this crate's own
    //! tests, standing in for a real ledger transaction type.

    use super::*;
    use crate::codec::{decode_bytes_lp, decode_u64, encode_bytes_lp, encode_u64, Cursor};
    use crate::crypto::hash;

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct PlainTx {
        pub payload: Vec<u8>,
        pub not_before: u64,
    }

    impl PlainTx {
        pub fn new(payload: impl Into<Vec<u8>>, not_before: u64) -> Self {
            PlainTx {
                payload: payload.into(),
                not_before,
            }
        }
    }

    impl Transaction for PlainTx {
        fn tx_hash_hex(&self) -> String {
            hash(&self.payload).to_hex()
        }

        fn validate(&self, ctx: &TxContext) -> Result<(), InvalidTransaction> {
            if ctx.block_timestamp < self.not_before {
                return Err(InvalidTransaction(format!(
                    "tx not valid before {} (block timestamp {})",
                    self.not_before, ctx.block_timestamp
                )));
            }
            Ok(())
        }

        fn encode(&self, out: &mut Vec<u8>) {
            encode_bytes_lp(out, &self.payload);
            encode_u64(out, self.not_before);
        }

        fn decode(buf: &[u8]) -> Result<(Self, usize), CodecError> {
            let mut cur = Cursor::new(buf);
            let payload = decode_bytes_lp(&mut cur, "PlainTx.payload")?;
            let not_before = decode_u64(&mut cur, "PlainTx.not_before")?;
            Ok((PlainTx { payload, not_before }, cur.position()))
        }
    }

    #[test]
    fn plain_tx_roundtrips() {
        let tx = PlainTx::new(b"hello".to_vec(), 1000);
        let mut buf = Vec::new();
        tx.encode(&mut buf);
        let (decoded, consumed) = PlainTx::decode(&buf).unwrap();
        assert_eq!(decoded, tx);
        assert_eq!(consumed, buf.len());
    }

    #[test]
    fn plain_tx_validity_depends_on_block_timestamp() {
        let tx = PlainTx::new(b"hello".to_vec(), 1000);
        assert!(tx.validate(&TxContext { block_timestamp: 999 }).is_err());
        assert!(tx.validate(&TxContext { block_timestamp: 1000 }).is_ok());
    }
}
