//! Consensus-parameters collaborator: the `PoaConfig` record.
//!
//! A plain `Clone + Debug` data record embedded into the block header,
//! with real cross-field validation: a malformed validator set or
//! threshold would silently make every block unvalidatable.
//!
//! The validator set stores full public keys rather than addresses: an
//! Ed25519 signature cannot be verified, nor a signer's key recovered,
//! from its address alone (the address is a one-way hash of the key), so
//! the config has to carry the keys themselves for `validation` to look
//! a signer up by address and verify against the matching key.

use crate::crypto::{self, Address, PublicKey};
use crate::error::PoaConfigError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Proof-of-Authority consensus parameters, embedded in every block header.
///
/// Field semantics (see `DESIGN.md` for the rationale behind the
/// otherwise-inert fields below):
///
/// - `validator_set`: public keys authorised to originate and sign blocks.
/// - `block_period`: target spacing between blocks; used by the builder
///   to pace proposals, not enforced as a hard validator rule (the
///   median-timestamp rule is the actual timestamp invariant).
/// - `generation_limit`: maximum number of consecutive blocks a single
///   origin may author before another validator must take over; checked
///   chain-wide in `validate_chain`.
/// - `signing_limit`: maximum number of signatures a single block may
///   carry.
/// - `threshold`: minimum number of signatures a single block must carry.
/// - `min_txs`: minimum number of transactions a non-genesis block must
///   contain.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoaConfig {
    validator_set: Vec<PublicKey>,
    pub block_period: Duration,
    pub generation_limit: u64,
    pub signing_limit: u64,
    pub threshold: u64,
    pub min_txs: usize,
}

impl PoaConfig {
    /// Validates and constructs a `PoaConfig`.
    ///
    /// Rejects an empty or duplicated validator set and an inconsistent
    /// `threshold <= signing_limit <= validator_set.len()` ordering.
    pub fn new(
        validator_set: Vec<PublicKey>,
        block_period: Duration,
        generation_limit: u64,
        signing_limit: u64,
        threshold: u64,
        min_txs: usize,
    ) -> Result<Self, PoaConfigError> {
        if validator_set.is_empty() {
            return Err(PoaConfigError::EmptyValidatorSet);
        }

        for i in 0..validator_set.len() {
            for j in (i + 1)..validator_set.len() {
                if validator_set[i].as_bytes() == validator_set[j].as_bytes() {
                    return Err(PoaConfigError::DuplicateValidator(crypto::address(
                        &validator_set[i],
                    )));
                }
            }
        }

        if threshold > validator_set.len() as u64 {
            return Err(PoaConfigError::ThresholdExceedsValidatorCount {
                threshold,
                count: validator_set.len(),
            });
        }

        if signing_limit < threshold {
            return Err(PoaConfigError::SigningLimitBelowThreshold {
                threshold,
                signing_limit,
            });
        }

        if signing_limit > validator_set.len() as u64 {
            return Err(PoaConfigError::SigningLimitExceedsValidatorCount {
                signing_limit,
                count: validator_set.len(),
            });
        }

        Ok(Self {
            validator_set,
            block_period,
            generation_limit,
            signing_limit,
            threshold,
            min_txs,
        })
    }

    /// Returns `true` if `addr` is a member of the validator set.
    pub fn is_validator(&self, addr: &Address) -> bool {
        self.find_validator(addr).is_some()
    }

    /// Looks up a validator's public key by its derived address.
    pub fn find_validator(&self, addr: &Address) -> Option<&PublicKey> {
        self.validator_set
            .iter()
            .find(|pk| crypto::address(pk) == *addr)
    }

    /// Returns the validator set, in the order it was configured.
    pub fn validator_set(&self) -> &[PublicKey] {
        &self.validator_set
    }
}
