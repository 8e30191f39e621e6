//! Validator sets and proposer rotation.

use alloy_primitives::{Address, B256, Bytes};
use bytes::BufMut;
use commonware_codec::{EncodeSize, Write};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::merkle::{merkle_root, sha256};

/// Errors from validator-set construction and updates.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidatorSetError {
    /// Applying the change set would leave the set empty.
    #[error("applying the validator changes would result in empty set")]
    EmptySet,

    /// A zero-power update names a validator that is not in the set.
    #[error("cannot remove unknown validator {0}")]
    UnknownValidator(Address),

    /// A public key has the wrong length for its type.
    #[error("invalid {key_type} key length: expected {expected}, got {got}")]
    InvalidKeyLength {
        /// Key type name.
        key_type: &'static str,
        /// Expected raw key length.
        expected: usize,
        /// Observed raw key length.
        got: usize,
    },
}

/// A validator public key.
///
/// Serialized in genesis documents as `{"type": "...", "value": "0x..."}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum PublicKey {
    /// 32-byte Ed25519 key.
    Ed25519(Bytes),
    /// 33-byte compressed secp256k1 key.
    Secp256k1(Bytes),
}

impl PublicKey {
    /// Type name for Ed25519 keys.
    pub const ED25519_TYPE: &'static str = "ed25519";

    /// Type name for secp256k1 keys.
    pub const SECP256K1_TYPE: &'static str = "secp256k1";

    /// The key's type name, as matched against [`crate::ValidatorParams`].
    pub const fn type_str(&self) -> &'static str {
        match self {
            Self::Ed25519(_) => Self::ED25519_TYPE,
            Self::Secp256k1(_) => Self::SECP256K1_TYPE,
        }
    }

    /// Raw key bytes.
    pub const fn raw(&self) -> &Bytes {
        match self {
            Self::Ed25519(bytes) | Self::Secp256k1(bytes) => bytes,
        }
    }

    /// Check the raw key length against the key type.
    pub fn validate(&self) -> Result<(), ValidatorSetError> {
        let expected = match self {
            Self::Ed25519(_) => 32,
            Self::Secp256k1(_) => 33,
        };
        let got = self.raw().len();
        if got != expected {
            return Err(ValidatorSetError::InvalidKeyLength {
                key_type: self.type_str(),
                expected,
                got,
            });
        }
        Ok(())
    }

    /// Account address: the first 20 bytes of the SHA-256 of the raw key.
    pub fn address(&self) -> Address {
        let digest = sha256(self.raw());
        Address::from_slice(&digest.as_slice()[..20])
    }
}

impl Write for PublicKey {
    fn write(&self, buf: &mut impl BufMut) {
        let tag: u8 = match self {
            Self::Ed25519(_) => 0,
            Self::Secp256k1(_) => 1,
        };
        tag.write(buf);
        self.raw().as_ref().write(buf);
    }
}

impl EncodeSize for PublicKey {
    fn encode_size(&self) -> usize {
        1 + self.raw().as_ref().encode_size()
    }
}

/// A single validator: identity, key, power, and rotation priority.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Validator {
    /// Account address derived from the public key.
    pub address: Address,
    /// Consensus public key.
    pub pub_key: PublicKey,
    /// Voting power.
    pub voting_power: i64,
    /// Proposer rotation priority.
    pub proposer_priority: i64,
}

impl Validator {
    /// Create a validator with zero priority.
    pub fn new(pub_key: PublicKey, voting_power: i64) -> Self {
        Self { address: pub_key.address(), pub_key, voting_power, proposer_priority: 0 }
    }
}

/// A power change announced by the application at end-of-block.
///
/// Power 0 removes the validator; any other power inserts or replaces it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorUpdate {
    /// Consensus public key of the affected validator.
    pub pub_key: PublicKey,
    /// New voting power.
    pub power: i64,
}

/// Translate application updates into validators.
pub fn validators_from_updates(updates: &[ValidatorUpdate]) -> Vec<Validator> {
    updates.iter().map(|u| Validator::new(u.pub_key.clone(), u.power)).collect()
}

/// The set of validators producing commits, with proposer rotation state.
///
/// The set may be empty: a chain running without validators has no proposer
/// and accepts no further validator updates.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ValidatorSet {
    /// Validators ordered by address.
    pub validators: Vec<Validator>,
    /// Current proposer, absent when the set is empty.
    pub proposer: Option<Validator>,
}

impl ValidatorSet {
    /// Build a set from the given validators and rotate once to pick the
    /// initial proposer.
    pub fn new(mut validators: Vec<Validator>) -> Self {
        validators.sort_by(|a, b| a.address.cmp(&b.address));
        let mut set = Self { validators, proposer: None };
        if !set.is_empty() {
            set.increment_proposer_priority(1);
        }
        set
    }

    /// An explicitly empty set with no proposer.
    pub const fn empty() -> Self {
        Self { validators: Vec::new(), proposer: None }
    }

    /// Number of validators.
    pub fn len(&self) -> usize {
        self.validators.len()
    }

    /// Whether the set has no validators.
    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }

    /// Sum of all voting power.
    pub fn total_voting_power(&self) -> i64 {
        self.validators.iter().map(|v| v.voting_power).sum()
    }

    /// Look up a validator by address.
    pub fn get(&self, address: &Address) -> Option<&Validator> {
        self.validators.iter().find(|v| v.address == *address)
    }

    /// Apply a change set from the application.
    ///
    /// Zero-power entries remove validators (removing an unknown address is
    /// an error); other entries insert or replace. A change set that leaves
    /// the set empty fails with [`ValidatorSetError::EmptySet`] and leaves
    /// `self` untouched. Fresh entrants start at priority
    /// `-(total + total/8)` so they cannot immediately win rotation.
    pub fn apply_updates(&mut self, changes: &[Validator]) -> Result<(), ValidatorSetError> {
        let mut updated = self.validators.clone();
        let mut entrants: Vec<Address> = Vec::new();

        for change in changes {
            change.pub_key.validate()?;
            let existing = updated.iter().position(|v| v.address == change.address);
            match (existing, change.voting_power) {
                (Some(i), 0) => {
                    updated.remove(i);
                }
                (None, 0) => return Err(ValidatorSetError::UnknownValidator(change.address)),
                (Some(i), power) => {
                    updated[i].voting_power = power;
                }
                (None, _) => {
                    updated.push(change.clone());
                    entrants.push(change.address);
                }
            }
        }

        if updated.is_empty() {
            return Err(ValidatorSetError::EmptySet);
        }

        let total: i64 = updated.iter().map(|v| v.voting_power).sum();
        for validator in &mut updated {
            if entrants.contains(&validator.address) {
                validator.proposer_priority = -(total + total / 8);
            }
        }
        updated.sort_by(|a, b| a.address.cmp(&b.address));

        self.validators = updated;
        if let Some(proposer) = &self.proposer {
            if self.get(&proposer.address).is_none() {
                self.proposer = None;
            }
        }
        Ok(())
    }

    /// Advance proposer rotation by the given number of rounds.
    ///
    /// Each round every validator gains its voting power in priority, the
    /// highest-priority validator (ties break on the lower address) becomes
    /// proposer and pays the total voting power.
    pub fn increment_proposer_priority(&mut self, rounds: u32) {
        if self.is_empty() {
            return;
        }
        let total = self.total_voting_power();
        for _ in 0..rounds {
            for validator in &mut self.validators {
                validator.proposer_priority =
                    validator.proposer_priority.saturating_add(validator.voting_power);
            }
            let max = self
                .validators
                .iter()
                .enumerate()
                .max_by(|(_, a), (_, b)| {
                    a.proposer_priority
                        .cmp(&b.proposer_priority)
                        .then_with(|| b.address.cmp(&a.address))
                })
                .map(|(i, _)| i)
                .unwrap_or_default();
            self.validators[max].proposer_priority -= total;
            self.proposer = Some(self.validators[max].clone());
        }
    }

    /// Merkle root over the canonical `(pub_key, voting_power)` encodings,
    /// in address order. The empty set hashes to the empty merkle root.
    pub fn hash(&self) -> B256 {
        let leaves: Vec<Vec<u8>> = self
            .validators
            .iter()
            .map(|v| {
                let mut leaf = Vec::with_capacity(v.pub_key.encode_size() + 8);
                v.pub_key.write(&mut leaf);
                (v.voting_power as u64).write(&mut leaf);
                leaf
            })
            .collect();
        merkle_root(&leaves)
    }
}

impl Write for Validator {
    fn write(&self, buf: &mut impl BufMut) {
        self.pub_key.write(buf);
        (self.voting_power as u64).write(buf);
    }
}

impl EncodeSize for Validator {
    fn encode_size(&self) -> usize {
        self.pub_key.encode_size() + (self.voting_power as u64).encode_size()
    }
}
