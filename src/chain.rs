//! Ledger lookups consumed by the settlement checks

use std::collections::BTreeMap;

use crate::economic::get_block_subsidy;
use crate::error::{ConsensusError, Result};
use crate::types::*;

/// A transaction together with the hash of the block that mined it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmedTransaction {
    pub tx: Transaction,
    pub block_hash: Hash,
}

/// Read-only view of the ledger.
///
/// Lookups are not retried here; a failure rejects the transaction under
/// validation.
pub trait ChainView {
    fn confirmed_transaction(&self, txid: &Hash) -> Result<ConfirmedTransaction>;

    fn block_subsidy(&self, height: Natural) -> Amount {
        get_block_subsidy(height)
    }
}

/// In-memory ledger index keyed by txid
#[derive(Debug, Clone, Default)]
pub struct MemoryChain {
    transactions: BTreeMap<Hash, ConfirmedTransaction>,
}

impl MemoryChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `tx` as mined in block `block_hash`; returns its txid.
    pub fn insert(&mut self, tx: Transaction, block_hash: Hash) -> Hash {
        let txid = tx.txid();
        self.transactions.insert(txid, ConfirmedTransaction { tx, block_hash });
        txid
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }
}

impl ChainView for MemoryChain {
    fn confirmed_transaction(&self, txid: &Hash) -> Result<ConfirmedTransaction> {
        self.transactions.get(txid).cloned().ok_or_else(|| {
            ConsensusError::Reference(format!("transaction {} not found", display_hash(txid)))
        })
    }
}

/// Hex of the hash in display (reversed) byte order
pub fn display_hash(hash: &Hash) -> String {
    hash.iter().rev().map(|b| format!("{:02x}", b)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tx() -> Transaction {
        Transaction {
            version: 1,
            inputs: vec![],
            outputs: vec![TransactionOutput { value: 5, script_pubkey: vec![] }],
            lock_time: 0,
        }
    }

    #[test]
    fn test_insert_and_lookup() {
        let mut chain = MemoryChain::new();
        let txid = chain.insert(tx(), [7; 32]);
        let found = chain.confirmed_transaction(&txid).unwrap();
        assert_eq!(found.block_hash, [7; 32]);
        assert_eq!(found.tx, tx());
        assert_eq!(chain.len(), 1);
    }

    #[test]
    fn test_missing_lookup_is_reference_error() {
        let chain = MemoryChain::new();
        assert!(matches!(
            chain.confirmed_transaction(&[0; 32]),
            Err(ConsensusError::Reference(_))
        ));
    }

    #[test]
    fn test_display_hash_reversed() {
        let mut hash = [0u8; 32];
        hash[0] = 0xab;
        assert!(display_hash(&hash).ends_with("ab"));
        assert!(display_hash(&hash).starts_with("00"));
    }

    #[test]
    fn test_default_subsidy() {
        let chain = MemoryChain::new();
        assert_eq!(chain.block_subsidy(0), crate::constants::INITIAL_SUBSIDY);
    }
}
