//! Transaction serialization and wager tagging

use sha2::{Digest, Sha256};

use crate::constants::MAX_STANDARD_VERSION;
use crate::types::*;

/// Whether `tx` is tagged as a wager placement.
///
/// The tag is the version XOR-ed with the network indicator; the untagged
/// version must be a standard one.
pub fn is_make_bet_tx(tx: &Transaction, make_bet_indicator: i32) -> bool {
    is_make_bet_version(tx.version, make_bet_indicator)
}

pub fn is_make_bet_version(version: i32, make_bet_indicator: i32) -> bool {
    let untagged = version ^ make_bet_indicator;
    (1..=MAX_STANDARD_VERSION).contains(&untagged)
}

fn write_compact_size(bytes: &mut Vec<u8>, n: usize) {
    match n {
        0..=0xfc => bytes.push(n as u8),
        0xfd..=0xffff => {
            bytes.push(0xfd);
            bytes.extend_from_slice(&(n as u16).to_le_bytes());
        }
        0x1_0000..=0xffff_ffff => {
            bytes.push(0xfe);
            bytes.extend_from_slice(&(n as u32).to_le_bytes());
        }
        _ => {
            bytes.push(0xff);
            bytes.extend_from_slice(&(n as u64).to_le_bytes());
        }
    }
}

/// Legacy (non-witness) serialization
pub fn serialize_transaction(tx: &Transaction) -> Vec<u8> {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(&tx.version.to_le_bytes());

    write_compact_size(&mut bytes, tx.inputs.len());
    for input in &tx.inputs {
        bytes.extend_from_slice(&input.prevout.hash);
        bytes.extend_from_slice(&input.prevout.index.to_le_bytes());
        write_compact_size(&mut bytes, input.script_sig.len());
        bytes.extend_from_slice(&input.script_sig);
        bytes.extend_from_slice(&input.sequence.to_le_bytes());
    }

    write_compact_size(&mut bytes, tx.outputs.len());
    for output in &tx.outputs {
        bytes.extend_from_slice(&output.value.to_le_bytes());
        write_compact_size(&mut bytes, output.script_pubkey.len());
        bytes.extend_from_slice(&output.script_pubkey);
    }

    bytes.extend_from_slice(&tx.lock_time.to_le_bytes());
    bytes
}

/// SHA256(SHA256(serialized tx))
pub fn calculate_tx_id(tx: &Transaction) -> Hash {
    let hash1 = Sha256::digest(serialize_transaction(tx));
    let hash2 = Sha256::digest(hash1);
    let mut out = [0u8; 32];
    out.copy_from_slice(&hash2);
    out
}

impl Transaction {
    pub fn txid(&self) -> Hash {
        calculate_tx_id(self)
    }
}
