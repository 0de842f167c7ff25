//! Block hashing

use sha2::{Digest, Sha256};

use crate::types::*;

/// Serialize block header to its 80-byte consensus form
pub fn serialize_header(header: &BlockHeader) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(80);

    // Version (4 bytes, little-endian)
    bytes.extend_from_slice(&header.version.to_le_bytes());

    // Previous block hash (32 bytes)
    bytes.extend_from_slice(&header.prev_block_hash);

    // Merkle root (32 bytes)
    bytes.extend_from_slice(&header.merkle_root);

    bytes.extend_from_slice(&header.timestamp.to_le_bytes());
    bytes.extend_from_slice(&header.bits.to_le_bytes());
    bytes.extend_from_slice(&header.nonce.to_le_bytes());

    bytes
}

/// SHA256(SHA256(header)), internal byte order
pub fn block_hash(header: &BlockHeader) -> Hash {
    let hash1 = Sha256::digest(serialize_header(header));
    let hash2 = Sha256::digest(hash1);
    let mut out = [0u8; 32];
    out.copy_from_slice(&hash2);
    out
}

/// Low 32 bits of a hash read as a little-endian 256-bit integer.
///
/// These are the last eight hex digits of the hash's display form.
pub fn block_hash_tag(hash: &Hash) -> u32 {
    u32::from_le_bytes([hash[0], hash[1], hash[2], hash[3]])
}

impl BlockHeader {
    pub fn hash(&self) -> Hash {
        block_hash(self)
    }
}
