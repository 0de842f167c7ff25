//! Script opcodes referenced by the bet templates
//!
//! Reference: Bitcoin Core `script/script.h`

/// OP_0 / OP_FALSE - Push empty array
pub const OP_FALSE: u8 = 0x00;

/// Largest direct push length
pub const MAX_DIRECT_PUSH: u8 = 0x4b;

/// OP_PUSHDATA1 - Push next byte as data length
pub const OP_PUSHDATA1: u8 = 0x4c;

/// OP_PUSHDATA2 - Push next 2 bytes (little-endian) as data length
pub const OP_PUSHDATA2: u8 = 0x4d;

/// OP_PUSHDATA4 - Push next 4 bytes (little-endian) as data length
pub const OP_PUSHDATA4: u8 = 0x4e;

/// OP_1 / OP_TRUE - Push 1 onto stack
pub const OP_TRUE: u8 = 0x51;

pub const OP_IF: u8 = 0x63;
pub const OP_ELSE: u8 = 0x67;
pub const OP_ENDIF: u8 = 0x68;

/// OP_RETURN - marks a data-carrier output
pub const OP_RETURN: u8 = 0x6a;

pub const OP_DROP: u8 = 0x75;
pub const OP_DUP: u8 = 0x76;
pub const OP_EQUAL: u8 = 0x87;
pub const OP_EQUALVERIFY: u8 = 0x88;
pub const OP_HASH160: u8 = 0xa9;
pub const OP_CHECKSIG: u8 = 0xac;
