//! Error types for games consensus validation

use thiserror::Error;

/// Failures of the backward/forward script template walk.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    #[error("need {needed} bytes but only {available} remain")]
    OutOfBounds { needed: usize, available: usize },

    #[error("byte 0x{found:02x} at offset {offset}, expected 0x{expected:02x}")]
    Mismatch { offset: usize, expected: u8, found: u8 },

    #[error("no OP_TRUE terminator within the wager limit")]
    UnterminatedChain,

    #[error("backward cursor {backward} does not meet forward cursor {forward}")]
    CursorMismatch { forward: usize, backward: usize },

    #[error("argument push opcode 0x{0:02x} is not a 4-byte push")]
    BadArgumentPush(u8),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConsensusError {
    #[error("Script template mismatch: {0}")]
    ScriptTemplate(#[from] TemplateError),

    #[error("Bet descriptor malformed: {0}")]
    Descriptor(String),

    #[error("Bet format rule violation: {0}")]
    BetFormat(String),

    #[error("Economic validation failed: {0}")]
    EconomicValidation(String),

    #[error("Reference lookup failed: {0}")]
    Reference(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Coarse failure classes; all of them reject the transaction or block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    Format,
    Economic,
    Reference,
    Config,
}

impl ConsensusError {
    pub fn class(&self) -> ErrorClass {
        match self {
            ConsensusError::ScriptTemplate(_)
            | ConsensusError::Descriptor(_)
            | ConsensusError::BetFormat(_)
            | ConsensusError::Serialization(_) => ErrorClass::Format,
            ConsensusError::EconomicValidation(_) => ErrorClass::Economic,
            ConsensusError::Reference(_) => ErrorClass::Reference,
            ConsensusError::Config(_) => ErrorClass::Config,
        }
    }
}

pub type Result<T> = std::result::Result<T, ConsensusError>;
