//! Games consensus constants

/// Maximum money supply in base units
pub const MAX_MONEY: i64 = 21_000_000 * 100_000_000;

/// Highest transaction version considered standard
pub const MAX_STANDARD_VERSION: i32 = 2;

/// Maximum number of wager numbers one redemption script may encode
pub const MAX_BET_NUMBERS: usize = 18;

/// Size in bytes of one encoded wager number
pub const BET_NUMBER_SIZE: usize = 4;

/// Size of the public-key-hash push (length byte + HASH160)
pub const PUBKEY_HASH_PUSH_SIZE: usize = 21;

/// Delimiter between per-output segments of a bet descriptor
pub const SEGMENT_DELIMITER: char = '+';

/// Delimiter introducing the amount suffix of a qualified bet
pub const QUALIFIER_DELIMITER: char = '_';

// Activation heights (mainnet)

/// Redefinition of roulette bet number semantics
pub const ROULETTE_NEW_DEFS: u64 = 108_600;

/// Correction of make-bet transaction format checks
pub const MAKEBET_FORMAT_VERIFY: u64 = 177_750;

/// Correction of settlement (get-bet) verification
pub const GETBET_NEW_VERIFY: u64 = 169_757;

/// Introduction of the per-transaction potential payoff cap
pub const MAKEBET_REWARD_LIMIT: u64 = 177_750;

/// Halving interval of the default subsidy schedule
pub const HALVING_INTERVAL: u64 = 210_000;

/// Initial block subsidy of the default schedule
pub const INITIAL_SUBSIDY: i64 = 50 * 100_000_000;
