//! End-to-end use of the `GamesConsensus` facade with file-based parameters

mod common;

use std::io::Write;

use anyhow::Result;
use common::*;
use games_consensus::chain::{ChainView, MemoryChain};
use games_consensus::config::GameParams;
use games_consensus::policy::Policies;
use games_consensus::{GamesConsensus, ValidationResult, GETBET_NEW_VERIFY};
use tempfile::NamedTempFile;

const PREV_BLOCK: [u8; 32] = [0x77; 32];

fn write_params(json: &str) -> Result<NamedTempFile> {
    let mut file = NamedTempFile::new()?;
    file.write_all(json.as_bytes())?;
    file.flush()?;
    Ok(file)
}

#[test]
fn test_load_params_from_file() -> Result<()> {
    let file = write_params(
        r#"{"make_bet_indicator": 4096, "max_reward": 36, "max_payoff": 1000000,
            "activation": {"getbet_new_verify": 10}}"#,
    )?;
    let params = GameParams::load(file.path())?;
    assert_eq!(params.make_bet_indicator, INDICATOR);
    assert_eq!(params.activation.getbet_new_verify, 10);
    Ok(())
}

#[test]
fn test_load_rejects_missing_and_invalid_files() -> Result<()> {
    let dir = tempfile::tempdir()?;
    assert!(GameParams::load(dir.path().join("absent.json")).is_err());

    let file = write_params(r#"{"make_bet_indicator": 1, "max_reward": 0, "max_payoff": 1}"#)?;
    assert!(GameParams::load(file.path()).is_err());
    Ok(())
}

#[test]
fn test_wager_lifecycle() -> Result<()> {
    let file =
        write_params(r#"{"make_bet_indicator": 4096, "max_reward": 36, "max_payoff": 1000000}"#)?;
    let consensus = GamesConsensus::new(GameParams::load(file.path())?);
    let game = Roulette::default();
    let policies = Policies::from_game(&game);

    // placement
    let wager = wager_tx(&[("7", 100), ("red", 40)]);
    assert!(consensus.is_make_bet_tx(&wager));
    assert!(consensus.tx_make_bet_verify(&wager, GETBET_NEW_VERIFY, &game, true).is_valid());
    assert_eq!(consensus.extract_descriptor(&wager)?.output_index, 2);

    let mut chain = MemoryChain::new();
    let prev_txid = chain.insert(wager, PREV_BLOCK);
    assert_eq!(chain.confirmed_transaction(&prev_txid)?.block_hash, PREV_BLOCK);

    // settlement of the lottery bet
    let input = settlement_input(&game, prev_txid, 0, &PREV_BLOCK, &[7], ARGUMENT);
    let matched = consensus.is_input_bet(&input).expect("bet redemption");
    assert_eq!(matched.numbers, vec![7]);

    let tx = settlement_tx(vec![input], 3000);
    let report = consensus.verify_settlement(GETBET_NEW_VERIFY, &tx, 100, 3000, &chain, &policies)?;
    assert_eq!(report.total_reward, 3600);
    assert_eq!(report.fee, 600);
    assert!(!report.has_divergence());

    let (verdict, fee) =
        consensus.check_settlement(GETBET_NEW_VERIFY, &tx, 100, 3000, &chain, &policies);
    assert_eq!(verdict, ValidationResult::Valid);
    assert_eq!(fee, 600);
    Ok(())
}

#[test]
fn test_plain_spend_is_not_a_bet() {
    let consensus = GamesConsensus::new(params());
    let input = games_consensus::TransactionInput {
        prevout: games_consensus::OutPoint { hash: [1; 32], index: 0 },
        script_sig: vec![0x47, 0x30, 0x44],
        sequence: 0,
    };
    assert!(consensus.is_input_bet(&input).is_none());
}
