//! Bet descriptor extraction and parsing
//!
//! A wager-placement transaction commits to its bet choices in a single
//! data-carrier output: `OP_RETURN <push descriptor>`. The descriptor is a
//! `+`-separated list of segments, one per staked output, in output order.

use std::fmt;

use tracing::warn;

use crate::constants::{QUALIFIER_DELIMITER, SEGMENT_DELIMITER};
use crate::error::{ConsensusError, Result};
use crate::opcodes::*;
use crate::types::Transaction;

/// Shape of a single bet segment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    /// Decimal digits only. `None` when the digits do not fit in 32 bits.
    Lottery(Option<u32>),
    /// `name_N`: decimal amount after the last underscore. `None` when the
    /// suffix is not a number.
    Qualified(Option<u32>),
    /// Anything else, including a trailing underscore with no suffix.
    Named,
}

/// One `+`-delimited segment of a descriptor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BetSegment {
    text: String,
    kind: SegmentKind,
}

impl BetSegment {
    pub fn parse(text: &str) -> Self {
        let kind = if text.bytes().all(|b| b.is_ascii_digit()) {
            SegmentKind::Lottery(text.parse().ok())
        } else {
            match text.rfind(QUALIFIER_DELIMITER) {
                Some(pos) if pos + 1 < text.len() => {
                    SegmentKind::Qualified(parse_decimal(&text[pos + 1..]))
                }
                _ => SegmentKind::Named,
            }
        };
        Self { text: text.to_string(), kind }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn kind(&self) -> SegmentKind {
        self.kind
    }

    pub fn is_lottery(&self) -> bool {
        matches!(self.kind, SegmentKind::Lottery(_))
    }
}

impl fmt::Display for BetSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Whole-string decimal parse of a qualifier suffix.
///
/// Stricter than a leading-digits parse: `split_4x`, `split_-3` and
/// `split_+3` have no amount (`Qualified(None)`), which the format
/// validator rejects. Deployed nodes that read only the leading digits
/// accept `split_4x` as amount 4 when the reward policy prices it.
fn parse_decimal(text: &str) -> Option<u32> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

/// Ordered per-output bet segments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BetDescriptor {
    raw: String,
    segments: Vec<BetSegment>,
}

impl BetDescriptor {
    pub fn parse(raw: &str) -> Result<Self> {
        if raw.is_empty() {
            return Err(ConsensusError::Descriptor("empty bet descriptor".to_string()));
        }
        let segments = raw.split(SEGMENT_DELIMITER).map(BetSegment::parse).collect();
        Ok(Self { raw: raw.to_string(), segments })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn segments(&self) -> &[BetSegment] {
        &self.segments
    }

    /// Segment paired with output `index`
    pub fn segment(&self, index: usize) -> Option<&BetSegment> {
        self.segments.get(index)
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

impl fmt::Display for BetDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Descriptor together with the index of the output carrying it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataCarrier {
    pub descriptor: BetDescriptor,
    pub output_index: usize,
}

/// Decode the payload of an `OP_RETURN` script.
///
/// The declared push length must equal the number of bytes that follow it.
pub fn decode_data_carrier(script: &[u8]) -> Result<&[u8]> {
    let format_error = |msg: String| ConsensusError::Descriptor(msg);

    if script.first() != Some(&OP_RETURN) {
        return Err(format_error("missing OP_RETURN marker".to_string()));
    }
    let order = *script
        .get(1)
        .ok_or_else(|| format_error("OP_RETURN without payload".to_string()))?;

    let (width, data_start) = match order {
        0..=MAX_DIRECT_PUSH => (0, 2),
        OP_PUSHDATA1 => (1, 3),
        OP_PUSHDATA2 => (2, 4),
        OP_PUSHDATA4 => (4, 6),
        _ => return Err(format_error(format!("push opcode 0x{:02x} is too large", order))),
    };
    if script.len() < data_start {
        return Err(format_error("truncated push length".to_string()));
    }

    let declared = if width == 0 {
        order as usize
    } else {
        let mut len = [0u8; 4];
        len[..width].copy_from_slice(&script[2..2 + width]);
        u32::from_le_bytes(len) as usize
    };
    let data = &script[data_start..];
    if data.len() != declared {
        return Err(format_error(format!(
            "declared length {} but {} bytes present",
            declared,
            data.len()
        )));
    }
    Ok(data)
}

/// Find the first data-carrier output after output 0 and parse its descriptor.
pub fn extract_descriptor(tx: &Transaction) -> Result<DataCarrier> {
    let carrier = tx
        .outputs
        .iter()
        .enumerate()
        .skip(1)
        .find(|(_, output)| output.script_pubkey.first() == Some(&OP_RETURN));

    let Some((output_index, output)) = carrier else {
        warn!("no data-carrier output");
        return Err(ConsensusError::Descriptor("no data-carrier output".to_string()));
    };

    let data = decode_data_carrier(&output.script_pubkey).map_err(|err| {
        warn!(output_index, %err, "bad data-carrier output");
        err
    })?;
    let raw = std::str::from_utf8(data)
        .map_err(|e| ConsensusError::Descriptor(format!("descriptor is not UTF-8: {}", e)))?;
    let descriptor = BetDescriptor::parse(raw)?;
    Ok(DataCarrier { descriptor, output_index })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{data_carrier_script, PushForm};
    use crate::types::TransactionOutput;

    fn tx_with_outputs(scripts: Vec<Vec<u8>>) -> Transaction {
        Transaction {
            version: 1,
            inputs: vec![],
            outputs: scripts
                .into_iter()
                .map(|script_pubkey| TransactionOutput { value: 0, script_pubkey })
                .collect(),
            lock_time: 0,
        }
    }

    #[test]
    fn test_segment_kinds() {
        assert_eq!(BetSegment::parse("17").kind(), SegmentKind::Lottery(Some(17)));
        assert_eq!(BetSegment::parse("").kind(), SegmentKind::Lottery(None));
        assert_eq!(BetSegment::parse("99999999999").kind(), SegmentKind::Lottery(None));
        assert_eq!(BetSegment::parse("split_4").kind(), SegmentKind::Qualified(Some(4)));
        assert_eq!(BetSegment::parse("a_b_0").kind(), SegmentKind::Qualified(Some(0)));
        assert_eq!(BetSegment::parse("split_x").kind(), SegmentKind::Qualified(None));
        assert_eq!(BetSegment::parse("split_4x").kind(), SegmentKind::Qualified(None));
        assert_eq!(BetSegment::parse("split_-3").kind(), SegmentKind::Qualified(None));
        assert_eq!(BetSegment::parse("split_+3").kind(), SegmentKind::Qualified(None));
        assert_eq!(BetSegment::parse("red").kind(), SegmentKind::Named);
        assert_eq!(BetSegment::parse("red_").kind(), SegmentKind::Named);
    }

    #[test]
    fn test_descriptor_segments_in_order() {
        let descriptor = BetDescriptor::parse("7+red+split_4").unwrap();
        let texts: Vec<&str> = descriptor.segments().iter().map(|s| s.as_str()).collect();
        assert_eq!(texts, vec!["7", "red", "split_4"]);
        assert_eq!(descriptor.segment(1).unwrap().as_str(), "red");
        assert!(descriptor.segment(3).is_none());
    }

    #[test]
    fn test_empty_descriptor_rejected() {
        assert!(BetDescriptor::parse("").is_err());
    }

    #[test]
    fn test_trailing_delimiter_yields_empty_segment() {
        let descriptor = BetDescriptor::parse("7+").unwrap();
        assert_eq!(descriptor.len(), 2);
        assert_eq!(descriptor.segment(1).unwrap().as_str(), "");
    }

    #[test]
    fn test_decode_rejects_length_mismatch() {
        let mut script = data_carrier_script("red", PushForm::Direct).unwrap();
        script[1] = 4;
        assert!(decode_data_carrier(&script).is_err());
        script[1] = 2;
        assert!(decode_data_carrier(&script).is_err());
    }

    #[test]
    fn test_decode_rejects_truncated_headers() {
        assert!(decode_data_carrier(&[OP_RETURN]).is_err());
        assert!(decode_data_carrier(&[OP_RETURN, OP_PUSHDATA2, 0x01]).is_err());
        assert!(decode_data_carrier(&[OP_RETURN, OP_PUSHDATA4, 0, 0, 0]).is_err());
        assert!(decode_data_carrier(&[OP_RETURN, 0x4f]).is_err());
    }

    #[test]
    fn test_extract_skips_output_zero() {
        let carrier = data_carrier_script("7", PushForm::Direct).unwrap();
        let tx = tx_with_outputs(vec![carrier.clone()]);
        assert!(extract_descriptor(&tx).is_err());

        let tx = tx_with_outputs(vec![carrier.clone(), vec![0x51], carrier]);
        let found = extract_descriptor(&tx).unwrap();
        assert_eq!(found.output_index, 2);
        assert_eq!(found.descriptor.as_str(), "7");
    }

    #[test]
    fn test_extract_first_carrier_decides() {
        let mut bad = data_carrier_script("7", PushForm::Direct).unwrap();
        bad[1] = 5;
        let good = data_carrier_script("8", PushForm::Direct).unwrap();
        let tx = tx_with_outputs(vec![vec![], bad, good]);
        assert!(extract_descriptor(&tx).is_err());
    }

    #[test]
    fn test_extract_rejects_invalid_utf8() {
        let tx = tx_with_outputs(vec![vec![], vec![OP_RETURN, 1, 0xff]]);
        assert!(extract_descriptor(&tx).is_err());
    }
}
