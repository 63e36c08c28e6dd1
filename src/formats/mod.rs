//! Fragment format detection.
//!
//! Three encodings have been written over time. Detection is purely
//! syntactic and cheap, so [`decode_state`] can dispatch without trying
//! each decoder in turn.
//!
//! | Format | Shape | Decoder |
//! |--------|-------|---------|
//! | [`Arithmetic`] | base64url, no `.` | header + arithmetic-coded grid |
//! | [`HexRows`] | `bpm.swing.kit.steps.<hex rows>.<volumes>` | [`HexRowsParser`] |
//! | [`BitmaskInts`] | `bpm.swing.kit.<16-bit masks>.<volumes>` | [`BitmaskParser`] |
//!
//! [`decode_state`]: crate::decode_state
//! [`Arithmetic`]: DecodedFormat::Arithmetic
//! [`HexRows`]: DecodedFormat::HexRows
//! [`BitmaskInts`]: DecodedFormat::BitmaskInts
//! [`HexRowsParser`]: crate::parsing::HexRowsParser
//! [`BitmaskParser`]: crate::parsing::BitmaskParser

use crate::parsing::{BitmaskParser, HexRowsParser};

/// Field separator of the legacy formats. Never produced by base64url.
pub const LEGACY_SEPARATOR: char = '.';

/// Fragment encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodedFormat {
    /// Current binary format.
    Arithmetic,
    /// Dot-delimited, hex digit per four steps.
    HexRows,
    /// Dot-delimited, one decimal bitmask per 16-step row.
    BitmaskInts,
}

impl DecodedFormat {
    /// Classify a fragment (without its leading `#`).
    ///
    /// Returns `None` for an empty fragment or a dotted one with too few
    /// fields for either legacy format.
    pub fn detect(fragment: &str) -> Option<Self> {
        if fragment.is_empty() {
            return None;
        }
        if !fragment.contains(LEGACY_SEPARATOR) {
            return Some(Self::Arithmetic);
        }

        let parts: Vec<&str> = fragment.split(LEGACY_SEPARATOR).collect();
        if HexRowsParser::matches(&parts) {
            Some(Self::HexRows)
        } else if BitmaskParser::matches(&parts) {
            Some(Self::BitmaskInts)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_arithmetic() {
        assert_eq!(DecodedFormat::detect("UACEEA"), Some(DecodedFormat::Arithmetic));
        // Garbage without dots is still routed to the binary decoder.
        assert_eq!(DecodedFormat::detect("!!!"), Some(DecodedFormat::Arithmetic));
    }

    #[test]
    fn test_detect_legacy() {
        assert_eq!(
            DecodedFormat::detect("120.0.0.1.2.4.8.16.32.64.128.256.80.80.80.80.80.80.80.80"),
            Some(DecodedFormat::BitmaskInts)
        );
        assert_eq!(
            DecodedFormat::detect("120.0.0.16.1111.0.0.0.0.0.0.0.80.80.80.80.80.80.80.80"),
            Some(DecodedFormat::HexRows)
        );
    }

    #[test]
    fn test_long_hex_step_field_is_bitmask() {
        // Hex rows stop at 64 steps; larger step fields read as bitmasks.
        for steps in [68, 128, 256] {
            let fragment = format!("120.0.0.{steps}.ff.0.0.0.0.0.0.0.80.80.80.80.80.80.80.80");
            assert_eq!(
                DecodedFormat::detect(&fragment),
                Some(DecodedFormat::BitmaskInts),
                "{steps} steps"
            );
        }
        assert_eq!(
            DecodedFormat::detect("120.0.0.64.ff.0.0.0.0.0.0.0"),
            Some(DecodedFormat::HexRows)
        );
    }

    #[test]
    fn test_detect_fails_closed() {
        assert_eq!(DecodedFormat::detect(""), None);
        assert_eq!(DecodedFormat::detect("1.2.3"), None);
        assert_eq!(DecodedFormat::detect("."), None);
    }
}
