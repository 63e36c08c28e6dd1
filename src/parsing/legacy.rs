//! Parsers for the two dot-delimited fragment formats that predate the
//! binary one. Only decoding is supported; links in these formats still
//! exist in the wild, nothing writes them any more.
//!
//! Both formats start with `bpm.swing.kit`. Fields are read leniently: an
//! empty field is 0 and an unparsable one takes the field's fallback, so an
//! old link always restores *something* once its shape is recognised.

use crate::error::{Result, StateError};
use crate::state::{
    percent_to_volume, BeatState, Grid, Kit, DEFAULT_BPM, DEFAULT_STEPS, DEFAULT_VOLUME,
    MAX_BPM, MAX_SWING, MIN_BPM, TRACK_COUNT,
};

/// Lenient numeric field, read the way a browser's `Number()` reads it:
/// surrounding whitespace ignored, empty reads as 0, `0x`/`0o`/`0b` radix
/// literals and `Infinity` accepted, fractions truncated toward zero.
/// Anything else is `None`. Infinities and oversized literals saturate.
pub(crate) fn parse_field(field: &str) -> Option<i64> {
    let field = field.trim();
    if field.is_empty() {
        return Some(0);
    }
    if let Ok(n) = field.parse::<i64>() {
        return Some(n);
    }
    match field {
        "Infinity" | "+Infinity" => return Some(i64::MAX),
        "-Infinity" => return Some(i64::MIN),
        _ => {}
    }

    let radix = match field.get(..2) {
        Some("0x" | "0X") => Some(16),
        Some("0o" | "0O") => Some(8),
        Some("0b" | "0B") => Some(2),
        _ => None,
    };
    if let Some(radix) = radix {
        let digits = &field[2..];
        if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
            return None;
        }
        // Only overflow is left to fail.
        return Some(i64::from_str_radix(digits, radix).unwrap_or(i64::MAX));
    }

    // Rust also reads "inf" and "nan"; browsers do not.
    field
        .parse::<f64>()
        .ok()
        .filter(|f| f.is_finite())
        .map(|f| f.trunc() as i64)
}

/// `bpm.swing.kit` prefix shared by both formats. Zero or unparsable bpm
/// falls back to the default tempo, zero or unparsable swing to none.
fn parse_scalars(parts: &[&str]) -> (u16, u8, Kit) {
    let bpm = match parse_field(parts[0]) {
        Some(n) if n != 0 => n,
        _ => i64::from(DEFAULT_BPM),
    };
    let swing = parse_field(parts[1]).unwrap_or(0);
    let kit = parse_field(parts[2]).map_or(Kit::Tr808, Kit::from_index_or_default);

    (
        bpm.clamp(i64::from(MIN_BPM), i64::from(MAX_BPM)) as u16,
        swing.clamp(0, i64::from(MAX_SWING)) as u8,
        kit,
    )
}

/// Volumes stored as decimal percents starting at `parts[first]`. Missing or
/// unparsable fields read as the default volume.
fn parse_volumes(parts: &[&str], first: usize) -> [f32; TRACK_COUNT] {
    let mut volumes = [DEFAULT_VOLUME; TRACK_COUNT];
    for (i, v) in volumes.iter_mut().enumerate() {
        if let Some(percent) = parts.get(first + i).and_then(|f| parse_field(f)) {
            *v = percent_to_volume(percent.clamp(0, 100) as u8);
        }
    }
    volumes
}

/// Intermediate format:
/// `bpm.swing.kit.steps.row0…row7.vol0…vol7` with each row in hex, four
/// steps per digit, least significant bit first.
pub struct HexRowsParser;

impl HexRowsParser {
    /// Minimum field count: three scalars, the step count, eight rows.
    pub const MIN_FIELDS: usize = 4 + TRACK_COUNT;
    pub const MIN_STEPS: usize = 4;
    pub const MAX_STEPS: usize = 64;

    /// Whether `parts` has the hex-row shape: enough fields, a step count
    /// field in range, and a first row made only of hex digits.
    pub fn matches(parts: &[&str]) -> bool {
        parts.len() >= Self::MIN_FIELDS
            && Self::step_count(parts).is_some()
            && !parts[4].is_empty()
            && parts[4].bytes().all(|b| b.is_ascii_hexdigit())
    }

    fn step_count(parts: &[&str]) -> Option<usize> {
        let n = usize::try_from(parse_field(parts.get(3)?)?).ok()?;
        ((Self::MIN_STEPS..=Self::MAX_STEPS).contains(&n) && n % 4 == 0).then_some(n)
    }

    pub fn parse(parts: &[&str]) -> Result<BeatState> {
        if !Self::matches(parts) {
            return Err(StateError::UnknownFormat);
        }
        let step_count = Self::step_count(parts).ok_or(StateError::UnknownFormat)?;
        let (bpm, swing, kit) = parse_scalars(parts);

        let mut grid = Grid::new(step_count)?;
        for track in 0..TRACK_COUNT {
            let row = grid.row_mut(track);
            for (digit, c) in parts[4 + track].chars().enumerate() {
                // Non-hex characters contribute no hits.
                let nibble = c.to_digit(16).unwrap_or(0);
                for bit in 0..4 {
                    if let Some(cell) = row.get_mut(digit * 4 + bit) {
                        *cell = (nibble >> bit) & 1 != 0;
                    }
                }
            }
        }

        Ok(BeatState {
            grid,
            bpm,
            swing,
            kit,
            volumes: parse_volumes(parts, 4 + TRACK_COUNT),
        })
    }
}

/// Oldest format: `bpm.swing.kit.row0…row7.vol0…vol7` with each row a
/// decimal bitmask of a 16-step bar (bit `c` is step `c`).
pub struct BitmaskParser;

impl BitmaskParser {
    pub const MIN_FIELDS: usize = 3 + TRACK_COUNT;

    pub fn matches(parts: &[&str]) -> bool {
        parts.len() >= Self::MIN_FIELDS
    }

    pub fn parse(parts: &[&str]) -> Result<BeatState> {
        if !Self::matches(parts) {
            return Err(StateError::UnknownFormat);
        }
        let (bpm, swing, kit) = parse_scalars(parts);

        // Always one bar, whatever the masks contain.
        let mut grid = Grid::new(DEFAULT_STEPS)?;
        for track in 0..TRACK_COUNT {
            let mask = parse_field(parts[3 + track]).unwrap_or(0);
            for (step, cell) in grid.row_mut(track).iter_mut().enumerate() {
                *cell = (mask >> step) & 1 != 0;
            }
        }

        Ok(BeatState {
            grid,
            bpm,
            swing,
            kit,
            volumes: parse_volumes(parts, 3 + TRACK_COUNT),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Track;

    fn split(s: &str) -> Vec<&str> {
        s.split('.').collect()
    }

    fn hits(row: &[bool]) -> Vec<usize> {
        row.iter()
            .enumerate()
            .filter(|(_, &hit)| hit)
            .map(|(step, _)| step)
            .collect()
    }

    #[test]
    fn test_parse_field() {
        assert_eq!(parse_field("120"), Some(120));
        assert_eq!(parse_field(" 7 "), Some(7));
        assert_eq!(parse_field(""), Some(0));
        assert_eq!(parse_field("-3"), Some(-3));
        assert_eq!(parse_field("12.9"), Some(12));
        assert_eq!(parse_field("abc"), None);
        assert_eq!(parse_field("NaN"), None);
        assert_eq!(parse_field("inf"), None);
    }

    #[test]
    fn test_parse_field_number_literals() {
        assert_eq!(parse_field("1e2"), Some(100));
        assert_eq!(parse_field("0x10"), Some(16));
        assert_eq!(parse_field("0XfF"), Some(255));
        assert_eq!(parse_field("0o17"), Some(15));
        assert_eq!(parse_field("0b101"), Some(5));
        assert_eq!(parse_field("0x"), None);
        assert_eq!(parse_field("0x-1"), None);
        assert_eq!(parse_field("0b102"), None);
        assert_eq!(parse_field("0xffffffffffffffffff"), Some(i64::MAX));
        assert_eq!(parse_field("Infinity"), Some(i64::MAX));
        assert_eq!(parse_field("-Infinity"), Some(i64::MIN));
        assert_eq!(parse_field("infinity"), None);
    }

    #[test]
    fn test_bitmask_number_literals() {
        let state = BitmaskParser::parse(&split("1e2.0x10.2.0x3.7.0.0.0.0.0.0.0")).unwrap();
        assert_eq!(state.bpm, 100);
        assert_eq!(state.swing, 16);
        assert_eq!(state.kit, Kit::Electronic);
        assert_eq!(hits(state.grid.row(Track::Kick)), [0, 1]);
        assert_eq!(hits(state.grid.row(Track::Snare)), [0, 1, 2]);

        let state = BitmaskParser::parse(&split("Infinity.Infinity.0.0.0.0.0.0.0.0.0")).unwrap();
        assert_eq!(state.bpm, 240);
        assert_eq!(state.swing, 80);
        let state = BitmaskParser::parse(&split("-Infinity.0.0.0.0.0.0.0.0.0.0")).unwrap();
        assert_eq!(state.bpm, 40);
    }

    #[test]
    fn test_long_step_field_reads_as_bitmask() {
        let parts = split("120.0.0.128.ff.0.0.0.0.0.0.0");
        assert!(!HexRowsParser::matches(&parts));
        let state = BitmaskParser::parse(&parts).unwrap();
        assert_eq!(state.step_count(), 16);
        // "128" is the kick mask, "ff" is not a decimal number.
        assert_eq!(hits(state.grid.row(Track::Kick)), [7]);
        assert!(hits(state.grid.row(Track::Snare)).is_empty());
    }

    #[test]
    fn test_bitmask_format() {
        let parts = split("120.0.0.1.2.4.8.16.32.64.128.256.80.80.80.80.80.80.80.80");
        assert!(!HexRowsParser::matches(&parts));
        let state = BitmaskParser::parse(&parts).unwrap();

        assert_eq!(state.bpm, 120);
        assert_eq!(state.swing, 0);
        assert_eq!(state.kit, Kit::Tr808);
        assert_eq!(state.step_count(), 16);
        for (track, &t) in Track::ALL.iter().enumerate() {
            assert_eq!(hits(state.grid.row(t)), [track], "{:?}", t);
        }
        // Ninth numeric field lands in the first volume slot and is clamped.
        assert_eq!(state.volumes[0], 1.0);
        assert_eq!(state.volumes[1..], [0.8f32; TRACK_COUNT - 1]);
    }

    #[test]
    fn test_bitmask_fallbacks() {
        // Zero bpm -> default, garbage kit -> 808, garbage row -> empty,
        // missing volumes -> default, volume out of range clamped.
        let parts = split("0.x.zz.65535.junk.0.0.0.0.0.0.150.-5");
        let state = BitmaskParser::parse(&parts).unwrap();
        assert_eq!(state.bpm, 120);
        assert_eq!(state.swing, 0);
        assert_eq!(state.kit, Kit::Tr808);
        assert_eq!(hits(state.grid.row(Track::Kick)).len(), 16);
        assert!(hits(state.grid.row(Track::Snare)).is_empty());
        assert_eq!(state.volumes[0], 1.0);
        assert_eq!(state.volumes[1], 0.0);
        assert_eq!(state.volumes[2], 0.8);
    }

    #[test]
    fn test_bitmask_clamps_scalars() {
        let state = BitmaskParser::parse(&split("999.95.4.0.0.0.0.0.0.0.0")).unwrap();
        assert_eq!(state.bpm, 240);
        assert_eq!(state.swing, 80);
        assert_eq!(state.kit, Kit::Industrial);
        let state = BitmaskParser::parse(&split("12.-4.0.0.0.0.0.0.0.0.0")).unwrap();
        assert_eq!(state.bpm, 40);
        assert_eq!(state.swing, 0);
    }

    #[test]
    fn test_bitmask_too_few_fields() {
        assert_eq!(
            BitmaskParser::parse(&split("120.0.0.1.2.3")),
            Err(StateError::UnknownFormat)
        );
    }

    #[test]
    fn test_hex_rows_format() {
        // 32 steps: kick "1111" in hex digits = step 0 of each group of 4.
        let parts = split("128.20.2.32.11111111.0000f000.5555.0.0.0.0.8.100.90.80.70.60.50.40.30");
        assert!(HexRowsParser::matches(&parts));
        let state = HexRowsParser::parse(&parts).unwrap();

        assert_eq!(state.bpm, 128);
        assert_eq!(state.swing, 20);
        assert_eq!(state.kit, Kit::Electronic);
        assert_eq!(state.step_count(), 32);
        assert_eq!(hits(state.grid.row(Track::Kick)), [0, 4, 8, 12, 16, 20, 24, 28]);
        assert_eq!(hits(state.grid.row(Track::Snare)), [16, 17, 18, 19]);
        assert_eq!(hits(state.grid.row(Track::Hihat)), [0, 2, 4, 6, 8, 10, 12, 14]);
        assert_eq!(hits(state.grid.row(Track::Cowbell)), [3]);
        assert_eq!(state.volumes[0], 1.0);
        assert_eq!(state.volumes[7], 0.3);
    }

    #[test]
    fn test_hex_rows_ignores_overflow_digits() {
        let parts = split("120.0.0.4.ff.1.1.1.1.1.1.1");
        let state = HexRowsParser::parse(&parts).unwrap();
        assert_eq!(state.step_count(), 4);
        assert_eq!(hits(state.grid.row(Track::Kick)), [0, 1, 2, 3]);
        assert_eq!(state.volumes, [0.8; TRACK_COUNT]);
    }

    #[test]
    fn test_hex_rows_shape() {
        // Step count out of range or not a multiple of four.
        assert!(!HexRowsParser::matches(&split("120.0.0.68.1.0.0.0.0.0.0.0")));
        assert!(!HexRowsParser::matches(&split("120.0.0.6.1.0.0.0.0.0.0.0")));
        // First row not hex.
        assert!(!HexRowsParser::matches(&split("120.0.0.16.xyz.0.0.0.0.0.0.0")));
        // Too few fields.
        assert!(!HexRowsParser::matches(&split("120.0.0.16.1.0.0")));
    }
}
