//! Binary arithmetic coder with 48-bit fixed-point interval.
//!
//! Classic CACM87-style coder: the interval `[lo, hi)` is narrowed in
//! proportion to the model's counts, then rescaled whenever it falls in the
//! lower half (E1), the upper half (E2) or straddles the midpoint inside the
//! middle half (E3, deferred as `pending` bits). All arithmetic fits in
//! `u64`: the range is below 2^48 and counts stay below 2^10.

use super::bit_io::{BitReader, BitWriter};

/// Interval precision in bits.
pub const PRECISION: u32 = 48;
pub const WHOLE: u64 = 1 << PRECISION;
pub const HALF: u64 = WHOLE >> 1;
pub const QUARTER: u64 = WHOLE >> 2;

/// Split point of `[lo, hi)` giving bit 0 a share of `c0 / (c0 + c1)`.
#[inline]
fn split(lo: u64, hi: u64, c0: u32, c1: u32) -> u64 {
    let total = u64::from(c0) + u64::from(c1);
    lo + (hi - lo) * u64::from(c0) / total
}

/// Encoder state.
#[derive(Debug)]
pub struct ArithEncoder {
    lo: u64,
    hi: u64,
    /// Opposite bits owed after the next resolved bit (E3 underflow).
    pending: u64,
    out: BitWriter,
}

impl ArithEncoder {
    pub fn new() -> Self {
        Self {
            lo: 0,
            hi: WHOLE,
            pending: 0,
            out: BitWriter::new(),
        }
    }

    #[inline]
    fn emit(&mut self, bit: bool) {
        self.out.write_bit(bit);
        self.out.write_repeated(!bit, self.pending);
        self.pending = 0;
    }

    /// Encode one bit given the current counts of 0s and 1s.
    #[inline]
    pub fn encode_bit(&mut self, bit: bool, c0: u32, c1: u32) {
        let mid = split(self.lo, self.hi, c0, c1);
        if bit {
            self.lo = mid;
        } else {
            self.hi = mid;
        }

        loop {
            if self.hi <= HALF {
                self.emit(false);
                self.lo <<= 1;
                self.hi <<= 1;
            } else if self.lo >= HALF {
                self.emit(true);
                self.lo = (self.lo - HALF) << 1;
                self.hi = (self.hi - HALF) << 1;
            } else if self.lo >= QUARTER && self.hi <= HALF + QUARTER {
                self.pending += 1;
                self.lo = (self.lo - QUARTER) << 1;
                self.hi = (self.hi - QUARTER) << 1;
            } else {
                break;
            }
        }
    }

    /// Bits emitted so far, not counting deferred or tail bits.
    pub fn bit_len(&self) -> u64 {
        self.out.bit_len()
    }

    /// Emit the disambiguating tail and return the packed bytes.
    pub fn finish(mut self) -> Vec<u8> {
        self.pending += 1;
        let bit = self.lo >= QUARTER;
        self.emit(bit);
        self.out.finish()
    }

    #[cfg(test)]
    pub fn debug_state(&self) -> (u64, u64, u64) {
        (self.lo, self.hi, self.pending)
    }
}

impl Default for ArithEncoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Decoder state.
///
/// `lo <= value < hi` holds after every step whatever the input bytes are,
/// so decoding garbage yields garbage bits but never underflows.
pub struct ArithDecoder<'a> {
    lo: u64,
    hi: u64,
    value: u64,
    reader: BitReader<'a>,
}

impl<'a> ArithDecoder<'a> {
    /// Prime the value register with the first 48 bits of `data`.
    pub fn new(data: &'a [u8]) -> Self {
        let mut reader = BitReader::new(data);
        let value = reader.read_bits(PRECISION);
        Self {
            lo: 0,
            hi: WHOLE,
            value,
            reader,
        }
    }

    /// Decode one bit given the same counts the encoder used.
    #[inline]
    pub fn decode_bit(&mut self, c0: u32, c1: u32) -> bool {
        let mid = split(self.lo, self.hi, c0, c1);
        let bit = self.value >= mid;
        if bit {
            self.lo = mid;
        } else {
            self.hi = mid;
        }

        loop {
            let offset = if self.hi <= HALF {
                0
            } else if self.lo >= HALF {
                HALF
            } else if self.lo >= QUARTER && self.hi <= HALF + QUARTER {
                QUARTER
            } else {
                break;
            };
            self.lo = (self.lo - offset) << 1;
            self.hi = (self.hi - offset) << 1;
            self.value = ((self.value - offset) << 1) | u64::from(self.reader.read_bit());
        }

        bit
    }

    /// Bits read from the real input so far, including the priming read.
    pub fn bits_consumed(&self) -> usize {
        self.reader.bit_position()
    }

    /// Whether the input has run out and further bits are zero fill.
    pub fn is_exhausted(&self) -> bool {
        self.reader.is_eof()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_zero() {
        let mut enc = ArithEncoder::new();
        enc.encode_bit(false, 1, 1);
        // E1 once, then the full interval again.
        assert_eq!(enc.debug_state(), (0, WHOLE, 0));
        // Tail: pending=1, lo < QUARTER -> 0 then owed 1.
        assert_eq!(enc.finish(), vec![0b0010_0000]);
    }

    #[test]
    fn test_single_one() {
        let mut enc = ArithEncoder::new();
        enc.encode_bit(true, 1, 1);
        assert_eq!(enc.debug_state(), (0, WHOLE, 0));
        assert_eq!(enc.finish(), vec![0b1010_0000]);
    }

    #[test]
    fn test_underflow_defers_bits() {
        let mut enc = ArithEncoder::new();
        // 1 with p0 = 1/4 leaves [QUARTER, WHOLE); 0 with p0 = 2/3 of that
        // lands at [QUARTER, 3*QUARTER) which is pure E3 territory.
        enc.encode_bit(true, 1, 3);
        enc.encode_bit(false, 2, 1);
        let (lo, hi, pending) = enc.debug_state();
        assert!(pending >= 1);
        assert!(lo < HALF && hi > HALF);
    }

    #[test]
    fn test_roundtrip_skewed_counts() {
        let bits: Vec<bool> = (0..500).map(|i| i % 7 == 0 || i % 11 == 3).collect();
        let probs = |i: usize| -> (u32, u32) { ((i % 13) as u32 + 1, (i % 5) as u32 + 1) };

        let mut enc = ArithEncoder::new();
        for (i, &bit) in bits.iter().enumerate() {
            let (c0, c1) = probs(i);
            enc.encode_bit(bit, c0, c1);
        }
        let bytes = enc.finish();

        let mut dec = ArithDecoder::new(&bytes);
        for (i, &bit) in bits.iter().enumerate() {
            let (c0, c1) = probs(i);
            assert_eq!(dec.decode_bit(c0, c1), bit, "bit {}", i);
        }
    }

    #[test]
    fn test_confident_model_compresses() {
        let mut enc = ArithEncoder::new();
        for _ in 0..256 {
            enc.encode_bit(false, 255, 1);
        }
        assert!(enc.finish().len() <= 2);
    }

    #[test]
    fn test_decode_garbage_does_not_panic() {
        let data = [0xFF; 3];
        let mut dec = ArithDecoder::new(&data);
        for i in 0..2048u32 {
            let _ = dec.decode_bit(i % 200 + 1, 1);
        }
    }

    #[test]
    fn test_bit_accounting() {
        let mut enc = ArithEncoder::new();
        assert_eq!(enc.bit_len(), 0);
        // Lower half at even odds: resolved and emitted at once.
        enc.encode_bit(false, 1, 1);
        assert_eq!(enc.bit_len(), 1);

        let data = [0xAA; 8];
        let mut dec = ArithDecoder::new(&data);
        assert_eq!(dec.bits_consumed(), PRECISION as usize);
        assert!(!dec.is_exhausted());
        for _ in 0..64 {
            dec.decode_bit(1, 1);
        }
        assert!(dec.is_exhausted());
        assert_eq!(dec.bits_consumed(), 64);

        // A payload shorter than the value register is exhausted by priming.
        let dec = ArithDecoder::new(&[0x20]);
        assert!(dec.is_exhausted());
        assert_eq!(dec.bits_consumed(), 8);
    }
}
