//! Bit-level I/O for the arithmetic coder.
//!
//! Bits are packed MSB first within each byte. The reader yields an endless
//! run of zero bits past the end of its buffer, which is what the encoder
//! implicitly assumes when it stops emitting.

/// Accumulates bits into a byte buffer, MSB first.
#[derive(Debug, Default)]
pub struct BitWriter {
    buf: Vec<u8>,
    /// Partially filled byte.
    cur: u8,
    /// Bits already placed in `cur`.
    filled: u32,
}

impl BitWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one bit.
    #[inline]
    pub fn write_bit(&mut self, bit: bool) {
        if bit {
            self.cur |= 0x80 >> self.filled;
        }
        self.filled += 1;
        if self.filled == 8 {
            self.buf.push(self.cur);
            self.cur = 0;
            self.filled = 0;
        }
    }

    /// Append `bit` `count` times.
    #[inline]
    pub fn write_repeated(&mut self, bit: bool, count: u64) {
        for _ in 0..count {
            self.write_bit(bit);
        }
    }

    /// Total bits written so far.
    pub fn bit_len(&self) -> u64 {
        self.buf.len() as u64 * 8 + u64::from(self.filled)
    }

    /// Flush the partial byte (zero padded) and return the buffer.
    pub fn finish(mut self) -> Vec<u8> {
        if self.filled > 0 {
            self.buf.push(self.cur);
        }
        self.buf
    }
}

/// Reads bits from a byte slice, MSB first.
pub struct BitReader<'a> {
    data: &'a [u8],
    bit_pos: usize,
}

impl<'a> BitReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, bit_pos: 0 }
    }

    /// Read one bit; zero once the buffer is exhausted.
    #[inline]
    pub fn read_bit(&mut self) -> bool {
        let Some(&byte) = self.data.get(self.bit_pos >> 3) else {
            return false;
        };
        let bit = (byte >> (7 - (self.bit_pos & 7))) & 1;
        self.bit_pos += 1;
        bit != 0
    }

    /// Read `n` bits (n <= 64) into the low bits of a `u64`.
    #[inline]
    pub fn read_bits(&mut self, n: u32) -> u64 {
        debug_assert!(n <= 64);
        let mut value = 0u64;
        for _ in 0..n {
            value = (value << 1) | u64::from(self.read_bit());
        }
        value
    }

    /// Bits consumed from the real buffer (padding reads are not counted).
    pub fn bit_position(&self) -> usize {
        self.bit_pos
    }

    pub fn is_eof(&self) -> bool {
        self.bit_pos >= self.data.len() * 8
    }
}
