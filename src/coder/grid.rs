//! Grid payload codec.
//!
//! Tracks are coded back to back through a single arithmetic coder, each
//! with a fresh [`ContextModel`]. There are no delimiters: the decoder gets
//! the track count (fixed) and the step count (from the header) up front.

use tracing::trace;

use super::arith::{ArithDecoder, ArithEncoder};
use super::context::{ContextModel, History};
use crate::state::{Grid, TRACK_COUNT};

/// Compress every cell of `grid` into an arithmetic-coded byte stream.
pub fn encode_grid(grid: &Grid) -> Vec<u8> {
    let mut enc = ArithEncoder::new();

    for row in grid.rows() {
        let mut model = ContextModel::new();
        let mut history = History::new();

        for &bit in row {
            let ctx = history.context();
            let (c0, c1) = model.lookup(ctx);
            enc.encode_bit(bit, c0, c1);
            model.update(ctx, bit);
            history.push(bit);
        }
    }

    trace!(bits = enc.bit_len(), steps = grid.step_count(), "coded grid");
    enc.finish()
}

/// Rebuild a grid of `step_count` steps from an arithmetic-coded stream.
///
/// `step_count` must already be validated. Truncated or foreign data
/// decodes to some grid of the right shape rather than failing.
pub fn decode_grid(data: &[u8], step_count: usize) -> Grid {
    let mut grid = Grid::silent(step_count);
    let mut dec = ArithDecoder::new(data);

    for track in 0..TRACK_COUNT {
        let mut model = ContextModel::new();
        let mut history = History::new();

        for cell in grid.row_mut(track) {
            let ctx = history.context();
            let (c0, c1) = model.lookup(ctx);
            let bit = dec.decode_bit(c0, c1);
            model.update(ctx, bit);
            history.push(bit);
            *cell = bit;
        }
    }

    trace!(
        consumed_bits = dec.bits_consumed(),
        available_bits = data.len() * 8,
        exhausted = dec.is_exhausted(),
        "decoded grid"
    );
    grid
}
