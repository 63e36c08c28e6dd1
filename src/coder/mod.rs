//! Grid compression.
//!
//! Packs the 8-track hit/rest grid with an adaptive binary arithmetic coder.
//! Each step is coded against the counts of an order-2 context model (the
//! previous two steps of the same track), so sparse or repetitive rows cost
//! a fraction of a bit per step.
//!
//! ## Pipeline
//!
//! ```text
//! Grid (8 × steps)
//!       ↓
//! ┌──────────────┐
//! │ ContextModel │ ← counts for (track, previous two steps)
//! └──────────────┘
//!       ↓
//! ┌──────────────┐
//! │ ArithEncoder │ ← 48-bit interval, E1/E2/E3 rescaling
//! └──────────────┘
//!       ↓
//! ┌──────────────┐
//! │ BitWriter    │ ← MSB-first packing
//! └──────────────┘
//!       ↓
//! Payload bytes
//! ```
//!
//! Decoding runs the same model updates in the same order, which is the
//! whole correctness argument: the decoder sees exactly the counts the
//! encoder saw for every bit.
//!
//! ## Example
//!
//! ```rust
//! use beatcode::Grid;
//! use beatcode::coder::{decode_grid, encode_grid};
//!
//! let mut grid = Grid::new(16).unwrap();
//! for step in (0..16).step_by(4) {
//!     grid.set(0, step, true);
//! }
//! let payload = encode_grid(&grid);
//! assert_eq!(decode_grid(&payload, 16), grid);
//! ```

pub mod arith;
pub mod bit_io;
pub mod context;
mod grid;


pub use arith::{ArithDecoder, ArithEncoder};
pub use bit_io::{BitReader, BitWriter};
pub use context::{Context, ContextModel, History};
pub use grid::{decode_grid, encode_grid};
