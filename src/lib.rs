//! Shareable-link codec for an 8-track step-sequencer drum machine.
//!
//! The whole pattern (grid, tempo, swing, kit, per-track volumes, step
//! count) is packed into a short base64url string that lives in the URL
//! fragment. No server, no storage: the link *is* the saved state.
//!
//! The grid is compressed with an order-2 context-modelled binary arithmetic
//! coder behind a 4- or 12-byte header. Links written by the two older
//! dot-delimited formats still decode.
//!
//! ## Features
//! - Core library depends only on `tracing` and `base64`
//! - `wasm` - Browser WASM bindings
//! - `serde` - Serialize/Deserialize for the state types
//!
//! ## Example
//!
//! ```rust
//! use beatcode::{decode_state, encode_state, presets};
//!
//! let state = presets::find("Boom Bap").unwrap().to_state();
//! let fragment = encode_state(&state);
//! assert!(!fragment.contains('.'));
//! assert_eq!(decode_state(&fragment), Some(state));
//!
//! // Anything unreadable just means "no saved pattern".
//! assert_eq!(decode_state("not a pattern"), None);
//! ```

mod base64url;
pub mod codec;
pub mod coder;
pub mod error;
pub mod formats;
pub mod parsing;
pub mod presets;
pub mod state;

#[cfg(feature = "wasm")]
mod wasm_bindings;

pub use codec::{decode_state, encode_state, try_decode_state};
pub use error::StateError;
pub use formats::DecodedFormat;
pub use presets::Preset;
pub use state::{BeatState, Grid, Kit, Track, TRACK_COUNT};

#[cfg(feature = "wasm")]
pub use wasm_bindings::*;
