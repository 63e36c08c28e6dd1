//! Error types for pattern state encoding and decoding.
//!
//! This module provides the [`StateError`] type which covers everything that
//! can go wrong when building a [`Grid`] or decoding a URL fragment.
//!
//! ## Error Categories
//!
//! | Category | Errors | Description |
//! |----------|--------|-------------|
//! | Malformed input | [`UnknownFormat`], [`InvalidBase64`], [`InvalidStepCount`] | Fragment matches no known format or carries out-of-range fields |
//! | Structural | [`StructuralMismatch`] | Binary payload shorter than the fixed header |
//! | Construction | [`InvalidTrackCount`], [`RaggedRow`], [`UnknownKit`] | Caller supplied a badly shaped grid or kit name |
//!
//! Decoding through [`decode_state`] never surfaces these: failures collapse
//! to `None` so the application can fall back to its default pattern. Use
//! [`try_decode_state`] to see why a fragment was rejected.
//!
//! ## Example
//!
//! ```rust
//! use beatcode::{try_decode_state, StateError};
//!
//! match try_decode_state("AA") {
//!     Ok(state) => println!("{} steps at {} BPM", state.step_count(), state.bpm),
//!     Err(StateError::StructuralMismatch { needed, have }) => {
//!         eprintln!("header needs {} bytes, got {}", needed, have);
//!     }
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```
//!
//! [`Grid`]: crate::Grid
//! [`decode_state`]: crate::decode_state
//! [`try_decode_state`]: crate::try_decode_state
//! [`UnknownFormat`]: StateError::UnknownFormat
//! [`InvalidBase64`]: StateError::InvalidBase64
//! [`InvalidStepCount`]: StateError::InvalidStepCount
//! [`StructuralMismatch`]: StateError::StructuralMismatch
//! [`InvalidTrackCount`]: StateError::InvalidTrackCount
//! [`RaggedRow`]: StateError::RaggedRow
//! [`UnknownKit`]: StateError::UnknownKit

use std::fmt;

/// Error type for state codec operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateError {
    /// The fragment is empty or its field layout matches none of the
    /// supported encodings.
    UnknownFormat,

    /// A character outside the base64url alphabet, or a dangling final
    /// character that cannot carry a whole byte.
    InvalidBase64 {
        /// Character index within the fragment.
        position: usize,
    },

    /// The decoded binary buffer is shorter than the fixed header.
    StructuralMismatch {
        /// Number of bytes needed.
        needed: usize,
        /// Number of bytes available.
        have: usize,
    },

    /// Step count is not a multiple of 4 in `[4, 256]`.
    InvalidStepCount(usize),

    /// A grid was built from the wrong number of rows.
    InvalidTrackCount(usize),

    /// A grid row does not have the same length as the first row.
    RaggedRow {
        /// Offending row index.
        track: usize,
        /// Length of that row.
        len: usize,
        /// Length of row 0.
        expected: usize,
    },

    /// Kit name outside the fixed enumeration.
    UnknownKit(String),
}

impl StateError {
    /// Whether this error belongs to the malformed-input family, i.e. the
    /// fragment itself was bad rather than a caller-built value.
    pub fn is_malformed_input(&self) -> bool {
        matches!(
            self,
            Self::UnknownFormat | Self::InvalidBase64 { .. } | Self::InvalidStepCount(_)
        )
    }
}

impl fmt::Display for StateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownFormat => write!(f, "Unrecognized pattern fragment format"),
            Self::InvalidBase64 { position } => {
                write!(f, "Invalid base64url data at position {}", position)
            }
            Self::StructuralMismatch { needed, have } => {
                write!(f, "Payload too short: need {} bytes, have {}", needed, have)
            }
            Self::InvalidStepCount(n) => {
                write!(f, "Invalid step count: {} (must be a multiple of 4 in 4..=256)", n)
            }
            Self::InvalidTrackCount(n) => write!(f, "Invalid track count: {} (expected 8)", n),
            Self::RaggedRow {
                track,
                len,
                expected,
            } => write!(
                f,
                "Track {} has {} steps, expected {}",
                track, len, expected
            ),
            Self::UnknownKit(name) => write!(f, "Unknown kit: {:?}", name),
        }
    }
}

impl std::error::Error for StateError {}

pub type Result<T> = std::result::Result<T, StateError>;
