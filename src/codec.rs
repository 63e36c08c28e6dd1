//! Fragment encode/decode entry points.

use tracing::{debug, trace};

use crate::base64url;
use crate::coder::{decode_grid, encode_grid};
use crate::error::{Result, StateError};
use crate::formats::{DecodedFormat, LEGACY_SEPARATOR};
use crate::parsing::{BitmaskParser, Header, HeaderParser, HexRowsParser};
use crate::state::{percent_to_volume, BeatState};

/// Encode `state` as a base64url fragment (no `#`, no padding).
///
/// Never fails: out-of-range tempo, swing and volumes are clamped first.
pub fn encode_state(state: &BeatState) -> String {
    let header = Header::from_state(state);
    let payload = encode_grid(&state.grid);

    let mut buf = Vec::with_capacity(header.size() + payload.len());
    header.write(&mut buf);
    buf.extend_from_slice(&payload);

    trace!(
        header = header.size(),
        payload = payload.len(),
        steps = state.step_count(),
        "encoded pattern"
    );
    base64url::encode(&buf)
}

/// Decode a fragment in any supported format, reporting why it failed.
///
/// A leading `#` (as read from `location.hash`) is ignored.
pub fn try_decode_state(fragment: &str) -> Result<BeatState> {
    let fragment = fragment.strip_prefix('#').unwrap_or(fragment);
    let format = DecodedFormat::detect(fragment).ok_or(StateError::UnknownFormat)?;
    trace!(?format, len = fragment.len(), "decoding fragment");

    match format {
        DecodedFormat::Arithmetic => decode_arithmetic(fragment),
        DecodedFormat::HexRows => HexRowsParser::parse(&split_legacy(fragment)),
        DecodedFormat::BitmaskInts => BitmaskParser::parse(&split_legacy(fragment)),
    }
}

/// Decode a fragment, or `None` if it cannot be read under any format.
///
/// Never panics on arbitrary input; callers fall back to their default
/// pattern on `None`.
pub fn decode_state(fragment: &str) -> Option<BeatState> {
    match try_decode_state(fragment) {
        Ok(state) => Some(state),
        Err(e) => {
            debug!(error = %e, "ignoring unreadable pattern fragment");
            None
        }
    }
}

fn split_legacy(fragment: &str) -> Vec<&str> {
    fragment.split(LEGACY_SEPARATOR).collect()
}

fn decode_arithmetic(fragment: &str) -> Result<BeatState> {
    let buf = base64url::decode(fragment)?;
    let (header, offset) = HeaderParser::parse(&buf)?;
    let payload = buf.get(offset..).unwrap_or_default();

    Ok(BeatState {
        grid: decode_grid(payload, header.step_count),
        bpm: header.bpm,
        swing: header.swing,
        kit: header.kit,
        volumes: header.volume_percents().map(percent_to_volume),
    })
}
