//! Base64url (RFC 4648 §5) without padding.

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig, URL_SAFE_NO_PAD};
use base64::engine::DecodePaddingMode;
use base64::{DecodeError, Engine};

use crate::error::{Result, StateError};

/// Reads fragments with or without `=` padding. Unused low bits of the
/// final character are ignored, as browsers' `atob` does.
const FRAGMENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

pub fn encode(data: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(data)
}

pub fn decode(text: &str) -> Result<Vec<u8>> {
    FRAGMENT.decode(text).map_err(|e| {
        let position = match e {
            DecodeError::InvalidByte(pos, _) | DecodeError::InvalidLastSymbol(pos, _) => pos,
            DecodeError::InvalidLength(len) => len,
            DecodeError::InvalidPadding => text.len(),
        };
        StateError::InvalidBase64 { position }
    })
}
