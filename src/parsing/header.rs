//! Binary header of the current fragment format.
//!
//! | Offset | Size | Field |
//! |--------|------|-------|
//! | 0 | 1 | bpm − 40 |
//! | 1 | 1 | swing |
//! | 2 | 1 | bit 7: volumes-are-default flag, bits 0–6: kit index |
//! | 3 | 1 | step count ÷ 4 |
//! | 4 | 0 or 8 | volume percent per track (only when the flag is clear) |
//!
//! The arithmetic-coded grid follows immediately.

use crate::error::{Result, StateError};
use crate::state::{
    BeatState, Kit, DEFAULT_VOLUME_PERCENT, MAX_BPM, MAX_STEPS, MAX_SWING, MIN_BPM, MIN_STEPS,
    TRACK_COUNT,
};

const DEFAULT_VOLUMES_FLAG: u8 = 0x80;
const KIT_MASK: u8 = 0x7F;

/// Decoded header fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub bpm: u16,
    pub swing: u8,
    pub kit: Kit,
    pub step_count: usize,
    /// Volume percents, `None` when every track is at the default.
    pub volumes: Option<[u8; TRACK_COUNT]>,
}

impl Header {
    /// Header describing `state`, with every field clamped into range.
    pub fn from_state(state: &BeatState) -> Self {
        let percents = state.volume_percents();
        let volumes = if percents.iter().all(|&v| v == DEFAULT_VOLUME_PERCENT) {
            None
        } else {
            Some(percents)
        };

        Self {
            bpm: state.bpm.clamp(MIN_BPM, MAX_BPM),
            swing: state.swing.min(MAX_SWING),
            kit: state.kit,
            step_count: state.step_count().clamp(MIN_STEPS, MAX_STEPS),
            volumes,
        }
    }

    /// Encoded size in bytes.
    pub fn size(&self) -> usize {
        if self.volumes.is_some() {
            HeaderParser::FULL_SIZE
        } else {
            HeaderParser::MIN_SIZE
        }
    }

    /// Volume percents with the default filled in.
    pub fn volume_percents(&self) -> [u8; TRACK_COUNT] {
        self.volumes.unwrap_or([DEFAULT_VOLUME_PERCENT; TRACK_COUNT])
    }

    /// Append the header bytes to `out`.
    pub fn write(&self, out: &mut Vec<u8>) {
        let bpm = self.bpm.clamp(MIN_BPM, MAX_BPM) - MIN_BPM;
        let flag = if self.volumes.is_none() {
            DEFAULT_VOLUMES_FLAG
        } else {
            0
        };

        out.push(bpm as u8);
        out.push(self.swing.min(MAX_SWING));
        out.push((self.kit.index() & KIT_MASK) | flag);
        out.push((self.step_count / 4).clamp(MIN_STEPS / 4, MAX_STEPS / 4) as u8);

        if let Some(volumes) = &self.volumes {
            out.extend(volumes.iter().map(|&v| v.min(100)));
        }
    }
}

pub struct HeaderParser;

impl HeaderParser {
    /// Header without the volume block.
    pub const MIN_SIZE: usize = 4;
    /// Header with the volume block.
    pub const FULL_SIZE: usize = Self::MIN_SIZE + TRACK_COUNT;

    /// Parse the header at the start of `buffer`.
    ///
    /// Returns the header and the offset at which the grid payload starts.
    /// That offset may lie past the end of a truncated buffer, in which case
    /// the payload is empty; missing volume bytes read as the default.
    pub fn parse(buffer: &[u8]) -> Result<(Header, usize)> {
        if buffer.len() < Self::MIN_SIZE {
            return Err(StateError::StructuralMismatch {
                needed: Self::MIN_SIZE,
                have: buffer.len(),
            });
        }

        let step_count = buffer[3] as usize * 4;
        if !(MIN_STEPS..=MAX_STEPS).contains(&step_count) {
            return Err(StateError::InvalidStepCount(step_count));
        }

        let bpm = (u16::from(buffer[0]) + MIN_BPM).min(MAX_BPM);
        let swing = buffer[1].min(MAX_SWING);
        let kit = Kit::from_index(buffer[2] & KIT_MASK).unwrap_or_default();

        let (volumes, payload_offset) = if buffer[2] & DEFAULT_VOLUMES_FLAG != 0 {
            (None, Self::MIN_SIZE)
        } else {
            let mut volumes = [DEFAULT_VOLUME_PERCENT; TRACK_COUNT];
            for (i, v) in volumes.iter_mut().enumerate() {
                if let Some(&byte) = buffer.get(Self::MIN_SIZE + i) {
                    *v = byte.min(100);
                }
            }
            (Some(volumes), Self::FULL_SIZE)
        };

        Ok((
            Header {
                bpm,
                swing,
                kit,
                step_count,
                volumes,
            },
            payload_offset,
        ))
    }
}
