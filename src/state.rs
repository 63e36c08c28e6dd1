//! Pattern state types: kits, tracks, the step grid and the full
//! [`BeatState`] that round-trips through a URL fragment.

use std::fmt;
use std::str::FromStr;

use crate::error::{Result, StateError};

/// Number of instrument lanes in every pattern.
pub const TRACK_COUNT: usize = 8;
/// Step count of a fresh pattern (one bar of sixteenths).
pub const DEFAULT_STEPS: usize = 16;
pub const MIN_STEPS: usize = 4;
pub const MAX_STEPS: usize = 256;

pub const MIN_BPM: u16 = 40;
pub const MAX_BPM: u16 = 240;
pub const DEFAULT_BPM: u16 = 120;
pub const MAX_SWING: u8 = 80;

/// Per-track volume, in whole percent, that lets the encoder drop the
/// volume block.
pub const DEFAULT_VOLUME_PERCENT: u8 = 80;
pub const DEFAULT_VOLUME: f32 = 0.8;

/// Whether `n` is a storable step count.
#[inline]
pub fn is_valid_step_count(n: usize) -> bool {
    (MIN_STEPS..=MAX_STEPS).contains(&n) && n % 4 == 0
}

/// Sound kit. The discriminant is the index stored in the fragment header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum Kit {
    #[default]
    #[cfg_attr(feature = "serde", serde(rename = "808"))]
    Tr808 = 0,
    #[cfg_attr(feature = "serde", serde(rename = "acoustic"))]
    Acoustic = 1,
    #[cfg_attr(feature = "serde", serde(rename = "electronic"))]
    Electronic = 2,
    #[cfg_attr(feature = "serde", serde(rename = "lofi"))]
    Lofi = 3,
    #[cfg_attr(feature = "serde", serde(rename = "industrial"))]
    Industrial = 4,
    #[cfg_attr(feature = "serde", serde(rename = "minimal"))]
    Minimal = 5,
}

impl Kit {
    pub const ALL: [Kit; 6] = [
        Self::Tr808,
        Self::Acoustic,
        Self::Electronic,
        Self::Lofi,
        Self::Industrial,
        Self::Minimal,
    ];

    pub fn index(self) -> u8 {
        self as u8
    }

    pub fn from_index(index: u8) -> Option<Self> {
        Self::ALL.get(index as usize).copied()
    }

    /// Same as [`Kit::from_index`] but falls back to the 808 kit, which is
    /// what every decoder does with an index it does not know.
    pub fn from_index_or_default(index: i64) -> Self {
        u8::try_from(index)
            .ok()
            .and_then(Self::from_index)
            .unwrap_or_default()
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Tr808 => "808",
            Self::Acoustic => "acoustic",
            Self::Electronic => "electronic",
            Self::Lofi => "lofi",
            Self::Industrial => "industrial",
            Self::Minimal => "minimal",
        }
    }
}

impl fmt::Display for Kit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Kit {
    type Err = StateError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|kit| kit.name() == s)
            .ok_or_else(|| StateError::UnknownKit(s.to_string()))
    }
}

/// Instrument lane, in grid row order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Track {
    Kick,
    Snare,
    Hihat,
    Clap,
    Tom,
    Rim,
    Perc,
    Cowbell,
}

impl Track {
    pub const ALL: [Track; TRACK_COUNT] = [
        Self::Kick,
        Self::Snare,
        Self::Hihat,
        Self::Clap,
        Self::Tom,
        Self::Rim,
        Self::Perc,
        Self::Cowbell,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Lowercase key used by the audio side to pick a voice.
    pub fn key(self) -> &'static str {
        match self {
            Self::Kick => "kick",
            Self::Snare => "snare",
            Self::Hihat => "hihat",
            Self::Clap => "clap",
            Self::Tom => "tom",
            Self::Rim => "rim",
            Self::Perc => "perc",
            Self::Cowbell => "cowbell",
        }
    }

    /// Row label shown in the sequencer.
    pub fn label(self) -> &'static str {
        match self {
            Self::Kick => "KICK",
            Self::Snare => "SNARE",
            Self::Hihat => "HIHAT",
            Self::Clap => "CLAP",
            Self::Tom => "TOM",
            Self::Rim => "RIM",
            Self::Perc => "PERC",
            Self::Cowbell => "COWBELL",
        }
    }
}

/// Step grid: [`TRACK_COUNT`] rows of `step_count` hits/rests.
///
/// The step count is always a multiple of 4 in `[4, 256]`; every
/// constructor enforces it so the header written by the encoder can never
/// disagree with the payload.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(try_from = "Vec<Vec<u8>>", into = "Vec<Vec<u8>>")
)]
pub struct Grid {
    rows: Vec<Vec<bool>>,
    step_count: usize,
}

impl Grid {
    /// Empty grid (all rests).
    pub fn new(step_count: usize) -> Result<Self> {
        if !is_valid_step_count(step_count) {
            return Err(StateError::InvalidStepCount(step_count));
        }
        Ok(Self::silent(step_count))
    }

    /// Crate-internal constructor for step counts already known to be valid.
    pub(crate) fn silent(step_count: usize) -> Self {
        debug_assert!(is_valid_step_count(step_count));
        Self {
            rows: vec![vec![false; step_count]; TRACK_COUNT],
            step_count,
        }
    }

    /// Build from explicit rows, validating shape.
    pub fn from_rows(rows: Vec<Vec<bool>>) -> Result<Self> {
        if rows.len() != TRACK_COUNT {
            return Err(StateError::InvalidTrackCount(rows.len()));
        }
        let step_count = rows[0].len();
        for (track, row) in rows.iter().enumerate() {
            if row.len() != step_count {
                return Err(StateError::RaggedRow {
                    track,
                    len: row.len(),
                    expected: step_count,
                });
            }
        }
        if !is_valid_step_count(step_count) {
            return Err(StateError::InvalidStepCount(step_count));
        }
        Ok(Self { rows, step_count })
    }

    /// Build a grid from the hit positions of each track. Positions at or
    /// past `step_count` are ignored.
    pub fn from_hits(step_count: usize, hits: [&[usize]; TRACK_COUNT]) -> Result<Self> {
        let mut grid = Self::new(step_count)?;
        for (row, steps) in grid.rows.iter_mut().zip(hits) {
            for &step in steps {
                if let Some(cell) = row.get_mut(step) {
                    *cell = true;
                }
            }
        }
        Ok(grid)
    }

    pub fn step_count(&self) -> usize {
        self.step_count
    }

    /// Cell value; out-of-range positions read as a rest.
    pub fn get(&self, track: usize, step: usize) -> bool {
        self.rows
            .get(track)
            .and_then(|row| row.get(step))
            .copied()
            .unwrap_or(false)
    }

    /// Set a cell. Returns `false` if the position is outside the grid.
    pub fn set(&mut self, track: usize, step: usize, hit: bool) -> bool {
        match self.rows.get_mut(track).and_then(|row| row.get_mut(step)) {
            Some(cell) => {
                *cell = hit;
                true
            }
            None => false,
        }
    }

    /// Flip a cell, returning its new value (`false` if out of range).
    pub fn toggle(&mut self, track: usize, step: usize) -> bool {
        match self.rows.get_mut(track).and_then(|row| row.get_mut(step)) {
            Some(cell) => {
                *cell = !*cell;
                *cell
            }
            None => false,
        }
    }

    pub fn row(&self, track: Track) -> &[bool] {
        &self.rows[track.index()]
    }

    pub fn rows(&self) -> &[Vec<bool>] {
        &self.rows
    }

    pub(crate) fn row_mut(&mut self, track: usize) -> &mut [bool] {
        &mut self.rows[track]
    }

    /// Set every cell to a rest.
    pub fn clear(&mut self) {
        for row in &mut self.rows {
            row.fill(false);
        }
    }

    pub fn hit_count(&self) -> usize {
        self.rows.iter().flatten().filter(|&&hit| hit).count()
    }

    /// Change the step count, truncating or padding every row with rests.
    pub fn resize(&mut self, step_count: usize) -> Result<()> {
        if !is_valid_step_count(step_count) {
            return Err(StateError::InvalidStepCount(step_count));
        }
        for row in &mut self.rows {
            row.resize(step_count, false);
        }
        self.step_count = step_count;
        Ok(())
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::silent(DEFAULT_STEPS)
    }
}

/// Rows of 0/1 cells, the shape the web app keeps its grid in. Any non-zero
/// cell is a hit.
impl TryFrom<Vec<Vec<u8>>> for Grid {
    type Error = StateError;

    fn try_from(rows: Vec<Vec<u8>>) -> Result<Self> {
        Self::from_rows(
            rows.into_iter()
                .map(|row| row.into_iter().map(|cell| cell != 0).collect())
                .collect(),
        )
    }
}

impl From<Grid> for Vec<Vec<u8>> {
    fn from(grid: Grid) -> Self {
        grid.rows
            .into_iter()
            .map(|row| row.into_iter().map(u8::from).collect())
            .collect()
    }
}

/// Everything a shared link restores.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(try_from = "BeatStateRecord", into = "BeatStateRecord")
)]
pub struct BeatState {
    pub grid: Grid,
    pub bpm: u16,
    pub swing: u8,
    pub kit: Kit,
    /// Per-track gain in `[0, 1]`, in [`Track`] order.
    pub volumes: [f32; TRACK_COUNT],
}

impl BeatState {
    pub fn step_count(&self) -> usize {
        self.grid.step_count()
    }

    /// Volumes as whole percent, clamped to `[0, 100]`.
    pub fn volume_percents(&self) -> [u8; TRACK_COUNT] {
        self.volumes.map(volume_to_percent)
    }

    /// `#`-prefixed fragment ready for `history.replaceState`.
    pub fn to_fragment(&self) -> String {
        format!("#{}", crate::codec::encode_state(self))
    }
}

impl Default for BeatState {
    fn default() -> Self {
        Self {
            grid: Grid::default(),
            bpm: DEFAULT_BPM,
            swing: 0,
            kit: Kit::Tr808,
            volumes: [DEFAULT_VOLUME; TRACK_COUNT],
        }
    }
}

/// Serialized form of [`BeatState`]: the step count is spelled out next to
/// the grid and must agree with it.
#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct BeatStateRecord {
    grid: Grid,
    bpm: u16,
    swing: u8,
    kit: Kit,
    volumes: [f32; TRACK_COUNT],
    step_count: usize,
}

#[cfg(feature = "serde")]
impl TryFrom<BeatStateRecord> for BeatState {
    type Error = StateError;

    fn try_from(record: BeatStateRecord) -> Result<Self> {
        if record.step_count != record.grid.step_count() {
            return Err(StateError::RaggedRow {
                track: 0,
                len: record.grid.step_count(),
                expected: record.step_count,
            });
        }
        Ok(Self {
            grid: record.grid,
            bpm: record.bpm,
            swing: record.swing,
            kit: record.kit,
            volumes: record.volumes,
        })
    }
}

#[cfg(feature = "serde")]
impl From<BeatState> for BeatStateRecord {
    fn from(state: BeatState) -> Self {
        Self {
            step_count: state.grid.step_count(),
            grid: state.grid,
            bpm: state.bpm,
            swing: state.swing,
            kit: state.kit,
            volumes: state.volumes,
        }
    }
}

/// Round a `[0, 1]` gain to whole percent. NaN maps to 0.
pub(crate) fn volume_to_percent(v: f32) -> u8 {
    (v * 100.0).round().clamp(0.0, 100.0) as u8
}

pub(crate) fn percent_to_volume(p: u8) -> f32 {
    f32::from(p.min(100)) / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kit_index_roundtrip() {
        for kit in Kit::ALL {
            assert_eq!(Kit::from_index(kit.index()), Some(kit));
            assert_eq!(kit.name().parse::<Kit>().unwrap(), kit);
        }
        assert_eq!(Kit::from_index(6), None);
        assert_eq!(Kit::from_index_or_default(99), Kit::Tr808);
        assert_eq!(Kit::from_index_or_default(-1), Kit::Tr808);
        assert_eq!(Kit::from_index_or_default(3), Kit::Lofi);
        assert!(matches!("909".parse::<Kit>(), Err(StateError::UnknownKit(_))));
    }

    #[test]
    fn test_track_order() {
        let keys: Vec<_> = Track::ALL.iter().map(|t| t.key()).collect();
        assert_eq!(
            keys,
            ["kick", "snare", "hihat", "clap", "tom", "rim", "perc", "cowbell"]
        );
        assert_eq!(Track::Cowbell.index(), 7);
        assert_eq!(Track::Hihat.label(), "HIHAT");
    }

    #[test]
    fn test_step_count_validation() {
        assert!(Grid::new(4).is_ok());
        assert!(Grid::new(256).is_ok());
        assert_eq!(Grid::new(0), Err(StateError::InvalidStepCount(0)));
        assert_eq!(Grid::new(18), Err(StateError::InvalidStepCount(18)));
        assert_eq!(Grid::new(260), Err(StateError::InvalidStepCount(260)));
    }

    #[test]
    fn test_from_rows_shape() {
        assert_eq!(
            Grid::from_rows(vec![vec![false; 16]; 7]),
            Err(StateError::InvalidTrackCount(7))
        );
        let mut rows = vec![vec![false; 16]; TRACK_COUNT];
        rows[5].pop();
        assert_eq!(
            Grid::from_rows(rows),
            Err(StateError::RaggedRow {
                track: 5,
                len: 15,
                expected: 16
            })
        );
    }

    #[test]
    fn test_cell_access() {
        let mut grid = Grid::new(8).unwrap();
        assert!(grid.set(2, 3, true));
        assert!(grid.get(2, 3));
        assert!(!grid.set(8, 0, true));
        assert!(!grid.get(0, 100));
        assert!(!grid.toggle(2, 3));
        assert!(grid.toggle(0, 0));
        assert_eq!(grid.hit_count(), 1);
        grid.clear();
        assert_eq!(grid.hit_count(), 0);
    }

    #[test]
    fn test_resize_keeps_hits() {
        let mut grid = Grid::from_hits(16, [&[0, 15], &[], &[], &[], &[], &[], &[], &[]]).unwrap();
        grid.resize(32).unwrap();
        assert_eq!(grid.step_count(), 32);
        assert!(grid.get(0, 15));
        assert!(!grid.get(0, 31));
        grid.resize(8).unwrap();
        assert!(grid.get(0, 0));
        assert_eq!(grid.hit_count(), 1);
        assert!(grid.resize(10).is_err());
        assert_eq!(grid.step_count(), 8);
    }

    #[test]
    fn test_volume_percent() {
        assert_eq!(volume_to_percent(0.8), 80);
        assert_eq!(volume_to_percent(0.801), 80);
        assert_eq!(volume_to_percent(1.7), 100);
        assert_eq!(volume_to_percent(-0.2), 0);
        assert_eq!(volume_to_percent(f32::NAN), 0);
        assert_eq!(percent_to_volume(250), 1.0);
        assert_eq!(percent_to_volume(37), 0.37);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_json_shape() {
        let mut state = BeatState {
            grid: Grid::new(4).unwrap(),
            kit: Kit::Lofi,
            volumes: [0.5; TRACK_COUNT],
            ..BeatState::default()
        };
        state.grid.set(Track::Kick.index(), 0, true);
        state.grid.set(Track::Kick.index(), 3, true);

        let rest = vec!["[0,0,0,0]"; TRACK_COUNT - 1].join(",");
        let volumes = vec!["0.5"; TRACK_COUNT].join(",");
        let expected = format!(
            r#"{{"grid":[[1,0,0,1],{rest}],"bpm":120,"swing":0,"kit":"lofi","volumes":[{volumes}],"stepCount":4}}"#
        );
        let json = serde_json::to_string(&state).unwrap();
        assert_eq!(json, expected);

        let back: BeatState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, state);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_validates_grid() {
        let json = serde_json::to_string(&BeatState::default()).unwrap();

        // Any non-zero cell is a hit.
        let loud = json.replacen("[0,", "[7,", 1);
        let state: BeatState = serde_json::from_str(&loud).unwrap();
        assert!(state.grid.get(0, 0));
        assert_eq!(state.grid.hit_count(), 1);

        // Step count must match the rows.
        let wrong_count = json.replace(r#""stepCount":16"#, r#""stepCount":32"#);
        assert!(serde_json::from_str::<BeatState>(&wrong_count).is_err());

        // Ragged rows are rejected.
        let ragged = json.replacen("[0,", "[", 1);
        assert!(serde_json::from_str::<BeatState>(&ragged).is_err());
    }

    #[test]
    fn test_default_state() {
        let state = BeatState::default();
        assert_eq!(state.step_count(), 16);
        assert_eq!(state.bpm, 120);
        assert_eq!(state.volume_percents(), [80; TRACK_COUNT]);
    }
}
