//! Built-in one-bar patterns.
//!
//! Each preset is a 16-step grid plus tempo, swing and kit. Loading one gives
//! default volumes, so a freshly loaded preset always encodes with the short
//! header.

use crate::state::{BeatState, Grid, Kit, DEFAULT_STEPS, DEFAULT_VOLUME, TRACK_COUNT};

/// A named starting pattern.
#[derive(Debug, Clone, Copy)]
pub struct Preset {
    pub name: &'static str,
    pub bpm: u16,
    pub swing: u8,
    pub kit: Kit,
    /// Hit positions per track, in track order.
    pub hits: [&'static [usize]; TRACK_COUNT],
}

const EIGHTHS: &[usize] = &[0, 2, 4, 6, 8, 10, 12, 14];
const SIXTEENTHS: &[usize] = &[0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15];
const BACKBEAT: &[usize] = &[4, 12];
const FOUR_FLOOR: &[usize] = &[0, 4, 8, 12];
const NONE: &[usize] = &[];

pub const PRESETS: [Preset; 12] = [
    Preset {
        name: "4 on the Floor",
        bpm: 128,
        swing: 0,
        kit: Kit::Electronic,
        hits: [FOUR_FLOOR, BACKBEAT, EIGHTHS, NONE, NONE, NONE, NONE, NONE],
    },
    Preset {
        name: "Boom Bap",
        bpm: 90,
        swing: 40,
        kit: Kit::Tr808,
        hits: [&[0, 5, 8, 13], BACKBEAT, EIGHTHS, NONE, NONE, &[2, 10], NONE, NONE],
    },
    Preset {
        name: "Trap",
        bpm: 140,
        swing: 0,
        kit: Kit::Tr808,
        hits: [&[0, 7, 8], BACKBEAT, SIXTEENTHS, BACKBEAT, NONE, NONE, NONE, NONE],
    },
    Preset {
        name: "Reggaeton",
        bpm: 100,
        swing: 0,
        kit: Kit::Tr808,
        hits: [
            &[0, 3, 4, 7, 8, 11, 12, 15],
            BACKBEAT,
            EIGHTHS,
            &[3, 7, 11, 15],
            NONE,
            NONE,
            NONE,
            NONE,
        ],
    },
    Preset {
        name: "Drum & Bass",
        bpm: 174,
        swing: 0,
        kit: Kit::Electronic,
        hits: [&[0, 6, 10], BACKBEAT, EIGHTHS, NONE, NONE, &[3, 11], NONE, NONE],
    },
    Preset {
        name: "Bossa Nova",
        bpm: 110,
        swing: 30,
        kit: Kit::Acoustic,
        hits: [
            &[0, 6, 10],
            BACKBEAT,
            &[0, 3, 4, 6, 8, 10, 12, 14],
            NONE,
            NONE,
            &[2, 5, 8, 13],
            NONE,
            FOUR_FLOOR,
        ],
    },
    Preset {
        name: "House",
        bpm: 128,
        swing: 0,
        kit: Kit::Electronic,
        hits: [FOUR_FLOOR, BACKBEAT, EIGHTHS, BACKBEAT, NONE, NONE, &[3, 7, 11, 15], NONE],
    },
    Preset {
        name: "Lo-fi Hip Hop",
        bpm: 75,
        swing: 50,
        kit: Kit::Lofi,
        hits: [&[0, 5, 8, 13], BACKBEAT, EIGHTHS, NONE, NONE, &[2, 10], &[6, 14], NONE],
    },
    Preset {
        name: "Industrial",
        bpm: 135,
        swing: 0,
        kit: Kit::Industrial,
        hits: [
            &[0, 3, 4, 8, 11, 12],
            BACKBEAT,
            SIXTEENTHS,
            &[2, 6, 10, 14],
            &[7, 15],
            &[1, 5, 9, 13],
            &[3, 11],
            NONE,
        ],
    },
    Preset {
        name: "Minimal Techno",
        bpm: 130,
        swing: 0,
        kit: Kit::Minimal,
        hits: [FOUR_FLOOR, NONE, &[2, 6, 10, 14], &[4], NONE, &[7], &[3, 11], NONE],
    },
    Preset {
        name: "Afrobeat",
        bpm: 110,
        swing: 30,
        kit: Kit::Acoustic,
        hits: [
            &[0, 5, 8, 10, 14],
            BACKBEAT,
            &[0, 1, 3, 4, 6, 8, 9, 11, 12, 14],
            BACKBEAT,
            &[7, 15],
            &[2, 6, 10, 13],
            &[1, 5, 9, 13],
            &[0, 3, 8, 11],
        ],
    },
    Preset {
        name: "Disco",
        bpm: 120,
        swing: 0,
        kit: Kit::Acoustic,
        hits: [
            FOUR_FLOOR,
            BACKBEAT,
            &[1, 3, 5, 7, 9, 11, 13, 15],
            NONE,
            NONE,
            NONE,
            FOUR_FLOOR,
            &[2, 6, 10, 14],
        ],
    },
];

impl Preset {
    pub fn grid(&self) -> Grid {
        let mut grid = Grid::silent(DEFAULT_STEPS);
        for (track, steps) in self.hits.iter().enumerate() {
            for &step in *steps {
                grid.set(track, step, true);
            }
        }
        grid
    }

    pub fn to_state(&self) -> BeatState {
        BeatState {
            grid: self.grid(),
            bpm: self.bpm,
            swing: self.swing,
            kit: self.kit,
            volumes: [DEFAULT_VOLUME; TRACK_COUNT],
        }
    }
}

/// Look up a preset by name, ignoring ASCII case.
pub fn find(name: &str) -> Option<&'static Preset> {
    PRESETS.iter().find(|p| p.name.eq_ignore_ascii_case(name))
}
