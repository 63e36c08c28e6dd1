//! Order-2 adaptive context model.
//!
//! Each track gets its own model. The context of a step is the two steps
//! before it in the same track, except for the first two steps which share a
//! start context. Counts begin at (1, 1) (Laplace smoothing) and grow by one
//! per observed bit; with at most 256 steps per track they never get near
//! overflow.

/// Coding context of a single step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Context {
    /// Steps 0 and 1 of a track.
    Start,
    /// Two-bit history: `prev2 << 1 | prev1`.
    History(u8),
}

impl Context {
    const COUNT: usize = 5;

    #[inline]
    fn slot(self) -> usize {
        match self {
            Self::Start => 0,
            Self::History(h) => 1 + (h & 0b11) as usize,
        }
    }
}

/// Per-context observation counts for one track.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextModel {
    /// `[count0, count1]` per context slot.
    counts: [[u32; 2]; Context::COUNT],
}

impl ContextModel {
    pub fn new() -> Self {
        Self {
            counts: [[1, 1]; Context::COUNT],
        }
    }

    /// Current `(count0, count1)` for `ctx`.
    #[inline]
    pub fn lookup(&self, ctx: Context) -> (u32, u32) {
        let [c0, c1] = self.counts[ctx.slot()];
        (c0, c1)
    }

    /// Record an observed bit under `ctx`.
    #[inline]
    pub fn update(&mut self, ctx: Context, bit: bool) {
        self.counts[ctx.slot()][usize::from(bit)] += 1;
    }
}

impl Default for ContextModel {
    fn default() -> Self {
        Self::new()
    }
}

/// Sliding two-step history that yields the context for the next step.
#[derive(Debug, Clone, Copy, Default)]
pub struct History {
    prev2: bool,
    prev1: bool,
    seen: usize,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn context(&self) -> Context {
        if self.seen < 2 {
            Context::Start
        } else {
            Context::History((u8::from(self.prev2) << 1) | u8::from(self.prev1))
        }
    }

    #[inline]
    pub fn push(&mut self, bit: bool) {
        self.prev2 = self.prev1;
        self.prev1 = bit;
        self.seen += 1;
    }
}
