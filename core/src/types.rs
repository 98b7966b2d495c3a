use core::time::Duration;

/// Zero-based row-major card index on a board.
pub type Position = usize;

/// Logical card identity; every face value sits on exactly two positions.
pub type FaceValue = u8;

/// Count type used for card, pair, and grid totals.
pub type CardCount = u16;

/// Pacing an adapter applies around state transitions. The engine itself
/// never sleeps; all three windows may be zero in non-interactive use.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Timings {
    /// How long both faces stay visible before the armed evaluation resolves.
    pub reveal_both: Duration,
    /// Linger after a mismatched pair flips back, so the hide does not flicker.
    pub mismatch_hide: Duration,
    /// Pause before presenting the win screen.
    pub win_screen: Duration,
}

impl Timings {
    pub const DEFAULT: Self = Self {
        reveal_both: Duration::from_millis(800),
        mismatch_hide: Duration::from_millis(150),
        win_screen: Duration::from_millis(500),
    };

    pub const ZERO: Self = Self {
        reveal_both: Duration::ZERO,
        mismatch_hide: Duration::ZERO,
        win_screen: Duration::ZERO,
    };
}

impl Default for Timings {
    fn default() -> Self {
        Self::DEFAULT
    }
}
