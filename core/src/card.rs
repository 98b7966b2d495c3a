use serde::{Deserialize, Serialize};

/// Player-visible state of one board position.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum CardState {
    FaceDown,
    /// Transiently revealed as part of the active turn.
    FaceUp,
    /// Confirmed pair member, permanently revealed and unselectable.
    Matched,
}

impl CardState {
    pub const fn is_face_up(self) -> bool {
        matches!(self, Self::FaceUp | Self::Matched)
    }

    pub const fn is_matched(self) -> bool {
        matches!(self, Self::Matched)
    }
}

impl Default for CardState {
    fn default() -> Self {
        Self::FaceDown
    }
}
