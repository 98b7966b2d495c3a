use core::ops::Index;
use serde::{Deserialize, Serialize};

pub use card::*;
pub use controller::*;
pub use engine::*;
pub use error::*;
pub use generator::*;
pub use scores::*;
pub use types::*;

mod card;
mod controller;
mod engine;
mod error;
mod generator;
mod scores;
mod types;

/// Board presets selectable at session start.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    /// 8 pairs on a 4×4 grid.
    Normal,
    /// 12 pairs on a 4×6 grid.
    Hard,
}

impl Difficulty {
    pub const ALL: [Self; 2] = [Self::Normal, Self::Hard];

    pub const fn pair_count(self) -> CardCount {
        match self {
            Self::Normal => 8,
            Self::Hard => 12,
        }
    }

    pub const fn total_cards(self) -> CardCount {
        self.pair_count() * 2
    }

    /// Grid columns; rows follow from the card total. Layout is row-major.
    pub const fn cols(self) -> CardCount {
        4
    }

    pub const fn rows(self) -> CardCount {
        self.total_cards() / self.cols()
    }

    /// Stable lowercase key, used to name the per-difficulty score log.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Hard => "hard",
        }
    }

    pub const fn from_total_cards(total: CardCount) -> Option<Self> {
        match total {
            16 => Some(Self::Normal),
            24 => Some(Self::Hard),
            _ => None,
        }
    }
}

/// Shuffled sequence of paired face values, immutable for a whole session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    faces: Vec<FaceValue>,
    difficulty: Difficulty,
}

impl Board {
    /// Accepts only decks where every face value below the pair count occurs
    /// exactly twice and the length matches a known difficulty.
    pub fn from_faces(faces: Vec<FaceValue>) -> Result<Self> {
        let difficulty = CardCount::try_from(faces.len())
            .ok()
            .and_then(Difficulty::from_total_cards)
            .ok_or(GameError::UnrecognizedBoardSize)?;

        let pair_count = difficulty.pair_count();
        let mut occurrences = vec![0u8; pair_count as usize];
        for &face in &faces {
            if face as CardCount >= pair_count {
                return Err(GameError::UnbalancedDeck);
            }
            occurrences[face as usize] += 1;
        }
        if occurrences.iter().any(|&count| count != 2) {
            return Err(GameError::UnbalancedDeck);
        }

        Ok(Self { faces, difficulty })
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn pair_count(&self) -> CardCount {
        self.difficulty.pair_count()
    }

    pub fn total_cards(&self) -> CardCount {
        self.difficulty.total_cards()
    }

    pub fn validate_position(&self, position: Position) -> Result<Position> {
        if position < self.faces.len() {
            Ok(position)
        } else {
            Err(GameError::InvalidPosition)
        }
    }

    /// Whether two distinct positions carry the same face value.
    pub fn is_pair(&self, first: Position, second: Position) -> bool {
        first != second && self.faces[first] == self.faces[second]
    }
}

impl Index<Position> for Board {
    type Output = FaceValue;

    fn index(&self, index: Position) -> &Self::Output {
        &self.faces[index]
    }
}
