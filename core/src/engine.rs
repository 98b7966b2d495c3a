use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::*;

/// Valid transitions:
/// - AwaitingSelection -> Evaluating
/// - Evaluating -> AwaitingSelection
/// - Evaluating -> Won
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum SessionState {
    /// Zero or one card selected, taps accepted.
    AwaitingSelection,
    /// Two cards selected, their evaluation is armed.
    Evaluating,
    /// Terminal state, every pair matched.
    Won,
}

impl SessionState {
    pub const fn is_evaluating(self) -> bool {
        matches!(self, Self::Evaluating)
    }

    pub const fn is_final(self) -> bool {
        matches!(self, Self::Won)
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::AwaitingSelection
    }
}

/// Outcome of tapping a card
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum SelectOutcome {
    NoChange,
    /// First card of the turn flipped face-up.
    Revealed,
    /// Second card flipped; the match evaluation is now armed.
    PairChosen,
}

impl SelectOutcome {
    /// Whether this outcome could have caused an update to the game
    pub const fn has_update(self) -> bool {
        match self {
            Self::NoChange => false,
            Self::Revealed => true,
            Self::PairChosen => true,
        }
    }
}

/// Outcome of resolving an armed evaluation
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ResolveOutcome {
    /// Pair confirmed, more pairs remain.
    Matched,
    /// Faces differed, both cards flipped back down.
    Mismatched,
    /// Pair confirmed and the board is complete.
    Won,
}

impl ResolveOutcome {
    pub const fn is_match(self) -> bool {
        matches!(self, Self::Matched | Self::Won)
    }
}

/// One game from deal to win: board, selection guards, armed evaluation,
/// counters, and the queries an adapter renders from.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameSession {
    player_name: String,
    board: Board,
    cards: Vec<CardState>,
    selected: SmallVec<[Position; 2]>,
    matched_count: CardCount,
    attempts: u32,
    total_flips: u32,
    state: SessionState,
    started_at: Option<DateTime<Utc>>,
    ended_at: Option<DateTime<Utc>>,
}

impl GameSession {
    /// Starts a session for a trimmed, non-empty player name. Names that
    /// cannot round-trip through the score log (`:` or line breaks) are
    /// rejected.
    pub fn new(player_name: &str, board: Board) -> Result<Self> {
        let player_name = player_name.trim();
        if player_name.is_empty() {
            return Err(GameError::MissingPlayerName);
        }
        if player_name.contains([':', '\n', '\r']) {
            return Err(GameError::UnstorablePlayerName);
        }

        let total = board.total_cards() as usize;
        Ok(Self {
            player_name: player_name.to_owned(),
            board,
            cards: vec![CardState::default(); total],
            selected: SmallVec::new(),
            matched_count: 0,
            attempts: 0,
            total_flips: 0,
            state: SessionState::default(),
            started_at: None,
            ended_at: None,
        })
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn player_name(&self) -> &str {
        &self.player_name
    }

    pub fn difficulty(&self) -> Difficulty {
        self.board.difficulty()
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn card_at(&self, position: Position) -> CardState {
        self.cards[position]
    }

    pub fn is_face_up(&self, position: Position) -> bool {
        self.cards[position].is_face_up()
    }

    pub fn is_matched(&self, position: Position) -> bool {
        self.cards[position].is_matched()
    }

    pub fn is_selected(&self, position: Position) -> bool {
        self.selected.contains(&position)
    }

    pub fn pairs_matched(&self) -> CardCount {
        self.matched_count / 2
    }

    pub fn pairs_total(&self) -> CardCount {
        self.board.pair_count()
    }

    /// Completed two-card turns, counted when the second card is chosen and
    /// regardless of the turn's outcome. This is the score.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Cards flipped face-up over the whole session, informational only.
    pub fn total_flips(&self) -> u32 {
        self.total_flips
    }

    /// The two positions of the armed evaluation, if one is armed.
    pub fn pending_pair(&self) -> Option<(Position, Position)> {
        if self.state.is_evaluating() {
            Some((self.selected[0], self.selected[1]))
        } else {
            None
        }
    }

    /// How many seconds have passed since the first flip, 0 before it
    pub fn elapsed_secs(&self) -> u32 {
        if let Some(started_at) = self.started_at {
            (self.ended_at.unwrap_or_else(Utc::now) - started_at)
                .num_seconds()
                .max(0) as u32
        } else {
            0
        }
    }

    /// Flip a card face-up as part of the active turn. Out-of-range
    /// positions are an error; every in-range guard violation (matched or
    /// already-revealed card, two cards already chosen, finished session)
    /// is a `NoChange` no-op and leaves the session untouched.
    pub fn select(&mut self, position: Position) -> Result<SelectOutcome> {
        use SelectOutcome::*;

        let position = self.board.validate_position(position)?;

        match self.state {
            SessionState::AwaitingSelection => {}
            SessionState::Evaluating | SessionState::Won => return Ok(NoChange),
        }
        if !matches!(self.cards[position], CardState::FaceDown) {
            return Ok(NoChange);
        }

        self.mark_start();
        self.cards[position] = CardState::FaceUp;
        self.selected.push(position);
        self.total_flips += 1;
        log::trace!("Flipped card at {}, face {}", position, self.board[position]);

        Ok(if self.selected.len() == 2 {
            self.attempts += 1;
            self.state = SessionState::Evaluating;
            log::debug!("Turn {} armed for evaluation", self.attempts);
            PairChosen
        } else {
            Revealed
        })
    }

    /// Resolve the armed evaluation. Pure of any timing concern: adapters
    /// wait `Timings::reveal_both` before calling this, tests call it
    /// immediately.
    pub fn resolve(&mut self) -> Result<ResolveOutcome> {
        use ResolveOutcome::*;

        match self.state {
            SessionState::Evaluating => {}
            SessionState::AwaitingSelection => return Err(GameError::NothingToResolve),
            SessionState::Won => return Err(GameError::AlreadyEnded),
        }

        let (first, second) = (self.selected[0], self.selected[1]);
        self.selected.clear();

        Ok(if self.board.is_pair(first, second) {
            self.cards[first] = CardState::Matched;
            self.cards[second] = CardState::Matched;
            self.matched_count += 2;
            log::debug!(
                "Matched {} and {}, {}/{} pairs",
                first,
                second,
                self.pairs_matched(),
                self.pairs_total()
            );

            if self.matched_count == self.board.total_cards() {
                self.state = SessionState::Won;
                self.ended_at = Some(Utc::now());
                log::debug!("{} won in {} attempts", self.player_name, self.attempts);
                Won
            } else {
                self.state = SessionState::AwaitingSelection;
                Matched
            }
        } else {
            self.cards[first] = CardState::FaceDown;
            self.cards[second] = CardState::FaceDown;
            self.state = SessionState::AwaitingSelection;
            log::trace!("Mismatch at {} and {}", first, second);
            Mismatched
        })
    }

    /// Render view: per-position flags plus counters. Face values of
    /// face-down cards are withheld so an adapter cannot leak them.
    pub fn snapshot(&self) -> SessionSnapshot {
        let cards = (0..self.cards.len())
            .map(|position| CardView {
                face: self.cards[position]
                    .is_face_up()
                    .then(|| self.board[position]),
                selected: self.is_selected(position),
                matched: self.cards[position].is_matched(),
            })
            .collect();

        SessionSnapshot {
            player_name: self.player_name.clone(),
            difficulty: self.difficulty(),
            state: self.state,
            cards,
            attempts: self.attempts,
            total_flips: self.total_flips,
            pairs_matched: self.pairs_matched(),
            pairs_total: self.pairs_total(),
            elapsed_secs: self.elapsed_secs(),
        }
    }

    /// Records the start time on the first flip
    fn mark_start(&mut self) {
        if self.started_at.is_none() {
            self.started_at = Some(Utc::now());
        }
    }
}

/// What an adapter sees of one card.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CardView {
    /// `None` while the card is face-down.
    pub face: Option<FaceValue>,
    pub selected: bool,
    pub matched: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub player_name: String,
    pub difficulty: Difficulty,
    pub state: SessionState,
    pub cards: Vec<CardView>,
    pub attempts: u32,
    pub total_flips: u32,
    pub pairs_matched: CardCount,
    pub pairs_total: CardCount,
    pub elapsed_secs: u32,
}
