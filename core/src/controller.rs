use core::time::Duration;

use crate::*;

/// What the presentation adapter is told after a resolved turn.
#[derive(Debug)]
pub enum Resolution {
    Matched {
        pairs_matched: CardCount,
        pairs_total: CardCount,
    },
    /// Both positions flipped back down; the adapter may linger
    /// `Timings::mismatch_hide` before redrawing them.
    Mismatched { hidden: (Position, Position) },
    Won(WinReport),
}

/// Win event payload: final score, ranked neighbors, and any transient
/// persistence notification to display.
#[derive(Debug)]
pub struct WinReport {
    pub attempts: u32,
    pub elapsed_secs: u32,
    pub top_scores: Vec<ScoreEntry>,
    /// A failed score write; the game is already won, so this is reported,
    /// never fatal.
    pub score_error: Option<ScoreError>,
}

/// Owns the active session and the score store; the only surface a
/// presentation adapter talks to.
pub struct GameController<S> {
    store: S,
    session: Option<GameSession>,
    timings: Timings,
}

impl<S: ScoreStore> GameController<S> {
    pub fn new(store: S) -> Self {
        Self::with_timings(store, Timings::default())
    }

    pub fn with_timings(store: S, timings: Timings) -> Self {
        Self {
            store,
            session: None,
            timings,
        }
    }

    pub fn timings(&self) -> Timings {
        self.timings
    }

    pub fn session(&self) -> Option<&GameSession> {
        self.session.as_ref()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Start a session from the welcome screen: validates the name, deals a
    /// fresh deck for the difficulty, and replaces any session in progress.
    pub fn submit(
        &mut self,
        player_name: &str,
        difficulty: Difficulty,
        seed: u64,
    ) -> Result<&GameSession> {
        let board = ShuffledDeckGenerator::new(seed).generate(difficulty);
        let session = GameSession::new(player_name, board)?;
        log::debug!(
            "Session started for {} on {:?}",
            session.player_name(),
            difficulty
        );
        Ok(self.session.insert(session))
    }

    pub fn tap_card(&mut self, position: Position) -> Result<SelectOutcome> {
        self.session
            .as_mut()
            .ok_or(GameError::NoActiveSession)?
            .select(position)
    }

    /// How long the adapter should wait before `resolve_pending`, if an
    /// evaluation is armed.
    pub fn pending_delay(&self) -> Option<Duration> {
        self.session
            .as_ref()?
            .pending_pair()
            .map(|_| self.timings.reveal_both)
    }

    /// Drive the armed evaluation. A win appends exactly one score record
    /// and carries the ranked list back; store failures degrade (write →
    /// transient notification, read → empty list) instead of propagating.
    pub fn resolve_pending(&mut self) -> Result<Resolution> {
        let session = self.session.as_mut().ok_or(GameError::NoActiveSession)?;
        let pending = session.pending_pair();

        match session.resolve()? {
            ResolveOutcome::Matched => Ok(Resolution::Matched {
                pairs_matched: session.pairs_matched(),
                pairs_total: session.pairs_total(),
            }),
            ResolveOutcome::Mismatched => Ok(Resolution::Mismatched {
                hidden: pending.expect("armed evaluation should have a pair"),
            }),
            ResolveOutcome::Won => {
                let attempts = session.attempts();
                let elapsed_secs = session.elapsed_secs();
                let difficulty = session.difficulty();
                let player_name = session.player_name().to_owned();

                let score_error = self
                    .store
                    .record(difficulty, &player_name, attempts)
                    .err();
                if let Some(err) = &score_error {
                    log::warn!("Could not persist score for {player_name}: {err}");
                }
                let top_scores = self
                    .store
                    .top_scores(difficulty, DEFAULT_TOP_LIMIT)
                    .unwrap_or_else(|err| {
                        log::warn!("Could not rank scores: {err}");
                        Vec::new()
                    });

                Ok(Resolution::Won(WinReport {
                    attempts,
                    elapsed_secs,
                    top_scores,
                    score_error,
                }))
            }
        }
    }

    /// Discard the session; the next `submit` deals a fresh board with all
    /// counters zeroed.
    pub fn reset(&mut self) {
        self.session = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn pairs_of(board: &Board) -> Vec<(Position, Position)> {
        let mut by_face: HashMap<FaceValue, Vec<Position>> = HashMap::new();
        for position in 0..board.total_cards() as Position {
            by_face.entry(board[position]).or_default().push(position);
        }
        let mut pairs: Vec<_> = by_face
            .into_values()
            .map(|positions| (positions[0], positions[1]))
            .collect();
        pairs.sort();
        pairs
    }

    fn win_game(controller: &mut GameController<impl ScoreStore>) -> WinReport {
        let pairs = pairs_of(controller.session().unwrap().board());
        let total = pairs.len();
        for (index, (first, second)) in pairs.into_iter().enumerate() {
            controller.tap_card(first).unwrap();
            controller.tap_card(second).unwrap();
            match controller.resolve_pending().unwrap() {
                Resolution::Matched { pairs_matched, .. } => {
                    assert_eq!(pairs_matched as usize, index + 1)
                }
                Resolution::Won(report) if index + 1 == total => return report,
                other => panic!("unexpected resolution {other:?}"),
            }
        }
        unreachable!("last pair should have won the game");
    }

    #[test]
    fn tap_without_a_session_is_an_error() {
        let mut controller = GameController::new(MemoryScoreStore::new());
        assert_eq!(controller.tap_card(0), Err(GameError::NoActiveSession));
        assert!(controller.pending_delay().is_none());
    }

    #[test]
    fn winning_records_exactly_one_score() {
        let mut controller = GameController::new(MemoryScoreStore::new());
        controller.submit("ana", Difficulty::Normal, 3).unwrap();

        let report = win_game(&mut controller);

        assert_eq!(report.attempts, 8);
        assert!(report.score_error.is_none());
        assert_eq!(report.top_scores, vec![ScoreEntry {
            player_name: "ana".to_owned(),
            attempts: 8,
        }]);
        assert_eq!(controller.store().len(), 1);
        assert!(matches!(
            controller.resolve_pending(),
            Err(GameError::AlreadyEnded)
        ));
        assert_eq!(controller.store().len(), 1);
    }

    #[test]
    fn win_report_ranks_against_earlier_games() {
        let mut store = MemoryScoreStore::new();
        store.record(Difficulty::Normal, "luis", 5).unwrap();
        store.record(Difficulty::Normal, "rosa", 20).unwrap();

        let mut controller = GameController::new(store);
        controller.submit("ana", Difficulty::Normal, 3).unwrap();
        let report = win_game(&mut controller);

        let names: Vec<_> = report
            .top_scores
            .iter()
            .map(|entry| entry.player_name.as_str())
            .collect();
        assert_eq!(names, vec!["luis", "ana", "rosa"]);
    }

    #[test]
    fn mismatch_reports_which_cards_hid() {
        let mut controller = GameController::new(MemoryScoreStore::new());
        controller.submit("ana", Difficulty::Normal, 3).unwrap();

        let board = controller.session().unwrap().board();
        let second = (1..board.total_cards() as Position)
            .find(|&position| !board.is_pair(0, position))
            .unwrap();

        controller.tap_card(0).unwrap();
        controller.tap_card(second).unwrap();
        assert_eq!(
            controller.pending_delay(),
            Some(Timings::DEFAULT.reveal_both)
        );

        match controller.resolve_pending().unwrap() {
            Resolution::Mismatched { hidden } => assert_eq!(hidden, (0, second)),
            other => panic!("unexpected resolution {other:?}"),
        }
        assert!(controller.pending_delay().is_none());
        assert!(!controller.session().unwrap().is_face_up(0));
    }

    #[test]
    fn reset_discards_the_session() {
        let mut controller = GameController::new(MemoryScoreStore::new());
        controller.submit("ana", Difficulty::Hard, 1).unwrap();
        controller.tap_card(0).unwrap();

        controller.reset();
        assert!(controller.session().is_none());

        let session = controller.submit("ana", Difficulty::Hard, 2).unwrap();
        assert_eq!(session.attempts(), 0);
        assert_eq!(session.total_flips(), 0);
        assert_eq!(session.pairs_matched(), 0);
        assert_eq!(session.state(), SessionState::AwaitingSelection);
    }

    #[test]
    fn reset_reshuffles_the_board() {
        let mut controller = GameController::new(MemoryScoreStore::new());
        let first = controller.submit("ana", Difficulty::Normal, 1).unwrap().board().clone();

        controller.reset();
        let second = controller.submit("ana", Difficulty::Normal, 2).unwrap().board().clone();
        assert_ne!(first, second);
    }

    struct FailingStore;

    impl ScoreStore for FailingStore {
        fn record(
            &mut self,
            _: Difficulty,
            _: &str,
            _: u32,
        ) -> std::result::Result<(), ScoreError> {
            Err(std::io::Error::other("disk full").into())
        }

        fn top_scores(
            &self,
            _: Difficulty,
            _: usize,
        ) -> std::result::Result<Vec<ScoreEntry>, ScoreError> {
            Err(std::io::Error::other("disk full").into())
        }
    }

    #[test]
    fn persistence_failure_is_reported_not_fatal() {
        let mut controller = GameController::new(FailingStore);
        controller.submit("ana", Difficulty::Normal, 3).unwrap();

        let report = win_game(&mut controller);

        assert!(report.score_error.is_some());
        assert_eq!(report.top_scores, vec![]);
        assert_eq!(
            controller.session().unwrap().state(),
            SessionState::Won
        );
    }
}
