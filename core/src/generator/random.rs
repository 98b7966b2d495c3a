use super::*;

/// Deals every face value twice and applies a Fisher–Yates shuffle from a
/// fixed seed, so any permutation is equally likely and a seed reproduces
/// its deck exactly.
#[derive(Clone, Debug, PartialEq)]
pub struct ShuffledDeckGenerator {
    seed: u64,
}

impl ShuffledDeckGenerator {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl DeckGenerator for ShuffledDeckGenerator {
    fn generate(self, difficulty: Difficulty) -> Board {
        use rand::prelude::*;

        let mut faces: Vec<FaceValue> = (0..difficulty.pair_count())
            .flat_map(|face| [face as FaceValue; 2])
            .collect();

        let mut rng = SmallRng::seed_from_u64(self.seed);
        faces.shuffle(&mut rng);
        log::trace!(
            "Dealt {} cards for {:?} from seed {}",
            faces.len(),
            difficulty,
            self.seed
        );

        Board::from_faces(faces).expect("paired deal should be a valid board")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_face_occurs_exactly_twice() {
        for difficulty in Difficulty::ALL {
            let board = ShuffledDeckGenerator::new(7).generate(difficulty);

            assert_eq!(board.total_cards(), difficulty.total_cards());
            for face in 0..difficulty.pair_count() as FaceValue {
                let occurrences = (0..board.total_cards() as Position)
                    .filter(|&pos| board[pos] == face)
                    .count();
                assert_eq!(occurrences, 2, "face {face} on {difficulty:?}");
            }
        }
    }

    #[test]
    fn same_seed_reproduces_the_deck() {
        let first = ShuffledDeckGenerator::new(42).generate(Difficulty::Normal);
        let second = ShuffledDeckGenerator::new(42).generate(Difficulty::Normal);
        assert_eq!(first, second);
    }

    #[test]
    fn distinct_seeds_shuffle_differently() {
        let first = ShuffledDeckGenerator::new(1).generate(Difficulty::Hard);
        let second = ShuffledDeckGenerator::new(2).generate(Difficulty::Hard);
        assert_ne!(first, second);
    }
}
