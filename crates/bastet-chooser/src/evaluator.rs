//! Board evaluation: how good a well is for the player.
//!
//! The score is a sum of three terms whose weights sit three orders of
//! magnitude apart, so that each term only matters when the ones above it tie:
//!
//! ```text
//! score = LINE_WEIGHT     × lines cleared (now or earlier in the simulation)
//!       + COVERAGE_WEIGHT × Σ_rows (W − popcount(columns filled in every row so far))
//!       + HEIGHT_WEIGHT   × empty rows above the stack
//! ```
//!
//! The coverage term keeps a running AND of the playable bits from the top
//! row downwards. Locked cells never reach the hidden rows, so on any well a
//! block can legally lock into the AND is already zero after the first row
//! and the term is the constant [`EMPTY_COVERAGE`]. It is kept as a term of
//! its own so that wells built by hand (e.g. with filled hidden rows) are
//! scored the same way.

use bastet_engine::{BlockKind, Well};
use serde::Serialize;

/// Score of a well or of a sequence of moves; higher is better for the player.
pub type Score = i64;

/// One score per block kind, indexed by [`BlockKind::index`].
pub type KindScores = [Score; BlockKind::LEN];

/// Score assigned to outcomes that end the game.
///
/// Below every real evaluation, which is at least [`EMPTY_COVERAGE`].
pub const GAME_OVER_SCORE: Score = -1000;

pub const LINE_WEIGHT: Score = 100_000_000;
pub const COVERAGE_WEIGHT: Score = 10_000;
pub const HEIGHT_WEIGHT: Score = 1_000;

#[expect(clippy::cast_possible_wrap)]
const WIDTH: Score = Well::PLAYABLE_WIDTH as Score;
#[expect(clippy::cast_possible_wrap)]
const REAL_HEIGHT: Score = Well::REAL_HEIGHT as Score;

/// Coverage term of every well whose top row is empty.
pub const EMPTY_COVERAGE: Score = COVERAGE_WEIGHT * WIDTH * REAL_HEIGHT;

/// Per-term breakdown of an evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Evaluation {
    lines: Score,
    coverage: Score,
    height: Score,
}

impl Evaluation {
    #[must_use]
    pub fn new(well: &Well, extra_lines: usize) -> Self {
        let full_row: u16 = (1 << Well::PLAYABLE_WIDTH) - 1;
        let mut covered = full_row;
        let mut coverage = 0;
        for row in well.real_rows() {
            covered &= row.playable_bits();
            coverage += COVERAGE_WEIGHT * (WIDTH - Score::from(covered.count_ones()));
        }

        let empty_rows = Well::REAL_HEIGHT - well.stack_height();

        Self {
            lines: to_score(extra_lines).saturating_mul(LINE_WEIGHT),
            coverage,
            height: HEIGHT_WEIGHT * to_score(empty_rows),
        }
    }

    #[must_use]
    pub fn lines(&self) -> Score {
        self.lines
    }

    #[must_use]
    pub fn coverage(&self) -> Score {
        self.coverage
    }

    #[must_use]
    pub fn height(&self) -> Score {
        self.height
    }

    #[must_use]
    pub fn total(&self) -> Score {
        self.lines
            .saturating_add(self.coverage)
            .saturating_add(self.height)
    }
}

/// Scores a well reached after clearing `extra_lines` lines on the way.
#[must_use]
pub fn evaluate(well: &Well, extra_lines: usize) -> Score {
    Evaluation::new(well, extra_lines).total()
}

fn to_score(n: usize) -> Score {
    Score::try_from(n).unwrap_or(Score::MAX)
}

#[cfg(test)]
mod tests {
    use bastet_engine::Placement;

    use super::*;

    fn lock_dropped(well: &mut Well, kind: BlockKind) -> usize {
        let placement = well.drop_placement(Placement::spawn(kind));
        well.lock_and_clear_lines(placement).unwrap()
    }

    #[test]
    fn test_empty_well() {
        let eval = Evaluation::new(&Well::EMPTY, 0);
        assert_eq!(eval.lines(), 0);
        assert_eq!(eval.coverage(), EMPTY_COVERAGE);
        assert_eq!(eval.height(), HEIGHT_WEIGHT * REAL_HEIGHT);
    }

    #[test]
    fn test_o_on_empty_well_only_changes_height() {
        let mut well = Well::EMPTY;
        assert_eq!(lock_dropped(&mut well, BlockKind::O), 0);

        let eval = Evaluation::new(&well, 0);
        assert_eq!(eval.coverage(), EMPTY_COVERAGE);
        assert_eq!(eval.height(), HEIGHT_WEIGHT * (REAL_HEIGHT - 2));
        assert_eq!(
            evaluate(&well, 0),
            evaluate(&Well::EMPTY, 0) - 2 * HEIGHT_WEIGHT
        );
    }

    #[test]
    fn test_running_and_counts_filled_top_rows() {
        // Hand-built well with cells in the hidden rows: the running AND only
        // keeps columns filled in every row from the top.
        let mut art = String::new();
        art.push_str("###.......\n");
        art.push_str("##........\n");
        art.push_str(&"..........\n".repeat(Well::REAL_HEIGHT - 2));
        let well = Well::from_ascii(&art).unwrap();

        let expected = COVERAGE_WEIGHT * (WIDTH - 3)
            + COVERAGE_WEIGHT * (WIDTH - 2)
            + COVERAGE_WEIGHT * WIDTH * (REAL_HEIGHT - 2);
        let eval = Evaluation::new(&well, 0);
        assert_eq!(eval.coverage(), expected);
        assert_eq!(eval.height(), 0);
    }

    #[test]
    fn test_monotonic_in_extra_lines() {
        let well = Well::from_ascii(
            r"
            ....##....
            #.#######.
            ",
        )
        .unwrap();
        let scores: Vec<_> = (0..5).map(|n| evaluate(&well, n)).collect();
        assert!(scores.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(scores[1] - scores[0], LINE_WEIGHT);
    }

    #[test]
    fn test_deterministic_and_pure() {
        let well = Well::from_ascii("#.#.#.#.#.").unwrap();
        let copy = well.clone();
        assert_eq!(evaluate(&well, 1), evaluate(&well, 1));
        assert_eq!(well, copy);
    }

    #[test]
    fn test_lower_stack_scores_higher() {
        let low = Well::from_ascii("##........").unwrap();
        let high = Well::from_ascii("#.........\n#.........").unwrap();
        assert!(evaluate(&low, 0) > evaluate(&high, 0));
    }

    #[test]
    fn test_game_over_below_every_evaluation() {
        let mut full = String::new();
        full.push_str(&"#########.\n".repeat(Well::REAL_HEIGHT));
        let worst = Well::from_ascii(&full).unwrap();
        assert!(GAME_OVER_SCORE + 100 < evaluate(&worst, 0));
    }
}
