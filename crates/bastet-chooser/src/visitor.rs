//! Visitors turning locking positions into scores.
//!
//! Each visitor instance serves exactly one [`search`] call and is read
//! afterwards. Both copy the well before locking, so the searched well is
//! never modified. A lock that fails ([`LockOutError`]) is a lost game: it
//! contributes [`GAME_OVER_SCORE`] and stops there.

use bastet_engine::{BlockKind, LockOutError, Placement, Well};

use crate::{
    evaluator::{GAME_OVER_SCORE, KindScores, Score, evaluate},
    searcher::{WellVisitor, search},
};

/// Keeps the best score over all locking positions of one block.
#[derive(Debug, Clone)]
pub struct BestScoreVisitor {
    score: Score,
    bonus_lines: usize,
}

impl Default for BestScoreVisitor {
    fn default() -> Self {
        Self::new(0)
    }
}

impl BestScoreVisitor {
    /// `bonus_lines` are lines already cleared earlier in the simulated sequence.
    #[must_use]
    pub fn new(bonus_lines: usize) -> Self {
        Self {
            score: GAME_OVER_SCORE,
            bonus_lines,
        }
    }

    /// Best score seen, or [`GAME_OVER_SCORE`] if no placement could lock.
    #[must_use]
    pub fn score(&self) -> Score {
        self.score
    }
}

impl WellVisitor for BestScoreVisitor {
    fn visit(&mut self, well: &Well, placement: Placement) {
        let mut well = well.clone();
        let score = match well.lock_and_clear_lines(placement) {
            Ok(cleared) => evaluate(&well, self.bonus_lines + cleared),
            Err(LockOutError) => GAME_OVER_SCORE,
        };
        self.score = self.score.max(score);
    }
}

/// Scores each possible following block, assuming the current one is played well.
///
/// For every locking position of the searched block, the block is locked and
/// each of the seven kinds is searched on the resulting well with a
/// [`BestScoreVisitor`]. Slot `k` ends up holding the best score the player can
/// reach when handed kind `k` after the current block.
#[derive(Debug, Clone)]
pub struct RecursiveVisitor {
    scores: KindScores,
}

impl Default for RecursiveVisitor {
    fn default() -> Self {
        Self::new()
    }
}

impl RecursiveVisitor {
    #[must_use]
    pub fn new() -> Self {
        Self {
            scores: [GAME_OVER_SCORE; BlockKind::LEN],
        }
    }

    #[must_use]
    pub fn scores(&self) -> &KindScores {
        &self.scores
    }
}

impl WellVisitor for RecursiveVisitor {
    fn visit(&mut self, well: &Well, placement: Placement) {
        let mut well = well.clone();
        let Ok(cleared) = well.lock_and_clear_lines(placement) else {
            return;
        };

        for next in BlockKind::ALL {
            let spawn = Placement::spawn(next);
            let best = if well.is_legal(spawn) {
                let mut visitor = BestScoreVisitor::new(cleared);
                search(&well, spawn, &mut visitor);
                visitor.score()
            } else {
                GAME_OVER_SCORE
            };
            let slot = &mut self.scores[next.index()];
            *slot = (*slot).max(best);
        }
    }
}

#[cfg(test)]
mod tests {
    use bastet_engine::{BlockPosition, Orientation};

    use super::*;
    use crate::evaluator::{EMPTY_COVERAGE, HEIGHT_WEIGHT, LINE_WEIGHT};

    fn best_score(well: &Well, kind: BlockKind) -> Score {
        let mut visitor = BestScoreVisitor::default();
        search(well, Placement::spawn(kind), &mut visitor);
        visitor.score()
    }

    #[test]
    fn test_best_score_on_empty_well() {
        // Flat blocks end up 2 rows tall at best, I lies flat in 1 row.
        let two_rows = EMPTY_COVERAGE + HEIGHT_WEIGHT * 20;
        assert_eq!(best_score(&Well::EMPTY, BlockKind::O), two_rows);
        assert_eq!(best_score(&Well::EMPTY, BlockKind::T), two_rows);
        assert_eq!(
            best_score(&Well::EMPTY, BlockKind::I),
            EMPTY_COVERAGE + HEIGHT_WEIGHT * 21
        );
    }

    #[test]
    fn test_best_score_prefers_clearing() {
        let well = Well::from_ascii(
            r"
            #########.
            #########.
            #########.
            #########.
            ",
        )
        .unwrap();
        let score = best_score(&well, BlockKind::I);
        assert_eq!(score, 4 * LINE_WEIGHT + EMPTY_COVERAGE + HEIGHT_WEIGHT * 22);
        assert!(best_score(&well, BlockKind::O) < LINE_WEIGHT);
    }

    #[test]
    fn test_best_score_bonus_lines() {
        let mut visitor = BestScoreVisitor::new(2);
        search(&Well::EMPTY, Placement::spawn(BlockKind::O), &mut visitor);
        assert_eq!(visitor.score(), best_score(&Well::EMPTY, BlockKind::O) + 2 * LINE_WEIGHT);
    }

    #[test]
    fn test_best_score_without_visits_is_game_over() {
        assert_eq!(BestScoreVisitor::new(3).score(), GAME_OVER_SCORE);
    }

    #[test]
    fn test_lock_out_contributes_game_over() {
        let mut visitor = BestScoreVisitor::default();
        visitor.visit(&Well::EMPTY, Placement::spawn(BlockKind::S));
        assert_eq!(visitor.score(), GAME_OVER_SCORE);
    }

    #[test]
    fn test_recursive_on_empty_well() {
        let mut visitor = RecursiveVisitor::new();
        search(&Well::EMPTY, Placement::spawn(BlockKind::O), &mut visitor);
        let scores = visitor.scores();
        // Two blocks side by side keep the stack 2 rows tall; I next to O too.
        for kind in BlockKind::ALL {
            assert_eq!(scores[kind.index()], EMPTY_COVERAGE + HEIGHT_WEIGHT * 20, "{kind}");
        }
    }

    #[test]
    fn test_recursive_sees_line_clear_by_next_block() {
        // Only an I fits the one-wide shaft on the right; the rows 4-8 deep
        // are not full on the left, so a hook at the shaft's mouth clears nothing.
        let well = Well::from_ascii(
            r"
            .########.
            .########.
            .########.
            .########.
            #########.
            #########.
            #########.
            #########.
            ",
        )
        .unwrap();
        let mut visitor = RecursiveVisitor::new();
        search(&well, Placement::spawn(BlockKind::O), &mut visitor);
        let scores = visitor.scores();
        assert!(scores[BlockKind::I.index()] >= 4 * LINE_WEIGHT);
        for kind in BlockKind::ALL {
            if kind != BlockKind::I {
                assert!(scores[kind.index()] < LINE_WEIGHT, "{kind}");
            }
        }
    }

    #[test]
    fn test_recursive_spawn_blocked_is_game_over() {
        // Hand-built well with cells in the hidden rows over the spawn area:
        // the current block still locks, nothing can spawn after it.
        let mut art = "...####...\n".repeat(Well::HIDDEN_HEIGHT);
        art.push_str(&"..........\n".repeat(Well::VISIBLE_HEIGHT));
        let well = Well::from_ascii(&art).unwrap();
        let bottom_left = Placement::new(
            BlockKind::O,
            BlockPosition::new(2, 20),
            Orientation::SPAWN,
        );

        let mut visitor = RecursiveVisitor::new();
        visitor.visit(&well, bottom_left);
        assert_eq!(visitor.scores(), &[GAME_OVER_SCORE; BlockKind::LEN]);
    }

    #[test]
    fn test_recursive_skips_lock_out() {
        let mut visitor = RecursiveVisitor::new();
        visitor.visit(&Well::EMPTY, Placement::spawn(BlockKind::T));
        assert_eq!(visitor.scores(), &[GAME_OVER_SCORE; BlockKind::LEN]);
    }
}
