use serde::Serialize;

use crate::BlockKind;

/// Counters for a headless game.
///
/// # Example
///
/// ```
/// use bastet_engine::{BlockKind, GameStats};
///
/// let mut stats = GameStats::new();
/// stats.complete_block_drop(BlockKind::I, 4);
///
/// assert_eq!(stats.completed_blocks(), 1);
/// assert_eq!(stats.total_cleared_lines(), 4);
/// assert_eq!(stats.line_cleared_counter()[4], 1);
/// ```
#[derive(Debug, Clone, Default, Serialize)]
pub struct GameStats {
    completed_blocks: usize,
    total_cleared_lines: usize,
    line_cleared_counter: [usize; 5],
    block_counter: [usize; BlockKind::LEN],
}

impl GameStats {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            completed_blocks: 0,
            total_cleared_lines: 0,
            line_cleared_counter: [0; 5],
            block_counter: [0; BlockKind::LEN],
        }
    }

    /// Returns the number of blocks locked into the well.
    #[must_use]
    pub const fn completed_blocks(&self) -> usize {
        self.completed_blocks
    }

    #[must_use]
    pub const fn total_cleared_lines(&self) -> usize {
        self.total_cleared_lines
    }

    /// Returns a histogram of line clears by count.
    ///
    /// Index `n` counts drops that cleared `n` lines at once.
    #[must_use]
    pub const fn line_cleared_counter(&self) -> &[usize; 5] {
        &self.line_cleared_counter
    }

    /// Returns how many blocks of each kind were dealt, indexed by [`BlockKind::index`].
    #[must_use]
    pub const fn block_counter(&self) -> &[usize; BlockKind::LEN] {
        &self.block_counter
    }

    /// Updates statistics after a block is locked.
    pub const fn complete_block_drop(&mut self, kind: BlockKind, cleared_lines: usize) {
        self.completed_blocks += 1;
        self.total_cleared_lines += cleared_lines;
        if cleared_lines < self.line_cleared_counter.len() {
            self.line_cleared_counter[cleared_lines] += 1;
        }
        self.block_counter[kind.index()] += 1;
    }
}
