use std::{fmt, ops::Range};

use super::{
    HIDDEN_HEIGHT, PLAYABLE_WIDTH, REAL_HEIGHT, SENTINEL_MARGIN_LEFT, TOTAL_HEIGHT, TOTAL_WIDTH,
    VISIBLE_HEIGHT, block::Placement,
};
use crate::{LockOutError, ParseWellError};

// Playable area: bits 2-11
const PLAYABLE_MASK: u16 = ((1 << PLAYABLE_WIDTH) - 1) << SENTINEL_MARGIN_LEFT;

/// Single row of the well.
///
/// # Bit Layout (LSB to MSB)
///
/// - Bits 0-1: left wall
/// - Bits 2-11: playable area (10 cells)
/// - Bits 12-15: right wall
///
/// Wall bits are always set, so collision against the sides is the same
/// bit test as collision against locked cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WellRow {
    bits: u16,
}

impl WellRow {
    pub const EMPTY: Self = Self {
        bits: !PLAYABLE_MASK,
    };
    pub const FLOOR: Self = Self { bits: u16::MAX };

    /// Checks if every playable cell is occupied.
    #[inline]
    #[must_use]
    pub fn is_full(self) -> bool {
        (self.bits & PLAYABLE_MASK) == PLAYABLE_MASK
    }

    /// Checks if no playable cell is occupied.
    #[inline]
    #[must_use]
    pub fn is_empty(self) -> bool {
        (self.bits & PLAYABLE_MASK) == 0
    }

    /// Occupancy of the playable cells; bit `n` is playable column `n`.
    #[inline]
    #[must_use]
    pub fn playable_bits(self) -> u16 {
        (self.bits & PLAYABLE_MASK) >> SENTINEL_MARGIN_LEFT
    }

    /// Checks if the cell at board column `x` is occupied (walls count as occupied).
    #[inline]
    #[must_use]
    pub fn is_cell_occupied(self, x: usize) -> bool {
        (self.bits & (1 << x)) != 0
    }

    #[inline]
    fn is_any_cell_occupied(self, x0: usize, mask: u16) -> bool {
        (self.bits & (mask << x0)) != 0
    }

    #[inline]
    fn occupy_cells(&mut self, x0: usize, mask: u16) {
        self.bits |= mask << x0;
    }
}

/// The well: a fixed grid of occupied and empty cells.
///
/// Rows are stored top to bottom:
///
/// - rows 0-1: hidden rows where blocks spawn; nothing may lock here
/// - rows 2-21: the visible well
/// - rows 22-23: floor sentinels, fully occupied
///
/// Together the hidden and visible rows form the 22 "real" rows that hold
/// locked cells and that the evaluator scans.
///
/// Cloning is a copy of 24 `u16`s; search code clones freely and never shares
/// a well between branches.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Well {
    rows: [WellRow; TOTAL_HEIGHT],
}

impl Default for Well {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Well {
    pub const TOTAL_WIDTH: usize = TOTAL_WIDTH;
    pub const TOTAL_HEIGHT: usize = TOTAL_HEIGHT;
    pub const PLAYABLE_WIDTH: usize = PLAYABLE_WIDTH;
    pub const VISIBLE_HEIGHT: usize = VISIBLE_HEIGHT;
    pub const HIDDEN_HEIGHT: usize = HIDDEN_HEIGHT;
    pub const REAL_HEIGHT: usize = REAL_HEIGHT;
    pub const PLAYABLE_X_RANGE: Range<usize> =
        SENTINEL_MARGIN_LEFT..(SENTINEL_MARGIN_LEFT + PLAYABLE_WIDTH);

    pub const EMPTY: Self = {
        let mut rows = [WellRow::EMPTY; TOTAL_HEIGHT];
        let mut y = REAL_HEIGHT;
        while y < TOTAL_HEIGHT {
            rows[y] = WellRow::FLOOR;
            y += 1;
        }
        Self { rows }
    };

    /// Returns the hidden and visible rows, top to bottom.
    pub fn real_rows(&self) -> impl DoubleEndedIterator<Item = WellRow> + ExactSizeIterator + '_ {
        self.rows[..REAL_HEIGHT].iter().copied()
    }

    /// Returns a real row by index (0 is the top hidden row).
    #[must_use]
    pub fn real_row(&self, y: usize) -> WellRow {
        self.rows[..REAL_HEIGHT][y]
    }

    /// Number of rows from the first occupied row down to the bottom.
    #[must_use]
    pub fn stack_height(&self) -> usize {
        let empty_top = self.real_rows().take_while(|row| row.is_empty()).count();
        REAL_HEIGHT - empty_top
    }

    #[must_use]
    pub fn non_empty_rows(&self) -> usize {
        self.real_rows().filter(|row| !row.is_empty()).count()
    }

    /// Checks if the placement overlaps occupied cells or walls, or has a
    /// cell outside the board.
    #[must_use]
    pub fn is_colliding(&self, placement: Placement) -> bool {
        if placement
            .occupied_positions()
            .any(|(x, y)| x >= TOTAL_WIDTH || y >= TOTAL_HEIGHT)
        {
            return true;
        }
        let x0 = placement.position().x();
        let y0 = placement.position().y();
        placement
            .mask()
            .into_iter()
            .zip(&self.rows[y0..])
            .any(|(mask, row)| row.is_any_cell_occupied(x0, mask))
    }

    #[must_use]
    pub fn is_legal(&self, placement: Placement) -> bool {
        !self.is_colliding(placement)
    }

    /// Moves the placement straight down as far as it legally goes.
    #[must_use]
    pub fn drop_placement(&self, placement: Placement) -> Placement {
        let mut dropped = placement;
        while let Some(next) = dropped.down().filter(|p| self.is_legal(*p)) {
            dropped = next;
        }
        dropped
    }

    /// Locks the placement into the well and removes completed rows.
    ///
    /// Returns the number of rows cleared. Fails without touching the well if
    /// the placement collides or any of its cells is in the hidden rows.
    pub fn lock_and_clear_lines(&mut self, placement: Placement) -> Result<usize, LockOutError> {
        if self.is_colliding(placement) {
            return Err(LockOutError);
        }
        if placement
            .occupied_positions()
            .any(|(_, y)| y < HIDDEN_HEIGHT)
        {
            return Err(LockOutError);
        }
        self.fill_placement(placement);
        Ok(self.clear_lines())
    }

    fn fill_placement(&mut self, placement: Placement) {
        let x0 = placement.position().x();
        let y0 = placement.position().y();
        for (mask, row) in placement.mask().into_iter().zip(&mut self.rows[y0..]) {
            row.occupy_cells(x0, mask);
        }
    }

    fn clear_lines(&mut self) -> usize {
        let real_rows = &mut self.rows[..REAL_HEIGHT];
        let mut count = 0;

        for y in (0..REAL_HEIGHT).rev() {
            if real_rows[y].is_full() {
                count += 1;
                continue;
            }
            if count > 0 {
                real_rows[y + count] = real_rows[y];
            }
        }

        real_rows[..count].fill(WellRow::EMPTY);
        count
    }

    /// Parses a well from ASCII art, `#` for occupied and `.` for empty.
    ///
    /// The art is aligned to the bottom of the well: its last line is the
    /// bottom visible row. Blank lines and characters other than `#` and `.`
    /// are ignored.
    pub fn from_ascii(art: &str) -> Result<Self, ParseWellError> {
        let lines: Vec<Vec<bool>> = art
            .lines()
            .map(|line| {
                line.chars()
                    .filter(|c| matches!(c, '#' | '.'))
                    .map(|c| c == '#')
                    .collect::<Vec<_>>()
            })
            .filter(|cells| !cells.is_empty())
            .collect();

        if lines.len() > REAL_HEIGHT {
            return Err(ParseWellError::TooManyRows {
                found: lines.len(),
                max: REAL_HEIGHT,
            });
        }

        let mut well = Self::EMPTY;
        let top = REAL_HEIGHT - lines.len();
        for (i, cells) in lines.iter().enumerate() {
            if cells.len() != PLAYABLE_WIDTH {
                return Err(ParseWellError::RowWidth {
                    row: i,
                    found: cells.len(),
                    expected: PLAYABLE_WIDTH,
                });
            }
            for (x, _) in cells.iter().enumerate().filter(|(_, filled)| **filled) {
                well.rows[top + i].occupy_cells(SENTINEL_MARGIN_LEFT + x, 0b1);
            }
        }
        Ok(well)
    }
}

impl fmt::Display for Well {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.real_rows() {
            for x in Self::PLAYABLE_X_RANGE {
                f.write_str(if row.is_cell_occupied(x) { "#" } else { "." })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
