pub use self::{block::*, well::*};

pub(crate) mod block;
pub(crate) mod well;

/// Columns the player can fill.
pub(crate) const PLAYABLE_WIDTH: usize = 10;
/// Rows shown to the player.
pub(crate) const VISIBLE_HEIGHT: usize = 20;
/// Rows above the visible area where blocks spawn and may rotate.
pub(crate) const HIDDEN_HEIGHT: usize = 2;
/// Hidden plus visible rows; the rows that can hold locked cells.
pub(crate) const REAL_HEIGHT: usize = HIDDEN_HEIGHT + VISIBLE_HEIGHT;

pub(crate) const SENTINEL_MARGIN_LEFT: usize = 2;
pub(crate) const SENTINEL_MARGIN_RIGHT: usize = 2;
pub(crate) const SENTINEL_MARGIN_BOTTOM: usize = 2;

pub(crate) const TOTAL_WIDTH: usize = SENTINEL_MARGIN_LEFT + PLAYABLE_WIDTH + SENTINEL_MARGIN_RIGHT;
pub(crate) const TOTAL_HEIGHT: usize = REAL_HEIGHT + SENTINEL_MARGIN_BOTTOM;
