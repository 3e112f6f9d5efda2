//! The well: board storage, block geometry and the lock/clear primitive.
//!
//! This crate is the board state provider the block chooser searches against.
//! It owns the collision rules and nothing else:
//!
//! - [`Well`] - 10 columns, 20 visible rows plus 2 hidden rows above them
//! - [`Placement`] - a block kind at a position and orientation
//! - [`BlockQueue`] - the 0-2 upcoming blocks shown to the player
//! - [`GameStats`] - counters for a headless game
//!
//! # Example
//!
//! ```
//! use bastet_engine::{BlockKind, Placement, Well};
//!
//! let mut well = Well::EMPTY;
//! let landed = well.drop_placement(Placement::spawn(BlockKind::O));
//! let cleared = well.lock_and_clear_lines(landed).unwrap();
//!
//! assert_eq!(cleared, 0);
//! assert_eq!(well.stack_height(), 2);
//! ```

pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

/// Locking would leave part of the block in the hidden rows, or on top of filled cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("block locked outside the playable area")]
pub struct LockOutError;

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ParseWellError {
    #[display("row {row} has {found} cells, expected {expected}")]
    RowWidth {
        row: usize,
        found: usize,
        expected: usize,
    },
    #[display("well art has {found} rows, at most {max} allowed")]
    TooManyRows { found: usize, max: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("invalid block kind: {input:?}")]
pub struct ParseBlockKindError {
    input: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("block queue already holds {} blocks", BlockQueue::CAPACITY)]
pub struct QueueFullError;
