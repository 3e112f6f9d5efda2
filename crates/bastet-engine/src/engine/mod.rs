//! State carried between turns by a game loop.
//!
//! - [`BlockQueue`] - the preview queue handed to block choosers
//! - [`GameStats`] - counters for a headless game

pub use self::{block_queue::*, game_stats::*};

mod block_queue;
mod game_stats;
