//! The bastard block chooser: picks the next block that hurts the player most.
//!
//! The crate is layered the same way a move-picking AI would be, but pointed
//! the other way round:
//!
//! ```text
//! Chooser (which kind to deal next)
//!     ↓ uses
//! Visitors (best score reachable with a kind, optionally one block deeper)
//!     ↓ uses
//! Searcher (every locking position reachable by unit moves)
//!     ↓ scored by
//! Evaluator (lines cleared, column coverage, stack height)
//! ```
//!
//! - [`evaluator`] - pure board score; higher is better for the player
//! - [`searcher`] - depth-first walk of the placement graph, reporting locking positions
//! - [`visitor`] - [`BestScoreVisitor`](visitor::BestScoreVisitor) and
//!   [`RecursiveVisitor`](visitor::RecursiveVisitor)
//! - [`policy`] - score perturbation and the percentile draw
//! - [`chooser`] - the [`BlockChooser`](chooser::BlockChooser) implementations
//!
//! Everything runs synchronously on private copies of the well. The only
//! state that survives a decision is the chooser's random generator, which is
//! seeded explicitly so games can be replayed.
//!
//! # Example
//!
//! ```no_run
//! use bastet_chooser::{chooser::{BastetBlockChooser, BlockChooser}, seed::ChooserSeed};
//! use bastet_engine::Well;
//!
//! let mut chooser = BastetBlockChooser::with_seed(ChooserSeed::from_u128(7));
//! let mut queue = chooser.starting_queue();
//! let well = Well::EMPTY;
//!
//! let _current = queue.pop_front();
//! // ... the player drops the current block ...
//! let next = chooser.next_block(&well, &queue);
//! queue.push_back(next).unwrap();
//! ```

pub mod chooser;
pub mod evaluator;
pub mod policy;
pub mod searcher;
pub mod seed;
pub mod visitor;
