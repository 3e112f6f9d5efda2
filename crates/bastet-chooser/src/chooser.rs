//! Block choosers: which kind the game loop deals next.
//!
//! - [`BastetBlockChooser`] - looks one block past the previewed one and deals
//!   what hurts most
//! - [`NoPreviewBlockChooser`] - the same idea for games without a preview
//! - [`RandomBlockChooser`] - uniform choice, a baseline for comparisons
//!
//! The game loop pops the current block from the queue, lets the player drop
//! it, then asks the chooser for a block to push back:
//!
//! ```
//! use bastet_chooser::{chooser::{BlockChooser, NoPreviewBlockChooser}, seed::ChooserSeed};
//! use bastet_engine::{Placement, Well};
//!
//! let mut chooser = NoPreviewBlockChooser::with_seed(ChooserSeed::from_u128(1));
//! let mut well = Well::EMPTY;
//! let mut queue = chooser.starting_queue();
//!
//! let current = queue.pop_front().unwrap();
//! let landed = well.drop_placement(Placement::spawn(current));
//! well.lock_and_clear_lines(landed).unwrap();
//!
//! let next = chooser.next_block(&well, &queue);
//! queue.push_back(next).unwrap();
//! ```

use std::fmt;

use bastet_engine::{BlockKind, BlockQueue, Placement, Well};
use rand::Rng;
use rand_pcg::Pcg32;

use crate::{
    evaluator::KindScores,
    policy::{Decision, SelectionPolicy},
    searcher::search,
    seed::ChooserSeed,
    visitor::{BestScoreVisitor, RecursiveVisitor},
};

/// Source of blocks for a game loop.
pub trait BlockChooser: fmt::Debug {
    /// Blocks the game opens with.
    fn starting_queue(&mut self) -> BlockQueue;

    /// Picks the block to append to `queue` after the current block has been
    /// dropped into `well`.
    fn next_block(&mut self, well: &Well, queue: &BlockQueue) -> BlockKind;
}

/// For each kind, the best the player can do with `current` and then that kind.
#[must_use]
pub fn lookahead_scores(well: &Well, current: BlockKind) -> KindScores {
    let mut visitor = RecursiveVisitor::new();
    search(well, Placement::spawn(current), &mut visitor);
    *visitor.scores()
}

/// For each kind, the best the player can do with it on `well`.
#[must_use]
pub fn immediate_scores(well: &Well) -> KindScores {
    BlockKind::ALL.map(|kind| {
        let mut visitor = BestScoreVisitor::default();
        search(well, Placement::spawn(kind), &mut visitor);
        visitor.score()
    })
}

fn fair_start<R>(rng: &mut R) -> BlockKind
where
    R: Rng + ?Sized,
{
    BlockKind::FAIR_START[rng.random_range(0..BlockKind::FAIR_START.len())]
}

fn log_decision(chooser: &str, decision: &Decision) {
    log::debug!(
        "{chooser}: dealt {} ({:?}), main {:?}, final {:?}",
        decision.chosen(),
        decision.rule(),
        decision.main_scores(),
        decision.final_scores()
    );
}

/// The bastard chooser for games with a one-block preview.
///
/// The previewed block (queue front) is the one the player drops next, so
/// each candidate is scored by searching the previewed block and then the
/// candidate on the resulting well. The worst candidate is dealt unless it
/// equals the previewed block; then a rank is drawn from the policy's
/// percentile table.
#[derive(Debug, Clone)]
pub struct BastetBlockChooser {
    rng: Pcg32,
    policy: SelectionPolicy,
}

impl Default for BastetBlockChooser {
    fn default() -> Self {
        Self::new()
    }
}

impl BastetBlockChooser {
    /// Creates a chooser with a random seed and the default policy.
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(rand::rng().random())
    }

    #[must_use]
    pub fn with_seed(seed: ChooserSeed) -> Self {
        Self::with_rng(seed.into_rng())
    }

    #[must_use]
    pub fn with_rng(rng: Pcg32) -> Self {
        Self {
            rng,
            policy: SelectionPolicy::DEFAULT,
        }
    }

    #[must_use]
    pub fn with_policy(self, policy: SelectionPolicy) -> Self {
        Self { policy, ..self }
    }

    #[must_use]
    pub fn policy(&self) -> &SelectionPolicy {
        &self.policy
    }

    /// Scores every kind and picks one, keeping the scores for inspection.
    ///
    /// With an empty queue there is no block to look past; kinds are then
    /// scored on `well` directly and the percentile draw always decides.
    pub fn decide(&mut self, well: &Well, queue: &BlockQueue) -> Decision {
        let decision = match queue.front() {
            Some(current) => {
                let scores = lookahead_scores(well, current);
                self.policy.select(scores, Some(current), &mut self.rng)
            }
            None => {
                let scores = immediate_scores(well);
                self.policy.select(scores, None, &mut self.rng)
            }
        };
        log_decision("bastet", &decision);
        decision
    }
}

impl BlockChooser for BastetBlockChooser {
    /// A fair block followed by a uniformly random preview.
    fn starting_queue(&mut self) -> BlockQueue {
        let first = fair_start(&mut self.rng);
        BlockQueue::two(first, self.rng.random())
    }

    fn next_block(&mut self, well: &Well, queue: &BlockQueue) -> BlockKind {
        self.decide(well, queue).chosen()
    }
}

/// The bastard chooser for games without a preview.
///
/// Candidates are scored on the well as it is, one block deep, and the rank
/// is always drawn from the percentile table.
#[derive(Debug, Clone)]
pub struct NoPreviewBlockChooser {
    rng: Pcg32,
    policy: SelectionPolicy,
}

impl Default for NoPreviewBlockChooser {
    fn default() -> Self {
        Self::new()
    }
}

impl NoPreviewBlockChooser {
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(rand::rng().random())
    }

    #[must_use]
    pub fn with_seed(seed: ChooserSeed) -> Self {
        Self::with_rng(seed.into_rng())
    }

    #[must_use]
    pub fn with_rng(rng: Pcg32) -> Self {
        Self {
            rng,
            policy: SelectionPolicy::DEFAULT,
        }
    }

    #[must_use]
    pub fn with_policy(self, policy: SelectionPolicy) -> Self {
        Self { policy, ..self }
    }

    #[must_use]
    pub fn policy(&self) -> &SelectionPolicy {
        &self.policy
    }

    pub fn decide(&mut self, well: &Well) -> Decision {
        let decision = self.policy.select(immediate_scores(well), None, &mut self.rng);
        log_decision("no-preview", &decision);
        decision
    }
}

impl BlockChooser for NoPreviewBlockChooser {
    fn starting_queue(&mut self) -> BlockQueue {
        BlockQueue::one(fair_start(&mut self.rng))
    }

    fn next_block(&mut self, well: &Well, _queue: &BlockQueue) -> BlockKind {
        self.decide(well).chosen()
    }
}

/// Deals every kind with equal probability, ignoring the well.
#[derive(Debug, Clone)]
pub struct RandomBlockChooser {
    rng: Pcg32,
}

impl Default for RandomBlockChooser {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomBlockChooser {
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(rand::rng().random())
    }

    #[must_use]
    pub fn with_seed(seed: ChooserSeed) -> Self {
        Self::with_rng(seed.into_rng())
    }

    #[must_use]
    pub fn with_rng(rng: Pcg32) -> Self {
        Self { rng }
    }
}

impl BlockChooser for RandomBlockChooser {
    fn starting_queue(&mut self) -> BlockQueue {
        BlockQueue::two(self.rng.random(), self.rng.random())
    }

    fn next_block(&mut self, _well: &Well, _queue: &BlockQueue) -> BlockKind {
        self.rng.random()
    }
}
