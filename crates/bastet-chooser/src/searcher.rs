//! Enumeration of every locking position a block can reach.
//!
//! The placements of one block kind form a graph whose edges are the five
//! unit moves: left, right, soft drop, rotate clockwise and rotate
//! counterclockwise. [`search`] walks that graph depth first from a start
//! placement and hands every placement that cannot move down to a
//! [`WellVisitor`].
//!
//! # Identity of placements
//!
//! Expansion is keyed by pose (position and orientation): two poses with the
//! same cells can still rotate into different places, so both are expanded.
//! Reporting is keyed by [`Footprint`]: a visitor sees each distinct set of
//! resting cells once, however many poses produce it.

use std::collections::HashSet;

use bastet_engine::{BlockPosition, Footprint, Orientation, Placement, Well};

/// Something done with each locking position found by [`search`].
pub trait WellVisitor {
    /// Called once per distinct resting footprint. `well` is the board the
    /// search runs on and must not be assumed to outlive the call.
    fn visit(&mut self, well: &Well, placement: Placement);
}

impl<F> WellVisitor for F
where
    F: FnMut(&Well, Placement),
{
    fn visit(&mut self, well: &Well, placement: Placement) {
        self(well, placement);
    }
}

/// Walks every placement reachable from `start` and reports locking positions to `visitor`.
///
/// Nothing is reported when `start` itself collides.
pub fn search<V>(well: &Well, start: Placement, visitor: &mut V)
where
    V: WellVisitor + ?Sized,
{
    let mut searcher = Searcher::new(well);
    searcher.run(start, visitor);
    log::trace!(
        "searched {}: {} placements, {} locking",
        start.kind(),
        searcher.visited.len(),
        searcher.reported.len()
    );
}

/// Collects the locking positions reachable from `start`.
#[must_use]
pub fn locking_placements(well: &Well, start: Placement) -> Vec<Placement> {
    let mut placements = vec![];
    search(well, start, &mut |_: &Well, placement: Placement| {
        placements.push(placement);
    });
    placements
}

#[derive(Debug)]
struct Searcher<'a> {
    well: &'a Well,
    visited: HashSet<(BlockPosition, Orientation)>,
    reported: HashSet<Footprint>,
}

impl<'a> Searcher<'a> {
    fn new(well: &'a Well) -> Self {
        Self {
            well,
            visited: HashSet::new(),
            reported: HashSet::new(),
        }
    }

    fn run<V>(&mut self, start: Placement, visitor: &mut V)
    where
        V: WellVisitor + ?Sized,
    {
        if !self.well.is_legal(start) {
            return;
        }

        self.visited.insert(pose(start));
        let mut stack = vec![start];
        while let Some(placement) = stack.pop() {
            let can_fall = placement.down().is_some_and(|p| self.well.is_legal(p));
            if !can_fall && self.reported.insert(placement.footprint()) {
                visitor.visit(self.well, placement);
            }

            for next in moves(placement).into_iter().flatten() {
                if self.well.is_legal(next) && self.visited.insert(pose(next)) {
                    stack.push(next);
                }
            }
        }
    }
}

fn pose(placement: Placement) -> (BlockPosition, Orientation) {
    (placement.position(), placement.orientation())
}

fn moves(placement: Placement) -> [Option<Placement>; 5] {
    [
        placement.left(),
        placement.right(),
        placement.down(),
        Some(placement.rotated_cw()),
        Some(placement.rotated_ccw()),
    ]
}
