use bastet_chooser::{
    evaluator::{Score, evaluate},
    searcher::locking_placements,
};
use bastet_engine::{BlockKind, Placement, Well};

/// Locks `kind` at the locking position that scores best for the player.
///
/// Returns the number of cleared lines, or `None` if every placement tops
/// out (or the block cannot even spawn).
pub fn play_greedy(well: &mut Well, kind: BlockKind) -> Option<usize> {
    let mut best: Option<(Score, Well, usize)> = None;
    for placement in locking_placements(well, Placement::spawn(kind)) {
        let mut next = well.clone();
        let Ok(cleared) = next.lock_and_clear_lines(placement) else {
            continue;
        };
        let score = evaluate(&next, cleared);
        if best.as_ref().is_none_or(|(best_score, _, _)| score > *best_score) {
            best = Some((score, next, cleared));
        }
    }

    let (_, next, cleared) = best?;
    *well = next;
    Some(cleared)
}
