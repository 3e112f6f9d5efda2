use arrayvec::ArrayVec;
use serde::{Serialize, Serializer};

use crate::{BlockKind, QueueFullError};

/// Upcoming blocks, consumed front first.
///
/// Holds at most two blocks: the one about to fall and, with a preview, the
/// one shown next to the well. An empty queue is valid for choosers that give
/// no preview.
///
/// # Example
///
/// ```
/// use bastet_engine::{BlockKind, BlockQueue};
///
/// let mut queue = BlockQueue::new();
/// queue.push_back(BlockKind::T).unwrap();
/// queue.push_back(BlockKind::S).unwrap();
/// assert!(queue.push_back(BlockKind::O).is_err());
///
/// assert_eq!(queue.pop_front(), Some(BlockKind::T));
/// assert_eq!(queue.front(), Some(BlockKind::S));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockQueue {
    blocks: ArrayVec<BlockKind, 2>,
}

impl Serialize for BlockQueue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(self.iter())
    }
}

impl BlockQueue {
    pub const CAPACITY: usize = 2;

    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A queue holding only `first`.
    #[must_use]
    pub fn one(first: BlockKind) -> Self {
        let mut blocks = ArrayVec::new();
        blocks.push(first);
        Self { blocks }
    }

    /// A full queue: `first` falls next, `second` is previewed.
    #[must_use]
    pub fn two(first: BlockKind, second: BlockKind) -> Self {
        Self {
            blocks: ArrayVec::from([first, second]),
        }
    }

    /// Builds a queue from up to [`Self::CAPACITY`] blocks.
    pub fn from_blocks<I>(blocks: I) -> Result<Self, QueueFullError>
    where
        I: IntoIterator<Item = BlockKind>,
    {
        let mut queue = Self::new();
        for kind in blocks {
            queue.push_back(kind)?;
        }
        Ok(queue)
    }

    #[must_use]
    pub fn front(&self) -> Option<BlockKind> {
        self.blocks.first().copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = BlockKind> + '_ {
        self.blocks.iter().copied()
    }

    pub fn push_back(&mut self, kind: BlockKind) -> Result<(), QueueFullError> {
        self.blocks.try_push(kind).map_err(|_| QueueFullError)
    }

    pub fn pop_front(&mut self) -> Option<BlockKind> {
        self.blocks.pop_at(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_front_first_consumption() {
        let mut queue = BlockQueue::from_blocks([BlockKind::I, BlockKind::Z]).unwrap();
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.pop_front(), Some(BlockKind::I));
        assert_eq!(queue.pop_front(), Some(BlockKind::Z));
        assert_eq!(queue.pop_front(), None);
        assert!(queue.is_empty());
        assert_eq!(queue.front(), None);
    }

    #[test]
    fn test_fixed_size_constructors() {
        assert_eq!(
            BlockQueue::two(BlockKind::T, BlockKind::O),
            BlockQueue::from_blocks([BlockKind::T, BlockKind::O]).unwrap()
        );
        let one = BlockQueue::one(BlockKind::J);
        assert_eq!(one.iter().collect::<Vec<_>>(), [BlockKind::J]);
    }

    #[test]
    fn test_capacity_is_enforced() {
        assert_eq!(
            BlockQueue::from_blocks([BlockKind::I, BlockKind::Z, BlockKind::O]),
            Err(QueueFullError)
        );
    }

    #[test]
    fn test_serializes_as_kind_list() {
        let queue = BlockQueue::from_blocks([BlockKind::L, BlockKind::O]).unwrap();
        assert_eq!(serde_json::to_string(&queue).unwrap(), r#"["L","O"]"#);
    }
}
