use std::{fmt, str::FromStr};

use rand::{Rng, distr::StandardUniform, prelude::Distribution};
use serde::{Deserialize, Serialize};

use super::{SENTINEL_MARGIN_LEFT, TOTAL_HEIGHT, TOTAL_WIDTH};
use crate::ParseBlockKindError;

/// A block of a given kind at a specific position and orientation.
///
/// Placements are plain values: moving or rotating returns a new `Placement`
/// and never consults the well. Use [`Well::is_legal`](crate::Well::is_legal)
/// to check the result.
///
/// # Coordinate System
///
/// - The position is the top-left corner of the block's 4×4 box
/// - X increases rightward, in board coordinates including the 2-column walls
/// - Y increases downward; rows 0 and 1 are the hidden rows above the visible well
///
/// # Example
///
/// ```
/// use bastet_engine::{BlockKind, Placement};
///
/// let spawn = Placement::spawn(BlockKind::T);
/// let moved = spawn.right().unwrap().rotated_cw();
/// assert_eq!(moved.kind(), BlockKind::T);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Placement {
    position: BlockPosition,
    orientation: Orientation,
    kind: BlockKind,
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // "kind#orientation@x,y", e.g. "S#1@4,18"
        write!(
            f,
            "{}#{}@{},{}",
            self.kind.as_char(),
            self.orientation.0,
            self.position.x,
            self.position.y
        )
    }
}

impl Placement {
    #[must_use]
    pub const fn new(kind: BlockKind, position: BlockPosition, orientation: Orientation) -> Self {
        Self {
            position,
            orientation,
            kind,
        }
    }

    /// The placement every block enters the well with.
    #[must_use]
    pub const fn spawn(kind: BlockKind) -> Self {
        Self::new(kind, BlockPosition::SPAWN_POSITION, Orientation::SPAWN)
    }

    #[must_use]
    pub fn position(&self) -> BlockPosition {
        self.position
    }

    #[must_use]
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    #[must_use]
    pub fn kind(&self) -> BlockKind {
        self.kind
    }

    #[must_use]
    pub(crate) fn mask(&self) -> BlockMask {
        self.kind.mask(self.orientation)
    }

    /// Board coordinates `(x, y)` of the four occupied cells.
    pub fn occupied_positions(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.kind
            .occupied_positions(self.orientation)
            .map(move |(dx, dy)| (self.position.x() + dx, self.position.y() + dy))
    }

    /// The set of cells this placement covers, independent of how it was reached.
    ///
    /// Different orientations can cover the same cells (all four for `O`, two
    /// pairs for `I`, `S` and `Z`); their footprints compare equal.
    #[must_use]
    pub fn footprint(&self) -> Footprint {
        let mask = self.mask();
        let first = mask.iter().position(|&m| m != 0).unwrap_or(0);
        let mut rows = [0; 4];
        for (dst, &m) in rows.iter_mut().zip(&mask[first..]) {
            *dst = u32::from(m) << self.position.x();
        }
        Footprint {
            top: self.position.y() + first,
            rows,
        }
    }

    #[must_use]
    pub fn left(&self) -> Option<Self> {
        Some(Self {
            position: self.position.left()?,
            ..*self
        })
    }

    #[must_use]
    pub fn right(&self) -> Option<Self> {
        Some(Self {
            position: self.position.right()?,
            ..*self
        })
    }

    #[must_use]
    pub fn down(&self) -> Option<Self> {
        Some(Self {
            position: self.position.down()?,
            ..*self
        })
    }

    #[must_use]
    pub fn rotated_cw(&self) -> Self {
        Self {
            orientation: self.orientation.rotated_cw(),
            ..*self
        }
    }

    #[must_use]
    pub fn rotated_ccw(&self) -> Self {
        Self {
            orientation: self.orientation.rotated_ccw(),
            ..*self
        }
    }
}

/// Occupied cells of a placement, normalized so that equal cell sets compare equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Footprint {
    top: usize,
    rows: [u32; 4],
}

/// Position of a block's 4×4 box on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockPosition {
    x: u8,
    y: u8,
}

impl BlockPosition {
    /// Column 3 of the playable area, top hidden row.
    #[expect(clippy::cast_possible_truncation)]
    pub const SPAWN_POSITION: Self = Self::new((SENTINEL_MARGIN_LEFT + 3) as u8, 0);

    #[must_use]
    pub const fn new(x: u8, y: u8) -> Self {
        assert!((x as usize) < TOTAL_WIDTH);
        assert!((y as usize) < TOTAL_HEIGHT);
        Self { x, y }
    }

    #[must_use]
    pub fn x(self) -> usize {
        usize::from(self.x)
    }

    #[must_use]
    pub fn y(self) -> usize {
        usize::from(self.y)
    }

    #[must_use]
    pub const fn left(&self) -> Option<Self> {
        if self.x == 0 {
            None
        } else {
            Some(Self::new(self.x - 1, self.y))
        }
    }

    #[must_use]
    pub const fn right(&self) -> Option<Self> {
        if self.x as usize >= TOTAL_WIDTH - 1 {
            None
        } else {
            Some(Self::new(self.x + 1, self.y))
        }
    }

    #[must_use]
    pub const fn down(&self) -> Option<Self> {
        if self.y as usize >= TOTAL_HEIGHT - 1 {
            None
        } else {
            Some(Self::new(self.x, self.y + 1))
        }
    }
}

/// One of the four orientations of a block.
///
/// `0` is the spawn orientation; each clockwise turn adds one, modulo 4.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Orientation(u8);

impl Orientation {
    pub const SPAWN: Self = Self(0);
    pub const COUNT: usize = 4;

    #[must_use]
    pub const fn new(n: u8) -> Self {
        Self(n % 4)
    }

    #[must_use]
    pub const fn rotated_cw(self) -> Self {
        Self((self.0 + 1) % 4)
    }

    #[must_use]
    pub const fn rotated_ccw(self) -> Self {
        Self((self.0 + 3) % 4)
    }

    const fn as_usize(self) -> usize {
        self.0 as usize
    }
}

/// The seven block shapes.
///
/// The discriminant is the index into per-kind score vectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[repr(u8)]
pub enum BlockKind {
    O = 0,
    I = 1,
    Z = 2,
    T = 3,
    J = 4,
    S = 5,
    L = 6,
}

impl Distribution<BlockKind> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> BlockKind {
        BlockKind::ALL[rng.random_range(0..BlockKind::LEN)]
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

impl FromStr for BlockKind {
    type Err = ParseBlockKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Self::from_char(c.to_ascii_uppercase()),
            _ => None,
        }
        .ok_or_else(|| ParseBlockKindError {
            input: s.to_owned(),
        })
    }
}

impl BlockKind {
    /// Number of block kinds (7).
    pub const LEN: usize = 7;

    /// All kinds, in index order.
    pub const ALL: [Self; Self::LEN] = [
        Self::O,
        Self::I,
        Self::Z,
        Self::T,
        Self::J,
        Self::S,
        Self::L,
    ];

    /// Kinds a game may open with: the straight and L-shaped blocks plus T.
    pub const FAIR_START: [Self; 4] = [Self::I, Self::J, Self::L, Self::T];

    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[must_use]
    pub const fn from_index(index: usize) -> Option<Self> {
        if index < Self::LEN {
            Some(Self::ALL[index])
        } else {
            None
        }
    }

    pub(crate) fn mask(self, orientation: Orientation) -> BlockMask {
        BLOCK_MASKS[self.index()][orientation.as_usize()]
    }

    /// Offsets `(dx, dy)` of the occupied cells within the 4×4 box.
    pub fn occupied_positions(
        &self,
        orientation: Orientation,
    ) -> impl Iterator<Item = (usize, usize)> + use<> {
        let mask = self.mask(orientation);
        (0..4).flat_map(move |dy| {
            (0..4).filter_map(move |dx| (mask[dy] & (1 << dx) != 0).then_some((dx, dy)))
        })
    }

    /// Returns the single character representation of this kind.
    ///
    /// # Examples
    ///
    /// ```
    /// use bastet_engine::BlockKind;
    ///
    /// assert_eq!(BlockKind::I.as_char(), 'I');
    /// assert_eq!(BlockKind::T.as_char(), 'T');
    /// ```
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            BlockKind::O => 'O',
            BlockKind::I => 'I',
            BlockKind::Z => 'Z',
            BlockKind::T => 'T',
            BlockKind::J => 'J',
            BlockKind::S => 'S',
            BlockKind::L => 'L',
        }
    }

    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'O' => Some(BlockKind::O),
            'I' => Some(BlockKind::I),
            'Z' => Some(BlockKind::Z),
            'T' => Some(BlockKind::T),
            'J' => Some(BlockKind::J),
            'S' => Some(BlockKind::S),
            'L' => Some(BlockKind::L),
            _ => None,
        }
    }
}

/// A block within its 4×4 box: four rows of four bits, bit `n` is column `n`.
pub(crate) type BlockMask = [u16; 4];

/// Generates all 4 orientations of a mask by rotating 90° clockwise.
///
/// `size` is the side of the square the block turns in (2 for O, 4 for I, 3 otherwise).
const fn mask_rotations(size: usize, mask: BlockMask) -> [BlockMask; 4] {
    let mut rotates = [mask; 4];
    let mut i = 1;
    while i < 4 {
        let mut new_mask = [0; 4];
        let mut y = 0;
        while y < size {
            let mut x = 0;
            while x < size {
                if (rotates[i - 1][size - 1 - x] & (1 << y)) != 0 {
                    new_mask[y] |= 1 << x;
                }
                x += 1;
            }
            y += 1;
        }
        rotates[i] = new_mask;
        i += 1;
    }
    rotates
}

const BLOCK_MASKS: [[BlockMask; 4]; BlockKind::LEN] = {
    const fn m(bits: [bool; 4]) -> u16 {
        let mut mask = 0;
        let mut i = 0;
        while i < 4 {
            if bits[i] {
                mask |= 1 << i;
            }
            i += 1;
        }
        mask
    }

    const C: bool = true;
    const E: bool = false;
    const EEEE: u16 = m([E; 4]);

    [
        // O
        mask_rotations(2, [m([C, C, E, E]), m([C, C, E, E]), EEEE, EEEE]),
        // I
        mask_rotations(4, [EEEE, m([C, C, C, C]), EEEE, EEEE]),
        // Z
        mask_rotations(3, [m([C, C, E, E]), m([E, C, C, E]), EEEE, EEEE]),
        // T
        mask_rotations(3, [m([E, C, E, E]), m([C, C, C, E]), EEEE, EEEE]),
        // J
        mask_rotations(3, [m([C, E, E, E]), m([C, C, C, E]), EEEE, EEEE]),
        // S
        mask_rotations(3, [m([E, C, C, E]), m([C, C, E, E]), EEEE, EEEE]),
        // L
        mask_rotations(3, [m([E, E, C, E]), m([C, C, C, E]), EEEE, EEEE]),
    ]
};
