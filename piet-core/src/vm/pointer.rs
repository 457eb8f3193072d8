//! Direction pointer (DP), codel chooser (CC) and the retry sequence
//!
//! The pair `(dp, cc)` is the only navigation state of a run. It lives in a
//! [`PointerState`] owned by the controller and is lent mutably to the
//! search (retries) and to the stack machine (`Pointer`, `Switch`).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::grid::Position;

/// Direction pointer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Up = 0,
    Right = 1,
    Down = 2,
    Left = 3,
}

impl Direction {
    /// Clockwise order starting at `Up`
    pub const CLOCKWISE: [Direction; 4] = [
        Direction::Up,
        Direction::Right,
        Direction::Down,
        Direction::Left,
    ];

    #[inline]
    pub const fn rotate_clockwise(self) -> Self {
        Self::CLOCKWISE[(self as usize + 1) % 4]
    }

    #[inline]
    pub const fn rotate_counter_clockwise(self) -> Self {
        Self::CLOCKWISE[(self as usize + 3) % 4]
    }

    /// Rotate `n` quarter turns: clockwise for positive `n`, counter-clockwise
    /// for negative `n`
    #[inline]
    pub const fn rotate_by(self, n: i64) -> Self {
        // -1 ccw == 3 cw
        let turns = n.rem_euclid(4) as usize;
        Self::CLOCKWISE[(self as usize + turns) % 4]
    }

    /// Unit `(dx, dy)` step, `y` growing downwards
    #[inline]
    pub const fn offset(self) -> (i64, i64) {
        match self {
            Direction::Up => (0, -1),
            Direction::Right => (1, 0),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
        }
    }

    /// One-codel step from `position`, `None` when it leaves a
    /// `width × height` grid
    pub fn advance(self, position: Position, width: usize, height: usize) -> Option<Position> {
        let Position { x, y } = position;
        let (x, y) = match self {
            Direction::Up => (x, y.checked_sub(1)?),
            Direction::Right => (x.checked_add(1)?, y),
            Direction::Down => (x, y.checked_add(1)?),
            Direction::Left => (x.checked_sub(1)?, y),
        };
        (x < width && y < height).then_some(Position::new(x, y))
    }

    /// Signed projection of `position` onto this direction
    ///
    /// The larger the value, the further the codel lies in this direction.
    #[inline]
    pub(crate) fn reach(self, position: Position) -> i64 {
        let (x, y) = (position.x as i64, position.y as i64);
        match self {
            Direction::Up => -y,
            Direction::Right => x,
            Direction::Down => y,
            Direction::Left => -x,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::Up => "up",
            Direction::Right => "right",
            Direction::Down => "down",
            Direction::Left => "left",
        };
        f.write_str(name)
    }
}

/// Codel chooser
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Chooser {
    Left,
    Right,
}

impl Chooser {
    #[inline]
    pub const fn toggle(self) -> Self {
        match self {
            Chooser::Left => Chooser::Right,
            Chooser::Right => Chooser::Left,
        }
    }

    /// Toggle when `n` is odd
    #[inline]
    pub const fn switch_by(self, n: i64) -> Self {
        if n % 2 != 0 { self.toggle() } else { self }
    }

    /// Absolute direction the chooser points to while traveling along `dp`
    #[inline]
    pub const fn relative_to(self, dp: Direction) -> Direction {
        match self {
            Chooser::Left => dp.rotate_counter_clockwise(),
            Chooser::Right => dp.rotate_clockwise(),
        }
    }
}

impl fmt::Display for Chooser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Chooser::Left => f.write_str("left"),
            Chooser::Right => f.write_str("right"),
        }
    }
}

/// Navigation state of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PointerState {
    pub dp: Direction,
    pub cc: Chooser,
}

impl PointerState {
    #[inline]
    pub const fn new(dp: Direction, cc: Chooser) -> Self {
        Self { dp, cc }
    }
}

impl Default for PointerState {
    /// DP right, CC left
    fn default() -> Self {
        Self::new(Direction::Right, Chooser::Left)
    }
}

impl fmt::Display for PointerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "dp={} cc={}", self.dp, self.cc)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// RETRY SEQUENCE
// ═══════════════════════════════════════════════════════════════════════════════

/// Attempts before a block is declared exitless: 4 directions × 2 choosers
pub const MAX_ATTEMPTS: usize = 8;

/// Bookkeeping applied after a blocked attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recovery {
    /// First failure in a direction
    ToggleChooser,
    /// Second failure in the same direction
    RotateClockwise,
}

impl Recovery {
    #[inline]
    pub const fn apply(self, pointer: PointerState) -> PointerState {
        match self {
            Recovery::ToggleChooser => PointerState::new(pointer.dp, pointer.cc.toggle()),
            Recovery::RotateClockwise => PointerState::new(pointer.dp.rotate_clockwise(), pointer.cc),
        }
    }
}

/// One of the eight `(dp, cc)` probes of a search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attempt {
    index: usize,
    pointer: PointerState,
}

impl Attempt {
    /// Attempt 0, made with the pointer as the run left it
    #[inline]
    pub const fn first(pointer: PointerState) -> Self {
        Self { index: 0, pointer }
    }

    /// 0-based attempt number
    #[inline]
    pub const fn index(&self) -> usize {
        self.index
    }

    #[inline]
    pub const fn pointer(&self) -> PointerState {
        self.pointer
    }

    /// Even attempts toggle the chooser, odd ones rotate the direction
    #[inline]
    pub const fn recovery(&self) -> Recovery {
        if self.index % 2 == 0 {
            Recovery::ToggleChooser
        } else {
            Recovery::RotateClockwise
        }
    }

    /// Pointer state after this attempt's recovery
    #[inline]
    pub const fn recovered(&self) -> PointerState {
        self.recovery().apply(self.pointer)
    }

    /// Following attempt, `None` once the eighth has been made
    pub const fn next(self) -> Option<Self> {
        if self.index + 1 >= MAX_ATTEMPTS {
            return None;
        }
        Some(Self {
            index: self.index + 1,
            pointer: self.recovered(),
        })
    }

    /// The full eight-attempt sequence starting at `pointer`
    pub fn sequence(pointer: PointerState) -> impl Iterator<Item = Attempt> {
        std::iter::successors(Some(Self::first(pointer)), |attempt| attempt.next())
    }
}
