//! Next-codel search
//!
//! From the current block, probe the eight `(dp, cc)` combinations in retry
//! order until one leads to a chromatic codel. Eight consecutive failures mean
//! the block has no exit and the program halts.

use tracing::trace;

use crate::color::Color;
use crate::grid::{Codel, CodelGrid, Position};

use super::pointer::{Attempt, Direction, MAX_ATTEMPTS, PointerState};
use super::region::ColorBlock;

/// Result of one search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOutcome {
    /// Codel to move to, `None` when every attempt was blocked
    pub next: Option<Codel>,
    /// The move slid through at least one white codel
    pub crossed_white: bool,
    /// Attempts made, `1..=8`
    pub attempts: usize,
}

impl SearchOutcome {
    #[inline]
    pub fn is_exhausted(&self) -> bool {
        self.next.is_none()
    }
}

/// Outcome of a single probe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Probe {
    Blocked,
    Found { codel: Codel, crossed_white: bool },
}

/// Step from `from` along `dp`, sliding through white codels
fn probe<G: CodelGrid + ?Sized>(grid: &G, from: Position, dp: Direction) -> Probe {
    let (width, height) = (grid.width(), grid.height());
    let mut position = from;
    let mut crossed_white = false;

    loop {
        let Some(next) = dp.advance(position, width, height) else {
            return Probe::Blocked;
        };
        match grid.color(next.x, next.y) {
            None | Some(Color::Black) => return Probe::Blocked,
            Some(Color::White) => {
                crossed_white = true;
                position = next;
            }
            Some(color) => {
                return Probe::Found {
                    codel: Codel::new(next, color),
                    crossed_white,
                };
            }
        }
    }
}

/// Find the codel the pointer moves to from `block`
///
/// `pointer` is updated in place: on success it holds the `(dp, cc)` of the
/// successful attempt, after eight failures it has gone through a full cycle
/// and is back at its starting value.
pub fn search<G: CodelGrid + ?Sized>(
    grid: &G,
    block: &ColorBlock,
    pointer: &mut PointerState,
) -> SearchOutcome {
    let mut last = Attempt::first(*pointer);

    for attempt in Attempt::sequence(*pointer) {
        let PointerState { dp, cc } = attempt.pointer();
        *pointer = attempt.pointer();

        let departure = block.departure(dp, cc);
        match probe(grid, departure, dp) {
            Probe::Found { codel, crossed_white } => {
                trace!(
                    attempt = attempt.index(),
                    %departure,
                    next = %codel.position,
                    crossed_white,
                    "exit found"
                );
                return SearchOutcome {
                    next: Some(codel),
                    crossed_white,
                    attempts: attempt.index() + 1,
                };
            }
            Probe::Blocked => {
                trace!(attempt = attempt.index(), %departure, %dp, %cc, "blocked");
                last = attempt;
            }
        }
    }

    *pointer = last.recovered();
    SearchOutcome {
        next: None,
        crossed_white: false,
        attempts: MAX_ATTEMPTS,
    }
}
