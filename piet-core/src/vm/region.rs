//! Color block discovery
//!
//! A color block is the maximal 4-connected set of codels sharing the exact
//! color of a seed codel. Blocks are recomputed on every step and never
//! cached.

use std::collections::HashSet;

use crate::color::Color;
use crate::grid::{Codel, CodelGrid, Position};

use super::pointer::{Chooser, Direction};

/// Connected same-color region
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorBlock {
    color: Color,
    seed: Position,
    cells: HashSet<Position>,
}

impl ColorBlock {
    #[inline]
    pub fn color(&self) -> Color {
        self.color
    }

    /// Codel the block was grown from
    #[inline]
    pub fn seed(&self) -> Position {
        self.seed
    }

    /// Number of codels, the value `Push` pushes
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Never true: a block holds at least its seed
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[inline]
    pub fn contains(&self, position: Position) -> bool {
        self.cells.contains(&position)
    }

    /// Member positions, unordered
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        self.cells.iter().copied()
    }

    /// Members whose coordinate along `dp` is extremal
    pub fn far_edge(&self, dp: Direction) -> Vec<Position> {
        let Some(extreme) = self.positions().map(|p| dp.reach(p)).max() else {
            return Vec::new();
        };
        self.positions().filter(|&p| dp.reach(p) == extreme).collect()
    }

    /// Codel the pointer leaves the block from
    ///
    /// The furthest codel along `dp`, ties broken by the furthest along the
    /// side the chooser points to:
    ///
    /// | DP    | CC left | CC right |
    /// |-------|---------|----------|
    /// | up    | min x   | max x    |
    /// | right | min y   | max y    |
    /// | down  | max x   | min x    |
    /// | left  | max y   | min y    |
    pub fn departure(&self, dp: Direction, cc: Chooser) -> Position {
        let side = cc.relative_to(dp);
        self.positions()
            .max_by_key(|&p| (dp.reach(p), side.reach(p)))
            .unwrap_or(self.seed)
    }
}

/// Flood fill from `seed` over codels of the seed's color
///
/// Iterative: an explicit worklist plus a visited set, so block size is not
/// bounded by the call stack and the work done is proportional to the block
/// and its border rather than to the grid.
pub fn find_block<G: CodelGrid + ?Sized>(grid: &G, seed: Codel) -> ColorBlock {
    let (width, height) = (grid.width(), grid.height());
    let mut visited = HashSet::from([seed.position]);
    let mut cells = HashSet::new();
    let mut worklist = vec![seed.position];

    while let Some(position) = worklist.pop() {
        // the seed is a member even if the grid disagrees about its color
        if position != seed.position && grid.color(position.x, position.y) != Some(seed.color) {
            continue;
        }
        cells.insert(position);

        for dp in Direction::CLOCKWISE {
            let Some(neighbor) = dp.advance(position, width, height) else {
                continue;
            };
            if visited.insert(neighbor) {
                worklist.push(neighbor);
            }
        }
    }

    ColorBlock {
        color: seed.color,
        seed: seed.position,
        cells,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{Grid, GridBuilder};
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::VecDeque;

    fn block_at(grid: &Grid, x: usize, y: usize) -> ColorBlock {
        find_block(grid, grid.codel(x, y).unwrap())
    }

    /// Breadth-first reference used to cross-check the flood fill
    fn reference_block(grid: &Grid, seed: Position) -> HashSet<Position> {
        let color = grid.color(seed.x, seed.y).unwrap();
        let mut seen = HashSet::from([seed]);
        let mut queue = VecDeque::from([seed]);
        while let Some(p) = queue.pop_front() {
            for dp in Direction::CLOCKWISE {
                if let Some(n) = dp.advance(p, grid.width(), grid.height()) {
                    if grid.color(n.x, n.y) == Some(color) && seen.insert(n) {
                        queue.push_back(n);
                    }
                }
            }
        }
        seen
    }

    #[test]
    fn test_single_codel_block() {
        let grid = Grid::from_rows(vec![vec![Color::Red, Color::Blue]]).unwrap();
        let block = block_at(&grid, 0, 0);
        assert_eq!(block.len(), 1);
        assert_eq!(block.color(), Color::Red);
        assert!(block.contains(Position::ORIGIN));
    }

    #[test]
    fn test_diagonal_codels_are_not_connected() {
        let r = Color::Red;
        let b = Color::Blue;
        let grid = Grid::from_rows(vec![vec![r, b], vec![b, r]]).unwrap();

        let block = block_at(&grid, 0, 0);
        assert_eq!(block.len(), 1);
        assert!(!block.contains(Position::new(1, 1)));
    }

    #[test]
    fn test_l_shaped_block() {
        let r = Color::Red;
        let k = Color::Black;
        let grid = Grid::from_rows(vec![
            vec![r, k, k],
            vec![r, k, k],
            vec![r, r, r],
        ])
        .unwrap();

        let block = block_at(&grid, 2, 2);
        assert_eq!(block.len(), 5);
        assert!(block.contains(Position::new(0, 0)));
        assert!(!block.contains(Position::new(1, 1)));
    }

    #[test]
    fn test_whole_grid_block() {
        let grid = GridBuilder::new()
            .width(30)
            .height(20)
            .initial_color(Color::Green)
            .build()
            .unwrap();
        assert_eq!(block_at(&grid, 7, 7).len(), 600);
    }

    /// Vast grid that is black apart from a small red patch at the origin
    struct SparseGrid;

    impl CodelGrid for SparseGrid {
        fn width(&self) -> usize {
            usize::MAX
        }

        fn height(&self) -> usize {
            usize::MAX
        }

        fn color(&self, x: usize, y: usize) -> Option<Color> {
            if !self.contains(x, y) {
                return None;
            }
            Some(if x < 2 && y < 3 { Color::Red } else { Color::Black })
        }
    }

    #[test]
    fn test_fill_cost_follows_block_not_grid() {
        let grid = SparseGrid;
        let block = find_block(&grid, grid.codel(1, 1).unwrap());
        assert_eq!(block.len(), 6);
        assert!(block.contains(Position::new(1, 2)));
        assert!(!block.contains(Position::new(2, 0)));
    }

    #[test]
    fn test_far_edge_and_departure_table() {
        // 3x3 plus sign of red, other codels black
        let r = Color::Red;
        let k = Color::Black;
        let grid = Grid::from_rows(vec![
            vec![k, r, k],
            vec![r, r, r],
            vec![k, r, k],
        ])
        .unwrap();
        let block = block_at(&grid, 1, 1);

        assert_eq!(block.far_edge(Direction::Right), vec![Position::new(2, 1)]);

        // full rectangle to exercise the tie-breaks
        let grid = Grid::new(3, 2, Color::Red).unwrap();
        let block = block_at(&grid, 0, 0);
        let mut edge = block.far_edge(Direction::Down);
        edge.sort();
        assert_eq!(edge, vec![Position::new(0, 1), Position::new(1, 1), Position::new(2, 1)]);

        use Chooser::{Left, Right};
        let cases = [
            (Direction::Up, Left, Position::new(0, 0)),
            (Direction::Up, Right, Position::new(2, 0)),
            (Direction::Right, Left, Position::new(2, 0)),
            (Direction::Right, Right, Position::new(2, 1)),
            (Direction::Down, Left, Position::new(2, 1)),
            (Direction::Down, Right, Position::new(0, 1)),
            (Direction::Left, Left, Position::new(0, 1)),
            (Direction::Left, Right, Position::new(0, 0)),
        ];
        for (dp, cc, expected) in cases {
            assert_eq!(block.departure(dp, cc), expected, "dp={dp} cc={cc}");
        }
    }

    #[test]
    fn test_region_containment_on_random_grids() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        for seed in 0..20u64 {
            let grid = GridBuilder::new().width(12).height(9).seed(seed).build().unwrap();
            for _ in 0..10 {
                use rand::Rng;
                let x = rng.gen_range(0..grid.width());
                let y = rng.gen_range(0..grid.height());
                let block = block_at(&grid, x, y);
                let color = grid.color(x, y).unwrap();

                assert!(block.positions().all(|p| grid.color(p.x, p.y) == Some(color)));
                let expected = reference_block(&grid, Position::new(x, y));
                let found: HashSet<Position> = block.positions().collect();
                assert_eq!(found, expected);
            }
        }
    }
}
