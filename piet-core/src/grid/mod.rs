//! # Grid — Codel Storage
//!
//! The interpreter only ever reads a program through [`CodelGrid`]: a
//! bounds-checked `width × height` color lookup. [`Grid`] is the owned,
//! row-major implementation used by loaders, editors and tests.
//!
//! Coordinates follow image conventions: `(0, 0)` is the top-left codel,
//! `x` grows to the right and `y` grows downwards.

pub mod builder;

pub use builder::GridBuilder;

use rand::Rng;
use thiserror::Error;

use crate::color::Color;

/// Grid construction and mutation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    /// Width or height is zero
    #[error("grid must have at least one codel (got {width}x{height})")]
    EmptyGrid { width: usize, height: usize },

    /// More codels than fit in memory
    #[error("grid of {width}x{height} codels is too large")]
    TooLarge { width: usize, height: usize },

    /// Coordinate outside the grid
    #[error("codel ({x}, {y}) is outside the {width}x{height} grid")]
    OutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },

    /// Rows of different lengths
    #[error("row {row} has {found} codels, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
}

/// Result type for grid operations
pub type GridResult<T> = Result<T, GridError>;

/// Codel coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Position {
    pub x: usize,
    pub y: usize,
}

impl Position {
    #[inline]
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// Grid origin, where every run starts
    pub const ORIGIN: Self = Self { x: 0, y: 0 };
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A positioned, colored cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Codel {
    pub position: Position,
    pub color: Color,
}

impl Codel {
    #[inline]
    pub const fn new(position: Position, color: Color) -> Self {
        Self { position, color }
    }
}

/// Read interface consumed by the interpreter
pub trait CodelGrid {
    /// Number of columns
    fn width(&self) -> usize;

    /// Number of rows
    fn height(&self) -> usize;

    /// Color at `(x, y)`, `None` outside the grid
    fn color(&self, x: usize, y: usize) -> Option<Color>;

    /// Whether `(x, y)` lies inside the grid
    #[inline]
    fn contains(&self, x: usize, y: usize) -> bool {
        x < self.width() && y < self.height()
    }

    /// Codel at `(x, y)`, `None` outside the grid
    fn codel(&self, x: usize, y: usize) -> Option<Codel> {
        self.color(x, y)
            .map(|color| Codel::new(Position::new(x, y), color))
    }
}

/// Owned row-major grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Color>,
}

impl Grid {
    /// Grid of `width × height` codels, all `initial`
    pub fn new(width: usize, height: usize, initial: Color) -> GridResult<Self> {
        if width == 0 || height == 0 {
            return Err(GridError::EmptyGrid { width, height });
        }
        let len = width
            .checked_mul(height)
            .filter(|&len| len <= isize::MAX as usize)
            .ok_or(GridError::TooLarge { width, height })?;
        Ok(Self {
            width,
            height,
            cells: vec![initial; len],
        })
    }

    /// Grid from rows listed top to bottom
    pub fn from_rows(rows: Vec<Vec<Color>>) -> GridResult<Self> {
        let height = rows.len();
        let width = rows.first().map(Vec::len).unwrap_or(0);
        if width == 0 || height == 0 {
            return Err(GridError::EmptyGrid { width, height });
        }

        let mut cells = Vec::with_capacity(width * height);
        for (row, codels) in rows.into_iter().enumerate() {
            if codels.len() != width {
                return Err(GridError::RaggedRow {
                    row,
                    expected: width,
                    found: codels.len(),
                });
            }
            cells.extend(codels);
        }

        Ok(Self { width, height, cells })
    }

    #[inline]
    fn index(&self, x: usize, y: usize) -> GridResult<usize> {
        if self.contains(x, y) {
            Ok(y * self.width + x)
        } else {
            Err(GridError::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            })
        }
    }

    /// Recolor a single codel
    pub fn set_color(&mut self, x: usize, y: usize, color: Color) -> GridResult<()> {
        let index = self.index(x, y)?;
        self.cells[index] = color;
        Ok(())
    }

    /// Paint every codel with one color
    pub fn fill(&mut self, color: Color) {
        self.cells.fill(color);
    }

    /// Paint every codel with a random palette color
    pub fn fill_random<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for cell in &mut self.cells {
            *cell = Color::random(rng);
        }
    }

    /// Rows top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[Color]> {
        self.cells.chunks(self.width)
    }

    /// Every codel in row-major order
    pub fn codels(&self) -> impl Iterator<Item = Codel> + '_ {
        self.cells.iter().enumerate().map(move |(i, &color)| {
            Codel::new(Position::new(i % self.width, i / self.width), color)
        })
    }
}

impl CodelGrid for Grid {
    #[inline]
    fn width(&self) -> usize {
        self.width
    }

    #[inline]
    fn height(&self) -> usize {
        self.height
    }

    #[inline]
    fn color(&self, x: usize, y: usize) -> Option<Color> {
        self.index(x, y).ok().map(|i| self.cells[i])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_grid_is_uniform() {
        let grid = Grid::new(3, 2, Color::White).unwrap();
        assert_eq!(grid.width(), 3);
        assert_eq!(grid.height(), 2);
        assert!(grid.codels().all(|c| c.color == Color::White));
        assert_eq!(grid.codels().count(), 6);
    }

    #[test]
    fn test_empty_grid_rejected() {
        assert_eq!(
            Grid::new(0, 4, Color::White),
            Err(GridError::EmptyGrid { width: 0, height: 4 })
        );
        assert!(Grid::from_rows(vec![]).is_err());
    }

    #[test]
    fn test_oversized_grid_rejected() {
        assert_eq!(
            Grid::new(usize::MAX, 2, Color::White),
            Err(GridError::TooLarge { width: usize::MAX, height: 2 })
        );
        assert!(matches!(
            Grid::new(usize::MAX / 2 + 1, 1, Color::White),
            Err(GridError::TooLarge { .. })
        ));
    }

    #[test]
    fn test_color_is_bounds_checked() {
        let mut grid = Grid::new(2, 2, Color::Black).unwrap();
        grid.set_color(1, 0, Color::Red).unwrap();

        assert_eq!(grid.color(1, 0), Some(Color::Red));
        assert_eq!(grid.color(2, 0), None);
        assert_eq!(grid.color(0, 2), None);
        assert!(matches!(
            grid.set_color(5, 5, Color::Red),
            Err(GridError::OutOfBounds { x: 5, y: 5, .. })
        ));
    }

    #[test]
    fn test_from_rows_is_row_major() {
        let grid = Grid::from_rows(vec![
            vec![Color::Red, Color::Green],
            vec![Color::Blue, Color::Black],
        ])
        .unwrap();

        assert_eq!(grid.color(1, 0), Some(Color::Green));
        assert_eq!(grid.color(0, 1), Some(Color::Blue));
        assert_eq!(
            grid.codel(1, 1),
            Some(Codel::new(Position::new(1, 1), Color::Black))
        );

        let rows: Vec<&[Color]> = grid.rows().collect();
        assert_eq!(rows[1], &[Color::Blue, Color::Black]);
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let result = Grid::from_rows(vec![vec![Color::Red, Color::Red], vec![Color::Red]]);
        assert_eq!(
            result,
            Err(GridError::RaggedRow { row: 1, expected: 2, found: 1 })
        );
    }
}
