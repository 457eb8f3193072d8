//! Fluent grid construction

use rand::SeedableRng;
use rand::rngs::StdRng;

use super::{Grid, GridResult};
use crate::color::Color;

/// Builder for [`Grid`]
///
/// # Example
///
/// ```
/// use piet_core::grid::{CodelGrid, GridBuilder};
/// use piet_core::color::Color;
///
/// let grid = GridBuilder::new()
///     .width(25)
///     .height(15)
///     .initial_color(Color::White)
///     .build()
///     .unwrap();
///
/// assert_eq!(grid.color(24, 14), Some(Color::White));
/// ```
#[derive(Debug, Clone)]
pub struct GridBuilder {
    width: usize,
    height: usize,
    initial_color: Color,
    random_colors: bool,
    seed: Option<u64>,
}

impl Default for GridBuilder {
    fn default() -> Self {
        Self {
            width: 0,
            height: 0,
            initial_color: Color::White,
            random_colors: false,
            seed: None,
        }
    }
}

impl GridBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }

    pub fn height(mut self, height: usize) -> Self {
        self.height = height;
        self
    }

    pub fn initial_color(mut self, color: Color) -> Self {
        self.initial_color = color;
        self
    }

    /// Fill every codel with a random palette color
    pub fn random_colors(mut self) -> Self {
        self.random_colors = true;
        self
    }

    /// Fix the random fill seed (implies [`GridBuilder::random_colors`])
    pub fn seed(mut self, seed: u64) -> Self {
        self.random_colors = true;
        self.seed = Some(seed);
        self
    }

    pub fn build(self) -> GridResult<Grid> {
        let mut grid = Grid::new(self.width, self.height, self.initial_color)?;

        if self.random_colors {
            let mut rng = match self.seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            grid.fill_random(&mut rng);
        }

        Ok(grid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{CodelGrid, GridError};

    #[test]
    fn test_defaults_to_white() {
        let grid = GridBuilder::new().width(4).height(3).build().unwrap();
        assert!(grid.codels().all(|c| c.color == Color::White));
    }

    #[test]
    fn test_missing_dimensions_rejected() {
        let result = GridBuilder::new().width(4).build();
        assert_eq!(result, Err(GridError::EmptyGrid { width: 4, height: 0 }));
    }

    #[test]
    fn test_overflowing_dimensions_rejected() {
        let result = GridBuilder::new().width(usize::MAX).height(2).build();
        assert!(matches!(result, Err(GridError::TooLarge { height: 2, .. })));
    }

    #[test]
    fn test_seeded_random_fill_is_reproducible() {
        let a = GridBuilder::new().width(8).height(8).seed(42).build().unwrap();
        let b = GridBuilder::new().width(8).height(8).seed(42).build().unwrap();
        assert_eq!(a, b);
        assert_eq!(a.width(), 8);
    }
}
