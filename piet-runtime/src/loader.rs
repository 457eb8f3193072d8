//! Program loader for JSON codel grids
//!
//! ```json
//! {
//!   "name": "adder",
//!   "codels": [
//!     ["light_red", "red", "#c00000"],
//!     ["black",     "black", "black"]
//!   ]
//! }
//! ```
//!
//! Rows are listed top to bottom. A codel is a color name or a `#rrggbb`
//! code from the Piet palette.

use std::fs;
use std::path::Path;

use piet_core::color::Color;
use piet_core::grid::{CodelGrid, Grid};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{RuntimeError, RuntimeResult};

/// On-disk representation
#[derive(Debug, Serialize, Deserialize)]
struct GridFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    codels: Vec<Vec<String>>,
}

/// A loaded program
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    pub name: Option<String>,
    pub grid: Grid,
}

impl Program {
    pub fn new(grid: Grid) -> Self {
        Self { name: None, grid }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// Loader for grid files
pub struct ProgramLoader;

impl ProgramLoader {
    /// Read and parse a grid file
    pub fn load_file(path: impl AsRef<Path>) -> RuntimeResult<Program> {
        let path = path.as_ref();
        let source = fs::read_to_string(path)
            .map_err(|_| RuntimeError::FileNotFound(path.display().to_string()))?;

        let program = Self::parse(&source)?;
        debug!(
            path = %path.display(),
            width = program.grid.width(),
            height = program.grid.height(),
            "grid loaded"
        );
        Ok(program)
    }

    /// Parse a grid from JSON text
    pub fn parse(source: &str) -> RuntimeResult<Program> {
        let file: GridFile = serde_json::from_str(source)?;

        let mut rows = Vec::with_capacity(file.codels.len());
        for (row, codels) in file.codels.iter().enumerate() {
            let colors = codels
                .iter()
                .enumerate()
                .map(|(column, codel)| {
                    codel.parse::<Color>().map_err(|source| RuntimeError::InvalidCodel {
                        row,
                        column,
                        source,
                    })
                })
                .collect::<RuntimeResult<Vec<Color>>>()?;
            rows.push(colors);
        }

        Ok(Program {
            name: file.name,
            grid: Grid::from_rows(rows)?,
        })
    }

    /// Serialize a program, codels written as color names
    pub fn to_json(program: &Program) -> RuntimeResult<String> {
        let file = GridFile {
            name: program.name.clone(),
            codels: program
                .grid
                .rows()
                .map(|row| row.iter().map(|color| color.name().to_string()).collect())
                .collect(),
        };
        Ok(serde_json::to_string_pretty(&file)?)
    }

    /// Write a program to `path`
    pub fn save_file(program: &Program, path: impl AsRef<Path>) -> RuntimeResult<()> {
        fs::write(path, Self::to_json(program)?)?;
        Ok(())
    }
}
