//! Plain-text chain files
//!
//! A file holds blocks of whitespace-separated integer rows, blocks separated
//! by one or more blank lines. A block is either a lattice (a rectangular
//! matrix of labels, 0 for empty) or adjacency rows (`vertex n1 n2 ...`,
//! padded with 0 or -1). Results are written back as lattices with
//! right-aligned columns.

use std::fs;
use std::path::Path;

use clap::ValueEnum;
use ndarray::Array2;

use crate::graph::{AdjacencyModel, Vertex};
use crate::io::error::{ReconstructionError, Result, file_system_error};

/// How the rows of a block are read
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum InputFormat {
    /// Rectangular label matrix, adjacency read off orthogonal contacts
    #[default]
    Lattice,
    /// One `vertex neighbours...` row per vertex
    Adjacency,
}

/// Consecutive non-blank rows of a chain file
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Block {
    /// 1-based line number of the first row
    pub line: usize,
    /// Parsed integer rows
    pub rows: Vec<Vec<i64>>,
}

impl Block {
    /// Interpret the rows as a rectangular lattice
    ///
    /// # Errors
    ///
    /// Returns `Parse` naming the first row whose length differs from the
    /// first row's.
    pub fn to_lattice(&self) -> Result<Array2<i64>> {
        let cols = self.rows.first().map_or(0, Vec::len);
        if let Some(offset) = self.rows.iter().position(|row| row.len() != cols) {
            return Err(ReconstructionError::Parse {
                line: self.line + offset,
                reason: format!("expected {cols} columns in a lattice row"),
            });
        }

        let cells: Vec<i64> = self.rows.iter().flatten().copied().collect();
        Array2::from_shape_vec((self.rows.len(), cols), cells).map_err(|error| {
            ReconstructionError::Parse {
                line: self.line,
                reason: error.to_string(),
            }
        })
    }

    /// Build the adjacency model the block describes
    ///
    /// # Errors
    ///
    /// Returns `Parse` for ragged lattices and `MalformedInput` when the
    /// described adjacency is invalid.
    pub fn to_model(&self, format: InputFormat) -> Result<AdjacencyModel> {
        match format {
            InputFormat::Lattice => AdjacencyModel::from_lattice(&self.to_lattice()?),
            InputFormat::Adjacency => AdjacencyModel::from_rows(self.rows.iter().filter_map(
                |row| {
                    row.split_first()
                        .map(|(&vertex, neighbors)| (vertex, neighbors.to_vec()))
                },
            )),
        }
    }
}

/// Split text into blocks of integer rows
///
/// # Errors
///
/// Returns `Parse` with the line number of the first token that is not an
/// integer.
pub fn parse_blocks(text: &str) -> Result<Vec<Block>> {
    let mut blocks = Vec::new();
    let mut current: Option<Block> = None;

    for (index, line) in text.lines().enumerate() {
        let number = index + 1;
        if line.trim().is_empty() {
            blocks.extend(current.take());
            continue;
        }

        let row = line
            .split_whitespace()
            .map(|token| {
                token.parse::<i64>().map_err(|error| ReconstructionError::Parse {
                    line: number,
                    reason: format!("'{token}': {error}"),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        current
            .get_or_insert_with(|| Block {
                line: number,
                rows: Vec::new(),
            })
            .rows
            .push(row);
    }

    blocks.extend(current);
    Ok(blocks)
}

/// Read and split a chain file
///
/// # Errors
///
/// Returns `FileSystem` if the file cannot be read and `Parse` for bad tokens
pub fn read_blocks(path: &Path) -> Result<Vec<Block>> {
    let text = fs::read_to_string(path).map_err(file_system_error(path, "read"))?;
    parse_blocks(&text)
}

/// Render a grid with right-aligned columns, one line per row
///
/// An empty grid renders as an empty string.
pub fn render_grid(grid: &Array2<Vertex>) -> String {
    let width = grid
        .iter()
        .map(|label| label.to_string().len())
        .max()
        .unwrap_or(1);

    let mut text = String::new();
    for row in grid.rows() {
        let line = row
            .iter()
            .map(|label| format!("{label:>width$}"))
            .collect::<Vec<_>>()
            .join(" ");
        text.push_str(&line);
        text.push('\n');
    }
    text
}

/// Render grids as blocks separated by blank lines
pub fn render_grids<'a, I>(grids: I) -> String
where
    I: IntoIterator<Item = &'a Array2<Vertex>>,
{
    grids
        .into_iter()
        .map(render_grid)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Write grids to `path` in the lattice format
///
/// # Errors
///
/// Returns `FileSystem` if the file cannot be written
pub fn write_grids<'a, I>(path: &Path, grids: I) -> Result<()>
where
    I: IntoIterator<Item = &'a Array2<Vertex>>,
{
    fs::write(path, render_grids(grids)).map_err(file_system_error(path, "write"))
}
