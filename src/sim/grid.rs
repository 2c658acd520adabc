//! Tile grid and slope model
//!
//! The level is a fixed rows x cols grid of cell symbols. The walkable top of a
//! cell is its row height plus a per-row stagger plus a per-cell slope offset.
//! Offsets are fixed when the level is built; the simulation only reads them.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Cell contents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Tile {
    #[default]
    Empty,
    /// `#` flat platform
    Wall,
    /// `/` ramp cell
    SlopeRight,
    /// `\` ramp cell
    SlopeLeft,
    /// `S` generic slope cell
    Slope,
}

impl Tile {
    pub fn from_symbol(c: char) -> Option<Self> {
        match c {
            '#' => Some(Tile::Wall),
            '/' => Some(Tile::SlopeRight),
            '\\' => Some(Tile::SlopeLeft),
            'S' => Some(Tile::Slope),
            ' ' | '.' => Some(Tile::Empty),
            _ => None,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Tile::Empty => ' ',
            Tile::Wall => '#',
            Tile::SlopeRight => '/',
            Tile::SlopeLeft => '\\',
            Tile::Slope => 'S',
        }
    }

    /// Walls and every slope variant support bodies
    pub fn is_solid(self) -> bool {
        self != Tile::Empty
    }

    pub fn is_wall(self) -> bool {
        self == Tile::Wall
    }

    pub fn is_slope(self) -> bool {
        matches!(self, Tile::SlopeRight | Tile::SlopeLeft | Tile::Slope)
    }
}

/// Errors from building a grid out of text
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GridError {
    #[error("expected {expected} rows, found {found}")]
    RowCount { expected: usize, found: usize },
    #[error("row {row} has {found} cells, expected {expected}")]
    RowWidth {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("unknown tile symbol {symbol:?} at row {row}, col {col}")]
    UnknownSymbol { symbol: char, row: usize, col: usize },
}

/// A row drawn higher (negative) or lower than its grid height
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stagger {
    pub row: i32,
    pub offset: i32,
}

impl Default for Stagger {
    fn default() -> Self {
        Self {
            row: STAGGER_ROW,
            offset: STAGGER_OFFSET,
        }
    }
}

/// Ramp steepness
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RampAngle {
    Deg45,
    Deg30,
}

impl RampAngle {
    /// Vertical drop per cell of ramp
    pub fn rise_per_cell(self) -> i32 {
        match self {
            RampAngle::Deg45 => CELL_SIZE,
            RampAngle::Deg30 => (CELL_SIZE as f32 * 0.577).round() as i32,
        }
    }
}

/// Contiguous run of wall cells on one row (inclusive columns)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub row: i32,
    pub start: i32,
    pub end: i32,
}

impl Span {
    pub fn len(&self) -> i32 {
        self.end - self.start + 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() <= 0
    }
}

/// The level's tile grid
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    rows: i32,
    cols: i32,
    cells: Vec<Tile>,
    slope_offsets: Vec<i32>,
    stagger: Option<Stagger>,
}

impl Default for Grid {
    fn default() -> Self {
        Self::standard()
    }
}

impl Grid {
    /// Blank grid with no stagger
    pub fn empty(rows: i32, cols: i32) -> Self {
        let n = (rows.max(0) * cols.max(0)) as usize;
        Self {
            rows: rows.max(0),
            cols: cols.max(0),
            cells: vec![Tile::Empty; n],
            slope_offsets: vec![0; n],
            stagger: None,
        }
    }

    /// Blank screen-sized grid with the standard row stagger
    pub fn standard() -> Self {
        let mut grid = Self::empty(LEVEL_ROWS, LEVEL_COLS);
        grid.stagger = Some(Stagger::default());
        grid
    }

    /// Parse a level from text, one line per row.
    ///
    /// Every line must be exactly `LEVEL_COLS` symbols wide.
    pub fn parse(text: &str, stagger: Option<Stagger>) -> Result<Self, GridError> {
        let lines: Vec<&str> = text.lines().collect();
        let expected_rows = LEVEL_ROWS as usize;
        let expected_cols = LEVEL_COLS as usize;
        if lines.len() != expected_rows {
            return Err(GridError::RowCount {
                expected: expected_rows,
                found: lines.len(),
            });
        }

        let mut grid = Self::empty(LEVEL_ROWS, LEVEL_COLS);
        grid.stagger = stagger;
        for (row, line) in lines.iter().enumerate() {
            let count = line.chars().count();
            if count != expected_cols {
                return Err(GridError::RowWidth {
                    row,
                    expected: expected_cols,
                    found: count,
                });
            }
            for (col, symbol) in line.chars().enumerate() {
                let tile = Tile::from_symbol(symbol)
                    .ok_or(GridError::UnknownSymbol { symbol, row, col })?;
                grid.set(row as i32, col as i32, tile);
            }
        }
        Ok(grid)
    }

    pub fn rows(&self) -> i32 {
        self.rows
    }

    pub fn cols(&self) -> i32 {
        self.cols
    }

    pub fn stagger(&self) -> Option<Stagger> {
        self.stagger
    }

    pub fn in_bounds(&self, row: i32, col: i32) -> bool {
        row >= 0 && row < self.rows && col >= 0 && col < self.cols
    }

    fn index(&self, row: i32, col: i32) -> Option<usize> {
        self.in_bounds(row, col)
            .then(|| (row * self.cols + col) as usize)
    }

    /// Tile at a cell; out-of-bounds reads as empty
    pub fn tile_at(&self, row: i32, col: i32) -> Tile {
        self.index(row, col)
            .map(|i| self.cells[i])
            .unwrap_or_default()
    }

    pub fn is_solid(&self, row: i32, col: i32) -> bool {
        self.tile_at(row, col).is_solid()
    }

    pub fn is_wall(&self, row: i32, col: i32) -> bool {
        self.tile_at(row, col).is_wall()
    }

    /// Top pixel of a row including its stagger
    pub fn row_top_y(&self, row: i32) -> i32 {
        let stagger = match self.stagger {
            Some(s) if s.row == row => s.offset,
            _ => 0,
        };
        row * CELL_SIZE + stagger
    }

    /// Extra vertical offset of a ramp cell (0 off-grid and on flat cells)
    pub fn slope_offset(&self, row: i32, col: i32) -> i32 {
        self.index(row, col)
            .map(|i| self.slope_offsets[i])
            .unwrap_or(0)
    }

    /// Walkable top pixel of a cell
    pub fn surface_top_y(&self, row: i32, col: i32) -> i32 {
        self.row_top_y(row) + self.slope_offset(row, col)
    }

    pub fn row_has_wall(&self, row: i32) -> bool {
        (0..self.cols).any(|c| self.is_wall(row, c))
    }

    /// Contiguous wall runs on a row, left to right
    pub fn wall_spans(&self, row: i32) -> Vec<Span> {
        let mut spans = Vec::new();
        let mut start = None;
        for col in 0..=self.cols {
            let wall = col < self.cols && self.is_wall(row, col);
            match (wall, start) {
                (true, None) => start = Some(col),
                (false, Some(s)) => {
                    spans.push(Span {
                        row,
                        start: s,
                        end: col - 1,
                    });
                    start = None;
                }
                _ => {}
            }
        }
        spans
    }

    /// Set a tile (no-op out of bounds). Clears any slope offset on the cell.
    pub fn set(&mut self, row: i32, col: i32, tile: Tile) {
        if let Some(i) = self.index(row, col) {
            self.cells[i] = tile;
            self.slope_offsets[i] = 0;
        }
    }

    /// Fill `start..=end` on a row with wall tiles
    pub fn fill_wall(&mut self, row: i32, start: i32, end: i32) {
        for col in start..=end {
            self.set(row, col, Tile::Wall);
        }
    }

    fn ramp_columns(edge_col: i32, from_right: bool, tiles: i32) -> (i32, i32) {
        if from_right {
            (edge_col + 1, edge_col + tiles)
        } else {
            (edge_col - tiles, edge_col - 1)
        }
    }

    /// Whether a ramp of `tiles` cells fits beside `edge_col` on empty cells
    pub fn can_place_ramp(&self, row: i32, edge_col: i32, from_right: bool, tiles: i32) -> bool {
        if tiles <= 0 {
            return false;
        }
        let (start, end) = Self::ramp_columns(edge_col, from_right, tiles);
        if start < 0 || end >= self.cols {
            return false;
        }
        (start..=end).all(|c| self.tile_at(row, c) == Tile::Empty)
    }

    /// Attach a ramp descending away from a platform edge.
    ///
    /// The cell touching the platform sits flush with it and each further cell
    /// drops by the angle's rise. A wall tile just past the ramp's foot is
    /// trimmed so the ramp does not run into another platform.
    pub fn attach_ramp(
        &mut self,
        row: i32,
        edge_col: i32,
        from_right: bool,
        tiles: i32,
        angle: RampAngle,
    ) -> bool {
        if !self.can_place_ramp(row, edge_col, from_right, tiles) {
            return false;
        }
        let (start, end) = Self::ramp_columns(edge_col, from_right, tiles);
        let step = angle.rise_per_cell();
        let tile = if from_right {
            Tile::SlopeRight
        } else {
            Tile::SlopeLeft
        };

        for col in start..=end {
            let distance = if from_right { col - start } else { end - col };
            self.set(row, col, tile);
            if let Some(i) = self.index(row, col) {
                self.slope_offsets[i] = distance * step;
            }
        }

        let beyond = if from_right { end + 1 } else { start - 1 };
        if self.is_wall(row, beyond) {
            self.set(row, beyond, Tile::Empty);
        }
        true
    }

    /// Randomly attach up to 1-4 ramps to platform edges on `rows`.
    ///
    /// Returns how many ramps were placed (gives up after 100 attempts).
    pub fn place_random_ramps<R: Rng>(&mut self, rows: &[i32], rng: &mut R) -> usize {
        if rows.is_empty() {
            return 0;
        }
        let target = rng.random_range(1..=4);
        let mut placed = 0;
        let mut attempts = 0;

        while placed < target && attempts < 100 {
            attempts += 1;
            let row = rows[rng.random_range(0..rows.len())];
            let spans = self.wall_spans(row);
            if spans.is_empty() {
                continue;
            }
            let span = spans[rng.random_range(0..spans.len())];
            let from_right = rng.random_bool(0.5);
            let edge = if from_right { span.end } else { span.start };
            let angle = if rng.random_bool(0.5) {
                RampAngle::Deg45
            } else {
                RampAngle::Deg30
            };
            let tiles = rng.random_range(3..=5);
            if self.attach_ramp(row, edge, from_right, tiles, angle) {
                placed += 1;
            }
        }
        log::debug!("placed {placed} ramps after {attempts} attempts");
        placed
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.rows {
            let line: String = (0..self.cols)
                .map(|c| self.tile_at(row, c).symbol())
                .collect();
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}
