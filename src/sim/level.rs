//! Level descriptors
//!
//! A level names the brick cells that start active. Fetching descriptors
//! is the caller's job; this module only decodes and validates them.

use serde::{Deserialize, Serialize};

use super::state::PlayField;
use crate::consts::*;
use crate::error::SimError;

/// Levels shipped with the game, in menu order
pub const LEVEL_NAMES: [&str; 10] = [
    "Space Invader",
    "Pray For Triple Ball",
    "Chambers",
    "Red vs Blue",
    "Thread The Needle",
    "Blue Random",
    "Thalassophobia",
    "Xmas",
    "Pokeball",
    "Hmm",
];

/// Brick layout for one level
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelDescriptor {
    #[serde(default)]
    pub name: Option<String>,
    /// Grid width in bricks (defaults to `BRICK_COLUMNS`)
    #[serde(default)]
    pub columns: Option<u32>,
    /// Grid height in bricks (defaults to as many rows as fit the field)
    #[serde(default)]
    pub rows: Option<u32>,
    /// Active cells as `[column, row]`
    #[serde(default)]
    pub active: Vec<(u32, u32)>,
}

/// Grid dimensions after validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridSize {
    pub columns: u32,
    pub rows: u32,
}

impl GridSize {
    /// Default grid for a field: fixed column count, fixed-height rows
    pub fn for_field(field: &PlayField) -> Self {
        Self {
            columns: BRICK_COLUMNS,
            rows: (field.height / BRICK_HEIGHT).floor() as u32,
        }
    }
}

impl LevelDescriptor {
    /// Decode a descriptor from JSON text
    pub fn from_json(json: &str) -> Result<Self, SimError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Descriptor activating every column of the given rows
    pub fn with_rows(rows: impl IntoIterator<Item = u32>) -> Self {
        let rows: Vec<u32> = rows.into_iter().collect();
        let active = (0..BRICK_COLUMNS)
            .flat_map(|column| rows.iter().map(move |&row| (column, row)))
            .collect();
        Self {
            active,
            ..Self::default()
        }
    }

    /// Check the descriptor against a field and resolve its grid size
    pub fn validate(&self, field: &PlayField) -> Result<GridSize, SimError> {
        let default = GridSize::for_field(field);
        let grid = GridSize {
            columns: self.columns.unwrap_or(default.columns),
            rows: self.rows.unwrap_or(default.rows),
        };

        if grid.columns == 0 || grid.rows == 0 {
            return Err(SimError::InvalidLevelDescriptor(format!(
                "grid must be non-empty, got {}x{}",
                grid.columns, grid.rows
            )));
        }
        if field.width / (grid.columns as f32) < MIN_BRICK_WIDTH {
            return Err(SimError::InvalidLevelDescriptor(format!(
                "{} columns are too many for a field {} wide",
                grid.columns, field.width
            )));
        }
        if grid.rows as f32 * BRICK_HEIGHT > field.height {
            return Err(SimError::InvalidLevelDescriptor(format!(
                "{} rows of height {} do not fit a field {} high",
                grid.rows, BRICK_HEIGHT, field.height
            )));
        }
        if let Some(&(column, row)) = self
            .active
            .iter()
            .find(|&&(column, row)| column >= grid.columns || row >= grid.rows)
        {
            return Err(SimError::InvalidLevelDescriptor(format!(
                "active cell ({column}, {row}) outside {}x{} grid",
                grid.columns, grid.rows
            )));
        }

        Ok(grid)
    }
}
