use serde::Serialize;

use crate::world::Coord;

/// One viewport cell as the presentation layer should draw it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Cell {
    Player,
    Void,
    Undiscovered,
    /// `label` is the tile code, or empty for silent codes.
    Discovered { label: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Viewport {
    pub size: usize,
    pub rows: Vec<Vec<Cell>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodeInfo {
    pub label: String,
    pub kind: String,
}

/// Everything needed to redraw after an action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Frame {
    pub position: Coord,
    pub position_label: String,
    pub tile_code: Option<String>,
    pub code_info: Option<CodeInfo>,
    /// Status message if one is set, otherwise the tile's own text.
    pub message: String,
    pub viewport: Viewport,
}

impl Viewport {
    pub fn center(&self) -> Option<&Cell> {
        let half = self.size / 2;
        self.rows.get(half)?.get(half)
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        self.rows.get(row)?.get(col)
    }
}
