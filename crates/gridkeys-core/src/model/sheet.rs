use std::collections::HashMap;

use crate::collab::{CellContent, CellDescriptor};
use crate::grid::{Position, Rect};

/// Contents of a single cell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SheetCell {
    /// Literal value as typed.
    Value(String),
    /// Script cell; `language` is the raw tag the store was given.
    Code { language: String, source: String },
}

/// A single sheet of cells keyed by position.
#[derive(Clone, Debug, Default)]
pub struct Sheet {
    id: String,
    name: String,
    cells: HashMap<Position, SheetCell>,
}

impl Sheet {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Sheet {
            id: id.into(),
            name: name.into(),
            cells: HashMap::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn get(&self, pos: Position) -> Option<&SheetCell> {
        self.cells.get(&pos)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Store a literal value. An empty value clears the cell.
    pub fn set_value(&mut self, pos: Position, text: impl Into<String>) {
        let text = text.into();
        if text.is_empty() {
            self.cells.remove(&pos);
        } else {
            self.cells.insert(pos, SheetCell::Value(text));
        }
    }

    pub fn set_code(
        &mut self,
        pos: Position,
        language: impl Into<String>,
        source: impl Into<String>,
    ) {
        self.cells.insert(
            pos,
            SheetCell::Code {
                language: language.into(),
                source: source.into(),
            },
        );
    }

    pub fn remove(&mut self, pos: Position) -> Option<SheetCell> {
        self.cells.remove(&pos)
    }

    /// Remove every cell inside `rect`, normalising its extents.
    ///
    /// Returns how many cells were removed.
    pub fn delete_rect(&mut self, rect: Rect) -> usize {
        let (top_left, bottom_right) = rect.bounds();
        let before = self.cells.len();
        self.cells.retain(|pos, _| {
            pos.x < top_left.x
                || pos.x > bottom_right.x
                || pos.y < top_left.y
                || pos.y > bottom_right.y
        });
        let removed = before - self.cells.len();
        tracing::debug!(sheet = %self.id, %rect, removed, "deleted cells");
        removed
    }

    /// Short text for drawing the cell in a grid.
    pub fn display(&self, pos: Position) -> String {
        match self.cells.get(&pos) {
            None => String::new(),
            Some(SheetCell::Value(text)) => text.clone(),
            Some(SheetCell::Code { language, .. }) => format!("<{}>", language),
        }
    }

    /// Cells in row-major order.
    pub fn cells(&self) -> Vec<(Position, &SheetCell)> {
        let mut cells: Vec<_> = self.cells.iter().map(|(pos, cell)| (*pos, cell)).collect();
        cells.sort_by_key(|(pos, _)| (pos.y, pos.x));
        cells
    }
}

impl CellContent for Sheet {
    fn render_cell_at(&self, pos: Position) -> Option<CellDescriptor> {
        self.cells.get(&pos).map(|cell| match cell {
            SheetCell::Value(text) => CellDescriptor::value(text.clone()),
            SheetCell::Code { language, .. } => CellDescriptor::code(language.clone()),
        })
    }

    fn delete_rectangle(&mut self, origin: Position, width: i64, height: i64) {
        self.delete_rect(Rect {
            origin,
            width,
            height,
        });
    }
}
