use crate::collab::SelectionModel;
use crate::grid::{MultiSelection, Position};

/// Cursor plus optional rectangular selection.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Cursor {
    cursor: Position,
    /// Where keyboard extension moves from; tracks the far corner of a
    /// selection grown with shift-arrows.
    keyboard_move: Position,
    multi: Option<MultiSelection>,
}

impl Cursor {
    pub fn at(pos: Position) -> Self {
        Cursor {
            cursor: pos,
            keyboard_move: pos,
            multi: None,
        }
    }

    pub fn keyboard_move_position(&self) -> Position {
        self.keyboard_move
    }

    /// Replace the multi-selection, leaving the cursor where it is.
    pub fn select(&mut self, multi: MultiSelection) {
        self.keyboard_move = multi.terminal;
        self.multi = Some(multi);
    }

    pub fn clear_selection(&mut self) {
        self.keyboard_move = self.cursor;
        self.multi = None;
    }

    /// Arrow-key move: collapses any selection.
    pub fn move_by(&mut self, dx: i64, dy: i64) {
        let next = self.cursor.offset(dx, dy);
        self.move_cursor(next, next);
    }

    /// Shift-arrow move: grows or shrinks the selection from the cursor.
    pub fn extend_by(&mut self, dx: i64, dy: i64) {
        let origin = self.multi.map_or(self.cursor, |multi| multi.origin);
        let terminal = self.keyboard_move.offset(dx, dy);
        self.keyboard_move = terminal;
        self.multi = if terminal == origin {
            None
        } else {
            Some(MultiSelection::new(origin, terminal))
        };
    }

    /// Whether `pos` is part of the selection (the cursor cell included).
    pub fn is_selected(&self, pos: Position) -> bool {
        pos == self.cursor || self.multi.is_some_and(|multi| multi.contains(pos))
    }
}

impl SelectionModel for Cursor {
    fn cursor_position(&self) -> Position {
        self.cursor
    }

    fn multi_selection(&self) -> Option<MultiSelection> {
        self.multi
    }

    fn move_cursor(&mut self, cursor: Position, keyboard_move: Position) {
        self.cursor = cursor;
        self.keyboard_move = keyboard_move;
        self.multi = None;
    }
}
