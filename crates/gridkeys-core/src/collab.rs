//! Collaborator contracts consumed by the interpreter.
//!
//! The interpreter owns no grid state. It reads selection, content and editor
//! visibility through these traits and requests changes through them:
//!
//! - [`SelectionModel`] - cursor and multi-selection
//! - [`CellContent`] - cell lookup and range deletion
//! - [`EditorController`] - structured editor overlay and plain input
//!
//! Requests are fire-and-forget. Implementations apply them synchronously or
//! ignore what they cannot honour.

use std::fmt;
use std::str::FromStr;

use crate::grid::{MultiSelection, Position};
use crate::interpreter::{EditorTarget, PendingClose};

pub trait SelectionModel {
    fn cursor_position(&self) -> Position;

    /// Rectangle bounds when more than one cell is selected.
    fn multi_selection(&self) -> Option<MultiSelection>;

    /// Reposition the single cursor. What happens to a multi-selection is up
    /// to the implementation.
    fn move_cursor(&mut self, cursor: Position, keyboard_move: Position);
}

/// What the content store reports about one cell.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CellDescriptor {
    /// Script language tag for code cells.
    pub language: Option<String>,
    /// Text a plain editor should start from.
    pub editable_text: Option<String>,
}

impl CellDescriptor {
    pub fn value(text: impl Into<String>) -> Self {
        CellDescriptor {
            language: None,
            editable_text: Some(text.into()),
        }
    }

    pub fn code(language: impl Into<String>) -> Self {
        CellDescriptor {
            language: Some(language.into()),
            editable_text: None,
        }
    }

    /// The language tag, if this cell holds structured content.
    ///
    /// An empty tag counts as no tag.
    pub fn language_tag(&self) -> Option<&str> {
        self.language.as_deref().filter(|tag| !tag.is_empty())
    }
}

pub trait CellContent {
    fn render_cell_at(&self, pos: Position) -> Option<CellDescriptor>;

    /// Delete every cell in the rectangle spanned by `origin` and the signed
    /// extents. Negative `width`/`height` must be accepted.
    fn delete_rectangle(&mut self, origin: Position, width: i64, height: i64);
}

pub trait EditorController {
    /// Whether the structured editor overlay is shown.
    fn is_shown(&self) -> bool;

    fn target(&self) -> Option<EditorTarget>;

    /// Open the structured editor, or move it if already open. Hides the
    /// type-choice menu.
    fn open_structured(&mut self, target: EditorTarget);

    fn open_plain(&mut self, at: Position, seed: Option<String>);

    /// Ask the open editor to close once it has confirmed nothing is lost.
    fn stage_pending_close(&mut self, pending: PendingClose);

    fn show_type_menu(&mut self, at: Position, sheet_id: String);
}

/// Access level of the acting principal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PermissionLevel {
    Anonymous,
    #[default]
    Viewer,
    Editor,
    Owner,
}

impl PermissionLevel {
    /// Editor or above.
    pub fn can_edit(self) -> bool {
        matches!(self, PermissionLevel::Editor | PermissionLevel::Owner)
    }

    pub fn name(self) -> &'static str {
        match self {
            PermissionLevel::Anonymous => "anonymous",
            PermissionLevel::Viewer => "viewer",
            PermissionLevel::Editor => "editor",
            PermissionLevel::Owner => "owner",
        }
    }
}

impl fmt::Display for PermissionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PermissionLevel {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "anonymous" => Ok(PermissionLevel::Anonymous),
            "viewer" => Ok(PermissionLevel::Viewer),
            "editor" => Ok(PermissionLevel::Editor),
            "owner" => Ok(PermissionLevel::Owner),
            other => Err(format!("unknown permission level '{}'", other)),
        }
    }
}
