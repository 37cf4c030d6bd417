use std::fmt;

use crate::error::{KeyError, Result};
use crate::grid::{Position, Rect};

/// Structured editor modes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CodeMode {
    Python,
    Formula,
}

impl CodeMode {
    /// Mode used when nothing in the cell implies one.
    pub const FIRST: CodeMode = CodeMode::Python;

    /// Resolve a cell's language tag. The mapping is closed: any other tag
    /// means the content store and the interpreter disagree.
    pub fn from_language(tag: &str, position: Position) -> Result<CodeMode> {
        match tag {
            "Python" => Ok(CodeMode::Python),
            "Formula" => Ok(CodeMode::Formula),
            other => Err(KeyError::UnknownLanguage {
                tag: other.to_string(),
                position,
            }),
        }
    }

    pub fn language(self) -> &'static str {
        match self {
            CodeMode::Python => "Python",
            CodeMode::Formula => "Formula",
        }
    }
}

impl fmt::Display for CodeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodeMode::Python => f.write_str("PYTHON"),
            CodeMode::Formula => f.write_str("FORMULA"),
        }
    }
}

/// Cell, sheet and mode a structured editor is aimed at.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct EditorTarget {
    pub position: Position,
    pub sheet_id: String,
    pub mode: CodeMode,
}

impl EditorTarget {
    pub fn new(position: Position, sheet_id: impl Into<String>, mode: CodeMode) -> Self {
        EditorTarget {
            position,
            sheet_id: sheet_id.into(),
            mode,
        }
    }
}

impl fmt::Display for EditorTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.position, self.sheet_id, self.mode)
    }
}

/// A close request the open editor resolves once it is safe to switch.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PendingClose {
    /// Where to go next.
    pub target: EditorTarget,
    /// Show the type-choice menu at `target.position` instead of reopening.
    pub show_type_menu: bool,
}

/// What a key press resolves to.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Intent {
    /// Move the single cursor (and keyboard anchor) here.
    MoveCursor(Position),
    OpenStructuredEditor(EditorTarget),
    OpenPlainEditor {
        at: Position,
        seed: Option<String>,
    },
    /// Delete content in a rectangle with signed extents.
    DeleteRange(Rect),
    StagePendingClose(PendingClose),
    ShowTypeMenu {
        at: Position,
        sheet_id: String,
    },
    /// Consume the key without touching anything.
    NoOp,
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Intent::MoveCursor(pos) => write!(f, "move-cursor {}", pos),
            Intent::OpenStructuredEditor(target) => write!(f, "open-structured {}", target),
            Intent::OpenPlainEditor { at, seed: None } => write!(f, "open-plain {}", at),
            Intent::OpenPlainEditor {
                at,
                seed: Some(seed),
            } => write!(f, "open-plain {} {:?}", at, seed),
            Intent::DeleteRange(rect) => write!(f, "delete {}", rect),
            Intent::StagePendingClose(pending) if pending.show_type_menu => {
                write!(f, "stage-close type-menu {}", pending.target)
            }
            Intent::StagePendingClose(pending) => write!(f, "stage-close {}", pending.target),
            Intent::ShowTypeMenu { at, sheet_id } => write!(f, "type-menu {} {}", at, sheet_id),
            Intent::NoOp => f.write_str("no-op"),
        }
    }
}

/// Outcome of interpreting one key.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Decision {
    /// The key belongs to the grid; the host should suppress its default.
    Consumed(Intent),
    /// Not ours; let the host handle it.
    Unhandled,
}

impl Decision {
    pub fn is_consumed(&self) -> bool {
        matches!(self, Decision::Consumed(_))
    }

    pub fn intent(&self) -> Option<&Intent> {
        match self {
            Decision::Consumed(intent) => Some(intent),
            Decision::Unhandled => None,
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decision::Consumed(intent) => write!(f, "consumed\t{}", intent),
            Decision::Unhandled => f.write_str("unhandled\t-"),
        }
    }
}
