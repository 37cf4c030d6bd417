//! gridkeys-core - UI-agnostic key interpretation for a grid surface.

pub mod collab;
pub mod error;
pub mod grid;
pub mod interpreter;
pub mod model;

pub use collab::{CellContent, CellDescriptor, EditorController, PermissionLevel, SelectionModel};
pub use error::{KeyError, Result};
pub use grid::{MultiSelection, Position, Rect};
pub use interpreter::{
    CodeMode, Decision, EditorTarget, Intent, Key, KeyInput, KeyInterpreter, PendingClose,
    Surface, is_allowed_first_char,
};
