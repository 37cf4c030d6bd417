//! In-memory grid collaborators.
//!
//! Plain implementations of the [`crate::collab`] traits, used by the terminal
//! front end and by tests.

mod cursor;
mod editor;
mod sheet;

pub use cursor::Cursor;
pub use editor::{EditorState, PlainInput};
pub use sheet::{Sheet, SheetCell};
