//! Key interpretation for the grid surface.
//!
//! [`KeyInterpreter::decide`] turns a [`KeyInput`] plus the current
//! collaborator state into a [`Decision`]; [`KeyInterpreter::apply`] carries
//! out the chosen [`Intent`]. [`KeyInterpreter::handle`] does both.

mod chars;
mod decide;
mod intent;
mod key;

pub use chars::is_allowed_first_char;
pub use decide::{KeyInterpreter, Surface};
pub use intent::{CodeMode, Decision, EditorTarget, Intent, PendingClose};
pub use key::{Key, KeyInput};
