//! Error types for gridkeys core.

use thiserror::Error;

use crate::grid::Position;

/// Errors raised while interpreting a key.
///
/// These are contract violations between the content store and the
/// interpreter, not user-facing conditions.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KeyError {
    #[error("Unhandled cell language '{tag}' at {position}")]
    UnknownLanguage { tag: String, position: Position },
}

pub type Result<T> = std::result::Result<T, KeyError>;
