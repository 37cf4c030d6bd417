use crate::collab::{
    CellContent, CellDescriptor, EditorController, PermissionLevel, SelectionModel,
};
use crate::error::Result;
use crate::grid::{Position, Rect};

use super::chars::is_allowed_first_char;
use super::intent::{CodeMode, Decision, EditorTarget, Intent, PendingClose};
use super::key::{Key, KeyInput};

/// Everything a key decision may look at or act on.
pub struct Surface<'a> {
    /// Sheet the cursor is on.
    pub sheet_id: &'a str,
    pub permission: PermissionLevel,
    pub selection: &'a mut dyn SelectionModel,
    pub content: &'a mut dyn CellContent,
    pub editor: &'a mut dyn EditorController,
}

/// Stateless translator from key presses to grid intents.
#[derive(Clone, Copy, Debug)]
pub struct KeyInterpreter {
    first_char: fn(char) -> bool,
}

impl Default for KeyInterpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyInterpreter {
    pub fn new() -> Self {
        Self::with_first_char(is_allowed_first_char)
    }

    /// Use `first_char` to decide which characters start typing a value.
    pub fn with_first_char(first_char: fn(char) -> bool) -> Self {
        KeyInterpreter { first_char }
    }

    /// Decide what `input` means for the current surface state.
    ///
    /// Reads only. Fails if the cell under the cursor carries a language tag
    /// outside the known modes.
    pub fn decide(&self, input: &KeyInput, surface: &Surface<'_>) -> Result<Decision> {
        match input.key {
            Key::Tab => {
                let dx = if input.shift { -1 } else { 1 };
                let next = surface.selection.cursor_position().offset(dx, 0);
                return Ok(Decision::Consumed(Intent::MoveCursor(next)));
            }
            Key::Enter => return self.decide_enter(surface).map(Decision::Consumed),
            _ => {}
        }

        // Everything below edits the sheet.
        if !surface.permission.can_edit() {
            return Ok(Decision::Unhandled);
        }

        let decision = match input.key {
            Key::Backspace | Key::Delete => {
                if selection_in_editor(&*surface.selection, &*surface.editor) {
                    Decision::Consumed(Intent::NoOp)
                } else {
                    Decision::Consumed(Intent::DeleteRange(selection_rect(&*surface.selection)))
                }
            }
            Key::Char('/') | Key::Char('=') => Decision::Consumed(self.decide_code_key(surface)?),
            Key::Char(c)
                if (self.first_char)(c)
                    && !selection_in_editor(&*surface.selection, &*surface.editor) =>
            {
                Decision::Consumed(Intent::OpenPlainEditor {
                    at: surface.selection.cursor_position(),
                    seed: Some(c.to_string()),
                })
            }
            _ => Decision::Unhandled,
        };
        Ok(decision)
    }

    /// Carry out `intent` against the collaborators.
    pub fn apply(&self, intent: &Intent, surface: &mut Surface<'_>) {
        match intent {
            Intent::MoveCursor(pos) => surface.selection.move_cursor(*pos, *pos),
            Intent::OpenStructuredEditor(target) => surface.editor.open_structured(target.clone()),
            Intent::OpenPlainEditor { at, seed } => surface.editor.open_plain(*at, seed.clone()),
            Intent::DeleteRange(rect) => {
                surface
                    .content
                    .delete_rectangle(rect.origin, rect.width, rect.height)
            }
            Intent::StagePendingClose(pending) => {
                surface.editor.stage_pending_close(pending.clone())
            }
            Intent::ShowTypeMenu { at, sheet_id } => {
                surface.editor.show_type_menu(*at, sheet_id.clone())
            }
            Intent::NoOp => {}
        }
    }

    /// Decide and apply, returning the decision that was applied.
    pub fn interpret(&self, input: &KeyInput, surface: &mut Surface<'_>) -> Result<Decision> {
        let decision = self.decide(input, surface)?;
        tracing::debug!(key = %input, %decision, "interpreted key");
        if let Decision::Consumed(intent) = &decision {
            self.apply(intent, surface);
        }
        Ok(decision)
    }

    /// Decide and apply. Returns whether the key was consumed.
    pub fn handle(&self, input: &KeyInput, surface: &mut Surface<'_>) -> Result<bool> {
        self.interpret(input, surface).map(|decision| decision.is_consumed())
    }

    fn decide_enter(&self, surface: &Surface<'_>) -> Result<Intent> {
        let cursor = surface.selection.cursor_position();
        let cell = surface.content.render_cell_at(cursor);
        if let Some(mode) = code_mode_of(cell.as_ref(), cursor)? {
            return Ok(Intent::OpenStructuredEditor(EditorTarget::new(
                cursor,
                surface.sheet_id,
                mode,
            )));
        }
        if surface.permission.can_edit() {
            return Ok(Intent::OpenPlainEditor {
                at: cursor,
                seed: cell.and_then(|cell| cell.editable_text),
            });
        }
        Ok(Intent::NoOp)
    }

    fn decide_code_key(&self, surface: &Surface<'_>) -> Result<Intent> {
        let cursor = surface.selection.cursor_position();
        let cell = surface.content.render_cell_at(cursor);
        let editor_shown = surface.editor.is_shown();

        if let Some(mode) = code_mode_of(cell.as_ref(), cursor)? {
            let target = EditorTarget::new(cursor, surface.sheet_id, mode);
            if editor_shown {
                return Ok(Intent::StagePendingClose(PendingClose {
                    target,
                    show_type_menu: false,
                }));
            }
            return Ok(Intent::OpenStructuredEditor(target));
        }

        if editor_shown {
            // The open editor gets to save before the menu replaces it.
            return Ok(Intent::StagePendingClose(PendingClose {
                target: EditorTarget::new(cursor, surface.sheet_id, CodeMode::FIRST),
                show_type_menu: true,
            }));
        }

        Ok(Intent::ShowTypeMenu {
            at: cursor,
            sheet_id: surface.sheet_id.to_string(),
        })
    }
}

fn code_mode_of(cell: Option<&CellDescriptor>, at: Position) -> Result<Option<CodeMode>> {
    let Some(tag) = cell.and_then(|cell| cell.language_tag()) else {
        return Ok(None);
    };
    CodeMode::from_language(tag, at)
        .inspect_err(|err| tracing::error!(%err, "cell language outside known modes"))
        .map(Some)
}

/// Whether the open structured editor is aimed at a selected cell.
fn selection_in_editor(selection: &dyn SelectionModel, editor: &dyn EditorController) -> bool {
    if !editor.is_shown() {
        return false;
    }
    let Some(target) = editor.target() else {
        return false;
    };
    if target.position == selection.cursor_position() {
        return true;
    }
    selection
        .multi_selection()
        .is_some_and(|multi| multi.contains(target.position))
}

/// Deletion rectangle for the selection, extents left unnormalised.
fn selection_rect(selection: &dyn SelectionModel) -> Rect {
    match selection.multi_selection() {
        Some(multi) => multi.to_rect(),
        None => Rect::cell(selection.cursor_position()),
    }
}
