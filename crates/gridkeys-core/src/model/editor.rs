use crate::collab::EditorController;
use crate::grid::Position;
use crate::interpreter::{CodeMode, EditorTarget, PendingClose};

/// Single-line value editor contents.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PlainInput {
    pub at: Position,
    pub buffer: String,
    /// Byte offset into `buffer`.
    pub cursor: usize,
}

impl PlainInput {
    pub fn new(at: Position, seed: Option<String>) -> Self {
        let buffer = seed.unwrap_or_default();
        let cursor = buffer.len();
        PlainInput { at, buffer, cursor }
    }

    fn prev_boundary(&self) -> Option<usize> {
        self.buffer[..self.cursor].char_indices().next_back().map(|(i, _)| i)
    }

    fn next_boundary(&self) -> Option<usize> {
        self.buffer[self.cursor..]
            .chars()
            .next()
            .map(|c| self.cursor + c.len_utf8())
    }

    pub fn move_left(&mut self) {
        if let Some(i) = self.prev_boundary() {
            self.cursor = i;
        }
    }

    pub fn move_right(&mut self) {
        if let Some(i) = self.next_boundary() {
            self.cursor = i;
        }
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.buffer.len();
    }

    pub fn insert(&mut self, c: char) {
        self.buffer.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    /// Remove the character before the cursor.
    pub fn backspace(&mut self) {
        if let Some(i) = self.prev_boundary() {
            self.buffer.replace_range(i..self.cursor, "");
            self.cursor = i;
        }
    }

    /// Remove the character under the cursor.
    pub fn delete(&mut self) {
        if let Some(i) = self.next_boundary() {
            self.buffer.replace_range(self.cursor..i, "");
        }
    }
}

/// Visibility state of the structured editor, the type-choice menu and the
/// plain value editor.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EditorState {
    /// Structured editor overlay is shown.
    pub code_editor_shown: bool,
    /// Type-choice menu is shown at `selected`.
    pub type_menu_shown: bool,
    /// Cell the overlay or menu is aimed at.
    pub selected: Option<EditorTarget>,
    /// Close requested while the overlay is open, awaiting confirmation.
    pub pending_close: Option<PendingClose>,
    pub plain_input: Option<PlainInput>,
}

impl EditorState {
    /// The open editor confirms a staged close.
    ///
    /// Returns `false` if nothing was staged.
    pub fn resolve_pending_close(&mut self) -> bool {
        let Some(pending) = self.pending_close.take() else {
            return false;
        };
        tracing::debug!(
            next = %pending.target,
            menu = pending.show_type_menu,
            "closing code editor"
        );
        if pending.show_type_menu {
            self.code_editor_shown = false;
            self.type_menu_shown = true;
        } else {
            self.code_editor_shown = true;
            self.type_menu_shown = false;
        }
        self.selected = Some(pending.target);
        true
    }

    /// Close the structured editor, dropping any staged close.
    pub fn close(&mut self) {
        self.code_editor_shown = false;
        self.pending_close = None;
    }

    pub fn dismiss_type_menu(&mut self) {
        self.type_menu_shown = false;
    }

    /// Pick a mode from the type-choice menu and open the editor with it.
    pub fn choose_mode(&mut self, mode: CodeMode) -> Option<EditorTarget> {
        if !self.type_menu_shown {
            return None;
        }
        let mut target = self.selected.clone()?;
        target.mode = mode;
        self.open_structured(target.clone());
        Some(target)
    }

    pub fn take_plain_input(&mut self) -> Option<PlainInput> {
        self.plain_input.take()
    }

    pub fn cancel_plain_input(&mut self) {
        self.plain_input = None;
    }
}

impl EditorController for EditorState {
    fn is_shown(&self) -> bool {
        self.code_editor_shown
    }

    fn target(&self) -> Option<EditorTarget> {
        self.selected.clone()
    }

    fn open_structured(&mut self, target: EditorTarget) {
        self.type_menu_shown = false;
        self.code_editor_shown = true;
        self.selected = Some(target);
    }

    fn open_plain(&mut self, at: Position, seed: Option<String>) {
        self.plain_input = Some(PlainInput::new(at, seed));
    }

    fn stage_pending_close(&mut self, pending: PendingClose) {
        if !pending.show_type_menu {
            self.type_menu_shown = false;
        }
        self.pending_close = Some(pending);
    }

    fn show_type_menu(&mut self, at: Position, sheet_id: String) {
        let mode = self
            .selected
            .as_ref()
            .map_or(CodeMode::FIRST, |target| target.mode);
        self.type_menu_shown = true;
        self.selected = Some(EditorTarget {
            position: at,
            sheet_id,
            mode,
        });
    }
}
