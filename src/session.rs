//! A grid session: one sheet, its cursor and editors, and the interpreter.

use gridkeys_core::model::{Cursor, EditorState, Sheet, SheetCell};
use gridkeys_core::{
    CodeMode, Decision, EditorController, Intent, KeyInput, KeyInterpreter, PermissionLevel,
    Position, SelectionModel, Surface,
};

use crate::config::Config;

/// Everything the front ends drive through key presses.
pub struct Session {
    pub sheet: Sheet,
    pub cursor: Cursor,
    pub editor: EditorState,
    pub permission: PermissionLevel,
    /// The code editor has no unsaved state of its own, so it may confirm a
    /// staged close as soon as it is requested.
    pub auto_confirm_close: bool,
    /// Last interpreter decision, for the status bar.
    pub last_decision: Option<Decision>,
    pub status_message: String,
    sheet_id: String,
    interpreter: KeyInterpreter,
}

impl Session {
    pub fn new(sheet: Sheet, permission: PermissionLevel) -> Self {
        let sheet_id = sheet.id().to_string();
        Session {
            sheet,
            cursor: Cursor::default(),
            editor: EditorState::default(),
            permission,
            auto_confirm_close: true,
            last_decision: None,
            status_message: String::new(),
            sheet_id,
            interpreter: KeyInterpreter::new(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let sheet = Sheet::new(config.sheet_name.clone(), config.sheet_name.clone());
        let mut session = Session::new(sheet, config.permission);
        session.auto_confirm_close = config.auto_confirm_close;
        session
    }

    pub fn sheet_id(&self) -> &str {
        &self.sheet_id
    }

    fn surface(&mut self) -> Surface<'_> {
        Surface {
            sheet_id: &self.sheet_id,
            permission: self.permission,
            selection: &mut self.cursor,
            content: &mut self.sheet,
            editor: &mut self.editor,
        }
    }

    /// Run one key through the interpreter and apply what it decides.
    pub fn handle_key(&mut self, input: &KeyInput) -> gridkeys_core::Result<Decision> {
        let interpreter = self.interpreter;
        let decision = interpreter.interpret(input, &mut self.surface())?;

        if self.auto_confirm_close && self.editor.resolve_pending_close() {
            tracing::debug!("code editor confirmed staged close");
        }
        self.status_message = match &decision {
            Decision::Consumed(intent) => describe(intent),
            Decision::Unhandled => String::new(),
        };
        self.last_decision = Some(decision.clone());
        Ok(decision)
    }

    /// Arrow navigation; `extend` grows the selection instead.
    pub fn navigate(&mut self, dx: i64, dy: i64, extend: bool) {
        if extend {
            self.cursor.extend_by(dx, dy);
        } else {
            self.cursor.move_by(dx, dy);
        }
    }

    /// Write the plain editor's text into its cell.
    pub fn commit_plain_input(&mut self) -> bool {
        let Some(input) = self.editor.take_plain_input() else {
            return false;
        };
        self.sheet.set_value(input.at, input.buffer);
        self.status_message = format!("Set {}", input.at);
        true
    }

    pub fn cancel_plain_input(&mut self) {
        self.editor.cancel_plain_input();
    }

    pub fn close_code_editor(&mut self) {
        self.editor.close();
    }

    /// Type menu pick. Opens the structured editor on the menu's cell.
    pub fn choose_mode(&mut self, mode: CodeMode) -> bool {
        match self.editor.choose_mode(mode) {
            Some(target) => {
                self.status_message = format!("Editing {} as {}", target.position, mode);
                true
            }
            None => false,
        }
    }

    /// Source of the cell the code editor is aimed at.
    pub fn code_source(&self) -> Option<&str> {
        let target = self.editor.target()?;
        match self.sheet.get(target.position)? {
            SheetCell::Code { source, .. } => Some(source.as_str()),
            SheetCell::Value(_) => None,
        }
    }

    /// One-line summary of cursor and editor state.
    pub fn state_line(&self) -> String {
        let cursor = self.cursor.cursor_position();
        let selection = match self.cursor.multi_selection() {
            Some(multi) => format!("{}..{}", multi.origin, multi.terminal),
            None => "none".to_string(),
        };
        let editor = match (&self.editor.selected, self.editor.code_editor_shown) {
            (Some(target), true) => format!("open {} {}", target.position, target.mode),
            _ => "closed".to_string(),
        };
        let menu = match (&self.editor.selected, self.editor.type_menu_shown) {
            (Some(target), true) => target.position.to_string(),
            _ => "none".to_string(),
        };
        let pending = match &self.editor.pending_close {
            Some(pending) if pending.show_type_menu => format!("menu {}", pending.target.position),
            Some(pending) => format!("{} {}", pending.target.position, pending.target.mode),
            None => "none".to_string(),
        };
        let plain = match &self.editor.plain_input {
            Some(input) => format!("{} {:?}", input.at, input.buffer),
            None => "none".to_string(),
        };
        format!(
            "state\tcursor {} selection {} editor {} menu {} pending {} plain {} cells {}",
            cursor,
            selection,
            editor,
            menu,
            pending,
            plain,
            self.sheet.len()
        )
    }

    pub fn cursor_position(&self) -> Position {
        self.cursor.cursor_position()
    }
}

fn describe(intent: &Intent) -> String {
    match intent {
        Intent::MoveCursor(pos) => format!("Moved to {}", pos),
        Intent::OpenStructuredEditor(target) => {
            format!("Code editor at {} ({})", target.position, target.mode)
        }
        Intent::OpenPlainEditor { at, .. } => format!("Editing {}", at),
        Intent::DeleteRange(rect) => format!("Deleted {}", rect),
        Intent::StagePendingClose(_) => "Waiting for code editor to close".to_string(),
        Intent::ShowTypeMenu { at, .. } => format!("Choose cell type for {}", at),
        Intent::NoOp => String::new(),
    }
}
