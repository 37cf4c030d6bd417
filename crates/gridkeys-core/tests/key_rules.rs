//! Key rule behaviour against recording collaborators.

use std::cell::Cell;
use std::collections::HashMap;

use gridkeys_core::model::{Cursor, EditorState, Sheet};
use gridkeys_core::{
    CellContent, CellDescriptor, CodeMode, Decision, EditorController, EditorTarget, Intent, Key,
    KeyError, KeyInput, KeyInterpreter, MultiSelection, PendingClose, PermissionLevel, Position,
    SelectionModel, Surface,
};

const SHEET: &str = "sheet-1";

#[derive(Clone, Debug, PartialEq, Eq)]
enum Call {
    Move(Position, Position),
    Delete(Position, i64, i64),
    OpenStructured(EditorTarget),
    OpenPlain(Position, Option<String>),
    Stage(PendingClose),
    TypeMenu(Position, String),
}

#[derive(Default)]
struct FakeSelection {
    cursor: Position,
    multi: Option<MultiSelection>,
    reads: Cell<usize>,
    calls: Vec<Call>,
}

impl SelectionModel for FakeSelection {
    fn cursor_position(&self) -> Position {
        self.reads.set(self.reads.get() + 1);
        self.cursor
    }

    fn multi_selection(&self) -> Option<MultiSelection> {
        self.reads.set(self.reads.get() + 1);
        self.multi
    }

    fn move_cursor(&mut self, cursor: Position, keyboard_move: Position) {
        self.calls.push(Call::Move(cursor, keyboard_move));
    }
}

#[derive(Default)]
struct FakeContent {
    cells: HashMap<Position, CellDescriptor>,
    reads: Cell<usize>,
    calls: Vec<Call>,
}

impl CellContent for FakeContent {
    fn render_cell_at(&self, pos: Position) -> Option<CellDescriptor> {
        self.reads.set(self.reads.get() + 1);
        self.cells.get(&pos).cloned()
    }

    fn delete_rectangle(&mut self, origin: Position, width: i64, height: i64) {
        self.calls.push(Call::Delete(origin, width, height));
    }
}

#[derive(Default)]
struct FakeEditor {
    target: Option<EditorTarget>,
    reads: Cell<usize>,
    calls: Vec<Call>,
}

impl EditorController for FakeEditor {
    fn is_shown(&self) -> bool {
        self.reads.set(self.reads.get() + 1);
        self.target.is_some()
    }

    fn target(&self) -> Option<EditorTarget> {
        self.reads.set(self.reads.get() + 1);
        self.target.clone()
    }

    fn open_structured(&mut self, target: EditorTarget) {
        self.calls.push(Call::OpenStructured(target));
    }

    fn open_plain(&mut self, at: Position, seed: Option<String>) {
        self.calls.push(Call::OpenPlain(at, seed));
    }

    fn stage_pending_close(&mut self, pending: PendingClose) {
        self.calls.push(Call::Stage(pending));
    }

    fn show_type_menu(&mut self, at: Position, sheet_id: String) {
        self.calls.push(Call::TypeMenu(at, sheet_id));
    }
}

struct Harness {
    permission: PermissionLevel,
    selection: FakeSelection,
    content: FakeContent,
    editor: FakeEditor,
}

impl Harness {
    fn new(permission: PermissionLevel) -> Self {
        Harness {
            permission,
            selection: FakeSelection::default(),
            content: FakeContent::default(),
            editor: FakeEditor::default(),
        }
    }

    fn editor() -> Self {
        Self::new(PermissionLevel::Editor)
    }

    fn viewer() -> Self {
        Self::new(PermissionLevel::Viewer)
    }

    fn cursor(mut self, x: i64, y: i64) -> Self {
        self.selection.cursor = Position::new(x, y);
        self
    }

    fn multi(mut self, origin: (i64, i64), terminal: (i64, i64)) -> Self {
        self.selection.multi = Some(MultiSelection::new(
            Position::new(origin.0, origin.1),
            Position::new(terminal.0, terminal.1),
        ));
        self
    }

    fn cell(mut self, x: i64, y: i64, cell: CellDescriptor) -> Self {
        self.content.cells.insert(Position::new(x, y), cell);
        self
    }

    fn open_editor(mut self, x: i64, y: i64, mode: CodeMode) -> Self {
        self.editor.target = Some(EditorTarget::new(Position::new(x, y), SHEET, mode));
        self
    }

    fn surface(&mut self) -> Surface<'_> {
        Surface {
            sheet_id: SHEET,
            permission: self.permission,
            selection: &mut self.selection,
            content: &mut self.content,
            editor: &mut self.editor,
        }
    }

    fn handle(&mut self, input: KeyInput) -> Result<bool, KeyError> {
        KeyInterpreter::new().handle(&input, &mut self.surface())
    }

    fn decide(&mut self, input: KeyInput) -> Result<Decision, KeyError> {
        KeyInterpreter::new().decide(&input, &self.surface())
    }

    fn calls(&self) -> Vec<Call> {
        let mut calls = self.selection.calls.clone();
        calls.extend(self.content.calls.iter().cloned());
        calls.extend(self.editor.calls.iter().cloned());
        calls
    }

    fn reads(&self) -> usize {
        self.selection.reads.get() + self.content.reads.get() + self.editor.reads.get()
    }
}

fn key(name: &str) -> KeyInput {
    KeyInput::from_name(name, false)
}

fn target(x: i64, y: i64, mode: CodeMode) -> EditorTarget {
    EditorTarget::new(Position::new(x, y), SHEET, mode)
}

#[test]
fn unmatched_keys_are_unhandled_without_any_call() {
    for permission in [PermissionLevel::Viewer, PermissionLevel::Owner] {
        for name in ["ArrowUp", "Escape", "F2", " ", "Shift", "\u{7}"] {
            let mut h = Harness::new(permission)
                .cursor(1, 1)
                .cell(1, 1, CellDescriptor::code("Python"))
                .open_editor(3, 3, CodeMode::Python);
            assert_eq!(h.handle(key(name)), Ok(false), "{name:?}");
            assert!(h.calls().is_empty(), "{name:?}");
            assert_eq!(h.reads(), 0, "{name:?}");
        }
    }
}

#[test]
fn tab_moves_right_regardless_of_permission_and_selection() {
    for permission in [PermissionLevel::Anonymous, PermissionLevel::Editor] {
        for (x, y) in [(0, 0), (-4, 7), (9, -2)] {
            let mut h = Harness::new(permission)
                .cursor(x, y)
                .multi((x, y), (x + 3, y + 3));
            assert_eq!(h.handle(key("Tab")), Ok(true));
            let next = Position::new(x + 1, y);
            assert_eq!(h.calls(), vec![Call::Move(next, next)]);
        }
    }
}

#[test]
fn shift_tab_moves_left() {
    let mut h = Harness::viewer().cursor(0, 5);
    assert_eq!(h.handle(KeyInput::from_name("Tab", true)), Ok(true));
    let next = Position::new(-1, 5);
    assert_eq!(h.calls(), vec![Call::Move(next, next)]);
}

#[test]
fn tab_stays_put_at_coordinate_limits() {
    let mut h = Harness::viewer().cursor(i64::MAX, 0);
    assert_eq!(h.handle(key("Tab")), Ok(true));
    let edge = Position::new(i64::MAX, 0);
    assert_eq!(h.calls(), vec![Call::Move(edge, edge)]);

    let mut h = Harness::viewer().cursor(i64::MIN, 3);
    assert_eq!(h.handle(KeyInput::from_name("Tab", true)), Ok(true));
    let edge = Position::new(i64::MIN, 3);
    assert_eq!(h.calls(), vec![Call::Move(edge, edge)]);
}

#[test]
fn enter_on_code_cell_opens_editor_even_for_viewers() {
    for (tag, mode) in [("Python", CodeMode::Python), ("Formula", CodeMode::Formula)] {
        let mut h = Harness::viewer()
            .cursor(2, 3)
            .cell(2, 3, CellDescriptor::code(tag));
        assert_eq!(h.handle(key("Enter")), Ok(true));
        assert_eq!(h.calls(), vec![Call::OpenStructured(target(2, 3, mode))]);
    }
}

#[test]
fn enter_on_code_cell_moves_an_open_editor() {
    let mut h = Harness::editor()
        .cursor(2, 3)
        .cell(2, 3, CellDescriptor::code("Formula"))
        .open_editor(0, 0, CodeMode::Python);
    assert_eq!(h.handle(key("Enter")), Ok(true));
    assert_eq!(
        h.calls(),
        vec![Call::OpenStructured(target(2, 3, CodeMode::Formula))]
    );
}

#[test]
fn enter_clears_type_menu() {
    let mut cursor = Cursor::at(Position::new(1, 0));
    let mut sheet = Sheet::new(SHEET, "Sheet 1");
    sheet.set_code(Position::new(1, 0), "Python", "print(1)");
    let mut editor = EditorState::default();
    editor.show_type_menu(Position::new(4, 4), SHEET.to_string());

    let mut surface = Surface {
        sheet_id: SHEET,
        permission: PermissionLevel::Viewer,
        selection: &mut cursor,
        content: &mut sheet,
        editor: &mut editor,
    };
    assert_eq!(KeyInterpreter::new().handle(&key("Enter"), &mut surface), Ok(true));

    assert!(!editor.type_menu_shown);
    assert!(editor.code_editor_shown);
    assert_eq!(editor.selected, Some(target(1, 0, CodeMode::Python)));
}

#[test]
fn enter_on_unknown_language_fails_loudly() {
    for permission in [PermissionLevel::Viewer, PermissionLevel::Editor] {
        let mut h = Harness::new(permission)
            .cursor(0, 1)
            .cell(0, 1, CellDescriptor::code("Julia"));
        let err = h.handle(key("Enter")).unwrap_err();
        assert_eq!(
            err,
            KeyError::UnknownLanguage {
                tag: "Julia".to_string(),
                position: Position::new(0, 1),
            }
        );
        assert!(h.calls().is_empty());
    }
}

#[test]
fn enter_on_plain_cell_seeds_exact_text() {
    let mut h = Harness::editor()
        .cursor(4, 4)
        .cell(4, 4, CellDescriptor::value("  12.50 USD "));
    assert_eq!(h.handle(key("Enter")), Ok(true));
    assert_eq!(
        h.calls(),
        vec![Call::OpenPlain(
            Position::new(4, 4),
            Some("  12.50 USD ".to_string())
        )]
    );
}

#[test]
fn enter_on_absent_cell_with_permission_opens_empty_editor() {
    let mut h = Harness::editor().cursor(7, 0);
    assert_eq!(h.handle(key("Enter")), Ok(true));
    assert_eq!(h.calls(), vec![Call::OpenPlain(Position::new(7, 0), None)]);
}

#[test]
fn enter_without_permission_on_non_code_cell_is_inert_but_consumed() {
    let mut absent = Harness::viewer().cursor(7, 0);
    assert_eq!(absent.handle(key("Enter")), Ok(true));
    assert!(absent.calls().is_empty());

    let mut plain = Harness::viewer()
        .cursor(7, 0)
        .cell(7, 0, CellDescriptor::value("x"));
    assert_eq!(plain.decide(key("Enter")), Ok(Decision::Consumed(Intent::NoOp)));
    assert_eq!(plain.handle(key("Enter")), Ok(true));
    assert!(plain.calls().is_empty());
}

#[test]
fn editing_keys_are_unhandled_without_permission() {
    for permission in [PermissionLevel::Anonymous, PermissionLevel::Viewer] {
        for name in ["Backspace", "Delete", "/", "=", "a", "7", "-"] {
            let mut h = Harness::new(permission)
                .cursor(1, 1)
                .cell(1, 1, CellDescriptor::code("Python"))
                .open_editor(5, 5, CodeMode::Formula);
            assert_eq!(h.handle(key(name)), Ok(false), "{name:?}");
            assert!(h.calls().is_empty(), "{name:?}");
        }
    }
}

#[test]
fn delete_single_cell() {
    for name in ["Backspace", "Delete"] {
        let mut h = Harness::editor().cursor(3, -2);
        assert_eq!(h.handle(key(name)), Ok(true));
        assert_eq!(h.calls(), vec![Call::Delete(Position::new(3, -2), 0, 0)]);
    }
}

#[test]
fn delete_multi_selection_keeps_signed_extents() {
    let mut backwards = Harness::editor().cursor(5, 5).multi((5, 5), (2, 2));
    assert_eq!(backwards.handle(key("Delete")), Ok(true));
    assert_eq!(
        backwards.calls(),
        vec![Call::Delete(Position::new(5, 5), -3, -3)]
    );

    let mut forwards = Harness::editor().cursor(1, 1).multi((1, 1), (4, 2));
    assert_eq!(forwards.handle(key("Backspace")), Ok(true));
    assert_eq!(forwards.calls(), vec![Call::Delete(Position::new(1, 1), 3, 1)]);
}

#[test]
fn delete_on_open_editor_target_is_left_to_the_editor() {
    let mut single = Harness::editor()
        .cursor(2, 2)
        .open_editor(2, 2, CodeMode::Python);
    assert_eq!(single.handle(key("Backspace")), Ok(true));
    assert!(single.calls().is_empty());

    let mut multi = Harness::editor()
        .cursor(5, 5)
        .multi((5, 5), (2, 2))
        .open_editor(3, 4, CodeMode::Python);
    assert_eq!(multi.handle(key("Delete")), Ok(true));
    assert!(multi.calls().is_empty());
}

#[test]
fn delete_with_editor_elsewhere_deletes() {
    let mut h = Harness::editor()
        .cursor(0, 0)
        .multi((0, 0), (1, 1))
        .open_editor(9, 9, CodeMode::Python);
    assert_eq!(h.handle(key("Delete")), Ok(true));
    assert_eq!(h.calls(), vec![Call::Delete(Position::new(0, 0), 1, 1)]);
}

#[test]
fn slash_on_code_cell_opens_editor_when_none_is_shown() {
    let mut h = Harness::editor()
        .cursor(1, 2)
        .cell(1, 2, CellDescriptor::code("Formula"));
    assert_eq!(h.handle(key("/")), Ok(true));
    assert_eq!(
        h.calls(),
        vec![Call::OpenStructured(target(1, 2, CodeMode::Formula))]
    );
}

#[test]
fn slash_on_code_cell_stages_close_when_editor_is_shown() {
    let mut h = Harness::editor()
        .cursor(1, 2)
        .cell(1, 2, CellDescriptor::code("Python"))
        .open_editor(0, 0, CodeMode::Formula);
    assert_eq!(h.handle(key("/")), Ok(true));
    assert_eq!(
        h.calls(),
        vec![Call::Stage(PendingClose {
            target: target(1, 2, CodeMode::Python),
            show_type_menu: false,
        })]
    );
}

#[test]
fn slash_on_plain_cell_with_editor_elsewhere_stages_type_menu() {
    let mut h = Harness::editor()
        .cursor(6, 1)
        .cell(6, 1, CellDescriptor::value("text"))
        .open_editor(0, 0, CodeMode::Formula);
    assert_eq!(h.handle(key("/")), Ok(true));
    assert_eq!(
        h.calls(),
        vec![Call::Stage(PendingClose {
            target: target(6, 1, CodeMode::Python),
            show_type_menu: true,
        })]
    );
}

#[test]
fn slash_on_plain_cell_without_editor_shows_type_menu() {
    let mut h = Harness::editor()
        .cursor(6, 1)
        .cell(6, 1, CellDescriptor::value("text"));
    assert_eq!(h.handle(key("/")), Ok(true));
    assert_eq!(
        h.calls(),
        vec![Call::TypeMenu(Position::new(6, 1), SHEET.to_string())]
    );
}

#[test]
fn equals_behaves_like_slash() {
    let mut h = Harness::editor().cursor(0, 0);
    assert_eq!(h.handle(key("=")), Ok(true));
    assert_eq!(
        h.calls(),
        vec![Call::TypeMenu(Position::new(0, 0), SHEET.to_string())]
    );
}

#[test]
fn slash_on_unknown_language_fails() {
    let mut h = Harness::editor()
        .cursor(0, 0)
        .cell(0, 0, CellDescriptor::code("Lua"));
    assert!(matches!(
        h.handle(key("=")),
        Err(KeyError::UnknownLanguage { .. })
    ));
    assert!(h.calls().is_empty());
}

#[test]
fn typing_a_value_character_opens_seeded_editor() {
    let mut h = Harness::editor().cursor(2, 9);
    assert_eq!(h.handle(KeyInput::from_name("A", true)), Ok(true));
    assert_eq!(
        h.calls(),
        vec![Call::OpenPlain(Position::new(2, 9), Some("A".to_string()))]
    );
}

#[test]
fn typing_inside_open_editor_target_is_unhandled() {
    let mut h = Harness::editor()
        .cursor(2, 2)
        .open_editor(2, 2, CodeMode::Python);
    assert_eq!(h.handle(key("x")), Ok(false));
    assert!(h.calls().is_empty());
}

#[test]
fn decisions_are_repeatable() {
    let inputs = [
        key("Tab"),
        key("Enter"),
        key("Delete"),
        key("/"),
        key("q"),
        key("PageDown"),
    ];
    let mut h = Harness::editor()
        .cursor(3, 3)
        .multi((3, 3), (0, 0))
        .cell(3, 3, CellDescriptor::code("Formula"))
        .open_editor(8, 8, CodeMode::Python);
    for input in inputs {
        let first = h.decide(input.clone());
        let second = h.decide(input);
        assert_eq!(first, second);
    }
    assert!(h.calls().is_empty());
}

#[test]
fn staged_type_menu_opens_after_editor_confirms() {
    let interpreter = KeyInterpreter::new();
    let mut cursor = Cursor::at(Position::new(3, 0));
    let mut sheet = Sheet::new(SHEET, "Sheet 1");
    sheet.set_code(Position::new(0, 0), "Formula", "1 + 1");
    let mut editor = EditorState::default();
    editor.open_structured(target(0, 0, CodeMode::Formula));

    let mut surface = Surface {
        sheet_id: SHEET,
        permission: PermissionLevel::Owner,
        selection: &mut cursor,
        content: &mut sheet,
        editor: &mut editor,
    };
    assert_eq!(interpreter.handle(&KeyInput::new(Key::Char('/')), &mut surface), Ok(true));
    assert!(editor.code_editor_shown);

    assert!(editor.resolve_pending_close());
    assert!(!editor.code_editor_shown);
    assert!(editor.type_menu_shown);
    assert_eq!(editor.selected, Some(target(3, 0, CodeMode::Python)));
}
