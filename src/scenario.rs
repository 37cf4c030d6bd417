//! Scenario files: a starting grid state plus keys to replay.
//!
//! ```toml
//! permission = "editor"
//! cursor = [1, 0]
//! keys = ["Enter", "Tab", "/"]
//!
//! [[cells]]
//! at = [1, 0]
//! language = "Python"
//! code = "1 + 1"
//! ```

use std::io::Write;
use std::path::{Path, PathBuf};

use gridkeys_core::model::Sheet;
use gridkeys_core::{
    CodeMode, EditorController, EditorTarget, KeyInput, MultiSelection, PermissionLevel, Position,
    SelectionModel,
};
use serde::Deserialize;

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::keys::parse_key_input;
use crate::session::Session;

const MAX_SCENARIO_FILE_BYTES: u64 = 1_048_576; // 1 MiB

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
    sheet: Option<String>,
    permission: Option<String>,
    auto_confirm_close: Option<bool>,
    cursor: Option<[i64; 2]>,
    selection: Option<SelectionSpec>,
    editor: Option<EditorSpec>,
    #[serde(default)]
    cells: Vec<CellSpec>,
    #[serde(default)]
    keys: Vec<String>,
    #[serde(skip)]
    path: PathBuf,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SelectionSpec {
    origin: [i64; 2],
    terminal: [i64; 2],
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct EditorSpec {
    at: [i64; 2],
    language: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CellSpec {
    at: [i64; 2],
    value: Option<String>,
    language: Option<String>,
    code: Option<String>,
}

fn position([x, y]: [i64; 2]) -> Position {
    Position::new(x, y)
}

pub fn load_scenario(path: &Path) -> Result<Scenario> {
    let read_err = |source| AppError::Read {
        path: path.to_path_buf(),
        source,
    };
    let meta = std::fs::metadata(path).map_err(read_err)?;
    if meta.len() > MAX_SCENARIO_FILE_BYTES {
        return Err(AppError::Scenario {
            path: path.to_path_buf(),
            message: format!(
                "file too large ({} bytes, max {})",
                meta.len(),
                MAX_SCENARIO_FILE_BYTES
            ),
        });
    }
    let content = std::fs::read_to_string(path).map_err(read_err)?;
    parse_scenario(&content, path)
}

pub(crate) fn parse_scenario(content: &str, path: &Path) -> Result<Scenario> {
    let mut scenario: Scenario = toml::from_str(content).map_err(|err| AppError::Scenario {
        path: path.to_path_buf(),
        message: err.to_string(),
    })?;
    scenario.path = path.to_path_buf();
    Ok(scenario)
}

impl Scenario {
    fn error(&self, message: impl Into<String>) -> AppError {
        AppError::Scenario {
            path: self.path.clone(),
            message: message.into(),
        }
    }

    /// Build a session from `config`, overridden by what the scenario sets.
    pub fn build_session(&self, config: &Config) -> Result<Session> {
        let name = self.sheet.clone().unwrap_or_else(|| config.sheet_name.clone());
        let mut sheet = Sheet::new(name.clone(), name);

        for cell in &self.cells {
            let at = position(cell.at);
            match (&cell.value, &cell.language, &cell.code) {
                (Some(value), None, None) => sheet.set_value(at, value.clone()),
                (None, Some(language), code) => {
                    // Tags are stored as given; the interpreter checks them.
                    sheet.set_code(at, language.clone(), code.clone().unwrap_or_default())
                }
                _ => {
                    return Err(self.error(format!(
                        "cell {} needs either `value` or `language` (with optional `code`)",
                        at
                    )));
                }
            }
        }

        let permission = match &self.permission {
            Some(raw) => raw.parse::<PermissionLevel>().map_err(|err| self.error(err))?,
            None => config.permission,
        };

        let mut session = Session::new(sheet, permission);
        session.auto_confirm_close = self.auto_confirm_close.unwrap_or(config.auto_confirm_close);

        if let Some(cursor) = self.cursor {
            let cursor = position(cursor);
            session.cursor.move_cursor(cursor, cursor);
        }
        if let Some(selection) = &self.selection {
            session.cursor.select(MultiSelection::new(
                position(selection.origin),
                position(selection.terminal),
            ));
        }
        if let Some(editor) = &self.editor {
            let at = position(editor.at);
            let mode = CodeMode::from_language(&editor.language, at)
                .map_err(|err| self.error(format!("editor: {}", err)))?;
            let target = EditorTarget::new(at, session.sheet_id(), mode);
            session.editor.open_structured(target);
        }
        Ok(session)
    }

    pub fn keys(&self) -> Result<Vec<KeyInput>> {
        self.keys
            .iter()
            .map(|raw| {
                parse_key_input(raw).map_err(|message| AppError::InvalidKey {
                    key: raw.clone(),
                    message,
                })
            })
            .collect()
    }
}

/// Feed `keys` through `session`, writing one line per key and a final
/// state line.
pub fn replay(session: &mut Session, keys: &[KeyInput], out: &mut impl Write) -> Result<()> {
    for (index, key) in keys.iter().enumerate() {
        let decision = session.handle_key(key)?;
        writeln!(out, "{}\t{}\t{}", index + 1, key, decision)?;
    }
    writeln!(out, "{}", session.state_line())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario(content: &str) -> Scenario {
        parse_scenario(content, Path::new("test.toml")).unwrap()
    }

    fn replay_lines(content: &str) -> Vec<String> {
        let scenario = scenario(content);
        let mut session = scenario.build_session(&Config::default()).unwrap();
        let keys = scenario.keys().unwrap();
        let mut out = Vec::new();
        replay(&mut session, &keys, &mut out).unwrap();
        String::from_utf8(out)
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn replay_reports_each_key() {
        let lines = replay_lines(
            r#"
            sheet = "s1"
            permission = "editor"
            cursor = [1, 0]
            keys = ["Enter", "S-Tab", "Enter", "ArrowUp"]

            [[cells]]
            at = [1, 0]
            language = "Python"
            code = "1 + 1"

            [[cells]]
            at = [0, 0]
            value = "42"
            "#,
        );
        assert_eq!(
            lines,
            vec![
                "1\tEnter\tconsumed\topen-structured (1, 0) s1 PYTHON",
                "2\tS-Tab\tconsumed\tmove-cursor (0, 0)",
                "3\tEnter\tconsumed\topen-plain (0, 0) \"42\"",
                "4\tArrowUp\tunhandled\t-",
                "state\tcursor (0, 0) selection none editor open (1, 0) PYTHON menu none \
                 pending none plain (0, 0) \"42\" cells 2",
            ]
        );
    }

    #[test]
    fn selection_and_editor_are_restored() {
        let scenario = scenario(
            r#"
            cursor = [5, 5]
            selection = { origin = [5, 5], terminal = [2, 2] }
            editor = { at = [3, 3], language = "Formula" }
            "#,
        );
        let session = scenario.build_session(&Config::default()).unwrap();
        assert_eq!(
            session.cursor.multi_selection(),
            Some(MultiSelection::new(Position::new(5, 5), Position::new(2, 2)))
        );
        assert!(session.editor.code_editor_shown);
        assert_eq!(
            session.editor.target().map(|t| t.mode),
            Some(CodeMode::Formula)
        );
    }

    #[test]
    fn cell_needs_value_or_language() {
        let scenario = scenario(
            r#"
            [[cells]]
            at = [0, 0]
            value = "x"
            language = "Python"
            "#,
        );
        let err = scenario.build_session(&Config::default()).err().unwrap();
        assert!(err.to_string().contains("needs either"));
    }

    #[test]
    fn bad_permission_and_keys_are_errors() {
        let bad_permission = scenario("permission = \"root\"");
        assert!(bad_permission.build_session(&Config::default()).is_err());

        let bad_key = scenario("keys = [\"C-x\"]");
        let err = bad_key.keys().unwrap_err();
        assert!(matches!(err, AppError::InvalidKey { .. }));
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let err = parse_scenario("colour = 1", Path::new("x.toml")).err().unwrap();
        assert!(matches!(err, AppError::Scenario { .. }));
    }
}
