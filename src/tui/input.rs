use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use gridkeys_core::model::PlainInput;
use gridkeys_core::{CodeMode, KeyError};
use ratatui::prelude::*;

use super::ui::{self, Viewport};
use crate::keys::from_crossterm;
use crate::session::Session;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Flow {
    Continue,
    Quit,
}

/// Map a key onto plain editor buffer operations.
fn edit_plain_input(input: &mut PlainInput, key: KeyEvent) {
    match key.code {
        KeyCode::Left => input.move_left(),
        KeyCode::Right => input.move_right(),
        KeyCode::Home => input.move_home(),
        KeyCode::End => input.move_end(),
        KeyCode::Backspace => input.backspace(),
        KeyCode::Delete => input.delete(),
        KeyCode::Char(c)
            if key.modifiers.is_empty() || key.modifiers == KeyModifiers::SHIFT =>
        {
            input.insert(c)
        }
        _ => {}
    }
}

fn arrow_delta(code: KeyCode) -> Option<(i64, i64)> {
    match code {
        KeyCode::Left => Some((-1, 0)),
        KeyCode::Right => Some((1, 0)),
        KeyCode::Up => Some((0, -1)),
        KeyCode::Down => Some((0, 1)),
        _ => None,
    }
}

/// Route one key press. Overlays take input first, then the grid.
pub(crate) fn handle_key_event(
    session: &mut Session,
    viewport: &Viewport,
    key: KeyEvent,
) -> Result<Flow, KeyError> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('q') {
        return Ok(Flow::Quit);
    }

    if session.editor.plain_input.is_some() {
        match key.code {
            KeyCode::Esc => session.cancel_plain_input(),
            KeyCode::Enter => {
                session.commit_plain_input();
            }
            _ => {
                if let Some(input) = session.editor.plain_input.as_mut() {
                    edit_plain_input(input, key);
                }
            }
        }
        return Ok(Flow::Continue);
    }

    if session.editor.type_menu_shown {
        match key.code {
            KeyCode::Char('1') | KeyCode::Char('p') => {
                session.choose_mode(CodeMode::Python);
            }
            KeyCode::Char('2') | KeyCode::Char('f') => {
                session.choose_mode(CodeMode::Formula);
            }
            KeyCode::Esc => session.editor.dismiss_type_menu(),
            _ => {}
        }
        return Ok(Flow::Continue);
    }

    if key.code == KeyCode::Esc && session.editor.code_editor_shown {
        session.close_code_editor();
        return Ok(Flow::Continue);
    }

    if let Some((dx, dy)) = arrow_delta(key.code) {
        let extend = key.modifiers.contains(KeyModifiers::SHIFT);
        let from = if extend {
            session.cursor.keyboard_move_position()
        } else {
            session.cursor_position()
        };
        if viewport.contains(from.offset(dx, dy)) {
            session.navigate(dx, dy, extend);
        }
        return Ok(Flow::Continue);
    }

    session.handle_key(&from_crossterm(key))?;
    Ok(Flow::Continue)
}

pub fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    session: &mut Session,
    viewport: &mut Viewport,
) -> Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, session, viewport))?;

        if let Event::Key(key) = event::read()? {
            // Only process key press events (Windows reports Press + Release)
            if key.kind != KeyEventKind::Press {
                continue;
            }
            match handle_key_event(session, viewport, key) {
                Ok(Flow::Continue) => {}
                Ok(Flow::Quit) => return Ok(()),
                Err(err) => {
                    tracing::error!(%err, "aborting session");
                    return Err(err.into());
                }
            }
        }
    }
}
