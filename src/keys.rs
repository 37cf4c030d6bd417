//! Key name parsing and terminal key translation.
//!
//! Scenario files name keys the way keymaps do: `"Tab"`, `"S-Tab"`,
//! `"Enter"`, `"/"`, `"a"`, `"slash"`, `"shift-left"`.

use gridkeys_core::{Key, KeyInput};

/// Parse a key combo such as `"S-Tab"` or `"Backspace"`.
pub fn parse_key_input(input: &str) -> Result<KeyInput, String> {
    let trimmed = input.trim_matches(|c: char| c == '\n' || c == '\r');
    if trimmed.is_empty() {
        return Err("empty key".to_string());
    }
    if let Some(ch) = parse_single_char(trimmed) {
        return Ok(KeyInput::new(Key::Char(ch)));
    }

    let (shift, key_part) = split_shift(trimmed)?;
    let key = parse_key(key_part)?;
    Ok(KeyInput { key, shift })
}

fn split_shift(input: &str) -> Result<(bool, &str), String> {
    let Some((mods, key)) = input.split_once('-') else {
        return Ok((false, input));
    };
    if key.is_empty() {
        // "S--" names the minus key.
        return match input.strip_suffix("--") {
            Some(mods) if is_shift(mods) => Ok((true, "-")),
            _ => Err(format!("unknown modifier in '{}'", input)),
        };
    }
    if is_shift(mods) {
        Ok((true, key))
    } else {
        Err(format!("unknown modifier '{}'", mods))
    }
}

fn is_shift(raw: &str) -> bool {
    matches!(raw.trim().to_ascii_lowercase().as_str(), "s" | "shift")
}

fn parse_key(input: &str) -> Result<Key, String> {
    if let Some(ch) = parse_single_char(input) {
        return Ok(Key::Char(ch));
    }
    let norm = input.trim().to_ascii_lowercase();
    let key = match norm.as_str() {
        "tab" => Key::Tab,
        "enter" | "return" => Key::Enter,
        "backspace" | "bs" => Key::Backspace,
        "delete" | "del" => Key::Delete,
        "space" | "spc" => Key::Char(' '),
        "slash" => Key::Char('/'),
        "equal" | "equals" => Key::Char('='),
        "dash" | "minus" => Key::Char('-'),
        "esc" | "escape" => Key::Named("Escape".to_string()),
        "left" | "arrowleft" => Key::Named("ArrowLeft".to_string()),
        "right" | "arrowright" => Key::Named("ArrowRight".to_string()),
        "up" | "arrowup" => Key::Named("ArrowUp".to_string()),
        "down" | "arrowdown" => Key::Named("ArrowDown".to_string()),
        "home" => Key::Named("Home".to_string()),
        "end" => Key::Named("End".to_string()),
        "pageup" => Key::Named("PageUp".to_string()),
        "pagedown" => Key::Named("PageDown".to_string()),
        f if f.len() > 1 && f.starts_with('f') && f[1..].parse::<u8>().is_ok() => {
            Key::Named(f.to_ascii_uppercase())
        }
        _ => return Err(format!("unknown key '{}'", input)),
    };
    Ok(key)
}

fn parse_single_char(input: &str) -> Option<char> {
    let mut chars = input.chars();
    let ch = chars.next()?;
    if chars.next().is_none() {
        Some(ch)
    } else {
        None
    }
}

/// Translate a terminal key event.
///
/// Characters typed with Ctrl or Alt are shortcuts, not values, so they come
/// through as named keys the interpreter ignores.
#[cfg(feature = "tui")]
pub fn from_crossterm(key: crossterm::event::KeyEvent) -> KeyInput {
    use crossterm::event::{KeyCode, KeyModifiers};

    let shift = key.modifiers.contains(KeyModifiers::SHIFT);
    let chord = key
        .modifiers
        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT);
    let key = match key.code {
        KeyCode::Tab => Key::Tab,
        KeyCode::BackTab => return KeyInput::shifted(Key::Tab),
        KeyCode::Enter => Key::Enter,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Delete => Key::Delete,
        KeyCode::Char(c) if chord => Key::Named(format!("C-{}", c)),
        KeyCode::Char(c) => Key::Char(c),
        KeyCode::Esc => Key::Named("Escape".to_string()),
        KeyCode::Left => Key::Named("ArrowLeft".to_string()),
        KeyCode::Right => Key::Named("ArrowRight".to_string()),
        KeyCode::Up => Key::Named("ArrowUp".to_string()),
        KeyCode::Down => Key::Named("ArrowDown".to_string()),
        KeyCode::F(n) => Key::Named(format!("F{}", n)),
        other => Key::Named(format!("{:?}", other)),
    };
    KeyInput { key, shift }
}
