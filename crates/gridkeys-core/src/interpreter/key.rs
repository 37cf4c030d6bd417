use std::fmt;

/// The keys the interpreter distinguishes.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    Tab,
    Enter,
    Backspace,
    Delete,
    /// A key that produces exactly one character.
    Char(char),
    /// Any other key, by host name (`"ArrowUp"`, `"F2"`, ...).
    Named(String),
}

impl Key {
    /// Map a host key identifier to a [`Key`].
    pub fn from_name(name: &str) -> Key {
        match name {
            "Tab" => Key::Tab,
            "Enter" => Key::Enter,
            "Backspace" => Key::Backspace,
            "Delete" => Key::Delete,
            _ => {
                let mut chars = name.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Key::Char(c),
                    _ => Key::Named(name.to_string()),
                }
            }
        }
    }

    pub fn name(&self) -> String {
        match self {
            Key::Tab => "Tab".to_string(),
            Key::Enter => "Enter".to_string(),
            Key::Backspace => "Backspace".to_string(),
            Key::Delete => "Delete".to_string(),
            Key::Char(c) => c.to_string(),
            Key::Named(name) => name.clone(),
        }
    }
}

/// One key press as the interpreter sees it.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct KeyInput {
    pub key: Key,
    pub shift: bool,
}

impl KeyInput {
    pub fn new(key: Key) -> Self {
        KeyInput { key, shift: false }
    }

    pub fn shifted(key: Key) -> Self {
        KeyInput { key, shift: true }
    }

    pub fn from_name(name: &str, shift: bool) -> Self {
        KeyInput {
            key: Key::from_name(name),
            shift,
        }
    }
}

impl fmt::Display for KeyInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.shift {
            write!(f, "S-{}", self.key.name())
        } else {
            f.write_str(&self.key.name())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_name_recognises_editing_keys() {
        assert_eq!(Key::from_name("Tab"), Key::Tab);
        assert_eq!(Key::from_name("Enter"), Key::Enter);
        assert_eq!(Key::from_name("Backspace"), Key::Backspace);
        assert_eq!(Key::from_name("Delete"), Key::Delete);
    }

    #[test]
    fn from_name_single_char_and_named() {
        assert_eq!(Key::from_name("/"), Key::Char('/'));
        assert_eq!(Key::from_name("é"), Key::Char('é'));
        assert_eq!(Key::from_name("ArrowUp"), Key::Named("ArrowUp".to_string()));
        assert_eq!(Key::from_name(""), Key::Named(String::new()));
    }

    #[test]
    fn display_marks_shift() {
        assert_eq!(KeyInput::shifted(Key::Tab).to_string(), "S-Tab");
        assert_eq!(KeyInput::new(Key::Char('a')).to_string(), "a");
    }
}
