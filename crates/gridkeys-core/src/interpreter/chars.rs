const FIRST_CHAR_SYMBOLS: &[char] = &[
    '.', ',', '-', '+', '*', '(', ')', '$', '%', '#', '"', '\'', '!', '?', '<', '>', ':', ';',
    '@', '&', '_', '~', '^', '[', ']', '{', '}', '|', '\\', '`',
];

/// Whether typing `c` on the grid should start a new cell value.
///
/// `/` and `=` are not value starts: they open the code editor.
pub fn is_allowed_first_char(c: char) -> bool {
    c.is_alphanumeric() || FIRST_CHAR_SYMBOLS.contains(&c)
}
