//! UI rendering

use gridkeys_core::{Decision, EditorController, Position};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Wrap},
};

use crate::session::Session;

pub(crate) const INPUT_BAR_HEIGHT: u16 = 3;
pub(crate) const GRID_MIN_HEIGHT: u16 = 6;
pub(crate) const CODE_PANEL_HEIGHT: u16 = 8;
pub(crate) const STATUS_BAR_HEIGHT: u16 = 1;
pub(crate) const ROW_HEADER_WIDTH: u16 = 4;
pub(crate) const GRID_COLUMN_SPACING: u16 = 1;

/// Which part of the grid is on screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Viewport {
    pub col: usize,
    pub row: usize,
    pub visible_cols: usize,
    pub visible_rows: usize,
    pub max_cols: usize,
    pub max_rows: usize,
    pub column_width: u16,
}

impl Viewport {
    pub fn new(max_cols: usize, max_rows: usize, column_width: u16) -> Self {
        Viewport {
            col: 0,
            row: 0,
            visible_cols: 1,
            visible_rows: 1,
            max_cols: max_cols.max(1),
            max_rows: max_rows.max(1),
            column_width: column_width.max(1),
        }
    }

    /// Whether `pos` lies on the grid.
    pub fn contains(&self, pos: Position) -> bool {
        usize::try_from(pos.x).is_ok_and(|x| x < self.max_cols)
            && usize::try_from(pos.y).is_ok_and(|y| y < self.max_rows)
    }

    /// Scroll so that `pos` is visible. Off-grid coordinates clamp to the edge.
    pub fn follow(&mut self, pos: Position) {
        let col = (pos.x.max(0) as usize).min(self.max_cols - 1);
        let row = (pos.y.max(0) as usize).min(self.max_rows - 1);

        if col < self.col {
            self.col = col;
        } else if col >= self.col + self.visible_cols {
            self.col = col + 1 - self.visible_cols;
        }

        if row < self.row {
            self.row = row;
        } else if row >= self.row + self.visible_rows {
            self.row = row + 1 - self.visible_rows;
        }
    }

    /// Visible columns, as grid coordinates.
    fn columns(&self) -> impl Iterator<Item = usize> {
        self.col..(self.col + self.visible_cols).min(self.max_cols)
    }

    fn rows(&self) -> impl Iterator<Item = usize> {
        self.row..(self.row + self.visible_rows).min(self.max_rows)
    }
}

pub(crate) fn col_to_letters(col: usize) -> String {
    let mut result = String::new();
    let mut n = col as u128 + 1;
    while n > 0 {
        n -= 1;
        result.insert(0, (b'A' + (n % 26) as u8) as char);
        n /= 26;
    }
    result
}

fn split_main_chunks(area: Rect, code_panel: bool) -> (Rect, Rect, Option<Rect>, Rect) {
    let mut constraints = vec![
        Constraint::Length(INPUT_BAR_HEIGHT),
        Constraint::Min(GRID_MIN_HEIGHT),
    ];
    if code_panel {
        constraints.push(Constraint::Length(CODE_PANEL_HEIGHT));
    }
    constraints.push(Constraint::Length(STATUS_BAR_HEIGHT));

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);
    if code_panel {
        (chunks[0], chunks[1], Some(chunks[2]), chunks[3])
    } else {
        (chunks[0], chunks[1], None, chunks[2])
    }
}

/// Draw the session UI
pub fn draw(f: &mut Frame, session: &Session, viewport: &mut Viewport) {
    let (input_area, grid_area, code_area, status_area) =
        split_main_chunks(f.area(), session.editor.is_shown());

    let available_width = grid_area.width.saturating_sub(ROW_HEADER_WIDTH + 2) as usize;
    let available_height = grid_area.height.saturating_sub(3) as usize; // header + borders
    viewport.visible_cols = (available_width / (viewport.column_width as usize + 1)).max(1);
    viewport.visible_rows = available_height.max(1);
    viewport.follow(session.cursor_position());

    draw_input_bar(f, session, input_area);
    draw_grid(f, session, viewport, grid_area);
    if let Some(area) = code_area {
        draw_code_panel(f, session, area);
    }
    draw_status_bar(f, session, status_area);

    if session.editor.type_menu_shown {
        draw_type_menu(f, session);
    }
}

fn draw_input_bar(f: &mut Frame, session: &Session, area: Rect) {
    let (content, title, color) = match &session.editor.plain_input {
        Some(input) => {
            let (before, after) = input.buffer.split_at(input.cursor);
            (
                format!("{}: {}│{}", input.at, before, after),
                " Edit ",
                Color::Yellow,
            )
        }
        None => {
            let pos = session.cursor_position();
            let text = session.sheet.display(pos);
            let text = if text.is_empty() {
                "(empty)".to_string()
            } else {
                text
            };
            (format!("{}: {}", pos, text), " Cell ", Color::White)
        }
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(Style::default().fg(color));
    f.render_widget(Paragraph::new(content).block(block), area);
}

fn draw_grid(f: &mut Frame, session: &Session, viewport: &Viewport, area: Rect) {
    let cursor = session.cursor_position();
    let target = session.editor.target().map(|target| target.position);

    let mut header_cells = vec![Cell::from(" ")]; // Corner
    for col in viewport.columns() {
        let style = if cursor.x == col as i64 {
            Style::default()
                .fg(Color::Black)
                .bg(Color::White)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        header_cells.push(Cell::from(col_to_letters(col)).style(style));
    }
    let header = Row::new(header_cells).height(1);

    let mut rows = Vec::new();
    for row in viewport.rows() {
        let mut cells = Vec::new();

        let row_style = if cursor.y == row as i64 {
            Style::default()
                .fg(Color::Black)
                .bg(Color::White)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        cells.push(Cell::from(format!("{}", row + 1)).style(row_style));

        for col in viewport.columns() {
            let pos = Position::new(col as i64, row as i64);
            let display = session.sheet.display(pos);

            let style = if pos == cursor {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else if session.cursor.is_selected(pos) {
                Style::default().fg(Color::White).bg(Color::Blue)
            } else if Some(pos) == target && session.editor.is_shown() {
                Style::default().fg(Color::Magenta)
            } else if display.starts_with('<') {
                Style::default().fg(Color::Green)
            } else {
                Style::default()
            };

            cells.push(Cell::from(display).style(style));
        }

        rows.push(Row::new(cells));
    }

    let mut widths = vec![Constraint::Length(ROW_HEADER_WIDTH)];
    widths.extend(viewport.columns().map(|_| Constraint::Length(viewport.column_width)));

    let title = format!(" {} ", session.sheet.name());
    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().borders(Borders::ALL).title(title))
        .column_spacing(GRID_COLUMN_SPACING);

    f.render_widget(table, area);
}

fn draw_code_panel(f: &mut Frame, session: &Session, area: Rect) {
    let title = match session.editor.target() {
        Some(target) => format!(" {} {} ", target.mode, target.position),
        None => " Code ".to_string(),
    };
    let source = session.code_source().unwrap_or("");

    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(Style::default().fg(Color::Magenta));
    let paragraph = Paragraph::new(source)
        .block(block)
        .wrap(Wrap { trim: false });
    f.render_widget(paragraph, area);
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

fn draw_type_menu(f: &mut Frame, session: &Session) {
    let area = centered_rect(32, 6, f.area());
    let title = match &session.editor.selected {
        Some(target) => format!(" Cell type for {} ", target.position),
        None => " Cell type ".to_string(),
    };

    let lines = vec![
        Line::from(vec![
            Span::styled("1/p", Style::default().fg(Color::Yellow)),
            Span::raw("  Python"),
        ]),
        Line::from(vec![
            Span::styled("2/f", Style::default().fg(Color::Yellow)),
            Span::raw("  Formula"),
        ]),
        Line::from(Span::styled(
            "Esc  cancel",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(Style::default().fg(Color::Cyan));
    f.render_widget(Clear, area);
    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_status_bar(f: &mut Frame, session: &Session, area: Rect) {
    let decision = match &session.last_decision {
        Some(Decision::Consumed(intent)) => intent.to_string(),
        Some(Decision::Unhandled) => "unhandled".to_string(),
        None => "-".to_string(),
    };

    let status = if session.status_message.is_empty() {
        format!("[{}]  |  {}  |  C-q quit", session.permission, decision)
    } else {
        format!(
            "[{}]  |  {}  |  {}",
            session.permission, session.status_message, decision
        )
    };

    let style = if session.status_message.is_empty() {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default().fg(Color::Yellow)
    };

    f.render_widget(Paragraph::new(Line::from(Span::styled(status, style))), area);
}
