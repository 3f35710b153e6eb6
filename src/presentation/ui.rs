use super::host::{Host, ROW_GUTTER};
use crate::application::EditState;
use crate::domain::{column_label, Address};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

pub const COLUMN_WIDTH: u16 = 10;

/// Splits the frame into header, optional formula bar, grid and status bar.
pub fn screen_layout(area: Rect, formula_bar: bool) -> (Rect, Option<Rect>, Rect, Rect) {
    let bar_height = if formula_bar { 3 } else { 0 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(bar_height),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(area);

    let bar = formula_bar.then_some(chunks[1]);
    (chunks[0], bar, chunks[2], chunks[3])
}

pub fn render_ui(f: &mut Frame, host: &mut Host) {
    let (header, bar, grid, status) =
        screen_layout(f.area(), host.controller.formula_bar_enabled());
    host.set_grid_area(grid, COLUMN_WIDTH);

    render_header(f, host, header);
    if let Some(bar) = bar {
        render_formula_bar(f, host, bar);
    }
    render_grid(f, host, grid);
    render_status_bar(f, host, status);
}

fn render_header(f: &mut Frame, host: &Host, area: Rect) {
    let reference = host
        .controller
        .selected_address()
        .map(|addr| addr.to_reference())
        .unwrap_or_else(|| "-".to_string());
    let dirty = if host.is_dirty() { " [modified]" } else { "" };
    let header = Paragraph::new(format!("gridentry | Cell: {}{}", reference, dirty))
        .style(Style::default().fg(Color::Cyan));
    f.render_widget(header, area);
}

fn render_formula_bar(f: &mut Frame, host: &Host, area: Rect) {
    let bar = host.controller.formula_bar();
    let title = match &bar.reference {
        Some(reference) => format!("fx {}", reference),
        None => "fx".to_string(),
    };
    let style = if host.formula_bar_focused {
        Style::default().fg(Color::Yellow)
    } else if bar.editing {
        Style::default().fg(Color::Green)
    } else {
        Style::default()
    };

    let widget = Paragraph::new(bar.text)
        .block(Block::default().borders(Borders::ALL).title(title))
        .style(style);
    f.render_widget(widget, area);
}

fn render_grid(f: &mut Frame, host: &Host, area: Rect) {
    let controller = &host.controller;
    let grid = controller.grid();
    let viewport = host.viewport;
    let selected = controller.selected_address();

    let last_col = (viewport.scroll_col + viewport.visible_cols).min(grid.num_cols());
    let last_row = (viewport.scroll_row + viewport.visible_rows).min(grid.num_rows());

    let mut headers = vec![Cell::from("")];
    for col in viewport.scroll_col..last_col {
        let style = if selected.is_some_and(|addr| addr.col == col) {
            Style::default().bg(Color::LightBlue).fg(Color::Black)
        } else {
            Style::default().fg(Color::Yellow)
        };
        headers.push(Cell::from(column_label(col)).style(style));
    }
    let mut rows = vec![Row::new(headers).height(1)];

    for row in viewport.scroll_row..last_row {
        let number_style = if selected.is_some_and(|addr| addr.row == row) {
            Style::default().bg(Color::LightBlue).fg(Color::Black)
        } else {
            Style::default().fg(Color::Yellow)
        };
        let mut cells = vec![Cell::from(format!("{}", row + 1)).style(number_style)];

        for col in viewport.scroll_col..last_col {
            let addr = Address::new(row, col);
            cells.push(render_cell(host, addr));
        }
        rows.push(Row::new(cells).height(1));
    }

    let mut widths = vec![Constraint::Length(ROW_GUTTER)];
    widths.extend((viewport.scroll_col..last_col).map(|_| Constraint::Length(COLUMN_WIDTH)));

    let title = if controller.is_read_only() { "Grid (read-only)" } else { "Grid" };
    let table = Table::new(rows, widths)
        .block(Block::default().borders(Borders::ALL).title(title))
        .column_spacing(1);
    f.render_widget(table, area);
}

fn render_cell(host: &Host, addr: Address) -> Cell<'static> {
    let controller = &host.controller;
    let Some(data) = controller.grid().cell(addr.row, addr.col) else {
        return Cell::from("");
    };

    match controller.state() {
        EditState::Editing(session) if session.address == addr => {
            let text = format!("{}_", session.buffer.as_str());
            Cell::from(text).style(Style::default().bg(Color::Green).fg(Color::Black))
        }
        state => {
            let mut style = Style::default();
            if data.read_only {
                style = style.fg(Color::DarkGray);
            }
            if data.formula.is_some() {
                style = style.add_modifier(Modifier::ITALIC);
            }
            if state.selected_address() == Some(addr) {
                style = style.bg(Color::Blue).fg(Color::White);
            }
            Cell::from(data.value.to_string()).style(style)
        }
    }
}

fn render_status_bar(f: &mut Frame, host: &Host, area: Rect) {
    let controller = &host.controller;
    let text = match (&host.status_message, controller.state()) {
        (Some(status), _) => status.clone(),
        (None, EditState::Editing(session)) => format!(
            "Editing {}: Enter/Tab to commit, Esc to cancel",
            session.address
        ),
        (None, _) if host.formula_bar_focused => {
            "Formula bar: type to edit, Enter to commit, Esc to cancel, Tab to leave".to_string()
        }
        (None, _) => format!(
            "File: {} | Ctrl+S: save | Ctrl+E: export CSV | Ctrl+F: formula bar | Ctrl+Z/Y: undo/redo | Ctrl+Q: quit",
            host.save_path.display()
        ),
    };

    let style = match controller.state() {
        EditState::Editing(_) => Style::default().fg(Color::Green),
        _ => Style::default(),
    };
    let widget = Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL).title("Status"))
        .style(style);
    f.render_widget(widget, area);
}
