//! Terminal host state wrapped around a [`GridController`].
//!
//! The host keeps only view concerns: scroll offsets, the formula bar's
//! keyboard focus, pending status text and where to save. Selection and
//! edit state are always read back from the controller.

use crate::application::{FormulaBarEvent, GridController, InputEvent, Intent, Key, KeyInput};
use crate::domain::Address;
use crate::infrastructure::FileRepository;
use ratatui::layout::Rect;
use std::cell::Cell as Counter;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::{Duration, Instant};

pub const DEFAULT_SAVE_PATH: &str = "grid.json";
pub const DEFAULT_CSV_PATH: &str = "grid.csv";
const DOUBLE_CLICK_WINDOW: Duration = Duration::from_millis(400);

/// Visible window over the grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Viewport {
    /// First grid row drawn on screen
    pub scroll_row: usize,
    /// First grid column drawn on screen
    pub scroll_col: usize,
    /// Number of rows that fit in the table area
    pub visible_rows: usize,
    /// Number of columns that fit in the table area
    pub visible_cols: usize,
}

impl Viewport {
    /// Scrolls just enough to keep `addr` on screen.
    pub fn ensure_visible(&mut self, addr: Address) {
        let rows = self.visible_rows.max(1);
        let cols = self.visible_cols.max(1);

        if addr.row < self.scroll_row {
            self.scroll_row = addr.row;
        } else if addr.row >= self.scroll_row + rows {
            self.scroll_row = addr.row + 1 - rows;
        }

        if addr.col < self.scroll_col {
            self.scroll_col = addr.col;
        } else if addr.col >= self.scroll_col + cols {
            self.scroll_col = addr.col + 1 - cols;
        }
    }
}

/// Turns pairs of quick clicks on the same cell into double-clicks.
#[derive(Debug, Default)]
pub struct ClickTracker {
    last: Option<(Address, Instant)>,
}

impl ClickTracker {
    pub fn classify(&mut self, addr: Address, now: Instant) -> InputEvent {
        match self.last.take() {
            Some((prev, at)) if prev == addr && now.duration_since(at) <= DOUBLE_CLICK_WINDOW => {
                InputEvent::DoubleClick(addr)
            }
            _ => {
                self.last = Some((addr, now));
                InputEvent::Click(addr)
            }
        }
    }
}

/// Everything the terminal front end needs besides the grid itself.
#[derive(Debug)]
pub struct Host {
    /// The grid engine this host drives
    pub controller: GridController,
    /// Scroll position of the grid table
    pub viewport: Viewport,
    /// Whether keystrokes go to the formula bar instead of the grid
    pub formula_bar_focused: bool,
    /// One-shot message shown in the status bar
    pub status_message: Option<String>,
    /// JSON file written by Ctrl+S
    pub save_path: PathBuf,
    /// CSV file written by Ctrl+E
    pub csv_path: PathBuf,
    /// Where the grid table was last drawn, for mouse hit-testing
    pub grid_area: Rect,
    /// Set when the main loop should exit
    pub should_quit: bool,
    changes: Rc<Counter<u64>>,
    saved_at: u64,
    clicks: ClickTracker,
}

impl Host {
    pub fn new(mut controller: GridController, save_path: Option<PathBuf>) -> Self {
        let changes = Rc::new(Counter::new(0));
        let sink = Rc::clone(&changes);
        controller.set_on_change(move |_grid| sink.set(sink.get() + 1));
        controller.focus();

        let save_path = save_path.unwrap_or_else(|| PathBuf::from(DEFAULT_SAVE_PATH));
        let csv_path = save_path.with_extension("csv");

        Self {
            controller,
            viewport: Viewport::default(),
            formula_bar_focused: false,
            status_message: None,
            save_path,
            csv_path,
            grid_area: Rect::default(),
            should_quit: false,
            changes,
            saved_at: 0,
            clicks: ClickTracker::default(),
        }
    }

    /// Unsaved changes since the last save.
    pub fn is_dirty(&self) -> bool {
        self.changes.get() != self.saved_at
    }

    pub fn change_count(&self) -> u64 {
        self.changes.get()
    }

    pub fn dispatch(&mut self, event: InputEvent) -> Intent {
        let intent = self.controller.handle_event(event);
        self.after(&intent);
        intent
    }

    pub fn click(&mut self, addr: Address) -> Intent {
        self.formula_bar_focused = false;
        let event = self.clicks.classify(addr, Instant::now());
        self.dispatch(event)
    }

    /// Keys typed while the formula bar has focus.
    pub fn formula_bar_key(&mut self, input: KeyInput) -> Intent {
        let mut text = self.controller.formula_bar().text;
        let event = match input.key {
            Key::Enter | Key::Escape => FormulaBarEvent::Key(input),
            Key::Tab => FormulaBarEvent::Blur,
            Key::Backspace => {
                text.pop();
                FormulaBarEvent::Input(text)
            }
            _ => match input.printable() {
                Some(c) => {
                    text.push(c);
                    FormulaBarEvent::Input(text)
                }
                None => return Intent::Ignore,
            },
        };

        let intent = self.controller.handle_formula_bar(event);
        if matches!(input.key, Key::Enter | Key::Escape | Key::Tab) {
            self.formula_bar_focused = false;
        }
        self.after(&intent);
        intent
    }

    pub fn toggle_formula_bar_focus(&mut self) {
        if self.formula_bar_focused {
            let intent = self.controller.handle_formula_bar(FormulaBarEvent::Blur);
            self.formula_bar_focused = false;
            self.after(&intent);
        } else if self.controller.formula_bar().interactive {
            self.formula_bar_focused = true;
        }
    }

    /// Commits any open edit, as if the grid lost focus.
    pub fn blur(&mut self) {
        let intent = self.controller.handle_event(InputEvent::Blur);
        self.after(&intent);
    }

    pub fn save(&mut self) {
        self.blur();
        self.status_message = Some(match FileRepository::save_grid(self.controller.grid(), &self.save_path) {
            Ok(()) => {
                self.saved_at = self.changes.get();
                format!("Saved to {}", self.save_path.display())
            }
            Err(e) => {
                tracing::warn!(target: "persistence", error = %e, "save failed");
                format!("Save failed: {}", e)
            }
        });
    }

    pub fn export_csv(&mut self) {
        self.blur();
        self.status_message = Some(match FileRepository::export_csv(self.controller.grid(), &self.csv_path) {
            Ok(()) => format!("Exported to {}", self.csv_path.display()),
            Err(e) => format!("Export failed: {}", e),
        });
    }

    pub fn quit(&mut self) {
        self.blur();
        self.should_quit = true;
    }

    /// Records the drawn table area and resizes the viewport to it.
    pub fn set_grid_area(&mut self, area: Rect, column_width: u16) {
        self.grid_area = area;
        // Borders, the header row and the row-number gutter are not cells.
        let inner_height = area.height.saturating_sub(3) as usize;
        let inner_width = area.width.saturating_sub(2 + ROW_GUTTER + 1) as usize;
        self.viewport.visible_rows = inner_height.max(1);
        self.viewport.visible_cols = (inner_width / (column_width as usize + 1)).max(1);
        if let Some(addr) = self.controller.selected_address() {
            self.viewport.ensure_visible(addr);
        }
    }

    /// Maps a terminal position inside the table to a cell address.
    pub fn cell_at(&self, x: u16, y: u16, column_width: u16) -> Option<Address> {
        let area = self.grid_area;
        let first_row_y = area.y + 2;
        let first_col_x = area.x + 1 + ROW_GUTTER + 1;
        if y < first_row_y || x < first_col_x || y >= area.bottom().saturating_sub(1) {
            return None;
        }

        let row = self.viewport.scroll_row + (y - first_row_y) as usize;
        let col = self.viewport.scroll_col + ((x - first_col_x) / (column_width + 1)) as usize;
        self.controller.bounds().contains(Address::new(row, col)).then_some(Address::new(row, col))
    }

    fn after(&mut self, intent: &Intent) {
        self.status_message = match intent {
            Intent::Refused => Some("Read-only: edit refused".to_string()),
            Intent::Ignore | Intent::EditBuffer => self.status_message.take(),
            _ => None,
        };
        if let Some(addr) = self.controller.selected_address() {
            self.viewport.ensure_visible(addr);
        }
    }
}

/// Width of the row-number column on the left of the table.
pub const ROW_GUTTER: u16 = 4;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::GridConfig;
    use crate::domain::CellValue;

    fn host() -> Host {
        let controller = GridController::new(GridConfig::default().with_dimensions(50, 20)).unwrap();
        Host::new(controller, None)
    }

    #[test]
    fn test_host_focuses_first_cell() {
        let host = host();
        assert_eq!(host.controller.selected_address(), Some(Address::new(0, 0)));
        assert!(!host.is_dirty());
        assert_eq!(host.save_path, PathBuf::from(DEFAULT_SAVE_PATH));
        assert_eq!(host.csv_path, PathBuf::from(DEFAULT_CSV_PATH));
    }

    #[test]
    fn test_changes_mark_dirty() {
        let mut host = host();
        host.dispatch(InputEvent::Key(KeyInput::plain(Key::Char('1'))));
        assert!(!host.is_dirty());
        host.dispatch(InputEvent::Key(KeyInput::plain(Key::Enter)));
        assert!(host.is_dirty());
        assert_eq!(host.change_count(), 1);
    }

    #[test]
    fn test_viewport_follows_selection() {
        let mut viewport = Viewport {
            visible_rows: 10,
            visible_cols: 4,
            ..Viewport::default()
        };
        viewport.ensure_visible(Address::new(15, 6));
        assert_eq!((viewport.scroll_row, viewport.scroll_col), (6, 3));
        viewport.ensure_visible(Address::new(2, 0));
        assert_eq!((viewport.scroll_row, viewport.scroll_col), (2, 0));
    }

    #[test]
    fn test_click_tracker() {
        let mut clicks = ClickTracker::default();
        let now = Instant::now();
        let addr = Address::new(1, 1);
        assert_eq!(clicks.classify(addr, now), InputEvent::Click(addr));
        assert_eq!(
            clicks.classify(addr, now + Duration::from_millis(100)),
            InputEvent::DoubleClick(addr)
        );
        assert_eq!(
            clicks.classify(addr, now + Duration::from_millis(200)),
            InputEvent::Click(addr)
        );
    }

    #[test]
    fn test_cell_hit_testing() {
        let mut host = host();
        host.set_grid_area(Rect::new(0, 4, 80, 20), 10);
        // Row gutter spans x 1..5, first cell starts at x 6; first data row at y 6.
        assert_eq!(host.cell_at(6, 6, 10), Some(Address::new(0, 0)));
        assert_eq!(host.cell_at(17, 7, 10), Some(Address::new(1, 1)));
        assert_eq!(host.cell_at(3, 6, 10), None);
        assert_eq!(host.cell_at(6, 5, 10), None);
    }

    #[test]
    fn test_formula_bar_typing() {
        let mut host = host();
        host.toggle_formula_bar_focus();
        assert!(host.formula_bar_focused);

        for c in "=A2".chars() {
            host.formula_bar_key(KeyInput::plain(Key::Char(c)));
        }
        assert_eq!(host.controller.formula_bar().text, "=A2");

        host.formula_bar_key(KeyInput::plain(Key::Enter));
        assert!(!host.formula_bar_focused);
        let cell = host.controller.grid().cell(0, 0).unwrap();
        assert_eq!(cell.value, CellValue::Text("=A2".to_string()));
        assert_eq!(host.controller.selected_address(), Some(Address::new(1, 0)));
    }
}
