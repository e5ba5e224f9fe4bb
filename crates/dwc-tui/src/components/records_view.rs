//! Records table view.
//!
//! Draws the rows of a [`RecordsTable`] and keeps the cursor (row and column)
//! plus enough of the last layout to map mouse clicks back to cells.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::{Constraint, Flex, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, HighlightSpacing, Row, Table, TableState},
};
use unicode_width::UnicodeWidthStr;

use dwc_core::core::records_table::RecordsTable;
use dwc_core::core::render::{HeaderCell, RenderedRow};
use dwc_core::utils::text::truncate_text;

use super::state_renderer::{LoadStateConfig, render_empty, render_non_loaded_state};
use super::styles;
use crate::layout::records_table::{
    BODY_OFFSET, COLUMN_SPACING, MAX_COLUMN_WIDTH, MIN_COLUMN_WIDTH,
};
use crate::service::LoadState;

/// A column as laid out on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSpan {
    pub index: usize,
    pub x: u16,
    pub width: u16,
}

impl ColumnSpan {
    fn contains(&self, x: u16) -> bool {
        x >= self.x && x < self.x + self.width
    }
}

/// What a mouse position lands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableHit {
    Header { column: usize },
    Cell { row: usize, column: usize },
}

/// Natural width of every column: the widest of title and cell texts,
/// clamped to the configured bounds.
pub fn column_widths(header: &[HeaderCell], rows: &[RenderedRow]) -> Vec<u16> {
    header
        .iter()
        .enumerate()
        .map(|(i, cell)| {
            let widest = rows
                .iter()
                .filter_map(|row| row.cells.get(i))
                .map(|c| c.text.width())
                .fold(cell.title().width(), usize::max);
            u16::try_from(widest)
                .unwrap_or(u16::MAX)
                .clamp(MIN_COLUMN_WIDTH, MAX_COLUMN_WIDTH)
        })
        .collect()
}

/// Place columns left to right starting at column `first`, as many as fit
/// in `available` cells. The first placed column is always included,
/// narrowed if needed.
pub fn visible_columns(widths: &[u16], first: usize, x: u16, available: u16) -> Vec<ColumnSpan> {
    let mut spans = Vec::new();
    let mut used: u16 = 0;
    for (index, &width) in widths.iter().enumerate().skip(first) {
        let gap = if spans.is_empty() { 0 } else { COLUMN_SPACING };
        let needed = used.saturating_add(gap).saturating_add(width);
        if needed > available {
            if spans.is_empty() && available > 0 {
                spans.push(ColumnSpan {
                    index,
                    x,
                    width: available,
                });
            }
            break;
        }
        spans.push(ColumnSpan {
            index,
            x: x + used + gap,
            width,
        });
        used = needed;
    }
    spans
}

/// Records table view with row/column cursor.
pub struct RecordsView {
    table_state: TableState,
    focused_column: usize,
    first_column: usize,
    /// Area of the last draw (including borders).
    area: Rect,
    columns: Vec<ColumnSpan>,
}

impl Default for RecordsView {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordsView {
    pub fn new() -> Self {
        Self {
            table_state: TableState::default(),
            focused_column: 0,
            first_column: 0,
            area: Rect::default(),
            columns: Vec::new(),
        }
    }

    pub fn selected_row(&self) -> Option<usize> {
        self.table_state.selected()
    }

    pub fn select_row(&mut self, row: usize) {
        self.table_state.select(Some(row));
    }

    pub fn focused_column(&self) -> usize {
        self.focused_column
    }

    pub fn focus_column(&mut self, column: usize) {
        self.focused_column = column;
    }

    /// Keep the cursor valid after the rows or columns changed.
    pub fn clamp(&mut self, row_count: usize, column_count: usize) {
        let row = match self.table_state.selected() {
            _ if row_count == 0 => None,
            Some(row) => Some(row.min(row_count - 1)),
            None => Some(0),
        };
        self.table_state.select(row);
        if row.is_none() {
            *self.table_state.offset_mut() = 0;
        }
        self.focused_column = self.focused_column.min(column_count.saturating_sub(1));
        self.first_column = self.first_column.min(self.focused_column);
    }

    /// Row and column cursor movement. Returns true if the key was consumed.
    pub fn handle_key(&mut self, key: KeyEvent, row_count: usize, column_count: usize) -> bool {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.select_previous();
                true
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.select_next(row_count);
                true
            }
            KeyCode::Left | KeyCode::Char('h') => {
                self.focused_column = self.focused_column.saturating_sub(1);
                true
            }
            KeyCode::Right | KeyCode::Char('l') => {
                if self.focused_column + 1 < column_count {
                    self.focused_column += 1;
                }
                true
            }
            KeyCode::Home => {
                if row_count > 0 {
                    self.table_state.select(Some(0));
                }
                true
            }
            KeyCode::End => {
                if row_count > 0 {
                    self.table_state.select(Some(row_count - 1));
                }
                true
            }
            _ => false,
        }
    }

    pub fn select_previous(&mut self) {
        if let Some(row) = self.table_state.selected() {
            self.table_state.select(Some(row.saturating_sub(1)));
        }
    }

    pub fn select_next(&mut self, row_count: usize) {
        let next = match self.table_state.selected() {
            Some(row) if row + 1 < row_count => row + 1,
            Some(row) => row,
            None if row_count > 0 => 0,
            None => return,
        };
        self.table_state.select(Some(next));
    }

    /// Screen position of the header cell of the focused column, for
    /// anchoring the field menu.
    pub fn focused_header_position(&self) -> (u16, u16) {
        let x = self
            .columns
            .iter()
            .find(|c| c.index == self.focused_column)
            .map(|c| c.x)
            .unwrap_or(self.area.x + 1);
        (x, self.area.y + BODY_OFFSET)
    }

    /// Map a screen position to the header or body cell drawn there.
    pub fn hit_test(&self, x: u16, y: u16, row_count: usize) -> Option<TableHit> {
        let span = self.columns.iter().find(|c| c.contains(x))?;
        let header_y = self.area.y + 1;
        if y == header_y {
            return Some(TableHit::Header {
                column: span.index,
            });
        }
        let body_y = self.area.y + BODY_OFFSET;
        let body_end = self.area.y + self.area.height.saturating_sub(1);
        if y < body_y || y >= body_end {
            return None;
        }
        let row = self.table_state.offset() + usize::from(y - body_y);
        (row < row_count).then_some(TableHit::Cell {
            row,
            column: span.index,
        })
    }

    fn load_state(table: &RecordsTable) -> LoadState<()> {
        if !table.rows().is_empty() || table.cached_page().is_some() {
            LoadState::Loaded(())
        } else if table.is_loading() {
            LoadState::Loading
        } else if let Some(error) = table.last_error() {
            LoadState::Error(error.to_string())
        } else {
            LoadState::Idle
        }
    }

    fn title(table: &RecordsTable) -> Line<'static> {
        let mut spans = vec![Span::styled(" Records ", styles::modal_title_style())];
        if let Some(filter) = &table.query().filter {
            spans.push(Span::styled(
                format!("[filter: {}] ", filter),
                styles::TEXT_WARNING,
            ));
        }
        if table.is_loading() {
            spans.push(Span::styled("⏳ ", styles::TEXT_WARNING));
        }
        Line::from(spans)
    }

    /// Keep the focused column on screen, scrolling horizontally as needed.
    fn scroll_to_focus(&mut self, widths: &[u16], x: u16, available: u16) -> Vec<ColumnSpan> {
        if self.focused_column < self.first_column {
            self.first_column = self.focused_column;
        }
        loop {
            let spans = visible_columns(widths, self.first_column, x, available);
            let focused_visible = spans.iter().any(|c| c.index == self.focused_column);
            if focused_visible || self.first_column >= self.focused_column {
                return spans;
            }
            self.first_column += 1;
        }
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect, table: &RecordsTable, focused: bool) {
        self.area = area;
        self.columns.clear();

        let config = LoadStateConfig::new(" Records ", focused);
        let state = Self::load_state(table);
        if render_non_loaded_state(frame, area, &state, &config) {
            return;
        }
        if table.rows().is_empty() {
            render_empty(frame, area, &config, "No records found.");
            return;
        }

        let block = Block::default()
            .title(Self::title(table))
            .title_bottom(Line::from(format!(" {} ", table.paging_label())))
            .borders(Borders::ALL)
            .border_style(styles::border_style(focused));
        let inner = block.inner(area);

        let symbol_width = u16::try_from(styles::HIGHLIGHT_SYMBOL.width()).unwrap_or(2);
        let header = table.header();
        let rows = table.rows();
        let widths = column_widths(header, rows);
        let columns = self.scroll_to_focus(
            &widths,
            inner.x + symbol_width,
            inner.width.saturating_sub(symbol_width),
        );

        let sort_key = table.query().sort_field.as_deref();
        let header_row = Row::new(columns.iter().map(|span| {
            let cell = &header[span.index];
            let style = if span.index == self.focused_column {
                styles::focused_header_style()
            } else if cell.key.is_some() && cell.key.as_deref() == sort_key {
                styles::sorted_header_style()
            } else {
                styles::header_style()
            };
            Cell::from(truncate_text(&cell.title(), usize::from(span.width))).style(style)
        }));

        let body: Vec<Row> = rows
            .iter()
            .map(|row| {
                let cells = columns.iter().map(|span| {
                    let Some(cell) = row.cells.get(span.index) else {
                        return Cell::from("");
                    };
                    let text = truncate_text(&cell.text, usize::from(span.width));
                    if cell.clickable {
                        Cell::from(text).style(styles::clickable_cell_style())
                    } else {
                        Cell::from(text)
                    }
                });
                Row::new(cells).style(styles::row_style(row.parity))
            })
            .collect();

        let constraints: Vec<Constraint> = columns
            .iter()
            .map(|span| Constraint::Length(span.width))
            .collect();

        let widget = Table::new(body, constraints)
            .header(header_row)
            .block(block)
            .column_spacing(COLUMN_SPACING)
            .flex(Flex::Start)
            .row_highlight_style(styles::row_highlight_style())
            .highlight_symbol(styles::HIGHLIGHT_SYMBOL)
            .highlight_spacing(HighlightSpacing::Always);

        frame.render_stateful_widget(widget, area, &mut self.table_state);
        self.columns = columns;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::test_support::{buffer_text, sample_page};
    use crossterm::event::KeyModifiers;
    use dwc_core::core::menu::MenuOverlay;
    use dwc_core::core::records_table::{FetchPlan, RecordsTableOptions};
    use ratatui::{Terminal, backend::TestBackend};

    fn loaded_table() -> RecordsTable {
        let mut table = RecordsTable::new(RecordsTableOptions::default(), MenuOverlay::new()).unwrap();
        let FetchPlan::Remote(request) = table.fetch_records(false) else {
            panic!("expected a remote fetch");
        };
        table.apply_response(request.seq, Ok(sample_page())).unwrap();
        table
    }

    fn draw(view: &mut RecordsView, table: &RecordsTable, width: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, 12)).unwrap();
        terminal
            .draw(|frame| view.render(frame, frame.area(), table, true))
            .unwrap();
        buffer_text(terminal.backend().buffer())
    }

    #[test]
    fn test_visible_columns_fit_and_spacing() {
        let spans = visible_columns(&[4, 6, 10], 0, 2, 12);
        assert_eq!(
            spans,
            vec![
                ColumnSpan { index: 0, x: 2, width: 4 },
                ColumnSpan { index: 1, x: 7, width: 6 },
            ]
        );
    }

    #[test]
    fn test_visible_columns_narrow_first_column() {
        let spans = visible_columns(&[20, 4], 0, 0, 8);
        assert_eq!(spans, vec![ColumnSpan { index: 0, x: 0, width: 8 }]);
        assert!(visible_columns(&[4], 1, 0, 8).is_empty());
    }

    #[test]
    fn test_render_idle_before_first_fetch() {
        let table = RecordsTable::new(RecordsTableOptions::default(), MenuOverlay::new()).unwrap();
        let mut view = RecordsView::new();
        let text = draw(&mut view, &table, 80);
        assert!(text.contains("Press 'r' to load records"));
    }

    #[test]
    fn test_render_rows_header_and_paging() {
        let table = loaded_table();
        let mut view = RecordsView::new();
        view.clamp(table.rows().len(), table.column_count());
        let text = draw(&mut view, &table, 100);
        assert!(text.contains("Species"));
        assert!(text.contains("Bufo boreas"));
        assert!(text.contains("Showing Results: 1 - 2 (2 total)"));
        assert_eq!(view.selected_row(), Some(0));
    }

    #[test]
    fn test_hit_test_maps_header_and_cells() {
        let table = loaded_table();
        let mut view = RecordsView::new();
        view.clamp(table.rows().len(), table.column_count());
        draw(&mut view, &table, 100);

        let first = view.columns[0];
        assert_eq!(
            view.hit_test(first.x, 1, 2),
            Some(TableHit::Header { column: first.index })
        );
        assert_eq!(
            view.hit_test(first.x, 3, 2),
            Some(TableHit::Cell { row: 1, column: first.index })
        );
        // Below the last row
        assert_eq!(view.hit_test(first.x, 5, 2), None);
        // The highlight gutter belongs to no column
        assert_eq!(view.hit_test(1, 2, 2), None);
    }

    #[test]
    fn test_keys_move_cursor_within_bounds() {
        let mut view = RecordsView::new();
        view.clamp(2, 3);
        let key = |c| KeyEvent::new(c, KeyModifiers::NONE);
        assert!(view.handle_key(key(KeyCode::Char('j')), 2, 3));
        assert!(view.handle_key(key(KeyCode::Char('j')), 2, 3));
        assert_eq!(view.selected_row(), Some(1));
        view.handle_key(key(KeyCode::Right), 2, 3);
        view.handle_key(key(KeyCode::Right), 2, 3);
        view.handle_key(key(KeyCode::Right), 2, 3);
        assert_eq!(view.focused_column(), 2);
        assert!(!view.handle_key(key(KeyCode::Char('x')), 2, 3));
    }

    #[test]
    fn test_narrow_terminal_scrolls_to_focused_column() {
        let table = loaded_table();
        let mut view = RecordsView::new();
        view.clamp(table.rows().len(), table.column_count());
        view.focus_column(table.column_count() - 1);
        let text = draw(&mut view, &table, 24);
        assert!(text.contains("Latitude"));
        assert!(view.first_column > 0);
    }
}
