//! Record detail panel.
//!
//! Slides in from the right edge of the body and shows every field of one
//! record, two label/value pairs per line, under a record id search box.

use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table},
};

use dwc_core::core::fields::FieldSet;
use dwc_core::core::record_table::RecordTable;
use dwc_core::utils::text::truncate_text;

use super::styles;
use crate::layout::record_detail::{LABEL_WIDTH, WIDTH_PERCENT};

/// Width the panel occupies inside `body` at a given slide fraction.
pub fn slide_width(body_width: u16, fraction: f32) -> u16 {
    let full = body_width.saturating_mul(WIDTH_PERCENT) / 100;
    let shown = (f32::from(full) * fraction.clamp(0.0, 1.0)).round();
    // fraction is clamped, so shown never exceeds `full`
    shown as u16
}

/// Record detail panel state (scroll position and last drawn area).
#[derive(Debug, Default)]
pub struct RecordDetailPanel {
    scroll: usize,
    area: Option<Rect>,
}

impl RecordDetailPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scroll_up(&mut self) {
        self.scroll = self.scroll.saturating_sub(1);
    }

    pub fn scroll_down(&mut self, row_count: usize) {
        if self.scroll + 1 < row_count {
            self.scroll += 1;
        }
    }

    pub fn reset_scroll(&mut self) {
        self.scroll = 0;
    }

    /// Area covered by the panel at the last draw, if it was on screen.
    pub fn area(&self) -> Option<Rect> {
        self.area
    }

    pub fn render(
        &mut self,
        frame: &mut Frame,
        body: Rect,
        detail: &RecordTable,
        labels: Option<&FieldSet>,
        search_active: bool,
    ) {
        self.area = None;
        if !detail.is_on_screen() {
            return;
        }
        let width = slide_width(body.width, detail.slide_fraction());
        if width < 3 {
            return;
        }
        let area = Rect::new(body.x + body.width - width, body.y, width, body.height);
        self.area = Some(area);
        frame.render_widget(Clear, area);

        let title = match detail.record_id() {
            Some(id) => format!(" Record {} ", id),
            None => " Record ".to_string(),
        };
        let block = Block::default()
            .title(Span::styled(title, styles::modal_title_style()))
            .borders(Borders::ALL)
            .border_style(styles::border_style(true));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let [search_area, grid_area] =
            Layout::vertical([Constraint::Length(1), Constraint::Min(0)]).areas(inner);
        self.render_search(frame, search_area, detail, search_active);

        if detail.is_loading() {
            frame.render_widget(
                Paragraph::new(Span::styled(" ⏳ Loading...", styles::TEXT_WARNING)),
                grid_area,
            );
            return;
        }
        if let Some(error) = detail.last_error() {
            frame.render_widget(
                Paragraph::new(Span::styled(format!(" ❌ {}", error), styles::TEXT_ERROR)),
                grid_area,
            );
            return;
        }

        let grid = detail.grid(labels);
        if grid.is_empty() {
            frame.render_widget(
                Paragraph::new(Span::styled(
                    " Press Enter on an ID or 'i' to look one up",
                    styles::TEXT_DIM,
                )),
                grid_area,
            );
            return;
        }
        self.scroll = self.scroll.min(grid.len() - 1);

        let value_width = usize::from(
            grid_area
                .width
                .saturating_sub(LABEL_WIDTH * 2 + 3)
                / 2,
        );
        let label_width = usize::from(LABEL_WIDTH);
        let rows: Vec<Row> = grid
            .iter()
            .skip(self.scroll)
            .map(|row| {
                let mut cells = vec![
                    Cell::from(truncate_text(&row.left.label, label_width))
                        .style(styles::header_style()),
                    Cell::from(truncate_text(&row.left.value, value_width)),
                ];
                if let Some(right) = &row.right {
                    cells.push(
                        Cell::from(truncate_text(&right.label, label_width))
                            .style(styles::header_style()),
                    );
                    cells.push(Cell::from(truncate_text(&right.value, value_width)));
                }
                Row::new(cells).style(styles::row_style(row.parity))
            })
            .collect();

        let table = Table::new(
            rows,
            [
                Constraint::Length(LABEL_WIDTH),
                Constraint::Fill(1),
                Constraint::Length(LABEL_WIDTH),
                Constraint::Fill(1),
            ],
        )
        .column_spacing(1);
        frame.render_widget(table, grid_area);
    }

    fn render_search(&self, frame: &mut Frame, area: Rect, detail: &RecordTable, active: bool) {
        let mut spans = vec![
            Span::styled(" Id: ", styles::TEXT_DIM),
            Span::styled(detail.search_text().to_string(), styles::input_text_style()),
        ];
        if active {
            spans.push(Span::styled("▏", styles::cursor_style()));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}
