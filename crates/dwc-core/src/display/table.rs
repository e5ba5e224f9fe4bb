use crate::api::models::{FieldCatalog, FieldValueCount, GatewaySummary};
use crate::core::record_table::GridRow;
use crate::core::render::{HeaderCell, RenderedRow};
use crate::utils::text::{display_value, format_datetime, truncate_text};
use comfy_table::{Attribute, Cell, Color, Table, presets};
use crossterm::terminal;

const MAX_CELL_WIDTH: usize = 60;

pub struct TableDisplay {
    max_width: Option<usize>,
    use_colors: bool,
}

impl TableDisplay {
    pub fn new() -> Self {
        Self {
            max_width: Self::detect_terminal_width(),
            use_colors: true,
        }
    }

    fn detect_terminal_width() -> Option<usize> {
        match terminal::size() {
            Ok((cols, _)) => {
                let width = cols as usize;
                Some(width.clamp(40, 200))
            }
            Err(_) => Some(80),
        }
    }

    pub fn with_max_width(mut self, width: usize) -> Self {
        self.max_width = Some(width);
        self
    }

    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }

    fn bold_header(&self, text: &str, color: Color) -> Cell {
        if self.use_colors {
            Cell::new(text).add_attribute(Attribute::Bold).fg(color)
        } else {
            Cell::new(text).add_attribute(Attribute::Bold)
        }
    }

    fn colored_cell(&self, text: &str, color: Color) -> Cell {
        if self.use_colors {
            Cell::new(text).fg(color)
        } else {
            Cell::new(text)
        }
    }

    fn new_table(&self) -> Table {
        let mut table = Table::new();
        table.load_preset(presets::UTF8_FULL);
        table.set_content_arrangement(comfy_table::ContentArrangement::Dynamic);
        self.configure_table_width(&mut table);
        table
    }

    fn configure_table_width(&self, table: &mut Table) {
        let width = self
            .max_width
            .map(|w| if w > 20 { w - 6 } else { w.max(40) })
            .unwrap_or(80);
        table.set_width(width as u16);
    }

    /// Rendered records page followed by the paging label.
    pub fn render_records(&self, header: &[HeaderCell], rows: &[RenderedRow], paging_label: &str) -> String {
        if rows.is_empty() {
            return "No records found.".to_string();
        }

        let mut table = self.new_table();
        table.set_header(
            header
                .iter()
                .map(|h| self.bold_header(&h.title(), Color::Cyan))
                .collect::<Vec<_>>(),
        );

        for row in rows {
            let cells: Vec<Cell> = row
                .cells
                .iter()
                .map(|cell| {
                    let text = truncate_text(&cell.text, MAX_CELL_WIDTH);
                    match cell.key {
                        None => self.colored_cell(&text, Color::DarkGrey),
                        Some(_) if cell.clickable => self.colored_cell(&text, Color::Cyan),
                        Some(_) => Cell::new(text),
                    }
                })
                .collect();
            table.add_row(cells);
        }

        format!("{}\n{}", table, paging_label)
    }

    /// Two label/value pairs per row.
    pub fn render_record_grid(&self, grid: &[GridRow]) -> String {
        if grid.is_empty() {
            return "Record is empty.".to_string();
        }

        let mut table = self.new_table();
        for row in grid {
            let (right_label, right_value) = match &row.right {
                Some(cell) => (cell.label.as_str(), cell.value.as_str()),
                None => ("", ""),
            };
            table.add_row(vec![
                self.bold_header(&row.left.label, Color::Green),
                Cell::new(truncate_text(&row.left.value, MAX_CELL_WIDTH)),
                self.bold_header(right_label, Color::Green),
                Cell::new(truncate_text(right_value, MAX_CELL_WIDTH)),
            ]);
        }
        table.to_string()
    }

    pub fn render_fields(&self, catalog: &FieldCatalog) -> String {
        let mut table = self.new_table();
        table.set_header(vec![
            self.bold_header("Field", Color::Cyan),
            self.bold_header("Label", Color::Cyan),
            self.bold_header("Type", Color::Cyan),
        ]);
        for (key, meta) in &catalog.fields {
            table.add_row(vec![
                self.colored_cell(key, Color::Cyan),
                Cell::new(meta.label.as_deref().unwrap_or("")),
                self.colored_cell(meta.field_type.as_deref().unwrap_or("-"), Color::DarkGrey),
            ]);
        }
        table.to_string()
    }

    pub fn render_field_values(&self, values: &[FieldValueCount]) -> String {
        if values.is_empty() {
            return "No values found.".to_string();
        }
        let mut table = self.new_table();
        table.set_header(vec![
            self.bold_header("Value", Color::Cyan),
            self.bold_header("Count", Color::Cyan),
        ]);
        for value in values {
            table.add_row(vec![
                Cell::new(truncate_text(&display_value(value.value()), MAX_CELL_WIDTH)),
                Cell::new(value.count()),
            ]);
        }
        table.to_string()
    }

    pub fn render_summary(&self, summary: &GatewaySummary) -> String {
        let rows = vec![
            ("URL".to_string(), summary.url.clone().unwrap_or_default()),
            ("Records".to_string(), summary.num_records.to_string()),
            (
                "Last modified".to_string(),
                summary
                    .last_modified
                    .as_deref()
                    .map(format_datetime)
                    .unwrap_or_default(),
            ),
            (
                "Server time".to_string(),
                summary.current_time.clone().unwrap_or_default(),
            ),
        ];
        self.render_key_values(&rows)
    }

    /// Two-column key/value table
    pub fn render_key_values(&self, rows: &[(String, String)]) -> String {
        let mut table = self.new_table();
        for (key, value) in rows {
            table.add_row(vec![self.bold_header(key, Color::Green), Cell::new(value)]);
        }
        table.to_string()
    }
}

impl Default for TableDisplay {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::ResultPage;
    use crate::core::fields::FieldSet;
    use crate::core::query::SortOrder;
    use crate::core::record_table::RecordTable;
    use crate::core::render::{RenderOptions, render_header, render_rows};
    use serde_json::{Value, json};

    fn display() -> TableDisplay {
        TableDisplay::new().with_max_width(120).with_colors(false)
    }

    #[test]
    fn test_render_records() {
        let page: ResultPage = serde_json::from_value(json!({
            "numFound": 2,
            "start": 0,
            "docs": [
                {"id": "MVZ.1", "sciName_s": "Bufo boreas", "lat": 37.8, "lng": -122.2},
                {"id": "MVZ.2", "sciName_s": "Rana draytonii"}
            ]
        }))
        .unwrap();
        let fields = FieldSet::darwin_core_defaults();
        let empty = Value::Null;
        let opts = RenderOptions {
            row_numbers: true,
            default_value: &empty,
            id_field: "id",
            linked_detail: true,
        };
        let header = render_header(&fields, &opts, Some(("id", SortOrder::Ascending)));
        let rows = render_rows(&page, &fields, &opts);

        let output = display().render_records(&header, &rows, "Showing Results: 1 - 2 (2 total)");
        assert!(output.contains("ID ▲"));
        assert!(output.contains("Bufo boreas"));
        assert!(output.contains("-122.2"));
        assert!(output.ends_with("Showing Results: 1 - 2 (2 total)"));
    }

    #[test]
    fn test_render_records_empty() {
        assert_eq!(display().render_records(&[], &[], ""), "No records found.");
    }

    #[test]
    fn test_render_record_grid() {
        let mut detail = RecordTable::new("id");
        let request = detail.set_record_id("MVZ.1", false);
        detail
            .apply_record(
                request.seq,
                Ok(json!({"lat": 37.8, "id": "MVZ.1", "genus_s": "Bufo"})
                    .as_object()
                    .cloned()
                    .unwrap()),
            )
            .unwrap();
        let output = display().render_record_grid(&detail.grid(None));
        assert!(output.contains("MVZ.1"));
        assert!(output.contains("genus_s"));
        let id_line = output.lines().find(|l| l.contains("MVZ.1")).unwrap();
        assert!(id_line.contains("lat"));
    }

    #[test]
    fn test_render_fields_and_values() {
        let catalog: FieldCatalog =
            serde_json::from_value(json!({"sciName_s": {"label": "Species", "type": "string"}}))
                .unwrap();
        let output = display().render_fields(&catalog);
        assert!(output.contains("sciName_s"));
        assert!(output.contains("Species"));

        let values: Vec<FieldValueCount> =
            serde_json::from_value(json!([["Bufo", 12], ["Rana", 3]])).unwrap();
        let output = display().render_field_values(&values);
        assert!(output.contains("Bufo"));
        assert!(output.contains("12"));
        assert_eq!(display().render_field_values(&[]), "No values found.");
    }

    #[test]
    fn test_render_summary() {
        let summary = GatewaySummary {
            url: Some("http://localhost/gateway/".to_string()),
            num_records: 1200,
            last_modified: Some("2011-02-14T10:00:00Z".to_string()),
            current_time: None,
        };
        let output = display().render_summary(&summary);
        assert!(output.contains("1200"));
        assert!(output.contains("2011-02-14"));
        assert!(!output.contains("10:00:00"));
    }
}
