//! Turns a result page and field configuration into table rows.
//!
//! Everything here is a pure function of its inputs; the markers on rows and
//! cells only drive styling.

use crate::api::models::{Record, ResultPage};
use crate::core::fields::FieldSet;
use crate::core::query::SortOrder;
use crate::utils::text::display_value;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parity {
    Odd,
    Even,
}

impl Parity {
    fn of(index: usize) -> Self {
        if index % 2 == 0 { Parity::Odd } else { Parity::Even }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions<'a> {
    pub row_numbers: bool,
    /// Table-wide fallback for missing values.
    pub default_value: &'a Value,
    pub id_field: &'a str,
    /// Id cells open a linked detail table.
    pub linked_detail: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedCell {
    /// `None` for the row-number column.
    pub key: Option<String>,
    pub text: String,
    pub first: bool,
    pub last: bool,
    pub clickable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedRow {
    /// 1-based position in the whole result set.
    pub number: u64,
    /// Value of the id field, when the record has one.
    pub record_id: Option<String>,
    pub cells: Vec<RenderedCell>,
    pub first: bool,
    pub last: bool,
    pub parity: Parity,
}

impl RenderedRow {
    pub fn cell(&self, key: &str) -> Option<&RenderedCell> {
        self.cells.iter().find(|c| c.key.as_deref() == Some(key))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderCell {
    pub key: Option<String>,
    pub label: String,
    pub sort: Option<SortOrder>,
}

impl HeaderCell {
    /// Label with the sort arrow appended when this column is sorted.
    pub fn title(&self) -> String {
        match self.sort {
            Some(order) => format!("{} {}", self.label, order.arrow()),
            None => self.label.clone(),
        }
    }
}

/// Text for one cell: the record's value, else the field default, else the
/// table default, else empty. `null` counts as missing.
pub fn cell_text(record: &Record, key: &str, field_default: Option<&Value>, table_default: &Value) -> String {
    match record.get(key) {
        Some(value) if !value.is_null() => display_value(value),
        _ => display_value(field_default.unwrap_or(table_default)),
    }
}

pub fn record_id(record: &Record, id_field: &str) -> Option<String> {
    record
        .get(id_field)
        .filter(|v| !v.is_null())
        .map(display_value)
}

pub fn render_header(fields: &FieldSet, opts: &RenderOptions<'_>, sort: Option<(&str, SortOrder)>) -> Vec<HeaderCell> {
    let mut header = Vec::new();
    if opts.row_numbers {
        header.push(HeaderCell {
            key: None,
            label: "#".to_string(),
            sort: None,
        });
    }
    for field in fields.display_order() {
        header.push(HeaderCell {
            key: Some(field.key.clone()),
            label: field.label().to_string(),
            sort: sort.filter(|(key, _)| *key == field.key).map(|(_, order)| order),
        });
    }
    header
}

pub fn render_rows(page: &ResultPage, fields: &FieldSet, opts: &RenderOptions<'_>) -> Vec<RenderedRow> {
    let columns = fields.display_order();
    let row_count = page.docs.len();

    page.docs
        .iter()
        .enumerate()
        .map(|(i, record)| {
            let number = page.start + i as u64 + 1;
            let mut cells = Vec::with_capacity(columns.len() + 1);

            if opts.row_numbers {
                cells.push(RenderedCell {
                    key: None,
                    text: number.to_string(),
                    first: false,
                    last: false,
                    clickable: false,
                });
            }
            for field in &columns {
                cells.push(RenderedCell {
                    key: Some(field.key.clone()),
                    text: cell_text(record, &field.key, field.default_value.as_ref(), opts.default_value),
                    first: false,
                    last: false,
                    clickable: field.clickable || (opts.linked_detail && field.key == opts.id_field),
                });
            }
            if let Some(cell) = cells.first_mut() {
                cell.first = true;
            }
            if let Some(cell) = cells.last_mut() {
                cell.last = true;
            }

            RenderedRow {
                number,
                record_id: record_id(record, opts.id_field),
                cells,
                first: i == 0,
                last: i + 1 == row_count,
                parity: Parity::of(i),
            }
        })
        .collect()
}

/// Footer text, e.g. `Showing Results: 101 - 103 (103 total)`.
pub fn paging_label(start: u64, count: u64, total: u64) -> String {
    if total == 0 {
        return "Showing Results: 0 (0 total)".to_string();
    }
    let first = (start + 1).min(total);
    let last = (start + count).min(total);
    format!("Showing Results: {} - {} ({} total)", first, last, total)
}
