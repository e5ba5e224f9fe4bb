//! Single-record detail table.

use crate::api::models::Record;
use crate::core::fields::FieldSet;
use crate::core::render::Parity;
use crate::error::{ApiError, TableError};
use crate::utils::text::display_value;

/// Frames of the show/hide slide.
pub const SLIDE_FRAMES: u8 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Hidden,
    Showing { frame: u8 },
    Shown,
    Hiding { frame: u8 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordRequest {
    pub seq: u64,
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridCell {
    pub key: String,
    pub label: String,
    pub value: String,
}

/// One physical row: two label/value pairs, the second blank on an odd tail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridRow {
    pub left: GridCell,
    pub right: Option<GridCell>,
    pub first: bool,
    pub last: bool,
    pub parity: Parity,
}

pub struct RecordTable {
    id_field: String,
    record_id: Option<String>,
    search: String,
    record: Option<Record>,
    visibility: Visibility,
    latest_seq: u64,
    auto_show: bool,
    loading: bool,
    last_error: Option<ApiError>,
}

impl RecordTable {
    pub fn new(id_field: impl Into<String>) -> Self {
        RecordTable {
            id_field: id_field.into(),
            record_id: None,
            search: String::new(),
            record: None,
            visibility: Visibility::Hidden,
            latest_seq: 0,
            auto_show: false,
            loading: false,
            last_error: None,
        }
    }

    /// Look up record `id`; the caller fetches it and reports back through
    /// [`apply_record`](Self::apply_record).
    pub fn set_record_id(&mut self, id: &str, auto_show: bool) -> RecordRequest {
        let id = id.trim().to_string();
        self.latest_seq += 1;
        self.record_id = Some(id.clone());
        self.search = id.clone();
        self.auto_show = auto_show;
        self.loading = true;
        log::debug!("record request #{}: {}", self.latest_seq, id);
        RecordRequest {
            seq: self.latest_seq,
            id,
        }
    }

    pub fn apply_record(&mut self, seq: u64, result: Result<Record, ApiError>) -> Result<(), TableError> {
        if seq != self.latest_seq {
            log::warn!(
                "discarding stale record response #{} (latest #{})",
                seq,
                self.latest_seq
            );
            return Err(TableError::StaleResponse {
                seq,
                latest: self.latest_seq,
            });
        }
        self.loading = false;

        match result {
            Ok(record) => {
                self.record = Some(record);
                self.last_error = None;
                if self.auto_show && !self.is_shown() {
                    self.show();
                }
                Ok(())
            }
            Err(error) => {
                log::warn!("record request #{} failed: {}", seq, error);
                self.last_error = Some(error.clone());
                Err(TableError::FetchFailed(error))
            }
        }
    }

    /// Start sliding in.
    pub fn show(&mut self) {
        self.visibility = match self.visibility {
            Visibility::Hidden => Visibility::Showing { frame: 0 },
            Visibility::Hiding { frame } => Visibility::Showing {
                frame: SLIDE_FRAMES.saturating_sub(frame),
            },
            other => other,
        };
    }

    /// Start sliding out.
    pub fn hide(&mut self) {
        self.visibility = match self.visibility {
            Visibility::Shown => Visibility::Hiding { frame: 0 },
            Visibility::Showing { frame } => Visibility::Hiding {
                frame: SLIDE_FRAMES.saturating_sub(frame),
            },
            other => other,
        };
    }

    pub fn toggle(&mut self) {
        if self.is_shown() {
            self.hide();
        } else {
            self.show();
        }
    }

    /// Advance the slide by one frame. Returns true while animating.
    pub fn tick(&mut self) -> bool {
        self.visibility = match self.visibility {
            Visibility::Showing { frame } if frame + 1 >= SLIDE_FRAMES => Visibility::Shown,
            Visibility::Showing { frame } => Visibility::Showing { frame: frame + 1 },
            Visibility::Hiding { frame } if frame + 1 >= SLIDE_FRAMES => Visibility::Hidden,
            Visibility::Hiding { frame } => Visibility::Hiding { frame: frame + 1 },
            other => other,
        };
        self.is_animating()
    }

    pub fn finish_animation(&mut self) {
        self.visibility = match self.visibility {
            Visibility::Showing { .. } => Visibility::Shown,
            Visibility::Hiding { .. } => Visibility::Hidden,
            other => other,
        };
    }

    /// Logical state: true once a show has been requested, even mid-slide.
    pub fn is_shown(&self) -> bool {
        matches!(self.visibility, Visibility::Shown | Visibility::Showing { .. })
    }

    pub fn is_animating(&self) -> bool {
        matches!(
            self.visibility,
            Visibility::Showing { .. } | Visibility::Hiding { .. }
        )
    }

    /// Whether anything should be drawn.
    pub fn is_on_screen(&self) -> bool {
        self.visibility != Visibility::Hidden
    }

    /// Portion of the panel currently slid in, 0.0 to 1.0.
    pub fn slide_fraction(&self) -> f32 {
        let frames = f32::from(SLIDE_FRAMES);
        match self.visibility {
            Visibility::Hidden => 0.0,
            Visibility::Shown => 1.0,
            Visibility::Showing { frame } => f32::from(frame + 1) / frames,
            Visibility::Hiding { frame } => 1.0 - f32::from(frame + 1) / frames,
        }
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    /// Label/value grid, two fields per row, id field first.
    pub fn grid(&self, labels: Option<&FieldSet>) -> Vec<GridRow> {
        let Some(record) = &self.record else {
            return Vec::new();
        };

        let label_for = |key: &str| {
            labels
                .and_then(|f| f.get(key))
                .map(|f| f.label().to_string())
                .unwrap_or_else(|| key.to_string())
        };
        let cell = |key: &str| GridCell {
            key: key.to_string(),
            label: label_for(key),
            value: record.get(key).map(display_value).unwrap_or_default(),
        };

        let mut keys: Vec<&str> = Vec::with_capacity(record.len());
        if record.contains_key(&self.id_field) {
            keys.push(&self.id_field);
        }
        keys.extend(record.keys().map(String::as_str).filter(|k| *k != self.id_field));

        let row_count = keys.len().div_ceil(2);
        keys.chunks(2)
            .enumerate()
            .map(|(i, pair)| GridRow {
                left: cell(pair[0]),
                right: pair.get(1).map(|&k| cell(k)),
                first: i == 0,
                last: i + 1 == row_count,
                parity: if i % 2 == 0 { Parity::Odd } else { Parity::Even },
            })
            .collect()
    }

    pub fn search_text(&self) -> &str {
        &self.search
    }

    pub fn push_search_char(&mut self, c: char) {
        self.search.push(c);
    }

    pub fn pop_search_char(&mut self) {
        self.search.pop();
    }

    pub fn clear_search(&mut self) {
        self.search.clear();
    }

    /// Look up whatever is typed in the search box. Blank input does nothing.
    pub fn submit_search(&mut self, auto_show: bool) -> Option<RecordRequest> {
        let id = self.search.trim().to_string();
        if id.is_empty() {
            return None;
        }
        Some(self.set_record_id(&id, auto_show))
    }

    pub fn record_id(&self) -> Option<&str> {
        self.record_id.as_deref()
    }

    pub fn record(&self) -> Option<&Record> {
        self.record.as_ref()
    }

    pub fn id_field(&self) -> &str {
        &self.id_field
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn last_error(&self) -> Option<&ApiError> {
        self.last_error.as_ref()
    }
}
