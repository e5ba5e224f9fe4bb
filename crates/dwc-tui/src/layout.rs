//! Layout constants for dwc-tui.
//!
//! Centralizes all layout-related magic numbers for easy tuning and consistency.

/// Main layout constants.
pub mod main {
    /// Header panel height in rows (includes tab bar).
    pub const HEADER_HEIGHT: u16 = 3;

    /// Status bar height in rows.
    pub const STATUS_BAR_HEIGHT: u16 = 3;

    /// Event poll interval; also the frame period of the detail slide.
    pub const TICK_RATE_MS: u64 = 50;
}

/// Records table column widths.
pub mod records_table {
    /// Widest a column may grow before cell text is truncated.
    pub const MAX_COLUMN_WIDTH: u16 = 32;

    /// Narrowest column.
    pub const MIN_COLUMN_WIDTH: u16 = 3;

    /// Gap between columns.
    pub const COLUMN_SPACING: u16 = 1;

    /// Rows above the first record: top border plus header.
    pub const BODY_OFFSET: u16 = 2;
}

/// Record detail panel.
pub mod record_detail {
    /// Width of the fully shown panel, as a share of the body.
    pub const WIDTH_PERCENT: u16 = 50;

    /// Label column width inside each half of a grid row.
    pub const LABEL_WIDTH: u16 = 16;
}
