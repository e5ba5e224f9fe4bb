//! # dwc-core
//!
//! Core library for browsing records served by a Darwin Core gateway.
//!
//! This crate provides the shared functionality used by both `dwc-cli` and `dwc-tui`:
//! the gateway HTTP client, the records table and record detail controllers, the
//! field context menu and the configuration they are built from.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use dwc_core::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> dwc_core::Result<()> {
//!     let config = Config::load(None)?;
//!     let client = GatewayClient::new("http://localhost:8000")?;
//!
//!     let mut table = RecordsTable::new(config.records_table_options(), MenuOverlay::new())?;
//!     table.load(&client, false).await?;
//!     println!("{}", table.paging_label());
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │           API Layer                 │  Gateway client, response models
//! ├─────────────────────────────────────┤
//! │          Core Layer                 │  Query state, fields, rendering, widgets
//! ├─────────────────────────────────────┤
//! │        Storage Layer                │  Configuration persistence
//! ├─────────────────────────────────────┤
//! │         Utils Layer                 │  Validation, text, logging, error helpers
//! └─────────────────────────────────────┘
//! ```
//!
//! The widgets in [`core`] never touch the network. Operations that need data
//! return a plan or request tagged with a sequence number; the caller performs
//! the fetch through a [`core::source::RecordSource`] and hands the result back.
//! Responses to superseded requests are rejected.
//!
//! ## Modules
//!
//! - [`api`]: Gateway HTTP client and data models
//! - [`core`]: Records table, record table, context menu, rendering, map points
//! - [`storage`]: Configuration file management
//! - [`utils`]: Shared utilities (validation, text formatting, logging)
//! - [`display`]: comfy-table output for the command line
//! - [`error`]: Hierarchical error system with troubleshooting hints

pub use error::AppError;

/// Prelude module for convenient imports.
///
/// ```rust,ignore
/// use dwc_core::prelude::*;
/// ```
pub mod prelude {
    // Error handling
    pub use crate::Result;
    pub use crate::error::{ApiError, AppError, TableError};

    // API client and models
    pub use crate::api::client::GatewayClient;
    pub use crate::api::models::{FieldCatalog, Record, ResultPage};

    // Widgets
    pub use crate::core::fields::FieldDescriptor;
    pub use crate::core::menu::{ContextMenu, MenuEvent, MenuOverlay};
    pub use crate::core::query::SortOrder;
    pub use crate::core::record_table::RecordTable;
    pub use crate::core::records_table::{
        FetchPlan, RecordsTable, RecordsTableOptions, SelectionHandler, TableCommand,
    };
    pub use crate::core::source::RecordSource;

    // Services
    pub use crate::core::services::config_service::ConfigService;

    // Storage
    pub use crate::storage::config::Config;
}

pub mod api;
pub mod core;
pub mod display;
pub mod error;
pub mod storage;
pub mod utils;

/// Convenience alias for results using [`AppError`].
pub type Result<T> = std::result::Result<T, AppError>;

// Re-export commonly used types at crate root
pub use crate::api::client::GatewayClient;
pub use crate::core::records_table::RecordsTable;
pub use crate::core::services::config_service::ConfigService;
pub use crate::storage::config::Config;
