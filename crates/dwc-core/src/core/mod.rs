pub mod fields;
pub mod map;
pub mod menu;
pub mod query;
pub mod record_table;
pub mod records_table;
pub mod render;
pub mod services;
pub mod source;
