//! View-models for the firm analytics platform
//!
//! Each view owns its filter state and in-flight request tracking; nothing
//! is shared across view instances. Rendering is a display concern handled
//! elsewhere; these types expose snapshots a renderer can draw from.

mod browser;
mod dashboard;
mod debounce;
mod explorer;
mod map;
mod raw_data;

pub use browser::{BrowserSnapshot, RecordBrowser};
pub use dashboard::{DashboardSnapshot, DashboardView};
pub use debounce::Debouncer;
pub use explorer::{FirmExplorer, EXPLORER_PAGE_SIZE};
pub use map::{GeocodedFirm, MapLoader, MAP_PIN_LIMIT};
pub use raw_data::{SourceBrowser, RAW_PAGE_SIZE};
