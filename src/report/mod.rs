//! Report module - assembling, rendering and exporting profiling results

pub mod profile_report;
pub mod summary;
pub mod table_export;

pub use profile_report::*;
pub use summary::*;
pub use table_export::*;
