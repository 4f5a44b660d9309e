//! Pipeline module - the analysis steps run over a loaded table

pub mod cleaning;
pub mod correlation;
pub mod distribution;
pub mod loader;
pub mod quality;
pub mod session;
pub mod stats;
pub mod summary;
pub mod types;

pub use cleaning::*;
pub use correlation::*;
pub use distribution::*;
pub use loader::*;
pub use quality::*;
pub use session::*;
pub use stats::{describe_numeric_columns, ColumnStats, NumericSummary};
pub use summary::*;
pub use types::*;
