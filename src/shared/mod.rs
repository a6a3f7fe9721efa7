//! Geteilte Typen für layer-übergreifende Verträge.

pub mod options;

pub use options::ToolStyle;
pub use options::{GEOGRAPHIC_STEP, HANDLE_TOLERANCE_PX, MEASURE_PRECISION};
