//! Point-on-Line-Werkzeug: Modus, Messung, Arithmetik.

pub mod arithmetic;
mod state;


pub use state::{PolMeasure, PolMode, PolTool};
