//! Intent- und Command-Events des Controllers.

mod command;
mod intent;

pub use command::AppCommand;
pub use intent::AppIntent;
