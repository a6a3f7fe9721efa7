//! App-Schicht: Engine-Zustand, Events, Controller, Werkzeuge, Use-Cases.

pub mod bindings;
pub mod controller;
pub mod events;
pub mod handlers;
pub mod intent_mapping;
pub mod state;
pub mod tools;
pub mod use_cases;

pub use bindings::{
    LolBindings, LolDataBinding, PolBindings, PolDataBinding, ReferenceBinding, ShowBinding,
};
pub use controller::AppController;
pub use events::{AppCommand, AppIntent};
pub use state::EngineState;
pub use tools::{
    LolMeasure, LolMode, LolTool, MeasureTarget, PolMeasure, PolMode, PolTool, StepDirection,
    ToolKind,
};
