//! Stationierungs-Engine für lineare Referenzierung.
//! Kernel, Datenmodell, State-Machines und Host-Port als Library exportiert
//! für Tests und Einbettung in einen GIS-Host.

pub mod app;
pub mod core;
pub mod host;
pub mod shared;

pub use app::{
    AppCommand, AppController, AppIntent, EngineState, LolMeasure, LolMode, MeasureTarget,
    PolMeasure, PolMode, StepDirection, ToolKind,
};
pub use core::{
    interpolate, locate, offset_curve, substring, Crs, EngineError, FieldType, FieldValue,
    LocatedPoint, LolRecord, PolRecord, ReferenceCatalog, ReferenceGeometry, SegmentIndex,
    ShowFeature, ShowGeometry, Validity,
};
pub use host::{
    Capabilities, CursorShape, Feature, FieldDef, HostPort, KeyModifiers, LayerEvent,
    LayerEventKind, MemoryHost, MemoryLayer, MessageLevel, MouseButton, PendingEditsChoice,
};
pub use shared::ToolStyle;
