//! Aggregierter Engine-Zustand.

use super::tools::{LolTool, PolTool};

/// Gesamter Zustand der Engine: beide Werkzeuge mit Bindungen, Katalogen,
/// Arbeits-Selektionen und Modi.
pub struct EngineState {
    pub pol: PolTool,
    pub lol: LolTool,
}

impl EngineState {
    /// Erstellt einen leeren Engine-Zustand (beide Werkzeuge `Disabled`).
    pub fn new() -> Self {
        Self {
            pol: PolTool::new(),
            lol: LolTool::new(),
        }
    }
}

impl Default for EngineState {
    fn default() -> Self {
        Self::new()
    }
}
