//! Stationierungs-Arithmetik des PoL-Werkzeugs (Dialog-Buttons).

use super::super::{step_size, StepDirection};
use super::state::PolTool;
use crate::host::canvas::KeyModifiers;

/// Setzt die Stationierung auf einen Dialog-Wert.
///
/// Werte außerhalb `[0, Länge]` bleiben erhalten; geklemmt (mit Meldung)
/// wird erst beim Speichern.
pub fn set_measure(tool: &mut PolTool, value: f64) {
    if let Some(measure) = &mut tool.measure {
        measure.m = value;
    }
}

/// Schrittweises Erhöhen/Verringern der Stationierung.
pub fn step_measure(tool: &mut PolTool, direction: StepDirection, modifiers: KeyModifiers) {
    let Some(measure) = &tool.measure else {
        return;
    };
    let length = tool.length_of(&measure.ref_id);
    let step = step_size(tool.is_geographic(), modifiers);
    let delta = match direction {
        StepDirection::Increase => step,
        StepDirection::Decrease => -step,
    };
    if let Some(measure) = &mut tool.measure {
        measure.m = (measure.m + delta).clamp(0.0, length);
    }
}

/// Setzt die Stationierung auf den Linienanfang.
pub fn move_to_start(tool: &mut PolTool) {
    if let Some(measure) = &mut tool.measure {
        measure.m = 0.0;
    }
}

/// Setzt die Stationierung auf das Linienende.
pub fn move_to_end(tool: &mut PolTool) {
    let Some(measure) = &tool.measure else {
        return;
    };
    let length = tool.length_of(&measure.ref_id);
    if let Some(measure) = &mut tool.measure {
        measure.m = length;
    }
}
