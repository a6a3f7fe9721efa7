//! Stationierungs-Arithmetik des LoL-Werkzeugs (Dialog-Buttons).
//!
//! Alle Operationen klemmen auf `[0, Linienlänge]`; Verschiebungen werden
//! geclippt, nie umgebrochen.

use super::super::{step_size, MeasureTarget, StepDirection};
use super::state::LolTool;
use crate::host::canvas::KeyModifiers;

fn line_length(tool: &LolTool) -> Option<f64> {
    let measure = tool.measure.as_ref()?;
    Some(tool.length_of(&measure.ref_id))
}

/// Setzt eine Stationierung auf einen Dialog-Wert.
///
/// Werte außerhalb `[0, Länge]` bleiben erhalten; geklemmt (mit Meldung)
/// wird erst beim Speichern.
pub fn set_measure(tool: &mut LolTool, target: MeasureTarget, value: f64) {
    if let Some(measure) = &mut tool.measure {
        match target {
            MeasureTarget::From => measure.m_from = value,
            MeasureTarget::To => measure.m_to = value,
        }
    }
}

/// Setzt den signierten Abstand auf einen Dialog-Wert.
pub fn set_offset(tool: &mut LolTool, value: f64) {
    if let Some(measure) = &mut tool.measure {
        measure.offset = value;
    }
}

/// Schrittweises Erhöhen/Verringern einer Stationierung.
pub fn step_measure(
    tool: &mut LolTool,
    target: MeasureTarget,
    direction: StepDirection,
    modifiers: KeyModifiers,
) {
    let Some(length) = line_length(tool) else {
        return;
    };
    let step = step_size(tool.is_geographic(), modifiers);
    let delta = match direction {
        StepDirection::Increase => step,
        StepDirection::Decrease => -step,
    };
    if let Some(measure) = &mut tool.measure {
        match target {
            MeasureTarget::From => measure.m_from = (measure.m_from + delta).clamp(0.0, length),
            MeasureTarget::To => measure.m_to = (measure.m_to + delta).clamp(0.0, length),
        }
    }
}

/// Verschiebt das Segment um `delta`, geclippt auf die Linie.
///
/// Das Delta wird so gekappt, dass beide Stationierungen in
/// `[0, length]` bleiben — die Segment-Länge bleibt erhalten.
pub fn shift_segment(tool: &mut LolTool, delta: f64) {
    let Some(length) = line_length(tool) else {
        return;
    };
    if let Some(measure) = &mut tool.measure {
        let (a, b) = measure.span();
        let clipped = delta.clamp(-a, (length - b).max(-a));
        measure.m_from += clipped;
        measure.m_to += clipped;
    }
}

/// Schiebt das Segment an den Linienanfang (Länge bleibt erhalten).
pub fn move_to_start(tool: &mut LolTool) {
    if let Some(measure) = &tool.measure {
        let (a, _) = measure.span();
        shift_segment(tool, -a);
    }
}

/// Schiebt das Segment an das Linienende (Länge bleibt erhalten).
pub fn move_to_end(tool: &mut LolTool) {
    let Some(length) = line_length(tool) else {
        return;
    };
    if let Some(measure) = &tool.measure {
        let (_, b) = measure.span();
        shift_segment(tool, length - b);
    }
}

/// Verschiebt das Segment um die eigene Länge Richtung Anfang (geclippt).
pub fn prepend(tool: &mut LolTool) {
    if let Some(measure) = &tool.measure {
        shift_segment(tool, -measure.segment_length());
    }
}

/// Verschiebt das Segment um die eigene Länge Richtung Ende (geclippt).
pub fn append(tool: &mut LolTool) {
    if let Some(measure) = &tool.measure {
        shift_segment(tool, measure.segment_length());
    }
}

/// Spiegelt das Segment an seinem Mittelpunkt (tauscht Von und Bis).
pub fn flip(tool: &mut LolTool) {
    if let Some(measure) = &mut tool.measure {
        std::mem::swap(&mut measure.m_from, &mut measure.m_to);
    }
}
