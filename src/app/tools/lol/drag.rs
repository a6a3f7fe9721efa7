//! Drag-Logik des LoL-Werkzeugs: Endpunkte und Segment verschieben.

use super::state::{LolDrag, LolDragTarget, LolMode, LolTool};
use crate::core::linref::LocatedPoint;
use crate::host::canvas::KeyModifiers;

/// Startet einen Drag auf dem angegebenen Griff.
///
/// `grab_m`: Stationierung unter dem Cursor beim Packen.
pub fn begin_drag(tool: &mut LolTool, target: LolDragTarget, grab_m: f64) {
    let Some(measure) = &tool.measure else {
        return;
    };
    tool.drag = Some(LolDrag {
        target,
        grab_m,
        start_m_from: measure.m_from,
        start_m_to: measure.m_to,
        start_offset: measure.offset,
    });
    tool.mode = match target {
        LolDragTarget::FromPoint => LolMode::BeforeMoveFromPoint,
        LolDragTarget::ToPoint => LolMode::BeforeMoveToPoint,
        LolDragTarget::Segment => LolMode::BeforeMoveSegment,
    };
}

/// Aktualisiert die Messung während eines Drags.
///
/// Segment-Drag-Modifikatoren:
/// - ohne: beide Stationierungen verschieben, Offset unverändert
/// - Ctrl: verschieben plus Offset aus dem signierten Cursor-Abstand
/// - Shift: Stationierungen fixiert, nur Offset aus dem Cursor-Abstand
pub fn update_drag(
    tool: &mut LolTool,
    cursor: &LocatedPoint,
    modifiers: KeyModifiers,
    length: f64,
) {
    let Some(drag) = tool.drag.clone() else {
        return;
    };
    let Some(measure) = &mut tool.measure else {
        return;
    };

    match drag.target {
        LolDragTarget::FromPoint => {
            measure.m_from = cursor.m.clamp(0.0, length);
            tool.mode = LolMode::MoveFromPoint;
        }
        LolDragTarget::ToPoint => {
            measure.m_to = cursor.m.clamp(0.0, length);
            tool.mode = LolMode::MoveToPoint;
        }
        LolDragTarget::Segment => {
            let cursor_offset = f64::from(cursor.side) * cursor.distance;

            if modifiers.shift && !modifiers.ctrl {
                // Stationierungen fixiert, nur Offset folgt dem Cursor
                measure.m_from = drag.start_m_from;
                measure.m_to = drag.start_m_to;
                measure.offset = cursor_offset;
            } else {
                let a = drag.start_m_from.min(drag.start_m_to);
                let b = drag.start_m_from.max(drag.start_m_to);
                let delta = cursor.m - drag.grab_m;
                let clipped = delta.clamp(-a, (length - b).max(-a));
                measure.m_from = drag.start_m_from + clipped;
                measure.m_to = drag.start_m_to + clipped;
                measure.offset = if modifiers.ctrl {
                    cursor_offset
                } else {
                    drag.start_offset
                };
            }
            tool.mode = LolMode::MoveSegment;
        }
    }
}

/// Beendet den Drag und kehrt nach `AfterMeasure` zurück.
pub fn end_drag(tool: &mut LolTool) {
    tool.drag = None;
    if tool.measure.is_some() {
        tool.mode = LolMode::AfterMeasure;
    }
}
