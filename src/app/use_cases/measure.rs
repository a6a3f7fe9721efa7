//! Use-Cases des Messens: Hover, Klick, Griff-Drags für beide Werkzeuge.
//!
//! Alle Canvas-Positionen kommen in Display-Koordinaten an und werden an der
//! Grenze in das CRS der Bezugslinie transformiert; der Kernel sieht nie
//! Display-Koordinaten.

use glam::DVec2;

use crate::app::bindings::ReferenceBinding;
use crate::app::state::EngineState;
use crate::app::tools::lol::drag as lol_drag;
use crate::app::tools::{
    LolDragTarget, LolMode, MeasureFeedback, PolMeasure, PolMode, ToolKind,
};
use crate::core::crs::Crs;
use crate::core::geom::closest_point_on_segment;
use crate::core::linref::{interpolate, locate, segment_geom};
use crate::core::records::FieldValue;
use crate::core::reference::ReferenceCatalog;
use crate::host::canvas::{CursorShape, KeyModifiers};
use crate::host::messages::MessageLevel;
use crate::host::HostPort;

/// Ergebnis einer Snap-Auflösung gegen die Bezugslinien.
enum SnapOutcome {
    /// Kein Treffer innerhalb der Toleranz
    Miss,
    /// Treffer auf mehrteiliger Geometrie: keine Stationierung möglich
    MultiPart { ref_id: FieldValue },
    /// Treffer mit aufgelöster Stationierung
    Hit(MeasureFeedback),
}

fn display_to_ref(host: &mut dyn HostPort, ref_crs: &Crs, pos: DVec2) -> Option<DVec2> {
    let display_crs = host.canvas().display_crs();
    host.projection()
        .transform_point(pos, &display_crs, ref_crs)
        .ok()
}

fn ref_to_display(host: &mut dyn HostPort, ref_crs: &Crs, p: DVec2) -> Option<DVec2> {
    let display_crs = host.canvas().display_crs();
    host.projection()
        .transform_point(p, ref_crs, &display_crs)
        .ok()
}

/// Minimaler Abstand eines Punkts zu einer Polyline.
fn polyline_distance(p: DVec2, line: &[DVec2]) -> f64 {
    line.windows(2)
        .map(|w| p.distance(closest_point_on_segment(p, w[0], w[1])))
        .fold(f64::INFINITY, f64::min)
}

/// Löst einen Snap an Position `pos` zu Stationierungs-Feedback auf.
///
/// `restrict_fid`: Snap-Filter auf ein bestimmtes Feature (zweiter
/// LoL-Punkt und Griff-Drags bleiben auf derselben Bezugslinie).
fn resolve_snap(
    host: &mut dyn HostPort,
    binding: &ReferenceBinding,
    catalog: &ReferenceCatalog,
    pos: DVec2,
    restrict_fid: Option<i64>,
) -> SnapOutcome {
    let snap = match restrict_fid {
        Some(fid) => host.snap_ref().snap_to_feature(pos, fid),
        None => host.snap_ref().snap_to_layer(pos),
    };
    let Some(snap) = snap else {
        return SnapOutcome::Miss;
    };

    let Some(layer) = host.layer_ref(&binding.layer_id) else {
        return SnapOutcome::Miss;
    };
    let Some(feature) = layer.feature_by_fid(snap.fid) else {
        return SnapOutcome::Miss;
    };
    let Some(ref_id) = feature.key_value(&binding.id_field) else {
        return SnapOutcome::Miss;
    };

    let Some(geometry) = catalog.get(&ref_id) else {
        return SnapOutcome::Miss;
    };
    if geometry.is_multi_part() {
        return SnapOutcome::MultiPart { ref_id };
    }
    let Some(line) = geometry.single() else {
        return SnapOutcome::Miss;
    };

    let Some(ref_point) = display_to_ref(host, catalog.crs(), snap.point) else {
        return SnapOutcome::Miss;
    };
    let Some(located) = locate(line, ref_point) else {
        return SnapOutcome::Miss;
    };

    SnapOutcome::Hit(MeasureFeedback {
        display_point: snap.point,
        ref_point: located.point,
        fid: snap.fid,
        ref_id,
        m: located.m,
    })
}

fn report_multipart_pol(state: &mut EngineState, host: &mut dyn HostPort, ref_id: FieldValue) {
    if state.pol.multipart_reported.insert(ref_id.clone()) {
        host.messages().push(
            MessageLevel::Info,
            &format!("Mehrteilige Bezugsgeometrie {ref_id}: keine Stationierung möglich"),
        );
    }
}

fn report_multipart_lol(state: &mut EngineState, host: &mut dyn HostPort, ref_id: FieldValue) {
    if state.lol.multipart_reported.insert(ref_id.clone()) {
        host.messages().push(
            MessageLevel::Info,
            &format!("Mehrteilige Bezugsgeometrie {ref_id}: keine Stationierung möglich"),
        );
    }
}

// ── Hover ───────────────────────────────────────────────────────────

/// Hover: Snap-Feedback im Mess-Modus; treibt beim LoL-Messen den zweiten
/// Punkt.
pub fn hover(state: &mut EngineState, host: &mut dyn HostPort, tool: ToolKind, pos: DVec2) {
    match tool {
        ToolKind::Pol => hover_pol(state, host, pos),
        ToolKind::Lol => hover_lol(state, host, pos),
    }
}

fn hover_pol(state: &mut EngineState, host: &mut dyn HostPort, pos: DVec2) {
    if state.pol.mode == PolMode::AfterMeasure {
        // Griff-Feedback: offene Hand über dem Mess-Punkt
        let cursor = if pol_handle_grabbed(state, host, pos) {
            CursorShape::OpenHand
        } else {
            CursorShape::Cross
        };
        host.canvas().set_cursor(cursor);
        return;
    }
    if state.pol.mode != PolMode::Measuring {
        return;
    }
    host.canvas().set_cursor(CursorShape::Cross);

    let (Some(binding), Some(catalog)) = (&state.pol.bindings.reference, &state.pol.catalog)
    else {
        return;
    };
    let outcome = resolve_snap(host, binding, catalog, pos, None);

    match outcome {
        SnapOutcome::Hit(feedback) => {
            state.pol.hover = Some(feedback);
            host.canvas().request_repaint();
        }
        SnapOutcome::MultiPart { ref_id } => {
            state.pol.hover = None;
            report_multipart_pol(state, host, ref_id);
        }
        SnapOutcome::Miss => {
            state.pol.hover = None;
        }
    }
}

fn hover_lol(state: &mut EngineState, host: &mut dyn HostPort, pos: DVec2) {
    match state.lol.mode {
        LolMode::AfterMeasure => {
            // Griff-Feedback: offene Hand über Endpunkten und Segment
            let cursor = if lol_hit_target(state, host, pos).is_some() {
                CursorShape::OpenHand
            } else {
                CursorShape::Cross
            };
            host.canvas().set_cursor(cursor);
        }
        LolMode::BeforeMeasure => {
            host.canvas().set_cursor(CursorShape::Cross);
            let (Some(binding), Some(catalog)) =
                (&state.lol.bindings.reference, &state.lol.catalog)
            else {
                return;
            };
            let outcome = resolve_snap(host, binding, catalog, pos, None);
            match outcome {
                SnapOutcome::Hit(feedback) => {
                    state.lol.hover = Some(feedback);
                    host.canvas().request_repaint();
                }
                SnapOutcome::MultiPart { ref_id } => {
                    state.lol.hover = None;
                    report_multipart_lol(state, host, ref_id);
                }
                SnapOutcome::Miss => {
                    state.lol.hover = None;
                }
            }
        }
        LolMode::Measuring => {
            // Zweiter Punkt: Snap auf dasselbe Linien-Feature beschränkt
            let Some(measure) = state.lol.measure.clone() else {
                return;
            };
            let (Some(binding), Some(catalog)) =
                (&state.lol.bindings.reference, &state.lol.catalog)
            else {
                return;
            };
            let outcome =
                resolve_snap(host, binding, catalog, pos, Some(measure.fid));
            if let SnapOutcome::Hit(feedback) = outcome {
                if let Some(measure) = &mut state.lol.measure {
                    measure.m_to = feedback.m;
                }
                state.lol.hover = Some(feedback);
                host.canvas().request_repaint();
            }
        }
        _ => {}
    }
}

// ── Klick ───────────────────────────────────────────────────────────

/// Klick im Mess-Modus: fixiert den Snap.
pub fn click_measure(state: &mut EngineState, host: &mut dyn HostPort, tool: ToolKind, pos: DVec2) {
    match tool {
        ToolKind::Pol => click_measure_pol(state, host, pos),
        ToolKind::Lol => click_measure_lol(state, host, pos),
    }
}

fn click_measure_pol(state: &mut EngineState, host: &mut dyn HostPort, pos: DVec2) {
    if state.pol.mode != PolMode::Measuring {
        return;
    }
    let (Some(binding), Some(catalog)) = (&state.pol.bindings.reference, &state.pol.catalog)
    else {
        return;
    };
    let outcome = resolve_snap(host, binding, catalog, pos, None);

    match outcome {
        SnapOutcome::Hit(feedback) => {
            state.pol.lock_measure(PolMeasure {
                ref_id: feedback.ref_id.clone(),
                fid: feedback.fid,
                m: feedback.m,
            });
            state.pol.hover = Some(feedback);
            host.canvas().request_repaint();
        }
        SnapOutcome::MultiPart { ref_id } => report_multipart_pol(state, host, ref_id),
        SnapOutcome::Miss => {}
    }
}

fn click_measure_lol(state: &mut EngineState, host: &mut dyn HostPort, pos: DVec2) {
    if state.lol.mode != LolMode::BeforeMeasure {
        return;
    }
    let (Some(binding), Some(catalog)) = (&state.lol.bindings.reference, &state.lol.catalog)
    else {
        return;
    };
    let outcome = resolve_snap(host, binding, catalog, pos, None);

    match outcome {
        SnapOutcome::Hit(feedback) => {
            state
                .lol
                .lock_first_point(feedback.ref_id.clone(), feedback.fid, feedback.m);
            state.lol.hover = Some(feedback);
            host.canvas().request_repaint();
        }
        SnapOutcome::MultiPart { ref_id } => report_multipart_lol(state, host, ref_id),
        SnapOutcome::Miss => {}
    }
}

// ── Griff-Drags ─────────────────────────────────────────────────────

/// Press in `AfterMeasure`: packt einen Griff oder beginnt die Messung neu.
pub fn press_after_measure(
    state: &mut EngineState,
    host: &mut dyn HostPort,
    tool: ToolKind,
    pos: DVec2,
) {
    match tool {
        ToolKind::Pol => press_after_measure_pol(state, host, pos),
        ToolKind::Lol => press_after_measure_lol(state, host, pos),
    }
}

/// Liegt `pos` auf dem Griff des fixierten PoL-Mess-Punkts?
fn pol_handle_grabbed(state: &EngineState, host: &mut dyn HostPort, pos: DVec2) -> bool {
    let Some(measure) = &state.pol.measure else {
        return false;
    };
    let handle = state.pol.catalog.as_ref().and_then(|catalog| {
        let line = catalog.single_line(&measure.ref_id)?;
        let point = interpolate(line, measure.m)?;
        Some((catalog.crs().clone(), point))
    });

    let tolerance = state.pol.style.handle_tolerance_px;
    handle
        .and_then(|(crs, point)| ref_to_display(host, &crs, point))
        .is_some_and(|handle_pos| pos.distance(handle_pos) <= tolerance)
}

/// Welcher LoL-Griff liegt unter `pos`? Liefert Ziel plus Grab-Stationierung.
fn lol_hit_target(
    state: &EngineState,
    host: &mut dyn HostPort,
    pos: DVec2,
) -> Option<(LolDragTarget, f64)> {
    let measure = state.lol.measure.as_ref()?;
    let catalog = state.lol.catalog.as_ref()?;
    let line = catalog.single_line(&measure.ref_id)?.to_vec();
    let crs = catalog.crs().clone();
    let tolerance = state.lol.style.handle_tolerance_px;

    let from_handle = interpolate(&line, measure.m_from)
        .and_then(|p| ref_to_display(host, &crs, p))
        .is_some_and(|h| pos.distance(h) <= tolerance);
    if from_handle {
        return Some((LolDragTarget::FromPoint, measure.m_from));
    }
    let to_handle = interpolate(&line, measure.m_to)
        .and_then(|p| ref_to_display(host, &crs, p))
        .is_some_and(|h| pos.distance(h) <= tolerance);
    if to_handle {
        return Some((LolDragTarget::ToPoint, measure.m_to));
    }

    // Segment-Körper: Abstand zur (versetzten) Segment-Geometrie prüfen
    let on_segment = segment_geom(&line, measure.m_from, measure.m_to, measure.offset)
        .and_then(|seg| {
            let display_crs = host.canvas().display_crs();
            host.projection()
                .transform_line(&seg, &crs, &display_crs)
                .ok()
        })
        .is_some_and(|seg_display| polyline_distance(pos, &seg_display) <= tolerance);
    if on_segment {
        let grab_m = display_to_ref(host, &crs, pos)
            .and_then(|ref_pos| locate(&line, ref_pos))
            .map(|l| l.m)
            .unwrap_or(measure.m_from);
        return Some((LolDragTarget::Segment, grab_m));
    }
    None
}

fn press_after_measure_pol(state: &mut EngineState, host: &mut dyn HostPort, pos: DVec2) {
    if state.pol.measure.is_none() {
        return;
    }

    if pol_handle_grabbed(state, host, pos) {
        state.pol.mode = PolMode::BeforeMovePoint;
        host.canvas().set_cursor(CursorShape::ClosedHand);
    } else {
        state.pol.back_to_measuring();
        host.canvas().set_cursor(CursorShape::Cross);
    }
    host.canvas().request_repaint();
}

fn press_after_measure_lol(state: &mut EngineState, host: &mut dyn HostPort, pos: DVec2) {
    if state.lol.measure.is_none() {
        return;
    }

    match lol_hit_target(state, host, pos) {
        Some((target, grab_m)) => {
            lol_drag::begin_drag(&mut state.lol, target, grab_m);
            host.canvas().set_cursor(CursorShape::ClosedHand);
        }
        None => {
            state.lol.back_to_measuring();
            host.canvas().set_cursor(CursorShape::Cross);
        }
    }
    host.canvas().request_repaint();
}

/// Aktualisiert einen laufenden Griff-Drag.
///
/// Der Fußpunkt folgt `locate(line, cursor)`; Stationierungen verlassen
/// `[0, Länge]` nie.
pub fn update_drag(
    state: &mut EngineState,
    host: &mut dyn HostPort,
    tool: ToolKind,
    pos: DVec2,
    modifiers: KeyModifiers,
) {
    match tool {
        ToolKind::Pol => update_drag_pol(state, host, pos),
        ToolKind::Lol => update_drag_lol(state, host, pos, modifiers),
    }
}

fn update_drag_pol(state: &mut EngineState, host: &mut dyn HostPort, pos: DVec2) {
    if !matches!(state.pol.mode, PolMode::BeforeMovePoint | PolMode::MovePoint) {
        return;
    }
    let Some(measure) = state.pol.measure.clone() else {
        return;
    };
    let located = state.pol.catalog.as_ref().and_then(|catalog| {
        let line = catalog.single_line(&measure.ref_id)?;
        let ref_point = display_to_ref(host, catalog.crs(), pos)?;
        locate(line, ref_point)
    });

    if let Some(located) = located {
        if let Some(measure) = &mut state.pol.measure {
            measure.m = located.m;
        }
        state.pol.mode = PolMode::MovePoint;
        host.canvas().set_cursor(CursorShape::ClosedHand);
        host.canvas().request_repaint();
    }
}

fn update_drag_lol(
    state: &mut EngineState,
    host: &mut dyn HostPort,
    pos: DVec2,
    modifiers: KeyModifiers,
) {
    let dragging = matches!(
        state.lol.mode,
        LolMode::BeforeMoveFromPoint
            | LolMode::MoveFromPoint
            | LolMode::BeforeMoveToPoint
            | LolMode::MoveToPoint
            | LolMode::BeforeMoveSegment
            | LolMode::MoveSegment
            | LolMode::Measuring
    );
    if !dragging {
        return;
    }
    let Some(measure) = state.lol.measure.clone() else {
        return;
    };

    if state.lol.mode == LolMode::Measuring {
        // Mess-Drag: Cursor treibt den zweiten Punkt (gleiches Feature)
        hover_lol(state, host, pos);
        return;
    }

    let length = state.lol.length_of(&measure.ref_id);
    let located = state.lol.catalog.as_ref().and_then(|catalog| {
        let line = catalog.single_line(&measure.ref_id)?;
        let ref_point = display_to_ref(host, catalog.crs(), pos)?;
        locate(line, ref_point)
    });

    if let Some(located) = located {
        lol_drag::update_drag(&mut state.lol, &located, modifiers, length);
        host.canvas().set_cursor(CursorShape::ClosedHand);
        host.canvas().request_repaint();
    }
}

/// Beendet einen Griff-Drag (`Move*` → `AfterMeasure`).
pub fn end_drag(state: &mut EngineState, host: &mut dyn HostPort, tool: ToolKind) {
    match tool {
        ToolKind::Pol => {
            if matches!(state.pol.mode, PolMode::BeforeMovePoint | PolMode::MovePoint)
                && state.pol.measure.is_some()
            {
                state.pol.mode = PolMode::AfterMeasure;
            }
        }
        ToolKind::Lol => {
            lol_drag::end_drag(&mut state.lol);
        }
    }
    host.canvas().set_cursor(CursorShape::Cross);
    host.canvas().request_repaint();
}

/// LoL: Release im Mess-Modus fixiert den zweiten Punkt.
pub fn end_measure(state: &mut EngineState, host: &mut dyn HostPort, tool: ToolKind) {
    if tool == ToolKind::Lol && state.lol.mode == LolMode::Measuring {
        state.lol.commit_measure();
        host.canvas().request_repaint();
    }
}

/// Messung verwerfen und neu beginnen.
pub fn resume(state: &mut EngineState, host: &mut dyn HostPort, tool: ToolKind) {
    match tool {
        ToolKind::Pol => {
            if state.pol.mode != PolMode::Disabled {
                state.pol.back_to_measuring();
            }
        }
        ToolKind::Lol => {
            if state.lol.mode != LolMode::Disabled {
                state.lol.back_to_measuring();
            }
        }
    }
    host.canvas().set_cursor(CursorShape::Cross);
    host.canvas().request_repaint();
}
