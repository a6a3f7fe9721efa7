//! Use-Cases der Arbeits-Selektion: Rechteck-Selektion auf den abgeleiteten
//! Show-Geometrien und Validierung der Selektions-Menge.

use glam::DVec2;
use indexmap::IndexSet;

use crate::app::state::EngineState;
use crate::app::tools::{LolMode, PolMode, ToolKind};
use crate::core::records::FieldValue;
use crate::core::show::{derive_lol_raw, derive_pol_raw, ShowGeometry};
use crate::core::validate::{validate_lol, validate_pol};
use crate::host::canvas::{CursorShape, KeyModifiers};
use crate::host::messages::MessageLevel;
use crate::host::HostPort;

use super::rows;

/// Schaltet den Rechteck-Selektions-Modus ein oder aus.
pub fn set_select_mode(
    state: &mut EngineState,
    host: &mut dyn HostPort,
    tool: ToolKind,
    active: bool,
) {
    match tool {
        ToolKind::Pol => {
            if active {
                if state.pol.mode != PolMode::Disabled {
                    state.pol.mode = PolMode::SelectFeatures;
                    state.pol.rect_anchor = None;
                    host.canvas().set_cursor(CursorShape::Arrow);
                }
            } else if state.pol.mode == PolMode::SelectFeatures {
                state.pol.mode = if state.pol.measure.is_some() {
                    PolMode::AfterMeasure
                } else {
                    PolMode::Measuring
                };
                host.canvas().set_cursor(CursorShape::Cross);
            }
        }
        ToolKind::Lol => {
            if active {
                if state.lol.mode != LolMode::Disabled {
                    state.lol.mode = LolMode::SelectFeatures;
                    state.lol.rect_anchor = None;
                    host.canvas().set_cursor(CursorShape::Arrow);
                }
            } else if state.lol.mode == LolMode::SelectFeatures {
                state.lol.mode = if state.lol.measure.is_some() {
                    LolMode::AfterMeasure
                } else {
                    LolMode::BeforeMeasure
                };
                host.canvas().set_cursor(CursorShape::Cross);
            }
        }
    }
}

/// Merkt den ersten Eckpunkt der Rechteck-Selektion.
pub fn set_rect_anchor(state: &mut EngineState, tool: ToolKind, pos: DVec2) {
    match tool {
        ToolKind::Pol => state.pol.rect_anchor = Some(pos),
        ToolKind::Lol => state.lol.rect_anchor = Some(pos),
    }
}

fn point_in_rect(p: DVec2, min: DVec2, max: DVec2) -> bool {
    p.x >= min.x && p.x <= max.x && p.y >= min.y && p.y <= max.y
}

fn geometry_in_rect(geometry: &ShowGeometry, min: DVec2, max: DVec2) -> bool {
    match geometry {
        ShowGeometry::Point(p) => point_in_rect(*p, min, max),
        ShowGeometry::Line(line) => line.iter().any(|p| point_in_rect(*p, min, max)),
    }
}

/// Wendet die Host-Konvention der Modifikatoren an: Shift ergänzt, Ctrl
/// entfernt, ohne Modifikator wird ersetzt.
fn apply_selection(
    selection: &mut IndexSet<FieldValue>,
    hits: Vec<FieldValue>,
    modifiers: KeyModifiers,
) {
    if modifiers.shift {
        selection.extend(hits);
    } else if modifiers.ctrl {
        for pk in &hits {
            selection.shift_remove(pk);
        }
    } else {
        selection.clear();
        selection.extend(hits);
    }
}

/// Schließt die Rechteck-Selektion ab: Show-Features im Rechteck bestimmen
/// die Arbeits-Selektion über ihre Rückverweise.
pub fn select_in_rect(
    state: &mut EngineState,
    host: &mut dyn HostPort,
    tool: ToolKind,
    min: DVec2,
    max: DVec2,
    modifiers: KeyModifiers,
) {
    match tool {
        ToolKind::Pol => select_in_rect_pol(state, host, min, max, modifiers),
        ToolKind::Lol => select_in_rect_lol(state, host, min, max, modifiers),
    }
    host.canvas().request_repaint();
}

fn select_in_rect_pol(
    state: &mut EngineState,
    host: &mut dyn HostPort,
    min: DVec2,
    max: DVec2,
    modifiers: KeyModifiers,
) {
    state.pol.rect_anchor = None;
    let (Some(binding), Some(catalog)) = (&state.pol.bindings.data, &state.pol.catalog) else {
        return;
    };
    let Some(layer) = host.layer_ref(&binding.layer_id) else {
        return;
    };

    let ref_crs = catalog.crs().clone();
    let display_crs = host.display_crs();
    let projection = host.projection();

    let mut hits = Vec::new();
    for (_, row) in rows::read_pol_rows(layer, binding) {
        let Some(feature) = derive_pol_raw(&row, catalog) else {
            continue;
        };
        let ShowGeometry::Point(p) = feature.geometry else {
            continue;
        };
        let Ok(display_point) = projection.transform_point(p, &ref_crs, &display_crs) else {
            continue;
        };
        if point_in_rect(display_point, min, max) {
            hits.push(feature.back_ref);
        }
    }

    apply_selection(&mut state.pol.selection, hits, modifiers);
    let dropped = validate_pol_selection(state, host);
    report_dropped(host, dropped);
}

fn select_in_rect_lol(
    state: &mut EngineState,
    host: &mut dyn HostPort,
    min: DVec2,
    max: DVec2,
    modifiers: KeyModifiers,
) {
    state.lol.rect_anchor = None;
    let (Some(binding), Some(catalog)) = (&state.lol.bindings.data, &state.lol.catalog) else {
        return;
    };
    let Some(layer) = host.layer_ref(&binding.layer_id) else {
        return;
    };

    let ref_crs = catalog.crs().clone();
    let display_crs = host.display_crs();
    let projection = host.projection();

    let mut hits = Vec::new();
    for (_, row) in rows::read_lol_rows(layer, binding) {
        let Some(feature) = derive_lol_raw(&row, catalog) else {
            continue;
        };
        let Ok(display_geom) = (match &feature.geometry {
            ShowGeometry::Point(p) => projection
                .transform_point(*p, &ref_crs, &display_crs)
                .map(ShowGeometry::Point),
            ShowGeometry::Line(line) => projection
                .transform_line(line, &ref_crs, &display_crs)
                .map(ShowGeometry::Line),
        }) else {
            continue;
        };
        if geometry_in_rect(&display_geom, min, max) {
            hits.push(feature.back_ref);
        }
    }

    apply_selection(&mut state.lol.selection, hits, modifiers);
    let dropped = validate_lol_selection(state, host);
    report_dropped(host, dropped);
}

fn report_dropped(host: &mut dyn HostPort, dropped: usize) {
    if dropped > 0 {
        host.messages().push(
            MessageLevel::Info,
            &format!("{dropped} ungültige Einträge aus der Arbeits-Selektion entfernt"),
        );
    }
}

/// Leert die Arbeits-Selektion.
pub fn clear(state: &mut EngineState, host: &mut dyn HostPort, tool: ToolKind) {
    match tool {
        ToolKind::Pol => state.pol.selection.clear(),
        ToolKind::Lol => state.lol.selection.clear(),
    }
    host.canvas().request_repaint();
}

/// Validiert die PoL-Arbeits-Selektion; ungültige pk-Werte werden still
/// entfernt. Liefert die Anzahl entfernter Einträge.
pub fn validate_pol_selection(state: &mut EngineState, host: &mut dyn HostPort) -> usize {
    let (Some(binding), Some(catalog)) = (&state.pol.bindings.data, &state.pol.catalog) else {
        return 0;
    };
    let Some(layer) = host.layer_ref(&binding.layer_id) else {
        return 0;
    };

    let before = state.pol.selection.len();
    let mut keep: IndexSet<FieldValue> = IndexSet::new();
    for pk in state.pol.selection.iter() {
        let valid = rows::find_pol_row(layer, binding, pk)
            .map(|(_, row)| validate_pol(&row, catalog).keeps_selection())
            .unwrap_or(false);
        if valid {
            keep.insert(pk.clone());
        }
    }
    state.pol.selection = keep;
    before - state.pol.selection.len()
}

/// Validiert die LoL-Arbeits-Selektion; ungültige pk-Werte werden still
/// entfernt. Liefert die Anzahl entfernter Einträge.
pub fn validate_lol_selection(state: &mut EngineState, host: &mut dyn HostPort) -> usize {
    let (Some(binding), Some(catalog)) = (&state.lol.bindings.data, &state.lol.catalog) else {
        return 0;
    };
    let Some(layer) = host.layer_ref(&binding.layer_id) else {
        return 0;
    };

    let before = state.lol.selection.len();
    let mut keep: IndexSet<FieldValue> = IndexSet::new();
    for pk in state.lol.selection.iter() {
        let valid = rows::find_lol_row(layer, binding, pk)
            .map(|(_, row)| validate_lol(&row, catalog).keeps_selection())
            .unwrap_or(false);
        if valid {
            keep.insert(pk.clone());
        }
    }
    state.lol.selection = keep;
    before - state.lol.selection.len()
}
