//! Vollständiger Einstellungs-Check eines Werkzeugs.
//!
//! Läuft nach jedem Layer-Signal und jeder (Re-)Bindung: validiert die
//! Bindungen (Existenz plus Typklassen-Regel), baut den Bezugslinien-Katalog
//! neu auf, konfiguriert das Host-Snapping, ersetzt die Signal-Abos und
//! revalidiert Arbeits-Selektion, Messung und Modus.

use crate::app::state::EngineState;
use crate::app::tools::{LolMode, PolMode, ToolKind};
use crate::core::error::EngineError;
use crate::core::records::{types_compatible, FieldType, FieldValue};
use crate::core::reference::ReferenceCatalog;
use crate::host::messages::MessageLevel;
use crate::host::vector_layer::VectorLayerPort;
use crate::host::HostPort;

use super::selection;

/// Führt den Einstellungs-Check aus.
///
/// `quiet`: beim Wiederherstellen einer Konfiguration werden fehlende oder
/// inkompatible Bindungen still verworfen.
pub fn check_settings(state: &mut EngineState, host: &mut dyn HostPort, tool: ToolKind, quiet: bool) {
    match tool {
        ToolKind::Pol => check_settings_pol(state, host, quiet),
        ToolKind::Lol => check_settings_lol(state, host, quiet),
    }
}

fn field_type_of(layer: &dyn VectorLayerPort, field: &str) -> Option<FieldType> {
    layer
        .fields()
        .iter()
        .find(|f| f.name == field)
        .map(|f| f.field_type)
}

fn emit_warnings(host: &mut dyn HostPort, warnings: &[String], quiet: bool) {
    for warning in warnings {
        log::warn!("{warning}");
        if !quiet {
            host.messages().push(
                MessageLevel::Warning,
                &format!("Konfiguration unvollständig: {warning}"),
            );
        }
    }
}

fn report_dropped_selection(host: &mut dyn HostPort, dropped: usize) {
    if dropped > 0 {
        host.messages().push(
            MessageLevel::Info,
            &format!("{dropped} ungültige Einträge aus der Arbeits-Selektion entfernt"),
        );
    }
}

fn check_settings_pol(state: &mut EngineState, host: &mut dyn HostPort, quiet: bool) {
    let mut warnings: Vec<String> = Vec::new();

    // Bindungen: Existenz und Typklassen-Regel
    let mut id_type = None;
    if let Some(r) = state.pol.bindings.reference.clone() {
        match host.layer_ref(&r.layer_id) {
            None => {
                warnings.push(format!("Bezugslinien-Layer '{}' nicht vorhanden", r.layer_id));
                state.pol.bindings.reference = None;
            }
            Some(layer) => match field_type_of(layer, &r.id_field) {
                None => {
                    warnings.push(format!("Identitäts-Feld '{}' nicht vorhanden", r.id_field));
                    state.pol.bindings.reference = None;
                }
                Some(t) => id_type = Some(t),
            },
        }
    }

    let mut pk_type = None;
    if let Some(d) = state.pol.bindings.data.clone() {
        let ok = match host.layer_ref(&d.layer_id) {
            None => {
                warnings.push(format!("Daten-Layer '{}' nicht vorhanden", d.layer_id));
                false
            }
            Some(layer) => {
                let pk_t = field_type_of(layer, &d.pk_field);
                let ref_t = field_type_of(layer, &d.ref_field);
                let m_t = field_type_of(layer, &d.m_field);
                if pk_t.is_none() || ref_t.is_none() || m_t.is_none() {
                    warnings.push(format!("Daten-Layer '{}': Feld fehlt", d.layer_id));
                    false
                } else if let (Some(ref_t), Some(id_t)) = (ref_t, id_type) {
                    if types_compatible(ref_t, id_t) {
                        pk_type = pk_t;
                        true
                    } else {
                        warnings.push(
                            EngineError::TypeMismatch {
                                left: d.ref_field.clone(),
                                right: String::from("Identitäts-Feld"),
                            }
                            .to_string(),
                        );
                        false
                    }
                } else {
                    pk_type = pk_t;
                    true
                }
            }
        };
        if !ok {
            state.pol.bindings.data = None;
        }
    }

    if let Some(s) = state.pol.bindings.show.clone() {
        let ok = match host.layer_ref(&s.layer_id) {
            None => {
                warnings.push(format!("Show-Layer '{}' nicht vorhanden", s.layer_id));
                false
            }
            Some(layer) => match (field_type_of(layer, &s.back_ref_field), pk_type) {
                (None, _) => {
                    warnings.push(format!(
                        "Rückverweis-Feld '{}' nicht vorhanden",
                        s.back_ref_field
                    ));
                    false
                }
                (Some(b), Some(p)) if !types_compatible(b, p) => {
                    warnings.push(
                        EngineError::TypeMismatch {
                            left: s.back_ref_field.clone(),
                            right: String::from("pk"),
                        }
                        .to_string(),
                    );
                    false
                }
                _ => true,
            },
        };
        if !ok {
            state.pol.bindings.show = None;
        }
    }

    emit_warnings(host, &warnings, quiet);

    // Katalog, Snapping, Abos
    if let Some(r) = state.pol.bindings.reference.clone() {
        let catalog = host.layer_ref(&r.layer_id).map(|layer| {
            let mut catalog = ReferenceCatalog::new(layer.crs());
            for feature in layer.features() {
                let Some(ref_id) = feature.key_value(&r.id_field) else {
                    continue;
                };
                let Some(geometry) = feature.geometry else {
                    continue;
                };
                catalog.insert(ref_id, geometry);
            }
            catalog
        });

        if let Some(catalog) = catalog {
            let multi: Vec<FieldValue> = catalog
                .iter()
                .filter(|(_, g)| g.is_multi_part())
                .map(|(id, _)| id.clone())
                .collect();
            for ref_id in multi {
                if state.pol.multipart_reported.insert(ref_id.clone()) {
                    host.messages().push(
                        MessageLevel::Info,
                        &format!(
                            "Mehrteilige Bezugsgeometrie {ref_id}: keine Stationierung möglich"
                        ),
                    );
                }
            }
            state.pol.catalog = Some(catalog);
        }

        host.snap().configure_for_reference_layer(&r.layer_id);

        let hub = host.event_hub();
        let mut subscriptions = vec![hub.subscribe(&r.layer_id)];
        if let Some(d) = &state.pol.bindings.data {
            subscriptions.push(hub.subscribe(&d.layer_id));
        }
        if let Some(s) = &state.pol.bindings.show {
            subscriptions.push(hub.subscribe(&s.layer_id));
        }
        state.pol.subscriptions = subscriptions;
    } else {
        state.pol.catalog = None;
        state.pol.subscriptions.clear();
    }

    // Arbeits-Selektion revalidieren
    let dropped = selection::validate_pol_selection(state, host);
    report_dropped_selection(host, dropped);

    // Messung und Modus
    if !state.pol.bindings.can_measure() {
        state.pol.mode = PolMode::Disabled;
        state.pol.measure = None;
        state.pol.hover = None;
        return;
    }
    let resolves = state.pol.measure.as_ref().is_some_and(|m| {
        state
            .pol
            .catalog
            .as_ref()
            .is_some_and(|c| c.single_line(&m.ref_id).is_some())
    });
    if !resolves {
        state.pol.measure = None;
    }
    match state.pol.mode {
        PolMode::Disabled => state.pol.mode = PolMode::Measuring,
        PolMode::AfterMeasure | PolMode::BeforeMovePoint | PolMode::MovePoint
            if state.pol.measure.is_none() =>
        {
            state.pol.mode = PolMode::Measuring;
        }
        _ => {}
    }
}

fn check_settings_lol(state: &mut EngineState, host: &mut dyn HostPort, quiet: bool) {
    let mut warnings: Vec<String> = Vec::new();

    let mut id_type = None;
    if let Some(r) = state.lol.bindings.reference.clone() {
        match host.layer_ref(&r.layer_id) {
            None => {
                warnings.push(format!("Bezugslinien-Layer '{}' nicht vorhanden", r.layer_id));
                state.lol.bindings.reference = None;
            }
            Some(layer) => match field_type_of(layer, &r.id_field) {
                None => {
                    warnings.push(format!("Identitäts-Feld '{}' nicht vorhanden", r.id_field));
                    state.lol.bindings.reference = None;
                }
                Some(t) => id_type = Some(t),
            },
        }
    }

    let mut pk_type = None;
    if let Some(d) = state.lol.bindings.data.clone() {
        let ok = match host.layer_ref(&d.layer_id) {
            None => {
                warnings.push(format!("Daten-Layer '{}' nicht vorhanden", d.layer_id));
                false
            }
            Some(layer) => {
                let pk_t = field_type_of(layer, &d.pk_field);
                let ref_t = field_type_of(layer, &d.ref_field);
                let measures_ok = field_type_of(layer, &d.m_from_field).is_some()
                    && field_type_of(layer, &d.m_to_field).is_some()
                    && field_type_of(layer, &d.offset_field).is_some();
                if pk_t.is_none() || ref_t.is_none() || !measures_ok {
                    warnings.push(format!("Daten-Layer '{}': Feld fehlt", d.layer_id));
                    false
                } else if let (Some(ref_t), Some(id_t)) = (ref_t, id_type) {
                    if types_compatible(ref_t, id_t) {
                        pk_type = pk_t;
                        true
                    } else {
                        warnings.push(
                            EngineError::TypeMismatch {
                                left: d.ref_field.clone(),
                                right: String::from("Identitäts-Feld"),
                            }
                            .to_string(),
                        );
                        false
                    }
                } else {
                    pk_type = pk_t;
                    true
                }
            }
        };
        if !ok {
            state.lol.bindings.data = None;
        }
    }

    if let Some(s) = state.lol.bindings.show.clone() {
        let ok = match host.layer_ref(&s.layer_id) {
            None => {
                warnings.push(format!("Show-Layer '{}' nicht vorhanden", s.layer_id));
                false
            }
            Some(layer) => match (field_type_of(layer, &s.back_ref_field), pk_type) {
                (None, _) => {
                    warnings.push(format!(
                        "Rückverweis-Feld '{}' nicht vorhanden",
                        s.back_ref_field
                    ));
                    false
                }
                (Some(b), Some(p)) if !types_compatible(b, p) => {
                    warnings.push(
                        EngineError::TypeMismatch {
                            left: s.back_ref_field.clone(),
                            right: String::from("pk"),
                        }
                        .to_string(),
                    );
                    false
                }
                _ => true,
            },
        };
        if !ok {
            state.lol.bindings.show = None;
        }
    }

    emit_warnings(host, &warnings, quiet);

    if let Some(r) = state.lol.bindings.reference.clone() {
        let catalog = host.layer_ref(&r.layer_id).map(|layer| {
            let mut catalog = ReferenceCatalog::new(layer.crs());
            for feature in layer.features() {
                let Some(ref_id) = feature.key_value(&r.id_field) else {
                    continue;
                };
                let Some(geometry) = feature.geometry else {
                    continue;
                };
                catalog.insert(ref_id, geometry);
            }
            catalog
        });

        if let Some(catalog) = catalog {
            let multi: Vec<FieldValue> = catalog
                .iter()
                .filter(|(_, g)| g.is_multi_part())
                .map(|(id, _)| id.clone())
                .collect();
            for ref_id in multi {
                if state.lol.multipart_reported.insert(ref_id.clone()) {
                    host.messages().push(
                        MessageLevel::Info,
                        &format!(
                            "Mehrteilige Bezugsgeometrie {ref_id}: keine Stationierung möglich"
                        ),
                    );
                }
            }
            state.lol.catalog = Some(catalog);
        }

        host.snap().configure_for_reference_layer(&r.layer_id);

        let hub = host.event_hub();
        let mut subscriptions = vec![hub.subscribe(&r.layer_id)];
        if let Some(d) = &state.lol.bindings.data {
            subscriptions.push(hub.subscribe(&d.layer_id));
        }
        if let Some(s) = &state.lol.bindings.show {
            subscriptions.push(hub.subscribe(&s.layer_id));
        }
        state.lol.subscriptions = subscriptions;
    } else {
        state.lol.catalog = None;
        state.lol.subscriptions.clear();
    }

    let dropped = selection::validate_lol_selection(state, host);
    report_dropped_selection(host, dropped);

    if !state.lol.bindings.can_measure() {
        state.lol.mode = LolMode::Disabled;
        state.lol.measure = None;
        state.lol.hover = None;
        return;
    }
    let resolves = state.lol.measure.as_ref().is_some_and(|m| {
        state
            .lol
            .catalog
            .as_ref()
            .is_some_and(|c| c.single_line(&m.ref_id).is_some())
    });
    if !resolves {
        state.lol.measure = None;
    }
    match state.lol.mode {
        LolMode::Disabled => state.lol.mode = LolMode::BeforeMeasure,
        LolMode::Measuring
        | LolMode::AfterMeasure
        | LolMode::BeforeMoveFromPoint
        | LolMode::MoveFromPoint
        | LolMode::BeforeMoveToPoint
        | LolMode::MoveToPoint
        | LolMode::BeforeMoveSegment
        | LolMode::MoveSegment
            if state.lol.measure.is_none() =>
        {
            state.lol.mode = LolMode::BeforeMeasure;
        }
        _ => {}
    }
}
