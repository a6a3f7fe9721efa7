//! Einfügen neuer Datensätze (drei Phasen: Pre-Check, Transaktion,
//! Post-Effekte).

use crate::app::state::EngineState;
use crate::app::tools::{LolMode, PolMode, ToolKind};
use crate::core::records::{AttrValue, FieldType};
use crate::host::messages::MessageLevel;
use crate::host::vector_layer::Feature;
use crate::host::HostPort;

use super::super::rows;
use super::common::{resolve_pending_edits, rollback_and_report, warn_incomplete, PendingOutcome};

/// Fügt einen Datensatz aus der aktuellen Messung ein.
pub fn insert(state: &mut EngineState, host: &mut dyn HostPort, tool: ToolKind) {
    match tool {
        ToolKind::Pol => insert_pol(state, host),
        ToolKind::Lol => insert_lol(state, host),
    }
}

fn pk_field_type(host: &dyn HostPort, layer_id: &str, pk_field: &str) -> Option<FieldType> {
    host.layer_ref(layer_id)?
        .fields()
        .iter()
        .find(|f| f.name == pk_field)
        .map(|f| f.field_type)
}

fn insert_pol(state: &mut EngineState, host: &mut dyn HostPort) {
    // Pre-Check
    if state.pol.mode != PolMode::AfterMeasure {
        warn_incomplete(host, "keine fixierte Messung");
        return;
    }
    let Some(measure) = state.pol.measure.clone() else {
        warn_incomplete(host, "keine fixierte Messung");
        return;
    };
    let Some(binding) = state.pol.bindings.data.clone() else {
        warn_incomplete(host, "kein Daten-Layer gebunden");
        return;
    };
    let Some(length) = state
        .pol
        .catalog
        .as_ref()
        .filter(|c| c.single_line(&measure.ref_id).is_some())
        .map(|c| c.length_of(&measure.ref_id))
    else {
        host.messages().push(
            MessageLevel::Warning,
            &format!("Bezugslinie nicht gefunden: ref_id {}", measure.ref_id),
        );
        return;
    };
    // Klemmen mit Meldung (Speichern-Pfad)
    let (m, clamped) = crate::core::validate::clamp_measure(measure.m, length);
    if clamped {
        host.messages().push(
            MessageLevel::Info,
            &format!("Stationierung auf [0, {length}] geklemmt"),
        );
    }
    let Some(layer) = host.layer_ref(&binding.layer_id) else {
        warn_incomplete(host, "Daten-Layer nicht mehr vorhanden");
        return;
    };
    if !layer.capabilities().can_add {
        host.messages().push(
            MessageLevel::Warning,
            "Provider erlaubt kein Hinzufügen von Datensätzen",
        );
        return;
    }
    let pk_type = pk_field_type(host, &binding.layer_id, &binding.pk_field)
        .unwrap_or(FieldType::Int64);
    if resolve_pending_edits(host, &binding.layer_id) == PendingOutcome::Abort {
        return;
    }

    // Transaktion
    let (feature, pk) = {
        let Some(layer) = host.layer(&binding.layer_id) else {
            return;
        };
        if let Err(e) = layer.start_edit() {
            rollback_and_report(host, &binding.layer_id, &e);
            return;
        }
        let layer = match host.layer(&binding.layer_id) {
            Some(layer) => layer,
            None => return,
        };
        let pk = rows::next_pk(&*layer, &binding.pk_field, pk_type);
        let mut feature = Feature::new(0)
            .with_attr(&binding.pk_field, Some(rows::key_to_attr(&pk)))
            .with_attr(&binding.ref_field, Some(rows::key_to_attr(&measure.ref_id)))
            .with_attr(&binding.m_field, Some(AttrValue::Real(m)));
        match layer.add_feature(feature.clone()) {
            Ok(fid) => feature.fid = fid,
            Err(e) => {
                rollback_and_report(host, &binding.layer_id, &e);
                return;
            }
        }
        (feature, pk)
    };

    let confirmed = host.form().open_feature_form(&binding.layer_id, &feature);
    if !confirmed {
        if let Some(layer) = host.layer(&binding.layer_id) {
            let _ = layer.rollback();
        }
        host.messages()
            .push(MessageLevel::Info, "Einfügen abgebrochen");
        return;
    }
    let commit = match host.layer(&binding.layer_id) {
        Some(layer) => layer.commit(),
        None => return,
    };
    if let Err(e) = commit {
        rollback_and_report(host, &binding.layer_id, &e);
        return;
    }

    // Post-Effekte
    log::info!("Datensatz {pk} eingefügt (m = {m})");
    state.pol.selection.insert(pk.clone());
    state.pol.edit_pk = Some(pk);
    host.canvas().request_repaint();
}

fn insert_lol(state: &mut EngineState, host: &mut dyn HostPort) {
    // Pre-Check
    if state.lol.mode != LolMode::AfterMeasure {
        warn_incomplete(host, "keine fixierte Messung");
        return;
    }
    let Some(measure) = state.lol.measure.clone() else {
        warn_incomplete(host, "keine fixierte Messung");
        return;
    };
    let Some(binding) = state.lol.bindings.data.clone() else {
        warn_incomplete(host, "kein Daten-Layer gebunden");
        return;
    };
    let Some(length) = state
        .lol
        .catalog
        .as_ref()
        .filter(|c| c.single_line(&measure.ref_id).is_some())
        .map(|c| c.length_of(&measure.ref_id))
    else {
        host.messages().push(
            MessageLevel::Warning,
            &format!("Bezugslinie nicht gefunden: ref_id {}", measure.ref_id),
        );
        return;
    };
    // Klemmen mit Meldung (Speichern-Pfad)
    let (m_from, clamped_from) = crate::core::validate::clamp_measure(measure.m_from, length);
    let (m_to, clamped_to) = crate::core::validate::clamp_measure(measure.m_to, length);
    if clamped_from || clamped_to {
        host.messages().push(
            MessageLevel::Info,
            &format!("Stationierung auf [0, {length}] geklemmt"),
        );
    }
    let Some(layer) = host.layer_ref(&binding.layer_id) else {
        warn_incomplete(host, "Daten-Layer nicht mehr vorhanden");
        return;
    };
    if !layer.capabilities().can_add {
        host.messages().push(
            MessageLevel::Warning,
            "Provider erlaubt kein Hinzufügen von Datensätzen",
        );
        return;
    }
    let pk_type = pk_field_type(host, &binding.layer_id, &binding.pk_field)
        .unwrap_or(FieldType::Int64);
    if resolve_pending_edits(host, &binding.layer_id) == PendingOutcome::Abort {
        return;
    }

    // Transaktion
    let (feature, pk) = {
        let Some(layer) = host.layer(&binding.layer_id) else {
            return;
        };
        if let Err(e) = layer.start_edit() {
            rollback_and_report(host, &binding.layer_id, &e);
            return;
        }
        let layer = match host.layer(&binding.layer_id) {
            Some(layer) => layer,
            None => return,
        };
        let pk = rows::next_pk(&*layer, &binding.pk_field, pk_type);
        let mut feature = Feature::new(0)
            .with_attr(&binding.pk_field, Some(rows::key_to_attr(&pk)))
            .with_attr(&binding.ref_field, Some(rows::key_to_attr(&measure.ref_id)))
            .with_attr(&binding.m_from_field, Some(AttrValue::Real(m_from)))
            .with_attr(&binding.m_to_field, Some(AttrValue::Real(m_to)))
            .with_attr(&binding.offset_field, Some(AttrValue::Real(measure.offset)));
        match layer.add_feature(feature.clone()) {
            Ok(fid) => feature.fid = fid,
            Err(e) => {
                rollback_and_report(host, &binding.layer_id, &e);
                return;
            }
        }
        (feature, pk)
    };

    let confirmed = host.form().open_feature_form(&binding.layer_id, &feature);
    if !confirmed {
        if let Some(layer) = host.layer(&binding.layer_id) {
            let _ = layer.rollback();
        }
        host.messages()
            .push(MessageLevel::Info, "Einfügen abgebrochen");
        return;
    }
    let commit = match host.layer(&binding.layer_id) {
        Some(layer) => layer.commit(),
        None => return,
    };
    if let Err(e) = commit {
        rollback_and_report(host, &binding.layer_id, &e);
        return;
    }

    // Post-Effekte
    log::info!(
        "Datensatz {pk} eingefügt (m_from = {m_from}, m_to = {m_to}, offset = {})",
        measure.offset
    );
    state.lol.selection.insert(pk.clone());
    state.lol.edit_pk = Some(pk);
    host.canvas().request_repaint();
}
