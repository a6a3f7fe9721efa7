//! Aktualisieren bestehender Datensätze mit den Werten der aktuellen
//! Messung; Stationierungen werden geklemmt und das Klemmen gemeldet.

use crate::app::state::EngineState;
use crate::app::tools::ToolKind;
use crate::core::records::{AttrValue, FieldValue};
use crate::core::validate::clamp_measure;
use crate::host::messages::MessageLevel;
use crate::host::HostPort;

use super::super::rows;
use super::common::{resolve_pending_edits, rollback_and_report, warn_incomplete, PendingOutcome};

/// Aktualisiert den gewählten Datensatz aus der aktuellen Messung.
pub fn update(state: &mut EngineState, host: &mut dyn HostPort, tool: ToolKind) {
    match tool {
        ToolKind::Pol => update_pol(state, host),
        ToolKind::Lol => update_lol(state, host),
    }
}

fn report_clamped(host: &mut dyn HostPort, pk: &FieldValue, length: f64) {
    host.messages().push(
        MessageLevel::Info,
        &format!("Stationierung von Datensatz {pk} auf [0, {length}] geklemmt"),
    );
}

fn update_pol(state: &mut EngineState, host: &mut dyn HostPort) {
    // Pre-Check
    let Some(pk) = state.pol.edit_pk.clone() else {
        warn_incomplete(host, "kein Datensatz gewählt");
        return;
    };
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

    let Some(layer) = host.layer_ref(&binding.layer_id) else {
        warn_incomplete(host, "Daten-Layer nicht mehr vorhanden");
        return;
    };
    if !layer.capabilities().can_update {
        host.messages().push(
            MessageLevel::Warning,
            "Provider erlaubt kein Aktualisieren von Datensätzen",
        );
        return;
    }
    let Some((fid, _)) = rows::find_pol_row(layer, &binding, &pk) else {
        host.messages().push(
            MessageLevel::Warning,
            &format!("Datensatz {pk} nicht gefunden"),
        );
        return;
    };
    let Some(mut feature) = layer.feature_by_fid(fid) else {
        return;
    };

    // Klemmen mit Meldung (Benutzereingabe-Pfad)
    let (m, clamped) = clamp_measure(measure.m, length);
    if clamped {
        report_clamped(host, &pk, length);
    }

    if resolve_pending_edits(host, &binding.layer_id) == PendingOutcome::Abort {
        return;
    }

    // Transaktion
    feature
        .attrs
        .insert(binding.ref_field.clone(), Some(rows::key_to_attr(&measure.ref_id)));
    feature
        .attrs
        .insert(binding.m_field.clone(), Some(AttrValue::Real(m)));

    {
        let Some(layer) = host.layer(&binding.layer_id) else {
            return;
        };
        if let Err(e) = layer.start_edit() {
            rollback_and_report(host, &binding.layer_id, &e);
            return;
        }
    }
    let updated = match host.layer(&binding.layer_id) {
        Some(layer) => layer.update_feature(feature.clone()),
        None => return,
    };
    if let Err(e) = updated {
        rollback_and_report(host, &binding.layer_id, &e);
        return;
    }

    let confirmed = host.form().open_feature_form(&binding.layer_id, &feature);
    if !confirmed {
        if let Some(layer) = host.layer(&binding.layer_id) {
            let _ = layer.rollback();
        }
        host.messages()
            .push(MessageLevel::Info, "Aktualisieren abgebrochen");
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
    log::info!("Datensatz {pk} aktualisiert (m = {m})");
    host.canvas().request_repaint();
}

fn update_lol(state: &mut EngineState, host: &mut dyn HostPort) {
    // Pre-Check
    let Some(pk) = state.lol.edit_pk.clone() else {
        warn_incomplete(host, "kein Datensatz gewählt");
        return;
    };
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

    let Some(layer) = host.layer_ref(&binding.layer_id) else {
        warn_incomplete(host, "Daten-Layer nicht mehr vorhanden");
        return;
    };
    if !layer.capabilities().can_update {
        host.messages().push(
            MessageLevel::Warning,
            "Provider erlaubt kein Aktualisieren von Datensätzen",
        );
        return;
    }
    let Some((fid, _)) = rows::find_lol_row(layer, &binding, &pk) else {
        host.messages().push(
            MessageLevel::Warning,
            &format!("Datensatz {pk} nicht gefunden"),
        );
        return;
    };
    let Some(mut feature) = layer.feature_by_fid(fid) else {
        return;
    };

    // Klemmen mit Meldung (Benutzereingabe-Pfad)
    let (m_from, clamped_from) = clamp_measure(measure.m_from, length);
    let (m_to, clamped_to) = clamp_measure(measure.m_to, length);
    if clamped_from || clamped_to {
        report_clamped(host, &pk, length);
    }

    if resolve_pending_edits(host, &binding.layer_id) == PendingOutcome::Abort {
        return;
    }

    // Transaktion
    feature
        .attrs
        .insert(binding.ref_field.clone(), Some(rows::key_to_attr(&measure.ref_id)));
    feature
        .attrs
        .insert(binding.m_from_field.clone(), Some(AttrValue::Real(m_from)));
    feature
        .attrs
        .insert(binding.m_to_field.clone(), Some(AttrValue::Real(m_to)));
    feature.attrs.insert(
        binding.offset_field.clone(),
        Some(AttrValue::Real(measure.offset)),
    );

    {
        let Some(layer) = host.layer(&binding.layer_id) else {
            return;
        };
        if let Err(e) = layer.start_edit() {
            rollback_and_report(host, &binding.layer_id, &e);
            return;
        }
    }
    let updated = match host.layer(&binding.layer_id) {
        Some(layer) => layer.update_feature(feature.clone()),
        None => return,
    };
    if let Err(e) = updated {
        rollback_and_report(host, &binding.layer_id, &e);
        return;
    }

    let confirmed = host.form().open_feature_form(&binding.layer_id, &feature);
    if !confirmed {
        if let Some(layer) = host.layer(&binding.layer_id) {
            let _ = layer.rollback();
        }
        host.messages()
            .push(MessageLevel::Info, "Aktualisieren abgebrochen");
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
    log::info!("Datensatz {pk} aktualisiert (m_from = {m_from}, m_to = {m_to})");
    host.canvas().request_repaint();
}
