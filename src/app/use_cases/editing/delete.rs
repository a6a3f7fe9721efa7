//! Löschen von Datensätzen mit Benutzer-Bestätigung.

use crate::app::state::EngineState;
use crate::app::tools::ToolKind;
use crate::host::messages::MessageLevel;
use crate::host::HostPort;

use super::super::rows;
use super::common::{resolve_pending_edits, rollback_and_report, warn_incomplete, PendingOutcome};

/// Löscht den gewählten Datensatz (Ja/Nein-Bestätigung).
pub fn delete(state: &mut EngineState, host: &mut dyn HostPort, tool: ToolKind) {
    match tool {
        ToolKind::Pol => delete_pol(state, host),
        ToolKind::Lol => delete_lol(state, host),
    }
}

fn delete_pol(state: &mut EngineState, host: &mut dyn HostPort) {
    // Pre-Check
    let Some(pk) = state.pol.edit_pk.clone() else {
        warn_incomplete(host, "kein Datensatz gewählt");
        return;
    };
    let Some(binding) = state.pol.bindings.data.clone() else {
        warn_incomplete(host, "kein Daten-Layer gebunden");
        return;
    };
    let Some(layer) = host.layer_ref(&binding.layer_id) else {
        warn_incomplete(host, "Daten-Layer nicht mehr vorhanden");
        return;
    };
    if !layer.capabilities().can_delete {
        host.messages().push(
            MessageLevel::Warning,
            "Provider erlaubt kein Löschen von Datensätzen",
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

    if !host
        .form()
        .confirm(&format!("Datensatz {pk} wirklich löschen?"))
    {
        host.messages()
            .push(MessageLevel::Info, "Löschen abgebrochen");
        return;
    }
    if resolve_pending_edits(host, &binding.layer_id) == PendingOutcome::Abort {
        return;
    }

    // Transaktion
    {
        let Some(layer) = host.layer(&binding.layer_id) else {
            return;
        };
        if let Err(e) = layer.start_edit() {
            rollback_and_report(host, &binding.layer_id, &e);
            return;
        }
    }
    let deleted = match host.layer(&binding.layer_id) {
        Some(layer) => layer.delete_feature(fid),
        None => return,
    };
    if let Err(e) = deleted {
        rollback_and_report(host, &binding.layer_id, &e);
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
    log::info!("Datensatz {pk} gelöscht");
    state.pol.selection.shift_remove(&pk);
    state.pol.edit_pk = None;
    if state.pol.measure.is_some() || state.pol.mode != crate::app::tools::PolMode::Disabled {
        state.pol.back_to_measuring();
    }
    host.canvas().request_repaint();
}

fn delete_lol(state: &mut EngineState, host: &mut dyn HostPort) {
    // Pre-Check
    let Some(pk) = state.lol.edit_pk.clone() else {
        warn_incomplete(host, "kein Datensatz gewählt");
        return;
    };
    let Some(binding) = state.lol.bindings.data.clone() else {
        warn_incomplete(host, "kein Daten-Layer gebunden");
        return;
    };
    let Some(layer) = host.layer_ref(&binding.layer_id) else {
        warn_incomplete(host, "Daten-Layer nicht mehr vorhanden");
        return;
    };
    if !layer.capabilities().can_delete {
        host.messages().push(
            MessageLevel::Warning,
            "Provider erlaubt kein Löschen von Datensätzen",
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

    if !host
        .form()
        .confirm(&format!("Datensatz {pk} wirklich löschen?"))
    {
        host.messages()
            .push(MessageLevel::Info, "Löschen abgebrochen");
        return;
    }
    if resolve_pending_edits(host, &binding.layer_id) == PendingOutcome::Abort {
        return;
    }

    // Transaktion
    {
        let Some(layer) = host.layer(&binding.layer_id) else {
            return;
        };
        if let Err(e) = layer.start_edit() {
            rollback_and_report(host, &binding.layer_id, &e);
            return;
        }
    }
    let deleted = match host.layer(&binding.layer_id) {
        Some(layer) => layer.delete_feature(fid),
        None => return,
    };
    if let Err(e) = deleted {
        rollback_and_report(host, &binding.layer_id, &e);
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
    log::info!("Datensatz {pk} gelöscht");
    state.lol.selection.shift_remove(&pk);
    state.lol.edit_pk = None;
    if state.lol.mode != crate::app::tools::LolMode::Disabled {
        state.lol.back_to_measuring();
    }
    host.canvas().request_repaint();
}
