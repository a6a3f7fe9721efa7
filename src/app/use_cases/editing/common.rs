//! Gemeinsame Bausteine der Editier-Befehle.

use crate::core::error::EngineError;
use crate::host::form::PendingEditsChoice;
use crate::host::messages::MessageLevel;
use crate::host::HostPort;

/// Ausgang des Pre-Checks auf offene Fremd-Änderungen.
#[derive(Debug, PartialEq, Eq)]
pub enum PendingOutcome {
    /// Weiter mit der eigenen Transaktion
    Continue,
    /// Vorgang abbrechen (Benutzer-Entscheid oder Commit-Fehler)
    Abort,
}

/// Behandelt eine bereits offene Edit-Session mit ungespeicherten
/// Änderungen: Nachfrage Commit / Rollback / Abbrechen.
pub fn resolve_pending_edits(host: &mut dyn HostPort, layer_id: &str) -> PendingOutcome {
    let Some(layer) = host.layer_ref(layer_id) else {
        return PendingOutcome::Abort;
    };
    if !layer.is_editing() || !layer.has_pending_changes() {
        return PendingOutcome::Continue;
    }
    let layer_name = layer.name().to_string();

    match host.form().ask_pending_edits(&layer_name) {
        PendingEditsChoice::Commit => {
            let result = match host.layer(layer_id) {
                Some(layer) => layer.commit(),
                None => Err(EngineError::CommitFailed(String::from(
                    "Layer nicht mehr vorhanden",
                ))),
            };
            if let Err(e) = result {
                rollback_and_report(host, layer_id, &e);
                return PendingOutcome::Abort;
            }
            PendingOutcome::Continue
        }
        PendingEditsChoice::Rollback => {
            if let Some(layer) = host.layer(layer_id) {
                let _ = layer.rollback();
            }
            PendingOutcome::Continue
        }
        PendingEditsChoice::Cancel => {
            host.messages()
                .push(MessageLevel::Info, &EngineError::Cancelled.to_string());
            PendingOutcome::Abort
        }
    }
}

/// Rollt die Edit-Session zurück und meldet den Provider-Fehler kritisch.
pub fn rollback_and_report(host: &mut dyn HostPort, layer_id: &str, error: &EngineError) {
    if let Some(layer) = host.layer(layer_id) {
        let _ = layer.rollback();
    }
    log::error!("Edit-Session zurückgerollt: {error}");
    host.messages()
        .push(MessageLevel::Critical, &error.to_string());
}

/// Meldet eine unvollständige Konfiguration als Warnung.
pub fn warn_incomplete(host: &mut dyn HostPort, detail: &str) {
    host.messages().push(
        MessageLevel::Warning,
        &format!("Konfiguration unvollständig: {detail}"),
    );
}
