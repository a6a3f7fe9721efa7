//! Formular- und Dialog-Oberfläche des Hosts.

use super::vector_layer::Feature;

/// Antwort auf die Frage nach offenen, nicht gespeicherten Änderungen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingEditsChoice {
    /// Offene Änderungen committen und fortfahren
    Commit,
    /// Offene Änderungen verwerfen und fortfahren
    Rollback,
    /// Vorgang abbrechen
    Cancel,
}

/// Vom Host bereitgestellte modale Formulare und Bestätigungs-Dialoge.
pub trait FormService {
    /// Öffnet das Host-Feature-Formular (modal); `true` = bestätigt.
    fn open_feature_form(&mut self, layer_id: &str, feature: &Feature) -> bool;

    /// Ja/Nein-Bestätigung für destruktive Aktionen (Löschen, Überschreiben).
    fn confirm(&mut self, question: &str) -> bool;

    /// Umgang mit offenen Änderungen einer fremden Edit-Session.
    fn ask_pending_edits(&mut self, layer_name: &str) -> PendingEditsChoice;
}
