//! Typisierte Fehlerarten der Engine.

use thiserror::Error;

/// Fehlerarten, die Engine-Operationen an den Controller melden.
///
/// Jede Variante entspricht einer definierten Oberflächen-Reaktion
/// (Warnung, Info oder kritische Meldung); keine davon darf als Panic
/// in die Event-Schleife des Hosts entkommen.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EngineError {
    /// Pflicht-Bindung (Layer oder Feld) fehlt oder ist ungültig
    #[error("Konfiguration unvollständig: {0}")]
    ConfigIncomplete(String),

    /// `ref_id` eines Datensatzes löst nicht auf
    #[error("Bezugslinie nicht gefunden: ref_id {0}")]
    ReferenceNotFound(String),

    /// Pflichtfeld (Stationierung oder Abstand) ist NULL
    #[error("NULL-Wert im Pflichtfeld '{0}'")]
    NullMeasure(&'static str),

    /// Stationierung außerhalb von [0, Linienlänge]
    #[error("Stationierung {measure} außerhalb [0, {length}]")]
    MeasureOutOfRange { measure: f64, length: f64 },

    /// Mehrteilige Bezugsgeometrie: es wird keine abgeleitete Geometrie berechnet
    #[error("Mehrteilige Bezugsgeometrie für ref_id {0}")]
    MultiPartReference(String),

    /// Bezugsgeometrie leer oder degeneriert (weniger als 2 Vertices)
    #[error("Leere Bezugsgeometrie für ref_id {0}")]
    EmptyReference(String),

    /// m-Werte entlang der Linie nicht streng aufsteigend
    #[error("m-Werte nicht streng aufsteigend (Vertex {0})")]
    NonMonotonicM(usize),

    /// Feld-Typen der Bindung sind nicht kompatibel
    #[error("Feld-Typen nicht kompatibel: {left} vs. {right}")]
    TypeMismatch { left: String, right: String },

    /// Provider-Fehler beim Commit; Edit-Session wurde zurückgerollt
    #[error("Commit fehlgeschlagen: {0}")]
    CommitFailed(String),

    /// Vom Benutzer abgebrochen (Dialog oder Formular)
    #[error("Vom Benutzer abgebrochen")]
    Cancelled,

    /// Koordinatentransformation nicht möglich
    #[error("Projektion fehlgeschlagen: {0}")]
    ProjectionFailed(String),
}
