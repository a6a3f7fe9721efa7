//! App-Intent Events.
//!
//! Intents sind Eingaben aus Host/Dialog ohne direkte Mutationslogik.

use glam::DVec2;

use crate::app::tools::{MeasureTarget, StepDirection, ToolKind};
use crate::core::records::FieldValue;
use crate::host::canvas::{KeyModifiers, MouseButton};

/// Eingaben aus Host-Canvas, Dialog und Projekt-Lebenszyklus.
#[derive(Debug, Clone)]
pub enum AppIntent {
    /// Cursor auf dem Canvas bewegt (Display-Koordinaten)
    CanvasMoved { tool: ToolKind, pos: DVec2 },
    /// Maustaste auf dem Canvas gedrückt
    CanvasPressed {
        tool: ToolKind,
        pos: DVec2,
        button: MouseButton,
        modifiers: KeyModifiers,
    },
    /// Maustaste auf dem Canvas losgelassen
    CanvasReleased {
        tool: ToolKind,
        pos: DVec2,
        button: MouseButton,
        modifiers: KeyModifiers,
    },

    /// Stationierung im Dialog editiert
    MeasureEdited {
        tool: ToolKind,
        target: MeasureTarget,
        value: f64,
    },
    /// Abstand im Dialog editiert (nur LoL)
    OffsetEdited { value: f64 },
    /// Stationierung schrittweise ändern (±1, ×10/100/1000 via Modifikatoren)
    StepMeasureRequested {
        tool: ToolKind,
        target: MeasureTarget,
        direction: StepDirection,
        modifiers: KeyModifiers,
    },
    /// Messung an den Linienanfang schieben
    MoveToStartRequested { tool: ToolKind },
    /// Messung an das Linienende schieben
    MoveToEndRequested { tool: ToolKind },
    /// Segment um die eigene Länge Richtung Anfang verschieben (nur LoL)
    PrependRequested,
    /// Segment um die eigene Länge Richtung Ende verschieben (nur LoL)
    AppendRequested,
    /// Segment am Mittelpunkt spiegeln (nur LoL)
    FlipRequested,

    /// Datensatz einfügen
    InsertRequested { tool: ToolKind },
    /// Datensatz aktualisieren
    UpdateRequested { tool: ToolKind },
    /// Datensatz löschen (mit Bestätigung)
    DeleteRequested { tool: ToolKind },
    /// Messung verwerfen und neu beginnen
    ResumeRequested { tool: ToolKind },
    /// Datensatz für Update/Delete wählen (aus Tabelle oder Formular)
    EditRecordChosen { tool: ToolKind, pk: FieldValue },

    /// Rechteck-Selektions-Modus ein-/ausschalten
    SelectFeaturesToggled { tool: ToolKind, active: bool },
    /// Arbeits-Selektion leeren
    ClearSelectionRequested { tool: ToolKind },

    /// Bezugslinien-Layer binden
    ReferenceLayerBound {
        tool: ToolKind,
        layer_id: String,
        id_field: String,
    },
    /// PoL-Daten-Layer binden
    PolDataLayerBound {
        layer_id: String,
        pk_field: String,
        ref_field: String,
        m_field: String,
    },
    /// LoL-Daten-Layer binden
    LolDataLayerBound {
        layer_id: String,
        pk_field: String,
        ref_field: String,
        m_from_field: String,
        m_to_field: String,
        offset_field: String,
    },
    /// Show-Layer binden
    ShowLayerBound {
        tool: ToolKind,
        layer_id: String,
        back_ref_field: String,
    },

    /// Benannte Konfiguration speichern (Überschreiben wird nachgefragt)
    SettingsSaveRequested { tool: ToolKind, name: String },
    /// Benannte Konfiguration wiederherstellen
    SettingsRestoreRequested { tool: ToolKind, name: String },
    /// Benannte Konfiguration löschen
    SettingsDeleteRequested { tool: ToolKind, name: String },

    /// Projekt wird gespeichert: aktuelle Konfigurationen persistieren
    ProjectSaving,
    /// Projekt wurde geöffnet: Konfigurationen wiederherstellen und prüfen
    ProjectOpened,
    /// Anstehende Layer-Signale des Hosts verarbeiten
    LayerSignalsPending,
    /// Vollständigen Einstellungs-Check anstoßen
    CheckSettingsRequested { tool: ToolKind },
}
