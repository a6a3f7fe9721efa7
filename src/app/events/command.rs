//! App-Command Events.
//!
//! Commands sind mutierende Schritte, die zentral im Controller ausgeführt
//! werden.

use glam::DVec2;

use crate::app::tools::{MeasureTarget, StepDirection, ToolKind};
use crate::core::records::FieldValue;
use crate::host::canvas::KeyModifiers;

/// Mutierende Schritte auf Engine-Zustand und Host.
#[derive(Debug, Clone)]
pub enum AppCommand {
    /// Hover verarbeiten: Snap, Stationierungs-Feedback, Segment-Voranzeige
    HoverMeasure { tool: ToolKind, pos: DVec2 },
    /// Klick im Mess-Modus: Snap fixieren
    ClickMeasure { tool: ToolKind, pos: DVec2 },
    /// Press in `AfterMeasure`: Griff packen oder Messung neu beginnen
    PressAfterMeasure { tool: ToolKind, pos: DVec2 },
    /// Laufenden Drag aktualisieren
    UpdateDrag {
        tool: ToolKind,
        pos: DVec2,
        modifiers: KeyModifiers,
    },
    /// Laufenden Drag beenden
    EndDrag { tool: ToolKind },
    /// LoL: zweiten Punkt fixieren (Release im Mess-Modus)
    EndMeasure { tool: ToolKind },

    /// Anker der Rechteck-Selektion setzen
    SetRectAnchor { tool: ToolKind, pos: DVec2 },
    /// Rechteck-Selektion abschließen
    SelectInRect {
        tool: ToolKind,
        min: DVec2,
        max: DVec2,
        modifiers: KeyModifiers,
    },
    /// Rechteck-Selektions-Modus setzen
    SetSelectMode { tool: ToolKind, active: bool },
    /// Arbeits-Selektion leeren
    ClearSelection { tool: ToolKind },

    /// Stationierung aus Dialog-Wert setzen (geklemmt)
    SetMeasure {
        tool: ToolKind,
        target: MeasureTarget,
        value: f64,
    },
    /// Abstand aus Dialog-Wert setzen (nur LoL)
    SetOffset { value: f64 },
    /// Stationierung schrittweise ändern
    StepMeasure {
        tool: ToolKind,
        target: MeasureTarget,
        direction: StepDirection,
        modifiers: KeyModifiers,
    },
    /// Messung an den Linienanfang schieben
    MoveToStart { tool: ToolKind },
    /// Messung an das Linienende schieben
    MoveToEnd { tool: ToolKind },
    /// Segment um die eigene Länge Richtung Anfang verschieben
    Prepend,
    /// Segment um die eigene Länge Richtung Ende verschieben
    Append,
    /// Segment am Mittelpunkt spiegeln
    Flip,

    /// Datensatz einfügen (drei Phasen: Pre-Check, Transaktion, Post-Effekte)
    InsertRecord { tool: ToolKind },
    /// Datensatz aktualisieren (Stationierungen werden geklemmt)
    UpdateRecord { tool: ToolKind },
    /// Datensatz löschen (mit Bestätigung)
    DeleteRecord { tool: ToolKind },
    /// Messung verwerfen und neu beginnen
    Resume { tool: ToolKind },
    /// Datensatz für Update/Delete wählen
    ChooseEditRecord { tool: ToolKind, pk: FieldValue },

    /// Bezugslinien-Layer binden
    BindReferenceLayer {
        tool: ToolKind,
        layer_id: String,
        id_field: String,
    },
    /// PoL-Daten-Layer binden
    BindPolDataLayer {
        layer_id: String,
        pk_field: String,
        ref_field: String,
        m_field: String,
    },
    /// LoL-Daten-Layer binden
    BindLolDataLayer {
        layer_id: String,
        pk_field: String,
        ref_field: String,
        m_from_field: String,
        m_to_field: String,
        offset_field: String,
    },
    /// Show-Layer binden
    BindShowLayer {
        tool: ToolKind,
        layer_id: String,
        back_ref_field: String,
    },

    /// Benannte Konfiguration speichern
    SaveSettings { tool: ToolKind, name: String },
    /// Benannte Konfiguration wiederherstellen
    RestoreSettings { tool: ToolKind, name: String },
    /// Benannte Konfiguration löschen
    DeleteSettings { tool: ToolKind, name: String },
    /// Aktuelle Konfigurationen in den Projektspeicher schreiben
    StoreCurrentSettings,
    /// Aktuelle Konfigurationen aus dem Projektspeicher laden
    RestoreCurrentSettings,

    /// Vollständiger Einstellungs-Check eines Werkzeugs
    CheckSettings { tool: ToolKind },
    /// Anstehende Layer-Signale verarbeiten (je Signal ein Check)
    ProcessLayerSignals,
}
