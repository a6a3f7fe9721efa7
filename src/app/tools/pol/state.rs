//! State-Definitionen und Konstruktor für das Point-on-Line-Werkzeug.

use std::collections::BTreeSet;

use glam::DVec2;
use indexmap::IndexSet;

use super::super::MeasureFeedback;
use crate::app::bindings::PolBindings;
use crate::core::records::FieldValue;
use crate::core::reference::ReferenceCatalog;
use crate::host::subscription::Subscription;
use crate::shared::ToolStyle;

/// Werkzeug-Modus des PoL-Werkzeugs (geschlossener Summentyp).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PolMode {
    /// Kein gültiger Bezugslinien-Layer
    #[default]
    Disabled,
    /// Warten auf Hover/Klick
    Measuring,
    /// Stationierung fixiert; Befehle verfügbar
    AfterMeasure,
    /// Griff gepackt, noch nicht bewegt
    BeforeMovePoint,
    /// Mess-Punkt wird entlang der Linie gezogen
    MovePoint,
    /// Rechteck-Selektion auf dem Show-Layer
    SelectFeatures,
}

/// Fixierte PoL-Messung.
#[derive(Debug, Clone, PartialEq)]
pub struct PolMeasure {
    /// `id_field`-Wert der gesnappten Bezugslinie
    pub ref_id: FieldValue,
    /// Provider-fid der Bezugslinie (Snap-Filter beim Verschieben)
    pub fid: i64,
    /// Stationierung
    pub m: f64,
}

/// Point-on-Line-Werkzeug
pub struct PolTool {
    pub mode: PolMode,
    /// Fixierte Messung (ab `AfterMeasure`)
    pub measure: Option<PolMeasure>,
    /// Laufendes Hover-Feedback
    pub hover: Option<MeasureFeedback>,
    /// Datensatz, auf den sich Update/Delete beziehen
    pub edit_pk: Option<FieldValue>,
    /// Arbeits-Selektion: geordnete Menge von Daten-pk-Werten
    pub selection: IndexSet<FieldValue>,
    pub bindings: PolBindings,
    /// Lese-Cache der Bezugslinien (None bis zum ersten `check_settings`)
    pub catalog: Option<ReferenceCatalog>,
    pub style: ToolStyle,
    /// Abos auf Layer-Signale; werden beim Rebinding ersetzt
    pub subscriptions: Vec<Subscription>,
    /// Anker der laufenden Rechteck-Selektion (Display-Koordinaten)
    pub rect_anchor: Option<DVec2>,
    /// Bereits als mehrteilig gemeldete Bezugslinien (eine Meldung pro Feature)
    pub multipart_reported: BTreeSet<FieldValue>,
}

impl PolTool {
    /// Erstellt ein neues PoL-Werkzeug im Modus `Disabled`.
    pub fn new() -> Self {
        Self {
            mode: PolMode::Disabled,
            measure: None,
            hover: None,
            edit_pk: None,
            selection: IndexSet::new(),
            bindings: PolBindings::default(),
            catalog: None,
            style: ToolStyle::default(),
            subscriptions: Vec::new(),
            rect_anchor: None,
            multipart_reported: BTreeSet::new(),
        }
    }

    /// Fixiert eine Messung und wechselt nach `AfterMeasure`.
    pub fn lock_measure(&mut self, measure: PolMeasure) {
        self.measure = Some(measure);
        self.mode = PolMode::AfterMeasure;
    }

    /// Verwirft die Messung und kehrt nach `Measuring` zurück.
    pub fn back_to_measuring(&mut self) {
        self.measure = None;
        self.hover = None;
        self.mode = PolMode::Measuring;
    }

    /// Setzt das Werkzeug nach Konfigurationswechsel vollständig zurück.
    pub fn reset(&mut self) {
        self.measure = None;
        self.hover = None;
        self.edit_pk = None;
        self.rect_anchor = None;
        self.mode = if self.bindings.can_measure() {
            PolMode::Measuring
        } else {
            PolMode::Disabled
        };
    }

    /// Länge der Bezugslinie einer Messung (0.0 ohne Katalog).
    pub fn length_of(&self, ref_id: &FieldValue) -> f64 {
        self.catalog
            .as_ref()
            .map(|c| c.length_of(ref_id))
            .unwrap_or(0.0)
    }

    /// Geographisches Bezugs-CRS?
    pub fn is_geographic(&self) -> bool {
        self.catalog.as_ref().is_some_and(|c| c.crs().geographic)
    }
}

impl Default for PolTool {
    fn default() -> Self {
        Self::new()
    }
}
