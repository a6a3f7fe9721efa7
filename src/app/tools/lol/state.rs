//! State-Definitionen und Konstruktor für das Line-on-Line-Werkzeug.

use std::collections::BTreeSet;

use glam::DVec2;
use indexmap::IndexSet;

use super::super::MeasureFeedback;
use crate::app::bindings::LolBindings;
use crate::core::records::FieldValue;
use crate::core::reference::ReferenceCatalog;
use crate::host::subscription::Subscription;
use crate::shared::ToolStyle;

/// Werkzeug-Modus des LoL-Werkzeugs (geschlossener Summentyp).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LolMode {
    /// Kein gültiger Bezugslinien-Layer
    #[default]
    Disabled,
    /// Warten auf den ersten Klick
    BeforeMeasure,
    /// Erster Punkt fixiert; Cursor treibt den zweiten Punkt
    Measuring,
    /// Segment fixiert; Befehle verfügbar
    AfterMeasure,
    /// Griff am Von-Punkt gepackt
    BeforeMoveFromPoint,
    /// Von-Punkt wird entlang der Linie gezogen
    MoveFromPoint,
    /// Griff am Bis-Punkt gepackt
    BeforeMoveToPoint,
    /// Bis-Punkt wird entlang der Linie gezogen
    MoveToPoint,
    /// Segment gepackt
    BeforeMoveSegment,
    /// Segment wird verschoben (Modifikatoren steuern Offset-Verhalten)
    MoveSegment,
    /// Rechteck-Selektion auf dem Show-Layer
    SelectFeatures,
}

/// Fixierte LoL-Messung.
#[derive(Debug, Clone, PartialEq)]
pub struct LolMeasure {
    /// `id_field`-Wert der gesnappten Bezugslinie
    pub ref_id: FieldValue,
    /// Provider-fid der Bezugslinie (Snap-Filter für den zweiten Punkt)
    pub fid: i64,
    pub m_from: f64,
    pub m_to: f64,
    /// Signierter Abstand (positiv = links in Digitalisier-Richtung)
    pub offset: f64,
}

impl LolMeasure {
    /// Normalisierte Stationierungen (min, max).
    pub fn span(&self) -> (f64, f64) {
        (self.m_from.min(self.m_to), self.m_from.max(self.m_to))
    }

    /// Segment-Länge entlang der Linie.
    pub fn segment_length(&self) -> f64 {
        (self.m_to - self.m_from).abs()
    }
}

/// Griff-Ziel eines laufenden Drags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LolDragTarget {
    FromPoint,
    ToPoint,
    Segment,
}

/// Zustand eines laufenden Drags: Referenzwerte vom Drag-Beginn.
#[derive(Debug, Clone, PartialEq)]
pub struct LolDrag {
    pub target: LolDragTarget,
    /// Stationierung unter dem Cursor beim Packen
    pub grab_m: f64,
    pub start_m_from: f64,
    pub start_m_to: f64,
    pub start_offset: f64,
}

/// Line-on-Line-Werkzeug
pub struct LolTool {
    pub mode: LolMode,
    /// Fixierte Messung (ab `Measuring` teilweise, ab `AfterMeasure` komplett)
    pub measure: Option<LolMeasure>,
    /// Laufendes Hover-Feedback
    pub hover: Option<MeasureFeedback>,
    /// Laufender Drag
    pub drag: Option<LolDrag>,
    /// Datensatz, auf den sich Update/Delete beziehen
    pub edit_pk: Option<FieldValue>,
    /// Arbeits-Selektion: geordnete Menge von Daten-pk-Werten
    pub selection: IndexSet<FieldValue>,
    pub bindings: LolBindings,
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

impl LolTool {
    /// Erstellt ein neues LoL-Werkzeug im Modus `Disabled`.
    pub fn new() -> Self {
        Self {
            mode: LolMode::Disabled,
            measure: None,
            hover: None,
            drag: None,
            edit_pk: None,
            selection: IndexSet::new(),
            bindings: LolBindings::default(),
            catalog: None,
            style: ToolStyle::default(),
            subscriptions: Vec::new(),
            rect_anchor: None,
            multipart_reported: BTreeSet::new(),
        }
    }

    /// Fixiert den ersten Punkt und wechselt nach `Measuring`.
    pub fn lock_first_point(&mut self, ref_id: FieldValue, fid: i64, m: f64) {
        self.measure = Some(LolMeasure {
            ref_id,
            fid,
            m_from: m,
            m_to: m,
            offset: 0.0,
        });
        self.mode = LolMode::Measuring;
    }

    /// Schließt die Messung ab (`Measuring` → `AfterMeasure`).
    pub fn commit_measure(&mut self) {
        if self.measure.is_some() {
            self.mode = LolMode::AfterMeasure;
        }
    }

    /// Verwirft die Messung und kehrt nach `BeforeMeasure` zurück.
    pub fn back_to_measuring(&mut self) {
        self.measure = None;
        self.hover = None;
        self.drag = None;
        self.mode = LolMode::BeforeMeasure;
    }

    /// Setzt das Werkzeug nach Konfigurationswechsel vollständig zurück.
    pub fn reset(&mut self) {
        self.measure = None;
        self.hover = None;
        self.drag = None;
        self.edit_pk = None;
        self.rect_anchor = None;
        self.mode = if self.bindings.can_measure() {
            LolMode::BeforeMeasure
        } else {
            LolMode::Disabled
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

impl Default for LolTool {
    fn default() -> Self {
        Self::new()
    }
}
