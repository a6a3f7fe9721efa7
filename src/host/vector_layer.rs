//! Vektor-Layer-Oberfläche des Hosts: Feature-Zugriff plus transaktionale
//! Edit-Session.

use std::collections::BTreeMap;

use crate::core::crs::Crs;
use crate::core::error::EngineError;
use crate::core::records::{AttrValue, FieldType, FieldValue};
use crate::core::reference::ReferenceGeometry;

/// Feld-Definition im Layer-Schema.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDef {
    pub name: String,
    pub field_type: FieldType,
}

/// Capability-Flags des Providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub can_add: bool,
    pub can_update: bool,
    pub can_delete: bool,
}

impl Capabilities {
    /// Voll editierbarer Provider.
    pub const FULL: Capabilities = Capabilities {
        can_add: true,
        can_update: true,
        can_delete: true,
    };

    /// Read-only Provider.
    pub const READ_ONLY: Capabilities = Capabilities {
        can_add: false,
        can_update: false,
        can_delete: false,
    };
}

/// Feature eines Vektor-Layers: Attribute (nullable) plus optionale Geometrie.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Feature {
    /// Provider-interne Feature-ID
    pub fid: i64,
    pub attrs: BTreeMap<String, Option<AttrValue>>,
    pub geometry: Option<ReferenceGeometry>,
}

impl Feature {
    /// Erstellt ein Feature ohne Attribute.
    pub fn new(fid: i64) -> Self {
        Self {
            fid,
            attrs: BTreeMap::new(),
            geometry: None,
        }
    }

    /// Setzt ein Attribut (Builder-Stil).
    pub fn with_attr(mut self, name: &str, value: Option<AttrValue>) -> Self {
        self.attrs.insert(name.to_string(), value);
        self
    }

    /// Setzt die Geometrie (Builder-Stil).
    pub fn with_geometry(mut self, geometry: ReferenceGeometry) -> Self {
        self.geometry = Some(geometry);
        self
    }

    /// Nicht-NULL-Attributwert.
    pub fn attr(&self, name: &str) -> Option<&AttrValue> {
        self.attrs.get(name).and_then(|v| v.as_ref())
    }

    /// Attributwert als Schlüssel (`pk`/`ref_id`).
    pub fn key_value(&self, name: &str) -> Option<FieldValue> {
        self.attr(name).and_then(|v| v.as_key())
    }

    /// Attributwert als Zahl.
    pub fn number(&self, name: &str) -> Option<f64> {
        self.attr(name).and_then(|v| v.as_f64())
    }
}

/// Host-Ereignisse eines gebundenen Layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerEventKind {
    /// Layer-Konfiguration geändert (Felder, CRS, Provider)
    ConfigChanged,
    /// Commit einer Edit-Session abgeschlossen
    CommitFinished,
    /// Anzeige-Ausdruck geändert
    DisplayExpressionChanged,
}

/// Serialisiertes Layer-Ereignis in Ankunftsreihenfolge.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerEvent {
    pub layer_id: String,
    pub kind: LayerEventKind,
}

/// Vom Host bereitgestellte Vektor-Layer-Oberfläche.
///
/// Die Engine liest R frei und schreibt D ausschließlich innerhalb der
/// eigenen Edit-Session.
pub trait VectorLayerPort {
    /// Eindeutige Layer-ID im Host-Projekt.
    fn layer_id(&self) -> &str;

    /// Anzeigename des Layers.
    fn name(&self) -> &str;

    /// CRS des Layers.
    fn crs(&self) -> Crs;

    /// Layer-Schema.
    fn fields(&self) -> Vec<FieldDef>;

    /// Capability-Flags des Providers.
    fn capabilities(&self) -> Capabilities;

    /// Iteration über alle Features (committeter Stand plus offene Änderungen).
    fn features(&self) -> Vec<Feature>;

    /// Feature nach Provider-ID.
    fn feature_by_fid(&self, fid: i64) -> Option<Feature>;

    /// Features nach Feld-Wert.
    fn features_by_field_value(&self, field: &str, value: &FieldValue) -> Vec<Feature>;

    /// Läuft eine Edit-Session?
    fn is_editing(&self) -> bool;

    /// Offene, nicht committete Änderungen vorhanden?
    fn has_pending_changes(&self) -> bool;

    /// Startet eine Edit-Session.
    fn start_edit(&mut self) -> Result<(), EngineError>;

    /// Fügt ein Feature in die laufende Session ein; liefert die neue fid.
    fn add_feature(&mut self, feature: Feature) -> Result<i64, EngineError>;

    /// Aktualisiert ein Feature in der laufenden Session.
    fn update_feature(&mut self, feature: Feature) -> Result<(), EngineError>;

    /// Löscht ein Feature in der laufenden Session.
    fn delete_feature(&mut self, fid: i64) -> Result<(), EngineError>;

    /// Schreibt die Session; bei Fehler bleibt die Session offen und der
    /// Aufrufer rollt zurück.
    fn commit(&mut self) -> Result<(), EngineError>;

    /// Verwirft die Session.
    fn rollback(&mut self) -> Result<(), EngineError>;
}
