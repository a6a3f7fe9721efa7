//! Engine-seitiger Lese-Cache der Bezugslinien (Layer R).
//!
//! Wird bei jedem `check_settings`-Durchlauf aus dem gebundenen Host-Layer
//! neu aufgebaut; die Engine liest R ausschließlich über diesen Katalog.

use std::collections::HashMap;

use glam::DVec2;

use super::crs::Crs;
use super::geom::total_length;
use super::records::FieldValue;

/// Bezugsgeometrie: einteilige Polyline oder mehrteilige Sammlung.
///
/// Mehrteilige Geometrien werden erkannt und markiert; der Kernel berechnet
/// auf ihnen keine Stationierungen.
#[derive(Debug, Clone, PartialEq)]
pub enum ReferenceGeometry {
    Single(Vec<DVec2>),
    Multi(Vec<Vec<DVec2>>),
}

impl ReferenceGeometry {
    /// Einteilige Polyline, falls vorhanden und nicht degeneriert.
    pub fn single(&self) -> Option<&[DVec2]> {
        match self {
            ReferenceGeometry::Single(line) if line.len() >= 2 => Some(line),
            _ => None,
        }
    }

    /// Mehrteilige Geometrie?
    pub fn is_multi_part(&self) -> bool {
        matches!(self, ReferenceGeometry::Multi(_))
    }

    /// Leer bzw. degeneriert (keine messbare Linie)?
    pub fn is_empty(&self) -> bool {
        match self {
            ReferenceGeometry::Single(line) => line.len() < 2,
            ReferenceGeometry::Multi(parts) => parts.iter().all(|p| p.len() < 2),
        }
    }

    /// Länge der einteiligen Polyline (0.0 für mehrteilige/leere Geometrie).
    pub fn length(&self) -> f64 {
        self.single().map(total_length).unwrap_or(0.0)
    }
}

/// Katalog aller Bezugslinien, indexiert nach dem `id_field`-Wert.
#[derive(Debug, Clone)]
pub struct ReferenceCatalog {
    geoms: HashMap<FieldValue, ReferenceGeometry>,
    crs: Crs,
}

impl ReferenceCatalog {
    /// Erstellt einen leeren Katalog im angegebenen CRS.
    pub fn new(crs: Crs) -> Self {
        Self {
            geoms: HashMap::new(),
            crs,
        }
    }

    /// CRS der Bezugslinien.
    pub fn crs(&self) -> &Crs {
        &self.crs
    }

    /// Nimmt eine Bezugslinie auf (ersetzt einen bestehenden Eintrag).
    pub fn insert(&mut self, ref_id: FieldValue, geometry: ReferenceGeometry) {
        self.geoms.insert(ref_id, geometry);
    }

    /// Geometrie zu einer `ref_id`.
    pub fn get(&self, ref_id: &FieldValue) -> Option<&ReferenceGeometry> {
        self.geoms.get(ref_id)
    }

    /// Einteilige Polyline zu einer `ref_id` (None für fehlend/mehrteilig/leer).
    pub fn single_line(&self, ref_id: &FieldValue) -> Option<&[DVec2]> {
        self.geoms.get(ref_id).and_then(|g| g.single())
    }

    /// Linienlänge zu einer `ref_id` (0.0 für fehlend/mehrteilig).
    pub fn length_of(&self, ref_id: &FieldValue) -> f64 {
        self.geoms.get(ref_id).map(|g| g.length()).unwrap_or(0.0)
    }

    /// Anzahl der Einträge.
    pub fn len(&self) -> usize {
        self.geoms.len()
    }

    /// Ist der Katalog leer?
    pub fn is_empty(&self) -> bool {
        self.geoms.is_empty()
    }

    /// Iteration über alle Einträge.
    pub fn iter(&self) -> impl Iterator<Item = (&FieldValue, &ReferenceGeometry)> {
        self.geoms.iter()
    }
}
