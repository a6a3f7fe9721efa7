//! Spatial-Index (KD-Tree) über den Segmenten der Bezugslinien.
//!
//! Grundlage des In-Memory-Snap-Dienstes: grobe Kreisabfrage über
//! Segment-Mittelpunkte, danach exakte Lotfußpunkt-Nachrechnung.

use glam::DVec2;
use kiddo::{KdTree, SquaredEuclidean};

use super::geom::closest_point_on_segment;
use super::records::FieldValue;
use super::reference::ReferenceCatalog;

/// Ergebnis einer Snap-Abfrage gegen den Segment-Index.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentMatch {
    /// `id_field`-Wert der getroffenen Bezugslinie
    pub ref_id: FieldValue,
    /// Lotfußpunkt auf dem Segment
    pub point: DVec2,
    /// Euklidische Distanz zum Suchpunkt
    pub distance: f64,
}

struct SegmentEntry {
    ref_id: FieldValue,
    a: DVec2,
    b: DVec2,
}

/// Read-only Spatial-Index über allen Segmenten eines Bezugslinien-Katalogs.
pub struct SegmentIndex {
    tree: KdTree<f64, 2>,
    entries: Vec<SegmentEntry>,
    /// Halbe Länge des längsten Segments: Aufschlag auf den Abfrage-Radius,
    /// damit lange Segmente mit entferntem Mittelpunkt nicht durchrutschen
    max_half_segment: f64,
}

impl SegmentIndex {
    /// Erstellt einen leeren Index.
    pub fn empty() -> Self {
        Self {
            tree: (&Vec::<[f64; 2]>::new()).into(),
            entries: Vec::new(),
            max_half_segment: 0.0,
        }
    }

    /// Baut den Index aus allen einteiligen Bezugslinien des Katalogs.
    ///
    /// Mehrteilige Geometrien werden übersprungen — auf ihnen wird weder
    /// gemessen noch gesnappt.
    pub fn from_catalog(catalog: &ReferenceCatalog) -> Self {
        let mut entries = Vec::new();
        let mut midpoints: Vec<[f64; 2]> = Vec::new();
        let mut max_half_segment = 0.0f64;

        let mut ref_ids: Vec<&FieldValue> = catalog.iter().map(|(id, _)| id).collect();
        ref_ids.sort();

        for ref_id in ref_ids {
            let Some(line) = catalog.single_line(ref_id) else {
                continue;
            };
            for w in line.windows(2) {
                let mid = (w[0] + w[1]) * 0.5;
                midpoints.push([mid.x, mid.y]);
                max_half_segment = max_half_segment.max(w[0].distance(w[1]) * 0.5);
                entries.push(SegmentEntry {
                    ref_id: ref_id.clone(),
                    a: w[0],
                    b: w[1],
                });
            }
        }

        Self {
            tree: (&midpoints).into(),
            entries,
            max_half_segment,
        }
    }

    /// Anzahl indexierter Segmente.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Gibt `true` zurück, wenn keine Segmente im Index liegen.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Nächstes Segment innerhalb `tolerance` um den Suchpunkt.
    pub fn nearest(&self, query: DVec2, tolerance: f64) -> Option<SegmentMatch> {
        self.nearest_filtered(query, tolerance, |_| true)
    }

    /// Nächstes Segment einer bestimmten Bezugslinie innerhalb `tolerance`.
    ///
    /// Snap-Filter für den zweiten Messpunkt: muss dasselbe Linien-Feature
    /// wie beim ersten Punkt sein.
    pub fn nearest_on_feature(
        &self,
        query: DVec2,
        ref_id: &FieldValue,
        tolerance: f64,
    ) -> Option<SegmentMatch> {
        self.nearest_filtered(query, tolerance, |entry| entry.ref_id == *ref_id)
    }

    fn nearest_filtered(
        &self,
        query: DVec2,
        tolerance: f64,
        accept: impl Fn(&SegmentEntry) -> bool,
    ) -> Option<SegmentMatch> {
        if self.is_empty() || tolerance < 0.0 {
            return None;
        }

        // Grober Vorfilter über Mittelpunkte, dann exakte Nachrechnung
        let radius = tolerance + self.max_half_segment;
        let mut best: Option<SegmentMatch> = None;

        for hit in self
            .tree
            .within::<SquaredEuclidean>(&[query.x, query.y], radius * radius)
        {
            let Some(entry) = self.entries.get(hit.item as usize) else {
                continue;
            };
            if !accept(entry) {
                continue;
            }
            let foot = closest_point_on_segment(query, entry.a, entry.b);
            let distance = query.distance(foot);
            if distance > tolerance {
                continue;
            }
            let better = match &best {
                Some(b) => distance < b.distance,
                None => true,
            };
            if better {
                best = Some(SegmentMatch {
                    ref_id: entry.ref_id.clone(),
                    point: foot,
                    distance,
                });
            }
        }

        best
    }
}
