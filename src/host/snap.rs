//! Snap-Dienst des Hosts.

use glam::DVec2;

/// Snap-Treffer: Punkt in Display-Koordinaten plus getroffenes Feature.
///
/// Der Dienst liefert die Provider-Feature-ID; den `id_field`-Wert löst die
/// Engine anschließend selbst über den Layer auf.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapHit {
    /// Gesnappte Position in Display-Koordinaten
    pub point: DVec2,
    /// Provider-Feature-ID des getroffenen Features
    pub fid: i64,
}

/// Vom Host bereitgestellter Snap-Dienst.
pub trait SnapService {
    /// Snappt auf den konfigurierten Bezugslinien-Layer.
    fn snap_to_layer(&self, pos: DVec2) -> Option<SnapHit>;

    /// Snappt auf ein bestimmtes Feature des Bezugslinien-Layers.
    ///
    /// Filter für den zweiten Messpunkt: muss dasselbe Linien-Feature wie
    /// beim ersten Punkt sein.
    fn snap_to_feature(&self, pos: DVec2, fid: i64) -> Option<SnapHit>;

    /// Konfiguriert die prozessweiten Snap-Einstellungen des Hosts für den
    /// Bezugslinien-Layer: Segment- plus Endpunkt-Snapping, feste
    /// Pixel-Toleranz.
    ///
    /// Bekannter Seiteneffekt: die Einstellungen werden beim Entbinden
    /// nicht zurückgesetzt.
    fn configure_for_reference_layer(&mut self, layer_id: &str);
}
