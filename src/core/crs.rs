//! Projektions-Adapter zwischen Display- und Bezugslinien-Koordinaten.
//!
//! Der Kernel rechnet ausschließlich im CRS der Bezugslinie; jede Grenze zum
//! Host-Canvas läuft über [`Projection::transform_point`].

use glam::DVec2;

use super::error::EngineError;

/// Koordinatenreferenzsystem, identifiziert über die Authority-ID.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Crs {
    /// Authority-ID, z.B. "EPSG:25832"
    pub auth_id: String,
    /// Geographisches CRS (Grad statt Meter): beeinflusst die Schrittweite
    /// der Stationierungs-Arithmetik
    pub geographic: bool,
}

impl Crs {
    /// Projiziertes CRS (metrische Einheiten).
    pub fn projected(auth_id: &str) -> Self {
        Self {
            auth_id: auth_id.to_string(),
            geographic: false,
        }
    }

    /// Geographisches CRS (Grad-Einheiten).
    pub fn geographic(auth_id: &str) -> Self {
        Self {
            auth_id: auth_id.to_string(),
            geographic: true,
        }
    }
}

/// Transformation zwischen zwei Koordinatenreferenzsystemen.
///
/// Die konkrete Implementierung stellt der Host; die Engine kennt nur diese
/// Schnittstelle.
pub trait Projection {
    /// Transformiert einen Punkt von `from` nach `to`.
    fn transform_point(&self, p: DVec2, from: &Crs, to: &Crs) -> Result<DVec2, EngineError>;

    /// Transformiert eine Polyline von `from` nach `to`.
    fn transform_line(
        &self,
        line: &[DVec2],
        from: &Crs,
        to: &Crs,
    ) -> Result<Vec<DVec2>, EngineError> {
        line.iter()
            .map(|p| self.transform_point(*p, from, to))
            .collect()
    }
}

/// Identitäts-Projektion: Display- und Bezugs-CRS sind identisch.
#[derive(Debug, Default)]
pub struct IdentityProjection;

impl Projection for IdentityProjection {
    fn transform_point(&self, p: DVec2, _from: &Crs, _to: &Crs) -> Result<DVec2, EngineError> {
        Ok(p)
    }
}

/// Planare Skalierungs-Projektion zwischen genau zwei CRS.
///
/// Test-Implementierung: `a → b` multipliziert mit `factor`, `b → a`
/// dividiert. Reicht aus, um zu prüfen dass der Kernel nie
/// Display-Koordinaten sieht.
#[derive(Debug)]
pub struct PlanarScaleProjection {
    a: Crs,
    b: Crs,
    factor: f64,
}

impl PlanarScaleProjection {
    /// Erstellt eine Skalierungs-Projektion `a → b` mit Faktor `factor`.
    pub fn new(a: Crs, b: Crs, factor: f64) -> Self {
        Self { a, b, factor }
    }
}

impl Projection for PlanarScaleProjection {
    fn transform_point(&self, p: DVec2, from: &Crs, to: &Crs) -> Result<DVec2, EngineError> {
        if from == to {
            Ok(p)
        } else if *from == self.a && *to == self.b {
            Ok(p * self.factor)
        } else if *from == self.b && *to == self.a {
            Ok(p / self.factor)
        } else {
            Err(EngineError::ProjectionFailed(format!(
                "{} → {}",
                from.auth_id, to.auth_id
            )))
        }
    }
}
