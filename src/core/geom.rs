//! Reine Geometrie-Primitiven für Polylinien.
//!
//! Layer-neutral: wird vom Stationierungs-Kernel, den Validatoren und dem
//! Spatial-Index importiert ohne Zirkel-Abhängigkeiten zu erzeugen.

use glam::DVec2;

/// Euklidische Länge eines einzelnen Segments.
pub fn segment_length(a: DVec2, b: DVec2) -> f64 {
    a.distance(b)
}

/// Gesamtlänge einer Polyline.
pub fn total_length(line: &[DVec2]) -> f64 {
    line.windows(2).map(|w| w[0].distance(w[1])).sum()
}

/// Kumulierte Längen bis zu jedem Vertex (erster Eintrag 0.0, Länge == `line.len()`).
pub fn cumulative_lengths(line: &[DVec2]) -> Vec<f64> {
    let mut result = Vec::with_capacity(line.len());
    let mut acc = 0.0;
    result.push(0.0);
    for w in line.windows(2) {
        acc += w[0].distance(w[1]);
        result.push(acc);
    }
    result
}

/// Seitenlage eines Punkts relativ zum Segment a→b.
///
/// Vorzeichen des 2D-Kreuzprodukts `(b-a) × (p-a)`:
/// `+1` = links in Digitalisier-Richtung, `-1` = rechts, `0` = auf der Geraden.
pub fn side_of_segment(p: DVec2, a: DVec2, b: DVec2) -> i8 {
    let cross = (b - a).perp_dot(p - a);
    if cross > 0.0 {
        1
    } else if cross < 0.0 {
        -1
    } else {
        0
    }
}

/// Lotfußpunkt von `p` auf das Segment a→b, auf das Segment geklemmt.
pub fn closest_point_on_segment(p: DVec2, a: DVec2, b: DVec2) -> DVec2 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq <= f64::EPSILON {
        // Degeneriertes Segment: beide Vertices identisch
        return a;
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    a + ab * t
}
