//! Stationierungs-Kernel: interpolate, locate, substring, offset_curve.
//!
//! Alle Operationen sind deterministisch und arbeiten ausschließlich in den
//! Koordinaten der Bezugslinie (x/y, kein Display-CRS).

use glam::DVec2;

use super::error::EngineError;
use super::geom::{
    closest_point_on_segment, cumulative_lengths, segment_length, side_of_segment, total_length,
};

use cavalier_contours::polyline::{PlineSource, PlineSourceMut, PlineVertex, Polyline};


/// Stützpunkte pro Bogen-Join beim Tessellieren von Offset-Kurven.
pub const OFFSET_ARC_SAMPLES: usize = 8;

/// Ergebnis von [`locate`]: Lotfußpunkt mit Stationierung und Seitenlage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocatedPoint {
    /// Stationierung des Fußpunkts (Abstand vom Linienanfang)
    pub m: f64,
    /// Fußpunkt auf der Linie
    pub point: DVec2,
    /// Euklidischer Abstand Abfragepunkt → Fußpunkt
    pub distance: f64,
    /// Index des Segments, auf dem der Fußpunkt liegt
    pub segment: usize,
    /// Seitenlage des Abfragepunkts (+1 links, -1 rechts, 0 auf der Linie)
    pub side: i8,
}

/// Punkt auf der Linie bei Stationierung `m`.
///
/// `m` wird auf `[0, Gesamtlänge]` geklemmt. Bei Stationierungen exakt auf
/// einem Vertex gewinnt das frühere Segment.
pub fn interpolate(line: &[DVec2], m: f64) -> Option<DVec2> {
    if line.len() < 2 {
        return None;
    }

    let total = total_length(line);
    let m = m.clamp(0.0, total);

    let mut acc = 0.0;
    for w in line.windows(2) {
        let seg_len = segment_length(w[0], w[1]);
        if seg_len <= 0.0 {
            continue;
        }
        if acc + seg_len >= m {
            let t = (m - acc) / seg_len;
            return Some(w[0].lerp(w[1], t));
        }
        acc += seg_len;
    }

    // Nur erreichbar wenn alle Rest-Segmente degeneriert sind
    line.last().copied()
}

/// Stationierung des linien-nächsten Punkts zu `p`.
///
/// Pro Segment wird der geklemmte Lotfußpunkt berechnet; das Segment mit dem
/// kleinsten Abstand gewinnt, bei Gleichstand das mit dem niedrigeren Index.
/// `None` für degenerierte Linien (Gesamtlänge 0) — Aufrufer müssen das
/// vorab ausschließen.
pub fn locate(line: &[DVec2], p: DVec2) -> Option<LocatedPoint> {
    if line.len() < 2 || total_length(line) <= 0.0 {
        return None;
    }

    let cum = cumulative_lengths(line);
    let mut best: Option<LocatedPoint> = None;

    for (i, w) in line.windows(2).enumerate() {
        let foot = closest_point_on_segment(p, w[0], w[1]);
        let distance = p.distance(foot);

        let better = match &best {
            Some(b) => distance < b.distance,
            None => true,
        };
        if better {
            best = Some(LocatedPoint {
                m: cum[i] + w[0].distance(foot),
                point: foot,
                distance,
                segment: i,
                side: side_of_segment(p, w[0], w[1]),
            });
        }
    }

    best
}

/// Teilstück der Linie zwischen zwei Stationierungen.
///
/// `m_from`/`m_to` werden normalisiert (min/max) und auf `[0, Gesamtlänge]`
/// geklemmt. Bei `a == b` entsteht eine degenerierte Zwei-Punkt-Linie am
/// interpolierten Punkt (Aufrufer behandeln das als leer). Innere
/// Original-Vertices mit kumulierter Länge strikt zwischen `a` und `b`
/// bleiben in Reihenfolge erhalten.
pub fn substring(line: &[DVec2], m_from: f64, m_to: f64) -> Option<Vec<DVec2>> {
    if line.len() < 2 {
        return None;
    }

    let total = total_length(line);
    let a = m_from.min(m_to).clamp(0.0, total);
    let b = m_from.max(m_to).clamp(0.0, total);

    let start = interpolate(line, a)?;
    if a == b {
        return Some(vec![start, start]);
    }
    let end = interpolate(line, b)?;

    let cum = cumulative_lengths(line);
    let mut result = Vec::with_capacity(line.len() + 2);
    result.push(start);
    for (i, v) in line.iter().enumerate() {
        if cum[i] > a && cum[i] < b {
            result.push(*v);
        }
    }
    result.push(end);

    Some(result)
}

/// Parallele Kurve im Abstand `d`.
///
/// `d > 0`: links der Digitalisier-Richtung, `d < 0`: rechts, `d == 0`:
/// Identität (Vertex-Anzahl und -Positionen bleiben erhalten). Ecken werden
/// mit Bogen-Joins gerundet und anschließend tesselliert.
pub fn offset_curve(line: &[DVec2], d: f64) -> Option<Vec<DVec2>> {
    offset_curve_with_samples(line, d, OFFSET_ARC_SAMPLES)
}

/// Wie [`offset_curve`], mit konfigurierbarer Stützpunktzahl pro Bogen-Join.
pub fn offset_curve_with_samples(line: &[DVec2], d: f64, arc_samples: usize) -> Option<Vec<DVec2>> {
    if line.len() < 2 {
        return None;
    }
    if d == 0.0 {
        return Some(line.to_vec());
    }

    let mut pline = Polyline::new();
    for v in line {
        pline.add_vertex(PlineVertex::new(v.x, v.y, 0.0));
    }

    // cavalier_contours: positiver Offset liegt links der Segmentrichtung,
    // identisch zur Vorzeichen-Konvention der Stationierung
    let offsets = pline.parallel_offset(d);
    if offsets.is_empty() {
        return None;
    }

    let mut best: Option<Vec<DVec2>> = None;
    let mut best_len = -1.0;
    for part in &offsets {
        let tessellated = tessellate_pline(part, arc_samples.max(2));
        let len = total_length(&tessellated);
        if len > best_len {
            best_len = len;
            best = Some(tessellated);
        }
    }
    best.filter(|v| v.len() >= 2)
}

/// Wandelt eine cavalier-Polyline mit Bulge-Bögen in eine reine
/// Vertex-Polyline um (Bögen werden mit `arc_samples` Stützpunkten abgetastet).
fn tessellate_pline(pline: &Polyline<f64>, arc_samples: usize) -> Vec<DVec2> {
    let verts = &pline.vertex_data;
    let mut result = Vec::with_capacity(verts.len() * 2);

    for (i, v1) in verts.iter().enumerate() {
        result.push(DVec2::new(v1.x, v1.y));

        if i + 1 >= verts.len() {
            break;
        }
        let v2 = &verts[i + 1];
        if v1.bulge.abs() <= 1e-12 {
            continue;
        }

        // Bulge-Bogen: Mittelpunkt und Winkel rekonstruieren,
        // b = tan(sweep/4), sweep > 0 = gegen den Uhrzeigersinn
        let chord = DVec2::new(v2.x - v1.x, v2.y - v1.y);
        let chord_len = chord.length();
        if chord_len <= 1e-12 {
            continue;
        }
        let sweep = 4.0 * v1.bulge.atan();
        let radius = chord_len / (2.0 * (sweep / 2.0).sin());
        let dist_to_center = radius.abs() * (sweep.abs() / 2.0).cos();
        let mid = DVec2::new((v1.x + v2.x) / 2.0, (v1.y + v2.y) / 2.0);
        let normal = DVec2::new(-chord.y, chord.x) / chord_len;
        let sign = if v1.bulge > 0.0 { 1.0 } else { -1.0 };
        let center = mid + normal * dist_to_center * sign;

        let start_angle = (DVec2::new(v1.x, v1.y) - center).to_angle();
        for j in 1..arc_samples {
            let t = j as f64 / arc_samples as f64;
            let angle = start_angle + sweep * t;
            result.push(center + DVec2::from_angle(angle) * radius.abs());
        }
    }

    result
}

/// Punkt auf einer m-bewussten Linie, lokalisiert über die m-Vertex-Werte.
///
/// Precondition: m-Werte strikt aufsteigend entlang der Linie; Verletzung
/// ist ein früher Fehler, kein stilles Falsch-Ergebnis. `m` außerhalb des
/// Wertebereichs wird auf den ersten/letzten Vertex geklemmt.
pub fn interpolate_by_vertex_m(
    vertices: &[(DVec2, f64)],
    m: f64,
) -> Result<DVec2, EngineError> {
    if vertices.len() < 2 {
        return Err(EngineError::EmptyReference(String::from("<m-aware>")));
    }
    for i in 1..vertices.len() {
        if vertices[i].1 <= vertices[i - 1].1 {
            return Err(EngineError::NonMonotonicM(i));
        }
    }

    let first = vertices[0];
    let last = vertices[vertices.len() - 1];
    if m <= first.1 {
        return Ok(first.0);
    }
    if m >= last.1 {
        return Ok(last.0);
    }

    for w in vertices.windows(2) {
        let (p0, m0) = w[0];
        let (p1, m1) = w[1];
        if m <= m1 {
            let t = (m - m0) / (m1 - m0);
            return Ok(p0.lerp(p1, t));
        }
    }

    Ok(last.0)
}

/// Teilstück plus optionaler Parallel-Versatz in einem Schritt.
///
/// Entspricht der Ableitungs-Kette der Show-Geometrie: erst `substring`,
/// dann `offset_curve` — wobei `offset == 0` den Offset-Zweig komplett
/// umgeht (Plattform-Eigenheit der Vorlage, siehe `core/show.rs`).
pub fn segment_geom(
    line: &[DVec2],
    m_from: f64,
    m_to: f64,
    offset: f64,
) -> Option<Vec<DVec2>> {
    let sub = substring(line, m_from, m_to)?;
    if offset == 0.0 {
        return Some(sub);
    }
    offset_curve(&sub, offset)
}
