//! Zentrale Darstellungs- und Laufzeit-Optionen der Mess-Werkzeuge.
//!
//! `ToolStyle` enthält alle zur Laufzeit änderbaren Werte pro Werkzeug.
//! Die `const`-Werte bleiben als Fallback/Default erhalten. Persistiert wird
//! als flache String-Map im Projektspeicher des Hosts.

use serde::{Deserialize, Serialize};

// ── Rubber-Band-Darstellung ────────────────────────────────────────

/// Standard-Farbe des Mess-Punkts (Hex-String, RGB).
pub const POINT_COLOR: &str = "#FF0000";
/// Standard-Farbe des Mess-Segments.
pub const LINE_COLOR: &str = "#00FF00";
/// Punkt-Symbolgröße in Screen-Pixeln.
pub const POINT_SIZE_PX: f64 = 10.0;
/// Linienstärke des Segments in Screen-Pixeln.
pub const LINE_WIDTH_PX: f64 = 2.0;

// ── Interaktion ─────────────────────────────────────────────────────

/// Griff-Radius in Screen-Pixeln: Press innerhalb dieses Radius packt den
/// Mess-Punkt bzw. einen Segment-Endpunkt.
pub const HANDLE_TOLERANCE_PX: f64 = 12.0;
/// Nachkommastellen der Stationierungs-Anzeige.
pub const MEASURE_PRECISION: usize = 2;
/// Basis-Schrittweite der Stationierungs-Arithmetik in geographischen CRS.
pub const GEOGRAPHIC_STEP: f64 = 1e-4;

/// Alle zur Laufzeit änderbaren Darstellungs-Optionen eines Werkzeugs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolStyle {
    /// Farbe des Mess-Punkts (Hex-String)
    pub point_color: String,
    /// Farbe des Mess-Segments (Hex-String)
    pub line_color: String,
    /// Punkt-Symbolgröße in Screen-Pixeln
    pub point_size_px: f64,
    /// Linienstärke in Screen-Pixeln
    pub line_width_px: f64,
    /// Griff-Radius in Screen-Pixeln
    pub handle_tolerance_px: f64,
    /// Nachkommastellen der Stationierungs-Anzeige
    pub measure_precision: usize,
    /// Stützpunkte pro Bogen-Join der Offset-Kurven
    pub offset_arc_samples: usize,
}

impl Default for ToolStyle {
    fn default() -> Self {
        Self {
            point_color: POINT_COLOR.to_string(),
            line_color: LINE_COLOR.to_string(),
            point_size_px: POINT_SIZE_PX,
            line_width_px: LINE_WIDTH_PX,
            handle_tolerance_px: HANDLE_TOLERANCE_PX,
            measure_precision: MEASURE_PRECISION,
            offset_arc_samples: crate::core::linref::OFFSET_ARC_SAMPLES,
        }
    }
}

impl ToolStyle {
    /// Serialisiert alle Werte als flache Schlüssel/Wert-Paare.
    pub fn to_entries(&self) -> Vec<(String, String)> {
        vec![
            ("pointColor".to_string(), self.point_color.clone()),
            ("lineColor".to_string(), self.line_color.clone()),
            ("pointSizePx".to_string(), self.point_size_px.to_string()),
            ("lineWidthPx".to_string(), self.line_width_px.to_string()),
            (
                "handleTolerancePx".to_string(),
                self.handle_tolerance_px.to_string(),
            ),
            (
                "measurePrecision".to_string(),
                self.measure_precision.to_string(),
            ),
            (
                "offsetArcSamples".to_string(),
                self.offset_arc_samples.to_string(),
            ),
        ]
    }

    /// Übernimmt einen einzelnen Schlüssel/Wert; unbekannte Schlüssel und
    /// unparsbare Werte werden ignoriert (Abwärtskompatibilität).
    pub fn apply_entry(&mut self, key: &str, value: &str) {
        match key {
            "pointColor" => self.point_color = value.to_string(),
            "lineColor" => self.line_color = value.to_string(),
            "pointSizePx" => {
                if let Ok(v) = value.parse() {
                    self.point_size_px = v;
                }
            }
            "lineWidthPx" => {
                if let Ok(v) = value.parse() {
                    self.line_width_px = v;
                }
            }
            "handleTolerancePx" => {
                if let Ok(v) = value.parse() {
                    self.handle_tolerance_px = v;
                }
            }
            "measurePrecision" => {
                if let Ok(v) = value.parse() {
                    self.measure_precision = v;
                }
            }
            "offsetArcSamples" => {
                if let Ok(v) = value.parse() {
                    self.offset_arc_samples = v;
                }
            }
            _ => {}
        }
    }

    /// Baut einen Style aus flachen Schlüssel/Wert-Paaren (fehlende
    /// Schlüssel behalten die Standardwerte).
    pub fn from_entries<'a>(entries: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let mut style = Self::default();
        for (key, value) in entries {
            style.apply_entry(key, value);
        }
        style
    }
}
