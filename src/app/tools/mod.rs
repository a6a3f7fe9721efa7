//! Werkzeug-State-Machines der beiden Mess-Varianten.

pub mod lol;
pub mod pol;

use glam::DVec2;

use crate::core::records::FieldValue;
use crate::host::canvas::KeyModifiers;
use crate::shared::GEOGRAPHIC_STEP;

pub use lol::{LolDrag, LolDragTarget, LolMeasure, LolMode, LolTool};
pub use pol::{PolMeasure, PolMode, PolTool};

/// Werkzeug-Variante.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolKind {
    /// Point-on-Line
    Pol,
    /// Line-on-Line
    Lol,
}

/// Ziel-Feld der Stationierungs-Arithmetik.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeasureTarget {
    /// `m` (PoL) bzw. `m_from` (LoL)
    From,
    /// `m_to` (nur LoL)
    To,
}

/// Richtung eines Arithmetik-Schritts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepDirection {
    Increase,
    Decrease,
}

/// Laufendes Koordinaten-/Stationierungs-Feedback während des Messens.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasureFeedback {
    /// Gesnappte Position in Display-Koordinaten
    pub display_point: DVec2,
    /// Fußpunkt in Bezugslinien-Koordinaten
    pub ref_point: DVec2,
    /// Provider-fid des getroffenen Features
    pub fid: i64,
    /// `id_field`-Wert des getroffenen Features
    pub ref_id: FieldValue,
    /// Stationierung des Fußpunkts
    pub m: f64,
}

/// Schrittweite der Stationierungs-Arithmetik.
///
/// Basis 1 Einheit (geographische CRS: `1e-4` Grad), multipliziert mit
/// 10/100/1000 bei Ctrl/Shift/beiden.
pub fn step_size(geographic: bool, modifiers: KeyModifiers) -> f64 {
    let base = if geographic { GEOGRAPHIC_STEP } else { 1.0 };
    let factor = match (modifiers.ctrl, modifiers.shift) {
        (false, false) => 1.0,
        (true, false) => 10.0,
        (false, true) => 100.0,
        (true, true) => 1000.0,
    };
    base * factor
}

#[cfg(test)]
mod step_tests {
    use super::*;

    #[test]
    fn step_size_scales_with_modifiers() {
        assert_eq!(step_size(false, KeyModifiers::NONE), 1.0);
        assert_eq!(step_size(false, KeyModifiers::CTRL), 10.0);
        assert_eq!(step_size(false, KeyModifiers::SHIFT), 100.0);
        assert_eq!(
            step_size(
                false,
                KeyModifiers {
                    shift: true,
                    ctrl: true
                }
            ),
            1000.0
        );
    }

    #[test]
    fn geographic_crs_uses_small_base_step() {
        assert_eq!(step_size(true, KeyModifiers::NONE), 1e-4);
        assert_eq!(step_size(true, KeyModifiers::CTRL), 1e-3);
    }
}
