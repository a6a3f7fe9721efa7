//! Canvas-/MapTool-Oberfläche des Hosts.

use crate::core::crs::Crs;

/// Cursor-Formen, die die Engine auf dem Host-Canvas setzen kann.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorShape {
    Arrow,
    Cross,
    OpenHand,
    ClosedHand,
}

/// Maustaste eines Canvas-Events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Tasten-Modifikatoren eines Canvas-Events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeyModifiers {
    pub shift: bool,
    pub ctrl: bool,
}

impl KeyModifiers {
    /// Keine Modifikatoren.
    pub const NONE: KeyModifiers = KeyModifiers {
        shift: false,
        ctrl: false,
    };

    /// Nur Shift.
    pub const SHIFT: KeyModifiers = KeyModifiers {
        shift: true,
        ctrl: false,
    };

    /// Nur Ctrl.
    pub const CTRL: KeyModifiers = KeyModifiers {
        shift: false,
        ctrl: true,
    };
}

/// Vom Host bereitgestellte Canvas-Oberfläche.
///
/// Alle Event-Positionen kommen in Display-Koordinaten an; die Engine
/// transformiert an dieser Grenze über den Projektions-Adapter.
pub trait CanvasPort {
    /// Setzt die Cursor-Form.
    fn set_cursor(&mut self, shape: CursorShape);

    /// Fordert ein Neuzeichnen an (Show-Layer, Rubber-Bands).
    fn request_repaint(&mut self);

    /// CRS der Display-Koordinaten.
    fn display_crs(&self) -> Crs;
}
