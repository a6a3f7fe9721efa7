//! Layer- und Feld-Bindungen der Werkzeuge.
//!
//! Eine Bindung hält nur IDs und Feldnamen; geprüft und aufgelöst wird sie
//! ausschließlich im `check_settings`-Durchlauf.

/// Bindung des Bezugslinien-Layers (R).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceBinding {
    pub layer_id: String,
    /// Identitäts-Feld der Bezugslinien
    pub id_field: String,
}

/// Bindung des PoL-Daten-Layers (D).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolDataBinding {
    pub layer_id: String,
    pub pk_field: String,
    pub ref_field: String,
    pub m_field: String,
}

/// Bindung des LoL-Daten-Layers (D).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LolDataBinding {
    pub layer_id: String,
    pub pk_field: String,
    pub ref_field: String,
    pub m_from_field: String,
    pub m_to_field: String,
    pub offset_field: String,
}

/// Bindung des abgeleiteten Show-Layers (S), optional.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShowBinding {
    pub layer_id: String,
    /// Rückverweis-Feld: Wert entspricht `pk` des Daten-Layers
    pub back_ref_field: String,
}

/// Alle Bindungen des PoL-Werkzeugs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PolBindings {
    pub reference: Option<ReferenceBinding>,
    pub data: Option<PolDataBinding>,
    pub show: Option<ShowBinding>,
}

/// Alle Bindungen des LoL-Werkzeugs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LolBindings {
    pub reference: Option<ReferenceBinding>,
    pub data: Option<LolDataBinding>,
    pub show: Option<ShowBinding>,
}

impl PolBindings {
    /// Messen möglich (Bezugslinien-Layer gebunden)?
    pub fn can_measure(&self) -> bool {
        self.reference.is_some()
    }

    /// Digitalisieren möglich (Bezugs- und Daten-Layer gebunden)?
    pub fn can_digitize(&self) -> bool {
        self.reference.is_some() && self.data.is_some()
    }
}

impl LolBindings {
    /// Messen möglich (Bezugslinien-Layer gebunden)?
    pub fn can_measure(&self) -> bool {
        self.reference.is_some()
    }

    /// Digitalisieren möglich (Bezugs- und Daten-Layer gebunden)?
    pub fn can_digitize(&self) -> bool {
        self.reference.is_some() && self.data.is_some()
    }
}
