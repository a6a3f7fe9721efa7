//! Werte- und Typ-Modell der Datensätze: Schlüsselwerte, Attributwerte,
//! Feldtypen mit Typklassen-Regel und die validierten Datensatz-Formen.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Schlüsselwert für `pk` und `ref_id`: Integer bevorzugt, String erlaubt.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FieldValue {
    Int(i64),
    Str(String),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Int(v) => write!(f, "{v}"),
            FieldValue::Str(v) => write!(f, "{v}"),
        }
    }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        FieldValue::Int(v)
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        FieldValue::Str(v.to_string())
    }
}

/// Attributwert eines Features (nullable über `Option<AttrValue>`).
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    Int(i64),
    Real(f64),
    Str(String),
}

impl AttrValue {
    /// Numerischer Wert, falls Integer oder Real.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AttrValue::Int(v) => Some(*v as f64),
            AttrValue::Real(v) => Some(*v),
            AttrValue::Str(_) => None,
        }
    }

    /// Schlüsselwert, falls als `pk`/`ref_id` verwendbar.
    pub fn as_key(&self) -> Option<FieldValue> {
        match self {
            AttrValue::Int(v) => Some(FieldValue::Int(*v)),
            AttrValue::Str(v) => Some(FieldValue::Str(v.clone())),
            AttrValue::Real(_) => None,
        }
    }
}

impl From<FieldValue> for AttrValue {
    fn from(v: FieldValue) -> Self {
        match v {
            FieldValue::Int(i) => AttrValue::Int(i),
            FieldValue::Str(s) => AttrValue::Str(s),
        }
    }
}

/// Feldtyp im Layer-Schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldType {
    Int16,
    Int32,
    Int64,
    Double,
    Text,
}

impl FieldType {
    /// Gehört der Typ zur Integer-Familie?
    pub fn is_integer(&self) -> bool {
        matches!(self, FieldType::Int16 | FieldType::Int32 | FieldType::Int64)
    }
}

/// Typklassen-Regel der Feld-Bindungen: die Integer-Familie zählt als eine
/// Klasse, alle anderen Typen müssen exakt übereinstimmen.
pub fn types_compatible(a: FieldType, b: FieldType) -> bool {
    (a.is_integer() && b.is_integer()) || a == b
}

/// Validierter Point-on-Line-Datensatz.
#[derive(Debug, Clone, PartialEq)]
pub struct PolRecord {
    pub pk: FieldValue,
    pub ref_id: FieldValue,
    pub m: f64,
}

/// Validierter Line-on-Line-Datensatz.
#[derive(Debug, Clone, PartialEq)]
pub struct LolRecord {
    pub pk: FieldValue,
    pub ref_id: FieldValue,
    pub m_from: f64,
    pub m_to: f64,
    pub offset: f64,
}

impl LolRecord {
    /// Normalisierte Stationierungen (min, max).
    pub fn measure_span(&self) -> (f64, f64) {
        (self.m_from.min(self.m_to), self.m_from.max(self.m_to))
    }
}

/// Rohe Datenzeile (PoL) vor der Validierung: Felder nullable.
#[derive(Debug, Clone, PartialEq)]
pub struct RawPolRow {
    pub pk: FieldValue,
    pub ref_id: Option<FieldValue>,
    pub m: Option<f64>,
}

/// Rohe Datenzeile (LoL) vor der Validierung: Felder nullable.
#[derive(Debug, Clone, PartialEq)]
pub struct RawLolRow {
    pub pk: FieldValue,
    pub ref_id: Option<FieldValue>,
    pub m_from: Option<f64>,
    pub m_to: Option<f64>,
    pub offset: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_family_is_one_type_class() {
        assert!(types_compatible(FieldType::Int16, FieldType::Int64));
        assert!(types_compatible(FieldType::Int32, FieldType::Int32));
        assert!(!types_compatible(FieldType::Int32, FieldType::Text));
        assert!(!types_compatible(FieldType::Double, FieldType::Int64));
        assert!(types_compatible(FieldType::Text, FieldType::Text));
    }

    #[test]
    fn attr_value_key_conversion() {
        assert_eq!(AttrValue::Int(7).as_key(), Some(FieldValue::Int(7)));
        assert_eq!(
            AttrValue::Str("a".into()).as_key(),
            Some(FieldValue::Str("a".into()))
        );
        assert_eq!(AttrValue::Real(1.5).as_key(), None);
    }
}
