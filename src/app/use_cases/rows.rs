//! Zugriff auf die rohen Datenzeilen des Daten-Layers (D).

use crate::app::bindings::{LolDataBinding, PolDataBinding};
use crate::core::records::{AttrValue, FieldType, FieldValue, RawLolRow, RawPolRow};
use crate::host::vector_layer::{Feature, VectorLayerPort};

/// Liest eine PoL-Zeile aus einem Feature (None ohne pk).
pub fn pol_row_from_feature(feature: &Feature, binding: &PolDataBinding) -> Option<RawPolRow> {
    let pk = feature.key_value(&binding.pk_field)?;
    Some(RawPolRow {
        pk,
        ref_id: feature.key_value(&binding.ref_field),
        m: feature.number(&binding.m_field),
    })
}

/// Liest eine LoL-Zeile aus einem Feature (None ohne pk).
pub fn lol_row_from_feature(feature: &Feature, binding: &LolDataBinding) -> Option<RawLolRow> {
    let pk = feature.key_value(&binding.pk_field)?;
    Some(RawLolRow {
        pk,
        ref_id: feature.key_value(&binding.ref_field),
        m_from: feature.number(&binding.m_from_field),
        m_to: feature.number(&binding.m_to_field),
        offset: feature.number(&binding.offset_field),
    })
}

/// Alle PoL-Zeilen des Layers mit Provider-fid.
pub fn read_pol_rows(
    layer: &dyn VectorLayerPort,
    binding: &PolDataBinding,
) -> Vec<(i64, RawPolRow)> {
    layer
        .features()
        .iter()
        .filter_map(|f| pol_row_from_feature(f, binding).map(|r| (f.fid, r)))
        .collect()
}

/// Alle LoL-Zeilen des Layers mit Provider-fid.
pub fn read_lol_rows(
    layer: &dyn VectorLayerPort,
    binding: &LolDataBinding,
) -> Vec<(i64, RawLolRow)> {
    layer
        .features()
        .iter()
        .filter_map(|f| lol_row_from_feature(f, binding).map(|r| (f.fid, r)))
        .collect()
}

/// Sucht eine PoL-Zeile nach pk.
pub fn find_pol_row(
    layer: &dyn VectorLayerPort,
    binding: &PolDataBinding,
    pk: &FieldValue,
) -> Option<(i64, RawPolRow)> {
    layer
        .features_by_field_value(&binding.pk_field, pk)
        .first()
        .and_then(|f| pol_row_from_feature(f, binding).map(|r| (f.fid, r)))
}

/// Sucht eine LoL-Zeile nach pk.
pub fn find_lol_row(
    layer: &dyn VectorLayerPort,
    binding: &LolDataBinding,
    pk: &FieldValue,
) -> Option<(i64, RawLolRow)> {
    layer
        .features_by_field_value(&binding.pk_field, pk)
        .first()
        .and_then(|f| lol_row_from_feature(f, binding).map(|r| (f.fid, r)))
}

/// Nächster Primärschlüssel: `max(bestehende) + 1`, sonst `1`.
///
/// Bei Text-Feldern wird der numerische Anteil hochgezählt und als String
/// geschrieben.
pub fn next_pk(layer: &dyn VectorLayerPort, pk_field: &str, pk_type: FieldType) -> FieldValue {
    let max = layer
        .features()
        .iter()
        .filter_map(|f| match f.key_value(pk_field) {
            Some(FieldValue::Int(v)) => Some(v),
            Some(FieldValue::Str(s)) => s.parse::<i64>().ok(),
            None => None,
        })
        .max()
        .unwrap_or(0);

    if pk_type.is_integer() {
        FieldValue::Int(max + 1)
    } else {
        FieldValue::Str((max + 1).to_string())
    }
}

/// Schlüsselwert als Attributwert des Features.
pub fn key_to_attr(value: &FieldValue) -> AttrValue {
    AttrValue::from(value.clone())
}
