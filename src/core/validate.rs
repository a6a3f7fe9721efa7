//! Zeilen-Validierung der Datensätze gegen den Bezugslinien-Katalog.
//!
//! Asymmetrie der Bereichs-Prüfung (beabsichtigt, muss erhalten bleiben):
//! Benutzereingaben werden beim Speichern geklemmt und gemeldet, importierte
//! Zeilen werden nur markiert, nie verändert.

use super::error::EngineError;
use super::records::{LolRecord, PolRecord, RawLolRow, RawPolRow};
use super::reference::ReferenceCatalog;

/// Ergebnis einer Zeilen-Prüfung.
#[derive(Debug, Clone, PartialEq)]
pub enum Validity {
    /// Zeile in Ordnung
    Valid,
    /// Stationierung außerhalb `[0, Länge]`: beim Update durch Klemmen
    /// reparierbar, bei Anzeige nur markiert
    OutOfRange,
    /// Mehrteilige Bezugsgeometrie: gültige Zeile ohne abgeleitete Geometrie
    MultiPart,
    /// Harter Fehler (fehlende Referenz, leere Geometrie, NULL-Pflichtfeld)
    Error(EngineError),
}

impl Validity {
    /// Bleibt die Zeile in der Arbeits-Selektion?
    pub fn keeps_selection(&self) -> bool {
        matches!(self, Validity::Valid | Validity::OutOfRange | Validity::MultiPart)
    }
}

/// Klemmt eine Stationierung auf `[0, length]`; liefert den Wert und ob
/// geklemmt wurde.
pub fn clamp_measure(m: f64, length: f64) -> (f64, bool) {
    let clamped = m.clamp(0.0, length.max(0.0));
    (clamped, clamped != m)
}

fn check_reference(
    ref_id: &Option<super::records::FieldValue>,
    catalog: &ReferenceCatalog,
) -> Result<ReferenceState, EngineError> {
    let Some(ref_id) = ref_id else {
        return Err(EngineError::NullMeasure("ref_id"));
    };
    let Some(geom) = catalog.get(ref_id) else {
        return Err(EngineError::ReferenceNotFound(ref_id.to_string()));
    };
    if geom.is_empty() {
        return Err(EngineError::EmptyReference(ref_id.to_string()));
    }
    if geom.is_multi_part() {
        return Ok(ReferenceState::MultiPart);
    }
    Ok(ReferenceState::Measurable { length: geom.length() })
}

enum ReferenceState {
    Measurable { length: f64 },
    MultiPart,
}

/// Prüft eine rohe PoL-Zeile gegen den Katalog.
pub fn validate_pol(row: &RawPolRow, catalog: &ReferenceCatalog) -> Validity {
    let reference = match check_reference(&row.ref_id, catalog) {
        Ok(state) => state,
        Err(e) => return Validity::Error(e),
    };
    let Some(m) = row.m else {
        return Validity::Error(EngineError::NullMeasure("m"));
    };

    match reference {
        ReferenceState::MultiPart => Validity::MultiPart,
        ReferenceState::Measurable { length } => {
            if m < 0.0 || m > length {
                Validity::OutOfRange
            } else {
                Validity::Valid
            }
        }
    }
}

/// Prüft eine rohe LoL-Zeile gegen den Katalog.
pub fn validate_lol(row: &RawLolRow, catalog: &ReferenceCatalog) -> Validity {
    let reference = match check_reference(&row.ref_id, catalog) {
        Ok(state) => state,
        Err(e) => return Validity::Error(e),
    };
    let Some(m_from) = row.m_from else {
        return Validity::Error(EngineError::NullMeasure("m"));
    };
    let Some(m_to) = row.m_to else {
        return Validity::Error(EngineError::NullMeasure("m_to"));
    };
    if row.offset.is_none() {
        return Validity::Error(EngineError::NullMeasure("offset"));
    }

    match reference {
        ReferenceState::MultiPart => Validity::MultiPart,
        ReferenceState::Measurable { length } => {
            if m_from < 0.0 || m_from > length || m_to < 0.0 || m_to > length {
                Validity::OutOfRange
            } else {
                Validity::Valid
            }
        }
    }
}

/// Repariert eine PoL-Zeile durch Klemmen (nur für den Update-Pfad).
///
/// Liefert den validierten Datensatz und ob geklemmt wurde.
pub fn repair_pol(row: &RawPolRow, catalog: &ReferenceCatalog) -> Option<(PolRecord, bool)> {
    let ref_id = row.ref_id.clone()?;
    let length = catalog.single_line(&ref_id).map(super::geom::total_length)?;
    let (m, clamped) = clamp_measure(row.m?, length);
    Some((
        PolRecord {
            pk: row.pk.clone(),
            ref_id,
            m,
        },
        clamped,
    ))
}

/// Repariert eine LoL-Zeile durch Klemmen (nur für den Update-Pfad).
pub fn repair_lol(row: &RawLolRow, catalog: &ReferenceCatalog) -> Option<(LolRecord, bool)> {
    let ref_id = row.ref_id.clone()?;
    let length = catalog.single_line(&ref_id).map(super::geom::total_length)?;
    let (m_from, clamped_from) = clamp_measure(row.m_from?, length);
    let (m_to, clamped_to) = clamp_measure(row.m_to?, length);
    Some((
        LolRecord {
            pk: row.pk.clone(),
            ref_id,
            m_from,
            m_to,
            offset: row.offset?,
        },
        clamped_from || clamped_to,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::crs::Crs;
    use crate::core::records::FieldValue;
    use crate::core::reference::ReferenceGeometry;
    use glam::DVec2;

    fn catalog() -> ReferenceCatalog {
        let mut catalog = ReferenceCatalog::new(Crs::projected("EPSG:25832"));
        catalog.insert(
            FieldValue::Int(1),
            ReferenceGeometry::Single(vec![DVec2::new(0.0, 0.0), DVec2::new(200.0, 0.0)]),
        );
        catalog.insert(
            FieldValue::Int(2),
            ReferenceGeometry::Multi(vec![
                vec![DVec2::new(0.0, 0.0), DVec2::new(10.0, 0.0)],
                vec![DVec2::new(20.0, 0.0), DVec2::new(30.0, 0.0)],
            ]),
        );
        catalog.insert(FieldValue::Int(3), ReferenceGeometry::Single(vec![]));
        catalog
    }

    fn pol(ref_id: i64, m: Option<f64>) -> RawPolRow {
        RawPolRow {
            pk: FieldValue::Int(10),
            ref_id: Some(FieldValue::Int(ref_id)),
            m,
        }
    }

    #[test]
    fn valid_row_passes() {
        assert_eq!(validate_pol(&pol(1, Some(50.0)), &catalog()), Validity::Valid);
    }

    #[test]
    fn unresolved_reference_is_an_error() {
        assert_eq!(
            validate_pol(&pol(99, Some(50.0)), &catalog()),
            Validity::Error(EngineError::ReferenceNotFound("99".into()))
        );
    }

    #[test]
    fn empty_geometry_is_an_error() {
        assert_eq!(
            validate_pol(&pol(3, Some(0.0)), &catalog()),
            Validity::Error(EngineError::EmptyReference("3".into()))
        );
    }

    #[test]
    fn null_measure_is_an_error() {
        assert_eq!(
            validate_pol(&pol(1, None), &catalog()),
            Validity::Error(EngineError::NullMeasure("m"))
        );
    }

    #[test]
    fn out_of_range_measure_is_repairable() {
        assert_eq!(validate_pol(&pol(1, Some(1000.0)), &catalog()), Validity::OutOfRange);

        let (record, clamped) = repair_pol(&pol(1, Some(1000.0)), &catalog()).unwrap();
        assert_eq!(record.m, 200.0);
        assert!(clamped);

        let (record, clamped) = repair_pol(&pol(1, Some(50.0)), &catalog()).unwrap();
        assert_eq!(record.m, 50.0);
        assert!(!clamped);
    }

    #[test]
    fn multi_part_reference_is_flagged_not_rejected() {
        let verdict = validate_pol(&pol(2, Some(5.0)), &catalog());
        assert_eq!(verdict, Validity::MultiPart);
        assert!(verdict.keeps_selection());
    }

    #[test]
    fn lol_row_requires_all_fields() {
        let row = RawLolRow {
            pk: FieldValue::Int(20),
            ref_id: Some(FieldValue::Int(1)),
            m_from: Some(10.0),
            m_to: Some(40.0),
            offset: None,
        };
        assert_eq!(
            validate_lol(&row, &catalog()),
            Validity::Error(EngineError::NullMeasure("offset"))
        );

        let row = RawLolRow {
            offset: Some(0.0),
            ..row
        };
        assert_eq!(validate_lol(&row, &catalog()), Validity::Valid);
    }
}
