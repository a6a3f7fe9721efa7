//! Abgeleitete Show-Geometrien: on-the-fly berechnete Darstellungs-Features
//! aus Datensatz + Bezugslinie.
//!
//! Der Offset-Zweig wird bei `offset == 0` oder NULL komplett umgangen —
//! die zugrunde liegende Geometrie-Bibliothek lieferte auf einer Plattform
//! für `offset_curve(linie, 0)` ein leeres Ergebnis; dieser Branch bleibt
//! deshalb erhalten.

use glam::DVec2;

use super::linref::{interpolate, offset_curve_with_samples, substring, OFFSET_ARC_SAMPLES};
use super::records::{FieldValue, LolRecord, PolRecord, RawLolRow, RawPolRow};
use super::reference::ReferenceCatalog;

/// Geometrie eines Show-Features.
#[derive(Debug, Clone, PartialEq)]
pub enum ShowGeometry {
    Point(DVec2),
    Line(Vec<DVec2>),
}

/// Show-Feature: abgeleitete Geometrie plus Rückverweis auf den Datensatz.
#[derive(Debug, Clone, PartialEq)]
pub struct ShowFeature {
    /// Rückverweis: entspricht dem `pk` des Datensatzes
    pub back_ref: FieldValue,
    pub geometry: ShowGeometry,
}

/// Leitet das PoL-Show-Feature ab.
///
/// `None` für fehlende, leere oder mehrteilige Bezugsgeometrie.
pub fn derive_pol(record: &PolRecord, catalog: &ReferenceCatalog) -> Option<ShowFeature> {
    let line = catalog.single_line(&record.ref_id)?;
    let point = interpolate(line, record.m)?;
    Some(ShowFeature {
        back_ref: record.pk.clone(),
        geometry: ShowGeometry::Point(point),
    })
}

/// Leitet das LoL-Show-Feature ab: `substring(min, max)`, danach
/// `offset_curve` falls `offset != 0`.
pub fn derive_lol(record: &LolRecord, catalog: &ReferenceCatalog) -> Option<ShowFeature> {
    derive_lol_with_samples(record, catalog, OFFSET_ARC_SAMPLES)
}

/// Wie [`derive_lol`], mit konfigurierbarer Bogen-Stützpunktzahl.
pub fn derive_lol_with_samples(
    record: &LolRecord,
    catalog: &ReferenceCatalog,
    arc_samples: usize,
) -> Option<ShowFeature> {
    let line = catalog.single_line(&record.ref_id)?;
    let (a, b) = record.measure_span();
    let sub = substring(line, a, b)?;

    let geometry = if record.offset == 0.0 {
        // Quirk-Branch: offset_curve wird bei 0 nie aufgerufen
        sub
    } else {
        offset_curve_with_samples(&sub, record.offset, arc_samples)?
    };

    Some(ShowFeature {
        back_ref: record.pk.clone(),
        geometry: ShowGeometry::Line(geometry),
    })
}

/// Ableitung direkt aus einer rohen PoL-Zeile (Anzeige-Pfad).
///
/// NULL-Stationierung schließt die Zeile aus.
pub fn derive_pol_raw(row: &RawPolRow, catalog: &ReferenceCatalog) -> Option<ShowFeature> {
    let record = PolRecord {
        pk: row.pk.clone(),
        ref_id: row.ref_id.clone()?,
        m: row.m?,
    };
    derive_pol(&record, catalog)
}

/// Ableitung direkt aus einer rohen LoL-Zeile (Anzeige-Pfad).
///
/// NULL-Stationierungen schließen die Zeile aus; NULL-Offset nimmt wie die
/// Ausgangs-View den Bypass-Zweig (`offset IS NULL ∨ offset == 0`).
pub fn derive_lol_raw(row: &RawLolRow, catalog: &ReferenceCatalog) -> Option<ShowFeature> {
    let record = LolRecord {
        pk: row.pk.clone(),
        ref_id: row.ref_id.clone()?,
        m_from: row.m_from?,
        m_to: row.m_to?,
        offset: row.offset.unwrap_or(0.0),
    };
    derive_lol(&record, catalog)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::crs::Crs;
    use crate::core::geom::total_length;
    use crate::core::reference::ReferenceGeometry;
    use approx::assert_relative_eq;

    fn catalog() -> ReferenceCatalog {
        let mut catalog = ReferenceCatalog::new(Crs::projected("EPSG:25832"));
        catalog.insert(
            FieldValue::Int(1),
            ReferenceGeometry::Single(vec![
                DVec2::new(0.0, 0.0),
                DVec2::new(100.0, 0.0),
                DVec2::new(100.0, 100.0),
            ]),
        );
        catalog.insert(
            FieldValue::Int(2),
            ReferenceGeometry::Multi(vec![vec![DVec2::new(0.0, 0.0), DVec2::new(10.0, 0.0)]]),
        );
        catalog
    }

    #[test]
    fn pol_show_feature_interpolates_point() {
        let record = PolRecord {
            pk: FieldValue::Int(7),
            ref_id: FieldValue::Int(1),
            m: 50.0,
        };
        let feature = derive_pol(&record, &catalog()).expect("Feature erwartet");
        assert_eq!(feature.back_ref, FieldValue::Int(7));
        assert_eq!(feature.geometry, ShowGeometry::Point(DVec2::new(50.0, 0.0)));
    }

    #[test]
    fn multi_part_reference_yields_no_show_feature() {
        let record = PolRecord {
            pk: FieldValue::Int(7),
            ref_id: FieldValue::Int(2),
            m: 5.0,
        };
        assert_eq!(derive_pol(&record, &catalog()), None);
    }

    #[test]
    fn lol_show_feature_normalizes_measures() {
        let record = LolRecord {
            pk: FieldValue::Int(8),
            ref_id: FieldValue::Int(1),
            m_from: 150.0,
            m_to: 50.0,
            offset: 0.0,
        };
        let feature = derive_lol(&record, &catalog()).expect("Feature erwartet");
        let ShowGeometry::Line(line) = feature.geometry else {
            panic!("Linie erwartet");
        };
        assert_eq!(line[0], DVec2::new(50.0, 0.0));
        assert_relative_eq!(total_length(&line), 100.0);
    }

    #[test]
    fn null_offset_takes_bypass_branch() {
        let row = RawLolRow {
            pk: FieldValue::Int(8),
            ref_id: Some(FieldValue::Int(1)),
            m_from: Some(50.0),
            m_to: Some(150.0),
            offset: None,
        };
        let feature = derive_lol_raw(&row, &catalog()).expect("Feature erwartet");
        let ShowGeometry::Line(line) = feature.geometry else {
            panic!("Linie erwartet");
        };
        // Bypass: identisch zum reinen Teilstück
        assert_eq!(line[0], DVec2::new(50.0, 0.0));
        assert_eq!(*line.last().unwrap(), DVec2::new(100.0, 50.0));
    }

    #[test]
    fn null_measure_excludes_row() {
        let row = RawPolRow {
            pk: FieldValue::Int(9),
            ref_id: Some(FieldValue::Int(1)),
            m: None,
        };
        assert_eq!(derive_pol_raw(&row, &catalog()), None);
    }
}
