//! Core-Domänentypen: Geometrie-Primitiven, Stationierungs-Kernel,
//! Datensätze, Bezugslinien-Katalog, Validatoren, Show-Ableitung.

pub mod crs;
pub mod error;
pub mod geom;
/// Stationierungs-Kernel
///
/// Dieses Modul definiert die vier Kern-Operationen:
/// - interpolate: Punkt auf der Linie bei Stationierung m
/// - locate: Stationierung des linien-nächsten Punkts
/// - substring: Teilstück zwischen zwei Stationierungen
/// - offset_curve: Parallele Kurve im signierten Abstand
pub mod linref;
pub mod records;
pub mod reference;
pub mod show;
pub mod spatial;
pub mod validate;

pub use crs::{Crs, IdentityProjection, PlanarScaleProjection, Projection};
pub use error::EngineError;
pub use linref::{interpolate, locate, offset_curve, segment_geom, substring, LocatedPoint};
pub use records::{
    types_compatible, AttrValue, FieldType, FieldValue, LolRecord, PolRecord, RawLolRow, RawPolRow,
};
pub use reference::{ReferenceCatalog, ReferenceGeometry};
pub use show::{ShowFeature, ShowGeometry};
pub use spatial::{SegmentIndex, SegmentMatch};
pub use validate::{clamp_measure, validate_lol, validate_pol, Validity};
