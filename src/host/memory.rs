//! Vollständiger In-Memory-Host: Layer mit Edit-Sessions, KD-Tree-Snapping,
//! skriptbare Dialog-Antworten, gesammelte Meldungen.
//!
//! Damit ist die Engine ohne GIS-Anwendung ausführbar und testbar; die
//! Integrationstests treiben den Controller ausschließlich über diesen Host.

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, BTreeSet};
use std::rc::Rc;

use glam::DVec2;

use crate::core::crs::{Crs, IdentityProjection, Projection};
use crate::core::error::EngineError;
use crate::core::records::FieldValue;
use crate::core::reference::{ReferenceCatalog, ReferenceGeometry};
use crate::core::spatial::SegmentIndex;

use super::canvas::{CanvasPort, CursorShape};
use super::form::{FormService, PendingEditsChoice};
use super::messages::{MessageLevel, MessageSurface};
use super::project_store::ProjectStore;
use super::snap::{SnapHit, SnapService};
use super::subscription::EventHub;
use super::vector_layer::{
    Capabilities, Feature, FieldDef, LayerEvent, LayerEventKind, VectorLayerPort,
};
use super::HostPort;

/// Feste Pixel-Toleranz, mit der die Engine das Host-Snapping konfiguriert.
pub const SNAP_TOLERANCE_PX: f64 = 10.0;

// ── Canvas ──────────────────────────────────────────────────────────

/// Canvas-Attrappe: protokolliert Cursor und Repaint-Anforderungen.
pub struct MemoryCanvas {
    pub cursor: CursorShape,
    pub repaints: usize,
    crs: Crs,
}

impl MemoryCanvas {
    fn new(crs: Crs) -> Self {
        Self {
            cursor: CursorShape::Arrow,
            repaints: 0,
            crs,
        }
    }
}

impl CanvasPort for MemoryCanvas {
    fn set_cursor(&mut self, shape: CursorShape) {
        self.cursor = shape;
    }

    fn request_repaint(&mut self) {
        self.repaints += 1;
    }

    fn display_crs(&self) -> Crs {
        self.crs.clone()
    }
}

// ── Layer ───────────────────────────────────────────────────────────

#[derive(Default)]
struct EditSession {
    added: BTreeMap<i64, Feature>,
    updated: BTreeMap<i64, Feature>,
    deleted: BTreeSet<i64>,
}

impl EditSession {
    fn is_empty(&self) -> bool {
        self.added.is_empty() && self.updated.is_empty() && self.deleted.is_empty()
    }
}

/// In-Memory-Vektor-Layer mit transaktionaler Edit-Session.
pub struct MemoryLayer {
    id: String,
    name: String,
    crs: Crs,
    fields: Vec<FieldDef>,
    caps: Capabilities,
    committed: BTreeMap<i64, Feature>,
    next_fid: i64,
    session: Option<EditSession>,
    /// Test-Haken: nächster Commit schlägt mit Provider-Fehler fehl
    pub fail_next_commit: bool,
    hub: Option<EventHub>,
    revision: Option<Rc<Cell<u64>>>,
}

impl MemoryLayer {
    /// Erstellt einen leeren Layer.
    pub fn new(id: &str, name: &str, crs: Crs, fields: Vec<FieldDef>, caps: Capabilities) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            crs,
            fields,
            caps,
            committed: BTreeMap::new(),
            next_fid: 1,
            session: None,
            fail_next_commit: false,
            hub: None,
            revision: None,
        }
    }

    /// Fügt ein Feature direkt in den committeten Bestand ein (Fixture-Aufbau,
    /// keine Edit-Session nötig). Liefert die vergebene fid.
    pub fn seed_feature(&mut self, mut feature: Feature) -> i64 {
        let fid = self.next_fid;
        self.next_fid += 1;
        feature.fid = fid;
        self.committed.insert(fid, feature);
        self.bump_revision();
        fid
    }

    fn bump_revision(&self) {
        if let Some(rev) = &self.revision {
            rev.set(rev.get() + 1);
        }
    }

    fn require_session(&mut self) -> Result<&mut EditSession, EngineError> {
        self.session
            .as_mut()
            .ok_or_else(|| EngineError::CommitFailed(String::from("Keine Edit-Session aktiv")))
    }
}

impl VectorLayerPort for MemoryLayer {
    fn layer_id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn crs(&self) -> Crs {
        self.crs.clone()
    }

    fn fields(&self) -> Vec<FieldDef> {
        self.fields.clone()
    }

    fn capabilities(&self) -> Capabilities {
        self.caps
    }

    fn features(&self) -> Vec<Feature> {
        let mut view: BTreeMap<i64, Feature> = self.committed.clone();
        if let Some(session) = &self.session {
            for (fid, f) in &session.added {
                view.insert(*fid, f.clone());
            }
            for (fid, f) in &session.updated {
                view.insert(*fid, f.clone());
            }
            for fid in &session.deleted {
                view.remove(fid);
            }
        }
        view.into_values().collect()
    }

    fn feature_by_fid(&self, fid: i64) -> Option<Feature> {
        self.features().into_iter().find(|f| f.fid == fid)
    }

    fn features_by_field_value(&self, field: &str, value: &FieldValue) -> Vec<Feature> {
        self.features()
            .into_iter()
            .filter(|f| f.key_value(field).as_ref() == Some(value))
            .collect()
    }

    fn is_editing(&self) -> bool {
        self.session.is_some()
    }

    fn has_pending_changes(&self) -> bool {
        self.session.as_ref().is_some_and(|s| !s.is_empty())
    }

    fn start_edit(&mut self) -> Result<(), EngineError> {
        if self.session.is_none() {
            self.session = Some(EditSession::default());
        }
        Ok(())
    }

    fn add_feature(&mut self, mut feature: Feature) -> Result<i64, EngineError> {
        if !self.caps.can_add {
            return Err(EngineError::CommitFailed(String::from(
                "Provider erlaubt kein Hinzufügen",
            )));
        }
        let fid = self.next_fid;
        self.next_fid += 1;
        feature.fid = fid;
        self.require_session()?.added.insert(fid, feature);
        Ok(fid)
    }

    fn update_feature(&mut self, feature: Feature) -> Result<(), EngineError> {
        if !self.caps.can_update {
            return Err(EngineError::CommitFailed(String::from(
                "Provider erlaubt kein Aktualisieren",
            )));
        }
        let fid = feature.fid;
        let known = self.committed.contains_key(&fid)
            || self
                .session
                .as_ref()
                .is_some_and(|s| s.added.contains_key(&fid));
        if !known {
            return Err(EngineError::CommitFailed(format!(
                "Feature {fid} nicht vorhanden"
            )));
        }
        let session = self.require_session()?;
        if session.added.contains_key(&fid) {
            session.added.insert(fid, feature);
        } else {
            session.updated.insert(fid, feature);
        }
        Ok(())
    }

    fn delete_feature(&mut self, fid: i64) -> Result<(), EngineError> {
        if !self.caps.can_delete {
            return Err(EngineError::CommitFailed(String::from(
                "Provider erlaubt kein Löschen",
            )));
        }
        let session = self.require_session()?;
        if session.added.remove(&fid).is_none() {
            session.deleted.insert(fid);
        }
        Ok(())
    }

    fn commit(&mut self) -> Result<(), EngineError> {
        if self.session.is_none() {
            return Ok(());
        }
        if self.fail_next_commit {
            self.fail_next_commit = false;
            // Session bleibt offen; der Aufrufer rollt zurück
            return Err(EngineError::CommitFailed(String::from(
                "Provider-Fehler beim Schreiben",
            )));
        }

        let session = self.session.take().unwrap_or_default();
        for (fid, f) in session.added {
            self.committed.insert(fid, f);
        }
        for (fid, f) in session.updated {
            self.committed.insert(fid, f);
        }
        for fid in session.deleted {
            self.committed.remove(&fid);
        }
        self.bump_revision();

        if let Some(hub) = &self.hub {
            hub.emit(LayerEvent {
                layer_id: self.id.clone(),
                kind: LayerEventKind::CommitFinished,
            });
        }
        Ok(())
    }

    fn rollback(&mut self) -> Result<(), EngineError> {
        self.session = None;
        Ok(())
    }
}

// ── Formulare & Dialoge ─────────────────────────────────────────────

/// Skriptbare Formular-/Dialog-Antworten plus Protokoll.
pub struct MemoryFormService {
    /// Antwort des modalen Feature-Formulars
    pub confirm_feature_forms: bool,
    /// Antwort der Ja/Nein-Dialoge
    pub confirm_answer: bool,
    /// Antwort bei offenen Fremd-Änderungen
    pub pending_edits_choice: PendingEditsChoice,
    /// Protokollierte Dialog-Fragen
    pub questions: Vec<String>,
    /// Anzahl geöffneter Feature-Formulare
    pub opened_forms: usize,
}

impl Default for MemoryFormService {
    fn default() -> Self {
        Self {
            confirm_feature_forms: true,
            confirm_answer: true,
            pending_edits_choice: PendingEditsChoice::Commit,
            questions: Vec::new(),
            opened_forms: 0,
        }
    }
}

impl FormService for MemoryFormService {
    fn open_feature_form(&mut self, _layer_id: &str, _feature: &Feature) -> bool {
        self.opened_forms += 1;
        self.confirm_feature_forms
    }

    fn confirm(&mut self, question: &str) -> bool {
        self.questions.push(question.to_string());
        self.confirm_answer
    }

    fn ask_pending_edits(&mut self, layer_name: &str) -> PendingEditsChoice {
        self.questions
            .push(format!("Offene Änderungen in '{layer_name}'"));
        self.pending_edits_choice
    }
}

// ── Projektspeicher ─────────────────────────────────────────────────

/// In-Memory Key/Value-Projektspeicher.
#[derive(Default)]
pub struct MemoryProjectStore {
    entries: BTreeMap<(String, String), String>,
    /// Anzahl der Dirty-Markierungen
    pub dirty_count: usize,
}

impl ProjectStore for MemoryProjectStore {
    fn read(&self, namespace: &str, key: &str) -> Option<String> {
        self.entries
            .get(&(namespace.to_string(), key.to_string()))
            .cloned()
    }

    fn write(&mut self, namespace: &str, key: &str, value: &str) {
        self.entries
            .insert((namespace.to_string(), key.to_string()), value.to_string());
    }

    fn remove(&mut self, namespace: &str, key: &str) {
        self.entries
            .remove(&(namespace.to_string(), key.to_string()));
    }

    fn keys(&self, namespace: &str) -> Vec<String> {
        self.entries
            .keys()
            .filter(|(ns, _)| ns == namespace)
            .map(|(_, key)| key.clone())
            .collect()
    }

    fn set_dirty(&mut self) {
        self.dirty_count += 1;
    }
}

// ── Meldungen ───────────────────────────────────────────────────────

/// Gesammelte Meldungen für Test-Assertions.
#[derive(Default)]
pub struct MemoryMessages {
    pub entries: Vec<(MessageLevel, String)>,
}

impl MemoryMessages {
    /// Anzahl Meldungen eines Levels.
    pub fn count_of(&self, level: MessageLevel) -> usize {
        self.entries.iter().filter(|(l, _)| *l == level).count()
    }

    /// Enthält eine Meldung das Fragment?
    pub fn contains(&self, fragment: &str) -> bool {
        self.entries.iter().any(|(_, text)| text.contains(fragment))
    }
}

impl MessageSurface for MemoryMessages {
    fn push(&mut self, level: MessageLevel, text: &str) {
        log::debug!("Meldung [{level:?}]: {text}");
        self.entries.push((level, text.to_string()));
    }
}

// ── Snap-Zustand ────────────────────────────────────────────────────

struct SnapState {
    configured_layer: Option<String>,
    tolerance_px: f64,
    segment_snapping: bool,
    endpoint_snapping: bool,
    /// Cache: (Layer-Revision, Index in Display-Koordinaten)
    cache: RefCell<Option<(u64, SegmentIndex)>>,
}

impl Default for SnapState {
    fn default() -> Self {
        Self {
            configured_layer: None,
            tolerance_px: SNAP_TOLERANCE_PX,
            segment_snapping: false,
            endpoint_snapping: false,
            cache: RefCell::new(None),
        }
    }
}

// ── Host ────────────────────────────────────────────────────────────

/// In-Memory-Host: bündelt alle Oberflächen hinter [`HostPort`].
pub struct MemoryHost {
    pub canvas: MemoryCanvas,
    pub form: MemoryFormService,
    pub store: MemoryProjectStore,
    pub messages: MemoryMessages,
    layers: BTreeMap<String, MemoryLayer>,
    hub: EventHub,
    projection: Box<dyn Projection>,
    snap_state: SnapState,
    revision: Rc<Cell<u64>>,
}

impl MemoryHost {
    /// Host mit Identitäts-Projektion (Display-CRS == Layer-CRS).
    pub fn new(display_crs: Crs) -> Self {
        Self::with_projection(display_crs, Box::new(IdentityProjection))
    }

    /// Host mit expliziter Projektion.
    pub fn with_projection(display_crs: Crs, projection: Box<dyn Projection>) -> Self {
        Self {
            canvas: MemoryCanvas::new(display_crs),
            form: MemoryFormService::default(),
            store: MemoryProjectStore::default(),
            messages: MemoryMessages::default(),
            layers: BTreeMap::new(),
            hub: EventHub::new(),
            projection,
            snap_state: SnapState::default(),
            revision: Rc::new(Cell::new(0)),
        }
    }

    /// Nimmt einen Layer in das Projekt auf.
    pub fn add_layer(&mut self, mut layer: MemoryLayer) {
        layer.hub = Some(self.hub.clone());
        layer.revision = Some(Rc::clone(&self.revision));
        self.layers.insert(layer.id.clone(), layer);
        self.revision.set(self.revision.get() + 1);
    }

    /// Konkreter Layer-Zugriff für Fixtures und Assertions.
    pub fn memory_layer(&self, layer_id: &str) -> Option<&MemoryLayer> {
        self.layers.get(layer_id)
    }

    /// Konkreter mutierender Layer-Zugriff für Fixtures.
    pub fn memory_layer_mut(&mut self, layer_id: &str) -> Option<&mut MemoryLayer> {
        self.layers.get_mut(layer_id)
    }

    /// Entfernt einen Layer aus dem Projekt (Host-seitiges Layer-Löschen).
    pub fn remove_layer(&mut self, layer_id: &str) -> bool {
        let removed = self.layers.remove(layer_id).is_some();
        if removed {
            self.revision.set(self.revision.get() + 1);
        }
        removed
    }

    /// Reicht ein Host-Signal in den Ereignis-Verteiler ein.
    pub fn emit(&self, event: LayerEvent) {
        self.hub.emit(event);
    }

    /// Ist Segment- + Endpunkt-Snapping für den Layer konfiguriert?
    pub fn snapping_configured_for(&self, layer_id: &str) -> bool {
        self.snap_state.configured_layer.as_deref() == Some(layer_id)
            && self.snap_state.segment_snapping
            && self.snap_state.endpoint_snapping
    }

    fn snap_index(&self) -> Option<std::cell::Ref<'_, SegmentIndex>> {
        let layer_id = self.snap_state.configured_layer.clone()?;
        let layer = self.layers.get(&layer_id)?;
        let revision = self.revision.get();

        {
            let cache = self.snap_state.cache.borrow();
            let stale = !matches!(&*cache, Some((rev, _)) if *rev == revision);
            if stale {
                drop(cache);
                let index = self.build_snap_index(layer);
                *self.snap_state.cache.borrow_mut() = Some((revision, index));
            }
        }

        Some(std::cell::Ref::map(
            self.snap_state.cache.borrow(),
            |cache| match cache {
                Some((_, index)) => index,
                None => unreachable!("Cache soeben gefüllt"),
            },
        ))
    }

    /// Baut den Snap-Index in Display-Koordinaten, Schlüssel = Provider-fid.
    fn build_snap_index(&self, layer: &MemoryLayer) -> SegmentIndex {
        let display_crs = self.canvas.crs.clone();
        let layer_crs = layer.crs.clone();
        let mut catalog = ReferenceCatalog::new(display_crs.clone());

        for feature in layer.features() {
            let Some(geometry) = &feature.geometry else {
                continue;
            };
            let transformed = match geometry {
                ReferenceGeometry::Single(line) => self
                    .projection
                    .transform_line(line, &layer_crs, &display_crs)
                    .map(ReferenceGeometry::Single),
                ReferenceGeometry::Multi(parts) => parts
                    .iter()
                    .map(|p| self.projection.transform_line(p, &layer_crs, &display_crs))
                    .collect::<Result<Vec<_>, _>>()
                    .map(ReferenceGeometry::Multi),
            };
            match transformed {
                Ok(geom) => catalog.insert(FieldValue::Int(feature.fid), geom),
                Err(e) => log::warn!("Snap-Index: Feature {} übersprungen: {e}", feature.fid),
            }
        }

        SegmentIndex::from_catalog(&catalog)
    }
}

impl SnapService for MemoryHost {
    fn snap_to_layer(&self, pos: DVec2) -> Option<SnapHit> {
        let tolerance = self.snap_state.tolerance_px;
        let index = self.snap_index()?;
        let hit = index.nearest(pos, tolerance)?;
        let FieldValue::Int(fid) = hit.ref_id else {
            return None;
        };
        Some(SnapHit {
            point: hit.point,
            fid,
        })
    }

    fn snap_to_feature(&self, pos: DVec2, fid: i64) -> Option<SnapHit> {
        let tolerance = self.snap_state.tolerance_px;
        let index = self.snap_index()?;
        let hit = index.nearest_on_feature(pos, &FieldValue::Int(fid), tolerance)?;
        Some(SnapHit {
            point: hit.point,
            fid,
        })
    }

    fn configure_for_reference_layer(&mut self, layer_id: &str) {
        self.snap_state.configured_layer = Some(layer_id.to_string());
        self.snap_state.segment_snapping = true;
        self.snap_state.endpoint_snapping = true;
        self.snap_state.tolerance_px = SNAP_TOLERANCE_PX;
        *self.snap_state.cache.borrow_mut() = None;
        log::info!("Snapping konfiguriert für Layer '{layer_id}' (Segment + Endpunkt)");
    }
}

impl HostPort for MemoryHost {
    fn canvas(&mut self) -> &mut dyn CanvasPort {
        &mut self.canvas
    }

    fn display_crs(&self) -> Crs {
        self.canvas.crs.clone()
    }

    fn snap(&mut self) -> &mut dyn SnapService {
        self
    }

    fn snap_ref(&self) -> &dyn SnapService {
        self
    }

    fn layer(&mut self, layer_id: &str) -> Option<&mut dyn VectorLayerPort> {
        self.layers
            .get_mut(layer_id)
            .map(|l| l as &mut dyn VectorLayerPort)
    }

    fn layer_ref(&self, layer_id: &str) -> Option<&dyn VectorLayerPort> {
        self.layers
            .get(layer_id)
            .map(|l| l as &dyn VectorLayerPort)
    }

    fn form(&mut self) -> &mut dyn FormService {
        &mut self.form
    }

    fn store(&mut self) -> &mut dyn ProjectStore {
        &mut self.store
    }

    fn store_ref(&self) -> &dyn ProjectStore {
        &self.store
    }

    fn messages(&mut self) -> &mut dyn MessageSurface {
        &mut self.messages
    }

    fn projection(&self) -> &dyn Projection {
        self.projection.as_ref()
    }

    fn event_hub(&self) -> EventHub {
        self.hub.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::records::{AttrValue, FieldType};

    fn line_layer() -> MemoryLayer {
        let mut layer = MemoryLayer::new(
            "ref_layer",
            "Bezugslinien",
            Crs::projected("EPSG:25832"),
            vec![FieldDef {
                name: "id".to_string(),
                field_type: FieldType::Int64,
            }],
            Capabilities::READ_ONLY,
        );
        layer.seed_feature(
            Feature::new(0)
                .with_attr("id", Some(AttrValue::Int(1)))
                .with_geometry(ReferenceGeometry::Single(vec![
                    DVec2::new(0.0, 0.0),
                    DVec2::new(100.0, 0.0),
                ])),
        );
        layer
    }

    #[test]
    fn snap_requires_configuration() {
        let mut host = MemoryHost::new(Crs::projected("EPSG:25832"));
        host.add_layer(line_layer());
        assert_eq!(host.snap_to_layer(DVec2::new(50.0, 2.0)), None);

        host.configure_for_reference_layer("ref_layer");
        let hit = host
            .snap_to_layer(DVec2::new(50.0, 2.0))
            .expect("Treffer erwartet");
        assert_eq!(hit.point, DVec2::new(50.0, 0.0));
        assert!(host.snapping_configured_for("ref_layer"));
    }

    #[test]
    fn snap_cache_follows_layer_edits() {
        let mut host = MemoryHost::new(Crs::projected("EPSG:25832"));
        host.add_layer(line_layer());
        host.configure_for_reference_layer("ref_layer");
        assert!(host.snap_to_layer(DVec2::new(50.0, 2.0)).is_some());

        // Neue Linie weit weg vom bisherigen Bestand
        let layer = host.memory_layer_mut("ref_layer").unwrap();
        layer.seed_feature(
            Feature::new(0)
                .with_attr("id", Some(AttrValue::Int(2)))
                .with_geometry(ReferenceGeometry::Single(vec![
                    DVec2::new(0.0, 1000.0),
                    DVec2::new(100.0, 1000.0),
                ])),
        );

        let hit = host
            .snap_to_layer(DVec2::new(50.0, 995.0))
            .expect("Treffer auf neuer Linie erwartet");
        assert_eq!(hit.point, DVec2::new(50.0, 1000.0));
    }

    #[test]
    fn edit_session_commits_and_rolls_back() {
        let mut layer = MemoryLayer::new(
            "data",
            "Daten",
            Crs::projected("EPSG:25832"),
            vec![],
            Capabilities::FULL,
        );
        layer.start_edit().unwrap();
        let fid = layer
            .add_feature(Feature::new(0).with_attr("m", Some(AttrValue::Real(5.0))))
            .unwrap();
        assert!(layer.has_pending_changes());
        assert_eq!(layer.features().len(), 1);

        layer.rollback().unwrap();
        assert!(layer.features().is_empty());

        layer.start_edit().unwrap();
        let fid2 = layer
            .add_feature(Feature::new(0).with_attr("m", Some(AttrValue::Real(7.0))))
            .unwrap();
        layer.commit().unwrap();
        assert!(!layer.is_editing());
        assert_eq!(layer.features().len(), 1);
        assert_ne!(fid, fid2);
    }

    #[test]
    fn failed_commit_keeps_session_open() {
        let mut layer = MemoryLayer::new(
            "data",
            "Daten",
            Crs::projected("EPSG:25832"),
            vec![],
            Capabilities::FULL,
        );
        layer.fail_next_commit = true;
        layer.start_edit().unwrap();
        layer.add_feature(Feature::new(0)).unwrap();

        assert!(layer.commit().is_err());
        assert!(layer.is_editing());

        layer.rollback().unwrap();
        assert!(layer.features().is_empty());
    }

    #[test]
    fn commit_emits_layer_event_for_subscribers() {
        let mut host = MemoryHost::new(Crs::projected("EPSG:25832"));
        host.add_layer(MemoryLayer::new(
            "data",
            "Daten",
            Crs::projected("EPSG:25832"),
            vec![],
            Capabilities::FULL,
        ));
        let hub = host.event_hub();
        let _sub = hub.subscribe("data");

        let layer = host.memory_layer_mut("data").unwrap();
        layer.start_edit().unwrap();
        layer.add_feature(Feature::new(0)).unwrap();
        layer.commit().unwrap();

        let events = hub.drain();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, LayerEventKind::CommitFinished);
    }
}
