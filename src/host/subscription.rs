//! Besitzende Abo-Handles für Layer-Signale.
//!
//! Jede Bindung hält ihre Abos als Objekte; beim Rebinding oder Teardown
//! werden sie gedroppt und damit garantiert abgemeldet — keine verschluckten
//! Disconnect-Fehler, keine Doppel-Zustellung.

use std::cell::RefCell;
use std::collections::{BTreeMap, VecDeque};
use std::rc::{Rc, Weak};

use super::vector_layer::LayerEvent;

#[derive(Default)]
struct HubInner {
    next_id: u64,
    /// Aktive Abos: Abo-ID → Layer-ID
    active: BTreeMap<u64, String>,
    /// Serialisierte Ereignisse in Ankunftsreihenfolge
    queue: VecDeque<LayerEvent>,
}

/// Verteiler für Layer-Ereignisse des Hosts.
///
/// Ereignisse werden nur eingereiht, wenn mindestens ein aktives Abo auf den
/// Layer besteht, und in Ankunftsreihenfolge wieder entnommen.
#[derive(Clone, Default)]
pub struct EventHub {
    inner: Rc<RefCell<HubInner>>,
}

impl EventHub {
    /// Erstellt einen leeren Hub.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registriert ein Abo auf einen Layer; das Handle meldet beim Drop ab.
    pub fn subscribe(&self, layer_id: &str) -> Subscription {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.active.insert(id, layer_id.to_string());
        Subscription {
            hub: Rc::downgrade(&self.inner),
            id,
        }
    }

    /// Reiht ein Ereignis ein, falls ein aktives Abo auf den Layer besteht.
    pub fn emit(&self, event: LayerEvent) {
        let mut inner = self.inner.borrow_mut();
        if inner.active.values().any(|l| *l == event.layer_id) {
            inner.queue.push_back(event);
        }
    }

    /// Entnimmt alle anstehenden Ereignisse in Ankunftsreihenfolge.
    pub fn drain(&self) -> Vec<LayerEvent> {
        self.inner.borrow_mut().queue.drain(..).collect()
    }

    /// Anzahl aktiver Abos.
    pub fn active_count(&self) -> usize {
        self.inner.borrow().active.len()
    }
}

/// Besitzendes Abo-Handle; Abmeldung beim Drop garantiert.
pub struct Subscription {
    hub: Weak<RefCell<HubInner>>,
    id: u64,
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(inner) = self.hub.upgrade() {
            inner.borrow_mut().active.remove(&self.id);
        }
    }
}
