//! Abstrakter Host-Port: die schmale Oberfläche, über die die Engine mit
//! Canvas, Snap-Dienst, Layern, Formularen und Projektspeicher des Hosts
//! spricht.
//!
//! Der Kernel und die State-Machines hängen nur an diesen Traits; der
//! In-Memory-Host in [`memory`] erlaubt Tests ohne GIS-Anwendung.

pub mod canvas;
pub mod form;
pub mod memory;
pub mod messages;
pub mod project_store;
pub mod snap;
pub mod subscription;
pub mod vector_layer;

pub use canvas::{CanvasPort, CursorShape, KeyModifiers, MouseButton};
pub use form::{FormService, PendingEditsChoice};
pub use memory::{MemoryHost, MemoryLayer};
pub use messages::{MessageLevel, MessageSurface};
pub use project_store::ProjectStore;
pub use snap::{SnapHit, SnapService};
pub use subscription::{EventHub, Subscription};
pub use vector_layer::{
    Capabilities, Feature, FieldDef, LayerEvent, LayerEventKind, VectorLayerPort,
};

use crate::core::crs::Projection;

/// Gebündelter Zugriff auf alle Host-Oberflächen.
///
/// Die Zugriffe liefern kurzlebige Borrows; die Engine hält nie zwei
/// Oberflächen gleichzeitig.
pub trait HostPort {
    /// Canvas-Oberfläche.
    fn canvas(&mut self) -> &mut dyn CanvasPort;

    /// CRS der Display-Koordinaten (read-only Zugriff).
    fn display_crs(&self) -> crate::core::crs::Crs;

    /// Snap-Dienst.
    fn snap(&mut self) -> &mut dyn SnapService;

    /// Read-only Snap-Zugriff (Hover-Abfragen).
    fn snap_ref(&self) -> &dyn SnapService;

    /// Layer nach ID (mutabel, für Edit-Sessions).
    fn layer(&mut self, layer_id: &str) -> Option<&mut dyn VectorLayerPort>;

    /// Layer nach ID (read-only).
    fn layer_ref(&self, layer_id: &str) -> Option<&dyn VectorLayerPort>;

    /// Formular- und Dialog-Oberfläche.
    fn form(&mut self) -> &mut dyn FormService;

    /// Projektspeicher.
    fn store(&mut self) -> &mut dyn ProjectStore;

    /// Read-only Projektspeicher.
    fn store_ref(&self) -> &dyn ProjectStore;

    /// Meldungs-Oberfläche.
    fn messages(&mut self) -> &mut dyn MessageSurface;

    /// Projektions-Adapter.
    fn projection(&self) -> &dyn Projection;

    /// Ereignis-Verteiler für Layer-Signale.
    fn event_hub(&self) -> EventHub;
}
