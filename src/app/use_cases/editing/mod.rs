//! Editier-Befehle auf dem Daten-Layer: Einfügen, Aktualisieren, Löschen.
//!
//! Jeder Befehl läuft in drei Phasen (Pre-Check, Transaktion, Post-Effekte)
//! und ist bei Fehlern idempotent: jede Provider-Ausnahme rollt die
//! Edit-Session zurück und meldet den Fehler.

mod common;
mod delete;
mod insert;
mod update;

pub use common::{resolve_pending_edits, PendingOutcome};
pub use delete::delete;
pub use insert::insert;
pub use update::update;
