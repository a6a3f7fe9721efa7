//! Key/Value-Projektspeicher des Hosts.
//!
//! Alle Werte sind Strings; die Engine legt ihre Konfigurationen unter einem
//! werkzeug-spezifischen Namespace ab.

/// Vom Host bereitgestellter Projektspeicher.
pub trait ProjectStore {
    /// Liest einen Wert.
    fn read(&self, namespace: &str, key: &str) -> Option<String>;

    /// Schreibt einen Wert.
    fn write(&mut self, namespace: &str, key: &str, value: &str);

    /// Entfernt einen Eintrag.
    fn remove(&mut self, namespace: &str, key: &str);

    /// Alle Schlüssel eines Namespace (für die Enumeration gespeicherter
    /// Konfigurationen).
    fn keys(&self, namespace: &str) -> Vec<String>;

    /// Markiert das Projekt als geändert.
    fn set_dirty(&mut self);
}
