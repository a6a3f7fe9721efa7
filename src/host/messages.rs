//! Meldungs-Oberfläche des Hosts (Message-Bar).

/// Dringlichkeit einer Meldung.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Warning,
    Critical,
}

/// Vom Host bereitgestellte Meldungs-Oberfläche.
pub trait MessageSurface {
    /// Zeigt eine Meldung an.
    fn push(&mut self, level: MessageLevel, text: &str);
}
