// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Session lifecycle gate.
//!
//! `AwaitingSource -> Editable -> Locked`. Locked is terminal until the
//! session is reset, which returns it to `AwaitingSource`.

/// Lifecycle state of a crop session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    AwaitingSource,
    Editable,
    Locked,
}

/// Guards whether interaction and export are permitted.
#[derive(Debug, Default)]
pub struct SessionGate {
    state: SessionState,
}

impl SessionGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Source metadata is known. Returns false when the gate refuses the
    /// transition (a locked session must be reset first).
    pub fn source_ready(&mut self) -> bool {
        match self.state {
            SessionState::AwaitingSource | SessionState::Editable => {
                self.state = SessionState::Editable;
                true
            }
            SessionState::Locked => false,
        }
    }

    /// An export succeeded; nothing more may be edited.
    pub fn export_succeeded(&mut self) {
        if self.state == SessionState::Editable {
            self.state = SessionState::Locked;
        }
    }

    /// Full session reset, the equivalent of reloading the page.
    pub fn reset(&mut self) {
        self.state = SessionState::AwaitingSource;
    }

    pub fn allows_interaction(&self) -> bool {
        self.state == SessionState::Editable
    }

    pub fn allows_export(&self) -> bool {
        self.state == SessionState::Editable
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifecycle() {
        let mut gate = SessionGate::new();
        assert_eq!(gate.state(), SessionState::AwaitingSource);
        assert!(!gate.allows_interaction());

        // Exporting before a source exists does nothing
        gate.export_succeeded();
        assert_eq!(gate.state(), SessionState::AwaitingSource);

        assert!(gate.source_ready());
        assert!(gate.allows_interaction());
        assert!(gate.allows_export());

        gate.export_succeeded();
        assert_eq!(gate.state(), SessionState::Locked);
        assert!(!gate.allows_interaction());
        assert!(!gate.allows_export());
    }

    #[test]
    fn test_locked_refuses_new_source_until_reset() {
        let mut gate = SessionGate::new();
        gate.source_ready();
        gate.export_succeeded();

        assert!(!gate.source_ready());
        assert_eq!(gate.state(), SessionState::Locked);

        gate.reset();
        assert_eq!(gate.state(), SessionState::AwaitingSource);
        assert!(gate.source_ready());
    }

    #[test]
    fn test_reloading_while_editable_stays_editable() {
        let mut gate = SessionGate::new();
        assert!(gate.source_ready());
        assert!(gate.source_ready());
        assert_eq!(gate.state(), SessionState::Editable);
    }
}
