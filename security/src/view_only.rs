// security/src/view_only.rs

//! Key and pointer filter for the record viewer.
//!
//! NOT a security control. A presentation layer may ask the guard which
//! events to swallow (context menu, print screen, print, save, save as, and
//! downloads of a shared record), but the payload has already been delivered
//! to the viewer; screenshots, developer tools or reading the store directly
//! all bypass it.

/// A keyboard chord as reported by a presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KeyChord {
    pub key: String,
    pub ctrl: bool,
    pub meta: bool,
    pub shift: bool,
}

impl KeyChord {
    pub fn new(key: impl Into<String>) -> Self {
        KeyChord {
            key: key.into(),
            ..Default::default()
        }
    }

    pub fn with_ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    pub fn with_meta(mut self) -> Self {
        self.meta = true;
        self
    }

    pub fn with_shift(mut self) -> Self {
        self.shift = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewerEvent {
    ContextMenu,
    Key(KeyChord),
    /// An explicit request to save the payload to disk.
    Download,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ViewOnlyGuard;

impl ViewOnlyGuard {
    /// Returns `true` when a view-only screen should swallow `event`.
    pub fn should_suppress(&self, event: &ViewerEvent) -> bool {
        match event {
            ViewerEvent::ContextMenu | ViewerEvent::Download => true,
            ViewerEvent::Key(chord) => {
                if chord.key == "PrintScreen" {
                    return true;
                }
                let command = chord.ctrl || chord.meta;
                // Save As arrives with shift held, which browsers report as "S".
                command && matches!(chord.key.as_str(), "p" | "s" | "S")
            }
        }
    }
}
