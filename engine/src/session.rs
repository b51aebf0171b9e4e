//! Session-wide state of one result form: edit mode, dirty flag and the
//! preview panel's visibility guard.

use log::debug;

use crate::errors::ToggleError;
use crate::preview::PreviewGate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    /// A new result that has not been persisted yet
    Create,
    /// An existing result seeded from server rows
    Edit,
}

/// Re-entrancy guard of the preview toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToggleState {
    #[default]
    Idle,
    Toggling {
        target_visible: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    pub mode: FormMode,
    dirty: bool,
    preview_visible: bool,
    toggle: ToggleState,
    pub gate: PreviewGate,
}

impl SessionState {
    pub fn new(mode: FormMode) -> Self {
        Self {
            mode,
            dirty: false,
            preview_visible: false,
            toggle: ToggleState::Idle,
            gate: PreviewGate::default(),
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Called once the form was submitted successfully
    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    pub fn preview_visible(&self) -> bool {
        self.preview_visible
    }

    pub fn toggle_state(&self) -> ToggleState {
        self.toggle
    }

    /// Flips preview visibility and locks the toggle until [`Self::finish_toggle`].
    /// Returns the new visibility.
    pub fn begin_toggle(&mut self) -> Result<bool, ToggleError> {
        if let ToggleState::Toggling { .. } = self.toggle {
            return Err(ToggleError::InProgress);
        }
        let target_visible = !self.preview_visible;
        self.preview_visible = target_visible;
        self.toggle = ToggleState::Toggling { target_visible };
        if !target_visible {
            self.gate.reset();
        }
        debug!("Preview toggle started (visible: {})", target_visible);
        Ok(target_visible)
    }

    /// Releases the toggle lock. Safe to call from every path, including twice.
    pub fn finish_toggle(&mut self) {
        self.toggle = ToggleState::Idle;
    }
}
