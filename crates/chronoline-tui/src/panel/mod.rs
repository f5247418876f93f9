//! Detail/edit panel.
//!
//! Shows the selected event read-only, or hosts the add/edit form.

mod detail;
mod form;

pub use detail::{wrap_description, DetailView};
pub use form::{EventForm, EventFormView, FormField, FormMode, FormOutcome};

/// What the panel is currently doing.
#[derive(Debug, Clone, Default)]
pub enum PanelMode {
    #[default]
    Viewing,
    Editing(EventForm),
    Adding(EventForm),
}

impl PanelMode {
    /// The open form, if any.
    pub fn form(&self) -> Option<&EventForm> {
        match self {
            PanelMode::Viewing => None,
            PanelMode::Editing(form) | PanelMode::Adding(form) => Some(form),
        }
    }

    pub fn form_mut(&mut self) -> Option<&mut EventForm> {
        match self {
            PanelMode::Viewing => None,
            PanelMode::Editing(form) | PanelMode::Adding(form) => Some(form),
        }
    }

    pub fn is_viewing(&self) -> bool {
        matches!(self, PanelMode::Viewing)
    }

    /// Short name for the status bar.
    pub fn label(&self) -> &'static str {
        match self {
            PanelMode::Viewing => "Timeline",
            PanelMode::Editing(_) => "Edit",
            PanelMode::Adding(_) => "Add",
        }
    }
}
