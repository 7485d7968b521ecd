//! Read-only view of the current selection below the globe.

use crate::catalog::ServiceCatalog;
use crate::config::HoverBehavior;
use crate::selection::Selection;

/// Greeting shown while nothing is selected.
pub const WELCOME_MESSAGE: &str = "Welcome. I\u{2019}m your AI assistant. How can I help you today?";

/// Label of the control that clears the selection.
pub const RESET_LABEL: &str = "Reset";

/// What the description panel shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelView {
    Welcome { message: String, hint: String },
    Service {
        id: String,
        title: String,
        description: String,
        reset_label: String,
    },
}

impl PanelView {
    /// Build the view for `selection`.
    ///
    /// A selection whose id no longer resolves falls back to the welcome view.
    pub fn render(selection: &Selection, catalog: &ServiceCatalog, hover: HoverBehavior) -> Self {
        match selection.service(catalog) {
            Some(service) => Self::Service {
                id: service.id.clone(),
                title: service.title.clone(),
                description: service.description.clone(),
                reset_label: RESET_LABEL.to_owned(),
            },
            None => Self::Welcome {
                message: WELCOME_MESSAGE.to_owned(),
                hint: hint(hover),
            },
        }
    }

    pub fn is_welcome(&self) -> bool {
        matches!(self, Self::Welcome { .. })
    }
}

fn hint(hover: HoverBehavior) -> String {
    let hover_text = match hover {
        HoverBehavior::Pause => "Hover the globe to pause.",
        HoverBehavior::SlowDown(_) => "Hover the globe to slow it down.",
    };
    format!("{hover_text} Drag to spin. Click an icon to learn more.")
}
