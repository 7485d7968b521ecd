//! Which service the visitor has picked.
//!
//! Selecting is an idempotent set: picking the already-selected service keeps
//! it selected, and only [`Selection::reset`] clears it. Ids that are not in
//! the catalog are ignored.

use crate::catalog::{Service, ServiceCatalog};
use crate::error::SceneError;

/// Result of a [`Selection::select`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectOutcome {
    /// The selection changed to the requested id.
    Selected,
    /// The requested id was already selected.
    Unchanged,
    /// The id is not in the catalog; the selection was left alone.
    NotFound,
}

/// The selected service id, if any.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    selected: Option<String>,
}

impl Selection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Select `id` if it exists in `catalog`.
    pub fn select(&mut self, catalog: &ServiceCatalog, id: &str) -> SelectOutcome {
        if catalog.find(id).is_none() {
            let err = SceneError::SelectionNotFound { id: id.to_owned() };
            tracing::warn!("ignoring selection: {err}");
            return SelectOutcome::NotFound;
        }
        if self.selected.as_deref() == Some(id) {
            return SelectOutcome::Unchanged;
        }
        tracing::debug!(id, "selected service");
        self.selected = Some(id.to_owned());
        SelectOutcome::Selected
    }

    /// Clear the selection.
    pub fn reset(&mut self) {
        if let Some(previous) = self.selected.take() {
            tracing::debug!(previous, "selection reset");
        }
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.as_deref() == Some(id)
    }

    /// Resolve the selected service against `catalog`.
    pub fn service<'a>(&self, catalog: &'a ServiceCatalog) -> Option<&'a Service> {
        self.selected.as_deref().and_then(|id| catalog.find(id))
    }

    /// Catalog index of the selected service.
    pub fn index(&self, catalog: &ServiceCatalog) -> Option<usize> {
        self.selected.as_deref().and_then(|id| catalog.index_of(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_and_reset() {
        let catalog = ServiceCatalog::default();
        let mut selection = Selection::new();
        assert_eq!(selection.selected_id(), None);

        assert_eq!(selection.select(&catalog, "marketing"), SelectOutcome::Selected);
        assert_eq!(selection.selected_id(), Some("marketing"));
        assert_eq!(selection.index(&catalog), Some(2));

        selection.reset();
        assert_eq!(selection.selected_id(), None);
        // Reset on empty is harmless.
        selection.reset();
        assert_eq!(selection.selected_id(), None);
    }

    #[test]
    fn test_reselect_is_idempotent() {
        let catalog = ServiceCatalog::default();
        let mut selection = Selection::new();
        selection.select(&catalog, "video-editing");
        assert_eq!(selection.select(&catalog, "video-editing"), SelectOutcome::Unchanged);
        assert!(selection.is_selected("video-editing"));
    }

    #[test]
    fn test_unknown_id_leaves_selection() {
        let catalog = ServiceCatalog::default();
        let mut selection = Selection::new();
        assert_eq!(selection.select(&catalog, "astrology"), SelectOutcome::NotFound);
        assert_eq!(selection.selected_id(), None);

        selection.select(&catalog, "data-entry");
        assert_eq!(selection.select(&catalog, "astrology"), SelectOutcome::NotFound);
        assert_eq!(selection.selected_id(), Some("data-entry"));
    }

    #[test]
    fn test_switching_services() {
        let catalog = ServiceCatalog::default();
        let mut selection = Selection::new();
        selection.select(&catalog, "consultation");
        assert_eq!(selection.select(&catalog, "graphic-design"), SelectOutcome::Selected);
        assert_eq!(selection.service(&catalog).unwrap().title, "Graphic Design");
    }
}
