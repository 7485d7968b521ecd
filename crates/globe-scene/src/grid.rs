//! Services grid and its detail modal.
//!
//! Activating a grid entry (click, Enter or Space) opens a modal with the
//! service's full description. While the modal is open it holds a
//! [`ScrollGuard`]; every close path (Escape, backdrop click, the close
//! button, or dropping the grid) releases it.

use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use crate::catalog::{Service, ServiceCatalog};

/// Page-level scroll lock, shared by everything that can trap scrolling.
#[derive(Debug, Clone, Default)]
pub struct ScrollLock {
    holders: Arc<AtomicUsize>,
}

impl ScrollLock {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Disable scrolling until the returned guard is dropped.
    #[must_use]
    pub fn acquire(&self) -> ScrollGuard {
        self.holders.fetch_add(1, Ordering::Relaxed);
        ScrollGuard {
            holders: self.holders.clone(),
        }
    }

    pub fn is_locked(&self) -> bool {
        self.holders.load(Ordering::Relaxed) > 0
    }
}

/// Keeps the page scroll disabled while alive.
#[derive(Debug)]
pub struct ScrollGuard {
    holders: Arc<AtomicUsize>,
}

impl Drop for ScrollGuard {
    fn drop(&mut self) {
        self.holders.fetch_sub(1, Ordering::Relaxed);
    }
}

/// Keys the grid and modal react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Space,
    Escape,
    Other,
}

/// Why the modal closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    Escape,
    Backdrop,
    CloseButton,
}

/// Detail dialog for one service.
#[derive(Debug)]
pub struct Modal {
    open: Option<(usize, ScrollGuard)>,
}

impl Modal {
    fn closed() -> Self {
        Self { open: None }
    }

    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }

    /// Catalog index of the service being shown.
    pub fn service_index(&self) -> Option<usize> {
        self.open.as_ref().map(|(index, _)| *index)
    }

    fn close(&mut self, reason: CloseReason) -> bool {
        match self.open.take() {
            Some((index, _guard)) => {
                tracing::debug!(index, ?reason, "closed service modal");
                true
            }
            None => false,
        }
    }
}

/// Grid of all catalog entries plus the modal.
#[derive(Debug)]
pub struct ServicesGrid {
    catalog: Arc<ServiceCatalog>,
    scroll: ScrollLock,
    modal: Modal,
}

impl ServicesGrid {
    pub fn new(catalog: Arc<ServiceCatalog>, scroll: ScrollLock) -> Self {
        Self {
            catalog,
            scroll,
            modal: Modal::closed(),
        }
    }

    pub fn entries(&self) -> impl Iterator<Item = &Service> {
        self.catalog.iter()
    }

    pub fn modal(&self) -> &Modal {
        &self.modal
    }

    /// Service shown in the modal.
    pub fn modal_service(&self) -> Option<&Service> {
        self.modal.service_index().and_then(|i| self.catalog.get(i))
    }

    /// Open the modal for entry `index`. Out-of-range indices are ignored.
    pub fn activate(&mut self, index: usize) -> bool {
        if index >= self.catalog.len() {
            return false;
        }
        // Switching entries keeps the existing guard.
        let guard = match self.modal.open.take() {
            Some((_, guard)) => guard,
            None => self.scroll.acquire(),
        };
        self.modal.open = Some((index, guard));
        tracing::debug!(index, "opened service modal");
        true
    }

    /// Open the modal for the service with `id`.
    pub fn activate_id(&mut self, id: &str) -> bool {
        self.catalog
            .index_of(id)
            .is_some_and(|index| self.activate(index))
    }

    /// Key pressed while entry `index` has focus.
    pub fn key_on_entry(&mut self, index: usize, key: Key) -> bool {
        match key {
            Key::Enter | Key::Space => self.activate(index),
            Key::Escape => self.modal.close(CloseReason::Escape),
            Key::Other => false,
        }
    }

    /// Key pressed anywhere while the modal may be open.
    pub fn key(&mut self, key: Key) -> bool {
        key == Key::Escape && self.modal.close(CloseReason::Escape)
    }

    pub fn click_backdrop(&mut self) -> bool {
        self.modal.close(CloseReason::Backdrop)
    }

    pub fn click_close(&mut self) -> bool {
        self.modal.close(CloseReason::CloseButton)
    }
}
