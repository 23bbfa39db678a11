//! Selection and hover tracking.
//!
//! Two independent single-slot states: the selected object and the hovered
//! object. Each slot remembers the handle it highlighted so the outline can be
//! removed even after the registry entry is gone. Selection dominates: an
//! object is never outlined with both styles, and hovering the selected object
//! changes nothing.

#[cfg(test)]
#[path = "selection_test.rs"]
mod selection_test;

use crate::backend::{HighlightStyle, RenderBackend, RenderHandle};
use crate::registry::ObjectRegistry;
use crate::scene::ObjectId;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Mark {
    id: ObjectId,
    handle: RenderHandle,
}

/// Tracks at most one selected and one hovered object.
#[derive(Debug, Default)]
pub struct SelectionTracker {
    selected: Option<Mark>,
    hovered: Option<Mark>,
}

impl SelectionTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the selection with `id`, or clear it with `None`.
    ///
    /// Returns the handle of the newly selected object. An id that is not
    /// registered leaves the selection empty.
    pub fn select(
        &mut self,
        id: Option<&str>,
        registry: &ObjectRegistry,
        backend: &mut dyn RenderBackend,
    ) -> Option<RenderHandle> {
        self.clear_selected(backend);

        let id = id?;
        let Some(handle) = registry.handle_of(id) else {
            log::warn!("select: unknown object {id}");
            return None;
        };

        if self.hovered.as_ref().is_some_and(|mark| mark.id == id) {
            self.clear_hovered(backend);
        }

        backend.apply_highlight(handle, HighlightStyle::Selected);
        self.selected = Some(Mark { id: id.to_string(), handle });
        log::debug!("select: {id}");
        Some(handle)
    }

    /// Replace the hovered object with `id`, or clear it with `None`.
    ///
    /// Hovering the selected object is suppressed. Returns `true` if the
    /// hover slot changed.
    pub fn hover(&mut self, id: Option<&str>, registry: &ObjectRegistry, backend: &mut dyn RenderBackend) -> bool {
        if self.hovered.as_ref().map(|mark| mark.id.as_str()) == id {
            return false;
        }

        let had_hover = self.hovered.is_some();
        self.clear_hovered(backend);

        let Some(id) = id else {
            return had_hover;
        };
        if self.is_selected(id) {
            return had_hover;
        }
        let Some(handle) = registry.handle_of(id) else {
            return had_hover;
        };

        backend.apply_highlight(handle, HighlightStyle::Hovered);
        self.hovered = Some(Mark { id: id.to_string(), handle });
        true
    }

    /// Empty both slots and remove their highlights.
    pub fn clear(&mut self, backend: &mut dyn RenderBackend) {
        self.clear_selected(backend);
        self.clear_hovered(backend);
    }

    /// Remove the selected object from the registry and clear the selection.
    /// Returns `false` if nothing was selected.
    pub fn delete_selected(&mut self, registry: &mut ObjectRegistry, backend: &mut dyn RenderBackend) -> bool {
        let Some(mark) = self.selected.take() else {
            return false;
        };
        backend.remove_highlight(mark.handle);
        if self.hovered.as_ref().is_some_and(|hovered| hovered.id == mark.id) {
            self.clear_hovered(backend);
        }
        registry.remove(&mark.id, backend)
    }

    /// Drop every reference to `id`, removing its highlight. Called before an
    /// object is removed through any path.
    pub fn forget(&mut self, id: &str, backend: &mut dyn RenderBackend) {
        if self.is_selected(id) {
            self.clear_selected(backend);
        }
        if self.is_hovered(id) {
            self.clear_hovered(backend);
        }
    }

    /// The selected object id, if any.
    #[must_use]
    pub fn selected(&self) -> Option<&str> {
        self.selected.as_ref().map(|mark| mark.id.as_str())
    }

    /// The handle outlined as selected, if any.
    #[must_use]
    pub fn selected_handle(&self) -> Option<RenderHandle> {
        self.selected.as_ref().map(|mark| mark.handle)
    }

    /// The hovered object id, if any.
    #[must_use]
    pub fn hovered(&self) -> Option<&str> {
        self.hovered.as_ref().map(|mark| mark.id.as_str())
    }

    #[must_use]
    pub fn is_selected(&self, id: &str) -> bool {
        self.selected() == Some(id)
    }

    #[must_use]
    pub fn is_hovered(&self, id: &str) -> bool {
        self.hovered() == Some(id)
    }

    fn clear_selected(&mut self, backend: &mut dyn RenderBackend) {
        if let Some(mark) = self.selected.take() {
            backend.remove_highlight(mark.handle);
        }
    }

    fn clear_hovered(&mut self, backend: &mut dyn RenderBackend) {
        if let Some(mark) = self.hovered.take() {
            backend.remove_highlight(mark.handle);
        }
    }
}
