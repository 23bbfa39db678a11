//! Object registry: the authoritative set of scene objects and the renderable
//! each one is bound to.
//!
//! Every entry pairs one `SceneObject` with one `RenderHandle`. The registry
//! keeps a reverse index from handle to id so that picking results can be
//! resolved without tagging renderables with editor metadata. The two maps are
//! only ever changed together, which keeps the id ↔ handle mapping a
//! bijection for the registry's lifetime.

#[cfg(test)]
#[path = "registry_test.rs"]
mod registry_test;

use std::collections::HashMap;

use crate::backend::{RenderBackend, RenderHandle};
use crate::scene::{ObjectId, SceneObject, Transform};

/// Errors returned by registry operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// An entry with this id already exists.
    #[error("duplicate object id: {0}")]
    DuplicateId(ObjectId),
    /// The handle is already bound to another object.
    #[error("render handle {handle:?} already bound to {owner}")]
    DuplicateHandle { handle: RenderHandle, owner: ObjectId },
    /// No entry matches the given id or handle.
    #[error("object not found: {0}")]
    NotFound(String),
}

impl RegistryError {
    /// Stable code reported to the UI layer.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::DuplicateId(_) => "E_DUPLICATE_ID",
            Self::DuplicateHandle { .. } => "E_DUPLICATE_HANDLE",
            Self::NotFound(_) => "E_NOT_FOUND",
        }
    }
}

/// One registered object and the renderable that draws it.
#[derive(Debug, Clone, PartialEq)]
pub struct RegistryEntry {
    pub handle: RenderHandle,
    pub object: SceneObject,
}

/// Id-keyed store of registry entries with a handle → id reverse index.
#[derive(Debug, Default)]
pub struct ObjectRegistry {
    entries: HashMap<ObjectId, RegistryEntry>,
    by_handle: HashMap<RenderHandle, ObjectId>,
    /// Ids in insertion order, for stable listing.
    order: Vec<ObjectId>,
}

impl ObjectRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `object` as drawn by `handle`.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateId` if the id is taken and `DuplicateHandle` if the
    /// handle already belongs to another object. The registry is unchanged on
    /// error.
    pub fn add(&mut self, handle: RenderHandle, object: SceneObject) -> Result<(), RegistryError> {
        if self.entries.contains_key(&object.id) {
            return Err(RegistryError::DuplicateId(object.id));
        }
        if let Some(owner) = self.by_handle.get(&handle) {
            return Err(RegistryError::DuplicateHandle { handle, owner: owner.clone() });
        }

        log::debug!("registry: add {} as {handle:?}", object.id);
        self.by_handle.insert(handle, object.id.clone());
        self.order.push(object.id.clone());
        self.entries.insert(object.id.clone(), RegistryEntry { handle, object });
        Ok(())
    }

    /// Dispose the renderable for `id` and drop the entry. Returns `false` if
    /// there was no such entry.
    pub fn remove(&mut self, id: &str, backend: &mut dyn RenderBackend) -> bool {
        let Some(entry) = self.entries.remove(id) else {
            return false;
        };
        self.by_handle.remove(&entry.handle);
        self.order.retain(|existing| existing != id);
        backend.dispose(entry.handle);
        log::debug!("registry: removed {id}");
        true
    }

    /// Look up an entry by id.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no entry has this id.
    pub fn get(&self, id: &str) -> Result<&RegistryEntry, RegistryError> {
        self.entries.get(id).ok_or_else(|| RegistryError::NotFound(id.to_string()))
    }

    /// Resolve a renderable back to the object it draws.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the handle is not registered.
    pub fn find_by_handle(&self, handle: RenderHandle) -> Result<&SceneObject, RegistryError> {
        self.by_handle
            .get(&handle)
            .and_then(|id| self.entries.get(id))
            .map(|entry| &entry.object)
            .ok_or_else(|| RegistryError::NotFound(format!("{handle:?}")))
    }

    /// The object registered under `id`, if any.
    #[must_use]
    pub fn object(&self, id: &str) -> Option<&SceneObject> {
        self.entries.get(id).map(|entry| &entry.object)
    }

    /// The handle bound to `id`, if registered.
    #[must_use]
    pub fn handle_of(&self, id: &str) -> Option<RenderHandle> {
        self.entries.get(id).map(|entry| entry.handle)
    }

    /// Returns `true` if `id` is registered.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    /// Returns `true` if `handle` is bound to an object.
    #[must_use]
    pub fn contains_handle(&self, handle: RenderHandle) -> bool {
        self.by_handle.contains_key(&handle)
    }

    /// Snapshot of every object in insertion order.
    #[must_use]
    pub fn list_all(&self) -> Vec<SceneObject> {
        self.order
            .iter()
            .filter_map(|id| self.entries.get(id))
            .map(|entry| entry.object.clone())
            .collect()
    }

    /// Write a transform into the object record for `id`.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no entry has this id.
    pub fn update_transform(&mut self, id: &str, transform: Transform) -> Result<&SceneObject, RegistryError> {
        let entry = self
            .entries
            .get_mut(id)
            .ok_or_else(|| RegistryError::NotFound(id.to_string()))?;
        entry.object.set_transform(transform);
        Ok(&entry.object)
    }

    /// Dispose every renderable and clear all entries. Safe to call repeatedly.
    pub fn dispose(&mut self, backend: &mut dyn RenderBackend) {
        if self.entries.is_empty() {
            return;
        }
        log::debug!("registry: disposing {} objects", self.entries.len());
        for id in self.order.drain(..) {
            if let Some(entry) = self.entries.remove(&id) {
                backend.dispose(entry.handle);
            }
        }
        self.entries.clear();
        self.by_handle.clear();
    }

    /// Number of registered objects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
