//! Named actors making up a rendered scene.
//!
//! Actors are stored in a [`SlotMap`] so ids stay valid across removals.
//! Names are unique and indexed; classes group actors (e.g. one brain
//! region split into several meshes) and are indexed as well.

use std::collections::HashMap;
use std::fmt;

use heatslice_mesh::{Aabb, SurfaceMesh, TriangleMesh};
use slotmap::SlotMap;

use crate::error::SceneError;

slotmap::new_key_type! {
    /// Unique identifier for an actor in a [`Scene`].
    pub struct ActorId;
}

/// What an actor holds. Resolved once when the actor is added.
#[derive(Debug, Clone, PartialEq)]
pub enum ActorKind {
    /// A closed triangulated surface that can be sliced.
    SurfaceMesh(TriangleMesh),
    /// Volumetric data, known only by its extent.
    VolumeData(Aabb),
    /// A label drawn over the scene.
    TextOverlay(String),
}

/// A named object in a scene.
#[derive(Debug, Clone, PartialEq)]
pub struct Actor {
    /// Unique name.
    pub name: String,
    /// Group the actor belongs to.
    pub class: String,
    /// Payload.
    pub kind: ActorKind,
}

impl Actor {
    /// True for text overlays.
    pub fn is_text(&self) -> bool {
        matches!(self.kind, ActorKind::TextOverlay(_))
    }

    /// The sliceable surface, if this actor has one.
    pub fn as_surface(&self) -> Option<&dyn SurfaceMesh> {
        match &self.kind {
            ActorKind::SurfaceMesh(mesh) => Some(mesh),
            _ => None,
        }
    }

    /// Bounds of the actor's geometry. Text has none.
    pub fn bounds(&self) -> Option<Aabb> {
        match &self.kind {
            ActorKind::SurfaceMesh(mesh) => mesh.bounds(),
            ActorKind::VolumeData(aabb) => Some(*aabb),
            ActorKind::TextOverlay(_) => None,
        }
    }
}

/// A collection of uniquely named actors.
#[derive(Debug, Default)]
pub struct Scene {
    actors: SlotMap<ActorId, Actor>,
    order: Vec<ActorId>,
    names: HashMap<String, ActorId>,
    classes: HashMap<String, Vec<ActorId>>,
}

impl Scene {
    /// Create an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an actor.
    ///
    /// # Errors
    ///
    /// [`SceneError::DuplicateName`] if `name` is already taken.
    pub fn add(
        &mut self,
        name: impl Into<String>,
        class: impl Into<String>,
        kind: ActorKind,
    ) -> Result<ActorId, SceneError> {
        let name = name.into();
        if self.names.contains_key(&name) {
            return Err(SceneError::DuplicateName(name));
        }
        let class = class.into();
        let id = self.actors.insert(Actor {
            name: name.clone(),
            class: class.clone(),
            kind,
        });
        self.order.push(id);
        self.names.insert(name, id);
        self.classes.entry(class).or_default().push(id);
        Ok(id)
    }

    /// Remove an actor by id.
    pub fn remove(&mut self, id: ActorId) -> Option<Actor> {
        let actor = self.actors.remove(id)?;
        self.order.retain(|&a| a != id);
        self.names.remove(&actor.name);
        if let Some(ids) = self.classes.get_mut(&actor.class) {
            ids.retain(|&a| a != id);
            if ids.is_empty() {
                self.classes.remove(&actor.class);
            }
        }
        Some(actor)
    }

    /// Remove an actor by name.
    pub fn remove_by_name(&mut self, name: &str) -> Result<Actor, SceneError> {
        let id = self
            .names
            .get(name)
            .copied()
            .ok_or_else(|| SceneError::NotFound(name.to_string()))?;
        self.remove(id)
            .ok_or_else(|| SceneError::NotFound(name.to_string()))
    }

    /// Get an actor by id.
    pub fn get(&self, id: ActorId) -> Option<&Actor> {
        self.actors.get(id)
    }

    /// Id and actor for a name.
    pub fn by_name(&self, name: &str) -> Option<(ActorId, &Actor)> {
        let id = *self.names.get(name)?;
        self.actors.get(id).map(|a| (id, a))
    }

    /// Actors of a class, in insertion order.
    pub fn by_class<'a>(&'a self, class: &str) -> impl Iterator<Item = &'a Actor> + 'a {
        self.classes
            .get(class)
            .into_iter()
            .flatten()
            .filter_map(move |&id| self.actors.get(id))
    }

    /// All actors in insertion order.
    pub fn actors(&self) -> impl Iterator<Item = (ActorId, &Actor)> + '_ {
        self.order
            .iter()
            .filter_map(move |&id| self.actors.get(id).map(|a| (id, a)))
    }

    /// Actors that are not text overlays.
    pub fn clean_actors(&self) -> impl Iterator<Item = &Actor> + '_ {
        self.actors().map(|(_, a)| a).filter(|a| !a.is_text())
    }

    /// Named surfaces in insertion order, ready to pass to a slicer.
    pub fn surfaces(&self) -> Vec<(&str, &dyn SurfaceMesh)> {
        self.actors()
            .filter_map(|(_, a)| a.as_surface().map(|m| (a.name.as_str(), m)))
            .collect()
    }

    /// Union of all actor bounds.
    pub fn bounds(&self) -> Option<Aabb> {
        self.actors()
            .filter_map(|(_, a)| a.bounds())
            .reduce(|mut acc, b| {
                acc.include(&b.min);
                acc.include(&b.max);
                acc
            })
    }

    /// Number of actors.
    pub fn len(&self) -> usize {
        self.actors.len()
    }

    /// True if the scene has no actors.
    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }
}

impl fmt::Display for Scene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "scene with {} actors", self.len())
    }
}
