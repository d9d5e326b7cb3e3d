//! Object registry: the set of live entities and its type index
//!
//! Registration order is kept so every sweep (update, collision, events,
//! drawing) visits entities deterministically. Entities are checked out of
//! their slot while one of their hooks runs and restored afterwards.

use crate::foundation::math::Vec2;
use crate::scene::entity::{Entity, EntityCore, EntityId, TypeTag};
use std::collections::HashMap;

/// Live entities indexed by id and by type tag
pub struct ObjectRegistry<E> {
    slots: HashMap<EntityId, Option<Entity<E>>>,
    order: Vec<EntityId>,
    by_type: HashMap<TypeTag, Vec<EntityId>>,
}

impl<E> Default for ObjectRegistry<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> ObjectRegistry<E> {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            slots: HashMap::new(),
            order: Vec::new(),
            by_type: HashMap::new(),
        }
    }

    /// Add an entity; `false` (and the entity is dropped) if its id is taken
    pub fn register(&mut self, entity: Entity<E>) -> bool {
        let id = entity.id();
        if self.slots.contains_key(&id) {
            log::debug!("Entity {id} already registered, ignoring");
            return false;
        }
        self.order.push(id);
        self.by_type.entry(entity.tag()).or_default().push(id);
        self.slots.insert(id, Some(entity));
        true
    }

    /// Remove an entity; `false` if it was not registered
    pub fn unregister(&mut self, id: EntityId) -> bool {
        let Some(slot) = self.slots.remove(&id) else {
            return false;
        };
        self.order.retain(|other| *other != id);
        match slot {
            Some(entity) => Self::drop_from_bucket(&mut self.by_type, entity.tag(), id),
            None => {
                for bucket in self.by_type.values_mut() {
                    bucket.retain(|other| *other != id);
                }
                self.by_type.retain(|_, bucket| !bucket.is_empty());
            }
        }
        true
    }

    fn drop_from_bucket(by_type: &mut HashMap<TypeTag, Vec<EntityId>>, tag: TypeTag, id: EntityId) {
        if let Some(bucket) = by_type.get_mut(&tag) {
            bucket.retain(|other| *other != id);
            if bucket.is_empty() {
                by_type.remove(&tag);
            }
        }
    }

    /// Registered, whether or not currently checked out
    pub fn contains(&self, id: EntityId) -> bool {
        self.slots.contains_key(&id)
    }

    /// Number of registered entities
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// No entities registered
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Borrow an entity (absent while its own hook is running)
    pub fn get(&self, id: EntityId) -> Option<&Entity<E>> {
        self.slots.get(&id).and_then(Option::as_ref)
    }

    /// Mutably borrow an entity
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity<E>> {
        self.slots.get_mut(&id).and_then(Option::as_mut)
    }

    /// Borrow an entity's core state
    pub fn core(&self, id: EntityId) -> Option<&EntityCore> {
        self.get(id).map(|entity| &entity.core)
    }

    /// Mutably borrow an entity's core state
    pub fn core_mut(&mut self, id: EntityId) -> Option<&mut EntityCore> {
        self.get_mut(id).map(|entity| &mut entity.core)
    }

    /// Snapshot of all ids in registration order
    ///
    /// Safe to iterate while registering or unregistering.
    pub fn get_all(&self) -> Vec<EntityId> {
        self.order.clone()
    }

    /// Snapshot of the ids carrying `tag`, in registration order
    pub fn get_by_type(&self, tag: TypeTag) -> Vec<EntityId> {
        self.ids_by_type(tag).to_vec()
    }

    /// Borrowed view of the ids carrying `tag`
    pub fn ids_by_type(&self, tag: TypeTag) -> &[EntityId] {
        self.by_type.get(&tag).map_or(&[], Vec::as_slice)
    }

    /// Number of entities carrying `tag`
    pub fn count_by_type(&self, tag: TypeTag) -> usize {
        self.by_type.get(&tag).map_or(0, Vec::len)
    }

    /// Per-tag counts, sorted by tag name
    pub fn type_counts(&self) -> Vec<(TypeTag, usize)> {
        let mut counts: Vec<_> = self
            .by_type
            .iter()
            .map(|(tag, ids)| (*tag, ids.len()))
            .collect();
        counts.sort();
        counts
    }

    /// Nearest entity to `point`, optionally restricted by tag and distance
    ///
    /// Ties keep the earliest registered entity; an entity exactly at
    /// `max_distance` still qualifies.
    pub fn nearest(
        &self,
        point: Vec2,
        tag: Option<TypeTag>,
        max_distance: Option<f32>,
    ) -> Option<EntityId> {
        let candidates = match tag {
            Some(tag) => self.ids_by_type(tag),
            None => self.order.as_slice(),
        };

        let mut best: Option<(EntityId, f32)> = None;
        for id in candidates {
            let Some(core) = self.core(*id) else {
                continue;
            };
            let distance = core.distance_to(point);
            if max_distance.is_some_and(|max| distance > max) {
                continue;
            }
            if best.map_or(true, |(_, closest)| distance < closest) {
                best = Some((*id, distance));
            }
        }
        best.map(|(id, _)| id)
    }

    /// Ids of entities matching `predicate`, in registration order
    pub fn filter<P>(&self, mut predicate: P) -> Vec<EntityId>
    where
        P: FnMut(&Entity<E>) -> bool,
    {
        self.order
            .iter()
            .filter(|id| self.get(**id).is_some_and(&mut predicate))
            .copied()
            .collect()
    }

    /// Entities in registration order, skipping any checked out
    pub fn iter(&self) -> impl Iterator<Item = &Entity<E>> {
        self.order.iter().filter_map(|id| self.get(*id))
    }

    /// Remove everything
    pub fn clear(&mut self) {
        self.slots.clear();
        self.order.clear();
        self.by_type.clear();
    }

    /// Take an entity out of its slot for the duration of a hook
    pub(crate) fn checkout(&mut self, id: EntityId) -> Option<Entity<E>> {
        self.slots.get_mut(&id).and_then(Option::take)
    }

    /// Put a checked-out entity back; dropped if it was unregistered meanwhile
    pub(crate) fn restore(&mut self, entity: Entity<E>) -> bool {
        match self.slots.get_mut(&entity.id()) {
            Some(slot @ None) => {
                *slot = Some(entity);
                true
            }
            _ => {
                log::trace!("Entity {} was unregistered during its hook", entity.id());
                false
            }
        }
    }

    /// One line per entity for the debug log
    pub fn debug_dump(&self) -> String {
        let mut out = format!("{} entities\n", self.len());
        for id in &self.order {
            match self.core(*id) {
                Some(core) => out.push_str(&format!(
                    "  {} [{}] at ({:.1}, {:.1}){}{}\n",
                    id,
                    core.tag(),
                    core.position().x,
                    core.position().y,
                    if core.is_visible() { "" } else { " hidden" },
                    if core.is_destroyed() { " destroyed" } else { "" },
                )),
                None => out.push_str(&format!("  {id} (checked out)\n")),
            }
        }
        out
    }
}
