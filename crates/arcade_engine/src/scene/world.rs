//! World: the registry plus everything hooks may touch during a frame
//!
//! While a frame phase is running, `register` and `unregister` are queued and
//! applied at the next phase boundary. The return value is decided at call
//! time against the registry as it will look after the flush, so callers get
//! an immediate answer while sweeps keep iterating a stable set.

use crate::events::EventHandler;
use crate::foundation::math::{Rect, Vec2};
use crate::scene::entity::{Entity, EntityCore, EntityId, TypeTag};
use crate::scene::registry::ObjectRegistry;

struct PendingChanges<E> {
    spawns: Vec<Entity<E>>,
    removals: Vec<EntityId>,
}

impl<E> PendingChanges<E> {
    fn is_removed(&self, id: EntityId) -> bool {
        self.removals.contains(&id)
    }

    fn is_spawned(&self, id: EntityId) -> bool {
        self.spawns.iter().any(|entity| entity.id() == id)
    }

    fn is_empty(&self) -> bool {
        self.spawns.is_empty() && self.removals.is_empty()
    }
}

/// Loop control flags shared between the engine, the game and entities
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoopControl {
    /// Leave the loop at the end of the current frame
    pub quit_requested: bool,
    /// Skip simulation phases
    pub paused: bool,
    /// Draw the debug overlay
    pub debug: bool,
}

/// Live entities, the engine-level event handler and per-frame state
pub struct World<E> {
    pub(crate) registry: ObjectRegistry<E>,
    pending: PendingChanges<E>,
    phase_depth: u32,
    pub(crate) handler: Option<Box<dyn EventHandler<E>>>,
    pub(crate) emit_depth: u32,
    level_width: u32,
    level_height: u32,
    delta_time: f32,
    control: LoopControl,
}

impl<E> World<E> {
    /// Create an empty world for a level of the given logical size
    pub fn new(level_width: u32, level_height: u32) -> Self {
        Self {
            registry: ObjectRegistry::new(),
            pending: PendingChanges {
                spawns: Vec::new(),
                removals: Vec::new(),
            },
            phase_depth: 0,
            handler: None,
            emit_depth: 0,
            level_width,
            level_height,
            delta_time: 0.0,
            control: LoopControl::default(),
        }
    }

    // ---- registration ----

    /// Add an entity; `false` if one with the same id is present
    pub fn register(&mut self, entity: Entity<E>) -> bool {
        let id = entity.id();
        if self.contains(id) {
            log::debug!("Entity {id} already registered, ignoring");
            return false;
        }
        if self.phase_depth > 0 {
            self.pending.spawns.push(entity);
            return true;
        }
        self.registry.register(entity)
    }

    /// Remove an entity; `false` if it is not present
    pub fn unregister(&mut self, id: EntityId) -> bool {
        if let Some(index) = self.pending.spawns.iter().position(|entity| entity.id() == id) {
            self.pending.spawns.remove(index);
            return true;
        }
        if !self.contains(id) {
            return false;
        }
        if self.phase_depth > 0 {
            self.pending.removals.push(id);
            return true;
        }
        self.registry.unregister(id)
    }

    /// Present, counting queued changes
    pub fn contains(&self, id: EntityId) -> bool {
        (self.registry.contains(id) && !self.pending.is_removed(id)) || self.pending.is_spawned(id)
    }

    /// Remove every entity, including queued spawns
    pub fn clear(&mut self) {
        self.pending.spawns.clear();
        self.pending.removals.clear();
        self.registry.clear();
    }

    // ---- queries ----

    /// Registry as of the last phase boundary
    pub fn registry(&self) -> &ObjectRegistry<E> {
        &self.registry
    }

    /// Snapshot of all ids in registration order
    pub fn get_all(&self) -> Vec<EntityId> {
        self.registry.get_all()
    }

    /// Snapshot of the ids carrying `tag`
    pub fn get_by_type(&self, tag: TypeTag) -> Vec<EntityId> {
        self.registry.get_by_type(tag)
    }

    /// Number of entities carrying `tag`
    pub fn count_by_type(&self, tag: TypeTag) -> usize {
        self.registry.count_by_type(tag)
    }

    /// Number of registered entities
    pub fn entity_count(&self) -> usize {
        self.registry.len()
    }

    /// Nearest entity to `point`, see [`ObjectRegistry::nearest`]
    pub fn nearest(
        &self,
        point: Vec2,
        tag: Option<TypeTag>,
        max_distance: Option<f32>,
    ) -> Option<EntityId> {
        self.registry.nearest(point, tag, max_distance)
    }

    /// Ids of entities matching `predicate`
    pub fn filter<P>(&self, predicate: P) -> Vec<EntityId>
    where
        P: FnMut(&Entity<E>) -> bool,
    {
        self.registry.filter(predicate)
    }

    /// Borrow an entity
    pub fn entity(&self, id: EntityId) -> Option<&Entity<E>> {
        self.registry.get(id)
    }

    /// Mutably borrow an entity
    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity<E>> {
        self.registry.get_mut(id)
    }

    /// Borrow an entity's core state
    pub fn core(&self, id: EntityId) -> Option<&EntityCore> {
        self.registry.core(id)
    }

    /// Mutably borrow an entity's core state
    pub fn core_mut(&mut self, id: EntityId) -> Option<&mut EntityCore> {
        self.registry.core_mut(id)
    }

    /// Borrow an entity's behavior as its concrete type
    pub fn behavior<T: 'static>(&self, id: EntityId) -> Option<&T>
    where
        E: 'static,
    {
        self.registry.get(id).and_then(Entity::behavior_as::<T>)
    }

    /// Mutably borrow an entity's behavior as its concrete type
    pub fn behavior_mut<T: 'static>(&mut self, id: EntityId) -> Option<&mut T>
    where
        E: 'static,
    {
        self.registry.get_mut(id).and_then(Entity::behavior_as_mut::<T>)
    }

    // ---- frame state ----

    /// Clamped delta time of the current frame, in seconds
    pub fn delta_time(&self) -> f32 {
        self.delta_time
    }

    /// Set the delta time hooks will see
    pub fn set_delta_time(&mut self, delta_time: f32) {
        self.delta_time = delta_time;
    }

    /// Logical level size
    pub fn level_size(&self) -> (u32, u32) {
        (self.level_width, self.level_height)
    }

    /// Level area as a rectangle anchored at the origin
    pub fn level_bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.level_width as f32, self.level_height as f32)
    }

    /// Current loop control flags
    pub fn control(&self) -> LoopControl {
        self.control
    }

    /// Ask the engine to stop at the end of the frame
    pub fn request_quit(&mut self) {
        self.control.quit_requested = true;
    }

    /// Quit has been requested
    pub fn quit_requested(&self) -> bool {
        self.control.quit_requested
    }

    /// Simulation is paused
    pub fn is_paused(&self) -> bool {
        self.control.paused
    }

    /// Pause or resume the simulation
    pub fn set_paused(&mut self, paused: bool) {
        self.control.paused = paused;
    }

    /// Flip the pause flag
    pub fn toggle_pause(&mut self) {
        self.control.paused = !self.control.paused;
    }

    /// Debug overlay enabled
    pub fn debug_enabled(&self) -> bool {
        self.control.debug
    }

    /// Enable or disable the debug overlay
    pub fn set_debug(&mut self, debug: bool) {
        self.control.debug = debug;
    }

    /// Flip the debug overlay flag
    pub fn toggle_debug(&mut self) {
        self.control.debug = !self.control.debug;
    }

    // ---- phases ----

    /// Start a frame phase; registrations are queued until it ends
    pub fn begin_phase(&mut self) {
        self.phase_depth += 1;
    }

    /// End a frame phase, applying queued changes when the outermost one ends
    pub fn end_phase(&mut self) {
        self.phase_depth = self.phase_depth.saturating_sub(1);
        if self.phase_depth == 0 {
            self.flush();
        }
    }

    /// A frame phase is running
    pub fn in_phase(&self) -> bool {
        self.phase_depth > 0
    }

    /// Drop phase bookkeeping after a frame was abandoned mid-phase
    pub(crate) fn reset_phases(&mut self) {
        self.phase_depth = 0;
        self.emit_depth = 0;
        self.flush();
    }

    fn flush(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        for id in std::mem::take(&mut self.pending.removals) {
            self.registry.unregister(id);
        }
        for entity in std::mem::take(&mut self.pending.spawns) {
            let id = entity.id();
            if !self.registry.register(entity) {
                log::warn!("Queued entity {id} collided with an existing id");
            }
        }
    }

    /// Still part of the current sweep
    pub(crate) fn is_live(&self, id: EntityId) -> bool {
        self.registry.contains(id) && !self.pending.is_removed(id)
    }

    /// Move every entity by its velocity, then run its update hook
    ///
    /// Hook errors are logged and the sweep continues with the next entity.
    pub fn update_entities(&mut self) {
        let delta_time = self.delta_time;
        self.begin_phase();
        for id in self.registry.get_all() {
            if !self.is_live(id) {
                continue;
            }
            let Some(mut entity) = self.registry.checkout(id) else {
                continue;
            };
            if !entity.core.is_destroyed() {
                entity.core.integrate(delta_time);
                let Entity { core, behavior } = &mut entity;
                if let Err(err) = behavior.on_update(core, self) {
                    log::error!("Update hook failed for {} {}: {}", core.tag(), core.id(), err);
                }
            }
            self.registry.restore(entity);
        }
        self.end_phase();
    }

    /// Run `me`'s collision hook against a snapshot of `other`
    pub(crate) fn notify_collision(&mut self, me: EntityId, other: EntityId) -> bool {
        let Some(other_core) = self.registry.core(other).cloned() else {
            return false;
        };
        let Some(mut entity) = self.registry.checkout(me) else {
            return false;
        };
        let Entity { core, behavior } = &mut entity;
        let handled = behavior.on_collide(core, &other_core, self);
        self.registry.restore(entity);
        handled
    }

    /// Unregister every entity flagged destroyed; returns how many were removed
    pub fn collect_destroyed(&mut self) -> usize {
        if self.in_phase() {
            log::warn!("collect_destroyed called inside a frame phase, skipping");
            return 0;
        }
        self.flush();
        let doomed = self.registry.filter(|entity| entity.core.is_destroyed());
        for id in &doomed {
            self.registry.unregister(*id);
        }
        if !doomed.is_empty() {
            log::trace!("Collected {} destroyed entities", doomed.len());
        }
        doomed.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::GameError;
    use crate::scene::behavior::{
        CollisionResponder, Drawable, EventListener, HookResult, Inert, Updatable,
    };
    use approx::assert_relative_eq;

    const ROCK: TypeTag = TypeTag::new("rock");
    const SPAWNER: TypeTag = TypeTag::new("spawner");

    /// Registers a rock on its first update and removes itself on the second
    struct Spawner {
        updates: u32,
    }

    impl Updatable<()> for Spawner {
        fn on_update(&mut self, core: &mut EntityCore, world: &mut World<()>) -> HookResult {
            self.updates += 1;
            match self.updates {
                1 => {
                    let rock = Entity::new(EntityCore::new(ROCK, core.position()), Inert);
                    assert!(world.register(rock));
                    assert_eq!(world.count_by_type(ROCK), 0);
                }
                2 => {
                    assert!(world.unregister(core.id()));
                    assert!(!world.contains(core.id()));
                }
                _ => {}
            }
            Ok(())
        }
    }
    impl Drawable for Spawner {}
    impl CollisionResponder<()> for Spawner {}
    impl EventListener<()> for Spawner {}

    struct Failing;

    impl Updatable<()> for Failing {
        fn on_update(&mut self, _core: &mut EntityCore, _world: &mut World<()>) -> HookResult {
            Err(GameError::GameLogic("boom".to_string()))
        }
    }
    impl Drawable for Failing {}
    impl CollisionResponder<()> for Failing {}
    impl EventListener<()> for Failing {}

    #[test]
    fn test_registration_deferred_during_phase() {
        let mut world = World::<()>::new(400, 300);
        let spawner = Entity::new(EntityCore::new(SPAWNER, Vec2::zeros()), Spawner { updates: 0 });
        let spawner_id = spawner.id();
        assert!(world.register(spawner));

        world.update_entities();
        assert_eq!(world.count_by_type(ROCK), 1);
        assert!(world.contains(spawner_id));

        world.update_entities();
        assert!(!world.contains(spawner_id));
        assert_eq!(world.entity_count(), 1);
    }

    #[test]
    fn test_duplicate_register_during_phase() {
        let mut world = World::<()>::new(400, 300);
        let id = EntityId::remote(ROCK, 1);
        world.begin_phase();
        assert!(world.register(Entity::new(EntityCore::with_id(id, ROCK, Vec2::zeros()), Inert)));
        assert!(!world.register(Entity::new(EntityCore::with_id(id, ROCK, Vec2::zeros()), Inert)));
        assert!(world.unregister(id));
        assert!(!world.contains(id));
        world.end_phase();
        assert_eq!(world.entity_count(), 0);
    }

    #[test]
    fn test_update_applies_delta_time() {
        let mut world = World::<()>::new(400, 300);
        let core = EntityCore::new(ROCK, Vec2::zeros()).with_velocity(Vec2::new(10.0, 0.0));
        let id = core.id();
        world.register(Entity::new(core, Inert));

        world.set_delta_time(0.05);
        world.update_entities();
        world.update_entities();
        assert_relative_eq!(world.core(id).unwrap().position().x, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_update_error_does_not_stop_sweep() {
        let mut world = World::<()>::new(400, 300);
        world.register(Entity::new(EntityCore::new(ROCK, Vec2::zeros()), Failing));
        let moving = EntityCore::new(ROCK, Vec2::zeros()).with_velocity(Vec2::new(0.0, 10.0));
        let id = moving.id();
        world.register(Entity::new(moving, Inert));

        world.set_delta_time(0.1);
        world.update_entities();
        assert_relative_eq!(world.core(id).unwrap().position().y, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_collect_destroyed() {
        let mut world = World::<()>::new(400, 300);
        let a = EntityCore::new(ROCK, Vec2::zeros());
        let b = EntityCore::new(ROCK, Vec2::zeros());
        let (a_id, b_id) = (a.id(), b.id());
        world.register(Entity::new(a, Inert));
        world.register(Entity::new(b, Inert));

        world.core_mut(a_id).unwrap().destroy();
        assert_eq!(world.collect_destroyed(), 1);
        assert!(!world.contains(a_id));
        assert!(world.contains(b_id));
    }

    #[test]
    fn test_loop_control_flags() {
        let mut world = World::<()>::new(400, 300);
        assert!(!world.is_paused());
        world.toggle_pause();
        world.toggle_debug();
        world.request_quit();
        assert_eq!(
            world.control(),
            LoopControl {
                quit_requested: true,
                paused: true,
                debug: true
            }
        );
        assert_eq!(world.level_bounds(), Rect::new(0.0, 0.0, 400.0, 300.0));
    }
}
