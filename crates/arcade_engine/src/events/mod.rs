//! Event bus following Game Engine Architecture Ch 16.8
//!
//! - Events are a game-defined closed enum, each variant with a typed payload
//! - Delivery is synchronous: `emit` returns after every recipient has run
//! - The engine-level handler gets first refusal, then entities in
//!   registration order (optionally only those with a given tag)
//! - A recipient that emits again recurses immediately; cycles are the
//!   caller's responsibility

use crate::scene::entity::{Entity, TypeTag};
use crate::scene::world::World;

/// Nesting depth past which a warning is logged once per emission
const EMIT_DEPTH_WARNING: u32 = 32;

/// Engine-level event handler
///
/// Installed in the world's single handler slot. Returns true if the event
/// was acted upon; entities still receive the event either way.
pub trait EventHandler<E> {
    /// Handle an event before any entity sees it
    fn on_game_event(&mut self, event: &E, world: &mut World<E>) -> bool;
}

impl<E> World<E> {
    /// Install the engine-level handler, returning the previous one
    pub fn set_event_handler(
        &mut self,
        handler: Box<dyn EventHandler<E>>,
    ) -> Option<Box<dyn EventHandler<E>>> {
        self.handler.replace(handler)
    }

    /// Remove the engine-level handler
    pub fn take_event_handler(&mut self) -> Option<Box<dyn EventHandler<E>>> {
        self.handler.take()
    }

    /// Broadcast to the handler and every entity
    ///
    /// Returns the number of entities that reported handling the event.
    pub fn emit(&mut self, event: E) -> usize {
        self.emit_filtered(event, None)
    }

    /// Broadcast to the handler and to entities tagged `tag`
    pub fn emit_to(&mut self, event: E, tag: TypeTag) -> usize {
        self.emit_filtered(event, Some(tag))
    }

    /// Broadcast with an optional type filter on the entity recipients
    pub fn emit_filtered(&mut self, event: E, filter: Option<TypeTag>) -> usize {
        self.emit_depth += 1;
        if self.emit_depth == EMIT_DEPTH_WARNING {
            log::warn!("Event emission nested {} levels deep, possible emit cycle", self.emit_depth);
        }

        if let Some(mut handler) = self.handler.take() {
            handler.on_game_event(&event, self);
            // A handler installed while this one ran wins
            if self.handler.is_none() {
                self.handler = Some(handler);
            }
        }

        let recipients = match filter {
            Some(tag) => self.registry.get_by_type(tag),
            None => self.registry.get_all(),
        };

        let mut handled = 0;
        for id in recipients {
            if !self.is_live(id) {
                continue;
            }
            // Checked out: the emitter itself, or an entity further up the call stack
            let Some(mut entity) = self.registry.checkout(id) else {
                continue;
            };
            let Entity { core, behavior } = &mut entity;
            if behavior.on_game_event(core, &event, self) {
                handled += 1;
            }
            self.registry.restore(entity);
        }

        self.emit_depth -= 1;
        handled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec2;
    use crate::scene::behavior::{CollisionResponder, Drawable, EventListener, Updatable};
    use crate::scene::entity::EntityCore;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, Clone, PartialEq)]
    enum TestEvent {
        Score { points: u32 },
        Ping,
        Chain,
    }

    const PLAYER: TypeTag = TypeTag::new("player");
    const METEOR: TypeTag = TypeTag::new("meteor");

    type Log = Rc<RefCell<Vec<String>>>;

    struct Listener {
        name: &'static str,
        log: Log,
    }

    impl Updatable<TestEvent> for Listener {}
    impl Drawable for Listener {}
    impl CollisionResponder<TestEvent> for Listener {}
    impl EventListener<TestEvent> for Listener {
        fn on_game_event(
            &mut self,
            _core: &mut EntityCore,
            event: &TestEvent,
            world: &mut World<TestEvent>,
        ) -> bool {
            self.log.borrow_mut().push(format!("{}:{:?}", self.name, event));
            if *event == TestEvent::Chain {
                world.emit(TestEvent::Ping);
            }
            true
        }
    }

    struct Recorder {
        log: Log,
    }

    impl EventHandler<TestEvent> for Recorder {
        fn on_game_event(&mut self, event: &TestEvent, world: &mut World<TestEvent>) -> bool {
            self.log.borrow_mut().push(format!("engine:{event:?}"));
            if let TestEvent::Score { .. } = event {
                world.emit(TestEvent::Ping);
            }
            true
        }
    }

    fn listener(world: &mut World<TestEvent>, tag: TypeTag, name: &'static str, log: &Log) {
        let core = EntityCore::new(tag, Vec2::zeros());
        world.register(Entity::new(core, Listener { name, log: log.clone() }));
    }

    #[test]
    fn test_type_filter_limits_recipients() {
        let log = Log::default();
        let mut world = World::new(400, 300);
        listener(&mut world, METEOR, "meteor", &log);
        listener(&mut world, PLAYER, "player", &log);

        let handled = world.emit_to(TestEvent::Score { points: 10 }, PLAYER);
        assert_eq!(handled, 1);
        assert_eq!(*log.borrow(), vec!["player:Score { points: 10 }".to_string()]);
    }

    #[test]
    fn test_engine_handler_runs_first_and_in_registration_order() {
        let log = Log::default();
        let mut world = World::new(400, 300);
        world.set_event_handler(Box::new(Recorder { log: log.clone() }));
        listener(&mut world, PLAYER, "b", &log);
        listener(&mut world, METEOR, "a", &log);

        assert_eq!(world.emit(TestEvent::Score { points: 1 }), 2);
        assert_eq!(
            *log.borrow(),
            vec![
                "engine:Score { points: 1 }".to_string(),
                // nested emit from the handler reaches entities only
                "b:Ping".to_string(),
                "a:Ping".to_string(),
                "b:Score { points: 1 }".to_string(),
                "a:Score { points: 1 }".to_string(),
            ]
        );
    }

    #[test]
    fn test_nested_emit_skips_emitter() {
        let log = Log::default();
        let mut world = World::new(400, 300);
        listener(&mut world, PLAYER, "first", &log);
        listener(&mut world, PLAYER, "second", &log);

        world.emit(TestEvent::Chain);
        assert_eq!(
            *log.borrow(),
            vec![
                "first:Chain".to_string(),
                "second:Ping".to_string(),
                "second:Chain".to_string(),
                "first:Ping".to_string(),
            ]
        );
    }

    #[test]
    fn test_emit_without_recipients() {
        let mut world = World::<TestEvent>::new(400, 300);
        assert_eq!(world.emit(TestEvent::Ping), 0);
        assert_eq!(world.emit_to(TestEvent::Ping, METEOR), 0);
    }
}
