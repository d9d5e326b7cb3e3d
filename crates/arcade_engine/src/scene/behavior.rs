//! Capability traits for entity hooks
//!
//! Every hook has a no-op default, so a behavior only implements what it
//! needs. The engine checks the entity out of the registry for the duration
//! of a hook, which is why the entity's own state arrives as a separate
//! `&mut EntityCore` next to the world.

use crate::game::GameError;
use crate::render::{Color, Surface};
use crate::scene::entity::EntityCore;
use crate::scene::world::World;
use crate::foundation::math::Vec2;
use std::any::Any;

/// Result type for fallible hooks
pub type HookResult = Result<(), GameError>;

/// Per-tick logic, run after velocity and spin have been applied
pub trait Updatable<E> {
    /// Advance game logic; `world.delta_time()` holds the clamped step
    fn on_update(&mut self, _core: &mut EntityCore, _world: &mut World<E>) -> HookResult {
        Ok(())
    }
}

/// Rendering of a single entity
pub trait Drawable {
    /// Draw the entity; only called while it is visible
    fn draw(&self, _core: &EntityCore, _surface: &mut dyn Surface) {}

    /// Outline colour for the debug overlay
    fn hitbox_color(&self) -> Color {
        Color::YELLOW
    }

    /// Draw the collision rectangle for the debug overlay
    fn draw_hitbox(&self, core: &EntityCore, surface: &mut dyn Surface) {
        let Some(rect) = core.hitbox_rect() else {
            return;
        };
        let color = self.hitbox_color();
        surface.fill_rect(rect, color.with_alpha(96));
        surface.stroke_rect(rect, color);
        surface.draw_text(
            &format!("{}x{}", rect.width, rect.height),
            Vec2::new(rect.left, rect.top - 15.0),
            Color::WHITE,
        );
    }
}

/// Reaction to overlapping another entity
pub trait CollisionResponder<E> {
    /// Called once per overlapping pair per tick, for both parties.
    ///
    /// `other` is a snapshot of the other entity's state. Return `true`
    /// when the collision was acted upon.
    fn on_collide(
        &mut self,
        _core: &mut EntityCore,
        _other: &EntityCore,
        _world: &mut World<E>,
    ) -> bool {
        false
    }
}

/// Reaction to broadcast game events
pub trait EventListener<E> {
    /// Return `true` when the event was handled
    fn on_game_event(&mut self, _core: &mut EntityCore, _event: &E, _world: &mut World<E>) -> bool {
        false
    }
}

/// Everything the engine can call on an entity
///
/// Implemented automatically for any type providing the four capability
/// traits.
pub trait Behavior<E>:
    Updatable<E> + Drawable + CollisionResponder<E> + EventListener<E> + Any
{
    /// Borrow as `Any` for downcasting
    fn as_any(&self) -> &dyn Any;

    /// Mutably borrow as `Any` for downcasting
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<E, T> Behavior<E> for T
where
    T: Updatable<E> + Drawable + CollisionResponder<E> + EventListener<E> + Any,
{
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Behavior with no hooks, for scenery and tests
#[derive(Debug, Default, Clone, Copy)]
pub struct Inert;

impl<E> Updatable<E> for Inert {}
impl Drawable for Inert {}
impl<E> CollisionResponder<E> for Inert {}
impl<E> EventListener<E> for Inert {}
