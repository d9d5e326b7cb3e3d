//! Entity data: identity, transform, kinematics, hitbox and lifecycle flags

use crate::foundation::math::{wrap_degrees, Rect, Vec2};
use crate::scene::behavior::Behavior;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;

static NEXT_LOCAL_ID: AtomicU64 = AtomicU64::new(1);

/// Classification label used for indexed lookup and event filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeTag(&'static str);

impl TypeTag {
    /// Create a tag from a static name
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    /// Tag name
    pub const fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Entity identifier, stable for the entity's lifetime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityId {
    /// Allocated locally when the entity was built
    Local(u64),
    /// Assigned by a remote authority (server-side ids are only unique per tag)
    Remote {
        /// Kind of remote object
        tag: TypeTag,
        /// Authority-assigned id
        id: u64,
    },
}

impl EntityId {
    /// Allocate a fresh local id
    pub fn next_local() -> Self {
        Self::Local(NEXT_LOCAL_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Id for an object mirrored from a remote authority
    pub const fn remote(tag: TypeTag, id: u64) -> Self {
        Self::Remote { tag, id }
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local(id) => write!(f, "#{id}"),
            Self::Remote { tag, id } => write!(f, "{tag}@{id}"),
        }
    }
}

/// Errors raised while building entities
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EntityError {
    /// Hitbox with negative or non-finite size
    #[error("Invalid hitbox {width}x{height}: dimensions must be finite and non-negative")]
    InvalidHitbox {
        /// Requested width
        width: f32,
        /// Requested height
        height: f32,
    },
}

/// Axis-aligned collision rectangle, positioned relative to its entity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hitbox {
    width: f32,
    height: f32,
    offset: Vec2,
}

impl Hitbox {
    /// Create a hitbox centred on the entity position
    pub fn new(width: f32, height: f32) -> Result<Self, EntityError> {
        if !(width.is_finite() && height.is_finite()) || width < 0.0 || height < 0.0 {
            return Err(EntityError::InvalidHitbox { width, height });
        }
        Ok(Self {
            width,
            height,
            offset: Vec2::zeros(),
        })
    }

    /// Shift the hitbox centre away from the entity position
    pub fn with_offset(mut self, offset: Vec2) -> Self {
        self.offset = offset;
        self
    }

    /// Width in pixels
    pub fn width(&self) -> f32 {
        self.width
    }

    /// Height in pixels
    pub fn height(&self) -> f32 {
        self.height
    }

    /// Offset of the centre from the entity position
    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    /// World-space rectangle for an entity at `position`
    pub fn rect_at(&self, position: Vec2) -> Rect {
        Rect::from_center(position + self.offset, self.width, self.height)
    }
}

/// Common state of every simulated object
///
/// Behavior hooks receive this mutably for their own entity and as a
/// read-only snapshot for the other party of a collision.
#[derive(Debug, Clone)]
pub struct EntityCore {
    id: EntityId,
    tag: TypeTag,
    position: Vec2,
    velocity: Vec2,
    rotation: f32,
    angular_velocity: f32,
    hitbox: Option<Hitbox>,
    collision_enabled: bool,
    visible: bool,
    destroyed: bool,
}

impl EntityCore {
    /// Create an entity at `position` with a freshly allocated local id
    pub fn new(tag: TypeTag, position: Vec2) -> Self {
        Self::with_id(EntityId::next_local(), tag, position)
    }

    /// Create an entity with an explicit id (mirrors of remote objects)
    pub fn with_id(id: EntityId, tag: TypeTag, position: Vec2) -> Self {
        Self {
            id,
            tag,
            position,
            velocity: Vec2::zeros(),
            rotation: 0.0,
            angular_velocity: 0.0,
            hitbox: None,
            collision_enabled: true,
            visible: true,
            destroyed: false,
        }
    }

    /// Set initial velocity (pixels per second)
    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.velocity = velocity;
        self
    }

    /// Set initial angle (degrees) and spin (degrees per second)
    pub fn with_rotation(mut self, angle: f32, angular_velocity: f32) -> Self {
        self.rotation = wrap_degrees(angle);
        self.angular_velocity = angular_velocity;
        self
    }

    /// Attach collision geometry
    pub fn with_hitbox(mut self, hitbox: Hitbox) -> Self {
        self.hitbox = Some(hitbox);
        self
    }

    /// Identifier
    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Type tag
    pub fn tag(&self) -> TypeTag {
        self.tag
    }

    /// Whether this entity carries `tag`
    pub fn is(&self, tag: TypeTag) -> bool {
        self.tag == tag
    }

    /// Position (top-left origin, y down)
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Move to `position`
    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    /// Velocity in pixels per second
    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// Set velocity in pixels per second
    pub fn set_velocity(&mut self, velocity: Vec2) {
        self.velocity = velocity;
    }

    /// Angle in degrees, always within `[0, 360)`
    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    /// Spin in degrees per second
    pub fn angular_velocity(&self) -> f32 {
        self.angular_velocity
    }

    /// Set angle (degrees) and spin (degrees per second)
    pub fn set_rotation(&mut self, angle: f32, angular_velocity: f32) {
        self.rotation = wrap_degrees(angle);
        self.angular_velocity = angular_velocity;
    }

    /// Collision geometry, if any
    pub fn hitbox(&self) -> Option<&Hitbox> {
        self.hitbox.as_ref()
    }

    /// Replace or remove the collision geometry
    pub fn set_hitbox(&mut self, hitbox: Option<Hitbox>) {
        self.hitbox = hitbox;
    }

    /// World-space hitbox rectangle, derived from the current position
    pub fn hitbox_rect(&self) -> Option<Rect> {
        self.hitbox.map(|hitbox| hitbox.rect_at(self.position))
    }

    /// Turn collision participation on or off without dropping the geometry
    pub fn set_collision_enabled(&mut self, enabled: bool) {
        self.collision_enabled = enabled;
    }

    /// Collision participation switch, independent of geometry and destruction
    pub fn collision_enabled(&self) -> bool {
        self.collision_enabled
    }

    /// Takes part in this tick's overlap sweep
    pub fn is_collision_active(&self) -> bool {
        self.hitbox.is_some() && self.collision_enabled && !self.destroyed
    }

    /// Drawn this frame
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Show or hide the entity; hidden entities still collide
    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Flip visibility (blink effects)
    pub fn toggle_visibility(&mut self) {
        self.visible = !self.visible;
    }

    /// Mark for removal at the next collection point
    pub fn destroy(&mut self) {
        self.destroyed = true;
    }

    /// Marked for removal
    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Euclidean distance from the entity position to `point`
    pub fn distance_to(&self, point: Vec2) -> f32 {
        (self.position - point).norm()
    }

    /// Apply velocity and spin for `delta_time` seconds
    pub fn integrate(&mut self, delta_time: f32) {
        self.position += self.velocity * delta_time;
        if self.angular_velocity != 0.0 {
            self.rotation = wrap_degrees(self.rotation + self.angular_velocity * delta_time);
        }
    }
}

/// A simulated object: shared state plus its game-specific behavior
pub struct Entity<E> {
    /// Shared state
    pub core: EntityCore,
    /// Hooks the engine calls
    pub behavior: Box<dyn Behavior<E>>,
}

impl<E> Entity<E> {
    /// Pair core state with a behavior
    pub fn new(core: EntityCore, behavior: impl Behavior<E>) -> Self {
        Self {
            core,
            behavior: Box::new(behavior),
        }
    }

    /// Identifier
    pub fn id(&self) -> EntityId {
        self.core.id()
    }

    /// Type tag
    pub fn tag(&self) -> TypeTag {
        self.core.tag()
    }

}

impl<E: 'static> Entity<E> {
    /// Downcast the behavior to its concrete type
    pub fn behavior_as<T: 'static>(&self) -> Option<&T> {
        self.behavior.as_any().downcast_ref::<T>()
    }

    /// Mutable downcast of the behavior
    pub fn behavior_as_mut<T: 'static>(&mut self) -> Option<&mut T> {
        self.behavior.as_any_mut().downcast_mut::<T>()
    }
}

impl<E> fmt::Debug for Entity<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entity").field("core", &self.core).finish_non_exhaustive()
    }
}
