//! Scene management: entities, their hooks, the registry and the world
//!
//! Game Engine Architecture, Ch. 16 (runtime gameplay foundations): objects
//! are updated in a fixed order each frame and removed only at well-defined
//! points so iteration never sees a half-mutated set.

pub mod behavior;
pub mod entity;
pub mod registry;
pub mod world;

pub use behavior::{
    Behavior, CollisionResponder, Drawable, EventListener, HookResult, Inert, Updatable,
};
pub use entity::{Entity, EntityCore, EntityError, EntityId, Hitbox, TypeTag};
pub use registry::ObjectRegistry;
pub use world::{LoopControl, World};
