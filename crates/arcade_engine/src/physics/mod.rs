//! Physics: hitbox overlap detection
//!
//! Based on Game Engine Architecture 3rd Edition, Chapter 13. Only the
//! narrow phase exists here; at a few dozen entities a brute-force pair
//! sweep is the whole broad phase.

pub mod collision;

pub use collision::{CollisionDetector, CollisionPair, CollisionPolicy, CollisionReport};
