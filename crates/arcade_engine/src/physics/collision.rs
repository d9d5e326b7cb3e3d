//! Pairwise hitbox collision pass

use crate::foundation::math::Rect;
use crate::scene::entity::EntityId;
use crate::scene::world::World;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// How an entity that already handled a collision is treated for the
/// remaining pairs of the same pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionPolicy {
    /// Every overlapping pair is reported
    #[default]
    AllPairs,
    /// Once an entity reports a handled collision it sits out the rest of the pass
    FirstHandled,
}

/// Two entities whose hitboxes overlapped, in snapshot order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CollisionPair {
    /// Earlier in registration order
    pub entity_a: EntityId,
    /// Later in registration order
    pub entity_b: EntityId,
}

/// Summary of one collision pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollisionReport {
    /// Entities taking part in the sweep
    pub candidates: usize,
    /// Pairs whose rectangles were compared
    pub pairs_tested: usize,
    /// Overlapping pairs, in the order their hooks ran
    pub overlaps: Vec<CollisionPair>,
}

/// O(n^2) sweep over collision-active entities
#[derive(Debug, Clone, Copy, Default)]
pub struct CollisionDetector {
    policy: CollisionPolicy,
}

impl CollisionDetector {
    /// Create a detector with the given policy
    pub fn new(policy: CollisionPolicy) -> Self {
        Self { policy }
    }

    /// Active policy
    pub fn policy(&self) -> CollisionPolicy {
        self.policy
    }

    /// Run one pass: every unordered pair of collision-active entities is
    /// tested, and both parties of an overlap get `on_collide`
    ///
    /// The candidate list is fixed when the pass starts. Entities unregistered
    /// by an earlier pair's hooks are skipped for the remaining pairs; under
    /// `AllPairs` an entity merely flagged destroyed keeps colliding until the
    /// pass ends. Registrations made by hooks are applied when the pass ends.
    pub fn run<E>(&self, world: &mut World<E>) -> CollisionReport {
        let candidates: Vec<EntityId> = world
            .registry()
            .filter(|entity| entity.core.is_collision_active());

        let mut report = CollisionReport {
            candidates: candidates.len(),
            ..CollisionReport::default()
        };
        let mut finished: HashSet<EntityId> = HashSet::new();

        world.begin_phase();
        for (i, &a) in candidates.iter().enumerate() {
            for &b in &candidates[i + 1..] {
                if finished.contains(&a) {
                    break;
                }
                let Some(rect_a) = self.active_rect(world, a) else {
                    break;
                };
                if finished.contains(&b) {
                    continue;
                }
                let Some(rect_b) = self.active_rect(world, b) else {
                    continue;
                };

                report.pairs_tested += 1;
                if !rect_a.overlaps(&rect_b) {
                    continue;
                }

                report.overlaps.push(CollisionPair { entity_a: a, entity_b: b });
                let a_handled = world.notify_collision(a, b);
                let b_handled = world.notify_collision(b, a);

                if self.policy == CollisionPolicy::FirstHandled {
                    if a_handled {
                        finished.insert(a);
                    }
                    if b_handled {
                        finished.insert(b);
                    }
                }
            }
        }
        world.end_phase();

        if !report.overlaps.is_empty() {
            log::trace!(
                "Collision pass: {} candidates, {} pairs tested, {} overlaps",
                report.candidates,
                report.pairs_tested,
                report.overlaps.len()
            );
        }
        report
    }

    /// Current hitbox of a candidate still taking part in this pass
    fn active_rect<E>(&self, world: &World<E>, id: EntityId) -> Option<Rect> {
        if !world.is_live(id) {
            return None;
        }
        let core = world.core(id)?;
        if !core.collision_enabled() {
            return None;
        }
        if self.policy == CollisionPolicy::FirstHandled && core.is_destroyed() {
            return None;
        }
        core.hitbox_rect()
    }
}
