use superplat_core::collision::{Axis, CollisionResult, Side, test_aabb};
use superplat_core::geometry::Vec2;

use crate::behavior::{Contact, Entity, Reaction};
use crate::body::Body;
use crate::context::TickContext;
use crate::physics::CollisionWorld;
use crate::tile::Tile;

/// Index of a body within the current tick. Invalidated when the level
/// removes destroyed entities at the end of the tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Handle {
    Tile(usize),
    Entity(usize),
}

/// Nearest-K candidate selector with a per-tick candidate cache.
///
/// The candidate set (every collidable tile, then every collidable entity) is
/// built on the first query of a tick and reused until [`BroadPhase::clear`].
/// Each query keeps only the `neighbors` candidates closest to the mover's
/// position, the mover itself included. A farther body overlapping the mover
/// is missed when more than that many candidates are closer.
#[derive(Debug, Clone)]
pub struct BroadPhase {
    neighbors: usize,
    candidates: Vec<Handle>,
    built: bool,
    scratch: Vec<(f32, Handle)>,
}

impl BroadPhase {
    pub fn new(neighbors: usize) -> Self {
        Self {
            neighbors,
            candidates: Vec::new(),
            built: false,
            scratch: Vec::new(),
        }
    }

    pub fn is_built(&self) -> bool {
        self.built
    }

    pub fn candidates(&self) -> &[Handle] {
        &self.candidates
    }

    /// Build the candidate cache unless it already exists for this tick.
    pub fn ensure_built(&mut self, tiles: &[Tile], entities: &[Entity]) {
        if self.built {
            return;
        }
        self.candidates.clear();
        self.candidates.extend(
            tiles
                .iter()
                .enumerate()
                .filter(|(_, t)| t.body.collidable)
                .map(|(i, _)| Handle::Tile(i)),
        );
        self.candidates.extend(
            entities
                .iter()
                .enumerate()
                .filter(|(_, e)| e.body.collidable && !e.body.is_destroyed())
                .map(|(i, _)| Handle::Entity(i)),
        );
        self.built = true;
        let candidates = self.candidates.len();
        tracing::trace!(candidates, "broad-phase cache built");
    }

    /// Drop the cache so the next query rebuilds it from current state.
    pub fn clear(&mut self) {
        self.candidates.clear();
        self.built = false;
    }

    /// Cached candidates nearest to `origin`, closest first.
    ///
    /// Equal distances keep cache order, so ties always resolve the same way.
    pub fn nearest(
        &mut self,
        origin: Vec2,
        position_of: impl Fn(Handle) -> Option<Vec2>,
    ) -> Vec<Handle> {
        self.scratch.clear();
        self.scratch.extend(
            self.candidates
                .iter()
                .filter_map(|&h| position_of(h).map(|p| (origin.distance(p), h))),
        );
        self.scratch.sort_by(|a, b| a.0.total_cmp(&b.0));
        self.scratch
            .iter()
            .take(self.neighbors)
            .map(|&(_, h)| h)
            .collect()
    }
}

fn body_of<'a>(tiles: &'a [Tile], entities: &'a [Entity], handle: Handle) -> Option<&'a Body> {
    match handle {
        Handle::Tile(i) => tiles.get(i).map(|t| &t.body),
        Handle::Entity(i) => entities.get(i).map(|e| &e.body),
    }
}

/// Mutable references to two distinct elements.
fn pair_mut<T>(items: &mut [T], a: usize, b: usize) -> Option<(&mut T, &mut T)> {
    if a == b || a.max(b) >= items.len() {
        return None;
    }
    if a < b {
        let (low, high) = items.split_at_mut(b);
        Some((&mut low[a], &mut high[0]))
    } else {
        let (low, high) = items.split_at_mut(a);
        Some((&mut high[0], &mut low[b]))
    }
}

/// Borrowed view of a level for the duration of one body's integration.
///
/// Runs broad-phase queries and dispatches every hit to both participants:
/// the mover's handler first, then the candidate's with the opposite side.
pub struct Scene<'a> {
    pub tiles: &'a [Tile],
    pub entities: &'a mut [Entity],
    pub broadphase: &'a mut BroadPhase,
    pub ctx: &'a mut TickContext,
}

impl Scene<'_> {
    fn body(&self, handle: Handle) -> Option<&Body> {
        body_of(self.tiles, &*self.entities, handle)
    }

    fn candidate_accepts(&self, candidate: Handle, mover: &Body, axis: Axis) -> bool {
        match candidate {
            Handle::Tile(i) => self
                .tiles
                .get(i)
                .is_some_and(|t| t.is_collidable(mover, axis)),
            Handle::Entity(i) => self
                .entities
                .get(i)
                .is_some_and(|e| e.body.collidable && !e.body.is_destroyed()),
        }
    }

    fn dispatch(&mut self, mover: Handle, hit: CollisionResult<Handle>, axis: Axis) {
        tracing::trace!(
            ?mover,
            candidate = ?hit.candidate,
            side = ?hit.side,
            ?axis,
            penetration = hit.penetration,
            "contact"
        );
        let (candidate, penetration) = (hit.candidate, hit.penetration);
        if let Some(reaction) = self.notify(mover, candidate, penetration, hit.side, axis) {
            self.apply(candidate, reaction);
        }
        if let Some(reaction) =
            self.notify(candidate, mover, penetration, hit.opposite_side, axis)
        {
            self.apply(mover, reaction);
        }
    }

    /// Deliver one side of a contact. Tiles have no handler.
    fn notify(
        &mut self,
        receiver: Handle,
        other: Handle,
        penetration: f32,
        side: Side,
        axis: Axis,
    ) -> Option<Reaction> {
        let Handle::Entity(r) = receiver else {
            return None;
        };
        match other {
            Handle::Tile(t) => {
                let tiles = self.tiles;
                let tile = tiles.get(t)?;
                let contact = Contact {
                    other: &tile.body,
                    other_kind: tile.entity_kind(),
                    penetration,
                    side,
                    axis,
                    from_bounds: tile.body.previous_bounds(),
                };
                let (behavior, actor) = self.entities.get_mut(r)?.split();
                behavior.on_collision(actor, &contact, self.ctx)
            },
            Handle::Entity(o) => {
                let (receiver, other) = pair_mut(self.entities, r, o)?;
                let contact = Contact {
                    other: &other.body,
                    other_kind: other.kind(),
                    penetration,
                    side,
                    axis,
                    from_bounds: other.body.previous_bounds(),
                };
                let (behavior, actor) = receiver.split();
                behavior.on_collision(actor, &contact, self.ctx)
            },
        }
    }

    fn apply(&mut self, target: Handle, reaction: Reaction) {
        let Handle::Entity(i) = target else {
            return;
        };
        if let Some(entity) = self.entities.get_mut(i) {
            let (behavior, actor) = entity.split();
            behavior.react(actor, reaction, self.ctx);
        }
    }
}

impl CollisionWorld for Scene<'_> {
    type Handle = Handle;

    fn body_mut(&mut self, handle: Handle) -> Option<&mut Body> {
        match handle {
            // Static geometry is never integrated.
            Handle::Tile(_) => None,
            Handle::Entity(i) => self.entities.get_mut(i).map(|e| &mut e.body),
        }
    }

    fn test_collisions(&mut self, mover: Handle, axis: Axis) {
        self.broadphase.ensure_built(self.tiles, &*self.entities);
        let Some(origin) = self.body(mover).map(|b| b.position) else {
            return;
        };
        let tiles = self.tiles;
        let entities: &[Entity] = &*self.entities;
        let nearest = self
            .broadphase
            .nearest(origin, |h| body_of(tiles, entities, h).map(|b| b.position));

        for candidate in nearest {
            if candidate == mover {
                continue;
            }
            let (Some(mover_body), Some(candidate_body)) =
                (self.body(mover), self.body(candidate))
            else {
                continue;
            };
            // A handler may have taken the mover out of play mid-query.
            if !mover_body.collidable {
                break;
            }
            if !self.candidate_accepts(candidate, mover_body, axis) {
                continue;
            }
            let hit = test_aabb(&mover_body.bounds(), candidate, &candidate_body.bounds());
            if let Some(hit) = hit {
                self.dispatch(mover, hit, axis);
            }
        }
    }

    fn level_width(&self) -> f32 {
        self.ctx.bounds.width
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::behavior::{Actor, Behavior, Kind, Motion};
    use crate::config::LevelConfig;
    use crate::context::LevelBounds;
    use crate::tile::TileKind;
    use std::cell::RefCell;
    use std::rc::Rc;
    use superplat_core::animation::AnimationSequencer;

    /// Records every contact it receives and optionally answers with a reaction.
    #[derive(Debug, Default)]
    struct Recorder {
        seen: Rc<RefCell<Vec<(Kind, Side, Axis)>>>,
        reply: Option<Reaction>,
        reacted: Rc<RefCell<Vec<Reaction>>>,
        kind: Option<Kind>,
    }

    impl Behavior for Recorder {
        fn kind(&self) -> Kind {
            self.kind.unwrap_or(Kind::Enemy)
        }

        fn update(&mut self, _actor: Actor<'_>, _ctx: &mut TickContext) -> Motion {
            Motion::Integrate
        }

        fn on_collision(
            &mut self,
            mut actor: Actor<'_>,
            contact: &Contact<'_>,
            _ctx: &mut TickContext,
        ) -> Option<Reaction> {
            self.seen
                .borrow_mut()
                .push((contact.other_kind, contact.side, contact.axis));
            actor.resolve(contact);
            self.reply
        }

        fn react(&mut self, _actor: Actor<'_>, reaction: Reaction, _ctx: &mut TickContext) {
            self.reacted.borrow_mut().push(reaction);
        }
    }

    fn recorder_entity(position: Vec2, recorder: Recorder) -> Entity {
        let body = Body::new(position, 16, 16);
        Entity::new(body, AnimationSequencer::new(), recorder)
    }

    fn ctx() -> TickContext {
        TickContext::new(LevelConfig::default(), LevelBounds::new(1000.0, 1000.0))
    }

    #[test]
    fn nearest_keeps_k_closest_in_stable_order() {
        let tiles: Vec<Tile> = (0..5)
            .map(|i| Tile::solid(Vec2::new(i as f32 * 16.0, 0.0), 16))
            .collect();
        let mut bp = BroadPhase::new(3);
        bp.ensure_built(&tiles, &[]);
        assert_eq!(bp.candidates().len(), 5);

        // Equidistant from tiles 1 and 3: the earlier one wins the tie.
        let origin = Vec2::new(32.0, 0.0);
        let nearest = bp.nearest(origin, |h| body_of(&tiles, &[], h).map(|b| b.position));
        assert_eq!(
            nearest,
            vec![Handle::Tile(2), Handle::Tile(1), Handle::Tile(3)]
        );
    }

    #[test]
    fn cache_is_built_once_until_cleared() {
        let mut tiles = vec![Tile::solid(Vec2::ZERO, 16)];
        let mut bp = BroadPhase::new(12);
        bp.ensure_built(&tiles, &[]);
        tiles.push(Tile::solid(Vec2::new(16.0, 0.0), 16));
        bp.ensure_built(&tiles, &[]);
        assert_eq!(bp.candidates().len(), 1, "cache reused within the tick");

        bp.clear();
        assert!(!bp.is_built());
        bp.ensure_built(&tiles, &[]);
        assert_eq!(bp.candidates().len(), 2);
    }

    #[test]
    fn non_collidable_bodies_are_not_candidates() {
        let tiles = vec![
            Tile::solid(Vec2::ZERO, 16),
            Tile::new(Vec2::new(16.0, 0.0), 16, TileKind::Solid, false),
        ];
        let mut ghost = recorder_entity(Vec2::ZERO, Recorder::default());
        ghost.body.collidable = false;
        let mut gone = recorder_entity(Vec2::ZERO, Recorder::default());
        gone.body.destroy();
        let live = recorder_entity(Vec2::ZERO, Recorder::default());
        let entities = vec![ghost, gone, live];

        let mut bp = BroadPhase::new(12);
        bp.ensure_built(&tiles, &entities);
        assert_eq!(bp.candidates(), &[Handle::Tile(0), Handle::Entity(2)]);
    }

    #[test]
    fn zero_neighbors_means_no_resolution() {
        let tiles = vec![Tile::solid(Vec2::new(0.0, 8.0), 16)];
        let mut entities = vec![recorder_entity(Vec2::ZERO, Recorder::default())];
        let mut bp = BroadPhase::new(0);
        let mut ctx = ctx();
        let mut scene = Scene {
            tiles: &tiles,
            entities: &mut entities,
            broadphase: &mut bp,
            ctx: &mut ctx,
        };
        scene.test_collisions(Handle::Entity(0), Axis::Y);
        assert_eq!(entities[0].body.position, Vec2::ZERO);
    }

    #[test]
    fn dispatch_is_symmetric_with_opposite_sides() {
        let mover_recorder = Recorder::default();
        let mover_seen = Rc::clone(&mover_recorder.seen);
        let other_recorder = Recorder {
            kind: Some(Kind::Coin),
            ..Recorder::default()
        };
        let other_seen = Rc::clone(&other_recorder.seen);

        // Mover's feet overlap the top of the other body by 2.
        let mut entities = vec![
            recorder_entity(Vec2::new(0.0, 0.0), mover_recorder),
            recorder_entity(Vec2::new(0.0, 14.0), other_recorder),
        ];
        let mut bp = BroadPhase::new(12);
        let mut ctx = ctx();
        let mut scene = Scene {
            tiles: &[],
            entities: &mut entities,
            broadphase: &mut bp,
            ctx: &mut ctx,
        };
        scene.test_collisions(Handle::Entity(0), Axis::Y);

        assert_eq!(
            *mover_seen.borrow(),
            vec![(Kind::Coin, Side::Bottom, Axis::Y)]
        );
        assert_eq!(
            *other_seen.borrow(),
            vec![(Kind::Enemy, Side::Top, Axis::Y)]
        );
    }

    #[test]
    fn reactions_reach_the_other_participant() {
        let mover_recorder = Recorder::default();
        let mover_reacted = Rc::clone(&mover_recorder.reacted);
        let other_recorder = Recorder {
            reply: Some(Reaction::Bounce),
            ..Recorder::default()
        };
        let other_reacted = Rc::clone(&other_recorder.reacted);

        let mut entities = vec![
            recorder_entity(Vec2::new(0.0, 0.0), mover_recorder),
            recorder_entity(Vec2::new(0.0, 14.0), other_recorder),
        ];
        let mut bp = BroadPhase::new(12);
        let mut ctx = ctx();
        let mut scene = Scene {
            tiles: &[],
            entities: &mut entities,
            broadphase: &mut bp,
            ctx: &mut ctx,
        };
        scene.test_collisions(Handle::Entity(0), Axis::Y);

        assert_eq!(*mover_reacted.borrow(), vec![Reaction::Bounce]);
        assert!(other_reacted.borrow().is_empty());
    }

    #[test]
    fn one_way_platform_is_skipped_from_below() {
        let tiles = vec![Tile::platform(Vec2::new(0.0, 16.0), 16, false, false)];
        let recorder = Recorder::default();
        let seen = Rc::clone(&recorder.seen);
        // Previous bottom at 24: already below the platform top.
        let mut entity = recorder_entity(Vec2::new(0.0, 8.0), recorder);
        entity.body.snapshot_bounds();
        entity.body.set_position(Vec2::new(0.0, 4.0));
        let mut entities = vec![entity];

        let mut bp = BroadPhase::new(12);
        let mut ctx = ctx();
        let mut scene = Scene {
            tiles: &tiles,
            entities: &mut entities,
            broadphase: &mut bp,
            ctx: &mut ctx,
        };
        scene.test_collisions(Handle::Entity(0), Axis::Y);
        assert!(seen.borrow().is_empty());
        assert_eq!(entities[0].body.position, Vec2::new(0.0, 4.0));
    }

    #[test]
    fn mover_is_never_its_own_candidate() {
        let recorder = Recorder::default();
        let seen = Rc::clone(&recorder.seen);
        let mut entities = vec![recorder_entity(Vec2::ZERO, recorder)];
        let mut bp = BroadPhase::new(12);
        let mut ctx = ctx();
        let mut scene = Scene {
            tiles: &[],
            entities: &mut entities,
            broadphase: &mut bp,
            ctx: &mut ctx,
        };
        scene.test_collisions(Handle::Entity(0), Axis::X);
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn only_the_nearest_k_get_contacts() {
        let near = Recorder::default();
        let near_seen = Rc::clone(&near.seen);
        let far = Recorder::default();
        let far_seen = Rc::clone(&far.seen);

        // Both overlap the mover's feet, but with room for the mover plus one
        // candidate only the nearer body is tested.
        let mut entities = vec![
            recorder_entity(Vec2::ZERO, Recorder::default()),
            recorder_entity(Vec2::new(0.0, 15.0), far),
            recorder_entity(Vec2::new(0.0, 14.0), near),
        ];
        let mut bp = BroadPhase::new(2);
        let mut ctx = ctx();
        let mut scene = Scene {
            tiles: &[],
            entities: &mut entities,
            broadphase: &mut bp,
            ctx: &mut ctx,
        };
        scene.test_collisions(Handle::Entity(0), Axis::Y);

        assert_eq!(*near_seen.borrow(), [(Kind::Enemy, Side::Top, Axis::Y)]);
        assert!(far_seen.borrow().is_empty());
    }

    #[test]
    fn pair_mut_rejects_aliasing_and_out_of_range() {
        let mut v = [1, 2, 3];
        assert!(pair_mut(&mut v, 1, 1).is_none());
        assert!(pair_mut(&mut v, 0, 3).is_none());
        let (a, b) = pair_mut(&mut v, 2, 0).unwrap();
        assert_eq!((*a, *b), (3, 1));
    }
}
