use std::collections::BTreeMap;

use hf_core::{EntityId, Position, World};

/// The closest match of a nearest-neighbor search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Nearest {
    pub id: EntityId,
    pub position: Position,
    pub distance: f64,
}

/// Find the candidate closest to `from`, optionally only within `radius`.
///
/// Ties go to the first candidate yielded, so callers that iterate in id
/// order get reproducible picks.
pub fn nearest(
    from: Position,
    candidates: impl IntoIterator<Item = (EntityId, Position)>,
    radius: Option<f64>,
) -> Option<Nearest> {
    let limit_sq = radius.map(|r| r * r).unwrap_or(f64::INFINITY);
    let mut best: Option<(EntityId, Position, f64)> = None;
    for (id, position) in candidates {
        let d_sq = from.distance_sq(position);
        if d_sq > limit_sq {
            continue;
        }
        if best.is_none_or(|(_, _, b)| d_sq < b) {
            best = Some((id, position, d_sq));
        }
    }
    best.map(|(id, position, d_sq)| Nearest {
        id,
        position,
        distance: d_sq.sqrt(),
    })
}

/// Side table of id to current continuous position for fast-moving entities.
///
/// Not a source of truth: the [`World`] owns the entities. An id missing here
/// falls back to the entity's stored position; an id removed from the world
/// must be removed here in the same tick.
#[derive(Debug, Clone, Default)]
pub struct SpatialLookup {
    positions: BTreeMap<EntityId, Position>,
}

impl SpatialLookup {
    /// Create an empty lookup.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the current position of `id`.
    pub fn set(&mut self, id: EntityId, position: Position) {
        self.positions.insert(id, position);
    }

    /// Current position of `id`, if tracked.
    pub fn get(&self, id: EntityId) -> Option<Position> {
        self.positions.get(&id).copied()
    }

    /// Current position of `id`, or `fallback` if not yet positioned.
    pub fn get_or(&self, id: EntityId, fallback: Position) -> Position {
        self.get(id).unwrap_or(fallback)
    }

    /// Stop tracking `id`. Returns its last position.
    pub fn remove(&mut self, id: EntityId) -> Option<Position> {
        self.positions.remove(&id)
    }

    /// Return `true` if `id` is tracked.
    pub fn contains(&self, id: EntityId) -> bool {
        self.positions.contains_key(&id)
    }

    /// Iterate all tracked `(id, position)` pairs in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = (EntityId, Position)> + '_ {
        self.positions.iter().map(|(id, p)| (*id, *p))
    }

    /// Call `f` for every tracked entry.
    pub fn for_each(&self, mut f: impl FnMut(EntityId, Position)) {
        for (id, p) in &self.positions {
            f(*id, *p);
        }
    }

    /// Keep only ids for which `keep` returns `true`.
    pub fn retain(&mut self, mut keep: impl FnMut(EntityId) -> bool) {
        self.positions.retain(|id, _| keep(*id));
    }

    /// Number of tracked entries.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Return `true` if nothing is tracked.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Position trackers for everything that moves: humans and animals.
#[derive(Debug, Clone, Default)]
pub struct Tracking {
    pub humans: SpatialLookup,
    pub animals: SpatialLookup,
}

impl Tracking {
    /// Create empty trackers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed positions for every human and animal not yet tracked.
    pub fn seed_from(&mut self, world: &World) {
        for human in world.humans() {
            if !self.humans.contains(human.id) {
                self.humans.set(human.id, human.position);
            }
        }
        for animal in world.animals() {
            if !self.animals.contains(animal.id) {
                self.animals.set(animal.id, animal.position);
            }
        }
    }

    /// Drop entries whose entity no longer exists in `world`.
    pub fn prune(&mut self, world: &World) {
        self.humans.retain(|id| world.human(id).is_some());
        self.animals.retain(|id| world.animal(id).is_some());
    }
}
