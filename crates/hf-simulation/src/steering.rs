//! Movement resolution for humans.
//!
//! A human moves toward its target at a mode-dependent speed, is pushed away
//! from other humans and from houses it is not heading into, and blends the
//! result into its current velocity instead of snapping to it.

use hf_core::{EntityId, Position};

use crate::config::SimConfig;

/// Everything the steering step needs to know about one mover.
#[derive(Debug, Clone, Copy)]
pub struct Mover {
    pub id: EntityId,
    pub position: Position,
    pub velocity: Position,
    pub target: Option<Position>,
    /// Speed multiplier for the current mode.
    pub boost: f64,
    /// Houses that do not repel this mover: its own and the one it heads for.
    pub passable: [Option<EntityId>; 2],
}

/// Result of one steering step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Motion {
    pub position: Position,
    pub velocity: Position,
}

impl Motion {
    /// Return `true` if the mover actually changed position.
    pub fn moved_from(&self, previous: Position) -> bool {
        self.position.distance_sq(previous) > 1e-12
    }
}

/// Inverse-distance-weighted push away from every point closer than `radius`.
fn separation(from: Position, others: impl Iterator<Item = Position>, radius: f64) -> Position {
    let mut push = Position::ORIGIN;
    for other in others {
        let away = from - other;
        let d = away.length();
        if d > 1e-6 && d < radius {
            push += away.normalized() * (1.0 / d);
        }
    }
    push
}

/// Advance `mover` by one tick.
///
/// `humans` yields the positions of every other human. `speed` is the game
/// speed multiplier; one tick covers `tick_rate / speed` wall seconds.
pub fn steer(
    mover: &Mover,
    humans: impl Iterator<Item = Position>,
    houses: impl Iterator<Item = (EntityId, Position)>,
    config: &SimConfig,
    speed: f64,
) -> Motion {
    let agents = &config.agents;
    let tick_rate = config.scheduler.tick_rate;
    let wall_dt = tick_rate / speed;

    let mut desired = Position::ORIGIN;
    let mut remaining = f64::INFINITY;
    if let Some(target) = mover.target {
        let to_target = target - mover.position;
        remaining = to_target.length();
        if remaining > agents.arrive_distance {
            desired = to_target.normalized() * (agents.base_speed * speed * mover.boost);
        }
    }

    let crowd = separation(mover.position, humans, agents.personal_space);
    let walls = separation(
        mover.position,
        houses
            .filter(|(id, _)| !mover.passable.contains(&Some(*id)))
            .map(|(_, p)| p),
        agents.house_space,
    );
    desired += (crowd + walls) * (agents.separation_strength * speed);

    let alpha = 1.0 - (-agents.steering_response * tick_rate).exp();
    let velocity = mover.velocity + (desired - mover.velocity) * alpha;

    let mut step = velocity * wall_dt;
    if mover.target.is_some() {
        step = step.clamp_length(remaining);
    }
    Motion {
        position: (mover.position + step).clamped(config.map_limit),
        velocity,
    }
}
