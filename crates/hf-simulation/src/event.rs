use std::collections::VecDeque;
use std::fmt;

use hf_core::{EntityId, HouseLevel, ResourceKind};
use serde::Serialize;

/// Narrative category shown as the `[Category]` prefix of an event line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EventCategory {
    System,
    History,
    Birth,
    Death,
    Construction,
    Technology,
    Advance,
    Mining,
    Evolution,
}

impl fmt::Display for EventCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::System => "System",
            Self::History => "History",
            Self::Birth => "Birth",
            Self::Death => "Death",
            Self::Construction => "Construction",
            Self::Technology => "Technology",
            Self::Advance => "Advance",
            Self::Mining => "Mining",
            Self::Evolution => "Evolution",
        };
        write!(f, "{label}")
    }
}

/// What kind of simulation event occurred.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum SimEventKind {
    /// World generation and other engine notices.
    System,
    /// Flavor text about the settlement's era.
    History,
    /// A child was born.
    Birth {
        /// The newborn.
        child: EntityId,
        /// Both parents.
        parents: [EntityId; 2],
    },
    /// A human starved.
    Death {
        /// The human that died.
        entity: EntityId,
        /// Experience at the time of death.
        xp: f64,
    },
    /// A human founded a new house.
    HouseBuilt {
        /// The new house.
        house: EntityId,
        /// The builder, who owns it.
        owner: EntityId,
    },
    /// A house reached a higher material tier.
    HouseUpgraded {
        /// The upgraded house.
        house: EntityId,
        /// Its new tier.
        level: HouseLevel,
    },
    /// A bonfire was lit.
    BonfireLit {
        /// The new bonfire.
        bonfire: EntityId,
        /// The human who lit it, if any.
        by: Option<EntityId>,
    },
    /// A wild food source was turned into a farm.
    FarmFounded {
        /// The food source.
        food: EntityId,
        /// The farmer.
        by: EntityId,
    },
    /// A resource node ran out.
    ResourceDepleted {
        /// The removed node.
        resource: EntityId,
        /// What it yielded.
        kind: ResourceKind,
    },
}

impl SimEventKind {
    /// The narrative category this kind is filed under.
    pub fn category(&self) -> EventCategory {
        match self {
            Self::System => EventCategory::System,
            Self::History => EventCategory::History,
            Self::Birth { .. } => EventCategory::Birth,
            Self::Death { .. } => EventCategory::Death,
            Self::HouseBuilt { .. } => EventCategory::Construction,
            Self::HouseUpgraded { .. } => EventCategory::Evolution,
            Self::BonfireLit { .. } => EventCategory::Technology,
            Self::FarmFounded { .. } => EventCategory::Advance,
            Self::ResourceDepleted { .. } => EventCategory::Mining,
        }
    }

    /// Check whether a given entity is involved in this event.
    pub fn involves(&self, id: EntityId) -> bool {
        match self {
            Self::System | Self::History => false,
            Self::Birth { child, parents } => *child == id || parents.contains(&id),
            Self::Death { entity, .. } => *entity == id,
            Self::HouseBuilt { house, owner } => *house == id || *owner == id,
            Self::HouseUpgraded { house, .. } => *house == id,
            Self::BonfireLit { bonfire, by } => *bonfire == id || *by == Some(id),
            Self::FarmFounded { food, by } => *food == id || *by == id,
            Self::ResourceDepleted { resource, .. } => *resource == id,
        }
    }
}

/// A record of something that happened during simulation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimEvent {
    /// The simulation tick when this event occurred.
    pub tick: u64,
    /// The specific kind of event that occurred.
    pub kind: SimEventKind,
    /// A human-readable description of the event.
    pub description: String,
}

impl SimEvent {
    /// Create a new simulation event with the given tick, kind, and description.
    pub fn new(tick: u64, kind: SimEventKind, description: impl Into<String>) -> Self {
        Self {
            tick,
            kind,
            description: description.into(),
        }
    }
}

impl fmt::Display for SimEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind.category(), self.description)
    }
}

/// Bounded log of notable events, most recent first.
#[derive(Debug, Default, Clone)]
pub struct EventLog {
    events: VecDeque<SimEvent>,
    max_events: usize,
}

impl EventLog {
    /// Create a new event log with the given maximum capacity (0 = unlimited).
    pub fn new(max_events: usize) -> Self {
        Self {
            events: VecDeque::new(),
            max_events,
        }
    }

    /// Record an event at the front, evicting the oldest past capacity.
    pub fn push(&mut self, event: SimEvent) {
        self.events.push_front(event);
        if self.max_events > 0 {
            self.events.truncate(self.max_events);
        }
    }

    /// Iterate events from newest to oldest.
    pub fn iter(&self) -> impl Iterator<Item = &SimEvent> + '_ {
        self.events.iter()
    }

    /// The most recent event, if any.
    pub fn latest(&self) -> Option<&SimEvent> {
        self.events.front()
    }

    /// Rendered `[Category] message` lines, newest first.
    pub fn lines(&self) -> Vec<String> {
        self.events.iter().map(ToString::to_string).collect()
    }

    /// Return the number of recorded events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Return `true` if no events have been recorded.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
