use hf_core::{Animal, Bonfire, EntityId, FoodSource, House, Human, Inventory, ResourceNode, Tree};
use serde::Serialize;

use crate::agent::Mode;

/// A human as seen from outside the engine.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HumanView {
    #[serde(flatten)]
    pub human: Human,
    pub mode: Mode,
}

/// Read-only copy of the whole simulation state after a tick.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorldSnapshot {
    pub tick: u64,
    pub year: f64,
    pub time_of_day: f64,
    pub is_night: bool,
    pub weather: String,
    pub population: usize,
    pub population_label: String,
    pub speed: f64,
    pub playing: bool,
    pub inventory: Inventory,
    pub humans: Vec<HumanView>,
    pub foods: Vec<FoodSource>,
    pub houses: Vec<House>,
    pub bonfires: Vec<Bonfire>,
    pub resources: Vec<ResourceNode>,
    pub trees: Vec<Tree>,
    pub animals: Vec<Animal>,
    /// Rendered event lines, newest first.
    pub events: Vec<String>,
}

/// Weather readout for the top bar.
pub fn weather(is_night: bool) -> &'static str {
    if is_night { "Night" } else { "Clear" }
}

/// Settlement label for the top bar.
///
/// While exactly the founders are alive they are named; afterwards the
/// label follows population size.
pub fn population_label(humans: &[&Human], founders: &[EntityId]) -> String {
    let only_founders = !founders.is_empty()
        && humans.len() == founders.len()
        && humans.iter().all(|h| founders.contains(&h.id));
    if only_founders {
        let names: Vec<&str> = humans.iter().map(|h| h.name.as_str()).collect();
        return format!("({})", names.join(" y "));
    }
    match humans.len() {
        0..10 => "Clan".to_string(),
        10..30 => "Village".to_string(),
        _ => "Town".to_string(),
    }
}
