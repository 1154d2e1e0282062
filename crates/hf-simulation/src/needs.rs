//! Hunger decay and the shelter model.

use hf_core::{HouseLevel, Human, Position, World};

use crate::config::EcologyConfig;

/// What is protecting a human from the elements right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shelter {
    /// Nothing nearby.
    Exposed,
    /// Close to the human's own house.
    House(HouseLevel),
    /// Close to a bonfire.
    Bonfire,
}

impl Shelter {
    /// Work out the shelter for `human` standing at `position`.
    ///
    /// The owned house wins over a bonfire.
    pub fn of(world: &World, human: &Human, position: Position, eco: &EcologyConfig) -> Self {
        if let Some(house) = world
            .house_of(human.id)
            .filter(|house| house.position.within(position, eco.house_shelter_radius))
        {
            return Self::House(house.level);
        }
        if world
            .bonfires()
            .any(|b| b.position.within(position, eco.bonfire_radius))
        {
            return Self::Bonfire;
        }
        Self::Exposed
    }

    pub fn is_protected(self) -> bool {
        self != Self::Exposed
    }
}

/// Hunger lost this tick.
///
/// A house reduces the base rate by its tier bonus. Exposure at night
/// multiplies it. Never negative, so hunger only rises by eating.
pub fn hunger_decay(eco: &EcologyConfig, shelter: Shelter, is_night: bool) -> f64 {
    let mut decay = eco.hunger_decay;
    if let Shelter::House(level) = shelter {
        let tier = usize::from(level.tier().saturating_sub(1)).min(eco.house_bonus.len() - 1);
        decay -= eco.house_bonus[tier];
    }
    if is_night && !shelter.is_protected() {
        decay *= eco.night_multiplier;
    }
    decay.max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hf_core::{Bonfire, House};

    fn eco() -> EcologyConfig {
        EcologyConfig::default()
    }

    #[test]
    fn exposed_decay_doubles_at_night() {
        let day = hunger_decay(&eco(), Shelter::Exposed, false);
        let night = hunger_decay(&eco(), Shelter::Exposed, true);
        assert!((day - 0.15).abs() < 1e-9);
        assert!((night - 0.30).abs() < 1e-9);
    }

    #[test]
    fn better_houses_protect_more() {
        let wood = hunger_decay(&eco(), Shelter::House(HouseLevel::Wood), true);
        let stone = hunger_decay(&eco(), Shelter::House(HouseLevel::Stone), true);
        let iron = hunger_decay(&eco(), Shelter::House(HouseLevel::Iron), true);
        assert!((wood - 0.05).abs() < 1e-9);
        assert!(stone < wood);
        assert!(iron <= stone);
        assert!(iron >= 0.0);
    }

    #[test]
    fn bonfire_blocks_the_night_penalty() {
        let decay = hunger_decay(&eco(), Shelter::Bonfire, true);
        assert!((decay - 0.15).abs() < 1e-9);
    }

    #[test]
    fn own_house_beats_bonfire() {
        let mut world = World::new();
        let house = world.add_house(House::new(Position::new(1.0, 0.0))).unwrap();
        world.add_bonfire(Bonfire::new(Position::ORIGIN)).unwrap();
        let id = world
            .add_human(Human::new("Nora", Position::ORIGIN))
            .unwrap();
        world.assign_house(id, house).unwrap();
        let human = world.human(id).unwrap();

        assert_eq!(
            Shelter::of(&world, human, Position::ORIGIN, &eco()),
            Shelter::House(HouseLevel::Wood)
        );
        assert_eq!(
            Shelter::of(&world, human, Position::new(-3.0, 0.0), &eco()),
            Shelter::Bonfire
        );
        assert_eq!(
            Shelter::of(&world, human, Position::new(-30.0, 0.0), &eco()),
            Shelter::Exposed
        );
    }

    #[test]
    fn someone_elses_house_is_no_shelter() {
        let mut world = World::new();
        world.add_house(House::new(Position::ORIGIN)).unwrap();
        let id = world.add_human(Human::new("Hugo", Position::ORIGIN)).unwrap();
        let human = world.human(id).unwrap();
        assert_eq!(
            Shelter::of(&world, human, Position::ORIGIN, &eco()),
            Shelter::Exposed
        );
    }
}
