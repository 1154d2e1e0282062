use std::fmt;

use serde::{Deserialize, Serialize};

/// A building material tracked in the shared inventory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Material {
    Wood,
    Stone,
    Iron,
}

impl fmt::Display for Material {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Wood => write!(f, "wood"),
            Self::Stone => write!(f, "stone"),
            Self::Iron => write!(f, "iron"),
        }
    }
}

/// Settlement-wide material counters.
///
/// Counters are unsigned and [`Inventory::spend`] refuses to overdraw, so no
/// sequence of operations can leave a counter negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Inventory {
    pub wood: u32,
    pub stone: u32,
    pub iron: u32,
}

impl Inventory {
    /// Current amount of `material`.
    pub fn get(&self, material: Material) -> u32 {
        match material {
            Material::Wood => self.wood,
            Material::Stone => self.stone,
            Material::Iron => self.iron,
        }
    }

    fn slot_mut(&mut self, material: Material) -> &mut u32 {
        match material {
            Material::Wood => &mut self.wood,
            Material::Stone => &mut self.stone,
            Material::Iron => &mut self.iron,
        }
    }

    /// Return `true` if at least `amount` of `material` is stocked.
    pub fn has(&self, material: Material, amount: u32) -> bool {
        self.get(material) >= amount
    }

    /// Add `amount` of `material`.
    pub fn add(&mut self, material: Material, amount: u32) {
        let slot = self.slot_mut(material);
        *slot = slot.saturating_add(amount);
    }

    /// Remove `amount` of `material`. Returns `false` and leaves the
    /// counter untouched if there is not enough.
    pub fn spend(&mut self, material: Material, amount: u32) -> bool {
        let slot = self.slot_mut(material);
        match slot.checked_sub(amount) {
            Some(rest) => {
                *slot = rest;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_and_spend() {
        let mut inv = Inventory::default();
        inv.add(Material::Wood, 12);
        assert!(inv.spend(Material::Wood, 10));
        assert_eq!(inv.wood, 2);
    }

    #[test]
    fn overdraw_is_refused() {
        let mut inv = Inventory::default();
        inv.add(Material::Stone, 3);
        assert!(!inv.spend(Material::Stone, 4));
        assert_eq!(inv.stone, 3);
        assert!(inv.has(Material::Stone, 3));
        assert!(!inv.has(Material::Iron, 1));
    }
}
