// Equippable parts: slots, stat modifier deltas, Core ability descriptor

use crate::game::abilities::AbilityDescriptor;

/// The four part slots of a top; at most one part per slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EquipmentSlot {
    /// Contact point - typically trades defense for attack
    Tip,
    /// Main chassis - weight and spin capacity
    Body,
    /// Outer ring - attack power and knockback profile
    Blade,
    /// Energy core - spin economy, and the only slot that can carry
    /// a special ability
    Core,
}

impl EquipmentSlot {
    /// All slots, in the order they are stored in a loadout
    pub const ALL: [Self; 4] = [Self::Tip, Self::Body, Self::Blade, Self::Core];

    /// Dense index used by `Loadout` storage
    pub fn index(self) -> usize {
        match self {
            Self::Tip => 0,
            Self::Body => 1,
            Self::Blade => 2,
            Self::Core => 3,
        }
    }
}

/// Signed stat deltas one equipped part contributes, one per StatBlock field.
/// `ability` is only meaningful on a Core part; other slots leave it `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PartModifiers {
    pub max_spin: f32,
    pub spin_decay_rate: f32,
    pub move_speed: f32,
    pub weight: f32,
    pub attack_power: f32,
    pub defense_percent: f32,
    pub dash_force: f32,
    /// Special ability granted by a Core part
    pub ability: Option<AbilityDescriptor>,
}

/// Equipped parts by slot. Unset slots contribute nothing.
#[derive(Debug, Clone, Default)]
pub struct Loadout {
    parts: [Option<PartModifiers>; 4],
}

impl Loadout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Equip a part, returning whatever previously occupied the slot
    pub fn equip(&mut self, slot: EquipmentSlot, part: PartModifiers) -> Option<PartModifiers> {
        self.parts[slot.index()].replace(part)
    }

    /// Remove the part in a slot, if any
    pub fn unequip(&mut self, slot: EquipmentSlot) -> Option<PartModifiers> {
        self.parts[slot.index()].take()
    }

    /// Part currently in a slot
    pub fn part(&self, slot: EquipmentSlot) -> Option<&PartModifiers> {
        self.parts[slot.index()].as_ref()
    }

    /// Iterate over all equipped parts
    pub fn equipped(&self) -> impl Iterator<Item = &PartModifiers> {
        self.parts.iter().filter_map(|p| p.as_ref())
    }

    /// The special ability carried by the equipped Core, if any
    pub fn core_ability(&self) -> Option<&AbilityDescriptor> {
        self.part(EquipmentSlot::Core)
            .and_then(|core| core.ability.as_ref())
    }
}
