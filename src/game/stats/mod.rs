// Stat system
//
// Base stats, equippable part modifiers, and the aggregator that folds
// them into the derived values the combat body reads every tick.

pub mod aggregator;
pub mod block;
pub mod equipment;

pub use aggregator::aggregate;
pub use block::{StatBlock, BASE_STATS};
pub use equipment::{EquipmentSlot, Loadout, PartModifiers};
