// Stat aggregation: base stats + equipped part deltas -> derived StatBlock
//
// Pure function of its inputs; re-run whenever equipment changes. Clamping
// happens once, after summation, so parts can trade below a floor and be
// compensated by another part before the floor bites.

use super::block::StatBlock;
use super::equipment::Loadout;

/// Fold all equipped part modifiers onto `base` and clamp the result
/// into legal ranges. Unset slots contribute zero.
pub fn aggregate(base: &StatBlock, loadout: &Loadout) -> StatBlock {
    let mut derived = *base;
    for part in loadout.equipped() {
        derived.max_spin += part.max_spin;
        derived.spin_decay_rate += part.spin_decay_rate;
        derived.move_speed += part.move_speed;
        derived.weight += part.weight;
        derived.attack_power += part.attack_power;
        derived.defense_percent += part.defense_percent;
        derived.dash_force += part.dash_force;
    }
    derived.clamped()
}
