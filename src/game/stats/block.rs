// Derived combat stats with enforced floors and ceilings
//
// A StatBlock is either the base values a top ships with, or the result of
// folding equipped part modifiers onto that base. Either way every field is
// kept inside its legal range by `clamped()` - malformed parts degrade
// gracefully instead of producing negative weight or zero top speed.

/// Floor for maximum spin energy
pub const MIN_MAX_SPIN: f32 = 1.0;
/// Floor for passive spin decay (spin per second)
pub const MIN_SPIN_DECAY_RATE: f32 = 0.5;
/// Floor for movement speed (units per second)
pub const MIN_MOVE_SPEED: f32 = 2.0;
/// Floor for body weight
pub const MIN_WEIGHT: f32 = 0.3;
/// Floor for attack power
pub const MIN_ATTACK_POWER: f32 = 1.0;
/// Defense is a percentage damage reduction, capped so it can never
/// grant full immunity on its own
pub const MAX_DEFENSE_PERCENT: f32 = 80.0;
/// Floor for dash impulse strength
pub const MIN_DASH_FORCE: f32 = 5.0;

/// The seven derived gameplay values driving movement, spin and combat
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatBlock {
    /// Maximum spin energy; zero spin means elimination
    pub max_spin: f32,
    /// Passive spin drain per second
    pub spin_decay_rate: f32,
    /// Movement speed before weight interpolation (units/second)
    pub move_speed: f32,
    /// Body weight; biases acceleration, damage and knockback exchange
    pub weight: f32,
    /// Outgoing collision damage multiplier
    pub attack_power: f32,
    /// Incoming damage reduction percentage, 0..=80
    pub defense_percent: f32,
    /// Dash impulse strength
    pub dash_force: f32,
}

/// Baseline stats for an unequipped top
pub const BASE_STATS: StatBlock = StatBlock {
    max_spin: 500.0,
    spin_decay_rate: 2.5,
    move_speed: 6.0,
    weight: 1.0,
    attack_power: 10.0,
    defense_percent: 10.0,
    dash_force: 18.0,
};

impl Default for StatBlock {
    fn default() -> Self {
        BASE_STATS
    }
}

impl StatBlock {
    /// The standard baseline every top starts from
    pub fn standard() -> Self {
        BASE_STATS
    }

    /// Return a copy with every field forced into its legal range
    pub fn clamped(self) -> Self {
        Self {
            max_spin: self.max_spin.max(MIN_MAX_SPIN),
            spin_decay_rate: self.spin_decay_rate.max(MIN_SPIN_DECAY_RATE),
            move_speed: self.move_speed.max(MIN_MOVE_SPEED),
            weight: self.weight.max(MIN_WEIGHT),
            attack_power: self.attack_power.max(MIN_ATTACK_POWER),
            defense_percent: self.defense_percent.clamp(0.0, MAX_DEFENSE_PERCENT),
            dash_force: self.dash_force.max(MIN_DASH_FORCE),
        }
    }
}
