// Combat tuning parameters
//
// Every numeric constant of the movement/combat model lives here instead of
// being scattered through the code. The defaults are the latest balance pass;
// none of them is a correctness invariant, so a match layer is free to tune
// them before building a simulation.

use thiserror::Error;

/// A tuning set that cannot produce a coherent simulation
#[derive(Debug, Error, PartialEq)]
pub enum TuningError {
    #[error("tuning field `{0}` must be positive")]
    NonPositive(&'static str),
    #[error("dash armor duration ({armor}s) must be shorter than the dash cooldown ({cooldown}s)")]
    ArmorOutlastsCooldown { armor: f32, cooldown: f32 },
    #[error("tuning range `{0}` has its endpoints inverted")]
    InvertedRange(&'static str),
}

/// All tunable constants of the physics/combat core
#[derive(Debug, Clone, PartialEq)]
pub struct CombatTuning {
    // Collision damage
    /// Base damage per unit of relative collision speed, before stat scaling
    pub collision_damage_base: f32,
    /// Fraction of its would-be incoming damage the attacker actually takes
    pub attacker_taken_factor: f32,
    /// Outgoing damage multiplier for the determined attacker
    pub attacker_dealt_factor: f32,
    /// Spin-ratio clamp range for damage and knockback bias
    pub spin_ratio_min: f32,
    pub spin_ratio_max: f32,
    /// Contacts slower than this are grazing and resolve to nothing
    pub min_collision_velocity: f32,
    /// Approach-speed projections closer than this count as a tie
    pub approach_tie_epsilon: f32,
    /// Continuous damage per second while two tops stay in contact
    pub grind_damage_per_sec: f32,

    // Dash
    /// Spin cost of one dash
    pub dash_spin_cost: f32,
    /// Dash is refused below `dash_spin_cost * dash_spin_cost_margin`,
    /// so a dash can never self-eliminate
    pub dash_spin_cost_margin: f32,
    /// Seconds until the dash can be used again
    pub dash_cooldown: f32,
    /// Post-dash damage-reduction window; strictly shorter than the cooldown
    pub dash_armor_duration: f32,
    /// Incoming damage is multiplied by `1 - dash_armor_reduction` while armored
    pub dash_armor_reduction: f32,
    /// Outgoing damage multiplier while armored
    pub dash_armor_damage_boost: f32,
    /// Dash impulse multiplier endpoints over the normalized weight range
    /// (light tops dash softer, heavy tops relatively harder)
    pub dash_weight_mult_light: f32,
    pub dash_weight_mult_heavy: f32,

    // Knockback
    /// Knockback impulse per unit of relative collision speed
    pub knockback_base: f32,
    /// Clamp for the impulse on the pushed (defending) side
    pub knockback_pushed_max: f32,
    /// Clamp for the recoil on the attacking side
    pub knockback_recoil_max: f32,
    /// Small fixed upward component so knockback never pins a top
    /// into ground friction
    pub knockback_up_bias: f32,

    // Movement
    /// Weight normalization range; weights outside are clamped
    pub weight_min: f32,
    pub weight_max: f32,
    /// Acceleration per unit of move_speed, light vs heavy endpoint
    pub accel_factor_light: f32,
    pub accel_factor_heavy: f32,
    /// Top-speed multiplier on move_speed, light vs heavy endpoint
    pub top_speed_factor_light: f32,
    pub top_speed_factor_heavy: f32,
    /// Turn responsiveness (per second), light vs heavy endpoint
    pub turn_response_light: f32,
    pub turn_response_heavy: f32,
    /// Extra parallel braking rate multiplier when velocity opposes input
    pub counter_brake_factor: f32,
    /// No-input braking rate (per second), light vs heavy endpoint
    pub drag_light: f32,
    pub drag_heavy: f32,
    /// Speeds below this snap to exactly zero under no input
    pub stop_epsilon: f32,
    /// Horizontal speed is clamped to top speed times (1 + this margin),
    /// leaving headroom for collision response
    pub speed_clamp_margin: f32,

    // Bodies and lifecycle
    /// Collision disc radius of every top
    pub disc_radius: f32,
    /// Spin at or below this threshold eliminates the top
    pub elimination_threshold: f32,
    /// Seconds between elimination and deactivation
    pub elimination_grace: f32,

    // Default special (no Core equipped)
    /// Spin restored by the fallback recover ability
    pub default_recover_spin: f32,
    /// Vertical impulse of the fallback recover ability
    pub default_recover_hop: f32,
    /// Cooldown of the fallback recover ability
    pub default_special_cooldown: f32,
}

impl Default for CombatTuning {
    fn default() -> Self {
        Self {
            collision_damage_base: 0.15,
            attacker_taken_factor: 0.3,
            attacker_dealt_factor: 1.3,
            spin_ratio_min: 0.5,
            spin_ratio_max: 2.0,
            min_collision_velocity: 1.5,
            approach_tie_epsilon: 1e-4,
            grind_damage_per_sec: 2.0,

            dash_spin_cost: 12.0,
            dash_spin_cost_margin: 1.5,
            dash_cooldown: 1.5,
            dash_armor_duration: 0.35,
            dash_armor_reduction: 0.8,
            dash_armor_damage_boost: 1.5,
            dash_weight_mult_light: 0.8,
            dash_weight_mult_heavy: 1.4,

            knockback_base: 0.6,
            knockback_pushed_max: 14.0,
            knockback_recoil_max: 6.0,
            knockback_up_bias: 0.15,

            weight_min: 0.5,
            weight_max: 3.0,
            accel_factor_light: 6.0,
            accel_factor_heavy: 3.0,
            top_speed_factor_light: 1.1,
            top_speed_factor_heavy: 0.85,
            turn_response_light: 10.0,
            turn_response_heavy: 4.0,
            counter_brake_factor: 2.0,
            drag_light: 54.0,
            drag_heavy: 42.0,
            stop_epsilon: 0.05,
            speed_clamp_margin: 0.1,

            disc_radius: 0.6,
            elimination_threshold: 0.1,
            elimination_grace: 2.0,

            default_recover_spin: 25.0,
            default_recover_hop: 2.0,
            default_special_cooldown: 4.0,
        }
    }
}

impl CombatTuning {
    /// Check the tuning set for values that would break the simulation
    pub fn validate(&self) -> Result<(), TuningError> {
        let positives: [(&'static str, f32); 8] = [
            ("collision_damage_base", self.collision_damage_base),
            ("dash_spin_cost", self.dash_spin_cost),
            ("dash_cooldown", self.dash_cooldown),
            ("dash_armor_duration", self.dash_armor_duration),
            ("disc_radius", self.disc_radius),
            ("elimination_threshold", self.elimination_threshold),
            ("elimination_grace", self.elimination_grace),
            ("stop_epsilon", self.stop_epsilon),
        ];
        for (name, value) in positives {
            if value <= 0.0 {
                return Err(TuningError::NonPositive(name));
            }
        }
        if self.dash_armor_duration >= self.dash_cooldown {
            return Err(TuningError::ArmorOutlastsCooldown {
                armor: self.dash_armor_duration,
                cooldown: self.dash_cooldown,
            });
        }
        if self.weight_min >= self.weight_max {
            return Err(TuningError::InvertedRange("weight_min..weight_max"));
        }
        if self.spin_ratio_min > self.spin_ratio_max {
            return Err(TuningError::InvertedRange("spin_ratio_min..spin_ratio_max"));
        }
        Ok(())
    }
}
