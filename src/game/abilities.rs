// Special abilities: the Core-granted specials and the executor seam
//
// The combat body only knows the delegation seam: an `AbilityExecutor` it was
// handed at construction. Charge and cooldown availability is tracked outside
// the body, per player, by `AbilityCharges` and checked before invoking the
// executor.

use crate::game::combat::body::CombatBody;

/// What a special ability does when triggered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AbilityKind {
    /// Restore a chunk of spin energy
    SpinBoost,
    /// Radial burst pushing nearby opponents away
    Shockwave,
    /// Temporary damage-reduction window (reuses the dash-armor mechanic)
    Shield,
    /// Instantly refresh the dash cooldown
    DashBurst,
    /// Siphon spin from the closest opponent
    Drain,
    /// Fallback when no Core is equipped: small recovery plus a hop
    Recover,
}

/// Ability parameters carried by an equipped Core part
#[derive(Debug, Clone, PartialEq)]
pub struct AbilityDescriptor {
    pub kind: AbilityKind,
    /// Uses per round
    pub charges: u32,
    /// Seconds between uses
    pub cooldown: f32,
    /// Strength scaling applied by the executor
    pub power_multiplier: f32,
}

impl AbilityDescriptor {
    pub fn new(kind: AbilityKind) -> Self {
        Self {
            kind,
            charges: 3,
            cooldown: 5.0,
            power_multiplier: 1.0,
        }
    }
}

/// Per-player charge and cooldown gate, consulted before the executor runs.
/// Refilled by `reset()` between rounds.
#[derive(Debug, Clone)]
pub struct AbilityCharges {
    initial: Option<u32>,
    remaining: Option<u32>,
    cooldown: f32,
    cooldown_remaining: f32,
}

impl AbilityCharges {
    /// Gate matching a Core descriptor's charge count and cooldown
    pub fn from_descriptor(descriptor: &AbilityDescriptor) -> Self {
        Self {
            initial: Some(descriptor.charges),
            remaining: Some(descriptor.charges),
            cooldown: descriptor.cooldown,
            cooldown_remaining: 0.0,
        }
    }

    /// Cooldown-only gate for the fallback recover special
    pub fn unlimited(cooldown: f32) -> Self {
        Self {
            initial: None,
            remaining: None,
            cooldown,
            cooldown_remaining: 0.0,
        }
    }

    pub fn tick(&mut self, dt: f32) {
        self.cooldown_remaining = (self.cooldown_remaining - dt).max(0.0);
    }

    /// Whether a charge could be taken right now
    pub fn available(&self) -> bool {
        self.cooldown_remaining <= 0.0 && self.remaining != Some(0)
    }

    /// Consume a charge and start the cooldown; false if unavailable
    pub fn try_take(&mut self) -> bool {
        if !self.available() {
            return false;
        }
        if let Some(remaining) = self.remaining.as_mut() {
            *remaining -= 1;
        }
        self.cooldown_remaining = self.cooldown;
        true
    }

    /// Refill charges and clear the cooldown (between rounds)
    pub fn reset(&mut self) {
        self.remaining = self.initial;
        self.cooldown_remaining = 0.0;
    }

    pub fn charges_remaining(&self) -> Option<u32> {
        self.remaining
    }
}

/// Executes a special ability on its caster. Implementations with arena-wide
/// reach (shockwave, drain) live in the match layer; the body only holds the
/// seam.
pub trait AbilityExecutor {
    /// Perform `kind` at `power` on `body`. Returns false if this executor
    /// does not handle the kind; the caller then treats the press as spent
    /// but inert.
    fn execute(&mut self, kind: AbilityKind, power: f32, body: &mut CombatBody) -> bool;
}

/// Default executor covering every caster-only ability kind
#[derive(Debug, Default)]
pub struct StandardAbilityExecutor;

impl AbilityExecutor for StandardAbilityExecutor {
    fn execute(&mut self, kind: AbilityKind, power: f32, body: &mut CombatBody) -> bool {
        let tuning = body.tuning().clone();
        match kind {
            AbilityKind::SpinBoost => {
                body.add_spin(tuning.default_recover_spin * 2.0 * power);
                true
            }
            AbilityKind::Shield => {
                body.grant_dash_armor(tuning.dash_armor_duration * 2.0 * power);
                true
            }
            AbilityKind::DashBurst => {
                body.refresh_dash();
                true
            }
            AbilityKind::Recover => {
                body.add_spin(tuning.default_recover_spin * power);
                body.apply_vertical_impulse(tuning.default_recover_hop);
                true
            }
            // Need access to the other bodies; owned by a richer executor
            // in the match layer.
            AbilityKind::Shockwave | AbilityKind::Drain => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_defaults() {
        let descriptor = AbilityDescriptor::new(AbilityKind::Shield);
        assert_eq!(descriptor.kind, AbilityKind::Shield);
        assert_eq!(descriptor.charges, 3);
        assert!(descriptor.cooldown > 0.0);
    }

    #[test]
    fn test_charges_deplete() {
        let descriptor = AbilityDescriptor {
            charges: 2,
            cooldown: 1.0,
            ..AbilityDescriptor::new(AbilityKind::SpinBoost)
        };
        let mut gate = AbilityCharges::from_descriptor(&descriptor);

        assert!(gate.try_take());
        gate.tick(1.5);
        assert!(gate.try_take());
        gate.tick(1.5);
        // Out of charges even though the cooldown elapsed
        assert!(!gate.try_take());
        assert_eq!(gate.charges_remaining(), Some(0));
    }

    #[test]
    fn test_cooldown_blocks_back_to_back_use() {
        let mut gate = AbilityCharges::unlimited(2.0);
        assert!(gate.try_take());
        assert!(!gate.try_take());
        gate.tick(1.0);
        assert!(!gate.available());
        gate.tick(1.0);
        assert!(gate.try_take());
    }

    #[test]
    fn test_unlimited_never_runs_out_of_charges() {
        let mut gate = AbilityCharges::unlimited(0.1);
        for _ in 0..100 {
            gate.tick(0.2);
            assert!(gate.try_take());
        }
        assert_eq!(gate.charges_remaining(), None);
    }

    #[test]
    fn test_reset_refills_charges_and_cooldown() {
        let descriptor = AbilityDescriptor {
            charges: 1,
            cooldown: 10.0,
            ..AbilityDescriptor::new(AbilityKind::DashBurst)
        };
        let mut gate = AbilityCharges::from_descriptor(&descriptor);
        assert!(gate.try_take());
        assert!(!gate.available());

        gate.reset();
        assert!(gate.available());
        assert_eq!(gate.charges_remaining(), Some(1));
    }
}
