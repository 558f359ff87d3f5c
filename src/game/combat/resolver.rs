// Collision resolution: one discrete contact between two tops becomes
// bidirectional spin damage and asymmetric knockback
//
// The resolver never detects contacts; pairs arrive from the detection
// collaborator, at most once per physical contact per tick. Persisting
// contacts get only the small grind term, never a second full resolution.

use glam::{Vec2, Vec3};

use crate::core::math::{normalize_or_zero, planar, unplanar};
use crate::game::combat::body::{CombatBody, PlayerId};

use super::tuning::CombatTuning;

/// Which side won the approach-speed projection for a contact
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attacker {
    First,
    Second,
    /// Projections tied: neither side gets the attacker bonus
    Neither,
}

/// What one full resolution did, mostly for tests and logging
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactOutcome {
    pub attacker: Attacker,
    /// Spin actually removed from the first body (post defense)
    pub damage_to_a: f32,
    /// Spin actually removed from the second body (post defense)
    pub damage_to_b: f32,
    /// Knockback impulse magnitude applied to the first body
    pub knockback_a: f32,
    /// Knockback impulse magnitude applied to the second body
    pub knockback_b: f32,
}

/// Resolves contacts between pairs of combat bodies
#[derive(Debug, Clone)]
pub struct CollisionResolver {
    tuning: CombatTuning,
}

impl CollisionResolver {
    pub fn new(tuning: CombatTuning) -> Self {
        Self { tuning }
    }

    /// Full resolution of a fresh contact. Returns `None` for grazing
    /// contacts (below the minimum collision velocity) and when either
    /// body is out of the round.
    pub fn resolve(
        &self,
        a: &mut CombatBody,
        b: &mut CombatBody,
        contact_normal: Vec2,
    ) -> Option<ContactOutcome> {
        if !a.is_active() || !b.is_active() {
            return None;
        }

        let relative_speed = planar(a.velocity() - b.velocity()).length();
        if relative_speed < self.tuning.min_collision_velocity {
            return None;
        }

        // Center-to-center line; the detector's normal is the fallback for
        // the degenerate overlapping-centers case
        let mut normal = normalize_or_zero(planar(b.position() - a.position()));
        if normal == Vec2::ZERO {
            normal = normalize_or_zero(contact_normal);
        }
        if normal == Vec2::ZERO {
            normal = Vec2::X;
        }

        // Attacker: larger positive approach-speed projection onto the line
        let approach_a = planar(a.velocity()).dot(normal);
        let approach_b = planar(b.velocity()).dot(-normal);
        let attacker = if approach_a > approach_b + self.tuning.approach_tie_epsilon
            && approach_a > 0.0
        {
            Attacker::First
        } else if approach_b > approach_a + self.tuning.approach_tie_epsilon && approach_b > 0.0 {
            Attacker::Second
        } else {
            Attacker::Neither
        };

        // Read all scaling inputs before mutating either body
        let stats_a = *a.stats();
        let stats_b = *b.stats();
        let spin_ratio_ab = self.spin_ratio(a.current_spin(), b.current_spin());
        let spin_ratio_ba = self.spin_ratio(b.current_spin(), a.current_spin());

        let base = relative_speed * self.tuning.collision_damage_base;
        let mut damage_to_b =
            base * stats_a.attack_power * (stats_a.weight / stats_b.weight) * spin_ratio_ab;
        let mut damage_to_a =
            base * stats_b.attack_power * (stats_b.weight / stats_a.weight) * spin_ratio_ba;

        match attacker {
            Attacker::First => {
                damage_to_a *= self.tuning.attacker_taken_factor;
                damage_to_b *= self.tuning.attacker_dealt_factor;
            }
            Attacker::Second => {
                damage_to_b *= self.tuning.attacker_taken_factor;
                damage_to_a *= self.tuning.attacker_dealt_factor;
            }
            Attacker::Neither => {}
        }

        // Dash armor stacks multiplicatively with the attacker bonus
        if a.is_dashing() {
            damage_to_a *= 1.0 - self.tuning.dash_armor_reduction;
            damage_to_b *= self.tuning.dash_armor_damage_boost;
        }
        if b.is_dashing() {
            damage_to_b *= 1.0 - self.tuning.dash_armor_reduction;
            damage_to_a *= self.tuning.dash_armor_damage_boost;
        }

        // Defense is re-applied inside reduce_spin
        let applied_to_b = b.reduce_spin(damage_to_b);
        let applied_to_a = a.reduce_spin(damage_to_a);
        a.record_collision(b.id(), applied_to_b);
        b.record_collision(a.id(), applied_to_a);

        // Knockback along the center line, biased slightly upward so a hit
        // never pins the top into ground friction
        let raw_kb_b = relative_speed
            * self.tuning.knockback_base
            * (stats_a.weight / stats_b.weight)
            * spin_ratio_ab;
        let raw_kb_a = relative_speed
            * self.tuning.knockback_base
            * (stats_b.weight / stats_a.weight)
            * spin_ratio_ba;
        let (clamp_a, clamp_b) = match attacker {
            Attacker::First => (self.tuning.knockback_recoil_max, self.tuning.knockback_pushed_max),
            Attacker::Second => {
                (self.tuning.knockback_pushed_max, self.tuning.knockback_recoil_max)
            }
            Attacker::Neither => (
                self.tuning.knockback_pushed_max,
                self.tuning.knockback_pushed_max,
            ),
        };
        let knockback_a = raw_kb_a.min(clamp_a);
        let knockback_b = raw_kb_b.min(clamp_b);
        a.apply_knockback(self.knockback_impulse(-normal, knockback_a));
        b.apply_knockback(self.knockback_impulse(normal, knockback_b));

        log::debug!(
            "contact {}<->{}: rel {:.1}, attacker {:?}, dmg {:.1}/{:.1}",
            a.id(),
            b.id(),
            relative_speed,
            attacker,
            applied_to_a,
            applied_to_b
        );

        Some(ContactOutcome {
            attacker,
            damage_to_a: applied_to_a,
            damage_to_b: applied_to_b,
            knockback_a,
            knockback_b,
        })
    }

    /// Continuous friction term for a contact persisting from a previous
    /// tick. A direct spin drain: no knockback, no attacker logic, and no
    /// minimum-damage floor (the floor would turn a grind into a grinder).
    pub fn grind(&self, a: &mut CombatBody, b: &mut CombatBody, dt: f32) {
        if !a.is_active() || !b.is_active() {
            return;
        }
        let drain = self.tuning.grind_damage_per_sec * dt;
        a.drain_spin(drain);
        b.drain_spin(drain);
    }

    fn spin_ratio(&self, own: f32, other: f32) -> f32 {
        if other <= f32::EPSILON {
            return self.tuning.spin_ratio_max;
        }
        (own / other).clamp(self.tuning.spin_ratio_min, self.tuning.spin_ratio_max)
    }

    fn knockback_impulse(&self, direction: Vec2, magnitude: f32) -> Vec3 {
        unplanar(direction * magnitude) + Vec3::Y * (magnitude * self.tuning.knockback_up_bias)
    }
}
