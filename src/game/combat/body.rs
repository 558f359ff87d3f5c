// Combat body: the physical state and per-tick behavior of one top
//
// Owns its stats and loadout by value and holds its ability executor as a
// typed reference wired at construction - no runtime component lookup.
// Movement, spin decay, dash and elimination all happen in `update`; damage
// arrives from the collision resolver through `reduce_spin`.

use glam::{Vec2, Vec3};

use crate::core::math::{inverse_lerp, lerp, normalize_or_zero, planar, with_planar};
use crate::game::abilities::{AbilityExecutor, AbilityKind, StandardAbilityExecutor};
use crate::game::command::PlayerCommand;
use crate::game::stats::{aggregate, EquipmentSlot, Loadout, PartModifiers, StatBlock};
use crate::sim::events::SimEvent;

use super::tuning::CombatTuning;

/// Unique identifier for a player's top
pub type PlayerId = u32;

/// Downward pull on the reserved vertical axis (hops only, no combat role)
const GRAVITY: f32 = 9.81;

/// Lifecycle of a body within one round
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyState {
    /// Simulated and accepting input
    Active,
    /// Spin depleted; ignoring input, waiting out the grace delay
    Eliminated,
    /// Grace delay elapsed; inert until `reset()`
    Deactivated,
}

/// Movement coefficients derived from stats, recomputed on equipment change.
/// Heavier tops accelerate slower, top out lower and turn later.
#[derive(Debug, Clone, Copy)]
struct DerivedMovement {
    weight_normalized: f32,
    acceleration: f32,
    max_speed: f32,
    turn_response: f32,
    drag: f32,
    dash_multiplier: f32,
}

impl DerivedMovement {
    fn derive(stats: &StatBlock, tuning: &CombatTuning) -> Self {
        let wn = inverse_lerp(tuning.weight_min, tuning.weight_max, stats.weight);
        Self {
            weight_normalized: wn,
            acceleration: stats.move_speed
                * lerp(tuning.accel_factor_light, tuning.accel_factor_heavy, wn),
            max_speed: stats.move_speed
                * lerp(tuning.top_speed_factor_light, tuning.top_speed_factor_heavy, wn),
            turn_response: lerp(tuning.turn_response_light, tuning.turn_response_heavy, wn),
            drag: lerp(tuning.drag_light, tuning.drag_heavy, wn),
            dash_multiplier: lerp(tuning.dash_weight_mult_light, tuning.dash_weight_mult_heavy, wn),
        }
    }
}

/// Builder wiring a body's stats, loadout, spawn point and ability executor
pub struct CombatBodyBuilder {
    id: PlayerId,
    tuning: CombatTuning,
    base: StatBlock,
    loadout: Loadout,
    position: Vec3,
    executor: Option<Box<dyn AbilityExecutor>>,
}

impl CombatBodyBuilder {
    pub fn new(id: PlayerId) -> Self {
        Self {
            id,
            tuning: CombatTuning::default(),
            base: StatBlock::standard(),
            loadout: Loadout::new(),
            position: Vec3::ZERO,
            executor: None,
        }
    }

    pub fn tuning(mut self, tuning: CombatTuning) -> Self {
        self.tuning = tuning;
        self
    }

    pub fn base_stats(mut self, base: StatBlock) -> Self {
        self.base = base;
        self
    }

    pub fn loadout(mut self, loadout: Loadout) -> Self {
        self.loadout = loadout;
        self
    }

    pub fn position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    pub fn ability_executor(mut self, executor: Box<dyn AbilityExecutor>) -> Self {
        self.executor = Some(executor);
        self
    }

    pub fn build(self) -> CombatBody {
        let base = self.base.clamped();
        let stats = aggregate(&base, &self.loadout);
        let movement = DerivedMovement::derive(&stats, &self.tuning);
        CombatBody {
            id: self.id,
            current_spin: stats.max_spin,
            spawn_position: self.position,
            position: self.position,
            velocity: Vec3::ZERO,
            input_direction: Vec2::ZERO,
            smoothed_direction: Vec2::ZERO,
            dash_cooldown_remaining: 0.0,
            dash_armor_remaining: 0.0,
            state: BodyState::Active,
            deactivation_remaining: 0.0,
            pending_events: Vec::new(),
            executor: self
                .executor
                .unwrap_or_else(|| Box::new(StandardAbilityExecutor)),
            base,
            loadout: self.loadout,
            stats,
            movement,
            tuning: self.tuning,
        }
    }
}

/// One top's physical and combat state
pub struct CombatBody {
    id: PlayerId,
    tuning: CombatTuning,
    base: StatBlock,
    loadout: Loadout,
    stats: StatBlock,
    movement: DerivedMovement,
    executor: Box<dyn AbilityExecutor>,

    current_spin: f32,
    spawn_position: Vec3,
    position: Vec3,
    velocity: Vec3,
    input_direction: Vec2,
    smoothed_direction: Vec2,
    dash_cooldown_remaining: f32,
    dash_armor_remaining: f32,
    state: BodyState,
    deactivation_remaining: f32,
    pending_events: Vec<SimEvent>,
}

impl CombatBody {
    pub fn builder(id: PlayerId) -> CombatBodyBuilder {
        CombatBodyBuilder::new(id)
    }

    // --- Accessors ---

    pub fn id(&self) -> PlayerId {
        self.id
    }

    pub fn state(&self) -> BodyState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == BodyState::Active
    }

    pub fn is_eliminated(&self) -> bool {
        self.state != BodyState::Active
    }

    /// Whether the post-dash armor window is open
    pub fn is_dashing(&self) -> bool {
        self.dash_armor_remaining > 0.0
    }

    pub fn dash_ready(&self) -> bool {
        self.dash_cooldown_remaining <= 0.0
    }

    pub fn stats(&self) -> &StatBlock {
        &self.stats
    }

    pub fn tuning(&self) -> &CombatTuning {
        &self.tuning
    }

    pub fn loadout(&self) -> &Loadout {
        &self.loadout
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    pub fn current_spin(&self) -> f32 {
        self.current_spin
    }

    /// Remaining spin as a 0..=1 fraction, for health bars
    pub fn spin_percentage(&self) -> f32 {
        (self.current_spin / self.stats.max_spin).clamp(0.0, 1.0)
    }

    /// Dash recharge progress, 0 = just used, 1 = ready
    pub fn dash_cooldown_progress(&self) -> f32 {
        // A zero cooldown (unvalidated tuning) must still report "ready",
        // not divide to NaN
        if self.dash_cooldown_remaining <= 0.0 {
            return 1.0;
        }
        (1.0 - self.dash_cooldown_remaining / self.tuning.dash_cooldown).clamp(0.0, 1.0)
    }

    /// Horizontal speed, for stat displays
    pub fn velocity_magnitude(&self) -> f32 {
        planar(self.velocity).length()
    }

    pub fn dash_armor_remaining(&self) -> f32 {
        self.dash_armor_remaining
    }

    // --- Equipment ---

    /// Equip a part and immediately re-derive stats and movement coefficients
    pub fn equip(&mut self, slot: EquipmentSlot, part: PartModifiers) -> Option<PartModifiers> {
        let previous = self.loadout.equip(slot, part);
        self.refresh_derived();
        previous
    }

    /// Unequip a part and immediately re-derive stats and movement coefficients
    pub fn unequip(&mut self, slot: EquipmentSlot) -> Option<PartModifiers> {
        let removed = self.loadout.unequip(slot);
        self.refresh_derived();
        removed
    }

    fn refresh_derived(&mut self) {
        self.stats = aggregate(&self.base, &self.loadout);
        self.movement = DerivedMovement::derive(&self.stats, &self.tuning);
        // A smaller flywheel cannot hold the old charge
        self.current_spin = self.current_spin.min(self.stats.max_spin);
    }

    // --- Tick ---

    /// Advance one fixed tick: movement, dash, spin decay, timers.
    /// Must be called with an explicit command every tick; a neutral command
    /// actively brakes the top to a stop.
    pub fn update(&mut self, dt: f32, command: &PlayerCommand) {
        match self.state {
            BodyState::Deactivated => return,
            BodyState::Eliminated => {
                self.deactivation_remaining -= dt;
                if self.deactivation_remaining <= 0.0 {
                    log::debug!("top {} deactivated", self.id);
                    self.state = BodyState::Deactivated;
                }
                return;
            }
            BodyState::Active => {}
        }

        self.integrate_movement(dt, command.direction);
        if command.dash {
            self.try_dash();
        }

        // Passive spin decay; continuous, so no SpinChanged event
        self.current_spin = (self.current_spin - self.stats.spin_decay_rate * dt).max(0.0);
        self.check_elimination();

        self.dash_cooldown_remaining = (self.dash_cooldown_remaining - dt).max(0.0);
        self.dash_armor_remaining = (self.dash_armor_remaining - dt).max(0.0);
    }

    /// Drive/brake force model. All forces live in the world frame; the
    /// visual spin of the top never feeds back into it.
    fn integrate_movement(&mut self, dt: f32, raw_input: Vec2) {
        let mut input = raw_input;
        if input.length_squared() > 1.0 {
            input = input.normalize();
        }
        self.input_direction = input;

        let mut vel = planar(self.velocity);
        let blend = (self.movement.turn_response * dt).min(1.0);

        if input.length_squared() > f32::EPSILON {
            // Turn inertia: the drive direction trails the stick
            self.smoothed_direction += (input - self.smoothed_direction) * blend;
            let drive = normalize_or_zero(self.smoothed_direction);
            let drive = if drive == Vec2::ZERO {
                normalize_or_zero(input)
            } else {
                drive
            };

            vel += drive * self.movement.acceleration * input.length().min(1.0) * dt;

            // Turning comes from braking the lateral component, not from
            // snapping the velocity onto the stick
            let forward = vel.dot(drive);
            let parallel = drive * forward;
            let mut lateral = vel - parallel;
            lateral *= 1.0 - blend;

            let mut parallel_out = parallel;
            if forward < 0.0 {
                // Counter-brake when still sliding against the input
                let counter =
                    (self.tuning.counter_brake_factor * self.movement.turn_response * dt).min(1.0);
                parallel_out = parallel * (1.0 - counter);
            }
            vel = parallel_out + lateral;
        } else {
            // No input: brake to a stop, then snap to exactly zero so the
            // top never creeps on residual acceleration
            self.smoothed_direction *= 1.0 - blend;
            let speed = vel.length();
            if speed <= self.tuning.stop_epsilon {
                vel = Vec2::ZERO;
            } else {
                let decay = (self.movement.drag * dt).min(1.0);
                vel *= 1.0 - decay;
                if vel.length() <= self.tuning.stop_epsilon {
                    vel = Vec2::ZERO;
                }
            }
        }

        // Hard speed ceiling, margin left for collision response
        let ceiling = self.movement.max_speed * (1.0 + self.tuning.speed_clamp_margin);
        if vel.length() > ceiling {
            vel = vel.normalize() * ceiling;
        }
        self.velocity = with_planar(self.velocity, vel);

        // Reserved vertical axis: hops fall back to the ground plane
        self.velocity.y -= GRAVITY * dt;
        self.position += self.velocity * dt;
        if self.position.y <= 0.0 {
            self.position.y = 0.0;
            if self.velocity.y < 0.0 {
                self.velocity.y = 0.0;
            }
        }
    }

    // --- Dash ---

    /// Execute a dash if ready and affordable. Refused dashes change nothing.
    pub fn try_dash(&mut self) -> bool {
        if !self.is_active() || !self.dash_ready() {
            return false;
        }
        // Safety margin so a dash can never self-eliminate
        if self.current_spin < self.tuning.dash_spin_cost * self.tuning.dash_spin_cost_margin {
            return false;
        }

        // Direction priority: stick, then travel direction, then fixed fallback
        let direction = if self.input_direction.length_squared() > f32::EPSILON {
            normalize_or_zero(self.input_direction)
        } else {
            let travel = normalize_or_zero(planar(self.velocity));
            if travel == Vec2::ZERO {
                Vec2::X
            } else {
                travel
            }
        };

        // Applied after the movement clamp so the burst reaches this tick's
        // collision phase; the next tick's ceiling reins it back in
        let impulse = direction * self.stats.dash_force * self.movement.dash_multiplier;
        self.velocity += with_planar(Vec3::ZERO, impulse);

        self.drain_spin(self.tuning.dash_spin_cost);
        self.dash_cooldown_remaining = self.tuning.dash_cooldown;
        self.dash_armor_remaining = self.tuning.dash_armor_duration;

        self.push_event(SimEvent::DashExecuted { player: self.id });
        self.push_spin_changed();
        true
    }

    // --- Special ---

    /// Delegate the equipped special (or the fallback recover) to the
    /// executor. Charge availability is the caller's responsibility.
    pub fn try_special(&mut self) -> Option<AbilityKind> {
        if !self.is_active() {
            return None;
        }
        let (kind, power) = match self.loadout.core_ability() {
            Some(descriptor) => (descriptor.kind, descriptor.power_multiplier),
            None => (AbilityKind::Recover, 1.0),
        };

        // Swap the executor out so it can borrow the body mutably
        let mut executor: Box<dyn AbilityExecutor> =
            std::mem::replace(&mut self.executor, Box::new(StandardAbilityExecutor));
        let executed = executor.execute(kind, power, self);
        self.executor = executor;

        if executed {
            self.push_event(SimEvent::SpecialExecuted {
                player: self.id,
                kind,
            });
            Some(kind)
        } else {
            None
        }
    }

    // --- Spin ---

    /// Apply incoming damage through defense. Damage is floored at 0.1 so
    /// defense alone can never grant immunity. Returns the spin actually
    /// removed.
    pub fn reduce_spin(&mut self, amount: f32) -> f32 {
        if !self.is_active() || amount <= 0.0 {
            return 0.0;
        }
        let applied = (amount * (1.0 - self.stats.defense_percent / 100.0)).max(0.1);
        self.current_spin = (self.current_spin - applied).max(0.0);
        self.push_spin_changed();
        self.check_elimination();
        applied
    }

    /// Restore spin, clamped to the maximum
    pub fn add_spin(&mut self, amount: f32) {
        if !self.is_active() || amount <= 0.0 {
            return;
        }
        self.current_spin = (self.current_spin + amount).min(self.stats.max_spin);
        self.push_spin_changed();
    }

    /// Spend spin directly: costs (dash) and grind bypass defense and the
    /// minimum-damage floor
    pub fn drain_spin(&mut self, amount: f32) {
        if !self.is_active() || amount <= 0.0 {
            return;
        }
        self.current_spin = (self.current_spin - amount).max(0.0);
        self.check_elimination();
    }

    fn check_elimination(&mut self) {
        if self.state == BodyState::Active && self.current_spin <= self.tuning.elimination_threshold
        {
            self.state = BodyState::Eliminated;
            self.deactivation_remaining = self.tuning.elimination_grace;
            self.input_direction = Vec2::ZERO;
            self.smoothed_direction = Vec2::ZERO;
            log::info!("top {} eliminated", self.id);
            self.push_event(SimEvent::Eliminated { player: self.id });
        }
    }

    // --- Effects applied from outside (resolver, abilities) ---

    /// Add a knockback impulse to the velocity
    pub fn apply_knockback(&mut self, impulse: Vec3) {
        self.velocity += impulse;
    }

    /// Open or extend the damage-reduction window (shield ability)
    pub fn grant_dash_armor(&mut self, seconds: f32) {
        self.dash_armor_remaining = self.dash_armor_remaining.max(seconds);
    }

    /// Clear the dash cooldown (dash-burst ability)
    pub fn refresh_dash(&mut self) {
        self.dash_cooldown_remaining = 0.0;
    }

    /// Vertical hop on the reserved axis
    pub fn apply_vertical_impulse(&mut self, impulse: f32) {
        self.velocity.y += impulse;
    }

    // --- Round lifecycle ---

    /// Synchronous between-rounds reset: full spin, cleared timers, spawn
    /// position, Active again. The only path out of Eliminated/Deactivated.
    pub fn reset(&mut self) {
        self.current_spin = self.stats.max_spin;
        self.position = self.spawn_position;
        self.velocity = Vec3::ZERO;
        self.input_direction = Vec2::ZERO;
        self.smoothed_direction = Vec2::ZERO;
        self.dash_cooldown_remaining = 0.0;
        self.dash_armor_remaining = 0.0;
        self.deactivation_remaining = 0.0;
        self.state = BodyState::Active;
        self.pending_events.clear();
    }

    // --- Events ---

    fn push_event(&mut self, event: SimEvent) {
        self.pending_events.push(event);
    }

    /// Record damage dealt to an opponent (called by the collision resolver)
    pub(crate) fn record_collision(&mut self, opponent: PlayerId, damage_dealt: f32) {
        self.pending_events.push(SimEvent::CollisionWithOpponent {
            player: self.id,
            opponent,
            damage_dealt,
        });
    }

    fn push_spin_changed(&mut self) {
        let event = SimEvent::SpinChanged {
            player: self.id,
            percentage: self.spin_percentage(),
        };
        self.pending_events.push(event);
    }

    /// Take the events produced since the last call
    pub fn take_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.pending_events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const DT: f32 = 0.05;

    fn body() -> CombatBody {
        CombatBody::builder(0).build()
    }

    fn eliminated_events(events: &[SimEvent]) -> usize {
        events
            .iter()
            .filter(|e| matches!(e, SimEvent::Eliminated { .. }))
            .count()
    }

    #[test]
    fn test_builder_starts_full_and_active() {
        let body = body();
        assert_eq!(body.state(), BodyState::Active);
        assert_relative_eq!(body.current_spin(), body.stats().max_spin);
        assert_relative_eq!(body.spin_percentage(), 1.0);
        assert!(body.dash_ready());
        assert!(!body.is_dashing());
    }

    #[test]
    fn test_spin_stays_in_range_after_any_operation() {
        let mut body = body();
        let max = body.stats().max_spin;

        body.add_spin(1e6);
        assert!(body.current_spin() <= max);

        body.reduce_spin(1e6);
        assert!(body.current_spin() >= 0.0);

        let mut fresh = CombatBody::builder(1).build();
        fresh.drain_spin(1e6);
        assert!(fresh.current_spin() >= 0.0);
    }

    #[test]
    fn test_reduce_spin_applies_defense() {
        let mut body = body(); // 10% defense baseline
        let before = body.current_spin();
        let applied = body.reduce_spin(50.0);
        assert_relative_eq!(applied, 45.0);
        assert_relative_eq!(body.current_spin(), before - 45.0);
    }

    #[test]
    fn test_reduce_spin_floors_at_min_damage_even_at_max_defense() {
        let mut body = CombatBody::builder(0)
            .base_stats(StatBlock {
                defense_percent: 80.0,
                ..StatBlock::standard()
            })
            .build();
        let before = body.current_spin();
        let applied = body.reduce_spin(0.01);
        assert_relative_eq!(applied, 0.1);
        assert_relative_eq!(body.current_spin(), before - 0.1);
    }

    #[test]
    fn test_reduce_spin_ignores_non_positive_amounts() {
        let mut body = body();
        let before = body.current_spin();
        assert_eq!(body.reduce_spin(0.0), 0.0);
        assert_eq!(body.reduce_spin(-5.0), 0.0);
        assert_relative_eq!(body.current_spin(), before);
    }

    #[test]
    fn test_elimination_fires_exactly_once() {
        let mut body = body();
        body.drain_spin(1e6);
        assert_eq!(body.state(), BodyState::Eliminated);

        let events = body.take_events();
        assert_eq!(eliminated_events(&events), 1);

        // Further damage on an eliminated body is inert
        body.reduce_spin(100.0);
        body.drain_spin(100.0);
        assert_eq!(eliminated_events(&body.take_events()), 0);
    }

    #[test]
    fn test_elimination_at_decay_threshold_tick() {
        let mut body = CombatBody::builder(0)
            .base_stats(StatBlock {
                max_spin: 1.0,
                spin_decay_rate: 0.5,
                ..StatBlock::standard()
            })
            .build();

        let mut total_eliminations = 0;
        let mut elimination_tick = None;
        for tick in 0..6 {
            body.update(0.5, &PlayerCommand::neutral());
            let fired = eliminated_events(&body.take_events());
            total_eliminations += fired;
            if fired > 0 && elimination_tick.is_none() {
                elimination_tick = Some(tick);
            }
        }

        // 1.0 - 0.25/tick crosses the 0.1 threshold on the fourth tick
        assert_eq!(total_eliminations, 1);
        assert_eq!(elimination_tick, Some(3));
    }

    #[test]
    fn test_eliminated_body_deactivates_after_grace() {
        let mut body = body();
        body.drain_spin(1e6);
        let grace = body.tuning().elimination_grace;

        body.update(grace / 2.0, &PlayerCommand::neutral());
        assert_eq!(body.state(), BodyState::Eliminated);
        body.update(grace, &PlayerCommand::neutral());
        assert_eq!(body.state(), BodyState::Deactivated);
    }

    #[test]
    fn test_reset_restores_active_full_spin_and_clears_timers() {
        let mut body = body();
        body.try_dash();
        body.drain_spin(1e6);
        body.update(10.0, &PlayerCommand::neutral());
        assert_eq!(body.state(), BodyState::Deactivated);

        body.reset();
        assert_eq!(body.state(), BodyState::Active);
        assert_relative_eq!(body.current_spin(), body.stats().max_spin);
        assert!(body.dash_ready());
        assert!(!body.is_dashing());
        assert_eq!(body.velocity(), Vec3::ZERO);
        assert!(body.take_events().is_empty());

        // Elimination can fire again after the reset
        body.drain_spin(1e6);
        assert_eq!(eliminated_events(&body.take_events()), 1);
    }

    #[test]
    fn test_dash_refused_without_spin_budget() {
        let mut body = body();
        let budget = body.tuning().dash_spin_cost * body.tuning().dash_spin_cost_margin;
        body.drain_spin(body.current_spin() - budget * 0.5);

        let spin_before = body.current_spin();
        assert!(!body.try_dash());
        assert_eq!(body.velocity(), Vec3::ZERO);
        assert_relative_eq!(body.current_spin(), spin_before);
        assert!(body.dash_ready());
        assert!(body.take_events().is_empty());
    }

    #[test]
    fn test_dash_refused_while_on_cooldown() {
        let mut body = body();
        assert!(body.try_dash());
        let velocity_after_first = body.velocity();
        assert!(!body.try_dash());
        assert_eq!(body.velocity(), velocity_after_first);
    }

    #[test]
    fn test_dash_fallback_direction_and_cost() {
        let mut body = body();
        let spin_before = body.current_spin();
        assert!(body.try_dash());

        // No input, no velocity: fixed +X fallback
        assert!(body.velocity().x > 0.0);
        assert_relative_eq!(body.velocity().z, 0.0);
        assert_relative_eq!(
            body.current_spin(),
            spin_before - body.tuning().dash_spin_cost
        );
        assert!(body.is_dashing());
        assert!(!body.dash_ready());

        let events = body.take_events();
        assert!(events
            .iter()
            .any(|e| matches!(e, SimEvent::DashExecuted { player: 0 })));
    }

    #[test]
    fn test_dash_prefers_input_direction() {
        let mut body = body();
        body.update(DT, &PlayerCommand::move_toward(Vec2::new(0.0, 1.0)));
        body.update(DT, &PlayerCommand::move_toward(Vec2::new(0.0, 1.0)).with_dash());
        // Dash went along +z (the stick), not along the +X fallback
        assert!(body.velocity().z > body.velocity().x.abs());
    }

    #[test]
    fn test_dash_cooldown_progress_with_zero_cooldown_tuning() {
        // The builder does not validate tuning; a zero cooldown must still
        // yield a finite, full progress gauge after a dash
        let mut body = CombatBody::builder(0)
            .tuning(CombatTuning {
                dash_cooldown: 0.0,
                dash_armor_duration: 0.0,
                ..CombatTuning::default()
            })
            .build();
        assert_eq!(body.dash_cooldown_progress(), 1.0);

        assert!(body.try_dash());
        let progress = body.dash_cooldown_progress();
        assert!(progress.is_finite());
        assert_eq!(progress, 1.0);
    }

    #[test]
    fn test_dash_armor_expires_before_cooldown() {
        let mut body = body();
        body.try_dash();
        let armor = body.tuning().dash_armor_duration;

        body.update(armor + 0.01, &PlayerCommand::neutral());
        assert!(!body.is_dashing());
        assert!(!body.dash_ready());

        body.update(body.tuning().dash_cooldown, &PlayerCommand::neutral());
        assert!(body.dash_ready());
    }

    #[test]
    fn test_input_sequence_brakes_to_exact_zero() {
        // Regression guard for the stale-acceleration failure mode:
        // [right, right, zero, zero] must end with velocity exactly zero.
        let mut body = body();
        body.update(DT, &PlayerCommand::move_toward(Vec2::X));
        body.update(DT, &PlayerCommand::move_toward(Vec2::X));
        assert!(body.velocity_magnitude() > 0.0);

        body.update(DT, &PlayerCommand::neutral());
        body.update(DT, &PlayerCommand::neutral());
        assert_eq!(body.velocity(), Vec3::ZERO);
        assert!(body.position().x > 0.0);
    }

    #[test]
    fn test_speed_never_exceeds_ceiling() {
        let mut body = body();
        for _ in 0..200 {
            body.update(DT, &PlayerCommand::move_toward(Vec2::X));
        }
        let ceiling = body.stats().move_speed * 1.1 * (1.0 + body.tuning().speed_clamp_margin);
        assert!(body.velocity_magnitude() <= ceiling + 1e-3);
    }

    #[test]
    fn test_oversized_input_is_normalized() {
        let mut a = CombatBody::builder(0).build();
        let mut b = CombatBody::builder(1).build();
        a.update(DT, &PlayerCommand::move_toward(Vec2::new(100.0, 0.0)));
        b.update(DT, &PlayerCommand::move_toward(Vec2::X));
        assert_relative_eq!(a.velocity_magnitude(), b.velocity_magnitude(), epsilon = 1e-5);
    }

    #[test]
    fn test_heavier_top_accelerates_slower() {
        let mut light = CombatBody::builder(0).build();
        let mut heavy = CombatBody::builder(1)
            .base_stats(StatBlock {
                weight: 2.5,
                ..StatBlock::standard()
            })
            .build();
        light.update(DT, &PlayerCommand::move_toward(Vec2::X));
        heavy.update(DT, &PlayerCommand::move_toward(Vec2::X));
        assert!(light.velocity_magnitude() > heavy.velocity_magnitude());
    }

    #[test]
    fn test_equipment_change_re_derives_immediately() {
        let mut body = body();
        let spin_before = body.current_spin();

        // A part that shrinks the flywheel clamps the stored charge too
        body.equip(
            EquipmentSlot::Body,
            PartModifiers {
                max_spin: -400.0,
                ..Default::default()
            },
        );
        assert_relative_eq!(body.stats().max_spin, spin_before - 400.0);
        assert_relative_eq!(body.current_spin(), body.stats().max_spin);

        body.unequip(EquipmentSlot::Body);
        assert_relative_eq!(body.stats().max_spin, spin_before);
        // Spin does not bounce back when capacity returns
        assert_relative_eq!(body.current_spin(), spin_before - 400.0);
    }

    #[test]
    fn test_default_special_recovers_spin_and_hops() {
        let mut body = body();
        body.drain_spin(100.0);
        let spin_before = body.current_spin();

        assert_eq!(body.try_special(), Some(AbilityKind::Recover));
        assert_relative_eq!(
            body.current_spin(),
            spin_before + body.tuning().default_recover_spin
        );
        assert!(body.velocity().y > 0.0);
        assert!(body
            .take_events()
            .iter()
            .any(|e| matches!(e, SimEvent::SpecialExecuted { kind: AbilityKind::Recover, .. })));
    }

    #[test]
    fn test_special_refused_when_eliminated() {
        let mut body = body();
        body.drain_spin(1e6);
        assert_eq!(body.try_special(), None);
    }

    #[test]
    fn test_eliminated_body_ignores_input() {
        let mut body = body();
        body.drain_spin(1e6);
        let position = body.position();
        body.update(DT, &PlayerCommand::move_toward(Vec2::X).with_dash());
        assert_eq!(body.position(), position);
        assert_eq!(body.velocity(), Vec3::ZERO);
    }
}
