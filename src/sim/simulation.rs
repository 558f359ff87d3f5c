// Simulation: the fixed-tick orchestrator
//
// One tick runs strictly ordered phases: consume staged commands and
// integrate every body, detect contacts, resolve them (full resolution for
// fresh pairs, grind for persisting ones), then publish events. All
// integration writes complete before any resolution reads a velocity, so the
// resolver never sees a half-updated pair.

use glam::Vec3;

use crate::core::math::planar;
use crate::game::abilities::AbilityCharges;
use crate::game::combat::body::{CombatBody, PlayerId};
use crate::game::combat::resolver::CollisionResolver;
use crate::game::combat::tuning::{CombatTuning, TuningError};
use crate::game::command::PlayerCommand;
use crate::game::stats::{Loadout, StatBlock};
use crate::sim::contact::{
    ContactDetector, ContactPhase, ContactTracker, DiscContactDetector, DiscProfile,
};
use crate::sim::events::{EventQueue, SimEvent};

/// The combat core for one match: up to four tops, a contact detector,
/// a resolver and the event queue the match controller drains.
pub struct Simulation {
    tuning: CombatTuning,
    bodies: Vec<CombatBody>,
    commands: Vec<PlayerCommand>,
    charges: Vec<AbilityCharges>,
    detector: Box<dyn ContactDetector>,
    resolver: CollisionResolver,
    tracker: ContactTracker,
    events: EventQueue,
}

impl Simulation {
    /// Build a simulation over a validated tuning set
    pub fn new(tuning: CombatTuning) -> Result<Self, TuningError> {
        tuning.validate()?;
        Ok(Self {
            resolver: CollisionResolver::new(tuning.clone()),
            bodies: Vec::new(),
            commands: Vec::new(),
            charges: Vec::new(),
            detector: Box::new(DiscContactDetector::new()),
            tracker: ContactTracker::new(),
            events: EventQueue::new(),
            tuning,
        })
    }

    /// Swap in a different contact detection collaborator
    pub fn with_detector(mut self, detector: Box<dyn ContactDetector>) -> Self {
        self.detector = detector;
        self
    }

    /// Add a player's top at a spawn point. Ids are dense and stable for
    /// the lifetime of the simulation.
    pub fn add_player(&mut self, base: StatBlock, loadout: Loadout, spawn: Vec3) -> PlayerId {
        let id = self.bodies.len() as PlayerId;
        let gate = match loadout.core_ability() {
            Some(descriptor) => AbilityCharges::from_descriptor(descriptor),
            None => AbilityCharges::unlimited(self.tuning.default_special_cooldown),
        };
        let body = CombatBody::builder(id)
            .tuning(self.tuning.clone())
            .base_stats(base)
            .loadout(loadout)
            .position(spawn)
            .build();
        self.bodies.push(body);
        self.commands.push(PlayerCommand::neutral());
        self.charges.push(gate);
        log::info!("player {} joined the arena", id);
        id
    }

    /// Stage a player's command for the next tick. Missing commands are
    /// neutral: the top brakes instead of coasting.
    pub fn submit_command(&mut self, player: PlayerId, command: PlayerCommand) {
        if let Some(slot) = self.commands.get_mut(player as usize) {
            *slot = command;
        }
    }

    /// Run one fixed tick
    pub fn tick(&mut self, dt: f32) {
        // Phase 1: integrate every body with its staged command
        for (index, body) in self.bodies.iter_mut().enumerate() {
            let command = std::mem::take(&mut self.commands[index]);
            body.update(dt, &command);
            // A charge is only spent once the executor confirms the kind was
            // handled; an unhandled kind keeps its charges for a richer
            // executor to claim
            if command.special && body.is_active() && self.charges[index].available() {
                if body.try_special().is_some() {
                    self.charges[index].try_take();
                } else {
                    log::debug!("player {} special not handled by executor", body.id());
                }
            }
            self.charges[index].tick(dt);
        }

        // Phase 2: detect contacts among the still-active discs
        let discs: Vec<DiscProfile> = self
            .bodies
            .iter()
            .filter(|body| body.is_active())
            .map(|body| DiscProfile {
                id: body.id(),
                center: planar(body.position()),
                radius: self.tuning.disc_radius,
            })
            .collect();
        let contacts = self.detector.detect(&discs);

        // Phase 3: fresh pairs get full resolution, persisting pairs grind
        for pair in &contacts {
            let (a, b) = pair_mut(&mut self.bodies, pair.first as usize, pair.second as usize);
            match self.tracker.phase(pair) {
                ContactPhase::Started => {
                    self.resolver.resolve(a, b, pair.normal);
                }
                ContactPhase::Persisted => {
                    self.resolver.grind(a, b, dt);
                }
            }
        }
        self.tracker.commit(&contacts);

        // Phase 4: publish
        for body in &mut self.bodies {
            self.events.extend(body.take_events());
        }
    }

    /// Take every event produced since the last drain
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        self.events.drain()
    }

    /// Synchronous between-round reset; call while the clock is paused.
    /// Restores every body, refills ability charges and forgets contact
    /// pairs - nothing leaks into the next round.
    pub fn reset_round(&mut self) {
        for body in &mut self.bodies {
            body.reset();
        }
        for gate in &mut self.charges {
            gate.reset();
        }
        for command in &mut self.commands {
            *command = PlayerCommand::neutral();
        }
        self.tracker.clear();
        self.events.drain();
        log::info!("round reset");
    }

    pub fn tuning(&self) -> &CombatTuning {
        &self.tuning
    }

    pub fn body(&self, player: PlayerId) -> Option<&CombatBody> {
        self.bodies.get(player as usize)
    }

    pub fn body_mut(&mut self, player: PlayerId) -> Option<&mut CombatBody> {
        self.bodies.get_mut(player as usize)
    }

    pub fn bodies(&self) -> &[CombatBody] {
        &self.bodies
    }

    /// Charge/cooldown gate for a player's special
    pub fn ability_charges(&self, player: PlayerId) -> Option<&AbilityCharges> {
        self.charges.get(player as usize)
    }

    pub fn player_count(&self) -> usize {
        self.bodies.len()
    }

    /// Number of tops still in the round
    pub fn active_count(&self) -> usize {
        self.bodies.iter().filter(|body| body.is_active()).count()
    }
}

/// Mutable access to two distinct bodies at once
fn pair_mut(bodies: &mut [CombatBody], i: usize, j: usize) -> (&mut CombatBody, &mut CombatBody) {
    debug_assert_ne!(i, j);
    if i < j {
        let (left, right) = bodies.split_at_mut(j);
        (&mut left[i], &mut right[0])
    } else {
        let (left, right) = bodies.split_at_mut(i);
        (&mut right[0], &mut left[j])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::abilities::{AbilityDescriptor, AbilityKind};
    use crate::game::stats::{EquipmentSlot, PartModifiers};
    use approx::assert_relative_eq;
    use glam::Vec2;

    const DT: f32 = 1.0 / 60.0;

    fn sim() -> Simulation {
        Simulation::new(CombatTuning::default()).unwrap()
    }

    fn two_player_sim(spacing: f32) -> Simulation {
        let mut sim = sim();
        sim.add_player(
            StatBlock::standard(),
            Loadout::new(),
            Vec3::new(-spacing / 2.0, 0.0, 0.0),
        );
        sim.add_player(
            StatBlock::standard(),
            Loadout::new(),
            Vec3::new(spacing / 2.0, 0.0, 0.0),
        );
        sim
    }

    #[test]
    fn test_invalid_tuning_is_rejected() {
        let tuning = CombatTuning {
            dash_cooldown: -1.0,
            ..CombatTuning::default()
        };
        assert!(Simulation::new(tuning).is_err());
    }

    #[test]
    fn test_player_ids_are_dense() {
        let sim = two_player_sim(3.0);
        assert_eq!(sim.player_count(), 2);
        assert_eq!(sim.body(0).unwrap().id(), 0);
        assert_eq!(sim.body(1).unwrap().id(), 1);
        assert!(sim.body(2).is_none());
    }

    #[test]
    fn test_spin_decays_over_ticks() {
        let mut sim = two_player_sim(10.0);
        let start = sim.body(0).unwrap().current_spin();
        for _ in 0..60 {
            sim.tick(DT);
        }
        let spin = sim.body(0).unwrap().current_spin();
        assert_relative_eq!(spin, start - StatBlock::standard().spin_decay_rate, epsilon = 0.01);
    }

    #[test]
    fn test_missing_command_means_neutral() {
        let mut sim = two_player_sim(10.0);
        sim.submit_command(0, PlayerCommand::move_toward(Vec2::X));
        sim.tick(DT);
        assert!(sim.body(0).unwrap().velocity_magnitude() > 0.0);

        // No command staged: the top must brake back to zero
        for _ in 0..30 {
            sim.tick(DT);
        }
        assert_eq!(planar(sim.body(0).unwrap().velocity()), Vec2::ZERO);
    }

    #[test]
    fn test_dash_command_emits_event() {
        let mut sim = two_player_sim(10.0);
        sim.submit_command(0, PlayerCommand::move_toward(Vec2::X).with_dash());
        sim.tick(DT);
        let events = sim.drain_events();
        assert!(events
            .iter()
            .any(|e| matches!(e, SimEvent::DashExecuted { player: 0 })));
    }

    #[test]
    fn test_driven_approach_ends_in_collision() {
        let mut sim = two_player_sim(3.0);
        let start = sim.body(0).unwrap().current_spin();

        let mut collided = false;
        for _ in 0..120 {
            sim.submit_command(0, PlayerCommand::move_toward(Vec2::X));
            sim.submit_command(1, PlayerCommand::move_toward(-Vec2::X));
            sim.tick(DT);
            if sim
                .drain_events()
                .iter()
                .any(|e| matches!(e, SimEvent::CollisionWithOpponent { .. }))
            {
                collided = true;
                break;
            }
        }

        assert!(collided, "driven tops never collided");
        assert!(sim.body(0).unwrap().current_spin() < start);
        assert!(sim.body(1).unwrap().current_spin() < start);
    }

    #[test]
    fn test_contact_resolved_once_then_grinds() {
        // Overlapping pair driven into each other: the first touching tick
        // is one full resolution per side, the next tick only grinds.
        let mut sim = two_player_sim(1.0);
        sim.body_mut(0).unwrap().apply_knockback(Vec3::new(5.0, 0.0, 0.0));
        sim.body_mut(1).unwrap().apply_knockback(Vec3::new(-5.0, 0.0, 0.0));
        sim.submit_command(0, PlayerCommand::move_toward(Vec2::X));
        sim.submit_command(1, PlayerCommand::move_toward(-Vec2::X));
        sim.tick(DT);

        let events = sim.drain_events();
        let hits_by_0 = events
            .iter()
            .filter(|e| matches!(e, SimEvent::CollisionWithOpponent { player: 0, .. }))
            .count();
        assert_eq!(hits_by_0, 1);

        // Knockback reversed them but they still overlap: grind only
        let spin_before = sim.body(0).unwrap().current_spin();
        sim.tick(DT);
        let events = sim.drain_events();
        assert!(!events
            .iter()
            .any(|e| matches!(e, SimEvent::CollisionWithOpponent { .. })));
        let expected_grind = sim.tuning().grind_damage_per_sec * DT
            + StatBlock::standard().spin_decay_rate * DT;
        assert_relative_eq!(
            sim.body(0).unwrap().current_spin(),
            spin_before - expected_grind,
            epsilon = 1e-3
        );
    }

    #[test]
    fn test_core_charges_gate_specials() {
        let mut sim = sim();
        let mut loadout = Loadout::new();
        loadout.equip(
            EquipmentSlot::Core,
            PartModifiers {
                ability: Some(AbilityDescriptor {
                    charges: 1,
                    cooldown: 0.0,
                    ..AbilityDescriptor::new(AbilityKind::SpinBoost)
                }),
                ..Default::default()
            },
        );
        sim.add_player(StatBlock::standard(), loadout, Vec3::ZERO);

        sim.submit_command(0, PlayerCommand::neutral().with_special());
        sim.tick(DT);
        sim.submit_command(0, PlayerCommand::neutral().with_special());
        sim.tick(DT);

        let specials = sim
            .drain_events()
            .iter()
            .filter(|e| matches!(e, SimEvent::SpecialExecuted { kind: AbilityKind::SpinBoost, .. }))
            .count();
        assert_eq!(specials, 1);
    }

    #[test]
    fn test_unhandled_special_kind_keeps_its_charges() {
        // The standard executor leaves arena-wide kinds to the match layer;
        // pressing special must not burn a charge or fire an event for them.
        let mut sim = sim();
        let mut loadout = Loadout::new();
        loadout.equip(
            EquipmentSlot::Core,
            PartModifiers {
                ability: Some(AbilityDescriptor {
                    charges: 2,
                    cooldown: 0.0,
                    ..AbilityDescriptor::new(AbilityKind::Shockwave)
                }),
                ..Default::default()
            },
        );
        sim.add_player(StatBlock::standard(), loadout, Vec3::ZERO);

        sim.submit_command(0, PlayerCommand::neutral().with_special());
        sim.tick(DT);

        assert!(!sim
            .drain_events()
            .iter()
            .any(|e| matches!(e, SimEvent::SpecialExecuted { .. })));
        assert_eq!(
            sim.ability_charges(0).unwrap().charges_remaining(),
            Some(2)
        );
        assert!(sim.ability_charges(0).unwrap().available());
    }

    #[test]
    fn test_default_special_is_recover() {
        let mut sim = two_player_sim(10.0);
        sim.body_mut(0).unwrap().drain_spin(100.0);
        sim.submit_command(0, PlayerCommand::neutral().with_special());
        sim.tick(DT);
        assert!(sim
            .drain_events()
            .iter()
            .any(|e| matches!(e, SimEvent::SpecialExecuted { kind: AbilityKind::Recover, .. })));
    }

    #[test]
    fn test_eliminated_bodies_leave_the_contact_set() {
        let mut sim = two_player_sim(1.0);
        sim.body_mut(1).unwrap().drain_spin(1e6);
        sim.body_mut(0).unwrap().apply_knockback(Vec3::new(5.0, 0.0, 0.0));
        sim.submit_command(0, PlayerCommand::move_toward(Vec2::X));
        sim.tick(DT);

        let events = sim.drain_events();
        assert!(!events
            .iter()
            .any(|e| matches!(e, SimEvent::CollisionWithOpponent { .. })));
        assert_eq!(sim.active_count(), 1);
    }

    #[test]
    fn test_reset_round_restores_everything() {
        let mut sim = two_player_sim(1.0);
        sim.body_mut(0).unwrap().drain_spin(1e6);
        sim.submit_command(1, PlayerCommand::move_toward(Vec2::X).with_dash());
        sim.tick(DT);
        sim.drain_events();

        sim.reset_round();
        for body in sim.bodies() {
            assert!(body.is_active());
            assert_relative_eq!(body.current_spin(), body.stats().max_spin);
            assert!(body.dash_ready());
            assert_eq!(body.velocity(), Vec3::ZERO);
        }
        assert!(sim.drain_events().is_empty());

        // Elimination can fire again in the new round
        sim.body_mut(0).unwrap().drain_spin(1e6);
        sim.tick(DT);
        let eliminations = sim
            .drain_events()
            .iter()
            .filter(|e| matches!(e, SimEvent::Eliminated { player: 0 }))
            .count();
        assert_eq!(eliminations, 1);
    }

    #[test]
    fn test_exposed_gauges_stay_in_range() {
        let mut sim = two_player_sim(3.0);
        for _ in 0..240 {
            sim.submit_command(0, PlayerCommand::move_toward(Vec2::X).with_dash());
            sim.submit_command(1, PlayerCommand::move_toward(-Vec2::X));
            sim.tick(DT);
            for body in sim.bodies() {
                let spin = body.spin_percentage();
                let dash = body.dash_cooldown_progress();
                assert!((0.0..=1.0).contains(&spin));
                assert!((0.0..=1.0).contains(&dash));
            }
        }
    }
}
