// Headless demo match: two scripted tops chase each other until one is
// eliminated. Run with RUST_LOG=debug for per-collision detail.

use anyhow::Result;
use glam::Vec3;
use log::info;

use gyro_arena::core::math::planar;
use gyro_arena::game::abilities::{AbilityDescriptor, AbilityKind};
use gyro_arena::sim::SimClock;
use gyro_arena::{
    CombatTuning, EquipmentSlot, Loadout, PartModifiers, PlayerCommand, PlayerId, SimEvent,
    Simulation, StatBlock,
};

/// Sim-seconds before the demo calls the match a draw
const MATCH_TIME_LIMIT: f32 = 120.0;

fn main() -> Result<()> {
    // Initialize logger
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    info!("Starting demo match...");

    let base = StatBlock {
        max_spin: 80.0,
        ..StatBlock::standard()
    };

    let mut sim = Simulation::new(CombatTuning::default())?;

    // Player 0: aggressive blade, spin-boost core
    let mut attacker_loadout = Loadout::new();
    attacker_loadout.equip(
        EquipmentSlot::Blade,
        PartModifiers {
            attack_power: 4.0,
            weight: 0.3,
            ..Default::default()
        },
    );
    attacker_loadout.equip(
        EquipmentSlot::Core,
        PartModifiers {
            ability: Some(AbilityDescriptor::new(AbilityKind::SpinBoost)),
            ..Default::default()
        },
    );
    let red = sim.add_player(base, attacker_loadout, Vec3::new(-4.0, 0.0, 0.0));

    // Player 1: heavy defensive body, no core
    let mut tank_loadout = Loadout::new();
    tank_loadout.equip(
        EquipmentSlot::Body,
        PartModifiers {
            weight: 1.0,
            defense_percent: 15.0,
            ..Default::default()
        },
    );
    let blue = sim.add_player(base, tank_loadout, Vec3::new(4.0, 0.0, 0.0));

    let mut clock = SimClock::new();
    let mut sim_time = 0.0f32;

    'frames: loop {
        let steps = clock.begin_frame();
        for _ in 0..steps {
            sim.submit_command(red, chase_command(&sim, red, blue));
            sim.submit_command(blue, chase_command(&sim, blue, red));
            sim.tick(clock.fixed_timestep());
            sim_time += clock.fixed_timestep();

            for event in sim.drain_events() {
                report(&sim, event);
            }

            if sim.active_count() <= 1 {
                break 'frames;
            }
            if sim_time >= MATCH_TIME_LIMIT {
                info!("time limit reached, calling it a draw");
                break 'frames;
            }
        }
        std::thread::sleep(std::time::Duration::from_millis(1));
    }

    for body in sim.bodies() {
        info!(
            "player {} finished with {:.1} spin ({})",
            body.id(),
            body.current_spin(),
            if body.is_active() { "active" } else { "out" }
        );
    }
    info!(
        "match over after {:.1} sim-seconds ({} ticks)",
        sim_time,
        clock.step_count()
    );

    Ok(())
}

/// Minimal chase script: steer at the opponent, dash when close, pop the
/// special once spin drops below half
fn chase_command(sim: &Simulation, me: PlayerId, target: PlayerId) -> PlayerCommand {
    let (Some(me), Some(target)) = (sim.body(me), sim.body(target)) else {
        return PlayerCommand::neutral();
    };
    if !target.is_active() {
        return PlayerCommand::neutral();
    }

    let to_target = planar(target.position()) - planar(me.position());
    let mut command = PlayerCommand::move_toward(to_target);
    if me.dash_ready() && to_target.length() < 3.0 {
        command = command.with_dash();
    }
    if me.spin_percentage() < 0.5 {
        command = command.with_special();
    }
    command
}

fn report(sim: &Simulation, event: SimEvent) {
    match event {
        SimEvent::CollisionWithOpponent {
            player,
            opponent,
            damage_dealt,
        } => {
            info!(
                "player {} hit player {} for {:.1} spin",
                player, opponent, damage_dealt
            );
        }
        SimEvent::DashExecuted { player } => info!("player {} dashed", player),
        SimEvent::SpecialExecuted { player, kind } => {
            info!("player {} used special {:?}", player, kind)
        }
        SimEvent::Eliminated { player } => info!("player {} is out!", player),
        SimEvent::SpinChanged { player, percentage } => {
            if let Some(body) = sim.body(player) {
                log::debug!(
                    "player {} spin {:.0}% ({:.1})",
                    player,
                    percentage * 100.0,
                    body.current_spin()
                );
            }
        }
    }
}
