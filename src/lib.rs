//! Fixed-timestep combat core for a spinning-top arena brawler.
//!
//! Spin energy doubles as health and ability fuel: it decays passively,
//! collisions knock it out of the loser, dashes spend it, and a top whose
//! spin runs dry is eliminated. The crate owns the per-tick model (movement,
//! dash, specials, collision resolution, events); rendering, input devices
//! and match flow live in the host.
//!
//! Typical use: build a [`sim::Simulation`], add players with their part
//! loadouts, submit one [`game::PlayerCommand`] per player per tick, call
//! `tick` at the rate [`sim::SimClock`] hands out, and drain
//! [`sim::SimEvent`]s for presentation.

pub mod core;
pub mod game;
pub mod sim;

pub use game::combat::{BodyState, CombatBody, CombatTuning, PlayerId};
pub use game::command::PlayerCommand;
pub use game::stats::{aggregate, EquipmentSlot, Loadout, PartModifiers, StatBlock};
pub use sim::{SimClock, SimEvent, Simulation, FIXED_TIMESTEP};
