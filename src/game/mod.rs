// Game-side modules: stats and equipment, the combat core, abilities,
// and the per-tick command contract

pub mod abilities;
pub mod combat;
pub mod command;
pub mod stats;

pub use combat::{CombatBody, CombatTuning, PlayerId};
pub use command::PlayerCommand;
