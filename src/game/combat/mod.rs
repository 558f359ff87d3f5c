// Combat core
//
// The per-tick physics/combat model: the combat body (movement, spin, dash,
// elimination), the collision resolver (damage and knockback exchange) and
// the tuning set both read from.

pub mod body;
pub mod resolver;
pub mod tuning;

pub use body::{BodyState, CombatBody, CombatBodyBuilder, PlayerId};
pub use resolver::{Attacker, CollisionResolver, ContactOutcome};
pub use tuning::{CombatTuning, TuningError};
