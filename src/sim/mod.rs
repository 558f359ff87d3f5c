// Simulation layer: fixed-timestep pacing, contact detection, the event
// queue and the per-match orchestrator

pub mod clock;
pub mod contact;
pub mod events;
pub mod simulation;

pub use clock::{SimClock, FIXED_TIMESTEP};
pub use contact::{ContactDetector, ContactPair, ContactPhase, ContactTracker, DiscProfile};
pub use events::{EventQueue, SimEvent};
pub use simulation::Simulation;
